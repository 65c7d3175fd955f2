//! Diff/patch engine for screenplay documents.
//!
//! A pure function library with no dependencies on the rest of the system:
//! [`calculate_diff`] computes a structured difference between two document
//! snapshots, [`apply_diff`] reconstructs the target snapshot (fuzzily when
//! the source has drifted), and [`apply_selected_hunks`] applies a
//! user-chosen subset of changes.
//!
//! Hunks are line-granular: ranges use 1-based line numbers, are listed in
//! ascending order of position in the original document, and never overlap.
//! The defining correctness property is reconstruction — splicing every
//! hunk's `modified_text` into the original at its declared position yields
//! the modified text exactly.

mod apply;
mod engine;

pub use apply::{apply_diff, apply_selected_hunks};
pub use engine::{calculate_diff, generate_summary};

use serde::{Deserialize, Serialize};

/// The classification of a single change region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HunkKind {
    /// Lines present only in the modified text
    Add,
    /// Lines present only in the original text
    Remove,
    /// A region rewritten in place
    Modify,
}

/// One contiguous change region.
///
/// An `add` hunk has an empty original range and a `remove` hunk an empty
/// modified range. Empty ranges are *anchored*: `start` points at the line
/// before which the change applies and `end == start - 1`, so selective
/// application stays position-correct without consulting the other side's
/// coordinates.
///
/// Serialized in camelCase to match the wire protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunk {
    /// Identifier unique within one `calculate_diff` result
    pub id: String,
    pub kind: HunkKind,
    /// First affected line in the original text (1-based)
    pub original_start: usize,
    /// Last affected line in the original text, `original_start - 1` when empty
    pub original_end: usize,
    /// First affected line in the modified text (1-based)
    pub modified_start: usize,
    /// Last affected line in the modified text, `modified_start - 1` when empty
    pub modified_end: usize,
    /// The affected original lines, verbatim (including line terminators)
    pub original_text: String,
    /// The replacement lines, verbatim (including line terminators)
    pub modified_text: String,
    /// Reviewer decision, unset until a caller marks the hunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
}

impl DiffHunk {
    /// Number of lines covered on the original side (0 for `add` hunks).
    pub fn original_len(&self) -> usize {
        (self.original_end + 1).saturating_sub(self.original_start)
    }

    /// Number of lines covered on the modified side (0 for `remove` hunks).
    pub fn modified_len(&self) -> usize {
        (self.modified_end + 1).saturating_sub(self.modified_start)
    }
}

/// The structured difference between two document snapshots.
///
/// Derived, never mutated directly; recomputed from any two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    /// Change regions, ascending by original position, non-overlapping
    pub hunks: Vec<DiffHunk>,
    pub original_text: String,
    pub modified_text: String,
    /// Human-readable description, see [`generate_summary`]
    pub summary: String,
}

/// Split a document into lines that keep their terminators, so that
/// concatenating the pieces reproduces the input exactly.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}
