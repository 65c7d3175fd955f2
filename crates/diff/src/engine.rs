//! Diff computation: edit script to hunks, plus the display summary.

use crate::{DiffHunk, DiffResult, HunkKind, split_lines};
use similar::{Algorithm, DiffOp, capture_diff_slices};

/// Compute the structured difference between two document snapshots.
///
/// The edit script is a Myers diff over newline-inclusive line slices;
/// adjacent delete/insert runs arrive already collapsed (`Replace`), so each
/// op maps to exactly one hunk. Hunk IDs are generated by a counter scoped
/// to this call.
pub fn calculate_diff(original: &str, modified: &str) -> DiffResult {
    let old_lines = split_lines(original);
    let new_lines = split_lines(modified);
    let ops = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines);

    let mut hunks = Vec::new();
    let mut next_id = 0usize;
    let mut id = move || {
        next_id += 1;
        format!("h{next_id}")
    };

    for op in ops {
        match op {
            DiffOp::Equal { .. } => {}
            DiffOp::Delete {
                old_index,
                old_len,
                new_index,
            } => hunks.push(DiffHunk {
                id: id(),
                kind: HunkKind::Remove,
                original_start: old_index + 1,
                original_end: old_index + old_len,
                modified_start: new_index + 1,
                modified_end: new_index,
                original_text: old_lines[old_index..old_index + old_len].concat(),
                modified_text: String::new(),
                accepted: None,
            }),
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => hunks.push(DiffHunk {
                id: id(),
                kind: HunkKind::Add,
                original_start: old_index + 1,
                original_end: old_index,
                modified_start: new_index + 1,
                modified_end: new_index + new_len,
                original_text: String::new(),
                modified_text: new_lines[new_index..new_index + new_len].concat(),
                accepted: None,
            }),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => hunks.push(DiffHunk {
                id: id(),
                kind: HunkKind::Modify,
                original_start: old_index + 1,
                original_end: old_index + old_len,
                modified_start: new_index + 1,
                modified_end: new_index + new_len,
                original_text: old_lines[old_index..old_index + old_len].concat(),
                modified_text: new_lines[new_index..new_index + new_len].concat(),
                accepted: None,
            }),
        }
    }

    let summary = summarize(&hunks);
    DiffResult {
        hunks,
        original_text: original.to_string(),
        modified_text: modified.to_string(),
        summary,
    }
}

/// A deterministic, human-readable description of a diff.
///
/// Counts added lines, removed lines, and modified sections, joined with
/// commas and capitalized; `"No changes"` when there are no hunks. Purely
/// descriptive — carries no semantics beyond display.
pub fn generate_summary(diff: &DiffResult) -> String {
    summarize(&diff.hunks)
}

fn summarize(hunks: &[DiffHunk]) -> String {
    if hunks.is_empty() {
        return "No changes".to_string();
    }

    let added: usize = hunks
        .iter()
        .filter(|h| h.kind == HunkKind::Add)
        .map(DiffHunk::modified_len)
        .sum();
    let removed: usize = hunks
        .iter()
        .filter(|h| h.kind == HunkKind::Remove)
        .map(DiffHunk::original_len)
        .sum();
    let modified = hunks.iter().filter(|h| h.kind == HunkKind::Modify).count();

    let mut parts = Vec::new();
    if added > 0 {
        parts.push(format!("{added} line{} added", plural(added)));
    }
    if removed > 0 {
        parts.push(format!("{removed} line{} removed", plural(removed)));
    }
    if modified > 0 {
        parts.push(format!("{modified} section{} modified", plural(modified)));
    }

    let mut summary = parts.join(", ");
    if let Some(first) = summary.get(..1) {
        let capitalized = first.to_uppercase();
        summary.replace_range(..1, &capitalized);
    }
    summary
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
