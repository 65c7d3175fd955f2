//! Patch application: full (fuzzy) and selective.

use crate::{DiffHunk, DiffResult, HunkKind, calculate_diff, split_lines};

/// How far from a hunk's declared position a drifted match may be found.
const MAX_DRIFT_LINES: usize = 200;

/// Reproduce the text that was diffed against `original`.
///
/// When `original` is unchanged since the diff was computed this is exactly
/// `diff.modified_text`. When the document has drifted, the patch is
/// re-derived from the stored snapshot pair and applied fuzzily: each hunk's
/// original lines are located by exact content match nearest its declared
/// position, and hunks whose content can no longer be found are skipped.
pub fn apply_diff(original: &str, diff: &DiffResult) -> String {
    if original == diff.original_text {
        return diff.modified_text.clone();
    }

    let patch = calculate_diff(&diff.original_text, &diff.modified_text);
    let mut lines: Vec<String> = split_lines(original)
        .into_iter()
        .map(str::to_string)
        .collect();

    // Back to front so a splice never shifts the positions of hunks that
    // have not been applied yet.
    for hunk in patch.hunks.iter().rev() {
        let expected = hunk.original_start - 1;
        match hunk.kind {
            HunkKind::Add => {
                let at = expected.min(lines.len());
                splice(&mut lines, at, 0, &hunk.modified_text);
            }
            HunkKind::Remove | HunkKind::Modify => {
                let target: Vec<&str> = split_lines(&hunk.original_text);
                if let Some(at) = locate(&lines, &target, expected) {
                    splice(&mut lines, at, target.len(), &hunk.modified_text);
                }
            }
        }
    }

    lines.concat()
}

/// Apply only the hunks whose IDs appear in `accepted_ids`, leaving every
/// other region of `original` untouched.
///
/// Accepted hunks are applied in descending document order, splicing from
/// the end of the document backward, so applying one hunk never invalidates
/// the stored line indices of hunks not yet applied. Accepted hunks must not
/// overlap (guaranteed by `calculate_diff`; asserted here in debug builds).
pub fn apply_selected_hunks<S: AsRef<str>>(
    original: &str,
    diff: &DiffResult,
    accepted_ids: &[S],
) -> String {
    let mut selected: Vec<&DiffHunk> = diff
        .hunks
        .iter()
        .filter(|h| accepted_ids.iter().any(|id| id.as_ref() == h.id))
        .collect();
    selected.sort_by(|a, b| b.original_start.cmp(&a.original_start));

    debug_assert!(
        selected
            .windows(2)
            .all(|pair| pair[1].original_end < pair[0].original_start),
        "accepted hunks overlap"
    );

    let mut lines: Vec<String> = split_lines(original)
        .into_iter()
        .map(str::to_string)
        .collect();

    for hunk in selected {
        let at = (hunk.original_start - 1).min(lines.len());
        let remove = hunk.original_len().min(lines.len() - at);
        splice(&mut lines, at, remove, &hunk.modified_text);
    }

    lines.concat()
}

/// Replace `remove` lines at `at` with the lines of `replacement`.
fn splice(lines: &mut Vec<String>, at: usize, remove: usize, replacement: &str) {
    let new_lines = split_lines(replacement).into_iter().map(str::to_string);
    lines.splice(at..at + remove, new_lines);
}

/// Find the occurrence of `target` in `lines` closest to `expected`.
fn locate(lines: &[String], target: &[&str], expected: usize) -> Option<usize> {
    if target.is_empty() || target.len() > lines.len() {
        return None;
    }

    let matches_at = |start: usize| {
        lines[start..start + target.len()]
            .iter()
            .zip(target)
            .all(|(line, t)| line == t)
    };

    let last = lines.len() - target.len();
    let anchor = expected.min(last);
    for offset in 0..=MAX_DRIFT_LINES.min(last.max(anchor)) {
        if anchor >= offset && matches_at(anchor - offset) {
            return Some(anchor - offset);
        }
        if anchor + offset <= last && matches_at(anchor + offset) {
            return Some(anchor + offset);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_ids(diff: &DiffResult) -> Vec<String> {
        diff.hunks.iter().map(|h| h.id.clone()).collect()
    }

    #[test]
    fn apply_diff_round_trips() {
        let pairs = [
            ("", ""),
            ("", "FADE IN:\n"),
            ("FADE IN:\n", ""),
            ("INT. ROOM - DAY\n\nJOHN\nHello.", "INT. ROOM - DAY\n\nJOHN\nHey!"),
            ("a\nb\nc\n", "a\nX\nc\nd\n"),
            ("one\ntwo\nthree", "zero\none\nthree"),
            ("no trailing newline", "no trailing newline\nbut now there is\n"),
        ];
        for (a, b) in pairs {
            let diff = calculate_diff(a, b);
            assert_eq!(apply_diff(a, &diff), b, "round trip failed for {a:?} -> {b:?}");
        }
    }

    #[test]
    fn hunk_reconstruction_property() {
        let pairs = [
            ("a\nb\nc\nd\ne\n", "a\nB\nc\nX\nd\ne\nf\n"),
            ("INT. A\n\nJOHN\nHi.\n\nEXT. B\n\nMARY\nBye.\n", "INT. A\n\nJOHN\nHello there.\n\nEXT. B\n"),
            ("x", "y"),
        ];
        for (a, b) in pairs {
            let diff = calculate_diff(a, b);
            let ids = all_ids(&diff);
            assert_eq!(
                apply_selected_hunks(a, &diff, &ids),
                b,
                "splicing all hunks failed for {a:?} -> {b:?}"
            );
        }
    }

    #[test]
    fn empty_selection_returns_original() {
        let a = "a\nb\nc\n";
        let diff = calculate_diff(a, "a\nB\nc\nd\n");
        let none: [&str; 0] = [];
        assert_eq!(apply_selected_hunks(a, &diff, &none), a);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let a = "a\nb\n";
        let diff = calculate_diff(a, "a\nB\n");
        assert_eq!(apply_selected_hunks(a, &diff, &["nope"]), a);
    }

    #[test]
    fn subset_application_keeps_other_regions() {
        let a = "one\ntwo\nthree\nfour\nfive\n";
        let b = "one\nTWO\nthree\nfour\nFIVE\n";
        let diff = calculate_diff(a, b);
        assert_eq!(diff.hunks.len(), 2);

        let first_only = apply_selected_hunks(a, &diff, &[diff.hunks[0].id.clone()]);
        assert_eq!(first_only, "one\nTWO\nthree\nfour\nfive\n");

        let second_only = apply_selected_hunks(a, &diff, &[diff.hunks[1].id.clone()]);
        assert_eq!(second_only, "one\ntwo\nthree\nfour\nFIVE\n");
    }

    #[test]
    fn selected_add_hunk_is_spliced_at_its_anchor() {
        let a = "a\nc\n";
        let b = "a\nb\nc\nd\n";
        let diff = calculate_diff(a, b);
        let adds: Vec<String> = diff
            .hunks
            .iter()
            .filter(|h| h.kind == HunkKind::Add)
            .map(|h| h.id.clone())
            .collect();
        assert_eq!(adds.len(), 2);
        assert_eq!(apply_selected_hunks(a, &diff, &adds), b);

        // Applying only the first insertion leaves the tail untouched
        let first = apply_selected_hunks(a, &diff, &adds[..1]);
        assert_eq!(first, "a\nb\nc\n");
    }

    #[test]
    fn fuzzy_apply_survives_upstream_drift() {
        let a = "INT. ROOM - DAY\n\nJOHN\nHello.\n";
        let b = "INT. ROOM - DAY\n\nJOHN\nHey, great to see you!\n";
        let diff = calculate_diff(a, b);

        // The caller prepended a title page after the diff was computed.
        let drifted = "FADE IN:\n\nINT. ROOM - DAY\n\nJOHN\nHello.\n";
        let patched = apply_diff(drifted, &diff);
        assert_eq!(
            patched,
            "FADE IN:\n\nINT. ROOM - DAY\n\nJOHN\nHey, great to see you!\n"
        );
    }

    #[test]
    fn fuzzy_apply_skips_unmatchable_hunks() {
        let a = "a\nb\nc\n";
        let b = "a\nB\nc\n";
        let diff = calculate_diff(a, b);

        // The line the hunk rewrites no longer exists anywhere.
        let drifted = "a\nz\nc\n";
        assert_eq!(apply_diff(drifted, &diff), "a\nz\nc\n");
    }
}
