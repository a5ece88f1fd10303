//! Grouping an edit script into hunks.
//!
//! Each hunk opens `context` unchanged lines before its first change and
//! closes `context` unchanged lines after its last one. Two changes separated
//! by at most `2 * context` unchanged lines share a hunk, since their context
//! windows would touch or overlap.

use crate::types::{DiffLine, EditOperation, Hunk};

/// Group `script` into ordered, non-overlapping hunks.
///
/// Returns an empty vector when the script has no changes.
pub fn build_hunks(script: &[DiffLine], context: usize) -> Vec<Hunk> {
    let changes: Vec<usize> = script
        .iter()
        .enumerate()
        .filter(|(_, line)| line.is_change())
        .map(|(i, _)| i)
        .collect();

    let Some((&first, rest)) = changes.split_first() else {
        return Vec::new();
    };

    let mut hunks = Vec::new();
    let mut group_start = first;
    let mut group_end = first;
    for &i in rest {
        let unchanged_run = i - group_end - 1;
        if unchanged_run > 2 * context {
            hunks.push(make_hunk(script, group_start, group_end, context));
            group_start = i;
        }
        group_end = i;
    }
    hunks.push(make_hunk(script, group_start, group_end, context));
    hunks
}

fn make_hunk(script: &[DiffLine], first_change: usize, last_change: usize, context: usize) -> Hunk {
    let start = first_change.saturating_sub(context);
    let end = (last_change + context + 1).min(script.len());
    let lines = script[start..end].to_vec();

    let in_old = |l: &&DiffLine| l.operation != EditOperation::Added;
    let in_new = |l: &&DiffLine| l.operation != EditOperation::Removed;

    let old_before = script[..start].iter().filter(in_old).count();
    let new_before = script[..start].iter().filter(in_new).count();
    let old_count = lines.iter().filter(in_old).count();
    let new_count = lines.iter().filter(in_new).count();

    Hunk {
        old_start: if old_count == 0 { old_before } else { old_before + 1 },
        old_count,
        new_start: if new_count == 0 { new_before } else { new_before + 1 },
        new_count,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::myers::DiffEngine;

    fn script(old: &[&str], new: &[&str]) -> Vec<DiffLine> {
        DiffEngine::new().edit_script(old, new).unwrap()
    }

    fn numbered(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn no_changes_no_hunks() {
        assert!(build_hunks(&script(&["a"], &["a"]), 3).is_empty());
    }

    #[test]
    fn short_file_fits_in_one_hunk() {
        let hunks = build_hunks(&script(&["a", "b", "c"], &["a", "x", "c"]), 3);
        assert_eq!(hunks.len(), 1);
        let h = &hunks[0];
        assert_eq!((h.old_start, h.old_count, h.new_start, h.new_count), (1, 3, 1, 3));
    }

    #[test]
    fn distant_changes_split_and_trim_context() {
        let old = numbered("l", 20);
        let mut new = old.clone();
        new[1] = "changed-2".into();
        new[17] = "changed-18".into();
        let old: Vec<&str> = old.iter().map(String::as_str).collect();
        let new: Vec<&str> = new.iter().map(String::as_str).collect();

        let hunks = build_hunks(&script(&old, &new), 3);
        assert_eq!(hunks.len(), 2);

        // Line 2 changed: context l1 before, l3..l5 after.
        let first = &hunks[0];
        assert_eq!((first.old_start, first.old_count), (1, 5));
        assert_eq!(first.lines.last().unwrap().content, "l5");

        // Line 18 changed: context l15..l17 before, l19..l20 after.
        let second = &hunks[1];
        assert_eq!((second.old_start, second.old_count), (15, 6));
        assert_eq!(second.lines.first().unwrap().content, "l15");
    }

    #[test]
    fn gap_of_exactly_twice_context_merges() {
        let old = numbered("l", 10);
        let mut new = old.clone();
        new[1] = "x".into();
        new[8] = "y".into(); // six unchanged lines (3..8) in between
        let old: Vec<&str> = old.iter().map(String::as_str).collect();
        let new: Vec<&str> = new.iter().map(String::as_str).collect();

        assert_eq!(build_hunks(&script(&old, &new), 3).len(), 1);
        assert_eq!(build_hunks(&script(&old, &new), 2).len(), 2);
    }

    #[test]
    fn zero_context_keeps_only_changes() {
        let hunks = build_hunks(&script(&["a", "b", "c"], &["a", "x", "c"]), 0);
        assert_eq!(hunks.len(), 1);
        assert!(hunks[0].lines.iter().all(DiffLine::is_change));
        assert_eq!(hunks[0].old_start, 2);
    }

    #[test]
    fn insertion_into_empty_file_starts_at_zero() {
        let hunks = build_hunks(&script(&[], &["a", "b"]), 3);
        let h = &hunks[0];
        assert_eq!((h.old_start, h.old_count, h.new_start, h.new_count), (0, 0, 1, 2));
    }

    #[test]
    fn counts_match_line_operations() {
        let hunks = build_hunks(&script(&["a", "b", "c", "d"], &["b", "c", "e", "f", "g"]), 1);
        for h in &hunks {
            let old = h.lines.iter().filter(|l| l.operation != EditOperation::Added).count();
            let new = h.lines.iter().filter(|l| l.operation != EditOperation::Removed).count();
            assert_eq!(h.old_count, old);
            assert_eq!(h.new_count, new);
        }
    }
}
