//! Myers shortest-edit-script over line sequences.
//!
//! For every edit distance `d = 0, 1, …` the engine keeps, per diagonal
//! `k = x - y`, the furthest `x` reached (the frontier), snaking along equal
//! lines. A copy of the frontier is stored per `d` (the trace) so the path can
//! be walked back from `(n, m)` to `(0, 0)`. The trace grows with `d²`, so the
//! search gives up past [`MAX_EDIT_DISTANCE`].
//!
//! A [`DiffEngine`] keeps the frontier and trace buffers between calls and
//! clears them at the start of each one; stale diagonals from a previous
//! comparison would send the backtrack down the wrong path.

use std::cmp::Ordering;

use crate::hunk::build_hunks;
use crate::render::render_comparison;
use crate::types::{Comparison, DiffLine, DiffOptions, EditOperation, ScriptLine};

/// Bytes inspected for a NUL when deciding whether an input is binary.
pub const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Inputs with more lines than this are reported instead of diffed.
pub const MAX_DIFF_LINES: usize = 10_000;

/// Largest edit distance searched for. The trace then holds at most
/// `(MAX_EDIT_DISTANCE + 1)²` frontier cells, about 32 MiB.
pub const MAX_EDIT_DISTANCE: usize = 2_000;

/// Reusable diff engine. Holds only scratch allocations.
#[derive(Debug, Default)]
pub struct DiffEngine {
    frontier: Vec<isize>,
    trace: Vec<Vec<isize>>,
    spare: Vec<Vec<isize>>,
}

/// One decoded input line. CR before the newline is dropped; whether the
/// newline exists at all is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextLine<'a> {
    text: &'a str,
    terminated: bool,
}

impl ScriptLine for TextLine<'_> {
    fn text(&self) -> &str {
        self.text
    }

    fn missing_newline(&self) -> bool {
        !self.terminated
    }
}

fn split_lines(text: &str) -> Vec<TextLine<'_>> {
    text.split_inclusive('\n')
        .map(|raw| {
            let (body, terminated) = match raw.strip_suffix('\n') {
                Some(body) => (body, true),
                None => (raw, false),
            };
            TextLine {
                text: body.strip_suffix('\r').unwrap_or(body),
                terminated,
            }
        })
        .collect()
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff two buffers and render the result with `a` / `b` labels.
    pub fn compute(&mut self, old: &[u8], new: &[u8], options: &DiffOptions) -> String {
        self.compute_labeled("a", old, "b", new, options)
    }

    /// Diff two buffers and render the result with the given header labels.
    pub fn compute_labeled(
        &mut self,
        old_label: &str,
        old: &[u8],
        new_label: &str,
        new: &[u8],
        options: &DiffOptions,
    ) -> String {
        let comparison = self.compare(old, new, options);
        render_comparison(&comparison, old_label, new_label, options)
    }

    /// Classify and, when both sides are diffable text, compute the hunks.
    ///
    /// Checks run in this order: identical bytes, binary content, line limit,
    /// equivalent line sequences, edit limit.
    pub fn compare(&mut self, old: &[u8], new: &[u8], options: &DiffOptions) -> Comparison {
        if old == new {
            return Comparison::Identical;
        }
        if is_binary(old) || is_binary(new) {
            return Comparison::Binary;
        }

        let old_text = String::from_utf8_lossy(old);
        let new_text = String::from_utf8_lossy(new);
        let old_lines = split_lines(&old_text);
        let new_lines = split_lines(&new_text);

        if old_lines.len() > MAX_DIFF_LINES || new_lines.len() > MAX_DIFF_LINES {
            return Comparison::TooLarge {
                old_lines: old_lines.len(),
                new_lines: new_lines.len(),
            };
        }
        if old_lines == new_lines {
            return Comparison::EquivalentText;
        }

        match self.edit_script(&old_lines, &new_lines) {
            Some(script) => Comparison::Changed(build_hunks(&script, options.context_lines)),
            None => {
                tracing::debug!(
                    "giving up after {MAX_EDIT_DISTANCE} edits ({} vs {} lines)",
                    old_lines.len(),
                    new_lines.len()
                );
                Comparison::TooManyChanges {
                    old_lines: old_lines.len(),
                    new_lines: new_lines.len(),
                }
            }
        }
    }

    /// Shortest edit script turning `old` into `new`, in document order.
    ///
    /// The search always runs from the smaller input (by length, then
    /// content) to the larger one and the result is inverted when needed, so
    /// swapping the inputs mirrors the script even when several minimal
    /// scripts exist. Within a run of changes, removals come first.
    ///
    /// `None` when both sides are non-empty and the script needs more than
    /// [`MAX_EDIT_DISTANCE`] edits.
    pub fn edit_script<L: ScriptLine>(&mut self, old: &[L], new: &[L]) -> Option<Vec<DiffLine>> {
        let script: Vec<DiffLine> = if search_order(old, new) == Ordering::Greater {
            self.search(new, old)?
                .into_iter()
                .map(DiffLine::inverted)
                .collect()
        } else {
            self.search(old, new)?
        };
        Some(removals_first(script))
    }

    /// Edit distance found by the last search. Zero when the last call had an
    /// empty side, or gave up, since no trace is kept then.
    pub fn last_edit_distance(&self) -> usize {
        self.trace.len().saturating_sub(1)
    }

    fn search<L: ScriptLine>(&mut self, old: &[L], new: &[L]) -> Option<Vec<DiffLine>> {
        self.reset();

        if old.is_empty() {
            return Some(
                new.iter()
                    .enumerate()
                    .map(|(i, line)| DiffLine::added(i + 1, line))
                    .collect(),
            );
        }
        if new.is_empty() {
            return Some(
                old.iter()
                    .enumerate()
                    .map(|(i, line)| DiffLine::removed(i + 1, line))
                    .collect(),
            );
        }

        let n = old.len() as isize;
        let m = new.len() as isize;
        let max = n + m;
        let offset = max;
        let limit = max.min(MAX_EDIT_DISTANCE as isize);
        self.frontier.resize((2 * max + 2) as usize, 0);

        let mut reached = false;
        'search: for d in 0..=limit {
            self.snapshot((offset - d) as usize, (offset + d) as usize);

            let mut k = -d;
            while k <= d {
                let idx = (offset + k) as usize;
                let down = k == -d || (k != d && self.frontier[idx - 1] < self.frontier[idx + 1]);
                let mut x = if down {
                    self.frontier[idx + 1]
                } else {
                    self.frontier[idx - 1] + 1
                };
                let mut y = x - k;
                while x < n && y < m && old[x as usize] == new[y as usize] {
                    x += 1;
                    y += 1;
                }
                self.frontier[idx] = x;
                if x >= n && y >= m {
                    reached = true;
                    break 'search;
                }
                k += 2;
            }
        }

        if !reached {
            self.reset();
            return None;
        }
        Some(self.backtrack(old, new))
    }

    fn reset(&mut self) {
        self.frontier.clear();
        for mut snapshot in self.trace.drain(..) {
            snapshot.clear();
            self.spare.push(snapshot);
        }
    }

    /// Store the frontier window for diagonals `lo..=hi` as the next trace entry.
    fn snapshot(&mut self, lo: usize, hi: usize) {
        let mut snapshot = self.spare.pop().unwrap_or_default();
        snapshot.extend_from_slice(&self.frontier[lo..=hi]);
        self.trace.push(snapshot);
    }

    fn backtrack<L: ScriptLine>(&self, old: &[L], new: &[L]) -> Vec<DiffLine> {
        let mut x = old.len() as isize;
        let mut y = new.len() as isize;
        let mut script = Vec::with_capacity(old.len().max(new.len()));

        for (d, snapshot) in self.trace.iter().enumerate().rev() {
            let d = d as isize;
            if d == 0 {
                while x > 0 && y > 0 {
                    script.push(DiffLine::unchanged(x as usize, y as usize, &old[x as usize - 1]));
                    x -= 1;
                    y -= 1;
                }
                break;
            }

            // Snapshot `d` holds diagonals -d..=d, indexed from zero.
            let at = |k: isize| snapshot[(k + d) as usize];
            let k = x - y;
            let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
                k + 1
            } else {
                k - 1
            };
            let prev_x = at(prev_k);
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                script.push(DiffLine::unchanged(x as usize, y as usize, &old[x as usize - 1]));
                x -= 1;
                y -= 1;
            }
            if x == prev_x {
                script.push(DiffLine::added(y as usize, &new[y as usize - 1]));
                y -= 1;
            } else {
                script.push(DiffLine::removed(x as usize, &old[x as usize - 1]));
                x -= 1;
            }
        }

        script.reverse();
        script
    }
}

/// Orders inputs by line count, then by content.
fn search_order<L: ScriptLine>(old: &[L], new: &[L]) -> Ordering {
    old.len()
        .cmp(&new.len())
        .then_with(|| old.iter().map(line_key).cmp(new.iter().map(line_key)))
}

fn line_key<L: ScriptLine>(line: &L) -> (&str, bool) {
    (line.text(), line.missing_newline())
}

/// Within each run of consecutive changes, move removals ahead of additions.
fn removals_first(mut script: Vec<DiffLine>) -> Vec<DiffLine> {
    let mut start = 0;
    while start < script.len() {
        if !script[start].is_change() {
            start += 1;
            continue;
        }
        let end = script[start..]
            .iter()
            .position(|line| !line.is_change())
            .map_or(script.len(), |len| start + len);
        script[start..end].sort_by_key(|line| line.operation != EditOperation::Removed);
        start = end;
    }
    script
}

/// A buffer is binary when a NUL byte appears within its first 8 KiB.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(script: &[DiffLine]) -> String {
        script.iter().map(|l| l.operation.prefix()).collect()
    }

    #[test]
    fn single_substitution_is_one_removal_and_one_addition() {
        let mut engine = DiffEngine::new();
        let script = engine.edit_script(&["a", "b", "c"], &["a", "x", "c"]).unwrap();
        assert_eq!(ops(&script), " -+ ");
        assert_eq!(engine.last_edit_distance(), 2);

        let removed = &script[1];
        assert_eq!(removed.content, "b");
        assert_eq!(removed.old_line_number, Some(2));
        assert_eq!(removed.new_line_number, None);

        let added = &script[2];
        assert_eq!(added.content, "x");
        assert_eq!(added.old_line_number, None);
        assert_eq!(added.new_line_number, Some(2));
    }

    #[test]
    fn unchanged_lines_carry_both_numbers() {
        let mut engine = DiffEngine::new();
        let script = engine.edit_script(&["x", "a", "b"], &["a", "b"]).unwrap();
        assert_eq!(ops(&script), "-  ");
        assert_eq!(script[1].old_line_number, Some(2));
        assert_eq!(script[1].new_line_number, Some(1));
    }

    #[test]
    fn empty_old_side_is_all_additions() {
        let mut engine = DiffEngine::new();
        let script = engine.edit_script(&[], &["a", "b"]).unwrap();
        assert_eq!(ops(&script), "++");
        assert_eq!(script[1].new_line_number, Some(2));
    }

    #[test]
    fn empty_new_side_is_all_removals() {
        let mut engine = DiffEngine::new();
        let script = engine.edit_script(&["a", "b"], &[]).unwrap();
        assert_eq!(ops(&script), "--");
    }

    #[test]
    fn script_is_minimal_for_classic_example() {
        // Myers' paper example: ABCABBA -> CBABAC has edit distance 5.
        let a: Vec<&str> = "ABCABBA".split("").filter(|s| !s.is_empty()).collect();
        let b: Vec<&str> = "CBABAC".split("").filter(|s| !s.is_empty()).collect();
        let mut engine = DiffEngine::new();
        let script = engine.edit_script(&a, &b).unwrap();
        let edits = script.iter().filter(|l| l.is_change()).count();
        assert_eq!(edits, 5);
        assert_eq!(engine.last_edit_distance(), 5);
    }

    #[test]
    fn script_replays_to_both_inputs() {
        let a = ["fn main() {", "    let x = 1;", "    println!(x);", "}"];
        let b = ["fn main() {", "    let y = 2;", "    let x = 1;", "    dbg!(x);", "}", ""];
        let mut engine = DiffEngine::new();
        let script = engine.edit_script(&a, &b).unwrap();

        let old: Vec<&str> = script
            .iter()
            .filter(|l| l.operation != EditOperation::Added)
            .map(|l| l.content.as_str())
            .collect();
        let new: Vec<&str> = script
            .iter()
            .filter(|l| l.operation != EditOperation::Removed)
            .map(|l| l.content.as_str())
            .collect();
        assert_eq!(old, a);
        assert_eq!(new, b);
    }

    #[test]
    fn reused_engine_matches_fresh_engine() {
        let mut reused = DiffEngine::new();
        let big_a: Vec<String> = (0..200).map(|i| format!("line {i}")).collect();
        let big_b: Vec<String> = (0..200).map(|i| format!("line {}", i * 3)).collect();
        let big_a: Vec<&str> = big_a.iter().map(String::as_str).collect();
        let big_b: Vec<&str> = big_b.iter().map(String::as_str).collect();
        reused.edit_script(&big_a, &big_b).unwrap();

        let small_a = ["a", "b", "c", "d"];
        let small_b = ["a", "c", "d", "e"];
        let from_reused = reused.edit_script(&small_a, &small_b).unwrap();
        let from_fresh = DiffEngine::new().edit_script(&small_a, &small_b).unwrap();
        assert_eq!(from_reused, from_fresh);
    }

    #[test]
    fn binary_detection_only_looks_at_the_prefix() {
        assert!(is_binary(b"abc\0def"));
        assert!(!is_binary(b"plain text\n"));

        let mut late_nul = vec![b'a'; BINARY_SNIFF_LEN];
        late_nul.push(0);
        assert!(!is_binary(&late_nul));
    }

    #[test]
    fn crlf_only_differences_are_equivalent_text() {
        let mut engine = DiffEngine::new();
        let cmp = engine.compare(b"a\r\nb\r\n", b"a\nb\n", &DiffOptions::default());
        assert_eq!(cmp, Comparison::EquivalentText);
    }

    #[test]
    fn missing_final_newline_changes_the_last_line() {
        let mut engine = DiffEngine::new();
        let hunks = match engine.compare(b"a\nb", b"a\nb\n", &DiffOptions::default()) {
            Comparison::Changed(hunks) => hunks,
            other => panic!("expected changes, got {other:?}"),
        };
        assert_eq!(hunks.len(), 1);
        let changed: Vec<(char, &str, bool)> = hunks[0]
            .lines
            .iter()
            .filter(|l| l.is_change())
            .map(|l| (l.operation.prefix(), l.content.as_str(), l.missing_newline))
            .collect();
        assert_eq!(changed, [('-', "b", true), ('+', "b", false)]);
    }

    #[test]
    fn lines_split_keep_termination() {
        let lines = split_lines("a\r\nb\nc");
        assert_eq!(
            lines,
            [
                TextLine { text: "a", terminated: true },
                TextLine { text: "b", terminated: true },
                TextLine { text: "c", terminated: false },
            ]
        );
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn swapped_inputs_give_the_inverted_script() {
        let a = ["x", "a", "x"];
        let b = ["a", "x", "a"];
        let mut engine = DiffEngine::new();
        let forward = engine.edit_script(&a, &b).unwrap();
        let backward = engine.edit_script(&b, &a).unwrap();

        let mirrored: Vec<DiffLine> = backward.into_iter().map(DiffLine::inverted).collect();
        assert_eq!(removals_first(mirrored), forward);
    }

    #[test]
    fn change_runs_list_removals_first() {
        let mut engine = DiffEngine::new();
        let script = engine.edit_script(&["b", "c"], &["a"]).unwrap();
        assert_eq!(ops(&script), "--+");
    }

    #[test]
    fn search_stops_at_the_edit_limit() {
        let half = MAX_EDIT_DISTANCE / 2;
        let old: Vec<String> = (0..half).map(|i| format!("old {i}")).collect();
        let new: Vec<String> = (0..half).map(|i| format!("new {i}")).collect();
        let old: Vec<&str> = old.iter().map(String::as_str).collect();
        let mut new: Vec<&str> = new.iter().map(String::as_str).collect();

        let mut engine = DiffEngine::new();
        assert!(engine.edit_script(&old, &new).is_some());
        assert_eq!(engine.last_edit_distance(), MAX_EDIT_DISTANCE);

        new.push("one more");
        assert!(engine.edit_script(&old, &new).is_none());
        assert_eq!(engine.last_edit_distance(), 0);
    }

    #[test]
    fn empty_side_is_not_bounded_by_the_edit_limit() {
        let lines = vec!["x"; MAX_EDIT_DISTANCE + 1];
        let script = DiffEngine::new().edit_script(&[], &lines).unwrap();
        assert_eq!(script.len(), MAX_EDIT_DISTANCE + 1);
    }

    #[test]
    fn oversized_input_is_not_diffed() {
        let big = "x\n".repeat(MAX_DIFF_LINES + 1);
        let mut engine = DiffEngine::new();
        let cmp = engine.compare(big.as_bytes(), b"x\n", &DiffOptions::default());
        assert_eq!(
            cmp,
            Comparison::TooLarge {
                old_lines: MAX_DIFF_LINES + 1,
                new_lines: 1
            }
        );
    }
}
