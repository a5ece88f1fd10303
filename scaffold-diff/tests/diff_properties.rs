//! Behavioural properties of the public diff API.

use rstest::rstest;
use scaffold_diff::{
    compute_diff, Comparison, DiffEngine, DiffOptions, EditOperation, BINARY_MARKER,
    EQUIVALENT_TEXT_MARKER, MAX_DIFF_LINES, MAX_EDIT_DISTANCE,
};

fn changed_hunks(old: &str, new: &str, options: &DiffOptions) -> Vec<scaffold_diff::Hunk> {
    match DiffEngine::new().compare(old.as_bytes(), new.as_bytes(), options) {
        Comparison::Changed(hunks) => hunks,
        other => panic!("expected changes, got {other:?}"),
    }
}

/// Maximal runs of consecutive changed lines in the edit script.
fn changed_regions(old: &str, new: &str) -> usize {
    let old: Vec<&str> = old.lines().collect();
    let new: Vec<&str> = new.lines().collect();
    let script = DiffEngine::new().edit_script(&old, &new).unwrap();
    let mut regions = 0;
    let mut in_region = false;
    for line in &script {
        if line.is_change() && !in_region {
            regions += 1;
        }
        in_region = line.is_change();
    }
    regions
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[rstest]
#[case("")]
#[case("a\nb\nc\n")]
#[case("no trailing newline")]
#[case("\t\tindented\n\n\n")]
#[case("bin\0ary")]
fn diff_of_input_with_itself_is_empty(#[case] text: &str) {
    assert_eq!(compute_diff(text.as_bytes(), text.as_bytes(), &DiffOptions::default()), "");
}

#[test]
fn scenario_a_identical_files() {
    assert_eq!(compute_diff(b"a\nb\nc\n", b"a\nb\nc\n", &DiffOptions::default()), "");
}

// ---------------------------------------------------------------------------
// Scenario B
// ---------------------------------------------------------------------------

#[test]
fn scenario_b_single_line_change() {
    let text = compute_diff(b"a\nb\nc\n", b"a\nx\nc\n", &DiffOptions::default());
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines.contains(&"-b"), "got: {text}");
    assert!(lines.contains(&"+x"), "got: {text}");
    assert_eq!(lines.iter().filter(|l| l.starts_with("@@")).count(), 1);

    let hunks = changed_hunks("a\nb\nc\n", "a\nx\nc\n", &DiffOptions::default());
    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].old_count, 3);
    assert_eq!(hunks[0].new_count, 3);
}

// ---------------------------------------------------------------------------
// Symmetry
// ---------------------------------------------------------------------------

#[rstest]
#[case("a\nb\nc\n", "a\nx\nc\n", 3)]
#[case("one\ntwo\nthree\nfour\n", "one\nthree\nfour\nfive\n", 3)]
#[case("", "new file\ncontent\n", 3)]
#[case::two_minimal_scripts("x\na\nx\n", "a\nx\na\n", 0)]
#[case::reversed("p\nq\nr\ns\n", "s\nr\nq\np\n", 0)]
#[case::final_newline("a\nb", "a\nb\n", 0)]
fn swapping_inputs_mirrors_the_hunks(
    #[case] old: &str,
    #[case] new: &str,
    #[case] context_lines: usize,
) {
    let options = DiffOptions {
        context_lines,
        ..DiffOptions::default()
    };
    let forward = changed_hunks(old, new, &options);
    let backward = changed_hunks(new, old, &options);
    assert_eq!(forward.len(), backward.len());

    for (f, b) in forward.iter().zip(&backward) {
        assert_eq!((f.old_start, f.old_count), (b.new_start, b.new_count));
        assert_eq!((f.new_start, f.new_count), (b.old_start, b.old_count));

        let mut f_added: Vec<(Option<usize>, &str)> = f
            .lines
            .iter()
            .filter(|l| l.operation == EditOperation::Added)
            .map(|l| (l.new_line_number, l.content.as_str()))
            .collect();
        let mut b_removed: Vec<(Option<usize>, &str)> = b
            .lines
            .iter()
            .filter(|l| l.operation == EditOperation::Removed)
            .map(|l| (l.old_line_number, l.content.as_str()))
            .collect();
        f_added.sort();
        b_removed.sort();
        assert_eq!(f_added, b_removed);
    }
}

// ---------------------------------------------------------------------------
// Hunk count bound
// ---------------------------------------------------------------------------

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
#[case(10)]
fn hunks_never_exceed_changed_regions(#[case] context_lines: usize) {
    let old: String = (1..=40).map(|i| format!("line {i}\n")).collect();
    let new: String = (1..=40)
        .map(|i| match i {
            5 | 6 => format!("edited {i}\n"),
            20 => String::new(),
            33 => format!("line {i}\ninserted\n"),
            _ => format!("line {i}\n"),
        })
        .collect();

    let options = DiffOptions {
        context_lines,
        ..DiffOptions::default()
    };
    let hunks = changed_hunks(&old, &new, &options);
    assert!(hunks.len() <= changed_regions(&old, &new));
    assert!(!hunks.is_empty());

    for pair in hunks.windows(2) {
        let end = pair[0].old_start + pair[0].old_count;
        assert!(end <= pair[1].old_start, "hunks overlap: {pair:?}");
    }
}

// ---------------------------------------------------------------------------
// Short circuits
// ---------------------------------------------------------------------------

#[rstest]
#[case(b"text\0with nul".as_slice(), b"other text".as_slice())]
#[case(b"plain".as_slice(), b"\0\0\0".as_slice())]
#[case(b"\0".as_slice(), b"".as_slice())]
fn any_nul_in_prefix_yields_binary_marker(#[case] old: &[u8], #[case] new: &[u8]) {
    assert_eq!(compute_diff(old, new, &DiffOptions::default()), BINARY_MARKER);
    assert_eq!(BINARY_MARKER, "Binary files differ\n");
}

#[test]
fn oversized_input_yields_too_large_message() {
    let big = "line\n".repeat(MAX_DIFF_LINES + 5);
    let text = compute_diff(big.as_bytes(), b"small\n", &DiffOptions::default());
    assert!(text.contains("too large"), "got: {text}");
    assert!(text.contains(&(MAX_DIFF_LINES + 5).to_string()), "got: {text}");
    assert!(text.contains(" 1 "), "got: {text}");
}

#[test]
fn completely_different_inputs_at_the_line_limit_stay_bounded() {
    let old: String = (0..MAX_DIFF_LINES).map(|i| format!("old {i}\n")).collect();
    let new: String = (0..MAX_DIFF_LINES).map(|i| format!("new {i}\n")).collect();

    let cmp = DiffEngine::new().compare(old.as_bytes(), new.as_bytes(), &DiffOptions::default());
    assert_eq!(
        cmp,
        Comparison::TooManyChanges {
            old_lines: MAX_DIFF_LINES,
            new_lines: MAX_DIFF_LINES
        }
    );

    let text = compute_diff(old.as_bytes(), new.as_bytes(), &DiffOptions::default());
    assert!(text.contains("too large"), "got: {text}");
    assert!(text.contains(&MAX_EDIT_DISTANCE.to_string()), "got: {text}");
}

#[test]
fn many_changes_within_the_edit_limit_are_still_diffed() {
    let old: String = (0..MAX_DIFF_LINES).map(|i| format!("line {i}\n")).collect();
    let new: String = (0..MAX_DIFF_LINES)
        .map(|i| {
            if i % 20 == 0 {
                format!("edited {i}\n")
            } else {
                format!("line {i}\n")
            }
        })
        .collect();
    let hunks = changed_hunks(&old, &new, &DiffOptions::default());
    assert_eq!(hunks.len(), MAX_DIFF_LINES / 20);
}

// ---------------------------------------------------------------------------
// Line endings
// ---------------------------------------------------------------------------

#[test]
fn missing_final_newline_is_a_visible_change() {
    let text = compute_diff(b"a\nb", b"a\nb\n", &DiffOptions::default());
    assert!(!text.is_empty());
    assert!(text.contains("-b\n\\ No newline at end of file\n+b\n"), "got: {text}");
}

#[rstest]
#[case(b"a\r\nb\r\n".as_slice(), b"a\nb\n".as_slice())]
#[case(b"a\nb\n".as_slice(), b"a\r\nb\r\n".as_slice())]
#[case(b"a\r\nb".as_slice(), b"a\nb".as_slice())]
fn line_ending_only_differences_are_reported(#[case] old: &[u8], #[case] new: &[u8]) {
    assert_eq!(compute_diff(old, new, &DiffOptions::default()), EQUIVALENT_TEXT_MARKER);
}

#[test]
fn labels_appear_in_file_headers() {
    let text = DiffEngine::new().compute_labeled(
        "a/src/user.rs",
        b"x\n",
        "b/src/user.rs",
        b"y\n",
        &DiffOptions::default(),
    );
    assert!(text.starts_with("--- a/src/user.rs\n+++ b/src/user.rs\n"), "got: {text}");
}

#[test]
fn engine_reuse_does_not_leak_state_between_calls() {
    let mut engine = DiffEngine::new();
    let options = DiffOptions::default();
    let inputs: [(&str, &str); 4] = [
        ("a\nb\nc\nd\ne\n", "e\nd\nc\nb\na\n"),
        ("a\nb\nc\n", "a\nx\nc\n"),
        ("", "fresh\n"),
        ("1\n2\n3\n4\n5\n6\n7\n8\n9\n", "1\n2\n3\n4\nfive\n6\n7\n8\n9\n"),
    ];
    for (old, new) in inputs {
        let reused = engine.compute(old.as_bytes(), new.as_bytes(), &options);
        let fresh = compute_diff(old.as_bytes(), new.as_bytes(), &options);
        assert_eq!(reused, fresh, "reused engine diverged for {old:?} -> {new:?}");
    }
}
