//! Unified-diff text output.
//!
//! ```text
//! --- <old label>
//! +++ <new label>
//! @@ -old_start,old_count +new_start,new_count @@
//!  context
//! -removed
//! +added
//! \ No newline at end of file
//! ```

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::myers::{MAX_DIFF_LINES, MAX_EDIT_DISTANCE};
use crate::types::{Comparison, DiffLine, DiffOptions, Hunk};

/// Exact output for a comparison involving binary content.
pub const BINARY_MARKER: &str = "Binary files differ\n";

/// Exact output when the bytes differ but the decoded lines do not.
pub const EQUIVALENT_TEXT_MARKER: &str = "Files differ only in line endings or encoding\n";

/// Follows a line that ends its file without a newline.
const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file\n";

const ELLIPSIS: &str = "...";

/// Render a [`Comparison`]. Identical inputs render as the empty string.
pub fn render_comparison(
    comparison: &Comparison,
    old_label: &str,
    new_label: &str,
    options: &DiffOptions,
) -> String {
    match comparison {
        Comparison::Identical => String::new(),
        Comparison::EquivalentText => EQUIVALENT_TEXT_MARKER.to_owned(),
        Comparison::Binary => BINARY_MARKER.to_owned(),
        Comparison::TooLarge {
            old_lines,
            new_lines,
        } => format!(
            "Files too large to diff (old: {old_lines} lines, new: {new_lines} lines; limit {MAX_DIFF_LINES})\n"
        ),
        Comparison::TooManyChanges {
            old_lines,
            new_lines,
        } => format!(
            "Changes too large to diff (old: {old_lines} lines, new: {new_lines} lines; more than {MAX_EDIT_DISTANCE} edits)\n"
        ),
        Comparison::Changed(hunks) => render_hunks(hunks, old_label, new_label, options),
    }
}

/// Render hunks with `---`/`+++` file headers. No hunks renders as `""`.
pub fn render_hunks(
    hunks: &[Hunk],
    old_label: &str,
    new_label: &str,
    options: &DiffOptions,
) -> String {
    if hunks.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("--- {old_label}\n"));
    out.push_str(&format!("+++ {new_label}\n"));
    for hunk in hunks {
        out.push_str(&hunk.header());
        out.push('\n');
        for line in &hunk.lines {
            out.push_str(&render_line(line, options));
            out.push('\n');
            if line.missing_newline {
                out.push_str(NO_NEWLINE_MARKER);
            }
        }
    }
    out
}

fn render_line(line: &DiffLine, options: &DiffOptions) -> String {
    let mut prefix = String::new();
    prefix.push(line.operation.prefix());
    if options.show_line_numbers {
        prefix.push_str(&format!(
            "{:>5} {:>5} ",
            number_column(line.old_line_number),
            number_column(line.new_line_number)
        ));
    }

    let body = expand_tabs(&line.content, options.tab_width);
    match options.max_width {
        Some(width) => format!("{prefix}{}", truncate_body(&body, width.saturating_sub(prefix.width()))),
        None => format!("{prefix}{body}"),
    }
}

fn number_column(n: Option<usize>) -> String {
    n.map(|n| n.to_string()).unwrap_or_default()
}

/// Replace each tab with spaces up to the next multiple of `tab_width`.
pub fn expand_tabs(text: &str, tab_width: usize) -> String {
    if !text.contains('\t') {
        return text.to_owned();
    }
    let tab_width = tab_width.max(1);
    let mut out = String::with_capacity(text.len() + tab_width);
    let mut column = 0;
    for ch in text.chars() {
        if ch == '\t' {
            let pad = tab_width - column % tab_width;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(ch);
            column += ch.width().unwrap_or(0);
        }
    }
    out
}

/// Fit `body` into `width` display columns, ending in `...` when cut.
fn truncate_body(body: &str, width: usize) -> String {
    if body.width() <= width {
        return body.to_owned();
    }
    let budget = width.saturating_sub(ELLIPSIS.len());
    let mut out = String::new();
    let mut used = 0;
    for ch in body.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(ELLIPSIS);
    out
}
