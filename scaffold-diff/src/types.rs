//! Value types produced by the diff engine.

/// What happened to a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOperation {
    Unchanged,
    Added,
    Removed,
}

impl EditOperation {
    /// Prefix used for this operation in unified-diff output.
    pub fn prefix(self) -> char {
        match self {
            EditOperation::Unchanged => ' ',
            EditOperation::Added => '+',
            EditOperation::Removed => '-',
        }
    }

    /// The operation seen from the other side of the comparison.
    pub fn inverse(self) -> Self {
        match self {
            EditOperation::Unchanged => EditOperation::Unchanged,
            EditOperation::Added => EditOperation::Removed,
            EditOperation::Removed => EditOperation::Added,
        }
    }
}

/// A line as the engine compares it.
///
/// Two lines are the same when they are equal; [`ScriptLine::text`] is what
/// ends up in the script.
pub trait ScriptLine: PartialEq {
    fn text(&self) -> &str;

    /// True for a last line that has no trailing newline.
    fn missing_newline(&self) -> bool {
        false
    }
}

impl ScriptLine for &str {
    fn text(&self) -> &str {
        self
    }
}

/// One line of an edit script.
///
/// Line numbers are 1-based. `Added` lines have no old number, `Removed` lines
/// have no new number, `Unchanged` lines have both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub old_line_number: Option<usize>,
    pub new_line_number: Option<usize>,
    pub content: String,
    pub operation: EditOperation,
    /// The line ends its file without a newline. Rendered followed by
    /// `\ No newline at end of file`.
    pub missing_newline: bool,
}

impl DiffLine {
    pub(crate) fn unchanged(old: usize, new: usize, line: &impl ScriptLine) -> Self {
        DiffLine {
            old_line_number: Some(old),
            new_line_number: Some(new),
            content: line.text().to_owned(),
            operation: EditOperation::Unchanged,
            missing_newline: line.missing_newline(),
        }
    }

    pub(crate) fn added(new: usize, line: &impl ScriptLine) -> Self {
        DiffLine {
            old_line_number: None,
            new_line_number: Some(new),
            content: line.text().to_owned(),
            operation: EditOperation::Added,
            missing_newline: line.missing_newline(),
        }
    }

    pub(crate) fn removed(old: usize, line: &impl ScriptLine) -> Self {
        DiffLine {
            old_line_number: Some(old),
            new_line_number: None,
            content: line.text().to_owned(),
            operation: EditOperation::Removed,
            missing_newline: line.missing_newline(),
        }
    }

    /// The same line in the script of the swapped comparison.
    pub(crate) fn inverted(self) -> Self {
        DiffLine {
            old_line_number: self.new_line_number,
            new_line_number: self.old_line_number,
            operation: self.operation.inverse(),
            ..self
        }
    }

    pub fn is_change(&self) -> bool {
        self.operation != EditOperation::Unchanged
    }
}

/// A contiguous, context-bounded block of an edit script.
///
/// `old_count` counts `Unchanged` + `Removed` lines, `new_count` counts
/// `Unchanged` + `Added` lines. A zero count carries the number of the line
/// preceding the hunk as its start, as `diff -u` does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// `@@ -old_start,old_count +new_start,new_count @@`
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )
    }
}

/// Rendering and grouping knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    /// Unchanged lines kept around each change.
    pub context_lines: usize,
    /// Columns per tab stop when expanding tabs.
    pub tab_width: usize,
    /// Prefix body lines with old/new line-number columns.
    pub show_line_numbers: bool,
    /// Available render width in columns; longer lines end in `...`.
    /// `None` disables truncation.
    pub max_width: Option<usize>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            context_lines: 3,
            tab_width: 4,
            show_line_numbers: false,
            max_width: None,
        }
    }
}

/// Structured result of comparing two buffers, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Same bytes.
    Identical,
    /// Different bytes that decode to the same lines: CRLF against LF, or
    /// invalid UTF-8 that decodes to the same replacement characters.
    EquivalentText,
    /// At least one side holds a NUL byte near its start.
    Binary,
    /// At least one side is over the line limit; no script was computed.
    TooLarge { old_lines: usize, new_lines: usize },
    /// Both sides fit the line limit but the shortest script needs more than
    /// [`MAX_EDIT_DISTANCE`](crate::MAX_EDIT_DISTANCE) edits.
    TooManyChanges { old_lines: usize, new_lines: usize },
    /// The hunks that turn old into new.
    Changed(Vec<Hunk>),
}

impl Comparison {
    /// Lines the rendered body would contain, hunk headers included and the
    /// `---`/`+++` file headers excluded.
    pub fn body_line_count(&self) -> usize {
        match self {
            Comparison::Changed(hunks) => hunks
                .iter()
                .map(|h| 1 + h.lines.len() + h.lines.iter().filter(|l| l.missing_newline).count())
                .sum(),
            Comparison::Identical => 0,
            Comparison::EquivalentText
            | Comparison::Binary
            | Comparison::TooLarge { .. }
            | Comparison::TooManyChanges { .. } => 1,
        }
    }
}
