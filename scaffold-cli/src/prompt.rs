//! Line-based terminal implementation of the conflict prompt protocol.

use std::io::{self, BufRead, Write};
use std::sync::{Mutex, PoisonError};

use colored::Colorize;

use scaffold_write::{Prompter, WriteError};

/// Lines per page in the scrollable view.
const PAGE_LINES: usize = 20;

/// Colour a unified diff for the terminal.
pub fn paint_diff(text: &str) -> String {
    let mut painted = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };
        let body = if body.starts_with("---") || body.starts_with("+++") {
            body.bold().to_string()
        } else if body.starts_with("@@") {
            body.cyan().to_string()
        } else if body.starts_with('+') {
            body.green().to_string()
        } else if body.starts_with('-') {
            body.red().to_string()
        } else {
            body.to_string()
        };
        painted.push_str(&body);
        painted.push_str(newline);
    }
    painted
}

struct Io {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
}

/// Reads answers from stdin and draws prompts on stdout.
///
/// End of input counts as an interrupt.
pub struct TerminalPrompter {
    io: Mutex<Io>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::with_io(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    pub fn with_io(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        TerminalPrompter {
            io: Mutex::new(Io { input, output }),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Io {
    /// One trimmed line of input, or `None` at end of input.
    fn read_answer(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn choose(&mut self, title: &str, choices: &[&str]) -> io::Result<Option<usize>> {
        writeln!(self.output, "{}", title.bold())?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(self.output, "  [{}] {choice}", i + 1)?;
        }
        loop {
            write!(self.output, "Select 1-{}: ", choices.len())?;
            let Some(answer) = self.read_answer()? else {
                writeln!(self.output)?;
                return Ok(None);
            };
            match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(
                    self.output,
                    "{}",
                    format!("enter a number from 1 to {}", choices.len()).yellow()
                )?,
            }
        }
    }

    fn page(&mut self, title: &str, text: &str) -> io::Result<bool> {
        writeln!(self.output, "{}", title.bold())?;
        let lines: Vec<&str> = text.lines().collect();
        let mut pages = lines.chunks(PAGE_LINES).peekable();
        while let Some(page) = pages.next() {
            for line in page {
                writeln!(self.output, "{}", paint_diff(line))?;
            }
            if pages.peek().is_none() {
                break;
            }
            write!(self.output, "{}", "-- more: enter to continue, q to close --".dimmed())?;
            match self.read_answer()? {
                None => {
                    writeln!(self.output)?;
                    return Ok(false);
                }
                Some(answer) if answer.eq_ignore_ascii_case("q") => break,
                Some(_) => {}
            }
        }
        Ok(true)
    }
}

impl Prompter for TerminalPrompter {
    fn present_choices(&self, title: &str, choices: &[&str]) -> Result<Option<usize>, WriteError> {
        let mut term = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        term.choose(title, choices).map_err(WriteError::Prompt)
    }

    fn present_scrollable_text(&self, title: &str, text: &str) -> Result<bool, WriteError> {
        let mut term = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        term.page(title, text).map_err(WriteError::Prompt)
    }

    fn present_inline_text(&self, text: &str) -> Result<(), WriteError> {
        let mut term = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        term.output
            .write_all(paint_diff(text).as_bytes())
            .and_then(|()| term.output.flush())
            .map_err(WriteError::Prompt)
    }
}
