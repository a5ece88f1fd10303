//! The prompt protocol a terminal UI implements, plus a scripted fake.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::error::WriteError;

/// Blocking user interaction used by the interactive conflict strategies.
///
/// Implementations block until the user answers; there is no timeout.
pub trait Prompter: Send + Sync {
    /// Show `choices` under `title` and return the selected index, or `None`
    /// when the user interrupted the prompt.
    fn present_choices(&self, title: &str, choices: &[&str]) -> Result<Option<usize>, WriteError>;

    /// Show `text` in a scrollable view. Returns `true` once the user
    /// dismissed it normally, `false` if the view was interrupted.
    fn present_scrollable_text(&self, title: &str, text: &str) -> Result<bool, WriteError>;

    /// Print `text` inline, without waiting for input.
    fn present_inline_text(&self, text: &str) -> Result<(), WriteError>;
}

/// Something a [`ScriptedPrompter`] was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Choices { title: String, choices: Vec<String> },
    Scrollable { title: String, text: String },
    Inline(String),
}

/// Deterministic [`Prompter`] returning canned selections in order.
///
/// When the script runs out, the prompt behaves as interrupted.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Option<usize>>>,
    shown: Mutex<Vec<Shown>>,
}

impl ScriptedPrompter {
    /// Answer successive choice prompts with `answers` (`None` = interrupt).
    pub fn new(answers: impl IntoIterator<Item = Option<usize>>) -> Self {
        ScriptedPrompter {
            answers: Mutex::new(answers.into_iter().collect()),
            shown: Mutex::new(Vec::new()),
        }
    }

    /// Answer successive choice prompts with these indices.
    pub fn choosing(indices: &[usize]) -> Self {
        Self::new(indices.iter().copied().map(Some))
    }

    /// Everything presented so far, in order.
    pub fn shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of choice prompts presented so far.
    pub fn prompts_presented(&self) -> usize {
        self.shown()
            .iter()
            .filter(|s| matches!(s, Shown::Choices { .. }))
            .count()
    }

    fn record(&self, shown: Shown) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(shown);
    }
}

impl Prompter for ScriptedPrompter {
    fn present_choices(&self, title: &str, choices: &[&str]) -> Result<Option<usize>, WriteError> {
        self.record(Shown::Choices {
            title: title.to_owned(),
            choices: choices.iter().map(|c| (*c).to_owned()).collect(),
        });
        let next = self
            .answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(next.flatten())
    }

    fn present_scrollable_text(&self, title: &str, text: &str) -> Result<bool, WriteError> {
        self.record(Shown::Scrollable {
            title: title.to_owned(),
            text: text.to_owned(),
        });
        Ok(true)
    }

    fn present_inline_text(&self, text: &str) -> Result<(), WriteError> {
        self.record(Shown::Inline(text.to_owned()));
        Ok(())
    }
}
