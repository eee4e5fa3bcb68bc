//! Terminal prompt abstraction
//!
//! `DialoguerPrompter` is the real implementation; `ScriptedPrompter`
//! replays a fixed answer sequence for tests, the same seam pattern as
//! `MockFileSystem`.

use anyhow::{anyhow, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Blocking, one-question-at-a-time terminal interaction
pub trait Prompter {
    /// Free-text input; an empty submission returns the default when given
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Single choice out of `items`, returns the chosen index
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;

    /// Checkbox selection, returns the chosen indices
    fn multi_select(&self, prompt: &str, items: &[&str], defaults: &[bool]) -> Result<Vec<usize>>;
}

pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(prompt);
        if let Some(value) = default {
            input = input.default(value.to_string());
        } else {
            input = input.allow_empty(true);
        }
        Ok(input.interact_text()?)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?)
    }

    fn multi_select(&self, prompt: &str, items: &[&str], defaults: &[bool]) -> Result<Vec<usize>> {
        Ok(MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .defaults(defaults)
            .interact()?)
    }
}

/// A scripted answer for [`ScriptedPrompter`]
#[derive(Debug, Clone)]
pub enum Answer {
    /// Free-text reply; an empty string accepts the prompt's default
    Text(String),
    Flag(bool),
    Choice(usize),
    Choices(Vec<usize>),
}

impl Answer {
    pub fn text(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

/// Replays a queue of answers; any mismatch between the expected and the
/// actual prompt kind fails the test loudly
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Answer>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }

    fn next(&self, prompt: &str) -> Result<Answer> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted answer left for prompt: {}", prompt))
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        match self.next(prompt)? {
            Answer::Text(value) if value.is_empty() => {
                Ok(default.unwrap_or_default().to_string())
            }
            Answer::Text(value) => Ok(value),
            other => Err(anyhow!("expected text for '{}', got {:?}", prompt, other)),
        }
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        match self.next(prompt)? {
            Answer::Flag(value) => Ok(value),
            other => Err(anyhow!("expected flag for '{}', got {:?}", prompt, other)),
        }
    }

    fn select(&self, prompt: &str, items: &[&str], _default: usize) -> Result<usize> {
        match self.next(prompt)? {
            Answer::Choice(index) if index < items.len() => Ok(index),
            Answer::Choice(index) => Err(anyhow!(
                "choice {} out of range for '{}' ({} items)",
                index,
                prompt,
                items.len()
            )),
            other => Err(anyhow!("expected choice for '{}', got {:?}", prompt, other)),
        }
    }

    fn multi_select(&self, prompt: &str, items: &[&str], _defaults: &[bool]) -> Result<Vec<usize>> {
        match self.next(prompt)? {
            Answer::Choices(indices) if indices.iter().all(|i| *i < items.len()) => Ok(indices),
            other => Err(anyhow!(
                "expected choices for '{}', got {:?}",
                prompt,
                other
            )),
        }
    }
}
