use std::io::BufRead;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    /// Enter keeps the current value and `-` clears it.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }

    pub fn apply_to(self, target: &mut String) {
        match self {
            PromptAction::Keep => {}
            PromptAction::Clear => target.clear(),
            PromptAction::Set(value) => *target = value,
        }
    }

    pub fn apply_to_option(self, target: &mut Option<String>) {
        match self {
            PromptAction::Keep => {}
            PromptAction::Clear => *target = None,
            PromptAction::Set(value) => *target = Some(value),
        }
    }
}

/// Reads one line without its line ending. `None` means end of input.
pub fn read_line<R: BufRead>(input: &mut R) -> AppResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}
