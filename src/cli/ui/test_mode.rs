use once_cell::sync::Lazy;
use std::{
    collections::VecDeque,
    env,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Environment variable holding `|`-separated scripted answers for prompts.
pub const TEXT_INPUTS_ENV: &str = "DONATION_DESK_TEST_TEXT_INPUTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextTestInput {
    Value(String),
    Keep,
    Back,
    Help,
    Cancel,
}

struct TextQueue {
    enabled: bool,
    inputs: VecDeque<TextTestInput>,
}

impl TextQueue {
    fn from_env() -> Self {
        match env::var(TEXT_INPUTS_ENV) {
            Ok(raw) => Self {
                enabled: true,
                inputs: parse_text_sequences(&raw),
            },
            Err(_) => Self::new(),
        }
    }

    fn new() -> Self {
        Self {
            enabled: false,
            inputs: VecDeque::new(),
        }
    }
}

static TEXT_INPUTS: Lazy<Mutex<TextQueue>> = Lazy::new(|| Mutex::new(TextQueue::from_env()));

fn queue() -> MutexGuard<'static, TextQueue> {
    TEXT_INPUTS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Next scripted answer, or `None` when no script is installed. An exhausted
/// script cancels the prompt.
pub fn next_text_input(label: &str) -> Option<TextTestInput> {
    let mut guard = queue();
    if !guard.enabled {
        return None;
    }
    Some(guard.inputs.pop_front().unwrap_or_else(|| {
        tracing::warn!(prompt = label, "scripted text inputs exhausted");
        TextTestInput::Cancel
    }))
}

fn parse_text_input(token: &str) -> TextTestInput {
    match token.to_ascii_uppercase().as_str() {
        "<ESC>" | "<CANCEL>" => TextTestInput::Cancel,
        "<BACK>" => TextTestInput::Back,
        "<HELP>" => TextTestInput::Help,
        "<KEEP>" => TextTestInput::Keep,
        "<BLANK>" | "<EMPTY>" => TextTestInput::Value(String::new()),
        _ => TextTestInput::Value(token.to_string()),
    }
}

fn parse_text_sequences(raw: &str) -> VecDeque<TextTestInput> {
    raw.split('|')
        .filter_map(|segment| {
            let trimmed = segment.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(parse_text_input(trimmed))
            }
        })
        .collect()
}

pub fn install_text_inputs(inputs: Vec<TextTestInput>) {
    let mut guard = queue();
    guard.enabled = true;
    guard.inputs = inputs.into();
}

pub fn reset_text_inputs() {
    let mut guard = queue();
    guard.enabled = false;
    guard.inputs.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_markers_and_values() {
        let parsed = parse_text_sequences("Mary Byrne| <keep> |<BACK>||<blank>|<Esc>");
        assert_eq!(
            Vec::from(parsed),
            vec![
                TextTestInput::Value("Mary Byrne".into()),
                TextTestInput::Keep,
                TextTestInput::Back,
                TextTestInput::Value(String::new()),
                TextTestInput::Cancel,
            ]
        );
    }
}
