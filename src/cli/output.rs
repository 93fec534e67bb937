use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

use crate::core::notification::{Notification, Severity};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Prompt,
    Section,
}

impl MessageKind {
    fn icon(self) -> &'static str {
        match self {
            MessageKind::Info => "[i]",
            MessageKind::Success => "[+]",
            MessageKind::Warning => "[!]",
            MessageKind::Error => "[x]",
            MessageKind::Prompt => ">",
            MessageKind::Section => "",
        }
    }

    fn label(self) -> &'static str {
        match self {
            MessageKind::Info => "Info",
            MessageKind::Success => "Done",
            MessageKind::Warning => "Warning",
            MessageKind::Error => "Error",
            MessageKind::Prompt => "Input",
            MessageKind::Section => "",
        }
    }
}

impl From<Severity> for MessageKind {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Success => MessageKind::Success,
            Severity::Info => MessageKind::Info,
            Severity::Warning => MessageKind::Warning,
            Severity::Error => MessageKind::Error,
        }
    }
}

/// Screen-reader mode drops colors and box-drawing characters and spells out
/// message labels. Script mode turns it on.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    pub screen_reader_mode: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

fn preferences_lock() -> &'static RwLock<OutputPreferences> {
    PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()))
}

pub fn set_preferences(prefs: OutputPreferences) {
    if let Ok(mut guard) = preferences_lock().write() {
        *guard = prefs;
    }
}

pub fn current_preferences() -> OutputPreferences {
    preferences_lock()
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn render(kind: MessageKind, text: &str, prefs: &OutputPreferences) -> String {
    if kind == MessageKind::Section {
        let title = format!("=== {} ===", text.trim());
        return if prefs.screen_reader_mode {
            title
        } else {
            title.bold().to_string()
        };
    }
    if prefs.screen_reader_mode {
        return format!("{}: {}", kind.label(), text);
    }

    let line = format!("{} {}", kind.icon(), text);
    match kind {
        MessageKind::Success => line.bright_green().to_string(),
        MessageKind::Warning => line.bright_yellow().to_string(),
        MessageKind::Error => line.bright_red().to_string(),
        MessageKind::Prompt => line.bright_cyan().to_string(),
        MessageKind::Info | MessageKind::Section => line,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let rendered = render(kind, &message.to_string(), &current_preferences());
    if kind == MessageKind::Section {
        println!("\n{}", rendered);
    } else {
        println!("{}", rendered);
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn prompt(message: impl fmt::Display) {
    print(MessageKind::Prompt, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

pub fn notify(notification: &Notification) {
    print(notification.severity.into(), &notification.message);
}

/// Prints tables and detail blocks as they are.
pub fn plain(text: impl fmt::Display) {
    println!("{}", text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_reader_output_spells_out_labels() {
        let prefs = OutputPreferences {
            screen_reader_mode: true,
        };
        assert_eq!(
            render(MessageKind::Success, "Saved", &prefs),
            "Done: Saved"
        );
        assert_eq!(
            render(MessageKind::Section, " Donations ", &prefs),
            "=== Donations ==="
        );
    }

    #[test]
    fn notifications_map_to_message_kinds() {
        assert_eq!(MessageKind::from(Severity::Error), MessageKind::Error);
        assert_eq!(MessageKind::from(Severity::Success), MessageKind::Success);
    }
}
