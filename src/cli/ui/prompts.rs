use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{self, ClearType},
    ExecutableCommand,
};

use crate::cli::ui::test_mode::{self, TextTestInput};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPromptResult {
    Value(String),
    Keep,
    Back,
    Help,
    Cancel,
}

impl From<TextTestInput> for TextPromptResult {
    fn from(input: TextTestInput) -> Self {
        match input {
            TextTestInput::Value(value) => TextPromptResult::Value(value),
            TextTestInput::Keep => TextPromptResult::Keep,
            TextTestInput::Back => TextPromptResult::Back,
            TextTestInput::Help => TextPromptResult::Help,
            TextTestInput::Cancel => TextPromptResult::Cancel,
        }
    }
}

/// Reads one answer for `label`.
///
/// Scripted inputs win over everything else; when stdin is not a terminal the
/// next stdin line is used so piped sessions can drive the form. An empty
/// answer keeps `default` when one exists.
pub fn text_input(label: &str, default: Option<&str>) -> io::Result<TextPromptResult> {
    if let Some(scripted) = test_mode::next_text_input(label) {
        return Ok(scripted.into());
    }
    if !io::stdin().is_terminal() {
        return read_piped_line(default);
    }

    let _raw = RawMode::enable()?;
    let mut stdout = io::stdout();
    let mut line = InputLine::default();
    line.draw(&mut stdout, default)?;
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match line.handle(key, default) {
            Some(result) => {
                write!(stdout, "\r\n")?;
                stdout.flush()?;
                return Ok(result);
            }
            None => line.draw(&mut stdout, default)?,
        }
    }
}

fn read_piped_line(default: Option<&str>) -> io::Result<TextPromptResult> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(TextPromptResult::Cancel);
    }
    Ok(interpret_buffer(line.trim_end_matches(['\r', '\n']), default))
}

/// Edit buffer of a raw-mode prompt.
#[derive(Default)]
struct InputLine {
    buffer: String,
}

impl InputLine {
    /// Applies one key press; returns the answer once the prompt is finished.
    fn handle(&mut self, key: KeyEvent, default: Option<&str>) -> Option<TextPromptResult> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(TextPromptResult::Cancel),
            KeyCode::Char('c' | 'C') if ctrl => Some(TextPromptResult::Cancel),
            KeyCode::Char('u' | 'U') if ctrl => {
                self.buffer.clear();
                None
            }
            KeyCode::Enter => Some(interpret_buffer(&self.buffer, default)),
            KeyCode::Backspace => {
                self.buffer.pop();
                None
            }
            KeyCode::Char(ch) if !ctrl => {
                self.buffer.push(ch);
                None
            }
            _ => None,
        }
    }

    fn draw(&self, stdout: &mut impl Write, default: Option<&str>) -> io::Result<()> {
        stdout.execute(cursor::MoveToColumn(0))?;
        stdout.execute(terminal::Clear(ClearType::CurrentLine))?;
        match default {
            Some(current) if self.buffer.is_empty() && !current.is_empty() => {
                write!(stdout, "[{}] > ", current)?
            }
            _ => write!(stdout, "> {}", self.buffer)?,
        }
        stdout.flush()
    }
}

pub(crate) fn interpret_buffer(buffer: &str, default: Option<&str>) -> TextPromptResult {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return if default.is_some() {
            TextPromptResult::Keep
        } else {
            TextPromptResult::Value(String::new())
        };
    }

    match trimmed.to_ascii_lowercase().as_str() {
        ":cancel" => TextPromptResult::Cancel,
        ":back" => TextPromptResult::Back,
        ":help" => TextPromptResult::Help,
        ":clear" => TextPromptResult::Value(String::new()),
        _ => TextPromptResult::Value(trimmed.to_string()),
    }
}

/// Raw terminal mode for the lifetime of the value.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(line: &mut InputLine, code: KeyCode, default: Option<&str>) -> Option<TextPromptResult> {
        line.handle(KeyEvent::new(code, KeyModifiers::NONE), default)
    }

    #[test]
    fn empty_answer_keeps_existing_value() {
        assert_eq!(interpret_buffer("  ", Some("Dublin")), TextPromptResult::Keep);
        assert_eq!(
            interpret_buffer("", None),
            TextPromptResult::Value(String::new())
        );
    }

    #[test]
    fn colon_commands_are_recognised() {
        assert_eq!(interpret_buffer(":BACK", None), TextPromptResult::Back);
        assert_eq!(interpret_buffer(":help", None), TextPromptResult::Help);
        assert_eq!(interpret_buffer(":cancel", Some("x")), TextPromptResult::Cancel);
        assert_eq!(
            interpret_buffer(":clear", Some("x")),
            TextPromptResult::Value(String::new())
        );
        assert_eq!(
            interpret_buffer("back street", None),
            TextPromptResult::Value("back street".into())
        );
    }

    #[test]
    fn key_presses_edit_the_buffer() {
        let mut line = InputLine::default();
        for ch in "Zagrebb".chars() {
            assert_eq!(press(&mut line, KeyCode::Char(ch), None), None);
        }
        assert_eq!(press(&mut line, KeyCode::Backspace, None), None);
        assert_eq!(
            press(&mut line, KeyCode::Enter, None),
            Some(TextPromptResult::Value("Zagreb".into()))
        );

        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(line.handle(ctrl_u, Some("Split")), None);
        assert_eq!(
            press(&mut line, KeyCode::Enter, Some("Split")),
            Some(TextPromptResult::Keep)
        );
    }

    #[test]
    fn escape_and_ctrl_c_cancel() {
        let mut line = InputLine::default();
        assert_eq!(
            press(&mut line, KeyCode::Esc, None),
            Some(TextPromptResult::Cancel)
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(line.handle(ctrl_c, None), Some(TextPromptResult::Cancel));
        assert!(line.buffer.is_empty());
    }
}
