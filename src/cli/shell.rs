use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::context::{CliMode, LoopControl, ShellContext};
use crate::cli::errors::{CliError, CommandError};
use crate::cli::output::{info as output_info, set_preferences, OutputPreferences};

/// Set to run the shell non-interactively over stdin lines.
pub const SCRIPT_ENV: &str = "DONATION_DESK_CLI_SCRIPT";

/// Second-word completions for commands that take an action.
const ACTIONS: &[(&str, &[&str])] = &[
    ("donate", &["tickets", "team"]),
    (
        "donations",
        &["list", "show", "status", "delete", "export", "stats"],
    ),
    ("links", &["list", "add", "edit", "toggle", "delete"]),
    (
        "settings",
        &["show", "set", "upload-logo", "upload-banner", "remove-banner"],
    ),
    ("config", &["show", "set"]),
];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    let mut source = match mode {
        CliMode::Interactive => {
            let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
            editor.set_helper(Some(CommandHelper::new(context.command_names())));
            editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
            output_info("Type `help` to list commands, `donate` to start the form.");
            LineSource::Editor(Box::new(editor))
        }
        CliMode::Script => {
            set_preferences(OutputPreferences {
                screen_reader_mode: true,
            });
            LineSource::Script
        }
    };

    while context.running {
        match source.next_line(&context.prompt())? {
            Line::Command(line) => match handle_line(&mut context, line.trim()) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => context.report_error(err)?,
            },
            Line::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Line::Closed => {
                if mode == CliMode::Interactive {
                    output_info("Exiting shell.");
                }
                break;
            }
        }
    }
    Ok(())
}

enum Line {
    Command(String),
    Interrupted,
    Closed,
}

/// Where commands come from. In script mode, prompts issued by a command read
/// the following stdin lines, so a script can answer the donation form inline.
enum LineSource {
    Editor(Box<Editor<CommandHelper, DefaultHistory>>),
    Script,
}

impl LineSource {
    fn next_line(&mut self, prompt: &str) -> Result<Line, CliError> {
        match self {
            LineSource::Editor(editor) => match editor.readline(prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        editor.add_history_entry(trimmed).ok();
                    }
                    Ok(Line::Command(line))
                }
                Err(ReadlineError::Interrupted) => Ok(Line::Interrupted),
                Err(ReadlineError::Eof) => Ok(Line::Closed),
                Err(err) => Err(err.into()),
            },
            LineSource::Script => {
                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line)? == 0 {
                    Ok(Line::Closed)
                } else {
                    Ok(Line::Command(line))
                }
            }
        }
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    if line.is_empty() || line.starts_with('#') {
        return Ok(LoopControl::Continue);
    }
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err.to_string());
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    context.last_command = Some(line.to_string());
    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Completes command names, their actions, and command names after `help`.
struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    fn candidates(&self, before: &[&str], needle: &str) -> Vec<String> {
        let pool: Vec<&str> = match before {
            [] | ["help"] => self.commands.iter().map(String::as_str).collect(),
            [command] => ACTIONS
                .iter()
                .find(|(name, _)| command.eq_ignore_ascii_case(name))
                .map(|(_, actions)| actions.to_vec())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        pool.into_iter()
            .filter(|word| word.starts_with(needle))
            .map(str::to_string)
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let before: Vec<&str> = prefix[..start].split_whitespace().collect();
        let needle = prefix[start..].to_ascii_lowercase();
        let pairs = self
            .candidates(&before, &needle)
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}
