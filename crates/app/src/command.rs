use std::fmt;

use pathway_core::model::{ModuleId, ParseIdError, ProfileError, SessionState};
use services::Action;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Quit,
    Run(Action),
    /// Answer text as typed; `#n` may still stand for an option.
    Answer(String),
}

#[derive(Debug)]
pub enum CommandError {
    Unknown(String),
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    InvalidModuleId(ParseIdError),
    Profile(ProfileError),
    NoCurrentModule,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw} (try `help`)"),
            CommandError::MissingArgument { command, what } => {
                write!(f, "{command} requires {what}")
            }
            CommandError::InvalidModuleId(err) => write!(f, "{err}"),
            CommandError::Profile(err) => write!(f, "{err}"),
            CommandError::NoCurrentModule => {
                write!(f, "no module is selected; open a learning path first")
            }
        }
    }
}

impl std::error::Error for CommandError {}

pub const HELP: &str = "\
Commands:
  profile name <name>        set the learner name
  profile style <style>      visual | auditory | reading/writing | kinesthetic
  profile level <level>      beginner | intermediate | advanced | expert
  create <subject>           generate a learning path
  open <subject>             study an existing learning path
  module <id>                select a module of the current path
  complete [id]              mark a module (default: current) as complete
  ask <question>             ask about the current module
  quiz start [id]            practise a module (default: current)
  answer <text | #n>         answer the current question; #n picks option n
  quiz close                 dismiss finished quiz results
  show                       print the whole session
  help                       print this help
  quit                       leave";

/// Parse one input line. `Ok(None)` for a blank line.
///
/// `state` supplies the current module for commands where the id is optional.
pub fn parse(line: &str, state: &SessionState) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = split_word(line);

    let command = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "show" | "refresh" => Command::Show,
        "quit" | "exit" => Command::Quit,
        "profile" => Command::Run(parse_profile(rest)?),
        "create" => Command::Run(Action::CreatePath {
            subject: rest.to_string(),
        }),
        "open" => Command::Run(Action::OpenPath {
            subject: required(rest, "open", "a subject")?.to_string(),
        }),
        "module" => Command::Run(Action::SelectModule {
            module_id: module_id(required(rest, "module", "a module id")?)?,
        }),
        "complete" => Command::Run(Action::CompleteModule {
            module_id: module_or_current(rest, state)?,
        }),
        "ask" => Command::Run(Action::AskQuestion {
            question: rest.to_string(),
        }),
        "answer" => Command::Answer(rest.to_string()),
        "quiz" => match split_word(rest) {
            ("start", id) => Command::Run(Action::StartQuiz {
                module_id: module_or_current(id, state)?,
            }),
            ("close", _) => Command::Run(Action::CloseQuiz),
            _ => {
                return Err(CommandError::MissingArgument {
                    command: "quiz",
                    what: "`start` or `close`",
                });
            }
        },
        _ => return Err(CommandError::Unknown(line.to_string())),
    };
    Ok(Some(command))
}

/// Turn a typed answer into the text compared against the stored answer.
///
/// For a multiple-choice question, text equal to an option is that option and
/// `#n` with `n` in `1..=options` selects option `n`. Anything else is passed
/// through verbatim.
#[must_use]
pub fn resolve_answer(raw: &str, state: &SessionState) -> String {
    let options = state
        .quiz()
        .and_then(|quiz| quiz.current_question())
        .map(|question| question.options.as_slice())
        .unwrap_or_default();

    let typed = raw.trim();
    if let Some(option) = options.iter().find(|option| option.as_str() == typed) {
        return option.clone();
    }
    typed
        .strip_prefix('#')
        .and_then(|n| n.trim().parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| options.get(index))
        .map_or_else(|| raw.to_string(), Clone::clone)
}

fn parse_profile(rest: &str) -> Result<Action, CommandError> {
    let (field, value) = split_word(rest);
    let missing = || CommandError::MissingArgument {
        command: "profile",
        what: "`name`, `style` or `level` and a value",
    };
    if value.is_empty() {
        return Err(missing());
    }

    let (name, learning_style, knowledge_level) = match field.to_ascii_lowercase().as_str() {
        "name" => (Some(value.to_string()), None, None),
        "style" => (None, Some(value.parse().map_err(CommandError::Profile)?), None),
        "level" => (None, None, Some(value.parse().map_err(CommandError::Profile)?)),
        _ => return Err(missing()),
    };
    Ok(Action::UpdateProfile {
        name,
        learning_style,
        knowledge_level,
    })
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn required<'a>(
    value: &'a str,
    command: &'static str,
    what: &'static str,
) -> Result<&'a str, CommandError> {
    if value.is_empty() {
        Err(CommandError::MissingArgument { command, what })
    } else {
        Ok(value)
    }
}

fn module_id(raw: &str) -> Result<ModuleId, CommandError> {
    raw.parse().map_err(CommandError::InvalidModuleId)
}

fn module_or_current(raw: &str, state: &SessionState) -> Result<ModuleId, CommandError> {
    if raw.is_empty() {
        state.current_module().ok_or(CommandError::NoCurrentModule)
    } else {
        module_id(raw)
    }
}
