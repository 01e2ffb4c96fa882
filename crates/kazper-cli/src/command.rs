//! 入力行 -> Command

use kazper_core::{GenderMode, Locale};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Keep,
    Reject,
    Undo,
    Restart,
    Locale(Locale),
    Gender(GenderMode),
    /// 1-based position in the rendered pick list.
    Move(usize),
    Reset,
    Export(ExportFormat),
    Retry,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs an argument: {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("`{command}` does not accept `{value}`: {expected}")]
    InvalidArgument {
        command: &'static str,
        value: String,
        expected: &'static str,
    },
}

pub const HELP: &str = "\
commands:
  k, keep              keep the current name
  r, reject            reject the current name
  u, undo              undo the last judgment
  restart              reshuffle the deck
  locale <kk|ru|en>    display language
  gender <male|female|both>
  move <n>             move pick #n to the other list
  reset                forget all picks and filters
  export <csv|json>    write the picks to a file
  retry                reload the names
  help, quit";

fn argument<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, ParseError> {
    words
        .next()
        .ok_or(ParseError::MissingArgument { command, expected })
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head.to_lowercase().as_str() {
        "k" | "keep" => Command::Keep,
        "r" | "reject" => Command::Reject,
        "u" | "undo" => Command::Undo,
        "restart" => Command::Restart,
        "reset" => Command::Reset,
        "retry" => Command::Retry,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "locale" => {
            const EXPECTED: &str = "kk, ru or en";
            let value = argument(&mut words, "locale", EXPECTED)?;
            let locale = Locale::parse(value).ok_or_else(|| ParseError::InvalidArgument {
                command: "locale",
                value: value.to_string(),
                expected: EXPECTED,
            })?;
            Command::Locale(locale)
        }
        "gender" => {
            const EXPECTED: &str = "male, female or both";
            let value = argument(&mut words, "gender", EXPECTED)?;
            let mode = GenderMode::parse(value).ok_or_else(|| ParseError::InvalidArgument {
                command: "gender",
                value: value.to_string(),
                expected: EXPECTED,
            })?;
            Command::Gender(mode)
        }
        "move" => {
            const EXPECTED: &str = "a pick number from the lists";
            let value = argument(&mut words, "move", EXPECTED)?;
            match value.parse::<usize>() {
                Ok(index) if index > 0 => Command::Move(index),
                _ => {
                    return Err(ParseError::InvalidArgument {
                        command: "move",
                        value: value.to_string(),
                        expected: EXPECTED,
                    });
                }
            }
        }
        "export" => {
            const EXPECTED: &str = "csv or json";
            let value = argument(&mut words, "export", EXPECTED)?;
            let format = match value {
                "csv" => ExportFormat::Csv,
                "json" => ExportFormat::Json,
                _ => {
                    return Err(ParseError::InvalidArgument {
                        command: "export",
                        value: value.to_string(),
                        expected: EXPECTED,
                    });
                }
            };
            Command::Export(format)
        }
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
