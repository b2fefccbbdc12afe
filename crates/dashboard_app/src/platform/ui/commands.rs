use std::path::PathBuf;

use thiserror::Error;

pub const HELP_TEXT: &str = "\
Commands:
  select <path>   choose the CSV file to analyse
  upload          send the selected file for processing
  reset           clear the selection and the last result
  status          show the current state and dashboard embed
  help            show this text
  quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Select(PathBuf),
    Upload,
    Reset,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("usage: select <path>")]
    MissingPath,
}

/// Parses one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "select" | "open" => {
            if rest.is_empty() {
                return Err(CommandError::MissingPath);
            }
            ConsoleCommand::Select(PathBuf::from(strip_quotes(rest)))
        }
        "upload" | "submit" => ConsoleCommand::Upload,
        "reset" | "clear" => ConsoleCommand::Reset,
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(command))
}

fn strip_quotes(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_keeps_spaces_in_path() {
        assert_eq!(
            parse_command("select  data/q1 sales.csv "),
            Ok(Some(ConsoleCommand::Select(PathBuf::from("data/q1 sales.csv"))))
        );
        assert_eq!(
            parse_command("open \"my file.csv\""),
            Ok(Some(ConsoleCommand::Select(PathBuf::from("my file.csv"))))
        );
    }

    #[test]
    fn select_requires_a_path() {
        assert_eq!(parse_command("select"), Err(CommandError::MissingPath));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse_command("UPLOAD"), Ok(Some(ConsoleCommand::Upload)));
        assert_eq!(parse_command("Quit"), Ok(Some(ConsoleCommand::Quit)));
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("refresh now"),
            Err(CommandError::Unknown("refresh".to_string()))
        );
    }
}
