use finder_core::models::query::UnknownSearchType;
use finder_core::SearchType;
use thiserror::Error;

pub const USAGE: &str = "\
Usage:
  finder-cli [interactive]                 start the interactive prompt
  finder-cli search [--by <type>] <terms>  one-shot search (type: title, author, subject)
  finder-cli history                       list recent searches
  finder-cli replay <n>                    re-run recent search number n
  finder-cli clear-history                 forget all recent searches
  finder-cli help                          show this message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Interactive,
    Search { search_type: SearchType, text: String },
    History,
    /// Zero-based index into the history list.
    Replay(usize),
    ClearHistory,
    Help,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgsError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error(transparent)]
    InvalidType(#[from] UnknownSearchType),
    #[error("'{0}' is not a recent search number")]
    InvalidIndex(String),
}

/// Parses the arguments that follow the program name.
pub fn parse_args(args: &[String]) -> Result<Command, ArgsError> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Interactive);
    };

    match command.as_str() {
        "interactive" | "-i" => Ok(Command::Interactive),
        "search" => parse_search(rest),
        "history" => Ok(Command::History),
        "replay" => {
            let raw = rest.first().ok_or(ArgsError::MissingValue("replay"))?;
            let index =
                parse_position(raw).ok_or_else(|| ArgsError::InvalidIndex(raw.clone()))?;
            Ok(Command::Replay(index))
        }
        "clear-history" => Ok(Command::ClearHistory),
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(ArgsError::UnknownCommand(other.to_string())),
    }
}

fn parse_search(args: &[String]) -> Result<Command, ArgsError> {
    let mut search_type = SearchType::default();
    let mut terms = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--by" | "-b" => {
                let value = iter.next().ok_or(ArgsError::MissingValue("--by"))?;
                search_type = value.parse()?;
            }
            _ => terms.push(arg.as_str()),
        }
    }

    Ok(Command::Search {
        search_type,
        text: terms.join(" "),
    })
}

/// Turns a 1-based number as shown to the user into an index.
pub fn parse_position(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n >= 1).map(|n| n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_is_interactive() {
        assert_eq!(parse_args(&[]).unwrap(), Command::Interactive);
    }

    #[test]
    fn test_search_defaults_to_title() {
        assert_eq!(
            parse_args(&args(&["search", "the", "hobbit"])).unwrap(),
            Command::Search {
                search_type: SearchType::Title,
                text: "the hobbit".to_string()
            }
        );
    }

    #[test]
    fn test_search_by_type() {
        assert_eq!(
            parse_args(&args(&["search", "--by", "author", "Ursula", "K.", "Le", "Guin"])).unwrap(),
            Command::Search {
                search_type: SearchType::Author,
                text: "Ursula K. Le Guin".to_string()
            }
        );
        assert!(matches!(
            parse_args(&args(&["search", "-b", "isbn", "123"])),
            Err(ArgsError::InvalidType(_))
        ));
        assert_eq!(
            parse_args(&args(&["search", "--by"])),
            Err(ArgsError::MissingValue("--by"))
        );
    }

    #[test]
    fn test_search_without_terms_reaches_validation() {
        assert_eq!(
            parse_args(&args(&["search"])).unwrap(),
            Command::Search {
                search_type: SearchType::Title,
                text: String::new()
            }
        );
    }

    #[test]
    fn test_replay_is_one_based() {
        assert_eq!(parse_args(&args(&["replay", "1"])).unwrap(), Command::Replay(0));
        assert_eq!(
            parse_args(&args(&["replay", "0"])),
            Err(ArgsError::InvalidIndex("0".to_string()))
        );
        assert_eq!(parse_args(&args(&["replay"])), Err(ArgsError::MissingValue("replay")));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_args(&args(&["index"])),
            Err(ArgsError::UnknownCommand("index".to_string()))
        );
    }
}
