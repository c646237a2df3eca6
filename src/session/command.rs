//! Console command grammar
//!
//! Positions are 1-based, as shown to the user.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Malformed console input; the message doubles as a retry prompt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Blank line
    #[error("no command entered; type 'help' for the list")]
    Empty,

    /// Keyword not recognised
    #[error("unknown command '{0}'; type 'help' for the list")]
    UnknownCommand(String),

    /// Argument is not a number of the right kind
    #[error("invalid value '{0}' entered, please try entering again")]
    InvalidValue(String),

    /// Wrong number of arguments
    #[error("expected {expected} values but got {got}, please try entering again")]
    ArgumentCount {
        /// Arguments the command takes
        expected: usize,
        /// Arguments supplied
        got: usize,
    },
}

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Build a tree with values `1..=L`
    Auto,

    /// Build from the given values, padded with zeros to `L`
    Init(Vec<i32>),

    /// Aggregate of positions `left..=right`
    Query {
        /// First position (1-based)
        left: usize,
        /// Last position (1-based)
        right: usize,
    },

    /// Overwrite one position
    Update {
        /// Position (1-based)
        position: usize,
        /// New value
        value: i32,
    },

    /// Switch between Addition and Product
    Flip,

    /// Write the tree to the store
    Save,

    /// Replace the tree with the stored one
    Load,

    /// Re-render the tree
    Show,

    /// List commands
    Help,

    /// Leave the session
    Quit,
}

impl Command {
    /// Parse a line such as `query 2 5`
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match keyword.to_ascii_lowercase().as_str() {
            "auto" | "a" => Command::Auto,
            "init" | "i" => Command::Init(
                args.iter()
                    .map(|arg| parse_arg::<i32>(arg))
                    .collect::<Result<_, _>>()?,
            ),
            "query" | "q" => {
                let [left, right] = exact_args(&args)?;
                Command::Query {
                    left: parse_arg(left)?,
                    right: parse_arg(right)?,
                }
            }
            "update" | "u" => {
                let [position, value] = exact_args(&args)?;
                Command::Update {
                    position: parse_arg(position)?,
                    value: parse_arg(value)?,
                }
            }
            "flip" | "f" => Command::Flip,
            "save" => Command::Save,
            "load" => Command::Load,
            "show" | "s" => Command::Show,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }

    /// Help text listing every command
    pub fn usage(leaf_count: usize) -> String {
        format!(
            "Commands:\n\
             \t auto              -> Initialize with values from 1 to {leaf_count}\n\
             \t init v1 v2 ...    -> Initialize with up to {leaf_count} values (rest are 0)\n\
             \t query l r         -> Sum/product of positions l..=r (1-based)\n\
             \t update pos value  -> Set position pos (1-based) to value\n\
             \t flip              -> Switch between Addition and Product\n\
             \t save              -> Save the current tree (overwrites the previous save)\n\
             \t load              -> Load the most recently saved tree\n\
             \t show              -> Render the current tree\n\
             \t quit              -> Quit"
        )
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

fn parse_arg<T: FromStr>(arg: &str) -> Result<T, CommandError> {
    arg.parse()
        .map_err(|_| CommandError::InvalidValue(arg.to_string()))
}

fn exact_args<'a, const N: usize>(args: &[&'a str]) -> Result<[&'a str; N], CommandError> {
    <[&'a str; N]>::try_from(args).map_err(|_| CommandError::ArgumentCount {
        expected: N,
        got: args.len(),
    })
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Auto => f.write_str("auto"),
            Command::Init(values) => {
                f.write_str("init")?;
                for value in values {
                    write!(f, " {}", value)?;
                }
                Ok(())
            }
            Command::Query { left, right } => write!(f, "query {} {}", left, right),
            Command::Update { position, value } => write!(f, "update {} {}", position, value),
            Command::Flip => f.write_str("flip"),
            Command::Save => f.write_str("save"),
            Command::Load => f.write_str("load"),
            Command::Show => f.write_str("show"),
            Command::Help => f.write_str("help"),
            Command::Quit => f.write_str("quit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("auto"), Ok(Command::Auto));
        assert_eq!(Command::parse("  QUERY 2 5 "), Ok(Command::Query { left: 2, right: 5 }));
        assert_eq!(
            Command::parse("update 1 -7"),
            Ok(Command::Update { position: 1, value: -7 })
        );
        assert_eq!(Command::parse("init 4 5 6"), Ok(Command::Init(vec![4, 5, 6])));
        assert_eq!(Command::parse("init"), Ok(Command::Init(Vec::new())));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("query 1"),
            Err(CommandError::ArgumentCount { expected: 2, got: 1 })
        );
        assert_eq!(
            Command::parse("init 1 x 3"),
            Err(CommandError::InvalidValue("x".to_string()))
        );
        assert_eq!(
            Command::parse("query -1 3"),
            Err(CommandError::InvalidValue("-1".to_string()))
        );
        assert_eq!(
            Command::parse("rotate"),
            Err(CommandError::UnknownCommand("rotate".to_string()))
        );
    }

    #[test]
    fn test_display_parses_back() {
        for command in [
            Command::Init(vec![1, -2]),
            Command::Query { left: 3, right: 9 },
            Command::Update { position: 4, value: 11 },
            Command::Flip,
        ] {
            assert_eq!(command.to_string().parse::<Command>(), Ok(command));
        }
    }
}
