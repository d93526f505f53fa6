pub mod default;

use log::debug;
use thiserror::Error;

use crate::ast::{CommandTree, RedirectKind};
use default::DefaultParser;

pub trait Parser {
    fn parse(&mut self) -> Result<CommandTree, ParseError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input is empty")]
    EmptyInput,
    #[error("unexpected {found} at position {pos}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        pos: usize,
    },
    #[error("illegal character '{found}' at position {pos}")]
    IllegalCharacter { found: String, pos: usize },
    #[error("excessive {kind}-redirection '{path}'")]
    DuplicateRedirect { kind: RedirectKind, path: String },
}

/// Parses one input line into a command tree.
pub fn parse_line(line: &str) -> Result<CommandTree, ParseError> {
    let tree = DefaultParser::new(line).parse()?;
    debug!("parsed: {}", tree);
    Ok(tree)
}
