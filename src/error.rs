use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::executor::{ExecError, FAILURE_CODE};
use crate::parser::ParseError;

/// Exit status used when a script line does not parse.
pub const SYNTAX_ERROR_CODE: i32 = 2;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    pub fn io(context: &'static str) -> impl FnOnce(io::Error) -> ShellError {
        move |source| ShellError::Io { context, source }
    }

    pub fn code(&self) -> i32 {
        match self {
            ShellError::Parse(_) => SYNTAX_ERROR_CODE,
            ShellError::Exec(e) => e.code(),
            ShellError::Config(_) | ShellError::Io { .. } => FAILURE_CODE,
        }
    }
}
