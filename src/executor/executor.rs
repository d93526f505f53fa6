use std::io;

use nix::errno::Errno;
use thiserror::Error;

use crate::ast::CommandTree;
use crate::glob::GlobError;

pub type ExecResult = Result<(), ExecError>;

/// Conventional status for a command that could not be found.
pub const NOT_FOUND_CODE: i32 = 127;
pub const FAILURE_CODE: i32 = 1;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("{0}: No such external command")]
    CommandNotFound(String),
    #[error("{name}: {msg}")]
    Builtin { name: &'static str, msg: String },
    #[error("cd: environment variable 'HOME' is not set")]
    HomeNotSet,
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("{0}: argument contains a NUL byte")]
    InvalidArgument(String),
    #[error("pipe: {0}")]
    Pipe(#[source] Errno),
    #[error("{name}: fork failed: {source}")]
    Spawn {
        name: String,
        #[source]
        source: Errno,
    },
    #[error("wait: {0}")]
    Wait(#[source] Errno),
    #[error(transparent)]
    Glob(#[from] GlobError),
}

impl ExecError {
    pub fn builtin(name: &'static str, msg: &str) -> Self {
        ExecError::Builtin {
            name,
            msg: msg.to_string(),
        }
    }

    /// Status code reported for a command that failed before (or instead
    /// of) running.
    pub fn code(&self) -> i32 {
        match self {
            ExecError::CommandNotFound(_) => NOT_FOUND_CODE,
            ExecError::Io { source, .. } => source.raw_os_error().unwrap_or(FAILURE_CODE),
            ExecError::Pipe(errno) | ExecError::Wait(errno) => *errno as i32,
            ExecError::Spawn { source, .. } => *source as i32,
            _ => FAILURE_CODE,
        }
    }
}

/// Outcome of one call into the executor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExecStatus {
    pub code: i32,
    pub should_exit: bool,
    pub wait_count: usize,
}

pub trait Executor {
    /// `Err` means the node could not be run at all; `status.code` then
    /// carries the failure code.
    fn exec(&mut self, node: &CommandTree, status: &mut ExecStatus) -> ExecResult;
}
