use std::collections::HashMap;
use std::env;
use std::io::Write;
use std::path::PathBuf;

use crate::ast::CommandKind;
use crate::executor::{ExecError, ExecResult, ExecStatus};

/// A command run inside the shell process. `out` is wherever the command's
/// standard output currently points (terminal, pipe or redirect file).
pub trait BuiltinCommand {
    fn name(&self) -> &'static str;
    fn run(&self, args: &[String], out: &mut dyn Write, status: &mut ExecStatus) -> ExecResult;
}

pub struct BuiltinManager {
    commands: HashMap<CommandKind, Box<dyn BuiltinCommand>>,
}

impl Default for BuiltinManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinManager {
    pub fn new() -> Self {
        let mut mgr = BuiltinManager {
            commands: HashMap::new(),
        };
        mgr.register(CommandKind::Cd, Box::new(CdCommand));
        mgr.register(CommandKind::Pwd, Box::new(PwdCommand));
        mgr.register(CommandKind::Exit, Box::new(ExitCommand));
        mgr
    }

    pub fn register(&mut self, kind: CommandKind, cmd: Box<dyn BuiltinCommand>) {
        self.commands.insert(kind, cmd);
    }

    pub fn execute(
        &self,
        kind: CommandKind,
        args: &[String],
        out: &mut dyn Write,
        status: &mut ExecStatus,
    ) -> ExecResult {
        match self.commands.get(&kind) {
            Some(cmd) => cmd.run(args, out, status),
            None => Err(ExecError::builtin("builtin", "unknown builtin command")),
        }
    }
}

pub struct CdCommand;

impl BuiltinCommand for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn run(&self, args: &[String], _out: &mut dyn Write, status: &mut ExecStatus) -> ExecResult {
        let target = match args {
            [] => env::var_os("HOME").map(PathBuf::from).ok_or(ExecError::HomeNotSet)?,
            [dir] => PathBuf::from(dir),
            _ => return Err(ExecError::builtin(self.name(), "too many arguments")),
        };
        env::set_current_dir(&target).map_err(|source| ExecError::Io {
            context: format!("cd: {}", target.display()),
            source,
        })?;
        status.code = 0;
        Ok(())
    }
}

pub struct PwdCommand;

impl BuiltinCommand for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn run(&self, args: &[String], out: &mut dyn Write, status: &mut ExecStatus) -> ExecResult {
        if !args.is_empty() {
            return Err(ExecError::builtin(self.name(), "too many arguments"));
        }
        let io_error = |source| ExecError::Io {
            context: "pwd".to_string(),
            source,
        };
        let cwd = env::current_dir().map_err(io_error)?;
        writeln!(out, "{}", cwd.display()).map_err(io_error)?;
        out.flush().map_err(io_error)?;
        status.code = 0;
        Ok(())
    }
}

pub struct ExitCommand;

impl BuiltinCommand for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn run(&self, args: &[String], _out: &mut dyn Write, status: &mut ExecStatus) -> ExecResult {
        let code = match args {
            [] => 0,
            [arg] => parse_exit_code(arg)
                .ok_or_else(|| ExecError::builtin(self.name(), "numeric argument required"))?,
            _ => return Err(ExecError::builtin(self.name(), "too many arguments")),
        };
        status.code = code;
        status.should_exit = true;
        Ok(())
    }
}

// Whole-string decimal parse; "12x" or " 12" are rejected.
fn parse_exit_code(arg: &str) -> Option<i32> {
    arg.parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(kind: CommandKind, args: &[&str]) -> (ExecResult, ExecStatus, String) {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut status = ExecStatus::default();
        let mut out = Vec::new();
        let result = BuiltinManager::new().execute(kind, &args, &mut out, &mut status);
        (result, status, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_exit_without_args() {
        let (result, status, _) = run(CommandKind::Exit, &[]);
        assert!(result.is_ok());
        assert!(status.should_exit);
        assert_eq!(status.code, 0);
    }

    #[test]
    fn test_exit_with_code() {
        let (result, status, _) = run(CommandKind::Exit, &["42"]);
        assert!(result.is_ok());
        assert!(status.should_exit);
        assert_eq!(status.code, 42);
    }

    #[test]
    fn test_exit_non_numeric() {
        let (result, status, _) = run(CommandKind::Exit, &["abc"]);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "exit: numeric argument required");
        assert!(!status.should_exit);
    }

    #[test]
    fn test_exit_trailing_junk() {
        let (result, status, _) = run(CommandKind::Exit, &["12x"]);
        assert!(result.is_err());
        assert!(!status.should_exit);
    }

    #[test]
    fn test_exit_too_many_arguments() {
        let (result, status, _) = run(CommandKind::Exit, &["1", "2"]);
        assert_eq!(result.unwrap_err().to_string(), "exit: too many arguments");
        assert!(!status.should_exit);
    }

    #[test]
    fn test_cd_too_many_arguments_keeps_cwd() {
        let before = env::current_dir().unwrap();
        let (result, _, _) = run(CommandKind::Cd, &["/", "/tmp"]);
        assert_eq!(result.unwrap_err().to_string(), "cd: too many arguments");
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_cd_missing_directory() {
        let (result, _, _) = run(CommandKind::Cd, &["/definitely/not/here"]);
        let err = result.unwrap_err();
        assert!(matches!(err, ExecError::Io { .. }));
        assert_eq!(err.code(), 2); // ENOENT
    }

    #[test]
    fn test_pwd_prints_cwd() {
        let (result, status, out) = run(CommandKind::Pwd, &[]);
        assert!(result.is_ok());
        assert_eq!(status.code, 0);
        assert_eq!(out, format!("{}\n", env::current_dir().unwrap().display()));
    }

    #[test]
    fn test_pwd_rejects_arguments() {
        let (result, _, out) = run(CommandKind::Pwd, &["-L"]);
        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_parse_exit_code() {
        assert_eq!(parse_exit_code("0"), Some(0));
        assert_eq!(parse_exit_code("-1"), Some(-1));
        assert_eq!(parse_exit_code("+7"), Some(7));
        assert_eq!(parse_exit_code(""), None);
        assert_eq!(parse_exit_code("1.5"), None);
    }
}
