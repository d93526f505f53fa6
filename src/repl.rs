use std::io::Write;

use log::{debug, info};

use crate::config::Config;
use crate::error::ShellError;
use crate::executor::{ExecStatus, Executor};
use crate::io::input::LineReader;
use crate::parser;
use crate::prompt::ShellPrompt;

/// How a run over one input source ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Input ran out; carries the last status code.
    Completed(i32),
    /// `exit` was executed.
    Exited(i32),
    /// A non-interactive run stopped at a failing line.
    Aborted(i32),
}

impl RunOutcome {
    pub fn code(self) -> i32 {
        match self {
            RunOutcome::Completed(code) | RunOutcome::Exited(code) | RunOutcome::Aborted(code) => {
                code
            }
        }
    }

    pub fn is_completed(self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

pub struct Repl<E: Executor> {
    executor: E,
    prompt: ShellPrompt,
    banner: String,
    echo_script: bool,
    echo_prefix: String,
}

impl<E: Executor> Repl<E> {
    pub fn new(executor: E, config: &Config) -> Self {
        Repl {
            executor,
            prompt: ShellPrompt::new(config),
            banner: config.banner.clone(),
            echo_script: config.echo_script,
            echo_prefix: config.prompt.clone(),
        }
    }

    /// Reads and executes lines until input ends or `exit` runs.
    ///
    /// Interactive sessions keep going after failures. Otherwise the first
    /// line that fails to parse or finishes with a nonzero code ends the run.
    pub fn run(
        &mut self,
        input: &mut LineReader,
        out: &mut dyn Write,
    ) -> Result<RunOutcome, ShellError> {
        let interactive = input.is_interactive();
        if interactive && !self.banner.is_empty() {
            writeln!(out, "{}", self.banner).map_err(ShellError::io("write"))?;
        }

        let mut last_ok = true;
        let mut last_code = 0;
        loop {
            if interactive {
                self.prompt
                    .show(out, last_ok)
                    .map_err(ShellError::io("write"))?;
            }

            let Some(line) = input.read_line().map_err(ShellError::io("read"))? else {
                if interactive {
                    writeln!(out).map_err(ShellError::io("write"))?;
                }
                break;
            };

            if line.trim().is_empty() {
                if !interactive {
                    writeln!(out).map_err(ShellError::io("write"))?;
                }
                continue;
            }
            if !interactive && self.echo_script {
                writeln!(out, "{}{}", self.echo_prefix, line).map_err(ShellError::io("write"))?;
            }

            let mut status = ExecStatus::default();
            match self.execute_line(&line, &mut status) {
                Ok(()) => {
                    last_code = status.code;
                    last_ok = status.code == 0;
                }
                Err(e) => {
                    eprintln!("mysh: {}", e);
                    last_code = e.code();
                    last_ok = false;
                }
            }

            if status.should_exit {
                info!("exit requested with code {}", last_code);
                return Ok(RunOutcome::Exited(last_code));
            }
            if !last_ok && !interactive {
                debug!("aborting script with code {}", last_code);
                return Ok(RunOutcome::Aborted(last_code));
            }
        }
        Ok(RunOutcome::Completed(last_code))
    }

    pub fn execute_line(&mut self, line: &str, status: &mut ExecStatus) -> Result<(), ShellError> {
        let tree = parser::parse_line(line)?;
        self.executor.exec(&tree, status)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CommandKind, CommandTree};
    use crate::executor::{ExecError, ExecResult};
    use std::io::Cursor;

    /// Records what it is asked to run; `fail` exits with 1, `missing` cannot
    /// be found and `exit` behaves like the builtin without arguments.
    #[derive(Default)]
    struct MockExecutor {
        seen: Vec<String>,
    }

    impl Executor for MockExecutor {
        fn exec(&mut self, node: &CommandTree, status: &mut ExecStatus) -> ExecResult {
            self.seen.push(node.to_string());
            let CommandTree::Pipeline(cmds) = node else {
                return Err(ExecError::InvalidArgument("mock".into()));
            };
            let cmd = &cmds[0];
            match (cmd.kind, cmd.name.as_str()) {
                (CommandKind::Exit, _) => {
                    status.code = 0;
                    status.should_exit = true;
                }
                (_, "fail") => status.code = 1,
                (_, "missing") => {
                    status.code = 127;
                    return Err(ExecError::CommandNotFound(cmd.name.clone()));
                }
                _ => status.code = 0,
            }
            Ok(())
        }
    }

    fn run(src: &str, interactive: bool) -> (RunOutcome, Vec<String>, String) {
        let mut repl = Repl::new(MockExecutor::default(), &Config::default());
        let mut input = LineReader::from_reader(Cursor::new(src.to_string()), interactive);
        let mut out = Vec::new();
        let outcome = repl.run(&mut input, &mut out).unwrap();
        (outcome, repl.executor.seen, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_script_echoes_lines() {
        let (outcome, seen, out) = run("ls\n\npwd\n", false);
        assert_eq!(outcome, RunOutcome::Completed(0));
        assert_eq!(seen, vec!["ls", "pwd"]);
        assert_eq!(out, "mysh> ls\n\nmysh> pwd\n");
    }

    #[test]
    fn test_script_aborts_on_failure() {
        let (outcome, seen, _) = run("ls\nfail\npwd\n", false);
        assert_eq!(outcome, RunOutcome::Aborted(1));
        assert_eq!(seen, vec!["ls", "fail"]);
    }

    #[test]
    fn test_script_aborts_on_syntax_error() {
        let (outcome, seen, out) = run("ls |\npwd\n", false);
        assert_eq!(outcome, RunOutcome::Aborted(2));
        assert!(seen.is_empty());
        assert_eq!(out, "mysh> ls |\n");
    }

    #[test]
    fn test_script_aborts_on_missing_command() {
        let (outcome, _, _) = run("missing\nls\n", false);
        assert_eq!(outcome, RunOutcome::Aborted(127));
    }

    #[test]
    fn test_interactive_continues_after_failure() {
        let (outcome, seen, out) = run("fail\nls\n", true);
        assert_eq!(outcome, RunOutcome::Completed(0));
        assert_eq!(seen, vec!["fail", "ls"]);
        assert_eq!(
            out,
            "Welcome to my shell!\nmysh> !mysh> mysh> \n"
        );
    }

    #[test]
    fn test_invalid_utf8_line_does_not_end_session() {
        let mut repl = Repl::new(MockExecutor::default(), &Config::default());
        let src = b"true \xff\ntrue\nexit 5\n".to_vec();
        let mut input = LineReader::from_reader(Cursor::new(src), true);
        let mut out = Vec::new();
        let outcome = repl.run(&mut input, &mut out).unwrap();
        assert!(matches!(outcome, RunOutcome::Exited(_)));
        assert_eq!(repl.executor.seen, vec!["true \u{FFFD}", "true", "exit 5"]);
    }

    #[test]
    fn test_exit_stops_reading() {
        let (outcome, seen, _) = run("exit\nls\n", true);
        assert_eq!(outcome, RunOutcome::Exited(0));
        assert_eq!(seen, vec!["exit"]);
    }

    #[test]
    fn test_outcome_code() {
        assert_eq!(RunOutcome::Aborted(3).code(), 3);
        assert!(RunOutcome::Completed(0).is_completed());
        assert!(!RunOutcome::Exited(0).is_completed());
    }
}
