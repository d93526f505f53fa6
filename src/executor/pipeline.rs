use log::{debug, warn};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::wait::{WaitStatus, wait};
use nix::unistd::pipe2;

use crate::ast::Command;
use crate::executor::builtins::BuiltinManager;
use crate::executor::command::Stage;
use crate::executor::path_resolver::PathResolver;
use crate::executor::{ExecError, ExecResult, ExecStatus};

/// Offset added to a signal number when a child is killed by it.
const SIGNAL_EXIT_BASE: i32 = 128;

pub struct PipelineHandler<'a> {
    builtins: &'a BuiltinManager,
    resolver: &'a PathResolver,
}

impl<'a> PipelineHandler<'a> {
    pub fn new(builtins: &'a BuiltinManager, resolver: &'a PathResolver) -> Self {
        PipelineHandler { builtins, resolver }
    }

    /// Runs every stage, waits for all spawned children and leaves the last
    /// stage's code in `status.code`.
    pub fn run(&self, commands: &[Command], status: &mut ExecStatus) -> ExecResult {
        status.wait_count = 0;
        let mut stages: Vec<Stage> = commands.iter().map(Stage::new).collect();

        let started = self.start_all(&mut stages, status);
        // Children that did start are reaped even when a later stage failed.
        let collected = collect(&mut stages, status);
        started?;
        collected?;

        if let Some(last) = stages.last() {
            status.code = last.exit_code;
        }
        Ok(())
    }

    fn start_all(&self, stages: &mut [Stage], status: &mut ExecStatus) -> ExecResult {
        let count = stages.len();
        let mut prev_read = None;
        for (i, stage) in stages.iter_mut().enumerate() {
            stage.pipe_in = prev_read.take();
            if i + 1 < count {
                let (read, write) = pipe2(OFlag::O_CLOEXEC).map_err(ExecError::Pipe)?;
                debug!("stage {} -> {}: pipe", i, i + 1);
                stage.pipe_out = Some(write);
                prev_read = Some(read);
            }
            stage.start(self.builtins, self.resolver, status)?;
        }
        Ok(())
    }
}

/// Waits for `status.wait_count` children and records each exit code on the
/// stage that owns the reported pid, in whatever order they terminate.
fn collect(stages: &mut [Stage], status: &mut ExecStatus) -> ExecResult {
    for _ in 0..status.wait_count {
        let (pid, code) = match wait_child() {
            Ok(WaitStatus::Exited(pid, code)) => (pid, code),
            Ok(WaitStatus::Signaled(pid, signal, _)) => (pid, SIGNAL_EXIT_BASE + signal as i32),
            Ok(other) => {
                warn!("unexpected wait status: {:?}", other);
                continue;
            }
            Err(Errno::ECHILD) => break,
            Err(errno) => return Err(ExecError::Wait(errno)),
        };
        match stages.iter_mut().find(|stage| stage.pid == Some(pid)) {
            Some(stage) => {
                debug!("pid {} ({}) exited with {}", pid, stage.command.name, code);
                stage.exit_code = code;
            }
            None => warn!("reaped unknown child {}", pid),
        }
    }
    Ok(())
}

fn wait_child() -> nix::Result<WaitStatus> {
    loop {
        match wait() {
            Err(Errno::EINTR) => continue,
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_without_children_is_noop() {
        let cmd = Command::new(crate::ast::CommandKind::External, "true");
        let mut stages = vec![Stage::new(&cmd)];
        let mut status = ExecStatus::default();
        assert!(collect(&mut stages, &mut status).is_ok());
        assert_eq!(stages[0].exit_code, 0);
    }
}
