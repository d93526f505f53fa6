use std::ffi::{CStr, CString};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStringExt;
use std::os::unix::fs::OpenOptionsExt;

use log::debug;
use nix::errno::Errno;
use nix::fcntl::{OFlag, open};
use nix::sys::stat::Mode;
use nix::unistd::{ForkResult, Pid, close, dup2, execv, fork};

use crate::ast::Command;
use crate::executor::builtins::BuiltinManager;
use crate::executor::path_resolver::PathResolver;
use crate::executor::{ExecError, ExecResult, ExecStatus, FAILURE_CODE};
use crate::glob;

/// Permission bits for files created by output redirection (rw-r-----).
const REDIRECT_MODE: u32 = 0o640;

/// One command of a pipeline together with the state that only exists
/// for a single execution of it.
pub struct Stage<'a> {
    pub command: &'a Command,
    pub pid: Option<Pid>,
    pub pipe_in: Option<OwnedFd>,
    pub pipe_out: Option<OwnedFd>,
    pub exit_code: i32,
}

impl<'a> Stage<'a> {
    pub fn new(command: &'a Command) -> Self {
        Stage {
            command,
            pid: None,
            pipe_in: None,
            pipe_out: None,
            exit_code: 0,
        }
    }

    /// Starts the stage: builtins run to completion right here, external
    /// commands are forked and counted in `status.wait_count`. The stage's
    /// pipe ends are closed on return either way.
    pub fn start(
        &mut self,
        builtins: &BuiltinManager,
        resolver: &PathResolver,
        status: &mut ExecStatus,
    ) -> ExecResult {
        let result = if self.command.is_builtin() {
            self.run_builtin(builtins, status)
        } else {
            self.spawn(resolver, status)
        };
        self.close_pipes();
        result
    }

    pub fn close_pipes(&mut self) {
        self.pipe_in = None;
        self.pipe_out = None;
    }

    fn run_builtin(&mut self, builtins: &BuiltinManager, status: &mut ExecStatus) -> ExecResult {
        let result = self.dispatch_builtin(builtins, status);
        self.exit_code = match &result {
            Ok(()) => status.code,
            Err(e) => e.code(),
        };
        result
    }

    // Builtins write wherever the stage's stdout points.
    fn dispatch_builtin(&mut self, builtins: &BuiltinManager, status: &mut ExecStatus) -> ExecResult {
        let cmd = self.command;
        match (&cmd.redirect_out, self.pipe_out.take()) {
            (Some(path), _) => {
                let mut file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .mode(REDIRECT_MODE)
                    .open(path)
                    .map_err(|source| ExecError::Io {
                        context: path.clone(),
                        source,
                    })?;
                builtins.execute(cmd.kind, &cmd.args, &mut file, status)
            }
            (None, Some(fd)) => {
                let mut pipe = File::from(fd);
                builtins.execute(cmd.kind, &cmd.args, &mut pipe, status)
            }
            (None, None) => builtins.execute(cmd.kind, &cmd.args, &mut io::stdout(), status),
        }
    }

    fn spawn(&mut self, resolver: &PathResolver, status: &mut ExecStatus) -> ExecResult {
        let path = resolver
            .resolve(&self.command.name)
            .ok_or_else(|| ExecError::CommandNotFound(self.command.name.clone()))?;
        let path = to_cstring(path.into_os_string().into_vec(), &self.command.name)?;
        let argv = refine_args(&self.command.args)?
            .into_iter()
            .map(|arg| to_cstring(arg.into_bytes(), &self.command.name))
            .collect::<Result<Vec<_>, _>>()?;

        // Anything still buffered would otherwise be written twice.
        let _ = io::stdout().flush();

        match unsafe { fork() } {
            Ok(ForkResult::Parent { child }) => {
                debug!("spawned {} as pid {}", self.command.name, child);
                self.pid = Some(child);
                status.wait_count += 1;
                Ok(())
            }
            Ok(ForkResult::Child) => self.exec_child(&path, &argv),
            Err(source) => Err(ExecError::Spawn {
                name: self.command.name.clone(),
                source,
            }),
        }
    }

    // Runs in the forked child only.
    fn exec_child(&self, path: &CStr, argv: &[CString]) -> ! {
        // The Rust runtime ignores SIGPIPE, and ignored signals survive exec.
        unsafe { libc::signal(libc::SIGPIPE, libc::SIG_DFL) };
        if let Err((subject, errno)) = self.wire_stdio() {
            eprintln!("mysh: {}: {}", subject, errno.desc());
            exit_child(errno);
        }
        let errno = match execv(path, argv) {
            Ok(never) => match never {},
            Err(errno) => errno,
        };
        eprintln!("mysh: {}: {}", self.command.name, errno.desc());
        exit_child(errno)
    }

    // Explicit redirections take precedence over pipe ends.
    fn wire_stdio(&self) -> Result<(), (&str, Errno)> {
        let cmd = self.command;
        match (&cmd.redirect_in, &self.pipe_in) {
            (Some(path), _) => redirect_file(path, OFlag::O_RDONLY, libc::STDIN_FILENO)
                .map_err(|e| (path.as_str(), e))?,
            (None, Some(fd)) => {
                dup2(fd.as_raw_fd(), libc::STDIN_FILENO).map_err(|e| (cmd.name.as_str(), e))?;
            }
            (None, None) => {}
        }
        match (&cmd.redirect_out, &self.pipe_out) {
            (Some(path), _) => redirect_file(
                path,
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
                libc::STDOUT_FILENO,
            )
            .map_err(|e| (path.as_str(), e))?,
            (None, Some(fd)) => {
                dup2(fd.as_raw_fd(), libc::STDOUT_FILENO).map_err(|e| (cmd.name.as_str(), e))?;
            }
            (None, None) => {}
        }
        Ok(())
    }
}

fn redirect_file(path: &str, flags: OFlag, target: RawFd) -> nix::Result<()> {
    let mode = Mode::from_bits_truncate(REDIRECT_MODE as libc::mode_t);
    let fd = open(path, flags | OFlag::O_CLOEXEC, mode)?;
    dup2(fd, target)?;
    close(fd)
}

fn exit_child(errno: Errno) -> ! {
    let code = match errno as i32 {
        0 => FAILURE_CODE,
        code => code,
    };
    unsafe { libc::_exit(code) }
}

/// Expands wildcard arguments. `args[0]` is passed through untouched and a
/// pattern without matches is kept as written.
pub fn refine_args(args: &[String]) -> Result<Vec<String>, ExecError> {
    let mut refined = Vec::with_capacity(args.len());
    let Some((arg0, rest)) = args.split_first() else {
        return Ok(refined);
    };
    refined.push(arg0.clone());
    for arg in rest {
        if !glob::has_wildcard(arg) || glob::expand(arg, &mut refined)? == 0 {
            refined.push(arg.clone());
        }
    }
    Ok(refined)
}

fn to_cstring(bytes: Vec<u8>, name: &str) -> Result<CString, ExecError> {
    CString::new(bytes).map_err(|_| ExecError::InvalidArgument(name.to_string()))
}
