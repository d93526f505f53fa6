use crate::ast::CommandTree;
use crate::executor::builtins::BuiltinManager;
use crate::executor::path_resolver::PathResolver;
use crate::executor::pipeline::PipelineHandler;
use crate::executor::{ExecResult, ExecStatus, Executor};

#[derive(Default)]
pub struct DefaultExecutor {
    builtins: BuiltinManager,
    resolver: PathResolver,
}

impl Executor for DefaultExecutor {
    fn exec(&mut self, node: &CommandTree, status: &mut ExecStatus) -> ExecResult {
        match node {
            CommandTree::Pipeline(commands) => {
                let handler = PipelineHandler::new(&self.builtins, &self.resolver);
                handler.run(commands, status).inspect_err(|e| {
                    status.code = e.code();
                })
            }
            CommandTree::And(lhs, rhs) => {
                self.exec(lhs, status)?;
                if status.should_exit || status.code != 0 {
                    return Ok(());
                }
                self.exec(rhs, status)
            }
            CommandTree::Or(lhs, rhs) => {
                self.exec(lhs, status)?;
                if status.should_exit || status.code == 0 {
                    return Ok(());
                }
                self.exec(rhs, status)
            }
        }
    }
}

impl DefaultExecutor {
    pub fn new(resolver: PathResolver) -> Self {
        DefaultExecutor {
            builtins: BuiltinManager::new(),
            resolver,
        }
    }
}
