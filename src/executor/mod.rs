pub mod builtins;
pub mod command;
pub mod default_executor;
pub mod executor;
pub mod path_resolver;
pub mod pipeline;


pub use default_executor::DefaultExecutor;
pub use executor::{ExecError, ExecResult, ExecStatus, Executor, FAILURE_CODE, NOT_FOUND_CODE};
pub use path_resolver::PathResolver;
