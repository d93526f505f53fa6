use std::io::Write;
use std::process;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Installs the global logger on stderr. `RUST_LOG`, when set, takes
/// precedence over `level`. Calling it again is a no-op.
pub fn init_logger(level: LevelFilter) {
    let result = Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[PID:{}][{}] {}",
                process::id(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Stderr)
        .filter_level(level)
        .parse_default_env()
        .try_init();

    if result.is_ok() {
        log::debug!("log level set to {}", level);
    }
}
