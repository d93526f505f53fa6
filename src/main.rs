use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use log::LevelFilter;

use mysh::config::ConfigLoader;
use mysh::error::ShellError;
use mysh::executor::{DefaultExecutor, FAILURE_CODE, PathResolver};
use mysh::io::input::LineReader;
use mysh::logger::init_logger;
use mysh::repl::{Repl, RunOutcome};

#[derive(FromArgs)]
/// A small Unix shell with pipelines, redirections, && / || and `*` globbing.
struct Args {
    /// config file to use instead of $MYSH_CONFIG or ~/.myshrc
    #[argh(option)]
    config: Option<PathBuf>,

    /// log level (off, error, warn, info, debug, trace); overrides the config file
    #[argh(option)]
    log_level: Option<LevelFilter>,

    /// scripts to run in order; standard input is read when none are given
    #[argh(positional)]
    scripts: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();
    let code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("mysh: {}", e);
            e.code()
        }
    };
    // Only the low 8 bits reach the parent.
    ExitCode::from(code as u8)
}

fn run(args: Args) -> Result<i32, ShellError> {
    let config = ConfigLoader::load(args.config.as_deref())?;
    init_logger(args.log_level.unwrap_or(config.log_level));

    let executor = DefaultExecutor::new(PathResolver::new(config.search_path.clone()));
    let mut repl = Repl::new(executor, &config);
    let mut stdout = io::stdout();

    if args.scripts.is_empty() {
        let mut input = LineReader::stdin();
        return Ok(repl.run(&mut input, &mut stdout)?.code());
    }

    let mut outcome = RunOutcome::Completed(0);
    for script in &args.scripts {
        let mut input = match LineReader::open(script) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("mysh: {}: {}", script.display(), e);
                return Ok(e.raw_os_error().unwrap_or(FAILURE_CODE));
            }
        };
        outcome = repl.run(&mut input, &mut stdout)?;
        if !outcome.is_completed() {
            break;
        }
    }
    Ok(outcome.code())
}
