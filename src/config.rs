use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use thiserror::Error;

use crate::executor::path_resolver::DEFAULT_SEARCH_DIRS;

pub const CONFIG_ENV: &str = "MYSH_CONFIG";
const RC_FILE: &str = ".myshrc";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prompt: String,
    pub error_prompt: String,
    pub banner: String,
    pub echo_script: bool,
    pub log_level: LevelFilter,
    pub search_path: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: "mysh> ".to_string(),
            error_prompt: "!mysh> ".to_string(),
            banner: "Welcome to my shell!".to_string(),
            echo_script: true,
            log_level: LevelFilter::Warn,
            search_path: DEFAULT_SEARCH_DIRS.iter().map(PathBuf::from).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config line {line}: {msg}")]
    Parse { line: usize, msg: String },
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Finds the config file to use: an explicit path, then `$MYSH_CONFIG`,
    /// then `~/.myshrc` when it exists.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        let rc = PathBuf::from(env::var_os("HOME")?).join(RC_FILE);
        rc.is_file().then_some(rc)
    }

    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        match Self::locate(explicit) {
            Some(path) => Self::load_from_file(path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&src)
    }

    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut config = Config::default();

        for (idx, raw) in src.lines().enumerate() {
            let line = idx + 1;
            let parse_error = |msg: String| ConfigError::Parse { line, msg };

            if raw.trim().is_empty() || raw.trim_start().starts_with('#') {
                continue;
            }
            let Some((key, value)) = raw.split_once('=') else {
                return Err(parse_error(format!("no '=' found: {}", raw)));
            };
            // Values are taken verbatim so prompts may end in a space.
            match key.trim() {
                "prompt" => config.prompt = value.to_string(),
                "error_prompt" => config.error_prompt = value.to_string(),
                "banner" => config.banner = value.to_string(),
                "echo_script" => {
                    config.echo_script = value
                        .trim()
                        .parse::<bool>()
                        .map_err(|_| parse_error(format!("invalid bool: {}", value)))?;
                }
                "log_level" => {
                    config.log_level = value
                        .trim()
                        .parse::<LevelFilter>()
                        .map_err(|_| parse_error(format!("invalid log level: {}", value)))?;
                }
                "search_path" => {
                    config.search_path = value
                        .split(':')
                        .filter(|dir| !dir.is_empty())
                        .map(PathBuf::from)
                        .collect();
                }
                other => return Err(parse_error(format!("unknown key: {}", other))),
            }
        }

        Ok(config)
    }
}
