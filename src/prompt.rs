use std::io::{self, Write};

use crate::config::Config;

/// Interactive prompt; switches to the error variant after a failed line.
pub struct ShellPrompt {
    normal: String,
    error: String,
}

impl ShellPrompt {
    pub fn new(config: &Config) -> Self {
        ShellPrompt {
            normal: config.prompt.clone(),
            error: config.error_prompt.clone(),
        }
    }

    pub fn text(&self, last_ok: bool) -> &str {
        if last_ok { &self.normal } else { &self.error }
    }

    pub fn show(&self, out: &mut dyn Write, last_ok: bool) -> io::Result<()> {
        write!(out, "{}", self.text(last_ok))?;
        out.flush()
    }
}
