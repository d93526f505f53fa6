use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::path::Path;

/// Line source for the shell: a script file or standard input.
pub struct LineReader {
    source: Box<dyn BufRead>,
    interactive: bool,
}

impl LineReader {
    pub fn stdin() -> Self {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        LineReader {
            source: Box::new(BufReader::new(stdin)),
            interactive,
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(LineReader {
            source: Box::new(BufReader::new(file)),
            interactive: false,
        })
    }

    pub fn from_reader<R: BufRead + 'static>(reader: R, interactive: bool) -> Self {
        LineReader {
            source: Box::new(reader),
            interactive,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Next line without its line terminator; `None` at end of input.
    /// Bytes that are not valid UTF-8 become U+FFFD.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.source.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
