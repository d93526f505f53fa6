//! Wildcard expansion of command arguments against the filesystem.
//!
//! Only `*` is special. A pattern is split into a literal directory prefix
//! (everything up to the last `/` before the first `*`) and a remainder whose
//! `/`-separated segments are matched one directory level at a time: inner
//! segments against subdirectories, the last one against regular files.
//! Hidden entries are never matched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::trace;
use thiserror::Error;

pub const WILDCARD: char = '*';
const HIDDEN_MARKER: char = '.';

#[derive(Debug, Error)]
pub enum GlobError {
    #[error("cannot read directory '{dir}': {source}")]
    ReadDir {
        dir: String,
        #[source]
        source: io::Error,
    },
}

/// True when `arg` would be handed to [`expand`] at all.
pub fn has_wildcard(arg: &str) -> bool {
    arg.contains(WILDCARD)
}

/// Expands `pattern` relative to the current directory, appending matches
/// to `out`. Returns the number of paths added; zero means the caller keeps
/// the literal argument.
pub fn expand(pattern: &str, out: &mut Vec<String>) -> Result<usize, GlobError> {
    expand_at(Path::new("."), pattern, out)
}

/// Like [`expand`], but relative patterns are resolved against `base`.
/// Returned paths keep the shape of the pattern and never mention `base`.
pub fn expand_at(base: &Path, pattern: &str, out: &mut Vec<String>) -> Result<usize, GlobError> {
    let Some(star) = pattern.find(WILDCARD) else {
        return Ok(0);
    };

    let (prefix, rest) = match pattern[..star].rfind('/') {
        Some(0) => (Some("/"), &pattern[1..]),
        Some(slash) => (Some(&pattern[..slash]), &pattern[slash + 1..]),
        None => (None, pattern),
    };
    let start_dir: PathBuf = match prefix {
        Some(dir) if dir.starts_with('/') => PathBuf::from(dir),
        Some(dir) => base.join(dir),
        None => base.to_path_buf(),
    };

    let before = out.len();
    if let Err(e) = fs::read_dir(&start_dir) {
        if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) {
            trace!("glob: start directory {} missing", start_dir.display());
            return Ok(0);
        }
    }
    collect(&start_dir, prefix, rest, out)?;
    Ok(out.len() - before)
}

// `display` is the directory as it should appear in results; `None` is the
// implicit current directory.
fn collect(
    fs_dir: &Path,
    display: Option<&str>,
    pattern: &str,
    out: &mut Vec<String>,
) -> Result<(), GlobError> {
    let (segment, next) = match pattern.split_once('/') {
        Some((segment, next)) => (segment, Some(next)),
        None => (pattern, None),
    };
    trace!("glob: scanning {} for '{}'", fs_dir.display(), segment);

    let read_dir_error = |source: io::Error| GlobError::ReadDir {
        dir: display.unwrap_or(".").to_string(),
        source,
    };

    // The parent iterator stays open across the recursive call below, so
    // sibling entries are neither skipped nor visited twice.
    for entry in fs::read_dir(fs_dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if name.starts_with(HIDDEN_MARKER) || !segment_matches(segment, name) {
            continue;
        }
        let file_type = entry.file_type().map_err(read_dir_error)?;

        match next {
            None if file_type.is_file() => out.push(join(display, name)),
            Some(rest) if file_type.is_dir() => {
                let child = join(display, name);
                collect(&entry.path(), Some(&child), rest, out)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn segment_matches(segment: &str, name: &str) -> bool {
    segment.is_empty() || matches(segment, name)
}

fn join(dir: Option<&str>, name: &str) -> String {
    match dir {
        None => name.to_string(),
        Some(dir) if dir.ends_with('/') => format!("{}{}", dir, name),
        Some(dir) => format!("{}/{}", dir, name),
    }
}

/// Shell wildcard match of a single path segment. `*` first swallows the
/// whole remainder and gives characters back one at a time.
pub fn matches(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();
    let mut matcher = Matcher {
        p: &p,
        n: &n,
        seen: vec![None; (p.len() + 1) * (n.len() + 1)],
    };
    matcher.match_at(0, 0)
}

// Results are cached per (pattern, name) offset pair, so each pair is
// evaluated once however many stars the pattern has.
struct Matcher<'a> {
    p: &'a [char],
    n: &'a [char],
    seen: Vec<Option<bool>>,
}

impl Matcher<'_> {
    fn match_at(&mut self, pi: usize, ni: usize) -> bool {
        let (p, n) = (self.p, self.n);
        let key = pi * (n.len() + 1) + ni;
        if let Some(hit) = self.seen[key] {
            return hit;
        }
        let hit = match p.get(pi) {
            None => ni == n.len(),
            Some(&WILDCARD) if pi + 1 == p.len() => true,
            Some(&WILDCARD) => (ni..=n.len())
                .rev()
                .any(|start| self.match_at(pi + 1, start)),
            Some(c) => n.get(ni) == Some(c) && self.match_at(pi + 1, ni + 1),
        };
        self.seen[key] = Some(hit);
        hit
    }
}
