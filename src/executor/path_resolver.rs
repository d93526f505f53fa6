use std::path::{Path, PathBuf};

pub const DEFAULT_SEARCH_DIRS: [&str; 6] = [
    "/usr/local/sbin/",
    "/usr/local/bin/",
    "/usr/sbin/",
    "/usr/bin/",
    "/sbin/",
    "/bin/",
];

#[derive(Debug, Clone)]
pub struct PathResolver {
    search_dirs: Vec<PathBuf>,
}

impl Default for PathResolver {
    fn default() -> Self {
        PathResolver::new(DEFAULT_SEARCH_DIRS.iter().map(PathBuf::from).collect())
    }
}

impl PathResolver {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        PathResolver { search_dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// A regular file relative to the current directory wins; bare
    /// names then fall back to the search directories, in order.
    pub fn resolve(&self, command: &str) -> Option<PathBuf> {
        let local = Path::new(command);
        if local.is_file() {
            return Some(local.to_path_buf());
        }
        if command.contains('/') {
            return None;
        }
        self.search_dirs
            .iter()
            .map(|dir| dir.join(command))
            .find(|candidate| candidate.is_file())
    }
}
