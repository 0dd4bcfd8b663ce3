//! Directory browser used to pick the folder to organize.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Navigation state for the directory picker screen.
#[derive(Debug, Clone)]
pub struct DirectoryBrowser {
    current: PathBuf,
    entries: Vec<PathBuf>,
    selected: usize,
    error: Option<String>,
}

impl DirectoryBrowser {
    /// Opens the browser at `start`, or at its nearest existing ancestor.
    pub fn open(start: &Path) -> Self {
        let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
        let current = start
            .ancestors()
            .find(|p| p.is_dir())
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let mut browser = Self {
            current,
            entries: Vec::new(),
            selected: 0,
            error: None,
        };
        browser.refresh();
        browser
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    /// Subdirectories of the current directory, sorted by name.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&Path> {
        self.entries.get(self.selected).map(PathBuf::as_path)
    }

    /// The last listing error, if the current directory could not be read.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Enters the highlighted subdirectory. Returns `false` if there is none.
    pub fn descend(&mut self) -> bool {
        let Some(entry) = self.selected_entry().map(Path::to_path_buf) else {
            return false;
        };
        self.current = entry;
        self.selected = 0;
        self.refresh();
        true
    }

    /// Moves to the parent directory, keeping the one we left highlighted.
    ///
    /// Returns `false` at the filesystem root.
    pub fn go_up(&mut self) -> bool {
        let Some(parent) = self.current.parent().map(Path::to_path_buf) else {
            return false;
        };
        let previous = std::mem::replace(&mut self.current, parent);
        self.refresh();
        self.selected = self
            .entries
            .iter()
            .position(|entry| *entry == previous)
            .unwrap_or(0);
        true
    }

    /// The directory Enter picks: the highlighted entry, else the current one.
    pub fn choice(&self) -> PathBuf {
        self.selected_entry()
            .unwrap_or(self.current.as_path())
            .to_path_buf()
    }

    fn refresh(&mut self) {
        match list_subdirectories(&self.current) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(e) => {
                self.entries.clear();
                self.error = Some(format!("Cannot read {}: {}", self.current.display(), e));
            }
        }
        if self.selected >= self.entries.len() {
            self.selected = 0;
        }
    }
}

fn list_subdirectories(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort_by_key(|path| {
        path.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    Ok(dirs)
}
