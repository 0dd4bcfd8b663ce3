//! Progress reporting for organizer runs.
//!
//! The organizer never prints. It hands every notable event to a
//! [`ProgressSink`], and each front end decides how to render it: the console
//! prints colored lines, the terminal UI forwards events to its log view.

use std::fmt;
use std::path::PathBuf;

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files moved into a title folder (or that would be, in a dry run).
    pub moved: usize,
    /// Files left in place because the destination already had that name.
    pub skipped: usize,
    /// Files that could not be moved because of an I/O error.
    pub failed: usize,
    /// Files no pattern matched.
    pub unmatched: usize,
    /// Folders whose timestamps were synchronized.
    pub folders_synced: usize,
    pub dry_run: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            write!(f, "Dry run complete. {} file(s) would be moved.", self.moved)
        } else {
            write!(
                f,
                "Done. {} file(s) moved; folder timestamps updated.",
                self.moved
            )
        }
    }
}

/// A single event emitted while organizing a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The scan pass found `candidates` files to classify.
    Started { root: PathBuf, candidates: usize },
    /// No pattern matched; the file stays at the root.
    Unmatched { file_name: String },
    /// The file was moved into `folder`.
    Moved { file_name: String, folder: String },
    /// Dry run: the file would have been moved into `folder`.
    WouldMove { file_name: String, folder: String },
    /// The destination already holds a file with this name.
    AlreadyExists { target: PathBuf },
    /// Creating the folder or moving the file failed.
    Failed { path: PathBuf, reason: String },
    /// Synchronizing a folder's timestamps failed.
    SyncFailed { folder: PathBuf, reason: String },
    /// Always the last event of a run.
    Finished(RunSummary),
}

impl ProgressEvent {
    /// Whether this event belongs in a user-facing log.
    pub fn is_reportable(&self) -> bool {
        !matches!(
            self,
            ProgressEvent::Started { .. } | ProgressEvent::Unmatched { .. }
        )
    }

    /// Whether this event finishes handling one scanned file.
    pub fn completes_file(&self) -> bool {
        matches!(
            self,
            ProgressEvent::Unmatched { .. }
                | ProgressEvent::Moved { .. }
                | ProgressEvent::WouldMove { .. }
                | ProgressEvent::AlreadyExists { .. }
                | ProgressEvent::Failed { .. }
        )
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Started { root, candidates } => {
                write!(f, "scanning: {} ({} file(s))", root.display(), candidates)
            }
            ProgressEvent::Unmatched { file_name } => write!(f, "no match: {}", file_name),
            ProgressEvent::Moved { file_name, folder } => {
                write!(f, "moved: {} → {}/", file_name, folder)
            }
            ProgressEvent::WouldMove { file_name, folder } => {
                write!(f, "would move: {} → {}/", file_name, folder)
            }
            ProgressEvent::AlreadyExists { target } => {
                write!(f, "already exists: {}", target.display())
            }
            ProgressEvent::Failed { path, reason } => {
                write!(f, "failed: {}: {}", path.display(), reason)
            }
            ProgressEvent::SyncFailed { folder, reason } => {
                write!(f, "timestamp sync failed: {}: {}", folder.display(), reason)
            }
            ProgressEvent::Finished(summary) => fmt::Display::fmt(summary, f),
        }
    }
}

/// Receives progress events from the organizer.
pub trait ProgressSink {
    fn emit(&mut self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressEvent),
{
    fn emit(&mut self, event: ProgressEvent) {
        self(event)
    }
}
