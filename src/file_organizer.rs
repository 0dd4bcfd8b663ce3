/// File organization into per-title folders.
///
/// This module scans the files directly inside a root directory, classifies
/// each one by filename, moves it into a folder named after its title, and
/// finally synchronizes every first-level folder's timestamps with its newest
/// file. Progress is reported through a [`ProgressSink`].
use crate::config::{CompiledFilters, ConfigError, OrganizeConfig};
use crate::file_title::classify;
use crate::progress::{ProgressEvent, ProgressSink, RunSummary};
use crate::timestamp::sync_folder_mtime;
use filetime::FileTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// The root does not exist or is not a directory.
    InvalidRoot { path: PathBuf },
    /// Failed to list a directory.
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a title directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file into its title directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// Failed to write a folder's timestamps.
    TimestampSyncFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot { path } => {
                write!(f, "{} is not a directory.", path.display())
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::TimestampSyncFailed { path, source } => {
                write!(
                    f,
                    "Failed to update timestamps of {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What happened to a single file handed to [`FileOrganizer::move_into_folder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file now lives at this path.
    Moved(PathBuf),
    /// This path was already taken; the source file was left untouched.
    AlreadyExists(PathBuf),
}

/// Organizes the loose files of a root directory into title folders.
///
/// # Examples
///
/// ```no_run
/// use mediatidy::file_organizer::FileOrganizer;
/// use mediatidy::progress::ProgressEvent;
/// use std::path::Path;
///
/// let organizer = FileOrganizer::default();
/// let summary = organizer
///     .organize(Path::new("/media/incoming"), &mut |event: ProgressEvent| {
///         println!("{}", event)
///     })
///     .expect("root is a directory");
/// println!("{} file(s) moved", summary.moved);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileOrganizer {
    filters: CompiledFilters,
    dry_run: bool,
}

impl FileOrganizer {
    /// Builds an organizer from run options.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is not a valid glob.
    pub fn new(config: &OrganizeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            filters: config.compile()?,
            dry_run: config.dry_run,
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Runs the scan pass and then the sync pass over `root`.
    ///
    /// The root is validated before anything else happens. After that, per-file
    /// and per-folder failures are reported through `sink` and the run carries
    /// on with the remaining entries. The last event is always
    /// [`ProgressEvent::Finished`].
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::InvalidRoot`] if `root` is not a directory, and
    /// [`OrganizeError::ReadDirFailed`] if it cannot be listed. In both cases no
    /// file has been touched.
    pub fn organize(
        &self,
        root: &Path,
        sink: &mut dyn ProgressSink,
    ) -> OrganizeResult<RunSummary> {
        if !root.is_dir() {
            return Err(OrganizeError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }

        let candidates = self.scan(root)?;
        sink.emit(ProgressEvent::Started {
            root: root.to_path_buf(),
            candidates: candidates.len(),
        });

        let mut summary = RunSummary {
            dry_run: self.dry_run,
            ..Default::default()
        };

        for file_path in &candidates {
            self.organize_file(root, file_path, &mut summary, sink);
        }

        if !self.dry_run {
            summary.folders_synced = Self::sync_folders(root, sink);
        }

        sink.emit(ProgressEvent::Finished(summary));
        Ok(summary)
    }

    /// Collects the regular files directly inside `root` that pass the filters.
    fn scan(&self, root: &Path) -> OrganizeResult<Vec<PathBuf>> {
        let entries = fs::read_dir(root).map_err(|e| OrganizeError::ReadDirFailed {
            path: root.to_path_buf(),
            source: e,
        })?;

        let mut candidates = Vec::new();
        for entry in entries.flatten() {
            if let Ok(file_type) = entry.file_type()
                && file_type.is_file()
            {
                let file_path = entry.path();
                if self.filters.should_include(&file_path) {
                    candidates.push(file_path);
                } else {
                    debug!("Excluded by filters: {}", file_path.display());
                }
            }
        }
        Ok(candidates)
    }

    fn organize_file(
        &self,
        root: &Path,
        file_path: &Path,
        summary: &mut RunSummary,
        sink: &mut dyn ProgressSink,
    ) {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let Some(extracted) = classify(&file_name) else {
            debug!("No pattern matched: {}", file_name);
            summary.unmatched += 1;
            sink.emit(ProgressEvent::Unmatched { file_name });
            return;
        };
        debug!("{} → {} ({})", file_name, extracted.title, extracted.kind.label());

        if self.dry_run {
            let target = root.join(&extracted.title).join(&file_name);
            if path_taken(&target) {
                summary.skipped += 1;
                sink.emit(ProgressEvent::AlreadyExists { target });
            } else {
                summary.moved += 1;
                sink.emit(ProgressEvent::WouldMove {
                    file_name,
                    folder: extracted.title,
                });
            }
            return;
        }

        match Self::move_into_folder(root, file_path, &extracted.title) {
            Ok(MoveOutcome::Moved(_)) => {
                summary.moved += 1;
                sink.emit(ProgressEvent::Moved {
                    file_name,
                    folder: extracted.title,
                });
            }
            Ok(MoveOutcome::AlreadyExists(target)) => {
                summary.skipped += 1;
                sink.emit(ProgressEvent::AlreadyExists { target });
            }
            Err(e) => {
                warn!("{}", e);
                summary.failed += 1;
                sink.emit(ProgressEvent::Failed {
                    path: file_path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Synchronizes the timestamps of every directory directly under `root`.
    ///
    /// Returns how many folders were updated.
    fn sync_folders(root: &Path, sink: &mut dyn ProgressSink) -> usize {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {} for timestamp sync: {}", root.display(), e);
                sink.emit(ProgressEvent::SyncFailed {
                    folder: root.to_path_buf(),
                    reason: e.to_string(),
                });
                return 0;
            }
        };

        let mut synced = 0;
        for entry in entries.flatten() {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }

            let folder = entry.path();
            match sync_folder_mtime(&folder) {
                Ok(Some(_)) => synced += 1,
                Ok(None) => {}
                Err(e) => {
                    let error = OrganizeError::TimestampSyncFailed {
                        path: folder.clone(),
                        source: e,
                    };
                    warn!("{}", error);
                    sink.emit(ProgressEvent::SyncFailed {
                        folder,
                        reason: error.to_string(),
                    });
                }
            }
        }
        synced
    }

    /// Moves a file into the `folder_name` directory under `root`.
    ///
    /// The folder is created if needed. If it already contains an entry with the
    /// file's name, nothing is moved and [`MoveOutcome::AlreadyExists`] is
    /// returned.
    ///
    /// # Arguments
    ///
    /// * `root` - The directory the title folder lives in
    /// * `file_path` - The full path to the file to be moved
    /// * `folder_name` - The sanitized title naming the destination folder
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mediatidy::file_organizer::{FileOrganizer, MoveOutcome};
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::move_into_folder(
    ///     Path::new("/media/incoming"),
    ///     Path::new("/media/incoming/Heat (1995).mkv"),
    ///     "Heat",
    /// );
    ///
    /// match result {
    ///     Ok(MoveOutcome::Moved(path)) => println!("Moved to {}", path.display()),
    ///     Ok(MoveOutcome::AlreadyExists(path)) => println!("Skipped, {} exists", path.display()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn move_into_folder(
        root: &Path,
        file_path: &Path,
        folder_name: &str,
    ) -> OrganizeResult<MoveOutcome> {
        if !root.is_dir() {
            return Err(OrganizeError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }

        let folder_path = root.join(folder_name);

        // create_dir_all succeeds when the directory already exists
        fs::create_dir_all(&folder_path).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: folder_path.clone(),
            source: e,
        })?;

        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                source: file_path.to_path_buf(),
                destination: folder_path.clone(),
                source_error: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        let destination_path = folder_path.join(file_name);
        if path_taken(&destination_path) {
            return Ok(MoveOutcome::AlreadyExists(destination_path));
        }

        move_file(file_path, &destination_path).map_err(|e| OrganizeError::FileMoveFailure {
            source: file_path.to_path_buf(),
            destination: destination_path.clone(),
            source_error: e,
        })?;

        Ok(MoveOutcome::Moved(destination_path))
    }
}

/// True if anything, including a dangling symlink, occupies `path`.
fn path_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Renames `from` to `to`, falling back to copy and delete across devices.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("{} is on another device, copying", to.display());
            let metadata = fs::metadata(from)?;
            fs::copy(from, to)?;
            filetime::set_file_times(
                to,
                FileTime::from_last_access_time(&metadata),
                FileTime::from_last_modification_time(&metadata),
            )?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}
