/// Folder timestamp synchronization.
///
/// Moving files into a folder bumps the folder's mtime to "now", which makes
/// sorting a library by date useless. After a run each title folder is given the
/// mtime of the newest file it contains, at any depth.
use chrono::{DateTime, Local};
use filetime::FileTime;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Returns the newest modification time among all regular files under `folder`.
///
/// Entries that cannot be read are logged and ignored. Symlinks are not followed.
pub fn newest_file_mtime(folder: &Path) -> Option<SystemTime> {
    WalkDir::new(folder)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", folder.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| match entry.metadata().map(|m| m.modified()) {
            Ok(Ok(modified)) => Some(modified),
            Ok(Err(e)) => {
                warn!("No modification time for {}: {}", entry.path().display(), e);
                None
            }
            Err(e) => {
                warn!("Cannot stat {}: {}", entry.path().display(), e);
                None
            }
        })
        .max()
}

/// Sets `folder`'s access and modification times to its newest file's mtime.
///
/// A folder without any files is left untouched and `Ok(None)` is returned.
/// Only the folder's own metadata changes; nothing under it is modified.
///
/// # Errors
///
/// Returns the I/O error if the folder's timestamps cannot be written.
pub fn sync_folder_mtime(folder: &Path) -> io::Result<Option<SystemTime>> {
    let Some(newest) = newest_file_mtime(folder) else {
        debug!("{} holds no files, timestamps left as is", folder.display());
        return Ok(None);
    };

    let time = FileTime::from_system_time(newest);
    filetime::set_file_times(folder, time, time)?;

    debug!(
        "{} → {}",
        folder.display(),
        DateTime::<Local>::from(newest).format("%Y-%m-%d %H:%M:%S")
    );
    Ok(Some(newest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_with_mtime(path: &Path, unix_seconds: i64) {
        fs::write(path, "content").expect("Failed to write test file");
        filetime::set_file_mtime(path, FileTime::from_unix_time(unix_seconds, 0))
            .expect("Failed to set mtime");
    }

    fn mtime_of(path: &Path) -> FileTime {
        FileTime::from_last_modification_time(&fs::metadata(path).expect("Failed to stat"))
    }

    #[test]
    fn test_sync_uses_newest_nested_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path().join("Show");
        let nested = folder.join("Season 1").join("Extras");
        fs::create_dir_all(&nested).expect("Failed to create nested dirs");

        write_with_mtime(&folder.join("01.mkv"), 1_600_000_000);
        write_with_mtime(&folder.join("Season 1").join("02.mkv"), 1_500_000_000);
        write_with_mtime(&nested.join("nced.mkv"), 1_700_000_000);

        let applied = sync_folder_mtime(&folder).expect("sync failed");

        assert!(applied.is_some());
        assert_eq!(mtime_of(&folder), FileTime::from_unix_time(1_700_000_000, 0));
        let atime = FileTime::from_last_access_time(&fs::metadata(&folder).unwrap());
        assert_eq!(atime, FileTime::from_unix_time(1_700_000_000, 0));
    }

    #[test]
    fn test_sync_leaves_empty_folder_untouched() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path().join("Empty");
        fs::create_dir_all(folder.join("also-empty")).expect("Failed to create dirs");
        filetime::set_file_mtime(&folder, FileTime::from_unix_time(1_234_567_890, 0))
            .expect("Failed to set mtime");

        let applied = sync_folder_mtime(&folder).expect("sync failed");

        assert_eq!(applied, None);
        assert_eq!(mtime_of(&folder), FileTime::from_unix_time(1_234_567_890, 0));
    }

    #[test]
    fn test_sync_does_not_touch_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path().join("Movie");
        fs::create_dir(&folder).expect("Failed to create folder");
        let file = folder.join("movie.mkv");
        write_with_mtime(&file, 1_600_000_000);

        sync_folder_mtime(&folder).expect("sync failed");

        assert_eq!(mtime_of(&file), FileTime::from_unix_time(1_600_000_000, 0));
        assert_eq!(fs::read_to_string(&file).unwrap(), "content");
    }

    #[test]
    fn test_newest_file_mtime_ignores_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path().join("Show");
        let sub = folder.join("sub");
        fs::create_dir_all(&sub).expect("Failed to create dirs");
        write_with_mtime(&folder.join("a.mkv"), 1_500_000_000);
        // The subdirectory is newer than any file but must not count
        filetime::set_file_mtime(&sub, FileTime::from_unix_time(1_800_000_000, 0))
            .expect("Failed to set mtime");

        let newest = newest_file_mtime(&folder).expect("expected a file");
        assert_eq!(
            FileTime::from_system_time(newest),
            FileTime::from_unix_time(1_500_000_000, 0)
        );
    }

    #[test]
    fn test_sync_missing_folder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing");

        // Nothing to walk, so nothing is written and no error surfaces
        assert_eq!(sync_folder_mtime(&missing).expect("sync failed"), None);
    }
}
