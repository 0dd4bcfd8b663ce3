//! mediatidy - sorts loose video files into per-title folders
//!
//! This library extracts a series or movie title from release filenames,
//! moves each file into a folder named after its title, and keeps every
//! folder's modification time in line with its newest file. The same pipeline
//! backs a plain console run and an interactive terminal interface.

pub mod cli;
pub mod config;
pub mod file_organizer;
pub mod file_title;
pub mod output;
pub mod progress;
pub mod sanitize;
pub mod timestamp;
pub mod tui;

pub use config::{CompiledFilters, ConfigError, OrganizeConfig};
pub use file_organizer::{FileOrganizer, MoveOutcome, OrganizeError, OrganizeResult};
pub use file_title::{ExtractedTitle, TitleKind, classify, extract_title};
pub use progress::{ProgressEvent, ProgressSink, RunSummary};
pub use sanitize::sanitize;
pub use timestamp::sync_folder_mtime;

pub use cli::{Cli, run_cli};
