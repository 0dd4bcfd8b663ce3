//! Command-line interface module for mediatidy.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing and validation
//! - Logging setup
//! - Choosing between a console run and the terminal UI

use crate::config::OrganizeConfig;
use crate::file_organizer::FileOrganizer;
use crate::output::ConsoleSink;
use crate::progress::RunSummary;
use crate::tui;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "mediatidy")]
#[command(version)]
#[command(about = "Sort loose episode and movie files into per-title folders")]
#[command(
    long_about = "Moves files named like '[Group] Title - 01 (720p) [ABCDEF12].mkv' or \
    'Title (2018) 1080p.mkv' into a folder named after the title, then sets every \
    folder's modification time to that of its newest file."
)]
pub struct Cli {
    /// Directory to organize
    #[arg(value_name = "PATH", help = "Directory to organize (defaults to current directory)")]
    pub path: Option<PathBuf>,

    /// Show what would be moved without touching anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Leave files matching these glob patterns in place
    #[arg(short, long, value_name = "GLOB", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Leave hidden files (starting with ".") in place
    #[arg(long)]
    pub skip_hidden: bool,

    /// Open the interactive terminal interface
    #[arg(short, long)]
    pub tui: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colors in output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn root_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn organize_config(&self) -> OrganizeConfig {
        OrganizeConfig {
            dry_run: self.dry_run,
            skip_hidden: self.skip_hidden,
            exclude: self.exclude.clone(),
        }
    }

    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        // A subscriber may already be installed when embedded or under test
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .try_init();
    }
}

/// Runs the application for parsed arguments.
///
/// # Errors
///
/// Returns a printable message if the root is not a directory, an exclude
/// pattern is invalid, or the terminal UI fails.
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let organizer = FileOrganizer::new(&cli.organize_config()).map_err(|e| e.to_string())?;

    if cli.tui {
        return tui::run(&cli.root_path(), organizer)
            .map_err(|e| format!("Terminal interface failed: {}", e));
    }

    cli.setup_logging();
    organize_directory(&organizer, &resolve_root(&cli.root_path())?).map(|_| ())
}

/// Organizes `root` and prints progress to the console.
pub fn organize_directory(organizer: &FileOrganizer, root: &Path) -> Result<RunSummary, String> {
    tracing::debug!("Organizing {}", root.display());
    let mut sink = ConsoleSink::new();
    organizer
        .organize(root, &mut sink)
        .map_err(|e| e.to_string())
}

/// Canonicalizes `path` and checks that it is a directory.
pub fn resolve_root(path: &Path) -> Result<PathBuf, String> {
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !resolved.is_dir() {
        return Err(format!("{} is not a directory.", resolved.display()));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["mediatidy"]);
        assert_eq!(cli.root_path(), PathBuf::from("."));
        assert!(!cli.dry_run);
        assert!(!cli.tui);
        assert!(cli.exclude.is_empty());
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::parse_from([
            "mediatidy",
            "/media/incoming",
            "--dry-run",
            "--skip-hidden",
            "-e",
            "*.part,sample-*",
        ]);
        let config = cli.organize_config();

        assert_eq!(cli.root_path(), PathBuf::from("/media/incoming"));
        assert!(config.dry_run);
        assert!(config.skip_hidden);
        assert_eq!(config.exclude, vec!["*.part", "sample-*"]);
    }

    #[test]
    fn test_resolve_root_rejects_missing_and_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("file.txt");
        std::fs::write(&file_path, "x").expect("Failed to write test file");

        assert!(resolve_root(&temp_dir.path().join("missing")).is_err());
        let err = resolve_root(&file_path).unwrap_err();
        assert!(err.ends_with("is not a directory."));
        assert!(resolve_root(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_invalid_exclude_is_reported() {
        let cli = Cli::parse_from(["mediatidy", "-e", "[oops"]);
        let err = run_cli(&cli).unwrap_err();
        assert!(err.contains("[oops"));
    }
}
