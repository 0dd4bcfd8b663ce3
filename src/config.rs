//! Run options and scan filters.
//!
//! Options come from the command line (or the terminal UI) only; nothing is
//! read from or written to disk. Before a run they are compiled into
//! [`CompiledFilters`], which decide whether a root-level file is a candidate:
//! - Hidden files (starting with ".") can be skipped
//! - Glob patterns exclude files by name (e.g. `*.part`, `sample-*`)

use glob::Pattern;
use std::path::Path;

/// Errors that can occur while compiling run options.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Invalid glob pattern provided with the actual error reason.
    InvalidGlobPattern {
        /// The glob pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidGlobPattern { pattern, reason } => {
                write!(f, "Invalid exclude pattern '{}': {}", pattern, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Options for a single organizer run.
#[derive(Debug, Clone, Default)]
pub struct OrganizeConfig {
    /// Report what would happen without touching the filesystem.
    pub dry_run: bool,
    /// Leave files starting with "." where they are.
    pub skip_hidden: bool,
    /// Glob patterns matched against file names; matches are left in place.
    pub exclude: Vec<String>,
}

impl OrganizeConfig {
    /// Compile the exclude patterns into filters.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob pattern is invalid.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self.skip_hidden, &self.exclude)
    }
}

/// Pre-compiled filters applied to every file name found by the scan pass.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilters {
    skip_hidden: bool,
    exclude_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(skip_hidden: bool, patterns: &[String]) -> Result<Self, ConfigError> {
        let exclude_patterns = patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden,
            exclude_patterns,
        })
    }

    /// Check if a file should be considered for organization.
    ///
    /// Only the file name is matched, never the directories above it.
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.skip_hidden && file_name.starts_with('.') {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_includes_everything() {
        let compiled = OrganizeConfig::default().compile().unwrap();

        assert!(compiled.should_include(Path::new(".hidden (2020).mkv")));
        assert!(compiled.should_include(Path::new("Movie (2020).mkv")));
    }

    #[test]
    fn test_skip_hidden() {
        let config = OrganizeConfig {
            skip_hidden: true,
            ..Default::default()
        };
        let compiled = config.compile().unwrap();

        assert!(!compiled.should_include(Path::new(".DS_Store")));
        assert!(compiled.should_include(Path::new("Movie (2020).mkv")));
    }

    #[test]
    fn test_exclude_glob_patterns() {
        let config = OrganizeConfig {
            exclude: vec!["*.part".to_string(), "sample-*".to_string()],
            ..Default::default()
        };
        let compiled = config.compile().unwrap();

        assert!(!compiled.should_include(Path::new("Movie (2020).mkv.part")));
        assert!(!compiled.should_include(Path::new("sample-Movie (2020).mkv")));
        assert!(compiled.should_include(Path::new("Movie (2020).mkv")));
    }

    #[test]
    fn test_exclude_matches_file_name_only() {
        let config = OrganizeConfig {
            exclude: vec!["downloads*".to_string()],
            ..Default::default()
        };
        let compiled = config.compile().unwrap();

        assert!(compiled.should_include(Path::new("/downloads/Movie (2020).mkv")));
        assert!(!compiled.should_include(Path::new("/media/downloads.txt")));
    }

    #[test]
    fn test_glob_character_class() {
        let config = OrganizeConfig {
            exclude: vec!["[0-9]*.mkv".to_string()],
            ..Default::default()
        };
        let compiled = config.compile().unwrap();

        assert!(!compiled.should_include(Path::new("1917 (2019).mkv")));
        assert!(compiled.should_include(Path::new("Heat (1995).mkv")));
    }

    #[test]
    fn test_invalid_glob_pattern_returns_error() {
        let config = OrganizeConfig {
            exclude: vec!["[invalid".to_string()], // Unclosed bracket
            ..Default::default()
        };

        let err = config.compile().unwrap_err();
        assert!(err.to_string().contains("[invalid"));
    }
}
