//! Output formatting and styling module.
//!
//! Provides a centralized interface for all console output: colored progress
//! lines, the scan progress bar, and error reporting. The terminal UI renders
//! the same events itself and never goes through this module.

use crate::progress::{ProgressEvent, ProgressSink, RunSummary};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mediatidy::output::OutputFormatter;
    /// OutputFormatter::error("Error: /nope is not a directory.");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints the run summary, preceded by a blank line.
    ///
    /// The summary sentence is always the last line written.
    pub fn summary(summary: &RunSummary) {
        println!();
        if summary.skipped > 0 || summary.failed > 0 {
            println!(
                "{} skipped, {} failed, {} unmatched",
                summary.skipped.to_string().yellow(),
                summary.failed.to_string().red(),
                summary.unmatched
            );
        }
        let line = summary.to_string();
        if summary.dry_run {
            println!("{}", line.yellow().bold());
        } else {
            println!("{}", line.bold());
        }
    }

    /// Styles a progress line according to its event.
    pub fn styled_line(event: &ProgressEvent) -> String {
        let line = event.to_string();
        match event {
            ProgressEvent::Moved { .. } => line.green().to_string(),
            ProgressEvent::WouldMove { .. } => line.cyan().to_string(),
            ProgressEvent::AlreadyExists { .. } => line.yellow().to_string(),
            ProgressEvent::Failed { .. } | ProgressEvent::SyncFailed { .. } => {
                line.red().to_string()
            }
            _ => line,
        }
    }

    /// Creates and returns a progress bar for the scan pass.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mediatidy::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1); // Increment by 1
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }
}

/// Prints organizer events to the console.
///
/// While the scan pass runs, lines are printed above a progress bar so the
/// bar never tears the log.
#[derive(Default)]
pub struct ConsoleSink {
    progress: Option<ProgressBar>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn print(&self, line: String) {
        match &self.progress {
            // println on the bar is dropped when its target is hidden
            Some(pb) => pb.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }
}

impl ProgressSink for ConsoleSink {
    fn emit(&mut self, event: ProgressEvent) {
        match &event {
            ProgressEvent::Started { root, candidates } => {
                OutputFormatter::info(&format!("Organizing contents of: {}", root.display()));
                self.progress = Some(OutputFormatter::create_progress_bar(*candidates as u64));
                return;
            }
            ProgressEvent::Finished(summary) => {
                if let Some(pb) = self.progress.take() {
                    pb.finish_and_clear();
                }
                OutputFormatter::summary(summary);
                return;
            }
            _ => {}
        }

        if event.is_reportable() {
            self.print(OutputFormatter::styled_line(&event));
        }
        if event.completes_file()
            && let Some(pb) = &self.progress
        {
            pb.inc(1);
        }
    }
}
