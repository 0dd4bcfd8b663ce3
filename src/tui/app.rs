//! Application state and key handling for the terminal UI.

use super::browser::DirectoryBrowser;
use super::worker::{Worker, WorkerMessage};
use crate::file_organizer::FileOrganizer;
use crate::progress::ProgressEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Oldest lines are dropped past this many.
pub const MAX_LOG_LINES: usize = 10_000;

const PAGE: usize = 10;

/// Which control on the main screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Browse,
    Start,
    Clear,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Input, Focus::Browse, Focus::Start, Focus::Clear];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
}

/// Scrolling log with follow mode.
#[derive(Debug, Default)]
pub struct LogView {
    lines: VecDeque<LogLine>,
    /// Lines scrolled back from the bottom; zero means following new output.
    scroll_back: usize,
}

impl LogView {
    pub fn push(&mut self, level: LogLevel, text: impl Into<String>) {
        if self.lines.len() == MAX_LOG_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(LogLine {
            level,
            text: text.into(),
        });
        if self.scroll_back > 0 {
            // Keep the viewport on the same lines while new output arrives
            self.scroll_back = (self.scroll_back + 1).min(self.lines.len());
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll_back = 0;
    }

    pub fn lines(&self) -> &VecDeque<LogLine> {
        &self.lines
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.scroll_back = (self.scroll_back + by).min(self.lines.len().saturating_sub(1));
    }

    pub fn scroll_down(&mut self, by: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(by);
    }

    pub fn follow(&mut self) {
        self.scroll_back = 0;
    }

    /// The window of lines to show in a viewport `height` lines tall.
    pub fn visible(&self, height: usize) -> impl Iterator<Item = &LogLine> {
        let end = self.lines.len() - self.scroll_back.min(self.lines.len());
        let start = end.saturating_sub(height);
        self.lines.range(start..end)
    }
}

/// Single-line text input with a cursor counted in characters.
#[derive(Debug, Clone, Default)]
pub struct PathInput {
    value: String,
    cursor: usize,
}

impl PathInput {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set(&mut self, value: &str) {
        *self = Self::new(value);
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }
}

pub enum Screen {
    Main,
    Browser(DirectoryBrowser),
}

/// Whole UI state. Everything here lives on the UI thread.
pub struct App {
    pub input: PathInput,
    pub focus: Focus,
    pub screen: Screen,
    pub log: LogView,
    worker: Worker,
    organizer: FileOrganizer,
    quit_requested: bool,
}

impl App {
    pub fn new(initial_path: &Path, organizer: FileOrganizer) -> Self {
        Self {
            input: PathInput::new(&initial_path.display().to_string()),
            focus: Focus::Start,
            screen: Screen::Main,
            log: LogView::default(),
            worker: Worker::new(),
            organizer,
            quit_requested: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.state().is_running()
    }

    pub fn is_dry_run(&self) -> bool {
        self.organizer.is_dry_run()
    }

    /// Quitting waits for an active run to finish; there is no cancellation.
    pub fn should_quit(&self) -> bool {
        self.quit_requested && !self.is_running()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    fn request_quit(&mut self) {
        if self.is_running() && !self.quit_requested {
            self.log
                .push(LogLevel::Warning, "Waiting for the current run to finish...");
        }
        self.quit_requested = true;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.request_quit();
            return;
        }

        if matches!(self.screen, Screen::Browser(_)) {
            self.handle_browser_key(key);
        } else {
            self.handle_main_key(key);
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return;
            }
            KeyCode::PageUp => {
                self.log.scroll_up(PAGE);
                return;
            }
            KeyCode::PageDown => {
                self.log.scroll_down(PAGE);
                return;
            }
            _ => {}
        }

        if self.focus == Focus::Input {
            match key.code {
                KeyCode::Enter => self.open_browser(),
                KeyCode::Esc => self.focus = Focus::Start,
                KeyCode::Backspace => self.input.backspace(),
                KeyCode::Delete => self.input.delete(),
                KeyCode::Left => self.input.left(),
                KeyCode::Right => self.input.right(),
                KeyCode::Home => self.input.home(),
                KeyCode::End => self.input.end(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.input.insert(c)
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(self.focus),
            KeyCode::Left => self.focus = self.focus.prev(),
            KeyCode::Right => self.focus = self.focus.next(),
            KeyCode::End => self.log.follow(),
            KeyCode::Char('b') => self.open_browser(),
            KeyCode::Char('s') => self.start_run(),
            KeyCode::Char('c') => self.log.clear(),
            KeyCode::Char('q') => self.request_quit(),
            _ => {}
        }
    }

    fn activate(&mut self, focus: Focus) {
        match focus {
            Focus::Input => self.focus = Focus::Input,
            Focus::Browse => self.open_browser(),
            Focus::Start => self.start_run(),
            Focus::Clear => self.log.clear(),
        }
    }

    fn handle_browser_key(&mut self, key: KeyEvent) {
        let Screen::Browser(browser) = &mut self.screen else {
            return;
        };

        let chosen = match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                browser.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                browser.select_next();
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                browser.descend();
                None
            }
            KeyCode::Left | KeyCode::Backspace | KeyCode::Char('u') | KeyCode::Char('h') => {
                browser.go_up();
                None
            }
            KeyCode::Enter => Some(browser.choice()),
            KeyCode::Char(' ') | KeyCode::Char('.') => Some(browser.current().to_path_buf()),
            KeyCode::Esc | KeyCode::Char('q') => {
                self.screen = Screen::Main;
                return;
            }
            _ => None,
        };

        if let Some(path) = chosen {
            self.choose_path(&path);
        }
    }

    pub fn open_browser(&mut self) {
        let start = resolve_input_path(self.input.value());
        self.screen = Screen::Browser(DirectoryBrowser::open(&start));
    }

    fn choose_path(&mut self, path: &Path) {
        self.input.set(&path.display().to_string());
        self.screen = Screen::Main;
        self.focus = Focus::Start;
    }

    /// Starts organizing the folder in the path input.
    ///
    /// Does nothing while a run is active.
    pub fn start_run(&mut self) {
        if self.is_running() || self.quit_requested {
            return;
        }

        let folder = resolve_input_path(self.input.value());
        if !folder.is_dir() {
            self.log.push(
                LogLevel::Error,
                format!("[ERROR] {} is not a directory.", folder.display()),
            );
            return;
        }

        self.log.follow();
        self.log
            .push(LogLevel::Info, format!("Organizing: {}", folder.display()));
        if let Err(e) = self.worker.start(self.organizer.clone(), folder) {
            self.log
                .push(LogLevel::Error, format!("[ERROR] Cannot start worker: {}", e));
        }
    }

    /// Moves finished worker output into the log. Called once per UI tick.
    pub fn tick(&mut self) {
        for message in self.worker.poll() {
            match message {
                WorkerMessage::Event(event) => {
                    if event.is_reportable() {
                        self.log.push(level_of(&event), event.to_string());
                    }
                }
                WorkerMessage::Finished(Ok(_)) => {}
                WorkerMessage::Finished(Err(e)) => {
                    self.log.push(LogLevel::Error, format!("[ERROR] {}", e));
                }
                WorkerMessage::Aborted => {
                    self.log
                        .push(LogLevel::Error, "[ERROR] The organizer stopped unexpectedly.");
                }
            }
        }
    }
}

fn level_of(event: &ProgressEvent) -> LogLevel {
    match event {
        ProgressEvent::Moved { .. } | ProgressEvent::WouldMove { .. } => LogLevel::Success,
        ProgressEvent::AlreadyExists { .. } => LogLevel::Warning,
        ProgressEvent::Failed { .. } | ProgressEvent::SyncFailed { .. } => LogLevel::Error,
        _ => LogLevel::Info,
    }
}

/// Turns the text in the path input into a directory path.
///
/// Empty input means the current directory and a leading `~` is the home
/// directory. Paths that exist are canonicalized.
pub fn resolve_input_path(input: &str) -> PathBuf {
    let trimmed = input.trim();
    let raw = if trimmed.is_empty() { "." } else { trimmed };

    let home_relative = if raw == "~" {
        dirs::home_dir()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(rest))
    } else {
        None
    };

    let path = home_relative.unwrap_or_else(|| PathBuf::from(raw));
    path.canonicalize().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn log_texts(app: &App) -> Vec<String> {
        app.log.lines().iter().map(|l| l.text.clone()).collect()
    }

    fn wait_until_idle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.is_running() && Instant::now() < deadline {
            app.tick();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!app.is_running(), "run did not finish in time");
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Focus::Input.next(), Focus::Browse);
        assert_eq!(Focus::Clear.next(), Focus::Input);
        assert_eq!(Focus::Input.prev(), Focus::Clear);
    }

    #[test]
    fn test_path_input_editing_with_multibyte_chars() {
        let mut input = PathInput::new("/mnt/ä");
        input.left();
        input.insert('x');
        assert_eq!(input.value(), "/mnt/xä");
        input.end();
        input.backspace();
        assert_eq!(input.value(), "/mnt/x");
        input.home();
        input.delete();
        assert_eq!(input.value(), "mnt/x");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_log_view_caps_and_scrolls() {
        let mut log = LogView::default();
        for i in 0..MAX_LOG_LINES + 5 {
            log.push(LogLevel::Info, format!("line {}", i));
        }
        assert_eq!(log.lines().len(), MAX_LOG_LINES);
        assert_eq!(log.lines().front().unwrap().text, "line 5");

        let last: Vec<_> = log.visible(2).map(|l| l.text.clone()).collect();
        assert_eq!(
            last,
            vec![
                format!("line {}", MAX_LOG_LINES + 3),
                format!("line {}", MAX_LOG_LINES + 4)
            ]
        );

        log.scroll_up(3);
        let earlier: Vec<_> = log.visible(1).map(|l| l.text.clone()).collect();
        assert_eq!(earlier, vec![format!("line {}", MAX_LOG_LINES + 1)]);

        log.follow();
        assert_eq!(log.scroll_back(), 0);
        log.clear();
        assert_eq!(log.visible(5).count(), 0);
    }

    #[test]
    fn test_typing_into_path_input() {
        let mut app = App::new(Path::new(""), FileOrganizer::default());
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::Input);

        type_text(&mut app, "/tmp/q");
        assert_eq!(app.input.value(), "/tmp/q");

        // 'q' while typing is text, not quit
        assert!(!app.quit_requested());
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_start_with_invalid_root_logs_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing");
        let mut app = App::new(&missing, FileOrganizer::default());

        app.start_run();

        assert!(!app.is_running());
        let lines = log_texts(&app);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[ERROR]"));
        assert!(lines[0].ends_with("is not a directory."));
    }

    #[test]
    fn test_start_is_not_reentrant() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("[Group] Show - 01 [ABCDEF12].mkv"), "ep").unwrap();
        let mut app = App::new(root, FileOrganizer::default());

        press(&mut app, KeyCode::Char('s'));
        assert!(app.is_running());
        press(&mut app, KeyCode::Enter); // focus is on Start
        press(&mut app, KeyCode::Char('s'));

        wait_until_idle(&mut app);
        let lines = log_texts(&app);
        assert_eq!(lines.iter().filter(|l| l.starts_with("Organizing:")).count(), 1);
        assert!(lines.contains(&"moved: [Group] Show - 01 [ABCDEF12].mkv → Show/".to_string()));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Done. 1 file(s) moved; folder timestamps updated.")
        );
        assert!(root.join("Show").join("[Group] Show - 01 [ABCDEF12].mkv").is_file());
    }

    #[test]
    fn test_quit_waits_for_running_worker() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut app = App::new(temp_dir.path(), FileOrganizer::default());

        app.start_run();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        // The worker only reports Idle once its result is drained by tick()
        assert!(app.quit_requested());
        assert!(app.is_running());
        assert!(!app.should_quit());

        wait_until_idle(&mut app);
        assert!(app.should_quit());
    }

    #[test]
    fn test_browser_choose_fills_input() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().canonicalize().unwrap();
        fs::create_dir(root.join("Anime")).unwrap();
        let mut app = App::new(&root, FileOrganizer::default());

        press(&mut app, KeyCode::Char('b'));
        assert!(matches!(app.screen, Screen::Browser(_)));
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.screen, Screen::Main));
        assert_eq!(app.input.value(), root.join("Anime").display().to_string());
        assert_eq!(app.focus, Focus::Start);
    }

    #[test]
    fn test_browser_escape_keeps_input() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut app = App::new(temp_dir.path(), FileOrganizer::default());
        let before = app.input.value().to_string();

        app.open_browser();
        press(&mut app, KeyCode::Char('u'));
        press(&mut app, KeyCode::Esc);

        assert!(matches!(app.screen, Screen::Main));
        assert_eq!(app.input.value(), before);
    }

    #[test]
    fn test_clear_button() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut app = App::new(&temp_dir.path().join("missing"), FileOrganizer::default());
        app.start_run();
        assert!(!app.log.lines().is_empty());

        press(&mut app, KeyCode::Tab); // Start -> Clear
        assert_eq!(app.focus, Focus::Clear);
        press(&mut app, KeyCode::Enter);
        assert!(app.log.lines().is_empty());
    }

    #[test]
    fn test_resolve_input_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let canonical = temp_dir.path().canonicalize().unwrap();

        assert_eq!(resolve_input_path(&format!("  {}  ", temp_dir.path().display())), canonical);
        assert_eq!(
            resolve_input_path(""),
            PathBuf::from(".").canonicalize().unwrap()
        );
        if let Some(home) = dirs::home_dir() {
            let expected = home.join("definitely-missing-dir");
            assert_eq!(resolve_input_path("~/definitely-missing-dir"), expected);
        }
    }
}
