//! Interactive terminal interface.
//!
//! A path input with a directory browser, Start/Clear controls and a log view
//! fed by a background organizer run.

pub mod app;
pub mod browser;
mod render;
pub mod worker;

pub use app::App;
pub use browser::DirectoryBrowser;
pub use worker::{RunState, Worker, WorkerMessage};

use crate::file_organizer::FileOrganizer;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::path::Path;
use std::time::Duration;

/// How long to wait for input before draining worker output and redrawing.
const TICK: Duration = Duration::from_millis(100);

/// Runs the terminal UI until the user quits.
pub fn run(initial_path: &Path, organizer: FileOrganizer) -> io::Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(initial_path, organizer);

    let res = event_loop(&mut terminal, &mut app);

    // Restore before reporting so the error is readable
    restore_terminal(&mut terminal)?;
    res
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit() {
        app.tick();
        terminal.draw(|frame| render::draw(frame, app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }
    }
    Ok(())
}

pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}
