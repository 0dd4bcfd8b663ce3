//! Drawing for the main screen and the directory browser.

use super::app::{App, Focus, LogLevel, Screen};
use super::browser::DirectoryBrowser;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

pub fn draw(frame: &mut Frame, app: &App) {
    match &app.screen {
        Screen::Main => draw_main(frame, app),
        Screen::Browser(browser) => draw_browser(frame, browser),
    }
}

fn draw_main(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Toolbar
            Constraint::Min(3),    // Log
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let title = if app.is_dry_run() {
        " mediatidy (dry run) "
    } else {
        " mediatidy "
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(title, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::raw(" sort media into title folders"),
    ]));
    frame.render_widget(header, chunks[0]);

    draw_toolbar(frame, app, chunks[1]);
    draw_log(frame, app, chunks[2]);

    let help = if app.quit_requested() {
        "Waiting for the current run to finish before quitting..."
    } else if app.focus == Focus::Input {
        "Enter: browse | Tab: next control | Esc: leave input | Ctrl-C: quit"
    } else {
        "b: browse | s: start | c: clear | PgUp/PgDn/End: scroll log | Tab: next | q: quit"
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn draw_toolbar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(13),
            Constraint::Length(11),
        ])
        .split(area);

    let input_area = chunks[0];
    let width = (input_area.width.saturating_sub(2) as usize).max(1);
    let offset = (app.input.cursor() + 1).saturating_sub(width);
    let visible: String = app.input.value().chars().skip(offset).take(width).collect();
    let input = Paragraph::new(visible).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus == Focus::Input))
            .title("Folder to organize"),
    );
    frame.render_widget(input, input_area);

    if app.focus == Focus::Input && matches!(app.screen, Screen::Main) {
        let x = input_area.x + 1 + (app.input.cursor() - offset) as u16;
        frame.set_cursor_position((x, input_area.y + 1));
    }

    let running = app.is_running();
    let buttons = [
        (Focus::Browse, "Browse…", Color::Reset),
        (
            Focus::Start,
            if running { "Running…" } else { "Start" },
            if running { Color::DarkGray } else { Color::Green },
        ),
        (Focus::Clear, "Clear", Color::Yellow),
    ];
    for ((focus, label, color), area) in buttons.into_iter().zip(chunks.iter().skip(1)) {
        let button = Paragraph::new(Span::styled(label, Style::default().fg(color)))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(focus_style(app.focus == focus)),
            );
        frame.render_widget(button, *area);
    }
}

fn draw_log(frame: &mut Frame, app: &App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .log
        .visible(height)
        .map(|line| {
            let style = match line.level {
                LogLevel::Info => Style::default(),
                LogLevel::Success => Style::default().fg(Color::Green),
                LogLevel::Warning => Style::default().fg(Color::Yellow),
                LogLevel::Error => Style::default().fg(Color::Red),
            };
            Line::styled(line.text.as_str(), style)
        })
        .collect();

    let title = if app.log.scroll_back() > 0 {
        format!("Log (scrolled back {} lines, End to follow)", app.log.scroll_back())
    } else {
        "Log".to_string()
    };
    let log = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(title),
    );
    frame.render_widget(log, area);
}

fn draw_browser(frame: &mut Frame, browser: &DirectoryBrowser) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Current directory
            Constraint::Min(3),    // Subdirectories
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let current = Paragraph::new(browser.current().display().to_string())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("↑ Up: Backspace / u"));
    frame.render_widget(current, chunks[0]);

    let items: Vec<ListItem> = if let Some(error) = browser.error() {
        vec![ListItem::new(error.to_string()).style(Style::default().fg(Color::Red))]
    } else if browser.entries().is_empty() {
        vec![ListItem::new("(no subdirectories)").style(Style::default().fg(Color::DarkGray))]
    } else {
        browser
            .entries()
            .iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                ListItem::new(format!("{}/", name))
            })
            .collect()
    };

    let mut list_state = ListState::default();
    if !browser.entries().is_empty() {
        list_state.select(Some(browser.selected()));
    }
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Directories"))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("► ");
    frame.render_stateful_widget(list, chunks[1], &mut list_state);

    let help = "↑/↓: move | →: open | ←/Backspace: parent | Enter: choose highlighted | \
                Space: choose this folder | Esc: cancel";
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}
