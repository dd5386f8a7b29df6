//! Terminal front end.

pub mod app;
pub mod ui;

pub use app::{App, Confirmation, QuizView, Screen};

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::Terminal;
use std::io::{self, stdout, Stdout};

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Switch to raw mode on the alternate screen.
pub fn init() -> io::Result<AppTerminal> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore().ok();
        hook(info);
    }));

    Terminal::new(CrosstermBackend::new(stdout()))
}

pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Take over the terminal until the user quits.
pub fn run(app: &mut App) -> io::Result<()> {
    let mut terminal = init()?;
    let result = run_event_loop(&mut terminal, app);
    restore()?;
    result
}

fn run_event_loop(terminal: &mut AppTerminal, app: &mut App) -> io::Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                app.request_quit();
            } else {
                app.handle_key(key.code);
            }
        }
    }

    Ok(())
}
