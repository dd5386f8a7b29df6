//! Rendering of each screen.

use super::app::{App, Confirmation, QuizView, Screen, MENU_ITEMS};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(frame: &mut Frame, app: &App) {
    let [body, status] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    match app.screen() {
        Screen::Menu => render_menu(frame, body),
        Screen::CountForm { input } => render_count_form(frame, body, input),
        Screen::Quiz(view) => render_quiz(frame, body, view),
        Screen::Notice { message } => render_notice(frame, body, message),
        Screen::Confirm(confirmation) => render_confirm(frame, body, *confirmation),
    }

    render_status(frame, status, app);
}

fn render_menu(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = MENU_ITEMS
        .iter()
        .map(|(key, label)| {
            Line::from(vec![
                Span::styled(format!(" [{}] ", key), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw(*label),
            ])
        })
        .collect();

    let menu = Paragraph::new(lines).block(titled("Vocabulary Trainer"));
    frame.render_widget(menu, area);
}

fn render_count_form(frame: &mut Frame, area: Rect, input: &str) {
    let [field, help] = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

    let form = Paragraph::new(input).block(titled("Number of words"));
    frame.render_widget(form, field);
    frame.set_cursor_position((field.x + 1 + input.chars().count() as u16, field.y + 1));

    let hint = Paragraph::new("Enter: start   Esc: cancel").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, help);
}

fn render_quiz(frame: &mut Frame, area: Rect, view: &QuizView) {
    let [prompt_area, answer_area, input_area, help] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(1),
    ])
    .areas(area);

    let session = &view.session;
    let progress = format!(
        "Word {}/{}   Correct {}",
        session.current_index() + 1,
        session.total(),
        session.correct_count()
    );

    let prompt = Paragraph::new(session.current_prompt().unwrap_or_default())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(titled(&progress));
    frame.render_widget(prompt, prompt_area);

    let answer = Paragraph::new(view.revealed.as_deref().unwrap_or_default())
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Center)
        .block(titled("Answer"));
    frame.render_widget(answer, answer_area);

    let input = Paragraph::new(view.input.as_str()).block(titled("Type the translation"));
    frame.render_widget(input, input_area);
    frame.set_cursor_position((
        input_area.x + 1 + view.input.chars().count() as u16,
        input_area.y + 1,
    ));

    let audio = if session.audio_enabled() { "Turn off audio" } else { "Turn on audio" };
    let hint = Paragraph::new(format!(
        "F2: play audio again   F3: show answer   F4: {}   Esc: menu",
        audio
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, help);
}

fn render_notice(frame: &mut Frame, area: Rect, message: &str) {
    let notice = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::default(),
        Line::from("Press any key to continue").fg(Color::DarkGray),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(titled("Notice"));
    frame.render_widget(notice, area);
}

fn render_confirm(frame: &mut Frame, area: Rect, confirmation: Confirmation) {
    let (question, keys) = match confirmation {
        Confirmation::RepeatDecay => (
            "Points were already decreased today. Decrease again?",
            "y / Enter: decrease   n / Esc: back",
        ),
        Confirmation::QuitUnsaved => (
            "Scores changed since the last update.",
            "u: update and quit   Enter: quit anyway   Esc: back",
        ),
    };

    let confirm = Paragraph::new(vec![
        Line::from(question),
        Line::default(),
        Line::from(keys).fg(Color::Yellow),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(titled("Confirm"));
    frame.render_widget(confirm, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::raw(format!(
        " {} words from {}",
        app.deck().len(),
        app.source_name()
    ))];
    if app.is_dirty() {
        spans.push(Span::styled("  [unsaved]", Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn titled(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).title(title)
}
