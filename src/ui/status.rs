//! Single-message screens: loading, load failures and the not-found dead end.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render_loading(frame: &mut Frame, area: Rect) {
    render_card(
        frame,
        area,
        Line::from(Span::styled("Loading questions...", Style::default().fg(Color::Yellow))),
        None,
        "q quit",
    );
}

pub fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    render_card(
        frame,
        area,
        Line::from(Span::styled("LOAD FAILED", Style::default().fg(Color::Red).bold())),
        Some(message),
        "restart the app to try again  ·  q quit",
    );
}

pub fn render_empty(frame: &mut Frame, area: Rect) {
    render_card(
        frame,
        area,
        Line::from(Span::styled("NO QUESTIONS", Style::default().fg(Color::Yellow).bold())),
        Some("The question bank is empty. Add questions to all_questions.json."),
        "q quit",
    );
}

pub fn render_not_found(frame: &mut Frame, area: Rect) {
    render_card(
        frame,
        area,
        Line::from(Span::styled("Question not found", Style::default().fg(Color::Gray))),
        None,
        "m main menu  ·  q quit",
    );
}

fn render_card(frame: &mut Frame, area: Rect, title: Line, body: Option<&str>, controls: &str) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .split(area);
    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(70),
        Constraint::Fill(1),
    ])
    .split(chunks[1]);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "EXAM PREP",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        title,
        Line::from(""),
    ];
    if let Some(body) = body {
        content.push(Line::from(body.fg(Color::Gray)));
        content.push(Line::from(""));
    }
    content.push(Line::from(controls.fg(Color::DarkGray)));

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );

    frame.render_widget(widget, columns[1]);
}
