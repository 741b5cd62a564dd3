use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{App, MenuEntry};
use crate::models::BlockStats;
use crate::session::SessionState;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let (title, subtitle) = heading(app);
    let stats = match app.state() {
        SessionState::ModeSelect { key } => Some(app.session().block_stats(key)),
        _ => None,
    }
    .filter(|stats| stats.total > 0);

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(if stats.is_some() { 5 } else { 0 }),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_heading(frame, chunks[0], &title, &subtitle);
    if let Some(stats) = stats {
        render_block_stats(frame, chunks[1], &stats);
    }
    render_entries(frame, chunks[2], &app.menu_entries(), app.menu_cursor());
    render_controls(frame, chunks[3], app.state());
}

fn heading(app: &App) -> (String, String) {
    let hierarchy = app.session().hierarchy();

    match app.state() {
        SessionState::TopicSelect { .. } => ("Choose a topic".to_string(), String::new()),
        SessionState::BlockSelect { program, topic } => (
            hierarchy
                .topic(program, topic)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            "Choose a section to study".to_string(),
        ),
        SessionState::ModeSelect { key } => {
            let block = hierarchy.block(&key.program, &key.topic, &key.block);
            (
                block.map(|b| b.name.clone()).unwrap_or_default(),
                format!("{} questions", block.map(|b| b.questions.len()).unwrap_or(0)),
            )
        }
        _ => (
            "Exam preparation".to_string(),
            format!(
                "Choose a program  ·  {} questions in the bank",
                app.session().question_count()
            ),
        ),
    }
}

fn render_heading(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let content = vec![
        Line::from(Span::styled(title, Style::default().fg(Color::Cyan).bold())),
        Line::from(subtitle.fg(Color::DarkGray)),
    ];
    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_block_stats(frame: &mut Frame, area: Rect, stats: &BlockStats) {
    let content = vec![
        Line::from(vec![
            Span::styled(format!("{:>8}", stats.total), Style::default().fg(Color::Cyan).bold()),
            Span::styled(format!("{:>10}", stats.correct), Style::default().fg(Color::Green).bold()),
            Span::styled(
                format!("{:>9}%", stats.accuracy()),
                Style::default().fg(Color::Magenta).bold(),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:>8}", "total"), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{:>10}", "correct"), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{:>10}", "accuracy"), Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Your statistics ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_entries(frame: &mut Frame, area: Rect, entries: &[MenuEntry], cursor: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(entries.len() * 3);

    for (index, entry) in entries.iter().enumerate() {
        let is_selected = index == cursor;
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(entry.label.as_str(), style),
        ]));
        if !entry.detail.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("   {}", entry.detail),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
    }

    // Keep the highlighted row visible on long topic lists.
    let rows_before: usize = entries
        .iter()
        .take(cursor)
        .map(|e| if e.detail.is_empty() { 2 } else { 3 })
        .sum();
    let scroll = rows_before.saturating_sub(area.height.saturating_sub(3) as usize);

    let widget = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, state: &SessionState) {
    let text = if matches!(state, SessionState::ProgramSelect) {
        "j/k navigate  ·  enter select  ·  q quit"
    } else {
        "j/k navigate  ·  enter select  ·  esc back  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
