use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::models::Question;
use crate::session::ActiveQuiz;

pub fn render(frame: &mut Frame, area: Rect, quiz: &ActiveQuiz, cursor: usize) {
    let Some(current) = quiz.current() else {
        return;
    };
    let question = &current.question;

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(if quiz.is_answered() { 5 } else { 0 }),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_progress(frame, chunks[0], quiz);
    render_gauge(frame, chunks[1], quiz);
    render_question_text(frame, chunks[2], &question.text);
    render_options(frame, chunks[3], quiz, question, cursor);
    if quiz.is_answered() {
        render_verdict(frame, chunks[4], quiz, question);
    }
    render_controls(frame, chunks[5], quiz);
}

fn render_progress(frame: &mut Frame, area: Rect, quiz: &ActiveQuiz) {
    let progress = format!(
        "Question {} of {}",
        quiz.index() + 1,
        quiz.questions().len()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_gauge(frame: &mut Frame, area: Rect, quiz: &ActiveQuiz) {
    let total = quiz.questions().len().max(1);
    let ratio = (quiz.index() + 1) as f64 / total as f64;
    let widget = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .label("")
        .ratio(ratio.min(1.0));
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    quiz: &ActiveQuiz,
    question: &Question,
    cursor: usize,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.answers.len() * 2);

    for (index, (answer_id, answer_text)) in question.answers.iter().enumerate() {
        let is_chosen = quiz.selected_answer() == Some(answer_id.as_str());
        let (marker, style) = if quiz.is_answered() {
            if question.is_correct(answer_id) {
                ("+", Style::default().fg(Color::Green).bold())
            } else if is_chosen {
                ("-", Style::default().fg(Color::Red).bold())
            } else {
                (" ", Style::default().fg(Color::DarkGray))
            }
        } else if index == cursor {
            (">", Style::default().fg(Color::Cyan).bold())
        } else {
            (" ", Style::default().fg(Color::Gray))
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", answer_id), style),
            Span::styled(answer_text.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_verdict(frame: &mut Frame, area: Rect, quiz: &ActiveQuiz, question: &Question) {
    let is_correct = quiz.last_answer().is_some_and(|a| a.is_correct);
    let (verdict, color) = if is_correct {
        ("Correct!", Color::Green)
    } else {
        ("Incorrect", Color::Red)
    };

    let mut content = vec![Line::from(Span::styled(
        verdict,
        Style::default().fg(color).bold(),
    ))];
    if let Some(article) = question.article() {
        content.push(Line::from(vec![
            Span::styled("Basis: ", Style::default().fg(Color::Gray).bold()),
            Span::styled(article, Style::default().fg(Color::Gray)),
        ]));
    }

    let widget = Paragraph::new(content).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, quiz: &ActiveQuiz) {
    let text = match (quiz.is_answered(), quiz.is_last()) {
        (false, _) => "j/k navigate  ·  enter answer  ·  m menu  ·  q quit",
        (true, false) => "enter next question  ·  m menu  ·  q quit",
        (true, true) => "enter show results  ·  m menu  ·  q quit",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
