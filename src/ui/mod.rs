mod menu;
mod quiz;
mod result;
mod status;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::session::SessionState;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state() {
        SessionState::Loading => status::render_loading(frame, area),
        SessionState::Error { message } => status::render_error(frame, area, message),
        SessionState::Empty => status::render_empty(frame, area),
        SessionState::ProgramSelect
        | SessionState::TopicSelect { .. }
        | SessionState::BlockSelect { .. }
        | SessionState::ModeSelect { .. } => menu::render(frame, area, app),
        SessionState::Active(quiz) => match quiz.current() {
            Some(_) => quiz::render(frame, area, quiz, app.answer_cursor()),
            None => status::render_not_found(frame, area),
        },
        SessionState::Results(quiz) => result::render(frame, area, quiz, app.result_scroll()),
    }
}
