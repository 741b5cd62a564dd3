use crate::models::SelectionKey;
use crate::session::{Intent, QuizMode, Session, SessionState};

/// A selectable row on one of the menu screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub detail: String,
    pub intent: Intent,
}

/// The session plus cursor state that only the terminal UI cares about.
pub struct App {
    session: Session,
    menu_cursor: usize,
    answer_cursor: usize,
    result_scroll: usize,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            menu_cursor: 0,
            answer_cursor: 0,
            result_scroll: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn menu_cursor(&self) -> usize {
        self.menu_cursor
    }

    pub fn answer_cursor(&self) -> usize {
        self.answer_cursor
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    /// Forward an intent, resetting cursors whenever the screen or question changes.
    pub fn dispatch(&mut self, intent: Intent) {
        let before = self.position();
        self.session.dispatch(intent);
        if self.position() != before {
            self.menu_cursor = 0;
            self.answer_cursor = 0;
            self.result_scroll = 0;
        }
    }

    fn position(&self) -> (&'static str, usize) {
        let index = match self.state() {
            SessionState::Active(quiz) => quiz.index(),
            _ => 0,
        };
        (self.state().name(), index)
    }

    /// Rows for the current selection screen; empty elsewhere.
    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        let hierarchy = self.session.hierarchy();

        match self.state() {
            SessionState::ProgramSelect => hierarchy
                .programs
                .iter()
                .map(|(id, name)| MenuEntry {
                    label: name.clone(),
                    detail: String::new(),
                    intent: Intent::SelectProgram(id.clone()),
                })
                .collect(),
            SessionState::TopicSelect { program } => hierarchy
                .topics(program)
                .into_iter()
                .flatten()
                .map(|(id, topic)| MenuEntry {
                    label: topic.name.clone(),
                    detail: format!(
                        "{} sections · {} questions",
                        topic.blocks.len(),
                        topic.question_count()
                    ),
                    intent: Intent::SelectTopic(id.clone()),
                })
                .collect(),
            SessionState::BlockSelect { program, topic } => hierarchy
                .topic(program, topic)
                .into_iter()
                .flat_map(|t| t.blocks.iter())
                .map(|(id, block)| {
                    let stats = self
                        .session
                        .block_stats(&SelectionKey::new(program.clone(), topic.clone(), id.clone()));
                    let mut detail = format!("{} questions", block.questions.len());
                    if stats.total > 0 {
                        detail.push_str(&format!(
                            " · accuracy {}% · answered {}",
                            stats.accuracy(),
                            stats.total
                        ));
                    }
                    MenuEntry {
                        label: block.name.clone(),
                        detail,
                        intent: Intent::SelectBlock(id.clone()),
                    }
                })
                .collect(),
            SessionState::ModeSelect { key } => {
                let stats = self.session.block_stats(key);
                let mut entries = vec![MenuEntry {
                    label: "All questions".to_string(),
                    detail: "Go through every question in order".to_string(),
                    intent: Intent::SelectMode(QuizMode::All),
                }];
                if stats.has_mistakes() {
                    entries.push(MenuEntry {
                        label: "Work on mistakes".to_string(),
                        detail: format!(
                            "{} questions you got wrong",
                            stats.incorrect_questions.len()
                        ),
                        intent: Intent::SelectMode(QuizMode::Mistakes),
                    });
                }
                entries
            }
            _ => Vec::new(),
        }
    }

    pub fn select_next_entry(&mut self) {
        let count = self.menu_entries().len();
        if count > 0 {
            self.menu_cursor = (self.menu_cursor + 1) % count;
        }
    }

    pub fn select_previous_entry(&mut self) {
        let count = self.menu_entries().len();
        if count > 0 {
            self.menu_cursor = (self.menu_cursor + count - 1) % count;
        }
    }

    /// Choose the highlighted menu row.
    pub fn activate_entry(&mut self) {
        if let Some(entry) = self.menu_entries().into_iter().nth(self.menu_cursor) {
            self.dispatch(entry.intent);
        }
    }

    fn answer_count(&self) -> usize {
        match self.state() {
            SessionState::Active(quiz) => quiz
                .current()
                .map(|q| q.question.answers.len())
                .unwrap_or(0),
            _ => 0,
        }
    }

    fn answer_locked(&self) -> bool {
        matches!(self.state(), SessionState::Active(quiz) if quiz.is_answered())
    }

    pub fn select_next_answer(&mut self) {
        let count = self.answer_count();
        if count > 0 && !self.answer_locked() {
            self.answer_cursor = (self.answer_cursor + 1) % count;
        }
    }

    pub fn select_previous_answer(&mut self) {
        let count = self.answer_count();
        if count > 0 && !self.answer_locked() {
            self.answer_cursor = (self.answer_cursor + count - 1) % count;
        }
    }

    /// Submit the highlighted answer, or move on once it has been checked.
    pub fn confirm(&mut self) {
        let SessionState::Active(quiz) = self.state() else {
            return;
        };
        if quiz.is_answered() {
            self.dispatch(Intent::NextQuestion);
            return;
        }
        let answer_id = quiz
            .current()
            .and_then(|q| q.question.answers.get_index(self.answer_cursor))
            .map(|(id, _)| id.clone());
        if let Some(id) = answer_id {
            self.dispatch(Intent::SelectAnswer(id));
            self.dispatch(Intent::SubmitAnswer);
        }
    }

    pub fn scroll_results_down(&mut self) {
        if let SessionState::Results(quiz) = self.state() {
            let max_scroll = quiz.answers().len().saturating_sub(1);
            self.result_scroll = (self.result_scroll + 1).min(max_scroll);
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }
}
