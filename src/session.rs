//! Navigation and quiz-taking state machine.
//!
//! The session walks program → topic → block → mode selection, runs a quiz
//! over the chosen block and ends on a results screen. Every user intent is
//! applied synchronously; intents that make no sense in the current state are
//! ignored.

use std::sync::Arc;

use crate::data::LoadError;
use crate::models::{percentage, BlockStats, Hierarchy, HierarchyCache, Question, SelectionKey};
use crate::statistics::StatisticsStore;

/// Which questions of a block a quiz runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    All,
    /// Only the questions whose last answer was wrong.
    Mistakes,
}

/// One answered question within the current attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswer {
    /// Position within the quiz, not within the block.
    pub question_index: usize,
    pub selected_answer: String,
    pub is_correct: bool,
}

/// A question picked for the quiz together with its position in the block.
#[derive(Debug, Clone)]
pub struct QuizQuestion {
    pub block_index: usize,
    pub question: Arc<Question>,
}

/// Aggregate result of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
}

impl Score {
    pub fn from_answers(answers: &[SessionAnswer]) -> Self {
        let correct = answers.iter().filter(|a| a.is_correct).count();
        let total = answers.len();
        Self {
            correct,
            total,
            percentage: percentage(correct, total),
        }
    }
}

/// An attempt in progress (or just finished, when held by `Results`).
#[derive(Debug, Clone)]
pub struct ActiveQuiz {
    key: SelectionKey,
    mode: QuizMode,
    questions: Vec<QuizQuestion>,
    index: usize,
    selected: Option<String>,
    answered: bool,
    answers: Vec<SessionAnswer>,
}

impl ActiveQuiz {
    fn start(key: SelectionKey, mode: QuizMode, questions: Vec<QuizQuestion>) -> Self {
        Self {
            key,
            mode,
            questions,
            index: 0,
            selected: None,
            answered: false,
            answers: Vec::new(),
        }
    }

    pub fn key(&self) -> &SelectionKey {
        &self.key
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The question on screen, or `None` when the filtered set has nothing at this index.
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.index)
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    pub fn answers(&self) -> &[SessionAnswer] {
        &self.answers
    }

    /// Outcome of the submitted answer for the current question.
    pub fn last_answer(&self) -> Option<&SessionAnswer> {
        if self.answered { self.answers.last() } else { None }
    }

    pub fn score(&self) -> Score {
        Score::from_answers(&self.answers)
    }
}

/// Exactly one of these is active at a time.
#[derive(Debug, Clone)]
pub enum SessionState {
    Loading,
    Error { message: String },
    Empty,
    ProgramSelect,
    TopicSelect { program: String },
    BlockSelect { program: String, topic: String },
    ModeSelect { key: SelectionKey },
    Active(ActiveQuiz),
    Results(ActiveQuiz),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error { .. } => "error",
            Self::Empty => "empty",
            Self::ProgramSelect => "program-select",
            Self::TopicSelect { .. } => "topic-select",
            Self::BlockSelect { .. } => "block-select",
            Self::ModeSelect { .. } => "mode-select",
            Self::Active(_) => "active",
            Self::Results(_) => "results",
        }
    }

    /// Loading, Error and Empty accept no intents.
    pub fn accepts_intents(&self) -> bool {
        !matches!(self, Self::Loading | Self::Error { .. } | Self::Empty)
    }
}

/// Everything the presentation layer can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectProgram(String),
    SelectTopic(String),
    SelectBlock(String),
    SelectMode(QuizMode),
    SelectAnswer(String),
    SubmitAnswer,
    NextQuestion,
    Back,
    Reset,
    RetryQuiz,
}

/// The loaded questions plus a version bumped on every replacement.
#[derive(Debug, Default)]
pub struct QuestionStore {
    questions: Vec<Arc<Question>>,
    version: u64,
}

impl QuestionStore {
    pub fn replace(&mut self, questions: Vec<Question>) {
        self.questions = questions.into_iter().map(Arc::new).collect();
        self.version += 1;
    }

    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

pub struct Session {
    state: SessionState,
    store: QuestionStore,
    hierarchy: HierarchyCache,
    stats: StatisticsStore,
}

impl Session {
    pub fn new(stats: StatisticsStore) -> Self {
        Self {
            state: SessionState::Loading,
            store: QuestionStore::default(),
            hierarchy: HierarchyCache::default(),
            stats,
        }
    }

    /// Build a session that has already finished loading `questions`.
    pub fn with_questions(questions: Vec<Question>, stats: StatisticsStore) -> Self {
        let mut session = Self::new(stats);
        session.finish_loading(Ok(questions));
        session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        self.hierarchy.current()
    }

    pub fn question_count(&self) -> usize {
        self.store.len()
    }

    pub fn stats(&self) -> &StatisticsStore {
        &self.stats
    }

    pub fn block_stats(&self, key: &SelectionKey) -> BlockStats {
        self.stats.get(key)
    }

    /// Leave `Loading` once the fetch has resolved. Later calls are ignored.
    pub fn finish_loading(&mut self, result: Result<Vec<Question>, LoadError>) {
        if !matches!(self.state, SessionState::Loading) {
            return;
        }

        self.state = match result {
            Ok(questions) if questions.is_empty() => {
                tracing::warn!("question bank is empty");
                SessionState::Empty
            }
            Ok(questions) => {
                self.store.replace(questions);
                self.hierarchy
                    .get(self.store.version(), self.store.questions());
                SessionState::ProgramSelect
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load question bank");
                SessionState::Error {
                    message: e.user_message(),
                }
            }
        };
    }

    pub fn dispatch(&mut self, intent: Intent) {
        if !self.state.accepts_intents() {
            return;
        }

        let before = self.state.name();
        match intent {
            Intent::SelectProgram(id) => self.select_program(&id),
            Intent::SelectTopic(id) => self.select_topic(&id),
            Intent::SelectBlock(id) => self.select_block(&id),
            Intent::SelectMode(mode) => self.select_mode(mode),
            Intent::SelectAnswer(id) => self.select_answer(&id),
            Intent::SubmitAnswer => self.submit_answer(),
            Intent::NextQuestion => self.next_question(),
            Intent::Back => self.back(),
            Intent::Reset => self.reset(),
            Intent::RetryQuiz => self.retry_quiz(),
        }

        let after = self.state.name();
        if before != after {
            tracing::debug!(from = before, to = after, "session transition");
        }
    }

    pub fn select_program(&mut self, program: &str) {
        if matches!(self.state, SessionState::ProgramSelect)
            && self.hierarchy().programs.contains_key(program)
        {
            self.state = SessionState::TopicSelect {
                program: program.to_string(),
            };
        }
    }

    pub fn select_topic(&mut self, topic: &str) {
        let SessionState::TopicSelect { program } = &self.state else {
            return;
        };
        if self.hierarchy().topic(program, topic).is_some() {
            self.state = SessionState::BlockSelect {
                program: program.clone(),
                topic: topic.to_string(),
            };
        }
    }

    pub fn select_block(&mut self, block: &str) {
        let SessionState::BlockSelect { program, topic } = &self.state else {
            return;
        };
        if self.hierarchy().block(program, topic, block).is_some() {
            self.state = SessionState::ModeSelect {
                key: SelectionKey::new(program.clone(), topic.clone(), block),
            };
        }
    }

    pub fn select_mode(&mut self, mode: QuizMode) {
        let SessionState::ModeSelect { key } = &self.state else {
            return;
        };
        let key = key.clone();
        self.start_quiz(key, mode);
    }

    pub fn select_answer(&mut self, answer_id: &str) {
        let SessionState::Active(quiz) = &mut self.state else {
            return;
        };
        if quiz.answered {
            return;
        }
        let Some(current) = quiz.questions.get(quiz.index) else {
            return;
        };
        if current.question.answers.contains_key(answer_id) {
            quiz.selected = Some(answer_id.to_string());
        }
    }

    /// Check the selected answer and record it. Needs a selection and an unanswered question.
    pub fn submit_answer(&mut self) {
        let SessionState::Active(quiz) = &mut self.state else {
            return;
        };
        if quiz.answered {
            return;
        }
        let Some(selected) = quiz.selected.clone() else {
            return;
        };
        let Some(current) = quiz.questions.get(quiz.index) else {
            return;
        };

        let is_correct = current.question.is_correct(&selected);
        let block_index = current.block_index;

        quiz.answers.push(SessionAnswer {
            question_index: quiz.index,
            selected_answer: selected,
            is_correct,
        });
        quiz.answered = true;

        self.stats.record_answer(&quiz.key, block_index, is_correct);
    }

    /// Advance after an answered question, or finish on the last one.
    pub fn next_question(&mut self) {
        let SessionState::Active(quiz) = &mut self.state else {
            return;
        };
        if !quiz.answered {
            return;
        }

        if quiz.is_last() {
            let quiz = quiz.clone();
            let score = quiz.score();
            tracing::info!(
                key = %quiz.key,
                correct = score.correct,
                total = score.total,
                "quiz finished"
            );
            self.state = SessionState::Results(quiz);
        } else {
            quiz.index += 1;
            quiz.selected = None;
            quiz.answered = false;
        }
    }

    pub fn back(&mut self) {
        self.state = match &self.state {
            SessionState::TopicSelect { .. } => SessionState::ProgramSelect,
            SessionState::BlockSelect { program, .. } => SessionState::TopicSelect {
                program: program.clone(),
            },
            SessionState::ModeSelect { key } => SessionState::BlockSelect {
                program: key.program.clone(),
                topic: key.topic.clone(),
            },
            _ => return,
        };
    }

    /// Drop selection, mode and answers. Recorded statistics stay.
    pub fn reset(&mut self) {
        if self.state.accepts_intents() {
            self.state = SessionState::ProgramSelect;
        }
    }

    pub fn retry_quiz(&mut self) {
        let SessionState::Results(quiz) = &self.state else {
            return;
        };
        let (key, mode) = (quiz.key.clone(), quiz.mode);
        self.start_quiz(key, mode);
    }

    fn start_quiz(&mut self, key: SelectionKey, mode: QuizMode) {
        let questions = self.filtered_questions(&key, mode);
        tracing::info!(%key, ?mode, count = questions.len(), "quiz started");
        self.state = SessionState::Active(ActiveQuiz::start(key, mode, questions));
    }

    /// The block's questions for `mode`, fixed at the moment the quiz starts.
    pub fn filtered_questions(&self, key: &SelectionKey, mode: QuizMode) -> Vec<QuizQuestion> {
        let Some(block) = self.hierarchy().block(&key.program, &key.topic, &key.block) else {
            return Vec::new();
        };

        let all = block
            .questions
            .iter()
            .enumerate()
            .map(|(block_index, question)| QuizQuestion {
                block_index,
                question: Arc::clone(question),
            });

        match (mode, self.stats.find(key)) {
            (QuizMode::Mistakes, Some(stats)) => all
                .filter(|q| stats.incorrect_questions.contains(&q.block_index))
                .collect(),
            _ => all.collect(),
        }
    }
}
