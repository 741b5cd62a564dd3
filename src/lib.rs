//! # exam-prep
//!
//! Terminal drill for multiple-choice exam question banks.
//!
//! Questions are grouped program → topic → section. Pick a section, run
//! through all of its questions or only the ones you previously got wrong,
//! and get immediate feedback with the legal basis for every answer.
//! Per-section statistics are kept between runs.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use exam_prep::{JsonFileRepository, Quiz, QuizError, QuestionSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let quiz = Quiz::new(
//!         QuestionSource::parse("all_questions.json"),
//!         Box::new(JsonFileRepository::default()),
//!     );
//!     quiz.run().await
//! }
//! ```

mod app;
pub mod config;
mod data;
pub mod logging;
mod models;
mod report;
mod session;
mod statistics;
pub mod terminal;
mod ui;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};

pub use app::{App, MenuEntry};
pub use config::{Args, Command, Config};
pub use data::{
    build_answer_sheet, load_questions, parse_questions, write_answer_sheet, ExportError,
    InMemoryRepository, JsonFileRepository, LoadError, QuestionSource, SheetEntry, SheetTopic,
    StatsRepository, StorageError,
};
pub use models::{
    build_hierarchy, Block, BlockStats, Hierarchy, Question, SelectionKey, Topic,
    DEFAULT_BLOCK_ID, DEFAULT_BLOCK_NAME, DEFAULT_PROGRAM_ID, DEFAULT_PROGRAM_NAME,
};
pub use report::{build_report, write_report, ReportRow};
pub use session::{
    ActiveQuiz, Intent, QuestionStore, QuizMode, QuizQuestion, Score, Session, SessionAnswer,
    SessionState,
};
pub use statistics::StatisticsStore;

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("terminal loop stopped unexpectedly: {0}")]
    EventLoop(#[from] tokio::task::JoinError),
}

type PendingLoad = oneshot::Receiver<Result<Vec<Question>, LoadError>>;

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    source: QuestionSource,
    app: App,
}

impl Quiz {
    /// Create a quiz that will fetch its questions from `source` once it runs.
    pub fn new(source: QuestionSource, repository: Box<dyn StatsRepository>) -> Self {
        let stats = StatisticsStore::load(repository);
        Self {
            source,
            app: App::new(Session::new(stats)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.source.clone(), stats_repository(config))
    }

    /// Run the quiz in the terminal.
    ///
    /// The question bank is fetched in the background while the loading
    /// screen is up. Input polling blocks, so the event loop runs on the
    /// blocking pool and the fetch progresses on any runtime flavour.
    /// Returns when the user quits.
    pub async fn run(self) -> Result<(), QuizError> {
        let Self { source, mut app } = self;
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(load_questions(&source).await);
        });

        tokio::task::spawn_blocking(move || -> Result<(), QuizError> {
            let mut guard = terminal::init()?;
            run_event_loop(guard.terminal(), &mut app, rx)
        })
        .await?
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn stats_repository(config: &Config) -> Box<dyn StatsRepository> {
    match &config.stats_path {
        Some(path) => Box::new(JsonFileRepository::new(path)),
        None => Box::new(InMemoryRepository::new()),
    }
}

/// Load the bank and write the answer sheet to `output`, or stdout.
///
/// Returns the number of topics written.
pub async fn export_answer_sheet(
    source: &QuestionSource,
    output: Option<&Path>,
) -> Result<usize, QuizError> {
    let questions = load_questions(source).await?;
    let sheet = build_answer_sheet(&questions);

    match output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_answer_sheet(&mut out, &sheet)?;
            out.flush()?;
            tracing::info!(path = %path.display(), topics = sheet.len(), "answer sheet written");
        }
        None => write_answer_sheet(&mut io::stdout().lock(), &sheet)?,
    }
    Ok(sheet.len())
}

/// Print recorded statistics for every section of the bank.
pub async fn print_stats_report(config: &Config) -> Result<(), QuizError> {
    let questions: Vec<Arc<Question>> = load_questions(&config.source)
        .await?
        .into_iter()
        .map(Arc::new)
        .collect();
    let hierarchy = build_hierarchy(&questions);
    let stats = StatisticsStore::load(stats_repository(config));

    let rows = build_report(&hierarchy, &stats);
    write_report(&mut io::stdout().lock(), &rows)?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    pending: PendingLoad,
) -> Result<(), QuizError> {
    let mut pending = Some(pending);

    loop {
        if let Some(rx) = pending.as_mut() {
            match rx.try_recv() {
                Ok(result) => {
                    app.session_mut().finish_loading(result);
                    pending = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    app.session_mut().finish_loading(Err(LoadError::Interrupted));
                    pending = None;
                }
            }
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code) {
                break;
            }
        }
    }

    tracing::info!("quit requested");
    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return true;
    }

    match app.state() {
        SessionState::Loading | SessionState::Error { .. } | SessionState::Empty => {}
        SessionState::ProgramSelect
        | SessionState::TopicSelect { .. }
        | SessionState::BlockSelect { .. }
        | SessionState::ModeSelect { .. } => handle_menu_input(app, key),
        SessionState::Active(_) => handle_quiz_input(app, key),
        SessionState::Results(_) => handle_result_input(app, key),
    }
    false
}

fn handle_menu_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_entry(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_entry(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_entry(),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => app.dispatch(Intent::Back),
        _ => {}
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_answer(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_answer(),
        KeyCode::Enter | KeyCode::Char(' ') => app.confirm(),
        KeyCode::Char('n') => app.dispatch(Intent::NextQuestion),
        KeyCode::Char('m') => app.dispatch(Intent::Reset),
        _ => {}
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.dispatch(Intent::RetryQuiz),
        KeyCode::Char('m') | KeyCode::Esc => app.dispatch(Intent::Reset),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_app() -> App {
        let questions = parse_questions(
            r#"[{"theme_id":"1","theme_name":"Civil","question":"Q1","answers":{"1":"x","2":"y"},"correct_answer":"1"}]"#,
        )
        .unwrap();
        let stats = StatisticsStore::load(Box::new(InMemoryRepository::new()));
        App::new(Session::with_questions(questions, stats))
    }

    #[test]
    fn test_keys_drive_a_full_quiz() {
        let mut app = loaded_app();
        for _ in 0..4 {
            assert!(!handle_input(&mut app, KeyCode::Enter));
        }
        assert!(matches!(app.state(), SessionState::Active(_)));

        handle_input(&mut app, KeyCode::Enter);
        handle_input(&mut app, KeyCode::Char('n'));
        let SessionState::Results(quiz) = app.state() else {
            panic!("expected results");
        };
        assert_eq!(quiz.score().percentage, 100);

        handle_input(&mut app, KeyCode::Char('r'));
        assert!(matches!(app.state(), SessionState::Active(_)));
        handle_input(&mut app, KeyCode::Char('m'));
        assert!(matches!(app.state(), SessionState::ProgramSelect));
    }

    #[test]
    fn test_escape_walks_back_through_menus() {
        let mut app = loaded_app();
        handle_input(&mut app, KeyCode::Enter);
        handle_input(&mut app, KeyCode::Enter);
        assert!(matches!(app.state(), SessionState::BlockSelect { .. }));

        handle_input(&mut app, KeyCode::Esc);
        handle_input(&mut app, KeyCode::Esc);
        assert!(matches!(app.state(), SessionState::ProgramSelect));
    }

    #[test]
    fn test_app_can_move_to_the_blocking_pool() {
        fn assert_send<T: Send + 'static>() {}
        assert_send::<App>();
        assert_send::<PendingLoad>();
    }

    #[test]
    fn test_q_quits_from_any_screen() {
        let stats = StatisticsStore::load(Box::new(InMemoryRepository::new()));
        let mut loading = App::new(Session::new(stats));
        assert!(!handle_input(&mut loading, KeyCode::Enter));
        assert!(handle_input(&mut loading, KeyCode::Char('q')));
        assert!(handle_input(&mut loaded_app(), KeyCode::Char('Q')));
    }
}
