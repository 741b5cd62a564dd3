mod export;
mod loader;
mod repository;

pub use export::{build_answer_sheet, write_answer_sheet, ExportError, SheetEntry, SheetTopic};
pub use loader::{load_questions, parse_questions, LoadError, QuestionSource, DEFAULT_QUESTIONS_PATH};
pub use repository::{
    InMemoryRepository, JsonFileRepository, StatsRepository, StorageError, DEFAULT_STATS_PATH,
};
