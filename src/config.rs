use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::{QuestionSource, DEFAULT_QUESTIONS_PATH, DEFAULT_STATS_PATH};
use crate::logging::DEFAULT_LOG_DIR;

/// Multiple-choice exam drill in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// JSON file or http(s) URL to load the questions from
    #[arg(short, long, env = "EXAM_PREP_QUESTIONS", default_value = DEFAULT_QUESTIONS_PATH, global = true)]
    pub questions: String,

    /// File the answer statistics are kept in
    #[arg(short, long, env = "EXAM_PREP_STATS", default_value = DEFAULT_STATS_PATH, global = true)]
    pub stats: PathBuf,

    /// Directory for log files
    #[arg(long, env = "EXAM_PREP_LOG_DIR", default_value = DEFAULT_LOG_DIR, global = true)]
    pub log_dir: PathBuf,

    /// Keep statistics in memory only
    #[arg(long, global = true)]
    pub no_persist: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write a study sheet with the correct answer to every question
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print recorded statistics per section
    Stats,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: QuestionSource,
    /// `None` keeps statistics in memory.
    pub stats_path: Option<PathBuf>,
    pub log_dir: PathBuf,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            source: QuestionSource::parse(&args.questions),
            stats_path: (!args.no_persist).then(|| args.stats.clone()),
            log_dir: args.log_dir.clone(),
        }
    }
}
