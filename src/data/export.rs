//! Plain-text answer sheet: every question with its correct answers, per topic.

use std::io::{self, Write};

use indexmap::IndexMap;
use thiserror::Error;

use crate::models::Question;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write answer sheet: {0}")]
    Io(#[from] io::Error),
}

/// One deduplicated question on the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetEntry {
    pub question: String,
    pub correct_answers: Vec<String>,
    pub article: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetTopic {
    pub name: String,
    pub entries: Vec<SheetEntry>,
}

/// Group by topic and merge questions with identical text.
///
/// The same question can appear in several blocks with different correct
/// options; every distinct correct answer text is kept.
pub fn build_answer_sheet(questions: &[Question]) -> Vec<SheetTopic> {
    let mut topics: IndexMap<&str, (&str, IndexMap<&str, SheetEntry>)> = IndexMap::new();

    for question in questions {
        let (_, entries) = topics
            .entry(question.theme_id.as_str())
            .or_insert_with(|| (question.theme_name.as_str(), IndexMap::new()));

        let entry = entries
            .entry(question.text.trim())
            .or_insert_with(|| SheetEntry {
                question: question.text.trim().to_string(),
                correct_answers: Vec::new(),
                article: question.article().map(str::to_string),
            });

        if let Some(answer) = question.correct_text() {
            if !entry.correct_answers.iter().any(|a| a == answer) {
                entry.correct_answers.push(answer.to_string());
            }
        }
    }

    topics
        .into_values()
        .map(|(name, entries)| SheetTopic {
            name: name.to_string(),
            entries: entries.into_values().collect(),
        })
        .collect()
}

pub fn write_answer_sheet<W: Write>(out: &mut W, sheet: &[SheetTopic]) -> Result<(), ExportError> {
    for topic in sheet {
        writeln!(out, "{}", topic.name)?;
        writeln!(out, "{}", "=".repeat(topic.name.chars().count().max(3)))?;
        writeln!(out)?;

        for (number, entry) in topic.entries.iter().enumerate() {
            writeln!(out, "{}. {}", number + 1, clean_markup(&entry.question))?;
            for answer in &entry.correct_answers {
                writeln!(out, "   + {}", clean_markup(answer))?;
            }
            if let Some(article) = &entry.article {
                writeln!(out, "   Article: {}", clean_markup(article))?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Scraped text carries stray `<br>` tags.
fn clean_markup(text: &str) -> String {
    text.replace("<br/>", " ")
        .replace("<br />", " ")
        .replace("<br>", " ")
        .replace("<BR>", " ")
}
