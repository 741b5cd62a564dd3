//! Text summary of recorded statistics for every attempted section.

use std::io::{self, Write};

use crate::models::{BlockStats, Hierarchy, SelectionKey};
use crate::statistics::StatisticsStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub topic: String,
    pub block: String,
    pub question_count: usize,
    pub stats: BlockStats,
}

/// Rows in hierarchy order; sections never answered are left out.
pub fn build_report(hierarchy: &Hierarchy, stats: &StatisticsStore) -> Vec<ReportRow> {
    let mut rows = Vec::new();

    for (program_id, topics) in &hierarchy.structure {
        for (topic_id, topic) in topics {
            for (block_id, block) in &topic.blocks {
                let key = SelectionKey::new(program_id.clone(), topic_id.clone(), block_id.clone());
                let Some(block_stats) = stats.find(&key).filter(|s| s.total > 0) else {
                    continue;
                };
                rows.push(ReportRow {
                    topic: topic.name.clone(),
                    block: block.name.clone(),
                    question_count: block.questions.len(),
                    stats: block_stats.clone(),
                });
            }
        }
    }

    rows
}

pub fn write_report<W: Write>(out: &mut W, rows: &[ReportRow]) -> io::Result<()> {
    if rows.is_empty() {
        writeln!(out, "No answers recorded yet.")?;
        return Ok(());
    }

    for row in rows {
        writeln!(out, "{} / {}", row.topic, row.block)?;
        writeln!(
            out,
            "  answered {}  ·  correct {}  ·  accuracy {}%  ·  open mistakes {} of {}",
            row.stats.total,
            row.stats.correct,
            row.stats.accuracy(),
            row.stats.incorrect_questions.len(),
            row.question_count
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{parse_questions, InMemoryRepository};
    use crate::models::build_hierarchy;
    use std::sync::Arc;

    #[test]
    fn test_report_skips_unanswered_sections() {
        let questions: Vec<_> = parse_questions(
            r#"[
                {"theme_id":"1","theme_name":"Civil","block_id":"a","block_name":"Part A","question":"Q1","answers":{"1":"x"},"correct_answer":"1"},
                {"theme_id":"1","theme_name":"Civil","block_id":"b","block_name":"Part B","question":"Q2","answers":{"1":"x"},"correct_answer":"1"}
            ]"#,
        )
        .unwrap()
        .into_iter()
        .map(Arc::new)
        .collect();
        let hierarchy = build_hierarchy(&questions);
        let blob = r#"{"prog2_1_b":{"correct":3,"total":4,"incorrectQuestions":[0]}}"#;
        let stats = StatisticsStore::load(Box::new(InMemoryRepository::with_blob(blob)));

        let rows = build_report(&hierarchy, &stats);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].block, "Part B");

        let mut out = Vec::new();
        write_report(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Civil / Part B"));
        assert!(text.contains("accuracy 75%"));
        assert!(text.contains("open mistakes 1 of 1"));
    }

    #[test]
    fn test_empty_report_message() {
        let mut out = Vec::new();
        write_report(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No answers recorded yet.\n");
    }
}
