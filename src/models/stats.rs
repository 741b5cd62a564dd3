use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The (program, topic, block) triple that scopes statistics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    pub program: String,
    pub topic: String,
    pub block: String,
}

impl SelectionKey {
    pub fn new(
        program: impl Into<String>,
        topic: impl Into<String>,
        block: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            topic: topic.into(),
            block: block.into(),
        }
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.program, self.topic, self.block)
    }
}

/// Running counters for one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStats {
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub total: u32,
    /// Block positions whose most recent answer was wrong.
    #[serde(default)]
    pub incorrect_questions: Vec<usize>,
}

impl BlockStats {
    /// Apply one answered question to the counters.
    pub fn record(&mut self, question_index: usize, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
            self.incorrect_questions.retain(|&idx| idx != question_index);
        } else if !self.incorrect_questions.contains(&question_index) {
            self.incorrect_questions.push(question_index);
        }
    }

    /// Restore the counter invariants on data that did not come from
    /// `record`. Returns true if anything had to change.
    pub fn repair(&mut self) -> bool {
        let mut changed = false;
        if self.correct > self.total {
            self.correct = self.total;
            changed = true;
        }
        let before = self.incorrect_questions.len();
        let mut seen = HashSet::new();
        self.incorrect_questions.retain(|idx| seen.insert(*idx));
        changed || self.incorrect_questions.len() != before
    }

    /// Share of correct answers, rounded to a whole percent.
    pub fn accuracy(&self) -> u32 {
        percentage(self.correct as usize, self.total as usize)
    }

    pub fn has_mistakes(&self) -> bool {
        !self.incorrect_questions.is_empty()
    }
}

/// `round(100 * part / whole)`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 * 100.0 / whole as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let key = SelectionKey::new("prog2", "12", "0");
        assert_eq!(key.to_string(), "prog2_12_0");
    }

    #[test]
    fn test_correcting_a_mistake_clears_it() {
        let mut stats = BlockStats::default();
        stats.record(2, false);
        stats.record(2, false);
        assert_eq!(stats.incorrect_questions, vec![2]);

        stats.record(2, true);
        assert!(stats.incorrect_questions.is_empty());

        stats.record(2, false);
        assert_eq!(stats.incorrect_questions, vec![2]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.correct, 1);
    }

    #[test]
    fn test_percentage_rounds_and_guards_zero() {
        assert_eq!(percentage(3, 4), 75);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_serialized_shape() {
        let mut stats = BlockStats::default();
        stats.record(0, false);
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"correct":0,"total":1,"incorrectQuestions":[0]}"#);
    }
}
