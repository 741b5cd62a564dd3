use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Block id given to questions that arrive without one.
pub const DEFAULT_BLOCK_ID: &str = "0";
/// Block name given to questions that arrive without one.
pub const DEFAULT_BLOCK_NAME: &str = "Основной блок";

/// A single multiple-choice question as it appears in the question bank.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Question {
    #[serde(default, deserialize_with = "optional_id_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub question_number: Option<String>,
    #[serde(deserialize_with = "id_string")]
    pub theme_id: String,
    pub theme_name: String,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub block_id: Option<String>,
    #[serde(default)]
    pub block_name: Option<String>,
    #[serde(rename = "question")]
    pub text: String,
    /// Answer id to answer text, in source order.
    pub answers: IndexMap<String, String>,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub correct_answer_text: Option<String>,
    #[serde(default)]
    pub article: Option<String>,
}

impl Question {
    /// Fill in the block grouping fields when they are missing or blank.
    pub fn normalized(mut self) -> Self {
        if self.block_id.as_deref().is_none_or(str::is_empty) {
            self.block_id = Some(DEFAULT_BLOCK_ID.to_string());
        }
        if self.block_name.as_deref().is_none_or(str::is_empty) {
            self.block_name = Some(DEFAULT_BLOCK_NAME.to_string());
        }
        self
    }

    pub fn block_id(&self) -> &str {
        self.block_id.as_deref().unwrap_or(DEFAULT_BLOCK_ID)
    }

    pub fn block_name(&self) -> &str {
        self.block_name.as_deref().unwrap_or(DEFAULT_BLOCK_NAME)
    }

    pub fn is_correct(&self, answer_id: &str) -> bool {
        self.correct_answer.as_deref() == Some(answer_id)
    }

    /// Text of the correct answer, preferring the explicit field.
    pub fn correct_text(&self) -> Option<&str> {
        self.correct_answer_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| {
                self.correct_answer
                    .as_ref()
                    .and_then(|id| self.answers.get(id))
                    .map(String::as_str)
            })
    }

    /// Citation for the correct answer, if the bank carries a non-empty one.
    pub fn article(&self) -> Option<&str> {
        self.article.as_deref().filter(|a| !a.trim().is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn optional_id_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_block_fields_get_defaults() {
        let json = r#"{
            "theme_id": "7",
            "theme_name": "Law",
            "question": "Q?",
            "answers": {"1": "a", "2": "b"},
            "correct_answer": "2"
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        let question = question.normalized();

        assert_eq!(question.block_id(), "0");
        assert_eq!(question.block_name(), "Основной блок");
    }

    #[test]
    fn test_blank_block_fields_get_defaults() {
        let json = r#"{
            "theme_id": 3,
            "theme_name": "Law",
            "block_id": "",
            "block_name": "",
            "question": "Q?",
            "answers": {"1": "a"},
            "correct_answer": 1
        }"#;
        let question: Question = serde_json::from_str::<Question>(json).unwrap().normalized();

        assert_eq!(question.theme_id, "3");
        assert_eq!(question.block_id(), "0");
        assert_eq!(question.block_name(), "Основной блок");
        assert!(question.is_correct("1"));
    }

    #[test]
    fn test_answers_keep_source_order() {
        let json = r#"{
            "theme_id": "1",
            "theme_name": "Law",
            "question": "Q?",
            "answers": {"3": "c", "1": "a", "2": "b"},
            "correct_answer": null
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = question.answers.keys().map(String::as_str).collect();

        assert_eq!(ids, ["3", "1", "2"]);
        assert!(!question.is_correct("1"));
        assert_eq!(question.correct_text(), None);
    }

    #[test]
    fn test_correct_text_falls_back_to_answer_map() {
        let json = r#"{
            "theme_id": "1",
            "theme_name": "Law",
            "question": "Q?",
            "answers": {"1": "first", "2": "second"},
            "correct_answer": "2",
            "article": "  "
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();

        assert_eq!(question.correct_text(), Some("second"));
        assert_eq!(question.article(), None);
    }

    #[test]
    fn test_id_and_question_number_are_independent() {
        let json = r#"{
            "id": "q-17",
            "question_number": 17,
            "theme_id": "1",
            "theme_name": "Law",
            "question": "Q?",
            "answers": {"1": "a"},
            "correct_answer": "1"
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();

        assert_eq!(question.id.as_deref(), Some("q-17"));
        assert_eq!(question.question_number.as_deref(), Some("17"));
    }
}
