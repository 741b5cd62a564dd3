use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::Question;

pub const DEFAULT_QUESTIONS_PATH: &str = "all_questions.json";

/// Where the question bank is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    File(PathBuf),
    Url(String),
}

impl QuestionSource {
    /// `http://` and `https://` locations are fetched; anything else is a file path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }
}

impl Default for QuestionSource {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_QUESTIONS_PATH))
    }
}

impl fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Failure to obtain the question bank.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("loading was interrupted")]
    Interrupted,
}

impl LoadError {
    /// Message shown on the error screen.
    pub fn user_message(&self) -> String {
        format!(
            "Could not load the questions ({}). Make sure all_questions.json is reachable and retry.",
            self
        )
    }
}

/// Fetch the question bank once and normalize every entry.
///
/// An empty bank is a successful load; the caller decides what to show.
pub async fn load_questions(source: &QuestionSource) -> Result<Vec<Question>, LoadError> {
    let body = match source {
        QuestionSource::File(path) => read_file(path).await?,
        QuestionSource::Url(url) => fetch_url(url).await?,
    };

    let questions = parse_questions(&body)?;
    tracing::info!(%source, count = questions.len(), "question bank loaded");
    Ok(questions)
}

/// Decode a JSON array of questions, filling in grouping defaults.
pub fn parse_questions(json: &str) -> Result<Vec<Question>, LoadError> {
    let questions: Vec<Question> = serde_json::from_str(json)?;
    Ok(questions.into_iter().map(Question::normalized).collect())
}

async fn read_file(path: &Path) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn fetch_url(url: &str) -> Result<String, LoadError> {
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status));
    }
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/all_questions.json", addr)
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("exam-prep-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            QuestionSource::parse("https://example.org/q.json"),
            QuestionSource::Url("https://example.org/q.json".to_string())
        );
        assert_eq!(
            QuestionSource::parse("data/q.json"),
            QuestionSource::File(PathBuf::from("data/q.json"))
        );
    }

    #[tokio::test]
    async fn test_load_from_file_normalizes() {
        let path = temp_path("load.json");
        std::fs::write(
            &path,
            r#"[{"theme_id":"1","theme_name":"T","question":"Q","answers":{"1":"a"},"correct_answer":"1"}]"#,
        )
        .unwrap();

        let questions = load_questions(&QuestionSource::File(path.clone()))
            .await
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].block_id(), "0");
    }

    #[tokio::test]
    async fn test_empty_bank_is_not_an_error() {
        let path = temp_path("empty.json");
        std::fs::write(&path, "[]").unwrap();

        let questions = load_questions(&QuestionSource::File(path.clone()))
            .await
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = load_questions(&QuestionSource::File(temp_path("missing.json"))).await;
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(parse_questions("{"), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_tolerates_any_id_shape() {
        let questions = parse_questions(
            r#"[
                {"id":"q-17","theme_id":"1","theme_name":"T","question":"Q1","answers":{"1":"a"},"correct_answer":"1"},
                {"id":5,"question_number":12,"theme_id":"1","theme_name":"T","question":"Q2","answers":{"1":"a"},"correct_answer":"1"}
            ]"#,
        )
        .unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id.as_deref(), Some("q-17"));
        assert_eq!(questions[1].id.as_deref(), Some("5"));
        assert_eq!(questions[1].question_number.as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn test_http_error_status_is_a_load_failure() {
        let url = serve_once("HTTP/1.1 404 Not Found", "").await;

        let result = load_questions(&QuestionSource::Url(url)).await;
        assert!(matches!(
            result,
            Err(LoadError::Status(status)) if status == reqwest::StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn test_http_empty_bank_loads() {
        let url = serve_once("HTTP/1.1 200 OK", "[]").await;

        let questions = load_questions(&QuestionSource::Url(url)).await.unwrap();
        assert!(questions.is_empty());
    }
}
