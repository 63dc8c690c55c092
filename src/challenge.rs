use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::InterviewError;

/// One benchmark prompt plus identifying metadata.
///
/// Fields beyond `name`, `language` and `prompt` are kept in `extra` so a
/// result record can reproduce the input line exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub name: String,
    pub language: String,
    pub prompt: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Challenge {
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            prompt: prompt.into(),
            extra: Map::new(),
        }
    }
}

/// Reads newline-delimited JSON challenges from `path`, in file order.
pub fn load_interview(path: impl AsRef<Path>) -> Result<Vec<Challenge>, InterviewError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    parse_interview(&raw).map_err(|err| match err {
        InterviewError::Json(msg) => InterviewError::Json(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Parses NDJSON challenges. Blank lines are skipped.
pub fn parse_interview(raw: &str) -> Result<Vec<Challenge>, InterviewError> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|err| {
                InterviewError::Json(format!("line {}: {err}", idx + 1))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_lines_in_order_and_keeps_extra_fields() {
        let raw = concat!(
            r#"{"name":"t1","language":"python","prompt":"hi","Signature":"f(x)"}"#,
            "\n\n",
            r#"{"name":"t2","language":"javascript","prompt":"yo"}"#,
            "\n",
        );
        let challenges = parse_interview(raw).unwrap();

        assert_eq!(challenges.len(), 2);
        assert_eq!(challenges[0].name, "t1");
        assert_eq!(challenges[0].extra.get("Signature"), Some(&json!("f(x)")));
        assert_eq!(challenges[1].language, "javascript");
    }

    #[test]
    fn missing_prompt_reports_line() {
        let raw = concat!(
            r#"{"name":"t1","language":"python","prompt":"a"}"#,
            "\n",
            r#"{"name":"t2","language":"python"}"#,
        );
        let err = parse_interview(raw).unwrap_err();
        assert!(matches!(err, InterviewError::Json(msg) if msg.starts_with("line 2")));
    }
}
