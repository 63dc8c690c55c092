//! Optional output template applied to every answer.

use std::fs;
use std::path::Path;

use minijinja::Environment;
use serde_json::Value;

use crate::challenge::Challenge;
use crate::error::InterviewError;

/// Variable holding the raw model answer inside the template.
pub const ANSWER_VAR: &str = "Answer";

const TEMPLATE_NAME: &str = "answer";

/// Jinja template compiled once and rendered per challenge.
#[derive(Debug)]
pub struct AnswerTemplate {
    env: Environment<'static>,
}

impl AnswerTemplate {
    /// Compiles `source`; syntax errors are reported here, not at render time.
    pub fn new(source: impl Into<String>) -> Result<Self, InterviewError> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source.into())
            .map_err(|e| InterviewError::Template(format!("Invalid template syntax: {e}")))?;
        Ok(Self { env })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, InterviewError> {
        Self::new(fs::read_to_string(path)?)
    }

    /// Renders with every challenge field plus [`ANSWER_VAR`] in scope.
    pub fn render(&self, challenge: &Challenge, answer: &str) -> Result<String, InterviewError> {
        let mut vars = match serde_json::to_value(challenge)? {
            Value::Object(map) => map,
            other => {
                return Err(InterviewError::Template(format!(
                    "challenge did not serialize to a mapping: {other}"
                )))
            }
        };
        vars.insert(ANSWER_VAR.to_string(), Value::String(answer.to_string()));

        let tmpl = self.env.get_template(TEMPLATE_NAME)?;
        Ok(tmpl.render(&vars)?)
    }
}

/// Produces the final answer, rendering through `template` when one is set.
pub fn render_answer(
    template: Option<&AnswerTemplate>,
    challenge: &Challenge,
    answer: &str,
) -> Result<String, InterviewError> {
    match template {
        Some(template) => template.render(challenge, answer),
        None => Ok(answer.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn renders_challenge_fields_and_answer() {
        let mut challenge = Challenge::new("fib", "python", "write fib");
        challenge
            .extra
            .insert("Signature".to_string(), json!("fib(n)"));
        let source = "```{{ language }}\n# {{ name }} {{ Signature }}\n{{ Answer }}\n```";
        let template = AnswerTemplate::new(source).unwrap();

        let out = render_answer(Some(&template), &challenge, "def fib(n): ...").unwrap();
        assert_eq!(out, "```python\n# fib fib(n)\ndef fib(n): ...\n```");
    }

    #[test]
    fn without_template_answer_is_unchanged() {
        let challenge = Challenge::new("t1", "python", "hi");
        assert_eq!(
            render_answer(None, &challenge, "  raw\n").unwrap(),
            "  raw\n"
        );
    }

    #[test]
    fn malformed_template_fails_to_compile() {
        let err = AnswerTemplate::new("{% if Answer %}unterminated").unwrap_err();
        assert!(matches!(err, InterviewError::Template(_)));
    }
}
