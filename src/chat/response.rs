//! Adapters turning provider payloads into [`CompletionResponse`]s.
//!
//! Well-formed OpenAI-style bodies deserialize into [`ChatCompletion`]. Bodies
//! that deviate from that shape (content given as a list of parts, usage
//! missing fields, extra nesting) fall back to [`RawCompletion`], which reads
//! the message as a plain JSON mapping.

use serde::Deserialize;
use serde_json::Value;

use super::traits::CompletionResponse;
use super::usage::Usage;

/// Typed chat completion body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse for ChatCompletion {
    fn text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.clone())
    }

    fn usage(&self) -> Usage {
        self.usage.clone().unwrap_or_default()
    }
}

/// Completion body kept as an untyped JSON mapping.
#[derive(Debug, Clone)]
pub struct RawCompletion(pub Value);

impl RawCompletion {
    fn message(&self) -> Option<&Value> {
        self.0.get("choices")?.get(0)?.get("message")
    }
}

impl CompletionResponse for RawCompletion {
    fn text(&self) -> Option<String> {
        match self.message()?.get("content")? {
            Value::String(text) => Some(text.clone()),
            Value::Array(parts) => {
                let text: String = parts
                    .iter()
                    .filter_map(|part| match part {
                        Value::String(s) => Some(s.as_str()),
                        other => other.get("text").and_then(Value::as_str),
                    })
                    .collect();
                Some(text)
            }
            _ => None,
        }
    }

    fn usage(&self) -> Usage {
        self.0
            .get("usage")
            .and_then(|usage| Usage::deserialize(usage).ok())
            .unwrap_or_default()
    }
}

/// Picks the typed adapter when the body matches it, the mapping one otherwise.
pub fn parse_completion(body: Value) -> Box<dyn CompletionResponse> {
    match ChatCompletion::deserialize(&body) {
        Ok(typed) => Box::new(typed),
        Err(err) => {
            log::debug!(
                "completion body is not a standard chat completion ({err}), reading as mapping"
            );
            Box::new(RawCompletion(body))
        }
    }
}
