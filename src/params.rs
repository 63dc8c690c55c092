//! Sampling parameters and their translation to provider-facing names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::InterviewError;

/// Key under which a custom API base travels with the parameters.
pub const API_BASE_KEY: &str = "api_base";
/// Key holding the stop sequences.
pub const STOP_KEY: &str = "stop";

/// Generic parameter names that providers spell differently.
const RENAMES: &[(&str, &str)] = &[
    ("max_new_tokens", "max_tokens"),
    ("repetition_penalty", "presence_penalty"),
];

/// Ordered mapping of parameter names to JSON values sent with every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: Map<String, Value>,
}

impl ParameterSet {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Reads a JSON object of generic parameter names from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InterviewError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(values) => Ok(Self { values }),
            other => Err(InterviewError::Params(format!(
                "{} must contain a JSON object, found {}",
                path.display(),
                json_kind(&other)
            ))),
        }
    }

    /// Returns a copy with generic names rewritten to provider names.
    ///
    /// Keys outside the rename table are kept verbatim so newer parameters
    /// reach the provider untouched.
    pub fn normalized(&self) -> Self {
        let values = self
            .values
            .iter()
            .map(|(key, value)| (provider_name(key).to_string(), value.clone()))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn set_api_base(&mut self, api_base: &str) {
        self.insert(API_BASE_KEY, Value::String(api_base.to_string()));
    }

    pub fn api_base(&self) -> Option<&str> {
        self.get(API_BASE_KEY).and_then(Value::as_str)
    }

    pub fn set_stop(&mut self, stop: Vec<String>) {
        self.insert(
            STOP_KEY,
            Value::Array(stop.into_iter().map(Value::String).collect()),
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Maps a generic parameter name to the name the provider expects.
pub fn provider_name(key: &str) -> &str {
    RENAMES
        .iter()
        .find(|(generic, _)| *generic == key)
        .map(|(_, provider)| *provider)
        .unwrap_or(key)
}

/// Parses a JSON-encoded list of stop sequences.
pub fn parse_stop(raw: &str) -> Result<Vec<String>, InterviewError> {
    serde_json::from_str(raw).map_err(|err| {
        InterviewError::Config(format!("--stop must be a JSON list of strings: {err}"))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
