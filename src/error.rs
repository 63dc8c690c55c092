use thiserror::Error;

/// Error types that can occur while running an interview.
#[derive(Debug, Error)]
pub enum InterviewError {
    /// Inconsistent or missing run configuration, detected before any request
    #[error("Configuration error: {0}")]
    Config(String),
    /// Parameter file could not be interpreted
    #[error("Invalid parameters: {0}")]
    Params(String),
    /// Output template failed to compile or render
    #[error("Template error: {0}")]
    Template(String),
    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(String),
    /// Errors returned by the LLM provider
    #[error("Provider error: {0}")]
    Provider(String),
    /// API response parsing or format error
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormat {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    Json(String),
    /// Filesystem errors while reading challenges or writing results
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts reqwest HTTP errors into InterviewErrors
impl From<reqwest::Error> for InterviewError {
    fn from(err: reqwest::Error) -> Self {
        InterviewError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for InterviewError {
    fn from(err: serde_json::Error) -> Self {
        InterviewError::Json(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

impl From<minijinja::Error> for InterviewError {
    fn from(err: minijinja::Error) -> Self {
        InterviewError::Template(err.to_string())
    }
}
