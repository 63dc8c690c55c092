//! Provider families reachable through an OpenAI-compatible chat endpoint.

mod openai_compatible;

pub use openai_compatible::OpenAICompatible;

/// Connection defaults for a known runtime family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendInfo {
    pub runtime: &'static str,
    /// Base URL including the API version segment
    pub base_url: &'static str,
    /// Environment variable holding the API key, if the service needs one
    pub env_key: Option<&'static str>,
}

const BACKENDS: &[BackendInfo] = &[
    BackendInfo {
        runtime: "openai",
        base_url: "https://api.openai.com/v1",
        env_key: Some("OPENAI_API_KEY"),
    },
    BackendInfo {
        runtime: "deepseek",
        base_url: "https://api.deepseek.com/v1",
        env_key: Some("DEEPSEEK_API_KEY"),
    },
    BackendInfo {
        runtime: "groq",
        base_url: "https://api.groq.com/openai/v1",
        env_key: Some("GROQ_API_KEY"),
    },
    BackendInfo {
        runtime: "mistral",
        base_url: "https://api.mistral.ai/v1",
        env_key: Some("MISTRAL_API_KEY"),
    },
    BackendInfo {
        runtime: "openrouter",
        base_url: "https://openrouter.ai/api/v1",
        env_key: Some("OPENROUTER_API_KEY"),
    },
    BackendInfo {
        runtime: "xai",
        base_url: "https://api.x.ai/v1",
        env_key: Some("XAI_API_KEY"),
    },
    BackendInfo {
        runtime: "together_ai",
        base_url: "https://api.together.xyz/v1",
        env_key: Some("TOGETHERAI_API_KEY"),
    },
    BackendInfo {
        runtime: "ollama",
        base_url: "http://localhost:11434/v1",
        env_key: None,
    },
];

/// Looks up connection defaults by runtime prefix, case-insensitively.
pub fn backend_info(runtime: &str) -> Option<&'static BackendInfo> {
    BACKENDS
        .iter()
        .find(|info| info.runtime.eq_ignore_ascii_case(runtime))
}

/// Environment variable conventionally holding the API key for `runtime`.
pub fn backend_env_key(runtime: &str) -> Option<&'static str> {
    backend_info(runtime).and_then(|info| info.env_key)
}

/// Joins `path` under the `/v1` segment of `base`, adding the segment when
/// `base` does not already end with it.
pub fn v1_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{base}/{path}")
    } else {
        format!("{base}/v1/{path}")
    }
}
