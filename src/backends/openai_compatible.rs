//! Chat completions over the OpenAI wire format.
//!
//! Serves the hosted families listed in [`super::backend_info`] as well as any
//! self-hosted server reached through an `api_base` parameter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::chat::{
    parse_completion, ChatMessage, CompletionProvider, CompletionRequest, CompletionResponse,
};
use crate::error::InterviewError;
use crate::params::API_BASE_KEY;
use crate::resolve::split_model;

use super::{backend_info, v1_url};

/// Options the chat completions endpoint is documented to accept.
const SUPPORTED_PARAMS: &[&str] = &[
    "temperature",
    "top_p",
    "n",
    "stop",
    "max_tokens",
    "max_completion_tokens",
    "presence_penalty",
    "frequency_penalty",
    "logit_bias",
    "logprobs",
    "top_logprobs",
    "user",
    "response_format",
];

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    seed: u64,
    stream: bool,
    #[serde(flatten)]
    options: Map<String, Value>,
}

/// Client for OpenAI-compatible chat completion servers.
#[derive(Debug, Clone)]
pub struct OpenAICompatible {
    client: Client,
    api_key: Option<SecretString>,
}

impl OpenAICompatible {
    /// Creates a client; `timeout_seconds` bounds each completion call.
    pub fn new(
        api_key: Option<SecretString>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, InterviewError> {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(sec));
        }
        Ok(Self::with_client(builder.build()?, api_key))
    }

    /// Creates a client around an existing HTTP client.
    pub fn with_client(client: Client, api_key: Option<SecretString>) -> Self {
        Self { client, api_key }
    }

    fn endpoint(&self, request: &CompletionRequest<'_>) -> Result<String, InterviewError> {
        let (runtime, _) = split_model(request.model);
        if let Some(base) = request.params.api_base() {
            return Ok(chat_url(base));
        }
        backend_info(runtime)
            .map(|info| format!("{}/chat/completions", info.base_url))
            .ok_or_else(|| {
                InterviewError::Config(format!(
                    "no known endpoint for runtime '{runtime}', pass --apibase"
                ))
            })
    }
}

fn chat_url(base: &str) -> String {
    v1_url(base, "chat/completions")
}

/// Call-level options taken from the parameter set.
fn request_options(request: &CompletionRequest<'_>) -> Map<String, Value> {
    request
        .params
        .iter()
        .filter(|(key, _)| key.as_str() != API_BASE_KEY)
        .filter(|(key, _)| {
            let keep = !request.drop_params || SUPPORTED_PARAMS.contains(&key.as_str());
            if !keep {
                log::debug!("dropping unsupported parameter '{key}'");
            }
            keep
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[async_trait]
impl CompletionProvider for OpenAICompatible {
    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<Box<dyn CompletionResponse>, InterviewError> {
        let url = self.endpoint(request)?;
        let (_, model) = split_model(request.model);
        let body = ChatRequest {
            model,
            messages: request.messages,
            seed: request.seed,
            stream: false,
            options: request_options(request),
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("chat request payload: {}", json);
            }
        }

        let mut http = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key.expose_secret());
        }
        let resp = http.send().await?;
        let status = resp.status();
        log::debug!("{url} HTTP status: {status}");

        let text = resp.text().await?;
        if !status.is_success() {
            return Err(InterviewError::Provider(format!("{status}: {text}")));
        }
        let json: Value =
            serde_json::from_str(&text).map_err(|err| InterviewError::ResponseFormat {
                message: err.to_string(),
                raw_response: text.clone(),
            })?;
        Ok(parse_completion(json))
    }
}
