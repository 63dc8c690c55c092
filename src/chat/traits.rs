use async_trait::async_trait;

use crate::error::InterviewError;
use crate::params::ParameterSet;

use super::message::ChatMessage;
use super::usage::Usage;

/// A single completion call: model, conversation and call-level options.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    /// Model identifier in `<runtime>/<model>` form
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    /// Fixed seed so repeated runs with the same params are comparable
    pub seed: u64,
    /// Options spread into the request body
    pub params: &'a ParameterSet,
    /// Skip options the provider is not known to accept instead of sending them
    pub drop_params: bool,
}

/// Outcome of a completion call, independent of the wire shape it came in.
pub trait CompletionResponse: std::fmt::Debug + Send + Sync {
    /// Generated text of the first choice.
    fn text(&self) -> Option<String>;
    fn usage(&self) -> Usage;
}

/// Anything able to answer a [`CompletionRequest`].
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<Box<dyn CompletionResponse>, InterviewError>;
}
