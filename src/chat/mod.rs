mod message;
mod response;
mod traits;
mod usage;

pub use message::{ChatMessage, ChatMessageBuilder, ChatRole};
pub use response::{parse_completion, ChatChoice, ChatCompletion, ChoiceMessage, RawCompletion};
pub use traits::{CompletionProvider, CompletionRequest, CompletionResponse};
pub use usage::Usage;
