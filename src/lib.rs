//! Runs a batch of coding challenges against an LLM backend.
//!
//! Parameters are normalized to provider names ([`params`]), the model and
//! runtime are resolved, optionally by asking a custom server what it serves
//! ([`resolve`]), and each challenge is sent through a
//! [`chat::CompletionProvider`] by the [`runner::InterviewRunner`], which
//! times the call, renders the answer ([`render`]) and hands the per-file
//! batch of [`record::ResultRecord`]s to a [`sink::ResultSink`].

pub mod backends;
pub mod challenge;
pub mod chat;
pub mod config;
pub mod error;
pub mod params;
pub mod record;
pub mod render;
pub mod resolve;
pub mod runner;
pub mod sink;

pub use challenge::Challenge;
pub use config::InterviewConfig;
pub use error::InterviewError;
pub use params::ParameterSet;
pub use record::ResultRecord;
pub use resolve::ModelTarget;
pub use runner::InterviewRunner;
