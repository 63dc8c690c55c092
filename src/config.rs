use std::path::PathBuf;
use std::time::Duration;

/// Model used when none is given.
pub const DEFAULT_MODEL: &str = "openai/chatgpt";
/// Seed sent with every request unless overridden.
pub const DEFAULT_SEED: u64 = 42;
/// Directory receiving result batches.
pub const DEFAULT_OUTDIR: &str = "results";

/// Settings for one interview run.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewConfig {
    /// Model identifier in `<runtime>/<model>` form
    pub model: String,
    /// Custom API base of an OpenAI-compatible server
    pub api_base: Option<String>,
    /// Runtime family reported in results, overriding the model prefix
    pub runtime: Option<String>,
    pub seed: u64,
    /// Pause between consecutive challenges
    pub delay: Duration,
    /// Skip parameters the provider does not accept
    pub drop_params: bool,
    pub template_path: Option<PathBuf>,
    /// JSON-encoded list of stop sequences
    pub stop: Option<String>,
    pub outdir: PathBuf,
    /// Upper bound on a single completion call
    pub timeout_seconds: Option<u64>,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: None,
            runtime: None,
            seed: DEFAULT_SEED,
            delay: Duration::ZERO,
            drop_params: true,
            template_path: None,
            stop: None,
            outdir: PathBuf::from(DEFAULT_OUTDIR),
            timeout_seconds: None,
        }
    }
}
