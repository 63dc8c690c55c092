use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use llm_interview::config::{InterviewConfig, DEFAULT_MODEL, DEFAULT_OUTDIR, DEFAULT_SEED};

/// Command line arguments for the interview executor
#[derive(Parser, Debug)]
#[command(
    name = "interview",
    about = "Runs prepared coding challenges against an LLM and saves the answers"
)]
pub struct CliArgs {
    /// Comma-separated prepare*.ndjson files from the prepare stage
    #[arg(long)]
    pub input: String,

    /// Model in "runtime/model" form
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// API base URL override
    #[arg(long)]
    pub apibase: Option<String>,

    /// Runtime family to record (required with an openai/ model behind --apibase)
    #[arg(long)]
    pub runtime: Option<String>,

    /// Random seed sent with every request
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// JSON parameter file
    #[arg(long)]
    pub params: PathBuf,

    /// Delay between questions, in seconds
    #[arg(long, default_value_t = 0)]
    pub delay: u64,

    /// Output template applied to each answer
    #[arg(long)]
    pub templateout: Option<PathBuf>,

    /// Stop sequences as a JSON list
    #[arg(long)]
    pub stop: Option<String>,

    /// Directory receiving result files
    #[arg(long, default_value = DEFAULT_OUTDIR)]
    pub outdir: PathBuf,

    /// API key (defaults to the runtime's environment variable)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Send every parameter even if the provider is not known to accept it
    #[arg(long)]
    pub keep_params: bool,

    /// Log level or filter spec (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    pub fn to_config(&self) -> InterviewConfig {
        InterviewConfig {
            model: self.model.clone(),
            api_base: self.apibase.clone(),
            runtime: self.runtime.clone(),
            seed: self.seed,
            delay: Duration::from_secs(self.delay),
            drop_params: !self.keep_params,
            template_path: self.templateout.clone(),
            stop: self.stop.clone(),
            outdir: self.outdir.clone(),
            timeout_seconds: self.timeout,
        }
    }
}
