use clap::Parser;
use secrecy::SecretString;

use llm_interview::backends::{backend_env_key, OpenAICompatible};
use llm_interview::params::ParameterSet;
use llm_interview::render::AnswerTemplate;
use llm_interview::resolve::{resolve_target, split_model};
use llm_interview::runner::{split_inputs, InterviewRunner};
use llm_interview::sink::NdjsonResultSink;
use llm_interview::InterviewError;

use crate::args::CliArgs;
use crate::logging::init_logging;

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let _logger = init_logging(&args.log_level, args.log_file.as_deref())?;
    let config = args.to_config();

    let template = config
        .template_path
        .as_ref()
        .map(AnswerTemplate::load)
        .transpose()?;
    let mut params = ParameterSet::load(&args.params)?.normalized();
    let inputs = split_inputs(&args.input);
    if inputs.is_empty() {
        return Err(InterviewError::Config("--input names no files".to_string()).into());
    }

    let client = reqwest::Client::new();
    let target = resolve_target(&config, &mut params, &client).await?;
    log::info!(
        "interviewing {} (runtime {}, reported as {})",
        target.invoke_model,
        target.runtime,
        target.reported_model
    );

    let api_key = resolve_api_key(
        args.api_key.as_deref(),
        &target.invoke_model,
        params.api_base().is_some(),
    )?;
    let provider = OpenAICompatible::new(api_key, config.timeout_seconds)?;
    let runner = InterviewRunner::new(&provider, target, params)
        .template(template)
        .seed(config.seed)
        .delay(config.delay)
        .drop_params(config.drop_params);

    let mut sink = NdjsonResultSink::new(&config.outdir);
    let saved = runner.run_files(&inputs, &args.params, &mut sink).await?;
    log::info!("{} results across {} files", saved, sink.written().len());
    Ok(())
}

/// Explicit key first, then the environment variable of the model's runtime.
///
/// Hosted runtimes need a key; servers behind a custom API base may not.
fn resolve_api_key(
    explicit: Option<&str>,
    model: &str,
    custom_base: bool,
) -> Result<Option<SecretString>, InterviewError> {
    if let Some(key) = explicit {
        return Ok(Some(SecretString::new(key.to_string())));
    }
    let (runtime, _) = split_model(model);
    let Some(var) = backend_env_key(runtime) else {
        return Ok(None);
    };
    match std::env::var(var) {
        Ok(key) if !key.is_empty() => Ok(Some(SecretString::new(key))),
        _ if custom_base => Ok(None),
        _ => Err(InterviewError::Config(format!(
            "missing API key for {runtime}: pass --api-key or set {var}"
        ))),
    }
}
