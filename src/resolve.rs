//! Works out which model is being interviewed and through which runtime.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::backends::{backend_info, v1_url};
use crate::config::InterviewConfig;
use crate::error::InterviewError;
use crate::params::{parse_stop, ParameterSet};

/// Runtime prefix of generic OpenAI-compatible servers.
pub const OPENAI_RUNTIME: &str = "openai";

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolved identity of the model under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTarget {
    /// Identifier passed to the completion provider
    pub invoke_model: String,
    /// Name recorded in results; the served model when it could be discovered
    pub reported_model: String,
    /// Provider family recorded in results
    pub runtime: String,
}

/// Splits `<runtime>/<model>` at the first `/`.
///
/// An identifier without `/` is its own runtime and model.
pub fn split_model(model: &str) -> (&str, &str) {
    model.split_once('/').unwrap_or((model, model))
}

/// Picks the runtime family for `model`.
///
/// Behind a custom API base an `openai/` prefix only says the server speaks
/// the OpenAI protocol, so the real family has to be given explicitly.
pub fn resolve_runtime(
    model: &str,
    api_base: Option<&str>,
    runtime_override: Option<&str>,
) -> Result<String, InterviewError> {
    let (prefix, _) = split_model(model);
    if api_base.is_some() && prefix == OPENAI_RUNTIME && runtime_override.is_none() {
        return Err(InterviewError::Config(format!(
            "an API base is set and model '{model}' is {OPENAI_RUNTIME}/, \
             so --runtime must be provided"
        )));
    }
    Ok(runtime_override.unwrap_or(prefix).to_string())
}

/// Fails when `model` has neither a custom API base nor a known endpoint.
pub fn check_endpoint(model: &str, api_base: Option<&str>) -> Result<(), InterviewError> {
    let (prefix, _) = split_model(model);
    if api_base.is_none() && backend_info(prefix).is_none() {
        return Err(InterviewError::Config(format!(
            "no known endpoint for runtime '{prefix}', pass --apibase"
        )));
    }
    Ok(())
}

/// Reduces a served model id such as `models/org/name.gguf` to `name`.
pub fn served_model_name(id: &str) -> String {
    let name = id.rsplit('/').next().unwrap_or(id);
    name.strip_suffix(".gguf").unwrap_or(name).to_string()
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Asks `<api_base>/v1/models` which model it serves.
///
/// Returns `None` on any failure; the caller keeps its configured name.
pub async fn discover_model_name(client: &Client, api_base: &str) -> Option<String> {
    let url = v1_url(api_base, "models");
    match fetch_model_list(client, &url).await {
        Ok(list) => {
            let name = list.data.first().map(|entry| served_model_name(&entry.id));
            if name.is_none() {
                log::debug!("{url} listed no models");
            }
            name
        }
        Err(err) => {
            log::debug!("model discovery at {url} failed: {err}");
            None
        }
    }
}

async fn fetch_model_list(client: &Client, url: &str) -> Result<ModelList, InterviewError> {
    let resp = client
        .get(url)
        .timeout(DISCOVERY_TIMEOUT)
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.json().await?)
}

/// Resolves the model target and applies the run's parameter overrides.
///
/// Configuration errors surface before any network traffic.
pub async fn resolve_target(
    config: &InterviewConfig,
    params: &mut ParameterSet,
    client: &Client,
) -> Result<ModelTarget, InterviewError> {
    let runtime = resolve_runtime(
        &config.model,
        config.api_base.as_deref(),
        config.runtime.as_deref(),
    )?;
    check_endpoint(&config.model, config.api_base.as_deref())?;
    let stop = config.stop.as_deref().map(parse_stop).transpose()?;

    let mut reported_model = config.model.clone();
    if let Some(api_base) = &config.api_base {
        params.set_api_base(api_base);
        if let Some(served) = discover_model_name(client, api_base).await {
            log::info!("{api_base} serves {served}");
            reported_model = served;
        }
    }
    if let Some(stop) = stop {
        params.set_stop(stop);
    }

    Ok(ModelTarget {
        invoke_model: config.model.clone(),
        reported_model,
        runtime,
    })
}
