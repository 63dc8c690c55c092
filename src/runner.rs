//! The interview loop: one completion per challenge, timed and recorded.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::challenge::{load_interview, Challenge};
use crate::chat::{ChatMessage, CompletionProvider, CompletionRequest};
use crate::config::DEFAULT_SEED;
use crate::error::InterviewError;
use crate::params::ParameterSet;
use crate::record::ResultRecord;
use crate::render::{render_answer, AnswerTemplate};
use crate::resolve::ModelTarget;
use crate::sink::{ResultSink, NO_ANSWER_KEY};

/// Timing of a single completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perf {
    pub completion_tokens: u32,
    pub elapsed: Duration,
    pub tokens_per_second: f64,
}

impl Perf {
    pub fn new(completion_tokens: u32, elapsed: Duration) -> Self {
        Self {
            completion_tokens,
            elapsed,
            tokens_per_second: tokens_per_second(completion_tokens, elapsed),
        }
    }
}

/// Generation speed; zero when no measurable time passed.
pub fn tokens_per_second(tokens: u32, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        f64::from(tokens) / secs
    } else {
        0.0
    }
}

/// Record produced for one challenge plus how fast it was answered.
#[derive(Debug, Clone)]
pub struct ChallengeOutcome {
    pub record: ResultRecord,
    pub perf: Perf,
}

/// Asks every challenge of an interview, strictly one after another.
pub struct InterviewRunner<'a> {
    provider: &'a dyn CompletionProvider,
    target: ModelTarget,
    params: ParameterSet,
    template: Option<AnswerTemplate>,
    seed: u64,
    delay: Duration,
    drop_params: bool,
    echo: bool,
}

impl<'a> InterviewRunner<'a> {
    pub fn new(
        provider: &'a dyn CompletionProvider,
        target: ModelTarget,
        params: ParameterSet,
    ) -> Self {
        Self {
            provider,
            target,
            params,
            template: None,
            seed: DEFAULT_SEED,
            delay: Duration::ZERO,
            drop_params: true,
            echo: true,
        }
    }

    pub fn template(mut self, template: Option<AnswerTemplate>) -> Self {
        self.template = template;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Pause inserted between consecutive challenges.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn drop_params(mut self, drop_params: bool) -> Self {
        self.drop_params = drop_params;
        self
    }

    /// Print progress, answers and perf lines to stdout.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Sends one challenge and turns the reply into a result record.
    pub async fn ask(&self, challenge: &Challenge) -> Result<ChallengeOutcome, InterviewError> {
        let messages = [ChatMessage::user().content(challenge.prompt.as_str()).build()];
        let request = CompletionRequest {
            model: &self.target.invoke_model,
            messages: &messages,
            seed: self.seed,
            params: &self.params,
            drop_params: self.drop_params,
        };

        let started = Instant::now();
        let response = self.provider.complete(&request).await?;
        let perf = Perf::new(response.usage().completion_tokens, started.elapsed());

        let raw = response.text().unwrap_or_else(|| {
            log::warn!("{}: response carried no text", challenge.name);
            String::new()
        });
        let answer = render_answer(self.template.as_ref(), challenge, &raw)?;
        let record = ResultRecord::new(challenge, answer, &self.params, &self.target);
        Ok(ChallengeOutcome { record, perf })
    }

    /// Runs all `challenges` in order and collects their records.
    ///
    /// The first failed completion aborts the interview.
    pub async fn run_interview(
        &self,
        challenges: &[Challenge],
    ) -> Result<Vec<ResultRecord>, InterviewError> {
        let total = challenges.len();
        let mut results = Vec::with_capacity(total);

        for (idx, challenge) in challenges.iter().enumerate() {
            if self.echo {
                println!("{}/{} {} {}", idx + 1, total, challenge.name, challenge.language);
            }
            let outcome = self.ask(challenge).await?;
            self.report(&outcome);
            log::info!(
                "{}/{} {} {}: {} tokens in {:.2}s ({:.2} tok/sec)",
                idx + 1,
                total,
                challenge.name,
                challenge.language,
                outcome.perf.completion_tokens,
                outcome.perf.elapsed.as_secs_f64(),
                outcome.perf.tokens_per_second
            );
            results.push(outcome.record);

            if !self.delay.is_zero() && idx + 1 < total {
                sleep(self.delay).await;
            }
        }
        Ok(results)
    }

    /// Interviews each input file separately, handing every batch to `sink`.
    ///
    /// Returns the number of records saved across all files.
    pub async fn run_files(
        &self,
        inputs: &[PathBuf],
        params_path: &Path,
        sink: &mut dyn ResultSink,
    ) -> Result<usize, InterviewError> {
        let mut saved = 0;
        for input in inputs {
            let challenges = load_interview(input)?;
            log::info!("{}: {} challenges", input.display(), challenges.len());
            let results = self.run_interview(&challenges).await?;
            sink.save_interview(
                input,
                NO_ANSWER_KEY,
                params_path,
                &self.target.reported_model,
                &results,
            )?;
            saved += results.len();
        }
        Ok(saved)
    }

    fn report(&self, outcome: &ChallengeOutcome) {
        if !self.echo {
            return;
        }
        println!();
        println!("{}", outcome.record.answer);
        println!(
            "PERF: {} generated {} tokens in {:.2}s, {:.2} tok/sec",
            self.target.invoke_model,
            outcome.perf.completion_tokens,
            outcome.perf.elapsed.as_secs_f64(),
            outcome.perf.tokens_per_second
        );
        println!();
    }
}

/// Splits a comma-separated list of input paths.
pub fn split_inputs(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;
    use crate::chat::{ChatCompletion, CompletionResponse, RawCompletion};

    /// Replies after `latency` with a fixed text and token count.
    struct StubProvider {
        latency: Duration,
        tokens: u32,
        fail_on: Option<usize>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn new(latency: Duration, tokens: u32) -> Self {
            Self {
                latency,
                tokens,
                fail_on: None,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        async fn complete(
            &self,
            request: &CompletionRequest<'_>,
        ) -> Result<Box<dyn CompletionResponse>, InterviewError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts
                .lock()
                .unwrap()
                .push(request.messages[0].content.clone());
            sleep(self.latency).await;
            if self.fail_on == Some(call) {
                return Err(InterviewError::Provider("stub failure".into()));
            }
            let text = format!("answer to {}", request.messages[0].content);
            let body = json!({
                "choices": [{"message": {"content": text}}],
                "usage": {
                    "prompt_tokens": 1,
                    "completion_tokens": self.tokens,
                    "total_tokens": self.tokens + 1
                }
            });
            let typed: ChatCompletion = serde_json::from_value(body).unwrap();
            Ok(Box::new(typed))
        }
    }

    /// Sink remembering every batch it receives.
    #[derive(Default)]
    struct MemorySink {
        batches: Vec<(PathBuf, String, String, Vec<ResultRecord>)>,
    }

    impl ResultSink for MemorySink {
        fn save_interview(
            &mut self,
            input: &Path,
            answer_key: &str,
            _params: &Path,
            model: &str,
            results: &[ResultRecord],
        ) -> Result<(), InterviewError> {
            self.batches.push((
                input.to_path_buf(),
                answer_key.to_string(),
                model.to_string(),
                results.to_vec(),
            ));
            Ok(())
        }
    }

    const TWO_CHALLENGES: &str = concat!(
        r#"{"name":"a","language":"python","prompt":"1"}"#,
        "\n",
        r#"{"name":"b","language":"python","prompt":"2"}"#,
        "\n",
    );

    fn target() -> ModelTarget {
        ModelTarget {
            invoke_model: "openai/chatgpt".into(),
            reported_model: "model-name".into(),
            runtime: "llamacpp".into(),
        }
    }

    fn challenges(names: &[&str]) -> Vec<Challenge> {
        names
            .iter()
            .map(|name| Challenge::new(*name, "python", format!("prompt {name}")))
            .collect()
    }

    #[test]
    fn zero_elapsed_has_zero_throughput() {
        assert_eq!(tokens_per_second(10, Duration::ZERO), 0.0);
        assert_eq!(tokens_per_second(0, Duration::from_secs(1)), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn measures_throughput_and_builds_record() {
        let provider = StubProvider::new(Duration::from_secs(2), 10);
        let mut params = ParameterSet::default();
        params.insert("temperature", json!(0.0));
        let runner = InterviewRunner::new(&provider, target(), params.clone()).echo(false);

        let challenge = Challenge::new("t1", "python", "hi");
        let outcome = runner.ask(&challenge).await.unwrap();

        assert!((outcome.perf.tokens_per_second - 5.0).abs() < 1e-6);
        assert_eq!(outcome.perf.completion_tokens, 10);
        let record = outcome.record;
        assert_eq!(record.challenge, challenge);
        assert_eq!(record.answer, "answer to hi");
        assert_eq!(record.params, params);
        assert_eq!(record.model, "model-name");
        assert_eq!(record.runtime, "llamacpp");
    }

    #[tokio::test(start_paused = true)]
    async fn delay_separates_challenges() {
        let provider = StubProvider::new(Duration::ZERO, 1);
        let runner = InterviewRunner::new(&provider, target(), ParameterSet::default())
            .delay(Duration::from_secs(5))
            .echo(false);

        let started = Instant::now();
        let results = runner
            .run_interview(&challenges(&["a", "b", "c"]))
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(results.len(), 3);
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(15));
        assert_eq!(
            *provider.prompts.lock().unwrap(),
            vec!["prompt a", "prompt b", "prompt c"]
        );
    }

    #[tokio::test]
    async fn template_renders_answer() {
        let provider = StubProvider::new(Duration::ZERO, 3);
        let template = AnswerTemplate::new("[{{ language }}] {{ Answer }}").unwrap();
        let runner = InterviewRunner::new(&provider, target(), ParameterSet::default())
            .template(Some(template))
            .echo(false);

        let results = runner.run_interview(&challenges(&["a"])).await.unwrap();
        assert_eq!(results[0].answer, "[python] answer to prompt a");
    }

    #[test]
    fn mapping_message_is_read_like_an_object_message() {
        let body = json!({"choices": [{"message": {"content": [{"type": "text", "text": "x"}]}}]});
        assert_eq!(RawCompletion(body).text().as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn each_file_gets_its_own_batch() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("prepare_one.ndjson");
        let second = dir.path().join("prepare_two.ndjson");
        fs::write(&first, TWO_CHALLENGES).unwrap();
        fs::write(
            &second,
            "{\"name\":\"c\",\"language\":\"javascript\",\"prompt\":\"3\"}\n",
        )
        .unwrap();

        let provider = StubProvider::new(Duration::ZERO, 1);
        let runner = InterviewRunner::new(&provider, target(), ParameterSet::default()).echo(false);
        let mut sink = MemorySink::default();
        let inputs = split_inputs(&format!("{},{}", first.display(), second.display()));

        let saved = runner
            .run_files(&inputs, Path::new("params.json"), &mut sink)
            .await
            .unwrap();

        assert_eq!(saved, 3);
        assert_eq!(sink.batches.len(), 2);
        let (path, key, model, records) = &sink.batches[0];
        assert_eq!(path, &first);
        assert_eq!(key, NO_ANSWER_KEY);
        assert_eq!(model, "model-name");
        let names: Vec<&str> = records.iter().map(|r| r.challenge.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        let names: Vec<&str> = sink.batches[1]
            .3
            .iter()
            .map(|r| r.challenge.name.as_str())
            .collect();
        assert_eq!(names, vec!["c"]);
    }

    #[tokio::test]
    async fn failed_completion_aborts_without_saving_the_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("prepare_one.ndjson");
        fs::write(&input, TWO_CHALLENGES).unwrap();

        let mut provider = StubProvider::new(Duration::ZERO, 1);
        provider.fail_on = Some(1);
        let runner = InterviewRunner::new(&provider, target(), ParameterSet::default()).echo(false);
        let mut sink = MemorySink::default();

        let err = runner
            .run_files(&[input], Path::new("params.json"), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, InterviewError::Provider(_)));
        assert!(sink.batches.is_empty());
    }

    #[test]
    fn split_inputs_ignores_blanks() {
        assert_eq!(
            split_inputs("a.ndjson, b.ndjson,"),
            vec![PathBuf::from("a.ndjson"), PathBuf::from("b.ndjson")]
        );
    }
}
