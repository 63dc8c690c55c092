//! Persistence of completed interview batches.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::InterviewError;
use crate::record::ResultRecord;

/// Answer-key tag recorded when answers were not compared against a key.
pub const NO_ANSWER_KEY: &str = "none";

/// Receives the full result batch of one input file.
pub trait ResultSink {
    fn save_interview(
        &mut self,
        input: &Path,
        answer_key: &str,
        params: &Path,
        model: &str,
        results: &[ResultRecord],
    ) -> Result<(), InterviewError>;
}

/// Writes each batch as newline-delimited JSON under a results directory.
#[derive(Debug, Clone)]
pub struct NdjsonResultSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl NdjsonResultSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn path_for(&self, input: &Path, answer_key: &str, params: &Path, model: &str) -> PathBuf {
        let interview = file_stem(input);
        let interview = interview.strip_prefix("prepare_").unwrap_or(&interview);
        let params_name = file_stem(params);
        let model_name = model.replace('/', "-");
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let parts: [&str; 6] = [
            "interview",
            interview,
            answer_key,
            &params_name,
            &model_name,
            &timestamp,
        ];
        let name = parts.join("_");
        self.dir.join(format!("{name}.ndjson"))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl ResultSink for NdjsonResultSink {
    fn save_interview(
        &mut self,
        input: &Path,
        answer_key: &str,
        params: &Path,
        model: &str,
        results: &[ResultRecord],
    ) -> Result<(), InterviewError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(input, answer_key, params, model);
        let mut out = BufWriter::new(fs::File::create(&path)?);
        for record in results {
            serde_json::to_writer(&mut out, record)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        log::info!("saved {} results to {}", results.len(), path.display());
        self.written.push(path);
        Ok(())
    }
}
