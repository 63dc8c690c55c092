use std::path::Path;

use flexi_logger::{FileSpec, Logger, LoggerHandle};

/// Starts logging to stderr, or to `file` when given.
///
/// Stdout is left to progress lines and answers.
pub fn init_logging(level: &str, file: Option<&Path>) -> anyhow::Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(level)?;
    let logger = match file {
        Some(path) => logger.log_to_file(FileSpec::try_from(path)?),
        None => logger.log_to_stderr(),
    };
    Ok(logger.start()?)
}
