use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

// Output goes to `log_file` when given and is discarded otherwise. Hold the guard until exit.
pub fn initialize(level_filter: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(level_filter)?;

    let Some(path) = log_file else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .with_writer(std::io::sink)
            .try_init();
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log file {} has no file name", path.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .with_writer(writer)
        .try_init();

    Ok(Some(guard))
}

fn build_filter(level_filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level_filter)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to initialize tracing filter")
}

#[cfg(test)]
mod tests {
    use super::build_filter;

    #[test]
    fn invalid_filter_falls_back_to_info() {
        let filter = build_filter("kubeglass=loudest").unwrap();
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn directives_are_kept() {
        let filter = build_filter("kubeglass=debug").unwrap();
        assert_eq!(filter.to_string(), "kubeglass=debug");
    }
}
