use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::inspect::DEFAULT_LOG_TAIL_LINES;
use crate::k8s::DEFAULT_REQUEST_TIMEOUT;
use crate::templates::DEFAULT_TEMPLATE_DIR;

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    pub namespace: Option<String>,
    pub all_namespaces: bool,
    pub template_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub log_tail_lines: Option<i64>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub source: Option<PathBuf>,
    pub namespace: Option<String>,
    pub all_namespaces: bool,
    pub kind: Option<String>,
    pub template_dir: PathBuf,
    pub request_timeout: Duration,
    pub log_tail_lines: i64,
    pub log_file: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn load(args: &CliArgs) -> Result<Self> {
        let Some(path) = discover_config_path() else {
            return Ok(Self::merge(ConfigFile::default(), None, args));
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read runtime config {}", path.display()))?;
        let parsed = parse_config(&raw)
            .with_context(|| format!("failed to parse runtime config {}", path.display()))?;
        Ok(Self::merge(parsed, Some(path), args))
    }

    pub fn merge(file: ConfigFile, source: Option<PathBuf>, args: &CliArgs) -> Self {
        let (namespace, all_namespaces) = match &args.namespace {
            Some(namespace) => (Some(namespace.clone()), args.all_namespaces),
            None => (file.namespace, args.all_namespaces || file.all_namespaces),
        };
        let timeout_secs = args
            .request_timeout_secs
            .or(file.request_timeout_secs)
            .map(|secs| secs.max(1));

        Self {
            source,
            namespace,
            all_namespaces,
            kind: args.kind.clone(),
            template_dir: args
                .template_dir
                .clone()
                .or(file.template_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR)),
            request_timeout: timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            log_tail_lines: file
                .log_tail_lines
                .filter(|lines| *lines > 0)
                .unwrap_or(DEFAULT_LOG_TAIL_LINES),
            log_file: args.log_file.clone().or(file.log_file),
        }
    }
}

pub fn parse_config(raw: &str) -> Result<ConfigFile> {
    if raw.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(raw).context("invalid kubeglass config")
}

fn discover_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("KUBEGLASS_CONFIG")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }

    let cwd_candidates = [
        PathBuf::from("kubeglass.yaml"),
        PathBuf::from(".kubeglass.yaml"),
    ];
    for candidate in cwd_candidates {
        if candidate.exists() {
            return Some(candidate);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let candidate = PathBuf::from(&home).join(".config/kubeglass/config.yaml");
        if candidate.exists() {
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{ConfigFile, RuntimeConfig, parse_config};
    use crate::cli::CliArgs;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn parses_all_keys() {
        let parsed = parse_config(
            "namespace: team-a\nall_namespaces: false\ntemplate_dir: /etc/kg\nrequest_timeout_secs: 9\nlog_tail_lines: 250\nlog_file: /tmp/kg.log\n",
        )
        .unwrap();
        assert_eq!(parsed.namespace.as_deref(), Some("team-a"));
        assert_eq!(parsed.template_dir, Some(PathBuf::from("/etc/kg")));
        assert_eq!(parsed.request_timeout_secs, Some(9));
        assert_eq!(parsed.log_tail_lines, Some(250));
    }

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(parse_config("").unwrap(), ConfigFile::default());
        assert!(parse_config("namespace: [").is_err());
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let config = RuntimeConfig::merge(ConfigFile::default(), None, &CliArgs::default());
        assert_eq!(config.template_dir, PathBuf::from("templates"));
        assert_eq!(config.request_timeout, Duration::from_secs(4));
        assert_eq!(config.log_tail_lines, 100);
        assert!(config.namespace.is_none());
        assert!(!config.all_namespaces);
    }

    #[test]
    fn flags_override_file_values() {
        let file = ConfigFile {
            namespace: Some("from-file".to_string()),
            all_namespaces: true,
            request_timeout_secs: Some(10),
            ..ConfigFile::default()
        };
        let args = CliArgs {
            namespace: Some("from-flag".to_string()),
            request_timeout_secs: Some(0),
            template_dir: Some(PathBuf::from("/tmp/templates")),
            ..CliArgs::default()
        };

        let config = RuntimeConfig::merge(file, None, &args);
        assert_eq!(config.namespace.as_deref(), Some("from-flag"));
        assert!(!config.all_namespaces);
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.template_dir, PathBuf::from("/tmp/templates"));
    }

    #[test]
    fn file_all_namespaces_applies_without_namespace_flag() {
        let file = ConfigFile {
            all_namespaces: true,
            log_tail_lines: Some(-5),
            ..ConfigFile::default()
        };
        let config = RuntimeConfig::merge(file, None, &CliArgs::default());
        assert!(config.all_namespaces);
        assert_eq!(config.log_tail_lines, 100);
    }
}
