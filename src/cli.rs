use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "kubeglass",
    version,
    about = "Browse any Kubernetes resource kind as a live table."
)]
pub struct CliArgs {
    /// Start in a specific namespace
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Start with all namespaces selected
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Open this resource kind on launch (name, kind or short name)
    #[arg(short, long)]
    pub kind: Option<String>,

    /// tracing filter (for example: info,debug,trace)
    #[arg(long, default_value = "info")]
    pub log_filter: String,

    /// Write logs to this file instead of discarding them
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Directory holding `<kind>.yaml` creation templates
    #[arg(long)]
    pub template_dir: Option<PathBuf>,

    /// Per-request timeout for cluster calls
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;

    #[test]
    fn bare_command_needs_no_flags() {
        let args = CliArgs::parse_from(["kubeglass"]);
        assert_eq!(args.log_filter, "info");
        assert!(args.namespace.is_none());
        assert!(!args.all_namespaces);
    }

    #[test]
    fn short_flags_parse() {
        let args = CliArgs::parse_from(["kubeglass", "-n", "dev", "-k", "deploy", "-A"]);
        assert_eq!(args.namespace.as_deref(), Some("dev"));
        assert_eq!(args.kind.as_deref(), Some("deploy"));
        assert!(args.all_namespaces);
    }
}
