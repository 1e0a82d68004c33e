use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("api discovery failed for {group_version}: {cause}")]
    GroupVersion {
        group_version: String,
        cause: String,
    },

    #[error("api group listing failed: {0}")]
    Groups(String),
}

#[derive(Debug, Error)]
#[error("failed to list {kind}: {cause}")]
pub struct FetchError {
    pub kind: String,
    pub cause: String,
}

impl FetchError {
    pub fn new(kind: impl Into<String>, cause: impl ToString) -> Self {
        Self {
            kind: kind.into(),
            cause: cause.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LogsError {
    #[error("pod {pod} not found in namespace {namespace}")]
    NotFound { pod: String, namespace: String },

    #[error("pod {pod} is in {phase} state - no active logs available")]
    TerminalPhase { pod: String, phase: String },

    #[error("failed to fetch logs for {pod}: {cause}")]
    Transport { pod: String, cause: String },
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("unsupported resource {kind} for api version {api_version}")]
    UnsupportedKind { api_version: String, kind: String },

    #[error("invalid manifest: {0}")]
    MalformedManifest(String),

    #[error("cluster rejected {kind} {name}: {cause}")]
    ClusterRejected {
        kind: String,
        name: String,
        cause: String,
    },
}
