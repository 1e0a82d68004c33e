use serde_json::Value;
use serde_yaml::Value as YamlValue;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::ApplyError;
use crate::extract::resolve_str;
use crate::model::ResourceKindDescriptor;

pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateTarget {
    Pod,
    Service,
    ConfigMap,
    Secret,
    Deployment,
    ReplicaSet,
}

impl CreateTarget {
    pub fn group(self) -> &'static str {
        match self {
            Self::Pod | Self::Service | Self::ConfigMap | Self::Secret => "",
            Self::Deployment | Self::ReplicaSet => "apps",
        }
    }

    pub fn version(self) -> &'static str {
        "v1"
    }

    pub fn kind(self) -> &'static str {
        match self {
            Self::Pod => "Pod",
            Self::Service => "Service",
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
            Self::Deployment => "Deployment",
            Self::ReplicaSet => "ReplicaSet",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Self::Pod => "pods",
            Self::Service => "services",
            Self::ConfigMap => "configmaps",
            Self::Secret => "secrets",
            Self::Deployment => "deployments",
            Self::ReplicaSet => "replicasets",
        }
    }
}

pub fn resolve_create_target(api_version: &str, kind: &str) -> Result<CreateTarget, ApplyError> {
    let lowered = kind.to_ascii_lowercase();
    let target = match (api_version, lowered.as_str()) {
        ("v1", "pod") => Some(CreateTarget::Pod),
        ("v1", "service") => Some(CreateTarget::Service),
        ("v1", "configmap") => Some(CreateTarget::ConfigMap),
        ("v1", "secret") => Some(CreateTarget::Secret),
        ("apps/v1", "deployment") => Some(CreateTarget::Deployment),
        ("apps/v1", "replicaset") => Some(CreateTarget::ReplicaSet),
        _ => None,
    };

    target.ok_or_else(|| ApplyError::UnsupportedKind {
        api_version: api_version.to_string(),
        kind: kind.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct Manifest {
    pub target: CreateTarget,
    pub name: String,
    pub namespace: Option<String>,
    pub body: Value,
}

impl Manifest {
    pub fn namespace_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.namespace.as_deref().unwrap_or(fallback)
    }
}

pub fn parse_manifest(text: &str) -> Result<Manifest, ApplyError> {
    if text.trim().is_empty() {
        return Err(ApplyError::MalformedManifest(
            "manifest is empty".to_string(),
        ));
    }

    let body: Value = serde_yaml::from_str(text)
        .map_err(|error| ApplyError::MalformedManifest(error.to_string()))?;
    if !body.is_object() {
        return Err(ApplyError::MalformedManifest(
            "manifest must be a mapping".to_string(),
        ));
    }

    let api_version = resolve_str(&body, "apiVersion").unwrap_or_else(|| "v1".to_string());
    let kind = resolve_str(&body, "kind").unwrap_or_default();
    let target = resolve_create_target(&api_version, &kind)?;

    Ok(Manifest {
        target,
        name: resolve_str(&body, "metadata.name").unwrap_or_else(|| "<unnamed>".to_string()),
        namespace: resolve_str(&body, "metadata.namespace"),
        body,
    })
}

pub fn inject_namespace(text: &str, namespace: &str) -> String {
    let Ok(mut doc) = serde_yaml::from_str::<YamlValue>(text) else {
        return text.to_string();
    };
    if !doc.is_mapping() {
        return text.to_string();
    }
    if doc
        .get("metadata")
        .is_some_and(|metadata| !metadata.is_mapping() && !metadata.is_null())
    {
        return text.to_string();
    }

    doc["metadata"]["namespace"] = YamlValue::String(namespace.to_string());
    serde_yaml::to_string(&doc).unwrap_or_else(|_| text.to_string())
}

pub fn builtin_template(kind: &ResourceKindDescriptor, namespace: &str) -> String {
    let name = kind.name.to_ascii_lowercase();
    match (kind.group(), name.as_str()) {
        ("", "pods") => format!(
            "apiVersion: v1
kind: Pod
metadata:
  name: {name}-example
  namespace: {namespace}
spec:
  containers:
  - name: {name}-container
    image: nginx:latest
    ports:
    - containerPort: 80
"
        ),
        ("", "services") => format!(
            "apiVersion: v1
kind: Service
metadata:
  name: {name}-example
  namespace: {namespace}
spec:
  selector:
    app: {name}-app
  ports:
  - protocol: TCP
    port: 80
    targetPort: 9376
"
        ),
        ("apps", "deployments") => format!(
            "apiVersion: apps/v1
kind: Deployment
metadata:
  name: {name}-example
  namespace: {namespace}
spec:
  replicas: 1
  selector:
    matchLabels:
      app: {name}-app
  template:
    metadata:
      labels:
        app: {name}-app
    spec:
      containers:
      - name: {name}-container
        image: nginx:latest
        ports:
        - containerPort: 80
"
        ),
        _ => format!(
            "apiVersion: {}
kind: {}
metadata:
  name: {name}-example
  namespace: {namespace}
spec: {{}}
",
            kind.api_group_version, kind.kind
        ),
    }
}

#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, kind: &ResourceKindDescriptor) -> PathBuf {
        self.dir
            .join(format!("{}.yaml", kind.name.to_ascii_lowercase()))
    }

    pub fn load(&self, kind: &ResourceKindDescriptor, namespace: &str) -> String {
        let path = self.path_for(kind);
        match fs::read_to_string(&path) {
            Ok(raw) => {
                debug!("loaded template {}", path.display());
                inject_namespace(&raw, namespace)
            }
            Err(error) => {
                if path.exists() {
                    warn!("failed to read template {}: {error}", path.display());
                }
                builtin_template(kind, namespace)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateDraft {
    pub kind: ResourceKindDescriptor,
    pub namespace: String,
    original: String,
    pub buffer: String,
    pub scroll: u16,
}

impl CreateDraft {
    pub fn new(kind: ResourceKindDescriptor, namespace: &str, template: String) -> Self {
        Self {
            kind,
            namespace: namespace.to_string(),
            buffer: template.clone(),
            original: template,
            scroll: 0,
        }
    }

    pub fn title(&self) -> String {
        format!(
            "Create {} resource (namespace: {})",
            self.kind.name, self.namespace
        )
    }

    pub fn reset(&mut self) {
        self.buffer = self.original.clone();
        self.scroll = 0;
    }

    pub fn is_modified(&self) -> bool {
        self.buffer != self.original
    }

    pub fn scroll_by(&mut self, delta: i16) {
        let max = self.buffer.lines().count().saturating_sub(1).min(u16::MAX as usize) as u16;
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CreateDraft, CreateTarget, TemplateStore, builtin_template, inject_namespace,
        parse_manifest, resolve_create_target,
    };
    use crate::error::ApplyError;
    use crate::model::ResourceKindDescriptor;
    use std::fs;

    fn kind(name: &str, kind: &str, group_version: &str) -> ResourceKindDescriptor {
        ResourceKindDescriptor::new(name, kind, group_version, true)
    }

    #[test]
    fn routes_supported_kinds() {
        assert_eq!(resolve_create_target("v1", "Pod").ok(), Some(CreateTarget::Pod));
        assert_eq!(
            resolve_create_target("v1", "configmap").ok(),
            Some(CreateTarget::ConfigMap)
        );
        assert_eq!(
            resolve_create_target("apps/v1", "ReplicaSet").ok(),
            Some(CreateTarget::ReplicaSet)
        );
        assert_eq!(CreateTarget::Deployment.group(), "apps");
        assert_eq!(CreateTarget::Secret.plural(), "secrets");
    }

    #[test]
    fn unsupported_pairs_are_rejected_before_any_call() {
        let wrong_group = resolve_create_target("v1", "Deployment");
        assert!(matches!(wrong_group, Err(ApplyError::UnsupportedKind { .. })));

        let job = parse_manifest("apiVersion: batch/v1\nkind: Job\nmetadata:\n  name: j\n");
        assert!(matches!(job, Err(ApplyError::UnsupportedKind { .. })));
    }

    #[test]
    fn malformed_manifests_are_reported() {
        assert!(matches!(
            parse_manifest("   "),
            Err(ApplyError::MalformedManifest(_))
        ));
        assert!(matches!(
            parse_manifest("kind: [unclosed"),
            Err(ApplyError::MalformedManifest(_))
        ));
        assert!(matches!(
            parse_manifest("- just\n- a list\n"),
            Err(ApplyError::MalformedManifest(_))
        ));
    }

    #[test]
    fn parsed_manifest_carries_name_and_namespace() {
        let Ok(manifest) =
            parse_manifest("kind: ConfigMap\nmetadata:\n  name: cfg\n  namespace: dev\n")
        else {
            panic!("expected a configmap manifest to parse");
        };
        assert_eq!(manifest.target, CreateTarget::ConfigMap);
        assert_eq!(manifest.name, "cfg");
        assert_eq!(manifest.namespace_or("default"), "dev");
    }

    #[test]
    fn namespace_injection_overwrites_and_creates_metadata() {
        let injected = inject_namespace(
            "apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\n  namespace: old\n",
            "dev",
        );
        assert!(injected.contains("namespace: dev"));
        assert!(!injected.contains("old"));
        assert!(injected.starts_with("apiVersion: v1"));

        let created = inject_namespace("kind: Secret\n", "dev");
        assert!(created.contains("metadata:\n  namespace: dev"));

        assert_eq!(inject_namespace("metadata: flat", "dev"), "metadata: flat");
        assert_eq!(inject_namespace("{{ broken", "dev"), "{{ broken");
    }

    #[test]
    fn builtin_templates_parse_and_route() {
        for descriptor in [
            kind("pods", "Pod", "v1"),
            kind("services", "Service", "v1"),
            kind("deployments", "Deployment", "apps/v1"),
        ] {
            let text = builtin_template(&descriptor, "dev");
            let Ok(manifest) = parse_manifest(&text) else {
                panic!("builtin template for {} must parse", descriptor.name);
            };
            assert_eq!(manifest.namespace.as_deref(), Some("dev"));
        }

        let generic = builtin_template(&kind("jobs", "Job", "batch/v1"), "dev");
        assert!(generic.contains("kind: Job"));
        assert!(generic.contains("apiVersion: batch/v1"));
    }

    #[test]
    fn store_prefers_file_and_injects_namespace() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("configmaps.yaml"),
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: from-disk\n",
        )
        .unwrap();
        let store = TemplateStore::new(dir.path());

        let loaded = store.load(&kind("configmaps", "ConfigMap", "v1"), "team-a");
        assert!(loaded.contains("from-disk"));
        assert!(loaded.contains("namespace: team-a"));

        let fallback = store.load(&kind("pods", "Pod", "v1"), "team-a");
        assert!(fallback.contains("pods-example"));
    }

    #[test]
    fn draft_reset_restores_template() {
        let mut draft = CreateDraft::new(kind("pods", "Pod", "v1"), "dev", "a: 1\n".to_string());
        draft.buffer.push_str("b: 2\n");
        assert!(draft.is_modified());
        draft.reset();
        assert!(!draft.is_modified());
        assert_eq!(draft.title(), "Create pods resource (namespace: dev)");
    }
}
