use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::api::{ListParams, LogParams, PostParams};
use kube::config::Kubeconfig;
use kube::core::{ApiResource, DynamicObject, GroupVersionKind, TypeMeta};
use kube::{Api, Client, Config, ResourceExt};
use serde_json::Value;
use std::fmt::Display;
use std::future::Future;
use tokio::time::{Duration, timeout};
use tracing::{debug, warn};

use crate::catalog::DiscoveryReport;
use crate::error::{ApplyError, DiscoveryError, FetchError, LogsError};
use crate::inspect::{PodLogs, classify_silent_pod};
use crate::model::ResourceKindDescriptor;
use crate::templates::Manifest;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Clone)]
pub struct KubeGateway {
    client: Client,
    context: String,
    cluster: String,
    default_namespace: String,
    request_timeout: Duration,
}

impl KubeGateway {
    pub async fn new(request_timeout: Duration) -> Result<Self> {
        let config = Config::infer()
            .await
            .context("failed to infer Kubernetes configuration")?;
        let context = Kubeconfig::read()
            .ok()
            .and_then(|kubeconfig| kubeconfig.current_context)
            .unwrap_or_else(|| "in-cluster".to_string());
        let cluster = config.cluster_url.to_string();
        let default_namespace = config.default_namespace.clone();
        let client = Client::try_from(config).context("failed to initialize Kubernetes client")?;

        Ok(Self {
            client,
            context,
            cluster,
            default_namespace,
            request_timeout,
        })
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    pub async fn list_kinds(&self) -> Result<DiscoveryReport, DiscoveryError> {
        let mut report = DiscoveryReport::default();

        match self.bounded(self.client.list_core_api_versions()).await {
            Ok(core) => {
                for version in core.versions {
                    match self
                        .bounded(self.client.list_core_api_resources(&version))
                        .await
                    {
                        Ok(list) => report.push_list(&version, &list),
                        Err(cause) => record_failure(&mut report, version, cause),
                    }
                }
            }
            Err(cause) => record_failure(&mut report, "v1".to_string(), cause),
        }

        let groups = match self.bounded(self.client.list_api_groups()).await {
            Ok(groups) => groups,
            Err(cause) => {
                warn!("api group listing failed: {cause}");
                if report.descriptors.is_empty() {
                    return Err(DiscoveryError::Groups(cause));
                }
                report.push_failure(DiscoveryError::Groups(cause));
                return Ok(report);
            }
        };

        for group in groups.groups {
            for version in group.versions {
                match self
                    .bounded(self.client.list_api_group_resources(&version.group_version))
                    .await
                {
                    Ok(list) => report.push_list(&version.group_version, &list),
                    Err(cause) => record_failure(&mut report, version.group_version, cause),
                }
            }
        }

        debug!(
            "discovered {} kinds with {} failed queries",
            report.descriptors.len(),
            report.failures.len()
        );
        Ok(report)
    }

    // `namespace = None` lists a namespaced kind across all namespaces.
    pub async fn list_instances(
        &self,
        kind: &ResourceKindDescriptor,
        namespace: Option<&str>,
    ) -> Result<Vec<Value>, FetchError> {
        let resource = api_resource(kind);
        let api: Api<DynamicObject> = match (kind.namespaced, namespace) {
            (true, Some(namespace)) => {
                Api::namespaced_with(self.client.clone(), namespace, &resource)
            }
            _ => Api::all_with(self.client.clone(), &resource),
        };

        let list = self
            .bounded(api.list(&ListParams::default()))
            .await
            .map_err(|cause| FetchError::new(&kind.name, cause))?;

        list.items
            .into_iter()
            .map(|mut item| {
                if item.types.is_none() {
                    item.types = Some(TypeMeta {
                        api_version: kind.api_group_version.clone(),
                        kind: kind.kind.clone(),
                    });
                }
                serde_json::to_value(item).map_err(|error| FetchError::new(&kind.name, error))
            })
            .collect()
    }

    pub async fn get_logs(
        &self,
        pod: &str,
        namespace: &str,
        tail_lines: i64,
    ) -> Result<PodLogs, LogsError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = LogParams {
            tail_lines: Some(tail_lines),
            ..LogParams::default()
        };

        let read_failure = match self.bounded(pods.logs(pod, &params)).await {
            Ok(text) if !text.trim().is_empty() => return Ok(PodLogs::Output(text)),
            Ok(_) => {
                debug!("pod {namespace}/{pod} returned no log output");
                None
            }
            Err(cause) => {
                debug!("log read for {namespace}/{pod} failed: {cause}");
                Some(cause)
            }
        };

        let phase = self
            .bounded(pods.get_opt(pod))
            .await
            .map_err(|cause| LogsError::Transport {
                pod: pod.to_string(),
                cause,
            })?
            .map(|found| {
                found
                    .status
                    .and_then(|status| status.phase)
                    .unwrap_or_else(|| "Unknown".to_string())
            });

        classify_silent_pod(pod, namespace, read_failure, phase)
    }

    pub async fn create_instance(
        &self,
        manifest: &Manifest,
        fallback_namespace: &str,
    ) -> Result<Value, ApplyError> {
        let target = manifest.target;
        let gvk = GroupVersionKind::gvk(target.group(), target.version(), target.kind());
        let resource = ApiResource::from_gvk_with_plural(&gvk, target.plural());
        let object: DynamicObject = serde_json::from_value(manifest.body.clone())
            .map_err(|error| ApplyError::MalformedManifest(error.to_string()))?;
        let namespace = manifest.namespace_or(fallback_namespace);
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &resource);

        let created = self
            .bounded(api.create(&PostParams::default(), &object))
            .await
            .map_err(|cause| ApplyError::ClusterRejected {
                kind: target.kind().to_string(),
                name: manifest.name.clone(),
                cause,
            })?;

        serde_json::to_value(created)
            .map_err(|error| ApplyError::MalformedManifest(error.to_string()))
    }

    pub async fn list_namespaces(&self) -> Result<Vec<String>, FetchError> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = self
            .bounded(namespaces.list(&ListParams::default()))
            .await
            .map_err(|cause| FetchError::new("namespaces", cause))?;

        let mut names = list
            .into_iter()
            .map(|namespace| namespace.name_any())
            .collect::<Vec<_>>();
        names.sort();
        Ok(names)
    }

    async fn bounded<T, E, F>(&self, future: F) -> std::result::Result<T, String>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        match timeout(self.request_timeout, future).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(error.to_string()),
            Err(_) => Err(format!(
                "request timed out after {}s",
                self.request_timeout.as_secs()
            )),
        }
    }
}

fn api_resource(kind: &ResourceKindDescriptor) -> ApiResource {
    let gvk = GroupVersionKind::gvk(kind.group(), kind.version(), &kind.kind);
    ApiResource::from_gvk_with_plural(&gvk, &kind.name)
}

fn record_failure(report: &mut DiscoveryReport, group_version: String, cause: String) {
    warn!("api discovery failed for {group_version}: {cause}");
    report.push_failure(DiscoveryError::GroupVersion {
        group_version,
        cause,
    });
}
