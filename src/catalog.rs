use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;

use crate::error::DiscoveryError;
use crate::model::{CORE_GROUP_VERSION, ResourceKindDescriptor};

#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub descriptors: Vec<ResourceKindDescriptor>,
    pub failures: Vec<DiscoveryError>,
}

impl DiscoveryReport {
    pub fn push_list(&mut self, group_version: &str, list: &APIResourceList) {
        self.descriptors
            .extend(descriptors_from_resource_list(group_version, list));
    }

    pub fn push_failure(&mut self, failure: DiscoveryError) {
        self.failures.push(failure);
    }
}

pub fn descriptors_from_resource_list(
    group_version: &str,
    list: &APIResourceList,
) -> Vec<ResourceKindDescriptor> {
    list.resources
        .iter()
        .filter(|resource| !resource.name.contains('/'))
        .map(|resource| {
            ResourceKindDescriptor::new(
                resource.name.clone(),
                resource.kind.clone(),
                group_version,
                resource.namespaced,
            )
            .with_short_names(resource.short_names.clone().unwrap_or_default())
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    descriptors: Vec<ResourceKindDescriptor>,
    fallback: bool,
}

impl ResourceCatalog {
    pub fn from_discovery(descriptors: Vec<ResourceKindDescriptor>) -> Self {
        if descriptors.is_empty() {
            return Self::fallback();
        }

        Self {
            descriptors,
            fallback: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            descriptors: vec![
                ResourceKindDescriptor::new("pods", "Pod", CORE_GROUP_VERSION, true)
                    .with_short_names(["po"]),
                ResourceKindDescriptor::new("services", "Service", CORE_GROUP_VERSION, true)
                    .with_short_names(["svc"]),
                ResourceKindDescriptor::new("deployments", "Deployment", "apps/v1", true)
                    .with_short_names(["deploy"]),
                ResourceKindDescriptor::new("configmaps", "ConfigMap", CORE_GROUP_VERSION, true)
                    .with_short_names(["cm"]),
                ResourceKindDescriptor::new("secrets", "Secret", CORE_GROUP_VERSION, true),
            ],
            fallback: true,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn descriptors(&self) -> &[ResourceKindDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, index: usize) -> Option<&ResourceKindDescriptor> {
        self.descriptors.get(index)
    }

    pub fn position_of(&self, descriptor: &ResourceKindDescriptor) -> Option<usize> {
        self.descriptors
            .iter()
            .position(|candidate| candidate.same_kind(descriptor))
    }

    pub fn find(&self, token: &str) -> Option<usize> {
        let mut first = None;
        for (index, descriptor) in self.descriptors.iter().enumerate() {
            if !descriptor.matches_token(token) {
                continue;
            }
            if descriptor.group().is_empty() {
                return Some(index);
            }
            first.get_or_insert(index);
        }

        first
    }
}

#[cfg(test)]
mod tests {
    use super::{DiscoveryReport, ResourceCatalog, descriptors_from_resource_list};
    use crate::error::DiscoveryError;
    use crate::model::ResourceKindDescriptor;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIResource, APIResourceList};

    fn resource(name: &str, kind: &str, namespaced: bool) -> APIResource {
        APIResource {
            name: name.to_string(),
            kind: kind.to_string(),
            namespaced,
            short_names: None,
            verbs: vec!["list".to_string()],
            ..APIResource::default()
        }
    }

    fn resource_list(group_version: &str, resources: Vec<APIResource>) -> APIResourceList {
        APIResourceList {
            group_version: group_version.to_string(),
            resources,
        }
    }

    #[test]
    fn subresources_are_excluded() {
        let mut pods = resource("pods", "Pod", true);
        pods.short_names = Some(vec!["po".to_string()]);
        let list = resource_list(
            "v1",
            vec![
                pods,
                resource("pods/log", "Pod", true),
                resource("pods/exec", "PodExecOptions", true),
                resource("nodes", "Node", false),
            ],
        );

        let descriptors = descriptors_from_resource_list("v1", &list);
        let names = descriptors
            .iter()
            .map(|descriptor| descriptor.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["pods", "nodes"]);
        assert!(descriptors[0].short_names.contains("po"));
        assert!(descriptors[0].namespaced);
        assert!(!descriptors[1].namespaced);
    }

    #[test]
    fn report_keeps_discovery_order_and_failures() {
        let mut report = DiscoveryReport::default();
        report.push_list(
            "v1",
            &resource_list("v1", vec![resource("services", "Service", true)]),
        );
        report.push_failure(DiscoveryError::GroupVersion {
            group_version: "metrics.k8s.io/v1beta1".to_string(),
            cause: "service unavailable".to_string(),
        });
        report.push_list(
            "apps/v1",
            &resource_list("apps/v1", vec![resource("deployments", "Deployment", true)]),
        );

        assert_eq!(report.descriptors.len(), 2);
        assert_eq!(report.descriptors[1].api_group_version, "apps/v1");
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn empty_discovery_falls_back_to_static_kinds() {
        let catalog = ResourceCatalog::from_discovery(Vec::new());
        assert!(catalog.is_fallback());
        let names = catalog
            .descriptors()
            .iter()
            .map(|descriptor| descriptor.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["pods", "services", "deployments", "configmaps", "secrets"]
        );
        assert_eq!(catalog.get(2).map(|d| d.group()), Some("apps"));
    }

    #[test]
    fn find_prefers_core_group() {
        let catalog = ResourceCatalog::from_discovery(vec![
            ResourceKindDescriptor::new("events", "Event", "events.k8s.io/v1", true),
            ResourceKindDescriptor::new("events", "Event", "v1", true).with_short_names(["ev"]),
            ResourceKindDescriptor::new("deployments", "Deployment", "apps/v1", true),
        ]);
        assert!(!catalog.is_fallback());
        assert_eq!(catalog.find("events"), Some(1));
        assert_eq!(catalog.find("ev"), Some(1));
        assert_eq!(catalog.find("Deployment"), Some(2));
        assert_eq!(catalog.find("widgets"), None);
    }

    #[test]
    fn position_of_matches_name_and_group_version() {
        let catalog = ResourceCatalog::fallback();
        let deployments = ResourceKindDescriptor::new("deployments", "Deployment", "apps/v1", true);
        let other = ResourceKindDescriptor::new("deployments", "Deployment", "extensions/v1beta1", true);
        assert_eq!(catalog.position_of(&deployments), Some(2));
        assert_eq!(catalog.position_of(&other), None);
    }
}
