use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use crate::extract::FieldPath;

pub const CORE_GROUP_VERSION: &str = "v1";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResourceKindDescriptor {
    pub name: String,
    pub kind: String,
    pub api_group_version: String,
    pub namespaced: bool,
    pub short_names: BTreeSet<String>,
}

impl ResourceKindDescriptor {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        api_group_version: impl Into<String>,
        namespaced: bool,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            api_group_version: api_group_version.into(),
            namespaced,
            short_names: BTreeSet::new(),
        }
    }

    pub fn with_short_names<I, S>(mut self, short_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.short_names = short_names.into_iter().map(Into::into).collect();
        self
    }

    pub fn group(&self) -> &str {
        match self.api_group_version.split_once('/') {
            Some((group, _)) => group,
            None => "",
        }
    }

    pub fn version(&self) -> &str {
        match self.api_group_version.split_once('/') {
            Some((_, version)) => version,
            None => &self.api_group_version,
        }
    }

    pub fn is_pod_like(&self) -> bool {
        self.name == "pods" && self.group().is_empty()
    }

    pub fn same_kind(&self, other: &Self) -> bool {
        self.name == other.name && self.api_group_version == other.api_group_version
    }

    pub fn matches_token(&self, token: &str) -> bool {
        let token = token.trim().to_ascii_lowercase();
        if token.is_empty() {
            return false;
        }

        self.name == token
            || self.kind.to_ascii_lowercase() == token
            || self.short_names.iter().any(|short| short == &token)
    }
}

impl Display for ResourceKindDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.group().is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.name, self.group())
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum NamespaceScope {
    All,
    Named(String),
}

impl NamespaceScope {
    pub fn label(&self) -> String {
        match self {
            Self::All => "all".to_string(),
            Self::Named(namespace) => namespace.clone(),
        }
    }

    pub fn label_for(&self, kind: &ResourceKindDescriptor) -> String {
        if kind.namespaced {
            self.label()
        } else {
            "cluster".to_string()
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Named(namespace) => Some(namespace.as_str()),
        }
    }
}

impl Display for NamespaceScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Named(namespace) => write!(f, "{namespace}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub display_name: String,
    pub path: FieldPath,
    pub width_hint: u16,
}

impl ColumnSpec {
    pub fn new(display_name: &str, path: FieldPath, width_hint: u16) -> Self {
        Self {
            display_name: display_name.to_string(),
            path,
            width_hint,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowData {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableKind {
    #[default]
    Items,
    Message,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct TableData {
    pub headers: Vec<String>,
    pub widths: Vec<u16>,
    pub rows: Vec<RowData>,
    pub kind: TableKind,
    pub last_refreshed: Option<DateTime<Local>>,
}

impl TableData {
    pub fn from_columns(
        columns: &[ColumnSpec],
        rows: Vec<RowData>,
        refreshed_at: DateTime<Local>,
    ) -> Self {
        Self {
            headers: columns
                .iter()
                .map(|column| column.display_name.clone())
                .collect(),
            widths: columns.iter().map(|column| column.width_hint).collect(),
            rows,
            kind: TableKind::Items,
            last_refreshed: Some(refreshed_at),
        }
    }

    pub fn message(
        headers: &[&str],
        cells: Vec<String>,
        refreshed_at: DateTime<Local>,
    ) -> Self {
        Self {
            headers: headers.iter().map(|header| header.to_string()).collect(),
            widths: headers.iter().map(|_| 20).collect(),
            rows: vec![RowData {
                name: None,
                namespace: None,
                cells,
            }],
            kind: TableKind::Message,
            last_refreshed: Some(refreshed_at),
        }
    }

    pub fn error(error: impl Display, refreshed_at: DateTime<Local>) -> Self {
        Self {
            kind: TableKind::Error,
            ..Self::message(&["ERROR"], vec![format!("Error: {error}")], refreshed_at)
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_error(&self) -> bool {
        self.kind == TableKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::{NamespaceScope, ResourceKindDescriptor, TableData, TableKind};
    use chrono::Local;

    #[test]
    fn descriptor_splits_group_and_version() {
        let deployments = ResourceKindDescriptor::new("deployments", "Deployment", "apps/v1", true);
        assert_eq!(deployments.group(), "apps");
        assert_eq!(deployments.version(), "v1");

        let pods = ResourceKindDescriptor::new("pods", "Pod", "v1", true);
        assert_eq!(pods.group(), "");
        assert_eq!(pods.version(), "v1");
        assert!(pods.is_pod_like());
        assert!(!deployments.is_pod_like());
    }

    #[test]
    fn descriptor_matches_name_kind_and_short_names() {
        let services = ResourceKindDescriptor::new("services", "Service", "v1", true)
            .with_short_names(["svc"]);
        assert!(services.matches_token("services"));
        assert!(services.matches_token("Service"));
        assert!(services.matches_token("svc"));
        assert!(!services.matches_token("pods"));
        assert!(!services.matches_token(" "));
    }

    #[test]
    fn descriptor_display_appends_group() {
        let ingresses =
            ResourceKindDescriptor::new("ingresses", "Ingress", "networking.k8s.io/v1", true);
        assert_eq!(ingresses.to_string(), "ingresses.networking.k8s.io");
    }

    #[test]
    fn all_scope_has_no_namespace() {
        assert_eq!(NamespaceScope::All.namespace(), None);
        assert_eq!(
            NamespaceScope::Named("kube-system".to_string()).namespace(),
            Some("kube-system")
        );
        assert_eq!(NamespaceScope::All.label(), "all");
    }

    #[test]
    fn error_table_is_single_row() {
        let table = TableData::error("boom", Local::now());
        assert_eq!(table.headers, vec!["ERROR".to_string()]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells, vec!["Error: boom".to_string()]);
        assert_eq!(table.kind, TableKind::Error);
        assert!(table.is_error());
    }
}
