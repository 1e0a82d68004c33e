use chrono::{DateTime, Local, Utc};
use serde_json::Value;

use crate::columns::infer_columns;
use crate::error::FetchError;
use crate::extract::resolve_str;
use crate::model::{NamespaceScope, ResourceKindDescriptor, RowData, TableData};

pub fn build_table(
    kind: &ResourceKindDescriptor,
    scope: &NamespaceScope,
    outcome: Result<&[Value], &FetchError>,
) -> TableData {
    build_table_at(kind, scope, outcome, Utc::now())
}

pub fn build_table_at(
    kind: &ResourceKindDescriptor,
    scope: &NamespaceScope,
    outcome: Result<&[Value], &FetchError>,
    now: DateTime<Utc>,
) -> TableData {
    let refreshed_at = now.with_timezone(&Local);
    let items = match outcome {
        Ok(items) => items,
        Err(error) => return TableData::error(error, refreshed_at),
    };

    let Some(sample) = items.first() else {
        return TableData::message(
            &["RESULT"],
            vec![format!(
                "No {} found in namespace {}",
                kind.name,
                scope.label_for(kind)
            )],
            refreshed_at,
        );
    };

    let columns = infer_columns(sample);
    if columns.is_empty() {
        return TableData::message(
            &["NAME", "DETAILS"],
            vec![
                "No data".to_string(),
                "No displayable columns found".to_string(),
            ],
            refreshed_at,
        );
    }

    let rows = items
        .iter()
        .map(|item| RowData {
            name: resolve_str(item, "metadata.name"),
            namespace: resolve_str(item, "metadata.namespace"),
            cells: columns
                .iter()
                .map(|column| column.path.extract_at(item, now))
                .collect(),
        })
        .collect();

    TableData::from_columns(&columns, rows, refreshed_at)
}

#[cfg(test)]
mod tests {
    use super::build_table_at;
    use crate::error::FetchError;
    use crate::model::{NamespaceScope, ResourceKindDescriptor, TableKind};
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn kind(name: &str, namespaced: bool) -> ResourceKindDescriptor {
        ResourceKindDescriptor::new(name, "Thing", "v1", namespaced)
    }

    #[test]
    fn empty_collection_renders_single_message_row() {
        let scope = NamespaceScope::Named("dev".to_string());
        let table = build_table_at(&kind("pods", true), &scope, Ok(&[]), Utc::now());
        assert_eq!(table.headers, vec!["RESULT".to_string()]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.rows[0].cells,
            vec!["No pods found in namespace dev".to_string()]
        );
        assert_eq!(table.kind, TableKind::Message);
    }

    #[test]
    fn empty_cluster_scoped_kind_names_the_cluster() {
        let scope = NamespaceScope::Named("dev".to_string());
        let table = build_table_at(&kind("nodes", false), &scope, Ok(&[]), Utc::now());
        assert_eq!(
            table.rows[0].cells,
            vec!["No nodes found in namespace cluster".to_string()]
        );
    }

    #[test]
    fn shapeless_items_render_no_columns_row() {
        let items = [json!({"unexpected": true})];
        let table = build_table_at(
            &kind("things", true),
            &NamespaceScope::All,
            Ok(&items),
            Utc::now(),
        );
        assert_eq!(table.headers, vec!["NAME".to_string(), "DETAILS".to_string()]);
        assert_eq!(table.rows[0].cells[0], "No data");
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn fetch_error_replaces_rows_with_error_row() {
        let error = FetchError::new("pods", "forbidden");
        let table = build_table_at(
            &kind("pods", true),
            &NamespaceScope::All,
            Err(&error),
            Utc::now(),
        );
        assert!(table.is_error());
        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.rows[0].cells,
            vec!["Error: failed to list pods: forbidden".to_string()]
        );
    }

    #[test]
    fn every_row_shares_the_sample_column_set() {
        let now = Utc::now();
        let created = (now - Duration::hours(5)).to_rfc3339();
        let items = [
            json!({
                "metadata": {"name": "a", "namespace": "dev", "creationTimestamp": created},
                "status": {"phase": "Running"}
            }),
            json!({
                "metadata": {"name": "b", "namespace": "dev"},
                "spec": {"type": "ignored"}
            }),
        ];
        let table = build_table_at(
            &kind("pods", true),
            &NamespaceScope::Named("dev".to_string()),
            Ok(&items),
            now,
        );

        assert_eq!(table.headers, vec!["NAME", "STATUS", "AGE"]);
        assert_eq!(table.rows[0].cells, vec!["a", "Running", "5h"]);
        assert_eq!(table.rows[1].cells, vec!["b", "<none>", "Unknown"]);
        assert_eq!(table.rows[1].name.as_deref(), Some("b"));
        assert_eq!(table.rows[1].namespace.as_deref(), Some("dev"));
    }

    #[test]
    fn column_missing_from_sample_is_dropped_for_the_pass() {
        let items = [
            json!({"metadata": {"name": "a"}, "data": {"k": "v"}}),
            json!({"metadata": {"name": "b"}, "status": {"phase": "Bound"}}),
        ];
        let table = build_table_at(
            &kind("configmaps", true),
            &NamespaceScope::All,
            Ok(&items),
            Utc::now(),
        );
        assert_eq!(table.headers, vec!["NAME", "DATA"]);
        assert_eq!(table.rows[1].cells, vec!["b", "0"]);
    }
}
