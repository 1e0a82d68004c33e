use serde_json::Value;

use crate::extract::{FieldPath, is_present};
use crate::model::ColumnSpec;

pub fn infer_columns(sample: &Value) -> Vec<ColumnSpec> {
    let mut columns = Vec::new();

    if is_present(sample, "metadata.name") {
        columns.push(ColumnSpec::new("NAME", FieldPath::field("metadata.name"), 20));
    }

    if is_present(sample, "status.phase") {
        columns.push(ColumnSpec::new("STATUS", FieldPath::field("status.phase"), 15));
    } else if is_present(sample, "status.conditions[0].type") {
        columns.push(ColumnSpec::new(
            "STATUS",
            FieldPath::field("status.conditions[0].type"),
            15,
        ));
    }

    if is_present(sample, "status.readyReplicas") && is_present(sample, "status.replicas") {
        columns.push(ColumnSpec::new(
            "READY",
            FieldPath::field("status.readyReplicas/status.replicas"),
            10,
        ));
    } else if is_present(sample, "status.availableReplicas")
        && is_present(sample, "status.replicas")
    {
        columns.push(ColumnSpec::new(
            "AVAILABLE",
            FieldPath::field("status.availableReplicas/status.replicas"),
            12,
        ));
    }

    if is_present(sample, "spec.type") {
        columns.push(ColumnSpec::new("TYPE", FieldPath::field("spec.type"), 15));
    } else if is_present(sample, "spec.replicas") {
        columns.push(ColumnSpec::new(
            "REPLICAS",
            FieldPath::field("spec.replicas"),
            10,
        ));
    } else if is_present(sample, "spec.clusterIP") {
        columns.push(ColumnSpec::new(
            "CLUSTER-IP",
            FieldPath::field("spec.clusterIP"),
            15,
        ));
    }

    if sample.get("data").is_some_and(Value::is_object) {
        columns.push(ColumnSpec::new("DATA", FieldPath::field("data_count"), 8));
    }

    if is_present(sample, "metadata.creationTimestamp") {
        columns.push(ColumnSpec::new(
            "AGE",
            FieldPath::field("metadata.creationTimestamp"),
            10,
        ));
    }

    if columns.len() <= 1 {
        if is_present(sample, "kind") {
            columns.push(ColumnSpec::new("KIND", FieldPath::field("kind"), 15));
        }
        if is_present(sample, "apiVersion") {
            columns.push(ColumnSpec::new("VERSION", FieldPath::field("apiVersion"), 15));
        }
    }

    columns
}
