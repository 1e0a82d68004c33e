use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const PLACEHOLDER: &str = "<none>";
pub const UNKNOWN_AGE: &str = "Unknown";

const DATA_COUNT: &str = "data_count";
const CREATION_TIMESTAMP: &str = "metadata.creationTimestamp";
const RATIO_PATHS: [(&str, &str); 2] = [
    ("status.readyReplicas", "status.replicas"),
    ("status.availableReplicas", "status.replicas"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    Field(Vec<Segment>),
    Ratio {
        numerator: Vec<Segment>,
        denominator: Vec<Segment>,
    },
    DataCount,
    Age(Vec<Segment>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field path '{0}'")]
pub struct InvalidPath(pub String);

impl FieldPath {
    pub fn field(path: &str) -> Self {
        path.parse()
            .unwrap_or_else(|_| Self::Field(vec![Segment::Key(path.to_string())]))
    }

    pub fn extract_at(&self, item: &Value, now: DateTime<Utc>) -> String {
        match self {
            Self::Field(segments) => resolve(item, segments)
                .and_then(display_value)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            Self::Ratio {
                numerator,
                denominator,
            } => format!(
                "{}/{}",
                ratio_side(item, numerator),
                ratio_side(item, denominator)
            ),
            Self::DataCount => entry_count(item.get("data")).to_string(),
            Self::Age(segments) => match resolve(item, segments) {
                Some(Value::String(raw)) => format_age(raw, now),
                _ => UNKNOWN_AGE.to_string(),
            },
        }
    }
}

impl FromStr for FieldPath {
    type Err = InvalidPath;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw == DATA_COUNT {
            return Ok(Self::DataCount);
        }

        let ratio = raw
            .split_once('/')
            .filter(|&pair| RATIO_PATHS.iter().any(|&known| known == pair));
        if let Some((numerator, denominator)) = ratio {
            return Ok(Self::Ratio {
                numerator: parse_segments(numerator)
                    .ok_or_else(|| InvalidPath(raw.to_string()))?,
                denominator: parse_segments(denominator)
                    .ok_or_else(|| InvalidPath(raw.to_string()))?,
            });
        }

        let segments = parse_segments(raw).ok_or_else(|| InvalidPath(raw.to_string()))?;
        if raw == CREATION_TIMESTAMP {
            Ok(Self::Age(segments))
        } else {
            Ok(Self::Field(segments))
        }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(segments) | Self::Age(segments) => write_segments(f, segments),
            Self::Ratio {
                numerator,
                denominator,
            } => {
                write_segments(f, numerator)?;
                write!(f, "/")?;
                write_segments(f, denominator)
            }
            Self::DataCount => write!(f, "{DATA_COUNT}"),
        }
    }
}

pub fn resolve<'a>(item: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(item, |value, segment| match segment {
            Segment::Key(key) => value.as_object()?.get(key),
            Segment::Index(index) => value.as_array()?.get(*index),
        })
        .filter(|value| !value.is_null())
}

pub fn resolve_str(item: &Value, path: &str) -> Option<String> {
    let segments = parse_segments(path)?;
    resolve(item, &segments)
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub fn is_present(item: &Value, path: &str) -> bool {
    parse_segments(path).is_some_and(|segments| resolve(item, &segments).is_some())
}

pub fn format_age(raw: &str, now: DateTime<Utc>) -> String {
    match parse_timestamp(raw) {
        Some(created) => format_age_since(created, now),
        None => UNKNOWN_AGE.to_string(),
    }
}

pub fn format_age_since(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_seconds = (now - created).num_seconds().max(0);
    format_elapsed_seconds(elapsed_seconds)
}

fn format_elapsed_seconds(seconds: i64) -> String {
    if seconds >= 86_400 {
        return format!("{}d", seconds / 86_400);
    }

    if seconds >= 3_600 {
        return format!("{}h", seconds / 3_600);
    }

    format!("{}m", seconds / 60)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_segments(raw: &str) -> Option<Vec<Segment>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    for part in raw.split('.') {
        let (key, mut rest) = match part.find('[') {
            Some(start) => (&part[..start], &part[start..]),
            None => (part, ""),
        };
        if !key.is_empty() {
            segments.push(Segment::Key(key.to_string()));
        } else if rest.is_empty() {
            return None;
        }

        while !rest.is_empty() {
            let inner = rest.strip_prefix('[')?;
            let end = inner.find(']')?;
            let index = inner[..end].trim().parse::<usize>().ok()?;
            segments.push(Segment::Index(index));
            rest = &inner[end + 1..];
        }
    }

    Some(segments)
}

fn write_segments(f: &mut Formatter<'_>, segments: &[Segment]) -> std::fmt::Result {
    for (position, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Key(key) if position == 0 => write!(f, "{key}")?,
            Segment::Key(key) => write!(f, ".{key}")?,
            Segment::Index(index) => write!(f, "[{index}]")?,
        }
    }
    Ok(())
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

fn ratio_side(item: &Value, segments: &[Segment]) -> String {
    match resolve(item, segments) {
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => "0".to_string(),
    }
}

fn entry_count(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Object(map)) => map.len(),
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    }
}
