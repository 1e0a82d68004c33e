use serde_json::{Value, json};
use tracing::debug;

use crate::error::{FetchError, LogsError};
use crate::extract::resolve_str;
use crate::model::ResourceKindDescriptor;
use crate::watch::{LOGS_WATCH_INTERVAL, WatchSlot, WatchTarget, WatchTicket};

pub const DEFAULT_LOG_TAIL_LINES: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodLogs {
    Output(String),
    Quiet { phase: String },
}

pub fn is_terminal_phase(phase: &str) -> bool {
    matches!(phase, "Succeeded" | "Failed")
}

// `phase` is `None` when the pod does not exist.
pub fn classify_silent_pod(
    pod: &str,
    namespace: &str,
    read_failure: Option<String>,
    phase: Option<String>,
) -> Result<PodLogs, LogsError> {
    match (phase, read_failure) {
        (None, _) => Err(LogsError::NotFound {
            pod: pod.to_string(),
            namespace: namespace.to_string(),
        }),
        (Some(phase), _) if is_terminal_phase(&phase) => Err(LogsError::TerminalPhase {
            pod: pod.to_string(),
            phase,
        }),
        (Some(_), Some(cause)) => Err(LogsError::Transport {
            pod: pod.to_string(),
            cause,
        }),
        (Some(phase), None) => Ok(PodLogs::Quiet { phase }),
    }
}

pub fn reflow_logs(text: &str) -> String {
    let lines = text.lines().collect::<Vec<_>>();
    let mut out = Vec::with_capacity(lines.len() * 2);
    for (index, line) in lines.iter().enumerate() {
        out.push(*line);
        let next_is_text = lines
            .get(index + 1)
            .is_some_and(|next| !next.trim().is_empty());
        if !line.trim().is_empty() && next_is_text {
            out.push("");
        }
    }
    out.join("\n")
}

pub fn logs_body(pod: &str, outcome: &Result<PodLogs, LogsError>) -> String {
    match outcome {
        Ok(PodLogs::Output(text)) => reflow_logs(text),
        Ok(PodLogs::Quiet { phase }) => {
            format!("No log output yet for pod {pod} (status: {phase})")
        }
        Err(error) => format!("Error: {error}"),
    }
}

pub fn logs_unavailable(kind: &ResourceKindDescriptor) -> String {
    format!("Logs are only available for pods, not {}", kind.name)
}

pub fn find_item<'a>(items: &'a [Value], name: &str) -> Option<&'a Value> {
    items
        .iter()
        .find(|item| resolve_str(item, "metadata.name").as_deref() == Some(name))
}

pub fn describe_payload(items: &[Value], name: &str, kind_name: &str) -> Value {
    match find_item(items, name) {
        Some(item) => item.clone(),
        None => json!({ "error": format!("Resource {name} not found in {kind_name}") }),
    }
}

pub fn describe_text(
    name: &str,
    kind_name: &str,
    outcome: Result<&[Value], &FetchError>,
) -> String {
    match outcome {
        Ok(items) => to_yaml(&describe_payload(items, name, kind_name)),
        Err(error) => to_yaml(&json!({ "error": error.to_string() })),
    }
}

fn to_yaml(value: &Value) -> String {
    serde_yaml::to_string(value).unwrap_or_else(|error| format!("failed to format detail: {error}"))
}

#[derive(Debug, Clone)]
pub struct TextView {
    pub title: String,
    pub content: String,
    pub scroll: u16,
}

impl TextView {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            scroll: 0,
        }
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let max = self.line_count().saturating_sub(1).min(u16::MAX as usize) as u16;
        self.scroll = self.scroll.saturating_add_signed(delta as i16).min(max);
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll = self.line_count().saturating_sub(1).min(u16::MAX as usize) as u16;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogsRequest {
    pub pod: String,
    pub namespace: String,
    pub tail_lines: i64,
    pub watch: Option<u64>,
}

pub struct LogsView {
    pod: String,
    namespace: String,
    tail_lines: i64,
    available: bool,
    view: TextView,
    watch: WatchSlot,
}

impl LogsView {
    pub fn open(
        kind: &ResourceKindDescriptor,
        pod: &str,
        namespace: &str,
        tail_lines: i64,
    ) -> (Self, Option<LogsRequest>) {
        let available = kind.is_pod_like();
        let content = if available {
            "Loading logs...".to_string()
        } else {
            logs_unavailable(kind)
        };
        let view = Self {
            pod: pod.to_string(),
            namespace: namespace.to_string(),
            tail_lines,
            available,
            view: TextView::new(String::new(), content),
            watch: WatchSlot::new(WatchTarget::Logs, LOGS_WATCH_INTERVAL),
        };
        let request = available.then(|| view.request(None));
        (view, request)
    }

    pub fn pod(&self) -> &str {
        &self.pod
    }

    pub fn text(&self) -> &TextView {
        &self.view
    }

    pub fn text_mut(&mut self) -> &mut TextView {
        &mut self.view
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_watching()
    }

    pub fn title(&self) -> String {
        let indicator = if self.is_watching() { "●" } else { "○" };
        let status = if self.is_watching() {
            " [WATCHING]"
        } else {
            ""
        };
        format!("{indicator} logs {} -n {}{status}", self.pod, self.namespace)
    }

    pub fn refresh(&self) -> Option<LogsRequest> {
        self.available.then(|| self.request(None))
    }

    pub fn toggle_watch(&mut self) -> Option<LogsRequest> {
        if !self.available {
            return None;
        }
        if self.watch.stop() {
            return None;
        }
        let id = self.watch.start(format!("{}/{}", self.namespace, self.pod));
        Some(self.request(Some(id)))
    }

    pub fn on_tick(&self, id: u64) -> Option<LogsRequest> {
        if !self.watch.accepts(id) {
            debug!("dropping stale logs tick {id}");
            return None;
        }
        Some(self.request(Some(id)))
    }

    pub fn apply(
        &mut self,
        request: &LogsRequest,
        outcome: &Result<PodLogs, LogsError>,
    ) -> Option<WatchTicket> {
        if request.pod != self.pod || request.namespace != self.namespace {
            return None;
        }
        if let Some(id) = request.watch
            && !self.watch.accepts(id)
        {
            debug!("discarding logs for ended watch {id}");
            return None;
        }

        self.view.content = logs_body(&self.pod, outcome);
        if self.is_watching() {
            self.view.scroll_to_end();
        }
        request.watch.and_then(|id| self.watch.reschedule(id))
    }

    pub fn close(&mut self) {
        self.watch.stop();
    }

    fn request(&self, watch: Option<u64>) -> LogsRequest {
        LogsRequest {
            pod: self.pod.clone(),
            namespace: self.namespace.clone(),
            tail_lines: self.tail_lines,
            watch,
        }
    }
}
