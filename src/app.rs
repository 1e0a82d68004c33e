use serde_json::Value;
use tracing::{debug, info, warn};

use crate::catalog::{DiscoveryReport, ResourceCatalog};
use crate::controller::{TableController, TableLoad};
use crate::error::{ApplyError, DiscoveryError, FetchError, LogsError};
use crate::inspect::{DEFAULT_LOG_TAIL_LINES, LogsRequest, LogsView, PodLogs, TextView, describe_text};
use crate::input::Action;
use crate::model::{NamespaceScope, ResourceKindDescriptor};
use crate::templates::{CreateDraft, DEFAULT_TEMPLATE_DIR, Manifest, TemplateStore, parse_manifest};
use crate::watch::{WatchTarget, WatchTick, WatchTicket};

const PAGE_STEP: isize = 10;
const FALLBACK_NAMESPACE: &str = "default";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InputMode {
    Normal,
    Filter,
    Namespace,
    Describe,
    Logs,
    Create,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FocusPane {
    Catalog,
    Table,
}

#[derive(Debug)]
pub enum AppCommand {
    None,
    DiscoverKinds,
    LoadTable(TableLoad),
    ScheduleWatch(WatchTicket),
    LoadDescribe {
        kind: ResourceKindDescriptor,
        namespace: Option<String>,
        name: String,
    },
    LoadLogs(LogsRequest),
    LoadNamespaces,
    EditDraft,
    CreateInstance {
        manifest: Manifest,
        namespace: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct NamespacePicker {
    pub items: Vec<String>,
    pub selected: usize,
    pub loading: bool,
}

pub struct App {
    running: bool,
    cluster: String,
    context: String,
    scope: NamespaceScope,
    default_namespace: String,
    mode: InputMode,
    focus: FocusPane,
    catalog: ResourceCatalog,
    catalog_selected: usize,
    filter: String,
    pending_kind: Option<String>,
    table: TableController,
    describe: Option<TextView>,
    logs: Option<LogsView>,
    draft: Option<CreateDraft>,
    namespace_picker: Option<NamespacePicker>,
    templates: TemplateStore,
    log_tail_lines: i64,
    show_help: bool,
    status: String,
}

impl App {
    pub fn new(cluster: String, context: String, scope: NamespaceScope) -> Self {
        let default_namespace = scope
            .namespace()
            .unwrap_or(FALLBACK_NAMESPACE)
            .to_string();
        Self {
            running: true,
            cluster,
            context,
            scope,
            default_namespace,
            mode: InputMode::Normal,
            focus: FocusPane::Catalog,
            catalog: ResourceCatalog::default(),
            catalog_selected: 0,
            filter: String::new(),
            pending_kind: None,
            table: TableController::default(),
            describe: None,
            logs: None,
            draft: None,
            namespace_picker: None,
            templates: TemplateStore::new(DEFAULT_TEMPLATE_DIR),
            log_tail_lines: DEFAULT_LOG_TAIL_LINES,
            show_help: false,
            status: "Ready".to_string(),
        }
    }

    pub fn with_templates(mut self, templates: TemplateStore) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_log_tail_lines(mut self, lines: i64) -> Self {
        self.log_tail_lines = lines;
        self
    }

    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    pub fn with_pending_kind(mut self, token: Option<String>) -> Self {
        self.pending_kind = token;
        self
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn focus(&self) -> FocusPane {
        self.focus
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn namespace_scope(&self) -> &NamespaceScope {
        &self.scope
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn table(&self) -> &TableController {
        &self.table
    }

    pub fn describe(&self) -> Option<&TextView> {
        self.describe.as_ref()
    }

    pub fn logs(&self) -> Option<&LogsView> {
        self.logs.as_ref()
    }

    pub fn draft(&self) -> Option<&CreateDraft> {
        self.draft.as_ref()
    }

    pub fn namespace_picker(&self) -> Option<&NamespacePicker> {
        self.namespace_picker.as_ref()
    }

    pub fn catalog_selected(&self) -> usize {
        self.catalog_selected
    }

    pub fn visible_kinds(&self) -> Vec<(usize, &ResourceKindDescriptor)> {
        let needle = self.filter.trim().to_ascii_lowercase();
        self.catalog
            .descriptors()
            .iter()
            .enumerate()
            .filter(|(_, descriptor)| {
                needle.is_empty()
                    || descriptor.name.contains(&needle)
                    || descriptor.kind.to_ascii_lowercase().contains(&needle)
                    || descriptor.short_names.iter().any(|short| short == &needle)
            })
            .collect()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn apply_action(&mut self, action: Action) -> AppCommand {
        if self.show_help && !matches!(action, Action::ToggleHelp | Action::Quit) {
            self.show_help = false;
            return AppCommand::None;
        }

        if matches!(action, Action::Quit) {
            return self.quit();
        }

        match self.mode {
            InputMode::Normal => self.apply_normal(action),
            InputMode::Filter => self.apply_filter(action),
            InputMode::Namespace => self.apply_namespace(action),
            InputMode::Describe => self.apply_describe_action(action),
            InputMode::Logs => self.apply_logs_action(action),
            InputMode::Create => self.apply_create_action(action),
        }
    }

    fn apply_normal(&mut self, action: Action) -> AppCommand {
        match action {
            Action::Down => self.move_focused(1),
            Action::Up => self.move_focused(-1),
            Action::PageDown => self.move_focused(PAGE_STEP),
            Action::PageUp => self.move_focused(-PAGE_STEP),
            Action::Top => match self.focus {
                FocusPane::Catalog => self.catalog_selected = 0,
                FocusPane::Table => self.table.first_row(),
            },
            Action::Bottom => match self.focus {
                FocusPane::Catalog => {
                    self.catalog_selected = self.visible_kinds().len().saturating_sub(1)
                }
                FocusPane::Table => self.table.last_row(),
            },
            Action::Left if self.focus == FocusPane::Table => self.table.move_column(-1),
            Action::Right if self.focus == FocusPane::Table => self.table.move_column(1),
            Action::ToggleFocus => {
                self.focus = match self.focus {
                    FocusPane::Catalog => FocusPane::Table,
                    FocusPane::Table => FocusPane::Catalog,
                };
            }
            Action::Select => {
                return match self.focus {
                    FocusPane::Catalog => self.select_highlighted_kind(),
                    FocusPane::Table => self.open_describe(),
                };
            }
            Action::Refresh => {
                return match self.table.refresh(&self.scope) {
                    Some(load) => {
                        self.status = format!("Refreshing {}", load.kind);
                        AppCommand::LoadTable(load)
                    }
                    None => {
                        self.status = "Select a resource kind first".to_string();
                        AppCommand::None
                    }
                };
            }
            Action::RefreshCatalog => {
                self.status = "Refreshing resource kinds...".to_string();
                return AppCommand::DiscoverKinds;
            }
            Action::ToggleWatch => return self.toggle_table_watch(),
            Action::Describe => return self.open_describe(),
            Action::Logs => return self.open_logs(),
            Action::Create => self.open_create(),
            Action::PickNamespace => {
                self.namespace_picker = Some(NamespacePicker {
                    loading: true,
                    ..NamespacePicker::default()
                });
                self.mode = InputMode::Namespace;
                return AppCommand::LoadNamespaces;
            }
            Action::StartFilter => {
                self.mode = InputMode::Filter;
                self.focus = FocusPane::Catalog;
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Close => {
                if !self.filter.is_empty() {
                    self.filter.clear();
                    self.catalog_selected = 0;
                } else {
                    self.focus = FocusPane::Catalog;
                }
            }
            _ => {}
        }
        AppCommand::None
    }

    fn apply_filter(&mut self, action: Action) -> AppCommand {
        match action {
            Action::InputChar(c) => {
                self.filter.push(c);
                self.catalog_selected = 0;
            }
            Action::Backspace => {
                self.filter.pop();
                self.catalog_selected = 0;
            }
            Action::SubmitInput => self.mode = InputMode::Normal,
            Action::CancelInput => {
                self.filter.clear();
                self.catalog_selected = 0;
                self.mode = InputMode::Normal;
            }
            _ => {}
        }
        AppCommand::None
    }

    fn apply_namespace(&mut self, action: Action) -> AppCommand {
        let Some(picker) = self.namespace_picker.as_mut() else {
            self.mode = InputMode::Normal;
            return AppCommand::None;
        };

        match action {
            Action::Down => picker.selected = step(picker.selected, 1, picker.items.len()),
            Action::Up => picker.selected = step(picker.selected, -1, picker.items.len()),
            Action::Top => picker.selected = 0,
            Action::Bottom => picker.selected = picker.items.len().saturating_sub(1),
            Action::Select => {
                if let Some(namespace) = picker.items.get(picker.selected).cloned() {
                    return self.change_scope(NamespaceScope::Named(namespace));
                }
            }
            Action::AllNamespaces => return self.change_scope(NamespaceScope::All),
            Action::Close => {
                self.namespace_picker = None;
                self.mode = InputMode::Normal;
            }
            _ => {}
        }
        AppCommand::None
    }

    fn apply_describe_action(&mut self, action: Action) -> AppCommand {
        let Some(view) = self.describe.as_mut() else {
            self.mode = InputMode::Normal;
            return AppCommand::None;
        };

        match action {
            Action::Close => {
                self.describe = None;
                self.mode = InputMode::Normal;
            }
            other => scroll_text(view, &other),
        }
        AppCommand::None
    }

    fn apply_logs_action(&mut self, action: Action) -> AppCommand {
        let Some(view) = self.logs.as_mut() else {
            self.mode = InputMode::Normal;
            return AppCommand::None;
        };

        match action {
            Action::Close => {
                view.close();
                self.logs = None;
                self.mode = InputMode::Normal;
            }
            Action::ToggleWatch => {
                let request = view.toggle_watch();
                self.status = if view.is_watching() {
                    format!("Watching logs for {} (refresh every 2s)", view.pod())
                } else {
                    "Logs watch stopped".to_string()
                };
                if let Some(request) = request {
                    return AppCommand::LoadLogs(request);
                }
            }
            Action::Refresh => {
                if let Some(request) = view.refresh() {
                    self.status = format!("Refreshing logs for {}", view.pod());
                    return AppCommand::LoadLogs(request);
                }
            }
            other => scroll_text(view.text_mut(), &other),
        }
        AppCommand::None
    }

    fn apply_create_action(&mut self, action: Action) -> AppCommand {
        let Some(draft) = self.draft.as_mut() else {
            self.mode = InputMode::Normal;
            return AppCommand::None;
        };

        match action {
            Action::Close => {
                self.draft = None;
                self.mode = InputMode::Normal;
            }
            Action::ResetDraft => {
                draft.reset();
                self.status = "Template reset to original".to_string();
            }
            Action::EditDraft => return AppCommand::EditDraft,
            Action::ApplyDraft => {
                let namespace = draft.namespace.clone();
                return match parse_manifest(&draft.buffer) {
                    Ok(manifest) => {
                        self.status = format!(
                            "Creating {} {}...",
                            manifest.target.kind(),
                            manifest.name
                        );
                        AppCommand::CreateInstance {
                            manifest,
                            namespace,
                        }
                    }
                    Err(error) => {
                        self.status = format!("Create failed: {error}");
                        AppCommand::None
                    }
                };
            }
            Action::Down => draft.scroll_by(1),
            Action::Up => draft.scroll_by(-1),
            Action::PageDown => draft.scroll_by(PAGE_STEP as i16),
            Action::PageUp => draft.scroll_by(-(PAGE_STEP as i16)),
            _ => {}
        }
        AppCommand::None
    }

    fn quit(&mut self) -> AppCommand {
        if let Some(view) = self.logs.as_mut() {
            view.close();
        }
        self.table.teardown();
        self.running = false;
        self.status = "Exit requested".to_string();
        AppCommand::None
    }

    fn move_focused(&mut self, delta: isize) {
        match self.focus {
            FocusPane::Catalog => {
                let len = self.visible_kinds().len();
                self.catalog_selected = step(self.catalog_selected, delta, len);
            }
            FocusPane::Table => self.table.move_row(delta),
        }
    }

    fn highlighted_kind(&self) -> Option<ResourceKindDescriptor> {
        self.visible_kinds()
            .get(self.catalog_selected)
            .map(|(_, descriptor)| (*descriptor).clone())
    }

    fn select_highlighted_kind(&mut self) -> AppCommand {
        match self.highlighted_kind() {
            Some(kind) => self.select_kind(kind),
            None => {
                self.status = "No resource kind highlighted".to_string();
                AppCommand::None
            }
        }
    }

    fn select_kind(&mut self, kind: ResourceKindDescriptor) -> AppCommand {
        info!("selected kind {kind}");
        self.status = format!("Loading {kind}...");
        self.focus = FocusPane::Table;
        AppCommand::LoadTable(self.table.select_kind(kind, &self.scope))
    }

    fn toggle_table_watch(&mut self) -> AppCommand {
        if self.table.is_watching() {
            self.table.stop_watch();
            self.status = "Watch stopped".to_string();
            return AppCommand::None;
        }

        match self.table.start_watch(&self.scope) {
            Some(load) => {
                self.status = format!("Watching {} (refresh every 1s)", load.kind);
                AppCommand::LoadTable(load)
            }
            None => {
                self.status = "Load a resource kind before watching".to_string();
                AppCommand::None
            }
        }
    }

    fn change_scope(&mut self, scope: NamespaceScope) -> AppCommand {
        self.status = format!("Namespace: {}", scope.label());
        if let NamespaceScope::Named(namespace) = &scope {
            self.default_namespace = namespace.clone();
        }
        self.scope = scope;
        self.namespace_picker = None;
        self.mode = InputMode::Normal;

        match self.table.refresh(&self.scope) {
            Some(load) => AppCommand::LoadTable(load),
            None => AppCommand::None,
        }
    }

    fn target_namespace(&self, kind: &ResourceKindDescriptor, row_namespace: Option<&str>) -> Option<String> {
        if !kind.namespaced {
            return None;
        }
        row_namespace
            .or(self.scope.namespace())
            .map(str::to_string)
            .or_else(|| Some(self.default_namespace.clone()))
    }

    fn selected_item(&mut self) -> Option<(ResourceKindDescriptor, String, Option<String>)> {
        let Some(kind) = self.table.kind().cloned() else {
            self.status = "Select a resource kind first".to_string();
            return None;
        };
        let Some(row) = self.table.selected_row() else {
            self.status = format!("No {} selected", kind.name);
            return None;
        };
        let Some(name) = row.name.clone() else {
            self.status = "Selected row is not a resource".to_string();
            return None;
        };
        let namespace = self.target_namespace(&kind, row.namespace.as_deref());
        Some((kind, name, namespace))
    }

    fn open_describe(&mut self) -> AppCommand {
        let Some((kind, name, namespace)) = self.selected_item() else {
            return AppCommand::None;
        };

        self.describe = Some(TextView::new(
            format!("describe {}/{name}", kind.name),
            "Loading...",
        ));
        self.mode = InputMode::Describe;
        AppCommand::LoadDescribe {
            kind,
            namespace,
            name,
        }
    }

    fn open_logs(&mut self) -> AppCommand {
        let Some((kind, name, namespace)) = self.selected_item() else {
            return AppCommand::None;
        };

        let namespace = namespace.unwrap_or_else(|| self.default_namespace.clone());
        let (view, request) = LogsView::open(&kind, &name, &namespace, self.log_tail_lines);
        self.logs = Some(view);
        self.mode = InputMode::Logs;
        match request {
            Some(request) => AppCommand::LoadLogs(request),
            None => AppCommand::None,
        }
    }

    fn open_create(&mut self) {
        let Some(kind) = self
            .table
            .kind()
            .cloned()
            .or_else(|| self.highlighted_kind())
        else {
            self.status = "Select a resource kind first".to_string();
            return;
        };

        let namespace = self
            .scope
            .namespace()
            .unwrap_or(&self.default_namespace)
            .to_string();
        let template = self.templates.load(&kind, &namespace);
        self.draft = Some(CreateDraft::new(kind, &namespace, template));
        self.mode = InputMode::Create;
    }

    pub fn apply_discovery(
        &mut self,
        result: Result<DiscoveryReport, DiscoveryError>,
    ) -> AppCommand {
        let (descriptors, failures) = match result {
            Ok(report) => (report.descriptors, report.failures.len()),
            Err(error) => {
                warn!("resource discovery failed: {error}");
                (Vec::new(), 1)
            }
        };

        self.catalog = ResourceCatalog::from_discovery(descriptors);
        self.status = if self.catalog.is_fallback() {
            "Resource discovery unavailable, showing built-in kinds".to_string()
        } else if failures > 0 {
            format!(
                "Loaded {} resource kinds ({failures} API groups unavailable)",
                self.catalog.descriptors().len()
            )
        } else {
            format!("Loaded {} resource kinds", self.catalog.descriptors().len())
        };

        self.filter.clear();
        self.catalog_selected = 0;
        if let Some(active) = self.table.kind().cloned() {
            match self.catalog.position_of(&active) {
                Some(index) => self.catalog_selected = index,
                None => {
                    debug!("active kind {active} disappeared from the catalog");
                    self.table.teardown();
                }
            }
        }

        if let Some(token) = self.pending_kind.take() {
            match self.catalog.find(&token) {
                Some(index) => {
                    self.catalog_selected = index;
                    if let Some(kind) = self.catalog.get(index).cloned() {
                        return self.select_kind(kind);
                    }
                }
                None => self.status = format!("Unknown resource kind '{token}'"),
            }
        }
        AppCommand::None
    }

    pub fn apply_table_result(
        &mut self,
        load: &TableLoad,
        outcome: Result<Vec<Value>, FetchError>,
    ) -> AppCommand {
        if let Err(error) = &outcome {
            warn!("{error}");
        }

        let outcome = outcome.as_ref().map(Vec::as_slice);
        let next = self.table.apply(load, outcome);
        if load.watch.is_none()
            && self
                .table
                .kind()
                .is_some_and(|kind| kind.same_kind(&load.kind))
        {
            self.status = match outcome {
                Ok(items) => format!("Loaded {} {}", items.len(), load.kind.name),
                Err(error) => format!("{error}"),
            };
        }

        match next {
            Some(ticket) => AppCommand::ScheduleWatch(ticket),
            None => AppCommand::None,
        }
    }

    pub fn accept_tick(&mut self, tick: WatchTick) -> AppCommand {
        match tick.target {
            WatchTarget::Table => match self.table.on_tick(tick.id, &self.scope) {
                Some(load) => AppCommand::LoadTable(load),
                None => AppCommand::None,
            },
            WatchTarget::Logs => match self.logs.as_ref().and_then(|view| view.on_tick(tick.id)) {
                Some(request) => AppCommand::LoadLogs(request),
                None => AppCommand::None,
            },
        }
    }

    pub fn apply_describe(
        &mut self,
        kind: &ResourceKindDescriptor,
        name: &str,
        outcome: Result<Vec<Value>, FetchError>,
    ) {
        let Some(view) = self.describe.as_mut() else {
            return;
        };
        view.content = describe_text(name, &kind.name, outcome.as_ref().map(Vec::as_slice));
        view.scroll = 0;
    }

    pub fn apply_logs(
        &mut self,
        request: &LogsRequest,
        outcome: Result<PodLogs, LogsError>,
    ) -> AppCommand {
        if let Err(error) = &outcome {
            debug!("logs for {}: {error}", request.pod);
        }
        let Some(view) = self.logs.as_mut() else {
            return AppCommand::None;
        };
        match view.apply(request, &outcome) {
            Some(ticket) => AppCommand::ScheduleWatch(ticket),
            None => AppCommand::None,
        }
    }

    pub fn apply_namespaces(&mut self, outcome: Result<Vec<String>, FetchError>) {
        let Some(picker) = self.namespace_picker.as_mut() else {
            return;
        };

        picker.loading = false;
        picker.items = match outcome {
            Ok(names) if !names.is_empty() => names,
            Ok(_) => vec![FALLBACK_NAMESPACE.to_string()],
            Err(error) => {
                warn!("{error}");
                self.status = format!("Namespace listing failed: {error}");
                vec![FALLBACK_NAMESPACE.to_string()]
            }
        };
        picker.selected = self
            .scope
            .namespace()
            .and_then(|current| picker.items.iter().position(|name| name == current))
            .unwrap_or(0);
    }

    pub fn draft_text(&self) -> Option<&str> {
        self.draft.as_ref().map(|draft| draft.buffer.as_str())
    }

    pub fn set_draft_text(&mut self, text: String) {
        if let Some(draft) = self.draft.as_mut() {
            draft.buffer = text;
            draft.scroll = 0;
            self.status = "Template updated from editor".to_string();
        }
    }

    pub fn apply_create(&mut self, manifest: &Manifest, outcome: Result<Value, ApplyError>) {
        self.status = match outcome {
            Ok(_) => format!(
                "Created {} {}",
                manifest.target.kind(),
                manifest.name
            ),
            Err(error) => {
                warn!("{error}");
                format!("Create failed: {error}")
            }
        };
    }
}

fn scroll_text(view: &mut TextView, action: &Action) {
    match action {
        Action::Down => view.scroll_by(1),
        Action::Up => view.scroll_by(-1),
        Action::PageDown => view.scroll_by(PAGE_STEP as i32),
        Action::PageUp => view.scroll_by(-(PAGE_STEP as i32)),
        Action::Top => view.scroll = 0,
        Action::Bottom => view.scroll_to_end(),
        _ => {}
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
