use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::model::{NamespaceScope, ResourceKindDescriptor, RowData, TableData};
use crate::render::build_table;
use crate::watch::{TABLE_WATCH_INTERVAL, WatchSlot, WatchTarget, WatchTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePhase {
    Idle,
    Loading,
    Rendered,
    Watching,
    Errored,
}

#[derive(Debug, Clone)]
pub struct TableLoad {
    pub kind: ResourceKindDescriptor,
    pub scope: NamespaceScope,
    pub watch: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellCursor {
    pub row: usize,
    pub column: usize,
}

pub struct TableController {
    kind: Option<ResourceKindDescriptor>,
    phase: TablePhase,
    table: TableData,
    cursor: CellCursor,
    watch: WatchSlot,
}

impl Default for TableController {
    fn default() -> Self {
        Self {
            kind: None,
            phase: TablePhase::Idle,
            table: TableData::default(),
            cursor: CellCursor::default(),
            watch: WatchSlot::new(WatchTarget::Table, TABLE_WATCH_INTERVAL),
        }
    }
}

impl TableController {
    pub fn phase(&self) -> TablePhase {
        self.phase
    }

    pub fn kind(&self) -> Option<&ResourceKindDescriptor> {
        self.kind.as_ref()
    }

    pub fn table(&self) -> &TableData {
        &self.table
    }

    pub fn cursor(&self) -> CellCursor {
        self.cursor
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_watching()
    }

    pub fn selected_row(&self) -> Option<&RowData> {
        self.table.rows.get(self.cursor.row)
    }

    pub fn select_kind(
        &mut self,
        kind: ResourceKindDescriptor,
        scope: &NamespaceScope,
    ) -> TableLoad {
        let same_kind = self
            .kind
            .as_ref()
            .is_some_and(|current| current.same_kind(&kind));
        if !same_kind {
            self.watch.stop();
            self.cursor = CellCursor::default();
        }

        self.kind = Some(kind.clone());
        self.phase = if self.watch.is_watching() {
            TablePhase::Watching
        } else {
            TablePhase::Loading
        };
        TableLoad {
            kind,
            scope: scope.clone(),
            watch: None,
        }
    }

    pub fn refresh(&mut self, scope: &NamespaceScope) -> Option<TableLoad> {
        let kind = self.kind.clone()?;
        if self.phase != TablePhase::Watching {
            self.phase = TablePhase::Loading;
        }
        Some(TableLoad {
            kind,
            scope: scope.clone(),
            watch: None,
        })
    }

    pub fn start_watch(&mut self, scope: &NamespaceScope) -> Option<TableLoad> {
        if !matches!(self.phase, TablePhase::Rendered | TablePhase::Errored) {
            return None;
        }
        let kind = self.kind.clone()?;
        let id = self.watch.start(kind.to_string());
        self.phase = TablePhase::Watching;
        Some(TableLoad {
            kind,
            scope: scope.clone(),
            watch: Some(id),
        })
    }

    pub fn stop_watch(&mut self) -> bool {
        let stopped = self.watch.stop();
        if self.phase == TablePhase::Watching {
            self.phase = if self.table.is_error() {
                TablePhase::Errored
            } else {
                TablePhase::Rendered
            };
        }
        stopped
    }

    pub fn on_tick(&self, id: u64, scope: &NamespaceScope) -> Option<TableLoad> {
        if !self.watch.accepts(id) {
            debug!("dropping stale table tick {id}");
            return None;
        }

        Some(TableLoad {
            kind: self.kind.clone()?,
            scope: scope.clone(),
            watch: Some(id),
        })
    }

    pub fn apply(
        &mut self,
        load: &TableLoad,
        outcome: Result<&[Value], &FetchError>,
    ) -> Option<WatchTicket> {
        let current = self.kind.as_ref()?;
        if !current.same_kind(&load.kind) {
            debug!("discarding result for inactive kind {}", load.kind);
            return None;
        }
        if let Some(id) = load.watch
            && !self.watch.accepts(id)
        {
            debug!("discarding result for ended watch {id}");
            return None;
        }

        let table = build_table(&load.kind, &load.scope, outcome);
        self.set_table(table);

        if self.watch.is_watching() {
            self.phase = TablePhase::Watching;
        } else if self.table.is_error() {
            self.phase = TablePhase::Errored;
        } else {
            self.phase = TablePhase::Rendered;
        }

        load.watch.and_then(|id| self.watch.reschedule(id))
    }

    pub fn teardown(&mut self) {
        self.watch.stop();
        self.kind = None;
        self.table = TableData::default();
        self.cursor = CellCursor::default();
        self.phase = TablePhase::Idle;
    }

    pub fn move_row(&mut self, delta: isize) {
        self.cursor.row = step(self.cursor.row, delta, self.table.rows.len());
    }

    pub fn move_column(&mut self, delta: isize) {
        self.cursor.column = step(self.cursor.column, delta, self.table.column_count());
    }

    pub fn first_row(&mut self) {
        self.cursor.row = 0;
    }

    pub fn last_row(&mut self) {
        self.cursor.row = self.table.rows.len().saturating_sub(1);
    }

    pub fn title(&self, scope: &NamespaceScope) -> String {
        let Some(kind) = self.kind.as_ref() else {
            return "Resources".to_string();
        };

        let indicator = match self.watch.session().filter(|session| session.is_active()) {
            Some(session) => format!(" ● watching every {}s", session.interval().as_secs()),
            None => " ○".to_string(),
        };
        format!("{kind} ({}){indicator}", scope.label_for(kind))
    }

    fn set_table(&mut self, table: TableData) {
        self.table = table;
        self.cursor.row = self
            .cursor
            .row
            .min(self.table.rows.len().saturating_sub(1));
        self.cursor.column = self
            .cursor
            .column
            .min(self.table.column_count().saturating_sub(1));
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::{TableController, TablePhase};
    use crate::error::FetchError;
    use crate::model::{NamespaceScope, ResourceKindDescriptor};
    use serde_json::{Value, json};

    fn pods() -> ResourceKindDescriptor {
        ResourceKindDescriptor::new("pods", "Pod", "v1", true)
    }

    fn services() -> ResourceKindDescriptor {
        ResourceKindDescriptor::new("services", "Service", "v1", true)
    }

    fn pod_items() -> Vec<Value> {
        vec![
            json!({"metadata": {"name": "a", "namespace": "dev"}, "status": {"phase": "Running"}}),
            json!({"metadata": {"name": "b", "namespace": "dev"}, "status": {"phase": "Pending"}}),
            json!({"metadata": {"name": "c", "namespace": "dev"}, "status": {"phase": "Running"}}),
        ]
    }

    fn rendered_pods(controller: &mut TableController, scope: &NamespaceScope) {
        let load = controller.select_kind(pods(), scope);
        let items = pod_items();
        controller.apply(&load, Ok(&items));
    }

    #[test]
    fn select_then_apply_renders_rows() {
        let scope = NamespaceScope::Named("dev".to_string());
        let mut controller = TableController::default();
        assert_eq!(controller.phase(), TablePhase::Idle);

        let load = controller.select_kind(pods(), &scope);
        assert_eq!(controller.phase(), TablePhase::Loading);
        assert!(load.watch.is_none());

        let items = pod_items();
        let next = controller.apply(&load, Ok(&items));
        assert!(next.is_none());
        assert_eq!(controller.phase(), TablePhase::Rendered);
        assert_eq!(controller.table().rows.len(), 3);
        assert_eq!(controller.title(&scope), "pods (dev) ○");
    }

    #[test]
    fn fetch_failure_enters_errored_without_stale_rows() {
        let scope = NamespaceScope::All;
        let mut controller = TableController::default();
        rendered_pods(&mut controller, &scope);

        let load = controller.refresh(&scope).unwrap();
        let error = FetchError::new("pods", "timed out");
        controller.apply(&load, Err(&error));

        assert_eq!(controller.phase(), TablePhase::Errored);
        assert_eq!(controller.table().rows.len(), 1);
        assert!(controller.table().is_error());
    }

    #[test]
    fn watch_reschedules_only_while_active() {
        let scope = NamespaceScope::All;
        let mut controller = TableController::default();
        rendered_pods(&mut controller, &scope);

        let load = controller.start_watch(&scope).unwrap();
        let id = load.watch.unwrap();
        assert_eq!(controller.phase(), TablePhase::Watching);
        assert!(controller.title(&scope).contains("● watching every 1s"));

        let items = pod_items();
        let ticket = controller.apply(&load, Ok(&items)).unwrap();
        assert_eq!(ticket.id, id);

        let tick_load = controller.on_tick(id, &scope).unwrap();
        assert!(controller.stop_watch());
        assert_eq!(controller.phase(), TablePhase::Rendered);
        assert!(controller.apply(&tick_load, Ok(&items)).is_none());
        assert!(controller.on_tick(id, &scope).is_none());
    }

    #[test]
    fn fetch_error_during_watch_keeps_watching() {
        let scope = NamespaceScope::All;
        let mut controller = TableController::default();
        rendered_pods(&mut controller, &scope);

        let load = controller.start_watch(&scope).unwrap();
        let error = FetchError::new("pods", "connection reset");
        let ticket = controller.apply(&load, Err(&error));

        assert!(ticket.is_some());
        assert!(controller.table().is_error());
        assert_eq!(controller.phase(), TablePhase::Watching);
    }

    #[test]
    fn switching_kind_cancels_watch_and_discards_old_results() {
        let scope = NamespaceScope::All;
        let mut controller = TableController::default();
        rendered_pods(&mut controller, &scope);

        let watch_load = controller.start_watch(&scope).unwrap();
        let id = watch_load.watch.unwrap();
        let Some(old_ticket) = controller.apply(&watch_load, Ok(&pod_items())) else {
            panic!("expected the watch to reschedule");
        };

        let service_load = controller.select_kind(services(), &scope);
        assert!(!controller.is_watching());
        assert!(old_ticket.token.is_cancelled());
        assert!(controller.on_tick(id, &scope).is_none());

        let stale = controller.apply(&watch_load, Ok(&pod_items()));
        assert!(stale.is_none());
        assert_eq!(controller.phase(), TablePhase::Loading);

        let services = [json!({"metadata": {"name": "svc"}, "spec": {"type": "ClusterIP"}})];
        controller.apply(&service_load, Ok(&services));
        assert_eq!(controller.table().rows.len(), 1);
        assert_eq!(controller.phase(), TablePhase::Rendered);
    }

    #[test]
    fn cursor_clamps_to_grid() {
        let scope = NamespaceScope::All;
        let mut controller = TableController::default();
        rendered_pods(&mut controller, &scope);

        controller.move_row(-1);
        assert_eq!(controller.cursor().row, 0);
        controller.move_row(10);
        assert_eq!(controller.cursor().row, 2);
        controller.move_column(5);
        assert_eq!(controller.cursor().column, 1);
        controller.move_column(-3);
        assert_eq!(controller.cursor().column, 0);
        controller.first_row();
        controller.last_row();
        assert_eq!(controller.selected_row().and_then(|row| row.name.as_deref()), Some("c"));

        let load = controller.refresh(&scope).unwrap();
        let shorter = &pod_items()[..1];
        controller.apply(&load, Ok(shorter));
        assert_eq!(controller.cursor().row, 0);
    }

    #[test]
    fn start_watch_requires_rendered_table() {
        let scope = NamespaceScope::All;
        let mut controller = TableController::default();
        assert!(controller.start_watch(&scope).is_none());
        controller.select_kind(pods(), &scope);
        assert!(controller.start_watch(&scope).is_none());
    }

    #[test]
    fn teardown_returns_to_idle() {
        let scope = NamespaceScope::All;
        let mut controller = TableController::default();
        rendered_pods(&mut controller, &scope);
        controller.start_watch(&scope);
        controller.teardown();
        assert_eq!(controller.phase(), TablePhase::Idle);
        assert!(!controller.is_watching());
        assert!(controller.kind().is_none());
    }
}
