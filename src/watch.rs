use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const TABLE_WATCH_INTERVAL: Duration = Duration::from_secs(1);
pub const LOGS_WATCH_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchTarget {
    Table,
    Logs,
}

#[derive(Debug, Clone)]
pub struct WatchTicket {
    pub id: u64,
    pub target: WatchTarget,
    pub interval: Duration,
    pub token: CancellationToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchTick {
    pub id: u64,
    pub target: WatchTarget,
}

#[derive(Debug)]
pub struct WatchSession {
    id: u64,
    target: WatchTarget,
    subject: String,
    interval: Duration,
    token: CancellationToken,
    active: bool,
}

impl WatchSession {
    fn new(id: u64, target: WatchTarget, subject: String, interval: Duration) -> Self {
        Self {
            id,
            target,
            subject,
            interval,
            token: CancellationToken::new(),
            active: true,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn ticket(&self) -> WatchTicket {
        WatchTicket {
            id: self.id,
            target: self.target,
            interval: self.interval,
            token: self.token.clone(),
        }
    }

    // A tick already in flight is rejected by `accepts` afterwards.
    pub fn cancel(&mut self) {
        self.active = false;
        self.token.cancel();
    }

    pub fn accepts(&self, id: u64) -> bool {
        self.active && self.id == id && !self.token.is_cancelled()
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[derive(Debug)]
pub struct WatchSlot {
    target: WatchTarget,
    interval: Duration,
    session: Option<WatchSession>,
    next_id: u64,
}

impl WatchSlot {
    pub fn new(target: WatchTarget, interval: Duration) -> Self {
        Self {
            target,
            interval,
            session: None,
            next_id: 1,
        }
    }

    pub fn start(&mut self, subject: impl Into<String>) -> u64 {
        self.stop();
        let id = self.next_id;
        self.next_id += 1;
        self.session = Some(WatchSession::new(
            id,
            self.target,
            subject.into(),
            self.interval,
        ));
        id
    }

    pub fn stop(&mut self) -> bool {
        match self.session.take() {
            Some(mut session) => {
                debug!(
                    "cancelling {:?} watch {} for {}",
                    self.target,
                    session.id(),
                    session.subject()
                );
                session.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_watching(&self) -> bool {
        self.session.as_ref().is_some_and(WatchSession::is_active)
    }

    pub fn session(&self) -> Option<&WatchSession> {
        self.session.as_ref()
    }

    pub fn accepts(&self, id: u64) -> bool {
        self.session.as_ref().is_some_and(|session| session.accepts(id))
    }

    pub fn reschedule(&self, id: u64) -> Option<WatchTicket> {
        self.session
            .as_ref()
            .filter(|session| session.accepts(id))
            .map(WatchSession::ticket)
    }
}

pub fn spawn_tick(ticket: WatchTicket, tx: UnboundedSender<WatchTick>) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = ticket.token.cancelled() => {
                debug!("{:?} watch {} cancelled before tick", ticket.target, ticket.id);
            }
            _ = sleep(ticket.interval) => {
                let _ = tx.send(WatchTick {
                    id: ticket.id,
                    target: ticket.target,
                });
            }
        }
    })
}
