use dashmap::DashMap;
use research_flow::{FlowConfig, FlowError, Result, Services, Session, SessionSnapshot};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, watch};
use tracing::info;
use uuid::Uuid;

/// One live session: the single writer behind a mutex, plus a receiver
/// that always holds its latest published snapshot.
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<Session>>,
    updates: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    fn new(session: Session) -> Self {
        let updates = session.subscribe();
        Self {
            session: Arc::new(Mutex::new(session)),
            updates,
        }
    }

    /// Latest published state. Never waits on a running batch.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.updates.borrow().clone()
    }

    /// Exclusive write access. Fails immediately while a batch holds the
    /// session; requests are not queued.
    pub fn claim(&self) -> Result<OwnedMutexGuard<Session>> {
        self.session
            .clone()
            .try_lock_owned()
            .map_err(|_| FlowError::SessionBusy(self.snapshot().status_message))
    }
}

/// Everything the HTTP handlers share.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<DashMap<Uuid, SessionHandle>>,
    pub services: Services,
    pub flow_config: FlowConfig,
}

impl AppState {
    pub fn new(services: Services, flow_config: FlowConfig) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            services,
            flow_config,
        }
    }

    pub fn create_session(&self) -> SessionHandle {
        let session = Session::new();
        let id = session.id();
        let handle = SessionHandle::new(session);
        self.sessions.insert(id, handle.clone());
        info!(session_id = %id, "Session created");
        handle
    }

    pub fn session(&self, id: Uuid) -> Result<SessionHandle> {
        self.sessions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| FlowError::SessionNotFound(id.to_string()))
    }

    /// Drops the session from the registry. A batch still running keeps its
    /// own reference and finishes unobserved.
    pub fn remove_session(&self, id: Uuid) -> Result<()> {
        self.sessions
            .remove(&id)
            .map(|_| info!(session_id = %id, "Session removed"))
            .ok_or_else(|| FlowError::SessionNotFound(id.to_string()))
    }
}
