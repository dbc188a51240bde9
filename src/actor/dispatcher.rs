use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::actor::session::{SessionHandle, spawn_session};
use crate::config::GameConfig;

const STOP_TIMEOUT: u64 = 5; // seconds

struct SessionEntry {
    session: SessionHandle,
    task: JoinHandle<()>,
    /// Live connections sharing this city; the actor stops when it hits zero.
    connections: usize,
}

/// Tracks one session actor per connected player.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<GameConfig>,
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

impl Dispatcher {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the live session for `id`, starting a fresh city if none exists.
    /// Every call must be paired with one `close_session`.
    pub async fn open_session(&self, id: Uuid) -> SessionHandle {
        let mut sessions = self.sessions.lock().await;
        if let Some(entry) = sessions.get_mut(&id) {
            entry.connections += 1;
            tracing::info!(
                "Session already exists: {}, connections: {}",
                id,
                entry.connections
            );
            return entry.session.clone();
        }

        let (session, task) = spawn_session(id, &self.config);
        sessions.insert(
            id,
            SessionEntry {
                session: session.clone(),
                task,
                connections: 1,
            },
        );
        tracing::info!("New session added: {}", id);
        session
    }

    pub async fn close_session(&self, id: Uuid) {
        let entry = {
            let mut sessions = self.sessions.lock().await;
            let remaining = match sessions.get_mut(&id) {
                Some(entry) => {
                    entry.connections -= 1;
                    entry.connections
                }
                None => {
                    tracing::warn!("Session with ID {} does not exist", id);
                    return;
                }
            };
            if remaining > 0 {
                tracing::info!("Connection to session {} closed, {} remaining", id, remaining);
                return;
            }
            sessions.remove(&id)
        };

        if let Some(entry) = entry {
            entry.session.stop().await;
            if let Err(e) = entry.task.await {
                tracing::warn!("Session task ended with error: {:?}", e);
            }
            tracing::info!("Session removed: {}", id);
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn connection_count(&self, id: Uuid) -> usize {
        self.sessions
            .lock()
            .await
            .get(&id)
            .map_or(0, |entry| entry.connections)
    }

    pub async fn stop(&self) {
        tracing::info!("Initiating graceful shutdown...");

        let entries: Vec<SessionEntry> = self
            .sessions
            .lock()
            .await
            .drain()
            .map(|(_, entry)| entry)
            .collect();

        for entry in &entries {
            entry.session.stop().await;
        }

        for entry in entries {
            let id = entry.session.id();
            let abort = entry.task.abort_handle();
            match tokio::time::timeout(tokio::time::Duration::from_secs(STOP_TIMEOUT), entry.task)
                .await
            {
                Ok(Ok(())) => tracing::debug!("Session {} stopped", id),
                Ok(Err(e)) => tracing::warn!("Session {} stopped with error: {:?}", id, e),
                Err(_) => {
                    tracing::warn!("Timeout waiting for session {} to stop. Aborting.", id);
                    abort.abort();
                }
            }
        }

        tracing::info!("All sessions stopped.");
    }
}
