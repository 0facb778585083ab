// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session state: the client's record of the authenticated principal.
//!
//! One [`SessionStore`] is shared by the whole process. Mutation funnels
//! through the auth service (login/register/logout) and the HTTP client's
//! 401 handler, so the invariant "token present ⇔ authenticated" is enforced
//! in one place. State changes are broadcast as [`AuthEvent`]s so UI regions
//! outside the owner's subtree resynchronize without a full reload.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

/// Route subscribers are pointed at when the session expires.
pub const LOGIN_ROUTE: &str = "/login";

/// Role granted to administrators.
pub const ROLE_ADMIN: &str = "ADMIN";

/// Role granted to regular shoppers.
pub const ROLE_CUSTOMER: &str = "CUSTOMER";

/// In-memory session state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub roles: Vec<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Flat membership check; deterministically false when unauthenticated.
    pub fn has_role(&self, role: &str) -> bool {
        self.is_authenticated() && self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }
}

/// Persisted session file contents: the access token and the roles, the two
/// keys the client keeps across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    access_token: String,
    #[serde(default)]
    roles: Vec<String>,
}

/// Auth state change notifications for detached observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuthEvent {
    /// A login or registration succeeded.
    LoggedIn { roles: Vec<String> },
    /// The user logged out.
    LoggedOut,
    /// The backend rejected the token; subscribers should route to login.
    SessionExpired { redirect_to: String },
}

/// Owner of the authenticated principal's state for the process lifetime.
pub struct SessionStore {
    inner: RwLock<Session>,
    persist_path: Option<PathBuf>,
    event_tx: broadcast::Sender<AuthEvent>,
}

impl SessionStore {
    /// An in-memory store with no persistence (tests, one-shot tools).
    pub fn ephemeral() -> Self {
        let (event_tx, _) = broadcast::channel(16);
        Self { inner: RwLock::new(Session::default()), persist_path: None, event_tx }
    }

    /// Rehydrate from the persisted file. A missing or corrupt file means
    /// unauthenticated. The token is not re-validated against the server;
    /// a stale token surfaces reactively through the 401 path.
    pub fn load(persist_path: PathBuf) -> Self {
        let session = match std::fs::read_to_string(&persist_path) {
            Ok(data) => match serde_json::from_str::<PersistedSession>(&data) {
                Ok(p) if !p.access_token.is_empty() => {
                    debug!(path = %persist_path.display(), "restored session");
                    Session { token: Some(p.access_token), roles: p.roles }
                }
                Ok(_) => Session::default(),
                Err(e) => {
                    warn!(path = %persist_path.display(), "ignoring corrupt session file: {e}");
                    Session::default()
                }
            },
            Err(_) => Session::default(),
        };

        let (event_tx, _) = broadcast::channel(16);
        Self { inner: RwLock::new(session), persist_path: Some(persist_path), event_tx }
    }

    /// Subscribe to auth state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.event_tx.subscribe()
    }

    pub async fn snapshot(&self) -> Session {
        self.inner.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated()
    }

    pub async fn roles(&self) -> Vec<String> {
        self.inner.read().await.roles.clone()
    }

    pub async fn has_role(&self, role: &str) -> bool {
        self.inner.read().await.has_role(role)
    }

    pub async fn has_any_role(&self, roles: &[&str]) -> bool {
        self.inner.read().await.has_any_role(roles)
    }

    pub async fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN).await
    }

    pub async fn is_customer(&self) -> bool {
        self.has_role(ROLE_CUSTOMER).await
    }

    /// Install a fresh token and role set (login/register success path).
    /// The file is written before the event fires so a subscriber reading
    /// back immediately sees the same roles.
    pub(crate) async fn establish(&self, token: String, roles: Vec<String>) {
        {
            let mut session = self.inner.write().await;
            session.token = Some(token.clone());
            session.roles = roles.clone();
        }
        self.persist(Some(&token), &roles);
        info!(roles = ?roles, "session established");
        let _ = self.event_tx.send(AuthEvent::LoggedIn { roles });
    }

    /// Wipe state on logout.
    pub(crate) async fn clear(&self) {
        self.wipe().await;
        info!("session cleared");
        let _ = self.event_tx.send(AuthEvent::LoggedOut);
    }

    /// Wipe state after the backend rejected the token (401).
    pub(crate) async fn expire(&self) {
        self.wipe().await;
        warn!("session expired, redirecting to {LOGIN_ROUTE}");
        let _ = self
            .event_tx
            .send(AuthEvent::SessionExpired { redirect_to: LOGIN_ROUTE.to_owned() });
    }

    async fn wipe(&self) {
        {
            let mut session = self.inner.write().await;
            session.token = None;
            session.roles.clear();
        }
        self.persist(None, &[]);
    }

    /// Write or remove the session file. Writes are atomic (unique tmp name
    /// + rename) so concurrent saves cannot leave trailing bytes from a
    /// longer previous write. Failures are logged, never surfaced: the
    /// in-memory state is already correct.
    fn persist(&self, token: Option<&str>, roles: &[String]) {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let Some(ref path) = self.persist_path else {
            return;
        };

        let Some(token) = token else {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), "failed to remove session file: {e}");
                }
            }
            return;
        };

        let persisted =
            PersistedSession { access_token: token.to_owned(), roles: roles.to_vec() };
        let json = match serde_json::to_string_pretty(&persisted) {
            Ok(j) => j,
            Err(e) => {
                warn!("failed to serialize session: {e}");
                return;
            }
        };

        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(
            "{}.{}.{}.tmp",
            path.file_name().unwrap_or_default().to_string_lossy(),
            std::process::id(),
            seq,
        );
        let tmp_path = path.with_file_name(tmp_name);
        if let Err(e) = std::fs::write(&tmp_path, json) {
            warn!(path = %tmp_path.display(), "failed to write session file: {e}");
            return;
        }
        if let Err(e) = std::fs::rename(&tmp_path, path) {
            warn!(path = %path.display(), "failed to rename session file: {e}");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
