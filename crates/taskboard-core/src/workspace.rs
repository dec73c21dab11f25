// ── Workspace ──
//
// Synchronized view of one user's boards: loads the collection once,
// applies actions to the store, and pushes the whole collection back with
// `PATCH /users/{id}` after every effective change. Saves are serialized
// and carry the store version of their snapshot so an overtaken snapshot
// is never sent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use taskboard_api::UsersClient;

use crate::config::{SaveFailurePolicy, ServerConfig};
use crate::convert::{boards_to_records, split_user};
use crate::error::CoreError;
use crate::model::User;
use crate::session::SessionGuard;
use crate::store::{Action, BoardStore, Snapshot};
use crate::stream::BoardStream;

// ── LoadState ────────────────────────────────────────────────────

/// Lifecycle of the workspace, observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    /// The last load failed and the session was cleared.
    Revoked,
}

// ── SaveOutcome ──────────────────────────────────────────────────

/// What happened to local state after a failed save.
#[derive(Debug)]
pub enum Recovery {
    /// The unsaved change stays in the store.
    KeptLocal,
    /// Server state was reloaded over the unsaved change.
    Resynced,
    /// Reload was attempted and failed; the session has been revoked.
    ResyncFailed(Box<CoreError>),
}

/// Result of pushing one snapshot.
#[derive(Debug)]
pub enum SaveOutcome {
    /// The action changed nothing, or this snapshot is already persisted.
    Unchanged,
    Saved { version: u64 },
    /// A newer snapshot was queued first; this one was not sent.
    Superseded { version: u64 },
    Failed {
        version: u64,
        error: CoreError,
        recovery: Recovery,
    },
}

impl SaveOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn version(&self) -> Option<u64> {
        match self {
            Self::Unchanged => None,
            Self::Saved { version } | Self::Superseded { version } | Self::Failed { version, .. } => {
                Some(*version)
            }
        }
    }

    /// The save error, if the save failed.
    pub fn into_error(self) -> Option<CoreError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

// ── Workspace ────────────────────────────────────────────────────

/// Cheaply cloneable handle; all clones share one store and save queue.
#[derive(Clone)]
pub struct Workspace {
    inner: Arc<WorkspaceInner>,
}

struct WorkspaceInner {
    config: ServerConfig,
    client: UsersClient,
    session: SessionGuard,
    store: Arc<BoardStore>,
    load_state: watch::Sender<LoadState>,
    user: std::sync::Mutex<Option<User>>,
    /// Highest snapshot version claimed by `dispatch` or handed to
    /// `save_snapshot`.
    requested: AtomicU64,
    /// Highest snapshot version the server acknowledged (or loaded).
    saved: AtomicU64,
    /// Held while `dispatch` publishes and claims a snapshot, so autosync
    /// never picks up a version an inline save will push.
    publish_lock: std::sync::Mutex<()>,
    save_lock: Mutex<()>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Workspace {
    /// Create a workspace for `config`. Does NOT load; call
    /// [`load()`](Self::load) before dispatching.
    pub fn new(config: ServerConfig, session: SessionGuard) -> Result<Self, CoreError> {
        let client = UsersClient::new(config.base_url.clone(), &config.transport())?;
        Ok(Self::with_client(config, client, session))
    }

    pub fn with_client(config: ServerConfig, client: UsersClient, session: SessionGuard) -> Self {
        let (load_state, _) = watch::channel(LoadState::Unloaded);
        Self {
            inner: Arc::new(WorkspaceInner {
                config,
                client,
                session,
                store: Arc::new(BoardStore::new()),
                load_state,
                user: std::sync::Mutex::new(None),
                requested: AtomicU64::new(0),
                saved: AtomicU64::new(0),
                publish_lock: std::sync::Mutex::new(()),
                save_lock: Mutex::new(()),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create and load in one step.
    pub async fn open(config: ServerConfig, session: SessionGuard) -> Result<Self, CoreError> {
        let workspace = Self::new(config, session)?;
        workspace.load().await?;
        Ok(workspace)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<BoardStore> {
        &self.inner.store
    }

    pub fn session(&self) -> &SessionGuard {
        &self.inner.session
    }

    /// The loaded user, if any.
    pub fn user(&self) -> Option<User> {
        self.inner
            .user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn subscribe(&self) -> BoardStream {
        self.inner.store.subscribe()
    }

    pub fn load_state(&self) -> watch::Receiver<LoadState> {
        self.inner.load_state.subscribe()
    }

    pub fn is_loaded(&self) -> bool {
        *self.inner.load_state.borrow() == LoadState::Loaded
    }

    // ── Load ─────────────────────────────────────────────────────

    /// Fetch the signed-in user's document and install its boards.
    ///
    /// Any failure (network, missing user, malformed body) revokes the
    /// session and returns [`CoreError::SessionRevoked`].
    pub async fn load(&self) -> Result<User, CoreError> {
        let token = self.inner.session.require()?;
        self.inner.load_state.send_replace(LoadState::Loading);

        let record = match self.inner.client.get_user(token.as_str()).await {
            Ok(record) => record,
            Err(e) => {
                let reason = CoreError::from(e).to_string();
                self.inner.session.revoke(&reason);
                self.inner.load_state.send_replace(LoadState::Revoked);
                return Err(CoreError::SessionRevoked { reason });
            }
        };

        let (user, boards) = split_user(record);
        let count = boards.len();
        let version = self
            .inner
            .store
            .dispatch(Action::ReplaceAll(boards))
            .map_or_else(|| self.inner.store.version(), |s| s.version);

        // The loaded snapshot is the server's own state; never push it back.
        self.inner.requested.fetch_max(version, Ordering::SeqCst);
        self.inner.saved.fetch_max(version, Ordering::SeqCst);

        *self
            .inner
            .user
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
        self.inner.load_state.send_replace(LoadState::Loaded);
        info!(user = %user.id, boards = count, "workspace loaded");
        Ok(user)
    }

    // ── Mutation ─────────────────────────────────────────────────

    /// Apply `action` to the store without saving. Collection changes
    /// require a loaded workspace.
    pub fn apply(&self, action: Action) -> Result<Option<Snapshot>, CoreError> {
        if action.touches_collection() && !self.is_loaded() {
            return Err(CoreError::NotLoaded);
        }
        Ok(self.inner.store.dispatch(action))
    }

    /// Apply `action` and push the resulting collection.
    pub async fn dispatch(&self, action: Action) -> Result<SaveOutcome, CoreError> {
        let snapshot = {
            let _publish = self
                .inner
                .publish_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let snapshot = self.apply(action)?;
            if let Some(ref snapshot) = snapshot {
                self.inner
                    .requested
                    .fetch_max(snapshot.version, Ordering::SeqCst);
            }
            snapshot
        };
        match snapshot {
            Some(snapshot) => Ok(self.save_snapshot(snapshot).await),
            None => Ok(SaveOutcome::Unchanged),
        }
    }

    /// Push the current snapshot (e.g. to retry after a kept-local failure).
    pub async fn save(&self) -> Result<SaveOutcome, CoreError> {
        if !self.is_loaded() {
            return Err(CoreError::NotLoaded);
        }
        Ok(self.save_snapshot(self.inner.store.snapshot()).await)
    }

    /// Push `snapshot` as the whole board collection.
    ///
    /// Saves run one at a time. A snapshot the server already holds is
    /// `Unchanged`; one overtaken by a newer queued snapshot is
    /// `Superseded` and not sent. Passing a version whose save failed
    /// sends it again, which is how [`save()`](Self::save) retries.
    pub async fn save_snapshot(&self, snapshot: Snapshot) -> SaveOutcome {
        let version = snapshot.version;
        let inner = &self.inner;
        inner.requested.fetch_max(version, Ordering::SeqCst);

        let _guard = inner.save_lock.lock().await;

        if inner.saved.load(Ordering::SeqCst) >= version {
            return SaveOutcome::Unchanged;
        }
        if inner.requested.load(Ordering::SeqCst) > version {
            debug!(version, "save overtaken by a newer snapshot");
            return SaveOutcome::Superseded { version };
        }

        let Some(user) = self.user() else {
            return SaveOutcome::Failed {
                version,
                error: CoreError::NotLoaded,
                recovery: Recovery::KeptLocal,
            };
        };

        let records = boards_to_records(&snapshot.boards);
        match inner.client.patch_boards(user.id.as_str(), records).await {
            Ok(_) => {
                inner.saved.fetch_max(version, Ordering::SeqCst);
                debug!(version, boards = snapshot.boards.len(), "boards saved");
                SaveOutcome::Saved { version }
            }
            Err(e) => {
                let error = CoreError::from(e);
                warn!(version, error = %error, "failed to save boards");
                let recovery = self.recover().await;
                SaveOutcome::Failed {
                    version,
                    error,
                    recovery,
                }
            }
        }
    }

    async fn recover(&self) -> Recovery {
        match self.inner.config.save_failure {
            SaveFailurePolicy::KeepLocal => Recovery::KeptLocal,
            SaveFailurePolicy::Resync => match self.load().await {
                Ok(_) => {
                    info!("resynchronized with server after failed save");
                    Recovery::Resynced
                }
                Err(e) => Recovery::ResyncFailed(Box::new(e)),
            },
        }
    }

    // ── Autosync ─────────────────────────────────────────────────

    /// Spawn a background task that pushes every new snapshot, so
    /// callers can mutate through [`apply()`](Self::apply) alone.
    pub async fn start_autosync(&self) {
        let stream = self.inner.store.subscribe();
        let workspace = self.clone();
        let cancel = self.inner.cancel.clone();
        self.inner
            .task_handles
            .lock()
            .await
            .push(tokio::spawn(autosync_task(workspace, stream, cancel)));
        debug!("autosync started");
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("workspace shut down");
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Push each published snapshot nobody has claimed yet. Bursts of
/// changes collapse into the latest snapshot while a save is in flight.
/// Versions already requested (inline saves, failed saves) are skipped.
async fn autosync_task(workspace: Workspace, mut stream: BoardStream, cancel: CancellationToken) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            snapshot = stream.changed() => {
                let Some(snapshot) = snapshot else { break };
                let claimed = {
                    let _publish = workspace
                        .inner
                        .publish_lock
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);
                    workspace.inner.requested.load(Ordering::SeqCst)
                };
                if !workspace.is_loaded() || snapshot.version <= claimed {
                    continue;
                }
                match workspace.save_snapshot(snapshot).await {
                    SaveOutcome::Failed { error, .. } => {
                        warn!(error = %error, "autosync save failed");
                    }
                    outcome => debug!(?outcome, "autosync"),
                }
            }
        }
    }
}
