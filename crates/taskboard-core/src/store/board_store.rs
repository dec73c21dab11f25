// ── Board store ──
//
// Single owned holder of the board collection. Writers go through
// `dispatch`; every effective change is projected once and broadcast to
// subscribers over a `watch` channel together with a monotonically
// increasing version.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, trace};

use super::action::Action;
use super::arena::BoardArena;
use crate::model::{Board, BoardId};
use crate::stream::{BoardFilter, BoardStream};

/// A published state of the collection.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Bumped once per effective change; `0` before anything was installed.
    pub version: u64,
    pub boards: Arc<Vec<Board>>,
}

/// Reactive store for one user's boards.
pub struct BoardStore {
    arena: Mutex<BoardArena>,
    snapshot: watch::Sender<Snapshot>,
    current_board: watch::Sender<Option<BoardId>>,
}

impl BoardStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Snapshot::default());
        let (current_board, _) = watch::channel(None);
        Self {
            arena: Mutex::new(BoardArena::new()),
            snapshot,
            current_board,
        }
    }

    fn arena(&self) -> MutexGuard<'_, BoardArena> {
        self.arena.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Apply `action`. Returns the new snapshot when the collection
    /// changed, `None` for no-ops and focus changes.
    pub fn dispatch(&self, action: Action) -> Option<Snapshot> {
        if let Action::SetCurrentBoard(id) = action {
            self.current_board.send_replace(id);
            return None;
        }

        let name = action.name();
        let mut arena = self.arena();
        if !arena.apply(action) {
            trace!(action = name, "action matched nothing");
            return None;
        }

        let snapshot = Snapshot {
            version: self.snapshot.borrow().version + 1,
            boards: Arc::new(arena.to_boards()),
        };
        // Publish under the arena lock so versions reach subscribers in order.
        self.snapshot.send_replace(snapshot.clone());
        debug!(action = name, version = snapshot.version, "board store updated");
        Some(snapshot)
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    pub fn boards_snapshot(&self) -> Arc<Vec<Board>> {
        Arc::clone(&self.snapshot.borrow().boards)
    }

    pub fn version(&self) -> u64 {
        self.snapshot.borrow().version
    }

    pub fn board_count(&self) -> usize {
        self.snapshot.borrow().boards.len()
    }

    // ── Selectors ────────────────────────────────────────────────────

    /// The first board with `id`.
    pub fn board(&self, id: &BoardId) -> Option<Board> {
        self.arena().board(id)
    }

    pub fn current_board_id(&self) -> Option<BoardId> {
        self.current_board.borrow().clone()
    }

    /// The focused board, if one is set and still present.
    pub fn current_board(&self) -> Option<Board> {
        self.current_board_id().and_then(|id| self.board(&id))
    }

    /// Boards matching `filter`, in collection order.
    pub fn filtered(&self, filter: &BoardFilter) -> Vec<Board> {
        self.boards_snapshot()
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> BoardStream {
        BoardStream::new(self.snapshot.subscribe())
    }

    pub fn subscribe_current_board(&self) -> watch::Receiver<Option<BoardId>> {
        self.current_board.subscribe()
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}
