// ── Store actions ──
//
// Every mutation of the board collection is expressed as one of these.
// Actions are total: a missing target is a no-op, never an error.

use crate::model::{Board, BoardId, List, ListId, Task, TaskId};

/// A single state transition for [`BoardStore`](super::BoardStore).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Discard the collection and install `boards` verbatim.
    ReplaceAll(Vec<Board>),
    /// Focus a board (or clear focus). Leaves the collection untouched.
    SetCurrentBoard(Option<BoardId>),

    // ── Boards ───────────────────────────────────────────────────────
    AddBoard(Board),
    /// Replace the board with the same id in place, lists included.
    UpdateBoard(Board),
    DeleteBoard(BoardId),
    ToggleStar(BoardId),
    SetClosed(BoardId, bool),

    // ── Lists ────────────────────────────────────────────────────────
    AddList(BoardId, List),
    UpdateList(BoardId, List),
    DeleteList(BoardId, ListId),

    // ── Tasks ────────────────────────────────────────────────────────
    AddTask(BoardId, ListId, Task),
    UpdateTask(BoardId, ListId, Task),
    DeleteTask(BoardId, ListId, TaskId),
    ToggleTaskComplete(BoardId, ListId, TaskId),
}

impl Action {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReplaceAll(_) => "replace_all",
            Self::SetCurrentBoard(_) => "set_current_board",
            Self::AddBoard(_) => "add_board",
            Self::UpdateBoard(_) => "update_board",
            Self::DeleteBoard(_) => "delete_board",
            Self::ToggleStar(_) => "toggle_star",
            Self::SetClosed(..) => "set_closed",
            Self::AddList(..) => "add_list",
            Self::UpdateList(..) => "update_list",
            Self::DeleteList(..) => "delete_list",
            Self::AddTask(..) => "add_task",
            Self::UpdateTask(..) => "update_task",
            Self::DeleteTask(..) => "delete_task",
            Self::ToggleTaskComplete(..) => "toggle_task_complete",
        }
    }

    /// Whether this action can change the board collection (and so
    /// warrants a save when it does).
    pub fn touches_collection(&self) -> bool {
        !matches!(self, Self::SetCurrentBoard(_))
    }
}
