// ── Board domain types ──
//
// A board owns an ordered, optional sequence of lists; each list owns an
// ordered sequence of tasks. `extra` carries fields the backend stored but
// this client does not model, so a whole-document save writes them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::background::Background;
use super::ids::{BoardId, ListId, TaskId};

/// A named workspace of lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub background: Background,
    pub starred: bool,
    pub closed: bool,
    pub created_at: Option<DateTime<Utc>>,
    /// `created_at` as the backend spelled it. Written back unchanged
    /// while it still denotes the same instant.
    #[serde(skip)]
    pub created_at_wire: Option<String>,
    /// `None` until the first list is added. Kept distinct from an empty
    /// list so untouched documents round-trip unchanged.
    pub lists: Option<Vec<List>>,
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

impl Board {
    /// A fresh, open, unstarred board with a newly minted id and
    /// creation timestamp.
    pub fn new(title: impl Into<String>, background: Background) -> Self {
        Self {
            id: BoardId::generate(),
            title: title.into(),
            background,
            starred: false,
            closed: false,
            created_at: Some(Utc::now()),
            created_at_wire: None,
            lists: None,
            extra: Map::new(),
        }
    }

    /// A board with a caller-chosen id and no timestamp.
    pub fn with_id(id: impl Into<BoardId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            background: Background::default(),
            starred: false,
            closed: false,
            created_at: None,
            created_at_wire: None,
            lists: None,
            extra: Map::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.closed
    }

    /// Lists in display order (empty when the board has none yet).
    pub fn lists(&self) -> &[List] {
        self.lists.as_deref().unwrap_or_default()
    }

    pub fn list(&self, id: &ListId) -> Option<&List> {
        self.lists().iter().find(|l| &l.id == id)
    }

    pub fn task_count(&self) -> usize {
        self.lists().iter().map(|l| l.tasks.len()).sum()
    }
}

/// An ordered column of tasks within a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub title: String,
    pub tasks: Vec<Task>,
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

impl List {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(ListId::generate(), title)
    }

    pub fn with_id(id: impl Into<ListId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}

/// A single card within a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    pub description: Option<String>,
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(TaskId::generate(), title)
    }

    pub fn with_id(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
            description: None,
            extra: Map::new(),
        }
    }
}
