// ── Wire-to-domain conversions ──
//
// Bridges `taskboard_api` records and `taskboard_core::model` types in both
// directions. Loading fills defaults (lists without `tasks` get an empty
// vector); saving writes every field back, including unmodelled `extra`
// keys, so the backend document survives a whole-collection PATCH.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use taskboard_api::{BackgroundType, BoardRecord, ListRecord, TaskRecord, UserRecord};

use crate::model::{Background, BackgroundKind, Board, List, Task, User, UserId};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an RFC 3339 timestamp, keeping the original text alongside.
/// Unparseable values are stashed in `extra` under `key` so they are
/// written back verbatim.
fn parse_timestamp(
    raw: Option<String>,
    key: &str,
    extra: &mut Map<String, Value>,
) -> Option<(DateTime<Utc>, String)> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(dt) => Some((dt.with_timezone(&Utc), raw)),
        Err(e) => {
            debug!(value = %raw, error = %e, "keeping unparseable timestamp verbatim");
            extra.insert(key.to_owned(), Value::String(raw));
            None
        }
    }
}

/// Wire text for a timestamp: the loaded spelling while it still denotes
/// `dt`, otherwise the canonical form.
fn timestamp_to_wire(dt: Option<&DateTime<Utc>>, wire: Option<&str>) -> Option<String> {
    let dt = dt?;
    match wire {
        Some(raw)
            if DateTime::parse_from_rfc3339(raw)
                .is_ok_and(|loaded| loaded.with_timezone(&Utc) == *dt) =>
        {
            Some(raw.to_owned())
        }
        _ => Some(format_timestamp(dt)),
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn kind_from_wire(kind: BackgroundType) -> BackgroundKind {
    match kind {
        BackgroundType::Image => BackgroundKind::Image,
        BackgroundType::Color => BackgroundKind::Color,
    }
}

fn kind_to_wire(kind: BackgroundKind) -> BackgroundType {
    match kind {
        BackgroundKind::Image => BackgroundType::Image,
        BackgroundKind::Color => BackgroundType::Color,
    }
}

// ── Records → domain ───────────────────────────────────────────────

impl From<TaskRecord> for Task {
    fn from(r: TaskRecord) -> Self {
        Self {
            id: r.id.into(),
            title: r.title,
            completed: r.is_completed,
            description: r.description,
            extra: r.extra,
        }
    }
}

impl From<ListRecord> for List {
    fn from(r: ListRecord) -> Self {
        Self {
            id: r.id.into(),
            title: r.title,
            tasks: r
                .tasks
                .unwrap_or_default()
                .into_iter()
                .map(Task::from)
                .collect(),
            extra: r.extra,
        }
    }
}

impl From<BoardRecord> for Board {
    fn from(r: BoardRecord) -> Self {
        let mut extra = r.extra;
        let (created_at, created_at_wire) =
            parse_timestamp(r.created_at, "createdAt", &mut extra).unzip();
        Self {
            id: r.id.into(),
            title: r.title,
            background: Background::new(kind_from_wire(r.background_type), r.background),
            starred: r.is_starred,
            closed: r.is_closed,
            created_at,
            created_at_wire,
            lists: r
                .lists
                .map(|lists| lists.into_iter().map(List::from).collect()),
            extra,
        }
    }
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        let mut scratch = Map::new();
        Self {
            id: UserId::new(r.id.to_string()),
            username: r.username,
            email: r.email,
            created_at: parse_timestamp(r.created_at, "created_at", &mut scratch)
                .map(|(dt, _)| dt),
        }
    }
}

/// Split a fetched user document into the account and its boards.
pub fn split_user(mut record: UserRecord) -> (User, Vec<Board>) {
    let boards = record
        .boards
        .take()
        .unwrap_or_default()
        .into_iter()
        .map(Board::from)
        .collect();
    (User::from(record), boards)
}

// ── Domain → records ───────────────────────────────────────────────

impl From<&Task> for TaskRecord {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id.to_string(),
            title: t.title.clone(),
            is_completed: t.completed,
            description: t.description.clone(),
            extra: t.extra.clone(),
        }
    }
}

impl From<&List> for ListRecord {
    fn from(l: &List) -> Self {
        Self {
            id: l.id.to_string(),
            title: l.title.clone(),
            tasks: Some(l.tasks.iter().map(TaskRecord::from).collect()),
            extra: l.extra.clone(),
        }
    }
}

impl From<&Board> for BoardRecord {
    fn from(b: &Board) -> Self {
        Self {
            id: b.id.to_string(),
            title: b.title.clone(),
            background: b.background.value().to_owned(),
            background_type: kind_to_wire(b.background.kind()),
            is_starred: b.starred,
            is_closed: b.closed,
            created_at: timestamp_to_wire(b.created_at.as_ref(), b.created_at_wire.as_deref()),
            lists: b
                .lists
                .as_ref()
                .map(|lists| lists.iter().map(ListRecord::from).collect()),
            extra: b.extra.clone(),
        }
    }
}

/// Serialize a board collection for `PATCH /users/{id}`.
pub fn boards_to_records(boards: &[Board]) -> Vec<BoardRecord> {
    boards.iter().map(BoardRecord::from).collect()
}
