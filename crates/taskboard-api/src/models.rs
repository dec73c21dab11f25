// Wire records for the users/boards resource
//
// These mirror the JSON documents stored by the backend. Board, list and
// task records use camelCase keys; the user record keeps `created_at` in
// snake_case. Fields use `#[serde(default)]` liberally because older
// documents are missing some of them, and every record keeps unknown keys
// in `extra` so a whole-document PATCH never drops data.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Identifiers ──────────────────────────────────────────────────────

/// Record identifier as stored by the backend.
///
/// json-server style backends hand out numeric ids for records they
/// create, while clients may store string ids. Both forms round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

// ── User ─────────────────────────────────────────────────────────────

/// Full user document from `GET /users` or `GET /users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boards: Option<Vec<BoardRecord>>,
    /// Catch-all for fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUserRecord {
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

/// Body of `PATCH /users/{id}`: the whole board collection.
#[derive(Debug, Clone, Serialize)]
pub struct BoardsPatch {
    pub boards: Vec<BoardRecord>,
}

// ── Board ────────────────────────────────────────────────────────────

/// How a board's `background` string is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    /// `background` is an image URL.
    #[default]
    Image,
    /// `background` is a CSS color or gradient.
    Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub background_type: BackgroundType,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Absent on boards that never had a list added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lists: Option<Vec<ListRecord>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskRecord>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
