// ── Domain model ──
//
// Canonical types shared by the store, the sync layer and the CLI.
// Wire records from `taskboard-api` are converted into these in
// `crate::convert`.

pub mod background;
pub mod board;
pub mod ids;
pub mod user;

pub use background::{Background, BackgroundKind, PRESET_COLORS, PRESET_IMAGES};
pub use board::{Board, List, Task};
pub use ids::{BoardId, IdGenerator, ListId, TaskId, UserId, next_id};
pub use user::User;
