// ── Board state store ──
//
// Pure reduction over an arena, plus the owned holder that publishes
// snapshots to observers.

pub mod action;
pub mod arena;
mod board_store;

pub use action::Action;
pub use arena::{BoardArena, reduce};
pub use board_store::{BoardStore, Snapshot};
