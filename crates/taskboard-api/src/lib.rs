// taskboard-api: Async Rust client for the taskboard users/boards REST resource

pub mod client;
pub mod error;
pub mod models;
pub mod transport;
mod users;

pub use client::UsersClient;
pub use error::Error;
pub use models::{
    BackgroundType, BoardRecord, BoardsPatch, ListRecord, NewUserRecord, RecordId, TaskRecord,
    UserRecord,
};
pub use transport::{TlsMode, TransportConfig};
