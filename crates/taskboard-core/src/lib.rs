// taskboard-core: Board state, synchronization and sessions between taskboard-api and the CLI.

pub mod accounts;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod stream;
pub mod validation;
pub mod workspace;

// ── Primary re-exports ──────────────────────────────────────────────
pub use accounts::Accounts;
pub use config::{SaveFailurePolicy, ServerConfig, TlsVerification};
pub use error::CoreError;
pub use session::{
    FileSessionStore, MemorySessionStore, SessionError, SessionGuard, SessionStore, SessionToken,
};
pub use store::{Action, BoardArena, BoardStore, Snapshot};
pub use stream::{BoardFilter, BoardStream};
pub use validation::{LoginForm, RegistrationForm, ValidationError, ValidationErrors};
pub use workspace::{LoadState, Recovery, SaveOutcome, Workspace};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Background, BackgroundKind, Board, BoardId, List, ListId, PRESET_COLORS, PRESET_IMAGES, Task,
    TaskId, User, UserId,
};
