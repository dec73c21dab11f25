//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use taskboard_config::ConfigError;
use taskboard_core::{CoreError, ValidationError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the board server at {url}")]
    #[diagnostic(
        code(taskboard::connection_failed),
        help(
            "Check that the server is running and accessible.\n\
             Use --server or `taskboard config set server <url>` to point elsewhere."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Saving boards failed: {reason}")]
    #[diagnostic(code(taskboard::save_failed), help("{recovery}"))]
    SaveFailed { reason: String, recovery: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(
        code(taskboard::not_signed_in),
        help("Run: taskboard login --email <email>")
    )]
    NotSignedIn,

    #[error("Your session has expired")]
    #[diagnostic(
        code(taskboard::session_expired),
        help("{reason}\nSign in again with: taskboard login --email <email>")
    )]
    SessionExpired { reason: String },

    #[error("Invalid email or password")]
    #[diagnostic(
        code(taskboard::auth_failed),
        help("No account matches that email and password. Create one with: taskboard register")
    )]
    AuthFailed,

    #[error("Session storage failed: {reason}")]
    #[diagnostic(
        code(taskboard::session_storage),
        help("Switch backends with: taskboard config set session file")
    )]
    SessionStorage { reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(taskboard::not_found),
        help("Run: taskboard {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(taskboard::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(taskboard::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(taskboard::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(taskboard::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: taskboard config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(taskboard::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(taskboard::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(taskboard::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::SaveFailed { .. } => exit_code::CONNECTION,
            Self::NotSignedIn | Self::SessionExpired { .. } | Self::AuthFailed => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Config(ConfigError::Validation { .. }) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        Self::Validation {
            field: err.field().into(),
            reason: err.to_string(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotAuthenticated => CliError::NotSignedIn,

            CoreError::SessionRevoked { reason } => CliError::SessionExpired { reason },

            CoreError::InvalidCredentials => CliError::AuthFailed,

            CoreError::Session(e) => CliError::SessionStorage {
                reason: e.to_string(),
            },

            CoreError::EmailTaken { email } => CliError::Conflict {
                resource_type: "account".into(),
                identifier: email,
            },

            CoreError::Validation(errors) => {
                let mut fields: Vec<&str> = errors.iter().map(ValidationError::field).collect();
                fields.dedup();
                CliError::Validation {
                    field: fields.join(", "),
                    reason: errors.to_string(),
                }
            }

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: if entity_type == "board" {
                    "boards list".into()
                } else {
                    "boards show <board>".into()
                },
                resource_type: entity_type,
                identifier,
            },

            CoreError::Api { message, status } => CliError::ApiError {
                code: status.map_or_else(|| "unknown".into(), |s| s.to_string()),
                message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::NotLoaded => CliError::ApiError {
                code: "not_loaded".into(),
                message: "boards were not loaded before the change".into(),
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_share_exit_code() {
        for err in [
            CoreError::NotAuthenticated,
            CoreError::InvalidCredentials,
            CoreError::SessionRevoked {
                reason: "gone".into(),
            },
        ] {
            assert_eq!(CliError::from(err).exit_code(), exit_code::AUTH);
        }
    }

    #[test]
    fn email_taken_is_conflict() {
        let err = CliError::from(CoreError::EmailTaken {
            email: "a@b.co".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONFLICT);
    }

    #[test]
    fn single_validation_error_is_usage() {
        let err = CliError::from(ValidationError::EmptyTitle("board"));
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "title"));
    }
}
