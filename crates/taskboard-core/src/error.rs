// ── Core error types ──
//
// User-facing errors from taskboard-core. Consumers never see raw HTTP
// statuses or JSON failures; `From<taskboard_api::Error>` translates
// transport-layer errors into domain variants.

use thiserror::Error;

use crate::session::SessionError;
use crate::validation::ValidationErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the board server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the board server timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Session is no longer valid and has been cleared: {reason}")]
    SessionRevoked { reason: String },

    #[error("Boards have not been loaded yet")]
    NotLoaded,

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    // ── Account errors ───────────────────────────────────────────────
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with email {email} already exists")]
    EmailTaken { email: String },

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity_type: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_owned(),
            identifier: identifier.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<taskboard_api::Error> for CoreError {
    fn from(err: taskboard_api::Error) -> Self {
        match err {
            taskboard_api::Error::Transport(ref e) => {
                // Timeouts of known length arrive as `Error::Timeout`.
                if e.is_timeout() || e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            taskboard_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            taskboard_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Base URL cannot be used for REST paths: {url}"),
            },
            taskboard_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            taskboard_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            taskboard_api::Error::NotFound { path } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: path,
            },
            taskboard_api::Error::Status { status, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                },
                status: Some(status),
            },
            taskboard_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response from server: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_not_found() {
        let err = CoreError::from(taskboard_api::Error::NotFound {
            path: "/users/9".into(),
        });
        assert!(matches!(err, CoreError::NotFound { ref identifier, .. } if identifier == "/users/9"));
    }

    #[test]
    fn status_keeps_code() {
        let err = CoreError::from(taskboard_api::Error::Status {
            status: 503,
            body: String::new(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(503), .. }));
        assert_eq!(err.to_string(), "API error: HTTP 503");
    }

    #[test]
    fn timeout_keeps_configured_seconds() {
        let err = CoreError::from(taskboard_api::Error::Timeout { timeout_secs: 4 });
        assert!(matches!(err, CoreError::Timeout { timeout_secs: 4 }));
        assert_eq!(
            err.to_string(),
            "Request to the board server timed out after 4s"
        );
    }

    #[test]
    fn deserialization_is_internal() {
        let err = CoreError::from(taskboard_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });
        assert!(matches!(err, CoreError::Internal(_)));
    }
}
