// ── Runtime server configuration ──
//
// Describes *how* to reach the board server and how to react when a save
// fails. Never touches disk: the CLI builds a `ServerConfig` from its
// profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use taskboard_api::{TlsMode, TransportConfig};

/// Default backend root.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// What to do with local state after a save is rejected or fails.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SaveFailurePolicy {
    /// Keep the unsaved change locally; the next successful save carries it.
    #[default]
    KeepLocal,
    /// Reload server state, discarding the unsaved change.
    Resync,
}

/// Configuration for one board server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Backend root (e.g., `http://localhost:3000`).
    pub base_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Applied uniformly to every failed save.
    pub save_failure: SaveFailurePolicy,
}

impl ServerConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Transport settings for `taskboard_api::UsersClient`.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            save_failure: SaveFailurePolicy::default(),
        }
    }
}
