//! Shared configuration for the taskboard CLI.
//!
//! TOML profiles, platform paths, session-token storage backends, and
//! translation to `taskboard_core::ServerConfig`. The CLI adds
//! `GlobalOpts`-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use taskboard_core::config::DEFAULT_BASE_URL;
use taskboard_core::{
    FileSessionStore, SaveFailurePolicy, ServerConfig, SessionError, SessionGuard, SessionStore,
    SessionToken, TlsVerification,
};

const KEYRING_SERVICE: &str = "taskboard";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// Where a profile keeps its session token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Token file under the platform data directory.
    #[default]
    File,
    /// System keyring entry.
    Keyring,
}

/// A named server profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Backend root URL (e.g., "http://localhost:3000").
    #[serde(default = "default_server")]
    pub server: String,

    /// What to do with local changes after a failed save.
    #[serde(default)]
    pub save_policy: SaveFailurePolicy,

    /// Session token storage.
    #[serde(default)]
    pub session: SessionBackend,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            server: default_server(),
            save_policy: SaveFailurePolicy::default(),
            session: SessionBackend::default(),
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_server() -> String {
    DEFAULT_BASE_URL.into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "taskboard", "taskboard")
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("taskboard");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding per-profile session files.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Session token file for `profile_name`.
pub fn session_path(profile_name: &str) -> PathBuf {
    data_dir().join("sessions").join(format!("{profile_name}.token"))
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, then `TASKBOARD_*` overrides.
/// Nested keys use a double underscore (`TASKBOARD_DEFAULTS__OUTPUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TASKBOARD_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Session storage ─────────────────────────────────────────────────

/// Token kept in the system keyring under `taskboard / {profile}/session`.
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    account: String,
}

impl KeyringSessionStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            account: format!("{profile_name}/session"),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, SessionError> {
        keyring::Entry::new(KEYRING_SERVICE, &self.account)
            .map_err(|e| SessionError::Backend(e.to_string()))
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<SessionToken>, SessionError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(SessionToken::new(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SessionError::Backend(e.to_string())),
        }
    }

    fn save(&self, token: &SessionToken) -> Result<(), SessionError> {
        self.entry()?
            .set_password(token.as_str())
            .map_err(|e| SessionError::Backend(e.to_string()))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SessionError::Backend(e.to_string())),
        }
    }
}

/// Session guard for a profile, backed by the configured storage.
pub fn session_guard(profile: &Profile, profile_name: &str) -> SessionGuard {
    match profile.session {
        SessionBackend::File => SessionGuard::new(FileSessionStore::new(session_path(profile_name))),
        SessionBackend::Keyring => SessionGuard::new(KeyringSessionStore::new(profile_name)),
    }
}

// ── ServerConfig translation ────────────────────────────────────────

/// Build a `ServerConfig` from a profile with no CLI overrides.
///
/// Settings the profile leaves unset come from `[defaults]`.
pub fn profile_to_server_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ServerConfig, ConfigError> {
    let base_url: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ServerConfig {
        base_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        save_failure: profile.save_policy,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profile_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "work".into(),
            Profile {
                server: "https://boards.example.com".into(),
                save_policy: SaveFailurePolicy::Resync,
                session: SessionBackend::Keyring,
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let work = &loaded.profiles["work"];
        assert_eq!(work.server, "https://boards.example.com");
        assert_eq!(work.save_policy, SaveFailurePolicy::Resync);
        assert_eq!(work.session, SessionBackend::Keyring);
    }

    #[test]
    fn sparse_profile_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.home]\ntimeout = 5\n").unwrap();

        let cfg = load_config_from(&path).unwrap();
        let home = &cfg.profiles["home"];
        assert_eq!(home.server, DEFAULT_BASE_URL);
        assert_eq!(home.session, SessionBackend::File);

        let server = profile_to_server_config(home, &cfg.defaults).unwrap();
        assert_eq!(server.timeout, Duration::from_secs(5));
        assert_eq!(server.save_failure, SaveFailurePolicy::KeepLocal);
        assert_eq!(server.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn profile_without_timeout_uses_defaults_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\ntimeout = 5\n\n[profiles.home]\n").unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.timeout, 5);
        let server = profile_to_server_config(&cfg.profiles["home"], &cfg.defaults).unwrap();
        assert_eq!(server.timeout, Duration::from_secs(5));

        let pinned = Profile {
            timeout: Some(12),
            ..Profile::default()
        };
        let server = profile_to_server_config(&pinned, &cfg.defaults).unwrap();
        assert_eq!(server.timeout, Duration::from_secs(12));
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let profile = Profile {
            insecure: Some(true),
            ca_cert: Some("/tmp/ca.pem".into()),
            ..Profile::default()
        };
        let server = profile_to_server_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(server.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let profile = Profile {
            server: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_server_config(&profile, &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn session_path_is_per_profile() {
        assert_ne!(session_path("work"), session_path("home"));
        assert!(session_path("work").ends_with("sessions/work.token"));
    }
}
