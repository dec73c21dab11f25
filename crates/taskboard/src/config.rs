//! CLI configuration -- thin wrapper around `taskboard_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--server, --insecure, --timeout).

use std::time::Duration;

use clap::ArgMatches;
use clap::ValueEnum;
use clap::parser::ValueSource;
use taskboard_core::{ServerConfig, SessionGuard, TlsVerification};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use taskboard_config::{
    Config, Defaults, Profile, SessionBackend, config_path, load_config_or_default, save_config,
};

/// Everything a server-bound command needs.
pub struct Target {
    pub profile_name: String,
    pub server: ServerConfig,
    pub session: SessionGuard,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Fill `--output` and `--color` from `[defaults]` when neither a flag nor
/// the environment set them.
pub fn apply_defaults(global: &mut GlobalOpts, matches: &ArgMatches, defaults: &Defaults) {
    if matches.value_source("output") == Some(ValueSource::DefaultValue) {
        match OutputFormat::from_str(&defaults.output, true) {
            Ok(output) => global.output = output,
            Err(_) => tracing::warn!(value = %defaults.output, "ignoring unknown defaults.output"),
        }
    }
    if matches.value_source("color") == Some(ValueSource::DefaultValue) {
        match ColorMode::from_str(&defaults.color, true) {
            Ok(color) => global.color = color,
            Err(_) => tracing::warn!(value = %defaults.color, "ignoring unknown defaults.color"),
        }
    }
}

/// Translate a `Profile` + global flags into a `ServerConfig`.
///
/// CLI flag overrides take priority over profile values, which take
/// priority over `[defaults]`.
pub fn resolve_profile(
    profile: &Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ServerConfig, CliError> {
    let mut server = taskboard_config::profile_to_server_config(profile, defaults)?;

    if let Some(ref url_str) = global.server {
        server.base_url = url_str.parse().map_err(|_| CliError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }
    if global.insecure {
        server.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        server.timeout = Duration::from_secs(secs);
    }
    Ok(server)
}

/// Resolve server settings and session storage for the active profile.
///
/// A missing profile falls back to defaults, so a fresh install talks to
/// the local server without any setup. A profile named explicitly with
/// `--profile` must exist.
pub fn resolve_target(global: &GlobalOpts) -> Result<Target, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let fallback;
    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile,
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => {
            fallback = Profile::default();
            &fallback
        }
    };

    Ok(Target {
        server: resolve_profile(profile, &cfg.defaults, global)?,
        session: taskboard_config::session_guard(profile, &profile_name),
        profile_name,
    })
}

/// Comma-separated profile names for diagnostics.
pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::{CommandFactory, FromArgMatches};

    use super::*;
    use crate::cli::Cli;

    fn parse(args: &[&str]) -> (Cli, ArgMatches) {
        let matches = Cli::command().try_get_matches_from(args).unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        (cli, matches)
    }

    fn defaults(output: &str, color: &str, timeout: u64) -> Defaults {
        Defaults {
            output: output.into(),
            color: color.into(),
            timeout,
        }
    }

    #[test]
    fn defaults_section_fills_unset_flags() {
        let (mut cli, matches) = parse(&["taskboard", "boards", "list"]);
        apply_defaults(&mut cli.global, &matches, &defaults("json", "never", 30));
        assert!(matches!(cli.global.output, OutputFormat::Json));
        assert!(matches!(cli.global.color, ColorMode::Never));
    }

    #[test]
    fn explicit_flags_beat_defaults_section() {
        let (mut cli, matches) = parse(&["taskboard", "boards", "list", "-o", "yaml"]);
        apply_defaults(&mut cli.global, &matches, &defaults("json", "bogus", 30));
        assert!(matches!(cli.global.output, OutputFormat::Yaml));
        assert!(matches!(cli.global.color, ColorMode::Auto));
    }

    #[test]
    fn timeout_falls_back_to_defaults_section() {
        let (cli, _) = parse(&["taskboard", "whoami"]);
        let server = resolve_profile(&Profile::default(), &defaults("table", "auto", 5), &cli.global)
            .unwrap();
        assert_eq!(server.timeout, Duration::from_secs(5));

        let (cli, _) = parse(&["taskboard", "whoami", "--timeout", "9"]);
        let server = resolve_profile(&Profile::default(), &defaults("table", "auto", 5), &cli.global)
            .unwrap();
        assert_eq!(server.timeout, Duration::from_secs(9));
    }
}
