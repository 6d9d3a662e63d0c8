//! CLI-owned configuration: TOML profiles, env/flag overrides, and
//! translation to `ponctl_core::OltConfig`.
//!
//! Core never sees these types -- it receives a pre-built `OltConfig`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use ponctl_core::{OltConfig, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The factory session cookie the device ships with. `config init`
/// writes it as a starting point; replace it after hardening the OLT.
pub const DEFAULT_SESSION_COOKIE: &str =
    "session=em+protection-user=admin&em+protection-pw=admin";

// ── TOML config structs ──────────────────────────────────────────────

/// CLI-owned TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name (used when --profile is not specified).
    pub default_profile: Option<String>,

    /// Named OLT profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            profiles: HashMap::new(),
        }
    }
}

/// One OLT profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// OLT address (IP or hostname).
    pub host: String,

    /// Session cookie value (plaintext -- prefer the env var).
    pub cookie: Option<String>,

    /// Environment variable name containing the cookie.
    pub cookie_env: Option<String>,

    /// Verify the device TLS certificate (default: off, self-signed).
    #[serde(default)]
    pub verify_tls: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Request timeout override (seconds).
    pub timeout: Option<u64>,
}

// ── Loading ──────────────────────────────────────────────────────────

/// Path of the config file (`~/.config/ponctl/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "ponctl")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("ponctl.toml"))
}

/// Load the config file merged with `PONCTL_CONFIG_*` env overrides,
/// falling back to defaults when no file exists.
pub fn load_config_or_default() -> Config {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("PONCTL_CONFIG_"))
        .extract()
        .unwrap_or_default()
}

/// The profile name to use: flag/env, then the file's default.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build an `OltConfig` from the config file, profile, and CLI overrides.
pub fn resolve(global: &GlobalOpts) -> Result<OltConfig, CliError> {
    let config = load_config_or_default();
    let profile_name = active_profile_name(global, &config);
    let profile = config.profiles.get(&profile_name);

    if global.profile.is_some() && profile.is_none() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: config
                .profiles
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    let host = global
        .host
        .clone()
        .or_else(|| profile.map(|p| p.host.clone()))
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;

    let cookie = resolve_cookie(global, profile);

    let tls = if global.verify_tls || profile.is_some_and(|p| p.verify_tls) {
        match profile.and_then(|p| p.ca_cert.clone()) {
            Some(path) => TlsMode::CustomCa(path),
            None => TlsMode::System,
        }
    } else {
        TlsMode::DangerAcceptInvalid
    };

    let timeout = profile
        .and_then(|p| p.timeout)
        .unwrap_or(global.timeout)
        .max(1);

    let mut olt = OltConfig::new(host, cookie);
    olt.tls = tls;
    olt.timeout = Duration::from_secs(timeout);
    Ok(olt)
}

/// Cookie precedence: flag/env, profile env var, profile literal,
/// factory default.
fn resolve_cookie(global: &GlobalOpts, profile: Option<&Profile>) -> SecretString {
    if let Some(cookie) = &global.cookie {
        return SecretString::from(cookie.clone());
    }
    if let Some(profile) = profile {
        if let Some(var) = &profile.cookie_env {
            if let Ok(value) = std::env::var(var) {
                return SecretString::from(value);
            }
        }
        if let Some(cookie) = &profile.cookie {
            return SecretString::from(cookie.clone());
        }
    }
    SecretString::from(DEFAULT_SESSION_COOKIE)
}

/// A starter profile for `config init`.
pub fn starter_config(name: &str, host: &str) -> Config {
    let mut profiles = HashMap::new();
    profiles.insert(
        name.to_owned(),
        Profile {
            host: host.to_owned(),
            cookie: Some(DEFAULT_SESSION_COOKIE.to_owned()),
            cookie_env: None,
            verify_tls: false,
            ca_cert: None,
            timeout: None,
        },
    );
    Config {
        default_profile: Some(name.to_owned()),
        profiles,
    }
}
