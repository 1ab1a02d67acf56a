//! Shared configuration for EventHub tools.
//!
//! TOML profiles, environment overrides, session storage (keyring + env),
//! and translation to `eventhub_core::ClientConfig`. The CLI adds
//! `GlobalOpts`-aware wrappers on top.

pub mod session;

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
use url::Url;

use eventhub_core::{ClientConfig, TlsVerification};

pub use session::{SessionStore, StoredSession, TOKEN_ENV, session_path};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(String),

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

    /// Named backend profiles.
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

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Public site that serves `/validate/...` pages.
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            origin: default_origin(),
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
fn default_origin() -> String {
    "http://localhost:3000".into()
}
fn default_backend() -> String {
    "http://localhost:8080".into()
}

/// A named backend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API gateway URL every service defaults to.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Direct auth service URL (e.g. "http://localhost:8081").
    pub auth_url: Option<String>,

    /// Direct event service URL.
    pub events_url: Option<String>,

    /// Direct ticket service URL.
    pub tickets_url: Option<String>,

    /// Override the public site origin used in validation links.
    pub origin: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            auth_url: None,
            events_url: None,
            tickets_url: None,
            origin: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

/// Values supplied on the command line, applied over the profile.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub origin: Option<String>,
    pub insecure: bool,
    pub timeout: Option<u64>,
}

impl Config {
    /// Profile name to use: `requested`, else the configured default.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Comma-separated, sorted profile names.
    pub fn profile_names(&self) -> String {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        if names.is_empty() {
            "(none)".into()
        } else {
            names.join(", ")
        }
    }

    /// Build the client configuration for `profile_name`.
    ///
    /// With no profiles configured at all, built-in local defaults are
    /// used so a fresh install works against a local backend.
    pub fn resolve(
        &self,
        profile_name: &str,
        overrides: &Overrides,
    ) -> Result<ClientConfig, ConfigError> {
        match self.profiles.get(profile_name) {
            Some(profile) => resolve_client_config(profile, &self.defaults, overrides),
            None if self.profiles.is_empty() => {
                resolve_client_config(&Profile::default(), &self.defaults, overrides)
            }
            None => Err(ConfigError::ProfileNotFound {
                name: profile_name.into(),
                available: self.profile_names(),
            }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "eventhub", "eventhub")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for state written by the tools (the session file).
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("eventhub");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + `EVENTHUB_*` environment variables.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("EVENTHUB_").split("__"));

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

// ── Profile resolution ──────────────────────────────────────────────

/// Translate a profile + defaults + CLI overrides into a `ClientConfig`.
///
/// This is the single boundary where config types cross into core types.
pub fn resolve_client_config(
    profile: &Profile,
    defaults: &Defaults,
    overrides: &Overrides,
) -> Result<ClientConfig, ConfigError> {
    // 1. Backend + origin (flag > env > profile > defaults)
    let backend = parse_url(
        "backend",
        overrides.backend.as_deref().unwrap_or(&profile.backend),
    )?;
    let origin = parse_url(
        "origin",
        overrides
            .origin
            .as_deref()
            .or(profile.origin.as_deref())
            .unwrap_or(&defaults.origin),
    )?;

    let mut config = ClientConfig::new(backend, origin);

    // 2. Per-service routing
    config.auth_url = parse_optional_url("auth_url", profile.auth_url.as_deref())?;
    config.events_url = parse_optional_url("events_url", profile.events_url.as_deref())?;
    config.tickets_url = parse_optional_url("tickets_url", profile.tickets_url.as_deref())?;

    // 3. TLS verification
    config.tls = if overrides.insecure || profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 4. Timeout
    config.timeout = Duration::from_secs(
        overrides
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );

    Ok(config)
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

fn parse_optional_url(field: &str, raw: Option<&str>) -> Result<Option<Url>, ConfigError> {
    raw.filter(|r| !r.trim().is_empty())
        .map(|r| parse_url(field, r))
        .transpose()
}
