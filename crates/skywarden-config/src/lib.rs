//! File and environment configuration for skywarden.
//!
//! TOML config + `SKYWARDEN_`-prefixed environment overlay, resolved to a
//! [`skywarden_core::EngineConfig`]. The engine itself never reads files;
//! the embedding binary (API server, dashboard) loads a [`Config`] here and
//! hands the translated settings in.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use skywarden_core::EngineConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no feed credentials configured")]
    NoCredentials,

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

/// Top-level configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Upstream sensing backend.
    #[serde(default)]
    pub feed: FeedSettings,

    /// Engine tuning and output locations.
    #[serde(default)]
    pub engine: EngineSettings,
}

/// How to reach the upstream feed. Credentials stay optional — an
/// anonymous local backend is the common case.
#[derive(Debug, Deserialize, Serialize)]
pub struct FeedSettings {
    /// Feed base URL.
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// API key (plaintext — prefer the env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Basic-auth username, with `password`, as an alternative to a key.
    pub username: Option<String>,
    pub password: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            api_key: None,
            api_key_env: None,
            username: None,
            password: None,
            timeout: default_timeout(),
        }
    }
}

fn default_feed_url() -> String {
    "http://localhost:2501".into()
}
fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EngineSettings {
    /// Directory for alert evidence files and batch exports.
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,

    /// Trailing upstream alert records a mirror poll ingests.
    #[serde(default = "default_mirror_limit")]
    pub mirror_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            mirror_limit: default_mirror_limit(),
        }
    }
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("./skywarden_saves")
}
fn default_mirror_limit() -> usize {
    20
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "skywarden", "skywarden").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("skywarden");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_from(&config_path())
}

/// Load from an explicit file + environment. Missing file means defaults.
pub fn load_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SKYWARDEN_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, falling back to defaults on any failure.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the feed API key: named env var first, then plaintext config.
pub fn resolve_api_key(feed: &FeedSettings) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = feed.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Some(ref key) = feed.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials)
}

// ── Translation to the core config ──────────────────────────────────

/// Build an [`EngineConfig`] from loaded settings.
pub fn to_engine_config(cfg: &Config) -> Result<EngineConfig, ConfigError> {
    if cfg.engine.mirror_limit == 0 {
        return Err(ConfigError::Validation {
            field: "engine.mirror_limit".into(),
            reason: "must be at least 1".into(),
        });
    }

    Ok(EngineConfig {
        save_dir: cfg.engine.save_dir.clone(),
        mirror_limit: cfg.engine.mirror_limit,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.feed.url, "http://localhost:2501");
        assert_eq!(cfg.engine.mirror_limit, 20);
        assert_eq!(cfg.engine.save_dir, PathBuf::from("./skywarden_saves"));
    }

    #[test]
    fn toml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[feed]\nurl = \"http://sensor.lan:2501\"\n\n[engine]\nmirror_limit = 5"
        )
        .unwrap();

        let cfg = load_from(file.path()).unwrap();
        assert_eq!(cfg.feed.url, "http://sensor.lan:2501");
        assert_eq!(cfg.engine.mirror_limit, 5);
        // Untouched values keep defaults.
        assert_eq!(cfg.engine.save_dir, PathBuf::from("./skywarden_saves"));
    }

    #[test]
    fn engine_config_translation_validates() {
        let mut cfg = Config::default();
        cfg.engine.mirror_limit = 0;
        assert!(matches!(
            to_engine_config(&cfg),
            Err(ConfigError::Validation { .. })
        ));

        cfg.engine.mirror_limit = 20;
        let engine = to_engine_config(&cfg).unwrap();
        assert_eq!(engine.mirror_limit, 20);
    }

    #[test]
    fn api_key_resolution_order() {
        let feed = FeedSettings {
            api_key: Some("plaintext-key".into()),
            ..FeedSettings::default()
        };
        assert!(resolve_api_key(&feed).is_ok());

        assert!(matches!(
            resolve_api_key(&FeedSettings::default()),
            Err(ConfigError::NoCredentials)
        ));
    }
}
