//! Configuration for wavescan.
//!
//! Layered with figment: built-in defaults, then `config.toml` from the
//! platform config directory, then `WAVESCAN_*` environment variables
//! (nested keys use a double underscore, e.g. `WAVESCAN_SORT__KEY`).
//! The binary applies its command-line overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wavescan_core::{MAX_CH_STATS, RenderConfig, SortConfig, SortKey, SortOrder};

/// Largest histogram the summary line has room for.
pub const MAX_CHANNEL_STATS: usize = 16;

/// Scanning faster than this only keeps the store locked.
pub const MIN_SCAN_INTERVAL_MS: u64 = 100;

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

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Channels listed in the summary histogram.
    #[serde(default = "default_channel_stats")]
    pub channel_stats: usize,

    /// Pause between probe cycles.
    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u64,

    /// Render tick.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Recorded scan to replay instead of the bundled demo data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture: Option<PathBuf>,

    /// Initial ordering of the scan list.
    #[serde(default)]
    pub sort: SortDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_stats: default_channel_stats(),
            scan_interval_ms: default_scan_interval_ms(),
            tick_rate_ms: default_tick_rate_ms(),
            fixture: None,
            sort: SortDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SortDefaults {
    #[serde(default)]
    pub key: SortKey,

    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

impl Default for SortDefaults {
    fn default() -> Self {
        Self {
            key: SortKey::default(),
            ascending: default_ascending(),
        }
    }
}

fn default_channel_stats() -> usize {
    MAX_CH_STATS
}
fn default_scan_interval_ms() -> u64 {
    2_000
}
fn default_tick_rate_ms() -> u64 {
    250
}
fn default_ascending() -> bool {
    true
}

impl Config {
    pub fn sort_config(&self) -> SortConfig {
        SortConfig::new(self.sort.key, SortOrder::from_ascending(self.sort.ascending))
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            sort: self.sort_config(),
            channel_stats: self.channel_stats,
        }
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Reject values the view cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_CHANNEL_STATS).contains(&self.channel_stats) {
            return Err(ConfigError::Validation {
                field: "channel_stats".into(),
                reason: format!(
                    "expected 1..={MAX_CHANNEL_STATS}, got {}",
                    self.channel_stats
                ),
            });
        }
        if self.scan_interval_ms < MIN_SCAN_INTERVAL_MS {
            return Err(ConfigError::Validation {
                field: "scan_interval_ms".into(),
                reason: format!(
                    "must be at least {MIN_SCAN_INTERVAL_MS}, got {}",
                    self.scan_interval_ms
                ),
            });
        }
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::Validation {
                field: "tick_rate_ms".into(),
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "wavescan", "wavescan").map_or_else(
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
    p.push("wavescan");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load and validate the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load and validate the config from `path` + environment. A missing file
/// is not an error; defaults fill in.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WAVESCAN_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("missing.toml")).unwrap();
            assert_eq!(cfg, Config::default());
            assert_eq!(cfg.channel_stats, MAX_CH_STATS);
            assert_eq!(cfg.sort_config(), SortConfig::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    channel_stats = 5
                    scan_interval_ms = 500

                    [sort]
                    key = "channel-signal"
                    ascending = false
                "#,
            )?;
            jail.set_env("WAVESCAN_CHANNEL_STATS", "7");
            jail.set_env("WAVESCAN_SORT__KEY", "open-signal");

            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(cfg.channel_stats, 7);
            assert_eq!(cfg.scan_interval(), Duration::from_millis(500));
            assert_eq!(
                cfg.sort_config(),
                SortConfig::new(SortKey::OpenSignal, SortOrder::Descending)
            );
            assert_eq!(cfg.render_config().channel_stats, 7);
            Ok(())
        });
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "channel_stats = 0")?;
            let err = load_config_from(Path::new("config.toml")).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation { ref field, .. } if field == "channel_stats")
            );

            jail.create_file("config.toml", "scan_interval_ms = 10")?;
            let err = load_config_from(Path::new("config.toml")).unwrap_err();
            assert!(err.to_string().starts_with("invalid scan_interval_ms"));
            Ok(())
        });
    }

    #[test]
    fn unknown_sort_key_is_a_load_error() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[sort]\nkey = \"loudness\"")?;
            let err = load_config_from(Path::new("config.toml")).unwrap_err();
            assert!(matches!(err, ConfigError::Figment(_)));
            Ok(())
        });
    }

    #[test]
    fn save_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            sort: SortDefaults {
                key: SortKey::Essid,
                ascending: false,
            },
            channel_stats: 4,
            fixture: Some(PathBuf::from("/tmp/scan.json")),
            ..Config::default()
        };

        save_config_to(&cfg, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("key = \"essid\""));

        Jail::expect_with(|_jail| {
            assert_eq!(load_config_from(&path).unwrap(), cfg);
            Ok(())
        });
    }
}
