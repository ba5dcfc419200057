//! Runtime configuration from the environment (and `.env` via dotenv).

use crate::processing::DEFAULT_DEFER_THRESHOLD;
use crate::share::DEFAULT_NAMESPACE;
use std::path::PathBuf;

pub const ENV_STATE_FILE: &str = "SUBNET_EXPLORER_STATE_FILE";
pub const ENV_NAMESPACE: &str = "SUBNET_EXPLORER_NAMESPACE";
pub const ENV_DEFER_THRESHOLD: &str = "SUBNET_EXPLORER_DEFER_THRESHOLD";
pub const ENV_LOG_CONFIG: &str = "SUBNET_EXPLORER_LOG_CONFIG";

const DEFAULT_STATE_FILE: &str = "subnet_explorer_state.json";
const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON file holding persisted session fields.
    pub state_file: PathBuf,
    /// Key prefix inside the state file.
    pub namespace: String,
    /// Potential row count above which projections are deferred.
    pub defer_threshold: u64,
    /// log4rs configuration file.
    pub log_config: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            namespace: DEFAULT_NAMESPACE.to_string(),
            defer_threshold: DEFAULT_DEFER_THRESHOLD,
            log_config: PathBuf::from(DEFAULT_LOG_CONFIG),
        }
    }
}

impl Config {
    /// Read the process environment; unset or invalid values keep defaults.
    pub fn from_env() -> Config {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(path) = lookup(ENV_STATE_FILE).filter(|v| !v.is_empty()) {
            config.state_file = PathBuf::from(path);
        }
        if let Some(ns) = lookup(ENV_NAMESPACE).filter(|v| !v.is_empty()) {
            config.namespace = ns;
        }
        if let Some(raw) = lookup(ENV_DEFER_THRESHOLD) {
            match raw.trim().parse() {
                Ok(threshold) => config.defer_threshold = threshold,
                Err(e) => log::warn!("Ignoring {ENV_DEFER_THRESHOLD}={raw:?}: {e}"),
            }
        }
        config.log_config = Config::log_config_from_lookup(&lookup);
        config
    }

    /// Logging config path alone, so logging can start before the rest is parsed.
    pub fn log_config_from_env() -> PathBuf {
        Config::log_config_from_lookup(|key| std::env::var(key).ok())
    }

    pub fn log_config_from_lookup<F>(lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(ENV_LOG_CONFIG)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_CONFIG))
    }
}
