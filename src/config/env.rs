use config::{Config as ConfigLoader, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::loader::{FailurePolicy, LoaderConfig};
use crate::logging::LogFormat;

/// Environment variable prefixes for different configuration sections
const ENV_PREFIX: &str = "LAUNCHPAD";
const ENV_NETWORK_PREFIX: &str = "LAUNCHPAD_NETWORK";
const ENV_CONTRACT_PREFIX: &str = "LAUNCHPAD_CONTRACT";
const ENV_LOADER_PREFIX: &str = "LAUNCHPAD_LOADER";
const ENV_LOG_PREFIX: &str = "LAUNCHPAD_LOG";
const ENV_CONFIG_DIR: &str = "LAUNCHPAD_CONFIG_DIR";

/// Chain the CLI and client fall back to when nothing selects one
pub const DEFAULT_FALLBACK_CHAIN_ID: u64 = 8453;

/// Network configuration loaded from environment/files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkEnvConfig {
    /// Explicitly selected chain; wins over the fallback
    pub chain_id: Option<u64>,
    /// Chain used when none is selected
    pub fallback_chain_id: Option<u64>,
    /// RPC endpoint URL; defaults to the network table entry
    pub rpc_url: Option<String>,
    /// Request timeout for RPC calls (seconds)
    pub rpc_timeout_secs: Option<u64>,
}

/// Row loader timing from environment/files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderEnvConfig {
    pub visibility_recheck_ms: Option<u64>,
    pub tick_ms: Option<u64>,
    pub debounce_ms: Option<u64>,
    pub fetch_timeout_secs: Option<u64>,
    pub failure_policy: Option<FailurePolicy>,
    /// Keep showing a loaded record while it is re-polled
    pub keep_while_refreshing: Option<bool>,
}

/// Logging configuration from environment/files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingEnvConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: Option<String>,
    /// Log format (compact, pretty, json)
    pub format: Option<String>,
    /// Enable colored output
    pub enable_colors: Option<bool>,
}

/// Complete environment configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub network: NetworkEnvConfig,
    pub loader: LoaderEnvConfig,
    pub logging: LoggingEnvConfig,
    /// Other `LAUNCHPAD_*` variables
    pub custom: HashMap<String, String>,
    /// Configuration file paths that were loaded
    #[serde(skip)]
    pub loaded_files: Vec<String>,
}

impl EnvironmentConfig {
    /// Load configuration from files, then environment variables, then validate
    pub fn load() -> Result<Self, Error> {
        Self::load_from(&Self::search_paths())
    }

    /// Same as [`load`](Self::load) with an explicit list of directories
    pub fn load_from(search_paths: &[PathBuf]) -> Result<Self, Error> {
        let mut env_config = Self::default();
        env_config.load_from_files(search_paths)?;
        env_config.load_from_env()?;
        env_config.validate()?;
        Ok(env_config)
    }

    /// Directories searched for configuration files, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let config_dir = env::var(ENV_CONFIG_DIR).unwrap_or_else(|_| "config".to_string());
        let mut paths = vec![PathBuf::from(&config_dir)];
        for fallback in ["config", "../config", "."] {
            if fallback != config_dir {
                paths.push(PathBuf::from(fallback));
            }
        }
        paths
    }

    fn load_from_files(&mut self, search_paths: &[PathBuf]) -> Result<(), Error> {
        let config_files = ["launchpad.toml", "launchpad.json", "config.toml"];

        for search_path in search_paths {
            for config_file in &config_files {
                let file_path = search_path.join(config_file);
                if file_path.exists() {
                    self.load_config_file(&file_path)?;
                    self.loaded_files
                        .push(file_path.to_string_lossy().to_string());
                }
            }
        }

        Ok(())
    }

    /// Load a specific configuration file
    fn load_config_file(&mut self, file_path: &Path) -> Result<(), Error> {
        let file_format = match file_path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        };

        let settings = ConfigLoader::builder()
            .add_source(File::from(file_path).format(file_format))
            .build()
            .map_err(|e| Error::Config(format!("Failed to load config file: {}", e)))?;

        if let Ok(network_config) = settings.get::<NetworkEnvConfig>("network") {
            self.merge_network_config(network_config);
        }

        if let Ok(loader_config) = settings.get::<LoaderEnvConfig>("loader") {
            self.merge_loader_config(loader_config);
        }

        if let Ok(logging_config) = settings.get::<LoggingEnvConfig>("logging") {
            self.merge_logging_config(logging_config);
        }

        if let Ok(custom_map) = settings.get::<HashMap<String, String>>("custom") {
            for (key, value) in custom_map {
                self.custom.entry(key).or_insert(value);
            }
        }

        Ok(())
    }

    fn load_from_env(&mut self) -> Result<(), Error> {
        let network = &mut self.network;
        override_with(&mut network.chain_id, parse_env(&network_key("CHAIN_ID"))?);
        override_with(
            &mut network.fallback_chain_id,
            parse_env(&network_key("FALLBACK_CHAIN_ID"))?,
        );
        override_with(&mut network.rpc_url, env_string(&network_key("RPC_URL")));
        override_with(
            &mut network.rpc_timeout_secs,
            parse_env(&network_key("RPC_TIMEOUT_SECS"))?,
        );

        let loader = &mut self.loader;
        override_with(
            &mut loader.visibility_recheck_ms,
            parse_env(&loader_key("VISIBILITY_RECHECK_MS"))?,
        );
        override_with(&mut loader.tick_ms, parse_env(&loader_key("TICK_MS"))?);
        override_with(&mut loader.debounce_ms, parse_env(&loader_key("DEBOUNCE_MS"))?);
        override_with(
            &mut loader.fetch_timeout_secs,
            parse_env(&loader_key("FETCH_TIMEOUT_SECS"))?,
        );
        override_with(
            &mut loader.failure_policy,
            parse_env(&loader_key("FAILURE_POLICY"))?,
        );
        override_with(
            &mut loader.keep_while_refreshing,
            parse_env(&loader_key("KEEP_WHILE_REFRESHING"))?,
        );

        let logging = &mut self.logging;
        override_with(&mut logging.level, env_string(&log_key("LEVEL")));
        override_with(&mut logging.format, env_string(&log_key("FORMAT")));
        override_with(
            &mut logging.enable_colors,
            parse_env(&log_key("ENABLE_COLORS"))?,
        );

        self.load_custom_env();
        Ok(())
    }

    /// Collect `LAUNCHPAD_*` variables that belong to no known section
    fn load_custom_env(&mut self) {
        let sections = [
            ENV_NETWORK_PREFIX,
            ENV_CONTRACT_PREFIX,
            ENV_LOADER_PREFIX,
            ENV_LOG_PREFIX,
        ];
        let custom = env::vars().filter(|(key, _)| {
            key.starts_with(ENV_PREFIX)
                && key != ENV_CONFIG_DIR
                && !sections.iter().any(|section| key.starts_with(section))
        });
        self.custom.extend(custom);
    }

    /// Fill unset network fields from a file section; earlier files win
    fn merge_network_config(&mut self, file: NetworkEnvConfig) {
        let network = &mut self.network;
        fill(&mut network.chain_id, file.chain_id);
        fill(&mut network.fallback_chain_id, file.fallback_chain_id);
        fill(&mut network.rpc_url, file.rpc_url);
        fill(&mut network.rpc_timeout_secs, file.rpc_timeout_secs);
    }

    fn merge_loader_config(&mut self, file: LoaderEnvConfig) {
        let loader = &mut self.loader;
        fill(&mut loader.visibility_recheck_ms, file.visibility_recheck_ms);
        fill(&mut loader.tick_ms, file.tick_ms);
        fill(&mut loader.debounce_ms, file.debounce_ms);
        fill(&mut loader.fetch_timeout_secs, file.fetch_timeout_secs);
        fill(&mut loader.failure_policy, file.failure_policy);
        fill(&mut loader.keep_while_refreshing, file.keep_while_refreshing);
    }

    fn merge_logging_config(&mut self, file: LoggingEnvConfig) {
        let logging = &mut self.logging;
        fill(&mut logging.level, file.level);
        fill(&mut logging.format, file.format);
        fill(&mut logging.enable_colors, file.enable_colors);
    }

    /// Reject values that would break the client or the loader at runtime
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(rpc_url) = &self.network.rpc_url {
            if !(rpc_url.starts_with("http://") || rpc_url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "RPC URL '{}' must use http:// or https://",
                    rpc_url
                )));
            }
        }

        let non_zero = [
            ("network.rpc_timeout_secs", self.network.rpc_timeout_secs),
            ("loader.visibility_recheck_ms", self.loader.visibility_recheck_ms),
            ("loader.tick_ms", self.loader.tick_ms),
            ("loader.fetch_timeout_secs", self.loader.fetch_timeout_secs),
        ];
        if let Some((field, _)) = non_zero.iter().find(|(_, value)| *value == Some(0)) {
            return Err(Error::Config(format!("{} must be greater than 0", field)));
        }

        if let Some(level) = &self.logging.level {
            if level.parse::<tracing::Level>().is_err() {
                return Err(Error::Config(format!(
                    "Invalid log level '{}'. Must be one of: error, warn, info, debug, trace",
                    level
                )));
            }
        }
        LogFormat::parse(self.logging.format.as_deref())?;

        Ok(())
    }

    /// Configuration with every field set to its default
    pub fn generate_default_config() -> Self {
        let mut config = Self::default();
        let loader = LoaderConfig::default();

        config.network.fallback_chain_id = Some(DEFAULT_FALLBACK_CHAIN_ID);
        config.network.rpc_timeout_secs = Some(30);

        config.loader.visibility_recheck_ms = Some(loader.visibility_recheck.as_millis() as u64);
        config.loader.tick_ms = Some(loader.tick.as_millis() as u64);
        config.loader.debounce_ms = Some(loader.debounce.as_millis() as u64);
        config.loader.fetch_timeout_secs = Some(loader.fetch_timeout.as_secs());
        config.loader.failure_policy = Some(loader.failure_policy);
        config.loader.keep_while_refreshing = Some(loader.keep_while_refreshing);

        config.logging.level = Some("info".to_string());
        config.logging.format = Some("compact".to_string());
        config.logging.enable_colors = Some(true);

        config
    }

    /// Save configuration to file
    pub fn save_to_file(&self, file_path: &Path) -> Result<(), Error> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(file_path, content)?;
        Ok(())
    }

    pub fn get_custom(&self, key: &str) -> Option<&String> {
        self.custom.get(key)
    }

    /// Chain selected by configuration, or the fallback chain
    pub fn get_chain_id(&self) -> u64 {
        self.network
            .chain_id
            .or(self.network.fallback_chain_id)
            .unwrap_or(DEFAULT_FALLBACK_CHAIN_ID)
    }

    pub fn get_fallback_chain_id(&self) -> u64 {
        self.network
            .fallback_chain_id
            .unwrap_or(DEFAULT_FALLBACK_CHAIN_ID)
    }

    pub fn get_rpc_timeout_secs(&self) -> u64 {
        self.network.rpc_timeout_secs.unwrap_or(30)
    }

    /// Loader timing with defaults filled in
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig::from(&self.loader)
    }
}

/// Parse an environment variable, treating an unset variable as `None`
fn parse_env<T>(key: &str) -> Result<Option<T>, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn network_key(name: &str) -> String {
    format!("{}_{}", ENV_NETWORK_PREFIX, name)
}

fn loader_key(name: &str) -> String {
    format!("{}_{}", ENV_LOADER_PREFIX, name)
}

fn log_key(name: &str) -> String {
    format!("{}_{}", ENV_LOG_PREFIX, name)
}

/// Environment values replace whatever the files set
fn override_with<T>(field: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *field = value;
    }
}

/// File values only fill fields nothing has set yet
fn fill<T>(field: &mut Option<T>, value: Option<T>) {
    if field.is_none() {
        *field = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::time::Duration;

    #[test]
    fn test_environment_config_defaults() {
        let config = EnvironmentConfig::generate_default_config();

        assert_eq!(config.get_chain_id(), 8453);
        assert_eq!(config.get_rpc_timeout_secs(), 30);
        assert_eq!(config.loader_config(), LoaderConfig::default());
    }

    #[test]
    fn test_environment_config_validation() {
        let mut config = EnvironmentConfig::generate_default_config();
        assert!(config.validate().is_ok());

        config.network.rpc_url = Some("invalid-url".to_string());
        assert!(config.validate().is_err());

        config.network.rpc_url = Some("https://mainnet.base.org".to_string());
        config.loader.fetch_timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.loader.fetch_timeout_secs = Some(5);
        config.logging.format = Some("xml".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_environment_variable_loading() {
        env::set_var("LAUNCHPAD_NETWORK_CHAIN_ID", "84531");
        env::set_var("LAUNCHPAD_LOADER_DEBOUNCE_MS", "0");
        env::set_var("LAUNCHPAD_LOADER_FAILURE_POLICY", "collapse");

        let mut config = EnvironmentConfig::default();
        config.load_from_env().unwrap();
        assert!(config.custom.keys().all(|key| !key.starts_with("LAUNCHPAD_LOADER")));

        assert_eq!(config.network.chain_id, Some(84531));
        assert_eq!(config.loader.debounce_ms, Some(0));
        assert_eq!(config.loader.failure_policy, Some(FailurePolicy::Collapse));
        assert_eq!(config.loader_config().debounce, Duration::ZERO);

        env::remove_var("LAUNCHPAD_NETWORK_CHAIN_ID");
        env::remove_var("LAUNCHPAD_LOADER_DEBOUNCE_MS");
        env::remove_var("LAUNCHPAD_LOADER_FAILURE_POLICY");
    }

    #[test]
    fn test_config_merging() {
        let mut config = EnvironmentConfig::default();
        config.network.chain_id = Some(1);

        config.merge_network_config(NetworkEnvConfig {
            chain_id: Some(5),
            rpc_url: Some("https://file-rpc.example.com".to_string()),
            ..Default::default()
        });

        assert_eq!(config.network.chain_id, Some(1));
        assert_eq!(
            config.network.rpc_url,
            Some("https://file-rpc.example.com".to_string())
        );
    }
}
