//! Configuration management for the launchpad SDK
//!
//! Environment settings (network, loader timing, logging) come from
//! `launchpad.toml`-style files overridden by `LAUNCHPAD_*` variables; contract
//! addresses come from `contracts.toml` overridden by `LAUNCHPAD_CONTRACT_*`.

pub mod contracts;
pub mod env;

pub use contracts::{ContractInfo, ContractRegistry, ContractType, NetworkContracts};
pub use env::{
    EnvironmentConfig, LoaderEnvConfig, LoggingEnvConfig, NetworkEnvConfig,
    DEFAULT_FALLBACK_CHAIN_ID,
};

use crate::error::Error;
use crate::loader::LoaderConfig;
use crate::network::{effective_chain_id, network_by_chain_id, NetworkData};

/// Environment configuration and contract registry resolved together
#[derive(Debug, Clone)]
pub struct ConfigurationManager {
    pub env_config: EnvironmentConfig,
    pub contract_registry: ContractRegistry,
    active_chain: u64,
    /// Endpoint chosen for the active chain, e.g. by a CLI flag
    rpc_override: Option<String>,
}

impl ConfigurationManager {
    /// Load both configuration sources for the configured chain
    pub fn new() -> Result<Self, Error> {
        Self::from_env_config(EnvironmentConfig::load()?)
    }

    pub fn from_env_config(env_config: EnvironmentConfig) -> Result<Self, Error> {
        let active_chain = env_config.get_chain_id();
        let contract_registry = ContractRegistry::load(active_chain)?;
        Ok(Self {
            env_config,
            contract_registry,
            active_chain,
            rpc_override: None,
        })
    }

    /// Combine already-loaded parts without reading files or the environment
    pub fn from_parts(env_config: EnvironmentConfig, mut contract_registry: ContractRegistry) -> Self {
        let active_chain = env_config.get_chain_id();
        contract_registry.set_active_chain(active_chain);
        Self {
            env_config,
            contract_registry,
            active_chain,
            rpc_override: None,
        }
    }

    /// Resolve the active chain from a live selection (such as a CLI flag)
    /// over the configured fallback
    pub fn select_chain(&mut self, live: Option<u64>) -> u64 {
        let configured = self.env_config.get_chain_id();
        self.active_chain = effective_chain_id(live, Some(configured)).unwrap_or(configured);
        self.contract_registry.set_active_chain(self.active_chain);
        self.active_chain
    }

    pub fn active_chain(&self) -> u64 {
        self.active_chain
    }

    pub fn network(&self) -> Option<&'static NetworkData> {
        network_by_chain_id(self.active_chain)
    }

    /// Use `rpc_url` for the active chain regardless of configuration
    pub fn set_rpc_url(&mut self, rpc_url: impl Into<String>) {
        self.rpc_override = Some(rpc_url.into());
    }

    /// RPC endpoint for the active chain.
    ///
    /// An explicit override wins. The configured URL belongs to the configured
    /// chain and is ignored once another chain is selected; the network table
    /// entry is used instead.
    pub fn rpc_url(&self) -> Result<String, Error> {
        if let Some(rpc_url) = &self.rpc_override {
            return Ok(rpc_url.clone());
        }
        let configured = self
            .env_config
            .network
            .rpc_url
            .as_ref()
            .filter(|_| self.active_chain == self.env_config.get_chain_id());

        configured
            .cloned()
            .or_else(|| self.network().map(|network| network.rpc_url.to_string()))
            .ok_or_else(|| {
                Error::Config(format!(
                    "No RPC URL configured for unsupported chain {}",
                    self.active_chain
                ))
            })
    }

    pub fn loader_config(&self) -> LoaderConfig {
        self.env_config.loader_config()
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let Some(rpc_url) = &self.rpc_override {
            if !(rpc_url.starts_with("http://") || rpc_url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "RPC URL '{}' must use http:// or https://",
                    rpc_url
                )));
            }
        }
        self.env_config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigurationManager {
        ConfigurationManager::from_parts(
            EnvironmentConfig::generate_default_config(),
            ContractRegistry::new(),
        )
    }

    #[test]
    fn test_live_chain_overrides_configured_chain() {
        let mut manager = manager();
        assert_eq!(manager.select_chain(Some(1)), 1);
        assert_eq!(manager.contract_registry.get_active_chain(), Some(1));
        assert_eq!(manager.select_chain(None), DEFAULT_FALLBACK_CHAIN_ID);
    }

    #[test]
    fn test_rpc_url_falls_back_to_network_table() {
        let mut manager = manager();
        manager.select_chain(Some(8453));
        assert_eq!(
            manager.rpc_url().unwrap(),
            "https://developer-access-mainnet.base.org/"
        );

        manager.select_chain(Some(56));
        assert!(manager.rpc_url().is_err());

        manager.set_rpc_url("https://bsc.example.org");
        assert_eq!(manager.rpc_url().unwrap(), "https://bsc.example.org");
    }

    #[test]
    fn test_configured_rpc_url_stays_with_its_chain() {
        let mut env_config = EnvironmentConfig::generate_default_config();
        env_config.network.rpc_url = Some("https://mainnet.base.org".to_string());
        let mut manager = ConfigurationManager::from_parts(env_config, ContractRegistry::new());

        assert_eq!(manager.rpc_url().unwrap(), "https://mainnet.base.org");

        manager.select_chain(Some(1));
        assert_eq!(manager.rpc_url().unwrap(), "https://eth.llamarpc.com");

        manager.select_chain(Some(8453));
        assert_eq!(manager.rpc_url().unwrap(), "https://mainnet.base.org");
    }

    #[test]
    fn test_rpc_override_is_validated() {
        let mut manager = manager();
        manager.set_rpc_url("ws://node.example.org");
        assert!(manager.validate().is_err());
    }
}
