use alloy_primitives::Address;
use config::{Config as ConfigLoader, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use crate::error::Error;
use crate::network::{network_by_chain_id, NETWORKS};

const ENV_CONTRACT_PREFIX: &str = "LAUNCHPAD_CONTRACT";

/// Launchpad contracts the SDK reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    /// Registry of token and LP locks
    TokenLockerManager,
    /// Factory and registry of trading tokens
    TradingTokenManager,
    /// Factory and registry of NFT collections
    NftFactory,
}

impl ContractType {
    pub const ALL: [ContractType; 3] = [
        ContractType::TokenLockerManager,
        ContractType::TradingTokenManager,
        ContractType::NftFactory,
    ];

    /// Suffix of the `LAUNCHPAD_CONTRACT_*` override variable
    pub fn env_suffix(&self) -> &'static str {
        match self {
            ContractType::TokenLockerManager => "TOKEN_LOCKER_MANAGER",
            ContractType::TradingTokenManager => "TRADING_TOKEN_MANAGER",
            ContractType::NftFactory => "NFT_FACTORY",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractType::TokenLockerManager => write!(f, "token_locker_manager"),
            ContractType::TradingTokenManager => write!(f, "trading_token_manager"),
            ContractType::NftFactory => write!(f, "nft_factory"),
        }
    }
}

/// Deployed contract address and metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub address: Address,
    /// Contract version, e.g. `v1`
    pub version: Option<String>,
}

impl ContractInfo {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            version: None,
        }
    }

    /// Parse and validate a hex address
    pub fn parse(address: &str, version: Option<String>) -> Result<Self, Error> {
        let address = address
            .trim()
            .parse::<Address>()
            .map_err(|e| Error::Config(format!("Invalid contract address '{}': {}", address, e)))?;
        let info = Self { address, version };
        info.validate_address()?;
        Ok(info)
    }

    pub fn validate_address(&self) -> Result<(), Error> {
        if self.address == Address::ZERO {
            return Err(Error::Config(
                "Contract address cannot be the zero address".to_string(),
            ));
        }
        Ok(())
    }
}

/// Contract addresses deployed on one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkContracts {
    pub chain_id: u64,
    /// Key used for the chain in contract configuration files
    pub network: String,
    pub contracts: HashMap<ContractType, ContractInfo>,
}

impl NetworkContracts {
    pub fn new(chain_id: u64, network: String) -> Self {
        Self {
            chain_id,
            network,
            contracts: HashMap::new(),
        }
    }

    pub fn add_contract(
        &mut self,
        contract_type: ContractType,
        contract_info: ContractInfo,
    ) -> Result<(), Error> {
        contract_info.validate_address()?;
        self.contracts.insert(contract_type, contract_info);
        Ok(())
    }

    pub fn get_contract(&self, contract_type: &ContractType) -> Option<&ContractInfo> {
        self.contracts.get(contract_type)
    }

    pub fn get_address(&self, contract_type: &ContractType) -> Option<Address> {
        self.contracts.get(contract_type).map(|info| info.address)
    }

    /// Check that every listed contract is configured
    pub fn validate_required_contracts(&self, required: &[ContractType]) -> Result<(), Error> {
        for contract_type in required {
            if !self.contracts.contains_key(contract_type) {
                return Err(Error::Config(format!(
                    "Required contract '{}' not found for network '{}'",
                    contract_type, self.network
                )));
            }
        }
        Ok(())
    }
}

/// Contract addresses across chains
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    networks: HashMap<u64, NetworkContracts>,
    active_chain: Option<u64>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from `contracts.{toml,json}` in the config search
    /// paths, then apply `LAUNCHPAD_CONTRACT_*` overrides for `chain_id`
    pub fn load(chain_id: u64) -> Result<Self, Error> {
        let config_dir = env::var("LAUNCHPAD_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
        let config_paths = [
            PathBuf::from(&config_dir).join("contracts"),
            PathBuf::from("config/contracts"),
            PathBuf::from("../config/contracts"),
        ];

        let mut registry = Self::new();
        for config_path in &config_paths {
            let Some(path) = config_path.to_str() else {
                continue;
            };
            if let Ok(settings) = ConfigLoader::builder()
                .add_source(File::with_name(path))
                .build()
            {
                debug!(path, "loading contract registry");
                registry.load_from_config(&settings)?;
                break;
            }
        }

        registry.apply_env_overrides(chain_id)?;
        registry.active_chain = Some(chain_id);
        Ok(registry)
    }

    /// Read `{network}.{contract}.address` entries for every known network
    pub fn load_from_config(&mut self, settings: &ConfigLoader) -> Result<(), Error> {
        for network in NETWORKS.iter() {
            let mut network_contracts =
                NetworkContracts::new(network.chain_id, network.url_name.to_string());

            for contract_type in ContractType::ALL {
                let address_key = format!("{}.{}.address", network.url_name, contract_type);
                let version_key = format!("{}.{}.version", network.url_name, contract_type);

                if let Ok(address) = settings.get::<String>(&address_key) {
                    let version = settings.get::<String>(&version_key).ok();
                    network_contracts
                        .add_contract(contract_type, ContractInfo::parse(&address, version)?)?;
                }
            }

            if !network_contracts.contracts.is_empty() {
                self.networks.insert(network.chain_id, network_contracts);
            }
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self, chain_id: u64) -> Result<(), Error> {
        for contract_type in ContractType::ALL {
            let key = format!("{}_{}", ENV_CONTRACT_PREFIX, contract_type.env_suffix());
            if let Ok(address) = env::var(&key) {
                self.update_contract(chain_id, contract_type, ContractInfo::parse(&address, None)?)?;
            }
        }
        Ok(())
    }

    pub fn set_active_chain(&mut self, chain_id: u64) {
        self.active_chain = Some(chain_id);
    }

    pub fn get_active_chain(&self) -> Option<u64> {
        self.active_chain
    }

    pub fn get_network(&self, chain_id: u64) -> Result<&NetworkContracts, Error> {
        self.networks
            .get(&chain_id)
            .ok_or_else(|| Error::Config(format!("No contracts configured for chain {}", chain_id)))
    }

    /// Address of a contract on the active chain
    pub fn get_contract_address(&self, contract_type: &ContractType) -> Result<Address, Error> {
        let chain_id = self
            .active_chain
            .ok_or_else(|| Error::Config("No active chain set".to_string()))?;
        self.get_network(chain_id)?
            .get_address(contract_type)
            .ok_or_else(|| {
                Error::Config(format!(
                    "Contract '{}' not configured for chain {}",
                    contract_type, chain_id
                ))
            })
    }

    /// Add or replace a contract for a chain
    pub fn update_contract(
        &mut self,
        chain_id: u64,
        contract_type: ContractType,
        contract_info: ContractInfo,
    ) -> Result<(), Error> {
        let network = self.networks.entry(chain_id).or_insert_with(|| {
            let name = network_by_chain_id(chain_id)
                .map(|n| n.url_name.to_string())
                .unwrap_or_else(|| chain_id.to_string());
            NetworkContracts::new(chain_id, name)
        });
        network.add_contract(contract_type, contract_info)
    }

    /// Whether the active chain has every listed contract
    pub fn is_network_ready(&self, required: &[ContractType]) -> bool {
        self.active_chain
            .and_then(|chain_id| self.networks.get(&chain_id))
            .map(|network| network.validate_required_contracts(required).is_ok())
            .unwrap_or(false)
    }

    pub fn chains(&self) -> Vec<u64> {
        let mut chains: Vec<u64> = self.networks.keys().copied().collect();
        chains.sort_unstable();
        chains
    }
}
