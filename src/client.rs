/// Launchpad SDK client
///
/// Main entry point for browsing launchpad records. Resolves the effective
/// network, connects an EVM client and hands out the record accessors and id
/// lists that [`RecordList`](crate::list::RecordList) rows are built from.
use crate::config::{ConfigurationManager, ContractInfo, ContractType, EnvironmentConfig};
use crate::contract_cache::{CodeReader, ContractCodeCache};
use crate::error::Error;
use crate::list::LockListQuery;
use crate::loader::{LoaderConfig, RenderContext};
use crate::network::NetworkData;
use crate::protocols::evm::{
    EvmClient, LpLockAccessor, NftLaunchAccessor, TokenLockAccessor, TokenMetadataCache,
    TradingTokenAccessor,
};
use crate::records::TradingTokenKey;
use alloy_primitives::Address;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Launchpad SDK client bound to one chain
pub struct LaunchpadClient {
    evm: EvmClient,

    config_manager: ConfigurationManager,

    /// Table entry for the chain, absent for chains the table does not know
    network: Option<&'static NetworkData>,

    rpc_timeout: Duration,

    /// Bytecode presence per (chain, address), shared with other clients
    code_cache: Arc<ContractCodeCache>,

    /// ERC-20 metadata shared by every accessor this client creates
    token_cache: Arc<TokenMetadataCache>,
}

impl LaunchpadClient {
    /// Connect using a resolved configuration manager
    pub async fn new_with_config(
        config_manager: ConfigurationManager,
        code_cache: Arc<ContractCodeCache>,
    ) -> Result<Self, Error> {
        let chain_id = config_manager.active_chain();
        let rpc_url = config_manager.rpc_url()?;
        let evm = EvmClient::new(&rpc_url, chain_id).await?;
        let network = config_manager.network();
        let rpc_timeout = Duration::from_secs(config_manager.env_config.get_rpc_timeout_secs());

        info!(
            chain_id,
            network = network.map(|n| n.name).unwrap_or("unknown"),
            rpc_url = %rpc_url,
            "launchpad client connected"
        );

        Ok(Self {
            evm,
            config_manager,
            network,
            rpc_timeout,
            code_cache,
            token_cache: Arc::new(TokenMetadataCache::new()),
        })
    }

    pub fn evm(&self) -> &EvmClient {
        &self.evm
    }

    pub fn chain_id(&self) -> u64 {
        self.evm.chain_id()
    }

    pub fn network(&self) -> Option<&'static NetworkData> {
        self.network
    }

    pub fn config_manager(&self) -> &ConfigurationManager {
        &self.config_manager
    }

    pub fn code_cache(&self) -> &Arc<ContractCodeCache> {
        &self.code_cache
    }

    pub fn loader_config(&self) -> LoaderConfig {
        self.config_manager.loader_config()
    }

    /// Render context for the current wall-clock second
    pub fn render_context(&self) -> RenderContext {
        RenderContext::current(self.network)
    }

    /// Address of a launchpad contract on the active chain
    pub fn contract_address(&self, contract_type: ContractType) -> Result<Address, Error> {
        self.config_manager
            .contract_registry
            .get_contract_address(&contract_type)
    }

    fn optional_contract(&self, contract_type: ContractType) -> Option<Address> {
        match self.contract_address(contract_type) {
            Ok(address) => Some(address),
            Err(e) => {
                warn!(%contract_type, chain_id = self.chain_id(), "{}", e);
                None
            }
        }
    }

    // ============ Accessors ============
    //
    // `None` when the backing contract is not configured for the chain; rows
    // built without an accessor stay empty.

    pub fn token_lock_accessor(&self) -> Option<Arc<TokenLockAccessor>> {
        self.optional_contract(ContractType::TokenLockerManager)
            .map(|manager| {
                Arc::new(TokenLockAccessor::new(
                    self.evm.clone(),
                    manager,
                    self.token_cache.clone(),
                ))
            })
    }

    pub fn lp_lock_accessor(&self) -> Option<Arc<LpLockAccessor>> {
        self.optional_contract(ContractType::TokenLockerManager)
            .map(|manager| {
                Arc::new(LpLockAccessor::new(
                    self.evm.clone(),
                    manager,
                    self.token_cache.clone(),
                ))
            })
    }

    pub fn trading_token_accessor(&self) -> Option<Arc<TradingTokenAccessor>> {
        self.optional_contract(ContractType::TradingTokenManager)
            .map(|manager| Arc::new(TradingTokenAccessor::new(self.evm.clone(), manager)))
    }

    pub fn nft_launch_accessor(&self) -> Arc<NftLaunchAccessor> {
        Arc::new(NftLaunchAccessor::new(self.evm.clone()))
    }

    // ============ Id enumeration ============

    pub async fn token_lock_count(&self) -> Result<u64, Error> {
        let manager = self.contract_address(ContractType::TokenLockerManager)?;
        self.bounded(self.evm.token_locker_manager(manager).token_locker_count())
            .await
    }

    pub async fn lp_lock_count(&self) -> Result<u64, Error> {
        let manager = self.contract_address(ContractType::TokenLockerManager)?;
        self.bounded(self.evm.token_locker_manager(manager).lp_locker_count())
            .await
    }

    /// Token lock ids a locker list shows for `query`
    pub async fn token_lock_ids(&self, query: &LockListQuery) -> Result<Vec<u64>, Error> {
        if let Some(ids) = query.static_ids() {
            return Ok(ids);
        }
        let Some(owner) = query.owner() else {
            return Ok(Vec::new());
        };
        let manager = self.contract_address(ContractType::TokenLockerManager)?;
        self.bounded(
            self.evm
                .token_locker_manager(manager)
                .token_lockers_for_address(owner),
        )
        .await
    }

    /// LP lock ids a locker list shows for `query`
    pub async fn lp_lock_ids(&self, query: &LockListQuery) -> Result<Vec<u64>, Error> {
        if let Some(ids) = query.static_ids() {
            return Ok(ids);
        }
        let Some(owner) = query.owner() else {
            return Ok(Vec::new());
        };
        let manager = self.contract_address(ContractType::TokenLockerManager)?;
        self.bounded(
            self.evm
                .token_locker_manager(manager)
                .lp_lockers_for_address(owner),
        )
        .await
    }

    /// Every trading token, in creation order
    pub async fn trading_token_ids(&self) -> Result<Vec<TradingTokenKey>, Error> {
        let manager = self.contract_address(ContractType::TradingTokenManager)?;
        let count = self
            .bounded(self.evm.trading_token_manager(manager).count())
            .await?;
        Ok((0..count).map(TradingTokenKey::Id).collect())
    }

    /// Every NFT collection deployed through the factory
    pub async fn nft_launch_addresses(&self) -> Result<Vec<Address>, Error> {
        let factory = self.contract_address(ContractType::NftFactory)?;
        self.bounded(self.evm.nft_factory(factory).collections())
            .await
    }

    /// Whether `address` holds bytecode on the active chain
    pub async fn is_contract(&self, address: Address, definitely_contract: bool) -> bool {
        self.code_cache
            .is_contract(
                Some(self.chain_id()),
                address,
                Some(&self.evm as &dyn CodeReader),
                definitely_contract,
            )
            .await
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
        tokio::time::timeout(self.rpc_timeout, call)
            .await
            .map_err(|_| Error::Timeout(self.rpc_timeout))?
    }

    /// Summary of the client configuration
    pub fn get_summary(&self) -> serde_json::Value {
        let registry = &self.config_manager.contract_registry;
        let loader = self.loader_config();
        let contracts: serde_json::Map<String, serde_json::Value> = ContractType::ALL
            .iter()
            .map(|contract_type| {
                let address = registry
                    .get_contract_address(contract_type)
                    .map(|a| serde_json::Value::String(a.to_checksum(None)))
                    .unwrap_or(serde_json::Value::Null);
                (contract_type.to_string(), address)
            })
            .collect();

        serde_json::json!({
            "network": {
                "chain_id": self.chain_id(),
                "name": self.network.map(|n| n.name),
                "testnet": self.network.map(|n| n.is_testnet),
            },
            "contracts": contracts,
            "loader": {
                "visibility_recheck_ms": loader.visibility_recheck.as_millis() as u64,
                "debounce_ms": loader.debounce.as_millis() as u64,
                "failure_policy": loader.failure_policy.to_string(),
                "keep_while_refreshing": loader.keep_while_refreshing,
            },
        })
    }
}

/// Builder for [`LaunchpadClient`]
#[derive(Default)]
pub struct LaunchpadClientBuilder {
    config_manager: Option<ConfigurationManager>,
    chain_id: Option<u64>,
    rpc_url: Option<String>,
    contracts: Vec<(ContractType, Address)>,
    code_cache: Option<Arc<ContractCodeCache>>,
}

impl LaunchpadClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_manager(mut self, config_manager: ConfigurationManager) -> Self {
        self.config_manager = Some(config_manager);
        self
    }

    /// Live chain selection; takes precedence over the configured chain
    pub fn with_chain_id(mut self, chain_id: Option<u64>) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = Some(rpc_url.into());
        self
    }

    /// Override a contract address for the selected chain
    pub fn with_contract(mut self, contract_type: ContractType, address: Address) -> Self {
        self.contracts.push((contract_type, address));
        self
    }

    /// Share an is-contract cache across clients
    pub fn with_code_cache(mut self, code_cache: Arc<ContractCodeCache>) -> Self {
        self.code_cache = Some(code_cache);
        self
    }

    /// Build with the given configuration manager, or built-in defaults
    pub async fn build(self) -> Result<LaunchpadClient, Error> {
        let config_manager = match self.config_manager {
            Some(config_manager) => config_manager,
            None => {
                ConfigurationManager::from_env_config(EnvironmentConfig::generate_default_config())?
            }
        };
        Self::finish(
            config_manager,
            self.chain_id,
            self.rpc_url,
            self.contracts,
            self.code_cache,
        )
        .await
    }

    /// Build with configuration discovered from files and environment
    pub async fn build_auto(self) -> Result<LaunchpadClient, Error> {
        if self.config_manager.is_some() {
            return self.build().await;
        }
        let config_manager = ConfigurationManager::new()?;
        self.with_config_manager(config_manager).build().await
    }

    async fn finish(
        mut config_manager: ConfigurationManager,
        chain_id: Option<u64>,
        rpc_url: Option<String>,
        contracts: Vec<(ContractType, Address)>,
        code_cache: Option<Arc<ContractCodeCache>>,
    ) -> Result<LaunchpadClient, Error> {
        let chain_id = config_manager.select_chain(chain_id);
        if let Some(rpc_url) = rpc_url {
            config_manager.set_rpc_url(rpc_url);
        }
        for (contract_type, address) in contracts {
            config_manager.contract_registry.update_contract(
                chain_id,
                contract_type,
                ContractInfo::new(address),
            )?;
        }
        config_manager.validate()?;

        LaunchpadClient::new_with_config(config_manager, code_cache.unwrap_or_default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContractRegistry;
    use alloy_primitives::address;

    const LOCKER: Address = address!("1111111111111111111111111111111111111111");

    const OFFLINE_RPC: &str = "http://127.0.0.1:9";

    fn offline_manager() -> ConfigurationManager {
        let mut env_config = EnvironmentConfig::generate_default_config();
        env_config.network.rpc_url = Some(OFFLINE_RPC.to_string());
        let mut manager = ConfigurationManager::from_parts(env_config, ContractRegistry::new());
        manager.select_chain(None);
        manager
    }

    async fn offline_client() -> LaunchpadClient {
        LaunchpadClientBuilder::new()
            .with_config_manager(offline_manager())
            .with_chain_id(Some(1))
            .with_rpc_url(OFFLINE_RPC)
            .with_contract(ContractType::TokenLockerManager, LOCKER)
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_builder_applies_chain_and_contract_overrides() {
        let client = offline_client().await;
        assert_eq!(client.chain_id(), 1);
        assert_eq!(client.network().map(|n| n.url_name), Some("eth"));
        assert_eq!(
            client
                .contract_address(ContractType::TokenLockerManager)
                .unwrap(),
            LOCKER
        );
        assert!(client
            .contract_address(ContractType::NftFactory)
            .is_err());
    }

    #[tokio::test]
    async fn test_accessors_absent_without_contract() {
        let client = offline_client().await;
        assert!(client.token_lock_accessor().is_some());
        assert!(client.lp_lock_accessor().is_some());
        assert!(client.trading_token_accessor().is_none());
    }

    #[tokio::test]
    async fn test_static_queries_skip_rpc() {
        let client = offline_client().await;
        assert_eq!(
            client
                .token_lock_ids(&LockListQuery::All { count: 3 })
                .await
                .unwrap(),
            vec![0, 1, 2]
        );
        assert!(client
            .lp_lock_ids(&LockListQuery::Filter("not an address".to_string()))
            .await
            .unwrap()
            .is_empty());
        assert!(client.trading_token_ids().await.is_err());
    }

    #[tokio::test]
    async fn test_known_contract_skips_code_lookup() {
        let client = offline_client().await;
        assert!(client.is_contract(LOCKER, true).await);
        // Unreachable RPC: the lookup fails, reports false and is not cached.
        assert!(!client.is_contract(LOCKER, false).await);
        assert!(client.code_cache().is_empty());
    }

    #[tokio::test]
    async fn test_summary_lists_contracts() {
        let client = offline_client().await;
        let summary = client.get_summary();
        assert_eq!(summary["network"]["chain_id"], 1);
        assert!(summary["contracts"]["nft_factory"].is_null());
        assert_eq!(summary["loader"]["failure_policy"], "preserve");
    }
}
