/// Record accessors backed by launchpad contracts
///
/// Each accessor turns a record id into the record a list row renders. They
/// hold no per-row state; one instance is shared by every row of a list.
use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::debug;

use crate::error::Error;
use crate::loader::RecordAccessor;
use crate::protocols::evm::client::EvmClient;
use crate::protocols::evm::token_metadata::TokenMetadataCache;
use crate::records::{
    LpLockRecord, NftLaunchRecord, TokenLockRecord, TradingTokenKey, TradingTokenRecord,
};

/// Token lock by id, with the locked token's metadata
#[derive(Debug, Clone)]
pub struct TokenLockAccessor {
    client: EvmClient,
    manager: Address,
    tokens: Arc<TokenMetadataCache>,
}

impl TokenLockAccessor {
    pub fn new(client: EvmClient, manager: Address, tokens: Arc<TokenMetadataCache>) -> Self {
        Self {
            client,
            manager,
            tokens,
        }
    }
}

#[async_trait]
impl RecordAccessor for TokenLockAccessor {
    type Id = u64;
    type Record = TokenLockRecord;

    fn name(&self) -> &'static str {
        "token_lock"
    }

    async fn fetch(&self, id: &u64) -> Result<TokenLockRecord, Error> {
        let lock = self
            .client
            .token_locker_manager(self.manager)
            .token_lock_data(*id)
            .await?;
        let token = self.tokens.get_token_info(lock.token, &self.client).await;
        Ok(TokenLockRecord { lock, token })
    }
}

/// LP lock by id, with the pair reserves and both pair tokens
#[derive(Debug, Clone)]
pub struct LpLockAccessor {
    client: EvmClient,
    manager: Address,
    tokens: Arc<TokenMetadataCache>,
}

impl LpLockAccessor {
    pub fn new(client: EvmClient, manager: Address, tokens: Arc<TokenMetadataCache>) -> Self {
        Self {
            client,
            manager,
            tokens,
        }
    }
}

#[async_trait]
impl RecordAccessor for LpLockAccessor {
    type Id = u64;
    type Record = LpLockRecord;

    fn name(&self) -> &'static str {
        "lp_lock"
    }

    async fn fetch(&self, id: &u64) -> Result<LpLockRecord, Error> {
        let lock = self
            .client
            .token_locker_manager(self.manager)
            .lp_lock_data(*id)
            .await?;
        let lp_token = self.tokens.get_token_info(lock.token, &self.client).await;

        // Locks on non-pair tokens revert getLpData; the row still renders.
        let pair = if lock.is_lp_token {
            match self.client.token_locker(lock.contract_address).lp_data().await {
                Ok(pair) => Some(pair),
                Err(e) => {
                    debug!(lock_id = id, error = %e, "no pair data for lp lock");
                    None
                }
            }
        } else {
            None
        };

        let (token0, token1) = match pair.as_ref().filter(|pair| pair.has_lp_data) {
            Some(pair) => tokio::join!(
                self.tokens.get_token_info(pair.token0, &self.client),
                self.tokens.get_token_info(pair.token1, &self.client),
            ),
            None => (None, None),
        };

        Ok(LpLockRecord {
            lock,
            lp_token,
            pair,
            token0,
            token1,
        })
    }
}

/// Trading token by manager index or token address
#[derive(Debug, Clone)]
pub struct TradingTokenAccessor {
    client: EvmClient,
    manager: Address,
}

impl TradingTokenAccessor {
    pub fn new(client: EvmClient, manager: Address) -> Self {
        Self { client, manager }
    }
}

#[async_trait]
impl RecordAccessor for TradingTokenAccessor {
    type Id = TradingTokenKey;
    type Record = TradingTokenRecord;

    fn name(&self) -> &'static str {
        "trading_token"
    }

    async fn fetch(&self, id: &TradingTokenKey) -> Result<TradingTokenRecord, Error> {
        let manager = self.client.trading_token_manager(self.manager);
        match id {
            TradingTokenKey::Id(index) => manager.token_data_by_id(*index).await,
            TradingTokenKey::Address(address) => manager.token_data_by_address(*address).await,
        }
    }
}

/// NFT launch by collection address
#[derive(Debug, Clone)]
pub struct NftLaunchAccessor {
    client: EvmClient,
}

impl NftLaunchAccessor {
    pub fn new(client: EvmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordAccessor for NftLaunchAccessor {
    type Id = Address;
    type Record = NftLaunchRecord;

    fn name(&self) -> &'static str {
        "nft_launch"
    }

    async fn fetch(&self, id: &Address) -> Result<NftLaunchRecord, Error> {
        self.client.nft_collection(*id).launch().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[tokio::test]
    async fn test_accessor_names() {
        let client = EvmClient::new("http://127.0.0.1:9", 8453).await.unwrap();
        let tokens = Arc::new(TokenMetadataCache::new());
        let manager = address!("1111111111111111111111111111111111111111");

        assert_eq!(
            TokenLockAccessor::new(client.clone(), manager, tokens.clone()).name(),
            "token_lock"
        );
        assert_eq!(
            LpLockAccessor::new(client.clone(), manager, tokens).name(),
            "lp_lock"
        );
        assert_eq!(
            TradingTokenAccessor::new(client.clone(), manager).name(),
            "trading_token"
        );
        assert_eq!(NftLaunchAccessor::new(client).name(), "nft_launch");
    }

    #[tokio::test]
    async fn test_unreachable_rpc_is_transient() {
        let client = EvmClient::new("http://127.0.0.1:9", 8453).await.unwrap();
        let accessor = NftLaunchAccessor::new(client);
        let err = accessor
            .fetch(&address!("2222222222222222222222222222222222222222"))
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }
}
