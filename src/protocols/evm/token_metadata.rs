/// Token metadata caching for launchpad records
///
/// ERC-20 name, symbol and decimals are immutable on-chain, so entries are kept
/// for the lifetime of the cache without TTL.
use crate::protocols::evm::client::EvmClient;
use crate::records::format::DEFAULT_DECIMALS;
use crate::records::TokenInfo;
use alloy_primitives::Address;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// Cache for token metadata keyed by chain and token address
#[derive(Debug, Default)]
pub struct TokenMetadataCache {
    tokens: RwLock<HashMap<(u64, Address), TokenInfo>>,
}

impl TokenMetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token metadata with caching.
    ///
    /// Returns `None` when the contract does not answer the ERC-20 metadata
    /// calls; failures are not cached so a later read can succeed.
    pub async fn get_token_info(&self, address: Address, client: &EvmClient) -> Option<TokenInfo> {
        let key = (client.chain_id(), address);
        if let Some(info) = self.get(&key) {
            debug!("Token metadata cache hit for {}: {}", address, info.symbol);
            return Some(info);
        }

        debug!(
            "Token metadata cache miss for {}, querying contract",
            address
        );
        match client.erc20(address).token_info().await {
            Ok(info) => {
                self.insert(key, info.clone());
                Some(info)
            }
            Err(e) => {
                warn!("Failed to query token metadata for {} ({})", address, e);
                None
            }
        }
    }

    /// Token decimals, falling back to 18 when the metadata is unavailable
    pub async fn get_decimals(&self, address: Address, client: &EvmClient) -> u8 {
        self.get_token_info(address, client)
            .await
            .map(|info| info.decimals)
            .unwrap_or(DEFAULT_DECIMALS)
    }

    pub fn get(&self, key: &(u64, Address)) -> Option<TokenInfo> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: (u64, Address), info: TokenInfo) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, info);
    }

    pub fn clear(&self) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn cache_size(&self) -> usize {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
