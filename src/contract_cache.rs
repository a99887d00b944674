//! Memoised "is this address a contract" lookups

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::Error;

/// Reads deployed bytecode at an address
#[async_trait]
pub trait CodeReader: Send + Sync {
    async fn code_at(&self, address: Address) -> Result<Bytes, Error>;
}

/// Cache key: the same address may be a contract on one chain and not another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeKey {
    pub chain_id: u64,
    pub address: Address,
}

/// Per-(chain, address) cache of bytecode presence.
///
/// Share one instance between the components that need it; there is no
/// process-wide instance.
#[derive(Debug, Default)]
pub struct ContractCodeCache {
    entries: RwLock<HashMap<CodeKey, bool>>,
}

impl ContractCodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `address` holds bytecode on `chain_id`.
    ///
    /// Returns `true` without any lookup when the caller already knows the
    /// address is a contract, and `false` when there is no chain or reader.
    /// Reader failures yield `false` and are not cached.
    pub async fn is_contract(
        &self,
        chain_id: Option<u64>,
        address: Address,
        reader: Option<&dyn CodeReader>,
        definitely_contract: bool,
    ) -> bool {
        if definitely_contract {
            return true;
        }
        let (Some(chain_id), Some(reader)) = (chain_id, reader) else {
            return false;
        };

        let key = CodeKey { chain_id, address };
        if let Some(cached) = self.get(&key) {
            debug!(chain_id, %address, cached, "contract code cache hit");
            return cached;
        }

        match reader.code_at(address).await {
            Ok(code) => {
                let is_contract = !code.is_empty();
                self.insert(key, is_contract);
                is_contract
            }
            Err(e) => {
                warn!(chain_id, %address, "failed to read contract code: {}", e);
                false
            }
        }
    }

    pub fn get(&self, key: &CodeKey) -> Option<bool> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    pub fn insert(&self, key: CodeKey, is_contract: bool) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, is_contract);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticCode {
        code: Bytes,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl CodeReader for StaticCode {
        async fn code_at(&self, _address: Address) -> Result<Bytes, Error> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.code.clone())
        }
    }

    #[tokio::test]
    async fn test_cache_hit_skips_reader() {
        let cache = ContractCodeCache::new();
        let reader = StaticCode {
            code: Bytes::from_static(&[0x60, 0x80]),
            reads: AtomicUsize::new(0),
        };
        let token = address!("4200000000000000000000000000000000000006");

        assert!(cache.is_contract(Some(8453), token, Some(&reader), false).await);
        assert!(cache.is_contract(Some(8453), token, Some(&reader), false).await);
        assert_eq!(reader.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_circuits() {
        let cache = ContractCodeCache::new();
        let wallet = Address::ZERO;
        assert!(cache.is_contract(None, wallet, None, true).await);
        assert!(!cache.is_contract(None, wallet, None, false).await);
        assert!(cache.is_empty());
    }
}
