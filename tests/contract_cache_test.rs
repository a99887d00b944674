//! Contract detection cache against a scripted code reader

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use alloy_primitives::{address, Address, Bytes};
use async_trait::async_trait;

use launchpad_sdk::contract_cache::CodeKey;
use launchpad_sdk::{CodeReader, ContractCodeCache, Error};

const TOKEN: Address = address!("4200000000000000000000000000000000000006");
const WALLET: Address = address!("2222222222222222222222222222222222222222");

#[derive(Default)]
struct ScriptedCode {
    code: HashMap<Address, Bytes>,
    failing: AtomicBool,
    reads: AtomicUsize,
}

impl ScriptedCode {
    fn with_contract(mut self, address: Address) -> Self {
        self.code
            .insert(address, Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]));
        self
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeReader for ScriptedCode {
    async fn code_at(&self, address: Address) -> Result<Bytes, Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Rpc("connection refused".to_string()));
        }
        Ok(self.code.get(&address).cloned().unwrap_or_default())
    }
}

#[tokio::test]
async fn test_entries_are_keyed_by_chain() {
    let cache = ContractCodeCache::new();
    let reader = ScriptedCode::default().with_contract(TOKEN);

    assert!(cache.is_contract(Some(8453), TOKEN, Some(&reader), false).await);
    assert!(cache.is_contract(Some(1), TOKEN, Some(&reader), false).await);
    assert!(cache.is_contract(Some(8453), TOKEN, Some(&reader), false).await);

    assert_eq!(reader.reads(), 2);
    assert_eq!(cache.len(), 2);
    assert_eq!(
        cache.get(&CodeKey {
            chain_id: 1,
            address: TOKEN
        }),
        Some(true)
    );
}

#[tokio::test]
async fn test_plain_accounts_are_cached_as_non_contracts() {
    let cache = ContractCodeCache::new();
    let reader = ScriptedCode::default();

    assert!(!cache.is_contract(Some(8453), WALLET, Some(&reader), false).await);
    assert!(!cache.is_contract(Some(8453), WALLET, Some(&reader), false).await);
    assert_eq!(reader.reads(), 1);
    assert_eq!(
        cache.get(&CodeKey {
            chain_id: 8453,
            address: WALLET
        }),
        Some(false)
    );
}

#[tokio::test]
async fn test_failed_reads_are_retried() {
    let cache = ContractCodeCache::new();
    let reader = ScriptedCode::default().with_contract(TOKEN);
    reader.failing.store(true, Ordering::SeqCst);

    assert!(!cache.is_contract(Some(8453), TOKEN, Some(&reader), false).await);
    assert!(cache.is_empty());

    reader.failing.store(false, Ordering::SeqCst);
    assert!(cache.is_contract(Some(8453), TOKEN, Some(&reader), false).await);
    assert_eq!(reader.reads(), 2);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_known_contracts_skip_the_reader() {
    let cache = ContractCodeCache::new();
    let reader = ScriptedCode::default();

    assert!(cache.is_contract(Some(8453), WALLET, Some(&reader), true).await);
    assert_eq!(reader.reads(), 0);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_missing_chain_or_reader() {
    let cache = ContractCodeCache::new();
    let reader = ScriptedCode::default().with_contract(TOKEN);

    assert!(!cache.is_contract(None, TOKEN, Some(&reader), false).await);
    assert!(!cache.is_contract(Some(8453), TOKEN, None, false).await);
    assert_eq!(reader.reads(), 0);

    cache.insert(
        CodeKey {
            chain_id: 8453,
            address: TOKEN,
        },
        true,
    );
    cache.clear();
    assert!(cache.is_empty());
}
