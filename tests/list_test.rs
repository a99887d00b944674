//! Record list rows driven by a scrolling viewport

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{address, U256};
use async_trait::async_trait;

use launchpad_sdk::loader::{LoaderConfig, RecordAccessor, RenderContext, ViewModel, Viewport};
use launchpad_sdk::network::network_by_chain_id;
use launchpad_sdk::records::{TokenInfo, TokenLockData, TokenLockRecord};
use launchpad_sdk::{Error, RecordList};

const NOW: u64 = 1_700_000_000;
const ROW_HEIGHT: f64 = 100.0;

#[derive(Default)]
struct CountingLocks {
    calls: AtomicUsize,
}

#[async_trait]
impl RecordAccessor for CountingLocks {
    type Id = u64;
    type Record = TokenLockRecord;

    fn name(&self) -> &'static str {
        "counting_locks"
    }

    async fn fetch(&self, id: &u64) -> Result<TokenLockRecord, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        let token = address!("3333333333333333333333333333333333333333");
        Ok(TokenLockRecord {
            lock: TokenLockData {
                id: *id,
                contract_address: address!("1111111111111111111111111111111111111111"),
                lock_owner: address!("2222222222222222222222222222222222222222"),
                token,
                created_by: address!("2222222222222222222222222222222222222222"),
                created_at: NOW - 60,
                block_time: NOW,
                unlock_time: NOW + 3_600,
                balance: U256::from(10u64).pow(U256::from(18u64)),
                total_supply: U256::from(100u64) * U256::from(10u64).pow(U256::from(18u64)),
                is_lp_token: false,
            },
            token: Some(TokenInfo {
                address: token,
                name: format!("Token {}", id),
                symbol: "TKN".to_string(),
                decimals: 18,
            }),
        })
    }
}

impl CountingLocks {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn ctx() -> RenderContext {
    RenderContext::new(NOW, network_by_chain_id(8453))
}

fn populated_ids(list: &RecordList<CountingLocks>) -> Vec<u64> {
    list.views(&ctx())
        .into_iter()
        .filter(|(_, view)| view.populated().is_some())
        .map(|(id, _)| id)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_only_rows_in_viewport_fetch() {
    let accessor = Arc::new(CountingLocks::default());
    let mut list = RecordList::new(Some(accessor.clone()), LoaderConfig::default(), ROW_HEIGHT);
    list.sync(0..10);
    assert_eq!(list.len(), 10);
    assert_eq!(accessor.calls(), 0);

    let visible = list.scroll(Viewport::new(0.0, 3.0 * ROW_HEIGHT));
    assert_eq!(visible, 3);
    assert!(list.settle(Duration::from_secs(5)).await);

    assert_eq!(accessor.calls(), 3);
    assert_eq!(populated_ids(&list), vec![0, 1, 2]);

    let views = list.views(&ctx());
    assert_eq!(views.len(), 10);
    assert_eq!(views[3].1, ViewModel::Placeholder);
}

#[tokio::test(start_paused = true)]
async fn test_sync_keeps_surviving_rows() {
    let accessor = Arc::new(CountingLocks::default());
    let mut list = RecordList::new(Some(accessor.clone()), LoaderConfig::default(), ROW_HEIGHT);
    list.sync(0..5);
    list.scroll(Viewport::new(0.0, 3.0 * ROW_HEIGHT));
    assert!(list.settle(Duration::from_secs(5)).await);
    assert_eq!(accessor.calls(), 3);

    // Rows 2 and 1 move up and keep their records; 11 is new and fetches.
    list.sync([2, 1, 11]);
    assert_eq!(list.ids(), vec![2, 1, 11]);
    assert!(list.row(&0).is_none());
    assert!(list.row(&2).is_some_and(|row| row.state().is_ready()));

    assert!(list.settle(Duration::from_secs(5)).await);
    assert_eq!(accessor.calls(), 4);
    assert_eq!(populated_ids(&list), vec![2, 1, 11]);
}

#[tokio::test(start_paused = true)]
async fn test_scrolling_away_drops_records() {
    let accessor = Arc::new(CountingLocks::default());
    let mut list = RecordList::new(Some(accessor.clone()), LoaderConfig::default(), ROW_HEIGHT);
    list.sync(0..4);
    list.scroll(Viewport::new(0.0, 2.0 * ROW_HEIGHT));
    assert!(list.settle(Duration::from_secs(5)).await);
    assert_eq!(populated_ids(&list), vec![0, 1]);

    let visible = list.scroll(Viewport::new(2.0 * ROW_HEIGHT, 2.0 * ROW_HEIGHT));
    assert_eq!(visible, 2);
    assert!(list.settle(Duration::from_secs(5)).await);
    assert_eq!(populated_ids(&list), vec![2, 3]);
    assert_eq!(accessor.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_list_without_accessor_stays_empty() {
    let mut list: RecordList<CountingLocks> =
        RecordList::new(None, LoaderConfig::default(), ROW_HEIGHT);
    list.sync(0..3);
    list.scroll(Viewport::new(0.0, 3.0 * ROW_HEIGHT));
    assert!(list.settle(Duration::from_secs(1)).await);
    assert!(populated_ids(&list).is_empty());

    let accessor = Arc::new(CountingLocks::default());
    list.set_accessor(Some(accessor.clone()));
    assert!(list.settle(Duration::from_secs(5)).await);
    assert_eq!(accessor.calls(), 3);
    assert_eq!(populated_ids(&list), vec![0, 1, 2]);
}
