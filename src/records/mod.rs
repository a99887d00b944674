//! Record types displayed by the launchpad lists

pub mod format;
pub mod lock;
pub mod lp_lock;
pub mod nft_launch;
pub mod trading_token;

pub use lock::{LockStatus, TokenLockData, TokenLockRecord, TokenLockView};
pub use lp_lock::{LpLockRecord, LpLockView, LpPairData};
pub use nft_launch::{NftLaunchRecord, NftLaunchView, SalePhase, SaleSetting};
pub use trading_token::{TradingTokenData, TradingTokenKey, TradingTokenRecord, TradingTokenView};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// ERC20 metadata resolved for a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenInfo {
    /// Up to four symbol characters for the round token badge
    pub fn icon_text(&self) -> String {
        self.symbol.chars().take(4).collect()
    }
}

pub(crate) fn icon_or_unknown(token: Option<&TokenInfo>) -> String {
    token.map(TokenInfo::icon_text).unwrap_or_else(|| "?".to_string())
}

pub(crate) fn name_or_ellipsis(token: Option<&TokenInfo>) -> String {
    token
        .map(|t| t.name.clone())
        .unwrap_or_else(|| "...".to_string())
}

pub(crate) fn symbol_or(token: Option<&TokenInfo>, fallback: &str) -> String {
    token
        .map(|t| t.symbol.clone())
        .unwrap_or_else(|| fallback.to_string())
}
