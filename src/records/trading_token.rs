//! Trading tokens created through the token manager

use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::format::{format_amount, format_timestamp, short_address};
use crate::loader::{RenderContext, RenderRecord};
use crate::network::{detail_path, DetailSection};

/// A trading token is addressed by its manager index or by its contract address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradingTokenKey {
    Id(u64),
    Address(Address),
}

impl fmt::Display for TradingTokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingTokenKey::Id(id) => write!(f, "{}", id),
            TradingTokenKey::Address(address) => write!(f, "{}", address),
        }
    }
}

/// Token state as returned by the token manager (raw base units)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingTokenData {
    pub id: u64,
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
    pub total_balance: U256,
    /// Zero until trading has been enabled
    pub launched_at: u64,
    pub dex_pair: Address,
    pub owner: Address,
}

impl TradingTokenData {
    pub fn is_launched(&self) -> bool {
        self.launched_at > 0
    }

    fn whole_units(&self, value: U256) -> U256 {
        value / U256::from(10u64).pow(U256::from(self.decimals))
    }
}

pub type TradingTokenRecord = TradingTokenData;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradingTokenView {
    pub id: u64,
    pub title: String,
    pub owner: String,
    pub address: String,
    pub launched: bool,
    pub launched_at: Option<String>,
    pub total_supply: String,
    pub total_balance: String,
    pub dex_pair: Option<String>,
    pub detail_path: String,
}

impl RenderRecord for TradingTokenData {
    type View = TradingTokenView;

    fn render(&self, ctx: &RenderContext) -> TradingTokenView {
        let symbol = if self.symbol.is_empty() { "..." } else { &self.symbol };
        let name = if self.name.is_empty() { "..." } else { &self.name };
        let launched = self.is_launched();

        TradingTokenView {
            id: self.id,
            title: format!("{} ({})", name, symbol),
            owner: short_address(&self.owner),
            address: short_address(&self.address),
            launched,
            launched_at: launched.then(|| format_timestamp(self.launched_at)),
            total_supply: format!(
                "{} {}",
                format_amount(self.whole_units(self.total_supply), Some(0)),
                symbol
            ),
            total_balance: format!(
                "{} {}",
                format_amount(self.whole_units(self.total_balance), Some(0)),
                symbol
            ),
            dex_pair: (launched && self.dex_pair != Address::ZERO)
                .then(|| short_address(&self.dex_pair)),
            detail_path: detail_path(
                DetailSection::Tokens,
                ctx.network,
                ctx.chain_id(),
                &self.address.to_string(),
            ),
        }
    }
}

impl fmt::Display for TradingTokenView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} supply {}",
            self.id,
            self.title,
            if self.launched { "launched" } else { "not launched" },
            self.total_supply
        )?;
        if let Some(pair) = &self.dex_pair {
            write!(f, " pair {}", pair)?;
        }
        write!(f, " owner {} {}", self.owner, self.detail_path)
    }
}
