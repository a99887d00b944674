//! Liquidity pool token locks

use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::format::{format_amount, short_address};
use super::lock::{LockStatus, TokenLockData};
use super::{symbol_or, TokenInfo};
use crate::loader::{humanize_short, RenderContext, RenderRecord};
use crate::network::{detail_path, DetailSection};

/// Pair composition reported by an LP lock contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpPairData {
    pub has_lp_data: bool,
    pub id: u64,
    pub token0: Address,
    pub token1: Address,
    pub balance0: U256,
    pub balance1: U256,
    pub price0: U256,
    pub price1: U256,
}

/// Portion of a pair reserve backed by the locked LP tokens.
///
/// `reserve * 10^d / (total_supply * 10^d / locked)`, zero when any divisor is
/// zero. When `10^d` does not fit in 256 bits the unscaled ratio
/// `reserve * locked / total_supply` is used.
pub fn underlying_amount(reserve: U256, decimals: u8, total_supply: U256, locked: U256) -> U256 {
    let Some(scale) = U256::from(10u64).checked_pow(U256::from(decimals)) else {
        if locked.is_zero() {
            return U256::ZERO;
        }
        return reserve
            .saturating_mul(locked)
            .checked_div(total_supply)
            .unwrap_or_default();
    };
    total_supply
        .saturating_mul(scale)
        .checked_div(locked)
        .and_then(|per_unit| reserve.saturating_mul(scale).checked_div(per_unit))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpLockRecord {
    pub lock: TokenLockData,
    /// Metadata of the LP token itself
    pub lp_token: Option<TokenInfo>,
    pub pair: Option<LpPairData>,
    pub token0: Option<TokenInfo>,
    pub token1: Option<TokenInfo>,
}

impl LpLockRecord {
    fn pair_side(&self, reserve: impl Fn(&LpPairData) -> U256, token: Option<&TokenInfo>) -> Option<String> {
        let pair = self.pair.as_ref().filter(|pair| pair.has_lp_data)?;
        let token = token?;
        let amount = underlying_amount(
            reserve(pair),
            token.decimals,
            self.lock.total_supply,
            self.lock.balance,
        );
        Some(format!("{} {}", format_amount(amount, Some(token.decimals)), token.symbol))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LpLockView {
    pub id: u64,
    pub title: String,
    pub icons: (String, String),
    pub created_by: String,
    pub owned_by: Option<String>,
    pub status: LockStatus,
    pub countdown: Option<String>,
    pub progress: f64,
    pub locked_label: String,
    pub amount: String,
    pub share: String,
    /// Underlying amounts of each pair token, when the pair could be read
    pub underlying: Option<(String, String)>,
    pub lock_address: String,
    pub detail_path: String,
}

impl RenderRecord for LpLockRecord {
    type View = LpLockView;

    fn render(&self, ctx: &RenderContext) -> LpLockView {
        let lock = &self.lock;
        let status = lock.status_at(ctx.now);
        let token0 = self.token0.as_ref();
        let token1 = self.token1.as_ref();

        let underlying = self
            .pair_side(|p| p.balance0, token0)
            .zip(self.pair_side(|p| p.balance1, token1));

        LpLockView {
            id: lock.id,
            title: format!("{}/{}", symbol_or(token0, "..."), symbol_or(token1, "...")),
            icons: (
                super::icon_or_unknown(token0),
                super::icon_or_unknown(token1),
            ),
            created_by: short_address(&lock.created_by),
            owned_by: (lock.lock_owner != lock.created_by).then(|| short_address(&lock.lock_owner)),
            status,
            countdown: (status == LockStatus::Locked)
                .then(|| humanize_short(lock.remaining_secs(ctx.now))),
            progress: lock.progress_percent(ctx.now),
            locked_label: format!("{} locked", symbol_or(self.lp_token.as_ref(), "Tokens")),
            amount: format_amount(lock.balance, self.lp_token.as_ref().map(|t| t.decimals)),
            share: lock.supply_share(),
            underlying,
            lock_address: short_address(&lock.contract_address),
            detail_path: detail_path(
                DetailSection::LpLocker,
                ctx.network,
                ctx.chain_id(),
                &lock.id.to_string(),
            ),
        }
    }
}

impl fmt::Display for LpLockView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} {}", self.id, self.title, self.status)?;
        if let Some(countdown) = &self.countdown {
            write!(f, " {}", countdown)?;
        }
        write!(f, " {} ({}%)", self.amount, self.share)?;
        if let Some((side0, side1)) = &self.underlying {
            write!(f, " = {} + {}", side0, side1)?;
        }
        write!(f, " {}", self.detail_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn token(symbol: &str, decimals: u8) -> TokenInfo {
        TokenInfo {
            address: Address::ZERO,
            name: symbol.to_string(),
            symbol: symbol.to_string(),
            decimals,
        }
    }

    fn record(pair: Option<LpPairData>) -> LpLockRecord {
        LpLockRecord {
            lock: TokenLockData {
                id: 3,
                contract_address: address!("1111111111111111111111111111111111111111"),
                lock_owner: address!("2222222222222222222222222222222222222222"),
                token: address!("3333333333333333333333333333333333333333"),
                created_by: address!("4444444444444444444444444444444444444444"),
                created_at: 0,
                block_time: 0,
                unlock_time: 10,
                balance: U256::from(50u64),
                total_supply: U256::from(100u64),
                is_lp_token: true,
            },
            lp_token: Some(token("UNI-V2", 0)),
            pair,
            token0: Some(token("WETH", 0)),
            token1: Some(token("PEPE", 0)),
        }
    }

    #[test]
    fn test_underlying_amount() {
        let amount = underlying_amount(U256::from(1_000u64), 0, U256::from(100u64), U256::from(50u64));
        assert_eq!(amount, U256::from(500u64));
        assert_eq!(
            underlying_amount(U256::from(1_000u64), 0, U256::from(100u64), U256::ZERO),
            U256::ZERO
        );
    }

    #[test]
    fn test_underlying_amount_with_huge_decimals() {
        let reserve = U256::from(1_000u64);
        let supply = U256::from(100u64);
        let locked = U256::from(10u64);
        assert_eq!(underlying_amount(reserve, 80, supply, locked), U256::from(100u64));
        assert_eq!(underlying_amount(reserve, 255, supply, locked), U256::from(100u64));
        assert_eq!(underlying_amount(reserve, 80, supply, U256::ZERO), U256::ZERO);
        assert_eq!(underlying_amount(reserve, 80, U256::ZERO, locked), U256::ZERO);
    }

    #[test]
    fn test_render_with_pair() {
        let pair = LpPairData {
            has_lp_data: true,
            id: 3,
            token0: Address::ZERO,
            token1: Address::ZERO,
            balance0: U256::from(1_000u64),
            balance1: U256::from(4_000u64),
            price0: U256::ZERO,
            price1: U256::ZERO,
        };
        let view = record(Some(pair)).render(&RenderContext::new(5, None));

        assert_eq!(view.title, "WETH/PEPE");
        assert_eq!(view.locked_label, "UNI-V2 locked");
        assert_eq!(
            view.underlying,
            Some(("500 WETH".to_string(), "2,000 PEPE".to_string()))
        );
        assert_eq!(view.owned_by.as_deref(), Some("0x2222...2222"));
    }

    #[test]
    fn test_render_without_pair() {
        let view = record(None).render(&RenderContext::new(5, None));
        assert_eq!(view.underlying, None);
        assert_eq!(view.detail_path, "/lp-locker/unknown/3");
    }
}
