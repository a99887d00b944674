//! Token locks

use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::format::{format_amount, format_timestamp, short_address, supply_share};
use super::{icon_or_unknown, name_or_ellipsis, symbol_or, TokenInfo};
use crate::loader::{humanize_short, RenderContext, RenderRecord};
use crate::network::{detail_path, DetailSection};

/// Lock state as returned by the locker manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLockData {
    pub id: u64,
    pub contract_address: Address,
    pub lock_owner: Address,
    pub token: Address,
    pub created_by: Address,
    pub created_at: u64,
    /// Block timestamp at the time of the read
    pub block_time: u64,
    pub unlock_time: u64,
    pub balance: U256,
    pub total_supply: U256,
    pub is_lp_token: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LockStatus {
    Locked,
    /// Unlock time passed and tokens are still in the lock
    Unlocked,
    /// Unlock time passed and the lock was withdrawn
    Empty,
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockStatus::Locked => write!(f, "Locked"),
            LockStatus::Unlocked => write!(f, "Unlocked!"),
            LockStatus::Empty => write!(f, "Empty"),
        }
    }
}

impl TokenLockData {
    /// Unknown ids come back as a zeroed record with no lock contract
    pub fn exists(&self) -> bool {
        !self.contract_address.is_zero()
    }

    pub fn status_at(&self, now: u64) -> LockStatus {
        if self.unlock_time > now {
            LockStatus::Locked
        } else if !self.balance.is_zero() {
            LockStatus::Unlocked
        } else {
            LockStatus::Empty
        }
    }

    pub fn remaining_secs(&self, now: u64) -> u64 {
        self.unlock_time.saturating_sub(now)
    }

    /// Share of the lock duration still ahead, in percent
    pub fn progress_percent(&self, now: u64) -> f64 {
        if self.unlock_time <= self.created_at {
            return 0.0;
        }
        let duration = (self.unlock_time - self.created_at) as f64;
        let elapsed = now.saturating_sub(self.created_at) as f64;
        (100.0 - elapsed / duration * 100.0).clamp(0.0, 100.0)
    }

    pub fn supply_share(&self) -> String {
        supply_share(self.balance, self.total_supply)
    }

    /// Label for the unlock timestamp
    pub fn unlock_label(&self, now: u64) -> &'static str {
        if self.unlock_time > now {
            "Unlocks at"
        } else {
            "Unlocked at"
        }
    }
}

/// A token lock with its token metadata, when that could be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLockRecord {
    pub lock: TokenLockData,
    pub token: Option<TokenInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenLockView {
    pub id: u64,
    pub title: String,
    pub icon: String,
    pub created_by: String,
    /// Present when the lock was transferred away from its creator
    pub owned_by: Option<String>,
    pub status: LockStatus,
    pub countdown: Option<String>,
    pub progress: f64,
    pub amount: String,
    pub share: String,
    pub lock_address: String,
    pub token_label: String,
    pub token_address: String,
    pub locked_at: String,
    pub unlock_label: &'static str,
    pub unlocks_at: String,
    pub detail_path: String,
}

impl RenderRecord for TokenLockRecord {
    type View = TokenLockView;

    fn render(&self, ctx: &RenderContext) -> TokenLockView {
        let lock = &self.lock;
        let token = self.token.as_ref();
        let status = lock.status_at(ctx.now);

        TokenLockView {
            id: lock.id,
            title: name_or_ellipsis(token),
            icon: icon_or_unknown(token),
            created_by: short_address(&lock.created_by),
            owned_by: (lock.lock_owner != lock.created_by).then(|| short_address(&lock.lock_owner)),
            status,
            countdown: (status == LockStatus::Locked)
                .then(|| humanize_short(lock.remaining_secs(ctx.now))),
            progress: lock.progress_percent(ctx.now),
            amount: format_amount(lock.balance, token.map(|t| t.decimals)),
            share: lock.supply_share(),
            lock_address: short_address(&lock.contract_address),
            token_label: format!("{} address", symbol_or(token, "...")),
            token_address: short_address(&lock.token),
            locked_at: format_timestamp(lock.created_at),
            unlock_label: lock.unlock_label(ctx.now),
            unlocks_at: format_timestamp(lock.unlock_time),
            detail_path: detail_path(
                DetailSection::Locker,
                ctx.network,
                ctx.chain_id(),
                &lock.id.to_string(),
            ),
        }
    }
}

impl fmt::Display for TokenLockView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} [{}] {} {}", self.id, self.icon, self.title, self.status)?;
        if let Some(countdown) = &self.countdown {
            write!(f, " {}", countdown)?;
        }
        write!(
            f,
            " {} ({}%) by {}",
            self.amount, self.share, self.created_by
        )?;
        if let Some(owner) = &self.owned_by {
            write!(f, ", owned by {}", owner)?;
        }
        write!(f, " {}", self.detail_path)
    }
}
