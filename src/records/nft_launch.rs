//! NFT collection launches

use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::format::{format_ether, short_address};
use crate::loader::{Countdown, RenderContext, RenderRecord};
use crate::network::{detail_path, DetailSection};

/// Sale parameters of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSetting {
    pub max_supply: U256,
    /// Price per mint in wei
    pub mint_price: U256,
    pub start_time: u64,
    pub end_time: u64,
    pub referral_percent: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SalePhase {
    Soon,
    Sale,
    Ended,
}

impl SaleSetting {
    pub fn phase_at(&self, now: u64) -> SalePhase {
        if self.start_time > now {
            SalePhase::Soon
        } else if self.end_time < now {
            SalePhase::Ended
        } else {
            SalePhase::Sale
        }
    }
}

impl fmt::Display for SalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalePhase::Soon => write!(f, "Soon"),
            SalePhase::Sale => write!(f, "Sale"),
            SalePhase::Ended => write!(f, "Ended"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftLaunchRecord {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub total_supply: u64,
    pub sale: SaleSetting,
    pub owner: Address,
    pub base_uri: String,
    pub fee_wallet: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NftLaunchView {
    pub title: String,
    pub address: String,
    pub owner: String,
    pub phase: SalePhase,
    pub minted: String,
    pub price: String,
    /// "Starts In" before the sale opens, "NFT Presale" afterwards
    pub headline: &'static str,
    /// `DD:HH:MM:SS` until the sale opens
    pub starts_in: Option<String>,
    /// "Started" or "Has Ended" once the sale opened
    pub sale_status: Option<&'static str>,
    pub detail_path: String,
}

impl RenderRecord for NftLaunchRecord {
    type View = NftLaunchView;

    fn render(&self, ctx: &RenderContext) -> NftLaunchView {
        let phase = self.sale.phase_at(ctx.now);

        NftLaunchView {
            title: format!("{} ({})", self.name, self.symbol),
            address: short_address(&self.address),
            owner: short_address(&self.owner),
            phase,
            minted: format!("{} / {}", self.total_supply, self.sale.max_supply),
            price: format!("{} ETH", format_ether(self.sale.mint_price)),
            headline: match phase {
                SalePhase::Soon => "Starts In",
                _ => "NFT Presale",
            },
            starts_in: Countdown::until(ctx.now, self.sale.start_time).map(|c| c.clock()),
            sale_status: match phase {
                SalePhase::Soon => None,
                SalePhase::Sale => Some("Started"),
                SalePhase::Ended => Some("Has Ended"),
            },
            detail_path: detail_path(
                DetailSection::Nfts,
                ctx.network,
                ctx.chain_id(),
                &self.address.to_string(),
            ),
        }
    }
}

impl fmt::Display for NftLaunchView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.title, self.price, self.headline)?;
        if let Some(starts_in) = &self.starts_in {
            write!(f, " {}", starts_in)?;
        }
        if let Some(status) = self.sale_status {
            write!(f, " {}", status)?;
        }
        write!(f, " minted {} {}", self.minted, self.detail_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch(start_time: u64, end_time: u64) -> NftLaunchRecord {
        NftLaunchRecord {
            address: Address::ZERO,
            name: "Stealth Apes".to_string(),
            symbol: "SAPE".to_string(),
            total_supply: 12,
            sale: SaleSetting {
                max_supply: U256::from(1_000u64),
                mint_price: U256::from(50_000_000_000_000_000u64),
                start_time,
                end_time,
                referral_percent: U256::from(5u64),
            },
            owner: Address::ZERO,
            base_uri: "ipfs://collection/".to_string(),
            fee_wallet: Address::ZERO,
        }
    }

    #[test]
    fn test_phases() {
        let sale = launch(100, 200).sale;
        assert_eq!(sale.phase_at(50), SalePhase::Soon);
        assert_eq!(sale.phase_at(100), SalePhase::Sale);
        assert_eq!(sale.phase_at(200), SalePhase::Sale);
        assert_eq!(sale.phase_at(201), SalePhase::Ended);
    }

    #[test]
    fn test_render_upcoming_sale() {
        let view = launch(90_061, 200_000).render(&RenderContext::new(0, None));
        assert_eq!(view.headline, "Starts In");
        assert_eq!(view.starts_in.as_deref(), Some("01:01:01:01"));
        assert_eq!(view.sale_status, None);
        assert_eq!(view.price, "0.05 ETH");
        assert_eq!(view.minted, "12 / 1000");
    }

    #[test]
    fn test_render_ended_sale() {
        let view = launch(10, 20).render(&RenderContext::new(30, None));
        assert_eq!(view.headline, "NFT Presale");
        assert_eq!(view.sale_status, Some("Has Ended"));
        assert_eq!(view.starts_in, None);
    }
}
