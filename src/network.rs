//! Supported networks and effective network resolution

use alloy_primitives::{address, Address};
use serde::Serialize;

/// Wrapped native currency of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub address: Address,
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Static description of a supported chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkData {
    pub chain_id: u64,
    pub name: &'static str,
    pub short_name: &'static str,
    /// Path segment used in detail links
    pub url_name: &'static str,
    pub native_currency: NativeCurrency,
    pub explorer_url: &'static str,
    pub rpc_url: &'static str,
    pub is_testnet: bool,
    pub dex_router: Address,
}

const WETH_MAINNET: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
const WETH_GOERLI: Address = address!("B4FBF271143F4FBf7B91A5ded31805e42b2208d6");
const WETH_BASE: Address = address!("4200000000000000000000000000000000000006");
const UNISWAP_V2_ROUTER: Address = address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D");

pub static NETWORKS: [NetworkData; 4] = [
    NetworkData {
        chain_id: 1,
        name: "Ethereum",
        short_name: "Ethereum",
        url_name: "eth",
        native_currency: NativeCurrency {
            address: WETH_MAINNET,
            name: "Eth",
            symbol: "ETH",
            decimals: 18,
        },
        explorer_url: "https://etherscan.io/",
        rpc_url: "https://eth.llamarpc.com",
        is_testnet: false,
        dex_router: UNISWAP_V2_ROUTER,
    },
    NetworkData {
        chain_id: 5,
        name: "Goerli",
        short_name: "Goerli",
        url_name: "goerli",
        native_currency: NativeCurrency {
            address: WETH_GOERLI,
            name: "Goerli Ether",
            symbol: "ETH",
            decimals: 18,
        },
        explorer_url: "https://goerli.etherscan.io/",
        rpc_url: "https://rpc.ankr.com/eth_goerli",
        is_testnet: true,
        dex_router: UNISWAP_V2_ROUTER,
    },
    NetworkData {
        chain_id: 8453,
        name: "Base",
        short_name: "base",
        url_name: "base",
        native_currency: NativeCurrency {
            address: WETH_BASE,
            name: "Ethereum",
            symbol: "ETH",
            decimals: 18,
        },
        explorer_url: "https://basescan.org/",
        rpc_url: "https://developer-access-mainnet.base.org/",
        is_testnet: false,
        dex_router: address!("8b2f33e7ce2f12b448b524decd0d09bc5c09033e"),
    },
    NetworkData {
        chain_id: 84531,
        name: "Base-Goerli",
        short_name: "base-goerli",
        url_name: "base-goerli",
        native_currency: NativeCurrency {
            address: WETH_BASE,
            name: "Ethereum",
            symbol: "ETH",
            decimals: 18,
        },
        explorer_url: "https://goerli.basescan.org/",
        rpc_url: "https://goerli.base.org",
        is_testnet: true,
        dex_router: address!("22e9e33ed834a6e9ac980e62137eda891e2498b6"),
    },
];

pub fn network_by_chain_id(chain_id: u64) -> Option<&'static NetworkData> {
    NETWORKS.iter().find(|network| network.chain_id == chain_id)
}

/// Resolve a value from a live source and a constant fallback.
///
/// The live value always wins when present.
pub fn effective<T>(live: Option<T>, fallback: Option<T>) -> Option<T> {
    live.or(fallback)
}

/// Chain id of the connected wallet if any, otherwise the configured fallback
pub fn effective_chain_id(wallet: Option<u64>, fallback: Option<u64>) -> Option<u64> {
    effective(wallet, fallback)
}

/// Network data for the effective chain, if that chain is supported
pub fn effective_network(
    wallet: Option<u64>,
    fallback: Option<u64>,
) -> Option<&'static NetworkData> {
    effective_chain_id(wallet, fallback).and_then(network_by_chain_id)
}

/// Block explorer page for an address
pub fn explorer_address_link(network: &NetworkData, address: &Address) -> String {
    format!("{}address/{}", network.explorer_url, address)
}

/// Sections of the launchpad with per-record detail pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSection {
    Locker,
    LpLocker,
    Tokens,
    Nfts,
}

impl DetailSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailSection::Locker => "locker",
            DetailSection::LpLocker => "lp-locker",
            DetailSection::Tokens => "tokens",
            DetailSection::Nfts => "nfts",
        }
    }
}

/// Detail page path `/{section}/{network}/{id}`.
///
/// The network segment is the url name of a known network, falling back to the
/// bare chain id.
pub fn detail_path(
    section: DetailSection,
    network: Option<&NetworkData>,
    chain_id: Option<u64>,
    id: &str,
) -> String {
    let segment = match (network, chain_id) {
        (Some(network), _) => network.url_name.to_string(),
        (None, Some(chain_id)) => chain_id.to_string(),
        (None, None) => "unknown".to_string(),
    };
    format!("/{}/{}/{}", section.as_str(), segment, id)
}

/// Whether trading tokens can be created on the chain
pub fn token_factory_enabled(chain_id: Option<u64>) -> bool {
    matches!(chain_id, Some(1 | 5 | 8453 | 84531))
}

/// Whether NFT launches can be created on the chain
pub fn nft_factory_enabled(chain_id: Option<u64>) -> bool {
    matches!(chain_id, Some(1 | 5 | 8453))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_lookup() {
        let base = network_by_chain_id(8453).unwrap();
        assert_eq!(base.url_name, "base");
        assert_eq!(base.native_currency.address, WETH_BASE);
        assert!(network_by_chain_id(56).is_none());
    }

    #[test]
    fn test_live_value_wins() {
        assert_eq!(effective_chain_id(Some(8453), Some(1)), Some(8453));
        assert_eq!(effective_chain_id(None, Some(1)), Some(1));
        assert_eq!(effective_chain_id(Some(5), None), Some(5));
        assert_eq!(effective_chain_id(None, None), None);
    }

    #[test]
    fn test_detail_path() {
        let eth = network_by_chain_id(1);
        assert_eq!(detail_path(DetailSection::Locker, eth, Some(1), "7"), "/locker/eth/7");
        assert_eq!(
            detail_path(DetailSection::LpLocker, None, Some(999), "3"),
            "/lp-locker/999/3"
        );
    }

    #[test]
    fn test_factory_availability() {
        assert!(token_factory_enabled(Some(84531)));
        assert!(!nft_factory_enabled(Some(84531)));
        assert!(!token_factory_enabled(None));
    }
}
