//! Effective network resolution and detail links

use alloy_primitives::address;

use launchpad_sdk::network::{
    detail_path, explorer_address_link, nft_factory_enabled, token_factory_enabled,
    DetailSection, NETWORKS,
};
use launchpad_sdk::{effective_chain_id, effective_network, network_by_chain_id};

#[test]
fn test_wallet_chain_wins_over_fallback() {
    let network = effective_network(Some(1), Some(8453)).unwrap();
    assert_eq!(network.url_name, "eth");

    let network = effective_network(None, Some(8453)).unwrap();
    assert_eq!(network.name, "Base");
}

#[test]
fn test_unsupported_wallet_chain_has_no_network() {
    // The wallet chain still wins; it just is not a launchpad network.
    assert_eq!(effective_chain_id(Some(56), Some(8453)), Some(56));
    assert!(effective_network(Some(56), Some(8453)).is_none());
    assert!(effective_network(None, None).is_none());
}

#[test]
fn test_network_table_is_consistent() {
    for network in NETWORKS.iter() {
        assert_eq!(network_by_chain_id(network.chain_id), Some(network));
        assert!(network.explorer_url.ends_with('/'));
        assert!(network.rpc_url.starts_with("https://"));
        assert_eq!(network.native_currency.decimals, 18);
    }
}

#[test]
fn test_detail_paths_per_section() {
    let base = network_by_chain_id(8453);
    assert_eq!(
        detail_path(DetailSection::Locker, base, Some(8453), "12"),
        "/locker/base/12"
    );
    assert_eq!(
        detail_path(DetailSection::Tokens, base, Some(8453), "4"),
        "/tokens/base/4"
    );
    assert_eq!(
        detail_path(
            DetailSection::Nfts,
            network_by_chain_id(84531),
            Some(84531),
            "0xabc"
        ),
        "/nfts/base-goerli/0xabc"
    );
    assert_eq!(
        detail_path(DetailSection::LpLocker, None, None, "1"),
        "/lp-locker/unknown/1"
    );
}

#[test]
fn test_explorer_links() {
    let base = network_by_chain_id(8453).unwrap();
    let link = explorer_address_link(base, &address!("4200000000000000000000000000000000000006"));
    assert!(link.starts_with("https://basescan.org/address/0x"));
}

#[test]
fn test_factory_availability_follows_chain() {
    for chain_id in [1, 5, 8453] {
        assert!(token_factory_enabled(Some(chain_id)));
        assert!(nft_factory_enabled(Some(chain_id)));
    }
    assert!(token_factory_enabled(Some(84531)));
    assert!(!nft_factory_enabled(Some(84531)));
    assert!(!token_factory_enabled(Some(56)));
    assert!(!nft_factory_enabled(None));
}
