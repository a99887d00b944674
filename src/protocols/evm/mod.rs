/// EVM chain access for the launchpad SDK
///
/// Read-only access to the launchpad contracts on EVM-compatible chains:
/// `eth_call` and `eth_getCode` through an alloy HTTP provider, typed contract
/// bindings, and the record accessors that list rows fetch through.
///
/// # Example
///
/// ```rust,no_run
/// use launchpad_sdk::protocols::evm::client::EvmClient;
/// use alloy_primitives::address;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let evm = EvmClient::new("https://developer-access-mainnet.base.org/", 8453).await?;
///
/// let weth = evm.erc20(address!("4200000000000000000000000000000000000006"));
/// let info = weth.token_info().await?;
/// println!("{} has {} decimals", info.symbol, info.decimals);
/// # Ok(())
/// # }
/// ```
pub mod accessors;
pub mod client;
pub mod contracts;
pub mod token_metadata;
pub mod types;

pub use accessors::{LpLockAccessor, NftLaunchAccessor, TokenLockAccessor, TradingTokenAccessor};
pub use client::EvmClient;
pub use token_metadata::TokenMetadataCache;
pub use types::{EthAddress, EvmCallRequest, EvmError};
