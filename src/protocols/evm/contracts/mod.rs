/// Launchpad contract interfaces
///
/// Read-only bindings generated with the alloy `sol!` macro.
///
/// # Available Contracts
///
/// - **ERC-20**: token metadata for locked and traded tokens
/// - **TokenLockerManager** / **TokenLocker**: token and LP locks
/// - **TradingTokenManager**: tokens created through the launchpad
/// - **NftFactory** / **NftCollection**: NFT presales
pub mod erc20;
pub mod nft_factory;
pub mod token_locker;
pub mod trading_token_manager;

pub use erc20::{Erc20, IERC20};
pub use nft_factory::{INftCollection, INftFactory, NftCollection, NftFactory};
pub use token_locker::{ITokenLocker, ITokenLockerManager, TokenLocker, TokenLockerManager};
pub use trading_token_manager::{ITradingTokenManager, TradingTokenManager};

use crate::error::Error;
use alloy_primitives::{Uint, U256};

/// Solidity `uint40`, used by the locker for ids and timestamps
pub type U40 = Uint<40, 1>;

/// Widen a `uint40` value; always fits
pub(crate) fn u40_to_u64(value: U40) -> u64 {
    value.to::<u64>()
}

/// Lock id as a `uint40` call argument
pub(crate) fn lock_id(id: u64) -> Result<U40, Error> {
    if id >= 1 << 40 {
        return Err(Error::InvalidArguments(format!(
            "lock id {} does not fit in uint40",
            id
        )));
    }
    Ok(U40::from(id))
}

/// Narrow a `uint256` return value that is known to be an index or timestamp
pub(crate) fn to_u64(value: U256, field: &str) -> Result<u64, Error> {
    u64::try_from(value).map_err(|_| Error::Contract(format!("{} out of range: {}", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_u64_range() {
        assert_eq!(
            to_u64(U256::from(1_700_000_000u64), "launchedAt").unwrap(),
            1_700_000_000
        );
        assert!(matches!(to_u64(U256::MAX, "count"), Err(Error::Contract(_))));
    }

    #[test]
    fn test_lock_id_range() {
        let id = lock_id(42).unwrap();
        assert_eq!(u40_to_u64(id), 42);
        assert_eq!(u40_to_u64(lock_id((1 << 40) - 1).unwrap()), (1 << 40) - 1);
        assert!(matches!(lock_id(1 << 40), Err(Error::InvalidArguments(_))));
    }
}
