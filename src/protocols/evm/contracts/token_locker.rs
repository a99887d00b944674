/// Token locker manager and per-lock contract reads
use super::{lock_id, u40_to_u64};
use crate::error::Error;
use crate::protocols::evm::client::EvmClient;
use crate::records::{LpPairData, TokenLockData};
use alloy_primitives::{Address, U256};
use alloy_sol_types::sol;

sol! {
    #[derive(Debug)]
    interface ITokenLockerManager {
        function tokenLockerCount() external view returns (uint40);
        function lpLockerCount() external view returns (uint40);
        function TokenLockerFee() external view returns (uint256);
        function LpLockerFee() external view returns (uint256);
        function getTokenLockersForAddress(address _address) external view returns (uint40[]);
        function getLpLockersForAddress(address _address) external view returns (uint40[]);
        function getTokenLockData(uint40 _id) external view returns (
            bool isLpToken,
            uint40 id,
            address contractAddress,
            address lockOwner,
            address token,
            address createdBy,
            uint40 createdAt,
            uint40 blockTime,
            uint40 unlockTime,
            uint256 balance,
            uint256 totalSupply
        );
        function getLpLockData(uint40 _id) external view returns (
            bool isLpToken,
            uint40 id,
            address contractAddress,
            address lockOwner,
            address token,
            address createdBy,
            uint40 createdAt,
            uint40 blockTime,
            uint40 unlockTime,
            uint256 balance,
            uint256 totalSupply
        );
    }

    #[derive(Debug)]
    interface ITokenLocker {
        function getLpData() external view returns (
            bool hasLpData,
            uint40 id,
            address token0,
            address token1,
            uint256 balance0,
            uint256 balance1,
            uint256 price0,
            uint256 price1
        );
    }
}

/// Registry of token and LP locks
#[derive(Debug, Clone)]
pub struct TokenLockerManager {
    client: EvmClient,
    address: Address,
}

impl TokenLockerManager {
    pub fn new(client: EvmClient, address: Address) -> Self {
        Self { client, address }
    }

    pub async fn token_locker_count(&self) -> Result<u64, Error> {
        let result = self
            .client
            .call_contract(self.address, ITokenLockerManager::tokenLockerCountCall {})
            .await?;
        Ok(u40_to_u64(result._0))
    }

    pub async fn lp_locker_count(&self) -> Result<u64, Error> {
        let result = self
            .client
            .call_contract(self.address, ITokenLockerManager::lpLockerCountCall {})
            .await?;
        Ok(u40_to_u64(result._0))
    }

    /// Fee in wei for creating a token lock
    pub async fn token_locker_fee(&self) -> Result<U256, Error> {
        let result = self
            .client
            .call_contract(self.address, ITokenLockerManager::TokenLockerFeeCall {})
            .await?;
        Ok(result._0)
    }

    /// Fee in wei for creating an LP lock
    pub async fn lp_locker_fee(&self) -> Result<U256, Error> {
        let result = self
            .client
            .call_contract(self.address, ITokenLockerManager::LpLockerFeeCall {})
            .await?;
        Ok(result._0)
    }

    pub async fn token_lockers_for_address(&self, owner: Address) -> Result<Vec<u64>, Error> {
        let call = ITokenLockerManager::getTokenLockersForAddressCall { _address: owner };
        let result = self.client.call_contract(self.address, call).await?;
        Ok(result._0.into_iter().map(u40_to_u64).collect())
    }

    pub async fn lp_lockers_for_address(&self, owner: Address) -> Result<Vec<u64>, Error> {
        let call = ITokenLockerManager::getLpLockersForAddressCall { _address: owner };
        let result = self.client.call_contract(self.address, call).await?;
        Ok(result._0.into_iter().map(u40_to_u64).collect())
    }

    pub async fn token_lock_data(&self, id: u64) -> Result<TokenLockData, Error> {
        let call = ITokenLockerManager::getTokenLockDataCall { _id: lock_id(id)? };
        let result = self.client.call_contract(self.address, call).await?;
        existing_lock(id, result.into())
    }

    pub async fn lp_lock_data(&self, id: u64) -> Result<TokenLockData, Error> {
        let call = ITokenLockerManager::getLpLockDataCall { _id: lock_id(id)? };
        let result = self.client.call_contract(self.address, call).await?;
        existing_lock(id, result.into())
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

/// A single deployed lock
#[derive(Debug, Clone)]
pub struct TokenLocker {
    client: EvmClient,
    address: Address,
}

impl TokenLocker {
    pub fn new(client: EvmClient, address: Address) -> Self {
        Self { client, address }
    }

    /// Pair reserves for an LP lock
    pub async fn lp_data(&self) -> Result<LpPairData, Error> {
        let result = self
            .client
            .call_contract(self.address, ITokenLocker::getLpDataCall {})
            .await?;
        Ok(result.into())
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

/// Reject the zeroed record the manager returns for an unknown id
pub fn existing_lock(id: u64, lock: TokenLockData) -> Result<TokenLockData, Error> {
    if lock.exists() {
        Ok(lock)
    } else {
        Err(Error::NotFound(format!("lock {}", id)))
    }
}

impl From<ITokenLockerManager::getTokenLockDataReturn> for TokenLockData {
    fn from(r: ITokenLockerManager::getTokenLockDataReturn) -> Self {
        Self {
            id: u40_to_u64(r.id),
            contract_address: r.contractAddress,
            lock_owner: r.lockOwner,
            token: r.token,
            created_by: r.createdBy,
            created_at: u40_to_u64(r.createdAt),
            block_time: u40_to_u64(r.blockTime),
            unlock_time: u40_to_u64(r.unlockTime),
            balance: r.balance,
            total_supply: r.totalSupply,
            is_lp_token: r.isLpToken,
        }
    }
}

// Same tuple as a token lock, under a different selector
impl From<ITokenLockerManager::getLpLockDataReturn> for TokenLockData {
    fn from(r: ITokenLockerManager::getLpLockDataReturn) -> Self {
        Self {
            id: u40_to_u64(r.id),
            contract_address: r.contractAddress,
            lock_owner: r.lockOwner,
            token: r.token,
            created_by: r.createdBy,
            created_at: u40_to_u64(r.createdAt),
            block_time: u40_to_u64(r.blockTime),
            unlock_time: u40_to_u64(r.unlockTime),
            balance: r.balance,
            total_supply: r.totalSupply,
            is_lp_token: r.isLpToken,
        }
    }
}

impl From<ITokenLocker::getLpDataReturn> for LpPairData {
    fn from(r: ITokenLocker::getLpDataReturn) -> Self {
        Self {
            has_lp_data: r.hasLpData,
            id: u40_to_u64(r.id),
            token0: r.token0,
            token1: r.token1,
            balance0: r.balance0,
            balance1: r.balance1,
            price0: r.price0,
            price1: r.price1,
        }
    }
}
