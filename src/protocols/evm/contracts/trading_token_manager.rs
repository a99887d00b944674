/// Trading token manager reads
use crate::error::Error;
use crate::protocols::evm::client::EvmClient;
use crate::protocols::evm::contracts::to_u64;
use crate::records::TradingTokenData;
use alloy_primitives::{Address, U256};
use alloy_sol_types::sol;

sol! {
    #[derive(Debug)]
    interface ITradingTokenManager {
        function count() external view returns (uint256);
        function getTokenDataById(uint256 id) external view returns (
            address tokenAddress_,
            string name_,
            string symbol_,
            uint8 decimals_,
            uint256 totalSupply_,
            uint256 totalBalance_,
            uint256 launchedAt_,
            address dexPair_,
            address owner_
        );
        function getTokenDataByAddress(address tokenAddress) external view returns (
            uint256 id,
            address tokenAddress_,
            string name_,
            string symbol_,
            uint8 decimals_,
            uint256 totalSupply_,
            uint256 totalBalance_,
            uint256 launchedAt_,
            address dexPair_,
            address owner_
        );
    }
}

/// Factory and registry of trading tokens
#[derive(Debug, Clone)]
pub struct TradingTokenManager {
    client: EvmClient,
    address: Address,
}

impl TradingTokenManager {
    pub fn new(client: EvmClient, address: Address) -> Self {
        Self { client, address }
    }

    /// Number of tokens created through the manager
    pub async fn count(&self) -> Result<u64, Error> {
        let result = self
            .client
            .call_contract(self.address, ITradingTokenManager::countCall {})
            .await?;
        to_u64(result._0, "count")
    }

    pub async fn token_data_by_id(&self, id: u64) -> Result<TradingTokenData, Error> {
        let call = ITradingTokenManager::getTokenDataByIdCall { id: U256::from(id) };
        let result = self.client.call_contract(self.address, call).await?;
        let data = token_data_with_id(id, result)?;
        if data.address.is_zero() {
            return Err(Error::NotFound(format!("trading token #{}", id)));
        }
        Ok(data)
    }

    pub async fn token_data_by_address(&self, token: Address) -> Result<TradingTokenData, Error> {
        let call = ITradingTokenManager::getTokenDataByAddressCall {
            tokenAddress: token,
        };
        let result = self.client.call_contract(self.address, call).await?;
        let data = TradingTokenData::try_from(result)?;
        if data.address.is_zero() {
            return Err(Error::NotFound(format!("trading token {}", token)));
        }
        Ok(data)
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

/// The by-id read omits the id; the caller supplies it
pub fn token_data_with_id(
    id: u64,
    r: ITradingTokenManager::getTokenDataByIdReturn,
) -> Result<TradingTokenData, Error> {
    Ok(TradingTokenData {
        id,
        address: r.tokenAddress_,
        name: r.name_,
        symbol: r.symbol_,
        decimals: r.decimals_,
        total_supply: r.totalSupply_,
        total_balance: r.totalBalance_,
        launched_at: to_u64(r.launchedAt_, "launchedAt")?,
        dex_pair: r.dexPair_,
        owner: r.owner_,
    })
}

impl TryFrom<ITradingTokenManager::getTokenDataByAddressReturn> for TradingTokenData {
    type Error = Error;

    fn try_from(r: ITradingTokenManager::getTokenDataByAddressReturn) -> Result<Self, Error> {
        Ok(Self {
            id: to_u64(r.id, "id")?,
            address: r.tokenAddress_,
            name: r.name_,
            symbol: r.symbol_,
            decimals: r.decimals_,
            total_supply: r.totalSupply_,
            total_balance: r.totalBalance_,
            launched_at: to_u64(r.launchedAt_, "launchedAt")?,
            dex_pair: r.dexPair_,
            owner: r.owner_,
        })
    }
}
