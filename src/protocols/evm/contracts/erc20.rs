/// ERC-20 metadata reads
use crate::error::Error;
use crate::protocols::evm::client::EvmClient;
use crate::records::TokenInfo;
use alloy_primitives::{Address, U256};
use alloy_sol_types::sol;

sol! {
    #[derive(Debug)]
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }
}

/// ERC-20 token helper
#[derive(Debug, Clone)]
pub struct Erc20 {
    client: EvmClient,
    address: Address,
}

impl Erc20 {
    pub fn new(client: EvmClient, address: Address) -> Self {
        Self { client, address }
    }

    pub async fn name(&self) -> Result<String, Error> {
        let result = self
            .client
            .call_contract(self.address, IERC20::nameCall {})
            .await?;
        Ok(result._0)
    }

    pub async fn symbol(&self) -> Result<String, Error> {
        let result = self
            .client
            .call_contract(self.address, IERC20::symbolCall {})
            .await?;
        Ok(result._0)
    }

    pub async fn decimals(&self) -> Result<u8, Error> {
        let result = self
            .client
            .call_contract(self.address, IERC20::decimalsCall {})
            .await?;
        Ok(result._0)
    }

    pub async fn total_supply(&self) -> Result<U256, Error> {
        let result = self
            .client
            .call_contract(self.address, IERC20::totalSupplyCall {})
            .await?;
        Ok(result._0)
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, Error> {
        let result = self
            .client
            .call_contract(self.address, IERC20::balanceOfCall { account })
            .await?;
        Ok(result._0)
    }

    /// Name, symbol and decimals read concurrently
    pub async fn token_info(&self) -> Result<TokenInfo, Error> {
        let (name, symbol, decimals) =
            tokio::try_join!(self.name(), self.symbol(), self.decimals())?;
        Ok(TokenInfo {
            address: self.address,
            name,
            symbol,
            decimals,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }
}
