use crate::contract_cache::CodeReader;
use crate::error::Error;
use crate::protocols::evm::contracts::{
    Erc20, NftCollection, NftFactory, TokenLocker, TokenLockerManager, TradingTokenManager,
};
use crate::protocols::evm::types::{EthAddress, EvmCallRequest, EvmError};
use alloy_primitives::{Address, Bytes};
/// EVM client for launchpad reads
///
/// Thin wrapper over an alloy HTTP provider exposing the read-only calls the
/// record accessors need.
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types_eth::{BlockId, BlockNumberOrTag, TransactionRequest};
use alloy_sol_types::SolCall;
use alloy_transport_http::{Client, Http};
use async_trait::async_trait;
use tracing::debug;

/// EVM client for blockchain reads
#[derive(Clone)]
pub struct EvmClient {
    provider: alloy_provider::RootProvider<Http<Client>>,
    chain_id: u64,
}

impl std::fmt::Debug for EvmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmClient")
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl EvmClient {
    /// Create a new EVM client with the given RPC endpoint and chain ID
    pub async fn new(rpc_url: &str, chain_id: u64) -> Result<Self, Error> {
        let url = reqwest::Url::parse(rpc_url)
            .map_err(|e| Error::Config(format!("Invalid RPC URL: {}", e)))?;
        let provider = ProviderBuilder::new().on_http(url);

        Ok(Self { provider, chain_id })
    }

    /// Execute a read-only contract call
    pub async fn call(&self, request: EvmCallRequest) -> Result<Vec<u8>, Error> {
        let tx_request = TransactionRequest {
            to: Some(alloy_primitives::TxKind::Call(request.to.0)),
            input: request.data.into(),
            ..Default::default()
        };

        let block = block_id(request.block.as_deref());

        let result = self
            .provider
            .call(&tx_request)
            .block(block)
            .await
            .map_err(|e| EvmError::RpcError(e.to_string()))?;

        Ok(result.to_vec())
    }

    /// Get the current block number
    pub async fn get_block_number(&self) -> Result<u64, Error> {
        let block_number = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| EvmError::RpcError(e.to_string()))?;

        Ok(block_number)
    }

    /// Get code at address
    pub async fn get_code(
        &self,
        address: EthAddress,
        block: Option<String>,
    ) -> Result<Bytes, Error> {
        let code = self
            .provider
            .get_code_at(address.0)
            .block_id(block_id(block.as_deref()))
            .await
            .map_err(|e| EvmError::RpcError(e.to_string()))?;

        Ok(code)
    }

    /// Get the chain ID
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Call a contract method (read-only)
    pub async fn call_contract<T: SolCall>(
        &self,
        contract_address: Address,
        call: T,
    ) -> Result<T::Return, Error> {
        let request = EvmCallRequest::new(contract_address, call.abi_encode());
        let result = self.call(request).await?;
        if result.is_empty() {
            return Err(EvmError::CallReverted(format!(
                "{} returned no data from {}",
                T::SIGNATURE,
                contract_address
            ))
            .into());
        }
        let decoded = T::abi_decode_returns(&result, false).map_err(|e| {
            EvmError::AbiError(format!("Failed to decode {} result: {}", T::SIGNATURE, e))
        })?;
        Ok(decoded)
    }

    /// Create an ERC-20 helper for the given contract address
    pub fn erc20(&self, address: Address) -> Erc20 {
        Erc20::new(self.clone(), address)
    }

    pub fn token_locker_manager(&self, address: Address) -> TokenLockerManager {
        TokenLockerManager::new(self.clone(), address)
    }

    pub fn token_locker(&self, address: Address) -> TokenLocker {
        TokenLocker::new(self.clone(), address)
    }

    pub fn trading_token_manager(&self, address: Address) -> TradingTokenManager {
        TradingTokenManager::new(self.clone(), address)
    }

    pub fn nft_factory(&self, address: Address) -> NftFactory {
        NftFactory::new(self.clone(), address)
    }

    pub fn nft_collection(&self, address: Address) -> NftCollection {
        NftCollection::new(self.clone(), address)
    }
}

#[async_trait]
impl CodeReader for EvmClient {
    async fn code_at(&self, address: Address) -> Result<Bytes, Error> {
        debug!(chain_id = self.chain_id, %address, "reading contract code");
        self.get_code(EthAddress(address), None).await
    }
}

fn block_id(block: Option<&str>) -> BlockId {
    block
        .and_then(|b| b.parse::<BlockNumberOrTag>().ok())
        .unwrap_or(BlockNumberOrTag::Latest)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_rejects_invalid_url() {
        let err = EvmClient::new("not a url", 8453).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_new_keeps_chain_id() {
        let client = EvmClient::new("http://127.0.0.1:8545", 84531)
            .await
            .unwrap();
        assert_eq!(client.chain_id(), 84531);
    }

    #[test]
    fn test_block_id_defaults_to_latest() {
        assert_eq!(block_id(None), BlockId::from(BlockNumberOrTag::Latest));
        assert_eq!(block_id(Some("bogus")), BlockId::from(BlockNumberOrTag::Latest));
        assert_eq!(
            block_id(Some("0x10")),
            BlockId::from(BlockNumberOrTag::Number(16))
        );
    }
}
