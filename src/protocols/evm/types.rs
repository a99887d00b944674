/// EVM request types and errors for launchpad reads
use crate::error::Error;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ethereum address wrapper used at the RPC boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EthAddress(pub Address);

impl EthAddress {
    /// Parse a hex address; mixed-case input must carry a valid EIP-55 checksum
    pub fn parse(s: &str) -> Result<Self, Error> {
        let trimmed = s.trim();
        let has_upper = trimmed.chars().skip(2).any(|c| c.is_ascii_uppercase());
        let has_lower = trimmed.chars().skip(2).any(|c| c.is_ascii_lowercase());
        let addr = if has_upper && has_lower {
            Address::parse_checksummed(trimmed, None)
                .map_err(|e| EvmError::InvalidAddress(format!("{}: {}", trimmed, e)))?
        } else {
            Address::from_str(trimmed)
                .map_err(|e| EvmError::InvalidAddress(format!("{}: {}", trimmed, e)))?
        };
        Ok(Self(addr))
    }

    pub fn inner(&self) -> &Address {
        &self.0
    }

    /// EIP-55 checksummed hex string
    pub fn to_checksummed_string(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_checksummed_string())
    }
}

impl From<Address> for EthAddress {
    fn from(addr: Address) -> Self {
        Self(addr)
    }
}

impl From<EthAddress> for Address {
    fn from(addr: EthAddress) -> Self {
        addr.0
    }
}

/// Read-only `eth_call` request
#[derive(Debug, Clone)]
pub struct EvmCallRequest {
    /// Target contract address
    pub to: EthAddress,
    /// Encoded function call
    pub data: Vec<u8>,
    /// Block number or tag (`latest` when unset)
    pub block: Option<String>,
}

impl EvmCallRequest {
    pub fn new(to: Address, data: Vec<u8>) -> Self {
        Self {
            to: EthAddress(to),
            data,
            block: None,
        }
    }

    pub fn at_block(mut self, block: impl Into<String>) -> Self {
        self.block = Some(block.into());
        self
    }
}

/// EVM-specific errors
#[derive(Debug, thiserror::Error)]
pub enum EvmError {
    #[error("Invalid Ethereum address: {0}")]
    InvalidAddress(String),

    #[error("ABI encoding/decoding error: {0}")]
    AbiError(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Call reverted: {0}")]
    CallReverted(String),
}

impl From<EvmError> for Error {
    fn from(err: EvmError) -> Self {
        match err {
            EvmError::RpcError(msg) => Error::Rpc(msg),
            EvmError::InvalidAddress(msg) => Error::InvalidArguments(msg),
            other => Error::Evm(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_lowercase_and_checksummed() {
        let lower = EthAddress::parse("0x4200000000000000000000000000000000000006").unwrap();
        assert_eq!(
            lower.to_string(),
            "0x4200000000000000000000000000000000000006"
        );

        let checksummed =
            EthAddress::parse("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").unwrap();
        assert_eq!(
            checksummed,
            EthAddress::parse("0xd8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        assert!(EthAddress::parse("0xD8dA6BF26964aF9D7eEd9e03E53415D37aA96045").is_err());
        assert!(EthAddress::parse("not an address").is_err());
    }

    #[test]
    fn test_rpc_errors_stay_transient() {
        let err: Error = EvmError::RpcError("connection reset".to_string()).into();
        assert!(err.is_transient());

        let err: Error = EvmError::AbiError("short buffer".to_string()).into();
        assert!(!err.is_transient());
    }
}
