use thiserror::Error;

/// Errors produced by the launchpad SDK
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure talking to an RPC endpoint
    #[error("RPC error: {0}")]
    Rpc(String),

    /// EVM call or decoding failure
    #[error("EVM error: {0}")]
    Evm(String),

    /// A launchpad contract is unavailable or returned unusable data
    #[error("Contract error: {0}")]
    Contract(String),

    /// The requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A remote call did not complete in time
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether retrying the same call later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Rpc(_) | Error::Timeout(_))
    }
}

