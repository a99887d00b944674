#[cfg(feature = "evm")]
pub mod client;
pub mod config;
pub mod contract_cache;
pub mod error;
pub mod list;
pub mod loader;
pub mod logging;
pub mod network;
pub mod protocols;
pub mod records;

// Main client exports
#[cfg(feature = "evm")]
pub use client::{LaunchpadClient, LaunchpadClientBuilder};
pub use config::{ConfigurationManager, ContractType, EnvironmentConfig};
pub use error::Error;

// Loader exports
pub use list::{LockListQuery, RecordList};
pub use loader::{
    FailurePolicy, FetchState, LoaderConfig, RecordAccessor, RecordLoader, RenderContext,
    RenderRecord, Trigger, ViewModel, Viewport,
};

// Network and cache exports
pub use contract_cache::{CodeReader, ContractCodeCache};
pub use network::{effective_chain_id, effective_network, network_by_chain_id, NetworkData};

// Record exports
pub use records::{
    LpLockRecord, NftLaunchRecord, TokenInfo, TokenLockRecord, TradingTokenKey, TradingTokenRecord,
};

// EVM exports
#[cfg(feature = "evm")]
pub use protocols::evm::{
    EvmClient, LpLockAccessor, NftLaunchAccessor, TokenLockAccessor, TradingTokenAccessor,
};
