/// Chain protocol modules for the launchpad SDK
#[cfg(feature = "evm")]
pub mod evm;
