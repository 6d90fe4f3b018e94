use ethers::{signers::WalletError, types::transaction::eip712::Eip712Error};
use lenster_core::{ServiceError, TypedDataSignerError};

/// Errors from the Ethereum integration
#[derive(Debug, thiserror::Error)]
pub enum LensterEthereumError {
    /// Key or signing failure of the local wallet
    #[error(transparent)]
    Wallet(#[from] WalletError),
    /// Typed data that cannot be EIP-712 encoded
    #[error(transparent)]
    TypedData(#[from] Eip712Error),
    /// The typed data targets another chain than the wallet
    #[error("Typed data is for chain {typed_data} but the wallet signs for chain {wallet}")]
    ChainIdMismatch {
        /// Chain id of the typed data domain
        typed_data: u64,
        /// Chain id of the wallet
        wallet: u64,
    },
    /// The RPC url is not usable
    #[error("Invalid RPC url: {0}")]
    InvalidRpcUrl(String),
}

impl From<LensterEthereumError> for ServiceError {
    fn from(value: LensterEthereumError) -> Self {
        ServiceError::from_other(value)
    }
}

impl From<LensterEthereumError> for TypedDataSignerError {
    fn from(value: LensterEthereumError) -> Self {
        TypedDataSignerError::from(Box::new(value) as Box<dyn std::error::Error + Send + Sync>)
    }
}
