use std::fmt::Debug;

use async_trait::async_trait;
use auto_impl::auto_impl;

use crate::{Address, Signature, TypedDataEnvelope};

/// An error incurred by a signer
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct TypedDataSignerError(#[from] Box<dyn std::error::Error + Send + Sync>);

/// The agent holding the user's key. Signs EIP-712 typed data without
/// broadcasting anything.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait TypedDataSigner: Send + Sync + Debug {
    /// The signer's address
    fn address(&self) -> Address;

    /// Sign the typed data of an envelope. The user may refuse.
    async fn sign_typed_data(
        &self,
        envelope: &TypedDataEnvelope,
    ) -> Result<Signature, TypedDataSignerError>;
}
