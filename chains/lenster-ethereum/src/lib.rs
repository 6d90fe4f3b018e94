//! Ethereum side of Lenster: signing EIP-712 typed data with a local key and
//! calling `postWithSig` on the LensHub proxy.

#![warn(missing_docs)]
#![deny(clippy::unwrap_used, clippy::panic)]
#![forbid(unsafe_code)]

pub use error::*;
pub use hub::*;
pub use signer::*;

mod error;
mod hub;
mod signer;
