//! HTTP clients for the services behind Lenster: the Lens GraphQL backend
//! (typed data, relay, indexer, feeds), the IPFS media store and the
//! Arweave metadata store.

#![warn(missing_docs)]
#![deny(clippy::unwrap_used, clippy::panic)]
#![forbid(unsafe_code)]

pub use error::LensApiError;
pub use graphql::GraphQlClient;
pub use lens::LensApi;
pub use storage::{ArweaveMetadataStore, IpfsMediaStore};

mod error;
mod graphql;
mod lens;
mod storage;

/// GraphQL documents sent to the backend
pub mod queries;
