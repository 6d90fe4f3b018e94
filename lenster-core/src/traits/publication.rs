use std::fmt::Debug;

use async_trait::async_trait;
use auto_impl::auto_impl;

use crate::{
    BroadcastRequest, CreatePostRequest, PaginatedPublications, ProfileId, PublicationsRequest,
    RelayResult, ServiceResult, TypedDataEnvelope, H256,
};

/// Backend that builds the typed data for a post.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait PostTypedDataProvider: Send + Sync + Debug {
    /// Ask for the typed data of a post, bound to `nonce`.
    async fn create_post_typed_data(
        &self,
        request: &CreatePostRequest,
        nonce: u64,
    ) -> ServiceResult<TypedDataEnvelope>;
}

/// Meta-transaction relay that pays gas on the user's behalf.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait PostRelayer: Send + Sync + Debug {
    /// Hand a signed typed data id to the relay.
    async fn broadcast(&self, request: &BroadcastRequest) -> ServiceResult<RelayResult>;
}

/// Indexer that turns transactions into publications.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait PublicationIndexer: Send + Sync + Debug {
    /// Id of the publication created by `tx_hash`, `None` while it is not
    /// indexed yet.
    async fn publication_by_tx_hash(&self, tx_hash: H256) -> ServiceResult<Option<String>>;
}

/// Source of profile feeds.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait PublicationFeed: Send + Sync + Debug {
    /// Fetch one page of publications. `viewer` is the signed in profile, used
    /// to resolve reactions.
    async fn publications(
        &self,
        request: &PublicationsRequest,
        viewer: Option<&ProfileId>,
    ) -> ServiceResult<PaginatedPublications>;
}
