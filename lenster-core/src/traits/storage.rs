use std::fmt::Debug;

use async_trait::async_trait;
use auto_impl::auto_impl;

use crate::{MediaAttachment, MediaFile, PublicationMetadata, ServiceResult};

/// Content addressed store for user media (IPFS).
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait MediaStore: Send + Sync + Debug {
    /// Upload a file, returning its content address and MIME type.
    async fn upload_media(&self, file: &MediaFile) -> ServiceResult<MediaAttachment>;
}

/// Permanent, write-once store for publication metadata (Arweave).
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait MetadataStore: Send + Sync + Debug {
    /// Upload a metadata document, returning its id in the store.
    async fn upload_metadata(&self, metadata: &PublicationMetadata) -> ServiceResult<String>;
}
