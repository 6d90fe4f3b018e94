use std::sync::Arc;

use chrono::{DateTime, Utc};
use derive_new::new;
use lenster_base::settings::ArweaveConf;
use lenster_core::{
    CommunityDraft, MediaAttachment, MediaFile, MediaStore, MetadataStore, PublicationMetadata,
};
use tracing::{debug, info, instrument};
use url::Url;
use uuid::Uuid;

use crate::PublisherError;

/// The metadata document and where it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedContent {
    /// The uploaded document
    pub metadata: PublicationMetadata,
    /// Canonical retrieval URL, used as the post's `contentURI`
    pub content_uri: String,
}

/// Uploads the avatar and the metadata document of a community.
#[derive(Debug, Clone, new)]
pub struct ContentPreparer {
    media: Arc<dyn MediaStore>,
    metadata: Arc<dyn MetadataStore>,
    arweave: ArweaveConf,
    avatar_placeholder_url: Url,
    app_name: String,
}

impl ContentPreparer {
    /// Upload a selected avatar. Runs when the file is picked, ahead of the
    /// form submission.
    #[instrument(skip(self))]
    pub async fn upload_avatar(&self, file: &MediaFile) -> Result<MediaAttachment, PublisherError> {
        let attachment = self
            .media
            .upload_media(file)
            .await
            .map_err(PublisherError::Upload)?;
        debug!(item = %attachment.item, "Avatar uploaded");
        Ok(attachment)
    }

    /// Generated avatar used when none was uploaded. Unique per call.
    pub fn placeholder_image(&self) -> String {
        format!(
            "{}/{}.png",
            self.avatar_placeholder_url.as_str().trim_end_matches('/'),
            Uuid::new_v4()
        )
    }

    /// Build and store the metadata document of `draft`.
    #[instrument(skip(self, draft), fields(name = draft.name()))]
    pub async fn prepare(
        &self,
        draft: &CommunityDraft,
        now: DateTime<Utc>,
    ) -> Result<PreparedContent, PublisherError> {
        let (image, image_mime_type) = match draft.avatar() {
            Some(avatar) => (avatar.item.clone(), Some(avatar.mime_type.clone())),
            None => (self.placeholder_image(), None),
        };
        let metadata =
            PublicationMetadata::community(draft, image, image_mime_type, &self.app_name, now);

        let id = self
            .metadata
            .upload_metadata(&metadata)
            .await
            .map_err(PublisherError::Upload)?;
        let content_uri = self.arweave.content_uri(&id);
        info!(%content_uri, metadata_id = %metadata.metadata_id, "Metadata uploaded");

        Ok(PreparedContent {
            metadata,
            content_uri,
        })
    }
}
