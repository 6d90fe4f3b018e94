use std::sync::Arc;

use chrono::Utc;
use derive_new::new;
use lenster_core::{
    CollectModuleParams, CreatePostRequest, PostTypedDataProvider, ProfileId,
    ReferenceModuleParams, TypedDataEnvelope,
};
use tracing::{debug, instrument};

use crate::PublisherError;

/// Asks the backend for the typed data of a community post.
#[derive(Debug, Clone, new)]
pub struct TypedDataRequester {
    provider: Arc<dyn PostTypedDataProvider>,
}

impl TypedDataRequester {
    /// Typed data for a post of `content_uri` by `profile_id`, free to
    /// collect and open to references, bound to `nonce`. Expired envelopes
    /// are refused.
    #[instrument(skip(self))]
    pub async fn request(
        &self,
        profile_id: &ProfileId,
        content_uri: &str,
        nonce: u64,
    ) -> Result<TypedDataEnvelope, PublisherError> {
        let request = CreatePostRequest::new(
            profile_id.clone(),
            content_uri.to_owned(),
            CollectModuleParams::FreeCollectModule {
                follower_only: false,
            },
            ReferenceModuleParams {
                follower_only_reference_module: false,
            },
        );
        let envelope = self
            .provider
            .create_post_typed_data(&request, nonce)
            .await
            .map_err(PublisherError::TypedData)?;
        if let Some(expires_at) = envelope.expires_at {
            if envelope.is_expired(Utc::now()) {
                return Err(PublisherError::TypedDataExpired {
                    id: envelope.id,
                    expires_at,
                });
            }
        }
        debug!(id = %envelope.id, deadline = envelope.typed_data.value.deadline, "Typed data received");
        Ok(envelope)
    }
}
