use std::sync::Arc;

use derive_new::new;
use lenster_core::{SignedPost, TypedDataEnvelope, TypedDataSigner, TypedDataSignerError};
use tracing::{instrument, warn};

use crate::PublisherError;

/// Gets the user's signature over typed data and assembles the submission.
#[derive(Debug, Clone, new)]
pub struct PostSigner {
    signer: Arc<dyn TypedDataSigner>,
}

impl PostSigner {
    /// Sign the envelope. A refusal aborts the pipeline; nothing is
    /// submitted.
    #[instrument(skip(self, envelope), fields(id = %envelope.id))]
    pub async fn sign(&self, envelope: &TypedDataEnvelope) -> Result<SignedPost, PublisherError> {
        let signature = self
            .signer
            .sign_typed_data(envelope)
            .await
            .map_err(|err| {
                warn!(error = %err, "Typed data was not signed");
                PublisherError::Signing(err)
            })?;
        SignedPost::assemble(envelope, &signature)
            .map_err(|err| PublisherError::Signing(TypedDataSignerError::from(boxed(err))))
    }
}

fn boxed<E: std::error::Error + Send + Sync + 'static>(
    err: E,
) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(err)
}
