use std::time::Duration;

use chrono::{DateTime, Utc};
use lenster_core::{ServiceError, TypedDataSignerError, ValidationError, H256};

/// Pipeline stage an error happened in, used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Form validation and session checks
    Validation,
    /// Media or metadata upload
    Upload,
    /// Typed data request
    TypedData,
    /// Wallet signature
    Signing,
    /// Relay or direct submission
    Submission,
    /// Waiting for the indexer
    Indexing,
}

impl PipelineStage {
    /// Label value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Upload => "upload",
            Self::TypedData => "typed_data",
            Self::Signing => "signing",
            Self::Submission => "submission",
            Self::Indexing => "indexing",
        }
    }
}

/// Everything that can stop a community from being created.
#[derive(Debug, thiserror::Error)]
pub enum PublisherError {
    /// A form field is out of bounds
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No wallet session
    #[error("Please sign in your wallet.")]
    NotAuthenticated,
    /// Signed in, but without a profile to post from
    #[error("Select a profile before creating a community")]
    MissingProfile,
    /// Another creation is still running for this session
    #[error("A community is already being created")]
    SubmissionInFlight,
    /// Media or metadata could not be stored
    #[error("Upload failed: {0}")]
    Upload(#[source] ServiceError),
    /// The backend did not hand out typed data
    #[error("Could not create typed data: {0}")]
    TypedData(#[source] ServiceError),
    /// The backend handed out typed data that can no longer be broadcast
    #[error("Typed data {id} expired at {expires_at}")]
    TypedDataExpired {
        /// Backend id of the typed data
        id: String,
        /// When it stopped being accepted
        expires_at: DateTime<Utc>,
    },
    /// The wallet refused or failed to sign
    #[error("Signing failed: {0}")]
    Signing(#[source] TypedDataSignerError),
    /// The relay failed without giving a reason
    #[error("Relay failed: {0}")]
    Relay(#[source] ServiceError),
    /// The transaction could not be sent from the user's wallet
    #[error("Transaction failed: {0}")]
    DirectSubmission(#[source] ServiceError),
    /// The indexer could not be queried
    #[error("Indexer lookup failed: {0}")]
    Indexing(#[source] ServiceError),
    /// The indexer did not report the publication in time
    #[error("Publication for {tx_hash:?} not indexed after {waited:?}")]
    IndexingTimedOut {
        /// Transaction being watched
        tx_hash: H256,
        /// How long we waited
        waited: Duration,
    },
}

impl PublisherError {
    /// Stage the error belongs to
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Validation(_)
            | Self::NotAuthenticated
            | Self::MissingProfile
            | Self::SubmissionInFlight => PipelineStage::Validation,
            Self::Upload(_) => PipelineStage::Upload,
            Self::TypedData(_) | Self::TypedDataExpired { .. } => PipelineStage::TypedData,
            Self::Signing(_) => PipelineStage::Signing,
            Self::Relay(_) | Self::DirectSubmission(_) => PipelineStage::Submission,
            Self::Indexing(_) | Self::IndexingTimedOut { .. } => PipelineStage::Indexing,
        }
    }
}
