use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use derive_new::new;
use lenster_base::SessionContext;
use lenster_core::{CommunityDraft, NewCommunity};
use tracing::{info, instrument, warn};

use crate::{
    ContentPreparer, DispatchOutcome, PostSigner, PublisherError, PublisherMetrics,
    SubmissionDispatcher, TypedDataRequester,
};

/// Runs the community creation stages in order: upload, typed data, sign,
/// submit.
#[derive(Debug, new)]
pub struct CommunityCreator {
    preparer: ContentPreparer,
    requester: TypedDataRequester,
    signer: PostSigner,
    dispatcher: SubmissionDispatcher,
    metrics: PublisherMetrics,
    #[new(default)]
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the run ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CommunityCreator {
    /// The content stage, for uploading an avatar as soon as it is picked.
    pub fn preparer(&self) -> &ContentPreparer {
        &self.preparer
    }

    /// Whether a creation is running
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Create a community from the form input.
    ///
    /// Input is validated and the session checked before anything leaves
    /// the process. The session nonce is consumed only when a transaction
    /// hash comes back.
    #[instrument(skip_all, fields(name = %input.name))]
    pub async fn create(
        &self,
        session: &SessionContext,
        input: NewCommunity,
    ) -> Result<DispatchOutcome, PublisherError> {
        let res = self.run(session, input).await;
        if let Err(err) = &res {
            warn!(error = %err, stage = err.stage().as_str(), "Community creation failed");
            self.metrics.record_failure(err.stage());
        }
        res
    }

    async fn run(
        &self,
        session: &SessionContext,
        input: NewCommunity,
    ) -> Result<DispatchOutcome, PublisherError> {
        let draft = CommunityDraft::validate(input)?;
        if !session.is_authenticated() {
            return Err(PublisherError::NotAuthenticated);
        }
        let profile_id = session
            .profile_id()
            .ok_or(PublisherError::MissingProfile)?;
        let _in_flight =
            InFlight::acquire(&self.in_flight).ok_or(PublisherError::SubmissionInFlight)?;

        let content = self.preparer.prepare(&draft, Utc::now()).await?;

        let reservation = session.nonce().reserve().await;
        let envelope = self
            .requester
            .request(profile_id, &content.content_uri, reservation.nonce())
            .await?;
        let signed = self.signer.sign(&envelope).await?;
        let outcome = self.dispatcher.dispatch(&signed).await?;

        let used = reservation.commit();
        info!(
            event = "community_new",
            %profile_id,
            tx_hash = ?outcome.result.tx_hash(),
            nonce = used,
            relayed = outcome.result.is_relayed(),
            "Community submitted"
        );
        Ok(outcome)
    }
}
