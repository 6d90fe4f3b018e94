use std::fmt::{Display, Formatter};
use std::sync::Arc;

use derive_new::new;
use lenster_core::{
    BroadcastRequest, PostRelayer, PostSubmitter, RelayResult, SignedPost, SubmissionResult,
};
use tracing::{debug, info, instrument, warn};

use crate::{PublisherError, PublisherMetrics};

/// Where a submission is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Signed, nothing sent yet
    AwaitingDispatch,
    /// Handed to the relay
    RelayAttempted,
    /// The relay sent the transaction
    RelaySucceeded,
    /// The relay declined with a reason
    RelayFailed,
    /// Sent from the user's wallet
    DirectSubmitted,
    /// Stopped on an error
    Aborted,
}

impl DispatchState {
    /// Whether no further transition can happen
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::RelaySucceeded | Self::DirectSubmitted | Self::Aborted
        )
    }
}

impl Display for DispatchState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A submission that produced a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Which path carried the transaction and its hash
    pub result: SubmissionResult,
    /// `RelaySucceeded` or `DirectSubmitted`
    pub final_state: DispatchState,
    /// Reason the relay gave before falling back, if it did
    pub relay_failure: Option<String>,
}

/// Sends a signed post through the relay, or from the user's wallet when
/// the relay is off or declines.
#[derive(Debug, Clone, new)]
pub struct SubmissionDispatcher {
    relayer: Arc<dyn PostRelayer>,
    submitter: Arc<dyn PostSubmitter>,
    relay_on: bool,
    metrics: PublisherMetrics,
}

struct Transitions {
    state: DispatchState,
}

impl Transitions {
    fn new() -> Self {
        Self {
            state: DispatchState::AwaitingDispatch,
        }
    }

    fn to(&mut self, next: DispatchState) {
        debug!(from = %self.state, to = %next, "Dispatch transition");
        self.state = next;
    }

    fn abort(&mut self, err: PublisherError) -> PublisherError {
        warn!(from = %self.state, error = %err, "Dispatch aborted");
        self.state = DispatchState::Aborted;
        err
    }
}

impl SubmissionDispatcher {
    /// Whether posts go through the relay first
    pub fn relay_on(&self) -> bool {
        self.relay_on
    }

    /// Submit `signed` exactly once. The direct path runs only when the relay
    /// is off or answered with a reason; any other relay error aborts.
    #[instrument(skip(self, signed), fields(id = %signed.typed_data_id, relay_on = self.relay_on))]
    pub async fn dispatch(&self, signed: &SignedPost) -> Result<DispatchOutcome, PublisherError> {
        let mut transitions = Transitions::new();
        let mut relay_failure = None;

        if self.relay_on {
            transitions.to(DispatchState::RelayAttempted);
            let request = BroadcastRequest::new(signed.typed_data_id.clone(), signed.signature.clone());
            let reply = self
                .relayer
                .broadcast(&request)
                .await
                .map_err(|err| transitions.abort(PublisherError::Relay(err)))?;

            match reply {
                RelayResult::Relayed { tx_hash, tx_id } => {
                    transitions.to(DispatchState::RelaySucceeded);
                    info!(?tx_hash, %tx_id, "Post relayed");
                    self.metrics.record_submission(true);
                    return Ok(DispatchOutcome {
                        result: SubmissionResult::Relayed { tx_hash, tx_id },
                        final_state: transitions.state,
                        relay_failure: None,
                    });
                }
                RelayResult::Failed { reason } => {
                    transitions.to(DispatchState::RelayFailed);
                    warn!(%reason, "Relay declined, submitting from wallet");
                    self.metrics.relay_fallbacks.inc();
                    relay_failure = Some(reason);
                }
            }
        }

        let tx_hash = self
            .submitter
            .post_with_sig(&signed.vars)
            .await
            .map_err(|err| transitions.abort(PublisherError::DirectSubmission(err)))?;
        transitions.to(DispatchState::DirectSubmitted);
        info!(?tx_hash, "Post submitted from wallet");
        self.metrics.record_submission(false);

        Ok(DispatchOutcome {
            result: SubmissionResult::Direct { tx_hash },
            final_state: transitions.state,
            relay_failure,
        })
    }
}
