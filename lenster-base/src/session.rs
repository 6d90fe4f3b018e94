use std::sync::Arc;

use lenster_core::ProfileId;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

/// The profile the user is signed in as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Profile id, e.g. `0x0f`
    pub profile_id: ProfileId,
    /// Profile handle
    pub handle: String,
}

/// Everything the pipeline needs to know about the current user.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    identity: Option<Identity>,
    access_token: Option<String>,
    nonce: NonceAuthority,
}

impl SessionContext {
    /// A signed out session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed in session whose nonce counter starts at `nonce`.
    pub fn new(identity: Option<Identity>, access_token: impl Into<String>, nonce: u64) -> Self {
        Self {
            identity,
            access_token: Some(access_token.into()),
            nonce: NonceAuthority::new(nonce),
        }
    }

    /// The selected profile, if the user owns one.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The selected profile id, if the user owns one.
    pub fn profile_id(&self) -> Option<&ProfileId> {
        self.identity.as_ref().map(|i| &i.profile_id)
    }

    /// Bearer token of the backend session.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Signed in means holding an access token.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// The nonce authority of this user. Clones share the same counter.
    pub fn nonce(&self) -> &NonceAuthority {
        &self.nonce
    }
}

/// Owner of the user's signature nonce.
///
/// Submissions reserve the counter for their whole lifetime, so two
/// submissions never sign with the same nonce.
#[derive(Debug, Clone, Default)]
pub struct NonceAuthority {
    next: Arc<Mutex<u64>>,
}

impl NonceAuthority {
    /// Start counting at `nonce`.
    pub fn new(nonce: u64) -> Self {
        Self {
            next: Arc::new(Mutex::new(nonce)),
        }
    }

    /// Wait for exclusive use of the counter.
    pub async fn reserve(&self) -> NonceReservation {
        let guard = self.next.clone().lock_owned().await;
        debug!(nonce = *guard, "Reserved signature nonce");
        NonceReservation { guard }
    }

    /// The nonce the next submission will use.
    pub async fn current(&self) -> u64 {
        *self.next.lock().await
    }

    /// Reset the counter to the value reported by the backend.
    pub async fn resync(&self, nonce: u64) {
        let mut next = self.next.lock().await;
        if *next != nonce {
            info!(old = *next, new = nonce, "Resynced signature nonce");
        }
        *next = nonce;
    }
}

/// Exclusive hold on the nonce counter. Dropping it without
/// [`commit`](Self::commit) leaves the counter untouched.
#[derive(Debug)]
pub struct NonceReservation {
    guard: OwnedMutexGuard<u64>,
}

impl NonceReservation {
    /// The reserved nonce.
    pub fn nonce(&self) -> u64 {
        *self.guard
    }

    /// Mark the nonce as used by a transaction.
    pub fn commit(mut self) -> u64 {
        let used = *self.guard;
        *self.guard = used.saturating_add(1);
        used
    }
}
