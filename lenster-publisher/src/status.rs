use std::sync::Arc;
use std::time::Duration;

use derive_new::new;
use lenster_core::{PublicationIndexer, SubmissionResult, H256};
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use crate::PublisherError;

const PENDING_MESSAGE: &str = "Community creation in progress, please wait!";
const INDEXED_MESSAGE: &str = "Community created successfully";

/// Shown while the indexer has not caught up with the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingIndicator {
    /// Transaction being watched
    pub tx_hash: H256,
    /// User facing message
    pub message: &'static str,
}

/// Shown once the indexer reports the publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indexed {
    /// Publication id, e.g. `0x0f-0x2a`
    pub publication_id: String,
    /// Route of the new community
    pub path: String,
    /// User facing message
    pub message: &'static str,
}

/// The hash to watch: the direct one when there is one, else the relayed one.
pub fn active_hash(direct: Option<H256>, relayed: Option<H256>) -> Option<H256> {
    direct.or(relayed)
}

/// Follows a submitted transaction until its publication is indexed.
#[derive(Debug, Clone, new)]
pub struct StatusPresenter {
    indexer: Arc<dyn PublicationIndexer>,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl StatusPresenter {
    /// Indicator for a fresh submission.
    pub fn pending(&self, result: &SubmissionResult) -> PendingIndicator {
        PendingIndicator {
            tx_hash: result.tx_hash(),
            message: PENDING_MESSAGE,
        }
    }

    /// Poll the indexer until the publication shows up.
    #[instrument(skip(self, result), fields(tx_hash = ?result.tx_hash()))]
    pub async fn watch(&self, result: &SubmissionResult) -> Result<Indexed, PublisherError> {
        let tx_hash = result.tx_hash();
        let started = Instant::now();
        loop {
            let found = self
                .indexer
                .publication_by_tx_hash(tx_hash)
                .await
                .map_err(PublisherError::Indexing)?;
            if let Some(publication_id) = found {
                info!(%publication_id, "Community indexed");
                return Ok(Indexed {
                    path: format!("/communities/{publication_id}"),
                    publication_id,
                    message: INDEXED_MESSAGE,
                });
            }

            let waited = started.elapsed();
            if let Some(timeout) = self.timeout {
                if waited >= timeout {
                    return Err(PublisherError::IndexingTimedOut { tx_hash, waited });
                }
            }
            debug!(?waited, "Not indexed yet");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use lenster_core::ServiceError;
    use mockall::Sequence;

    use super::*;
    use crate::tests::MockIndexer;

    fn direct(byte: u8) -> SubmissionResult {
        SubmissionResult::Direct {
            tx_hash: H256::repeat_byte(byte),
        }
    }

    #[test]
    fn direct_hash_wins() {
        let direct = H256::repeat_byte(1);
        let relayed = H256::repeat_byte(2);
        assert_eq!(active_hash(Some(direct), Some(relayed)), Some(direct));
        assert_eq!(active_hash(None, Some(relayed)), Some(relayed));
        assert_eq!(active_hash(None, None), None);
    }

    #[test]
    fn pending_indicator() {
        let presenter = StatusPresenter::new(Arc::new(MockIndexer::new()), Duration::from_secs(1), None);
        let pending = presenter.pending(&direct(3));
        assert_eq!(pending.tx_hash, H256::repeat_byte(3));
        assert_eq!(pending.message, "Community creation in progress, please wait!");
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_indexed() {
        let mut indexer = MockIndexer::new();
        let mut seq = Sequence::new();
        indexer
            .expect_publication_by_tx_hash()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        indexer
            .expect_publication_by_tx_hash()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some("0x0f-0x2a".to_owned())));

        let presenter = StatusPresenter::new(Arc::new(indexer), Duration::from_secs(1), None);
        let indexed = presenter.watch(&direct(4)).await.unwrap();
        assert_eq!(indexed.publication_id, "0x0f-0x2a");
        assert_eq!(indexed.path, "/communities/0x0f-0x2a");
        assert_eq!(indexed.message, "Community created successfully");
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_timeout() {
        let mut indexer = MockIndexer::new();
        indexer
            .expect_publication_by_tx_hash()
            .returning(|_| Ok(None));

        let presenter = StatusPresenter::new(
            Arc::new(indexer),
            Duration::from_secs(1),
            Some(Duration::from_secs(3)),
        );
        let err = presenter.watch(&direct(5)).await.unwrap_err();
        assert!(matches!(err, PublisherError::IndexingTimedOut { .. }));
    }

    #[tokio::test]
    async fn indexer_errors_stop_watching() {
        let mut indexer = MockIndexer::new();
        indexer
            .expect_publication_by_tx_hash()
            .times(1)
            .returning(|_| Err(ServiceError::UnexpectedResponse("bad".into())));

        let presenter = StatusPresenter::new(Arc::new(indexer), Duration::from_secs(1), None);
        assert!(matches!(
            presenter.watch(&direct(6)).await,
            Err(PublisherError::Indexing(_))
        ));
    }
}
