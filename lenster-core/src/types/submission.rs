use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::H256;

/// Request body of a relay broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct BroadcastRequest {
    /// Typed data id handed out by the backend
    pub id: String,
    /// `0x` prefixed signature over the typed data
    pub signature: String,
}

/// What the relay answered.
///
/// A response carrying `reason` is the relay declining the job; this is the
/// only case in which the caller falls back to a direct submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelayResult {
    /// The relay accepted and sent the transaction
    #[serde(rename_all = "camelCase")]
    Relayed {
        /// Hash of the relayed transaction
        tx_hash: H256,
        /// Relay side job id
        tx_id: String,
    },
    /// The relay refused the job
    Failed {
        /// Relay supplied failure reason, e.g. `NOT_ALLOWED`
        reason: String,
    },
}

/// How a post ended up on chain. Exactly one path is taken per draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionResult {
    /// Sent by the relay on the user's behalf
    Relayed {
        /// Hash of the relayed transaction
        tx_hash: H256,
        /// Relay side job id
        tx_id: String,
    },
    /// Sent by the user's own wallet
    Direct {
        /// Hash of the transaction
        tx_hash: H256,
    },
}

impl SubmissionResult {
    /// The transaction hash, whichever path produced it
    pub fn tx_hash(&self) -> H256 {
        match self {
            Self::Relayed { tx_hash, .. } | Self::Direct { tx_hash } => *tx_hash,
        }
    }

    /// Whether the relay carried the transaction
    pub fn is_relayed(&self) -> bool {
        matches!(self, Self::Relayed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relayed_reply_parses() {
        let json = r#"{
            "__typename": "RelayerResult",
            "txHash": "0x053d975549b9298bb7672b20d3f7c0960df00d065e6f68c29abd8550b31cdbc2",
            "txId": "0x0a"
        }"#;
        let parsed: RelayResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed,
            RelayResult::Relayed {
                tx_hash: "0x053d975549b9298bb7672b20d3f7c0960df00d065e6f68c29abd8550b31cdbc2"
                    .parse()
                    .unwrap(),
                tx_id: "0x0a".into(),
            }
        );
    }

    #[test]
    fn relay_error_reply_parses() {
        let json = r#"{ "__typename": "RelayError", "reason": "REJECTED" }"#;
        let parsed: RelayResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed,
            RelayResult::Failed {
                reason: "REJECTED".into()
            }
        );
    }

    #[test]
    fn tx_hash_from_either_path() {
        let hash = H256::repeat_byte(0xab);
        assert_eq!(SubmissionResult::Direct { tx_hash: hash }.tx_hash(), hash);
        let relayed = SubmissionResult::Relayed {
            tx_hash: hash,
            tx_id: "1".into(),
        };
        assert_eq!(relayed.tx_hash(), hash);
        assert!(relayed.is_relayed());
    }
}
