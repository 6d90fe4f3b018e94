use async_trait::async_trait;
use lenster_core::{
    BroadcastRequest, CreatePostRequest, PaginatedPublications, PostRelayer, PostTypedDataProvider,
    ProfileId, PublicationFeed, PublicationIndexer, PublicationsRequest, RelayResult,
    ServiceResult, TypedDataEnvelope, H256,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{queries, GraphQlClient};

/// The Lens GraphQL backend.
#[derive(Debug, Clone)]
pub struct LensApi {
    client: GraphQlClient,
}

impl LensApi {
    /// Talk to the backend through `client`.
    pub fn new(client: GraphQlClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TypedDataOptions {
    override_sig_nonce: u64,
}

#[derive(Debug, Serialize)]
struct CreatePostTypedDataVars<'a> {
    options: TypedDataOptions,
    request: &'a CreatePostRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePostTypedDataData {
    create_post_typed_data: TypedDataEnvelope,
}

#[derive(Debug, Serialize)]
struct BroadcastVars<'a> {
    request: &'a BroadcastRequest,
}

#[derive(Debug, Deserialize)]
struct BroadcastData {
    broadcast: RelayResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TxHashRequest {
    tx_hash: H256,
}

#[derive(Debug, Serialize)]
struct PublicationVars {
    request: TxHashRequest,
}

#[derive(Debug, Deserialize)]
struct PublicationData {
    publication: Option<PublicationRef>,
}

#[derive(Debug, Deserialize)]
struct PublicationRef {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReactionRequest<'a> {
    profile_id: &'a ProfileId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileFeedVars<'a> {
    request: &'a PublicationsRequest,
    reaction_request: Option<ReactionRequest<'a>>,
    profile_id: Option<&'a ProfileId>,
}

impl<'a> ProfileFeedVars<'a> {
    fn new(request: &'a PublicationsRequest, viewer: Option<&'a ProfileId>) -> Self {
        Self {
            request,
            reaction_request: viewer.map(|profile_id| ReactionRequest { profile_id }),
            profile_id: viewer,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileFeedData {
    publications: PaginatedPublications,
}

#[async_trait]
impl PostTypedDataProvider for LensApi {
    #[instrument(skip(self))]
    async fn create_post_typed_data(
        &self,
        request: &CreatePostRequest,
        nonce: u64,
    ) -> ServiceResult<TypedDataEnvelope> {
        let vars = CreatePostTypedDataVars {
            options: TypedDataOptions {
                override_sig_nonce: nonce,
            },
            request,
        };
        let data: CreatePostTypedDataData = self
            .client
            .execute("CreatePostTypedData", queries::CREATE_POST_TYPED_DATA, &vars)
            .await?;
        debug!(id = %data.create_post_typed_data.id, "Received post typed data");
        Ok(data.create_post_typed_data)
    }
}

#[async_trait]
impl PostRelayer for LensApi {
    #[instrument(skip(self), fields(id = %request.id))]
    async fn broadcast(&self, request: &BroadcastRequest) -> ServiceResult<RelayResult> {
        let data: BroadcastData = self
            .client
            .execute("Broadcast", queries::BROADCAST, &BroadcastVars { request })
            .await?;
        Ok(data.broadcast)
    }
}

#[async_trait]
impl PublicationIndexer for LensApi {
    #[instrument(skip(self))]
    async fn publication_by_tx_hash(&self, tx_hash: H256) -> ServiceResult<Option<String>> {
        let vars = PublicationVars {
            request: TxHashRequest { tx_hash },
        };
        let data: PublicationData = self
            .client
            .execute("Publication", queries::PUBLICATION_BY_TX_HASH, &vars)
            .await?;
        Ok(data.publication.map(|p| p.id))
    }
}

#[async_trait]
impl PublicationFeed for LensApi {
    #[instrument(skip(self, request), fields(profile_id = %request.profile_id, cursor = ?request.cursor))]
    async fn publications(
        &self,
        request: &PublicationsRequest,
        viewer: Option<&ProfileId>,
    ) -> ServiceResult<PaginatedPublications> {
        let vars = ProfileFeedVars::new(request, viewer);
        let data: ProfileFeedData = self
            .client
            .execute("ProfileFeed", queries::PROFILE_FEED, &vars)
            .await?;
        Ok(data.publications)
    }
}

#[cfg(test)]
mod tests {
    use lenster_core::{
        CollectModuleParams, FeedKind, PublicationKind, ReferenceModuleParams,
    };
    use serde_json::json;

    use super::*;

    #[test]
    fn typed_data_vars_override_the_nonce() {
        let request = CreatePostRequest::new(
            ProfileId::new("0x0f"),
            "https://arweave.net/abc".into(),
            CollectModuleParams::default(),
            ReferenceModuleParams::default(),
        );
        let vars = CreatePostTypedDataVars {
            options: TypedDataOptions {
                override_sig_nonce: 7,
            },
            request: &request,
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({
                "options": { "overrideSigNonce": 7 },
                "request": {
                    "profileId": "0x0f",
                    "contentURI": "https://arweave.net/abc",
                    "collectModule": { "freeCollectModule": { "followerOnly": false } },
                    "referenceModule": { "followerOnlyReferenceModule": false }
                }
            })
        );
    }

    #[test]
    fn broadcast_reply_parses_both_outcomes() {
        let relayed: BroadcastData = serde_json::from_value(json!({
            "broadcast": {
                "__typename": "RelayerResult",
                "txHash": "0x5b1e8c0b2f8d9f6b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f70819203",
                "txId": "bb2d2f24-31c1-4ad2-9f5b-9f0f3f5c2e0d"
            }
        }))
        .unwrap();
        assert!(matches!(relayed.broadcast, RelayResult::Relayed { ref tx_id, .. } if tx_id == "bb2d2f24-31c1-4ad2-9f5b-9f0f3f5c2e0d"));

        let failed: BroadcastData = serde_json::from_value(json!({
            "broadcast": { "__typename": "RelayError", "reason": "REJECTED" }
        }))
        .unwrap();
        assert_eq!(
            failed.broadcast,
            RelayResult::Failed {
                reason: "REJECTED".into()
            }
        );
    }

    #[test]
    fn publication_lookup_handles_not_yet_indexed() {
        let vars = PublicationVars {
            request: TxHashRequest {
                tx_hash: H256::repeat_byte(0xab),
            },
        };
        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(
            json["request"]["txHash"],
            format!("0x{}", "ab".repeat(32))
        );

        let pending: PublicationData = serde_json::from_value(json!({ "publication": null })).unwrap();
        assert!(pending.publication.is_none());

        let indexed: PublicationData =
            serde_json::from_value(json!({ "publication": { "id": "0x0f-0x2a" } })).unwrap();
        assert_eq!(indexed.publication.unwrap().id, "0x0f-0x2a");
    }

    #[test]
    fn feed_vars_without_viewer_are_null() {
        let request = PublicationsRequest {
            publication_types: FeedKind::Replies.publication_types(),
            profile_id: ProfileId::new("0x0f"),
            metadata: None,
            limit: 10,
            cursor: None,
        };
        let json = serde_json::to_value(ProfileFeedVars::new(&request, None)).unwrap();
        assert!(json["reactionRequest"].is_null());
        assert!(json["profileId"].is_null());
        assert_eq!(json["request"]["publicationTypes"], json!(["COMMENT"]));

        let viewer = ProfileId::new("0x01");
        let json = serde_json::to_value(ProfileFeedVars::new(&request, Some(&viewer))).unwrap();
        assert_eq!(json["reactionRequest"]["profileId"], "0x01");
        assert_eq!(json["profileId"], "0x01");
    }

    #[test]
    fn feed_reply_parses() {
        let data: ProfileFeedData = serde_json::from_value(json!({
            "publications": {
                "items": [
                    {
                        "__typename": "Post",
                        "id": "0x0f-0x01",
                        "createdAt": "2022-05-31T10:00:00.000Z",
                        "profile": { "id": "0x0f", "handle": "lenster.lens" },
                        "metadata": { "name": "Lenster", "content": "gm" },
                        "reaction": null,
                        "mirrors": []
                    },
                    {
                        "__typename": "Mirror",
                        "id": "0x0f-0x02",
                        "profile": { "id": "0x0f", "handle": "lenster.lens" },
                        "metadata": { "name": null, "content": null }
                    }
                ],
                "pageInfo": { "totalCount": 12, "next": "{\"offset\":10}" }
            }
        }))
        .unwrap();
        assert_eq!(data.publications.items.len(), 2);
        assert_eq!(data.publications.items[1].kind, PublicationKind::Mirror);
        assert_eq!(data.publications.page_info.total_count, 12);
        assert!(data.publications.page_info.next.is_some());
    }
}
