use std::sync::Arc;

use eyre::{eyre, Context, Result};
use lenster_api::{ArweaveMetadataStore, GraphQlClient, IpfsMediaStore, LensApi};
use lenster_base::{settings::SignerConf, SessionContext, Settings};
use lenster_ethereum::{LensHubPostSubmitter, LocalTypedDataSigner};
use prometheus::Registry;
use tracing::info;

use crate::{
    CommunityCreator, ContentPreparer, PostSigner, ProfileFeed, PublisherMetrics, StatusPresenter,
    SubmissionDispatcher, TypedDataRequester,
};

/// Everything a signed in user needs: community creation, the status of a
/// submission and profile feeds.
#[derive(Debug)]
pub struct LensterClient {
    /// Community creation pipeline
    pub creator: CommunityCreator,
    /// Follows submitted transactions until indexed
    pub status: StatusPresenter,
    /// Profile feeds
    pub feed: ProfileFeed,
}

impl LensterClient {
    /// Wire the HTTP clients, the wallet and the chain connection described
    /// by `settings`. The session's access token authenticates backend calls.
    pub fn from_settings(
        settings: &Settings,
        session: &SessionContext,
        registry: Registry,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Building HTTP client")?;

        let mut graphql = GraphQlClient::new(http.clone(), settings.api_url.clone());
        if let Some(token) = session.access_token() {
            graphql = graphql.with_access_token(token);
        }
        let api = Arc::new(LensApi::new(graphql));

        let signer = match &settings.signer {
            Some(SignerConf::HexKey { key }) => {
                LocalTypedDataSigner::from_key(*key, settings.chain.chain_id)
                    .context("Building signer")?
            }
            None => return Err(eyre!("A signer is required to create communities")),
        };
        let submitter = LensHubPostSubmitter::connect_http(
            &settings.chain.rpc_url,
            &signer,
            settings.chain.lens_hub_proxy,
        )
        .context("Connecting to the hub contract")?;

        let metrics = PublisherMetrics::new(registry).context("Registering metrics")?;
        let preparer = ContentPreparer::new(
            Arc::new(IpfsMediaStore::new(
                http.clone(),
                settings.ipfs.api_url.clone(),
            )),
            Arc::new(ArweaveMetadataStore::new(
                http,
                settings.arweave.upload_url.clone(),
            )),
            settings.arweave.clone(),
            settings.avatar_placeholder_url.clone(),
            settings.app_name.clone(),
        );
        let creator = CommunityCreator::new(
            preparer,
            TypedDataRequester::new(api.clone()),
            PostSigner::new(Arc::new(signer)),
            SubmissionDispatcher::new(
                api.clone(),
                Arc::new(submitter),
                settings.relay_on,
                metrics.clone(),
            ),
            metrics,
        );

        info!(
            relay_on = settings.relay_on,
            chain_id = settings.chain.chain_id,
            api_url = %settings.api_url,
            "Lenster client ready"
        );
        Ok(Self {
            creator,
            status: StatusPresenter::new(
                api.clone(),
                settings.indexing.poll_interval,
                settings.indexing.timeout,
            ),
            feed: ProfileFeed::new(api, settings.feed.page_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lenster_base::{
        settings::{ArweaveConf, ChainConf, FeedConf, IndexingConf, IpfsConf, TracingConfig},
        Identity,
    };
    use lenster_core::{FeedKind, ProfileId, H256};
    use url::Url;

    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn settings(signer: Option<SignerConf>) -> Settings {
        Settings {
            app_name: "Lenster".into(),
            relay_on: true,
            api_url: url("https://api-mumbai.lens.dev"),
            avatar_placeholder_url: url("https://avatar.tobi.sh"),
            ipfs: IpfsConf {
                api_url: url("https://ipfs.infura.io:5001"),
            },
            arweave: ArweaveConf {
                upload_url: url("https://lenster.xyz/api/metadata/upload"),
                gateway: url("https://arweave.net"),
            },
            chain: ChainConf {
                rpc_url: url("http://127.0.0.1:8545"),
                chain_id: 80001,
                lens_hub_proxy: "0x60ae865ee4c725cd04353b5aab364553f56cef82"
                    .parse()
                    .unwrap(),
            },
            signer,
            indexing: IndexingConf {
                poll_interval: Duration::from_secs(1),
                timeout: None,
            },
            feed: FeedConf { page_size: 10 },
            tracing: TracingConfig::default(),
        }
    }

    fn hex_key() -> SignerConf {
        SignerConf::HexKey {
            key: "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                .parse::<H256>()
                .unwrap(),
        }
    }

    fn session() -> SessionContext {
        SessionContext::new(
            Some(Identity {
                profile_id: ProfileId::new("0x0f"),
                handle: "lenster.lens".into(),
            }),
            "token",
            0,
        )
    }

    #[test]
    fn wires_every_stage() {
        let registry = Registry::new();
        let client =
            LensterClient::from_settings(&settings(Some(hex_key())), &session(), registry.clone())
                .unwrap();

        assert!(!client.creator.is_in_flight());
        let pager = client
            .feed
            .pager(FeedKind::Feed, Some(ProfileId::new("0x0f")), None);
        assert!(pager.items().is_empty());
        assert!(client
            .creator
            .preparer()
            .placeholder_image()
            .starts_with("https://avatar.tobi.sh/"));
    }

    #[test]
    fn signer_is_required() {
        let err = LensterClient::from_settings(&settings(None), &session(), Registry::new())
            .unwrap_err();
        assert!(err.to_string().contains("signer is required"));
    }

    #[test]
    fn metrics_register_once_per_registry() {
        let registry = Registry::new();
        LensterClient::from_settings(&settings(Some(hex_key())), &session(), registry.clone())
            .unwrap();
        assert!(
            LensterClient::from_settings(&settings(Some(hex_key())), &session(), registry).is_err()
        );
    }
}
