//! Settings for the Lenster client.
//!
//! ### Configuration
//!
//! Settings are read from config files, then from the environment.
//!
//! #### N.B.: Environment variable names correspond 1:1 with the config file's JSON hierarchy.
//!
//! Any environment variable prefixed with `LENSTER_` overrides the value at
//! the matching path, with `__` separating nesting levels. For example, if
//! `config/default.json` is:
//!
//! ```json
//! {
//!   "relay_on": true,
//!   "chain": {
//!     "chain_id": 137,
//!     ...
//!   },
//! }
//! ```
//!
//! then `LENSTER_RELAY_ON=false` turns the relay off and
//! `LENSTER_CHAIN__CHAIN_ID=80001` points the client at another chain.
//!
//! ### Configuration value precedence
//!
//! Later sources take precedence:
//!
//! 1. Every `*.json` file in the config directory (`./config` by default).
//! 2. The files listed in `CONFIG_FILES`, in order.
//! 3. `LENSTER_` environment variables.

use std::time::Duration;

use eyre::{eyre, Context, Result};
use lenster_core::{Address, H256};
use serde::Deserialize;
use url::Url;

pub use trace::*;

pub mod loader;
/// Tracing subscriber management
mod trace;

const DEFAULT_APP_NAME: &str = "Lenster";
const DEFAULT_AVATAR_PLACEHOLDER_URL: &str = "https://avatar.tobi.sh";
const DEFAULT_ARWEAVE_GATEWAY: &str = "https://arweave.net";
const DEFAULT_INDEXING_POLL_INTERVAL_MS: u64 = 1000;
const DEFAULT_FEED_PAGE_SIZE: u32 = 10;

/// Fully parsed client settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Application name, stamped into metadata as `<name> Community`
    pub app_name: String,
    /// Submit through the meta-transaction relay when true
    pub relay_on: bool,
    /// GraphQL endpoint of the backend
    pub api_url: Url,
    /// Base of the generated placeholder avatars
    pub avatar_placeholder_url: Url,
    /// Media store
    pub ipfs: IpfsConf,
    /// Metadata store
    pub arweave: ArweaveConf,
    /// Chain connection
    pub chain: ChainConf,
    /// Local signer, if any
    pub signer: Option<SignerConf>,
    /// Indexer polling
    pub indexing: IndexingConf,
    /// Feed paging
    pub feed: FeedConf,
    /// The tracing configuration
    pub tracing: TracingConfig,
}

impl Settings {
    /// Load settings from `./config`, `CONFIG_FILES` and the environment.
    pub fn load() -> Result<Self> {
        loader::load_settings("./config")
    }
}

/// IPFS media store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpfsConf {
    /// HTTP API base, `/api/v0/add` is appended
    pub api_url: Url,
}

/// Arweave metadata store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArweaveConf {
    /// Endpoint accepting metadata documents
    pub upload_url: Url,
    /// Gateway serving stored documents
    pub gateway: Url,
}

impl ArweaveConf {
    /// Canonical retrieval URL of a stored document.
    pub fn content_uri(&self, id: &str) -> String {
        format!("{}/{}", self.gateway.as_str().trim_end_matches('/'), id)
    }
}

/// Chain the hub contract lives on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConf {
    /// JSON-RPC endpoint
    pub rpc_url: Url,
    /// Chain id
    pub chain_id: u64,
    /// Address of the hub proxy exposing `postWithSig`
    pub lens_hub_proxy: Address,
}

/// Signer configuration.
#[derive(Clone, PartialEq, Eq)]
pub enum SignerConf {
    /// A local hex key
    HexKey {
        /// Private key value
        key: H256,
    },
}

impl std::fmt::Debug for SignerConf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HexKey { .. } => f.write_str("HexKey { key: <redacted> }"),
        }
    }
}

/// Indexer polling configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingConf {
    /// Delay between two lookups
    pub poll_interval: Duration,
    /// Give up waiting after this long, never when `None`
    pub timeout: Option<Duration>,
}

/// Feed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConf {
    /// Publications per page
    pub page_size: u32,
}

/// Settings as deserialized from the config sources, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    app_name: Option<String>,
    relay_on: Option<bool>,
    api_url: Option<String>,
    avatar_placeholder_url: Option<String>,
    ipfs: RawIpfsConf,
    arweave: RawArweaveConf,
    chain: RawChainConf,
    signer: Option<RawSignerConf>,
    indexing: RawIndexingConf,
    feed: RawFeedConf,
    tracing: TracingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIpfsConf {
    api_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawArweaveConf {
    upload_url: Option<String>,
    gateway: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawChainConf {
    rpc_url: Option<String>,
    chain_id: Option<u64>,
    lens_hub_proxy: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawSignerConf {
    #[serde(rename = "type")]
    signer_type: Option<String>,
    key: Option<String>,
}

impl std::fmt::Debug for RawSignerConf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawSignerConf")
            .field("signer_type", &self.signer_type)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIndexingConf {
    poll_interval_ms: Option<u64>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFeedConf {
    page_size: Option<u32>,
}

fn parse_url(value: Option<String>, default: Option<&str>, key: &str) -> Result<Url> {
    let value = value
        .as_deref()
        .or(default)
        .ok_or_else(|| eyre!("Missing `{key}`"))?;
    Url::parse(value).with_context(|| format!("Invalid url for `{key}`: {value}"))
}

impl TryFrom<RawSettings> for Settings {
    type Error = eyre::Report;

    fn try_from(raw: RawSettings) -> Result<Self> {
        let ipfs = IpfsConf {
            api_url: parse_url(raw.ipfs.api_url, None, "ipfs.api_url")?,
        };
        let arweave = ArweaveConf {
            upload_url: parse_url(raw.arweave.upload_url, None, "arweave.upload_url")?,
            gateway: parse_url(
                raw.arweave.gateway,
                Some(DEFAULT_ARWEAVE_GATEWAY),
                "arweave.gateway",
            )?,
        };

        let lens_hub_proxy = raw
            .chain
            .lens_hub_proxy
            .ok_or_else(|| eyre!("Missing `chain.lens_hub_proxy`"))?;
        let chain = ChainConf {
            rpc_url: parse_url(raw.chain.rpc_url, None, "chain.rpc_url")?,
            chain_id: raw
                .chain
                .chain_id
                .ok_or_else(|| eyre!("Missing `chain.chain_id`"))?,
            lens_hub_proxy: lens_hub_proxy
                .parse()
                .with_context(|| format!("Invalid `chain.lens_hub_proxy`: {lens_hub_proxy}"))?,
        };

        let signer = raw.signer.map(SignerConf::try_from).transpose()?;

        let indexing = IndexingConf {
            poll_interval: Duration::from_millis(
                raw.indexing
                    .poll_interval_ms
                    .unwrap_or(DEFAULT_INDEXING_POLL_INTERVAL_MS),
            ),
            timeout: raw.indexing.timeout_secs.map(Duration::from_secs),
        };
        if indexing.poll_interval.is_zero() {
            return Err(eyre!("`indexing.poll_interval_ms` must be positive"));
        }

        let feed = FeedConf {
            page_size: raw.feed.page_size.unwrap_or(DEFAULT_FEED_PAGE_SIZE),
        };
        if feed.page_size == 0 {
            return Err(eyre!("`feed.page_size` must be positive"));
        }

        Ok(Self {
            app_name: raw.app_name.unwrap_or_else(|| DEFAULT_APP_NAME.to_owned()),
            relay_on: raw.relay_on.unwrap_or(true),
            api_url: parse_url(raw.api_url, None, "api_url")?,
            avatar_placeholder_url: parse_url(
                raw.avatar_placeholder_url,
                Some(DEFAULT_AVATAR_PLACEHOLDER_URL),
                "avatar_placeholder_url",
            )?,
            ipfs,
            arweave,
            chain,
            signer,
            indexing,
            feed,
            tracing: raw.tracing,
        })
    }
}

impl TryFrom<RawSignerConf> for SignerConf {
    type Error = eyre::Report;

    fn try_from(raw: RawSignerConf) -> Result<Self> {
        let signer_type = raw.signer_type.as_deref().unwrap_or("hexKey");
        match signer_type.to_lowercase().as_str() {
            "hexkey" => {
                let key = raw.key.ok_or_else(|| eyre!("Missing `signer.key`"))?;
                let key = key
                    .parse::<H256>()
                    .map_err(|_| eyre!("Invalid `signer.key`, expected 32 bytes of hex"))?;
                Ok(Self::HexKey { key })
            }
            other => Err(eyre!("Unsupported `signer.type`: {other}")),
        }
    }
}
