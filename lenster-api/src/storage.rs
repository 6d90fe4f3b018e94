use async_trait::async_trait;
use lenster_core::{
    MediaAttachment, MediaFile, MediaStore, MetadataStore, PublicationMetadata, ServiceError,
    ServiceResult,
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{info, instrument};
use url::Url;

use crate::LensApiError;

const IPFS_SCHEME: &str = "ipfs://";

/// Media store backed by an IPFS node's HTTP API.
#[derive(Debug, Clone)]
pub struct IpfsMediaStore {
    http: reqwest::Client,
    api_url: Url,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
struct IpfsAddReply {
    name: String,
    hash: String,
    #[serde(default)]
    size: Option<String>,
}

impl IpfsMediaStore {
    /// Upload through the node at `api_url`.
    pub fn new(http: reqwest::Client, api_url: Url) -> Self {
        Self { http, api_url }
    }

    fn add_url(&self) -> String {
        format!("{}/api/v0/add", self.api_url.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl MediaStore for IpfsMediaStore {
    #[instrument(skip(self), fields(url = %self.api_url))]
    async fn upload_media(&self, file: &MediaFile) -> ServiceResult<MediaAttachment> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(LensApiError::from)?;
        let form = Form::new().part("file", part);

        let res = self
            .http
            .post(self.add_url())
            .multipart(form)
            .send()
            .await
            .map_err(LensApiError::from)?;
        let status = res.status();
        if !status.is_success() {
            return Err(LensApiError::Status {
                service: "IPFS",
                status,
            }
            .into());
        }
        let reply: IpfsAddReply = res.json().await.map_err(LensApiError::from)?;
        info!(hash = %reply.hash, size = ?reply.size, "Uploaded media to IPFS");
        attachment_from_reply(reply, &file.mime_type)
    }
}

fn attachment_from_reply(reply: IpfsAddReply, mime_type: &str) -> ServiceResult<MediaAttachment> {
    if reply.hash.is_empty() {
        return Err(ServiceError::UnexpectedResponse(format!(
            "IPFS add of {} returned no hash",
            reply.name
        )));
    }
    Ok(MediaAttachment {
        item: format!("{IPFS_SCHEME}{}", reply.hash),
        mime_type: mime_type.to_owned(),
    })
}

/// Metadata store fronting Arweave.
#[derive(Debug, Clone)]
pub struct ArweaveMetadataStore {
    http: reqwest::Client,
    upload_url: Url,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
struct ArweaveUploadReply {
    id: String,
}

impl ArweaveMetadataStore {
    /// Upload through the endpoint at `upload_url`.
    pub fn new(http: reqwest::Client, upload_url: Url) -> Self {
        Self { http, upload_url }
    }
}

#[async_trait]
impl MetadataStore for ArweaveMetadataStore {
    #[instrument(skip(self, metadata), fields(url = %self.upload_url, metadata_id = %metadata.metadata_id))]
    async fn upload_metadata(&self, metadata: &PublicationMetadata) -> ServiceResult<String> {
        let res = self
            .http
            .post(self.upload_url.clone())
            .json(metadata)
            .send()
            .await
            .map_err(LensApiError::from)?;
        let status = res.status();
        if !status.is_success() {
            return Err(LensApiError::Status {
                service: "Arweave",
                status,
            }
            .into());
        }
        let reply: ArweaveUploadReply = res.json().await.map_err(LensApiError::from)?;
        if reply.id.is_empty() {
            return Err(ServiceError::UnexpectedResponse(
                "Arweave upload returned an empty id".to_owned(),
            ));
        }
        info!(id = %reply.id, "Uploaded metadata to Arweave");
        Ok(reply.id)
    }
}
