use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CommunityDraft;

/// Metadata schema version understood by the indexer
pub const METADATA_VERSION: &str = "2.0.0";

/// A single trait attached to a publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataAttribute {
    /// Display type of the value
    pub trait_type: String,
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: String,
}

/// The document written once to the permanent store. Its address becomes the
/// publication's content URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationMetadata {
    /// Schema version
    pub version: String,
    /// Fresh id for this document
    #[serde(rename = "metadata_id")]
    pub metadata_id: Uuid,
    /// Description
    pub description: Option<String>,
    /// Body; communities use the description
    pub content: Option<String>,
    /// Link out, unused for communities
    #[serde(rename = "external_url")]
    pub external_url: Option<String>,
    /// Image URL, never empty
    pub image: String,
    /// MIME type of `image`, if known
    pub image_mime_type: Option<String>,
    /// Name
    pub name: String,
    /// Content warning, unused for communities
    pub content_warning: Option<String>,
    /// Typed attributes
    pub attributes: Vec<MetadataAttribute>,
    /// Attached media, unused for communities
    pub media: Vec<serde_json::Value>,
    /// Locale of the content
    pub locale: String,
    /// Creation time
    pub created_on: DateTime<Utc>,
    /// Application that created the document
    pub app_id: String,
}

impl PublicationMetadata {
    /// Build the metadata for a community post.
    ///
    /// `image` must already be resolved, either the uploaded avatar or a
    /// placeholder.
    pub fn community(
        draft: &CommunityDraft,
        image: String,
        image_mime_type: Option<String>,
        app_name: &str,
        created_on: DateTime<Utc>,
    ) -> Self {
        let description = draft.description().map(str::to_owned);
        Self {
            version: METADATA_VERSION.to_owned(),
            metadata_id: Uuid::new_v4(),
            content: description.clone(),
            description,
            external_url: None,
            image,
            image_mime_type,
            name: draft.name().to_owned(),
            content_warning: None,
            attributes: vec![MetadataAttribute {
                trait_type: "string".to_owned(),
                key: "type".to_owned(),
                value: "community".to_owned(),
            }],
            media: vec![],
            locale: "en".to_owned(),
            created_on,
            app_id: format!("{app_name} Community"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::NewCommunity;

    fn draft() -> CommunityDraft {
        CommunityDraft::validate(NewCommunity {
            name: "minecraft".into(),
            description: Some("blocks".into()),
            avatar: None,
        })
        .unwrap()
    }

    #[test]
    fn serializes_with_backend_field_names() {
        let created_on = Utc.with_ymd_and_hms(2022, 6, 1, 12, 0, 0).unwrap();
        let metadata = PublicationMetadata::community(
            &draft(),
            "ipfs://QmAvatar".into(),
            Some("image/png".into()),
            "Lenster",
            created_on,
        );
        let json = serde_json::to_value(&metadata).unwrap();

        assert_eq!(json["version"], "2.0.0");
        assert_eq!(json["metadata_id"], metadata.metadata_id.to_string());
        assert_eq!(json["description"], "blocks");
        assert_eq!(json["content"], "blocks");
        assert!(json["external_url"].is_null());
        assert_eq!(json["image"], "ipfs://QmAvatar");
        assert_eq!(json["imageMimeType"], "image/png");
        assert_eq!(json["name"], "minecraft");
        assert!(json["contentWarning"].is_null());
        assert_eq!(
            json["attributes"],
            serde_json::json!([{ "traitType": "string", "key": "type", "value": "community" }])
        );
        assert_eq!(json["media"], serde_json::json!([]));
        assert_eq!(json["locale"], "en");
        assert_eq!(json["createdOn"], "2022-06-01T12:00:00Z");
        assert_eq!(json["appId"], "Lenster Community");
    }

    #[test]
    fn every_document_gets_a_fresh_id() {
        let now = Utc::now();
        let a = PublicationMetadata::community(&draft(), "x".into(), None, "Lenster", now);
        let b = PublicationMetadata::community(&draft(), "x".into(), None, "Lenster", now);
        assert_ne!(a.metadata_id, b.metadata_id);
    }
}
