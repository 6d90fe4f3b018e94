use serde::{Deserialize, Serialize};

use crate::ProfileId;

/// Which slice of a profile's publications to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedKind {
    /// Posts and mirrors
    Feed,
    /// Comments only
    Replies,
    /// Posts and comments focused on media
    Media,
}

impl FeedKind {
    /// Publication types requested for this feed.
    pub fn publication_types(&self) -> Vec<PublicationType> {
        match self {
            Self::Feed => vec![PublicationType::Post, PublicationType::Mirror],
            Self::Media => vec![PublicationType::Post, PublicationType::Comment],
            Self::Replies => vec![PublicationType::Comment],
        }
    }

    /// Metadata filter for this feed, if any.
    pub fn metadata_filter(&self) -> Option<MetadataFilter> {
        match self {
            Self::Media => Some(MetadataFilter {
                main_content_focus: vec![
                    ContentFocus::Video,
                    ContentFocus::Image,
                    ContentFocus::Audio,
                ],
            }),
            Self::Feed | Self::Replies => None,
        }
    }

    /// Whether publications in this feed are shown with their thread.
    pub fn shows_thread(&self) -> bool {
        !matches!(self, Self::Media)
    }
}

/// Kind of publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicationType {
    /// Top level post
    Post,
    /// Reply to a publication
    Comment,
    /// Re-share of a publication
    Mirror,
}

/// Main focus of a publication's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentFocus {
    /// Video
    Video,
    /// Image
    Image,
    /// Audio
    Audio,
}

/// Restricts publications by their metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataFilter {
    /// Allowed content focus values
    pub main_content_focus: Vec<ContentFocus>,
}

/// The `request` of a `publications` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationsRequest {
    /// Publication types to include
    pub publication_types: Vec<PublicationType>,
    /// Whose publications
    pub profile_id: ProfileId,
    /// Optional metadata filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataFilter>,
    /// Page size
    pub limit: u32,
    /// Cursor of the page to fetch, `None` for the first page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Author of a publication, as much as the feed needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationAuthor {
    /// Profile id
    pub id: ProfileId,
    /// Handle, e.g. `yoginth.lens`
    pub handle: String,
}

/// Publication metadata, as much as the feed needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationContent {
    /// Name
    #[serde(default)]
    pub name: Option<String>,
    /// Body text
    #[serde(default)]
    pub content: Option<String>,
}

/// A feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    /// Publication id, e.g. `0x0f-0x01`
    pub id: String,
    /// Post, comment or mirror
    #[serde(rename = "__typename")]
    pub kind: PublicationKind,
    /// Author
    pub profile: PublicationAuthor,
    /// Content
    #[serde(default)]
    pub metadata: PublicationContent,
    /// Creation time as reported by the indexer
    #[serde(default)]
    pub created_at: Option<String>,
}

/// GraphQL type of a feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicationKind {
    /// Top level post
    Post,
    /// Reply to a publication
    Comment,
    /// Re-share of a publication
    Mirror,
}

/// Pagination info of a `publications` query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Total number of publications matching the request
    pub total_count: u64,
    /// Cursor of the next page
    #[serde(default)]
    pub next: Option<String>,
}

/// One page of publications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedPublications {
    /// Entries on this page
    pub items: Vec<Publication>,
    /// Pagination info
    pub page_info: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publication_types_per_feed() {
        assert_eq!(
            FeedKind::Feed.publication_types(),
            vec![PublicationType::Post, PublicationType::Mirror]
        );
        assert_eq!(
            FeedKind::Replies.publication_types(),
            vec![PublicationType::Comment]
        );
        assert_eq!(
            FeedKind::Media.publication_types(),
            vec![PublicationType::Post, PublicationType::Comment]
        );
    }

    #[test]
    fn only_media_filters_metadata() {
        assert!(FeedKind::Feed.metadata_filter().is_none());
        assert!(FeedKind::Replies.metadata_filter().is_none());
        let json = serde_json::to_value(FeedKind::Media.metadata_filter().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "mainContentFocus": ["VIDEO", "IMAGE", "AUDIO"] })
        );
    }

    #[test]
    fn page_parses() {
        let json = r#"{
            "items": [
                {
                    "__typename": "Post",
                    "id": "0x0f-0x01",
                    "profile": { "id": "0x0f", "handle": "yoginth.lens" },
                    "metadata": { "name": "Post by @yoginth.lens", "content": "gm" },
                    "createdAt": "2022-06-01T12:00:00.000Z"
                },
                {
                    "__typename": "Mirror",
                    "id": "0x0f-0x02",
                    "profile": { "id": "0x0f", "handle": "yoginth.lens" }
                }
            ],
            "pageInfo": { "totalCount": 2, "next": "{\"offset\":2}" }
        }"#;
        let page: PaginatedPublications = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].kind, PublicationKind::Post);
        assert_eq!(page.items[0].metadata.content.as_deref(), Some("gm"));
        assert_eq!(page.items[1].kind, PublicationKind::Mirror);
        assert_eq!(page.page_info.total_count, 2);
        assert_eq!(page.page_info.next.as_deref(), Some(r#"{"offset":2}"#));
    }
}
