use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Minimum number of characters in a community name
pub const NAME_MIN_CHARS: usize = 2;
/// Maximum number of characters in a community name
pub const NAME_MAX_CHARS: usize = 31;
/// Maximum number of characters in a community description
pub const DESCRIPTION_MAX_CHARS: usize = 260;

/// A file picked by the user, before it is uploaded anywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Original file name
    pub name: String,
    /// MIME type reported for the file
    pub mime_type: String,
    /// Raw contents
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A media item that lives in the content addressed store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Content address, e.g. `ipfs://Qm...`
    pub item: String,
    /// MIME type of the uploaded bytes
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Raw form input for a new community.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCommunity {
    /// Community name
    pub name: String,
    /// Free text description
    pub description: Option<String>,
    /// Avatar already uploaded by the user, if any
    pub avatar: Option<MediaAttachment>,
}

/// A validated community. Immutable once submission begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityDraft {
    name: String,
    description: Option<String>,
    avatar: Option<MediaAttachment>,
}

impl CommunityDraft {
    /// Validate form input against the length rules.
    pub fn validate(input: NewCommunity) -> Result<Self, ValidationError> {
        let name_len = input.name.chars().count();
        if name_len < NAME_MIN_CHARS {
            return Err(ValidationError::NameTooShort {
                min: NAME_MIN_CHARS,
            });
        }
        if name_len > NAME_MAX_CHARS {
            return Err(ValidationError::NameTooLong {
                max: NAME_MAX_CHARS,
            });
        }

        let description = input.description.filter(|d| !d.trim().is_empty());
        if let Some(description) = &description {
            if description.chars().count() > DESCRIPTION_MAX_CHARS {
                return Err(ValidationError::DescriptionTooLong {
                    max: DESCRIPTION_MAX_CHARS,
                });
            }
        }

        Ok(Self {
            name: input.name,
            description,
            avatar: input.avatar,
        })
    }

    /// Community name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description, `None` when left blank
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Uploaded avatar, if any
    pub fn avatar(&self) -> Option<&MediaAttachment> {
        self.avatar.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, description: Option<&str>) -> NewCommunity {
        NewCommunity {
            name: name.to_owned(),
            description: description.map(str::to_owned),
            avatar: None,
        }
    }

    #[test]
    fn name_bounds() {
        assert_eq!(
            CommunityDraft::validate(input("a", None)).unwrap_err(),
            ValidationError::NameTooShort { min: 2 }
        );
        assert!(CommunityDraft::validate(input("ab", None)).is_ok());
        assert!(CommunityDraft::validate(input(&"x".repeat(31), None)).is_ok());
        assert_eq!(
            CommunityDraft::validate(input(&"x".repeat(32), None)).unwrap_err(),
            ValidationError::NameTooLong { max: 31 }
        );
    }

    #[test]
    fn description_bound() {
        let ok = "d".repeat(260);
        assert!(CommunityDraft::validate(input("minecraft", Some(&ok))).is_ok());
        let too_long = "d".repeat(261);
        assert_eq!(
            CommunityDraft::validate(input("minecraft", Some(&too_long))).unwrap_err(),
            ValidationError::DescriptionTooLong { max: 260 }
        );
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // 31 two-byte characters
        let name = "é".repeat(31);
        assert!(CommunityDraft::validate(input(&name, None)).is_ok());
    }

    #[test]
    fn blank_description_is_dropped() {
        let draft = CommunityDraft::validate(input("minecraft", Some("   "))).unwrap();
        assert_eq!(draft.description(), None);
    }
}
