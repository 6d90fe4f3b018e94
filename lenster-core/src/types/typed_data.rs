use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{Address, Bytes, ProfileId, ServiceError, ServiceResult, H256, U256};

/// Name of the EIP-712 domain type, which is never the primary type.
pub const EIP712_DOMAIN_TYPE: &str = "EIP712Domain";

/// Who may collect a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectModuleParams {
    /// Anyone (or followers only) can collect for free
    #[serde(rename_all = "camelCase")]
    FreeCollectModule {
        /// Restrict collecting to followers
        follower_only: bool,
    },
}

impl Default for CollectModuleParams {
    fn default() -> Self {
        Self::FreeCollectModule {
            follower_only: false,
        }
    }
}

/// Who may reference (comment on, mirror) a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceModuleParams {
    /// Restrict references to followers
    pub follower_only_reference_module: bool,
}

/// The `request` part of a `createPostTypedData` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Author
    pub profile_id: ProfileId,
    /// Canonical URL of the metadata document
    #[serde(rename = "contentURI")]
    pub content_uri: String,
    /// Collect policy
    pub collect_module: CollectModuleParams,
    /// Reference policy
    pub reference_module: ReferenceModuleParams,
}

/// EIP-712 domain as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDomain {
    /// Domain name
    pub name: String,
    /// Chain the signature is valid on
    pub chain_id: u64,
    /// Domain version
    pub version: String,
    /// Contract that verifies the signature
    pub verifying_contract: Address,
}

/// One member of an EIP-712 struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDataField {
    /// Member name
    pub name: String,
    /// Solidity type
    #[serde(rename = "type")]
    pub kind: String,
}

/// The signable message of a `PostWithSig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTypedDataValue {
    /// Signature nonce the backend bound the message to
    pub nonce: u64,
    /// Unix timestamp after which the signature is void
    pub deadline: u64,
    /// Author
    pub profile_id: ProfileId,
    /// Canonical URL of the metadata document
    #[serde(rename = "contentURI")]
    pub content_uri: String,
    /// Collect module contract
    pub collect_module: Address,
    /// Collect module init data
    pub collect_module_init_data: Bytes,
    /// Reference module contract
    pub reference_module: Address,
    /// Reference module init data
    pub reference_module_init_data: Bytes,
}

/// Typed data as handed out by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTypedData {
    /// Signing domain
    pub domain: TypedDataDomain,
    /// Struct types, keyed by type name
    #[serde(deserialize_with = "deserialize_struct_types")]
    pub types: BTreeMap<String, Vec<TypedDataField>>,
    /// Message
    pub value: PostTypedDataValue,
}

impl PostTypedData {
    /// The type the message is an instance of. The backend sends exactly one
    /// struct type besides (optionally) the domain type.
    pub fn primary_type(&self) -> ServiceResult<&str> {
        let mut candidates = self
            .types
            .keys()
            .filter(|name| name.as_str() != EIP712_DOMAIN_TYPE);
        match (candidates.next(), candidates.next()) {
            (Some(primary), None) => Ok(primary),
            _ => Err(ServiceError::UnexpectedResponse(format!(
                "cannot pick a primary type from {:?}",
                self.types.keys().collect::<Vec<_>>()
            ))),
        }
    }
}

/// The backend decorates the type map with a `__typename` string; only the
/// array valued entries are struct types.
fn deserialize_struct_types<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<TypedDataField>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    raw.into_iter()
        .filter(|(_, fields)| fields.is_array())
        .map(|(name, fields)| {
            serde_json::from_value(fields)
                .map(|fields| (name, fields))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}

/// What the backend returns for `createPostTypedData`. Consumed exactly once
/// by the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataEnvelope {
    /// Backend id, used to broadcast through the relay
    pub id: String,
    /// When the backend stops accepting a broadcast for `id`
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// The data to sign
    pub typed_data: PostTypedData,
}

impl TypedDataEnvelope {
    /// Whether the backend has stopped accepting this envelope at `now`.
    /// Envelopes without an expiry never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// An ECDSA signature split the way the hub contract wants it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureParts {
    /// Recovery id, 27 or 28
    pub v: u8,
    /// r
    pub r: H256,
    /// s
    pub s: H256,
    /// Deadline copied from the signed message
    pub deadline: U256,
}

impl SignatureParts {
    /// Split an ethereum signature.
    pub fn split(
        signature: &ethers_core::types::Signature,
        deadline: U256,
    ) -> ServiceResult<Self> {
        let v = u8::try_from(signature.v)
            .map_err(|_| ServiceError::InvalidValue(format!("signature v {}", signature.v)))?;
        let mut r = [0u8; 32];
        signature.r.to_big_endian(&mut r);
        let mut s = [0u8; 32];
        signature.s.to_big_endian(&mut s);
        Ok(Self {
            v,
            r: H256::from(r),
            s: H256::from(s),
            deadline,
        })
    }
}

/// Input struct of the hub's `postWithSig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWithSigData {
    /// Author
    pub profile_id: U256,
    /// Canonical URL of the metadata document
    #[serde(rename = "contentURI")]
    pub content_uri: String,
    /// Collect module contract
    pub collect_module: Address,
    /// Collect module init data
    pub collect_module_init_data: Bytes,
    /// Reference module contract
    pub reference_module: Address,
    /// Reference module init data
    pub reference_module_init_data: Bytes,
    /// Signature and deadline
    pub sig: SignatureParts,
}

/// A signed post, ready for the relay or for a direct contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPost {
    /// Backend id of the typed data
    pub typed_data_id: String,
    /// Full 65 byte signature, `0x` prefixed hex
    pub signature: String,
    /// Struct for the direct call
    pub vars: PostWithSigData,
}

impl SignedPost {
    /// Assemble from the envelope and the signature over it.
    pub fn assemble(
        envelope: &TypedDataEnvelope,
        signature: &ethers_core::types::Signature,
    ) -> ServiceResult<Self> {
        let value = &envelope.typed_data.value;
        let sig = SignatureParts::split(signature, value.deadline.into())?;
        let vars = PostWithSigData {
            profile_id: value.profile_id.to_u256()?,
            content_uri: value.content_uri.clone(),
            collect_module: value.collect_module,
            collect_module_init_data: value.collect_module_init_data.clone(),
            reference_module: value.reference_module,
            reference_module_init_data: value.reference_module_init_data.clone(),
            sig,
        };
        Ok(Self {
            typed_data_id: envelope.id.clone(),
            signature: format!("0x{signature}"),
            vars,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_data {
    /// A `createPostTypedData` payload shaped like the backend's, including
    /// the `__typename` noise.
    pub const ENVELOPE_JSON: &str = r#"{
        "__typename": "CreatePostBroadcastItemResult",
        "id": "3c5b6b42-a8f6-4b4b-8d4f-2f5d6a0b1c11",
        "expiresAt": "2022-06-01T12:30:00.000Z",
        "typedData": {
            "__typename": "CreatePostEIP712TypedData",
            "types": {
                "__typename": "CreatePostEIP712TypedDataTypes",
                "PostWithSig": [
                    { "__typename": "EIP712TypedDataField", "name": "profileId", "type": "uint256" },
                    { "name": "contentURI", "type": "string" },
                    { "name": "collectModule", "type": "address" },
                    { "name": "collectModuleInitData", "type": "bytes" },
                    { "name": "referenceModule", "type": "address" },
                    { "name": "referenceModuleInitData", "type": "bytes" },
                    { "name": "nonce", "type": "uint256" },
                    { "name": "deadline", "type": "uint256" }
                ]
            },
            "domain": {
                "__typename": "EIP712TypedDataDomain",
                "name": "Lens Protocol Profiles",
                "chainId": 80001,
                "version": "1",
                "verifyingContract": "0x60ae865ee4c725cd04353b5aab364553f56cef82"
            },
            "value": {
                "__typename": "CreatePostEIP712TypedDataValue",
                "nonce": 4,
                "deadline": 1654087800,
                "profileId": "0x0f",
                "contentURI": "https://arweave.net/Lz9hkl1NtJ2V3tqkTEAD3oBDYu2lAjDdCNvyrXNGyNc",
                "collectModule": "0x0be6bd7092ee83d44a6ec1d949626fee48cabab8",
                "collectModuleInitData": "0x0000000000000000000000000000000000000000000000000000000000000000",
                "referenceModule": "0x0000000000000000000000000000000000000000",
                "referenceModuleInitData": "0x"
            }
        }
    }"#;
}
