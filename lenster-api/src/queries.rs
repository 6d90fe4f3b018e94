/// Typed data for a post, bound to an explicit signature nonce.
pub const CREATE_POST_TYPED_DATA: &str = r#"
mutation CreatePostTypedData($options: TypedDataOptions, $request: CreatePublicPostRequest!) {
  createPostTypedData(options: $options, request: $request) {
    id
    expiresAt
    typedData {
      types {
        PostWithSig {
          name
          type
        }
      }
      domain {
        name
        chainId
        version
        verifyingContract
      }
      value {
        nonce
        deadline
        profileId
        contentURI
        collectModule
        collectModuleInitData
        referenceModule
        referenceModuleInitData
      }
    }
  }
}
"#;

/// Hand a signed typed data id to the relay.
pub const BROADCAST: &str = r#"
mutation Broadcast($request: BroadcastRequest!) {
  broadcast(request: $request) {
    ... on RelayerResult {
      txHash
      txId
    }
    ... on RelayError {
      reason
    }
  }
}
"#;

/// Look up the publication a transaction created.
pub const PUBLICATION_BY_TX_HASH: &str = r#"
query Publication($request: PublicationQueryRequest!) {
  publication(request: $request) {
    ... on Post {
      id
    }
    ... on Comment {
      id
    }
    ... on Mirror {
      id
    }
  }
}
"#;

/// One page of a profile's publications.
pub const PROFILE_FEED: &str = r#"
query ProfileFeed(
  $request: PublicationsQueryRequest!
  $reactionRequest: ReactionFieldResolverRequest
  $profileId: ProfileId
) {
  publications(request: $request) {
    items {
      __typename
      ... on Post {
        id
        createdAt
        profile {
          id
          handle
        }
        metadata {
          name
          content
        }
        reaction(request: $reactionRequest)
        mirrors(by: $profileId)
      }
      ... on Comment {
        id
        createdAt
        profile {
          id
          handle
        }
        metadata {
          name
          content
        }
        reaction(request: $reactionRequest)
        mirrors(by: $profileId)
      }
      ... on Mirror {
        id
        createdAt
        profile {
          id
          handle
        }
        metadata {
          name
          content
        }
      }
    }
    pageInfo {
      totalCount
      next
    }
  }
}
"#;
