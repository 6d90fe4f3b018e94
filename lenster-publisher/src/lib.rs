//! The Lenster community publisher: turns a community form into a post on
//! the social graph, through the relay or from the user's wallet, and pages
//! through profile feeds.

#![warn(missing_docs)]
#![deny(clippy::unwrap_used, clippy::panic)]
#![forbid(unsafe_code)]

pub use client::LensterClient;
pub use dispatcher::{DispatchOutcome, DispatchState, SubmissionDispatcher};
pub use error::{PipelineStage, PublisherError};
pub use feed::{FeedPager, ProfileFeed};
pub use metrics::PublisherMetrics;
pub use pipeline::CommunityCreator;
pub use preparer::{ContentPreparer, PreparedContent};
pub use requester::TypedDataRequester;
pub use signing::PostSigner;
pub use status::{active_hash, Indexed, PendingIndicator, StatusPresenter};

mod client;
mod dispatcher;
mod error;
mod feed;
mod metrics;
mod pipeline;
mod preparer;
mod requester;
mod signing;
mod status;
