use std::fmt::Debug;

use async_trait::async_trait;
use auto_impl::auto_impl;

use crate::{PostWithSigData, ServiceResult, H256};

/// Sends `postWithSig` to the hub contract from the user's own wallet.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait PostSubmitter: Send + Sync + Debug {
    /// Submit the post, returning the transaction hash once the node accepted
    /// it. Inclusion is left to the indexer.
    async fn post_with_sig(&self, vars: &PostWithSigData) -> ServiceResult<H256>;
}
