use std::sync::Arc;

use derive_new::new;
use lenster_core::{
    FeedKind, PageInfo, ProfileId, Publication, PublicationFeed, PublicationsRequest,
    ServiceResult,
};
use tracing::{debug, info, instrument};

/// Builds pagers over the publications of a profile.
#[derive(Debug, Clone, new)]
pub struct ProfileFeed {
    source: Arc<dyn PublicationFeed>,
    page_size: u32,
}

impl ProfileFeed {
    /// A pager over `profile_id`'s publications of `kind`, seen by `viewer`.
    /// Nothing is fetched until [`FeedPager::load_more`] is called.
    pub fn pager(
        &self,
        kind: FeedKind,
        profile_id: Option<ProfileId>,
        viewer: Option<ProfileId>,
    ) -> FeedPager {
        FeedPager {
            source: self.source.clone(),
            page_size: self.page_size,
            kind,
            profile_id,
            viewer,
            items: Vec::new(),
            page_info: None,
        }
    }
}

/// Accumulates pages of a profile feed.
#[derive(Debug)]
pub struct FeedPager {
    source: Arc<dyn PublicationFeed>,
    page_size: u32,
    kind: FeedKind,
    profile_id: Option<ProfileId>,
    viewer: Option<ProfileId>,
    items: Vec<Publication>,
    page_info: Option<PageInfo>,
}

impl FeedPager {
    fn request(&self, profile_id: &ProfileId, cursor: Option<String>) -> PublicationsRequest {
        PublicationsRequest {
            publication_types: self.kind.publication_types(),
            profile_id: profile_id.clone(),
            metadata: self.kind.metadata_filter(),
            limit: self.page_size,
            cursor,
        }
    }

    /// Fetch the next page and append it. Returns the number of new items.
    ///
    /// Without a profile id nothing is fetched. After the last page this is
    /// a no-op.
    #[instrument(skip(self), fields(kind = ?self.kind, loaded = self.items.len()))]
    pub async fn load_more(&mut self) -> ServiceResult<usize> {
        let Some(profile_id) = &self.profile_id else {
            debug!("No profile, skipping feed query");
            return Ok(0);
        };
        let cursor = match &self.page_info {
            None => None,
            Some(_) if !self.has_more() => return Ok(0),
            Some(page_info) => page_info.next.clone(),
        };
        let first = cursor.is_none();
        let request = self.request(profile_id, cursor);

        let page = self
            .source
            .publications(&request, self.viewer.as_ref())
            .await?;
        if !first {
            info!(
                event = "profile_feed_pagination",
                profile_id = %profile_id,
                kind = ?self.kind,
                "Loaded next feed page"
            );
        }

        let added = page.items.len();
        self.items.extend(page.items);
        self.page_info = Some(page.page_info);
        Ok(added)
    }

    /// Whether another page can be loaded.
    pub fn has_more(&self) -> bool {
        match &self.page_info {
            None => self.profile_id.is_some(),
            Some(page_info) => {
                page_info.next.is_some() && self.items.len() as u64 != page_info.total_count
            }
        }
    }

    /// Everything loaded so far
    pub fn items(&self) -> &[Publication] {
        &self.items
    }

    /// Pagination info of the last page, `None` before the first load
    pub fn page_info(&self) -> Option<&PageInfo> {
        self.page_info.as_ref()
    }

    /// Whether entries are shown with their thread
    pub fn shows_thread(&self) -> bool {
        self.kind.shows_thread()
    }
}
