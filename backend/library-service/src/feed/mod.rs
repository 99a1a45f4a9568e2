//! Client-side feed core: paginated accumulation and view-mode switching
//!
//! [`FeedPaginator`] pulls pages from any [`PageSource`]; [`ViewModeSelector`]
//! keeps one paginator per view mode so switching back and forth reuses what
//! was already loaded.

pub mod paginator;
pub mod view_mode;

pub use paginator::{FeedPaginator, LoadOutcome, ScrollPosition};
pub use view_mode::{FeedView, ViewModeSelector};

use crate::error::Result;
use crate::models::{Cursor, FeedPage, SortOrder};
use crate::services::PostService;
use async_trait::async_trait;

/// Parameters of one page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub course_id: String,
    pub page_size: u32,
    pub cursor: Option<Cursor>,
    pub order: SortOrder,
}

/// Anything that can serve cursor-paginated course pages
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<FeedPage>;
}

#[async_trait]
impl PageSource for PostService {
    async fn fetch_page(&self, request: &PageRequest) -> Result<FeedPage> {
        PostService::fetch_page(
            self,
            &request.course_id,
            request.page_size,
            request.cursor.as_ref(),
            request.order,
        )
        .await
    }
}
