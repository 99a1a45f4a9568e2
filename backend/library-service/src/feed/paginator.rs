//! Cursor-based page accumulation for one feed

use super::{PageRequest, PageSource};
use crate::models::{ContentItem, Cursor, SortOrder};
use std::sync::{Arc, Mutex, MutexGuard};

/// Default distance from the bottom of the document that triggers a load
pub const DEFAULT_SCROLL_THRESHOLD_PX: f64 = 200.0;

/// Result of a [`FeedPaginator::load_more`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was appended; carries its item count
    Loaded(usize),
    /// The feed has no further pages
    Exhausted,
    /// Another fetch is still in flight
    Busy,
    /// The fetch failed; nothing was committed
    Failed,
    /// The paginator was torn down before or during the fetch
    Cancelled,
}

impl LoadOutcome {
    pub fn fetched(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_) | LoadOutcome::Failed)
    }
}

/// Scroll geometry reported by the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollPosition {
    pub fn distance_to_bottom(&self) -> f64 {
        self.document_height - (self.scroll_top + self.viewport_height)
    }
}

#[derive(Debug)]
struct PaginatorState {
    items: Vec<ContentItem>,
    cursor: Option<Cursor>,
    has_more: bool,
    in_flight: bool,
    closed: bool,
}

/// Accumulates the pages of one course feed in one sort order
///
/// At most one fetch is in flight; calls made meanwhile return
/// [`LoadOutcome::Busy`] instead of queueing. Items are appended as
/// delivered, without de-duplication across pages.
pub struct FeedPaginator {
    source: Arc<dyn PageSource>,
    course_id: String,
    order: SortOrder,
    page_size: u32,
    scroll_threshold: f64,
    state: Mutex<PaginatorState>,
}

impl FeedPaginator {
    pub fn new(
        source: Arc<dyn PageSource>,
        course_id: impl Into<String>,
        order: SortOrder,
        page_size: u32,
    ) -> Self {
        Self {
            source,
            course_id: course_id.into(),
            order,
            page_size,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD_PX,
            state: Mutex::new(PaginatorState {
                items: Vec::new(),
                cursor: None,
                has_more: true,
                in_flight: false,
                closed: false,
            }),
        }
    }

    pub fn with_scroll_threshold(mut self, threshold_px: f64) -> Self {
        self.scroll_threshold = threshold_px;
        self
    }

    fn lock(&self) -> MutexGuard<'_, PaginatorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fetch the page after the current cursor and append it
    pub async fn load_more(&self) -> LoadOutcome {
        let request = {
            let mut state = self.lock();
            if state.closed {
                return LoadOutcome::Cancelled;
            }
            if !state.has_more {
                return LoadOutcome::Exhausted;
            }
            if state.in_flight {
                return LoadOutcome::Busy;
            }
            state.in_flight = true;
            PageRequest {
                course_id: self.course_id.clone(),
                page_size: self.page_size,
                cursor: state.cursor.clone(),
                order: self.order,
            }
        };

        let result = self.source.fetch_page(&request).await;

        let mut state = self.lock();
        state.in_flight = false;
        if state.closed {
            tracing::debug!(course_id = %self.course_id, "discarding page fetched after teardown");
            return LoadOutcome::Cancelled;
        }

        match result {
            Ok(page) => {
                let count = page.items.len();
                state.items.extend(page.items);
                if let Some(cursor) = page.next_cursor {
                    state.cursor = Some(cursor);
                }
                // A short page ends the feed even if the source claims otherwise
                state.has_more = page.has_more && count >= self.page_size as usize;
                LoadOutcome::Loaded(count)
            }
            Err(err) => {
                tracing::warn!(
                    course_id = %self.course_id,
                    cursor = ?request.cursor,
                    error = %err,
                    "failed to load feed page"
                );
                LoadOutcome::Failed
            }
        }
    }

    /// Load the next page when the viewport is within the threshold of the
    /// bottom; `None` when it is not
    pub async fn on_scroll(&self, position: ScrollPosition) -> Option<LoadOutcome> {
        if position.distance_to_bottom() >= self.scroll_threshold {
            return None;
        }
        Some(self.load_more().await)
    }

    /// Stop accepting pages; an in-flight fetch is discarded when it lands
    pub fn teardown(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.in_flight = false;
    }

    pub fn items(&self) -> Vec<ContentItem> {
        self.lock().items.clone()
    }

    /// Every image of every loaded item, in feed order
    pub fn images(&self) -> Vec<String> {
        self.lock()
            .items
            .iter()
            .flat_map(|item| item.images.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.lock().cursor.clone()
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}
