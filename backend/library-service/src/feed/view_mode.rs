//! Timeline / pdf projections of one course feed

use super::paginator::{FeedPaginator, LoadOutcome, ScrollPosition};
use super::PageSource;
use crate::config::FeedConfig;
use crate::interleaver::{interleave_images, FeedSlot};
use crate::models::{ContentItem, Course, ViewMode};
use std::sync::{Arc, Mutex};

/// What the course page renders for the active mode
#[derive(Debug, Clone, PartialEq)]
pub enum FeedView {
    /// Posts newest first, images grouped per post
    Timeline(Vec<ContentItem>),
    /// All images oldest first with in-feed ad slots
    Pdf(Vec<FeedSlot>),
}

/// Owns one paginator per view mode and routes loads to the active one
///
/// Each mode keeps its own items, cursor and `has_more`; switching to a mode
/// that already holds items fetches nothing.
pub struct ViewModeSelector {
    timeline: FeedPaginator,
    pdf: FeedPaginator,
    mode: Mutex<ViewMode>,
}

impl ViewModeSelector {
    /// Selector for `course`, starting in its default mode
    pub fn new(source: Arc<dyn PageSource>, course: &Course, config: &FeedConfig) -> Self {
        Self::with_mode(source, &course.id, course.default_view_mode(), config)
    }

    pub fn with_mode(
        source: Arc<dyn PageSource>,
        course_id: &str,
        mode: ViewMode,
        config: &FeedConfig,
    ) -> Self {
        let timeline = FeedPaginator::new(
            Arc::clone(&source),
            course_id,
            ViewMode::Timeline.order(),
            config.timeline_page_size,
        )
        .with_scroll_threshold(config.scroll_threshold_px);
        let pdf = FeedPaginator::new(source, course_id, ViewMode::Pdf.order(), config.pdf_page_size)
            .with_scroll_threshold(config.scroll_threshold_px);

        Self {
            timeline,
            pdf,
            mode: Mutex::new(mode),
        }
    }

    pub fn mode(&self) -> ViewMode {
        *self.mode.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn paginator(&self, mode: ViewMode) -> &FeedPaginator {
        match mode {
            ViewMode::Timeline => &self.timeline,
            ViewMode::Pdf => &self.pdf,
        }
    }

    pub fn active(&self) -> &FeedPaginator {
        self.paginator(self.mode())
    }

    /// Load the first page of the initial mode
    pub async fn mount(&self) -> LoadOutcome {
        self.active().load_more().await
    }

    /// Make `mode` active; fetches its first page only if it holds nothing yet
    pub async fn switch_to(&self, mode: ViewMode) -> Option<LoadOutcome> {
        *self.mode.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = mode;

        let target = self.paginator(mode);
        if !target.is_empty() {
            tracing::debug!(?mode, items = target.len(), "view mode served from cache");
            return None;
        }
        Some(target.load_more().await)
    }

    pub async fn toggle(&self) -> Option<LoadOutcome> {
        self.switch_to(self.mode().other()).await
    }

    /// Scroll events drive the active mode only
    pub async fn on_scroll(&self, position: ScrollPosition) -> Option<LoadOutcome> {
        self.active().on_scroll(position).await
    }

    pub fn render(&self) -> FeedView {
        match self.mode() {
            ViewMode::Timeline => FeedView::Timeline(self.timeline.items()),
            ViewMode::Pdf => FeedView::Pdf(interleave_images(self.pdf.images(), 0)),
        }
    }

    pub fn teardown(&self) {
        self.timeline.teardown();
        self.pdf.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::feed::PageRequest;
    use crate::models::{Cursor, FeedPage, SortOrder};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex as StdMutex;

    /// Serves four single-image posts per order and logs every request
    #[derive(Default)]
    struct RecordingSource {
        requests: StdMutex<Vec<PageRequest>>,
    }

    #[async_trait]
    impl PageSource for RecordingSource {
        async fn fetch_page(&self, request: &PageRequest) -> Result<FeedPage> {
            self.requests.lock().unwrap().push(request.clone());
            let ids: Vec<usize> = match request.order {
                SortOrder::Asc => (0..4).collect(),
                SortOrder::Desc => (0..4).rev().collect(),
            };
            let items = ids
                .into_iter()
                .map(|i| ContentItem {
                    id: format!("p{}", i),
                    images: vec![format!("img{}", i)],
                    description: None,
                    created_at: Utc::now(),
                })
                .collect();
            Ok(FeedPage::from_lookahead(items, request.page_size as usize))
        }
    }

    fn course(ongoing: bool) -> Course {
        Course {
            id: "c1".into(),
            title: "Statics".into(),
            code: "CVE201".into(),
            description: String::new(),
            lecturer: None,
            thumbnail_url: None,
            department: None,
            ongoing,
        }
    }

    #[tokio::test]
    async fn test_initial_mode_follows_course() {
        let src = Arc::new(RecordingSource::default());
        let ongoing = ViewModeSelector::new(src.clone(), &course(true), &FeedConfig::default());
        assert_eq!(ongoing.mode(), ViewMode::Timeline);

        let archived = ViewModeSelector::new(src, &course(false), &FeedConfig::default());
        assert_eq!(archived.mode(), ViewMode::Pdf);
    }

    #[tokio::test]
    async fn test_toggle_fetches_only_empty_mode() {
        let src = Arc::new(RecordingSource::default());
        let selector = ViewModeSelector::new(src.clone(), &course(true), &FeedConfig::default());

        assert_eq!(selector.mount().await, LoadOutcome::Loaded(4));
        assert_eq!(selector.toggle().await, Some(LoadOutcome::Loaded(4)));
        assert_eq!(selector.toggle().await, None);
        assert_eq!(selector.toggle().await, None);

        let requests = src.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].order, SortOrder::Desc);
        assert_eq!(requests[0].page_size, 5);
        assert_eq!(requests[1].order, SortOrder::Asc);
        assert_eq!(requests[1].page_size, 10);
        assert!(requests.iter().all(|r| r.cursor.is_none()));
    }

    #[tokio::test]
    async fn test_render_per_mode() {
        let src = Arc::new(RecordingSource::default());
        let selector = ViewModeSelector::new(src, &course(true), &FeedConfig::default());
        selector.mount().await;

        match selector.render() {
            FeedView::Timeline(items) => assert_eq!(items[0].id, "p3"),
            other => panic!("expected timeline, got {:?}", other),
        }

        selector.switch_to(ViewMode::Pdf).await;
        match selector.render() {
            FeedView::Pdf(slots) => assert_eq!(
                slots[0],
                FeedSlot::Image {
                    position: 1,
                    url: "img0".into()
                }
            ),
            other => panic!("expected pdf, got {:?}", other),
        }
        assert_eq!(selector.paginator(ViewMode::Pdf).cursor(), Some(Cursor::new("p3")));
    }

    #[tokio::test]
    async fn test_scroll_only_reaches_active_mode() {
        let src = Arc::new(RecordingSource::default());
        let selector = ViewModeSelector::new(src.clone(), &course(false), &FeedConfig::default());

        let bottom = ScrollPosition {
            scroll_top: 900.0,
            viewport_height: 100.0,
            document_height: 1_000.0,
        };
        assert_eq!(selector.on_scroll(bottom).await, Some(LoadOutcome::Loaded(4)));
        assert!(selector.paginator(ViewMode::Timeline).is_empty());
        assert_eq!(src.requests.lock().unwrap().len(), 1);
    }
}
