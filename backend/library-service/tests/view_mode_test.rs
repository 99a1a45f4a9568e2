//! View-mode switching fetch counts, with a mocked page source

use async_trait::async_trait;
use chrono::Utc;
use library_service::config::FeedConfig;
use library_service::feed::{
    FeedView, LoadOutcome, PageRequest, PageSource, ScrollPosition, ViewModeSelector,
};
use library_service::models::{ContentItem, FeedPage, SortOrder, ViewMode};
use library_service::Result;
use mockall::*;
use std::sync::Arc;

mock! {
    pub Source {}

    #[async_trait]
    impl PageSource for Source {
        async fn fetch_page(&self, request: &PageRequest) -> Result<FeedPage>;
    }
}

fn page(prefix: &str, count: usize, page_size: u32) -> FeedPage {
    let items = (0..count)
        .map(|i| ContentItem {
            id: format!("{}{}", prefix, i),
            images: (0..3).map(|j| format!("{}{}-{}.png", prefix, i, j)).collect(),
            description: None,
            created_at: Utc::now(),
        })
        .collect();
    FeedPage::from_lookahead(items, page_size as usize)
}

#[tokio::test]
async fn test_toggle_fetches_once_per_empty_mode() {
    let mut source = MockSource::new();
    source
        .expect_fetch_page()
        .withf(|r: &PageRequest| r.order == SortOrder::Desc && r.cursor.is_none())
        .times(1)
        .returning(|r| Ok(page("t", 5, r.page_size)));
    source
        .expect_fetch_page()
        .withf(|r: &PageRequest| r.order == SortOrder::Asc && r.cursor.is_none())
        .times(1)
        .returning(|r| Ok(page("p", 4, r.page_size)));

    let selector =
        ViewModeSelector::with_mode(Arc::new(source), "c1", ViewMode::Timeline, &FeedConfig::default());

    assert_eq!(selector.mount().await, LoadOutcome::Loaded(5));
    assert_eq!(selector.toggle().await, Some(LoadOutcome::Loaded(4)));
    assert_eq!(selector.mode(), ViewMode::Pdf);

    // Both caches are filled; further switches are free
    for _ in 0..4 {
        assert_eq!(selector.toggle().await, None);
    }
    assert_eq!(selector.switch_to(ViewMode::Pdf).await, None);

    // Pdf cache keeps its own exhausted state
    assert!(!selector.paginator(ViewMode::Pdf).has_more());
}

#[tokio::test]
async fn test_failed_first_page_is_fetched_again_on_return() {
    let mut source = MockSource::new();
    let mut seq = Sequence::new();
    source
        .expect_fetch_page()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(library_service::AppError::Backend("timeout".into())));
    source
        .expect_fetch_page()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|r| Ok(page("t", 2, r.page_size)));
    source
        .expect_fetch_page()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|r| Ok(page("p", 1, r.page_size)));

    let selector =
        ViewModeSelector::with_mode(Arc::new(source), "c1", ViewMode::Pdf, &FeedConfig::default());

    assert_eq!(selector.mount().await, LoadOutcome::Failed);
    assert!(selector.paginator(ViewMode::Pdf).is_empty());

    assert_eq!(selector.toggle().await, Some(LoadOutcome::Loaded(2)));
    assert_eq!(selector.mode(), ViewMode::Timeline);

    // The pdf cache is still empty, so returning to it fetches again
    assert_eq!(selector.toggle().await, Some(LoadOutcome::Loaded(1)));
    assert_eq!(selector.toggle().await, None);
}

#[tokio::test]
async fn test_pdf_render_places_ad_after_tenth_image() {
    let mut source = MockSource::new();
    source
        .expect_fetch_page()
        .times(1)
        .returning(|r| Ok(page("p", 4, r.page_size)));

    let selector =
        ViewModeSelector::with_mode(Arc::new(source), "c1", ViewMode::Pdf, &FeedConfig::default());
    selector.mount().await;

    let FeedView::Pdf(slots) = selector.render() else {
        panic!("expected pdf view");
    };
    // 4 posts x 3 images = 12 images, one ad after the 10th
    assert_eq!(slots.len(), 13);
    assert!(matches!(
        slots[10],
        library_service::interleaver::FeedSlot::Ad { slot: 0 }
    ));
}

#[tokio::test]
async fn test_scroll_near_bottom_loads_next_page_of_active_mode() {
    let mut source = MockSource::new();
    source
        .expect_fetch_page()
        .withf(|r: &PageRequest| r.order == SortOrder::Desc)
        .times(2)
        .returning(|r| Ok(page("t", r.page_size as usize + 1, r.page_size)));

    let selector =
        ViewModeSelector::with_mode(Arc::new(source), "c1", ViewMode::Timeline, &FeedConfig::default());
    selector.mount().await;

    let far = ScrollPosition {
        scroll_top: 0.0,
        viewport_height: 600.0,
        document_height: 3_000.0,
    };
    assert_eq!(selector.on_scroll(far).await, None);

    let near = ScrollPosition {
        scroll_top: 2_300.0,
        viewport_height: 600.0,
        document_height: 3_000.0,
    };
    assert_eq!(selector.on_scroll(near).await, Some(LoadOutcome::Loaded(5)));
    assert_eq!(selector.paginator(ViewMode::Timeline).len(), 10);
}
