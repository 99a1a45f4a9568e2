//! Interstitial gating, in-feed placement and view counting end to end

use appwrite_client::{DocumentStore, MemoryStore};
use library_service::config::AdsConfig;
use library_service::interleaver::{
    choose_interstitial, interleave_images, AdContext, AdPool, AdPoolStore, FeedSlot,
    InterstitialDecision, InterstitialGate, ViewGuard,
};
use library_service::models::{AdCreative, FileType};
use library_service::services::AdService;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::sync::Arc;

fn ads_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_with_id(
            "ads",
            "campus-books",
            json!({
                "name": "Campus Books",
                "isExpired": false,
                "smallImages": ["s1", "s2"],
                "mediumImages": ["m1"],
                "largeImages": ["l1", "l2"],
                "videos": ["v1"],
                "views": 0,
                "uniqueUsers": [],
            }),
        )
        .unwrap();
    store
}

#[test]
fn test_course_page_shows_interstitial_about_one_in_five() {
    let mut rng = StdRng::seed_from_u64(2024);
    let config = AdsConfig::default();
    let gate = InterstitialGate::for_context(&config, AdContext::Course);
    let full = AdPool {
        interstitial: vec![AdCreative {
            ad_id: "a".into(),
            file_url: "l1".into(),
            file_type: FileType::Image,
            link: Some("#".into()),
            duration_ms: None,
        }],
        ..AdPool::default()
    };

    let trials = 20_000;
    let shown = (0..trials)
        .filter(|_| matches!(choose_interstitial(&full, &gate, &mut rng), InterstitialDecision::Show(_)))
        .count();
    let rate = shown as f64 / trials as f64;
    assert!((rate - 0.2).abs() < 0.02, "rate was {}", rate);
}

#[test]
fn test_empty_pool_never_renders_interstitial() {
    let mut rng = StdRng::seed_from_u64(9);
    let pool = AdPool::default();
    for context in [AdContext::Home, AdContext::Course, AdContext::AllCourses] {
        let gate = InterstitialGate::for_context(&AdsConfig::default(), context);
        for _ in 0..200 {
            assert!(choose_interstitial(&pool, &gate, &mut rng).creative().is_none());
        }
    }
}

#[test]
fn test_ad_slots_stay_global_across_appended_pages() {
    // Three pages of 12, 12 and 11 images appended to one pdf sequence
    let pages: Vec<Vec<String>> = [12usize, 12, 11]
        .iter()
        .enumerate()
        .map(|(p, n)| (0..*n).map(|i| format!("page{}-{}", p, i)).collect())
        .collect();

    let mut offset = 0;
    let mut slots = Vec::new();
    for images in pages {
        let count = images.len();
        slots.extend(interleave_images(images, offset));
        offset += count;
    }

    let mut last_position = 0;
    let mut ads_after = Vec::new();
    for slot in &slots {
        match slot {
            FeedSlot::Image { position, .. } => last_position = *position,
            FeedSlot::Ad { .. } => ads_after.push(last_position),
        }
    }
    assert_eq!(ads_after, vec![10, 20, 30]);
}

#[tokio::test]
async fn test_two_carousels_double_count_one_viewer() {
    let store = ads_store();
    let service = Arc::new(AdService::new(store.clone(), "ads", 10, 6));

    let top = ViewGuard::new(service.clone(), Some("student-1".into()));
    let bottom = ViewGuard::new(service.clone(), Some("student-1".into()));

    if let Some(handle) = top.on_intersection("campus-books", 0.8) {
        handle.await.unwrap();
    }
    if let Some(handle) = bottom.on_intersection("campus-books", 0.6) {
        handle.await.unwrap();
    }
    // Repeat sightings within the same carousel are ignored
    assert!(top.on_intersection("campus-books", 1.0).is_none());

    let doc = store.get_document("ads", "campus-books").await.unwrap();
    assert_eq!(doc.u64_or("views", 0).unwrap(), 2);
    assert_eq!(doc.string_list("uniqueUsers").unwrap(), vec!["student-1"]);
}

#[tokio::test]
async fn test_pool_store_serves_every_context() {
    let service = Arc::new(AdService::new(ads_store(), "ads", 10, 6));
    let pools = AdPoolStore::new(service);

    let pool = pools.current_or_refresh().await.unwrap();
    assert_eq!(pool.interstitial.len(), 3);
    assert_eq!(pool.small.first.len(), 3);
    assert_eq!(pool.medium.first.len(), 2);

    let mut rng = StdRng::seed_from_u64(1);
    let always = InterstitialGate::new(1);
    let creative = choose_interstitial(&pool, &always, &mut rng).creative().unwrap();
    assert_eq!(creative.ad_id, "campus-books");
    assert_eq!(creative.link.as_deref(), Some("#"));
}
