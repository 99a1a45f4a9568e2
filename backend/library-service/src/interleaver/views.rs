//! Once-per-instance ad view recording

use crate::error::Result;
use crate::models::ViewCount;
use crate::services::AdService;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Fraction of a carousel that must be on screen before it counts as viewed
pub const VISIBILITY_THRESHOLD: f64 = 0.5;

/// Destination of recorded views
#[async_trait]
pub trait ViewSink: Send + Sync {
    async fn record_view(&self, ad_id: &str, user_id: Option<&str>) -> Result<ViewCount>;
}

#[async_trait]
impl ViewSink for AdService {
    async fn record_view(&self, ad_id: &str, user_id: Option<&str>) -> Result<ViewCount> {
        AdService::record_view(self, ad_id, user_id).await
    }
}

/// Records each ad at most once for the lifetime of one placement
///
/// The seen set is local to the guard: two placements showing the same ad
/// both record it.
pub struct ViewGuard {
    sink: Arc<dyn ViewSink>,
    user_id: Option<String>,
    recorded: Mutex<HashSet<String>>,
}

impl ViewGuard {
    pub fn new(sink: Arc<dyn ViewSink>, user_id: Option<String>) -> Self {
        Self {
            sink,
            user_id,
            recorded: Mutex::new(HashSet::new()),
        }
    }

    fn claim(&self, ad_id: &str) -> bool {
        let mut recorded = self
            .recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        recorded.insert(ad_id.to_string())
    }

    pub fn has_recorded(&self, ad_id: &str) -> bool {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(ad_id)
    }

    /// Interstitial media finished loading; records and waits for the write
    ///
    /// Failures are logged and not retried.
    pub async fn on_media_loaded(&self, ad_id: &str) -> Option<ViewCount> {
        if !self.claim(ad_id) {
            return None;
        }
        match self.sink.record_view(ad_id, self.user_id.as_deref()).await {
            Ok(count) => Some(count),
            Err(err) => {
                tracing::warn!(ad_id, error = %err, "interstitial view not recorded");
                None
            }
        }
    }

    /// Carousel visibility changed; records in the background once the
    /// visible ratio reaches [`VISIBILITY_THRESHOLD`]
    pub fn on_intersection(&self, ad_id: &str, visible_ratio: f64) -> Option<JoinHandle<()>> {
        if visible_ratio < VISIBILITY_THRESHOLD || !self.claim(ad_id) {
            return None;
        }

        let sink = Arc::clone(&self.sink);
        let user_id = self.user_id.clone();
        let ad_id = ad_id.to_string();
        Some(tokio::spawn(async move {
            if let Err(err) = sink.record_view(&ad_id, user_id.as_deref()).await {
                tracing::warn!(ad_id = %ad_id, error = %err, "carousel view not recorded");
            }
        }))
    }
}
