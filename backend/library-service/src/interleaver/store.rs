//! Application-wide holder of the current ad pool

use super::pool::AdPool;
use crate::services::AdService;
use std::sync::Arc;
use tokio::sync::watch;

/// Latest pool built for a page load, shared by every page that places ads
///
/// Each page load calls [`AdPoolStore::refresh`]; readers use
/// [`AdPoolStore::current`] or hold a [`watch::Receiver`] to be told when a
/// refresh lands. A failed refresh keeps the previous pool.
pub struct AdPoolStore {
    service: Arc<AdService>,
    tx: watch::Sender<Option<Arc<AdPool>>>,
}

impl AdPoolStore {
    pub fn new(service: Arc<AdService>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { service, tx }
    }

    /// Rebuild the pool from the active campaigns; returns whether it changed
    pub async fn refresh(&self) -> bool {
        match self.service.build_pool().await {
            Ok(pool) => {
                tracing::info!(
                    interstitial = pool.interstitial.len(),
                    small = pool.small.first.len(),
                    medium = pool.medium.first.len(),
                    "ad pool refreshed"
                );
                self.tx.send_replace(Some(Arc::new(pool)));
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "ad pool refresh failed; keeping previous pool");
                false
            }
        }
    }

    /// Current pool, if one has been loaded
    pub fn current(&self) -> Option<Arc<AdPool>> {
        self.tx.borrow().clone()
    }

    /// Current pool, loading it first if nothing has been loaded yet
    pub async fn current_or_refresh(&self) -> Option<Arc<AdPool>> {
        if self.current().is_none() {
            self.refresh().await;
        }
        self.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<AdPool>>> {
        self.tx.subscribe()
    }

    /// Drop the pool (logout); subscribers observe `None`
    pub fn teardown(&self) {
        self.tx.send_replace(None);
        tracing::debug!("ad pool cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appwrite_client::{DocumentStore, MemoryStore};
    use serde_json::json;

    fn store_with_ad() -> (Arc<MemoryStore>, AdPoolStore) {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_with_id("ads", "a1", json!({ "isExpired": false, "largeImages": ["l1"] }))
            .unwrap();
        let service = Arc::new(AdService::new(store.clone(), "ads", 10, 6));
        (store, AdPoolStore::new(service))
    }

    #[tokio::test]
    async fn test_refresh_notifies_subscribers() {
        let (_store, pools) = store_with_ad();
        let mut rx = pools.subscribe();
        assert!(pools.current().is_none());

        assert!(pools.refresh().await);
        rx.changed().await.unwrap();
        let pool = rx.borrow().clone().unwrap();
        assert_eq!(pool.interstitial.len(), 1);
    }

    #[tokio::test]
    async fn test_teardown_clears_pool() {
        let (_store, pools) = store_with_ad();
        assert!(pools.current_or_refresh().await.is_some());

        pools.teardown();
        assert!(pools.current().is_none());
    }

    #[tokio::test]
    async fn test_refresh_drops_expired_campaigns() {
        let (store, pools) = store_with_ad();
        pools.refresh().await;

        store
            .update_document("ads", "a1", json!({ "isExpired": true }))
            .await
            .unwrap();
        store
            .insert_with_id("ads", "a2", json!({ "isExpired": false, "largeImages": ["l2"] }))
            .unwrap();
        assert!(pools.refresh().await);

        let pool = pools.current().unwrap();
        assert_eq!(pool.interstitial.len(), 1);
        assert_eq!(pool.interstitial[0].file_url, "l2");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_pool() {
        let (store, pools) = store_with_ad();
        pools.refresh().await;

        store
            .insert_with_id("ads", "broken", json!({ "isExpired": false, "videos": "nope" }))
            .unwrap();
        assert!(!pools.refresh().await);
        assert_eq!(pools.current().unwrap().interstitial.len(), 1);
    }
}
