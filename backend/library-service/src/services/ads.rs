/// Ad service - active campaigns, creative pools and view counting
use crate::error::Result;
use crate::interleaver::AdPool;
use crate::metrics::ads::{AD_POOL_SIZE, AD_VIEWS_TOTAL};
use crate::models::{Ad, ViewCount};
use appwrite_client::{DocumentStore, Query, CREATED_AT};
use serde_json::json;
use std::sync::Arc;

pub struct AdService {
    store: Arc<dyn DocumentStore>,
    collection: String,
    active_limit: u32,
    slot_size: usize,
}

impl AdService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        active_limit: u32,
        slot_size: usize,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            active_limit,
            slot_size,
        }
    }

    /// Newest campaigns not flagged as expired
    ///
    /// `endTime` is not rechecked here; the expiry flag is authoritative.
    pub async fn fetch_active_ads(&self) -> Result<Vec<Ad>> {
        let queries = [
            Query::equal("isExpired", false),
            Query::order_desc(CREATED_AT),
            Query::limit(self.active_limit),
        ];

        let listed = self.store.list_documents(&self.collection, &queries).await?;
        let ads = listed
            .documents
            .iter()
            .map(Ad::from_document)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!(count = ads.len(), "active ads fetched");
        Ok(ads)
    }

    /// Build a fresh creative pool from the active campaigns
    pub async fn build_pool(&self) -> Result<AdPool> {
        let ads = self.fetch_active_ads().await?;
        let pool = AdPool::from_ads(&ads, self.slot_size, &mut rand::thread_rng());

        AD_POOL_SIZE
            .with_label_values(&["small"])
            .set(pool.small.first.len() as i64);
        AD_POOL_SIZE
            .with_label_values(&["medium"])
            .set(pool.medium.first.len() as i64);
        AD_POOL_SIZE
            .with_label_values(&["interstitial"])
            .set(pool.interstitial.len() as i64);

        Ok(pool)
    }

    /// Count one view of an ad, adding `user_id` to its unique viewers
    ///
    /// Read-modify-write without a version check: concurrent recordings for
    /// the same ad can lose increments.
    pub async fn record_view(&self, ad_id: &str, user_id: Option<&str>) -> Result<ViewCount> {
        let result = self.increment_views(ad_id, user_id).await;
        match &result {
            Ok(count) => {
                AD_VIEWS_TOTAL.with_label_values(&["recorded"]).inc();
                tracing::debug!(ad_id, views = count.views, "ad view recorded");
            }
            Err(err) => {
                AD_VIEWS_TOTAL.with_label_values(&["error"]).inc();
                tracing::warn!(ad_id, error = %err, "ad view recording failed");
            }
        }
        result
    }

    async fn increment_views(&self, ad_id: &str, user_id: Option<&str>) -> Result<ViewCount> {
        let doc = self.store.get_document(&self.collection, ad_id).await?;
        let ad = Ad::from_document(&doc)?;

        let mut unique_users = ad.unique_users;
        if let Some(user) = user_id.filter(|u| !u.is_empty()) {
            if !unique_users.iter().any(|existing| existing == user) {
                unique_users.push(user.to_string());
            }
        }
        let views = ad.views + 1;

        self.store
            .update_document(
                &self.collection,
                ad_id,
                json!({ "views": views, "uniqueUsers": unique_users }),
            )
            .await?;

        Ok(ViewCount {
            ad_id: ad_id.to_string(),
            views,
            unique_viewers: unique_users.len(),
        })
    }
}
