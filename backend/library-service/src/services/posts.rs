/// Post service - cursor-paginated course feeds and post management
use crate::error::{AppError, Result};
use crate::metrics::feed::{FEED_PAGES_TOTAL, FEED_PAGE_DURATION_SECONDS, POST_MUTATIONS_TOTAL};
use crate::models::{ContentItem, Cursor, FeedPage, SortOrder};
use appwrite_client::{storage, DocumentStore, Query, CREATED_AT};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

/// Attribute linking a post to its course
const COURSE_ATTRIBUTE: &str = "courses";

pub struct PostService {
    store: Arc<dyn DocumentStore>,
    collection: String,
    bucket: String,
    max_page_size: u32,
}

impl PostService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        bucket: impl Into<String>,
        max_page_size: u32,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            bucket: bucket.into(),
            max_page_size,
        }
    }

    /// Fetch one page of a course's posts after `cursor`
    ///
    /// One extra document is requested to learn whether another page exists;
    /// it is dropped before the page is returned.
    pub async fn fetch_page(
        &self,
        course_id: &str,
        page_size: u32,
        cursor: Option<&Cursor>,
        order: SortOrder,
    ) -> Result<FeedPage> {
        if page_size == 0 || page_size > self.max_page_size {
            return Err(AppError::Validation(format!(
                "page size must be between 1 and {}",
                self.max_page_size
            )));
        }

        let mut queries = vec![
            Query::equal(COURSE_ATTRIBUTE, course_id),
            match order {
                SortOrder::Asc => Query::order_asc(CREATED_AT),
                SortOrder::Desc => Query::order_desc(CREATED_AT),
            },
            Query::limit(page_size + 1),
        ];
        if let Some(cursor) = cursor {
            queries.push(Query::cursor_after(cursor.as_str()));
        }

        let order_label = order_label(order);
        let started = Instant::now();
        let listed = self.store.list_documents(&self.collection, &queries).await;
        FEED_PAGE_DURATION_SECONDS
            .with_label_values(&[order_label])
            .observe(started.elapsed().as_secs_f64());

        let listed = match listed {
            Ok(list) => list,
            Err(err) => {
                FEED_PAGES_TOTAL
                    .with_label_values(&[order_label, "error"])
                    .inc();
                tracing::warn!(course_id, order = order_label, error = %err, "feed page fetch failed");
                return Err(err.into());
            }
        };

        let items = listed
            .documents
            .iter()
            .map(ContentItem::from_document)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let page = FeedPage::from_lookahead(items, page_size as usize);
        FEED_PAGES_TOTAL.with_label_values(&[order_label, "ok"]).inc();
        tracing::debug!(
            course_id,
            order = order_label,
            items = page.items.len(),
            has_more = page.has_more,
            "feed page fetched"
        );

        Ok(page)
    }

    /// Get a post by ID
    pub async fn get_post(&self, post_id: &str) -> Result<ContentItem> {
        let doc = self.store.get_document(&self.collection, post_id).await?;
        Ok(ContentItem::from_document(&doc)?)
    }

    /// Replace a post's description; an empty string clears it
    pub async fn edit_description(&self, post_id: &str, description: &str) -> Result<ContentItem> {
        let result = self
            .store
            .update_document(
                &self.collection,
                post_id,
                json!({ "description": description.trim() }),
            )
            .await;
        record_mutation("edit_description", result.is_ok());

        let doc = result?;
        tracing::info!(post_id, "post description updated");
        Ok(ContentItem::from_document(&doc)?)
    }

    /// Remove one image from a post and delete the underlying file
    ///
    /// The file is deleted first; if that fails the post is left unchanged.
    pub async fn remove_image(&self, post_id: &str, image_url: &str) -> Result<ContentItem> {
        let file_id = storage::file_id_from_view_url(image_url).ok_or_else(|| {
            AppError::Validation(format!("not a stored file URL: {}", image_url))
        })?;

        let post = self.get_post(post_id).await?;
        if !post.images.iter().any(|url| url == image_url) {
            return Err(AppError::NotFound(format!(
                "image not attached to post {}",
                post_id
            )));
        }

        if let Err(err) = self.store.delete_file(&self.bucket, file_id).await {
            record_mutation("remove_image", false);
            tracing::warn!(post_id, file_id, error = %err, "image file delete failed");
            return Err(err.into());
        }

        let remaining: Vec<String> = post
            .images
            .into_iter()
            .filter(|url| url != image_url)
            .collect();

        let result = self
            .store
            .update_document(&self.collection, post_id, json!({ "images": remaining }))
            .await;
        record_mutation("remove_image", result.is_ok());

        let doc = result?;
        tracing::info!(post_id, file_id, "image removed from post");
        Ok(ContentItem::from_document(&doc)?)
    }

    /// Delete a post document
    pub async fn delete_post(&self, post_id: &str) -> Result<()> {
        let result = self.store.delete_document(&self.collection, post_id).await;
        record_mutation("delete", result.is_ok());
        result?;

        tracing::info!(post_id, "post deleted");
        Ok(())
    }
}

fn order_label(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "asc",
        SortOrder::Desc => "desc",
    }
}

fn record_mutation(operation: &str, ok: bool) {
    POST_MUTATIONS_TOTAL
        .with_label_values(&[operation, if ok { "ok" } else { "error" }])
        .inc();
}
