//! Appwrite document-store client
//!
//! Thin typed access to the two backend surfaces ED-Library depends on:
//! - Databases: list (filter / order / limit / cursor-after), get, update, delete
//! - Storage: file deletion and view-URL helpers
//!
//! Services depend on the [`DocumentStore`] trait; [`AppwriteClient`] talks to
//! the REST API and [`MemoryStore`] keeps everything in process.

mod client;
mod document;
mod error;
mod memory;
mod query;

pub mod storage;

pub use client::{AppwriteClient, AppwriteConfig};
pub use document::{Document, DocumentList};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use query::{Direction, Query, CREATED_AT, UPDATED_AT};

use async_trait::async_trait;
use serde_json::Value;

/// Document collection operations used by the services
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents matching `queries`
    async fn list_documents(&self, collection: &str, queries: &[Query]) -> StoreResult<DocumentList>;

    /// Fetch one document by id
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Document>;

    /// Merge `patch` (a JSON object) into a document
    async fn update_document(&self, collection: &str, id: &str, patch: Value) -> StoreResult<Document>;

    /// Delete a document
    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Delete a stored file
    async fn delete_file(&self, bucket: &str, file_id: &str) -> StoreResult<()>;
}
