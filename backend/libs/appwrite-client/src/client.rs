//! REST client for the Appwrite databases and storage APIs

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::document::{Document, DocumentList};
use crate::error::{StoreError, StoreResult};
use crate::query::Query;
use crate::DocumentStore;

/// Connection settings for one Appwrite project/database
#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    /// API endpoint, e.g. `https://cloud.appwrite.io/v1`
    pub endpoint: String,
    pub project_id: String,
    /// Server API key; requests go out unauthenticated when absent
    pub api_key: Option<String>,
    pub database_id: String,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
pub struct AppwriteClient {
    http: Client,
    config: AppwriteConfig,
}

impl AppwriteClient {
    pub fn new(config: AppwriteConfig) -> StoreResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint.trim_end_matches('/'),
            self.config.database_id,
            collection
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.documents_url(collection), id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("X-Appwrite-Project", &self.config.project_id);
        match &self.config.api_key {
            Some(key) => request.header("X-Appwrite-Key", key),
            None => request,
        }
    }

    async fn check(response: Response, resource: &str) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(resource.to_string()));
        }

        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) if !body.message.is_empty() => body.message,
            _ => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };
        warn!(status = status.as_u16(), %resource, "Appwrite request failed: {}", message);
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DocumentStore for AppwriteClient {
    async fn list_documents(&self, collection: &str, queries: &[Query]) -> StoreResult<DocumentList> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_json()))
            .collect();

        debug!(%collection, queries = params.len(), "Listing documents");

        let response = self
            .authorize(self.http.get(self.documents_url(collection)))
            .query(&params)
            .send()
            .await?;
        let response = Self::check(response, collection).await?;
        Ok(response.json::<DocumentList>().await?)
    }

    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Document> {
        let response = self
            .authorize(self.http.get(self.document_url(collection, id)))
            .send()
            .await?;
        let response = Self::check(response, &format!("{}/{}", collection, id)).await?;
        Ok(response.json::<Document>().await?)
    }

    async fn update_document(&self, collection: &str, id: &str, patch: Value) -> StoreResult<Document> {
        debug!(%collection, %id, "Updating document");

        let response = self
            .authorize(self.http.patch(self.document_url(collection, id)))
            .json(&json!({ "data": patch }))
            .send()
            .await?;
        let response = Self::check(response, &format!("{}/{}", collection, id)).await?;
        Ok(response.json::<Document>().await?)
    }

    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()> {
        let response = self
            .authorize(self.http.delete(self.document_url(collection, id)))
            .send()
            .await?;
        Self::check(response, &format!("{}/{}", collection, id)).await?;
        Ok(())
    }

    async fn delete_file(&self, bucket: &str, file_id: &str) -> StoreResult<()> {
        let url = format!(
            "{}/storage/buckets/{}/files/{}",
            self.config.endpoint.trim_end_matches('/'),
            bucket,
            file_id
        );
        let response = self.authorize(self.http.delete(url)).send().await?;
        Self::check(response, &format!("{}/{}", bucket, file_id)).await?;
        Ok(())
    }
}
