//! In-process document store
//!
//! Mirrors the listing semantics of the REST API closely enough for local runs
//! and tests: filters apply first, then ordering, then `cursorAfter` and
//! `limit`. `total` counts the filtered documents before cursor and limit.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::document::{Document, DocumentList};
use crate::error::{StoreError, StoreResult};
use crate::query::{Direction, Query, CREATED_AT, UPDATED_AT};
use crate::DocumentStore;

/// Listing limit applied when no `limit` query is given
pub const DEFAULT_LIMIT: usize = 25;

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Document>>,
    buckets: HashMap<String, HashSet<String>>,
    last_created: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document; creation times are strictly increasing
    pub fn insert_with_id(&self, collection: &str, id: &str, fields: Value) -> StoreResult<Document> {
        let Value::Object(fields) = fields else {
            return Err(StoreError::invalid(id, "document fields must be an object"));
        };

        let mut inner = self.write();
        let mut created_at = Utc::now();
        if let Some(last) = inner.last_created {
            if created_at <= last {
                created_at = last + Duration::milliseconds(1);
            }
        }
        inner.last_created = Some(created_at);

        let documents = inner.collections.entry(collection.to_string()).or_default();
        if documents.iter().any(|d| d.id == id) {
            return Err(StoreError::Api {
                status: 409,
                message: format!("Document with the requested ID '{}' already exists", id),
            });
        }

        let document = Document::new(id, created_at, fields);
        documents.push(document.clone());
        Ok(document)
    }

    /// Register a stored file so it can later be deleted
    pub fn put_file(&self, bucket: &str, file_id: &str) {
        self.write()
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(file_id.to_string());
    }

    pub fn has_file(&self, bucket: &str, file_id: &str) -> bool {
        self.read()
            .buckets
            .get(bucket)
            .map(|files| files.contains(file_id))
            .unwrap_or(false)
    }

    pub fn len(&self, collection: &str) -> usize {
        self.read()
            .collections
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn field_value(document: &Document, attribute: &str) -> Option<Value> {
    match attribute {
        "$id" => Some(Value::String(document.id.clone())),
        CREATED_AT => Some(Value::String(document.created_at.to_rfc3339())),
        UPDATED_AT => Some(Value::String(document.updated_at.to_rfc3339())),
        _ => document.get(attribute).cloned(),
    }
}

fn matches_equal(document: &Document, attribute: &str, values: &[Value]) -> bool {
    match field_value(document, attribute) {
        Some(Value::Array(items)) => items.iter().any(|item| values.contains(item)),
        Some(value) => values.contains(&value),
        None => false,
    }
}

fn matches_search(document: &Document, attribute: &str, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    matches!(
        field_value(document, attribute),
        Some(Value::String(s)) if s.to_lowercase().contains(&needle)
    )
}

fn compare(a: &Document, b: &Document, attribute: &str) -> Ordering {
    match attribute {
        CREATED_AT => a.created_at.cmp(&b.created_at),
        UPDATED_AT => a.updated_at.cmp(&b.updated_at),
        _ => {
            let left = field_value(a, attribute);
            let right = field_value(b, attribute);
            match (left, right) {
                (Some(Value::Number(l)), Some(Value::Number(r))) => l
                    .as_f64()
                    .partial_cmp(&r.as_f64())
                    .unwrap_or(Ordering::Equal),
                (Some(Value::String(l)), Some(Value::String(r))) => l.cmp(&r),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                _ => Ordering::Equal,
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self, collection: &str, queries: &[Query]) -> StoreResult<DocumentList> {
        let inner = self.read();
        let mut documents: Vec<Document> = inner
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default();
        drop(inner);

        let mut limit = DEFAULT_LIMIT;
        let mut cursor: Option<&str> = None;

        for query in queries {
            match query {
                Query::Equal { attribute, values } => {
                    documents.retain(|d| matches_equal(d, attribute, values))
                }
                Query::Search { attribute, value } => {
                    documents.retain(|d| matches_search(d, attribute, value))
                }
                Query::Order { .. } => {}
                Query::Limit(l) => limit = *l as usize,
                Query::CursorAfter(id) => cursor = Some(id.as_str()),
            }
        }

        // Later order queries act as tie-breakers for earlier ones
        documents.sort_by(|a, b| {
            for query in queries {
                if let Query::Order {
                    attribute,
                    direction,
                } = query
                {
                    let ord = match direction {
                        Direction::Asc => compare(a, b, attribute),
                        Direction::Desc => compare(b, a, attribute),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
            Ordering::Equal
        });

        let total = documents.len() as u64;

        let start = match cursor {
            Some(id) => match documents.iter().position(|d| d.id == id) {
                Some(position) => position + 1,
                None => {
                    return Err(StoreError::Api {
                        status: 400,
                        message: format!("Document '{}' for the 'cursor' value not found.", id),
                    })
                }
            },
            None => 0,
        };

        let documents = documents.into_iter().skip(start).take(limit).collect();
        Ok(DocumentList { total, documents })
    }

    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Document> {
        self.read()
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, id)))
    }

    async fn update_document(&self, collection: &str, id: &str, patch: Value) -> StoreResult<Document> {
        let Value::Object(patch) = patch else {
            return Err(StoreError::invalid(id, "patch must be an object"));
        };

        let mut inner = self.write();
        let document = inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, id)))?;

        let fields: &mut Map<String, Value> = &mut document.fields;
        for (key, value) in patch {
            fields.insert(key, value);
        }
        document.updated_at = Utc::now().max(document.updated_at);
        Ok(document.clone())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut inner = self.write();
        let documents = inner
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, id)))?;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        if documents.len() == before {
            return Err(StoreError::NotFound(format!("{}/{}", collection, id)));
        }
        Ok(())
    }

    async fn delete_file(&self, bucket: &str, file_id: &str) -> StoreResult<()> {
        let removed = self
            .write()
            .buckets
            .get_mut(bucket)
            .map(|files| files.remove(file_id))
            .unwrap_or(false);
        if removed {
            Ok(())
        } else {
            Err(StoreError::NotFound(format!("{}/{}", bucket, file_id)))
        }
    }
}
