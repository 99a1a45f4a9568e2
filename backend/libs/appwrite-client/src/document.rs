//! Raw documents as returned by the databases API
//!
//! Field accessors are deliberately strict about types and lenient about
//! absence: a missing or `null` field yields the empty/default value, a field
//! of the wrong JSON type is an `InvalidDocument` error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "$updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One page of a collection listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentList {
    /// Number of documents matching the filters, ignoring limit and cursor
    pub total: u64,
    pub documents: Vec<Document>,
}

impl Document {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            created_at,
            updated_at: created_at,
            fields,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.fields.get(key) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// Required string field
    pub fn required_str(&self, key: &str) -> StoreResult<String> {
        self.optional_str(key)?
            .ok_or_else(|| StoreError::invalid(&self.id, format!("missing field `{}`", key)))
    }

    pub fn optional_str(&self, key: &str) -> StoreResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.type_error(key, "string", other)),
        }
    }

    /// String array field; absent means empty
    pub fn string_list(&self, key: &str) -> StoreResult<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(self.type_error(key, "string array", other)),
                })
                .collect(),
            Some(other) => Err(self.type_error(key, "string array", other)),
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> StoreResult<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(self.type_error(key, "boolean", other)),
        }
    }

    pub fn u64_or(&self, key: &str, default: u64) -> StoreResult<u64> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_u64()
                .ok_or_else(|| self.type_error(key, "unsigned integer", value)),
        }
    }

    fn type_error(&self, key: &str, expected: &str, found: &Value) -> StoreError {
        StoreError::invalid(
            &self.id,
            format!("field `{}` should be {}, found {}", key, expected, found),
        )
    }
}
