//! Collection queries
//!
//! Queries serialize to Appwrite's JSON query syntax, one string per
//! `queries[]` parameter:
//! - `{"method":"equal","attribute":"courses","values":["c1"]}`
//! - `{"method":"orderDesc","attribute":"$createdAt"}`
//! - `{"method":"limit","values":[5]}`
//! - `{"method":"cursorAfter","values":["post-id"]}`

use serde_json::{json, Value};

/// System attribute holding the creation timestamp
pub const CREATED_AT: &str = "$createdAt";

/// System attribute holding the last update timestamp
pub const UPDATED_AT: &str = "$updatedAt";

/// Sort direction for timestamp ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Equal { attribute: String, values: Vec<Value> },
    Search { attribute: String, value: String },
    Order { attribute: String, direction: Direction },
    Limit(u32),
    CursorAfter(String),
}

impl Query {
    pub fn equal(attribute: &str, value: impl Into<Value>) -> Self {
        Query::Equal {
            attribute: attribute.to_string(),
            values: vec![value.into()],
        }
    }

    pub fn search(attribute: &str, value: &str) -> Self {
        Query::Search {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    pub fn order_asc(attribute: &str) -> Self {
        Query::Order {
            attribute: attribute.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn order_desc(attribute: &str) -> Self {
        Query::Order {
            attribute: attribute.to_string(),
            direction: Direction::Desc,
        }
    }

    pub fn limit(limit: u32) -> Self {
        Query::Limit(limit)
    }

    pub fn cursor_after(id: &str) -> Self {
        Query::CursorAfter(id.to_string())
    }

    /// Render the query the way the REST API expects it
    pub fn to_json(&self) -> String {
        let value = match self {
            Query::Equal { attribute, values } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": values,
            }),
            Query::Search { attribute, value } => json!({
                "method": "search",
                "attribute": attribute,
                "values": [value],
            }),
            Query::Order {
                attribute,
                direction,
            } => json!({
                "method": match direction {
                    Direction::Asc => "orderAsc",
                    Direction::Desc => "orderDesc",
                },
                "attribute": attribute,
            }),
            Query::Limit(limit) => json!({
                "method": "limit",
                "values": [limit],
            }),
            Query::CursorAfter(id) => json!({
                "method": "cursorAfter",
                "values": [id],
            }),
        };
        value.to_string()
    }
}
