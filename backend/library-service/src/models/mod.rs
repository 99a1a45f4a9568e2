//! Typed views of backend documents
//!
//! Every document crossing the store boundary is parsed here. Required fields
//! that are missing, or fields of the wrong JSON type, fail the parse instead
//! of being papered over with defaults.

use appwrite_client::{Document, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque pagination token: the id of the last item the caller received
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(id: impl Into<String>) -> Self {
        Cursor(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creation-time ordering of a feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first
    #[default]
    Desc,
    /// Oldest first
    Asc,
}

/// Feed projection of a course page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Reverse-chronological posts, images grouped per post
    Timeline,
    /// Chronological, all images flattened into one sequence
    Pdf,
}

impl ViewMode {
    pub fn order(self) -> SortOrder {
        match self {
            ViewMode::Timeline => SortOrder::Desc,
            ViewMode::Pdf => SortOrder::Asc,
        }
    }

    pub fn other(self) -> ViewMode {
        match self {
            ViewMode::Timeline => ViewMode::Pdf,
            ViewMode::Pdf => ViewMode::Timeline,
        }
    }
}

/// A post: an ordered group of note images with an optional caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        Ok(Self {
            id: doc.id.clone(),
            images: doc.string_list("images")?,
            description: doc.optional_str("description")?.filter(|d| !d.is_empty()),
            created_at: doc.created_at,
        })
    }
}

/// One fetched page of posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub items: Vec<ContentItem>,
    /// Id of the last item in this page; `None` when the page is empty
    pub next_cursor: Option<Cursor>,
    pub has_more: bool,
}

impl FeedPage {
    /// Build a page from a lookahead listing of up to `page_size + 1` items
    pub fn from_lookahead(mut items: Vec<ContentItem>, page_size: usize) -> Self {
        let has_more = items.len() > page_size;
        items.truncate(page_size);
        let next_cursor = items.last().map(|item| Cursor::new(item.id.clone()));
        Self {
            items,
            next_cursor,
            has_more,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub code: String,
    pub description: String,
    pub lecturer: Option<String>,
    pub thumbnail_url: Option<String>,
    pub department: Option<String>,
    /// Courses still receiving uploads open on the timeline
    pub ongoing: bool,
}

impl Course {
    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        Ok(Self {
            id: doc.id.clone(),
            title: doc.required_str("title")?,
            code: doc.required_str("code")?,
            description: doc.optional_str("description")?.unwrap_or_default(),
            lecturer: doc.optional_str("lecturer")?,
            thumbnail_url: doc.optional_str("thumbnailUrl")?,
            department: doc.optional_str("department")?,
            ongoing: doc.bool_or("ongoing", false)?,
        })
    }

    pub fn default_view_mode(&self) -> ViewMode {
        if self.ongoing {
            ViewMode::Timeline
        } else {
            ViewMode::Pdf
        }
    }
}

/// One horizontally scrolled row of the department grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRow {
    pub department: String,
    pub courses: Vec<Course>,
    /// Courses in the department, across all pages
    pub total: u64,
    pub next_cursor: Option<Cursor>,
    pub has_more: bool,
}

impl DepartmentRow {
    /// Build a row from a lookahead listing of up to `page_size + 1` courses
    pub fn from_lookahead(
        department: impl Into<String>,
        mut courses: Vec<Course>,
        page_size: usize,
        total: u64,
    ) -> Self {
        let has_more = courses.len() > page_size;
        courses.truncate(page_size);
        let next_cursor = courses.last().map(|course| Cursor::new(course.id.clone()));
        Self {
            department: department.into(),
            courses,
            total,
            next_cursor,
            has_more,
        }
    }
}

/// An ad campaign document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: String,
    pub name: String,
    pub small_images: Vec<String>,
    pub medium_images: Vec<String>,
    pub large_images: Vec<String>,
    pub videos: Vec<String>,
    pub views: u64,
    pub unique_users: Vec<String>,
    pub is_expired: bool,
    pub end_time: Option<String>,
    pub link: Option<String>,
}

impl Ad {
    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        Ok(Self {
            id: doc.id.clone(),
            name: doc.optional_str("name")?.unwrap_or_default(),
            small_images: doc.string_list("smallImages")?,
            medium_images: doc.string_list("mediumImages")?,
            large_images: doc.string_list("largeImages")?,
            videos: doc.string_list("videos")?,
            views: doc.u64_or("views", 0)?,
            unique_users: doc.string_list("uniqueUsers")?,
            is_expired: doc.bool_or("isExpired", false)?,
            end_time: doc.optional_str("endTime")?,
            link: doc.optional_str("link")?.filter(|l| !l.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
}

/// A single piece of ad media; several creatives can share one campaign id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCreative {
    pub ad_id: String,
    pub file_url: String,
    pub file_type: FileType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Dwell override for image creatives, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl AdCreative {
    pub fn image(ad: &Ad, url: &str) -> Self {
        Self {
            ad_id: ad.id.clone(),
            file_url: url.to_string(),
            file_type: FileType::Image,
            link: ad.link.clone(),
            duration_ms: None,
        }
    }

    pub fn video(ad: &Ad, url: &str) -> Self {
        Self {
            ad_id: ad.id.clone(),
            file_url: url.to_string(),
            file_type: FileType::Video,
            link: ad.link.clone(),
            duration_ms: None,
        }
    }
}

/// View counters of an ad after a recorded view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewCount {
    pub ad_id: String,
    pub views: u64,
    pub unique_viewers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(id: &str, fields: Value) -> Document {
        let Value::Object(map) = fields else {
            panic!("fields must be an object")
        };
        Document::new(id, Utc::now(), map)
    }

    fn item(id: &str) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            images: vec![],
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_content_item_defaults_missing_images() {
        let post = ContentItem::from_document(&doc("p1", json!({ "description": "" }))).unwrap();
        assert!(post.images.is_empty());
        assert_eq!(post.description, None);
    }

    #[test]
    fn test_content_item_rejects_non_string_images() {
        let result = ContentItem::from_document(&doc("p1", json!({ "images": [1, 2] })));
        assert!(result.is_err());
    }

    #[test]
    fn test_course_view_mode_follows_ongoing_flag() {
        let ongoing = Course::from_document(&doc(
            "c1",
            json!({ "title": "Macro", "code": "ECO201", "ongoing": true }),
        ))
        .unwrap();
        assert_eq!(ongoing.default_view_mode(), ViewMode::Timeline);

        let archived =
            Course::from_document(&doc("c2", json!({ "title": "Micro", "code": "ECO101" })))
                .unwrap();
        assert_eq!(archived.default_view_mode(), ViewMode::Pdf);
    }

    #[test]
    fn test_course_requires_title() {
        assert!(Course::from_document(&doc("c1", json!({ "code": "X" }))).is_err());
    }

    #[test]
    fn test_ad_parses_counters() {
        let ad = Ad::from_document(&doc(
            "a1",
            json!({
                "name": "Bookshop",
                "largeImages": ["l1"],
                "views": 12,
                "uniqueUsers": ["u1", "u2"],
                "isExpired": false,
                "link": ""
            }),
        ))
        .unwrap();
        assert_eq!(ad.views, 12);
        assert_eq!(ad.unique_users.len(), 2);
        assert!(ad.small_images.is_empty());
        assert_eq!(ad.link, None);
    }

    #[test]
    fn test_lookahead_page_drops_extra_item() {
        let page = FeedPage::from_lookahead(vec![item("a"), item("b"), item("c")], 2);
        assert!(page.has_more);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_cursor, Some(Cursor::new("b")));

        let last = FeedPage::from_lookahead(vec![item("a")], 2);
        assert!(!last.has_more);
        assert_eq!(last.next_cursor, Some(Cursor::new("a")));

        let empty = FeedPage::from_lookahead(vec![], 2);
        assert!(!empty.has_more);
        assert_eq!(empty.next_cursor, None);
    }

    #[test]
    fn test_view_mode_orders() {
        assert_eq!(ViewMode::Timeline.order(), SortOrder::Desc);
        assert_eq!(ViewMode::Pdf.order(), SortOrder::Asc);
        assert_eq!(ViewMode::Pdf.other(), ViewMode::Timeline);
    }

    #[test]
    fn test_feed_page_serializes_camel_case() {
        let page = FeedPage::from_lookahead(vec![item("a")], 5);
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["nextCursor"], "a");
        assert_eq!(value["hasMore"], false);
    }
}
