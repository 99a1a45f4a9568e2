/// Course service - course lookups, listings and the department grid
use crate::error::{AppError, Result};
use crate::models::{Course, Cursor, DepartmentRow};
use appwrite_client::{Document, DocumentStore, Query, UPDATED_AT};
use std::collections::HashSet;
use std::sync::Arc;

/// Matches returned per searched attribute
const SEARCH_LIMIT: u32 = 20;

/// Attribute grouping courses into grid rows
const DEPARTMENT_ATTRIBUTE: &str = "department";

pub struct CourseService {
    store: Arc<dyn DocumentStore>,
    collection: String,
    max_page_size: u32,
}

impl CourseService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        max_page_size: u32,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            max_page_size,
        }
    }

    fn check_page_size(&self, size: u32) -> Result<()> {
        if size == 0 || size > self.max_page_size {
            return Err(AppError::Validation(format!(
                "page size must be between 1 and {}",
                self.max_page_size
            )));
        }
        Ok(())
    }

    /// Most recently updated courses
    pub async fn list_courses(&self, limit: u32) -> Result<Vec<Course>> {
        self.check_page_size(limit)?;

        let queries = [Query::order_desc(UPDATED_AT), Query::limit(limit)];
        let listed = self.store.list_documents(&self.collection, &queries).await?;

        Ok(listed
            .documents
            .iter()
            .map(Course::from_document)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// One page of a department's courses after `cursor`, newest first
    pub async fn department_row(
        &self,
        department: &str,
        page_size: u32,
        cursor: Option<&Cursor>,
    ) -> Result<DepartmentRow> {
        self.check_page_size(page_size)?;

        let mut queries = vec![
            Query::equal(DEPARTMENT_ATTRIBUTE, department),
            Query::order_desc(UPDATED_AT),
            Query::limit(page_size + 1),
        ];
        if let Some(cursor) = cursor {
            queries.push(Query::cursor_after(cursor.as_str()));
        }

        let listed = self.store.list_documents(&self.collection, &queries).await?;
        let courses = listed
            .documents
            .iter()
            .map(Course::from_document)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(DepartmentRow::from_lookahead(
            department,
            courses,
            page_size as usize,
            listed.total,
        ))
    }

    /// First page of every department, in the order given
    ///
    /// Departments without courses still get a row so that grid positions
    /// do not depend on which departments are populated.
    pub async fn department_grid(
        &self,
        departments: &[String],
        page_size: u32,
    ) -> Result<Vec<DepartmentRow>> {
        let mut rows = Vec::with_capacity(departments.len());
        for department in departments {
            rows.push(self.department_row(department, page_size, None).await?);
        }

        tracing::debug!(rows = rows.len(), "department grid loaded");
        Ok(rows)
    }

    /// Get a course by ID
    pub async fn get_course(&self, course_id: &str) -> Result<Course> {
        let doc = self.store.get_document(&self.collection, course_id).await?;
        Ok(Course::from_document(&doc)?)
    }

    /// Courses whose title or code matches `term`, most recently updated first
    ///
    /// A course matching on both attributes is returned once.
    pub async fn search_courses(&self, term: &str) -> Result<Vec<Course>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let by_title = [
            Query::search("title", term),
            Query::order_desc(UPDATED_AT),
            Query::limit(SEARCH_LIMIT),
        ];
        let by_code = [
            Query::search("code", term),
            Query::order_desc(UPDATED_AT),
            Query::limit(SEARCH_LIMIT),
        ];
        let (titles, codes) = tokio::try_join!(
            self.store.list_documents(&self.collection, &by_title),
            self.store.list_documents(&self.collection, &by_code),
        )?;

        let mut seen = HashSet::new();
        let mut documents: Vec<&Document> = titles
            .documents
            .iter()
            .chain(codes.documents.iter())
            .filter(|doc| seen.insert(doc.id.as_str()))
            .collect();
        documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let courses = documents
            .into_iter()
            .map(Course::from_document)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!(term, count = courses.len(), "course search");
        Ok(courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::ViewMode;
    use appwrite_client::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_course_parses_document() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_with_id(
                "courses",
                "c1",
                json!({ "title": "Thermodynamics", "code": "MEE301", "ongoing": true }),
            )
            .unwrap();
        let service = CourseService::new(store, "courses", 100);

        let course = service.get_course("c1").await.unwrap();
        assert_eq!(course.code, "MEE301");
        assert_eq!(course.default_view_mode(), ViewMode::Timeline);
    }

    #[tokio::test]
    async fn test_missing_course_is_not_found() {
        let service = CourseService::new(Arc::new(MemoryStore::new()), "courses", 100);
        let err = service.get_course("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_matches_title_or_code_once() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_with_id("courses", "c1", json!({ "title": "Thermodynamics", "code": "MEE301" }))
            .unwrap();
        store
            .insert_with_id("courses", "c2", json!({ "title": "Fluid Mechanics", "code": "MEE302" }))
            .unwrap();
        store
            .insert_with_id("courses", "c3", json!({ "title": "Macroeconomics", "code": "ECO201" }))
            .unwrap();
        store
            .insert_with_id("courses", "c4", json!({ "title": "Intro to MEE", "code": "MEE100" }))
            .unwrap();
        let service = CourseService::new(store, "courses", 100);

        let found = service.search_courses("mee").await.unwrap();
        let ids: Vec<&str> = found.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(&"c3"));
        assert_eq!(ids.iter().filter(|id| **id == "c4").count(), 1);

        assert!(service.search_courses("   ").await.unwrap().is_empty());
    }

    fn catalog() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        for (id, department) in [
            ("m1", "Mechanical Engineering"),
            ("e1", "Electrical Engineering"),
            ("m2", "Mechanical Engineering"),
            ("m3", "Mechanical Engineering"),
        ] {
            store
                .insert_with_id(
                    "courses",
                    id,
                    json!({ "title": id, "code": id.to_uppercase(), "department": department }),
                )
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_list_courses_newest_first_and_capped() {
        let service = CourseService::new(catalog(), "courses", 100);

        let courses = service.list_courses(3).await.unwrap();
        let ids: Vec<&str> = courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["m3", "m2", "e1"]);

        let err = service.list_courses(0).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_department_row_pages_with_cursor() {
        let service = CourseService::new(catalog(), "courses", 100);

        let first = service
            .department_row("Mechanical Engineering", 2, None)
            .await
            .unwrap();
        assert_eq!(first.courses.len(), 2);
        assert_eq!(first.total, 3);
        assert!(first.has_more);

        let rest = service
            .department_row("Mechanical Engineering", 2, first.next_cursor.as_ref())
            .await
            .unwrap();
        assert_eq!(rest.courses.len(), 1);
        assert_eq!(rest.courses[0].id, "m1");
        assert!(!rest.has_more);
    }

    #[tokio::test]
    async fn test_department_grid_keeps_empty_rows() {
        let service = CourseService::new(catalog(), "courses", 100);
        let departments = vec![
            "Civil Engineering".to_string(),
            "Electrical Engineering".to_string(),
        ];

        let rows = service.department_grid(&departments, 5).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].department, "Civil Engineering");
        assert!(rows[0].courses.is_empty());
        assert_eq!(rows[1].courses[0].department.as_deref(), Some("Electrical Engineering"));
    }

    #[tokio::test]
    async fn test_malformed_course_is_backend_error() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_with_id("courses", "c1", json!({ "title": 42, "code": "X" }))
            .unwrap();
        let service = CourseService::new(store, "courses", 100);

        let err = service.get_course("c1").await.unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
    }
}
