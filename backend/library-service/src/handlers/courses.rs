/// Course handlers - course metadata and feed pages
use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::interleaver::{interleave_images, interleave_rows, FeedSlot, GridSlot};
use crate::models::{Course, Cursor, DepartmentRow, SortOrder, ViewMode};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    #[serde(flatten)]
    pub course: Course,
    pub default_view_mode: ViewMode,
}

#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    pub order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RowQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub slots: Vec<GridSlot<DepartmentRow>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PdfQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    /// Images the caller already holds; keeps ad placement global
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfPageResponse {
    pub slots: Vec<FeedSlot>,
    pub image_count: usize,
    pub next_cursor: Option<Cursor>,
    pub has_more: bool,
}

/// Get a course and the view mode it opens in
pub async fn get_course(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
) -> Result<HttpResponse> {
    let course = state.courses.get_course(&course_id).await?;
    let default_view_mode = course.default_view_mode();

    Ok(HttpResponse::Ok().json(CourseResponse {
        course,
        default_view_mode,
    }))
}

/// List the most recently updated courses
pub async fn list_courses(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(state.config.catalog.recent_limit);
    let courses = state.courses.list_courses(limit).await?;
    Ok(HttpResponse::Ok().json(courses))
}

/// Get the department grid: one row per department with ad slots between rows
pub async fn get_department_grid(state: web::Data<AppState>) -> Result<HttpResponse> {
    let catalog = &state.config.catalog;
    let rows = state
        .courses
        .department_grid(&catalog.departments, catalog.row_page_size)
        .await?;

    Ok(HttpResponse::Ok().json(GridResponse {
        slots: interleave_rows(rows),
    }))
}

/// Get the next page of one department row
pub async fn get_department_row(
    state: web::Data<AppState>,
    department: web::Path<String>,
    query: web::Query<RowQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(state.config.catalog.row_page_size);
    let cursor = query.cursor.as_deref().filter(|c| !c.is_empty()).map(Cursor::new);

    let row = state
        .courses
        .department_row(&department, limit, cursor.as_ref())
        .await?;
    Ok(HttpResponse::Ok().json(row))
}

/// Search courses by title or code
pub async fn search_courses(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let courses = state
        .courses
        .search_courses(query.q.as_deref().unwrap_or_default())
        .await?;

    Ok(HttpResponse::Ok().json(courses))
}

/// Get one page of a course's posts
pub async fn get_course_posts(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    query: web::Query<PostsQuery>,
) -> Result<HttpResponse> {
    let order = query.order.unwrap_or_default();
    let limit = query.limit.unwrap_or(match order {
        SortOrder::Desc => state.config.feed.timeline_page_size,
        SortOrder::Asc => state.config.feed.pdf_page_size,
    });
    let cursor = query.cursor.as_deref().filter(|c| !c.is_empty()).map(Cursor::new);

    let page = state
        .posts
        .fetch_page(&course_id, limit, cursor.as_ref(), order)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Get one page of a course as a flat, oldest-first image sequence with ad slots
pub async fn get_course_pdf(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    query: web::Query<PdfQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(state.config.feed.pdf_page_size);
    let cursor = query.cursor.as_deref().filter(|c| !c.is_empty()).map(Cursor::new);

    let page = state
        .posts
        .fetch_page(&course_id, limit, cursor.as_ref(), SortOrder::Asc)
        .await?;

    let images: Vec<String> = page
        .items
        .iter()
        .flat_map(|item| item.images.iter().cloned())
        .collect();
    let image_count = images.len();
    let offset = query.offset.unwrap_or(0);
    if offset.checked_add(image_count).is_none() {
        return Err(AppError::Validation(format!(
            "offset {} is too large for a page of {} images",
            offset, image_count
        )));
    }

    Ok(HttpResponse::Ok().json(PdfPageResponse {
        slots: interleave_images(images, offset),
        image_count,
        next_cursor: page.next_cursor,
        has_more: page.has_more,
    }))
}
