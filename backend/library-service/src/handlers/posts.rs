/// Post handlers - HTTP endpoints for post management
use crate::error::Result;
use crate::handlers::AppState;
use actix_web::{web, HttpResponse};
use appwrite_client::storage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct EditPostRequest {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveImageRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub view_url: String,
    pub download_url: String,
}

/// Get a post by ID
pub async fn get_post(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let post = state.posts.get_post(&post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// List view and download links for a post's images
pub async fn get_post_downloads(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let post = state.posts.get_post(&post_id).await?;
    let links: Vec<ImageLinks> = post
        .images
        .into_iter()
        .map(|view_url| ImageLinks {
            download_url: storage::download_url_from_view(&view_url),
            view_url,
        })
        .collect();

    Ok(HttpResponse::Ok().json(links))
}

/// Replace a post's description
pub async fn edit_post(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
    req: web::Json<EditPostRequest>,
) -> Result<HttpResponse> {
    let post = state.posts.edit_description(&post_id, &req.description).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Remove one image from a post
pub async fn remove_image(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
    req: web::Json<RemoveImageRequest>,
) -> Result<HttpResponse> {
    let post = state.posts.remove_image(&post_id, &req.url).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post
pub async fn delete_post(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    state.posts.delete_post(&post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
