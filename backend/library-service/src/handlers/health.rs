/// Health handlers - liveness and readiness checks
use crate::handlers::AppState;
use actix_web::{web, HttpResponse};
use appwrite_client::Query;
use serde_json::json;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "library-service",
    }))
}

/// Ready once the document store answers a one-document listing
pub async fn readiness_check(state: web::Data<AppState>) -> HttpResponse {
    let collection = &state.config.store.courses_collection;
    match state
        .store
        .list_documents(collection, &[Query::limit(1)])
        .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "ready",
            "document_store": "ok",
        })),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "not_ready",
                "document_store": err.to_string(),
            }))
        }
    }
}
