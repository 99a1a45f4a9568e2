//! Prometheus collectors for library-service
//!
//! - `feed`: page fetch latency and outcomes per sort order, post mutations
//! - `ads`: view recordings, interstitial draws per page context, pool sizes
//!
//! Everything registers with the default registry and is rendered by
//! [`serve_metrics`] on `/metrics`.

use actix_web::HttpResponse;
use prometheus::{Encoder, TextEncoder};

pub mod ads;
pub mod feed;

/// Render the default registry in the Prometheus text format
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut body = Vec::new();

    match encoder.encode(&prometheus::gather(), &mut body) {
        Ok(()) => HttpResponse::Ok()
            .content_type(encoder.format_type())
            .body(body),
        Err(err) => {
            tracing::error!(error = %err, "metrics encoding failed");
            HttpResponse::InternalServerError().body(err.to_string())
        }
    }
}
