/// Library Service Library
///
/// Serves ED-Library course feeds: paginated note posts in timeline and pdf
/// views, post maintenance, and the ads interleaved with feed content.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and shared application state
/// - `models`: Typed posts, courses, pages, and ad creatives
/// - `services`: Business logic over the document store
/// - `feed`: Client feed core (paginator, view-mode selector)
/// - `interleaver`: Ad gating, pools, placement, carousels, view recording
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod interleaver;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use handlers::AppState;
