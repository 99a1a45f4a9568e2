use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use appwrite_client::{AppwriteClient, AppwriteConfig, DocumentStore, MemoryStore};
use library_service::config::StoreBackend;
use library_service::handlers::{self, AppState};
use library_service::metrics::serve_metrics;
use library_service::openapi::ApiDoc;
use library_service::Config;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

fn build_store(config: &Config) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory document store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Appwrite => {
            let client = AppwriteClient::new(AppwriteConfig {
                endpoint: config.store.endpoint.clone(),
                project_id: config.store.project_id.clone(),
                api_key: config.store.api_key.clone(),
                database_id: config.store.database_id.clone(),
                timeout: Duration::from_millis(config.store.request_timeout_ms),
            })
            .context("failed to build Appwrite client")?;
            Ok(Arc::new(client))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
    let bind_address = format!("{}:{}", config.app.host, config.app.port);

    tracing::info!(
        env = %config.app.env,
        store = ?config.store.backend,
        "starting {}",
        ApiDoc::title()
    );

    let store = build_store(&config)?;
    let state = AppState::new(config, store);

    // Warm the ad pool for interstitial draws made before the first page load
    if !state.ad_pool.refresh().await {
        tracing::warn!("initial ad pool load failed");
    }

    let app_state = web::Data::new(state.clone());

    tracing::info!("listening on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in app_state.config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(web::Data::new(openapi_doc.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url(ApiDoc::openapi_json_path(), openapi_doc.clone()),
            )
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
            .app_data(app_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/health", web::get().to(handlers::health_check))
            .route("/health/ready", web::get().to(handlers::readiness_check))
            .route("/metrics", web::get().to(serve_metrics))
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .run()
    .await
    .context("server error")?;

    state.ad_pool.teardown();
    tracing::info!("library-service stopped");
    Ok(())
}
