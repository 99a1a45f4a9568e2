/// Ad handlers - creative pool, interstitial draws and view recording
use crate::error::Result;
use crate::handlers::AppState;
use crate::interleaver::{choose_interstitial, AdContext, AdPool, InterstitialGate};
use crate::metrics::ads::INTERSTITIAL_DRAWS_TOTAL;
use crate::models::AdCreative;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct InterstitialQuery {
    pub context: AdContext,
}

#[derive(Debug, Serialize)]
pub struct InterstitialResponse {
    pub show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creative: Option<AdCreative>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolResponse<'a> {
    #[serde(flatten)]
    pub pool: &'a AdPool,
    /// How long carousels hold an image creative without its own duration
    pub image_dwell_ms: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordViewRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Rebuild the creative pool for a page load
///
/// A failed rebuild serves the previous pool.
pub async fn get_pool(state: web::Data<AppState>) -> HttpResponse {
    state.ad_pool.refresh().await;
    let pool = state.ad_pool.current().unwrap_or_default();

    HttpResponse::Ok().json(PoolResponse {
        pool: &pool,
        image_dwell_ms: state.config.ads.image_dwell_ms,
    })
}

/// Run the interstitial gate for a page context against the latest pool
pub async fn get_interstitial(
    state: web::Data<AppState>,
    query: web::Query<InterstitialQuery>,
) -> HttpResponse {
    let context = query.context;
    let gate = InterstitialGate::for_context(&state.config.ads, context);
    let pool = state.ad_pool.current_or_refresh().await.unwrap_or_default();

    let decision = choose_interstitial(&pool, &gate, &mut rand::thread_rng());
    INTERSTITIAL_DRAWS_TOTAL
        .with_label_values(&[context.as_str(), decision.label()])
        .inc();

    let creative = decision.creative();
    HttpResponse::Ok().json(InterstitialResponse {
        show: creative.is_some(),
        creative,
    })
}

/// Record one view of an ad
pub async fn record_view(
    state: web::Data<AppState>,
    ad_id: web::Path<String>,
    req: Option<web::Json<RecordViewRequest>>,
) -> Result<HttpResponse> {
    let user_id = req.and_then(|body| body.into_inner().user_id);
    let count = state.ads.record_view(&ad_id, user_id.as_deref()).await?;
    Ok(HttpResponse::Ok().json(count))
}
