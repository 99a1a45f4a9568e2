use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, register_int_gauge_vec, IntCounterVec, IntGaugeVec};

lazy_static! {
    /// Ad view recordings by outcome (recorded/error).
    pub static ref AD_VIEWS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "library_ad_views_total",
        "Ad view recordings segmented by outcome",
        &["result"]
    )
    .expect("failed to register library_ad_views_total");

    /// Interstitial draws by page context and result (shown/skipped/empty).
    pub static ref INTERSTITIAL_DRAWS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "library_interstitial_draws_total",
        "Interstitial gate draws segmented by context and result",
        &["context", "result"]
    )
    .expect("failed to register library_interstitial_draws_total");

    /// Creatives in the current ad pool by kind.
    pub static ref AD_POOL_SIZE: IntGaugeVec = register_int_gauge_vec!(
        "library_ad_pool_size",
        "Creatives in the most recently built ad pool",
        &["kind"]
    )
    .expect("failed to register library_ad_pool_size");
}
