use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

lazy_static! {
    /// Duration of page fetches against the document store, by sort order.
    pub static ref FEED_PAGE_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "library_feed_page_duration_seconds",
        "Feed page fetch duration segmented by sort order",
        &["order"]
    )
    .expect("failed to register library_feed_page_duration_seconds");

    /// Pages served, by sort order and outcome (ok/error).
    pub static ref FEED_PAGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "library_feed_pages_total",
        "Feed pages fetched segmented by sort order and outcome",
        &["order", "result"]
    )
    .expect("failed to register library_feed_pages_total");

    /// Post mutations (edit/remove_image/delete) by outcome.
    pub static ref POST_MUTATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "library_post_mutations_total",
        "Post mutations segmented by operation and outcome",
        &["operation", "result"]
    )
    .expect("failed to register library_post_mutations_total");
}
