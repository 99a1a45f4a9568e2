//! Ad interleaving: which creatives appear, where, and when
//!
//! - gating: 1-in-N interstitial draws per page context
//! - pool: creative pools and carousel slot groups
//! - store: the application-wide pool with change notification
//! - placement: ad slots inside the pdf sequence and the department grid
//! - carousel: timed and video-driven rotation
//! - views: once-per-placement view recording

pub mod carousel;
pub mod gating;
pub mod placement;
pub mod pool;
pub mod store;
pub mod views;

pub use carousel::{Advance, Carousel, CarouselEvent, DEFAULT_IMAGE_DWELL};
pub use gating::{AdContext, InterstitialGate};
pub use placement::{
    interleave_images, interleave_rows, FeedSlot, GridSlot, GRID_AD_PERIOD, PDF_AD_PERIOD,
};
pub use pool::{choose_interstitial, AdPool, InterstitialDecision, SlotGroups};
pub use store::AdPoolStore;
pub use views::{ViewGuard, ViewSink, VISIBILITY_THRESHOLD};
