//! Rotating ad carousel
//!
//! Images dwell for a fixed time, videos hold until they report that they
//! ended. Advancing wraps around the pool.

use crate::models::{AdCreative, FileType};
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_IMAGE_DWELL: Duration = Duration::from_millis(4_000);

/// What moves the carousel off its active creative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    After(Duration),
    OnVideoEnd,
    /// Nothing to rotate
    Never,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CarouselEvent {
    /// The active video finished playing
    VideoEnded,
    /// Swap in a new set of creatives and start over
    Reset(Vec<AdCreative>),
}

#[derive(Debug, Clone)]
pub struct Carousel {
    creatives: Vec<AdCreative>,
    active: usize,
    image_dwell: Duration,
}

impl Carousel {
    pub fn new(creatives: Vec<AdCreative>) -> Self {
        Self::with_dwell(creatives, DEFAULT_IMAGE_DWELL)
    }

    pub fn with_dwell(creatives: Vec<AdCreative>, image_dwell: Duration) -> Self {
        Self {
            creatives,
            active: 0,
            image_dwell,
        }
    }

    pub fn active(&self) -> Option<&AdCreative> {
        self.creatives.get(self.active)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn len(&self) -> usize {
        self.creatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatives.is_empty()
    }

    pub fn advance(&mut self) -> Option<&AdCreative> {
        if self.creatives.is_empty() {
            return None;
        }
        self.active = (self.active + 1) % self.creatives.len();
        self.active()
    }

    pub fn next_trigger(&self) -> Advance {
        match self.active() {
            None => Advance::Never,
            Some(creative) => match creative.file_type {
                FileType::Video => Advance::OnVideoEnd,
                FileType::Image => Advance::After(
                    creative
                        .duration_ms
                        .map(Duration::from_millis)
                        .unwrap_or(self.image_dwell),
                ),
            },
        }
    }

    /// Advance if the active creative is a video; stray events are ignored
    pub fn on_video_ended(&mut self) -> bool {
        if self.next_trigger() != Advance::OnVideoEnd {
            return false;
        }
        self.advance();
        true
    }

    pub fn reset(&mut self, creatives: Vec<AdCreative>) {
        self.creatives = creatives;
        self.active = 0;
    }

    /// Drive the carousel until `events` closes, calling `on_change` with
    /// every creative that becomes active (the first one included)
    pub async fn run<F>(mut self, mut events: mpsc::Receiver<CarouselEvent>, mut on_change: F) -> Self
    where
        F: FnMut(&AdCreative),
    {
        if let Some(creative) = self.active() {
            on_change(creative);
        }

        loop {
            let event = match self.next_trigger() {
                Advance::After(dwell) => {
                    tokio::select! {
                        _ = tokio::time::sleep(dwell) => {
                            if let Some(creative) = self.advance() {
                                on_change(creative);
                            }
                            continue;
                        }
                        event = events.recv() => event,
                    }
                }
                Advance::OnVideoEnd | Advance::Never => events.recv().await,
            };

            match event {
                None => break,
                Some(CarouselEvent::VideoEnded) => {
                    if self.on_video_ended() {
                        if let Some(creative) = self.active() {
                            on_change(creative);
                        }
                    }
                }
                Some(CarouselEvent::Reset(creatives)) => {
                    self.reset(creatives);
                    if let Some(creative) = self.active() {
                        on_change(creative);
                    }
                }
            }
        }

        tracing::debug!(active = self.active, "carousel stopped");
        self
    }
}
