//! In-feed ad slot placement

use serde::Serialize;

/// An ad slot follows every 10th image of the flattened pdf sequence
pub const PDF_AD_PERIOD: usize = 10;

/// An ad slot follows every 3rd row of the department grid
pub const GRID_AD_PERIOD: usize = 3;

/// Element of the flattened pdf view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FeedSlot {
    /// `position` is 1-indexed across the whole accumulated sequence
    Image { position: usize, url: String },
    /// `slot` counts ad slots from 0; carousels rotate through slot groups with it
    Ad { slot: usize },
}

/// Flatten image URLs into feed slots with an ad after every
/// [`PDF_AD_PERIOD`]th image
///
/// `offset` is the number of images already emitted before `images`, so
/// slot placement stays global when pages are appended. Images whose
/// position would not fit in a `usize` are dropped.
pub fn interleave_images<I, S>(images: I, offset: usize) -> Vec<FeedSlot>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut slots = Vec::new();
    for (index, url) in images.into_iter().enumerate() {
        let Some(position) = offset.checked_add(index + 1) else {
            break;
        };
        slots.push(FeedSlot::Image {
            position,
            url: url.into(),
        });
        if position % PDF_AD_PERIOD == 0 {
            slots.push(FeedSlot::Ad {
                slot: position / PDF_AD_PERIOD - 1,
            });
        }
    }
    slots
}

/// Element of the department grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GridSlot<T> {
    Row { row: T },
    Ad { slot: usize },
}

/// Insert an ad after every [`GRID_AD_PERIOD`]th row
pub fn interleave_rows<T>(rows: Vec<T>) -> Vec<GridSlot<T>> {
    let mut slots = Vec::with_capacity(rows.len() + rows.len() / GRID_AD_PERIOD);
    for (index, row) in rows.into_iter().enumerate() {
        slots.push(GridSlot::Row { row });
        let position = index + 1;
        if position % GRID_AD_PERIOD == 0 {
            slots.push(GridSlot::Ad {
                slot: position / GRID_AD_PERIOD - 1,
            });
        }
    }
    slots
}
