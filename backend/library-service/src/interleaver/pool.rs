//! Creative pools built from the active ad campaigns

use super::gating::InterstitialGate;
use crate::models::{Ad, AdCreative};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Link used by interstitial creatives whose campaign has none
pub const FALLBACK_LINK: &str = "#";

/// Three independently shuffled carousel slots cut from one creative pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotGroups {
    pub first: Vec<AdCreative>,
    pub second: Vec<AdCreative>,
    pub third: Vec<AdCreative>,
}

impl SlotGroups {
    /// Shuffle once and cut the first group, then reshuffle for each of the
    /// other two
    pub fn cut<R: Rng + ?Sized>(mut creatives: Vec<AdCreative>, slot_size: usize, rng: &mut R) -> Self {
        let mut groups: [Vec<AdCreative>; 3] = Default::default();
        for group in groups.iter_mut() {
            creatives.shuffle(&mut *rng);
            *group = creatives.iter().take(slot_size).cloned().collect();
        }

        let [first, second, third] = groups;
        Self {
            first,
            second,
            third,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty() && self.third.is_empty()
    }
}

/// Result of one interstitial opportunity
#[derive(Debug, Clone, PartialEq)]
pub enum InterstitialDecision {
    Show(AdCreative),
    /// The gate draw came up empty
    Skipped,
    /// The gate allowed it but there is nothing to show
    NoCreative,
}

impl InterstitialDecision {
    pub fn creative(self) -> Option<AdCreative> {
        match self {
            InterstitialDecision::Show(creative) => Some(creative),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InterstitialDecision::Show(_) => "shown",
            InterstitialDecision::Skipped => "skipped",
            InterstitialDecision::NoCreative => "empty",
        }
    }
}

/// Every creative the app places on a page load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdPool {
    /// Rectangular carousels: small images and videos
    pub small: SlotGroups,
    /// Medium carousels: medium images and videos
    pub medium: SlotGroups,
    /// Full-screen creatives: large images and videos
    pub interstitial: Vec<AdCreative>,
}

impl AdPool {
    pub fn from_ads<R: Rng + ?Sized>(ads: &[Ad], slot_size: usize, rng: &mut R) -> Self {
        let small = ads
            .iter()
            .flat_map(|ad| {
                ad.small_images
                    .iter()
                    .map(move |url| AdCreative::image(ad, url))
                    .chain(ad.videos.iter().map(move |url| AdCreative::video(ad, url)))
            })
            .collect();

        let medium = ads
            .iter()
            .flat_map(|ad| {
                ad.medium_images
                    .iter()
                    .map(move |url| AdCreative::image(ad, url))
                    .chain(ad.videos.iter().map(move |url| AdCreative::video(ad, url)))
            })
            .collect();

        let interstitial = ads
            .iter()
            .flat_map(|ad| {
                ad.large_images
                    .iter()
                    .map(move |url| AdCreative::image(ad, url))
                    .chain(ad.videos.iter().map(move |url| AdCreative::video(ad, url)))
            })
            .map(|mut creative| {
                if creative.link.is_none() {
                    creative.link = Some(FALLBACK_LINK.to_string());
                }
                creative
            })
            .collect();

        Self {
            small: SlotGroups::cut(small, slot_size, rng),
            medium: SlotGroups::cut(medium, slot_size, rng),
            interstitial,
        }
    }

    /// Uniformly random interstitial creative, if any
    pub fn pick_interstitial<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&AdCreative> {
        self.interstitial.choose(rng)
    }

    pub fn is_empty(&self) -> bool {
        self.small.is_empty() && self.medium.is_empty() && self.interstitial.is_empty()
    }
}

/// Run the gate, then pick a creative; an empty pool never shows anything
pub fn choose_interstitial<R: Rng + ?Sized>(
    pool: &AdPool,
    gate: &InterstitialGate,
    rng: &mut R,
) -> InterstitialDecision {
    if !gate.draw(rng) {
        return InterstitialDecision::Skipped;
    }
    match pool.pick_interstitial(rng) {
        Some(creative) => InterstitialDecision::Show(creative.clone()),
        None => InterstitialDecision::NoCreative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ad(id: &str, small: usize, large: usize, videos: usize, link: Option<&str>) -> Ad {
        Ad {
            id: id.to_string(),
            name: id.to_string(),
            small_images: (0..small).map(|i| format!("{}-s{}", id, i)).collect(),
            medium_images: vec![format!("{}-m", id)],
            large_images: (0..large).map(|i| format!("{}-l{}", id, i)).collect(),
            videos: (0..videos).map(|i| format!("{}-v{}", id, i)).collect(),
            views: 0,
            unique_users: vec![],
            is_expired: false,
            end_time: None,
            link: link.map(str::to_string),
        }
    }

    #[test]
    fn test_slot_groups_are_capped() {
        let mut rng = StdRng::seed_from_u64(1);
        let ads = vec![ad("a", 5, 0, 1, None), ad("b", 4, 0, 0, None)];
        let pool = AdPool::from_ads(&ads, 6, &mut rng);

        for group in [&pool.small.first, &pool.small.second, &pool.small.third] {
            assert_eq!(group.len(), 6);
        }
        // Two medium images and one video
        assert_eq!(pool.medium.first.len(), 3);
    }

    #[test]
    fn test_interstitial_pool_defaults_link() {
        let mut rng = StdRng::seed_from_u64(2);
        let ads = vec![ad("a", 0, 2, 1, None), ad("b", 0, 1, 0, Some("https://shop"))];
        let pool = AdPool::from_ads(&ads, 6, &mut rng);

        assert_eq!(pool.interstitial.len(), 4);
        assert!(pool
            .interstitial
            .iter()
            .filter(|c| c.ad_id == "a")
            .all(|c| c.link.as_deref() == Some(FALLBACK_LINK)));
        assert_eq!(
            pool.interstitial
                .iter()
                .filter(|c| c.file_type == FileType::Video)
                .count(),
            1
        );
        assert!(pool
            .interstitial
            .iter()
            .filter(|c| c.ad_id == "b")
            .all(|c| c.link.as_deref() == Some("https://shop")));
    }

    #[test]
    fn test_empty_pool_never_shows() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = AdPool::default();
        let gate = InterstitialGate::new(1);

        assert!(pool.is_empty());
        for _ in 0..50 {
            let decision = choose_interstitial(&pool, &gate, &mut rng);
            assert_eq!(decision, InterstitialDecision::NoCreative);
        }
    }

    #[test]
    fn test_open_gate_shows_from_pool() {
        let mut rng = StdRng::seed_from_u64(4);
        let pool = AdPool::from_ads(&[ad("a", 0, 1, 0, None)], 6, &mut rng);
        let decision = choose_interstitial(&pool, &InterstitialGate::new(1), &mut rng);
        assert_eq!(decision.creative().map(|c| c.file_url), Some("a-l0".to_string()));
    }

    #[test]
    fn test_empty_ads_give_empty_groups() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool = AdPool::from_ads(&[], 6, &mut rng);
        assert!(pool.small.is_empty());
        assert!(pool.medium.is_empty());
    }
}
