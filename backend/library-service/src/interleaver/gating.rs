//! Interstitial gating: a 1-in-N draw per page load

use crate::config::AdsConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Page on which an interstitial may be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdContext {
    Home,
    Course,
    AllCourses,
}

impl AdContext {
    pub fn as_str(self) -> &'static str {
        match self {
            AdContext::Home => "home",
            AdContext::Course => "course",
            AdContext::AllCourses => "all_courses",
        }
    }
}

impl AdsConfig {
    pub fn odds_for(&self, context: AdContext) -> usize {
        match context {
            AdContext::Home => self.home_odds,
            AdContext::Course => self.course_odds,
            AdContext::AllCourses => self.all_courses_odds,
        }
    }
}

/// Decides whether an interstitial is shown, with probability `1 / odds`
///
/// A deck of one `true` and `odds - 1` falses is shuffled and the top card
/// taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterstitialGate {
    odds: usize,
}

impl InterstitialGate {
    /// Odds below 1 are treated as 1 (always show)
    pub fn new(odds: usize) -> Self {
        Self { odds: odds.max(1) }
    }

    pub fn for_context(config: &AdsConfig, context: AdContext) -> Self {
        Self::new(config.odds_for(context))
    }

    pub fn odds(&self) -> usize {
        self.odds
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let mut deck = vec![false; self.odds];
        deck[0] = true;
        deck.shuffle(rng);
        deck[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_odds_of_one_always_show() {
        let mut rng = StdRng::seed_from_u64(7);
        let gate = InterstitialGate::new(1);
        assert!((0..100).all(|_| gate.draw(&mut rng)));
        assert_eq!(InterstitialGate::new(0).odds(), 1);
    }

    #[test]
    fn test_show_rate_converges_to_one_in_n() {
        let mut rng = StdRng::seed_from_u64(42);
        for odds in [3usize, 5] {
            let gate = InterstitialGate::new(odds);
            let trials = 30_000;
            let shown = (0..trials).filter(|_| gate.draw(&mut rng)).count();
            let rate = shown as f64 / trials as f64;
            let expected = 1.0 / odds as f64;
            assert!(
                (rate - expected).abs() < 0.02,
                "odds {} gave rate {}",
                odds,
                rate
            );
        }
    }

    #[test]
    fn test_context_odds_from_config() {
        let config = AdsConfig::default();
        assert_eq!(InterstitialGate::for_context(&config, AdContext::Home).odds(), 3);
        assert_eq!(InterstitialGate::for_context(&config, AdContext::Course).odds(), 5);
        assert_eq!(
            InterstitialGate::for_context(&config, AdContext::AllCourses).odds(),
            3
        );
    }

    #[test]
    fn test_context_deserializes_snake_case() {
        let ctx: AdContext = serde_json::from_str("\"all_courses\"").unwrap();
        assert_eq!(ctx, AdContext::AllCourses);
    }
}
