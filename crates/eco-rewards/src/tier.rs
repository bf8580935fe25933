use eco_types::Tier;

use crate::config::TierThresholds;

/// Where a bottle count sits on the tier ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierStatus {
    pub tier: Tier,
    /// Bottle count at which the next tier begins; `None` at the top tier.
    pub next_threshold: Option<u64>,
}

impl TierStatus {
    /// Tier for a bottle count. Pure; higher counts never yield a lower tier.
    pub fn for_count(thresholds: &TierThresholds, bottle_count: u64) -> Self {
        let (tier, next_threshold) = if bottle_count < thresholds.explorer {
            (Tier::Novice, Some(thresholds.explorer))
        } else if bottle_count < thresholds.guardian {
            (Tier::Explorer, Some(thresholds.guardian))
        } else if bottle_count < thresholds.master {
            (Tier::Guardian, Some(thresholds.master))
        } else {
            (Tier::Master, None)
        };
        Self {
            tier,
            next_threshold,
        }
    }

    pub fn label(&self) -> &'static str {
        self.tier.label()
    }

    /// Bottles still needed for the next tier.
    pub fn remaining(&self, bottle_count: u64) -> Option<u64> {
        self.next_threshold
            .map(|next| next.saturating_sub(bottle_count))
    }

    /// Fraction of the way to the next threshold, in `[0, 1]`.
    pub fn progress(&self, bottle_count: u64) -> f64 {
        match self.next_threshold {
            Some(next) if next > 0 => (bottle_count as f64 / next as f64).min(1.0),
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn status(count: u64) -> TierStatus {
        TierStatus::for_count(&TierThresholds::default(), count)
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(status(0).tier, Tier::Novice);
        assert_eq!(status(49).tier, Tier::Novice);
        assert_eq!(status(50).tier, Tier::Explorer);
        assert_eq!(status(149).tier, Tier::Explorer);
        assert_eq!(status(150).tier, Tier::Guardian);
        assert_eq!(status(299).tier, Tier::Guardian);
        assert_eq!(status(300).tier, Tier::Master);
        assert_eq!(status(u64::MAX).tier, Tier::Master);
    }

    #[test]
    fn next_threshold_and_remaining() {
        let s = status(120);
        assert_eq!(s.label(), "Explorer");
        assert_eq!(s.next_threshold, Some(150));
        assert_eq!(s.remaining(120), Some(30));
        assert_eq!(status(300).next_threshold, None);
        assert_eq!(status(300).remaining(300), None);
    }

    #[test]
    fn progress_is_bounded() {
        assert!((status(120).progress(120) - 0.8).abs() < 1e-9);
        assert_eq!(status(0).progress(0), 0.0);
        assert_eq!(status(1_000).progress(1_000), 1.0);
    }

    #[test]
    fn custom_thresholds() {
        let t = TierThresholds {
            explorer: 10,
            guardian: 20,
            master: 30,
        };
        assert_eq!(TierStatus::for_count(&t, 25).tier, Tier::Guardian);
        assert_eq!(TierStatus::for_count(&t, 25).next_threshold, Some(30));
    }

    proptest! {
        #[test]
        fn tier_is_monotonic(a in 0u64..10_000, b in 0u64..10_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(status(lo).tier <= status(hi).tier);
        }
    }
}
