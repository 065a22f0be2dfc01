//! Property-based tests for the risk scorer

use proptest::prelude::*;

use sentra::application::scoring::risk_score;
use sentra::domain::scan::entities::SeverityCounts;

fn counts_strategy() -> impl Strategy<Value = SeverityCounts> {
    (0usize..200, 0usize..200, 0usize..200, 0usize..200, 0usize..200).prop_map(
        |(critical, high, medium, low, info)| SeverityCounts {
            critical,
            high,
            medium,
            low,
            info,
        },
    )
}

proptest! {
    #[test]
    fn score_stays_within_range(counts in counts_strategy()) {
        let score = risk_score(&counts, counts.total());
        prop_assert!((0.0..=10.0).contains(&score));
    }

    #[test]
    fn zero_total_always_scores_zero(counts in counts_strategy()) {
        prop_assert_eq!(risk_score(&counts, 0), 0.0);
    }

    // With total held fixed, raising any single count never lowers the score.
    #[test]
    fn score_is_monotone_per_count(counts in counts_strategy(), bump in 1usize..50) {
        let total = counts.total().max(1);
        let base = risk_score(&counts, total);

        let variants = [
            SeverityCounts { critical: counts.critical + bump, ..counts },
            SeverityCounts { high: counts.high + bump, ..counts },
            SeverityCounts { medium: counts.medium + bump, ..counts },
            SeverityCounts { low: counts.low + bump, ..counts },
            SeverityCounts { info: counts.info + bump, ..counts },
        ];
        for bumped in variants {
            prop_assert!(risk_score(&bumped, total) >= base);
        }
    }
}
