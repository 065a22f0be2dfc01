//! Risk scoring
//!
//! Pure aggregation of severity counts into a normalized [0, 10] score.
//! Same inputs always yield the same score; with `total_findings` held
//! fixed, raising any single count never lowers it.

use crate::domain::scan::entities::SeverityCounts;

/// Severity weights applied when aggregating findings into a risk score.
pub const WEIGHT_CRITICAL: f64 = 10.0;
pub const WEIGHT_HIGH: f64 = 7.0;
pub const WEIGHT_MEDIUM: f64 = 4.0;
pub const WEIGHT_LOW: f64 = 1.0;
pub const WEIGHT_INFO: f64 = 0.1;

/// Upper bound of the score range.
pub const MAX_RISK_SCORE: f64 = 10.0;

/// Compute the normalized risk score for a severity distribution.
///
/// `risk_score = min(10, Σ weight·count / total_findings)` when
/// `total_findings > 0`, else `0.0`.
pub fn risk_score(counts: &SeverityCounts, total_findings: usize) -> f64 {
    if total_findings == 0 {
        return 0.0;
    }

    let weighted = WEIGHT_CRITICAL * counts.critical as f64
        + WEIGHT_HIGH * counts.high as f64
        + WEIGHT_MEDIUM * counts.medium as f64
        + WEIGHT_LOW * counts.low as f64
        + WEIGHT_INFO * counts.info as f64;

    (weighted / total_findings as f64).min(MAX_RISK_SCORE)
}
