//! Aggregates a word alignment into a percentage and a qualitative tier.

use serde::{Deserialize, Serialize};

use parrot_align::AlignmentResult;

/// Qualitative bucket derived from the match percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Excellent,
    Acceptable,
    NeedsPractice,
}

impl Tier {
    /// Thresholds are inclusive at the lower bound: >= 85 Excellent,
    /// [60, 85) Acceptable, < 60 NeedsPractice.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 85.0 {
            Tier::Excellent
        } else if percentage >= 60.0 {
            Tier::Acceptable
        } else {
            Tier::NeedsPractice
        }
    }
}

/// Aggregate score for one practice round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub matched_count: usize,
    pub total_reference_tokens: usize,
    /// 0-100, rounded to two decimal places.
    pub percentage: f64,
    pub tier: Tier,
}

/// Score an alignment. Pure; never fails.
///
/// The reference length is taken from the alignment itself, where both
/// matches and misses count toward it and insertions never do. An empty
/// reference scores 0 and NeedsPractice.
pub fn score(result: &AlignmentResult) -> ScoreReport {
    let matched_count = result.matched_count();
    let total_reference_tokens = result.total_reference_tokens();

    let percentage = if total_reference_tokens > 0 {
        let raw = matched_count as f64 / total_reference_tokens as f64 * 100.0;
        (raw * 100.0).round() / 100.0
    } else {
        0.0
    };

    ScoreReport {
        matched_count,
        total_reference_tokens,
        percentage,
        tier: Tier::from_percentage(percentage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parrot_align::align;
    use parrot_text::tokenize;

    #[test]
    fn test_identical_sequences_score_100() {
        let reference = tokenize("i am going to the supermarket");
        let report = score(&align(&reference, &reference.clone()));
        assert_eq!(report.percentage, 100.0);
        assert_eq!(report.tier, Tier::Excellent);
        assert_eq!(report.matched_count, report.total_reference_tokens);
    }

    #[test]
    fn test_empty_reference_scores_zero() {
        let report = score(&align(&tokenize(""), &tokenize("anything at all")));
        assert_eq!(report.total_reference_tokens, 0);
        assert_eq!(report.percentage, 0.0);
        assert_eq!(report.tier, Tier::NeedsPractice);
    }

    #[test]
    fn test_half_matched_needs_practice() {
        let reference = tokenize("Hello, how are you?");
        let spoken = tokenize("hello how are you");
        let report = score(&align(&reference, &spoken));
        assert_eq!(report.matched_count, 2);
        assert_eq!(report.percentage, 50.0);
        assert_eq!(report.tier, Tier::NeedsPractice);
    }

    #[test]
    fn test_three_of_four_is_acceptable() {
        let reference = tokenize("I love learning English.");
        let spoken = tokenize("I LOVE learning english");
        let report = score(&align(&reference, &spoken));
        assert_eq!(report.percentage, 75.0);
        assert_eq!(report.tier, Tier::Acceptable);
    }

    #[test]
    fn test_extras_do_not_dilute_percentage() {
        let reference = tokenize("hello how are you");
        let spoken = tokenize("hello there how are you");
        let report = score(&align(&reference, &spoken));
        assert_eq!(report.percentage, 100.0);
    }

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        // 1 of 3 matched: 33.333... rounds to 33.33.
        let reference = tokenize("one two three");
        let spoken = tokenize("one");
        let report = score(&align(&reference, &spoken));
        assert_eq!(report.percentage, 33.33);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_percentage(85.0), Tier::Excellent);
        assert_eq!(Tier::from_percentage(84.99), Tier::Acceptable);
        assert_eq!(Tier::from_percentage(60.0), Tier::Acceptable);
        assert_eq!(Tier::from_percentage(59.99), Tier::NeedsPractice);
        assert_eq!(Tier::from_percentage(0.0), Tier::NeedsPractice);
    }
}
