//! Custom Test Assertions
//!
//! Assertion helpers for reports and decisions that print the whole value
//! on failure.

use rust_decimal::Decimal;

use domain_claims::{CheckReport, ResolutionDecision, ReviewReason};

/// Asserts a payout amount, comparing numerically (2500 == 2500.00)
///
/// # Panics
///
/// Panics if the payout is `None` or differs from `expected`
pub fn assert_payout_eq(actual: Option<Decimal>, expected: Decimal) {
    match actual {
        Some(amount) => assert_eq!(
            amount.normalize(),
            expected.normalize(),
            "Payout mismatch: actual={}, expected={}",
            amount,
            expected
        ),
        None => panic!("Expected payout {}, got None", expected),
    }
}

/// Asserts that exactly one contradiction contains `needle`
pub fn assert_single_contradiction(report: &CheckReport, needle: &str) {
    let matching: Vec<_> = report
        .contradictions
        .iter()
        .filter(|c| c.contains(needle))
        .collect();
    assert_eq!(
        matching.len(),
        1,
        "Expected exactly one contradiction containing '{}', got {:?}",
        needle,
        report.contradictions
    );
}

/// Asserts the decision auto-resolves and returns its payout
pub fn assert_auto_resolved(decision: &ResolutionDecision) -> Option<Decimal> {
    match decision {
        ResolutionDecision::AutoResolve { payout } => *payout,
        other => panic!("Expected auto-resolve, got {:?}", other),
    }
}

/// Asserts the decision routes to human review and returns the reasons
pub fn assert_human_review(decision: &ResolutionDecision) -> &[ReviewReason] {
    match decision {
        ResolutionDecision::HumanReview { reasons } => {
            assert!(!reasons.is_empty(), "Human review without reasons");
            reasons
        }
        other => panic!("Expected human review, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payout_compares_numerically() {
        assert_payout_eq(Some(dec!(2500.00)), dec!(2500));
    }

    #[test]
    #[should_panic(expected = "got None")]
    fn test_payout_none_panics() {
        assert_payout_eq(None, dec!(1));
    }
}
