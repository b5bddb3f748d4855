//! Property tests for confidence scores

use core_kernel::{Confidence, LOW_CONFIDENCE_THRESHOLD};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_new_always_within_unit_interval(raw in proptest::num::f64::ANY) {
        let c = Confidence::new(raw);
        prop_assert!((0.0..=1.0).contains(&c.value()));
    }

    #[test]
    fn prop_is_low_matches_threshold(raw in 0.0f64..=1.0) {
        let c = Confidence::new(raw);
        prop_assert_eq!(c.is_low(), raw < LOW_CONFIDENCE_THRESHOLD);
    }

    #[test]
    fn prop_try_new_accepts_unit_interval(raw in 0.0f64..=1.0) {
        prop_assert_eq!(Confidence::try_new(raw).unwrap().value(), raw);
    }
}

#[test]
fn test_exact_threshold_is_not_low() {
    assert!(!Confidence::new(LOW_CONFIDENCE_THRESHOLD).is_low());
}
