//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::Confidence;

#[test]
fn test_core_error_validation() {
    let CoreError::Validation(msg) = CoreError::validation("Invalid input");
    assert_eq!(msg, "Invalid input");
}

#[test]
fn test_out_of_range_confidence_reports_value() {
    let error = Confidence::try_new(1.5).unwrap_err();
    let display = error.to_string();
    assert!(display.contains("Validation error"));
    assert!(display.contains("got 1.5"));
}
