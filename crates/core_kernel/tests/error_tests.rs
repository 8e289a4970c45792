//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::MemberId;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
    }
}

#[test]
fn test_core_error_display() {
    let error = CoreError::validation("Test error");
    let display = format!("{}", error);

    assert!(display.contains("Validation error"));
}

#[test]
fn test_member_id_error_names_offending_value() {
    let error = MemberId::parse("much-too-long-id").unwrap_err();

    assert!(error.to_string().contains("much-too-long-id"));
}
