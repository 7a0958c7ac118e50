//! Tests for webhook secret token validation.

use super::*;

#[test]
fn test_exact_match_passes() {
    let validator = SecretValidator::new("s3cret-token");
    assert!(validator.authenticate(Some("s3cret-token")));
}

#[test]
fn test_mismatch_fails() {
    let validator = SecretValidator::new("s3cret-token");
    assert!(!validator.authenticate(Some("other-token!")));
}

#[test]
fn test_absent_header_fails() {
    let validator = SecretValidator::new("s3cret-token");
    assert!(!validator.authenticate(None));
}

#[test]
fn test_prefix_of_secret_fails() {
    let validator = SecretValidator::new("s3cret-token");
    assert!(!validator.authenticate(Some("s3cret")));
}

#[test]
fn test_case_sensitive_comparison() {
    let validator = SecretValidator::new("Secret");
    assert!(!validator.authenticate(Some("secret")));
}

#[test]
fn test_empty_configured_secret_fails_closed() {
    let validator = SecretValidator::new("");
    assert!(!validator.authenticate(None));
    assert!(!validator.authenticate(Some("")));
    assert!(!validator.authenticate(Some("anything")));
}

#[test]
fn test_debug_redacts_secret() {
    let validator = SecretValidator::new("s3cret-token");
    let rendered = format!("{:?}", validator);

    assert!(!rendered.contains("s3cret-token"));
    assert!(rendered.contains("<REDACTED>"));
}
