// crates/sbus-core/tests/sas_token_unit.rs
// ============================================================================
// Module: SAS Token Generator Tests
// Description: Token shape, expiry, and canonicalization coverage.
// Purpose: Pin the Shared Access Signature format the broker verifies.
// Dependencies: sbus-core, time
// ============================================================================

//! ## Overview
//! Parses generated tokens back into their `key=value` pairs and checks the
//! canonical resource form, expiry arithmetic, and construction-time key
//! validation.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;

use sbus_core::ErrorKind;
use sbus_core::SasTokenGenerator;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Splits the token into its scheme prefix and `key=value` pairs.
fn parse_token(token: &str) -> (String, BTreeMap<String, String>) {
    let (scheme, pairs) = token.split_once(' ').unwrap();
    let mut values = BTreeMap::new();
    for pair in pairs.split('&') {
        let (key, value) = pair.split_once('=').unwrap();
        values.insert(key.to_string(), value.to_string());
    }
    (scheme.to_string(), values)
}

// ============================================================================
// SECTION: Token Shape
// ============================================================================

#[test]
fn token_carries_exactly_the_four_expected_pairs() {
    let generator = SasTokenGenerator::new(
        "https://namespace.servicebus.windows.net/entity/",
        "KeyName",
        "Key",
        3600,
    )
    .unwrap();
    let token = generator.generate(OffsetDateTime::from_unix_timestamp(1_600_000_000).unwrap());

    assert!(token.starts_with("SharedAccessSignature "));
    let (scheme, pairs) = parse_token(&token);
    assert_eq!(scheme, "SharedAccessSignature");
    assert_eq!(
        pairs.keys().collect::<Vec<_>>(),
        ["se", "sig", "skn", "sr"]
    );
    assert_eq!(pairs["skn"], "KeyName");
}

#[test]
fn expiry_is_now_plus_the_configured_ttl() {
    let now = OffsetDateTime::from_unix_timestamp(1_600_000_000).unwrap();
    let generator = SasTokenGenerator::new("https://ns.example/e/", "n", "k", 60).unwrap();

    let (_, pairs) = parse_token(&generator.generate(now));
    assert_eq!(pairs["se"], "1600000060");
}

#[test]
fn resource_lowercases_the_endpoint_and_its_encoded_form() {
    let generator = SasTokenGenerator::new(
        "https://Namespace.servicebus.windows.net/Entity/",
        "n",
        "k",
        3600,
    )
    .unwrap();
    let now = OffsetDateTime::from_unix_timestamp(0).unwrap();

    let (_, pairs) = parse_token(&generator.generate(now));
    // Percent-encoding hex digits are lowercased along with the endpoint.
    assert_eq!(pairs["sr"], "https%3a%2f%2fnamespace.servicebus.windows.net%2fentity%2f");
}

#[test]
fn tokens_are_deterministic_for_a_fixed_instant() {
    let generator = SasTokenGenerator::new("https://ns.example/e/", "n", "k", 3600).unwrap();
    let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();

    assert_eq!(generator.generate(now), generator.generate(now));
}

#[test]
fn signature_is_percent_encoded_base64() {
    let generator = SasTokenGenerator::new("https://ns.example/e/", "n", "k", 3600).unwrap();
    let now = OffsetDateTime::from_unix_timestamp(0).unwrap();

    let (_, pairs) = parse_token(&generator.generate(now));
    // Base64 output never needs more than these characters once encoded.
    assert!(
        pairs["sig"]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '%' || c == '-' || c == '.' || c == '_')
    );
    assert!(!pairs["sig"].is_empty());
}

// ============================================================================
// SECTION: Key Validation
// ============================================================================

#[test]
fn empty_keys_are_rejected_at_construction() {
    let error = SasTokenGenerator::new("https://ns.example/e/", "n", "", 3600).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::EmptySigningKey);
}

#[test]
fn generator_debug_redacts_the_signing_key() {
    let generator =
        SasTokenGenerator::new("https://ns.example/e/", "KeyName", "TopSecretKey", 3600).unwrap();

    let rendered = format!("{generator:?}");
    assert!(rendered.contains("<redacted>"));
    assert!(rendered.contains("KeyName"));
    assert!(!rendered.contains("TopSecretKey"));
}
