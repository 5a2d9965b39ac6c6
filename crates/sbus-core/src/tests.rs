// crates/sbus-core/src/tests.rs
// ============================================================================
// Module: Core Unit Tests
// Description: Focused unit tests for core types and discriminants.
// Purpose: Pin wire forms and historical error codes.
// Dependencies: sbus-core
// ============================================================================

//! ## Overview
//! Unit tests for the small core surfaces that integration tests do not
//! exercise directly: receive-mode wire forms, error-code stability, and
//! secret redaction.

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

use crate::ConnectionConfig;
use crate::ErrorKind;
use crate::NO_HISTORICAL_CODE;
use crate::ReceiveMode;

// ============================================================================
// SECTION: Receive Mode
// ============================================================================

#[test]
fn receive_mode_wire_forms_round_trip() {
    assert_eq!(ReceiveMode::parse("peek-lock"), Some(ReceiveMode::PeekLock));
    assert_eq!(
        ReceiveMode::parse("receive-and-delete"),
        Some(ReceiveMode::ReceiveAndDelete)
    );
    assert_eq!(ReceiveMode::parse("peek_lock"), None);
    assert_eq!(ReceiveMode::PeekLock.as_str(), "peek-lock");
    assert_eq!(ReceiveMode::ReceiveAndDelete.as_str(), "receive-and-delete");
}

// ============================================================================
// SECTION: Error Codes
// ============================================================================

#[test]
fn historical_error_codes_are_stable() {
    assert_eq!(ErrorKind::InvalidDsn.code(), 1_643_988_474);
    assert_eq!(ErrorKind::MissingEntityPath.code(), 1_643_989_596);
    assert_eq!(ErrorKind::InvalidReceiveMode.code(), 1_643_994_036);
    assert_eq!(ErrorKind::Receive.code(), 1_644_315_123);
    assert_eq!(ErrorKind::UnexpectedStatus.code(), 1_644_315_645);
    assert_eq!(ErrorKind::Delete.code(), 1_644_340_210);
    assert_eq!(ErrorKind::MissingDeleteContext.code(), 1_644_340_687);
    assert_eq!(ErrorKind::MissingMessageIdentifier.code(), 1_644_340_921);
    assert_eq!(ErrorKind::MissingLockToken.code(), 1_644_340_926);
    assert_eq!(ErrorKind::MissingEncodedBody.code(), 1_644_403_794);
    assert_eq!(ErrorKind::Send.code(), 1_644_415_901);
    assert_eq!(ErrorKind::EncodeBrokerProperties.code(), 1_644_511_135);
}

#[test]
fn introduced_error_kinds_report_no_historical_code() {
    assert_eq!(ErrorKind::UnknownDsnOption.code(), NO_HISTORICAL_CODE);
    assert_eq!(ErrorKind::MissingCredential.code(), NO_HISTORICAL_CODE);
    assert_eq!(ErrorKind::InvalidTokenExpiry.code(), NO_HISTORICAL_CODE);
    assert_eq!(ErrorKind::EmptySigningKey.code(), NO_HISTORICAL_CODE);
    assert_eq!(ErrorKind::Decoding.code(), NO_HISTORICAL_CODE);
    assert_eq!(ErrorKind::Encoding.code(), NO_HISTORICAL_CODE);
}

// ============================================================================
// SECTION: Secret Redaction
// ============================================================================

#[test]
fn connection_config_debug_redacts_the_shared_access_key() {
    let config = ConnectionConfig {
        shared_access_key_name: "key-name".to_string(),
        shared_access_key: "top-secret".to_string(),
        namespace: "namespace".to_string(),
        entity_path: "entity".to_string(),
        subscription: None,
        token_expiry: 3600,
        receive_mode: ReceiveMode::PeekLock,
    };

    let rendered = format!("{config:?}");
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("top-secret"));
}
