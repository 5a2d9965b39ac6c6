// crates/sbus-core/src/sas.rs
// ============================================================================
// Module: SAS Token Generator
// Description: Shared Access Signature tokens for broker REST authentication.
// Purpose: Sign each outgoing request with a time-limited HMAC-SHA256 token.
// Dependencies: base64, hmac, sha2, time, urlencoding
// ============================================================================

//! ## Overview
//! Every request against the broker REST surface carries a Shared Access
//! Signature proving possession of the shared key for the signed resource.
//! Tokens are recomputed for every call rather than cached: the per-call
//! HMAC cost is small and the expiry is always fresh.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;
use time::OffsetDateTime;

use crate::config::ValidationError;

// ============================================================================
// SECTION: Token Generator
// ============================================================================

/// HMAC-SHA256 alias used for token signatures.
type HmacSha256 = Hmac<Sha256>;

/// Generates Shared Access Signature tokens for one logical endpoint.
///
/// # Invariants
/// - The signing key is never empty; construction rejects empty keys.
/// - The signed resource is the logical entity endpoint, not the individual
///   request target.
pub struct SasTokenGenerator {
    /// Logical endpoint URL the token authorizes.
    endpoint: String,
    /// Shared access key name reported in the token.
    key_name: String,
    /// Shared access key used for signing.
    key: String,
    /// Token validity in seconds.
    token_expiry: u32,
}

impl SasTokenGenerator {
    /// Creates a generator for the given endpoint and key material.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySigningKey`] when `key` is empty; an
    /// empty key must not silently produce a usable token.
    pub fn new(
        endpoint: impl Into<String>,
        key_name: impl Into<String>,
        key: impl Into<String>,
        token_expiry: u32,
    ) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ValidationError::EmptySigningKey);
        }
        Ok(Self {
            endpoint: endpoint.into(),
            key_name: key_name.into(),
            key,
            token_expiry,
        })
    }

    /// Generates a token valid from `now` for the configured expiry.
    ///
    /// The canonical resource lowercases both the raw endpoint and its
    /// percent-encoded form; the broker compares resources after the same
    /// double normalization.
    #[must_use]
    pub fn generate(&self, now: OffsetDateTime) -> String {
        let expiry = now.unix_timestamp() + i64::from(self.token_expiry);
        let resource = urlencoding::encode(&self.endpoint.to_lowercase()).to_lowercase();

        let signing_input = format!("{resource}\n{expiry}");
        #[allow(clippy::expect_used, reason = "HMAC-SHA256 accepts keys of any length")]
        let mut mac = HmacSha256::new_from_slice(self.key.as_bytes())
            .expect("HMAC-SHA256 accepts keys of any length");
        mac.update(signing_input.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());
        let signature = urlencoding::encode(&signature);

        format!(
            "SharedAccessSignature sig={signature}&se={expiry}&skn={}&sr={resource}",
            self.key_name
        )
    }
}

impl fmt::Debug for SasTokenGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The shared access key is a secret and must never reach logs.
        f.debug_struct("SasTokenGenerator")
            .field("endpoint", &self.endpoint)
            .field("key_name", &self.key_name)
            .field("key", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}
