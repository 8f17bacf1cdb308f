//
//  scm-client
//  common/mod.rs
//

//! Shared types for all provider drivers.
//!
//! This module provides the foundation every driver is built on: the unified
//! error type, the response metadata returned alongside every entity, the
//! normalized domain model, the uniform service contracts, and the pure
//! encoding helpers.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all operations
//! - [`Response`] / [`Rate`] - Response metadata (HTTP status, rate limits)
//! - [`types`] - Normalized, provider-agnostic entities
//! - [`webhook`] - Normalized webhook events and the secret-resolver contract
//! - [`services`] - Per-resource operation contracts shared by all drivers
//! - [`encode`] - Stateless encoding helpers (identifiers, list options, refs)
//!
//! # Error Handling
//!
//! Every public operation returns a typed error value, never an unhandled
//! fault, paired with whatever response metadata is available. Converters
//! never panic on missing or malformed optional fields; they substitute zero
//! values, and only outright decode failures propagate as errors.
//!
//! # Example
//!
//! ```rust
//! use scm_client::common::ApiError;
//!
//! fn describe(err: &ApiError) -> &'static str {
//!     match err {
//!         ApiError::NotSupported => "provider has no equivalent capability",
//!         ApiError::Http { status: 404, .. } => "resource does not exist",
//!         ApiError::Http { status: 429, .. } => "rate limited, try later",
//!         _ => "something else went wrong",
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod encode;
pub mod services;
pub mod types;
pub mod webhook;

pub use services::*;
pub use types::*;
pub use webhook::*;

/// Unified error type for all provider operations.
///
/// The taxonomy is designed so callers can distinguish "not found" from
/// "rate limited" from "not supported" without string matching:
///
/// | Variant | Meaning | Network call made? |
/// |---------|---------|--------------------|
/// | `NotSupported` | Operation has no provider equivalent | No |
/// | `UnknownEvent` | Webhook event type/action not recognized | n/a |
/// | `SignatureInvalid` | Webhook token mismatch after successful parse | n/a |
/// | `PayloadTooLarge` | Webhook body exceeds the fixed cap | n/a |
/// | `Http` | Non-2xx response, message parsed from the error body | Yes |
/// | `Network` | Transport-level failure (DNS, TLS, timeout) | Attempted |
/// | `Decode` | Response or payload JSON failed to unmarshal | Yes |
/// | `Conversion` | Malformed payload field detected during conversion | Yes |
#[derive(Error, Debug)]
pub enum ApiError {
    /// The operation has no equivalent capability on this provider.
    ///
    /// Returned immediately, before any transport call is made.
    #[error("Operation not supported by this provider")]
    NotSupported,

    /// The webhook event type or action is not recognized.
    ///
    /// Returned before payload conversion; unknown event names never crash
    /// the dispatcher.
    #[error("Unknown webhook event")]
    UnknownEvent,

    /// The webhook token or signature did not match the expected secret.
    ///
    /// Only returned after the payload parsed successfully, so malformed
    /// payloads never reach signature checking.
    #[error("Webhook signature mismatch")]
    SignatureInvalid,

    /// The webhook request body exceeds the maximum accepted size.
    #[error("Webhook payload exceeds maximum size")]
    PayloadTooLarge,

    /// The provider returned a non-2xx HTTP status.
    ///
    /// `message` is extracted from the provider's error envelope when
    /// possible, otherwise it is the raw response body.
    #[error("API error ({status}): {message}")]
    Http {
        /// HTTP status code of the failed response.
        status: u16,
        /// Human-readable message from the provider.
        message: String,
    },

    /// A network-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A JSON body failed to decode into the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A payload field was malformed (for example undecodable base64).
    #[error("Conversion error: {0}")]
    Conversion(String),
}

/// Rate-limit metadata extracted from provider response headers.
///
/// All fields are optional because not every provider (or every endpoint)
/// reports rate limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Maximum number of requests in the current window.
    pub limit: Option<i64>,

    /// Requests remaining in the current window.
    pub remaining: Option<i64>,

    /// Unix timestamp at which the window resets.
    pub reset: Option<i64>,
}

/// Response metadata returned alongside every entity.
///
/// Lets callers inspect the HTTP status and rate-limit state of the call
/// that produced a result without re-exposing the raw HTTP machinery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code of the response.
    pub status: u16,

    /// Rate-limit metadata, when the provider reported any.
    pub rate: Rate,
}

/// Result of an operation that yields an entity: the normalized value paired
/// with the response metadata of the call that produced it.
pub type ApiResult<T> = Result<(T, Response), ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ApiError::NotSupported.to_string(),
            "Operation not supported by this provider"
        );
        assert_eq!(ApiError::UnknownEvent.to_string(), "Unknown webhook event");
        assert_eq!(
            ApiError::SignatureInvalid.to_string(),
            "Webhook signature mismatch"
        );
        let http = ApiError::Http {
            status: 404,
            message: "Not Found Project".to_string(),
        };
        assert_eq!(http.to_string(), "API error (404): Not Found Project");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let err: ApiError = serde_json::from_str::<i32>("not json").unwrap_err().into();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_rate_defaults_to_unreported() {
        let rate = Rate::default();
        assert_eq!(rate.limit, None);
        assert_eq!(rate.remaining, None);
        assert_eq!(rate.reset, None);
    }
}
