//! Wire format of the `/calculate` endpoint.
//!
//! The request body is a [`GenerationRequest`](crate::domain::GenerationRequest)
//! serialized as JSON. The response body is a JSON object carrying either
//! `image_url` or `error`; both fields are read leniently because the server
//! may omit them.

use crate::domain::GenerationOutcome;
use serde::{Deserialize, Serialize};

/// Path of the generation endpoint, relative to the configured base URL.
pub const CALCULATE_PATH: &str = "calculate";

/// Message used when the server fails without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Prefix of messages describing calls that never got a response.
pub const NETWORK_ERROR_PREFIX: &str = "Network error: ";

/// Response body of `/calculate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CalculateResponse {
    /// Parses a response body, treating anything that is not a JSON object
    /// with the expected fields as an empty body.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, body_len = body.len(), "unreadable response body");
            Self::default()
        })
    }

    /// Interprets the body together with whether the status was a success.
    ///
    /// A success status only counts when the body names an image; otherwise
    /// the server's `error` is reported, or [`UNKNOWN_ERROR`] if there is none.
    #[must_use]
    pub fn into_outcome(self, status_ok: bool) -> GenerationOutcome {
        match (status_ok, self.image_url) {
            (true, Some(image_url)) => GenerationOutcome::Success { image_url },
            _ => GenerationOutcome::Failure {
                error_message: self.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            },
        }
    }
}

/// Outcome for a call that failed before a response was read.
#[must_use]
pub fn transport_failure(error: &dyn std::fmt::Display) -> GenerationOutcome {
    GenerationOutcome::Failure {
        error_message: format!("{NETWORK_ERROR_PREFIX}{error}"),
    }
}
