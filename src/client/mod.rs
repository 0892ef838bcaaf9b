//! HTTP client for the texture generation backend.
//!
//! # Architecture
//!
//! - `messages`: Response body of `/calculate` and its interpretation
//! - `submitter`: The [`Submitter`] seam and its `reqwest` implementation

pub mod messages;
pub mod submitter;

pub use messages::{CalculateResponse, NETWORK_ERROR_PREFIX, UNKNOWN_ERROR};
pub use submitter::{HttpSubmitter, Submitter};
