//! Domain layer for the shelltex client.
//!
//! This module contains the core domain types and rules, independent of the
//! HTTP client and of any presentation concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`parameter`]: The five generator parameters and their constraints
//! - [`validator`]: Per-field validation of raw input
//! - [`generation`]: Generation request payload and outcome
//!
//! # Examples
//!
//! ```
//! use shelltex::domain::{validate, ParameterId};
//!
//! let result = validate(ParameterId::DeltaT, "0.05");
//! assert!(result.valid);
//! ```

pub mod error;
pub mod generation;
pub mod parameter;
pub mod validator;

pub use error::{Result, ShelltexError};
pub use generation::{GenerationOutcome, GenerationRequest};
pub use parameter::{Constraint, ParameterId};
pub use validator::{parse_float, validate, NormalizedValue, ValidationResult};
