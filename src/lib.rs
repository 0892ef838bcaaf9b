//! Shelltex: client for the shell texture generator.
//!
//! The generator renders reaction-diffusion textures server-side. This crate
//! is the client half of that exchange:
//! - Validates the five generator parameters as they are edited
//! - Builds a request only when every parameter is valid
//! - Posts it to the backend's `/calculate` endpoint, one request at a time
//! - Reports progress and the resulting image to a presentation sink
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Interactive driver (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime.rs)                               │  ← Owns the pending call
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Domain Layer  │   │ Client Layer  │
//! │ (ui/)         │   │ (domain/)     │   │ (client/)     │
//! │ - Sink trait  │   │ - Parameters  │   │ - /calculate  │
//! │ - View models │   │ - Validator   │   │ - Submitter   │
//! │ - Renderer    │   │ - Errors      │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber, rotating log file            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Form state and workflow state machine with event/action model
//! - [`domain`]: Parameters, validation, request/outcome types, errors
//! - [`client`]: HTTP submitter for the `/calculate` endpoint
//! - [`ui`]: Presentation sink, view models, text renderer
//! - [`runtime`]: Cooperative driver holding the single pending call
//! - [`observability`]: Tracing subscriber setup
//!
//! # Configuration
//!
//! ```toml
//! # shelltex.toml
//! endpoint = "http://127.0.0.1:5000"
//! request_timeout_secs = 60
//! trace_level = "debug"
//! log_file = "/tmp/shelltex.log"
//! ```
//!
//! # Example
//!
//! ```rust
//! use shelltex::{handle_event, initialize, Action, Event};
//! use shelltex::domain::ParameterId;
//!
//! let mut state = initialize();
//! handle_event(&mut state, &Event::SetValue { id: ParameterId::K, raw: "7".into() })?;
//!
//! let (_, actions) = handle_event(&mut state, &Event::Submit)?;
//! assert_eq!(actions, vec![Action::NotifyInvalid { fields: vec![ParameterId::K] }]);
//! # Ok::<(), shelltex::ShelltexError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod client;
pub mod domain;
pub mod observability;
pub mod runtime;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event, WorkflowPhase};
pub use domain::{GenerationOutcome, GenerationRequest, ParameterId, Result, ShelltexError};
pub use runtime::Runtime;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the generator backend. Requests go to `<endpoint>/calculate`.
    pub endpoint: String,

    /// Timeout for one generation call, in seconds. `0` disables the timeout.
    ///
    /// A call that times out is reported as a network error and the form
    /// becomes submittable again.
    pub request_timeout_secs: u64,

    /// Tracing level filter.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any
    /// `EnvFilter` directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// File to write logs to instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            trace_level: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map, e.g. command-line `key=value`
    /// pairs.
    ///
    /// # Parsing Rules
    ///
    /// - `endpoint`: used as-is when non-empty
    /// - `request_timeout_secs`: `u64`, falls back to the default on parse error
    /// - `trace_level`: `Option<String>`
    /// - `log_file`: `Option<PathBuf>`
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use shelltex::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("endpoint".to_string(), "http://texture.local".to_string());
    /// map.insert("request_timeout_secs".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.endpoint, "http://texture.local");
    /// assert_eq!(config.request_timeout_secs, 60);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let endpoint = map
            .get("endpoint")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map_or_else(|| DEFAULT_ENDPOINT.to_string(), String::from);

        let request_timeout_secs = map
            .get("request_timeout_secs")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            endpoint,
            request_timeout_secs,
            trace_level: map.get("trace_level").cloned(),
            log_file: map.get("log_file").map(PathBuf::from),
        }
    }

    /// Reads configuration from a TOML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ShelltexError::Io`] if the file cannot be read and
    /// [`ShelltexError::Parse`] if it is not valid TOML for this struct.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        tracing::debug!(path = %path.display(), endpoint = %config.endpoint, "loaded configuration file");
        Ok(config)
    }

    /// Configured timeout, or `None` when disabled.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }
}

/// Creates the form state for a new session.
///
/// Every field holds its default value and no request is in flight.
#[must_use]
pub fn initialize() -> AppState {
    tracing::debug!("initializing generator form");
    AppState::new()
}
