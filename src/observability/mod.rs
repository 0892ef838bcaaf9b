//! Logging setup built on `tracing` and `tracing-subscriber`.
//!
//! The crate logs through `tracing` macros everywhere. This module installs
//! the subscriber that decides where those records go.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → stderr | RotatingFile
//! ```
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `file_writer`: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::RotatingFile;
pub use init::init_tracing;
