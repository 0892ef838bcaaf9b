//! Presentation layer: view models, the sink interface, and a text renderer.
//!
//! # Architecture
//!
//! ```text
//! AppState → compute_viewmodel → FormView → PresentationSink::render
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable form state
//! - [`sink`]: Callback interface the workflow reports to
//! - [`renderer`]: Plain-text rendering of a [`FormView`]

pub mod renderer;
pub mod sink;
pub mod viewmodel;

pub use renderer::render;
pub use sink::{PresentationSink, TracingSink};
pub use viewmodel::{FieldView, FormView, GeneratedImage, SubmitButton, DOWNLOAD_FILENAME};
