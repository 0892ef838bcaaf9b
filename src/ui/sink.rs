//! Presentation sink: the callbacks through which the workflow reports progress.
//!
//! The workflow never touches a display directly. Whatever drives it supplies a
//! [`PresentationSink`]; optional notifications have default no-op bodies, so
//! an implementation only overrides what it can show.

use crate::domain::ParameterId;
use crate::ui::viewmodel::FormView;

/// Receiver of workflow notifications.
pub trait PresentationSink {
    /// A request passed validation and is being sent.
    fn on_generation_start(&mut self);

    /// The server returned an image.
    fn on_generation_success(&mut self, image_url: &str);

    /// The attempt failed, either at the server or in transport.
    fn on_generation_error(&mut self, message: &str);

    /// A submit was blocked by invalid fields.
    fn on_validation_failed(&mut self, fields: &[ParameterId]) {
        let _ = fields;
    }

    /// Broadcast after [`Self::on_generation_success`] for listeners that only
    /// care that a new texture exists.
    fn on_texture_generated(&mut self, image_url: &str) {
        let _ = image_url;
    }

    /// The form changed and should be redrawn.
    fn render(&mut self, view: &FormView) {
        let _ = view;
    }
}

/// Sink that only logs, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl PresentationSink for TracingSink {
    fn on_generation_start(&mut self) {
        tracing::info!("texture generation started");
    }

    fn on_generation_success(&mut self, image_url: &str) {
        tracing::info!(image_url = %image_url, "texture generated successfully");
    }

    fn on_generation_error(&mut self, message: &str) {
        tracing::warn!(error = %message, "texture generation error");
    }

    fn on_validation_failed(&mut self, fields: &[ParameterId]) {
        tracing::info!(fields = ?fields, "form has invalid fields");
    }
}
