//! View model types representing renderable form state.
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the renderer or by any other presentation layer. They contain no business
//! logic, only display-ready data.

use crate::domain::ParameterId;
use chrono::{DateTime, Utc};

/// Filename offered when the user downloads a generated texture.
pub const DOWNLOAD_FILENAME: &str = "activator_inhibitor_texture.png";

/// Complete view of the generator form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    /// One entry per parameter, in form order.
    pub fields: Vec<FieldView>,

    pub submit: SubmitButton,

    /// Most recent generated image, if any.
    pub image: Option<GeneratedImage>,

    /// Message of the last attempt, if it failed.
    pub last_error: Option<String>,
}

/// Display information for one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub id: ParameterId,
    pub value: String,
    /// Validation message shown under the field.
    pub error: Option<&'static str>,
}

/// State of the generate button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: &'static str,
    pub enabled: bool,
}

impl SubmitButton {
    #[must_use]
    pub const fn for_generating(generating: bool) -> Self {
        if generating {
            Self {
                label: "Generating...",
                enabled: false,
            }
        } else {
            Self {
                label: "Generate Texture",
                enabled: true,
            }
        }
    }
}

/// A texture returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Location exactly as the server returned it; used for downloads.
    pub url: String,

    /// Location with a timestamp query appended so a viewer refetches the
    /// image even though the server reuses the same path.
    pub display_url: String,

    pub download_name: &'static str,
}

impl GeneratedImage {
    #[must_use]
    pub fn new(url: &str, generated_at: DateTime<Utc>) -> Self {
        let separator = if url.contains('?') { '&' } else { '?' };
        Self {
            url: url.to_string(),
            display_url: format!("{url}{separator}t={}", generated_at.timestamp_millis()),
            download_name: DOWNLOAD_FILENAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_url_busts_cache() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        let image = GeneratedImage::new("/static/images/texture.png", at);
        assert_eq!(image.display_url, "/static/images/texture.png?t=1700000000123");
        assert_eq!(image.url, "/static/images/texture.png");
        assert_eq!(image.download_name, "activator_inhibitor_texture.png");

        let image = GeneratedImage::new("/img?id=4", at);
        assert_eq!(image.display_url, "/img?id=4&t=1700000000123");
    }

    #[test]
    fn button_is_disabled_while_generating() {
        assert_eq!(SubmitButton::for_generating(true).label, "Generating...");
        assert!(!SubmitButton::for_generating(true).enabled);
        assert!(SubmitButton::for_generating(false).enabled);
    }
}
