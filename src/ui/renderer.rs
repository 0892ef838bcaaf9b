//! Plain-text rendering of the form view.
//!
//! # Example
//!
//! ```rust
//! use shelltex::app::AppState;
//! use shelltex::ui::render;
//!
//! let state = AppState::new();
//! let text = render(&state.compute_viewmodel());
//! assert!(text.contains("t_max"));
//! ```

use crate::ui::viewmodel::FormView;
use std::fmt::Write;

/// Width of the parameter name column.
const NAME_WIDTH: usize = 8;

/// Renders `view` as a multi-line block of text.
///
/// Each field is printed on its own line, followed by its validation message
/// when the value is rejected. The button state, the last image and the last
/// error close the block.
#[must_use]
pub fn render(view: &FormView) -> String {
    let mut out = String::new();

    for field in &view.fields {
        let _ = writeln!(out, "  {:<NAME_WIDTH$} {}", field.id.wire_name(), field.value);
        if let Some(error) = field.error {
            let _ = writeln!(out, "  {:<NAME_WIDTH$} ! {error}", "");
        }
    }

    let marker = if view.submit.enabled { ' ' } else { '-' };
    let _ = writeln!(out, "[{marker}] {}", view.submit.label);

    if let Some(image) = &view.image {
        let _ = writeln!(out, "image:    {}", image.display_url);
        let _ = writeln!(out, "download: {} ({})", image.url, image.download_name);
    }
    if let Some(error) = &view.last_error {
        let _ = writeln!(out, "error:    {error}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::domain::ParameterId;

    #[test]
    fn shows_field_errors_under_the_field() {
        let mut state = AppState::new();
        state.set_value(ParameterId::Color1, "#xyz");
        let text = render(&state.compute_viewmodel());

        let lines: Vec<&str> = text.lines().collect();
        let color_line = lines.iter().position(|l| l.contains("#xyz")).unwrap();
        assert!(lines[color_line + 1].contains("Invalid color format"));
        assert!(text.contains("[ ] Generate Texture"));
    }

    #[test]
    fn marks_button_busy_while_generating() {
        let mut state = AppState::new();
        assert!(state.begin_generation());
        let text = render(&state.compute_viewmodel());
        assert!(text.contains("[-] Generating..."));
    }
}
