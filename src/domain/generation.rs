//! Request and outcome of one texture generation attempt.

use crate::domain::parameter::ParameterId;
use serde::{Deserialize, Serialize};

/// Validated payload for one `/calculate` call.
///
/// Values are carried as the raw strings the user entered; the server parses
/// them itself. A request can only be built from five values that all passed
/// validation (see [`AppState::snapshot_if_all_valid`](crate::app::AppState::snapshot_if_all_valid)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(rename = "K")]
    k: String,
    t_max: String,
    delta_t: String,
    color1: String,
    color2: String,
}

impl GenerationRequest {
    /// Builds a request from per-field values in [`ParameterId::ALL`] order.
    pub(crate) fn from_values(values: [String; 5]) -> Self {
        let [k, t_max, delta_t, color1, color2] = values;
        Self {
            k,
            t_max,
            delta_t,
            color1,
            color2,
        }
    }

    /// Raw value sent for `id`.
    #[must_use]
    pub fn get(&self, id: ParameterId) -> &str {
        match id {
            ParameterId::K => &self.k,
            ParameterId::TMax => &self.t_max,
            ParameterId::DeltaT => &self.delta_t,
            ParameterId::Color1 => &self.color1,
            ParameterId::Color2 => &self.color2,
        }
    }
}

/// How one generation attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The server produced an image.
    Success {
        /// Path or URL of the generated image, as returned by the server.
        image_url: String,
    },
    /// The server refused the request or the call never completed.
    Failure {
        /// Message to show the user.
        error_message: String,
    },
}

impl GenerationOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GenerationRequest {
        GenerationRequest::from_values(ParameterId::ALL.map(|id| id.default_value().to_string()))
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "K": "1.0",
                "t_max": "10.0",
                "delta_t": "0.1",
                "color1": "#0000ff",
                "color2": "#ff0000",
            })
        );
    }

    #[test]
    fn get_returns_field_by_id() {
        let request = sample();
        for id in ParameterId::ALL {
            assert_eq!(request.get(id), id.default_value());
        }
    }
}
