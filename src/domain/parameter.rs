//! Form parameters accepted by the texture generator.
//!
//! The generator takes exactly five inputs. Three are floating point values
//! bounded by an inclusive range, two are hex colors. [`ParameterId`] names
//! them, [`Constraint`] describes what each one accepts.

use crate::domain::error::ShelltexError;
use std::fmt;
use std::str::FromStr;

/// Identifier of one generator parameter.
///
/// Variants are declared in form order, which is also the order of
/// [`ParameterId::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterId {
    /// Reaction constant of the model.
    K,
    /// Simulated time horizon.
    TMax,
    /// Integration time step.
    DeltaT,
    /// Base color of the rendered texture.
    Color1,
    /// Contrast color of the rendered texture.
    Color2,
}

/// Accepted values for a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Parsed value must lie in `[min, max]`.
    Range {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Value must be `#` followed by six hex digits.
    HexColor,
}

impl ParameterId {
    /// All parameters in form order.
    pub const ALL: [Self; 5] = [Self::K, Self::TMax, Self::DeltaT, Self::Color1, Self::Color2];

    /// Name used for this parameter in the form and in the request body.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::K => "K",
            Self::TMax => "t_max",
            Self::DeltaT => "delta_t",
            Self::Color1 => "color1",
            Self::Color2 => "color2",
        }
    }

    #[must_use]
    pub const fn constraint(self) -> Constraint {
        match self {
            Self::K => Constraint::Range { min: 0.1, max: 5.0 },
            Self::TMax => Constraint::Range { min: 1.0, max: 10000.0 },
            Self::DeltaT => Constraint::Range { min: 0.001, max: 1.0 },
            Self::Color1 | Self::Color2 => Constraint::HexColor,
        }
    }

    /// Message shown next to the field when its value is rejected.
    #[must_use]
    pub const fn error_message(self) -> &'static str {
        match self {
            Self::K => "K must be between 0.1 and 5.0",
            Self::TMax => "Max time must be between 1.0 and 10000.0",
            Self::DeltaT => "Time step must be between 0.001 and 1.0",
            Self::Color1 | Self::Color2 => "Invalid color format",
        }
    }

    /// Value a fresh form starts with.
    #[must_use]
    pub const fn default_value(self) -> &'static str {
        match self {
            Self::K => "1.0",
            Self::TMax => "10.0",
            Self::DeltaT => "0.1",
            Self::Color1 => "#0000ff",
            Self::Color2 => "#ff0000",
        }
    }

    /// Index into per-field arrays, matching the position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for ParameterId {
    type Err = ShelltexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.wire_name() == s)
            .ok_or_else(|| ShelltexError::Parse(format!("unknown parameter: {s}")))
    }
}
