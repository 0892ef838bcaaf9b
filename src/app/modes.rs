//! Phases of the generation workflow.
//!
//! # State Machine
//!
//! ```text
//! Idle ──submit──▶ Validating ──invalid──▶ Rejected ──▶ Idle
//!                      │
//!                      └──valid──▶ Submitting ──▶ Succeeded ──▶ Idle
//!                                       │
//!                                       └──────▶ Failed ─────▶ Idle
//! ```
//!
//! Only `Idle` and `Submitting` persist between events. The other phases are
//! passed through while a single event is handled and are visible in traces.

/// Current phase of the generation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowPhase {
    /// No request outstanding.
    #[default]
    Idle,

    /// Re-running the validator over every field before a submit.
    Validating,

    /// At least one field failed; no network call is made.
    Rejected,

    /// One request is in flight. Further submits are ignored.
    Submitting,

    /// The server returned an image.
    Succeeded,

    /// The server or the transport reported an error.
    Failed,
}

impl WorkflowPhase {
    /// Whether the phase survives past the event that entered it.
    #[must_use]
    pub const fn is_resting(self) -> bool {
        matches!(self, Self::Idle | Self::Submitting)
    }
}
