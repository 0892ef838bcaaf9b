//! Form state and view model computation.
//!
//! This module defines [`AppState`], the single source of truth for the
//! generator form: the raw value of every parameter, the latest validation
//! result of every parameter, the in-flight flag, and the result of the last
//! completed attempt.
//!
//! # In-flight flag
//!
//! At most one generation request may be outstanding. [`AppState::begin_generation`]
//! claims the flag and [`AppState::end_generation`] releases it; the event
//! handler pairs them so that every accepted begin is followed by exactly one
//! end, whatever the outcome.
//!
//! # Example
//!
//! ```rust
//! use shelltex::app::AppState;
//! use shelltex::domain::ParameterId;
//!
//! let mut state = AppState::new();
//! state.set_value(ParameterId::K, "2.0");
//! let request = state.snapshot_if_all_valid().expect("defaults are valid");
//! assert_eq!(request.get(ParameterId::K), "2.0");
//! ```

use super::modes::WorkflowPhase;
use crate::domain::{validate, GenerationOutcome, GenerationRequest, ParameterId, ValidationResult};
use crate::ui::viewmodel::{FieldView, FormView, GeneratedImage, SubmitButton};
use chrono::{DateTime, Utc};

/// Central state container for the generator form.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Raw text per parameter, indexed by [`ParameterId::index`].
    values: [String; 5],

    /// Latest validation result per parameter.
    validations: [ValidationResult; 5],

    /// Whether a generation request is in flight.
    generating: bool,

    phase: WorkflowPhase,

    /// Result of the most recently completed attempt.
    last_outcome: Option<GenerationOutcome>,

    /// Most recent successful image and when it arrived. Kept across failures.
    last_image: Option<(String, DateTime<Utc>)>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a form populated with the default parameter values.
    #[must_use]
    pub fn new() -> Self {
        let values = ParameterId::ALL.map(|id| id.default_value().to_string());
        let validations = ParameterId::ALL.map(|id| validate(id, &values[id.index()]));
        Self {
            values,
            validations,
            generating: false,
            phase: WorkflowPhase::Idle,
            last_outcome: None,
            last_image: None,
        }
    }

    /// Stores a new raw value and re-validates that field.
    pub fn set_value(&mut self, id: ParameterId, raw: impl Into<String>) -> &ValidationResult {
        let raw = raw.into();
        let result = validate(id, &raw);
        tracing::debug!(parameter = %id, valid = result.valid, "field updated");

        self.values[id.index()] = raw;
        self.validations[id.index()] = result;
        &self.validations[id.index()]
    }

    #[must_use]
    pub fn value(&self, id: ParameterId) -> &str {
        &self.values[id.index()]
    }

    /// Latest validation result recorded for `id`.
    #[must_use]
    pub fn validation(&self, id: ParameterId) -> &ValidationResult {
        &self.validations[id.index()]
    }

    /// Fields whose latest validation failed, in form order.
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<ParameterId> {
        ParameterId::ALL
            .into_iter()
            .filter(|id| !self.validations[id.index()].valid)
            .collect()
    }

    /// Re-validates every field and builds a request if all of them pass.
    ///
    /// The fresh results are recorded even when the snapshot is refused, so
    /// the form can show every offending field at once.
    pub fn snapshot_if_all_valid(&mut self) -> Option<GenerationRequest> {
        for id in ParameterId::ALL {
            self.validations[id.index()] = validate(id, &self.values[id.index()]);
        }

        let invalid = self.invalid_fields();
        if !invalid.is_empty() {
            tracing::debug!(invalid_fields = ?invalid, "snapshot refused");
            return None;
        }

        Some(GenerationRequest::from_values(self.values.clone()))
    }

    /// Claims the in-flight flag.
    ///
    /// Returns `false` without changing anything if a request is already in
    /// flight.
    pub fn begin_generation(&mut self) -> bool {
        if self.generating {
            tracing::debug!("generation already in flight");
            return false;
        }
        self.generating = true;
        self.enter_phase(WorkflowPhase::Submitting);
        true
    }

    /// Releases the in-flight flag and returns to [`WorkflowPhase::Idle`].
    pub fn end_generation(&mut self) {
        if !self.generating {
            tracing::warn!("end_generation called with no generation in flight");
        }
        self.generating = false;
        self.enter_phase(WorkflowPhase::Idle);
    }

    #[must_use]
    pub const fn is_generating(&self) -> bool {
        self.generating
    }

    #[must_use]
    pub const fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub(crate) fn enter_phase(&mut self, phase: WorkflowPhase) {
        if self.phase != phase {
            tracing::debug!(from = ?self.phase, to = ?phase, "workflow phase");
            self.phase = phase;
        }
    }

    /// Remembers the result of a completed attempt.
    pub(crate) fn record_outcome(&mut self, outcome: GenerationOutcome) {
        if let GenerationOutcome::Success { image_url } = &outcome {
            self.last_image = Some((image_url.clone(), Utc::now()));
        }
        self.last_outcome = Some(outcome);
    }

    #[must_use]
    pub const fn last_outcome(&self) -> Option<&GenerationOutcome> {
        self.last_outcome.as_ref()
    }

    /// Restores every field to its default value.
    ///
    /// The in-flight flag and the last outcome are left untouched.
    pub fn reset_to_defaults(&mut self) {
        for id in ParameterId::ALL {
            self.set_value(id, id.default_value());
        }
    }

    /// Computes a renderable view of the form.
    #[must_use]
    pub fn compute_viewmodel(&self) -> FormView {
        let fields = ParameterId::ALL
            .into_iter()
            .map(|id| FieldView {
                id,
                value: self.values[id.index()].clone(),
                error: self.validations[id.index()].message,
            })
            .collect();

        let image = self
            .last_image
            .as_ref()
            .map(|(url, generated_at)| GeneratedImage::new(url, *generated_at));

        let last_error = match &self.last_outcome {
            Some(GenerationOutcome::Failure { error_message }) => Some(error_message.clone()),
            _ => None,
        };

        FormView {
            fields,
            submit: SubmitButton::for_generating(self.generating),
            image,
            last_error,
        }
    }
}
