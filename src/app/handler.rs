//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes field edits, submit
//! requests and generation outcomes, translating them into state changes and
//! action sequences.
//!
//! # Architecture
//!
//! 1. Events arrive from the runtime (user input or a resolved network call)
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! The handler never performs I/O. A submit that passes validation yields
//! [`Action::Submit`]; the runtime executes it and reports back with
//! [`Event::GenerationResolved`], which is the only event that releases the
//! in-flight flag.
//!
//! # Example
//!
//! ```rust
//! use shelltex::app::{handle_event, Action, AppState, Event};
//!
//! let mut state = AppState::new();
//! let (_, actions) = handle_event(&mut state, &Event::Submit)?;
//! assert!(matches!(actions.last(), Some(Action::Submit(_))));
//!
//! // A second submit while the first is outstanding does nothing.
//! let (_, actions) = handle_event(&mut state, &Event::Submit)?;
//! assert!(actions.is_empty());
//! # Ok::<(), shelltex::ShelltexError>(())
//! ```

use super::modes::WorkflowPhase;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{GenerationOutcome, ParameterId};

/// Events triggered by user input or by the completion of a network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A field's raw value changed.
    SetValue {
        /// Field that changed.
        id: ParameterId,
        /// New raw text.
        raw: String,
    },

    /// The user asked for a texture.
    Submit,

    /// The outstanding network call finished.
    GenerationResolved(GenerationOutcome),

    /// Restores every field to its default value.
    ResetDefaults,
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Returns
///
/// A tuple of whether the view should be re-rendered and the actions to
/// execute in order.
///
/// # Errors
///
/// Currently every event is handled infallibly; the `Result` is kept so that
/// handlers can propagate failures with `?` like the rest of the crate.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::SetValue { id, raw } => {
            state.set_value(*id, raw.as_str());
            Ok((true, vec![]))
        }
        Event::Submit => Ok(handle_submit(state)),
        Event::GenerationResolved(outcome) => Ok(handle_resolved(state, outcome)),
        Event::ResetDefaults => {
            state.reset_to_defaults();
            Ok((true, vec![]))
        }
    }
}

fn handle_submit(state: &mut AppState) -> (bool, Vec<Action>) {
    if state.is_generating() {
        tracing::debug!("submit ignored: generation already in flight");
        return (false, vec![]);
    }

    state.enter_phase(WorkflowPhase::Validating);

    let Some(request) = state.snapshot_if_all_valid() else {
        state.enter_phase(WorkflowPhase::Rejected);
        let fields = state.invalid_fields();
        tracing::debug!(invalid_fields = ?fields, "submit rejected");
        state.enter_phase(WorkflowPhase::Idle);
        return (true, vec![Action::NotifyInvalid { fields }]);
    };

    if !state.begin_generation() {
        state.enter_phase(WorkflowPhase::Idle);
        return (false, vec![]);
    }

    tracing::debug!(request = ?request, "submitting generation request");
    (true, vec![Action::NotifyStart, Action::Submit(request)])
}

fn handle_resolved(state: &mut AppState, outcome: &GenerationOutcome) -> (bool, Vec<Action>) {
    if !state.is_generating() {
        tracing::warn!(outcome = ?outcome, "outcome received with no generation in flight");
        return (false, vec![]);
    }

    let action = match outcome {
        GenerationOutcome::Success { image_url } => {
            state.enter_phase(WorkflowPhase::Succeeded);
            tracing::debug!(image_url = %image_url, "generation succeeded");
            Action::NotifySuccess {
                image_url: image_url.clone(),
            }
        }
        GenerationOutcome::Failure { error_message } => {
            state.enter_phase(WorkflowPhase::Failed);
            tracing::debug!(error = %error_message, "generation failed");
            Action::NotifyError {
                message: error_message.clone(),
            }
        }
    };

    state.record_outcome(outcome.clone());
    state.end_generation();
    (true, vec![action])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GenerationRequest;

    fn submit(state: &mut AppState) -> Vec<Action> {
        handle_event(state, &Event::Submit).unwrap().1
    }

    fn submitted_request(actions: &[Action]) -> Option<&GenerationRequest> {
        actions.iter().find_map(|a| match a {
            Action::Submit(request) => Some(request),
            _ => None,
        })
    }

    #[test]
    fn valid_submit_starts_generation() {
        let mut state = AppState::new();
        let actions = submit(&mut state);

        assert_eq!(actions[0], Action::NotifyStart);
        assert!(submitted_request(&actions).is_some());
        assert!(state.is_generating());
        assert_eq!(state.phase(), WorkflowPhase::Submitting);
        assert!(state.phase().is_resting());
    }

    #[test]
    fn invalid_submit_is_rejected_without_network_call() {
        let mut state = AppState::new();
        handle_event(
            &mut state,
            &Event::SetValue {
                id: ParameterId::TMax,
                raw: "0".to_string(),
            },
        )
        .unwrap();
        handle_event(
            &mut state,
            &Event::SetValue {
                id: ParameterId::Color1,
                raw: "blue".to_string(),
            },
        )
        .unwrap();

        let actions = submit(&mut state);
        assert_eq!(
            actions,
            vec![Action::NotifyInvalid {
                fields: vec![ParameterId::TMax, ParameterId::Color1]
            }]
        );
        assert!(!state.is_generating());
        assert_eq!(state.phase(), WorkflowPhase::Idle);
        assert!(state.phase().is_resting());
    }

    #[test]
    fn duplicate_submit_is_ignored() {
        let mut state = AppState::new();
        assert!(submitted_request(&submit(&mut state)).is_some());

        let (render, actions) = handle_event(&mut state, &Event::Submit).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert!(state.is_generating());
    }

    #[test]
    fn success_releases_flag() {
        let mut state = AppState::new();
        submit(&mut state);

        let outcome = GenerationOutcome::Success {
            image_url: "/img/x.png".to_string(),
        };
        let (_, actions) =
            handle_event(&mut state, &Event::GenerationResolved(outcome.clone())).unwrap();

        assert_eq!(
            actions,
            vec![Action::NotifySuccess {
                image_url: "/img/x.png".to_string()
            }]
        );
        assert!(!state.is_generating());
        assert_eq!(state.phase(), WorkflowPhase::Idle);
        assert_eq!(state.last_outcome(), Some(&outcome));
    }

    #[test]
    fn failure_releases_flag_and_allows_retry() {
        let mut state = AppState::new();
        submit(&mut state);

        let outcome = GenerationOutcome::Failure {
            error_message: "bad params".to_string(),
        };
        let (_, actions) = handle_event(&mut state, &Event::GenerationResolved(outcome)).unwrap();
        assert_eq!(
            actions,
            vec![Action::NotifyError {
                message: "bad params".to_string()
            }]
        );
        assert!(!state.is_generating());
        assert!(state.phase().is_resting());

        assert!(submitted_request(&submit(&mut state)).is_some());
    }

    #[test]
    fn transient_phases_do_not_rest() {
        for phase in [
            WorkflowPhase::Validating,
            WorkflowPhase::Rejected,
            WorkflowPhase::Succeeded,
            WorkflowPhase::Failed,
        ] {
            assert!(!phase.is_resting(), "{phase:?}");
        }
    }

    #[test]
    fn stray_outcome_is_ignored() {
        let mut state = AppState::new();
        let outcome = GenerationOutcome::Success {
            image_url: "/img/x.png".to_string(),
        };
        let (render, actions) = handle_event(&mut state, &Event::GenerationResolved(outcome)).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert!(state.last_outcome().is_none());
    }

    #[test]
    fn edits_during_generation_do_not_touch_the_request() {
        let mut state = AppState::new();
        let request = submitted_request(&submit(&mut state)).cloned().unwrap();

        handle_event(
            &mut state,
            &Event::SetValue {
                id: ParameterId::K,
                raw: "4.0".to_string(),
            },
        )
        .unwrap();

        assert_eq!(request.get(ParameterId::K), "1.0");
        assert_eq!(state.value(ParameterId::K), "4.0");
        assert!(state.is_generating());
    }
}
