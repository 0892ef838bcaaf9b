//! Cooperative driver for the generation workflow.
//!
//! [`Runtime`] owns the form state, the submitter and the presentation sink.
//! It feeds events through [`handle_event`], executes the resulting actions,
//! and holds the one outstanding network call.
//!
//! # Concurrency
//!
//! Everything runs on one task. [`Runtime::run`] waits on two things at once:
//! the next user event and the pending generation call, if there is one. The
//! network call is the only place control is yielded while work is pending;
//! handling an event always runs to completion. Submits arriving while a call
//! is pending are dropped by the handler, so there is never more than one
//! call to wait on. A pending call is never cancelled: if the event channel
//! closes, the runtime still waits for the outcome before returning.
//!
//! A caller that drives calls itself may still drop one before it resolves,
//! for example under a timeout. The form is then released on the next
//! dispatch, or immediately when the dropped future was [`Runtime::submit`].
//!
//! # Example
//!
//! ```no_run
//! use shelltex::{Config, Event, Runtime};
//! use shelltex::domain::ParameterId;
//! use shelltex::ui::TracingSink;
//!
//! # async fn demo() -> shelltex::Result<()> {
//! let mut runtime = Runtime::from_config(&Config::default(), TracingSink)?;
//! runtime.dispatch(Event::SetValue { id: ParameterId::K, raw: "2.0".into() })?;
//! let outcome = runtime.submit().await?;
//! # Ok(())
//! # }
//! ```

use crate::app::{handle_event, Action, AppState, Event};
use crate::client::{HttpSubmitter, Submitter};
use crate::domain::error::Result;
use crate::domain::GenerationOutcome;
use crate::ui::PresentationSink;
use crate::Config;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use tokio::sync::mpsc;

/// A generation call that has been issued but not yet resolved.
///
/// Dropping it before it yields an outcome marks the call as abandoned, and
/// the issuing [`Runtime`] releases the in-flight flag on its next dispatch.
pub struct PendingGeneration {
    call: BoxFuture<'static, GenerationOutcome>,
    settled: bool,
    abandoned: Arc<AtomicBool>,
}

impl Future for PendingGeneration {
    type Output = GenerationOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let outcome = ready!(self.call.poll_unpin(cx));
        self.settled = true;
        Poll::Ready(outcome)
    }
}

impl Drop for PendingGeneration {
    fn drop(&mut self) {
        if !self.settled {
            self.abandoned.store(true, Ordering::Release);
        }
    }
}

impl std::fmt::Debug for PendingGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingGeneration")
            .field("settled", &self.settled)
            .finish_non_exhaustive()
    }
}

/// Drives the workflow against a submitter and a presentation sink.
pub struct Runtime<P> {
    app: AppState,
    submitter: Arc<dyn Submitter>,
    sink: P,
    /// Set when an issued call is dropped unresolved.
    abandoned: Arc<AtomicBool>,
}

/// Releases the form if [`Runtime::submit`] is dropped mid-call.
struct ReleaseOnDrop<'a, P: PresentationSink> {
    runtime: &'a mut Runtime<P>,
    call: Option<PendingGeneration>,
}

impl<P: PresentationSink> Drop for ReleaseOnDrop<'_, P> {
    fn drop(&mut self) {
        if let Some(call) = self.call.take() {
            drop(call);
            self.runtime.release_abandoned();
        }
    }
}

impl<P: PresentationSink> Runtime<P> {
    /// Creates a runtime with a fresh default form.
    pub fn new(submitter: Arc<dyn Submitter>, sink: P) -> Self {
        Self {
            app: crate::initialize(),
            submitter,
            sink,
            abandoned: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a runtime that submits over HTTP to the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP submitter cannot be built from `config`.
    pub fn from_config(config: &Config, sink: P) -> Result<Self> {
        let submitter = HttpSubmitter::new(config)?;
        Ok(Self::new(Arc::new(submitter), sink))
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.app
    }

    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    /// Consumes the runtime, returning the form state and the sink.
    pub fn into_parts(self) -> (AppState, P) {
        (self.app, self.sink)
    }

    /// Handles one event and executes its actions.
    ///
    /// Returns the issued network call if the event started one. The caller
    /// awaits it and dispatches [`Event::GenerationResolved`] with its
    /// outcome; [`Self::submit`] and [`Self::run`] do this for you. A call
    /// dropped before it resolves releases the form on the next dispatch.
    ///
    /// # Errors
    ///
    /// Propagates errors from the event handler.
    pub fn dispatch(&mut self, event: Event) -> Result<Option<PendingGeneration>> {
        self.release_abandoned();
        let (should_render, actions) = handle_event(&mut self.app, &event)?;

        let mut pending = None;
        for action in actions {
            if let Some(call) = self.execute_action(action) {
                pending = Some(call);
            }
        }

        if should_render {
            let view = self.app.compute_viewmodel();
            self.sink.render(&view);
        }
        Ok(pending)
    }

    /// Runs one complete submit: validate, send, and resolve.
    ///
    /// Returns `None` if the submit was rejected by validation or ignored
    /// because a call is already pending. Dropping the returned future before
    /// it completes releases the form, so the next submit issues a new call.
    ///
    /// # Errors
    ///
    /// Propagates errors from the event handler.
    pub async fn submit(&mut self) -> Result<Option<GenerationOutcome>> {
        let Some(pending) = self.dispatch(Event::Submit)? else {
            return Ok(None);
        };
        let mut guard = ReleaseOnDrop {
            runtime: self,
            call: Some(pending),
        };
        let outcome = match guard.call.as_mut() {
            Some(call) => call.await,
            None => return Ok(None),
        };
        guard.call = None;
        guard.runtime.dispatch(Event::GenerationResolved(outcome.clone()))?;
        Ok(Some(outcome))
    }

    /// Processes events until the channel closes, then waits for any pending
    /// call to resolve.
    ///
    /// # Errors
    ///
    /// Propagates errors from the event handler.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<Event>) -> Result<(AppState, P)> {
        let mut pending: Option<PendingGeneration> = None;

        loop {
            tokio::select! {
                outcome = resolve(&mut pending), if pending.is_some() => {
                    pending = None;
                    self.dispatch(Event::GenerationResolved(outcome))?;
                }
                event = events.recv() => {
                    let Some(event) = event else { break };
                    if let Some(call) = self.dispatch(event)? {
                        pending = Some(call);
                    }
                }
            }
        }

        if let Some(call) = pending.take() {
            tracing::debug!("event channel closed; waiting for pending generation");
            let outcome = call.await;
            self.dispatch(Event::GenerationResolved(outcome))?;
        }

        Ok(self.into_parts())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: Action) -> Option<PendingGeneration> {
        match action {
            Action::NotifyInvalid { fields } => {
                self.sink.on_validation_failed(&fields);
                None
            }
            Action::NotifyStart => {
                self.sink.on_generation_start();
                None
            }
            Action::Submit(request) => Some(PendingGeneration {
                call: self.submitter.submit(request),
                settled: false,
                abandoned: Arc::clone(&self.abandoned),
            }),
            Action::NotifySuccess { image_url } => {
                self.sink.on_generation_success(&image_url);
                self.sink.on_texture_generated(&image_url);
                None
            }
            Action::NotifyError { message } => {
                self.sink.on_generation_error(&message);
                None
            }
        }
    }

    /// Clears the in-flight flag if the outstanding call was dropped unresolved.
    fn release_abandoned(&mut self) {
        if !self.abandoned.swap(false, Ordering::AcqRel) || !self.app.is_generating() {
            return;
        }
        tracing::warn!("generation call dropped before resolving; releasing the form");
        self.app.end_generation();
        let view = self.app.compute_viewmodel();
        self.sink.render(&view);
    }
}

async fn resolve(pending: &mut Option<PendingGeneration>) -> GenerationOutcome {
    match pending {
        Some(call) => call.await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::WorkflowPhase;
    use crate::domain::{GenerationRequest, ParameterId};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<String>,
        renders: usize,
    }

    impl PresentationSink for RecordingSink {
        fn on_generation_start(&mut self) {
            self.calls.push("start".to_string());
        }
        fn on_generation_success(&mut self, image_url: &str) {
            self.calls.push(format!("success {image_url}"));
        }
        fn on_generation_error(&mut self, message: &str) {
            self.calls.push(format!("error {message}"));
        }
        fn on_validation_failed(&mut self, fields: &[ParameterId]) {
            self.calls.push(format!("invalid {fields:?}"));
        }
        fn on_texture_generated(&mut self, image_url: &str) {
            self.calls.push(format!("generated {image_url}"));
        }
        fn render(&mut self, _view: &crate::ui::FormView) {
            self.renders += 1;
        }
    }

    /// Answers every call with a fixed outcome and counts calls.
    struct FixedSubmitter {
        outcome: GenerationOutcome,
        calls: AtomicUsize,
    }

    impl FixedSubmitter {
        fn new(outcome: GenerationOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Submitter for FixedSubmitter {
        fn submit(&self, _request: GenerationRequest) -> BoxFuture<'static, GenerationOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(self.outcome.clone()).boxed()
        }
    }

    /// Holds every call open until the test releases it.
    #[derive(Default)]
    struct GatedSubmitter {
        gates: Mutex<Vec<oneshot::Sender<GenerationOutcome>>>,
        calls: AtomicUsize,
    }

    impl Submitter for GatedSubmitter {
        fn submit(&self, _request: GenerationRequest) -> BoxFuture<'static, GenerationOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push(tx);
            async move {
                rx.await.unwrap_or_else(|_| GenerationOutcome::Failure {
                    error_message: "gate dropped".to_string(),
                })
            }
            .boxed()
        }
    }

    /// Never answers.
    struct HungSubmitter;

    impl Submitter for HungSubmitter {
        fn submit(&self, _request: GenerationRequest) -> BoxFuture<'static, GenerationOutcome> {
            std::future::pending().boxed()
        }
    }

    #[tokio::test]
    async fn submit_success_notifies_and_releases_flag() {
        let submitter = FixedSubmitter::new(GenerationOutcome::Success {
            image_url: "/img/x.png".to_string(),
        });
        let mut runtime = Runtime::new(submitter.clone(), RecordingSink::default());

        let outcome = runtime.submit().await.unwrap();
        assert_eq!(
            outcome,
            Some(GenerationOutcome::Success {
                image_url: "/img/x.png".to_string()
            })
        );
        assert!(!runtime.state().is_generating());
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            runtime.sink_mut().calls,
            vec!["start", "success /img/x.png", "generated /img/x.png"]
        );
        assert_eq!(runtime.sink_mut().renders, 2);
    }

    #[tokio::test]
    async fn submit_failure_notifies_error() {
        let submitter = FixedSubmitter::new(GenerationOutcome::Failure {
            error_message: "bad params".to_string(),
        });
        let mut runtime = Runtime::new(submitter, RecordingSink::default());

        runtime.submit().await.unwrap();
        assert!(!runtime.state().is_generating());
        assert_eq!(runtime.sink_mut().calls, vec!["start", "error bad params"]);
    }

    #[tokio::test]
    async fn invalid_form_makes_no_call() {
        let submitter = FixedSubmitter::new(GenerationOutcome::Success {
            image_url: "/img/x.png".to_string(),
        });
        let mut runtime = Runtime::new(submitter.clone(), RecordingSink::default());
        runtime
            .dispatch(Event::SetValue {
                id: ParameterId::K,
                raw: "abc".to_string(),
            })
            .unwrap();

        assert_eq!(runtime.submit().await.unwrap(), None);
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
        assert_eq!(runtime.sink_mut().calls, vec!["invalid [K]"]);
    }

    #[tokio::test]
    async fn run_ignores_submits_while_call_is_pending() {
        let submitter = Arc::new(GatedSubmitter::default());
        let runtime = Runtime::new(submitter.clone(), RecordingSink::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(runtime.run(rx));

        tx.send(Event::Submit).unwrap();
        tx.send(Event::Submit).unwrap();
        tx.send(Event::Submit).unwrap();

        while submitter.gates.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        tokio::task::yield_now().await;
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);

        let gate = submitter.gates.lock().unwrap().pop().unwrap();
        gate.send(GenerationOutcome::Success {
            image_url: "/img/x.png".to_string(),
        })
        .unwrap();
        drop(tx);

        let (state, sink) = handle.await.unwrap().unwrap();
        assert!(!state.is_generating());
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            sink.calls,
            vec!["start", "success /img/x.png", "generated /img/x.png"]
        );
    }

    #[tokio::test]
    async fn run_waits_for_pending_call_after_channel_closes() {
        let submitter = Arc::new(GatedSubmitter::default());
        let runtime = Runtime::new(submitter.clone(), RecordingSink::default());
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Event::Submit).unwrap();
        drop(tx);

        let handle = tokio::spawn(runtime.run(rx));
        while submitter.gates.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(!handle.is_finished());

        let gate = submitter.gates.lock().unwrap().pop().unwrap();
        gate.send(GenerationOutcome::Failure {
            error_message: "Network error: refused".to_string(),
        })
        .unwrap();

        let (state, sink) = handle.await.unwrap().unwrap();
        assert!(!state.is_generating());
        assert_eq!(sink.calls, vec!["start", "error Network error: refused"]);
    }

    #[tokio::test]
    async fn timed_out_submit_releases_flag() {
        let mut runtime = Runtime::new(Arc::new(HungSubmitter), RecordingSink::default());

        let result = tokio::time::timeout(Duration::from_millis(50), runtime.submit()).await;
        assert!(result.is_err());

        assert!(!runtime.state().is_generating());
        assert_eq!(runtime.state().phase(), WorkflowPhase::Idle);
        assert_eq!(runtime.sink_mut().calls, vec!["start"]);
        assert!(runtime.dispatch(Event::Submit).unwrap().is_some());
    }

    #[tokio::test]
    async fn dropped_call_is_released_on_next_dispatch() {
        let submitter = Arc::new(GatedSubmitter::default());
        let mut runtime = Runtime::new(submitter.clone(), RecordingSink::default());

        let call = runtime.dispatch(Event::Submit).unwrap();
        assert!(call.is_some());
        assert!(runtime.state().is_generating());
        drop(call);

        runtime
            .dispatch(Event::SetValue {
                id: ParameterId::K,
                raw: "2.0".to_string(),
            })
            .unwrap();
        assert!(!runtime.state().is_generating());

        assert!(runtime.dispatch(Event::Submit).unwrap().is_some());
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn awaited_call_is_not_treated_as_dropped() {
        let submitter = FixedSubmitter::new(GenerationOutcome::Success {
            image_url: "/img/x.png".to_string(),
        });
        let mut runtime = Runtime::new(submitter, RecordingSink::default());

        let call = runtime.dispatch(Event::Submit).unwrap().unwrap();
        let outcome = call.await;
        runtime.dispatch(Event::GenerationResolved(outcome)).unwrap();

        assert!(!runtime.state().is_generating());
        assert_eq!(
            runtime.sink_mut().calls,
            vec!["start", "success /img/x.png", "generated /img/x.png"]
        );
    }
}
