//! Generation session: one wizard plus the backend that serves it.
//!
//! The backend call is modelled on a simulated clock rather than a runtime:
//! the caller advances time with [`MapBuilderSession::tick`], and once the
//! backend's latency has elapsed its answer is delivered to the wizard. A
//! request that outlives the configured timeout fails instead. Requests the
//! user abandoned (back or reset) are dropped when they come due, without
//! calling the backend, and reported as [`Completion::Stale`].

use crate::config::WizardConfig;
use crate::error::{GenerationFailure, WizardError};
use crate::generation::{
    GenerationRequest, GenerationTicket, ImageRef, MapGenerator, PlaceholderGenerator, RequestId,
};
use crate::wizard::{ActionOutcome, Completion, Wizard, WizardAction};

/// Backend with an explicit simulated latency.
pub struct Delayed<G> {
    pub inner: G,
    pub latency_secs: f32,
}

impl<G: MapGenerator> MapGenerator for Delayed<G> {
    fn generate(&mut self, request: &GenerationRequest) -> Result<ImageRef, GenerationFailure> {
        self.inner.generate(request)
    }

    fn latency_secs(&self) -> Option<f32> {
        Some(self.latency_secs)
    }
}

/// Upper bound on ticks taken by [`MapBuilderSession::run_until_settled`].
pub const MAX_SETTLE_TICKS: u32 = 100_000;

struct Pending {
    ticket: GenerationTicket,
    elapsed: f64,
}

pub struct MapBuilderSession {
    wizard: Wizard,
    backend: Box<dyn MapGenerator>,
    pending: Option<Pending>,
    delay_secs: f32,
    timeout_secs: f32,
}

impl MapBuilderSession {
    /// Session backed by the placeholder generator from `config`.
    pub fn new(config: WizardConfig) -> Self {
        let backend = PlaceholderGenerator::new(ImageRef::new(config.placeholder_image.clone()));
        Self::with_backend(config, Box::new(backend))
    }

    pub fn with_backend(config: WizardConfig, backend: Box<dyn MapGenerator>) -> Self {
        let delay_secs = config.generation_delay_secs;
        let timeout_secs = config.generation_timeout_secs;
        Self {
            wizard: Wizard::new(config),
            backend,
            pending: None,
            delay_secs,
            timeout_secs,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Request id still waiting on the simulated backend, stale or not.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending.as_ref().map(|p| p.ticket.request_id)
    }

    /// Forward a user action to the wizard, tracking any request it issues.
    pub fn apply(&mut self, action: WizardAction) -> Result<ActionOutcome, WizardError> {
        let outcome = self.wizard.apply(action)?;
        if let ActionOutcome::Requested(ticket) = &outcome {
            self.track(ticket.clone());
        }
        Ok(outcome)
    }

    pub fn generate_map(&mut self) -> Result<RequestId, WizardError> {
        let ticket = self.wizard.generate_map()?;
        let id = ticket.request_id;
        self.track(ticket);
        Ok(id)
    }

    fn track(&mut self, ticket: GenerationTicket) {
        if let Some(old) = self.pending.take() {
            log::debug!("Dropping superseded request {}", old.ticket.request_id);
        }
        self.pending = Some(Pending {
            ticket,
            elapsed: 0.0,
        });
    }

    /// Advance the simulated clock. Returns how the wizard handled a
    /// completion if one was delivered during this tick.
    pub fn tick(&mut self, delta_secs: f32) -> Option<Completion> {
        let pending = self.pending.as_mut()?;
        pending.elapsed += f64::from(delta_secs.max(0.0));

        let latency = f64::from(self.backend.latency_secs().unwrap_or(self.delay_secs));
        let timeout = f64::from(self.timeout_secs);
        let answered = pending.elapsed >= latency && latency < timeout;
        if !answered && pending.elapsed < timeout {
            return None;
        }

        let id = pending.ticket.request_id;
        if self.wizard.state().pending_request != Some(id) {
            log::debug!("Dropping abandoned request {}", id);
            self.pending = None;
            return Some(Completion::Stale);
        }

        let result = if answered {
            self.backend.generate(&pending.ticket.request)
        } else {
            Err(GenerationFailure::TimedOut {
                after_secs: self.timeout_secs,
            })
        };
        self.pending = None;
        Some(self.wizard.complete_generation(id, result))
    }

    /// Tick in `step_secs` increments until the pending request settles.
    ///
    /// After [`MAX_SETTLE_TICKS`] ticks the clock jumps to the timeout, so a
    /// step too small to make progress still terminates.
    pub fn run_until_settled(&mut self, step_secs: f32) -> Option<Completion> {
        if step_secs.is_nan() || step_secs <= 0.0 {
            return None;
        }
        for _ in 0..MAX_SETTLE_TICKS {
            self.pending.as_ref()?;
            if let Some(done) = self.tick(step_secs) {
                return Some(done);
            }
        }
        self.pending.as_ref()?;
        log::warn!(
            "Request still pending after {} ticks of {}s; jumping to timeout",
            MAX_SETTLE_TICKS,
            step_secs
        );
        self.tick(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::wizard::Step;

    fn ready_session(config: WizardConfig, backend: Box<dyn MapGenerator>) -> MapBuilderSession {
        let mut s = MapBuilderSession::with_backend(config, backend);
        s.apply(WizardAction::StartSetup).unwrap();
        s.apply(WizardAction::SetRoomCount { value: 3 }).unwrap();
        s.apply(WizardAction::StartDesign).unwrap();
        for x in 0..3 {
            s.apply(WizardAction::PlaceRoom { x, y: 0 }).unwrap();
        }
        s
    }

    #[test]
    fn completes_after_delay() {
        let mut s = ready_session(
            WizardConfig::default(),
            Box::new(PlaceholderGenerator::default()),
        );
        s.generate_map().unwrap();
        assert!(s.tick(1.0).is_none());
        assert!(s.wizard().is_loading());
        let done = s.tick(1.0);
        assert_eq!(done, Some(Completion::Succeeded(ImageRef::new("/output.png"))));
        assert_eq!(s.wizard().step(), Step::Result);
        assert!(s.pending_request().is_none());
    }

    #[test]
    fn slow_backend_times_out() {
        let backend = Delayed {
            inner: PlaceholderGenerator::default(),
            latency_secs: 120.0,
        };
        let mut s = ready_session(WizardConfig::default(), Box::new(backend));
        s.generate_map().unwrap();
        let done = s.run_until_settled(0.5);
        assert!(matches!(
            done,
            Some(Completion::Failed(GenerationFailure::TimedOut { .. }))
        ));
        assert_eq!(s.wizard().step(), Step::Design);
        assert!(!s.wizard().is_loading());
        assert!(s.wizard().error().unwrap().contains("timed out"));
    }

    #[test]
    fn backend_failure_surfaces_error() {
        let backend = |_: &GenerationRequest| -> Result<ImageRef, GenerationFailure> {
            Err(GenerationFailure::Backend(String::new()))
        };
        let mut s = ready_session(WizardConfig::default(), Box::new(backend));
        s.apply(WizardAction::GenerateMap).unwrap();
        s.run_until_settled(0.25);
        assert_eq!(s.wizard().step(), Step::Design);
        assert_eq!(
            s.wizard().error(),
            Some("Failed to generate map. Please try again.")
        );
    }

    #[test]
    fn abandoned_request_completes_stale() {
        let mut s = ready_session(
            WizardConfig::default(),
            Box::new(PlaceholderGenerator::default()),
        );
        s.generate_map().unwrap();
        s.apply(WizardAction::GoBack).unwrap();
        assert!(s.pending_request().is_some());
        assert_eq!(s.run_until_settled(1.0), Some(Completion::Stale));
        assert_eq!(s.wizard().step(), Step::Setup);
        assert!(s.wizard().generated_image().is_none());
    }

    #[test]
    fn abandoned_request_never_reaches_backend() {
        let calls = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&calls);
        let backend = move |_: &GenerationRequest| -> Result<ImageRef, GenerationFailure> {
            seen.set(seen.get() + 1);
            Ok(ImageRef::new("/late.png"))
        };
        let mut s = ready_session(WizardConfig::default(), Box::new(backend));
        s.generate_map().unwrap();
        s.apply(WizardAction::ResetDesign).unwrap();
        assert_eq!(s.run_until_settled(0.5), Some(Completion::Stale));
        assert_eq!(calls.get(), 0);
        assert!(s.pending_request().is_none());
    }

    #[test]
    fn tiny_step_still_settles() {
        let mut s = ready_session(
            WizardConfig::default(),
            Box::new(PlaceholderGenerator::default()),
        );
        s.generate_map().unwrap();
        assert_eq!(
            s.run_until_settled(1e-9),
            Some(Completion::Succeeded(ImageRef::new("/output.png")))
        );
        assert_eq!(s.wizard().step(), Step::Result);
    }

    #[test]
    fn nothing_pending_means_no_completion() {
        let mut s = MapBuilderSession::new(WizardConfig::default());
        assert!(s.tick(10.0).is_none());
        assert!(s.run_until_settled(1.0).is_none());
        assert!(s.run_until_settled(0.0).is_none());
        assert!(s.run_until_settled(f32::NAN).is_none());
    }
}
