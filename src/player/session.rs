/// Cursor over one scenario
///
/// A session replays the steps of a single scenario, one at a time or all at
/// once, handing each step to the step sink it was created with.
use super::{ErrorSink, PlaybackError, StepSink};
use crate::scenario::Scenario;
use crate::ui::formatter::Formatter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Observable playback state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Playing,
    Paused,
    Completed,
}

/// Clears the running flag of a session from outside the playback loop.
#[derive(Debug, Clone)]
pub struct PauseHandle(Arc<AtomicBool>);

impl PauseHandle {
    pub fn pause(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Session {
    scenario: Scenario,
    current: usize,
    on: Arc<AtomicBool>,
    sink: Arc<dyn StepSink>,
    errors: Arc<dyn ErrorSink>,
}

impl Session {
    pub fn new(scenario: Scenario, sink: Arc<dyn StepSink>, errors: Arc<dyn ErrorSink>) -> Self {
        Self {
            scenario,
            current: 0,
            on: Arc::new(AtomicBool::new(false)),
            sink,
            errors,
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.scenario.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenario.is_empty()
    }

    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::SeqCst)
    }

    pub fn is_completed(&self) -> bool {
        self.current >= self.len()
    }

    pub fn state(&self) -> SessionState {
        if self.is_on() {
            SessionState::Playing
        } else if self.is_completed() {
            SessionState::Completed
        } else if self.current > 0 {
            SessionState::Paused
        } else {
            SessionState::Idle
        }
    }

    pub fn pause_handle(&self) -> PauseHandle {
        PauseHandle(Arc::clone(&self.on))
    }

    /// Perform the step under the cursor and advance.
    ///
    /// Returns whether more steps remain. Stepping past the end reports
    /// [`PlaybackError::ScenarioExhausted`] and returns `false`.
    pub fn next(&mut self) -> bool {
        let Some(step) = self.scenario.get(self.current) else {
            self.errors.report(&PlaybackError::ScenarioExhausted);
            return false;
        };
        self.current += 1;

        println!(">> {}", Formatter::info(step.to_string()));
        crate::logging::log_step_dispatched(self.current, step.kind());
        self.sink.perform(step);

        self.current < self.len()
    }

    /// Run the remaining steps until the end or until paused.
    pub fn play(&mut self) {
        self.on.store(!self.is_completed(), Ordering::SeqCst);
        while self.is_on() {
            let more = self.next();
            if !more {
                self.on.store(false, Ordering::SeqCst);
            }
        }
    }

    pub fn pause(&mut self) {
        self.on.store(false, Ordering::SeqCst);
    }

    pub fn reset(&mut self) {
        self.on.store(false, Ordering::SeqCst);
        self.current = 0;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("scenario", &self.scenario.name())
            .field("current", &self.current)
            .field("len", &self.len())
            .field("on", &self.is_on())
            .finish()
    }
}
