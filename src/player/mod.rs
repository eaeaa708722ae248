/// Scenario playback
///
/// The [`Player`] owns at most one [`Session`] over a scenario selected from a
/// [`ScenarioSet`], and understands the playback console commands. Steps are
/// handed to a [`StepSink`], problems are reported to an [`ErrorSink`], and
/// lines that are not playback commands go to a [`LineSink`].
pub mod session;

pub use session::{PauseHandle, Session, SessionState};

use crate::repl::pattern::{parse_leading_int, CommandParser};
use crate::scenario::ScenarioSet;
use crate::step::Step;
use std::sync::{Arc, OnceLock};

/// Receives the steps a session performs.
pub trait StepSink: Send + Sync {
    fn perform(&self, step: &Step);

    /// The session that produced previous steps has ended. Resources it
    /// acquired through this sink may be released.
    fn release(&self) {}
}

/// Receives playback conditions that are reported rather than returned.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &PlaybackError);
}

/// Receives console lines that are not playback commands.
pub trait LineSink: Send + Sync {
    fn forward(&self, line: &str);
}

/// Non-fatal playback conditions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("The scenario has no more entries.")]
    ScenarioExhausted,

    #[error("The scenario {index} does not exist (available: 1..={count})")]
    ScenarioIndexOutOfRange { index: i64, count: usize },

    #[error("No current scenario session")]
    NoActiveSession,

    #[error("Invalid number '{0}'")]
    InvalidIndex(String),
}

/// Error sink writing to the console through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleErrors;

impl ErrorSink for ConsoleErrors {
    fn report(&self, error: &PlaybackError) {
        tracing::error!("{}", crate::ui::formatter::Formatter::error(error.to_string()));
    }
}

/// Playback commands understood by [`Player::online`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Start(i64),
    Reset,
    Step(Option<i64>),
    Play(Option<i64>),
    Stop,
}

fn number(arg: &str) -> Result<i64, PlaybackError> {
    parse_leading_int(arg).ok_or_else(|| PlaybackError::InvalidIndex(arg.to_string()))
}

fn playback_parser() -> &'static CommandParser<Result<PlaybackCommand, PlaybackError>> {
    static PARSER: OnceLock<CommandParser<Result<PlaybackCommand, PlaybackError>>> =
        OnceLock::new();
    PARSER.get_or_init(|| {
        CommandParser::new()
            .rule(r"^start ([a-z_0-9]+)$", |a| number(a[0]).map(PlaybackCommand::Start))
            .and_then(|p| p.rule(r"^reset$", |_| Ok(PlaybackCommand::Reset)))
            .and_then(|p| {
                p.rule(r"^step ([a-z_0-9]+)$", |a| {
                    number(a[0]).map(|n| PlaybackCommand::Step(Some(n)))
                })
            })
            .and_then(|p| p.rule(r"^step$", |_| Ok(PlaybackCommand::Step(None))))
            .and_then(|p| {
                p.rule(r"^play ([a-z_0-9]+)$", |a| {
                    number(a[0]).map(|n| PlaybackCommand::Play(Some(n)))
                })
            })
            .and_then(|p| p.rule(r"^play$", |_| Ok(PlaybackCommand::Play(None))))
            .and_then(|p| p.rule(r"^stop$", |_| Ok(PlaybackCommand::Stop)))
            .expect("playback patterns are valid regular expressions")
    })
}

/// Parse a line as a playback command. `None` when the line is not one.
pub fn parse_playback(line: &str) -> Option<Result<PlaybackCommand, PlaybackError>> {
    playback_parser().parse(line).into_iter().next()
}

pub struct Player {
    scenarios: ScenarioSet,
    running: Option<Session>,
    sink: Arc<dyn StepSink>,
    errors: Arc<dyn ErrorSink>,
    fallback: Arc<dyn LineSink>,
}

impl Player {
    pub fn new(
        scenarios: ScenarioSet,
        sink: Arc<dyn StepSink>,
        errors: Arc<dyn ErrorSink>,
        fallback: Arc<dyn LineSink>,
    ) -> Self {
        Self {
            scenarios,
            running: None,
            sink,
            errors,
            fallback,
        }
    }

    pub fn scenarios(&self) -> &ScenarioSet {
        &self.scenarios
    }

    pub fn session(&self) -> Option<&Session> {
        self.running.as_ref()
    }

    /// Select scenario `idx` (1-based), replacing any running session.
    pub fn start(&mut self, idx: i64) -> bool {
        let Some(scenario) = self.scenarios.get(idx) else {
            self.errors.report(&PlaybackError::ScenarioIndexOutOfRange {
                index: idx,
                count: self.scenarios.len(),
            });
            return false;
        };
        let session = Session::new(
            scenario.clone(),
            Arc::clone(&self.sink),
            Arc::clone(&self.errors),
        );
        if self.running.replace(session).is_some() {
            self.sink.release();
        }
        tracing::info!(scenario = idx, steps = scenario.len(), "Scenario started");
        true
    }

    pub fn play(&mut self, idx: Option<i64>) {
        if let Some(idx) = idx {
            if !self.start(idx) {
                return;
            }
        }
        match self.running.as_mut() {
            Some(session) => session.play(),
            None => self.errors.report(&PlaybackError::NoActiveSession),
        }
    }

    /// Advance the session. At most one step is performed whatever the
    /// requested count, and none for a count below one.
    pub fn step(&mut self, idx: Option<i64>) {
        let Some(session) = self.running.as_mut() else {
            self.errors.report(&PlaybackError::NoActiveSession);
            return;
        };
        let mut steps = idx.unwrap_or(1).min(1);
        while steps > 0 {
            if !session.next() {
                break;
            }
            steps -= 1;
        }
    }

    pub fn reset(&mut self) {
        if let Some(session) = self.running.as_mut() {
            session.reset();
        }
    }

    pub fn stop(&mut self) {
        if self.running.take().is_some() {
            self.sink.release();
            tracing::info!("Scenario stopped");
        }
    }

    pub fn apply(&mut self, command: PlaybackCommand) {
        match command {
            PlaybackCommand::Start(idx) => {
                self.start(idx);
            }
            PlaybackCommand::Reset => self.reset(),
            PlaybackCommand::Step(idx) => self.step(idx),
            PlaybackCommand::Play(idx) => self.play(idx),
            PlaybackCommand::Stop => self.stop(),
        }
    }

    /// Handle one console line.
    pub fn online(&mut self, line: &str) {
        if line.trim().is_empty() && self.running.is_some() {
            self.step(None);
            return;
        }
        let fallback = Arc::clone(&self.fallback);
        playback_parser().dispatch(
            line,
            |command| match command {
                Ok(command) => self.apply(command),
                Err(e) => self.errors.report(&e),
            },
            |line| fallback.forward(line),
        );
    }

    /// One line per scenario: index, name and step count.
    pub fn list(&self) -> Vec<String> {
        self.scenarios
            .iter()
            .enumerate()
            .map(|(i, scenario)| {
                let marker = match &self.running {
                    Some(s) if s.scenario().ptr_eq(scenario) => "*",
                    _ => " ",
                };
                format!("{}{:>3}  {}", marker, i + 1, scenario)
            })
            .collect()
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("scenarios", &self.scenarios.len())
            .field("running", &self.running)
            .finish()
    }
}
