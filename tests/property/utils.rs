use proptest::prelude::*;
use skip_scenario_client::player::{ErrorSink, LineSink, PlaybackError, StepSink};
use skip_scenario_client::step::{ResourceQuery, Step};
use skip_scenario_client::{Scenario, ScenarioSet};
use std::sync::Mutex;

/// Step sink remembering the resource of every step it receives
#[derive(Default)]
pub struct Recorder {
    resources: Mutex<Vec<String>>,
    releases: Mutex<usize>,
}

impl Recorder {
    pub fn resources(&self) -> Vec<String> {
        self.resources.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.resources.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.resources.lock().unwrap().clear();
    }

    pub fn releases(&self) -> usize {
        *self.releases.lock().unwrap()
    }
}

impl StepSink for Recorder {
    fn perform(&self, step: &Step) {
        let resource = match step {
            Step::Request(q) | Step::Log(q) => q.resource.clone(),
            other => other.kind().to_string(),
        };
        self.resources.lock().unwrap().push(resource);
    }

    fn release(&self) {
        *self.releases.lock().unwrap() += 1;
    }
}

#[derive(Default)]
pub struct Errors(Mutex<Vec<PlaybackError>>);

impl Errors {
    pub fn take(&self) -> Vec<PlaybackError> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl ErrorSink for Errors {
    fn report(&self, error: &PlaybackError) {
        self.0.lock().unwrap().push(error.clone());
    }
}

#[derive(Default)]
pub struct Lines(Mutex<Vec<String>>);

impl Lines {
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl LineSink for Lines {
    fn forward(&self, line: &str) {
        self.0.lock().unwrap().push(line.to_string());
    }
}

/// Resource names of the steps of scenario `s` with `n` steps.
pub fn resources(s: usize, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("s{}r{}", s, i)).collect()
}

pub fn scenario(s: usize, n: usize) -> Scenario {
    Scenario::new(
        resources(s, n)
            .into_iter()
            .map(|r| Step::Log(ResourceQuery::new(r)))
            .collect(),
    )
}

/// Scenario sets of one to five scenarios with up to eight steps each.
pub fn scenario_sizes() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..8, 1..5)
}

pub fn scenario_set(sizes: &[usize]) -> ScenarioSet {
    ScenarioSet::new(
        sizes
            .iter()
            .enumerate()
            .map(|(i, n)| scenario(i + 1, *n))
            .collect(),
    )
}
