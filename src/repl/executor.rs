/// Operation execution
///
/// Turns steps, whether they come from a scenario or were typed on the
/// console, into calls on the remote-access bridge and prints their results.
/// Effects run as background tasks: dispatching a step never waits for the
/// network.
use super::commands::parse_operations;
use crate::client::{ControlApi, HttpControlClient, SkipHttpAccess, Subscription};
use crate::player::{LineSink, StepSink};
use crate::step::Step;
use crate::ui::formatter::Formatter;
use crate::ClientError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinSet;

/// Who asked for an effect. Subscriptions opened by a scenario session are
/// released when that session ends; console subscriptions live until shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Console,
    Scenario(u64),
}

struct Inner<C> {
    access: SkipHttpAccess<C>,
    subscriptions: Mutex<Vec<(Origin, Subscription)>>,
    generation: AtomicU64,
    tasks: Mutex<JoinSet<()>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn log_task_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            tracing::error!(error = %e, "Dispatched effect panicked");
        }
    }
}

impl<C> Inner<C> {
    /// Spawn `effect` after collecting the effects that already finished.
    fn spawn<F>(&self, effect: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let mut tasks = lock(&self.tasks);
        while let Some(result) = tasks.try_join_next() {
            log_task_result(result);
        }
        tasks.spawn(effect);
    }
}

/// Executor for scenario steps and console operations
pub struct OperationExecutor<C = HttpControlClient> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for OperationExecutor<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: ControlApi> OperationExecutor<C> {
    pub fn new(access: SkipHttpAccess<C>) -> Self {
        Self {
            inner: Arc::new(Inner {
                access,
                subscriptions: Mutex::new(Vec::new()),
                generation: AtomicU64::new(0),
                tasks: Mutex::new(JoinSet::new()),
            }),
        }
    }

    pub fn access(&self) -> &SkipHttpAccess<C> {
        &self.inner.access
    }

    fn scenario_origin(&self) -> Origin {
        Origin::Scenario(self.inner.generation.load(Ordering::SeqCst))
    }

    /// Start the effect of `step` in the background and return immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&self, step: Step, origin: Origin) {
        let inner = Arc::clone(&self.inner);
        self.inner.spawn(async move { inner.run(&step, origin).await });
    }

    /// Run the effect of `step` to completion.
    pub async fn run(&self, step: &Step, origin: Origin) {
        self.inner.run(step, origin).await
    }

    /// Run a scenario step to completion, attributed to the current session.
    pub async fn run_scenario_step(&self, step: &Step) {
        let origin = self.scenario_origin();
        self.inner.run(step, origin).await
    }

    /// Handle a console line that is not a playback command.
    pub fn online(&self, line: &str) {
        let operations = parse_operations(line);
        if operations.is_empty() {
            tracing::error!(
                "{}",
                Formatter::error(ClientError::UnknownCommand(line.to_string()).to_string())
            );
            return;
        }
        for operation in operations {
            match operation {
                Ok(step) => self.dispatch(step, Origin::Console),
                Err(e) => tracing::error!("{}", Formatter::error(e.to_string())),
            }
        }
    }

    /// Number of subscriptions currently held.
    pub fn subscriptions(&self) -> usize {
        lock(&self.inner.subscriptions).len()
    }

    /// Wait until every dispatched effect, including ones dispatched while
    /// waiting, has finished.
    pub async fn wait_idle(&self) {
        loop {
            let mut tasks = std::mem::take(&mut *lock(&self.inner.tasks));
            if tasks.is_empty() {
                return;
            }
            while let Some(result) = tasks.join_next().await {
                log_task_result(result);
            }
        }
    }

    /// Close the subscriptions opened by scenario sessions that have ended.
    fn release_scenario(&self) {
        let previous = self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let released: Vec<Subscription> = {
            let mut subscriptions = lock(&self.inner.subscriptions);
            let (ended, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *subscriptions)
                .into_iter()
                .partition(|(origin, _)| matches!(origin, Origin::Scenario(g) if *g <= previous));
            *subscriptions = kept;
            ended.into_iter().map(|(_, sub)| sub).collect()
        };
        if released.is_empty() {
            return;
        }
        let inner = Arc::clone(&self.inner);
        self.inner.spawn(async move {
            for subscription in released {
                inner.close(subscription).await;
            }
        });
    }

    /// Abort pending effects and release every subscription.
    pub async fn shutdown(&self) {
        lock(&self.inner.tasks).abort_all();
        self.wait_idle().await;
        let subscriptions = std::mem::take(&mut *lock(&self.inner.subscriptions));
        for (_, subscription) in subscriptions {
            self.inner.close(subscription).await;
        }
    }
}

impl<C: ControlApi> Inner<C> {
    async fn run(&self, step: &Step, origin: Origin) {
        match step {
            Step::Request(query) => {
                match self
                    .access
                    .request(&query.resource, &query.params_or_default())
                    .await
                {
                    Ok(subscription) => self.register(origin, subscription).await,
                    Err(e) => report(&e),
                }
            }
            Step::Log(query) => {
                match self
                    .access
                    .log(&query.resource, &query.params_or_default())
                    .await
                {
                    Ok(value) => println!("{}", value),
                    Err(e) => report(&e),
                }
            }
            Step::Write(writes) => match self.access.write_many(writes).await {
                Ok(outcome) => println!("{}", outcome),
                Err(e) => report(&e),
            },
            Step::Delete(deletes) => match self.access.delete_many(deletes).await {
                Ok(outcome) => println!("{}", outcome),
                Err(e) => report(&e),
            },
        }
    }

    async fn register(&self, origin: Origin, subscription: Subscription) {
        let current = self.generation.load(Ordering::SeqCst);
        if matches!(origin, Origin::Scenario(g) if g < current) {
            // The session that asked for it ended while the stream was being set up.
            self.close(subscription).await;
            return;
        }
        lock(&self.subscriptions).push((origin, subscription));
    }

    async fn close(&self, subscription: Subscription) {
        let uuid = subscription.uuid().to_string();
        if let Err(e) = subscription.close(self.access.control()).await {
            tracing::warn!(uuid = %uuid, error = %e, "Failed to release stream");
        }
    }
}

fn report(error: &ClientError) {
    tracing::error!("{}", Formatter::error(error.to_string()));
}

impl<C: ControlApi> StepSink for OperationExecutor<C> {
    fn perform(&self, step: &Step) {
        self.dispatch(step.clone(), self.scenario_origin());
    }

    fn release(&self) {
        self.release_scenario();
    }
}

impl<C: ControlApi> LineSink for OperationExecutor<C> {
    fn forward(&self, line: &str) {
        self.online(line);
    }
}
