use super::control::{endpoint, HttpControlClient};
use super::stream::Subscription;
use super::ControlApi;
use crate::config::ServiceConfig;
use crate::step::{Delete, Write};
use crate::ClientError;
use futures_util::future::join_all;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;

/// Result of one call in a batch of more than one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Settled {
    Fulfilled,
    Rejected { reason: String },
}

impl Settled {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Settled::Fulfilled)
    }
}

/// Outcome of a write or delete batch.
///
/// A batch of exactly one call reports that call's own result (its failure is
/// the batch's failure). Any other batch reports one [`Settled`] per call, in
/// input order, and never fails as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Single,
    Settled(Vec<Settled>),
}

impl BatchOutcome {
    pub fn rejected(&self) -> usize {
        match self {
            BatchOutcome::Single => 0,
            BatchOutcome::Settled(items) => items.iter().filter(|s| !s.is_fulfilled()).count(),
        }
    }
}

impl fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOutcome::Single => write!(f, "ok"),
            BatchOutcome::Settled(items) => {
                let json = serde_json::to_string(items).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

/// Issue all `calls` concurrently and aggregate them into a [`BatchOutcome`].
async fn settle<F>(calls: Vec<F>) -> Result<BatchOutcome, ClientError>
where
    F: Future<Output = Result<(), ClientError>>,
{
    if calls.len() == 1 {
        for call in calls {
            call.await?;
        }
        return Ok(BatchOutcome::Single);
    }
    let results = join_all(calls).await;
    Ok(BatchOutcome::Settled(
        results
            .into_iter()
            .map(|result| match result {
                Ok(()) => Settled::Fulfilled,
                Err(e) => Settled::Rejected {
                    reason: e.to_string(),
                },
            })
            .collect(),
    ))
}

/// Bridge between steps and a Skip service.
///
/// Connection parameters are fixed at construction.
#[derive(Debug)]
pub struct SkipHttpAccess<C = HttpControlClient> {
    control: C,
    client: Client,
    streaming_url: Url,
}

impl SkipHttpAccess<HttpControlClient> {
    pub fn connect(config: &ServiceConfig) -> Result<Self, ClientError> {
        let client = Client::new();
        let control = HttpControlClient::new(client.clone(), &config.host, config.control_port)?;
        Self::with_control(control, client, &config.host, config.streaming_port)
    }
}

impl<C: ControlApi> SkipHttpAccess<C> {
    pub fn with_control(
        control: C,
        client: Client,
        host: &str,
        streaming_port: u16,
    ) -> Result<Self, ClientError> {
        let streaming_url =
            Url::parse(&format!("http://{}:{}", host, streaming_port)).map_err(|e| {
                ClientError::Config(format!(
                    "invalid streaming endpoint {}:{}: {}",
                    host, streaming_port, e
                ))
            })?;
        Ok(Self {
            control,
            client,
            streaming_url,
        })
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    /// URL of the event stream identified by `uuid`.
    pub fn stream_url(&self, uuid: &str) -> Result<Url, ClientError> {
        endpoint(&self.streaming_url, &["v1", "streams", uuid])
    }

    /// One update per write, all in flight at once.
    pub async fn write_many(&self, writes: &[Write]) -> Result<BatchOutcome, ClientError> {
        let calls = writes
            .iter()
            .map(|w| self.control.update(&w.collection, &w.entries))
            .collect();
        let outcome = settle(calls).await?;
        crate::logging::log_batch_settled("write", writes.len(), outcome.rejected());
        Ok(outcome)
    }

    /// One key deletion per key of every group, all in flight at once.
    pub async fn delete_many(&self, deletes: &[Delete]) -> Result<BatchOutcome, ClientError> {
        let calls: Vec<_> = deletes
            .iter()
            .flat_map(|d| {
                d.keys
                    .iter()
                    .map(move |key| self.control.delete_key(&d.collection, key))
            })
            .collect();
        let total = calls.len();
        let outcome = settle(calls).await?;
        crate::logging::log_batch_settled("delete", total, outcome.rejected());
        Ok(outcome)
    }

    /// Current value of a resource.
    pub async fn log(&self, resource: &str, params: &Value) -> Result<Value, ClientError> {
        self.control.get_all(resource, params).await
    }

    /// Open a standing subscription: obtain a stream identifier, then start
    /// reading the event stream it names.
    pub async fn request(&self, resource: &str, params: &Value) -> Result<Subscription, ClientError> {
        let uuid = self.control.get_stream_uuid(resource, params).await?;
        let url = self.stream_url(&uuid)?;
        Ok(Subscription::open(self.client.clone(), url, resource, &uuid))
    }
}
