use super::sse::{SseDecoder, SseEvent};
use super::ControlApi;
use crate::step::Entry;
use crate::ui::formatter::Formatter;
use crate::ClientError;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use tokio::task::JoinHandle;

/// Payload of a stream event the client reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Baseline snapshot sent when the stream opens
    Init(Vec<Entry>),
    /// Incremental change
    Update(Vec<Entry>),
}

impl StreamEvent {
    /// Decode an SSE event. Events other than `init` and `update` yield `None`.
    pub fn from_sse(event: &SseEvent) -> Result<Option<Self>, ClientError> {
        let build: fn(Vec<Entry>) -> StreamEvent = match event.event.as_str() {
            "init" => StreamEvent::Init,
            "update" => StreamEvent::Update,
            _ => return Ok(None),
        };
        let entries: Vec<Entry> = serde_json::from_str(&event.data)?;
        Ok(Some(build(entries)))
    }

    pub fn label(&self) -> &'static str {
        match self {
            StreamEvent::Init(_) => "Init",
            StreamEvent::Update(_) => "Update",
        }
    }

    pub fn entries(&self) -> &[Entry] {
        match self {
            StreamEvent::Init(entries) | StreamEvent::Update(entries) => entries,
        }
    }
}

/// A standing subscription to a resource.
///
/// The stream is read by a background task owned by this value. Dropping the
/// subscription stops reading; [`close`](Self::close) also releases the
/// stream on the service.
#[derive(Debug)]
pub struct Subscription {
    resource: String,
    uuid: String,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Open the event stream for `uuid` and start printing its events.
    pub fn open(client: Client, url: Url, resource: &str, uuid: &str) -> Self {
        crate::logging::log_subscription_opened(resource, uuid);
        let task = tokio::spawn(pump(client, url, resource.to_string()));
        Self {
            resource: resource.to_string(),
            uuid: uuid.to_string(),
            task,
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Stop reading and release the stream on the service.
    pub async fn close<C: ControlApi>(self, control: &C) -> Result<(), ClientError> {
        self.task.abort();
        crate::logging::log_subscription_closed(&self.resource, &self.uuid);
        control.delete_uuid(&self.uuid).await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Read the event stream at `url` until it ends. Errors are reported, never retried.
async fn pump(client: Client, url: Url, resource: String) {
    let response = match client
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .send()
        .await
        .and_then(|r| r.error_for_status())
    {
        Ok(response) => response,
        Err(e) => {
            report_stream_error(&resource, &ClientError::Http(e));
            return;
        }
    };

    let mut body = response.bytes_stream();
    let mut decoder = SseDecoder::new();
    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                report_stream_error(&resource, &ClientError::Http(e));
                return;
            }
        };
        for event in decoder.feed(&chunk) {
            match StreamEvent::from_sse(&event) {
                Ok(Some(event)) => print_event(&resource, &event),
                Ok(None) => tracing::debug!(
                    resource = %resource,
                    event = %event.event,
                    "Ignoring stream event"
                ),
                Err(e) => report_stream_error(&resource, &e),
            }
        }
    }
    tracing::info!(resource = %resource, "Stream ended");
}

fn print_event(resource: &str, event: &StreamEvent) {
    crate::logging::log_stream_event(resource, event.label(), event.entries().len());
    println!(
        "{} {}",
        Formatter::success(event.label()),
        Formatter::format_entries(event.entries())
    );
}

fn report_stream_error(resource: &str, error: &ClientError) {
    tracing::error!(resource, "{}", Formatter::error(format!("Error {}", error)));
}
