use super::ControlApi;
use crate::step::Entry;
use crate::ClientError;
use reqwest::{Client, Url};
use serde_json::Value;

/// HTTP client for the control endpoint of a Skip service.
///
/// | operation         | request                                   |
/// |-------------------|-------------------------------------------|
/// | `update`          | `PATCH /v1/inputs/{collection}`           |
/// | `get_all`         | `POST /v1/snapshot/{resource}`            |
/// | `get_stream_uuid` | `POST /v1/streams/{resource}`             |
/// | `delete_uuid`     | `DELETE /v1/streams/{uuid}`               |
#[derive(Debug, Clone)]
pub struct HttpControlClient {
    client: Client,
    base_url: Url,
}

impl HttpControlClient {
    pub fn new(client: Client, host: &str, control_port: u16) -> Result<Self, ClientError> {
        let base_url = Url::parse(&format!("http://{}:{}", host, control_port)).map_err(|e| {
            ClientError::Config(format!(
                "invalid control endpoint {}:{}: {}",
                host, control_port, e
            ))
        })?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        endpoint(&self.base_url, segments)
    }
}

/// `base` with `segments` appended as percent-encoded path segments.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::Config(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

impl ControlApi for HttpControlClient {
    async fn update(&self, collection: &str, entries: &[Entry]) -> Result<(), ClientError> {
        let url = self.endpoint(&["v1", "inputs", collection])?;
        tracing::debug!(%url, entries = entries.len(), "PATCH inputs");
        self.client
            .patch(url)
            .json(entries)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_key(&self, collection: &str, key: &Value) -> Result<(), ClientError> {
        self.update(collection, &[Entry(key.clone(), Vec::new())])
            .await
    }

    async fn get_all(&self, resource: &str, params: &Value) -> Result<Value, ClientError> {
        let url = self.endpoint(&["v1", "snapshot", resource])?;
        tracing::debug!(%url, "POST snapshot");
        let value = self
            .client
            .post(url)
            .json(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }

    async fn get_stream_uuid(&self, resource: &str, params: &Value) -> Result<String, ClientError> {
        let url = self.endpoint(&["v1", "streams", resource])?;
        tracing::debug!(%url, "POST streams");
        let body = self
            .client
            .post(url)
            .json(params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_uuid(&body)
    }

    async fn delete_uuid(&self, uuid: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["v1", "streams", uuid])?;
        tracing::debug!(%url, "DELETE streams");
        self.client.delete(url).send().await?.error_for_status()?;
        Ok(())
    }
}

/// The stream token from a `POST /v1/streams` response body. Servers answer
/// with either the bare token or a JSON string.
pub(crate) fn parse_uuid(body: &str) -> Result<String, ClientError> {
    let uuid = body.trim().trim_matches('"').trim();
    if uuid.is_empty() {
        return Err(ClientError::Stream(
            "service returned an empty subscription identifier".to_string(),
        ));
    }
    Ok(uuid.to_string())
}
