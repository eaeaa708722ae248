//! Remote access to a Skip service.
//!
//! [`SkipHttpAccess`] translates the effects of steps into calls against the
//! service's control API (mutations, snapshot reads, stream setup) and its
//! streaming API (server-sent events).
pub mod access;
pub mod control;
pub mod sse;
pub mod stream;

pub use access::{BatchOutcome, Settled, SkipHttpAccess};
pub use control::HttpControlClient;
pub use stream::{StreamEvent, Subscription};

use crate::step::Entry;
use crate::ClientError;
use serde_json::Value;
use std::future::Future;

/// Operations of the control endpoint.
pub trait ControlApi: Send + Sync + 'static {
    /// Replace the values of the given keys in an input collection.
    fn update(
        &self,
        collection: &str,
        entries: &[Entry],
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Remove one key from an input collection.
    fn delete_key(
        &self,
        collection: &str,
        key: &Value,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Snapshot of a resource instantiated with `params`.
    fn get_all(
        &self,
        resource: &str,
        params: &Value,
    ) -> impl Future<Output = Result<Value, ClientError>> + Send;

    /// Identifier of a new stream over a resource instantiated with `params`.
    fn get_stream_uuid(
        &self,
        resource: &str,
        params: &Value,
    ) -> impl Future<Output = Result<String, ClientError>> + Send;

    /// Release a stream created by [`get_stream_uuid`](Self::get_stream_uuid).
    fn delete_uuid(&self, uuid: &str) -> impl Future<Output = Result<(), ClientError>> + Send;
}
