//! Scripted steps and their JSON wire shape.
//!
//! A step is serialized as `{"type": ..., "payload": ...}`:
//!
//! ```json
//! {"type": "request", "payload": {"resource": "computed"}}
//! {"type": "write", "payload": [{"collection": "cells", "entries": [["A1", ["23"]]]}]}
//! {"type": "delete", "payload": [{"collection": "cells", "keys": ["A3"]}]}
//! ```
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A `(key, values)` pair. A key may hold zero or more values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry(pub Value, pub Vec<Value>);

impl Entry {
    pub fn new(key: impl Into<Value>, values: Vec<Value>) -> Self {
        Entry(key.into(), values)
    }

    pub fn key(&self) -> &Value {
        &self.0
    }

    pub fn values(&self) -> &[Value] {
        &self.1
    }
}

/// Resource query used by `request` and `log` steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceQuery {
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Carried for wire compatibility; requests always go to the configured ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl ResourceQuery {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            params: None,
            port: None,
        }
    }

    /// Parameters sent to the service, `{}` when none were given.
    pub fn params_or_default(&self) -> Value {
        self.params
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default()))
    }
}

/// Entries written into one input collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Write {
    pub collection: String,
    pub entries: Vec<Entry>,
}

/// Keys removed from one input collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub collection: String,
    pub keys: Vec<Value>,
}

/// One scripted action of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum Step {
    /// Open a standing subscription on a resource
    Request(ResourceQuery),
    /// Read a snapshot of a resource
    Log(ResourceQuery),
    /// Update input collections
    Write(Vec<Write>),
    /// Delete keys from input collections
    Delete(Vec<Delete>),
}

impl Step {
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Request(_) => "request",
            Step::Log(_) => "log",
            Step::Write(_) => "write",
            Step::Delete(_) => "delete",
        }
    }

    /// The payload alone, as echoed on the console.
    pub fn payload_json(&self) -> String {
        let payload = match self {
            Step::Request(q) | Step::Log(q) => serde_json::to_value(q),
            Step::Write(w) => serde_json::to_value(w),
            Step::Delete(d) => serde_json::to_value(d),
        };
        payload.map(|v| v.to_string()).unwrap_or_default()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.payload_json())
    }
}
