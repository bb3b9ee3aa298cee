// src/sensor/request.rs

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::sensor::item::{Fingerprint, WorkItem};

/// Instruction for the external job platform to run work for one item.
///
/// `dedup_key` is an idempotency token: delivering the same key twice must
/// not run the work twice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRequest {
    pub dedup_key: String,
    pub payload: Map<String, Value>,
}

impl ExecutionRequest {
    /// Build the request for a changed item.
    ///
    /// The item's name is written into `payload[name_key]`, replacing any
    /// value the document itself had under that key.
    pub fn for_item(item: WorkItem, key_prefix: &str, name_key: &str) -> Self {
        let dedup_key = dedup_key(key_prefix, &item.name, &item.fingerprint);
        let mut payload = item.payload;
        payload.insert(name_key.to_string(), Value::String(item.name));
        Self { dedup_key, payload }
    }

    /// Run config for the job platform.
    ///
    /// With an op target the payload is nested as `ops.<op>.config`,
    /// otherwise the payload is the run config.
    pub fn run_config(&self, op: Option<&str>) -> Value {
        match op {
            Some(op) => {
                let mut ops = Map::new();
                ops.insert(
                    op.to_string(),
                    json!({ "config": Value::Object(self.payload.clone()) }),
                );
                json!({ "ops": Value::Object(ops) })
            }
            None => Value::Object(self.payload.clone()),
        }
    }
}

/// `<prefix>_<name>_<fingerprint>`, or `<name>_<fingerprint>` without a prefix.
///
/// Fingerprints never contain `_`, so for a fixed prefix the last `_` splits
/// the key back into `(name, fingerprint)`: distinct pairs give distinct keys.
pub fn dedup_key(prefix: &str, name: &str, fingerprint: &Fingerprint) -> String {
    if prefix.is_empty() {
        format!("{name}_{fingerprint}")
    } else {
        format!("{prefix}_{name}_{fingerprint}")
    }
}
