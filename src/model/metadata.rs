use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Weak;

use super::{ModelKey, Tracked};
use crate::error::{ClientError, Result};

/// Field of a network resource that carries the serialized model.
pub const JSON_FIELD: &str = "json";

/// Server-side attributes of a network (id, name, owner, ...), without its `json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Splits a resource returned by the server into its `json` field and
    /// the remaining metadata.
    pub fn split_resource(resource: Value) -> Result<(Option<Value>, Metadata)> {
        match resource {
            Value::Object(mut fields) => {
                let json = fields.remove(JSON_FIELD);
                Ok((json, Metadata(fields)))
            }
            other => Err(ClientError::UnexpectedResponse(format!(
                "expected a network resource object, got {}",
                other
            ))),
        }
    }

    /// Identifier as used in `network/{id}`.
    ///
    /// Strings are used as-is and numbers are rendered. `null`, an empty
    /// string and `0` mean the server has not assigned an id.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_u64() != Some(0) && n.as_i64() != Some(0) => {
                Some(n.to_string())
            }
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn owner(&self) -> Option<&str> {
        self.0.get("owner").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

}

/// Side table from model identity to metadata.
///
/// Entries hold the model handle weakly; entries of dropped models are
/// pruned whenever the table is written to.
#[derive(Debug, Default)]
pub struct MetadataStore {
    entries: HashMap<ModelKey, Entry>,
}

#[derive(Debug)]
struct Entry {
    alive: Weak<()>,
    metadata: Metadata,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<M>(&self, model: &Tracked<M>) -> Option<&Metadata> {
        self.entries.get(&model.key()).map(|entry| &entry.metadata)
    }

    /// Records metadata for an instance, returning what was stored before.
    pub fn insert<M>(&mut self, model: &Tracked<M>, metadata: Metadata) -> Option<Metadata> {
        self.prune();
        let entry = Entry {
            alive: model.liveness(),
            metadata,
        };
        self.entries
            .insert(model.key(), entry)
            .map(|previous| previous.metadata)
    }

    pub fn remove<M>(&mut self, model: &Tracked<M>) -> Option<Metadata> {
        self.prune();
        self.entries.remove(&model.key()).map(|entry| entry.metadata)
    }

    /// Discards metadata of models that no longer exist.
    pub fn prune(&mut self) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.alive.strong_count() > 0);
        let pruned = before - self.entries.len();
        if pruned > 0 {
            debug!("Discarded metadata of {} dropped model(s)", pruned);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
