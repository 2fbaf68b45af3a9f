use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::Model;

/// A network kept in its serialized form, untouched.
///
/// Useful when the caller only moves networks between files and the server,
/// and as the model type of the `thomas` binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonNetwork(Value);

#[derive(Error, Debug, PartialEq, Eq)]
#[error("a serialized network must be a JSON object, got {0}")]
pub struct InvalidNetwork(pub &'static str);

impl JsonNetwork {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn set_name(&mut self, name: &str) {
        if let Value::Object(map) = &mut self.0 {
            map.insert("name".to_string(), Value::String(name.to_string()));
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Model for JsonNetwork {
    type Error = InvalidNetwork;

    fn from_dict(value: Value) -> Result<Self, InvalidNetwork> {
        if value.is_object() {
            Ok(Self(value))
        } else {
            Err(InvalidNetwork(kind(&value)))
        }
    }

    fn as_dict(&self) -> Value {
        self.0.clone()
    }

    fn name(&self) -> Option<String> {
        self.0.get("name").and_then(Value::as_str).map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_dict_keeps_value_verbatim() {
        let value = json!({
            "type": "BayesianNetwork",
            "name": "Lungcancer",
            "nodes": [{"RV": "A", "states": ["yes", "no"]}]
        });
        let network = JsonNetwork::from_dict(value.clone()).unwrap();
        assert_eq!(network.as_dict(), value);
        assert_eq!(network.name().as_deref(), Some("Lungcancer"));
    }

    #[test]
    fn test_from_dict_rejects_non_objects() {
        assert_eq!(
            JsonNetwork::from_dict(json!([1, 2])).unwrap_err(),
            InvalidNetwork("an array")
        );
        assert!(JsonNetwork::from_dict(Value::Null).is_err());
    }

    #[test]
    fn test_name_missing_or_not_a_string() {
        assert_eq!(JsonNetwork::new(json!({})).name(), None);
        assert_eq!(JsonNetwork::new(json!({"name": 3})).name(), None);
    }
}
