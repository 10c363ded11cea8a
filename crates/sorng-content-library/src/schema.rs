//! Resource schema descriptors and the configuration record handed to
//! resource handlers.

use crate::error::{ContentLibraryError, ContentLibraryResult};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    StringSet,
}

/// One attribute of a resource schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub required: bool,
    /// Any change replaces the resource.
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: &'static str,
}

impl Attribute {
    pub fn required(name: &'static str, attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            name,
            attr_type,
            required: true,
            force_new: true,
            default: None,
            description,
        }
    }

    pub fn optional(name: &'static str, attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, attr_type, description)
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Build a record from raw configuration: fill defaults, then check that
    /// required attributes are present and every value has its declared type.
    pub fn record(&self, config: Value) -> ContentLibraryResult<ResourceData> {
        let mut data = ResourceData::from_value(config)?;
        for attr in &self.attributes {
            match &attr.default {
                Some(default) if !data.attributes.contains_key(attr.name) => {
                    data.attributes.insert(attr.name.to_string(), default.clone());
                }
                _ => {}
            }
        }
        self.validate(&data)?;
        Ok(data)
    }

    pub fn validate(&self, data: &ResourceData) -> ContentLibraryResult<()> {
        for attr in &self.attributes {
            match data.attributes.get(attr.name) {
                None | Some(Value::Null) if attr.required => {
                    return Err(ContentLibraryError::invalid_config(format!(
                        "{}: attribute {:?} is required",
                        self.type_name, attr.name
                    )))
                }
                None | Some(Value::Null) => {}
                Some(v) => check_type(self.type_name, attr, v)?,
            }
        }
        Ok(())
    }
}

fn check_type(resource: &str, attr: &Attribute, value: &Value) -> ContentLibraryResult<()> {
    let ok = match attr.attr_type {
        AttributeType::String => value.is_string(),
        AttributeType::StringSet => value
            .as_array()
            .map(|items| items.iter().all(Value::is_string))
            .unwrap_or(false),
    };
    if ok {
        return Ok(());
    }
    Err(ContentLibraryError::invalid_config(format!(
        "{resource}: attribute {:?} must be {:?}, got {value}",
        attr.name, attr.attr_type
    )))
}

/// Identifier plus attribute values of one resource instance.
///
/// Getters follow the host tool's zero-value convention: a missing string
/// reads as `""` and a missing set as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    attributes: Map<String, Value>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes from a JSON object; an `id` key, if any, becomes the id.
    pub fn from_value(value: Value) -> ContentLibraryResult<Self> {
        let mut attributes = match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ContentLibraryError::invalid_config(format!(
                    "resource configuration must be an object, got {other}"
                )))
            }
        };
        let id = match attributes.remove("id") {
            Some(Value::String(id)) => id,
            _ => String::new(),
        };
        Ok(Self { id, attributes })
    }

    /// Attributes as a JSON object, with `id` included when set.
    pub fn to_value(&self) -> Value {
        let mut map = self.attributes.clone();
        if !self.id.is_empty() {
            map.insert("id".into(), Value::String(self.id.clone()));
        }
        Value::Object(map)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn get_str(&self, key: &str) -> &str {
        self.attributes.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Set-typed attribute; duplicates collapse.
    pub fn get_set(&self, key: &str) -> BTreeSet<String> {
        self.attributes
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.attributes.insert(key.to_string(), Value::String(value.into()));
    }

    pub fn set_set<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        let items = set.into_iter().map(Value::String).collect();
        self.attributes.insert(key.to_string(), Value::Array(items));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> ResourceSchema {
        ResourceSchema {
            type_name: "test_resource",
            attributes: vec![
                Attribute::required("name", AttributeType::String, "Name."),
                Attribute::optional("kind", AttributeType::String, "Kind.").with_default("ovf"),
                Attribute::required("urls", AttributeType::StringSet, "URLs."),
            ],
        }
    }

    #[test]
    fn record_applies_defaults() {
        let d = schema().record(json!({"name": "a", "urls": ["x"]})).unwrap();
        assert_eq!(d.get_str("kind"), "ovf");
        assert_eq!(d.get_str("description"), "");
    }

    #[test]
    fn record_keeps_explicit_values() {
        let d = schema().record(json!({"name": "a", "kind": "iso", "urls": []})).unwrap();
        assert_eq!(d.get_str("kind"), "iso");
    }

    #[test]
    fn record_requires_attributes() {
        let err = schema().record(json!({"name": "a"})).unwrap_err();
        assert!(err.message.contains("\"urls\" is required"));
    }

    #[test]
    fn record_checks_types() {
        let err = schema().record(json!({"name": 5, "urls": []})).unwrap_err();
        assert!(err.message.contains("\"name\""));
        assert!(schema().record(json!({"name": "a", "urls": "x"})).is_err());
    }

    #[test]
    fn sets_collapse_duplicates() {
        let d = ResourceData::from_value(json!({"urls": ["b", "a", "b"]})).unwrap();
        let set: Vec<String> = d.get_set("urls").into_iter().collect();
        assert_eq!(set, vec!["a", "b"]);
    }

    #[test]
    fn id_round_trips_through_value() {
        let mut d = ResourceData::from_value(json!({"id": "lib-1", "name": "t"})).unwrap();
        assert_eq!(d.id(), "lib-1");
        d.set_set("storage_backing", ["datastore-11"]);
        let v = d.to_value();
        assert_eq!(v["id"], "lib-1");
        assert_eq!(v["storage_backing"], json!(["datastore-11"]));
    }

    #[test]
    fn rejects_non_object_config() {
        assert!(ResourceData::from_value(json!([1, 2])).is_err());
    }
}
