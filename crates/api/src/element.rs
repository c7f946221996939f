use crate::value::GraphValue;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

/// Capability of graph elements to convert themselves into a plain structure
/// of maps, lists and primitives.
pub trait Serializable {
    fn to_plain(&self) -> Value;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: Box<GraphValue>,
    pub label: String,
    pub properties: IndexMap<String, Vec<VertexProperty>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: Box<GraphValue>,
    pub label: String,
    pub out_v: Box<GraphValue>,
    pub out_v_label: String,
    pub in_v: Box<GraphValue>,
    pub in_v_label: String,
    pub properties: IndexMap<String, GraphValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexProperty {
    pub id: Box<GraphValue>,
    pub label: String,
    pub value: Box<GraphValue>,
    pub properties: IndexMap<String, GraphValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Box<GraphValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub labels: Vec<Vec<String>>,
    pub objects: Vec<GraphValue>,
}

impl Vertex {
    pub fn new(id: impl Into<GraphValue>, label: impl Into<String>) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
            properties: IndexMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<GraphValue>) -> Self {
        let key = key.into();
        let property = VertexProperty {
            id: Box::new(GraphValue::Null),
            label: key.clone(),
            value: Box::new(value.into()),
            properties: IndexMap::new(),
        };
        self.properties.entry(key).or_default().push(property);
        self
    }
}

fn plain_properties(properties: &IndexMap<String, GraphValue>) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<Map<String, Value>>(),
    )
}

impl Serializable for Vertex {
    /// Properties are flattened to `key -> [values]`, the same layout as `valueMap()`.
    fn to_plain(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|(key, values)| {
                let values = values.iter().map(|vp| vp.value.to_json()).collect();
                (key.clone(), Value::Array(values))
            })
            .collect();
        json!({
            "id": self.id.to_json(),
            "label": self.label,
            "properties": properties,
        })
    }
}

impl Serializable for Edge {
    fn to_plain(&self) -> Value {
        json!({
            "id": self.id.to_json(),
            "label": self.label,
            "outV": self.out_v.to_json(),
            "outVLabel": self.out_v_label,
            "inV": self.in_v.to_json(),
            "inVLabel": self.in_v_label,
            "properties": plain_properties(&self.properties),
        })
    }
}

impl Serializable for VertexProperty {
    fn to_plain(&self) -> Value {
        let mut plain = json!({
            "id": self.id.to_json(),
            "label": self.label,
            "value": self.value.to_json(),
        });
        if !self.properties.is_empty() {
            plain["properties"] = plain_properties(&self.properties);
        }
        plain
    }
}

impl Serializable for Property {
    fn to_plain(&self) -> Value {
        json!({ "key": self.key, "value": self.value.to_json() })
    }
}

impl Serializable for Path {
    fn to_plain(&self) -> Value {
        json!({
            "labels": self.labels,
            "objects": self.objects.iter().map(GraphValue::to_json).collect::<Vec<_>>(),
        })
    }
}
