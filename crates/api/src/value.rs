use crate::element::{Edge, Path, Property, Serializable, Vertex, VertexProperty};
use serde::{Serialize, Serializer};
use std::fmt;

/// A resolved value produced by a Gremlin query.
///
/// Maps keep the server's enumeration order and may use any value as a key
/// (group counts keyed by vertices are common), so they are stored as an
/// ordered list of pairs rather than a hash map.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GraphValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<GraphValue>),
    Set(Vec<GraphValue>),
    Map(Vec<(GraphValue, GraphValue)>),
    Vertex(Vertex),
    Edge(Edge),
    VertexProperty(VertexProperty),
    Property(Property),
    Path(Path),
}

/// How a single value takes part in serialization.
pub enum ElementKind<'a> {
    /// The value knows how to turn itself into a plain structure.
    Convertible(&'a dyn Serializable),
    /// The value is already plain and is passed through.
    Plain(&'a GraphValue),
}

impl GraphValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            GraphValue::Null => "null",
            GraphValue::Bool(_) => "bool",
            GraphValue::Int(_) => "int",
            GraphValue::Float(_) => "float",
            GraphValue::String(_) => "string",
            GraphValue::List(_) => "list",
            GraphValue::Set(_) => "set",
            GraphValue::Map(_) => "map",
            GraphValue::Vertex(_) => "vertex",
            GraphValue::Edge(_) => "edge",
            GraphValue::VertexProperty(_) => "vertex property",
            GraphValue::Property(_) => "property",
            GraphValue::Path(_) => "path",
        }
    }

    pub fn element_kind(&self) -> ElementKind<'_> {
        match self {
            GraphValue::Vertex(v) => ElementKind::Convertible(v),
            GraphValue::Edge(e) => ElementKind::Convertible(e),
            GraphValue::VertexProperty(vp) => ElementKind::Convertible(vp),
            GraphValue::Property(p) => ElementKind::Convertible(p),
            GraphValue::Path(p) => ElementKind::Convertible(p),
            other => ElementKind::Plain(other),
        }
    }

    pub fn as_map(&self) -> Option<&[(GraphValue, GraphValue)]> {
        match self {
            GraphValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Items of a list or set.
    pub fn as_sequence(&self) -> Option<&[GraphValue]> {
        match self {
            GraphValue::List(items) | GraphValue::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric view used by charts. Booleans and strings are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GraphValue::Int(i) => Some(*i as f64),
            GraphValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Looks up a map entry by its string key.
    pub fn get(&self, key: &str) -> Option<&GraphValue> {
        self.as_map()?
            .iter()
            .find(|(k, _)| matches!(k, GraphValue::String(s) if s == key))
            .map(|(_, v)| v)
    }

    /// First item of a list or set, `Null` when empty; other values are returned as-is.
    pub fn into_first(self) -> GraphValue {
        match self {
            GraphValue::List(items) | GraphValue::Set(items) => {
                items.into_iter().next().unwrap_or(GraphValue::Null)
            }
            other => other,
        }
    }

    /// Text used when a value becomes a label, a column name or a table cell.
    pub fn label(&self) -> String {
        match self {
            GraphValue::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Converts the value into plain JSON.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self.element_kind() {
            ElementKind::Convertible(element) => element.to_plain(),
            ElementKind::Plain(value) => match value {
                GraphValue::Null => Value::Null,
                GraphValue::Bool(b) => Value::Bool(*b),
                GraphValue::Int(i) => Value::from(*i),
                GraphValue::Float(f) => serde_json::Number::from_f64(*f)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                GraphValue::String(s) => Value::String(s.clone()),
                GraphValue::List(items) | GraphValue::Set(items) => {
                    Value::Array(items.iter().map(GraphValue::to_json).collect())
                }
                GraphValue::Map(entries) => Value::Object(
                    entries
                        .iter()
                        .map(|(k, v)| (k.label(), v.to_json()))
                        .collect(),
                ),
                _ => Value::Null,
            },
        }
    }
}

impl fmt::Display for GraphValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphValue::Null => write!(f, "null"),
            GraphValue::Bool(b) => write!(f, "{b}"),
            GraphValue::Int(i) => write!(f, "{i}"),
            GraphValue::Float(x) => write!(f, "{x}"),
            GraphValue::String(s) => write!(f, "{s}"),
            GraphValue::Vertex(v) => write!(f, "v[{}]", v.id.label()),
            GraphValue::Edge(e) => write!(
                f,
                "e[{}][{}-{}->{}]",
                e.id.label(),
                e.out_v.label(),
                e.label,
                e.in_v.label()
            ),
            GraphValue::VertexProperty(vp) => write!(f, "vp[{}->{}]", vp.label, vp.value.label()),
            GraphValue::Property(p) => write!(f, "p[{}->{}]", p.key, p.value.label()),
            GraphValue::List(_) | GraphValue::Set(_) | GraphValue::Map(_) | GraphValue::Path(_) => {
                write!(f, "{}", self.to_json())
            }
        }
    }
}

impl Serialize for GraphValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<serde_json::Value> for GraphValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => GraphValue::Null,
            Value::Bool(b) => GraphValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => GraphValue::Int(i),
                None => GraphValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => GraphValue::String(s),
            Value::Array(items) => GraphValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => GraphValue::Map(
                map.into_iter()
                    .map(|(k, v)| (GraphValue::String(k), v.into()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for GraphValue {
    fn from(value: &str) -> Self {
        GraphValue::String(value.to_string())
    }
}

impl From<String> for GraphValue {
    fn from(value: String) -> Self {
        GraphValue::String(value)
    }
}

impl From<i64> for GraphValue {
    fn from(value: i64) -> Self {
        GraphValue::Int(value)
    }
}

impl From<i32> for GraphValue {
    fn from(value: i32) -> Self {
        GraphValue::Int(value as i64)
    }
}

impl From<f64> for GraphValue {
    fn from(value: f64) -> Self {
        GraphValue::Float(value)
    }
}

impl From<bool> for GraphValue {
    fn from(value: bool) -> Self {
        GraphValue::Bool(value)
    }
}

impl<K: Into<GraphValue>, V: Into<GraphValue>> FromIterator<(K, V)> for GraphValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        GraphValue::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_from_iterator_keeps_order() {
        let value: GraphValue = [("b", 2), ("a", 1)].into_iter().collect();
        let keys: Vec<String> = value
            .as_map()
            .unwrap()
            .iter()
            .map(|(k, _)| k.label())
            .collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_to_json_stringifies_non_string_keys() {
        let value = GraphValue::Map(vec![(GraphValue::Int(1), GraphValue::from("one"))]);
        assert_eq!(value.to_json(), json!({"1": "one"}));
    }

    #[test]
    fn test_json_conversion_is_lossless_for_plain_values() {
        let original = json!({"name": "marko", "ages": [29, 30.5], "ok": true, "none": null});
        let value = GraphValue::from(original.clone());
        assert_eq!(value.to_json(), original);
    }

    #[test]
    fn test_as_f64_rejects_non_numbers() {
        assert_eq!(GraphValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(GraphValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(GraphValue::Bool(true).as_f64(), None);
        assert_eq!(GraphValue::from("3").as_f64(), None);
    }

    #[test]
    fn test_into_first() {
        let list = GraphValue::List(vec![GraphValue::Int(7), GraphValue::Int(8)]);
        assert_eq!(list.into_first(), GraphValue::Int(7));
        assert_eq!(GraphValue::List(vec![]).into_first(), GraphValue::Null);
        assert_eq!(GraphValue::Int(1).into_first(), GraphValue::Int(1));
    }

    #[test]
    fn test_get_by_string_key() {
        let value: GraphValue = [("a", 1)].into_iter().collect();
        assert_eq!(value.get("a"), Some(&GraphValue::Int(1)));
        assert_eq!(value.get("b"), None);
        assert_eq!(GraphValue::Int(1).get("a"), None);
    }
}
