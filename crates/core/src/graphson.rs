//! GraphSON 3.0 codec.
//!
//! Gremlin Server wraps every non-trivial value in a `{"@type": .., "@value": ..}`
//! envelope. Decoding unwraps these into [`GraphValue`]; encoding produces the
//! envelopes needed for request bindings.

use crate::error::{GremlabError, Result};
use gremlab_api::{Edge, GraphValue, Path, Property, Vertex, VertexProperty};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

pub const MIME_TYPE: &str = "application/vnd.gremlin-v3.0+json";

const TYPE_KEY: &str = "@type";
const VALUE_KEY: &str = "@value";

pub fn decode(value: &Value) -> Result<GraphValue> {
    match value {
        Value::Null => Ok(GraphValue::Null),
        Value::Bool(b) => Ok(GraphValue::Bool(*b)),
        Value::Number(n) => Ok(match n.as_i64() {
            Some(i) => GraphValue::Int(i),
            None => GraphValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Value::String(s) => Ok(GraphValue::String(s.clone())),
        Value::Array(items) => Ok(GraphValue::List(decode_all(items)?)),
        Value::Object(map) => match (map.get(TYPE_KEY), map.get(VALUE_KEY)) {
            (Some(Value::String(type_name)), Some(inner)) => decode_typed(type_name, inner),
            _ => {
                let entries = map
                    .iter()
                    .map(|(k, v)| Ok((GraphValue::String(k.clone()), decode(v)?)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(GraphValue::Map(entries))
            }
        },
    }
}

fn decode_all(items: &[Value]) -> Result<Vec<GraphValue>> {
    items.iter().map(decode).collect()
}

fn decode_typed(type_name: &str, value: &Value) -> Result<GraphValue> {
    match type_name {
        "g:List" => Ok(GraphValue::List(decode_all(expect_array(type_name, value)?)?)),
        "g:Set" => Ok(GraphValue::Set(decode_all(expect_array(type_name, value)?)?)),
        "g:Map" => decode_map(expect_array(type_name, value)?),
        "g:BulkSet" => decode_bulk_set(expect_array(type_name, value)?),
        "g:Int32" | "g:Int64" | "gx:Int16" | "gx:Byte" | "g:Date" | "g:Timestamp" => value
            .as_i64()
            .map(GraphValue::Int)
            .ok_or_else(|| malformed(type_name, value)),
        "g:Float" | "g:Double" => decode_float(type_name, value),
        "g:UUID" | "g:Class" | "g:T" | "g:Direction" | "gx:Char" => value
            .as_str()
            .map(|s| GraphValue::String(s.to_string()))
            .ok_or_else(|| malformed(type_name, value)),
        "g:Vertex" => decode_vertex(value).map(GraphValue::Vertex),
        "g:Edge" => decode_edge(value).map(GraphValue::Edge),
        "g:VertexProperty" => decode_vertex_property(value).map(GraphValue::VertexProperty),
        "g:Property" => decode_property(value).map(GraphValue::Property),
        "g:Path" => decode_path(value).map(GraphValue::Path),
        // Metrics, extended numeric types and anything newer: keep the payload
        _ => decode(value),
    }
}

fn decode_map(flat: &[Value]) -> Result<GraphValue> {
    if flat.len() % 2 != 0 {
        return Err(GremlabError::Protocol(format!(
            "g:Map expects key/value pairs, got {} items",
            flat.len()
        )));
    }
    let entries = flat
        .chunks_exact(2)
        .map(|pair| Ok((decode(&pair[0])?, decode(&pair[1])?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(GraphValue::Map(entries))
}

fn decode_bulk_set(flat: &[Value]) -> Result<GraphValue> {
    if flat.len() % 2 != 0 {
        return Err(GremlabError::Protocol(format!(
            "g:BulkSet expects value/bulk pairs, got {} items",
            flat.len()
        )));
    }
    let mut pairs = Vec::with_capacity(flat.len() / 2);
    let mut total: usize = 0;
    for pair in flat.chunks_exact(2) {
        let item = decode(&pair[0])?;
        let bulk = match decode(&pair[1])? {
            GraphValue::Int(n) => usize::try_from(n).map_err(|_| {
                GremlabError::Protocol(format!(
                    "g:BulkSet bulk must be a non-negative integer, got {n}"
                ))
            })?,
            other => {
                return Err(GremlabError::Protocol(format!(
                    "g:BulkSet bulk must be a non-negative integer, got {other}"
                )));
            }
        };
        total = total
            .checked_add(bulk)
            .ok_or_else(|| GremlabError::Protocol("g:BulkSet total bulk overflows".to_string()))?;
        pairs.push((item, bulk));
    }

    let mut items: Vec<GraphValue> = Vec::new();
    items.try_reserve(total).map_err(|e| {
        GremlabError::Protocol(format!("g:BulkSet cannot expand {total} items: {e}"))
    })?;
    for (item, bulk) in pairs {
        items.extend(std::iter::repeat_n(item, bulk));
    }
    Ok(GraphValue::List(items))
}

fn decode_float(type_name: &str, value: &Value) -> Result<GraphValue> {
    if let Some(f) = value.as_f64() {
        return Ok(GraphValue::Float(f));
    }
    match value.as_str() {
        Some("NaN") => Ok(GraphValue::Float(f64::NAN)),
        Some("Infinity") => Ok(GraphValue::Float(f64::INFINITY)),
        Some("-Infinity") => Ok(GraphValue::Float(f64::NEG_INFINITY)),
        _ => Err(malformed(type_name, value)),
    }
}

fn decode_vertex(value: &Value) -> Result<Vertex> {
    let obj = expect_object("g:Vertex", value)?;
    let mut properties: IndexMap<String, Vec<VertexProperty>> = IndexMap::new();
    if let Some(Value::Object(props)) = obj.get("properties") {
        for (key, values) in props {
            let decoded = match values {
                Value::Array(items) => items
                    .iter()
                    .map(|item| match decode(item)? {
                        GraphValue::VertexProperty(vp) => Ok(vp),
                        other => Ok(VertexProperty {
                            id: Box::new(GraphValue::Null),
                            label: key.clone(),
                            value: Box::new(other),
                            properties: IndexMap::new(),
                        }),
                    })
                    .collect::<Result<Vec<_>>>()?,
                other => return Err(malformed("g:Vertex properties", other)),
            };
            properties.insert(key.clone(), decoded);
        }
    }

    Ok(Vertex {
        id: Box::new(decode_field(obj, "id")?),
        label: string_field(obj, "label").unwrap_or_else(|| "vertex".to_string()),
        properties,
    })
}

fn decode_edge(value: &Value) -> Result<Edge> {
    let obj = expect_object("g:Edge", value)?;
    Ok(Edge {
        id: Box::new(decode_field(obj, "id")?),
        label: string_field(obj, "label").unwrap_or_else(|| "edge".to_string()),
        out_v: Box::new(decode_field(obj, "outV")?),
        out_v_label: string_field(obj, "outVLabel").unwrap_or_else(|| "vertex".to_string()),
        in_v: Box::new(decode_field(obj, "inV")?),
        in_v_label: string_field(obj, "inVLabel").unwrap_or_else(|| "vertex".to_string()),
        properties: decode_property_map(obj.get("properties"))?,
    })
}

fn decode_vertex_property(value: &Value) -> Result<VertexProperty> {
    let obj = expect_object("g:VertexProperty", value)?;
    Ok(VertexProperty {
        id: Box::new(decode_field(obj, "id")?),
        label: string_field(obj, "label").unwrap_or_default(),
        value: Box::new(decode_field(obj, "value")?),
        properties: decode_property_map(obj.get("properties"))?,
    })
}

fn decode_property(value: &Value) -> Result<Property> {
    let obj = expect_object("g:Property", value)?;
    Ok(Property {
        key: string_field(obj, "key").ok_or_else(|| malformed("g:Property", value))?,
        value: Box::new(decode_field(obj, "value")?),
    })
}

fn decode_path(value: &Value) -> Result<Path> {
    let obj = expect_object("g:Path", value)?;
    let labels = match obj.get("labels").map(decode).transpose()? {
        Some(decoded) => decoded
            .as_sequence()
            .unwrap_or_default()
            .iter()
            .map(|step| {
                step.as_sequence()
                    .unwrap_or_default()
                    .iter()
                    .map(GraphValue::label)
                    .collect()
            })
            .collect(),
        None => Vec::new(),
    };
    let objects = match obj.get("objects").map(decode).transpose()? {
        Some(GraphValue::List(items)) | Some(GraphValue::Set(items)) => items,
        Some(other) => vec![other],
        None => Vec::new(),
    };
    Ok(Path { labels, objects })
}

/// Edge and meta-properties arrive either as `g:Property` envelopes or bare values.
fn decode_property_map(value: Option<&Value>) -> Result<IndexMap<String, GraphValue>> {
    let mut out = IndexMap::new();
    if let Some(Value::Object(props)) = value {
        for (key, raw) in props {
            let decoded = match decode(raw)? {
                GraphValue::Property(p) => *p.value,
                other => other,
            };
            out.insert(key.clone(), decoded);
        }
    }
    Ok(out)
}

fn decode_field(obj: &Map<String, Value>, key: &str) -> Result<GraphValue> {
    obj.get(key).map(decode).unwrap_or(Ok(GraphValue::Null))
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn expect_array<'a>(type_name: &str, value: &'a Value) -> Result<&'a [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| malformed(type_name, value))
}

fn expect_object<'a>(type_name: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| malformed(type_name, value))
}

fn malformed(type_name: &str, value: &Value) -> GremlabError {
    GremlabError::Protocol(format!("malformed {type_name} payload: {value}"))
}

/// Encodes a value for use as a request binding.
pub fn encode(value: &GraphValue) -> Value {
    match value {
        GraphValue::Null => Value::Null,
        GraphValue::Bool(b) => Value::Bool(*b),
        GraphValue::String(s) => Value::String(s.clone()),
        GraphValue::Int(i) => typed("g:Int64", json!(i)),
        GraphValue::Float(f) => {
            let raw = if f.is_nan() {
                json!("NaN")
            } else if f.is_infinite() {
                json!(if *f > 0.0 { "Infinity" } else { "-Infinity" })
            } else {
                json!(f)
            };
            typed("g:Double", raw)
        }
        GraphValue::List(items) => typed("g:List", items.iter().map(encode).collect()),
        GraphValue::Set(items) => typed("g:Set", items.iter().map(encode).collect()),
        GraphValue::Map(entries) => typed(
            "g:Map",
            entries
                .iter()
                .flat_map(|(k, v)| [encode(k), encode(v)])
                .collect(),
        ),
        // Elements are bound by id, which is what a traversal step expects
        GraphValue::Vertex(v) => encode(&v.id),
        GraphValue::Edge(e) => encode(&e.id),
        GraphValue::VertexProperty(vp) => encode(&vp.value),
        GraphValue::Property(p) => encode(&p.value),
        GraphValue::Path(p) => typed("g:List", p.objects.iter().map(encode).collect()),
    }
}

fn typed(type_name: &str, value: Value) -> Value {
    json!({ TYPE_KEY: type_name, VALUE_KEY: value })
}
