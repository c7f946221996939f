use crate::error::{GremlabError, Result};
use gremlab_api::{ElementKind, GraphValue};
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Rows and named columns built from a query result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<GraphValue>>,
}

enum RowKind {
    Record,
    Sequence,
    Scalar,
}

fn row_kind(value: &GraphValue) -> RowKind {
    match value.element_kind() {
        ElementKind::Convertible(_) => RowKind::Record,
        ElementKind::Plain(GraphValue::Map(_)) => RowKind::Record,
        ElementKind::Plain(GraphValue::List(_) | GraphValue::Set(_)) => RowKind::Sequence,
        ElementKind::Plain(_) => RowKind::Scalar,
    }
}

impl Table {
    /// Maps a resolved result onto columns:
    /// a map becomes one column per key, a list becomes one row per item.
    pub fn from_value(value: &GraphValue) -> Result<Self> {
        match value {
            GraphValue::Null => Ok(Self::default()),
            GraphValue::Map(entries) => Self::from_columns(entries),
            GraphValue::List(items) | GraphValue::Set(items) => Self::from_items(items),
            other => Err(GremlabError::shape(
                "a map or a list to build a table",
                other.kind_name(),
            )),
        }
    }

    fn from_columns(entries: &[(GraphValue, GraphValue)]) -> Result<Self> {
        let columns: Vec<String> = entries.iter().map(|(k, _)| k.label()).collect();

        let mut height: Option<usize> = None;
        for (key, value) in entries {
            if let Some(items) = value.as_sequence() {
                match height {
                    None => height = Some(items.len()),
                    Some(h) if h != items.len() => {
                        return Err(GremlabError::Shape(format!(
                            "column '{}' has {} values, expected {}",
                            key.label(),
                            items.len(),
                            h
                        )));
                    }
                    Some(_) => {}
                }
            }
        }

        // Scalar columns are broadcast when other columns are lists.
        // A map of scalars alone is a single row rather than an error.
        let rows = match height {
            None => vec![entries.iter().map(|(_, v)| v.clone()).collect()],
            Some(h) => (0..h)
                .map(|i| {
                    entries
                        .iter()
                        .map(|(_, v)| match v.as_sequence() {
                            Some(items) => items[i].clone(),
                            None => v.clone(),
                        })
                        .collect()
                })
                .collect(),
        };

        if columns.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self { columns, rows })
    }

    fn from_items(items: &[GraphValue]) -> Result<Self> {
        let Some(first) = items.first() else {
            return Ok(Self::default());
        };

        match row_kind(first) {
            RowKind::Record => Self::from_records(items),
            RowKind::Sequence => Self::from_sequences(items),
            RowKind::Scalar => {
                if let Some(bad) = items.iter().find(|v| !matches!(row_kind(v), RowKind::Scalar)) {
                    return Err(GremlabError::shape("only scalar rows", bad.kind_name()));
                }
                Ok(Self {
                    columns: vec!["0".to_string()],
                    rows: items.iter().map(|v| vec![v.clone()]).collect(),
                })
            }
        }
    }

    fn from_records(items: &[GraphValue]) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        let mut records: Vec<Vec<(String, GraphValue)>> = Vec::with_capacity(items.len());

        for item in items {
            let entries: Vec<(String, GraphValue)> = match item.element_kind() {
                ElementKind::Convertible(element) => match GraphValue::from(element.to_plain()) {
                    GraphValue::Map(entries) => {
                        entries.into_iter().map(|(k, v)| (k.label(), v)).collect()
                    }
                    other => vec![("0".to_string(), other)],
                },
                ElementKind::Plain(GraphValue::Map(entries)) => {
                    entries.iter().map(|(k, v)| (k.label(), v.clone())).collect()
                }
                ElementKind::Plain(other) => {
                    return Err(GremlabError::shape("only map or element rows", other.kind_name()));
                }
            };

            for (key, _) in &entries {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
            records.push(entries);
        }

        let rows = records
            .into_iter()
            .map(|entries| {
                columns
                    .iter()
                    .map(|col| {
                        entries
                            .iter()
                            .find(|(k, _)| k == col)
                            .map(|(_, v)| v.clone())
                            .unwrap_or(GraphValue::Null)
                    })
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    fn from_sequences(items: &[GraphValue]) -> Result<Self> {
        let mut sequences = Vec::with_capacity(items.len());
        for item in items {
            match item.as_sequence() {
                Some(seq) => sequences.push(seq),
                None => return Err(GremlabError::shape("only list rows", item.kind_name())),
            }
        }

        let width = sequences.iter().map(|s| s.len()).max().unwrap_or(0);
        let columns = (0..width).map(|i| i.to_string()).collect();
        let rows = sequences
            .into_iter()
            .map(|seq| {
                let mut row = seq.to_vec();
                row.resize(width, GraphValue::Null);
                row
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<GraphValue>] {
        &self.rows
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<Vec<&GraphValue>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// psql-style text table.
    pub fn render(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().map(GraphValue::label));
        }
        let mut table = builder.build();
        table.with(Style::psql());
        table.to_string()
    }

    /// One JSON object per row.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    let record: Map<String, Value> = self
                        .columns
                        .iter()
                        .zip(row)
                        .map(|(c, v)| (c.clone(), v.to_json()))
                        .collect();
                    Value::Object(record)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gremlab_api::Vertex;
    use serde_json::json;

    fn value(raw: Value) -> GraphValue {
        GraphValue::from(raw)
    }

    #[test]
    fn test_map_of_scalars_is_one_row() {
        let table = Table::from_value(&value(json!({"a": 1, "b": 2}))).unwrap();
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.rows(), [vec![GraphValue::Int(1), GraphValue::Int(2)]]);
    }

    #[test]
    fn test_map_of_lists_is_columnar() {
        let table = Table::from_value(&value(json!({"name": ["marko", "josh"], "age": [29, 32]})))
            .unwrap();
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(
            table.column("age").unwrap(),
            vec![&GraphValue::Int(29), &GraphValue::Int(32)]
        );
    }

    #[test]
    fn test_scalar_columns_are_broadcast() {
        let table = Table::from_value(&value(json!({"name": ["a", "b"], "kind": "person"}))).unwrap();
        assert_eq!(
            table.column("kind").unwrap(),
            vec![&GraphValue::from("person"), &GraphValue::from("person")]
        );
    }

    #[test]
    fn test_unequal_columns_are_rejected() {
        let err = Table::from_value(&value(json!({"a": [1, 2], "b": [1]}))).unwrap_err();
        assert!(matches!(err, GremlabError::Shape(_)));
    }

    #[test]
    fn test_list_of_maps_unions_columns() {
        let table =
            Table::from_value(&value(json!([{"name": "marko"}, {"name": "lop", "lang": "java"}])))
                .unwrap();
        assert_eq!(table.columns(), ["name", "lang"]);
        assert_eq!(table.rows()[0][1], GraphValue::Null);
        assert_eq!(table.rows()[1][1], GraphValue::from("java"));
    }

    #[test]
    fn test_list_of_vertices_uses_plain_form() {
        let items = GraphValue::List(vec![
            GraphValue::Vertex(Vertex::new(1, "person").with_property("name", "marko")),
            GraphValue::Vertex(Vertex::new(3, "software")),
        ]);
        let table = Table::from_value(&items).unwrap();
        assert_eq!(table.columns(), ["id", "label", "properties"]);
        assert_eq!(table.column("label").unwrap()[1], &GraphValue::from("software"));
    }

    #[test]
    fn test_list_of_lists_pads_short_rows() {
        let table = Table::from_value(&value(json!([[1, 2], [3]]))).unwrap();
        assert_eq!(table.columns(), ["0", "1"]);
        assert_eq!(table.rows()[1], vec![GraphValue::Int(3), GraphValue::Null]);
    }

    #[test]
    fn test_list_of_scalars_is_single_column() {
        let table = Table::from_value(&value(json!([1, 2, 3]))).unwrap();
        assert_eq!(table.shape(), (3, 1));
        assert_eq!(table.columns(), ["0"]);
    }

    #[test]
    fn test_mixed_rows_are_rejected() {
        let err = Table::from_value(&value(json!([1, {"a": 1}]))).unwrap_err();
        assert!(matches!(err, GremlabError::Shape(_)));
    }

    #[test]
    fn test_empty_and_null_results() {
        assert!(Table::from_value(&GraphValue::Null).unwrap().is_empty());
        assert!(Table::from_value(&GraphValue::List(vec![])).unwrap().is_empty());
        assert!(Table::from_value(&GraphValue::Map(vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_bare_scalars_and_elements_are_rejected() {
        assert!(matches!(
            Table::from_value(&GraphValue::Int(3)),
            Err(GremlabError::Shape(_))
        ));
        assert!(matches!(
            Table::from_value(&GraphValue::Vertex(Vertex::new(1, "person"))),
            Err(GremlabError::Shape(_))
        ));
    }

    #[test]
    fn test_render_contains_headers_and_cells() {
        let table = Table::from_value(&value(json!({"person": 4, "software": 2}))).unwrap();
        let text = table.render();
        assert!(text.contains("person"));
        assert!(text.contains("software"));
        assert!(text.contains('4'));
    }

    #[test]
    fn test_to_json_records() {
        let table = Table::from_value(&value(json!([{"a": 1}, {"b": 2}]))).unwrap();
        assert_eq!(table.to_json(), json!([{"a": 1, "b": null}, {"a": null, "b": 2}]));
    }
}
