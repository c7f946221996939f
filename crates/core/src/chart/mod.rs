//! Pie and bar charts over labeled numeric values.

mod display;
mod svg;

pub use display::{DisplayContext, RenderedChart};

use crate::error::{GremlabError, Result};
use gremlab_api::GraphValue;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Pie => "pie",
            ChartKind::Bar => "bar",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    kind: ChartKind,
    labels: Vec<String>,
    values: Vec<f64>,
}

impl Chart {
    /// One wedge per label, sized by its share of the total.
    pub fn pie(labels: Vec<String>, values: &[GraphValue]) -> Result<Self> {
        Self::build(ChartKind::Pie, labels, values)
    }

    /// One vertical bar per label, in the given order.
    pub fn bar(labels: Vec<String>, values: &[GraphValue]) -> Result<Self> {
        Self::build(ChartKind::Bar, labels, values)
    }

    fn build(kind: ChartKind, labels: Vec<String>, values: &[GraphValue]) -> Result<Self> {
        if labels.len() != values.len() {
            return Err(GremlabError::Shape(format!(
                "{} labels for {} values",
                labels.len(),
                values.len()
            )));
        }
        let values = labels
            .iter()
            .zip(values)
            .map(|(label, value)| {
                value.as_f64().ok_or_else(|| {
                    GremlabError::Shape(format!(
                        "value for '{}' is a {}, charts need numbers",
                        label,
                        value.kind_name()
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(Self {
            kind,
            labels,
            values,
        })
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Plotly-compatible figure description.
    pub fn figure(&self) -> Value {
        let trace = match self.kind {
            ChartKind::Pie => json!({
                "type": "pie",
                "labels": self.labels,
                "values": self.values,
            }),
            ChartKind::Bar => json!({
                "type": "bar",
                "x": self.labels,
                "y": self.values,
            }),
        };
        json!({ "data": [trace] })
    }

    pub fn to_svg(&self) -> String {
        match self.kind {
            ChartKind::Pie => svg::render_pie(&self.labels, &self.values),
            ChartKind::Bar => svg::render_bar(&self.labels, &self.values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numeric_values_are_accepted() {
        let chart = Chart::pie(
            labels(&["a", "b"]),
            &[GraphValue::Int(1), GraphValue::Float(2.5)],
        )
        .unwrap();
        assert_eq!(chart.values(), [1.0, 2.5]);
        assert_eq!(chart.kind(), ChartKind::Pie);
    }

    #[test]
    fn test_non_numeric_values_are_rejected() {
        let err = Chart::bar(labels(&["a"]), &[GraphValue::from("x")]).unwrap_err();
        assert!(matches!(err, GremlabError::Shape(_)));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let err = Chart::bar(labels(&["a", "b"]), &[GraphValue::Int(1)]).unwrap_err();
        assert!(matches!(err, GremlabError::Shape(_)));
    }

    #[test]
    fn test_figure_layout() {
        let bar = Chart::bar(labels(&["x"]), &[GraphValue::Int(3)]).unwrap();
        assert_eq!(
            bar.figure(),
            json!({"data": [{"type": "bar", "x": ["x"], "y": [3.0]}]})
        );

        let pie = Chart::pie(labels(&["x"]), &[GraphValue::Int(3)]).unwrap();
        assert_eq!(pie.figure()["data"][0]["type"], "pie");
        assert_eq!(pie.figure()["data"][0]["labels"], json!(["x"]));
    }
}
