use crate::chart::{Chart, DisplayContext, RenderedChart};
use crate::config::DisplayConfig;
use crate::error::{GremlabError, Result};
use crate::runtime::block_on_shared;
use crate::table::Table;
use gremlab_api::{ElementKind, GraphValue, PendingResult, RawResult};
use serde_json::Value;
use tracing::debug;

/// A resolved query result with presentation helpers.
///
/// The wrapped value is never pending: pending results are resolved by
/// [`QueryResultAdapter::resolve_and_wrap`] before the adapter exists.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResultAdapter {
    result: GraphValue,
}

impl QueryResultAdapter {
    pub fn new(result: GraphValue) -> Self {
        Self { result }
    }

    /// Blocks the calling thread on the shared runtime until `pending` finishes.
    /// Errors from the computation are returned as they are.
    pub fn resolve_and_wrap(pending: PendingResult) -> Result<Self> {
        debug!("Resolving pending query result");
        let result = block_on_shared(pending)??;
        Ok(Self::new(result))
    }

    pub fn from_raw(raw: RawResult) -> Result<Self> {
        match raw {
            RawResult::Resolved(value) => Ok(Self::new(value)),
            RawResult::Pending(pending) => Self::resolve_and_wrap(pending),
        }
    }

    pub fn result(&self) -> &GraphValue {
        &self.result
    }

    pub fn into_result(self) -> GraphValue {
        self.result
    }

    /// Parallel label and value sequences in the map's enumeration order.
    pub fn labeled_values(&self) -> Result<(Vec<String>, Vec<GraphValue>)> {
        let entries = self
            .result
            .as_map()
            .ok_or_else(|| GremlabError::shape("a map-shaped result", self.result.kind_name()))?;
        Ok(entries.iter().map(|(k, v)| (k.label(), v.clone())).unzip())
    }

    pub fn to_table(&self) -> Result<Table> {
        Table::from_value(&self.result)
    }

    pub fn pie_chart(&self) -> Result<Chart> {
        let (labels, values) = self.labeled_values()?;
        Chart::pie(labels, &values)
    }

    pub fn bar_chart(&self) -> Result<Chart> {
        let (labels, values) = self.labeled_values()?;
        Chart::bar(labels, &values)
    }

    /// Renders a pie chart onto the process-wide display context.
    pub fn plot_pie(&self) -> Result<RenderedChart> {
        let chart = self.pie_chart()?;
        DisplayContext::init(&DisplayConfig::default())?.display(&chart)
    }

    /// Renders a bar chart onto the process-wide display context.
    pub fn plot_bar(&self) -> Result<RenderedChart> {
        let chart = self.bar_chart()?;
        DisplayContext::init(&DisplayConfig::default())?.display(&chart)
    }

    pub fn plot_pie_in(&self, ctx: &DisplayContext) -> Result<RenderedChart> {
        ctx.display(&self.pie_chart()?)
    }

    pub fn plot_bar_in(&self, ctx: &DisplayContext) -> Result<RenderedChart> {
        ctx.display(&self.bar_chart()?)
    }

    /// Plain JSON form of the result. Lists and sets are serialized item by
    /// item; any other value is serialized on its own.
    pub fn serialize(&self) -> Value {
        match self.result.as_sequence() {
            Some(items) => Value::Array(items.iter().map(serialize_element).collect()),
            None => serialize_element(&self.result),
        }
    }
}

fn serialize_element(value: &GraphValue) -> Value {
    match value.element_kind() {
        ElementKind::Convertible(element) => element.to_plain(),
        ElementKind::Plain(plain) => plain.to_json(),
    }
}

impl From<GraphValue> for QueryResultAdapter {
    fn from(result: GraphValue) -> Self {
        Self::new(result)
    }
}
