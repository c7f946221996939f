//! Traversal handle and a small step builder that renders Gremlin-Groovy.
//!
//! Step arguments never get spliced into the script text; each one becomes a
//! request binding (`_0`, `_1`, ...) so user input cannot change the query.

use crate::graphson;
use gremlab_api::{Bindings, GraphValue, GremlinClient, PendingResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct GraphTraversalSource {
    remote: Arc<dyn GremlinClient>,
}

impl GraphTraversalSource {
    pub fn with_remote(remote: Arc<dyn GremlinClient>) -> Self {
        Self { remote }
    }

    pub fn traversal_source(&self) -> &str {
        self.remote.traversal_source()
    }

    /// `g.V(ids...)`
    pub fn v<I: Into<GraphValue>>(&self, ids: impl IntoIterator<Item = I>) -> GraphTraversal {
        self.start("V", ids)
    }

    /// `g.E(ids...)`
    pub fn e<I: Into<GraphValue>>(&self, ids: impl IntoIterator<Item = I>) -> GraphTraversal {
        self.start("E", ids)
    }

    fn start<I: Into<GraphValue>>(
        &self,
        step: &str,
        ids: impl IntoIterator<Item = I>,
    ) -> GraphTraversal {
        let mut traversal = GraphTraversal {
            remote: self.remote.clone(),
            script: "g".to_string(),
            bindings: Bindings::new(),
        };
        let ids: Vec<GraphValue> = ids.into_iter().map(Into::into).collect();
        traversal.step(step, ids);
        traversal
    }

    /// Evaluates a raw script. The returned future is the pending query result.
    pub fn submit(&self, script: &str) -> PendingResult {
        self.submit_with(script, Bindings::new())
    }

    pub fn submit_with(&self, script: &str, bindings: Bindings) -> PendingResult {
        let remote = self.remote.clone();
        let script = script.to_string();
        Box::pin(async move { remote.submit(&script, bindings).await })
    }

    pub async fn close(&self) -> gremlab_api::Result<()> {
        self.remote.close().await
    }
}

/// Modulator for `by()`.
#[derive(Debug, Clone, PartialEq)]
pub enum By {
    Key(String),
    Label,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Clone)]
pub struct GraphTraversal {
    remote: Arc<dyn GremlinClient>,
    script: String,
    bindings: Bindings,
}

impl GraphTraversal {
    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    fn bind(&mut self, value: GraphValue) -> String {
        let name = format!("_{}", self.bindings.len());
        self.bindings.insert(name.clone(), graphson::encode(&value));
        name
    }

    fn step(&mut self, name: &str, args: Vec<GraphValue>) {
        let rendered: Vec<String> = args.into_iter().map(|a| self.bind(a)).collect();
        self.script.push_str(&format!(".{}({})", name, rendered.join(", ")));
    }

    fn keyed_step(mut self, name: &str, keys: &[&str]) -> Self {
        self.step(name, keys.iter().map(|k| GraphValue::from(*k)).collect());
        self
    }

    pub fn has_label(self, label: &str) -> Self {
        self.keyed_step("hasLabel", &[label])
    }

    pub fn has(mut self, key: &str, value: impl Into<GraphValue>) -> Self {
        self.step("has", vec![GraphValue::from(key), value.into()]);
        self
    }

    pub fn out(self, labels: &[&str]) -> Self {
        self.keyed_step("out", labels)
    }

    pub fn in_(self, labels: &[&str]) -> Self {
        self.keyed_step("in", labels)
    }

    pub fn both(self, labels: &[&str]) -> Self {
        self.keyed_step("both", labels)
    }

    pub fn values(self, keys: &[&str]) -> Self {
        self.keyed_step("values", keys)
    }

    pub fn value_map(self, keys: &[&str]) -> Self {
        self.keyed_step("valueMap", keys)
    }

    pub fn label(self) -> Self {
        self.keyed_step("label", &[])
    }

    pub fn count(self) -> Self {
        self.keyed_step("count", &[])
    }

    pub fn group_count(self) -> Self {
        self.keyed_step("groupCount", &[])
    }

    pub fn dedup(self) -> Self {
        self.keyed_step("dedup", &[])
    }

    pub fn path(self) -> Self {
        self.keyed_step("path", &[])
    }

    pub fn order(self) -> Self {
        self.keyed_step("order", &[])
    }

    pub fn by(mut self, by: By) -> Self {
        match by {
            By::Key(key) => self.step("by", vec![GraphValue::String(key)]),
            By::Label => self.script.push_str(".by(T.label)"),
            By::Id => self.script.push_str(".by(T.id)"),
        }
        self
    }

    /// `by(key, asc|desc)`, for use after `order()`.
    pub fn by_order(mut self, key: &str, order: Order) -> Self {
        let name = self.bind(GraphValue::from(key));
        let order = match order {
            Order::Asc => "asc",
            Order::Desc => "desc",
        };
        self.script.push_str(&format!(".by({name}, {order})"));
        self
    }

    pub fn limit(mut self, n: i64) -> Self {
        self.step("limit", vec![GraphValue::Int(n)]);
        self
    }

    /// Every result, as a list.
    pub fn to_list(self) -> PendingResult {
        let GraphTraversal {
            remote,
            script,
            bindings,
        } = self;
        Box::pin(async move { remote.submit(&script, bindings).await })
    }

    /// The first result, or `Null` when the traversal yields nothing.
    pub fn next(self) -> PendingResult {
        let pending = self.to_list();
        Box::pin(async move { pending.await.map(GraphValue::into_first) })
    }
}
