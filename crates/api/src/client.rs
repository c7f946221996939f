use crate::error::Result;
use crate::value::GraphValue;
use async_trait::async_trait;
use futures::future::BoxFuture;

/// Bindings sent alongside a script, keyed by the variable name used in it.
pub type Bindings = serde_json::Map<String, serde_json::Value>;

/// A query result that has not been awaited yet.
pub type PendingResult = BoxFuture<'static, Result<GraphValue>>;

/// The value handed over by a query execution.
pub enum RawResult {
    Resolved(GraphValue),
    Pending(PendingResult),
}

impl From<GraphValue> for RawResult {
    fn from(value: GraphValue) -> Self {
        RawResult::Resolved(value)
    }
}

impl From<PendingResult> for RawResult {
    fn from(pending: PendingResult) -> Self {
        RawResult::Pending(pending)
    }
}

impl std::fmt::Debug for RawResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawResult::Resolved(value) => f.debug_tuple("Resolved").field(value).finish(),
            RawResult::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Transport able to evaluate Gremlin scripts against a remote traversal source.
#[async_trait]
pub trait GremlinClient: Send + Sync {
    /// Evaluates `script` and returns every result item as a list.
    async fn submit(&self, script: &str, bindings: Bindings) -> Result<GraphValue>;

    /// Name of the remote traversal source the script's `g` is bound to.
    fn traversal_source(&self) -> &str;

    async fn close(&self) -> Result<()>;
}
