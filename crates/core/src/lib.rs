pub mod adapter;
pub mod chart;
pub mod config;
pub mod connection;
pub mod error;
pub mod graphson;
pub mod logging;
pub mod runtime;
pub mod table;
pub mod traversal;

pub use adapter::QueryResultAdapter;
pub use chart::{Chart, ChartKind, DisplayContext, RenderedChart};
pub use config::{ConnectionConfig, DisplayConfig, GremlabConfig};
pub use connection::{ConnectionDescriptor, DriverRemoteConnection, get_traversal};
pub use error::{GremlabError, Result};
pub use table::Table;
pub use traversal::{By, GraphTraversal, GraphTraversalSource, Order};
