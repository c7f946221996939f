pub mod client;
pub mod element;
pub mod error;
pub mod value;

pub use client::{Bindings, GremlinClient, PendingResult, RawResult};
pub use element::{Edge, Path, Property, Serializable, Vertex, VertexProperty};
pub use error::{GremlabError, Result};
pub use value::{ElementKind, GraphValue};
