pub mod driver;
pub mod protocol;

pub use driver::DriverRemoteConnection;

use crate::error::{GremlabError, Result};
use crate::traversal::GraphTraversalSource;
use std::sync::Arc;
use url::Url;

pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_TRAVERSAL_SOURCE: &str = "g";

/// Where a Gremlin Server lives. Only used to build the connection URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub location: String,
    pub port: u16,
    pub traversal_source: String,
}

impl ConnectionDescriptor {
    pub fn new(location: impl Into<String>, port: u16) -> Self {
        Self {
            location: location.into(),
            port,
            traversal_source: DEFAULT_TRAVERSAL_SOURCE.to_string(),
        }
    }

    pub fn with_traversal_source(mut self, source: impl Into<String>) -> Self {
        self.traversal_source = source.into();
        self
    }

    /// `ws://{location}:{port}/gremlin`
    pub fn uri(&self) -> Result<Url> {
        if self.location.trim().is_empty() {
            return Err(GremlabError::InvalidArgument("location must not be empty".into()));
        }
        if self.port == 0 {
            return Err(GremlabError::InvalidArgument("port must be positive".into()));
        }
        let raw = format!("ws://{}:{}/gremlin", self.location, self.port);
        Url::parse(&raw).map_err(|e| GremlabError::InvalidArgument(format!("{raw}: {e}")))
    }

    /// Builds a traversal source backed by a lazily connecting driver.
    pub fn open(&self) -> Result<GraphTraversalSource> {
        let connection = DriverRemoteConnection::new(self.uri()?, self.traversal_source.clone());
        Ok(GraphTraversalSource::with_remote(Arc::new(connection)))
    }
}

/// Traversal handle `g` for the Gremlin Server at `location:port`.
///
/// Nothing is sent over the network here: the socket opens on the first
/// query and stays owned by the returned handle.
pub fn get_traversal(location: &str, port: u16) -> Result<GraphTraversalSource> {
    ConnectionDescriptor::new(location, port).open()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_format() {
        let uri = ConnectionDescriptor::new("localhost", 8182).uri().unwrap();
        assert_eq!(uri.as_str(), "ws://localhost:8182/gremlin");
    }

    #[test]
    fn test_default_port_in_uri() {
        // The url crate hides the scheme's default port, the socket still dials 80
        let uri = ConnectionDescriptor::new("graph.example", DEFAULT_PORT).uri().unwrap();
        assert_eq!(uri.port_or_known_default(), Some(80));
        assert_eq!(uri.path(), "/gremlin");
    }

    #[test]
    fn test_invalid_locations_are_rejected() {
        assert!(matches!(
            ConnectionDescriptor::new("", 8182).uri(),
            Err(GremlabError::InvalidArgument(_))
        ));
        assert!(matches!(
            ConnectionDescriptor::new("localhost", 0).uri(),
            Err(GremlabError::InvalidArgument(_))
        ));
        assert!(matches!(
            ConnectionDescriptor::new("bad host", 8182).uri(),
            Err(GremlabError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_get_traversal_is_lazy() {
        // Nothing listens here; building the handle must still succeed
        let g = get_traversal("127.0.0.1", 9).unwrap();
        assert_eq!(g.traversal_source(), "g");
    }
}
