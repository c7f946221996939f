use gremlab_core::{
    ConnectionDescriptor, DisplayContext, GraphTraversalSource, GremlabConfig, Result,
};
use std::path::Path;

pub use gremlab_core::connection::DEFAULT_PORT;

/// Loads the config file at `path`, or `~/.gremlab/config.toml` when none is given.
pub fn load_config(path: Option<&Path>) -> Result<GremlabConfig> {
    match path {
        Some(path) => GremlabConfig::load(path),
        None => GremlabConfig::load_default(),
    }
}

/// Opens a traversal handle for the configured server and claims the
/// configured chart directory as the process-wide display surface.
///
/// The traversal source name comes from the config; `"g"` unless overridden.
pub fn open_traversal(config: &GremlabConfig) -> Result<GraphTraversalSource> {
    config.validate()?;
    let surface = DisplayContext::init(&config.display)?;
    tracing::debug!("Display surface at {}", surface.output_dir().display());

    let conn = &config.connection;
    ConnectionDescriptor::new(conn.host.clone(), conn.port)
        .with_traversal_source(conn.traversal_source.clone())
        .open()
}

/// `get_traversal(location)` on the default port.
pub fn get_traversal_default(location: &str) -> Result<GraphTraversalSource> {
    gremlab_core::get_traversal(location, DEFAULT_PORT)
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(gremlab_core::logging::init_logging(component, to_stderr))
}
