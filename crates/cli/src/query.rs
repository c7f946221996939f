use crate::view::{OutputFormat, present};
use gremlab_core::{GremlabConfig, QueryResultAdapter};
use tracing::info;

pub fn run(
    script: &str,
    config: &GremlabConfig,
    format: OutputFormat,
    first: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let g = gremlab_runtime::open_traversal(config)?;
    info!(
        "Submitting script to {}:{}",
        config.connection.host, config.connection.port
    );

    let start = std::time::Instant::now();
    let adapter = QueryResultAdapter::resolve_and_wrap(g.submit(script))?;
    info!("Result resolved in {:?}", start.elapsed());

    let adapter = if first {
        QueryResultAdapter::new(adapter.into_result().into_first())
    } else {
        adapter
    };

    println!("{}", present(&adapter, format)?);
    Ok(())
}
