//! Process-wide event loop used to resolve pending query results.
//!
//! Every blocking resolve in the process goes through the same current-thread
//! runtime, so sockets opened while resolving one result stay usable when the
//! next result is resolved.

use crate::error::{GremlabError, Result};
use once_cell::sync::OnceCell;
use std::future::Future;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::debug;

static SHARED: OnceCell<Runtime> = OnceCell::new();

fn shared_runtime() -> Result<&'static Runtime> {
    SHARED.get_or_try_init(|| {
        debug!("Starting shared resolve runtime");
        Builder::new_current_thread()
            .enable_all()
            .thread_name("gremlab-resolve")
            .build()
            .map_err(GremlabError::Io)
    })
}

/// Drives `future` to completion on the calling thread.
///
/// Fails with [`GremlabError::NestedRuntime`] when called from inside another
/// tokio runtime, where blocking would stall that runtime's worker.
pub fn block_on_shared<F: Future>(future: F) -> Result<F::Output> {
    if Handle::try_current().is_ok() {
        return Err(GremlabError::NestedRuntime);
    }
    Ok(shared_runtime()?.block_on(future))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_on_shared_resolves() {
        let value = block_on_shared(async { 40 + 2 }).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_io_resources_survive_across_calls() {
        let listener = block_on_shared(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap()
            .unwrap();
        let addr = listener.local_addr().unwrap();

        let (accepted, connected) = block_on_shared(async move {
            tokio::join!(listener.accept(), tokio::net::TcpStream::connect(addr))
        })
        .unwrap();
        assert!(accepted.is_ok());
        assert!(connected.is_ok());
    }

    #[tokio::test]
    async fn test_nested_runtime_is_rejected() {
        let err = block_on_shared(async {}).unwrap_err();
        assert!(matches!(err, GremlabError::NestedRuntime));
    }
}
