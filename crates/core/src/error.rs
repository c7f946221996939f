pub use gremlab_api::error::{GremlabError, Result};

use tokio_tungstenite::tungstenite;

/// Maps a WebSocket failure onto the connection error surfaced to callers.
pub(crate) fn transport(err: tungstenite::Error) -> GremlabError {
    match err {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            GremlabError::Connection("connection closed by server".to_string())
        }
        tungstenite::Error::Io(e) => GremlabError::Connection(e.to_string()),
        other => GremlabError::Connection(other.to_string()),
    }
}

pub(crate) fn config_parse(err: toml::de::Error) -> GremlabError {
    GremlabError::Config(format!("failed to parse config TOML: {err}"))
}

pub(crate) fn config_serialize(err: toml::ser::Error) -> GremlabError {
    GremlabError::Config(format!("failed to serialize config TOML: {err}"))
}
