use thiserror::Error;

#[derive(Debug, Error)]
pub enum GremlabError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Gremlin server error {code}: {message}")]
    Server { code: u16, message: String },
    #[error("Resolution failed: {0}")]
    Resolution(String),
    #[error("Unsupported result shape: {0}")]
    Shape(String),
    #[error("Cannot block on a query result from inside an async runtime")]
    NestedRuntime,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GremlabError {
    pub fn shape(expected: &str, found: &str) -> Self {
        GremlabError::Shape(format!("expected {expected}, found {found}"))
    }
}

pub type Result<T> = std::result::Result<T, GremlabError>;
