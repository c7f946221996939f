//! Gremlin Server WebSocket message format.

use crate::error::{GremlabError, Result};
use crate::graphson::{self, MIME_TYPE};
use gremlab_api::{Bindings, GraphValue};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

pub const SCRIPT_LANGUAGE: &str = "gremlin-groovy";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMessage {
    pub request_id: Uuid,
    pub op: String,
    pub processor: String,
    pub args: Value,
}

impl RequestMessage {
    /// An `eval` request binding the script's `g` to `traversal_source` on the server.
    pub fn eval(script: &str, bindings: Bindings, traversal_source: &str) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            op: "eval".to_string(),
            processor: String::new(),
            args: json!({
                "gremlin": script,
                "language": SCRIPT_LANGUAGE,
                "aliases": { "g": traversal_source },
                "bindings": bindings,
            }),
        }
    }

    /// Binary frame: mime length byte, mime type, JSON body.
    pub fn to_frame(&self) -> Result<Vec<u8>> {
        let body = serde_json::to_vec(self)?;
        let mut frame = Vec::with_capacity(1 + MIME_TYPE.len() + body.len());
        frame.push(MIME_TYPE.len() as u8);
        frame.extend_from_slice(MIME_TYPE.as_bytes());
        frame.extend_from_slice(&body);
        Ok(frame)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    #[serde(default)]
    pub request_id: Value,
    pub status: ResponseStatus,
    #[serde(default)]
    pub result: ResponseResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseStatus {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub attributes: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseResult {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    NoContent,
    PartialContent,
    Failure,
}

impl ResponseStatus {
    pub fn kind(&self) -> StatusKind {
        match self.code {
            200 => StatusKind::Success,
            204 => StatusKind::NoContent,
            206 => StatusKind::PartialContent,
            _ => StatusKind::Failure,
        }
    }
}

impl ResponseMessage {
    pub fn parse(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload)
            .map_err(|e| GremlabError::Protocol(format!("invalid response frame: {e}")))
    }

    /// Request id as a string, whether sent plain or as a `g:UUID` envelope.
    pub fn request_id(&self) -> Option<&str> {
        match &self.request_id {
            Value::String(s) => Some(s),
            Value::Object(obj) => obj.get("@value").and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn is_for(&self, id: &Uuid) -> bool {
        self.request_id()
            .and_then(|s| Uuid::parse_str(s).ok())
            .is_some_and(|parsed| parsed == *id)
    }

    /// Result items carried by this frame.
    pub fn items(&self) -> Result<Vec<GraphValue>> {
        Ok(match graphson::decode(&self.result.data)? {
            GraphValue::Null => Vec::new(),
            GraphValue::List(items) | GraphValue::Set(items) => items,
            single => vec![single],
        })
    }

    pub fn into_error(self) -> GremlabError {
        GremlabError::Server {
            code: self.status.code,
            message: self.status.message,
        }
    }
}
