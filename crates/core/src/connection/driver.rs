use super::protocol::{RequestMessage, ResponseMessage, StatusKind};
use crate::error::{self, GremlabError, Result};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use gremlab_api::{Bindings, GraphValue, GremlinClient};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use url::Url;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket connection to a Gremlin Server.
///
/// The socket is opened on the first request, so building one never touches
/// the network. Requests are serialized: one in flight at a time.
pub struct DriverRemoteConnection {
    url: Url,
    traversal_source: String,
    socket: Mutex<Option<Socket>>,
}

impl DriverRemoteConnection {
    pub fn new(url: Url, traversal_source: impl Into<String>) -> Self {
        Self {
            url,
            traversal_source: traversal_source.into(),
            socket: Mutex::new(None),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn connect(&self) -> Result<Socket> {
        info!("Connecting to Gremlin server at {}", self.url);
        let (socket, _response) = connect_async(self.url.as_str())
            .await
            .map_err(error::transport)?;
        Ok(socket)
    }

    async fn exchange(socket: &mut Socket, request: RequestMessage) -> Result<GraphValue> {
        let id = request.request_id;
        debug!(request_id = %id, "Sending eval request");
        socket
            .send(Message::binary(request.to_frame()?))
            .await
            .map_err(error::transport)?;

        let mut items = Vec::new();
        loop {
            let frame = match socket.next().await {
                Some(frame) => frame.map_err(error::transport)?,
                None => {
                    return Err(GremlabError::Connection(
                        "stream ended before the final response".into(),
                    ));
                }
            };

            let response = match frame {
                Message::Text(text) => ResponseMessage::parse(text.as_bytes())?,
                Message::Binary(data) => ResponseMessage::parse(&data)?,
                Message::Close(_) => {
                    return Err(GremlabError::Connection(
                        "server closed the connection before the final response".into(),
                    ));
                }
                _ => continue,
            };

            if !response.is_for(&id) {
                debug!(request_id = ?response.request_id(), "Ignoring frame for another request");
                continue;
            }

            match response.status.kind() {
                StatusKind::PartialContent => items.extend(response.items()?),
                StatusKind::Success => {
                    items.extend(response.items()?);
                    debug!(request_id = %id, count = items.len(), "Request complete");
                    return Ok(GraphValue::List(items));
                }
                StatusKind::NoContent => return Ok(GraphValue::List(items)),
                StatusKind::Failure => {
                    warn!(
                        request_id = %id,
                        code = response.status.code,
                        "Gremlin server rejected request: {}",
                        response.status.message
                    );
                    return Err(response.into_error());
                }
            }
        }
    }
}

#[async_trait]
impl GremlinClient for DriverRemoteConnection {
    async fn submit(&self, script: &str, bindings: Bindings) -> Result<GraphValue> {
        let mut guard = self.socket.lock().await;
        let mut socket = match guard.take() {
            Some(socket) => socket,
            None => self.connect().await?,
        };

        let request = RequestMessage::eval(script, bindings, &self.traversal_source);
        let outcome = Self::exchange(&mut socket, request).await;

        // A broken transport is dropped; the next request opens a fresh socket
        if !matches!(outcome, Err(GremlabError::Connection(_))) {
            *guard = Some(socket);
        }
        outcome
    }

    fn traversal_source(&self) -> &str {
        &self.traversal_source
    }

    async fn close(&self) -> Result<()> {
        if let Some(mut socket) = self.socket.lock().await.take() {
            info!("Closing connection to {}", self.url);
            socket.close(None).await.map_err(error::transport)?;
        }
        Ok(())
    }
}
