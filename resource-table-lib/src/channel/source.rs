//! Message sources.

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as Frame;

use super::Message;
use crate::error::ChannelError;

/// Stream of decoded messages from one connection.
///
/// Ends when the connection closes.
pub type MessageStream = BoxStream<'static, Result<Message, ChannelError>>;

/// Opens push connections.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Connects to `url` and returns the connection's message stream.
    async fn connect(&self, url: &str) -> Result<MessageStream, ChannelError>;
}

/// WebSocket message source.
///
/// Text frames are decoded as JSON [`Message`]s; other frames are ignored.
#[derive(Debug, Clone, Default)]
pub struct WebSocketSource;

impl WebSocketSource {
    /// Creates a WebSocket source.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessageSource for WebSocketSource {
    async fn connect(&self, url: &str) -> Result<MessageStream, ChannelError> {
        let (socket, _response) = connect_async(url).await?;

        let stream = socket.filter_map(|frame| async move {
            match frame {
                Ok(Frame::Text(text)) => Some(Message::parse(&text)),
                Ok(Frame::Close(_)) => Some(Err(ChannelError::Closed)),
                Ok(_) => None,
                Err(err) => Some(Err(ChannelError::from(err))),
            }
        });
        Ok(stream.boxed())
    }
}
