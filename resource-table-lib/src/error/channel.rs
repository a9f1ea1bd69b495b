//! Notification channel error types

/// Errors from the notification channel transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// Could not establish the connection.
    #[error("connect failed: {0}")]
    Connect(String),

    /// The server refused the connection outright.
    #[error("connection rejected with status {status}")]
    Rejected {
        /// HTTP status returned during the handshake.
        status: u16,
    },

    /// A frame could not be read or decoded.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A frame was not a valid message.
    #[error("undecodable message: {0}")]
    Decode(String),

    /// The connection was closed.
    #[error("connection closed")]
    Closed,
}

impl ChannelError {
    /// Returns `true` if reconnecting cannot succeed.
    ///
    /// Client errors other than timeouts and rate limiting are permanent.
    pub fn is_permanent(&self) -> bool {
        match self {
            Self::Rejected { status } => {
                (400..500).contains(status) && !matches!(status, 408 | 429)
            }
            _ => false,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ChannelError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;

        match err {
            WsError::Http(response) => Self::Rejected {
                status: response.status().as_u16(),
            },
            WsError::ConnectionClosed | WsError::AlreadyClosed => Self::Closed,
            WsError::Io(e) => Self::Connect(e.to_string()),
            other => Self::Protocol(other.to_string()),
        }
    }
}
