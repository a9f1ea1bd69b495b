//! Push message types

use serde::Deserialize;
use serde::Serialize;

use crate::error::ChannelError;

/// A push message as sent by the server.
///
/// ```json
/// { "type": "error", "body": "Disk almost full" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Informational message.
    Text {
        /// Message text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    /// Actionable error.
    Error {
        /// Message text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
}

impl Message {
    /// Creates a text message.
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text {
            body: Some(body.into()),
        }
    }

    /// Creates an error message.
    pub fn error(body: impl Into<String>) -> Self {
        Self::Error {
            body: Some(body.into()),
        }
    }

    /// Decodes a JSON frame.
    pub fn parse(frame: &str) -> Result<Self, ChannelError> {
        serde_json::from_str(frame).map_err(|e| ChannelError::Decode(e.to_string()))
    }

    /// Converts the message into a notice, or `None` if it has no body.
    pub fn to_notice(&self) -> Option<Notice> {
        match self {
            Self::Text { body: Some(body) } if !body.is_empty() => Some(Notice::info(body.clone())),
            Self::Error { body: Some(body) } if !body.is_empty() => {
                Some(Notice::error(body.clone()))
            }
            Self::Text { .. } | Self::Error { .. } => None,
        }
    }
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational.
    Info,
    /// Requires attention.
    Error,
}

/// Something shown to the user in a blocking modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Text to show.
    pub body: String,
}

impl Notice {
    /// Creates an informational notice.
    pub fn info(body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            body: body.into(),
        }
    }

    /// Creates an error notice.
    pub fn error(body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_messages() {
        assert_eq!(
            Message::parse(r#"{"type":"error","body":"boom"}"#).unwrap(),
            Message::error("boom")
        );
        assert_eq!(
            Message::parse(r#"{"type":"text"}"#).unwrap(),
            Message::Text { body: None }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert!(matches!(
            Message::parse(r#"{"type":"shout","body":"x"}"#),
            Err(ChannelError::Decode(_))
        ));
    }

    #[test]
    fn test_empty_bodies_have_no_notice() {
        assert_eq!(Message::Error { body: None }.to_notice(), None);
        assert_eq!(Message::error("").to_notice(), None);
        assert_eq!(Message::text("").to_notice(), None);
        assert_eq!(Message::error("x").to_notice(), Some(Notice::error("x")));
        assert_eq!(Message::text("hi").to_notice(), Some(Notice::info("hi")));
    }
}
