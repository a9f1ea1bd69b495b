//! Notification channel.
//!
//! A long-lived push connection that reconnects forever and presents
//! messages to the user strictly one at a time: the next message is not
//! dispatched until the current modal has been dismissed.

mod config;
mod message;
mod presenter;
mod source;

pub use config::*;
pub use message::*;
pub use presenter::*;
pub use source::*;

use futures::StreamExt;
use log::error;
use log::info;
use log::warn;

use crate::error::ChannelError;

/// Runs the reconnect loop and dispatches messages to a [`Presenter`].
///
/// # Example
///
/// ```ignore
/// let (presenter, mut modals) = ModalPresenter::channel();
/// let channel = NotificationChannel::new(
///     ChannelConfig::new("ws://localhost:8080"),
///     WebSocketSource::new(),
///     presenter,
/// );
///
/// tokio::spawn(async move { channel.run().await });
///
/// while let Some(presentation) = modals.next().await {
///     // render, wait for the user, then dismiss
/// }
/// ```
pub struct NotificationChannel<M, P> {
    config: ChannelConfig,
    source: M,
    presenter: P,
}

impl<M: MessageSource, P: Presenter> NotificationChannel<M, P> {
    /// Creates a channel.
    pub fn new(config: ChannelConfig, source: M, presenter: P) -> Self {
        Self {
            config,
            source,
            presenter,
        }
    }

    /// Returns the channel configuration.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Connects and reconnects until the server rejects the connection for
    /// good.
    ///
    /// Closes and transient errors are logged and followed by a reconnect
    /// after [`ChannelConfig::reconnect_delay`]. A permanent rejection is
    /// shown as a banner and returned.
    ///
    /// The connection is not read while a modal is open, so pings from the
    /// server go unanswered until it is dismissed. A server that times the
    /// client out meanwhile just causes a reconnect.
    pub async fn run(&self) -> ChannelError {
        loop {
            match self.source.connect(self.config.url()).await {
                Ok(stream) => {
                    info!("[notification-channel] Connected.");
                    self.drain(stream).await;
                    info!("[notification-channel] Connection closed.");
                }
                Err(err) if err.is_permanent() => {
                    error!("[notification-channel] Giving up: {err}");
                    self.presenter
                        .banner(&format!("Notifications unavailable: {err}"));
                    return err;
                }
                Err(err) => {
                    warn!("[notification-channel] Connect failed: {err}");
                }
            }
            tokio::time::sleep(self.config.reconnect_delay()).await;
        }
    }

    /// Dispatches one message, returning once it has been acknowledged.
    pub async fn dispatch(&self, message: Message) {
        match message.to_notice() {
            Some(notice) => self.presenter.present(notice).await,
            None => info!("[notification-channel] Ignoring {message:?} without a body."),
        }
    }

    async fn drain(&self, mut stream: MessageStream) {
        while let Some(item) = stream.next().await {
            match item {
                Ok(message) => self.dispatch(message).await,
                Err(ChannelError::Decode(reason)) => {
                    warn!("[notification-channel] Skipping undecodable frame: {reason}");
                }
                Err(err) => {
                    warn!("[notification-channel] {err}");
                    break;
                }
            }
        }
    }
}
