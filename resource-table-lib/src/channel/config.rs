//! Channel configuration

use std::time::Duration;

/// Lower bound applied to the reconnect delay.
pub const MIN_RECONNECT_DELAY: Duration = Duration::from_millis(100);

/// Configuration for a [`NotificationChannel`](super::NotificationChannel).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use resource_table_lib::channel::ChannelConfig;
///
/// let config = ChannelConfig::new("ws://localhost:8080")
///     .with_reconnect_delay(Duration::from_secs(5));
/// assert_eq!(config.reconnect_delay(), Duration::from_secs(5));
///
/// // Too small a delay is clamped.
/// let config = config.with_reconnect_delay(Duration::ZERO);
/// assert_eq!(config.reconnect_delay(), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    url: String,
    reconnect_delay: Duration,
}

impl ChannelConfig {
    /// Creates a config with the default one second reconnect delay.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_delay: Duration::from_secs(1),
        }
    }

    /// Sets the delay between reconnect attempts.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay.max(MIN_RECONNECT_DELAY);
        self
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the delay between reconnect attempts.
    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }
}
