//! Snapshot tokens.

use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use chrono::Utc;

/// Issues strictly increasing snapshot tokens based on wall-clock millis.
#[derive(Debug, Default)]
pub(crate) struct SnapshotClock {
    last: AtomicI64,
}

impl SnapshotClock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns a token greater than every token issued before.
    pub(crate) fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_strictly_increase() {
        let clock = SnapshotClock::new();
        let tokens: Vec<i64> = (0..100).map(|_| clock.next()).collect();
        assert!(tokens.windows(2).all(|w| w[0] < w[1]));
        assert!(tokens[0] >= Utc::now().timestamp_millis() - 60_000);
    }
}
