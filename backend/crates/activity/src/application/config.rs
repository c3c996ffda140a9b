//! Application Configuration

use std::time::Duration;

/// Activity application configuration
#[derive(Debug, Clone)]
pub struct ActivityConfig {
    /// Events an individual may create within `creation_window`
    pub monthly_event_limit: usize,
    /// Trailing window the creation limit is counted over
    pub creation_window: Duration,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            monthly_event_limit: 3,
            creation_window: Duration::from_secs(30 * 24 * 3600),
        }
    }
}

impl ActivityConfig {
    pub fn development() -> Self {
        Self::default()
    }

    pub(crate) fn creation_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.creation_window.as_secs() as i64)
    }
}
