//! Settings Entity

use serde::Serialize;

/// Per-user delivery preferences, stored as 0/1 flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub email: i16,
    pub notifications: i16,
}

impl Settings {
    /// Overlay the flags that were sent. `None` when a flag is not 0 or 1.
    pub fn with_changes(self, email: Option<i16>, notifications: Option<i16>) -> Option<Self> {
        let flag = |value: Option<i16>, current: i16| match value {
            None => Some(current),
            Some(v @ (0 | 1)) => Some(v),
            Some(_) => None,
        };
        Some(Self {
            email: flag(email, self.email)?,
            notifications: flag(notifications, self.notifications)?,
        })
    }
}
