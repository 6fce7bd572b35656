use chrono::{DateTime, Duration, Utc};

/// Proof that the access gate was passed. Handed to the presentation layer
/// instead of a global "logged in" flag.
///
/// Expiry only matters to callers that keep a session across many actions; a
/// one-shot CLI run never outlives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(granted_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            granted_at,
            expires_at: granted_at + ttl,
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
