use std::time::{Duration, SystemTime};

/// Lifecycle timestamps of a stored session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Creation timestamp
    pub created_at: SystemTime,
    /// Last access timestamp
    pub last_accessed: SystemTime,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Create a new session state
    pub fn new() -> Self {
        let now = SystemTime::now();

        Self {
            created_at: now,
            last_accessed: now,
        }
    }

    /// Record an access
    pub fn touch(&mut self) {
        self.last_accessed = SystemTime::now();
    }

    /// True when `last_accessed + max_lifetime < now`
    pub fn is_expired_at(&self, max_lifetime: Duration, now: SystemTime) -> bool {
        match self.last_accessed.checked_add(max_lifetime) {
            Some(deadline) => deadline < now,
            None => false,
        }
    }

    pub fn is_expired(&self, max_lifetime: Duration) -> bool {
        self.is_expired_at(max_lifetime, SystemTime::now())
    }
}
