//! Time utilities and constants.

use chrono::{DateTime, Utc};

/// Timing constants.
pub mod constants {
    use std::time::Duration;

    /// Bound on a single exchange-rate request (10 seconds).
    pub fn rate_fetch_timeout() -> Duration {
        Duration::from_secs(10)
    }
}

/// Get the current timestamp.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
