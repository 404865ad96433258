//! Time source for loan bookkeeping

use chrono::{DateTime, Utc};

/// Provides the current instant. Loan start, return and overdue math all read
/// "now" through this trait so hosts and tests can control it.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
