use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock instant at which a ledger entry was created.
///
/// Stored as milliseconds since the UNIX epoch so that it participates in the
/// entry digest as a plain integer. Timestamps are not required to be
/// monotonic across entries and are never validated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_millis(unix_ms: u64) -> Self {
        Self(unix_ms)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        let unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self(unix_ms)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// UTC calendar time, if the value is within chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms)", self.0)
    }
}

/// Renders as `YYYY-MM-DD HH:MM:SS` in UTC.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// Source of entry timestamps.
///
/// The ledger reads its clock exactly once per appended entry and stores the
/// result; verification always uses the stored value.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to. Used by tests and scripted demos.
#[derive(Debug, Default)]
pub struct ManualClock {
    unix_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            unix_ms: AtomicU64::new(start.as_millis()),
        }
    }

    pub fn set(&self, at: Timestamp) {
        self.unix_ms.store(at.as_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.unix_ms.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.unix_ms.load(Ordering::SeqCst))
    }
}
