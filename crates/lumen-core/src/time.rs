//! Time primitives for the LUMEN hub
//!
//! The hub runs against a single wall-clock scale: milliseconds since the
//! Unix epoch. Handlers never read the clock themselves; the runtime stamps
//! every inbound event and every sweep with a `HubTime`, which keeps the
//! engine deterministic under test.

use std::ops::{Add, Sub};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Hub time - milliseconds since the Unix epoch
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct HubTime(pub i64);

impl HubTime {
    pub const ZERO: HubTime = HubTime(0);
    pub const MAX: HubTime = HubTime(i64::MAX);

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        HubTime(millis)
    }

    #[inline]
    pub fn from_secs(secs: i64) -> Self {
        HubTime(secs * 1000)
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        HubTime(since_epoch.as_millis() as i64)
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        HubTime(self.0.saturating_add(duration.as_millis() as i64))
    }

    #[inline]
    pub fn saturating_sub(self, duration: Duration) -> Self {
        HubTime(self.0.saturating_sub(duration.as_millis() as i64))
    }

    /// Elapsed time since `earlier`, zero if `earlier` is in the future
    #[inline]
    pub fn elapsed_since(self, earlier: HubTime) -> Duration {
        let diff = self.0 - earlier.0;
        if diff >= 0 {
            Duration::from_millis(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl Add<Duration> for HubTime {
    type Output = HubTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        HubTime(self.0 + rhs.as_millis() as i64)
    }
}

impl Sub<Duration> for HubTime {
    type Output = HubTime;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        HubTime(self.0 - rhs.as_millis() as i64)
    }
}

impl std::fmt::Debug for HubTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({}ms)", self.0)
    }
}
