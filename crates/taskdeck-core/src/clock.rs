use time::OffsetDateTime;

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// Source of "now" for lifecycle stamping.
pub trait Clock {
    /// Current instant in epoch milliseconds.
    fn now_millis(&self) -> EpochMillis;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> EpochMillis {
        to_epoch_millis(OffsetDateTime::now_utc())
    }
}

/// Clock frozen at a single instant (used in tests and replays).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub EpochMillis);

impl Clock for FixedClock {
    fn now_millis(&self) -> EpochMillis {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> EpochMillis {
        (**self).now_millis()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_millis(&self) -> EpochMillis {
        (**self).now_millis()
    }
}

/// Convert a timestamp to epoch milliseconds, saturating outside the `i64` range.
#[must_use]
pub fn to_epoch_millis(at: OffsetDateTime) -> EpochMillis {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    EpochMillis::try_from(millis).unwrap_or(if millis < 0 { EpochMillis::MIN } else { EpochMillis::MAX })
}

/// Convert epoch milliseconds back into a UTC timestamp.
#[must_use]
pub fn from_epoch_millis(millis: EpochMillis) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}
