//! Clock abstraction.
//!
//! All time reads in the system go through a single injectable clock so
//! classification, validation, and reminder arming can be tested against
//! fixed instants.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};

/// Source of the current instant and the local UTC offset.
///
/// The offset matters for the local-calendar-day rules (same-day lead time,
/// past-day selection gate); instants themselves are always UTC.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now_utc(&self) -> DateTime<Utc>;

    /// UTC offset used for local-calendar-day comparisons.
    fn local_offset(&self) -> FixedOffset;

    /// Current local calendar day.
    fn today(&self) -> NaiveDate {
        self.now_utc()
            .with_timezone(&self.local_offset())
            .date_naive()
    }
}

/// Wall clock with the system's local offset.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_offset(&self) -> FixedOffset {
        *Local::now().offset()
    }
}

/// Clock pinned to a fixed instant and offset, for deterministic tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    /// Fixed clock at `now` with a zero (UTC) local offset.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            offset: Utc.fix(),
        }
    }

    /// Fixed clock at `now` with an explicit local offset.
    pub fn with_offset(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset
    }
}
