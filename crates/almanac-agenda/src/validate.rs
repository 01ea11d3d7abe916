//! Candidate event validation.
//!
//! Runs on every create/edit submission, in a fixed order, against the
//! instant of validation (not the instant the form opened). Also hosts the
//! gesture-level gate that keeps past calendar days from opening the
//! creation form at all.

use chrono::{Duration, NaiveDate};

use almanac_core::clock::Clock;
use almanac_core::types::{EventDraft, EventPayload};

use crate::error::ValidationError;

/// Minimum lead time, in minutes, for events starting on the current local
/// day.
pub const SAME_DAY_LEAD_MINUTES: i64 = 60;

/// Validate a candidate event and normalize it into a store-ready payload.
///
/// Checks, in order: non-empty title, both times present, `start < end`,
/// and the same-day lead rule (`start >= now + 1h` when the start falls on
/// the current local day; `start == now + 1h` exactly is accepted).
pub fn validate(draft: &EventDraft, clock: &dyn Clock) -> Result<EventPayload, ValidationError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let (Some(start), Some(end)) = (draft.start, draft.end) else {
        return Err(ValidationError::MissingTimes);
    };

    if start >= end {
        return Err(ValidationError::InvalidRange);
    }

    let now = clock.now_utc();
    let offset = clock.local_offset();
    let start_day = start.with_timezone(&offset).date_naive();
    let today = now.with_timezone(&offset).date_naive();
    if start_day == today && start < now + Duration::minutes(SAME_DAY_LEAD_MINUTES) {
        return Err(ValidationError::TooSoon);
    }

    Ok(EventPayload {
        title: title.to_string(),
        start,
        end,
        priority: draft.priority,
    })
}

/// Gesture-level gate: can a creation form open for this calendar day?
///
/// Days strictly before the current local day are rejected outright. This
/// runs before [`validate`] is ever invoked and does not replace it.
pub fn date_selectable(date: NaiveDate, clock: &dyn Clock) -> bool {
    date >= clock.today()
}
