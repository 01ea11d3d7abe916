use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Scheduling priority of a calendar event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        write!(f, "{}", name)
    }
}

/// Display status of an event relative to the wall clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// More than the live window before start.
    Upcoming,
    /// Within the live window before start, up to (but not including) end.
    Live,
    /// At or past the end instant.
    Completed,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Live => "live",
            EventStatus::Completed => "completed",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Entity Structs
// =============================================================================

/// A stored calendar event.
///
/// Invariant: `end` is strictly after `start`. Enforced by the validation
/// engine before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub priority: Priority,
}

impl CalendarEvent {
    /// Scheduled duration of the event.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// A candidate event as entered in the creation/edit form, before validation.
///
/// Times are optional so an absent input is representable as a first-class
/// validation failure rather than a sentinel value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub priority: Priority,
}

/// A validated, normalized event payload ready for store insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPayload {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub priority: Priority,
}

/// A partial update merged into an existing event by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
}

impl EventPatch {
    /// Merge the set fields into `event`, leaving the rest untouched.
    pub fn apply_to(&self, event: &mut CalendarEvent) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = end;
        }
        if let Some(priority) = self.priority {
            event.priority = priority;
        }
    }
}

impl From<EventPayload> for EventPatch {
    fn from(payload: EventPayload) -> Self {
        Self {
            title: Some(payload.title),
            start: Some(payload.start),
            end: Some(payload.end),
            priority: Some(payload.priority),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
