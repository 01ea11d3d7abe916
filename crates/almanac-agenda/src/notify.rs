//! Single-slot reminder display surface.
//!
//! At most one reminder is user-visible at a time. A newly fired reminder
//! replaces whatever is currently shown (last-write-wins); only an explicit
//! user dismissal clears the slot.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use almanac_core::types::CalendarEvent;

/// A reminder ready to show: which event, how many minutes before start.
#[derive(Clone, Debug, PartialEq)]
pub struct ReminderNotice {
    pub event: CalendarEvent,
    pub offset_minutes: u32,
    pub fired_at: DateTime<Utc>,
}

/// The one "currently displayed reminder" slot.
#[derive(Default)]
pub struct ReminderSurface {
    slot: Mutex<Option<ReminderNotice>>,
}

impl ReminderSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notice, returning the one it replaced (if any).
    pub fn display(&self, notice: ReminderNotice) -> Option<ReminderNotice> {
        self.slot.lock().unwrap().replace(notice)
    }

    /// The currently shown reminder.
    pub fn current(&self) -> Option<ReminderNotice> {
        self.slot.lock().unwrap().clone()
    }

    /// Explicit user dismissal. Returns the dismissed notice.
    pub fn dismiss(&self) -> Option<ReminderNotice> {
        self.slot.lock().unwrap().take()
    }
}
