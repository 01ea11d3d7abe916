//! Types exchanged with the external calendar widget.
//!
//! The widget renders descriptors and reports user gestures back; nothing
//! else crosses this boundary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use almanac_core::types::{CalendarEvent, Priority};

use crate::classify::{classify, status_color};

/// Widget view modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

/// Render-ready event descriptor handed to the widget.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventDescriptor {
    pub id: Uuid,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub background_color: String,
    pub priority: Priority,
}

/// User gestures reported by the widget.
#[derive(Clone, Debug, PartialEq)]
pub enum CalendarGesture {
    /// A date cell was clicked.
    DateClick(NaiveDate),
    /// An existing event was clicked.
    EventClick(Uuid),
    /// The visible range or view mode changed.
    ViewRangeChange { title: String, view: CalendarView },
}

/// Build descriptors for rendering, sorted by start.
///
/// `background_color` depends on the wall clock, so this must be recomputed
/// on every render pass.
pub fn descriptors(events: &[CalendarEvent], now: DateTime<Utc>) -> Vec<EventDescriptor> {
    let mut out: Vec<EventDescriptor> = events
        .iter()
        .map(|event| EventDescriptor {
            id: event.id,
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            background_color: status_color(classify(event, now)).to_string(),
            priority: event.priority,
        })
        .collect();
    out.sort_by_key(|d| d.start);
    out
}
