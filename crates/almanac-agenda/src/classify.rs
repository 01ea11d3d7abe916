//! Event status classification and presentational styling.
//!
//! Pure functions over an event and the current instant. Colors are a
//! function of wall-clock time, so callers must recompute them on every
//! render pass.

use chrono::{DateTime, Duration, Utc};

use almanac_core::types::{CalendarEvent, EventStatus, Priority};

/// Minutes before start at which an event counts as live.
pub const LIVE_LEAD_MINUTES: i64 = 5;

/// Classify an event's display status at `now`.
///
/// Completed is checked first, so the `now == end` tie resolves to
/// Completed. Live begins exactly at `start - LIVE_LEAD_MINUTES`.
pub fn classify(event: &CalendarEvent, now: DateTime<Utc>) -> EventStatus {
    if now >= event.end {
        return EventStatus::Completed;
    }
    if now >= event.start - Duration::minutes(LIVE_LEAD_MINUTES) {
        return EventStatus::Live;
    }
    EventStatus::Upcoming
}

/// Background color rendered for an event status.
pub fn status_color(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Upcoming => "#06b6d4",
        EventStatus::Live => "#ef4444",
        EventStatus::Completed => "#94a3b8",
    }
}

/// Border styling derived from an event's priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderStyle {
    pub width_px: u8,
    pub style: &'static str,
    pub color: &'static str,
}

impl BorderStyle {
    /// CSS shorthand, e.g. `2px solid #b91c1c`.
    pub fn css(&self) -> String {
        format!("{}px {} {}", self.width_px, self.style, self.color)
    }
}

/// Border style for a priority. Total over all three priorities.
pub fn priority_border(priority: Priority) -> BorderStyle {
    let color = match priority {
        Priority::High => "#b91c1c",
        Priority::Medium => "#f59e0b",
        Priority::Low => "#10b981",
    };
    BorderStyle {
        width_px: 2,
        style: "solid",
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn event_at(start: &str, minutes: i64) -> CalendarEvent {
        let start: DateTime<Utc> = start.parse().unwrap();
        CalendarEvent {
            id: Uuid::new_v4(),
            title: "Standup".to_string(),
            start,
            end: start + Duration::minutes(minutes),
            priority: Priority::Medium,
        }
    }

    #[test]
    fn test_standup_scenario() {
        // Event [T, T+30min]: upcoming at T-10min, live at T-4min,
        // completed at T+40min.
        let event = event_at("2026-03-10T14:00:00Z", 30);
        let t: DateTime<Utc> = "2026-03-10T14:00:00Z".parse().unwrap();

        assert_eq!(
            classify(&event, t - Duration::minutes(10)),
            EventStatus::Upcoming
        );
        assert_eq!(
            classify(&event, t - Duration::minutes(4)),
            EventStatus::Live
        );
        assert_eq!(
            classify(&event, t + Duration::minutes(40)),
            EventStatus::Completed
        );
    }

    #[test]
    fn test_live_window_boundaries() {
        let event = event_at("2026-03-10T14:00:00Z", 30);
        let live_start = event.start - Duration::minutes(LIVE_LEAD_MINUTES);

        // One second before the window opens: still upcoming.
        assert_eq!(
            classify(&event, live_start - Duration::seconds(1)),
            EventStatus::Upcoming
        );
        // Exactly at start - 5min: live (inclusive lower bound).
        assert_eq!(classify(&event, live_start), EventStatus::Live);
        // One second before end: still live (exclusive upper bound).
        assert_eq!(
            classify(&event, event.end - Duration::seconds(1)),
            EventStatus::Live
        );
        // Exactly at end: the tie resolves to completed.
        assert_eq!(classify(&event, event.end), EventStatus::Completed);
    }

    #[test]
    fn test_classification_is_monotone() {
        // As now advances, status only ever moves forward:
        // upcoming -> live -> completed.
        let event = event_at("2026-03-10T14:00:00Z", 30);
        let rank = |s: EventStatus| match s {
            EventStatus::Upcoming => 0,
            EventStatus::Live => 1,
            EventStatus::Completed => 2,
        };

        let mut now = event.start - Duration::minutes(60);
        let mut previous = rank(classify(&event, now));
        while now < event.end + Duration::minutes(60) {
            now += Duration::seconds(30);
            let current = rank(classify(&event, now));
            assert!(current >= previous, "status moved backward at {}", now);
            previous = current;
        }
        assert_eq!(previous, 2);
    }

    #[test]
    fn test_live_during_event_body() {
        let event = event_at("2026-03-10T14:00:00Z", 30);
        assert_eq!(
            classify(&event, event.start + Duration::minutes(15)),
            EventStatus::Live
        );
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(EventStatus::Upcoming), "#06b6d4");
        assert_eq!(status_color(EventStatus::Live), "#ef4444");
        assert_eq!(status_color(EventStatus::Completed), "#94a3b8");
    }

    #[test]
    fn test_priority_border_total_mapping() {
        assert_eq!(priority_border(Priority::High).css(), "2px solid #b91c1c");
        assert_eq!(priority_border(Priority::Medium).css(), "2px solid #f59e0b");
        assert_eq!(priority_border(Priority::Low).css(), "2px solid #10b981");
    }

    #[test]
    fn test_priority_border_width_and_style() {
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            let border = priority_border(priority);
            assert_eq!(border.width_px, 2);
            assert_eq!(border.style, "solid");
        }
    }
}
