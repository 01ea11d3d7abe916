use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain events emitted after state changes.
///
/// Consumed by UI observers (the reminder popup, the calendar refresh) and
/// by the application log.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DomainEvent {
    /// An event was created and persisted.
    EventCreated {
        event_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// An existing event was edited in place.
    EventUpdated {
        event_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// An event was permanently removed.
    EventDeleted {
        event_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// The reminder timer set was rebuilt from the current collection.
    RemindersArmed {
        timer_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A reminder wake-up fired for an event.
    ReminderFired {
        event_id: Uuid,
        offset_minutes: u32,
        timestamp: DateTime<Utc>,
    },

    /// The user dismissed the currently shown reminder.
    ReminderDismissed {
        event_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Returns the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::EventCreated { timestamp, .. }
            | DomainEvent::EventUpdated { timestamp, .. }
            | DomainEvent::EventDeleted { timestamp, .. }
            | DomainEvent::RemindersArmed { timestamp, .. }
            | DomainEvent::ReminderFired { timestamp, .. }
            | DomainEvent::ReminderDismissed { timestamp, .. } => *timestamp,
        }
    }

    /// Returns a stable event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            DomainEvent::EventCreated { .. } => "event_created",
            DomainEvent::EventUpdated { .. } => "event_updated",
            DomainEvent::EventDeleted { .. } => "event_deleted",
            DomainEvent::RemindersArmed { .. } => "reminders_armed",
            DomainEvent::ReminderFired { .. } => "reminder_fired",
            DomainEvent::ReminderDismissed { .. } => "reminder_dismissed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        "2026-03-10T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_event_timestamp() {
        let event = DomainEvent::EventCreated {
            event_id: Uuid::new_v4(),
            timestamp: ts(),
        };
        assert_eq!(event.timestamp(), ts());
    }

    #[test]
    fn test_event_names() {
        let id = Uuid::new_v4();
        let events = vec![
            DomainEvent::EventCreated {
                event_id: id,
                timestamp: ts(),
            },
            DomainEvent::EventUpdated {
                event_id: id,
                timestamp: ts(),
            },
            DomainEvent::EventDeleted {
                event_id: id,
                timestamp: ts(),
            },
            DomainEvent::RemindersArmed {
                timer_count: 6,
                timestamp: ts(),
            },
            DomainEvent::ReminderFired {
                event_id: id,
                offset_minutes: 15,
                timestamp: ts(),
            },
            DomainEvent::ReminderDismissed {
                event_id: id,
                timestamp: ts(),
            },
        ];

        let names: Vec<&str> = events.iter().map(|e| e.event_name()).collect();
        assert_eq!(
            names,
            vec![
                "event_created",
                "event_updated",
                "event_deleted",
                "reminders_armed",
                "reminder_fired",
                "reminder_dismissed",
            ]
        );
    }

    #[test]
    fn test_event_serialization_round_trip() {
        let event = DomainEvent::ReminderFired {
            event_id: Uuid::new_v4(),
            offset_minutes: 10,
            timestamp: ts(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let rt: DomainEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(rt.event_name(), "reminder_fired");
        assert_eq!(rt.timestamp(), event.timestamp());
        if let DomainEvent::ReminderFired { offset_minutes, .. } = rt {
            assert_eq!(offset_minutes, 10);
        } else {
            panic!("expected ReminderFired after round trip");
        }
    }
}
