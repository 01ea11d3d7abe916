//! Agenda coordinator.
//!
//! Realizes the data flow: gesture -> validation -> store mutation ->
//! persist -> reminder re-arm from the full collection -> domain-event
//! broadcast. Owns the scheduler, the reminder surface, and the pump that
//! moves fired reminders onto the surface.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};
use uuid::Uuid;

use almanac_core::clock::Clock;
use almanac_core::events::DomainEvent;
use almanac_core::types::{CalendarEvent, EventDraft, EventPatch};
use almanac_storage::EventStore;

use crate::error::AgendaError;
use crate::notify::{ReminderNotice, ReminderSurface};
use crate::scheduler::{ReminderFired, ReminderScheduler, SchedulerState};
use crate::validate::{self, SAME_DAY_LEAD_MINUTES};
use crate::view::{self, CalendarGesture, CalendarView, EventDescriptor};

/// Outcome of a widget gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Open the creation form seeded with this draft.
    OpenCreate(EventDraft),
    /// Open the details view for this event.
    OpenDetails(CalendarEvent),
    /// The header title or view mode changed.
    ViewChanged { title: String, view: CalendarView },
    /// Gesture rejected (past day) or target missing; nothing opens.
    Ignored,
}

/// Application facade over the store, scheduler, and reminder surface.
pub struct Agenda {
    store: Arc<EventStore>,
    scheduler: ReminderScheduler,
    surface: Arc<ReminderSurface>,
    clock: Arc<dyn Clock>,
    events_tx: broadcast::Sender<DomainEvent>,
    pump: tokio::task::JoinHandle<()>,
}

impl Agenda {
    /// Wire up the agenda.
    ///
    /// Must be called from within a tokio runtime: reminder timers and the
    /// fired-reminder pump are spawned tasks. Timers are not armed until
    /// [`Agenda::rearm`] runs.
    pub fn new(store: Arc<EventStore>, offsets_minutes: Vec<u32>, clock: Arc<dyn Clock>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events_tx, _) = broadcast::channel(64);
        let surface = Arc::new(ReminderSurface::new());
        let scheduler = ReminderScheduler::new(offsets_minutes, Arc::clone(&clock), tx);
        let pump = tokio::spawn(pump_reminders(
            rx,
            Arc::clone(&surface),
            events_tx.clone(),
            Arc::clone(&clock),
        ));

        Self {
            store,
            scheduler,
            surface,
            clock,
            events_tx,
            pump,
        }
    }

    /// Rebuild the reminder timer set from the stored collection.
    ///
    /// Called once at startup and after every mutation.
    pub fn rearm(&self) {
        let armed = self.scheduler.rearm(&self.store.events());
        self.broadcast(DomainEvent::RemindersArmed {
            timer_count: armed,
            timestamp: self.clock.now_utc(),
        });
    }

    /// Validate and create a new event, then re-arm reminders.
    pub fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, AgendaError> {
        let payload = validate::validate(draft, self.clock.as_ref())?;
        let event = self.store.create(payload)?;
        info!(event_id = %event.id, title = %event.title, "event created");

        self.rearm();
        self.broadcast(DomainEvent::EventCreated {
            event_id: event.id,
            timestamp: self.clock.now_utc(),
        });
        Ok(event)
    }

    /// Validate and apply an edit to an existing event, then re-arm.
    ///
    /// An unknown id is a silent no-op: returns `Ok(None)` without touching
    /// storage or timers.
    pub fn update_event(
        &self,
        id: Uuid,
        draft: &EventDraft,
    ) -> Result<Option<CalendarEvent>, AgendaError> {
        let payload = validate::validate(draft, self.clock.as_ref())?;
        let Some(event) = self.store.update(id, EventPatch::from(payload))? else {
            debug!(event_id = %id, "edit for unknown event ignored");
            return Ok(None);
        };
        info!(event_id = %event.id, title = %event.title, "event updated");

        self.rearm();
        self.broadcast(DomainEvent::EventUpdated {
            event_id: event.id,
            timestamp: self.clock.now_utc(),
        });
        Ok(Some(event))
    }

    /// Delete an event (confirmed by the user), then re-arm.
    pub fn delete_event(&self, id: Uuid) -> Result<bool, AgendaError> {
        if !self.store.delete(id)? {
            return Ok(false);
        }
        info!(event_id = %id, "event deleted");

        self.rearm();
        self.broadcast(DomainEvent::EventDeleted {
            event_id: id,
            timestamp: self.clock.now_utc(),
        });
        Ok(true)
    }

    /// Snapshot of the stored collection.
    pub fn events(&self) -> Vec<CalendarEvent> {
        self.store.events()
    }

    /// Render-ready descriptors with colors computed at this instant.
    pub fn descriptors(&self) -> Vec<EventDescriptor> {
        view::descriptors(&self.store.events(), self.clock.now_utc())
    }

    /// Seed a creation draft for a clicked calendar day.
    ///
    /// Past days return `None`: the creation form never opens for them.
    /// Today seeds the earliest valid start (now + 1h); other days default
    /// to 09:00-10:00 local.
    pub fn draft_for_date(&self, date: NaiveDate) -> Option<EventDraft> {
        if !validate::date_selectable(date, self.clock.as_ref()) {
            debug!(%date, "past day click ignored");
            return None;
        }

        let start = if date == self.clock.today() {
            self.clock.now_utc() + Duration::minutes(SAME_DAY_LEAD_MINUTES)
        } else {
            let offset = self.clock.local_offset();
            date.and_hms_opt(9, 0, 0)?
                .and_local_timezone(offset)
                .single()?
                .with_timezone(&Utc)
        };

        Some(EventDraft {
            title: String::new(),
            start: Some(start),
            end: Some(start + Duration::hours(1)),
            priority: Default::default(),
        })
    }

    /// Route a widget gesture.
    pub fn on_gesture(&self, gesture: CalendarGesture) -> GestureOutcome {
        match gesture {
            CalendarGesture::DateClick(date) => match self.draft_for_date(date) {
                Some(draft) => GestureOutcome::OpenCreate(draft),
                None => GestureOutcome::Ignored,
            },
            CalendarGesture::EventClick(id) => match self.store.get(id) {
                Some(event) => GestureOutcome::OpenDetails(event),
                None => GestureOutcome::Ignored,
            },
            CalendarGesture::ViewRangeChange { title, view } => {
                GestureOutcome::ViewChanged { title, view }
            }
        }
    }

    /// The currently displayed reminder, if any.
    pub fn current_reminder(&self) -> Option<ReminderNotice> {
        self.surface.current()
    }

    /// Dismiss the currently displayed reminder.
    pub fn dismiss_reminder(&self) -> Option<ReminderNotice> {
        let dismissed = self.surface.dismiss();
        if let Some(notice) = &dismissed {
            self.broadcast(DomainEvent::ReminderDismissed {
                event_id: notice.event.id,
                timestamp: self.clock.now_utc(),
            });
        }
        dismissed
    }

    /// Subscribe to domain events (mutations, re-arms, fired reminders).
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.events_tx.subscribe()
    }

    /// Current scheduler arming state.
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Number of currently armed reminder timers.
    pub fn timer_count(&self) -> usize {
        self.scheduler.timer_count()
    }

    /// Cancel all timers and stop the reminder pump.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
        self.pump.abort();
    }

    fn broadcast(&self, event: DomainEvent) {
        // No receivers is fine; observers are optional.
        let _ = self.events_tx.send(event);
    }
}

/// Move fired reminders onto the display surface (last-write-wins) and
/// fan them out to observers.
async fn pump_reminders(
    mut rx: mpsc::UnboundedReceiver<ReminderFired>,
    surface: Arc<ReminderSurface>,
    events_tx: broadcast::Sender<DomainEvent>,
    clock: Arc<dyn Clock>,
) {
    while let Some(fired) = rx.recv().await {
        let fired_at = clock.now_utc();
        info!(
            event_id = %fired.event.id,
            title = %fired.event.title,
            offset_minutes = fired.offset_minutes,
            "reminder fired"
        );
        let _ = events_tx.send(DomainEvent::ReminderFired {
            event_id: fired.event.id,
            offset_minutes: fired.offset_minutes,
            timestamp: fired_at,
        });
        surface.display(ReminderNotice {
            event: fired.event,
            offset_minutes: fired.offset_minutes,
            fired_at,
        });
    }
}
