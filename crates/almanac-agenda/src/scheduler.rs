//! Reminder timer derivation and management.
//!
//! One-shot wake-ups armed at fixed offsets before each event's start. Any
//! change to the event collection rebuilds the whole timer set: every
//! previously armed timer is cancelled before new ones are derived, so no
//! timer can ever fire referencing deleted or edited event data.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info};
use uuid::Uuid;

use almanac_core::clock::Clock;
use almanac_core::types::CalendarEvent;

/// Notification emitted when a reminder wake-up fires.
#[derive(Clone, Debug, PartialEq)]
pub struct ReminderFired {
    pub event: CalendarEvent,
    pub offset_minutes: u32,
}

/// Arming state over the process lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// No timers armed.
    Idle,
    /// Timer set derived from the current event collection.
    Armed,
}

/// Owns the full set of armed reminder timers, keyed by event id.
pub struct ReminderScheduler {
    offsets_minutes: Vec<u32>,
    clock: Arc<dyn Clock>,
    tx: mpsc::UnboundedSender<ReminderFired>,
    timers: Mutex<HashMap<Uuid, Vec<AbortHandle>>>,
    state: Mutex<SchedulerState>,
}

impl ReminderScheduler {
    /// Create an idle scheduler. Fired reminders are sent on `tx`.
    pub fn new(
        offsets_minutes: Vec<u32>,
        clock: Arc<dyn Clock>,
        tx: mpsc::UnboundedSender<ReminderFired>,
    ) -> Self {
        Self {
            offsets_minutes,
            clock,
            tx,
            timers: Mutex::new(HashMap::new()),
            state: Mutex::new(SchedulerState::Idle),
        }
    }

    /// Rebuild the timer set from the full event collection.
    ///
    /// Cancels every previously armed timer unconditionally, then arms one
    /// timer per (event, offset) whose wake-up instant is strictly in the
    /// future. Past-due offsets are dropped silently, never fired
    /// retroactively. Returns the number of timers armed.
    ///
    /// Must be called from within a tokio runtime: wake-ups are spawned
    /// tasks.
    pub fn rearm(&self, events: &[CalendarEvent]) -> usize {
        self.cancel_all();

        let now = self.clock.now_utc();
        let mut timers = self.timers.lock().unwrap();
        let mut armed = 0;

        for event in events {
            let mut handles = Vec::new();
            for &offset in &self.offsets_minutes {
                let remind_at = event.start - Duration::minutes(offset as i64);
                if remind_at <= now {
                    continue;
                }
                let delay = match (remind_at - now).to_std() {
                    Ok(delay) => delay,
                    Err(_) => continue,
                };

                let tx = self.tx.clone();
                let event = event.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    debug!(
                        event_id = %event.id,
                        offset_minutes = offset,
                        "reminder wake-up fired"
                    );
                    let _ = tx.send(ReminderFired {
                        event,
                        offset_minutes: offset,
                    });
                });
                handles.push(handle.abort_handle());
                armed += 1;
            }
            if !handles.is_empty() {
                timers.insert(event.id, handles);
            }
        }
        drop(timers);

        *self.state.lock().unwrap() = SchedulerState::Armed;
        debug!(timers = armed, events = events.len(), "reminder timers rearmed");
        armed
    }

    /// Cancel all timers and return to Idle. Nothing fires afterward.
    pub fn shutdown(&self) {
        self.cancel_all();
        *self.state.lock().unwrap() = SchedulerState::Idle;
        info!("reminder scheduler shut down");
    }

    /// Current arming state.
    pub fn state(&self) -> SchedulerState {
        *self.state.lock().unwrap()
    }

    /// Number of currently armed timers (across all events).
    pub fn timer_count(&self) -> usize {
        self.timers.lock().unwrap().values().map(Vec::len).sum()
    }

    fn cancel_all(&self) {
        let mut timers = self.timers.lock().unwrap();
        for (_, handles) in timers.drain() {
            for handle in handles {
                handle.abort();
            }
        }
    }
}

impl Drop for ReminderScheduler {
    // A dropped scheduler must not leave wake-ups behind.
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_core::clock::SystemClock;
    use almanac_core::types::Priority;
    use chrono::{DateTime, Utc};

    const DEFAULT_OFFSETS: [u32; 3] = [15, 10, 5];

    fn event_starting_in(minutes: i64) -> CalendarEvent {
        let start: DateTime<Utc> = Utc::now() + Duration::minutes(minutes);
        CalendarEvent {
            id: Uuid::new_v4(),
            title: "Standup".to_string(),
            start,
            end: start + Duration::minutes(30),
            priority: Priority::Medium,
        }
    }

    fn scheduler() -> (ReminderScheduler, mpsc::UnboundedReceiver<ReminderFired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler =
            ReminderScheduler::new(DEFAULT_OFFSETS.to_vec(), Arc::new(SystemClock), tx);
        (scheduler, rx)
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let (scheduler, _rx) = scheduler();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.timer_count(), 0);
    }

    #[tokio::test]
    async fn test_rearm_arms_all_future_offsets() {
        let (scheduler, _rx) = scheduler();
        let armed = scheduler.rearm(&[event_starting_in(60)]);
        assert_eq!(armed, 3);
        assert_eq!(scheduler.timer_count(), 3);
        assert_eq!(scheduler.state(), SchedulerState::Armed);
    }

    #[tokio::test]
    async fn test_past_due_offsets_dropped_silently() {
        // Start in 7 minutes: the 15- and 10-minute wake-ups are already
        // past, only the 5-minute one is still in the future.
        let (scheduler, _rx) = scheduler();
        let armed = scheduler.rearm(&[event_starting_in(7)]);
        assert_eq!(armed, 1);
    }

    #[tokio::test]
    async fn test_event_with_all_offsets_past_arms_nothing() {
        let (scheduler, _rx) = scheduler();
        let armed = scheduler.rearm(&[event_starting_in(3)]);
        assert_eq!(armed, 0);
        // The set was still derived; the scheduler is armed, just empty.
        assert_eq!(scheduler.state(), SchedulerState::Armed);
    }

    #[tokio::test]
    async fn test_past_event_arms_nothing() {
        let (scheduler, _rx) = scheduler();
        let armed = scheduler.rearm(&[event_starting_in(-30)]);
        assert_eq!(armed, 0);
    }

    #[tokio::test]
    async fn test_two_future_one_past_offset_scenario() {
        // Start in 12 minutes: 15 is past, 10 and 5 are future.
        let (scheduler, _rx) = scheduler();
        let armed = scheduler.rearm(&[event_starting_in(12)]);
        assert_eq!(armed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_fire_in_offset_order() {
        let (scheduler, mut rx) = scheduler();
        let event = event_starting_in(20);
        scheduler.rearm(&[event.clone()]);

        // Paused time auto-advances to each sleep deadline in turn.
        for expected_offset in [15, 10, 5] {
            let fired = rx.recv().await.unwrap();
            assert_eq!(fired.event.id, event.id);
            assert_eq!(fired.offset_minutes, expected_offset);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_wakeup_fires_exactly_once() {
        let (scheduler, mut rx) = scheduler();
        scheduler.rearm(&[event_starting_in(20)]);

        let mut fired = Vec::new();
        for _ in 0..3 {
            fired.push(rx.recv().await.unwrap().offset_minutes);
        }
        assert_eq!(fired, vec![15, 10, 5]);

        // No fourth wake-up ever arrives.
        let extra = tokio::time::timeout(std::time::Duration::from_secs(3600), rx.recv()).await;
        assert!(extra.is_err(), "a wake-up fired more than once");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_cancels_prior_generation() {
        let (scheduler, mut rx) = scheduler();
        scheduler.rearm(&[event_starting_in(20)]);
        assert_eq!(scheduler.timer_count(), 3);

        // Re-arm against an empty collection: every prior timer dies.
        scheduler.rearm(&[]);
        assert_eq!(scheduler.timer_count(), 0);

        let fired = tokio::time::timeout(std::time::Duration::from_secs(3600), rx.recv()).await;
        assert!(fired.is_err(), "timer from a cancelled generation fired");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleting_one_event_keeps_the_other() {
        let (scheduler, mut rx) = scheduler();
        let keep = event_starting_in(20);
        let remove = event_starting_in(25);
        scheduler.rearm(&[keep.clone(), remove.clone()]);
        assert_eq!(scheduler.timer_count(), 6);

        // The collection without `remove`: its timers are gone, keep's
        // fire as normal.
        scheduler.rearm(&[keep.clone()]);
        assert_eq!(scheduler.timer_count(), 3);

        for _ in 0..3 {
            let fired = rx.recv().await.unwrap();
            assert_eq!(fired.event.id, keep.id);
        }
        let extra = tokio::time::timeout(std::time::Duration::from_secs(3600), rx.recv()).await;
        assert!(extra.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_after_edit_uses_new_event_data() {
        let (scheduler, mut rx) = scheduler();
        let mut event = event_starting_in(20);
        scheduler.rearm(&[event.clone()]);

        // Edit: retitle and push the start out.
        event.title = "Standup (moved)".to_string();
        event.start += Duration::minutes(30);
        event.end += Duration::minutes(30);
        scheduler.rearm(&[event.clone()]);

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.event.title, "Standup (moved)");
        assert_eq!(fired.event.start, event.start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_everything() {
        let (scheduler, mut rx) = scheduler();
        scheduler.rearm(&[event_starting_in(20)]);
        scheduler.shutdown();

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.timer_count(), 0);

        let fired = tokio::time::timeout(std::time::Duration::from_secs(3600), rx.recv()).await;
        assert!(fired.is_err(), "timer fired after shutdown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_offsets() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = ReminderScheduler::new(vec![30], Arc::new(SystemClock), tx);
        let event = event_starting_in(45);

        assert_eq!(scheduler.rearm(&[event]), 1);
        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.offset_minutes, 30);
    }
}
