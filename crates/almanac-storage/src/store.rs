//! Single-slot event store.
//!
//! Handles load at startup and CRUD with a full slot rewrite after every
//! mutation. An absent or unparsable slot degrades to an empty collection;
//! it is never fatal.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use uuid::Uuid;

use almanac_core::error::{AlmanacError, Result};
use almanac_core::types::{CalendarEvent, EventPatch, EventPayload};

/// Storage slot key for the event collection.
pub const EVENTS_KEY: &str = "calendar-mock-events-v1";

/// In-memory event collection backed by a single JSON slot on disk.
pub struct EventStore {
    slot_path: PathBuf,
    events: Mutex<Vec<CalendarEvent>>,
}

impl EventStore {
    /// Open the store under `data_dir`, loading the slot if present.
    ///
    /// The directory is created if missing. A slot that exists but cannot
    /// be parsed is logged and treated as empty.
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let slot_path = data_dir.join(format!("{EVENTS_KEY}.json"));
        let events = load_slot(&slot_path);

        info!(
            slot = %slot_path.display(),
            count = events.len(),
            "event store opened"
        );

        Ok(Self {
            slot_path,
            events: Mutex::new(events),
        })
    }

    /// Snapshot of the current collection, in insertion order.
    pub fn events(&self) -> Vec<CalendarEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(_) => vec![],
        }
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a single event by id.
    pub fn get(&self, id: Uuid) -> Option<CalendarEvent> {
        match self.events.lock() {
            Ok(events) => events.iter().find(|e| e.id == id).cloned(),
            Err(_) => None,
        }
    }

    /// Create a new event from a validated payload, assigning a fresh id.
    pub fn create(&self, payload: EventPayload) -> Result<CalendarEvent> {
        let event = CalendarEvent {
            id: Uuid::new_v4(),
            title: payload.title,
            start: payload.start,
            end: payload.end,
            priority: payload.priority,
        };

        let mut events = self.lock()?;
        events.push(event.clone());
        self.persist(&events)?;

        debug!(event_id = %event.id, "event created");
        Ok(event)
    }

    /// Merge a patch into the event with `id`.
    ///
    /// An unknown id is a silent no-op: returns `Ok(None)` and writes
    /// nothing.
    pub fn update(&self, id: Uuid, patch: EventPatch) -> Result<Option<CalendarEvent>> {
        let mut events = self.lock()?;
        let Some(event) = events.iter_mut().find(|e| e.id == id) else {
            debug!(event_id = %id, "update for unknown event ignored");
            return Ok(None);
        };

        patch.apply_to(event);
        let updated = event.clone();
        self.persist(&events)?;

        debug!(event_id = %id, "event updated");
        Ok(Some(updated))
    }

    /// Remove the event with `id`, if present.
    ///
    /// Returns `false` (without touching the slot) if the id is unknown.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let mut events = self.lock()?;
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Ok(false);
        }
        self.persist(&events)?;

        debug!(event_id = %id, "event deleted");
        Ok(true)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<CalendarEvent>>> {
        self.events
            .lock()
            .map_err(|e| AlmanacError::Storage(format!("lock poisoned: {}", e)))
    }

    /// Rewrite the whole slot atomically (temp file + rename).
    fn persist(&self, events: &[CalendarEvent]) -> Result<()> {
        let dir = self.slot_path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut temp, events)?;
        temp.flush()?;
        temp.persist(&self.slot_path).map_err(|e| {
            AlmanacError::Storage(format!(
                "failed to persist {}: {}",
                self.slot_path.display(),
                e
            ))
        })?;

        debug!(count = events.len(), "event slot rewritten");
        Ok(())
    }
}

fn load_slot(path: &Path) -> Vec<CalendarEvent> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(slot = %path.display(), error = %e, "failed reading event slot, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(events) => events,
        Err(e) => {
            warn!(slot = %path.display(), error = %e, "failed parsing event slot, starting empty");
            Vec::new()
        }
    }
}
