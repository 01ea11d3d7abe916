//! Almanac application binary - composition root.
//!
//! Ties the crates together into a single session host:
//! 1. Load configuration from TOML
//! 2. Open the event store (single JSON slot)
//! 3. Gate calendar access on a present user
//! 4. Arm reminder timers from the stored collection
//! 5. Log domain events and fired reminders until ctrl-c

use std::path::PathBuf;
use std::sync::Arc;

use almanac_agenda::{Agenda, CalendarAccess, IdentityProvider, MemoryIdentity, SessionGate};
use almanac_core::clock::SystemClock;
use almanac_core::config::AlmanacConfig;
use almanac_core::events::DomainEvent;
use almanac_storage::EventStore;

/// Expand ~ to the home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if let Some(rest) = data_dir.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(data_dir)
    }
}

/// Resolve the config file path (ALMANAC_CONFIG env, or ~/.almanac/config.toml).
fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var("ALMANAC_CONFIG") {
        return PathBuf::from(p);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".almanac").join("config.toml");
    }
    PathBuf::from("config.toml")
}

/// Log domain events as they are broadcast.
async fn event_log_loop(mut rx: tokio::sync::broadcast::Receiver<DomainEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                tracing::debug!(name = event.event_name(), at = %event.timestamp(), "domain event");
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "domain event log fell behind");
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => return,
        }
    }
}

// Reminder wake-ups must never run concurrently with mutations, so the
// whole session runs on one cooperative scheduler.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Almanac v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = config_path();
    let config = AlmanacConfig::load_or_default(&config_file);
    tracing::info!(
        path = %config_file.display(),
        view = %config.calendar.default_view,
        "Configuration loaded"
    );

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    let store = Arc::new(EventStore::open(&data_dir)?);

    // Identity: a local session user; the calendar stays locked without one.
    let provider = Arc::new(MemoryIdentity::signed_in("local@almanac"));
    let gate = SessionGate::new(Arc::clone(&provider) as Arc<dyn IdentityProvider>);
    let user = match gate.calendar_access() {
        CalendarAccess::Granted(user) => user,
        CalendarAccess::Loading | CalendarAccess::SignedOut => {
            tracing::error!("No user present; calendar access denied");
            return Ok(());
        }
    };
    tracing::info!(user = %user, "Calendar unlocked");

    // Agenda: wire store + scheduler, then arm from the stored collection.
    let agenda = Arc::new(Agenda::new(
        Arc::clone(&store),
        config.reminders.offsets_minutes.clone(),
        Arc::new(SystemClock),
    ));

    tokio::spawn(event_log_loop(agenda.subscribe()));

    agenda.rearm();
    tracing::info!(
        events = store.len(),
        timers = agenda.timer_count(),
        "Reminders armed"
    );

    for descriptor in agenda.descriptors() {
        tracing::info!(
            event_id = %descriptor.id,
            title = %descriptor.title,
            start = %descriptor.start,
            color = %descriptor.background_color,
            "Scheduled event"
        );
    }

    // Run until interrupted, surfacing reminders as they fire.
    let mut events = agenda.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            received = events.recv() => {
                if let Ok(DomainEvent::ReminderFired { offset_minutes, .. }) = received {
                    if let Some(notice) = agenda.current_reminder() {
                        tracing::info!(
                            title = %notice.event.title,
                            start = %notice.event.start,
                            priority = %notice.event.priority,
                            minutes_before = offset_minutes,
                            "Upcoming reminder"
                        );
                    }
                }
            }
        }
    }

    // Teardown: no timer may fire after the owning state is gone.
    agenda.shutdown();
    provider.sign_out().await;
    tracing::info!("Almanac stopped");

    Ok(())
}
