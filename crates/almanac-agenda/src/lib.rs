//! Scheduling engine for Almanac.
//!
//! Classifies events against the wall clock, validates candidate events,
//! manages one-shot reminder timers (cancel-all, re-arm-all on every store
//! change), and coordinates the whole flow behind the [`Agenda`] facade.

pub mod agenda;
pub mod classify;
pub mod error;
pub mod notify;
pub mod scheduler;
pub mod session;
pub mod validate;
pub mod view;

pub use agenda::{Agenda, GestureOutcome};
pub use classify::{classify, priority_border, status_color, BorderStyle, LIVE_LEAD_MINUTES};
pub use error::{AgendaError, IdentityError, ValidationError};
pub use notify::{ReminderNotice, ReminderSurface};
pub use scheduler::{ReminderFired, ReminderScheduler, SchedulerState};
pub use session::{AuthState, CalendarAccess, IdentityProvider, MemoryIdentity, SessionGate};
pub use validate::{date_selectable, validate, SAME_DAY_LEAD_MINUTES};
pub use view::{descriptors, CalendarGesture, CalendarView, EventDescriptor};
