pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AlmanacConfig;
pub use error::{AlmanacError, Result};
pub use events::DomainEvent;
pub use types::*;
