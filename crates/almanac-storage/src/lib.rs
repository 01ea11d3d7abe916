//! Durable storage for the calendar event collection.
//!
//! The whole collection lives under a single key-value slot: read whole at
//! startup, rewritten whole after every mutation.

pub mod store;

pub use store::{EventStore, EVENTS_KEY};
