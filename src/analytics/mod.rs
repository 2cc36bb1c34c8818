//! Request event logging (`~/.textclass/events.jsonl`).

pub mod logger;

pub use logger::{Event, EventKind, EventLogger};
