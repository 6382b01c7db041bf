//! Observability subsystem.
//!
//! Per OBSERVABILITY.md:
//!
//! 1. Observability is read-only: no side effects on engine behavior
//! 2. No async, no background threads
//! 3. Deterministic output (stable key ordering)
//!
//! Logging failure must never fail a build; write errors are ignored.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
