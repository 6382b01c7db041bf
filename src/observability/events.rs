//! Observable engine events.
//!
//! Per OBSERVABILITY.md, every externally visible state change has an
//! explicit, typed event. Events are explicit so log consumers never have
//! to parse free-form messages.

use std::fmt;

/// Observable events in the engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Bootstrap
    /// Registry population from the embedded catalogue completed
    CatalogueLoaded,
    /// Registry population hit a duplicate entry (FATAL)
    CatalogueConflict,

    // Construction
    /// A build attempt started
    BuildStart,
    /// A build attempt produced a validated object
    BuildAccepted,
    /// A build attempt was rejected with violations
    BuildRejected,

    // Handoff
    /// A validated object was accepted by a sink
    SinkHandoff,
    /// A sink refused an object
    SinkFailed,
}

impl Event {
    /// Returns the event name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::CatalogueLoaded => "CATALOGUE_LOADED",
            Event::CatalogueConflict => "CATALOGUE_CONFLICT",
            Event::BuildStart => "BUILD_START",
            Event::BuildAccepted => "BUILD_ACCEPTED",
            Event::BuildRejected => "BUILD_REJECTED",
            Event::SinkHandoff => "SINK_HANDOFF",
            Event::SinkFailed => "SINK_FAILED",
        }
    }

    /// Returns true when the event means start-up must abort
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::CatalogueConflict)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        for event in [
            Event::CatalogueLoaded,
            Event::CatalogueConflict,
            Event::BuildStart,
            Event::BuildAccepted,
            Event::BuildRejected,
            Event::SinkHandoff,
            Event::SinkFailed,
        ] {
            let name = event.as_str();
            assert!(name
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_only_catalogue_conflict_is_fatal() {
        assert!(Event::CatalogueConflict.is_fatal());
        assert!(!Event::BuildRejected.is_fatal());
        assert!(!Event::SinkFailed.is_fatal());
    }
}
