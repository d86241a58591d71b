//! Boundaries with the external collaborators: the event sink, the status
//! service, the roster provider, and the ineffective-time signal.
//!
//! All ports are synchronous trait calls from the core's point of view;
//! the engine advances its local state optimistically before a call
//! resolves, reports failures once, and never retries.

use thiserror::Error;

use crate::models::{Match, MatchEvent, MatchStatus};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SinkError {
    #[error("event sink rejected the payload: {0}")]
    Rejected(String),
    #[error("event sink unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StatusError {
    #[error("status update rejected: {0}")]
    Rejected(String),
    #[error("status service unavailable: {0}")]
    Unavailable(String),
}

/// Accepts finished event payloads. The sink assigns ids and server
/// timestamps; the core treats submission as fire-and-forget.
pub trait EventSink {
    fn submit(&mut self, event: &MatchEvent) -> Result<(), SinkError>;
}

/// Persists match phase transitions.
pub trait StatusService {
    fn update_status(&mut self, match_id: &str, status: MatchStatus) -> Result<(), StatusError>;
}

/// Read-only access to the loaded match and its rosters.
pub trait RosterProvider {
    fn current_match(&self) -> Option<&Match>;
}

/// Why an ineffective-time segment should begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOffTrigger {
    Foul,
    Offside,
    BallOut,
    Goal,
}

/// Raised when play stops and a team is about to restart it; the team id
/// names the restarting team, not the one that caused the stoppage.
pub trait IneffectiveTimeSignal {
    fn time_off(&mut self, team_id: &str, trigger: TimeOffTrigger);
}

/// In-process sink that appends to a Vec, for hosts without a backend
/// and for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<MatchEvent>,
}

impl EventSink for MemorySink {
    fn submit(&mut self, event: &MatchEvent) -> Result<(), SinkError> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// In-process roster holder for hosts that load the match themselves.
#[derive(Debug, Default)]
pub struct MemoryRoster {
    pub m: Option<Match>,
}

impl MemoryRoster {
    pub fn new(m: Match) -> Self {
        Self { m: Some(m) }
    }
}

impl RosterProvider for MemoryRoster {
    fn current_match(&self) -> Option<&Match> {
        self.m.as_ref()
    }
}

/// Signal collector counterpart to `MemorySink`.
#[derive(Debug, Default)]
pub struct MemoryTimeOff {
    pub calls: Vec<(String, TimeOffTrigger)>,
}

impl IneffectiveTimeSignal for MemoryTimeOff {
    fn time_off(&mut self, team_id: &str, trigger: TimeOffTrigger) {
        self.calls.push((team_id.to_string(), trigger));
    }
}
