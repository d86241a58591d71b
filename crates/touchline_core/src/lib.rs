//! # touchline_core - Live Match Event Capture Engine
//!
//! This library provides the capture core for logging soccer match events
//! in real time: pitch geometry resolution, the turbo shorthand parser,
//! the period/clock state machine, and the action selection flow.
//!
//! ## Features
//! - Percent-tap to pitch-coordinate resolution with out-of-bounds edges
//! - Turbo shorthand parsing with per-character incremental feedback
//! - Monotonic match-phase reconstruction and extra-time detection
//! - Selection flow with outcome inference, card escalation, and
//!   automatic corner awarding

pub mod clock;
pub mod error;
pub mod flow;
pub mod geometry;
pub mod models;
pub mod ports;
pub mod turbo;

pub use clock::{clock_display, ExtraTimeReport, PeriodClockManager, PeriodPhase};
pub use error::{CaptureError, Result};
pub use flow::{ActionFlowEngine, FlowEffect, FlowInput, QuickAction, SelectionStep};
pub use geometry::{FieldCoordinate, OutEdge, PitchBounds, PitchPoint};
pub use models::{Match, MatchEvent, MatchStatus, Side};
pub use ports::{EventSink, IneffectiveTimeSignal, RosterProvider, StatusService};
pub use turbo::{parse as parse_turbo, resolve as resolve_turbo, TurboParseResult};
