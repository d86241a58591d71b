//! Match phase and clock management.
//!
//! Tracks which phase of the match is active, stamps events with the
//! operator period and clock string, detects extra time, and issues
//! phase transitions to the external status service. Transitions apply
//! locally first (optimistic); a remote failure is reported once through
//! the caller's error callback and never rolled back or retried.

use serde::{Deserialize, Serialize};

use crate::models::{ClockMode, EventStamp, Match, MatchStatus};
use crate::ports::{StatusError, StatusService};

const HALF_SECONDS: u32 = 45 * 60;
const EXTRA_HALF_SECONDS: u32 = 15 * 60;

/// Match phase, as the operator sees it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodPhase {
    NotStarted,
    FirstHalf,
    FirstHalfExtraTime,
    Halftime,
    ExtraHalftime,
    SecondHalf,
    SecondHalfExtraTime,
    Penalties,
    Fulltime,
    Completed,
}

/// Status label persisted and clock-mode instruction applied when a phase
/// is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSpec {
    pub status: MatchStatus,
    pub clock_mode: ClockMode,
}

impl PeriodPhase {
    /// Position on the match timeline, used for the monotonic-progression
    /// invariant: reconstruction from a stale status must never move the
    /// phase to a lower rank.
    pub fn progression_rank(self) -> u8 {
        match self {
            PeriodPhase::NotStarted => 0,
            PeriodPhase::FirstHalf => 1,
            PeriodPhase::Halftime => 2,
            PeriodPhase::SecondHalf => 3,
            PeriodPhase::Fulltime => 4,
            PeriodPhase::FirstHalfExtraTime => 5,
            PeriodPhase::ExtraHalftime => 6,
            PeriodPhase::SecondHalfExtraTime => 7,
            PeriodPhase::Penalties => 8,
            PeriodPhase::Completed => 9,
        }
    }

    /// Fixed status -> phase mapping used when reconstructing after a
    /// reload.
    pub fn from_status(status: MatchStatus) -> PeriodPhase {
        match status {
            MatchStatus::Scheduled | MatchStatus::Pending => PeriodPhase::NotStarted,
            MatchStatus::Live | MatchStatus::LiveFirstHalf => PeriodPhase::FirstHalf,
            MatchStatus::Halftime => PeriodPhase::Halftime,
            MatchStatus::LiveSecondHalf => PeriodPhase::SecondHalf,
            MatchStatus::Fulltime => PeriodPhase::Fulltime,
            MatchStatus::LiveExtraFirst => PeriodPhase::FirstHalfExtraTime,
            MatchStatus::ExtraHalftime => PeriodPhase::ExtraHalftime,
            MatchStatus::LiveExtraSecond => PeriodPhase::SecondHalfExtraTime,
            MatchStatus::Penalties => PeriodPhase::Penalties,
            MatchStatus::Completed | MatchStatus::Abandoned => PeriodPhase::Completed,
        }
    }

    /// Legal forward transitions out of this phase.
    pub fn allowed_transitions(self) -> &'static [PeriodPhase] {
        match self {
            PeriodPhase::NotStarted => &[PeriodPhase::FirstHalf],
            PeriodPhase::FirstHalf => &[PeriodPhase::Halftime],
            PeriodPhase::Halftime => &[PeriodPhase::SecondHalf],
            PeriodPhase::SecondHalf => &[PeriodPhase::Fulltime],
            PeriodPhase::Fulltime => &[PeriodPhase::FirstHalfExtraTime, PeriodPhase::Completed],
            PeriodPhase::FirstHalfExtraTime => &[PeriodPhase::ExtraHalftime],
            PeriodPhase::ExtraHalftime => &[PeriodPhase::SecondHalfExtraTime],
            PeriodPhase::SecondHalfExtraTime => {
                &[PeriodPhase::Penalties, PeriodPhase::Completed]
            }
            PeriodPhase::Penalties => &[PeriodPhase::Completed],
            PeriodPhase::Completed => &[],
        }
    }

    /// Status persisted and clock mode applied when this phase is entered.
    pub fn entry_spec(self) -> Option<TransitionSpec> {
        let spec = |status, clock_mode| Some(TransitionSpec { status, clock_mode });
        match self {
            PeriodPhase::NotStarted => None,
            PeriodPhase::FirstHalf => spec(MatchStatus::LiveFirstHalf, ClockMode::Running),
            PeriodPhase::Halftime => spec(MatchStatus::Halftime, ClockMode::Stopped),
            PeriodPhase::SecondHalf => spec(MatchStatus::LiveSecondHalf, ClockMode::Running),
            PeriodPhase::Fulltime => spec(MatchStatus::Fulltime, ClockMode::Stopped),
            PeriodPhase::FirstHalfExtraTime => {
                spec(MatchStatus::LiveExtraFirst, ClockMode::Running)
            }
            PeriodPhase::ExtraHalftime => spec(MatchStatus::ExtraHalftime, ClockMode::Stopped),
            PeriodPhase::SecondHalfExtraTime => {
                spec(MatchStatus::LiveExtraSecond, ClockMode::Running)
            }
            PeriodPhase::Penalties => spec(MatchStatus::Penalties, ClockMode::Stopped),
            PeriodPhase::Completed => spec(MatchStatus::Completed, ClockMode::Stopped),
        }
    }

    /// Integer period (1-5) used for event stamping. Breaks keep the prior
    /// period; they never map to a distinct one.
    pub fn operator_period(self) -> u8 {
        match self {
            PeriodPhase::NotStarted | PeriodPhase::FirstHalf | PeriodPhase::Halftime => 1,
            PeriodPhase::SecondHalf | PeriodPhase::Fulltime => 2,
            PeriodPhase::FirstHalfExtraTime | PeriodPhase::ExtraHalftime => 3,
            PeriodPhase::SecondHalfExtraTime => 4,
            PeriodPhase::Penalties | PeriodPhase::Completed => 5,
        }
    }

    /// Regulation length of this phase, for playing phases with a clock.
    pub fn regulation_seconds(self) -> Option<u32> {
        match self {
            PeriodPhase::FirstHalf | PeriodPhase::SecondHalf => Some(HALF_SECONDS),
            PeriodPhase::FirstHalfExtraTime | PeriodPhase::SecondHalfExtraTime => {
                Some(EXTRA_HALF_SECONDS)
            }
            _ => None,
        }
    }

    /// Global-clock offset at which this phase nominally starts, used when
    /// no explicit start timestamp was recorded.
    pub fn inferred_start_seconds(self) -> Option<u32> {
        match self {
            PeriodPhase::FirstHalf => Some(0),
            PeriodPhase::SecondHalf => Some(HALF_SECONDS),
            PeriodPhase::FirstHalfExtraTime => Some(2 * HALF_SECONDS),
            PeriodPhase::SecondHalfExtraTime => Some(2 * HALF_SECONDS + EXTRA_HALF_SECONDS),
            _ => None,
        }
    }

    /// Whether event entry is permitted in this phase.
    pub fn is_live(self) -> bool {
        matches!(
            self,
            PeriodPhase::FirstHalf
                | PeriodPhase::SecondHalf
                | PeriodPhase::FirstHalfExtraTime
                | PeriodPhase::SecondHalfExtraTime
                | PeriodPhase::Penalties
        )
    }
}

/// Extra-time overage for the current phase.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ExtraTimeReport {
    pub elapsed_seconds: u32,
    pub extra_time_seconds: u32,
    pub show_warning: bool,
}

/// Phase/clock state machine for one operator session.
#[derive(Debug, Default)]
pub struct PeriodClockManager {
    match_id: Option<String>,
    phase: PeriodPhase,
    clock_mode: ClockMode,
}

impl Default for PeriodPhase {
    fn default() -> Self {
        PeriodPhase::NotStarted
    }
}

impl PeriodClockManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PeriodPhase {
        self.phase
    }

    pub fn clock_mode(&self) -> ClockMode {
        self.clock_mode
    }

    pub fn operator_period(&self) -> u8 {
        self.phase.operator_period()
    }

    /// Gate for event entry; hosts disable capture affordances when false.
    pub fn entry_allowed(&self) -> bool {
        self.phase.is_live()
    }

    pub fn allowed_transitions(&self) -> &'static [PeriodPhase] {
        self.phase.allowed_transitions()
    }

    /// Re-derive phase from the persisted match.
    ///
    /// Monotonic-progression invariant: once the local phase has advanced
    /// past what the persisted status implies (a stale fetch), the phase
    /// never moves backward. Two exceptions force a reseed: a different
    /// match id (session switch) and the explicit reset signature
    /// (not-started status, zero elapsed time, no period timestamps).
    pub fn reconstruct(&mut self, m: &Match) {
        if self.match_id.as_deref() != Some(m.id.as_str()) {
            log::info!("clock: seeding phase from match {}", m.id);
            self.match_id = Some(m.id.clone());
            self.set_phase(PeriodPhase::from_status(m.status));
            return;
        }

        if is_reset_signature(m) {
            log::info!("clock: reset signature on match {}, back to NOT_STARTED", m.id);
            self.set_phase(PeriodPhase::NotStarted);
            return;
        }

        let implied = PeriodPhase::from_status(m.status);
        if implied.progression_rank() > self.phase.progression_rank() {
            self.set_phase(implied);
        }
    }

    /// Execute a phase transition: apply locally, then persist through the
    /// status service. On remote failure the error callback fires once
    /// with the attempted status and the cause; local phase stays put.
    ///
    /// Returns false (no-op) when the transition is not legal from the
    /// current phase.
    pub fn request_transition<F>(
        &mut self,
        m: &Match,
        to: PeriodPhase,
        service: &mut dyn StatusService,
        on_error: F,
    ) -> bool
    where
        F: FnOnce(MatchStatus, StatusError),
    {
        if !self.phase.allowed_transitions().contains(&to) {
            log::warn!("clock: illegal transition {:?} -> {:?} ignored", self.phase, to);
            return false;
        }
        let Some(spec) = to.entry_spec() else {
            return false;
        };

        log::info!("clock: {:?} -> {:?} ({:?})", self.phase, to, spec.status);
        self.match_id.get_or_insert_with(|| m.id.clone());
        self.set_phase(to);

        if let Err(err) = service.update_status(&m.id, spec.status) {
            log::warn!("clock: status update to {:?} failed: {}", spec.status, err);
            on_error(spec.status, err);
        }
        true
    }

    /// Stamp for the next captured event: operator period plus the clock
    /// display string.
    pub fn stamp(&self, m: &Match) -> EventStamp {
        EventStamp {
            period: self.operator_period(),
            clock: clock_display(m.total_seconds.unwrap_or(0)),
        }
    }

    /// Overage past regulation for the current phase, or `None` when the
    /// phase has no running clock. The warning flag only raises while the
    /// clock runs in effective mode.
    pub fn extra_time(&self, m: &Match, now_global_seconds: u32) -> Option<ExtraTimeReport> {
        let regulation = self.phase.regulation_seconds()?;
        let recorded = m
            .periods
            .get(&self.operator_period().to_string())
            .and_then(|window| window.global_start_seconds);
        let start = recorded.or(self.phase.inferred_start_seconds())?;

        let elapsed = now_global_seconds.saturating_sub(start);
        let extra = elapsed.saturating_sub(regulation);
        Some(ExtraTimeReport {
            elapsed_seconds: elapsed,
            extra_time_seconds: extra,
            show_warning: extra > 0 && self.clock_mode == ClockMode::Running,
        })
    }

    fn set_phase(&mut self, phase: PeriodPhase) {
        self.phase = phase;
        self.clock_mode =
            phase.entry_spec().map(|spec| spec.clock_mode).unwrap_or(ClockMode::Stopped);
    }
}

/// "MM:SS" on the global match clock; minutes keep counting past 99.
pub fn clock_display(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

fn is_reset_signature(m: &Match) -> bool {
    matches!(m.status, MatchStatus::Scheduled | MatchStatus::Pending)
        && m.total_seconds.unwrap_or(0) == 0
        && m.periods.is_empty()
}
