//! Data model: players, teams, the match record, and captured events.

pub mod events;
pub mod match_info;
pub mod player;
pub mod team;

pub use events::{
    CardKind, CornerAward, CornerReason, DuelOutcome, EventData, EventStamp, EventType,
    FoulOutcome, GkActionKind, MatchEvent, PassOutcome, PenaltyOutcome, SetPieceKind, ShotOutcome,
};
pub use match_info::{ClockMode, Match, MatchStatus, PeriodWindow};
pub use player::Player;
pub use team::{Side, Team};
