//! Roster resolution for parsed turbo commands.
//!
//! Jersey numbers are only unique within a team, so a bare number can be
//! ambiguous. The tie-break is explicit and documented: the home team is
//! searched first. A number present on *both* teams without a prefix
//! resolves to home but is flagged `needs_team_prefix`, and execution is
//! blocked until the operator disambiguates.

use serde::Serialize;
use thiserror::Error;

use super::codes::{build_event_data, ActionKind};
use super::parser::TurboParseResult;
use crate::models::{EventData, EventStamp, Match, MatchEvent, Side};

/// A jersey number pinned to a concrete player on a concrete team.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlayerRef {
    pub side: Side,
    pub team_id: String,
    pub player_id: String,
    pub name: String,
    pub jersey: u8,
}

/// A turbo command with its jersey numbers resolved against the roster.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolvedCommand {
    pub player: PlayerRef,
    pub action: Option<ActionKind>,
    pub outcome_index: Option<u8>,
    pub recipient: Option<PlayerRef>,
    /// Jersey exists on both teams and no prefix was typed.
    pub needs_team_prefix: bool,
    pub recipient_needs_team_prefix: bool,
    /// Parse-level validity of the source command.
    pub complete: bool,
}

impl ResolvedCommand {
    /// Execution stays blocked while the command is incomplete or any
    /// jersey number is ambiguous.
    pub fn execution_blocked(&self) -> bool {
        !self.complete || self.needs_team_prefix || self.recipient_needs_team_prefix
    }

    /// Normalized payload builder: produce the event this command stands
    /// for, or `None` while execution is blocked.
    pub fn to_event(&self, stamp: &EventStamp) -> Option<MatchEvent> {
        if self.execution_blocked() {
            return None;
        }
        let action = self.action?;
        let mut data = build_event_data(action, self.outcome_index);
        if let EventData::Pass { receiver_id, receiver_name, .. } = &mut data {
            if let Some(recipient) = &self.recipient {
                *receiver_id = Some(recipient.player_id.clone());
                *receiver_name = Some(recipient.name.clone());
            }
        }
        Some(MatchEvent::new(
            stamp,
            &self.player.team_id,
            Some(self.player.player_id.as_str()),
            data,
        ))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("command not parsed far enough to resolve: {reason}")]
    NotParsed { reason: String },
    #[error("no player wears {jersey} on the {side:?} team")]
    JerseyNotFoundOnSide { jersey: u8, side: Side },
    #[error("no player wears {jersey} on either team")]
    JerseyNotFound { jersey: u8 },
    #[error("no recipient wears {jersey}")]
    RecipientNotFound { jersey: u8 },
}

struct Lookup {
    player: PlayerRef,
    ambiguous: bool,
}

fn lookup_jersey(m: &Match, jersey: u8, prefix: Option<Side>) -> Option<Lookup> {
    let make_ref = |side: Side| -> Option<PlayerRef> {
        let team = m.team(side);
        team.player_by_jersey(jersey).map(|p| PlayerRef {
            side,
            team_id: team.id.clone(),
            player_id: p.id.clone(),
            name: p.name.clone(),
            jersey,
        })
    };

    match prefix {
        Some(side) => make_ref(side).map(|player| Lookup { player, ambiguous: false }),
        None => {
            let sides = m.sides_with_jersey(jersey);
            // Home-first tie-break, by policy rather than iteration order.
            let player = make_ref(*sides.first()?)?;
            Some(Lookup { player, ambiguous: sides.len() > 1 })
        }
    }
}

/// Resolve a parse result against the roster. Works on partial results
/// too (anything with a jersey), so the ambiguity flag can surface while
/// the operator is still typing.
pub fn resolve(result: &TurboParseResult, m: &Match) -> Result<ResolvedCommand, ResolveError> {
    let Some(jersey) = result.jersey else {
        return Err(ResolveError::NotParsed {
            reason: result.error.clone().unwrap_or_else(|| "no jersey number".to_string()),
        });
    };

    let actor = lookup_jersey(m, jersey, result.team).ok_or(match result.team {
        Some(side) => ResolveError::JerseyNotFoundOnSide { jersey, side },
        None => ResolveError::JerseyNotFound { jersey },
    })?;

    let mut recipient = None;
    let mut recipient_ambiguous = false;
    if let Some(recipient_jersey) = result.recipient_jersey {
        let found = lookup_jersey(m, recipient_jersey, result.recipient_team)
            .ok_or(ResolveError::RecipientNotFound { jersey: recipient_jersey })?;
        recipient_ambiguous = found.ambiguous;
        recipient = Some(found.player);
    }

    Ok(ResolvedCommand {
        player: actor.player,
        action: result.action,
        outcome_index: result.outcome_index,
        recipient,
        needs_team_prefix: actor.ambiguous,
        recipient_needs_team_prefix: recipient_ambiguous,
        complete: result.valid,
    })
}
