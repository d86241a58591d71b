//! Action flow: the selection state machine that turns player, action,
//! destination, outcome, and recipient picks into dispatched events.
//!
//! The machine is an explicit state object driven by a `FlowInput`
//! command stream from the host. Transitions are pure: `(step, input)`
//! produces the next step plus a list of effects, which the engine then
//! performs against the injected ports. Within one gesture at most one
//! primary event and one synthetic follow-up (escalation red, auto
//! corner) are emitted, synthetic strictly after primary.

pub mod cards;
pub mod inference;

use std::collections::HashMap;

use crate::clock::PeriodClockManager;
use crate::geometry::{FieldCoordinate, OutEdge, PitchBounds};
use crate::models::{
    CardKind, CornerAward, CornerReason, EventData, EventStamp, EventType, FoulOutcome, Match,
    MatchEvent, PassOutcome, SetPieceKind, ShotOutcome, Side,
};
use crate::ports::{EventSink, IneffectiveTimeSignal, TimeOffTrigger};
use crate::turbo::codes::{build_event_data, ActionKind};

pub use cards::CardLedger;
pub use inference::{
    corner_reason, infer_duel, infer_pass, infer_shot, own_defended_edge, DestinationTarget,
};

/// The acting player, captured at selection time.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedPlayer {
    pub side: Side,
    pub team_id: String,
    pub player_id: String,
    pub name: String,
    pub jersey: u8,
    pub is_goalkeeper: bool,
}

impl SelectedPlayer {
    fn from_roster(m: &Match, side: Side, player_id: &str) -> Option<Self> {
        let team = m.team(side);
        let player = team.player_by_id(player_id)?;
        Some(Self {
            side,
            team_id: team.id.clone(),
            player_id: player.id.clone(),
            name: player.name.clone(),
            jersey: player.jersey_number,
            is_goalkeeper: player.is_goalkeeper(),
        })
    }
}

/// Actions available in the field-anchor popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Pass,
    Shot,
    /// Immediate shot on target, no destination step.
    DirectShot,
    /// Immediate goal, no destination step.
    Goal,
    Duel,
    Foul,
    Card,
    /// Immediate offside, no destination step.
    Offside,
    Corner,
    FreeKick,
    ThrowIn,
    GoalKick,
    Penalty,
}

impl QuickAction {
    pub fn action_kind(self) -> ActionKind {
        match self {
            QuickAction::Pass => ActionKind::Pass,
            QuickAction::Shot | QuickAction::DirectShot | QuickAction::Goal => ActionKind::Shot,
            QuickAction::Duel => ActionKind::Duel,
            QuickAction::Foul => ActionKind::Foul,
            QuickAction::Card => ActionKind::Card,
            QuickAction::Offside => ActionKind::Offside,
            QuickAction::Corner => ActionKind::Corner,
            QuickAction::FreeKick => ActionKind::FreeKick,
            QuickAction::ThrowIn => ActionKind::ThrowIn,
            QuickAction::GoalKick => ActionKind::GoalKick,
            QuickAction::Penalty => ActionKind::Penalty,
        }
    }
}

/// Where the machine currently is in the selection sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionStep {
    #[default]
    SelectPlayer,
    SelectAction {
        player: SelectedPlayer,
    },
    SelectQuickAction {
        player: SelectedPlayer,
        anchor: FieldCoordinate,
    },
    SelectDestination {
        player: SelectedPlayer,
        quick: QuickAction,
        anchor: FieldCoordinate,
    },
    SelectOutcome {
        player: SelectedPlayer,
        action: ActionKind,
    },
    SelectRecipient {
        player: SelectedPlayer,
        action: ActionKind,
        outcome_index: u8,
    },
}

/// One discrete operator input, supplied by the host's input channel.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowInput {
    /// Roster entry or pitch-diagram player tap. An anchor point enters
    /// field mode (quick actions); without one, the full action list.
    TapPlayer {
        side: Side,
        player_id: String,
        anchor: Option<(f32, f32)>,
    },
    PickAction(ActionKind),
    PickQuickAction(QuickAction),
    TapDestination {
        x_percent: f32,
        y_percent: f32,
        target: Option<DestinationTarget>,
    },
    /// Synthetic boundary button for balls that left the pitch.
    EdgeTap(OutEdge),
    /// 1-based index into the pending action's outcome table.
    PickOutcome(u8),
    PickRecipient {
        player_id: String,
    },
    Cancel,
}

/// Effects produced by a transition, performed in order by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEffect {
    Emit(MatchEvent),
    TimeOff { team_id: String, trigger: TimeOffTrigger },
}

struct FlowContext<'a> {
    m: &'a Match,
    stamp: EventStamp,
    cards: &'a CardLedger,
    bounds: &'a PitchBounds,
}

impl FlowContext<'_> {
    fn opponent_team_id(&self, player: &SelectedPlayer) -> String {
        self.m.team(player.side.opponent()).id.clone()
    }

    fn primary(&self, player: &SelectedPlayer, data: EventData) -> MatchEvent {
        MatchEvent::new(&self.stamp, &player.team_id, Some(&player.player_id), data)
    }

    fn corner_event(
        &self,
        player: &SelectedPlayer,
        reason: CornerReason,
        source: EventType,
        coord: &FieldCoordinate,
    ) -> MatchEvent {
        MatchEvent::new(
            &self.stamp,
            &self.opponent_team_id(player),
            None,
            EventData::SetPiece {
                set_piece: SetPieceKind::Corner,
                penalty_outcome: None,
                corner_award: Some(CornerAward { reason, source_event_type: source }),
            },
        )
        .with_location(coord.point)
    }
}

/// Pure transition function: `(step, input)` to `(next step, effects)`.
fn transition(
    step: SelectionStep,
    input: FlowInput,
    ctx: &FlowContext,
) -> (SelectionStep, Vec<FlowEffect>) {
    use SelectionStep as S;

    match (step, input) {
        (_, FlowInput::Cancel) => (S::SelectPlayer, Vec::new()),

        (step, FlowInput::TapPlayer { side, player_id, anchor }) => {
            let Some(player) = SelectedPlayer::from_roster(ctx.m, side, &player_id) else {
                return (step, Vec::new());
            };
            // Sent-off players are not selectable.
            if ctx.cards.is_expelled(&player.player_id) {
                return (step, Vec::new());
            }
            match anchor {
                Some((x, y)) => {
                    (S::SelectQuickAction { player, anchor: ctx.bounds.resolve(x, y) }, Vec::new())
                }
                None => (S::SelectAction { player }, Vec::new()),
            }
        }

        (S::SelectAction { player }, FlowInput::PickAction(action)) => {
            if action.outcomes().is_empty() {
                let effects = dispatch_listed(ctx, &player, action, None, None);
                (S::SelectPlayer, effects)
            } else {
                (S::SelectOutcome { player, action }, Vec::new())
            }
        }

        (S::SelectQuickAction { player, anchor }, FlowInput::PickQuickAction(quick)) => {
            match quick {
                QuickAction::DirectShot => {
                    let effects = dispatch_immediate_shot(ctx, &player, ShotOutcome::OnTarget, &anchor);
                    (S::SelectPlayer, effects)
                }
                QuickAction::Goal => {
                    let effects = dispatch_immediate_shot(ctx, &player, ShotOutcome::Goal, &anchor);
                    (S::SelectPlayer, effects)
                }
                QuickAction::Offside => {
                    let effects = dispatch_immediate_offside(ctx, &player, &anchor);
                    (S::SelectPlayer, effects)
                }
                // A card's outcome is always chosen explicitly.
                QuickAction::Card => {
                    (S::SelectOutcome { player, action: ActionKind::Card }, Vec::new())
                }
                other => (S::SelectDestination { player, quick: other, anchor }, Vec::new()),
            }
        }

        (
            S::SelectDestination { player, quick, anchor },
            FlowInput::TapDestination { x_percent, y_percent, target },
        ) => {
            let coord = ctx.bounds.resolve(x_percent, y_percent);
            let effects = dispatch_destination(ctx, &player, quick, &anchor, &coord, target.as_ref());
            (S::SelectPlayer, effects)
        }

        (S::SelectDestination { player, quick, anchor }, FlowInput::EdgeTap(edge)) => {
            let coord = ctx.bounds.edge_tap(edge);
            let effects = dispatch_destination(ctx, &player, quick, &anchor, &coord, None);
            (S::SelectPlayer, effects)
        }

        (S::SelectOutcome { player, action }, FlowInput::PickOutcome(index)) => {
            let table = action.outcomes();
            if index == 0 || index as usize > table.len() {
                return (S::SelectOutcome { player, action }, Vec::new());
            }
            if action == ActionKind::Card {
                let effects = dispatch_card(ctx, &player, index);
                (S::SelectPlayer, effects)
            } else if action.needs_recipient() {
                (S::SelectRecipient { player, action, outcome_index: index }, Vec::new())
            } else {
                let effects = dispatch_listed(ctx, &player, action, Some(index), None);
                (S::SelectPlayer, effects)
            }
        }

        (
            S::SelectRecipient { player, action, outcome_index },
            FlowInput::PickRecipient { player_id },
        ) => {
            // The receiver must be a teammate.
            let Some(recipient) = ctx.m.team(player.side).player_by_id(&player_id) else {
                return (S::SelectRecipient { player, action, outcome_index }, Vec::new());
            };
            let recipient = (recipient.id.clone(), recipient.name.clone());
            let effects = dispatch_listed(ctx, &player, action, Some(outcome_index), Some(recipient));
            (S::SelectPlayer, effects)
        }

        // Input does not apply to the current step.
        (step, _) => (step, Vec::new()),
    }
}

fn dispatch_immediate_shot(
    ctx: &FlowContext,
    player: &SelectedPlayer,
    outcome: ShotOutcome,
    anchor: &FieldCoordinate,
) -> Vec<FlowEffect> {
    let data = EventData::Shot { outcome: Some(outcome), corner_awarded: false };
    let mut effects =
        vec![FlowEffect::Emit(ctx.primary(player, data).with_location(anchor.point))];
    if outcome == ShotOutcome::Goal {
        effects.push(FlowEffect::TimeOff {
            team_id: ctx.opponent_team_id(player),
            trigger: TimeOffTrigger::Goal,
        });
    }
    effects
}

fn dispatch_immediate_offside(
    ctx: &FlowContext,
    player: &SelectedPlayer,
    anchor: &FieldCoordinate,
) -> Vec<FlowEffect> {
    vec![
        FlowEffect::Emit(ctx.primary(player, EventData::Offside).with_location(anchor.point)),
        FlowEffect::TimeOff {
            team_id: ctx.opponent_team_id(player),
            trigger: TimeOffTrigger::Offside,
        },
    ]
}

fn dispatch_card(ctx: &FlowContext, player: &SelectedPlayer, index: u8) -> Vec<FlowEffect> {
    let requested = match index {
        1 => CardKind::Yellow,
        2 => CardKind::YellowSecond,
        _ => CardKind::Red,
    };
    // Escalation: a yellow for a player already booked becomes a second
    // yellow, immediately followed by the red it implies.
    let (card, follow_up_red) = match requested {
        CardKind::Yellow if ctx.cards.yellow_count(&player.player_id) >= 1 => {
            (CardKind::YellowSecond, true)
        }
        CardKind::YellowSecond => (CardKind::YellowSecond, true),
        other => (other, false),
    };

    let mut effects = vec![FlowEffect::Emit(ctx.primary(player, EventData::Card { card }))];
    if follow_up_red {
        effects.push(FlowEffect::Emit(
            ctx.primary(player, EventData::Card { card: CardKind::Red }),
        ));
    }
    // Cards never trigger the ineffective-time callback.
    effects
}

/// Dispatch for list-mode actions and turbo-style explicit outcomes.
fn dispatch_listed(
    ctx: &FlowContext,
    player: &SelectedPlayer,
    action: ActionKind,
    outcome_index: Option<u8>,
    recipient: Option<(String, String)>,
) -> Vec<FlowEffect> {
    let mut data = build_event_data(action, outcome_index);
    if let EventData::Pass { receiver_id, receiver_name, .. } = &mut data {
        if let Some((id, name)) = recipient {
            *receiver_id = Some(id);
            *receiver_name = Some(name);
        }
    }

    let opponent = ctx.opponent_team_id(player);
    let trigger = match &data {
        EventData::FoulCommitted { outcome: FoulOutcome::Standard } => Some(TimeOffTrigger::Foul),
        EventData::Offside => Some(TimeOffTrigger::Offside),
        EventData::Pass { outcome: Some(PassOutcome::Out), .. } => Some(TimeOffTrigger::BallOut),
        data if data.is_goal() => Some(TimeOffTrigger::Goal),
        _ => None,
    };

    let mut effects = vec![FlowEffect::Emit(ctx.primary(player, data))];
    if let Some(trigger) = trigger {
        effects.push(FlowEffect::TimeOff { team_id: opponent, trigger });
    }
    effects
}

fn dispatch_destination(
    ctx: &FlowContext,
    player: &SelectedPlayer,
    quick: QuickAction,
    anchor: &FieldCoordinate,
    coord: &FieldCoordinate,
    target: Option<&DestinationTarget>,
) -> Vec<FlowEffect> {
    let mut effects = Vec::new();
    let opponent = ctx.opponent_team_id(player);

    match quick {
        QuickAction::Pass => {
            let inferred = infer_pass(player.side, coord, target);
            let data = EventData::Pass {
                outcome: Some(inferred.outcome),
                receiver_id: inferred.receiver.as_ref().map(|r| r.player_id.clone()),
                receiver_name: inferred.receiver.as_ref().map(|r| r.name.clone()),
                interceptor_id: inferred.interceptor_id.clone(),
                corner_awarded: inferred.corner.is_some(),
            };
            effects.push(FlowEffect::Emit(
                ctx.primary(player, data)
                    .with_location(anchor.point)
                    .with_end_location(coord.point),
            ));
            if let Some(reason) = inferred.corner {
                effects.push(FlowEffect::Emit(
                    ctx.corner_event(player, reason, EventType::Pass, coord),
                ));
            }
            // The restart goes to the opponent whether it is a corner,
            // a throw-in, or a goal kick.
            if inferred.corner.is_some() || inferred.outcome == PassOutcome::Out {
                effects.push(FlowEffect::TimeOff {
                    team_id: opponent,
                    trigger: TimeOffTrigger::BallOut,
                });
            }
        }
        QuickAction::Shot | QuickAction::DirectShot | QuickAction::Goal => {
            let inferred =
                infer_shot(player.side, coord, target, matches!(quick, QuickAction::Goal));
            let data = EventData::Shot {
                outcome: Some(inferred.outcome),
                corner_awarded: inferred.corner.is_some(),
            };
            effects.push(FlowEffect::Emit(
                ctx.primary(player, data)
                    .with_location(anchor.point)
                    .with_end_location(coord.point),
            ));
            if let Some(reason) = inferred.corner {
                effects.push(FlowEffect::Emit(
                    ctx.corner_event(player, reason, EventType::Shot, coord),
                ));
            }
            if inferred.outcome == ShotOutcome::Goal {
                effects.push(FlowEffect::TimeOff {
                    team_id: opponent,
                    trigger: TimeOffTrigger::Goal,
                });
            }
        }
        QuickAction::Duel => {
            let outcome = infer_duel(player.side, target);
            effects.push(FlowEffect::Emit(
                ctx.primary(player, EventData::Duel { outcome: Some(outcome) })
                    .with_location(anchor.point)
                    .with_end_location(coord.point),
            ));
        }
        QuickAction::Foul => {
            effects.push(FlowEffect::Emit(
                ctx.primary(player, EventData::FoulCommitted { outcome: FoulOutcome::Standard })
                    .with_location(anchor.point),
            ));
            effects.push(FlowEffect::TimeOff { team_id: opponent, trigger: TimeOffTrigger::Foul });
        }
        QuickAction::Corner
        | QuickAction::FreeKick
        | QuickAction::ThrowIn
        | QuickAction::GoalKick
        | QuickAction::Penalty => {
            let data = build_event_data(quick.action_kind(), None);
            effects.push(FlowEffect::Emit(
                ctx.primary(player, data)
                    .with_location(anchor.point)
                    .with_end_location(coord.point),
            ));
        }
        // Card and the immediate quick actions never reach the
        // destination step.
        QuickAction::Card | QuickAction::Offside => {}
    }
    effects
}

/// Per-team running event counts, the engine's example stat counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTally {
    counts: HashMap<EventType, u32>,
}

impl EventTally {
    pub fn count(&self, event_type: EventType) -> u32 {
        *self.counts.get(&event_type).unwrap_or(&0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    fn record(&mut self, event_type: EventType) {
        *self.counts.entry(event_type).or_insert(0) += 1;
    }
}

/// The selection state machine plus the per-match bookkeeping it needs:
/// discipline ledger, stat tallies, and the submission-in-flight flag.
#[derive(Debug, Default)]
pub struct ActionFlowEngine {
    step: SelectionStep,
    cards: CardLedger,
    tallies: HashMap<String, EventTally>,
    bounds: PitchBounds,
    submitting: bool,
    match_id: Option<String>,
}

impl ActionFlowEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(bounds: PitchBounds) -> Self {
        Self { bounds, ..Self::default() }
    }

    pub fn step(&self) -> &SelectionStep {
        &self.step
    }

    pub fn cancel(&mut self) {
        self.step = SelectionStep::SelectPlayer;
    }

    pub fn cards(&self) -> &CardLedger {
        &self.cards
    }

    pub fn tally(&self, team_id: &str) -> Option<&EventTally> {
        self.tallies.get(team_id)
    }

    /// Host marks the start of an async upload; dispatches are blocked
    /// until `complete_submission`.
    pub fn begin_submission(&mut self) {
        self.submitting = true;
    }

    pub fn complete_submission(&mut self) {
        self.submitting = false;
    }

    pub fn submission_in_flight(&self) -> bool {
        self.submitting
    }

    /// Feed one operator input through the machine, performing any
    /// resulting effects against the ports.
    ///
    /// Guard conditions (no match, submission in flight, expelled actor)
    /// silently drop the gesture: no event, no state change. Callers
    /// surface those as disabled affordances.
    pub fn handle(
        &mut self,
        m: Option<&Match>,
        clock: &PeriodClockManager,
        input: FlowInput,
        sink: &mut dyn EventSink,
        time_off: &mut dyn IneffectiveTimeSignal,
    ) {
        let Some(m) = m else {
            return;
        };
        self.sync_match(m);

        let ctx = FlowContext {
            m,
            stamp: clock.stamp(m),
            cards: &self.cards,
            bounds: &self.bounds,
        };
        let (next, effects) = transition(self.step.clone(), input, &ctx);

        if !effects.is_empty() {
            if self.submitting {
                log::debug!("flow: dispatch blocked, submission in flight");
                return;
            }
            let actor_expelled = effects.iter().any(|effect| match effect {
                FlowEffect::Emit(event) => event
                    .player_id
                    .as_deref()
                    .is_some_and(|pid| self.cards.is_expelled(pid)),
                FlowEffect::TimeOff { .. } => false,
            });
            if actor_expelled {
                return;
            }
        }

        self.step = next;
        for effect in effects {
            match effect {
                FlowEffect::Emit(event) => self.emit(m, event, sink),
                FlowEffect::TimeOff { team_id, trigger } => time_off.time_off(&team_id, trigger),
            }
        }
    }

    fn emit(&mut self, m: &Match, event: MatchEvent, sink: &mut dyn EventSink) {
        if !event.validate_against(m) {
            log::warn!(
                "flow: dropping event for unknown team/player ({}/{:?})",
                event.team_id,
                event.player_id
            );
            return;
        }
        // The discipline ledger drives local selection guards, so it
        // advances regardless of what the sink does with the event.
        if let EventData::Card { card } = &event.data {
            if let Some(player_id) = &event.player_id {
                self.cards.record(player_id, *card);
            }
        }

        log::info!("flow: dispatch {:?} for team {}", event.event_type, event.team_id);
        match sink.submit(&event) {
            // Tallies mirror the append-only log: only accepted events count.
            Ok(()) => {
                self.tallies.entry(event.team_id.clone()).or_default().record(event.event_type);
            }
            // Fire-and-forget: report once, no retry.
            Err(err) => {
                log::warn!("flow: event sink failed for {:?}: {}", event.event_type, err);
            }
        }
    }

    /// Switching matches clears every in-progress selection and the
    /// per-match ledgers.
    fn sync_match(&mut self, m: &Match) {
        if self.match_id.as_deref() != Some(m.id.as_str()) {
            self.match_id = Some(m.id.clone());
            self.step = SelectionStep::SelectPlayer;
            self.cards.reset();
            self.tallies.clear();
            self.submitting = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_fixtures::sample_match;
    use crate::models::MatchStatus;
    use crate::ports::{MemoryRoster, MemorySink, MemoryTimeOff, RosterProvider, SinkError};

    struct Rig {
        m: Match,
        clock: PeriodClockManager,
        engine: ActionFlowEngine,
        sink: MemorySink,
        time_off: MemoryTimeOff,
    }

    impl Rig {
        fn new() -> Self {
            let m = sample_match();
            let mut clock = PeriodClockManager::new();
            clock.reconstruct(&m);
            Self {
                m,
                clock,
                engine: ActionFlowEngine::new(),
                sink: MemorySink::default(),
                time_off: MemoryTimeOff::default(),
            }
        }

        fn feed(&mut self, input: FlowInput) {
            self.engine.handle(
                Some(&self.m),
                &self.clock,
                input,
                &mut self.sink,
                &mut self.time_off,
            );
        }

        fn tap_home(&mut self, player_id: &str) {
            self.feed(FlowInput::TapPlayer {
                side: Side::Home,
                player_id: player_id.to_string(),
                anchor: Some((30.0, 50.0)),
            });
        }

        fn away_target(&self, player_id: &str, gk: bool) -> DestinationTarget {
            DestinationTarget {
                side: Side::Away,
                player_id: player_id.to_string(),
                name: "Away".to_string(),
                is_goalkeeper: gk,
            }
        }
    }

    fn issue_yellow(rig: &mut Rig, player_id: &str) {
        rig.tap_home(player_id);
        rig.feed(FlowInput::PickQuickAction(QuickAction::Card));
        rig.feed(FlowInput::PickOutcome(1));
    }

    #[test]
    fn test_quick_goal_dispatches_immediately() {
        let mut rig = Rig::new();
        rig.tap_home("h9");
        rig.feed(FlowInput::PickQuickAction(QuickAction::Goal));

        assert_eq!(rig.sink.events.len(), 1);
        let event = &rig.sink.events[0];
        assert_eq!(event.event_type, EventType::Shot);
        assert!(matches!(
            event.data,
            EventData::Shot { outcome: Some(ShotOutcome::Goal), .. }
        ));
        assert_eq!(event.period, 1);
        assert_eq!(event.clock, "12:30");
        assert!(event.location.is_some());
        // Goal is its own trigger category, attributed to the restarting
        // (conceding) team.
        assert_eq!(rig.time_off.calls, vec![("team-away".to_string(), TimeOffTrigger::Goal)]);
        assert_eq!(*rig.engine.step(), SelectionStep::SelectPlayer);
    }

    #[test]
    fn test_quick_offside_dispatches_with_trigger() {
        let mut rig = Rig::new();
        rig.tap_home("h9");
        rig.feed(FlowInput::PickQuickAction(QuickAction::Offside));

        assert_eq!(rig.sink.events.len(), 1);
        assert_eq!(rig.sink.events[0].event_type, EventType::Offside);
        assert_eq!(rig.time_off.calls, vec![("team-away".to_string(), TimeOffTrigger::Offside)]);
    }

    #[test]
    fn test_card_escalation_sequence() {
        let mut rig = Rig::new();

        issue_yellow(&mut rig, "h10");
        assert_eq!(rig.sink.events.len(), 1);
        assert!(matches!(
            rig.sink.events[0].data,
            EventData::Card { card: CardKind::Yellow }
        ));

        // Second yellow for the same player: promoted, red follows.
        issue_yellow(&mut rig, "h10");
        assert_eq!(rig.sink.events.len(), 3);
        assert!(matches!(
            rig.sink.events[1].data,
            EventData::Card { card: CardKind::YellowSecond }
        ));
        assert!(matches!(rig.sink.events[2].data, EventData::Card { card: CardKind::Red }));
        assert!(rig.engine.cards().is_expelled("h10"));
        // Cards never raise the ineffective-time signal.
        assert!(rig.time_off.calls.is_empty());
    }

    #[test]
    fn test_expelled_player_not_selectable() {
        let mut rig = Rig::new();
        issue_yellow(&mut rig, "h10");
        issue_yellow(&mut rig, "h10");
        assert!(rig.engine.cards().is_expelled("h10"));

        rig.tap_home("h10");
        assert_eq!(*rig.engine.step(), SelectionStep::SelectPlayer);
        assert_eq!(rig.sink.events.len(), 3);
    }

    #[test]
    fn test_pass_out_own_edge_awards_corner() {
        let mut rig = Rig::new();
        rig.tap_home("h10");
        rig.feed(FlowInput::PickQuickAction(QuickAction::Pass));
        // Home defends the left edge.
        rig.feed(FlowInput::EdgeTap(OutEdge::Left));

        assert_eq!(rig.sink.events.len(), 2);
        let pass = &rig.sink.events[0];
        assert_eq!(pass.event_type, EventType::Pass);
        match &pass.data {
            EventData::Pass { outcome, corner_awarded, .. } => {
                assert_eq!(*outcome, Some(PassOutcome::Out));
                assert!(corner_awarded);
            }
            other => panic!("unexpected payload {:?}", other),
        }
        let corner = &rig.sink.events[1];
        assert_eq!(corner.event_type, EventType::SetPiece);
        assert_eq!(corner.team_id, "team-away");
        assert_eq!(corner.player_id, None);
        match &corner.data {
            EventData::SetPiece { set_piece, corner_award, .. } => {
                assert_eq!(*set_piece, SetPieceKind::Corner);
                let award = corner_award.as_ref().unwrap();
                assert_eq!(award.reason, CornerReason::OwnLineOut);
                assert_eq!(award.source_event_type, EventType::Pass);
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert_eq!(rig.time_off.calls, vec![("team-away".to_string(), TimeOffTrigger::BallOut)]);
    }

    #[test]
    fn test_pass_plain_out_no_corner() {
        let mut rig = Rig::new();
        rig.tap_home("h10");
        rig.feed(FlowInput::PickQuickAction(QuickAction::Pass));
        rig.feed(FlowInput::EdgeTap(OutEdge::Top));

        assert_eq!(rig.sink.events.len(), 1);
        assert_eq!(rig.time_off.calls, vec![("team-away".to_string(), TimeOffTrigger::BallOut)]);
    }

    #[test]
    fn test_pass_to_opponent_records_interceptor() {
        let mut rig = Rig::new();
        rig.tap_home("h10");
        rig.feed(FlowInput::PickQuickAction(QuickAction::Pass));
        let target = rig.away_target("a5", false);
        rig.feed(FlowInput::TapDestination { x_percent: 60.0, y_percent: 40.0, target: Some(target) });

        assert_eq!(rig.sink.events.len(), 1);
        match &rig.sink.events[0].data {
            EventData::Pass { outcome, interceptor_id, .. } => {
                assert_eq!(*outcome, Some(PassOutcome::Incomplete));
                assert_eq!(interceptor_id.as_deref(), Some("a5"));
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert!(rig.time_off.calls.is_empty());
    }

    #[test]
    fn test_shot_destination_inference() {
        // On the opposing keeper: saved.
        let mut rig = Rig::new();
        rig.tap_home("h9");
        rig.feed(FlowInput::PickQuickAction(QuickAction::Shot));
        let keeper = rig.away_target("a1", true);
        rig.feed(FlowInput::TapDestination { x_percent: 90.0, y_percent: 50.0, target: Some(keeper) });
        assert!(matches!(
            rig.sink.events[0].data,
            EventData::Shot { outcome: Some(ShotOutcome::Saved), .. }
        ));

        // On another opponent: blocked.
        rig.tap_home("h9");
        rig.feed(FlowInput::PickQuickAction(QuickAction::Shot));
        let defender = rig.away_target("a5", false);
        rig.feed(FlowInput::TapDestination { x_percent: 85.0, y_percent: 50.0, target: Some(defender) });
        assert!(matches!(
            rig.sink.events[1].data,
            EventData::Shot { outcome: Some(ShotOutcome::Blocked), .. }
        ));

        // Out of bounds: off target.
        rig.tap_home("h9");
        rig.feed(FlowInput::PickQuickAction(QuickAction::Shot));
        rig.feed(FlowInput::EdgeTap(OutEdge::Right));
        assert!(matches!(
            rig.sink.events[2].data,
            EventData::Shot { outcome: Some(ShotOutcome::OffTarget), .. }
        ));
    }

    #[test]
    fn test_foul_destination_triggers_time_off_for_opponent() {
        let mut rig = Rig::new();
        rig.tap_home("h10");
        rig.feed(FlowInput::PickQuickAction(QuickAction::Foul));
        rig.feed(FlowInput::TapDestination { x_percent: 40.0, y_percent: 60.0, target: None });

        assert_eq!(rig.sink.events[0].event_type, EventType::FoulCommitted);
        assert_eq!(rig.time_off.calls, vec![("team-away".to_string(), TimeOffTrigger::Foul)]);
    }

    #[test]
    fn test_list_mode_pass_with_recipient() {
        let mut rig = Rig::new();
        rig.feed(FlowInput::TapPlayer {
            side: Side::Home,
            player_id: "h10".to_string(),
            anchor: None,
        });
        assert!(matches!(*rig.engine.step(), SelectionStep::SelectAction { .. }));

        rig.feed(FlowInput::PickAction(ActionKind::Pass));
        assert!(matches!(*rig.engine.step(), SelectionStep::SelectOutcome { .. }));

        rig.feed(FlowInput::PickOutcome(1));
        assert!(matches!(*rig.engine.step(), SelectionStep::SelectRecipient { .. }));

        rig.feed(FlowInput::PickRecipient { player_id: "h7".to_string() });
        assert_eq!(rig.sink.events.len(), 1);
        match &rig.sink.events[0].data {
            EventData::Pass { outcome, receiver_id, .. } => {
                assert_eq!(*outcome, Some(PassOutcome::Complete));
                assert_eq!(receiver_id.as_deref(), Some("h7"));
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert_eq!(*rig.engine.step(), SelectionStep::SelectPlayer);
    }

    #[test]
    fn test_list_mode_recipient_must_be_teammate() {
        let mut rig = Rig::new();
        rig.feed(FlowInput::TapPlayer {
            side: Side::Home,
            player_id: "h10".to_string(),
            anchor: None,
        });
        rig.feed(FlowInput::PickAction(ActionKind::Pass));
        rig.feed(FlowInput::PickOutcome(1));
        rig.feed(FlowInput::PickRecipient { player_id: "a5".to_string() });

        assert!(rig.sink.events.is_empty());
        assert!(matches!(*rig.engine.step(), SelectionStep::SelectRecipient { .. }));
    }

    #[test]
    fn test_list_mode_action_without_outcomes_dispatches() {
        let mut rig = Rig::new();
        rig.feed(FlowInput::TapPlayer {
            side: Side::Home,
            player_id: "h7".to_string(),
            anchor: None,
        });
        rig.feed(FlowInput::PickAction(ActionKind::Interception));
        assert_eq!(rig.sink.events.len(), 1);
        assert_eq!(rig.sink.events[0].event_type, EventType::Interception);
    }

    #[test]
    fn test_submission_in_flight_blocks_dispatch() {
        let mut rig = Rig::new();
        rig.tap_home("h9");
        rig.engine.begin_submission();
        rig.feed(FlowInput::PickQuickAction(QuickAction::Goal));
        assert!(rig.sink.events.is_empty());
        // No state change either; the pick can be retried after the
        // upload completes.
        assert!(matches!(*rig.engine.step(), SelectionStep::SelectQuickAction { .. }));

        rig.engine.complete_submission();
        rig.feed(FlowInput::PickQuickAction(QuickAction::Goal));
        assert_eq!(rig.sink.events.len(), 1);
    }

    #[test]
    fn test_no_match_is_a_noop() {
        let mut rig = Rig::new();
        let input = FlowInput::TapPlayer {
            side: Side::Home,
            player_id: "h9".to_string(),
            anchor: None,
        };
        rig.engine.handle(None, &rig.clock, input, &mut rig.sink, &mut rig.time_off);
        assert_eq!(*rig.engine.step(), SelectionStep::SelectPlayer);
    }

    #[test]
    fn test_cancel_resets_selection() {
        let mut rig = Rig::new();
        rig.tap_home("h9");
        rig.feed(FlowInput::Cancel);
        assert_eq!(*rig.engine.step(), SelectionStep::SelectPlayer);
        assert!(rig.sink.events.is_empty());
    }

    #[test]
    fn test_match_switch_clears_state() {
        let mut rig = Rig::new();
        issue_yellow(&mut rig, "h10");
        rig.tap_home("h9");

        let mut other = sample_match();
        other.id = "match-2".to_string();
        other.status = MatchStatus::LiveFirstHalf;
        rig.engine.handle(
            Some(&other),
            &rig.clock,
            FlowInput::Cancel,
            &mut rig.sink,
            &mut rig.time_off,
        );
        assert_eq!(*rig.engine.step(), SelectionStep::SelectPlayer);
        assert_eq!(rig.engine.cards().yellow_count("h10"), 0);
        assert_eq!(rig.engine.tally("team-home"), None);
    }

    struct RejectingSink;

    impl EventSink for RejectingSink {
        fn submit(&mut self, _: &MatchEvent) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_engine_fed_through_roster_provider() {
        let roster = MemoryRoster::new(sample_match());
        let mut clock = PeriodClockManager::new();
        clock.reconstruct(roster.current_match().unwrap());

        let mut engine = ActionFlowEngine::new();
        let mut sink = MemorySink::default();
        let mut time_off = MemoryTimeOff::default();
        let inputs = [
            FlowInput::TapPlayer {
                side: Side::Home,
                player_id: "h9".to_string(),
                anchor: Some((30.0, 50.0)),
            },
            FlowInput::PickQuickAction(QuickAction::Goal),
        ];
        for input in inputs {
            engine.handle(roster.current_match(), &clock, input, &mut sink, &mut time_off);
        }
        assert_eq!(sink.events.len(), 1);

        // An empty provider makes every gesture a no-op.
        let empty = MemoryRoster::default();
        let input = FlowInput::TapPlayer {
            side: Side::Home,
            player_id: "h9".to_string(),
            anchor: None,
        };
        engine.handle(empty.current_match(), &clock, input, &mut sink, &mut time_off);
        assert_eq!(*engine.step(), SelectionStep::SelectPlayer);
    }

    #[test]
    fn test_rejected_submission_not_tallied() {
        let mut rig = Rig::new();
        let mut sink = RejectingSink;
        rig.engine.handle(
            Some(&rig.m),
            &rig.clock,
            FlowInput::TapPlayer {
                side: Side::Home,
                player_id: "h9".to_string(),
                anchor: Some((30.0, 50.0)),
            },
            &mut sink,
            &mut rig.time_off,
        );
        rig.engine.handle(
            Some(&rig.m),
            &rig.clock,
            FlowInput::PickQuickAction(QuickAction::Goal),
            &mut sink,
            &mut rig.time_off,
        );

        // The log never saw the event, so the counters must not either.
        assert_eq!(rig.engine.tally("team-home"), None);
        // The failure is reported once and not retried; the machine still
        // resets for the next gesture.
        assert_eq!(*rig.engine.step(), SelectionStep::SelectPlayer);
    }

    #[test]
    fn test_tally_counts_dispatches() {
        let mut rig = Rig::new();
        rig.tap_home("h9");
        rig.feed(FlowInput::PickQuickAction(QuickAction::Goal));
        rig.tap_home("h10");
        rig.feed(FlowInput::PickQuickAction(QuickAction::Pass));
        rig.feed(FlowInput::EdgeTap(OutEdge::Left));

        let home = rig.engine.tally("team-home").unwrap();
        assert_eq!(home.count(EventType::Shot), 1);
        assert_eq!(home.count(EventType::Pass), 1);
        // The synthetic corner counts for the awarded team.
        let away = rig.engine.tally("team-away").unwrap();
        assert_eq!(away.count(EventType::SetPiece), 1);
    }
}
