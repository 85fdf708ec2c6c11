//! Combat resolution keyed by the (attacker kind, defender kind) pair.
//!
//! The canonical policy is a fixed table. The dice contest is kept as a
//! configuration variant: only the one-sided table entries fight under it
//! (bears never fight bears), and a roll decides whether the defender dies.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::agent::Agent;
use super::events::KillEvent;
use super::kind::AgentKind;

/// How a fight between two hostile agents is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatPolicy {
    /// Outcome read straight from the matchup table.
    #[default]
    Matrix,
    /// Attacker and defender each roll a die; a strictly higher attacker roll
    /// kills the defender. Pairs the table marks [`Matchup::BothDie`] decline.
    DiceContest,
}

/// Table entry for one ordered pair of kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matchup {
    /// No fight takes place.
    Declines,
    /// The defender dies.
    DefenderDies,
    /// Both die.
    BothDie,
}

use Matchup::{BothDie, Declines, DefenderDies};

/// Rows are attackers, columns defenders, both in [`AgentKind::ALL`] order.
const MATCHUPS: [[Matchup; 3]; 3] = [
    // Bear attacks: Bear, Duck, Desman
    [BothDie, DefenderDies, DefenderDies],
    // Duck attacks nobody
    [Declines, Declines, Declines],
    // Desman attacks bears only
    [DefenderDies, Declines, Declines],
];

/// Looks up the table entry for `attacker` fighting `defender`.
pub fn matchup(attacker: AgentKind, defender: AgentKind) -> Matchup {
    MATCHUPS[attacker.index()][defender.index()]
}

/// Result of one resolver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FightOutcome {
    /// No fight took place and no state changed.
    Declined,
    /// A dice fight took place and the attacker lost; nobody died.
    Lost,
    /// The defender died.
    Kill(KillEvent),
}

impl FightOutcome {
    /// The kill event, if the fight ended in one.
    pub fn kill(&self) -> Option<&KillEvent> {
        match self {
            FightOutcome::Kill(event) => Some(event),
            _ => None,
        }
    }

    /// Whether the defender died.
    pub fn is_kill(&self) -> bool {
        matches!(self, FightOutcome::Kill(_))
    }
}

/// Resolves a fight started by `attacker` against `defender`.
///
/// Declines without touching either agent when one of them is already dead
/// or the pair is not hostile. The defender's death is claimed through
/// [`Agent::kill`], so when two resolvers race on the same target only the
/// first one records a kill; the second declines.
///
/// On a kill the attacker's subscribers are notified once with `won = true`
/// and exactly one [`KillEvent`] is returned. In a mutual kill the attacker is
/// named killer and dies after the defender.
pub fn resolve(attacker: &Agent, defender: &Agent, policy: CombatPolicy) -> FightOutcome {
    if !attacker.is_alive() || !defender.is_alive() {
        return FightOutcome::Declined;
    }

    let entry = matchup(attacker.kind(), defender.kind());
    if entry == Declines || (policy == CombatPolicy::DiceContest && entry == BothDie) {
        return FightOutcome::Declined;
    }

    let mutual = match policy {
        CombatPolicy::Matrix => entry == BothDie,
        CombatPolicy::DiceContest => {
            let attack = attacker.roll_dice();
            let defense = defender.roll_dice();
            trace!(
                attacker = attacker.name(),
                attack,
                defender = defender.name(),
                defense,
                "dice contest"
            );
            if attack <= defense {
                if !defender.is_alive() {
                    return FightOutcome::Declined;
                }
                attacker.notify_fight(defender, false);
                return FightOutcome::Lost;
            }
            false
        }
    };

    if !defender.kill() {
        return FightOutcome::Declined;
    }
    if mutual {
        attacker.kill();
    }

    attacker.notify_fight(defender, true);
    FightOutcome::Kill(KillEvent {
        killer: attacker.name().to_string(),
        victim: defender.name().to_string(),
        mutual,
    })
}
