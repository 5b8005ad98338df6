//! The battle state machine
//!
//! OpeningVolley -> RoundLoop -> Resolved. The opening exchange is ranged
//! units only and does not count as a round; the main loop runs simultaneous
//! rounds until one side is gone or the draw valve trips at `MAX_ROUNDS`.
//!
//! Each side is tracked as two live buckets: the merged allied armies, which
//! fight at the side's assigned efficiency, and the garrison, which always
//! fights at 100%. Side-wide aggregates are re-merged from the live buckets
//! every round, so ratio rules and hit weights see the current picture.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::apportion::{apportion, ShareEntry};
use crate::battle::terrain::{Fortification, Terrain};
use crate::battle::volley::Volley;
use crate::units::{Composition, Force, UnitCatalog};

/// Draw valve: both sides still standing after this many rounds is a draw.
pub const MAX_ROUNDS: u32 = 1000;

/// Garrisons defend their homes at full readiness, whatever shape the field
/// armies are in.
const GARRISON_EFFICIENCY: u32 = 100;

/// Which side, if either, held the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Attackers,
    Defenders,
    Draw,
}

/// Resolution progress of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    OpeningVolley,
    RoundLoop,
    Resolved,
}

/// What one round cost each side, for the presentation layer's round-by-round
/// playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    /// Kills actually applied to the attacker side this round
    pub attacker_losses: Composition,
    /// Kills actually applied to the defender side this round
    pub defender_losses: Composition,
    pub attacker_remaining: u32,
    pub defender_remaining: u32,
}

/// Immutable outcome of one resolved battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatReport {
    pub winner: Winner,
    pub rounds: u32,
    pub attacker_losses: Composition,
    pub defender_losses: Composition,
    pub final_attacker: Composition,
    pub final_defender: Composition,
    /// What the pre-battle ranged exchange cost each side (`round` is 0).
    /// None when the battle was decided before any volley could fire.
    pub opening_volley: Option<RoundSummary>,
    pub round_log: Vec<RoundSummary>,
}

/// Live state for one side: allied bucket plus garrison bucket.
#[derive(Debug, Clone)]
struct SideState {
    allies: Composition,
    garrison: Composition,
    efficiency: u32,
}

impl SideState {
    fn new(force: &Force, efficiency: u32) -> SideState {
        SideState {
            allies: force.merged_armies(),
            garrison: force.garrison.clone().unwrap_or_default(),
            efficiency,
        }
    }

    /// Re-merge the live buckets into the side-wide aggregate.
    fn aggregate(&self) -> Composition {
        self.allies.merged_with(&self.garrison)
    }

    fn total(&self) -> u32 {
        self.allies.total().saturating_add(self.garrison.total())
    }

    /// Fire this side's two buckets as separate volleys (garrison at fixed
    /// 100% efficiency) and sum the kill maps.
    fn fire(
        &self,
        ranged_only: bool,
        side_aggregate: &Composition,
        target: &Composition,
        terrain: Terrain,
        target_fortification: Fortification,
        catalog: &UnitCatalog,
        rng: &mut impl Rng,
    ) -> Composition {
        let bucket = |comp: &Composition| {
            if ranged_only {
                comp.filter(|unit| catalog.is_ranged(unit))
            } else {
                comp.clone()
            }
        };

        let volley = |efficiency| Volley {
            side: side_aggregate,
            target,
            efficiency,
            terrain,
            fortification: target_fortification,
        };

        let mut kills = volley(self.efficiency).resolve(&bucket(&self.allies), catalog, rng);
        kills.add_all(&volley(GARRISON_EFFICIENCY).resolve(
            &bucket(&self.garrison),
            catalog,
            rng,
        ));
        kills
    }

    /// Split an aggregate kill map across the live buckets proportionally to
    /// their current counts, clamped to what each bucket holds.
    fn apply_kills(&mut self, kills: &Composition) -> Composition {
        let mut applied = Composition::new();
        for (unit, n) in kills.iter() {
            let entries = [
                ShareEntry::counted(self.allies.count(unit)),
                ShareEntry::counted(self.garrison.count(unit)),
            ];
            let allocation = apportion(n, &entries);
            let removed =
                self.allies.remove(unit, allocation[0]) + self.garrison.remove(unit, allocation[1]);
            applied.add(unit, removed);
        }
        applied
    }
}

/// A battle in progress. Construct with [`Battle::new`], then either call
/// [`Battle::resolve`] for a one-shot resolution or drive
/// [`Battle::opening_volley`] and [`Battle::step_round`] yourself (the
/// animated presentation mode does the latter, pausing between rounds).
#[derive(Debug, Clone)]
pub struct Battle<'a> {
    catalog: &'a UnitCatalog,
    attacker: SideState,
    defender: SideState,
    terrain: Terrain,
    fortification: Fortification,
    original_attacker: Composition,
    original_defender: Composition,
    rounds: u32,
    phase: BattlePhase,
    opening_log: Option<RoundSummary>,
    round_log: Vec<RoundSummary>,
}

impl<'a> Battle<'a> {
    pub fn new(
        attackers: &Force,
        defenders: &Force,
        attacker_efficiency: u32,
        defender_efficiency: u32,
        terrain: Terrain,
        fortification: Fortification,
        catalog: &'a UnitCatalog,
    ) -> Battle<'a> {
        let attacker = SideState::new(attackers, attacker_efficiency);
        let defender = SideState::new(defenders, defender_efficiency);
        let original_attacker = attacker.aggregate();
        let original_defender = defender.aggregate();
        let phase = if attacker.total() == 0 || defender.total() == 0 {
            // Nothing to fight: resolve immediately with zero rounds.
            BattlePhase::Resolved
        } else {
            BattlePhase::OpeningVolley
        };
        Battle {
            catalog,
            attacker,
            defender,
            terrain,
            fortification,
            original_attacker,
            original_defender,
            rounds: 0,
            phase,
            opening_log: None,
            round_log: Vec::new(),
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// The pre-battle exchange: ranged units only, both sides firing
    /// simultaneously. Runs at most once and does not count as a round.
    pub fn opening_volley(&mut self, rng: &mut impl Rng) {
        if self.phase != BattlePhase::OpeningVolley {
            return;
        }
        let (on_defender, on_attacker) = self.exchange(true, rng);
        let defender_losses = self.defender.apply_kills(&on_defender);
        let attacker_losses = self.attacker.apply_kills(&on_attacker);
        tracing::debug!(
            attacker_remaining = self.attacker.total(),
            defender_remaining = self.defender.total(),
            "opening volley"
        );
        self.opening_log = Some(RoundSummary {
            round: 0,
            attacker_losses,
            defender_losses,
            attacker_remaining: self.attacker.total(),
            defender_remaining: self.defender.total(),
        });
        self.phase = if self.decided() {
            BattlePhase::Resolved
        } else {
            BattlePhase::RoundLoop
        };
    }

    /// One simultaneous main-loop round. Returns true while the battle
    /// remains undecided (the caller may keep stepping).
    pub fn step_round(&mut self, rng: &mut impl Rng) -> bool {
        if self.phase != BattlePhase::RoundLoop {
            return false;
        }
        self.rounds += 1;

        let (on_defender, on_attacker) = self.exchange(false, rng);
        let defender_losses = self.defender.apply_kills(&on_defender);
        let attacker_losses = self.attacker.apply_kills(&on_attacker);

        tracing::debug!(
            round = self.rounds,
            attacker_remaining = self.attacker.total(),
            defender_remaining = self.defender.total(),
            "round resolved"
        );
        self.round_log.push(RoundSummary {
            round: self.rounds,
            attacker_losses,
            defender_losses,
            attacker_remaining: self.attacker.total(),
            defender_remaining: self.defender.total(),
        });

        if self.decided() || self.rounds >= MAX_ROUNDS {
            self.phase = BattlePhase::Resolved;
        }
        self.phase == BattlePhase::RoundLoop
    }

    /// Compute both sides' kill maps from the same pre-exchange snapshots,
    /// so neither side's losses dampen its own output this exchange.
    fn exchange(&self, ranged_only: bool, rng: &mut impl Rng) -> (Composition, Composition) {
        let attacker_aggregate = self.attacker.aggregate();
        let defender_aggregate = self.defender.aggregate();

        let on_defender = self.attacker.fire(
            ranged_only,
            &attacker_aggregate,
            &defender_aggregate,
            self.terrain,
            self.fortification,
            self.catalog,
            rng,
        );
        let on_attacker = self.defender.fire(
            ranged_only,
            &defender_aggregate,
            &attacker_aggregate,
            self.terrain,
            // The works protect the defended location, not the besiegers.
            Fortification::None,
            self.catalog,
            rng,
        );
        (on_defender, on_attacker)
    }

    fn decided(&self) -> bool {
        self.attacker.total() == 0 || self.defender.total() == 0
    }

    /// Run the whole battle to completion and produce the report.
    pub fn resolve(mut self, rng: &mut impl Rng) -> CombatReport {
        self.opening_volley(rng);
        while self.step_round(rng) {}
        self.report()
    }

    /// Snapshot the outcome. Winner is judged from current totals; a battle
    /// still in progress (or stopped at the round cap) reads as a draw.
    pub fn report(&self) -> CombatReport {
        let final_attacker = self.attacker.aggregate();
        let final_defender = self.defender.aggregate();
        let winner = match (final_attacker.total() > 0, final_defender.total() > 0) {
            (true, false) => Winner::Attackers,
            (false, true) => Winner::Defenders,
            _ => Winner::Draw,
        };
        CombatReport {
            winner,
            rounds: self.rounds,
            attacker_losses: final_attacker.losses_since(&self.original_attacker),
            defender_losses: final_defender.losses_since(&self.original_defender),
            final_attacker,
            final_defender,
            opening_volley: self.opening_log.clone(),
            round_log: self.round_log.clone(),
        }
    }
}

/// One-shot resolution of a full battle.
#[allow(clippy::too_many_arguments)]
pub fn resolve_battle(
    attackers: &Force,
    defenders: &Force,
    attacker_efficiency: u32,
    defender_efficiency: u32,
    terrain: Terrain,
    fortification: Fortification,
    catalog: &UnitCatalog,
    rng: &mut impl Rng,
) -> CombatReport {
    Battle::new(
        attackers,
        defenders,
        attacker_efficiency,
        defender_efficiency,
        terrain,
        fortification,
        catalog,
    )
    .resolve(rng)
}
