//! Target eligibility per attacking unit type
//!
//! Ranged attackers and flankers may strike anything. Everyone else can only
//! reach the enemy's ranged units once the attacking side's melee mass
//! outnumbers the defending screen three to one, re-checked against live
//! counts every round.

use crate::units::{Composition, UnitCatalog, UnitType};

/// A side's non-ranged total must be at least this multiple of the enemy's
/// non-ranged total before its melee can reach the enemy's ranged lines.
pub const RANGED_SCREEN_RATIO: u32 = 3;

/// Total soldiers without the ranged trait in an aggregate.
pub fn non_ranged_total(aggregate: &Composition, catalog: &UnitCatalog) -> u32 {
    aggregate
        .iter()
        .filter(|(unit, _)| !catalog.is_ranged(*unit))
        .map(|(_, n)| n)
        .sum()
}

/// Defending unit types the given attacking type may strike this round.
///
/// Both aggregates must be the full live side-wide pictures: the 3:1 screen
/// rule is evaluated over entire sides, not per unit type.
pub fn eligible_targets(
    attacker: UnitType,
    attacker_aggregate: &Composition,
    defender_aggregate: &Composition,
    catalog: &UnitCatalog,
) -> Vec<UnitType> {
    let hits_anything = catalog.is_ranged(attacker) || catalog.is_flanker(attacker);
    let screen_broken = non_ranged_total(attacker_aggregate, catalog)
        >= RANGED_SCREEN_RATIO * non_ranged_total(defender_aggregate, catalog);

    defender_aggregate
        .iter()
        .filter(|(defender, _)| hits_anything || !catalog.is_ranged(*defender) || screen_broken)
        .map(|(defender, _)| defender)
        .collect()
}
