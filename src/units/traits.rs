//! Combat traits and per-unit-type trait sets
//!
//! A unit type owns a fixed set of traits; membership is a bit test, not a
//! list scan.

use serde::{Deserialize, Serialize};

/// A combat-modifying tag attached to a unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitFlag {
    /// May strike any defending type, including other ranged units
    Ranged,
    /// Doubles hits assigned to mounted targets
    LongSpears,
    Mobile,
    /// Ignores the ranged-screen rule when picking targets
    Flanker,
    /// Bonus attack chance on open ground against unfortified defenders
    Charge,
    /// Each soldier attacks twice per round
    MultiAttack,
    /// Halves the target's defense stat
    ArmorPiercing,
    /// Cavalry-class; vulnerable to long spears
    Mounted,
    Unarmored,
    LightArmor,
    MediumArmor,
    HeavyArmor,
}

impl TraitFlag {
    pub const ALL: [TraitFlag; 12] = [
        TraitFlag::Ranged,
        TraitFlag::LongSpears,
        TraitFlag::Mobile,
        TraitFlag::Flanker,
        TraitFlag::Charge,
        TraitFlag::MultiAttack,
        TraitFlag::ArmorPiercing,
        TraitFlag::Mounted,
        TraitFlag::Unarmored,
        TraitFlag::LightArmor,
        TraitFlag::MediumArmor,
        TraitFlag::HeavyArmor,
    ];

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Fixed trait set for a unit type, backed by a bitset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TraitFlag>", into = "Vec<TraitFlag>")]
pub struct TraitSet(u16);

impl TraitSet {
    pub const EMPTY: TraitSet = TraitSet(0);

    /// Build a set from a flag list (usable in `const` tables).
    pub const fn of(flags: &[TraitFlag]) -> TraitSet {
        let mut bits = 0u16;
        let mut i = 0;
        while i < flags.len() {
            bits |= flags[i].bit();
            i += 1;
        }
        TraitSet(bits)
    }

    pub const fn contains(self, flag: TraitFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: TraitFlag) {
        self.0 |= flag.bit();
    }

    pub fn iter(self) -> impl Iterator<Item = TraitFlag> {
        TraitFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl From<Vec<TraitFlag>> for TraitSet {
    fn from(flags: Vec<TraitFlag>) -> Self {
        let mut set = TraitSet::EMPTY;
        for flag in flags {
            set.insert(flag);
        }
        set
    }
}

impl From<TraitSet> for Vec<TraitFlag> {
    fn from(set: TraitSet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_set_membership() {
        const SET: TraitSet = TraitSet::of(&[TraitFlag::Ranged, TraitFlag::ArmorPiercing]);
        assert!(SET.contains(TraitFlag::Ranged));
        assert!(SET.contains(TraitFlag::ArmorPiercing));
        assert!(!SET.contains(TraitFlag::Mounted));
    }

    #[test]
    fn test_empty_set_contains_nothing() {
        for flag in TraitFlag::ALL {
            assert!(!TraitSet::EMPTY.contains(flag));
        }
    }

    #[test]
    fn test_insert_then_iter_roundtrip() {
        let mut set = TraitSet::EMPTY;
        set.insert(TraitFlag::Charge);
        set.insert(TraitFlag::Mounted);
        let flags: Vec<TraitFlag> = set.iter().collect();
        assert_eq!(flags, vec![TraitFlag::Charge, TraitFlag::Mounted]);
    }

    #[test]
    fn test_vec_conversion() {
        let set = TraitSet::from(vec![TraitFlag::LongSpears, TraitFlag::LightArmor]);
        let back: Vec<TraitFlag> = set.into();
        assert_eq!(back, vec![TraitFlag::LongSpears, TraitFlag::LightArmor]);
    }
}
