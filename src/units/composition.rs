//! Count maps for soldiers per unit type
//!
//! A `Composition` is a flat array indexed by the closed `UnitType` enum, so
//! "absent key" ambiguity cannot arise: absent is zero. Counts never go
//! negative; removal clamps to what is actually present.

use serde::{Deserialize, Serialize};

use crate::units::unit_type::UnitType;

/// Soldiers per unit type for one contributor (army or garrison).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    counts: [u32; UnitType::COUNT],
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts(counts: &[(UnitType, u32)]) -> Self {
        let mut comp = Composition::new();
        for &(unit, n) in counts {
            comp.add(unit, n);
        }
        comp
    }

    pub fn count(&self, unit: UnitType) -> u32 {
        self.counts[unit.index()]
    }

    pub fn set(&mut self, unit: UnitType, count: u32) {
        self.counts[unit.index()] = count;
    }

    pub fn add(&mut self, unit: UnitType, count: u32) {
        let slot = &mut self.counts[unit.index()];
        *slot = slot.saturating_add(count);
    }

    /// Remove up to `count` soldiers of `unit`; returns the number actually
    /// removed (clamped to what is present).
    pub fn remove(&mut self, unit: UnitType, count: u32) -> u32 {
        let removed = self.counts[unit.index()].min(count);
        self.counts[unit.index()] -= removed;
        removed
    }

    pub fn total(&self) -> u32 {
        self.counts
            .iter()
            .fold(0u32, |sum, &n| sum.saturating_add(n))
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate unit types with a non-zero count.
    pub fn iter(&self) -> impl Iterator<Item = (UnitType, u32)> + '_ {
        UnitType::ALL
            .into_iter()
            .filter_map(move |u| (self.count(u) > 0).then(|| (u, self.count(u))))
    }

    /// Pure summation of several contributors into one aggregate.
    pub fn merge<'a>(parts: impl IntoIterator<Item = &'a Composition>) -> Composition {
        let mut merged = Composition::new();
        for part in parts {
            merged.add_all(part);
        }
        merged
    }

    pub fn add_all(&mut self, other: &Composition) {
        for unit in UnitType::ALL {
            self.add(unit, other.count(unit));
        }
    }

    pub fn merged_with(&self, other: &Composition) -> Composition {
        let mut merged = self.clone();
        merged.add_all(other);
        merged
    }

    /// Keep only the unit types accepted by the predicate.
    pub fn filter(&self, mut keep: impl FnMut(UnitType) -> bool) -> Composition {
        let mut filtered = Composition::new();
        for (unit, n) in self.iter() {
            if keep(unit) {
                filtered.set(unit, n);
            }
        }
        filtered
    }

    /// Per-type losses relative to an original snapshot of this composition.
    pub fn losses_since(&self, original: &Composition) -> Composition {
        let mut losses = Composition::new();
        for unit in UnitType::ALL {
            losses.set(unit, original.count(unit).saturating_sub(self.count(unit)));
        }
        losses
    }

    /// Apply a kill map in place, clamping each type to what is present.
    /// Returns the kills actually applied.
    pub fn apply_kills(&mut self, kills: &Composition) -> Composition {
        let mut applied = Composition::new();
        for (unit, n) in kills.iter() {
            applied.set(unit, self.remove(unit, n));
        }
        applied
    }
}

/// One side of a battle: ordered allied contributors plus an optional
/// garrison. The garrison always fights at 100% efficiency regardless of the
/// side's assigned efficiency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Force {
    pub armies: Vec<Composition>,
    pub garrison: Option<Composition>,
}

impl Force {
    pub fn from_armies(armies: Vec<Composition>) -> Self {
        Force { armies, garrison: None }
    }

    pub fn with_garrison(mut self, garrison: Composition) -> Self {
        self.garrison = Some(garrison);
        self
    }

    /// Aggregate of the allied armies only (garrison excluded).
    pub fn merged_armies(&self) -> Composition {
        Composition::merge(self.armies.iter())
    }

    pub fn total(&self) -> u32 {
        self.merged_armies()
            .total()
            .saturating_add(self.garrison.as_ref().map_or(0, Composition::total))
    }
}
