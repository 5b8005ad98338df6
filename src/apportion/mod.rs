//! Capped largest-remainder apportionment
//!
//! Turns an aggregate integer quantity into weighted, capped, integer
//! per-contributor shares: floor the exact proportional shares, then hand the
//! remainder out by descending fractional part, wrapping around past capped
//! contributors. The granted total is bounded by `min(total, sum of caps)`,
//! so the wraparound cannot spin forever.
//!
//! Used to split a round's kills between a side's allied and garrison
//! buckets, to disaggregate final battle losses across contributing armies,
//! and for any other proportional split with hard per-recipient caps.

use crate::units::{Composition, UnitType};

/// One contributor's claim: a proportional weight and a hard cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareEntry {
    pub weight: u64,
    pub cap: u32,
}

impl ShareEntry {
    pub fn new(weight: u64, cap: u32) -> ShareEntry {
        ShareEntry { weight, cap }
    }

    /// Weight and cap both equal to a live count - the shape every casualty
    /// split uses.
    pub fn counted(count: u32) -> ShareEntry {
        ShareEntry {
            weight: count as u64,
            cap: count,
        }
    }
}

/// Distribute `total` across the entries. The result sums to
/// `min(total, sum of caps)`, never exceeds any entry's cap, and tracks the
/// exact proportional shares as closely as integers permit. Zero total
/// weight falls back to an even split; fractional-part ties keep original
/// order.
pub fn apportion(total: u32, entries: &[ShareEntry]) -> Vec<u32> {
    if entries.is_empty() {
        return Vec::new();
    }
    let cap_sum: u64 = entries.iter().map(|e| e.cap as u64).sum();
    let goal = (total as u64).min(cap_sum) as u32;
    if goal == 0 {
        return vec![0; entries.len()];
    }

    let weight_sum: u64 = entries.iter().map(|e| e.weight).sum();
    if weight_sum == 0 {
        // No weights to respect: share evenly instead of dividing by zero.
        tracing::trace!(total, "apportion fallback to even split");
        let even: Vec<ShareEntry> = entries
            .iter()
            .map(|e| ShareEntry::new(1, e.cap))
            .collect();
        return apportion(total, &even);
    }

    // Floor of each exact share, and its remainder for the tie-break order.
    let mut allocation = vec![0u32; entries.len()];
    let mut remainders = vec![0u128; entries.len()];
    let mut granted: u32 = 0;
    for (i, entry) in entries.iter().enumerate() {
        let numerator = total as u128 * entry.weight as u128;
        let floor = (numerator / weight_sum as u128) as u32;
        remainders[i] = numerator % weight_sum as u128;
        allocation[i] = floor.min(entry.cap);
        granted += allocation[i];
    }

    // Largest remainder first; stable sort keeps ties in original order.
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|a, b| remainders[*b].cmp(&remainders[*a]));

    // Wraparound passes over still-uncapped entries. Bounded: `granted`
    // only grows toward `goal`, and goal never exceeds the cap sum, so a
    // pass that grants nothing means every entry is saturated.
    while granted < goal {
        let mut progressed = false;
        for &i in &order {
            if granted == goal {
                break;
            }
            if allocation[i] < entries[i].cap {
                allocation[i] += 1;
                granted += 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    allocation
}

/// Mutate each contributor in place by its apportioned share of the
/// aggregate losses, weighted by the contributor's own count of each unit
/// type and capped by the same. Returns the per-contributor deductions.
pub fn apply_losses<C: Contributor>(
    losses: &Composition,
    contributors: &mut [C],
) -> Vec<Composition> {
    let mut deductions = vec![Composition::new(); contributors.len()];
    for (unit, lost) in losses.iter() {
        let entries: Vec<ShareEntry> = contributors
            .iter()
            .map(|c| ShareEntry::counted(c.current_count(unit)))
            .collect();
        let allocation = apportion(lost, &entries);
        for (contributor, (deduction, share)) in contributors
            .iter_mut()
            .zip(deductions.iter_mut().zip(allocation))
        {
            let removed = contributor.remove(unit, share);
            deduction.add(unit, removed);
        }
    }
    deductions
}

/// A handle the loss apportioner can deduct from. Removal must clamp to the
/// available count and report what was actually removed.
pub trait Contributor {
    fn current_count(&self, unit: UnitType) -> u32;
    fn remove(&mut self, unit: UnitType, count: u32) -> u32;
}

impl Contributor for Composition {
    fn current_count(&self, unit: UnitType) -> u32 {
        self.count(unit)
    }

    fn remove(&mut self, unit: UnitType, count: u32) -> u32 {
        Composition::remove(self, unit, count)
    }
}
