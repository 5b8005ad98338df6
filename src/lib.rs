//! Warhost - stochastic mass-combat resolution for the campaign layer
//!
//! Resolves a battle between opposing forces (several allied armies plus an
//! optional garrison per side) as repeated simultaneous attack rounds, then
//! converts aggregate unit-type losses back into per-contributor deductions
//! with a capped largest-remainder apportionment.
//!
//! The whole crate is deterministic given a seed: every stochastic primitive
//! takes an explicit RNG handle, nothing draws from a global source.

pub mod apportion;
pub mod battle;
pub mod core;
pub mod units;
