//! Battle resolution - the stochastic multi-round combat core
//!
//! One battle is an opening ranged volley followed by simultaneous attack
//! rounds until a side is eliminated (or the draw valve trips). All
//! randomness flows through an injected RNG, so identical inputs and seed
//! give identical reports.

pub mod resolver;
pub mod sampling;
pub mod targeting;
pub mod terrain;
pub mod volley;

pub use resolver::{resolve_battle, Battle, BattlePhase, CombatReport, RoundSummary, Winner, MAX_ROUNDS};
pub use targeting::{eligible_targets, non_ranged_total, RANGED_SCREEN_RATIO};
pub use terrain::{Fortification, Terrain, CHARGE_BONUS};
pub use volley::Volley;
