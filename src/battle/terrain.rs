//! Battlefield terrain and fortification modifiers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::WarhostError;

/// Extra attack-chance multiplier for charging units on open ground:
/// chance is scaled by `1 + CHARGE_BONUS`.
pub const CHARGE_BONUS: f64 = 0.5;

/// Terrain of the region being fought over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Grassland,
    Forest,
    Hills,
    Swamp,
    Mountains,
}

impl Terrain {
    /// Only open ground leaves room for a cavalry charge to develop.
    pub fn allows_charge(self) -> bool {
        matches!(self, Terrain::Grassland)
    }
}

impl FromStr for Terrain {
    type Err = WarhostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grassland" => Ok(Terrain::Grassland),
            "forest" => Ok(Terrain::Forest),
            "hills" => Ok(Terrain::Hills),
            "swamp" => Ok(Terrain::Swamp),
            "mountains" => Ok(Terrain::Mountains),
            other => Err(WarhostError::UnknownTerrain(other.to_string())),
        }
    }
}

/// Fortification protecting the defended location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Fortification {
    #[default]
    None,
    Palisade,
    Keep,
    Castle,
}

impl Fortification {
    /// Percent of incoming hits absorbed by the works before armor matters.
    pub fn hit_avoidance_percent(self) -> u32 {
        match self {
            Fortification::None => 0,
            Fortification::Palisade => 15,
            Fortification::Keep => 25,
            Fortification::Castle => 40,
        }
    }

    pub fn is_present(self) -> bool {
        !matches!(self, Fortification::None)
    }
}

impl FromStr for Fortification {
    type Err = WarhostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Fortification::None),
            "palisade" => Ok(Fortification::Palisade),
            "keep" => Ok(Fortification::Keep),
            "castle" => Ok(Fortification::Castle),
            other => Err(WarhostError::UnknownFortification(other.to_string())),
        }
    }
}

/// Attack-chance multiplier for a charging unit. The charge only counts on
/// open terrain against an unfortified defender.
pub fn charge_multiplier(terrain: Terrain, fortification: Fortification) -> f64 {
    if terrain.allows_charge() && !fortification.is_present() {
        1.0 + CHARGE_BONUS
    } else {
        1.0
    }
}
