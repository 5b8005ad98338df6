//! The closed roster of military unit types
//!
//! The enumeration is fixed so count maps can be flat arrays indexed by
//! discriminant; an absent type is simply a zero slot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::WarhostError;

/// Type of military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Levy,           // Unarmored rabble, cheap and plentiful
    Spearmen,       // Anti-cavalry, defensive
    Swordsmen,      // Standard foot soldiers
    Archers,        // Ranged, fragile in melee
    Crossbowmen,    // Ranged, punches through armor
    LightCavalry,   // Fast, flanks around battle lines
    Knights,        // Shock cavalry, armored
    MountedKnights, // Elite shock cavalry
    RoyalGuard,     // Household elite, relentless
}

impl UnitType {
    pub const COUNT: usize = 9;

    pub const ALL: [UnitType; Self::COUNT] = [
        UnitType::Levy,
        UnitType::Spearmen,
        UnitType::Swordsmen,
        UnitType::Archers,
        UnitType::Crossbowmen,
        UnitType::LightCavalry,
        UnitType::Knights,
        UnitType::MountedKnights,
        UnitType::RoyalGuard,
    ];

    /// Stable array index for this type.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            UnitType::Levy => "levy",
            UnitType::Spearmen => "spearmen",
            UnitType::Swordsmen => "swordsmen",
            UnitType::Archers => "archers",
            UnitType::Crossbowmen => "crossbowmen",
            UnitType::LightCavalry => "light_cavalry",
            UnitType::Knights => "knights",
            UnitType::MountedKnights => "mounted_knights",
            UnitType::RoyalGuard => "royal_guard",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitType {
    type Err = WarhostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitType::ALL
            .into_iter()
            .find(|u| u.name() == s)
            .ok_or_else(|| WarhostError::UnknownUnitType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_index() {
        for (i, unit) in UnitType::ALL.into_iter().enumerate() {
            assert_eq!(unit.index(), i);
        }
        assert_eq!(UnitType::ALL.len(), UnitType::COUNT);
    }

    #[test]
    fn test_name_roundtrip() {
        for unit in UnitType::ALL {
            assert_eq!(unit.name().parse::<UnitType>().unwrap(), unit);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert!("siege_tower".parse::<UnitType>().is_err());
    }
}
