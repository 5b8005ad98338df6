//! Static per-unit-type combat stats
//!
//! The catalog is externally supplied, read-only configuration: the built-in
//! table can be partially overridden from a TOML file keyed by unit name.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Result, WarhostError};
use crate::units::traits::{TraitFlag, TraitSet};
use crate::units::unit_type::UnitType;

/// Combat stats for one unit type. Percentages are 0-100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Percent chance per soldier to produce a hit, before defense
    pub attack: u32,
    /// Percent chance per incoming hit to be deflected
    pub defense: u32,
    #[serde(default)]
    pub traits: TraitSet,
}

/// Read-only lookup of per-unit-type combat stats and trait predicates.
#[derive(Debug, Clone)]
pub struct UnitCatalog {
    stats: [UnitStats; UnitType::COUNT],
}

impl Default for UnitCatalog {
    fn default() -> Self {
        use TraitFlag::*;
        let entry = |attack, defense, traits: &[TraitFlag]| UnitStats {
            attack,
            defense,
            traits: TraitSet::of(traits),
        };
        UnitCatalog {
            stats: [
                entry(5, 10, &[Unarmored]),                            // Levy
                entry(10, 25, &[LongSpears, LightArmor]),              // Spearmen
                entry(30, 40, &[MediumArmor]),                         // Swordsmen
                entry(25, 15, &[Ranged, Unarmored]),                   // Archers
                entry(20, 15, &[Ranged, ArmorPiercing, LightArmor]),   // Crossbowmen
                entry(30, 30, &[Mounted, Mobile, Flanker, LightArmor]), // LightCavalry
                entry(60, 60, &[Mounted, Charge, HeavyArmor]),         // Knights
                entry(65, 60, &[Mounted, Charge, MultiAttack, HeavyArmor]), // MountedKnights
                entry(80, 80, &[MultiAttack, HeavyArmor]),             // RoyalGuard
            ],
        }
    }
}

impl UnitCatalog {
    pub fn stats(&self, unit: UnitType) -> &UnitStats {
        &self.stats[unit.index()]
    }

    /// Replace the stats for one unit type (e.g. from scenario tuning).
    pub fn set_stats(&mut self, unit: UnitType, stats: UnitStats) {
        self.stats[unit.index()] = stats;
    }

    pub fn has_trait(&self, unit: UnitType, flag: TraitFlag) -> bool {
        self.stats(unit).traits.contains(flag)
    }

    pub fn is_ranged(&self, unit: UnitType) -> bool {
        self.has_trait(unit, TraitFlag::Ranged)
    }

    pub fn is_flanker(&self, unit: UnitType) -> bool {
        self.has_trait(unit, TraitFlag::Flanker)
    }

    pub fn is_mounted(&self, unit: UnitType) -> bool {
        self.has_trait(unit, TraitFlag::Mounted)
    }

    /// Parse a TOML document of per-unit overrides on top of the defaults.
    ///
    /// ```toml
    /// [archers]
    /// attack = 35
    /// defense = 15
    /// traits = ["ranged", "unarmored"]
    /// ```
    pub fn from_toml_str(text: &str) -> Result<UnitCatalog> {
        let overrides: HashMap<String, UnitStats> = toml::from_str(text)?;
        let mut catalog = UnitCatalog::default();
        for (name, stats) in overrides {
            let unit: UnitType = name.parse()?;
            catalog.stats[unit.index()] = stats;
        }
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<UnitCatalog> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        for unit in UnitType::ALL {
            let stats = self.stats(unit);
            if stats.attack > 200 {
                return Err(WarhostError::InvalidCatalog {
                    unit: unit.name().to_string(),
                    reason: format!("attack {} exceeds 200", stats.attack),
                });
            }
            if stats.defense > 200 {
                return Err(WarhostError::InvalidCatalog {
                    unit: unit.name().to_string(),
                    reason: format!("defense {} exceeds 200", stats.defense),
                });
            }
        }
        Ok(())
    }
}
