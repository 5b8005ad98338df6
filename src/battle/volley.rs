//! One simultaneous hit-to-kill exchange
//!
//! Shared by the pre-battle ranged volley and every main-loop round. A volley
//! is pure in its compositions: it reads fixed snapshots and mutates only the
//! RNG, returning a kill map for the caller to apply.

use rand::Rng;

use crate::battle::sampling::{assign_weighted, binomial, stochastic_round};
use crate::battle::targeting::eligible_targets;
use crate::battle::terrain::{charge_multiplier, Fortification, Terrain};
use crate::units::{Composition, TraitFlag, UnitCatalog, UnitType};

/// Hit multiplier long spears apply against mounted targets.
const LONG_SPEARS_MULTIPLIER: f64 = 2.0;

/// One side's attack against the other for a single exchange.
///
/// `side` is the full live aggregate of the firing side (the 3:1 screen rule
/// reads it), which may be wider than the bucket actually firing - e.g. a
/// garrison volley still counts its allied armies for the ratio.
/// `fortification` is whatever protects the *target* in this exchange.
#[derive(Debug, Clone, Copy)]
pub struct Volley<'a> {
    pub side: &'a Composition,
    pub target: &'a Composition,
    /// Side-wide attack efficiency percent (0-100+)
    pub efficiency: u32,
    pub terrain: Terrain,
    pub fortification: Fortification,
}

impl Volley<'_> {
    /// Resolve the exchange for one firing bucket, returning kills by
    /// defending unit type. Kill counts are not clamped to live counts here;
    /// application clamps.
    pub fn resolve(
        &self,
        firing: &Composition,
        catalog: &UnitCatalog,
        rng: &mut impl Rng,
    ) -> Composition {
        let mut kills = Composition::new();

        for (attacker, count) in firing.iter() {
            let stats = catalog.stats(attacker);

            let effective_count = if stats.traits.contains(TraitFlag::MultiAttack) {
                count * 2
            } else {
                count
            };

            let mut chance =
                (stats.attack as f64 / 100.0) * (self.efficiency as f64 / 100.0);
            if stats.traits.contains(TraitFlag::Charge) {
                chance *= charge_multiplier(self.terrain, self.fortification);
            }

            let hits = binomial(rng, effective_count, chance);
            if hits == 0 {
                continue;
            }

            let targets = eligible_targets(attacker, self.side, self.target, catalog);
            if targets.is_empty() {
                continue;
            }

            let weights: Vec<u32> = targets.iter().map(|t| self.target.count(*t)).collect();
            let assigned = assign_weighted(rng, hits, &weights);

            for (defender, assigned_hits) in targets.iter().zip(assigned) {
                if assigned_hits == 0 {
                    continue;
                }
                let killed =
                    self.resolve_defense(attacker, *defender, assigned_hits, catalog, rng);
                kills.add(*defender, killed);
            }
        }

        tracing::trace!(
            efficiency = self.efficiency,
            total_kills = kills.total(),
            "volley resolved"
        );
        kills
    }

    /// Run one target type's assigned hits through the spear, fortification
    /// and armor layers.
    fn resolve_defense(
        &self,
        attacker: UnitType,
        defender: UnitType,
        assigned_hits: u32,
        catalog: &UnitCatalog,
        rng: &mut impl Rng,
    ) -> u32 {
        let attacker_traits = catalog.stats(attacker).traits;

        let hits = if attacker_traits.contains(TraitFlag::LongSpears)
            && catalog.is_mounted(defender)
        {
            stochastic_round(rng, assigned_hits as f64 * LONG_SPEARS_MULTIPLIER)
        } else {
            assigned_hits
        };

        let passed = if self.fortification.is_present() {
            let avoid = self.fortification.hit_avoidance_percent() as f64 / 100.0;
            binomial(rng, hits, 1.0 - avoid)
        } else {
            hits
        };

        let mut defense = catalog.stats(defender).defense as f64 / 100.0;
        if attacker_traits.contains(TraitFlag::ArmorPiercing) {
            defense *= 0.5;
        }

        binomial(rng, passed, 1.0 - defense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn sure_hit_catalog() -> UnitCatalog {
        // Every listed unit hits with certainty and defends with nothing,
        // making outcomes exact.
        UnitCatalog::from_toml_str(
            r#"
            [swordsmen]
            attack = 100
            defense = 0
            traits = ["medium_armor"]

            [levy]
            attack = 100
            defense = 0
            traits = ["unarmored"]

            [spearmen]
            attack = 100
            defense = 0
            traits = ["long_spears"]

            [knights]
            attack = 100
            defense = 0
            traits = ["mounted", "charge", "heavy_armor"]

            [royal_guard]
            attack = 100
            defense = 0
            traits = ["multi_attack"]
            "#,
        )
        .unwrap()
    }

    fn volley<'a>(
        side: &'a Composition,
        target: &'a Composition,
        fortification: Fortification,
    ) -> Volley<'a> {
        Volley {
            side,
            target,
            efficiency: 100,
            terrain: Terrain::Grassland,
            fortification,
        }
    }

    #[test]
    fn test_certain_hits_all_kill() {
        let catalog = sure_hit_catalog();
        let attackers = Composition::from_counts(&[(UnitType::Swordsmen, 10)]);
        let defenders = Composition::from_counts(&[(UnitType::Levy, 50)]);
        let kills = volley(&attackers, &defenders, Fortification::None)
            .resolve(&attackers, &catalog, &mut rng(1));
        assert_eq!(kills.total(), 10);
        assert_eq!(kills.count(UnitType::Levy), 10);
    }

    #[test]
    fn test_multi_attack_doubles_output() {
        let catalog = sure_hit_catalog();
        let attackers = Composition::from_counts(&[(UnitType::RoyalGuard, 10)]);
        let defenders = Composition::from_counts(&[(UnitType::Levy, 100)]);
        let kills = volley(&attackers, &defenders, Fortification::None)
            .resolve(&attackers, &catalog, &mut rng(2));
        assert_eq!(kills.total(), 20);
    }

    #[test]
    fn test_long_spears_double_against_mounted() {
        let catalog = sure_hit_catalog();
        let attackers = Composition::from_counts(&[(UnitType::Spearmen, 10)]);
        let defenders = Composition::from_counts(&[(UnitType::Knights, 100)]);
        // Multiplier 2.0 has no fractional part, so the doubling is exact.
        let kills = volley(&attackers, &defenders, Fortification::None)
            .resolve(&attackers, &catalog, &mut rng(3));
        assert_eq!(kills.count(UnitType::Knights), 20);
    }

    #[test]
    fn test_zero_efficiency_produces_no_kills() {
        let catalog = sure_hit_catalog();
        let attackers = Composition::from_counts(&[(UnitType::Swordsmen, 50)]);
        let defenders = Composition::from_counts(&[(UnitType::Levy, 50)]);
        let mut volley = volley(&attackers, &defenders, Fortification::None);
        volley.efficiency = 0;
        let kills = volley.resolve(&attackers, &catalog, &mut rng(4));
        assert!(kills.is_empty());
    }

    #[test]
    fn test_armor_piercing_halves_defense() {
        let catalog = UnitCatalog::from_toml_str(
            r#"
            [crossbowmen]
            attack = 100
            defense = 15
            traits = ["ranged", "armor_piercing"]

            [swordsmen]
            attack = 100
            defense = 0
            traits = []

            [knights]
            attack = 0
            defense = 100
            traits = ["mounted", "heavy_armor"]
            "#,
        )
        .unwrap();
        let defenders = Composition::from_counts(&[(UnitType::Knights, 400)]);

        // Plain attackers can never penetrate 100% defense.
        let swords = Composition::from_counts(&[(UnitType::Swordsmen, 400)]);
        let kills = volley(&swords, &defenders, Fortification::None)
            .resolve(&swords, &catalog, &mut rng(5));
        assert!(kills.is_empty());

        // Armor piercing halves it to 50%, so kills land.
        let crossbows = Composition::from_counts(&[(UnitType::Crossbowmen, 400)]);
        let kills = volley(&crossbows, &defenders, Fortification::None)
            .resolve(&crossbows, &catalog, &mut rng(5));
        assert!(kills.count(UnitType::Knights) > 100);
    }

    #[test]
    fn test_fortification_absorbs_hits() {
        let catalog = sure_hit_catalog();
        let attackers = Composition::from_counts(&[(UnitType::Swordsmen, 1000)]);
        let defenders = Composition::from_counts(&[(UnitType::Levy, 5000)]);

        let open = volley(&attackers, &defenders, Fortification::None)
            .resolve(&attackers, &catalog, &mut rng(6));
        let walled = volley(&attackers, &defenders, Fortification::Castle)
            .resolve(&attackers, &catalog, &mut rng(6));
        assert_eq!(open.total(), 1000);
        assert!(walled.total() < open.total());
        // 40% avoidance over 1000 hits lands well inside this band
        assert!(walled.total() > 400 && walled.total() < 800);
    }

    #[test]
    fn test_charge_bonus_gated_by_terrain() {
        let catalog = UnitCatalog::from_toml_str(
            r#"
            [knights]
            attack = 60
            defense = 0
            traits = ["mounted", "charge"]

            [levy]
            attack = 0
            defense = 0
            traits = []
            "#,
        )
        .unwrap();
        let attackers = Composition::from_counts(&[(UnitType::Knights, 2000)]);
        let defenders = Composition::from_counts(&[(UnitType::Levy, 10000)]);

        let mut open = volley(&attackers, &defenders, Fortification::None);
        open.terrain = Terrain::Grassland;
        let charging = open.resolve(&attackers, &catalog, &mut rng(7));

        let mut woods = volley(&attackers, &defenders, Fortification::None);
        woods.terrain = Terrain::Forest;
        let stalled = woods.resolve(&attackers, &catalog, &mut rng(7));

        // 90% vs 60% expected hit rate over 2000 riders
        assert!(charging.total() > stalled.total() + 300);
    }

    #[test]
    fn test_no_eligible_targets_means_no_kills() {
        let catalog = UnitCatalog::default();
        // 5 melee cannot reach a defender side whose screen is 10 melee.
        let attackers = Composition::from_counts(&[(UnitType::Swordsmen, 5)]);
        let defenders = Composition::from_counts(&[(UnitType::Archers, 40)]);
        let screen = Composition::from_counts(&[(UnitType::Swordsmen, 10)]);
        let defender_side = defenders.merged_with(&screen);

        // Target only the archers bucket but keep the full side for the rule.
        let v = Volley {
            side: &attackers,
            target: &defender_side,
            efficiency: 100,
            terrain: Terrain::Grassland,
            fortification: Fortification::None,
        };
        let kills = v.resolve(&attackers, &catalog, &mut rng(8));
        // Swordsmen can only ever strike the defending swordsmen here.
        assert_eq!(kills.count(UnitType::Archers), 0);
    }
}
