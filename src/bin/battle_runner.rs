//! Headless Battle Runner
//!
//! Resolves a single battle from the command line and prints a JSON (or
//! plain-text) summary. Pass a seed for reproducible runs.

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use serde_json::{Map, Value};

use warhost::battle::{resolve_battle, CombatReport, Fortification, Terrain};
use warhost::core::Result;
use warhost::units::{Composition, Force, UnitCatalog, UnitType};

/// Headless battle runner - resolve one battle and print the report
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Resolve a battle between two forces and print the report")]
struct Args {
    /// Attacking army as 'unit:count,unit:count' (repeat for allied armies)
    #[arg(long = "attacker", default_value = "levy:95,swordsmen:5")]
    attackers: Vec<String>,

    /// Defending army as 'unit:count,unit:count' (repeat for allied armies)
    #[arg(long = "defender", default_value = "levy:95,swordsmen:5")]
    defenders: Vec<String>,

    /// Defender garrison as 'unit:count,unit:count'
    #[arg(long)]
    garrison: Option<String>,

    /// Attacker efficiency percent
    #[arg(long, default_value_t = 100)]
    attacker_efficiency: u32,

    /// Defender efficiency percent (the garrison always fights at 100)
    #[arg(long, default_value_t = 100)]
    defender_efficiency: u32,

    /// Battlefield terrain (grassland, forest, hills, swamp, mountains)
    #[arg(long, default_value = "grassland")]
    terrain: String,

    /// Defender fortification (none, palisade, keep, castle)
    #[arg(long, default_value = "none")]
    fortification: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding the built-in unit catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Include the round-by-round log in the output
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunnerOutput {
    winner: String,
    rounds: u32,
    seed: u64,
    attacker_losses: Map<String, Value>,
    defender_losses: Map<String, Value>,
    final_attacker: Map<String, Value>,
    final_defender: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    opening_volley: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    round_log: Option<Value>,
}

fn parse_composition(spec: &str) -> Result<Composition> {
    let mut comp = Composition::new();
    for part in spec.split(',').filter(|p| !p.trim().is_empty()) {
        let (name, count) = part.trim().split_once(':').ok_or_else(|| {
            warhost::core::WarhostError::InvalidCompositionSpec(spec.to_string())
        })?;
        let unit: UnitType = name.trim().parse()?;
        let count: u32 = count.trim().parse().map_err(|_| {
            warhost::core::WarhostError::InvalidCompositionSpec(spec.to_string())
        })?;
        comp.add(unit, count);
    }
    Ok(comp)
}

fn named_counts(comp: &Composition) -> Map<String, Value> {
    comp.iter()
        .map(|(unit, n)| (unit.name().to_string(), Value::from(n)))
        .collect()
}

fn print_text(report: &CombatReport, seed: u64, verbose: bool) {
    println!("winner: {:?}", report.winner);
    println!("rounds: {}", report.rounds);
    println!("seed:   {}", seed);
    for (label, comp) in [
        ("attacker losses", &report.attacker_losses),
        ("defender losses", &report.defender_losses),
        ("final attacker", &report.final_attacker),
        ("final defender", &report.final_defender),
    ] {
        let entries: Vec<String> = comp
            .iter()
            .map(|(unit, n)| format!("{unit}:{n}"))
            .collect();
        println!("{label}: {}", entries.join(", "));
    }
    if verbose {
        if let Some(opening) = &report.opening_volley {
            println!(
                "opening volley: attackers -{:<4} ({} left)  defenders -{:<4} ({} left)",
                opening.attacker_losses.total(),
                opening.attacker_remaining,
                opening.defender_losses.total(),
                opening.defender_remaining,
            );
        }
        for round in &report.round_log {
            println!(
                "round {:>4}: attackers -{:<4} ({} left)  defenders -{:<4} ({} left)",
                round.round,
                round.attacker_losses.total(),
                round.attacker_remaining,
                round.defender_losses.total(),
                round.defender_remaining,
            );
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warhost=info".into()),
        )
        .init();

    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => UnitCatalog::load(path)?,
        None => UnitCatalog::default(),
    };

    let attacker_armies = args
        .attackers
        .iter()
        .map(|spec| parse_composition(spec))
        .collect::<Result<Vec<_>>>()?;
    let defender_armies = args
        .defenders
        .iter()
        .map(|spec| parse_composition(spec))
        .collect::<Result<Vec<_>>>()?;

    let attackers = Force::from_armies(attacker_armies);
    let mut defenders = Force::from_armies(defender_armies);
    if let Some(spec) = &args.garrison {
        defenders = defenders.with_garrison(parse_composition(spec)?);
    }

    let terrain: Terrain = args.terrain.parse()?;
    let fortification: Fortification = args.fortification.parse()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let report = resolve_battle(
        &attackers,
        &defenders,
        args.attacker_efficiency,
        args.defender_efficiency,
        terrain,
        fortification,
        &catalog,
        &mut rng,
    );

    if args.format == "text" {
        print_text(&report, seed, args.verbose);
    } else {
        let output = RunnerOutput {
            winner: format!("{:?}", report.winner),
            rounds: report.rounds,
            seed,
            attacker_losses: named_counts(&report.attacker_losses),
            defender_losses: named_counts(&report.defender_losses),
            final_attacker: named_counts(&report.final_attacker),
            final_defender: named_counts(&report.final_defender),
            opening_volley: match (&report.opening_volley, args.verbose) {
                (Some(opening), true) => Some(serde_json::to_value(opening)?),
                _ => None,
            },
            round_log: args
                .verbose
                .then(|| serde_json::to_value(&report.round_log))
                .transpose()
                .map_err(warhost::core::WarhostError::from)?,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}
