/*!
 * Simulated OS Kernel - Headless Runner
 *
 * Runs a seeded simulation without a renderer and prints a JSON summary.
 *
 * Environment variables:
 * - SIM_CONFIG: path to a JSON configuration file
 * - SIM_DIFFICULTY: easy | normal | hard (ignored when SIM_CONFIG is set)
 * - SIM_SEED: random seed (default: 1)
 * - SIM_TICKS: number of ticks to run (default: 600)
 * - SIM_TICK_MS: simulated milliseconds per tick (default: 100)
 */

use miette::{IntoDiagnostic, Result};
use sim_os_kernel::{init_tracing, Difficulty, SeededRandom, SimConfig, SimError, Simulation};
use tracing::info;

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| SimError::Configuration(format!("{}: {}", name, e)))
            .into_diagnostic(),
        Err(_) => Ok(default),
    }
}

fn load_config() -> Result<SimConfig> {
    if let Ok(path) = std::env::var("SIM_CONFIG") {
        return Ok(SimConfig::from_file(path)?);
    }
    let difficulty = match std::env::var("SIM_DIFFICULTY") {
        Ok(raw) => Difficulty::from_str(&raw).map_err(SimError::Configuration)?,
        Err(_) => Difficulty::Normal,
    };
    Ok(difficulty.config())
}

fn main() -> Result<()> {
    init_tracing();

    let config = load_config()?;
    let seed = env_u64("SIM_SEED", 1)?;
    let ticks = env_u64("SIM_TICKS", 600)?;
    let tick_ms = env_u64("SIM_TICK_MS", 100)?;

    info!(name = %config.name, seed, ticks, tick_ms, "Simulation starting");

    let mut sim = Simulation::new(config, SeededRandom::new(seed))?;
    sim.start();

    for tick in 1..=ticks {
        let report = sim.tick(tick * tick_ms, &[]);
        if report.spawned.is_some() || !report.removed.is_empty() {
            info!(
                time = report.time,
                spawned = ?report.spawned,
                removed = ?report.removed,
                "Roster changed"
            );
        }
    }

    let stats = sim.stats();
    info!(
        live = stats.live_processes,
        starved = stats.terminations.starved,
        graceful = stats.terminations.graceful,
        "Simulation finished"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).into_diagnostic()?
    );
    Ok(())
}
