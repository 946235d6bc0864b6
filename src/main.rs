//! Headless runner.
//!
//! Usage: `sfpe [preset] [steps]`
//!
//! Runs the fluid without a renderer and prints debug stats. Set
//! `RUST_LOG=debug` to see reseed and preset messages.

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use sfpe::prelude::*;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let preset = args.get(1).map(String::as_str).unwrap_or("water");
    let steps: u64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(600);

    let mut sim = match Simulation::new(SimulationConfig::default()) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Failed to create simulation: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = sim.apply_preset(preset) {
        log::error!("{}", e);
        let names: Vec<&str> = sim.presets().names().collect();
        eprintln!("Available presets: {}", names.join(", "));
        return ExitCode::FAILURE;
    }

    println!("=== SFPE Headless Run ===");
    println!("Preset: {}", preset);
    println!("Particles: {}", sim.particles().len());
    println!("Steps: {}", steps);
    println!();

    let started = Instant::now();
    let report_every = (steps / 10).max(1);
    for i in 1..=steps {
        sim.tick();
        if i % report_every == 0 {
            let stats = sim.debug_stats();
            println!(
                "step {:>6}  t={:>7.3}s  energy={:>10.2}  last={:?}",
                stats.step_count,
                stats.simulated_time,
                sim.kinetic_energy(),
                stats.last_step_duration
            );
        }
    }
    let elapsed = started.elapsed();

    let stats = sim.debug_stats();
    println!();
    println!("{:#?}", stats);
    println!(
        "Wall time: {:?} ({:.1} steps/s)",
        elapsed,
        steps as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );

    ExitCode::SUCCESS
}
