//! Status-effect simulator binary.
//!
//! Loads effect content, plays a scripted encounter and prints the outcome.
//!
//! # Examples
//!
//! ```bash
//! # Simulated time, shipped content
//! cargo run -p effect-client
//!
//! # Wall-clock driver with file logging
//! EFFECT_LOG_DIR=/tmp/effect-logs cargo run -p effect-client -- --realtime --seconds 5
//! ```

use anyhow::Result;
use clap::Parser;
use effect_client::{Cli, Encounter, EncounterSummary, ScriptStep};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for EFFECT_DATA_DIR and EFFECT_LOG_DIR)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = effect_client::logging::setup_logging(cli.log_dir.as_deref())?;

    tracing::info!("Loading content from {}", cli.data_dir.display());
    let encounter = Encounter::load(&cli.data_dir)?;

    print_script(&encounter.opening());

    let settings = cli.settings();
    let summary = if cli.realtime {
        tracing::info!("Driving encounter in wall-clock time for {:?}", settings.duration);
        encounter.run_realtime(&settings).await?
    } else {
        encounter.run_simulated(&settings)
    };

    print_summary(&summary);
    Ok(())
}

fn print_script(script: &[ScriptStep]) {
    println!("── Opening ─────────────────────────────────────────");
    for step in script {
        let mark = if step.applied { "✓" } else { "✗" };
        println!("  {} {}: {}", mark, step.action, step.outcome);
    }
}

fn print_summary(summary: &EncounterSummary) {
    println!("── After {} steps ──────────────────────────────────", summary.steps);
    for entity in &summary.entities {
        let status = if summary.defeated.contains(&entity.id) {
            " (defeated)"
        } else {
            ""
        };
        println!(
            "  {} {}{}: hp {:.1}/{:.1}, str {:.1}, armor {:.1}, speed {:.1}",
            entity.id,
            entity.name,
            status,
            entity.stats.health,
            entity.stats.max_health,
            entity.stats.strength,
            entity.stats.armor,
            entity.stats.speed,
        );
        if !entity.effects.is_empty() {
            println!("      effects: {}", entity.effects.join(", "));
        }
    }
}
