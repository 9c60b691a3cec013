use std::path::Path;

use anyhow::{Context, Result};

use scalehead_core::scenario::{self, ReplayReport, Scenario};
use scalehead_core::AppConfig;

pub async fn run(config: &AppConfig, file: &Path, realtime: bool, json: bool) -> Result<()> {
    let scenario = Scenario::load(file)
        .await
        .with_context(|| format!("Failed to load scenario {}", file.display()))?;

    tracing::info!(
        events = scenario.events.len(),
        snap_mode = config.header.snap_mode.label(),
        realtime,
        "Replaying scenario"
    );

    let report = if realtime {
        scenario::replay_realtime(&scenario, config).await
    } else {
        scenario::replay(&scenario, config)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }

    Ok(())
}

fn print_table(report: &ReplayReport) {
    println!(
        "{:>7}  {:<18}  {:>8}  {:>7}  {:>5}  {:<13}  events",
        "at_ms", "phase", "offset", "height", "prog", "state"
    );
    for entry in &report.entries {
        println!(
            "{:>7}  {:<18}  {:>8.1}  {:>7.1}  {:>5.2}  {:<13}  {}",
            entry.at_ms,
            format!("{:?}", entry.phase),
            entry.offset,
            entry.header_height,
            entry.progress,
            entry.snap_state,
            entry.events.join(", ")
        );
    }
    println!(
        "\nFinal: {} at height {:.1}",
        report.final_state, report.final_height
    );
}
