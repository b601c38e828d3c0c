//! scenario-runner: headless runner for fleetsim scenarios.
//!
//! Usage:
//!   scenario-runner --profile aggressive --years 20
//!   scenario-runner --config scenario.json --anchors anchors.json
//!   scenario-runner --demo-anchors --json

use anyhow::Result;
use chrono::Utc;
use fleetsim_core::{
    anchor::{AnchorRecord, AnchorSource, AnchorStatus, Confidence},
    run_scenario, ScenarioConfig, UtilizationProfile,
};
use std::env;
use uuid::Uuid;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json_out = args.iter().any(|a| a == "--json");
    let demo_anchors = args.iter().any(|a| a == "--demo-anchors");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };
    if let Some(name) = flag_value(&args, "--profile") {
        config.profile = UtilizationProfile::named(name)
            .ok_or_else(|| anyhow::anyhow!("unknown profile '{name}'"))?;
    }
    if let Some(years) = flag_value(&args, "--years") {
        config.parameters.years_to_simulate = years.parse()?;
    }

    let anchors: Vec<AnchorRecord> = if let Some(path) = flag_value(&args, "--anchors") {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read anchors file {path}: {e}"))?;
        serde_json::from_str(&content)?
    } else if demo_anchors {
        demo_anchor_rows(&config)
    } else {
        Vec::new()
    };

    if !json_out {
        println!("fleetsim — scenario-runner");
        println!("  profile:   {}", config.profile.name);
        println!("  start:     {}", config.parameters.start_year);
        println!("  years:     {}", config.parameters.years_to_simulate);
        println!("  anchors:   {}", anchors.len());
        println!();
    }

    let outcome = run_scenario(&config, &anchors)?;

    if json_out {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "{:>6} {:>8} {:>10} {:>14} {:>14} {:>16} {:>16} {:>8}",
        "year", "cities", "vehicles", "prod miles", "trips/week", "net cash", "cum cash", "roi %"
    );
    for row in &outcome.merged {
        let r = &row.record;
        let tag = if row.provenance.is_empty() { "" } else { "*" };
        println!(
            "{:>6} {:>8} {:>10} {:>14.0} {:>14} {:>16.2e} {:>16.2e} {:>8.1}{}",
            r.year,
            r.cities_total,
            r.vehicles_total,
            r.production_miles,
            r.paid_trips_per_week,
            r.net_cash_flow,
            r.cumulative_net_cash,
            r.roi,
            tag
        );
    }
    println!();
    match outcome.break_even_year {
        Some(year) => println!("break-even: {year}"),
        None => println!("break-even: not reached within horizon"),
    }
    if !outcome.pending_points.is_empty() || !outcome.annotations.is_empty() {
        println!(
            "non-binding anchors: {} pending, {} annotations",
            outcome.pending_points.len(),
            outcome.annotations.len()
        );
    }
    log::info!(
        "scenario complete: {} merged years",
        outcome.merged.len()
    );

    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// A small reviewed anchor set against the configured start year, for
/// demoing the merge path without an anchors file.
fn demo_anchor_rows(config: &ScenarioConfig) -> Vec<AnchorRecord> {
    let start = config.parameters.start_year;
    let row = |year, month, metric: &str, value, unit: &str, status| AnchorRecord {
        id: Uuid::new_v4().to_string(),
        company: "demo-operator".into(),
        year,
        month,
        metric: metric.into(),
        value,
        unit: unit.into(),
        city: Some("Phoenix".into()),
        confidence: Confidence::Approved,
        status,
        source: Some(AnchorSource {
            url: None,
            contributor: Some("scenario-runner".into()),
            observed_at: Some(Utc::now()),
        }),
        metadata: None,
    };
    vec![
        row(start + 1, Some(8), "paid_trips_per_week", 10_000.0, "trips/week", AnchorStatus::Anchored),
        row(start + 3, None, "paid_trips_per_week", 150_000.0, "trips/week", AnchorStatus::Anchored),
        row(start + 2, Some(5), "fleet_size", 700.0, "vehicles", AnchorStatus::Anchored),
        row(start + 2, None, "regulatory_permit", 1.0, "permit", AnchorStatus::Annotated),
    ]
}
