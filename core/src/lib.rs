//! fleetsim-core: deterministic AV fleet economics with anchored history.
//!
//! The crate is a pure library. It owns four things:
//!   1. the cohort simulation engine (engine) — a deterministic yearly
//!      projection of fleet size, miles, trips, and cash flow;
//!   2. the metric registry (registry) — the static table tying
//!      external metric keys to simulation fields and chart views;
//!   3. anchor classification (anchor) — partitioning reviewed
//!      real-world datapoints into binding / pending / annotation;
//!   4. the timeline merger (merge) — overlaying binding anchors onto
//!      the simulated series with per-field provenance.
//!
//! Persistence, HTTP, extraction, and rendering are all collaborators
//! on the other side of the crate boundary. Nothing here does I/O
//! beyond reading a scenario config file on request.

pub mod anchor;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod registry;
pub mod types;

pub use anchor::{classify, last_anchor_year, AnchorRecord, ReviewState, SplitAnchors};
pub use config::{ScenarioConfig, SimulationParameters, UtilizationProfile};
pub use engine::{simulate, SimulationOutcome, YearRecord};
pub use error::{SimError, SimResult};
pub use merge::{merge, MergedYearRecord, Provenance};
pub use registry::{ChartView, SimField};

use serde::{Deserialize, Serialize};

/// Everything presentation needs for one scenario: the merged series,
/// the break-even year, and the non-binding anchor rows that are
/// charted but never override the curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub merged: Vec<MergedYearRecord>,
    pub break_even_year: Option<types::Year>,
    pub pending_points: Vec<AnchorRecord>,
    pub annotations: Vec<AnchorRecord>,
}

/// Run the whole pipeline: simulate, classify, merge.
///
/// Recomputed from scratch on every call; there is no incremental
/// path. Anchor rows are read-only input and come back partitioned in
/// the outcome.
pub fn run_scenario(config: &ScenarioConfig, anchors: &[AnchorRecord]) -> SimResult<ScenarioOutcome> {
    let outcome = engine::simulate(config)?;
    let split = anchor::classify(anchors);
    let merged = merge::merge(&outcome.series, &split.binding);
    Ok(ScenarioOutcome {
        merged,
        break_even_year: outcome.break_even_year,
        pending_points: split.pending,
        annotations: split.annotations,
    })
}
