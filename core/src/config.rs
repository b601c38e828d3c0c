//! Scenario configuration — parameters and utilization profiles.
//!
//! A scenario is an immutable bundle: structural parameters (cities,
//! vehicles, spend) plus a named utilization profile (how hard each
//! vehicle is worked, and how R&D tapers after break-even).
//!
//! RULES:
//!   - Validation happens here, once, at entry. Past validate() the
//!     simulation is total and never fails mid-run.
//!   - Any parameter change means a full re-simulation. There is no
//!     incremental mutation path.

use crate::error::{SimError, SimResult};
use crate::types::Year;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub start_year: Year,
    pub years_to_simulate: u32,
    pub cities_per_year: u32,
    pub vehicles_per_city: u32,
    /// Operating profit per production mile, dollars.
    pub profit_per_mile: f64,
    /// Base annual R&D spend, billions of dollars.
    pub annual_rd_spend_billions: f64,
    /// Years for a city cohort to reach full production utilization.
    /// Must be > 0.
    pub ramp_time_per_city: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationProfile {
    pub name: String,
    /// Miles per production vehicle per day.
    pub production_utilization: f64,
    /// Miles per validation vehicle per day.
    pub validation_utilization: f64,
    /// Multiplier applied to R&D spend in years following a
    /// cash-positive year. Must lie in [0, 1].
    pub rd_taper_after_breakeven: f64,
}

impl UtilizationProfile {
    pub fn conservative() -> Self {
        Self {
            name: "conservative".into(),
            production_utilization: 120.0,
            validation_utilization: 40.0,
            rd_taper_after_breakeven: 0.9,
        }
    }

    pub fn base() -> Self {
        Self {
            name: "base".into(),
            production_utilization: 180.0,
            validation_utilization: 60.0,
            rd_taper_after_breakeven: 0.7,
        }
    }

    pub fn aggressive() -> Self {
        Self {
            name: "aggressive".into(),
            production_utilization: 250.0,
            validation_utilization: 80.0,
            rd_taper_after_breakeven: 0.5,
        }
    }

    /// Look up a built-in profile by name.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "conservative" => Some(Self::conservative()),
            "base" => Some(Self::base()),
            "aggressive" => Some(Self::aggressive()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub parameters: SimulationParameters,
    pub profile: UtilizationProfile,
}

impl ScenarioConfig {
    /// Load a scenario from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read scenario file {path}: {e}"))?;
        let config: ScenarioConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject degenerate parameters before any simulation runs.
    pub fn validate(&self) -> SimResult<()> {
        let p = &self.parameters;
        if !(p.ramp_time_per_city > 0.0) || !p.ramp_time_per_city.is_finite() {
            return Err(SimError::invalid(
                "ramp_time_per_city",
                format!("must be > 0, got {}", p.ramp_time_per_city),
            ));
        }
        if !p.profit_per_mile.is_finite() {
            return Err(SimError::invalid("profit_per_mile", "must be finite"));
        }
        if !(p.annual_rd_spend_billions >= 0.0) {
            return Err(SimError::invalid(
                "annual_rd_spend_billions",
                format!("must be >= 0, got {}", p.annual_rd_spend_billions),
            ));
        }
        let f = &self.profile;
        if !(0.0..=1.0).contains(&f.rd_taper_after_breakeven) {
            return Err(SimError::invalid(
                "rd_taper_after_breakeven",
                format!("must lie in [0, 1], got {}", f.rd_taper_after_breakeven),
            ));
        }
        if f.production_utilization < 0.0 || f.validation_utilization < 0.0 {
            return Err(SimError::invalid(
                "utilization",
                "miles per vehicle per day cannot be negative",
            ));
        }
        Ok(())
    }

    /// A small, fast scenario for tests. Matches the reference scenario
    /// used throughout the integration suites.
    pub fn default_test() -> Self {
        Self {
            parameters: SimulationParameters {
                start_year: 2020,
                years_to_simulate: 5,
                cities_per_year: 2,
                vehicles_per_city: 100,
                profit_per_mile: 0.5,
                annual_rd_spend_billions: 1.0,
                ramp_time_per_city: 2.0,
            },
            profile: UtilizationProfile {
                name: "test".into(),
                production_utilization: 50.0,
                validation_utilization: 20.0,
                rd_taper_after_breakeven: 0.5,
            },
        }
    }
}

impl Default for ScenarioConfig {
    /// A multi-decade base-case rollout starting next calendar year.
    fn default() -> Self {
        Self {
            parameters: SimulationParameters {
                start_year: 2025,
                years_to_simulate: 20,
                cities_per_year: 5,
                vehicles_per_city: 500,
                profit_per_mile: 0.65,
                annual_rd_spend_billions: 2.0,
                ramp_time_per_city: 3.0,
            },
            profile: UtilizationProfile::base(),
        }
    }
}
