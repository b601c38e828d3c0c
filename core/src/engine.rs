//! Cohort simulation engine — the deterministic yearly projection.
//!
//! EXECUTION MODEL (fixed, documented, never reordered):
//!   Years are computed strictly in order. Cumulative R&D spend,
//!   cumulative net cash, ROI, and the break-even year all depend on
//!   the full prior sequence and cannot be computed out of order.
//!
//! RULES:
//!   - Every year re-sums all active city cohorts from scratch. This is
//!     O(n²) over the horizon and intentional: it mirrors the cohort
//!     semantics directly. Do not replace with an incremental
//!     accumulator unless verified bit-identical against this loop.
//!   - The R&D taper reads the PREVIOUS year's cumulative net cash and
//!     is re-evaluated every year. It is a one-year lag, not a sticky
//!     "tapered forever once break-even occurred" flag. The two differ
//!     whenever cumulative cash dips negative again after a first
//!     break-even.
//!   - Validation happens at entry only. Past it, simulate() is a
//!     total, pure function with no I/O.

use crate::config::ScenarioConfig;
use crate::error::SimResult;
use crate::types::Year;
use serde::{Deserialize, Serialize};

/// Average paid trip length, miles. Fixed across all scenarios.
pub const MILES_PER_TRIP: f64 = 6.0;

/// One simulated year. All monetary fields are dollars except the R&D
/// spend pair, which stays in billions as supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: Year,
    pub cities_total: i64,
    pub vehicles_total: i64,
    pub vehicles_production: i64,
    pub vehicles_validation: i64,
    pub production_miles: f64,
    pub validation_miles: f64,
    pub production_trips: i64,
    pub paid_trips_per_week: i64,
    pub annual_rd_spend: f64,
    pub cumulative_rd_spend: f64,
    pub operating_profit: f64,
    pub net_cash_flow: f64,
    pub cumulative_net_cash: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub series: Vec<YearRecord>,
    pub break_even_year: Option<Year>,
}

/// Run the full projection for one scenario.
///
/// Deterministic: identical configs always produce identical series.
pub fn simulate(config: &ScenarioConfig) -> SimResult<SimulationOutcome> {
    config.validate()?;

    let p = &config.parameters;
    let profile = &config.profile;
    let years = p.years_to_simulate as usize;
    let cities_cap = (p.cities_per_year as i64) * (p.years_to_simulate as i64);

    let mut series: Vec<YearRecord> = Vec::with_capacity(years);
    let mut cumulative_rd_spend = 0.0_f64;
    let mut cumulative_net_cash = 0.0_f64;
    let mut break_even_year: Option<Year> = None;

    for offset in 0..years {
        let year = p.start_year + offset as Year;

        // Cap guards the final year against overshooting the horizon.
        let cities_total = (((offset as i64) + 1) * p.cities_per_year as i64).min(cities_cap);

        // Re-sum every cohort launched so far. A cohort ramps linearly
        // from validation duty into production over ramp_time_per_city
        // years; it counts as production once its age reaches the ramp.
        let mut production = 0.0_f64;
        let mut validation = 0.0_f64;
        for cohort in 0..=offset {
            let cohort_age = (offset - cohort + 1) as f64;
            let ramp_progress = (cohort_age / p.ramp_time_per_city).min(1.0);
            let cohort_vehicles =
                (p.cities_per_year as f64) * (p.vehicles_per_city as f64) * ramp_progress;
            if cohort_age >= p.ramp_time_per_city {
                production += cohort_vehicles;
            } else {
                validation += cohort_vehicles;
            }
        }
        let vehicles_production = production.round() as i64;
        let vehicles_validation = validation.round() as i64;
        let vehicles_total = vehicles_production + vehicles_validation;

        let production_miles =
            vehicles_production as f64 * profile.production_utilization * 365.0;
        let validation_miles =
            vehicles_validation as f64 * profile.validation_utilization * 365.0;

        let production_trips = (production_miles / MILES_PER_TRIP).round() as i64;
        let paid_trips_per_week = (production_trips as f64 / 52.0).round() as i64;

        let operating_profit = production_miles * p.profit_per_mile;

        // Lagged taper: looks at where cumulative cash stood at the END
        // of the previous year. Before the first year that value is
        // defined as 0, so 0 >= 0 tapers the first year too.
        let rd_multiplier = if cumulative_net_cash >= 0.0 {
            profile.rd_taper_after_breakeven
        } else {
            1.0
        };
        let annual_rd_spend = p.annual_rd_spend_billions * rd_multiplier;
        cumulative_rd_spend += annual_rd_spend;

        let net_cash_flow = operating_profit - annual_rd_spend * 1e9;
        cumulative_net_cash += net_cash_flow;

        let roi = if cumulative_rd_spend > 0.0 {
            cumulative_net_cash / (cumulative_rd_spend * 1e9) * 100.0
        } else {
            0.0
        };

        if break_even_year.is_none() && cumulative_net_cash >= 0.0 {
            break_even_year = Some(year);
        }

        series.push(YearRecord {
            year,
            cities_total,
            vehicles_total,
            vehicles_production,
            vehicles_validation,
            production_miles,
            validation_miles,
            production_trips,
            paid_trips_per_week,
            annual_rd_spend,
            cumulative_rd_spend,
            operating_profit,
            net_cash_flow,
            cumulative_net_cash,
            roi,
        });
    }

    log::debug!(
        "simulated {} years from {} (profile '{}'): break-even {:?}",
        years,
        p.start_year,
        profile.name,
        break_even_year
    );

    Ok(SimulationOutcome {
        series,
        break_even_year,
    })
}
