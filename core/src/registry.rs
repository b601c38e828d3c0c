//! Metric registry — the static table tying external metric keys to
//! simulation fields, chart views, and binding eligibility.
//!
//! RULES:
//!   - The table is hand-curated, built once, and never mutated at
//!     runtime. All access goes through the pure lookup functions.
//!   - An unknown metric key is never an error anywhere in the core:
//!     lookups return None and callers drop the row silently.
//!   - binding = false means the metric may be charted (pending points,
//!     annotations) but never overrides the simulated curve, even if it
//!     maps onto a simulation field.

use crate::engine::YearRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The YearRecord fields an external metric may bind to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SimField {
    CitiesTotal,
    VehiclesTotal,
    VehiclesProduction,
    VehiclesValidation,
    ProductionMiles,
    ValidationMiles,
    ProductionTrips,
    PaidTripsPerWeek,
    AnnualRdSpend,
    CumulativeRdSpend,
    OperatingProfit,
    NetCashFlow,
    CumulativeNetCash,
}

impl SimField {
    /// Read this field out of a record as a plain number.
    pub fn get(&self, record: &YearRecord) -> f64 {
        match self {
            SimField::CitiesTotal => record.cities_total as f64,
            SimField::VehiclesTotal => record.vehicles_total as f64,
            SimField::VehiclesProduction => record.vehicles_production as f64,
            SimField::VehiclesValidation => record.vehicles_validation as f64,
            SimField::ProductionMiles => record.production_miles,
            SimField::ValidationMiles => record.validation_miles,
            SimField::ProductionTrips => record.production_trips as f64,
            SimField::PaidTripsPerWeek => record.paid_trips_per_week as f64,
            SimField::AnnualRdSpend => record.annual_rd_spend,
            SimField::CumulativeRdSpend => record.cumulative_rd_spend,
            SimField::OperatingProfit => record.operating_profit,
            SimField::NetCashFlow => record.net_cash_flow,
            SimField::CumulativeNetCash => record.cumulative_net_cash,
        }
    }

    /// Write a plain number into this field. Count fields round to the
    /// nearest integer; monetary and mileage fields store the value
    /// as-is.
    pub fn set(&self, record: &mut YearRecord, value: f64) {
        match self {
            SimField::CitiesTotal => record.cities_total = value.round() as i64,
            SimField::VehiclesTotal => record.vehicles_total = value.round() as i64,
            SimField::VehiclesProduction => record.vehicles_production = value.round() as i64,
            SimField::VehiclesValidation => record.vehicles_validation = value.round() as i64,
            SimField::ProductionMiles => record.production_miles = value,
            SimField::ValidationMiles => record.validation_miles = value,
            SimField::ProductionTrips => record.production_trips = value.round() as i64,
            SimField::PaidTripsPerWeek => record.paid_trips_per_week = value.round() as i64,
            SimField::AnnualRdSpend => record.annual_rd_spend = value,
            SimField::CumulativeRdSpend => record.cumulative_rd_spend = value,
            SimField::OperatingProfit => record.operating_profit = value,
            SimField::NetCashFlow => record.net_cash_flow = value,
            SimField::CumulativeNetCash => record.cumulative_net_cash = value,
        }
    }
}

/// Presentation views a metric can appear on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChartView {
    Fleet,
    Miles,
    Trips,
    CashFlow,
    Rd,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricRegistryEntry {
    pub metric_key: &'static str,
    pub sim_field: Option<SimField>,
    pub views: &'static [ChartView],
    pub binding: bool,
}

/// The curated metric table. Order is presentation order within a view.
pub const METRIC_REGISTRY: &[MetricRegistryEntry] = &[
    MetricRegistryEntry {
        metric_key: "cities_active",
        sim_field: Some(SimField::CitiesTotal),
        views: &[ChartView::Fleet],
        binding: true,
    },
    MetricRegistryEntry {
        metric_key: "fleet_size",
        sim_field: Some(SimField::VehiclesTotal),
        views: &[ChartView::Fleet],
        binding: true,
    },
    MetricRegistryEntry {
        metric_key: "production_fleet",
        sim_field: Some(SimField::VehiclesProduction),
        views: &[ChartView::Fleet],
        binding: true,
    },
    // Reported totals with unclear production/validation split; charted
    // but never allowed to override the curve.
    MetricRegistryEntry {
        metric_key: "fleet_size_estimate",
        sim_field: Some(SimField::VehiclesTotal),
        views: &[ChartView::Fleet],
        binding: false,
    },
    MetricRegistryEntry {
        metric_key: "production_miles",
        sim_field: Some(SimField::ProductionMiles),
        views: &[ChartView::Miles],
        binding: true,
    },
    MetricRegistryEntry {
        metric_key: "validation_miles",
        sim_field: Some(SimField::ValidationMiles),
        views: &[ChartView::Miles],
        binding: true,
    },
    MetricRegistryEntry {
        metric_key: "production_trips",
        sim_field: Some(SimField::ProductionTrips),
        views: &[ChartView::Trips],
        binding: true,
    },
    MetricRegistryEntry {
        metric_key: "paid_trips_per_week",
        sim_field: Some(SimField::PaidTripsPerWeek),
        views: &[ChartView::Trips],
        binding: true,
    },
    MetricRegistryEntry {
        metric_key: "annual_rd_spend",
        sim_field: Some(SimField::AnnualRdSpend),
        views: &[ChartView::Rd, ChartView::CashFlow],
        binding: true,
    },
    MetricRegistryEntry {
        metric_key: "cumulative_rd_spend",
        sim_field: Some(SimField::CumulativeRdSpend),
        views: &[ChartView::Rd],
        binding: true,
    },
    MetricRegistryEntry {
        metric_key: "operating_profit",
        sim_field: Some(SimField::OperatingProfit),
        views: &[ChartView::CashFlow],
        binding: true,
    },
    MetricRegistryEntry {
        metric_key: "net_cash_flow",
        sim_field: Some(SimField::NetCashFlow),
        views: &[ChartView::CashFlow],
        binding: true,
    },
    // Annotation-only context metrics. No simulation field at all.
    MetricRegistryEntry {
        metric_key: "service_area_sq_mi",
        sim_field: None,
        views: &[ChartView::Fleet],
        binding: false,
    },
    MetricRegistryEntry {
        metric_key: "regulatory_permit",
        sim_field: None,
        views: &[ChartView::Fleet, ChartView::Trips],
        binding: false,
    },
    MetricRegistryEntry {
        metric_key: "safety_incident_rate",
        sim_field: None,
        views: &[ChartView::Miles],
        binding: false,
    },
];

/// Look up a single metric entry. Unknown keys return None.
pub fn entry(metric_key: &str) -> Option<&'static MetricRegistryEntry> {
    METRIC_REGISTRY.iter().find(|e| e.metric_key == metric_key)
}

/// All metric keys shown on a view, binding or not.
pub fn metrics_for_view(view: ChartView) -> Vec<&'static str> {
    METRIC_REGISTRY
        .iter()
        .filter(|e| e.views.contains(&view))
        .map(|e| e.metric_key)
        .collect()
}

/// The subset of a view's metrics allowed to override the curve.
pub fn binding_metrics_for_view(view: ChartView) -> Vec<&'static str> {
    METRIC_REGISTRY
        .iter()
        .filter(|e| e.views.contains(&view) && e.binding && e.sim_field.is_some())
        .map(|e| e.metric_key)
        .collect()
}

/// metric key → target field, for every binding metric.
pub fn binding_field_map() -> HashMap<&'static str, SimField> {
    METRIC_REGISTRY
        .iter()
        .filter(|e| e.binding)
        .filter_map(|e| e.sim_field.map(|f| (e.metric_key, f)))
        .collect()
}
