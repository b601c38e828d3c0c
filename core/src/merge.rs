//! Timeline merger — overlays binding anchors onto the simulated series.
//!
//! Per bound field, the timeline splits into four regions around the
//! field's sorted anchor years:
//!   - at an anchor year: the anchor value, exactly, provenance Anchor;
//!   - before the first anchor year: zero (anchors imply no prior
//!     activity), provenance Interpolated;
//!   - strictly between two anchor years: rounded linear interpolation,
//!     provenance Interpolated;
//!   - after the last anchor year: the simulated value, untouched.
//!
//! RULES:
//!   - merge() never fails. Anchors whose metric is unknown to the
//!     registry, or not flagged binding, are silently dropped here.
//!   - Duplicate anchors for the same (field, year) collapse
//!     deterministically: a non-zero month beats no month (more
//!     specific reporting), otherwise the later-processed row wins.
//!   - Fields no anchor touches stay Simulated for every year.

use crate::anchor::AnchorRecord;
use crate::engine::YearRecord;
use crate::registry::{self, SimField};
use crate::types::Year;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Anchor,
    Interpolated,
    Simulated,
}

/// A simulated year with per-field provenance tags. Only fields an
/// anchor touched carry an entry; everything else is Simulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedYearRecord {
    #[serde(flatten)]
    pub record: YearRecord,
    pub provenance: BTreeMap<SimField, Provenance>,
}

impl MergedYearRecord {
    pub fn provenance_for(&self, field: SimField) -> Provenance {
        self.provenance
            .get(&field)
            .copied()
            .unwrap_or(Provenance::Simulated)
    }
}

/// One deduplicated anchor observation for a (field, year) slot.
#[derive(Debug, Clone, Copy)]
struct Observation {
    value: f64,
    has_month: bool,
}

/// Combine the simulated series with binding anchors. Pure and
/// deterministic; identical inputs always yield identical output.
pub fn merge(series: &[YearRecord], binding_anchors: &[AnchorRecord]) -> Vec<MergedYearRecord> {
    let mut merged: Vec<MergedYearRecord> = series
        .iter()
        .map(|record| MergedYearRecord {
            record: record.clone(),
            provenance: BTreeMap::new(),
        })
        .collect();

    let field_map = registry::binding_field_map();

    // Resolve, group by field, dedupe by year. Input order matters for
    // the later-processed-wins tie-break.
    let mut by_field: BTreeMap<SimField, BTreeMap<Year, Observation>> = BTreeMap::new();
    for anchor in binding_anchors {
        let Some(&field) = field_map.get(anchor.metric.as_str()) else {
            log::debug!(
                "dropping anchor {} ('{}'): metric not binding or unknown",
                anchor.id,
                anchor.metric
            );
            continue;
        };
        let incoming = Observation {
            value: anchor.value,
            has_month: anchor.month.unwrap_or(0) != 0,
        };
        let slot = by_field.entry(field).or_default().entry(anchor.year);
        slot.and_modify(|existing| {
            // A month-specific row never loses to a year-only one.
            if !(existing.has_month && !incoming.has_month) {
                *existing = incoming;
            }
        })
        .or_insert(incoming);
    }

    for (field, observations) in &by_field {
        let (Some(&first_year), Some(&last_year)) =
            (observations.keys().next(), observations.keys().next_back())
        else {
            continue;
        };

        for row in merged.iter_mut() {
            let year = row.record.year;
            if year > last_year {
                continue; // forecast region, simulated value stands
            }
            if let Some(obs) = observations.get(&year) {
                field.set(&mut row.record, obs.value);
                row.provenance.insert(*field, Provenance::Anchor);
            } else if year < first_year {
                field.set(&mut row.record, 0.0);
                row.provenance.insert(*field, Provenance::Interpolated);
            } else {
                // Strictly between two anchor years; both brackets exist
                // because year lies inside [first_year, last_year] and is
                // not itself an anchor year.
                let prev = observations.range(..year).next_back();
                let next = observations.range(year + 1..).next();
                if let (Some((&prev_year, prev_obs)), Some((&next_year, next_obs))) = (prev, next)
                {
                    let frac = (year - prev_year) as f64 / (next_year - prev_year) as f64;
                    let value = (prev_obs.value + frac * (next_obs.value - prev_obs.value)).round();
                    field.set(&mut row.record, value);
                    row.provenance.insert(*field, Provenance::Interpolated);
                }
            }
        }
    }

    merged
}
