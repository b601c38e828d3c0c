//! Anchor records and the classification boundary.
//!
//! Anchors are externally sourced, human-reviewed datapoints. They live
//! in a store this crate never touches; rows arrive read-only and are
//! partitioned once, here, into the three buckets downstream code cares
//! about. The (confidence, status) string pair becomes an explicit
//! ReviewState at this boundary so no later code re-tests raw strings.
//!
//! RULES:
//!   - classify() never inspects the metric key. Rows with unknown
//!     metrics survive classification and are dropped later, at merge
//!     time, by a failed registry lookup.
//!   - Rows matching no bucket (rejected, approved-but-proposed,
//!     deprecated) are inert: excluded from all three buckets, never an
//!     error.

use crate::registry::{self, ChartView};
use crate::types::{AnchorId, Year};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorStatus {
    Proposed,
    Anchored,
    Annotated,
    Deprecated,
}

/// Where a datapoint came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorSource {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub contributor: Option<String>,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

/// One externally sourced datapoint. Owned by the anchor store;
/// read-only inside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRecord {
    pub id: AnchorId,
    pub company: String,
    pub year: Year,
    #[serde(default)]
    pub month: Option<u32>,
    pub metric: String,
    pub value: f64,
    pub unit: String,
    #[serde(default)]
    pub city: Option<String>,
    pub confidence: Confidence,
    pub status: AnchorStatus,
    #[serde(default)]
    pub source: Option<AnchorSource>,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// The closed review-state machine behind the (confidence, status)
/// pair. Computed once; everything downstream matches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// Approved and anchored: overrides the simulated curve.
    Binding,
    /// Community-submitted, unreviewed: displayed, never binding.
    Pending,
    /// Approved but informational only.
    Annotation,
    /// Everything else: rejected, deprecated, or approved-but-proposed.
    Inert,
}

impl ReviewState {
    pub fn of(confidence: Confidence, status: AnchorStatus) -> Self {
        match (confidence, status) {
            (Confidence::Approved, AnchorStatus::Anchored) => ReviewState::Binding,
            (Confidence::Approved, AnchorStatus::Annotated) => ReviewState::Annotation,
            (Confidence::Pending, _) => ReviewState::Pending,
            _ => ReviewState::Inert,
        }
    }
}

impl AnchorRecord {
    pub fn review_state(&self) -> ReviewState {
        ReviewState::of(self.confidence, self.status)
    }
}

/// The classified view of a raw anchor set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitAnchors {
    pub binding: Vec<AnchorRecord>,
    pub pending: Vec<AnchorRecord>,
    pub annotations: Vec<AnchorRecord>,
}

/// Partition raw rows into the three buckets. Single linear pass;
/// inert rows are dropped. Input order is preserved within each bucket,
/// which the merger's duplicate tie-break relies on.
pub fn classify(rows: &[AnchorRecord]) -> SplitAnchors {
    let mut split = SplitAnchors::default();
    for row in rows {
        match row.review_state() {
            ReviewState::Binding => split.binding.push(row.clone()),
            ReviewState::Pending => split.pending.push(row.clone()),
            ReviewState::Annotation => split.annotations.push(row.clone()),
            ReviewState::Inert => {}
        }
    }
    log::debug!(
        "classified {} rows: {} binding, {} pending, {} annotations",
        rows.len(),
        split.binding.len(),
        split.pending.len(),
        split.annotations.len()
    );
    split
}

/// Latest anchor year across a view's binding metrics — the boundary
/// between the historical and forecast regions of a chart. Derived on
/// demand, never stored.
pub fn last_anchor_year(binding_anchors: &[AnchorRecord], view: ChartView) -> Option<Year> {
    let metrics = registry::binding_metrics_for_view(view);
    binding_anchors
        .iter()
        .filter(|a| metrics.contains(&a.metric.as_str()))
        .map(|a| a.year)
        .max()
}
