//! Shared primitive types used across the simulation core.

/// A calendar year in the simulated timeline.
pub type Year = i32;

/// A stable, externally assigned identifier for an anchor row.
pub type AnchorId = String;
