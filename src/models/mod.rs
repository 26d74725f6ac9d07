//! Data models for plotkeeper entities.
//!
//! This module defines the core data structures:
//! - `Container` - Raised beds, pots, and greenhouse planters with fixed geometry
//! - `PlantSpec` - Catalog entries describing a species (not a planted instance)
//! - `Cell` - A single planting slot bound to one container, empty or occupied

pub mod cell;
pub mod container;
pub mod plant;

pub use cell::{Cell, CellState};
pub use container::{Container, ContainerKind, DrainageClass, SoilUnit};
pub use plant::{HarvestStyle, PlantCategory, PlantKind, PlantSpec};

/// Round to two decimal places, the precision used for reported areas and soil volumes.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
