//! Planting containers.
//!
//! Every container exposes the same geometry contract (area, volume,
//! drainage) regardless of its shape. Dimensions are in inches.

use super::round2;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Cubic inches in a cubic foot.
const CUBIC_INCHES_PER_FOOT: f64 = 1728.0;

/// Cubic feet in a cubic yard.
const CUBIC_FEET_PER_YARD: f64 = 27.0;

/// Drainage characteristics of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainageClass {
    /// Elevated with open bottom
    Excellent,
    /// Pot with drainage holes
    Good,
    /// Pot without drainage holes
    Poor,
    /// Greenhouse planter tuned for moisture retention
    Controlled,
}

impl DrainageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrainageClass::Excellent => "excellent",
            DrainageClass::Good => "good",
            DrainageClass::Poor => "poor",
            DrainageClass::Controlled => "controlled",
        }
    }

    /// Human-readable description of the drainage class.
    pub fn description(&self) -> &'static str {
        match self {
            DrainageClass::Excellent => "Excellent - elevated with bottom drainage",
            DrainageClass::Good => "Good - drainage holes present",
            DrainageClass::Poor => "Poor - no drainage holes (needs careful watering)",
            DrainageClass::Controlled => "Controlled - designed for optimal moisture retention",
        }
    }
}

impl fmt::Display for DrainageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unit for soil volume estimates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilUnit {
    CubicInches,
    #[default]
    CubicFeet,
    CubicYards,
}

impl std::str::FromStr for SoilUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cubic_inches" | "cubic-inches" | "in3" => Ok(SoilUnit::CubicInches),
            "cubic_feet" | "cubic-feet" | "ft3" => Ok(SoilUnit::CubicFeet),
            "cubic_yards" | "cubic-yards" | "yd3" => Ok(SoilUnit::CubicYards),
            _ => Err(format!("Unknown soil unit: {}", s)),
        }
    }
}

/// Shape and fittings of a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContainerKind {
    /// Fixed rectangular bed
    RaisedBed {
        length: f64,
        width: f64,
        depth: f64,
        #[serde(default = "default_material")]
        material: String,
    },
    /// Mobile circular pot
    Pot {
        diameter: f64,
        depth: f64,
        #[serde(default = "default_drainage_holes")]
        has_drainage_holes: bool,
    },
    /// Climate-controlled rectangular planter
    GreenhousePlanter {
        length: f64,
        width: f64,
        depth: f64,
        #[serde(default)]
        has_heating: bool,
        #[serde(default)]
        has_supplemental_light: bool,
    },
}

fn default_material() -> String {
    "wood".to_string()
}

fn default_drainage_holes() -> bool {
    true
}

impl ContainerKind {
    /// Short type name ("raised_bed", "pot", "greenhouse_planter").
    pub fn type_name(&self) -> &'static str {
        match self {
            ContainerKind::RaisedBed { .. } => "raised_bed",
            ContainerKind::Pot { .. } => "pot",
            ContainerKind::GreenhousePlanter { .. } => "greenhouse_planter",
        }
    }

    /// Footprint as (length, width); pots use the diameter for both.
    fn footprint(&self) -> (f64, f64) {
        match *self {
            ContainerKind::RaisedBed { length, width, .. }
            | ContainerKind::GreenhousePlanter { length, width, .. } => (length, width),
            ContainerKind::Pot { diameter, .. } => (diameter, diameter),
        }
    }

    fn depth(&self) -> f64 {
        match *self {
            ContainerKind::RaisedBed { depth, .. }
            | ContainerKind::Pot { depth, .. }
            | ContainerKind::GreenhousePlanter { depth, .. } => depth,
        }
    }

    fn validate(&self) -> Result<()> {
        let (length, width) = self.footprint();
        for (label, value) in [("length", length), ("width", width), ("depth", self.depth())] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "Container {} must be a non-negative number, got {}",
                    label, value
                )));
            }
        }
        Ok(())
    }
}

/// A planting container owned by the garden registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(flatten)]
    kind: ContainerKind,
}

impl Container {
    /// Create a container, rejecting negative or non-finite dimensions.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ContainerKind) -> Result<Self> {
        kind.validate()?;
        Ok(Self {
            id: id.into(),
            name: name.into(),
            location: None,
            kind,
        })
    }

    /// Re-check dimensions of a container that did not come through `new`.
    pub(crate) fn validate(&self) -> Result<()> {
        self.kind.validate()
    }

    /// A wooden raised bed.
    pub fn raised_bed(
        id: impl Into<String>,
        name: impl Into<String>,
        length: f64,
        width: f64,
        depth: f64,
    ) -> Result<Self> {
        Self::new(
            id,
            name,
            ContainerKind::RaisedBed {
                length,
                width,
                depth,
                material: default_material(),
            },
        )
    }

    /// A pot with drainage holes.
    pub fn pot(
        id: impl Into<String>,
        name: impl Into<String>,
        diameter: f64,
        depth: f64,
    ) -> Result<Self> {
        Self::new(
            id,
            name,
            ContainerKind::Pot {
                diameter,
                depth,
                has_drainage_holes: true,
            },
        )
    }

    /// An unheated greenhouse planter without grow lights.
    pub fn greenhouse_planter(
        id: impl Into<String>,
        name: impl Into<String>,
        length: f64,
        width: f64,
        depth: f64,
    ) -> Result<Self> {
        Self::new(
            id,
            name,
            ContainerKind::GreenhousePlanter {
                length,
                width,
                depth,
                has_heating: false,
                has_supplemental_light: false,
            },
        )
    }

    /// Set the initial location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn kind(&self) -> &ContainerKind {
        &self.kind
    }

    /// Planting surface area in square inches.
    pub fn area(&self) -> f64 {
        match self.kind {
            ContainerKind::Pot { diameter, .. } => {
                let radius = diameter / 2.0;
                PI * radius * radius
            }
            _ => {
                let (length, width) = self.kind.footprint();
                length * width
            }
        }
    }

    /// Soil capacity in cubic inches.
    pub fn volume_capacity(&self) -> f64 {
        self.area() * self.kind.depth()
    }

    pub fn drainage_class(&self) -> DrainageClass {
        match self.kind {
            ContainerKind::RaisedBed { .. } => DrainageClass::Excellent,
            ContainerKind::Pot {
                has_drainage_holes: true,
                ..
            } => DrainageClass::Good,
            ContainerKind::Pot {
                has_drainage_holes: false,
                ..
            } => DrainageClass::Poor,
            ContainerKind::GreenhousePlanter { .. } => DrainageClass::Controlled,
        }
    }

    /// How many plants fit on a square grid with the given spacing.
    pub fn planting_capacity(&self, spacing: f64) -> u64 {
        if spacing.is_nan() || spacing <= 0.0 {
            return 0;
        }
        let (length, width) = self.kind.footprint();
        let per_row = (length / spacing).floor() as u64;
        let rows = (width / spacing).floor() as u64;
        per_row * rows
    }

    /// Soil required to fill the container.
    pub fn soil_needed(&self, unit: SoilUnit) -> f64 {
        let cubic_inches = self.volume_capacity();
        let cubic_feet = cubic_inches / CUBIC_INCHES_PER_FOOT;
        match unit {
            SoilUnit::CubicInches => cubic_inches,
            SoilUnit::CubicFeet => round2(cubic_feet),
            SoilUnit::CubicYards => round2(cubic_feet / CUBIC_FEET_PER_YARD),
        }
    }

    /// Only pots can be moved once placed.
    pub fn is_mobile(&self) -> bool {
        matches!(self.kind, ContainerKind::Pot { .. })
    }

    /// Move a mobile container, returning its previous location.
    pub fn relocate(&mut self, location: impl Into<String>) -> Result<Option<String>> {
        if !self.is_mobile() {
            return Err(Error::Immobile(self.id.clone()));
        }
        Ok(self.location.replace(location.into()))
    }

    /// Greenhouse planters with heating support winter growing.
    pub fn can_grow_year_round(&self) -> bool {
        matches!(
            self.kind,
            ContainerKind::GreenhousePlanter {
                has_heating: true,
                ..
            }
        )
    }

    /// Advantages of a greenhouse planter over outdoor growing; empty for other containers.
    pub fn growing_advantages(&self) -> Vec<&'static str> {
        let ContainerKind::GreenhousePlanter {
            has_heating,
            has_supplemental_light,
            ..
        } = self.kind
        else {
            return Vec::new();
        };

        let mut advantages = vec!["Protected from weather", "Pest control easier"];
        if has_heating {
            advantages.push("Year-round growing possible");
        }
        if has_supplemental_light {
            advantages.push("Extended day length for faster growth");
        }
        advantages
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) at {}",
            self.name,
            self.id,
            self.location.as_deref().unwrap_or("unspecified location")
        )
    }
}
