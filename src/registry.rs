//! The garden registry: owner of containers, cells, and the plant library.
//!
//! The registry is an arena. Containers and cells live in insertion-ordered
//! vectors and are found by id through side indexes; a cell refers to its
//! container by id only. Harvest forecasts and listings rely on insertion
//! order, so entries are never reordered or removed.

use crate::clock::Clock;
use crate::models::{round2, Cell, Container, PlantSpec};
use crate::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Default look-ahead window for `upcoming_harvests`, in days.
pub const DEFAULT_HARVEST_WINDOW_DAYS: i64 = 7;

/// A cell due for harvest within the requested window.
#[derive(Debug, Clone, Copy)]
pub struct UpcomingHarvest<'a> {
    pub cell: &'a Cell,
    pub harvest_date: DateTime<Utc>,
}

/// Point-in-time statistics for a garden. Always freshly computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GardenSummary {
    pub garden_name: String,
    pub zone: String,
    pub total_containers: usize,
    pub total_cells: usize,
    pub occupied_cells: usize,
    pub available_cells: usize,
    /// Square inches, rounded to two decimals
    pub total_planting_area: f64,
    pub plant_types_in_library: usize,
}

impl fmt::Display for GardenSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Zone {}): {} of {} cells planted",
            self.garden_name, self.zone, self.occupied_cells, self.total_cells
        )
    }
}

/// Serializable form of a registry, as written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GardenDocument {
    pub garden_name: String,
    pub zone: String,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub plant_library: Vec<PlantSpec>,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// Owns every container, cell, and plant spec in a garden.
#[derive(Debug, Clone)]
pub struct GardenRegistry {
    garden_name: String,
    zone: String,
    containers: Vec<Container>,
    container_index: HashMap<String, usize>,
    cells: Vec<Cell>,
    cell_index: HashMap<String, usize>,
    plant_library: Vec<Arc<PlantSpec>>,
}

impl GardenRegistry {
    /// Create an empty garden in the given USDA hardiness zone (e.g., "7a").
    pub fn new(garden_name: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            garden_name: garden_name.into(),
            zone: zone.into(),
            containers: Vec::new(),
            container_index: HashMap::new(),
            cells: Vec::new(),
            cell_index: HashMap::new(),
            plant_library: Vec::new(),
        }
    }

    pub fn garden_name(&self) -> &str {
        &self.garden_name
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    // === Containers ===

    /// Add a container. Container ids must be unique within the garden.
    pub fn add_container(&mut self, container: Container) -> Result<&Container> {
        if self.container_index.contains_key(container.id()) {
            return Err(Error::DuplicateId(container.id().to_string()));
        }
        tracing::debug!(container = container.id(), kind = container.kind().type_name(), "adding container");
        let position = self.containers.len();
        self.container_index
            .insert(container.id().to_string(), position);
        self.containers.push(container);
        Ok(&self.containers[position])
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.container_index.get(id).map(|&i| &self.containers[i])
    }

    /// Move a mobile container, returning its previous location.
    pub fn relocate_container(
        &mut self,
        id: &str,
        location: impl Into<String>,
    ) -> Result<Option<String>> {
        let position = *self
            .container_index
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("container {}", id)))?;
        self.containers[position].relocate(location)
    }

    /// Sum of all container areas in square inches.
    pub fn total_planting_area(&self) -> f64 {
        self.containers.iter().map(Container::area).sum()
    }

    // === Plant library ===

    /// Add a species to the library. Plant ids must be unique within the library.
    pub fn add_plant_to_library(&mut self, plant: PlantSpec) -> Result<Arc<PlantSpec>> {
        if self.plant(&plant.id).is_some() {
            return Err(Error::DuplicateId(plant.id));
        }
        tracing::debug!(plant = %plant.id, category = %plant.category(), "adding plant to library");
        let plant = Arc::new(plant);
        self.plant_library.push(Arc::clone(&plant));
        Ok(plant)
    }

    pub fn plant_library(&self) -> &[Arc<PlantSpec>] {
        &self.plant_library
    }

    pub fn plant(&self, id: &str) -> Option<&Arc<PlantSpec>> {
        self.plant_library.iter().find(|p| p.id == id)
    }

    /// Library entries whose category tag matches exactly (case-sensitive).
    pub fn plants_by_category(&self, category: &str) -> Vec<&Arc<PlantSpec>> {
        self.plant_library
            .iter()
            .filter(|p| p.category().as_str() == category)
            .collect()
    }

    // === Cells ===

    /// Create an empty cell in a registered container.
    ///
    /// Fails with `NotFound` for an unknown container, `InvalidInput` for a
    /// row label that is not letters only, and `CellExists` when the
    /// container already has a cell at these coordinates.
    pub fn create_cell(
        &mut self,
        container_id: &str,
        row: impl Into<String>,
        column: u32,
    ) -> Result<&Cell> {
        if !self.container_index.contains_key(container_id) {
            return Err(Error::NotFound(format!("container {}", container_id)));
        }
        let row: String = row.into();
        Cell::validate_row(&row)?;
        let cell = Cell::new(container_id, row, column);
        if self.cell_index.contains_key(cell.id()) {
            return Err(Error::CellExists(cell.id().to_string()));
        }
        tracing::debug!(cell = cell.id(), "creating cell");
        let position = self.cells.len();
        self.cell_index.insert(cell.id().to_string(), position);
        self.cells.push(cell);
        Ok(&self.cells[position])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cell_index.get(id).map(|&i| &self.cells[i])
    }

    fn cell_mut(&mut self, id: &str) -> Result<&mut Cell> {
        let position = *self
            .cell_index
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("cell {}", id)))?;
        Ok(&mut self.cells[position])
    }

    /// Container a cell is bound to.
    pub fn container_of(&self, cell: &Cell) -> Option<&Container> {
        self.container(cell.container_id())
    }

    /// Human-readable position of a cell, e.g. "Main Bed - Cell A1".
    pub fn location_label(&self, cell_id: &str) -> Result<String> {
        let cell = self
            .cell(cell_id)
            .ok_or_else(|| Error::NotFound(format!("cell {}", cell_id)))?;
        let container = self
            .container_of(cell)
            .ok_or_else(|| Error::NotFound(format!("container {}", cell.container_id())))?;
        Ok(cell.location_label(container))
    }

    /// Plant a library species into a cell at the clock's current time.
    pub fn plant_cell(&mut self, cell_id: &str, plant_id: &str, clock: &dyn Clock) -> Result<&Cell> {
        self.plant_cell_at(cell_id, plant_id, clock.now())
    }

    /// Plant a library species into a cell at an explicit time.
    pub fn plant_cell_at(
        &mut self,
        cell_id: &str,
        plant_id: &str,
        planted_at: DateTime<Utc>,
    ) -> Result<&Cell> {
        let plant = self
            .plant(plant_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("plant {}", plant_id)))?;
        let cell = self.cell_mut(cell_id)?;
        cell.plant(plant, planted_at)?;
        tracing::info!(cell = cell_id, plant = plant_id, %planted_at, "planted cell");
        Ok(&*cell)
    }

    /// Harvest a cell. Returns `None` if it was already empty.
    pub fn harvest_cell(&mut self, cell_id: &str) -> Result<Option<Arc<PlantSpec>>> {
        let harvested = self.cell_mut(cell_id)?.harvest();
        match &harvested {
            Some(plant) => tracing::info!(cell = cell_id, plant = %plant.id, "harvested cell"),
            None => tracing::debug!(cell = cell_id, "harvest on empty cell"),
        }
        Ok(harvested)
    }

    /// Cells with nothing planted, in creation order.
    pub fn available_cells(&self) -> Vec<&Cell> {
        self.cells.iter().filter(|c| !c.is_occupied()).collect()
    }

    /// Cells with something planted, in creation order.
    pub fn occupied_cells(&self) -> Vec<&Cell> {
        self.cells.iter().filter(|c| c.is_occupied()).collect()
    }

    /// Occupied cells due within `days_ahead` days of the clock's current time.
    pub fn upcoming_harvests(&self, clock: &dyn Clock, days_ahead: i64) -> Vec<UpcomingHarvest<'_>> {
        self.upcoming_harvests_at(clock.now(), days_ahead)
    }

    /// Occupied cells whose expected harvest date is on or before `now + days_ahead`.
    ///
    /// Overdue cells are included. Results are sorted by date; cells due at
    /// the same moment keep their creation order. A negative window yields
    /// nothing.
    pub fn upcoming_harvests_at(
        &self,
        now: DateTime<Utc>,
        days_ahead: i64,
    ) -> Vec<UpcomingHarvest<'_>> {
        if days_ahead < 0 {
            return Vec::new();
        }
        let cutoff = TimeDelta::try_days(days_ahead)
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut upcoming: Vec<UpcomingHarvest<'_>> = self
            .cells
            .iter()
            .filter_map(|cell| {
                let harvest_date = cell.expected_harvest_date()?;
                (harvest_date <= cutoff).then_some(UpcomingHarvest { cell, harvest_date })
            })
            .collect();
        // sort_by_key is stable
        upcoming.sort_by_key(|h| h.harvest_date);
        upcoming
    }

    /// Snapshot of counts and totals.
    pub fn summary(&self) -> GardenSummary {
        let occupied = self.cells.iter().filter(|c| c.is_occupied()).count();
        GardenSummary {
            garden_name: self.garden_name.clone(),
            zone: self.zone.clone(),
            total_containers: self.containers.len(),
            total_cells: self.cells.len(),
            occupied_cells: occupied,
            available_cells: self.cells.len() - occupied,
            total_planting_area: round2(self.total_planting_area()),
            plant_types_in_library: self.plant_library.len(),
        }
    }

    // === Persistence ===

    /// Convert to the on-disk document.
    pub fn to_document(&self) -> GardenDocument {
        GardenDocument {
            garden_name: self.garden_name.clone(),
            zone: self.zone.clone(),
            containers: self.containers.clone(),
            plant_library: self.plant_library.iter().map(|p| (**p).clone()).collect(),
            cells: self.cells.clone(),
        }
    }

    /// Rebuild a registry from a document, re-checking every uniqueness rule.
    pub fn from_document(doc: GardenDocument) -> Result<Self> {
        let mut registry = Self::new(doc.garden_name, doc.zone);
        for container in doc.containers {
            container.validate()?;
            registry.add_container(container)?;
        }
        for plant in doc.plant_library {
            registry.add_plant_to_library(plant)?;
        }
        for cell in doc.cells {
            if !registry.container_index.contains_key(cell.container_id()) {
                return Err(Error::NotFound(format!(
                    "container {} for cell {}",
                    cell.container_id(),
                    cell.id()
                )));
            }
            Cell::validate_row(cell.row())?;
            if registry.cell_index.contains_key(cell.id()) {
                return Err(Error::CellExists(cell.id().to_string()));
            }
            registry
                .cell_index
                .insert(cell.id().to_string(), registry.cells.len());
            registry.cells.push(cell);
        }
        Ok(registry)
    }
}
