//! Command implementations for the Plotkeeper CLI.
//!
//! Each command opens the garden's storage, loads the registry, applies the
//! operation, saves if anything changed, and returns a result that can be
//! printed as JSON or as human-readable text.

use crate::clock::{start_of_day, Clock};
use crate::config::{
    self, CONFIG_KEYS, ConfigOverrides, GardenConfig, ResolvedConfig, ValueSource,
};
use crate::models::{
    Cell, Container, ContainerKind, PlantKind, PlantSpec, SoilUnit,
};
use crate::registry::{GardenRegistry, GardenSummary};
use crate::storage::Storage;
use crate::{action_log, Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to a single-line JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

fn open_garden(garden_path: &Path) -> Result<(Storage, GardenRegistry)> {
    let storage = Storage::open(garden_path)?;
    let registry = storage.load()?;
    Ok((storage, registry))
}

// === init ===

#[derive(Serialize)]
pub struct InitResult {
    pub initialized: bool,
    pub garden_name: String,
    pub zone: String,
    pub storage_path: String,
}

impl Output for InitResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Initialized garden \"{}\" (Zone {})\nData stored in {}",
            self.garden_name, self.zone, self.storage_path
        )
    }
}

/// Create a new, empty garden for `garden_path`.
pub fn init(garden_path: &Path, name: &str, zone: &str) -> Result<InitResult> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("Garden name cannot be empty".to_string()));
    }
    if zone.trim().is_empty() {
        return Err(Error::InvalidInput("Zone cannot be empty".to_string()));
    }
    let storage = Storage::init(garden_path, name, zone)?;
    Ok(InitResult {
        initialized: true,
        garden_name: name.to_string(),
        zone: zone.to_string(),
        storage_path: storage.root().display().to_string(),
    })
}

// === summary ===

impl Output for GardenSummary {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut out = format!("{}\n", self);
        let _ = writeln!(out, "  Containers:     {}", self.total_containers);
        let _ = writeln!(
            out,
            "  Cells:          {} ({} occupied, {} available)",
            self.total_cells, self.occupied_cells, self.available_cells
        );
        let _ = writeln!(out, "  Planting area:  {} sq in", self.total_planting_area);
        let _ = write!(out, "  Plant library:  {} species", self.plant_types_in_library);
        out
    }
}

pub fn summary(garden_path: &Path) -> Result<GardenSummary> {
    let (_, registry) = open_garden(garden_path)?;
    Ok(registry.summary())
}

// === containers ===

/// Serializable view of a container with its derived geometry.
#[derive(Serialize)]
pub struct ContainerView {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub container_type: &'static str,
    pub location: Option<String>,
    pub area: f64,
    pub volume_capacity: f64,
    pub drainage: &'static str,
    pub mobile: bool,
}

impl ContainerView {
    fn from_container(container: &Container) -> Self {
        Self {
            id: container.id().to_string(),
            name: container.name().to_string(),
            container_type: container.kind().type_name(),
            location: container.location().map(str::to_string),
            area: crate::models::round2(container.area()),
            volume_capacity: crate::models::round2(container.volume_capacity()),
            drainage: container.drainage_class().as_str(),
            mobile: container.is_mobile(),
        }
    }

    fn human_line(&self) -> String {
        format!(
            "{} {} [{}] at {} - {} sq in, {} cu in",
            self.id,
            self.name,
            self.container_type,
            self.location.as_deref().unwrap_or("unspecified location"),
            self.area,
            self.volume_capacity
        )
    }
}

impl Output for ContainerView {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Added container {}", self.human_line())
    }
}

/// Arguments for `container add`, one variant per shape.
#[derive(Debug, Clone)]
pub struct NewContainer {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub kind: ContainerKind,
}

pub fn container_add(garden_path: &Path, new: NewContainer) -> Result<ContainerView> {
    let (storage, mut registry) = open_garden(garden_path)?;
    let mut container = Container::new(new.id, new.name, new.kind)?;
    if let Some(location) = new.location {
        container = container.with_location(location);
    }
    let view = ContainerView::from_container(registry.add_container(container)?);
    storage.save(&registry)?;
    Ok(view)
}

#[derive(Serialize)]
pub struct ContainerList {
    pub containers: Vec<ContainerView>,
    pub count: usize,
}

impl Output for ContainerList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.containers.is_empty() {
            return "No containers.".to_string();
        }
        let mut out = format!("{} container(s):", self.count);
        for c in &self.containers {
            let _ = write!(out, "\n  {}", c.human_line());
        }
        out
    }
}

pub fn container_list(garden_path: &Path) -> Result<ContainerList> {
    let (_, registry) = open_garden(garden_path)?;
    let containers: Vec<ContainerView> = registry
        .containers()
        .iter()
        .map(ContainerView::from_container)
        .collect();
    Ok(ContainerList {
        count: containers.len(),
        containers,
    })
}

#[derive(Serialize)]
pub struct ContainerDetail {
    #[serde(flatten)]
    pub container: ContainerView,
    pub drainage_description: &'static str,
    pub soil_needed: f64,
    pub soil_unit: SoilUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_capacity: Option<u64>,
    pub year_round: bool,
    pub growing_advantages: Vec<&'static str>,
    pub cells: usize,
    pub occupied_cells: usize,
}

impl Output for ContainerDetail {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let unit = match self.soil_unit {
            SoilUnit::CubicInches => "cu in",
            SoilUnit::CubicFeet => "cu ft",
            SoilUnit::CubicYards => "cu yd",
        };
        let mut out = self.container.human_line();
        let _ = write!(out, "\n  Drainage:  {}", self.drainage_description);
        let _ = write!(out, "\n  Soil:      {} {}", self.soil_needed, unit);
        if let Some(capacity) = self.planting_capacity {
            let _ = write!(out, "\n  Capacity:  {} plants", capacity);
        }
        let _ = write!(
            out,
            "\n  Cells:     {} ({} occupied)",
            self.cells, self.occupied_cells
        );
        if self.year_round {
            let _ = write!(out, "\n  Year-round growing possible");
        }
        for advantage in &self.growing_advantages {
            let _ = write!(out, "\n  + {}", advantage);
        }
        out
    }
}

pub fn container_show(
    garden_path: &Path,
    id: &str,
    spacing: Option<f64>,
    soil_unit: SoilUnit,
) -> Result<ContainerDetail> {
    let (_, registry) = open_garden(garden_path)?;
    let container = registry
        .container(id)
        .ok_or_else(|| Error::NotFound(format!("container {}", id)))?;
    let cells: Vec<&Cell> = registry
        .cells()
        .iter()
        .filter(|c| c.container_id() == id)
        .collect();
    Ok(ContainerDetail {
        container: ContainerView::from_container(container),
        drainage_description: container.drainage_class().description(),
        soil_needed: container.soil_needed(soil_unit),
        soil_unit,
        planting_capacity: spacing.map(|s| container.planting_capacity(s)),
        year_round: container.can_grow_year_round(),
        growing_advantages: container.growing_advantages(),
        cells: cells.len(),
        occupied_cells: cells.iter().filter(|c| c.is_occupied()).count(),
    })
}

#[derive(Serialize)]
pub struct ContainerMoved {
    pub id: String,
    pub previous_location: Option<String>,
    pub location: String,
}

impl Output for ContainerMoved {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match &self.previous_location {
            Some(previous) => format!("Moved {} from {} to {}", self.id, previous, self.location),
            None => format!("Moved {} to {}", self.id, self.location),
        }
    }
}

pub fn container_move(garden_path: &Path, id: &str, location: &str) -> Result<ContainerMoved> {
    let (storage, mut registry) = open_garden(garden_path)?;
    let previous_location = registry.relocate_container(id, location)?;
    storage.save(&registry)?;
    Ok(ContainerMoved {
        id: id.to_string(),
        previous_location,
        location: location.to_string(),
    })
}

// === plants ===

/// Serializable view of a library plant with its growing traits.
#[derive(Serialize)]
pub struct PlantView {
    pub id: String,
    pub common_name: String,
    pub scientific_name: String,
    pub category: &'static str,
    pub maturity_days: u32,
    pub spacing_inches: f64,
    pub water_frequency: &'static str,
    pub harvest_method: &'static str,
    pub frost_sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pollinator_benefits: Option<String>,
}

impl PlantView {
    fn from_spec(plant: &PlantSpec) -> Self {
        Self {
            id: plant.id.clone(),
            common_name: plant.common_name.clone(),
            scientific_name: plant.scientific_name.clone(),
            category: plant.category().as_str(),
            maturity_days: plant.maturity_days(),
            spacing_inches: plant.spacing_requirement(),
            water_frequency: plant.water_frequency(),
            harvest_method: plant.harvest_method(),
            frost_sensitive: plant.is_frost_sensitive(),
            pollinator_benefits: plant.pollinator_benefits(),
        }
    }

    fn human_line(&self) -> String {
        format!(
            "{} {} ({}) [{}] - {} days",
            self.id, self.common_name, self.scientific_name, self.category, self.maturity_days
        )
    }
}

impl Output for PlantView {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut out = self.human_line();
        let _ = write!(out, "\n  Spacing:  {} in", self.spacing_inches);
        let _ = write!(out, "\n  Water:    {}", self.water_frequency);
        let _ = write!(out, "\n  Harvest:  {}", self.harvest_method);
        let _ = write!(
            out,
            "\n  Frost:    {}",
            if self.frost_sensitive { "sensitive" } else { "tolerant" }
        );
        if let Some(ref notes) = self.pollinator_benefits {
            let _ = write!(out, "\n  {}", notes);
        }
        out
    }
}

/// Arguments for `plant add`.
#[derive(Debug, Clone)]
pub struct NewPlant {
    pub id: String,
    pub common_name: String,
    pub scientific_name: String,
    pub maturity_days: u32,
    pub kind: PlantKind,
}

pub fn plant_add(garden_path: &Path, new: NewPlant) -> Result<PlantView> {
    if new.id.trim().is_empty() {
        return Err(Error::InvalidInput("Plant ID cannot be empty".to_string()));
    }
    let (storage, mut registry) = open_garden(garden_path)?;
    let plant = registry.add_plant_to_library(PlantSpec::new(
        new.id,
        new.common_name,
        new.scientific_name,
        new.maturity_days,
        new.kind,
    ))?;
    storage.save(&registry)?;
    Ok(PlantView::from_spec(&plant))
}

#[derive(Serialize)]
pub struct PlantList {
    pub plants: Vec<PlantView>,
    pub count: usize,
}

impl Output for PlantList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.plants.is_empty() {
            return "No plants.".to_string();
        }
        let mut out = format!("{} plant(s):", self.count);
        for p in &self.plants {
            let _ = write!(out, "\n  {}", p.human_line());
        }
        out
    }
}

/// List the plant library, optionally filtered by exact category tag.
pub fn plant_list(garden_path: &Path, category: Option<&str>) -> Result<PlantList> {
    let (_, registry) = open_garden(garden_path)?;
    let plants: Vec<PlantView> = match category {
        Some(category) => registry
            .plants_by_category(category)
            .into_iter()
            .map(|p| PlantView::from_spec(p))
            .collect(),
        None => registry
            .plant_library()
            .iter()
            .map(|p| PlantView::from_spec(p))
            .collect(),
    };
    Ok(PlantList {
        count: plants.len(),
        plants,
    })
}

pub fn plant_show(garden_path: &Path, id: &str) -> Result<PlantView> {
    let (_, registry) = open_garden(garden_path)?;
    registry
        .plant(id)
        .map(|p| PlantView::from_spec(p))
        .ok_or_else(|| Error::NotFound(format!("plant {}", id)))
}

// === cells ===

/// Serializable view of a cell and its occupant.
#[derive(Serialize)]
pub struct CellView {
    pub id: String,
    pub container_id: String,
    pub row: String,
    pub column: u32,
    pub label: String,
    pub occupied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_harvest: Option<DateTime<Utc>>,
}

impl CellView {
    fn new(registry: &GardenRegistry, cell: &Cell) -> Self {
        let label = registry
            .container_of(cell)
            .map(|c| cell.location_label(c))
            .unwrap_or_else(|| cell.id().to_string());
        let plant = cell.current_plant();
        Self {
            id: cell.id().to_string(),
            container_id: cell.container_id().to_string(),
            row: cell.row().to_string(),
            column: cell.column(),
            label,
            occupied: cell.is_occupied(),
            plant_id: plant.map(|p| p.id.clone()),
            plant_name: plant.map(|p| p.common_name.clone()),
            planted_at: cell.planted_at(),
            expected_harvest: cell.expected_harvest_date(),
        }
    }

    fn human_line(&self) -> String {
        match (&self.plant_name, self.expected_harvest) {
            (Some(name), Some(date)) => format!(
                "{} ({}) - {}, harvest {}",
                self.id,
                self.label,
                name,
                date.format("%Y-%m-%d")
            ),
            (Some(name), None) => format!("{} ({}) - {}", self.id, self.label, name),
            _ => format!("{} ({}) - empty", self.id, self.label),
        }
    }
}

impl Output for CellView {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.human_line()
    }
}

pub fn cell_create(garden_path: &Path, container_id: &str, row: &str, column: u32) -> Result<CellView> {
    let (storage, mut registry) = open_garden(garden_path)?;
    let id = registry.create_cell(container_id, row, column)?.id().to_string();
    storage.save(&registry)?;
    cell_view(&registry, &id)
}

fn cell_view(registry: &GardenRegistry, id: &str) -> Result<CellView> {
    registry
        .cell(id)
        .map(|cell| CellView::new(registry, cell))
        .ok_or_else(|| Error::NotFound(format!("cell {}", id)))
}

/// Which cells `cell list` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFilter {
    All,
    Available,
    Occupied,
}

#[derive(Serialize)]
pub struct CellList {
    pub cells: Vec<CellView>,
    pub count: usize,
}

impl Output for CellList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.cells.is_empty() {
            return "No cells.".to_string();
        }
        let mut out = format!("{} cell(s):", self.count);
        for c in &self.cells {
            let _ = write!(out, "\n  {}", c.human_line());
        }
        out
    }
}

pub fn cell_list(garden_path: &Path, filter: CellFilter) -> Result<CellList> {
    let (_, registry) = open_garden(garden_path)?;
    let selected: Vec<&Cell> = match filter {
        CellFilter::All => registry.cells().iter().collect(),
        CellFilter::Available => registry.available_cells(),
        CellFilter::Occupied => registry.occupied_cells(),
    };
    let cells: Vec<CellView> = selected
        .into_iter()
        .map(|cell| CellView::new(&registry, cell))
        .collect();
    Ok(CellList {
        count: cells.len(),
        cells,
    })
}

pub fn cell_show(garden_path: &Path, id: &str) -> Result<CellView> {
    let (_, registry) = open_garden(garden_path)?;
    cell_view(&registry, id)
}

/// Plant into a cell. Without `planted_on` the planting time comes from `clock`.
pub fn cell_plant(
    garden_path: &Path,
    cell_id: &str,
    plant_id: &str,
    planted_on: Option<NaiveDate>,
    clock: &dyn Clock,
) -> Result<CellView> {
    let (storage, mut registry) = open_garden(garden_path)?;
    let planted_at = planted_on.map(start_of_day).unwrap_or_else(|| clock.now());
    registry.plant_cell_at(cell_id, plant_id, planted_at)?;
    storage.save(&registry)?;
    cell_view(&registry, cell_id)
}

#[derive(Serialize)]
pub struct HarvestResult {
    pub cell_id: String,
    pub harvested: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_name: Option<String>,
}

impl Output for HarvestResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match &self.plant_name {
            Some(name) => format!("Harvested {} from {}", name, self.cell_id),
            None => format!("Nothing to harvest in {}", self.cell_id),
        }
    }
}

/// Harvest a cell. Harvesting an empty cell succeeds with `harvested: false`.
pub fn cell_harvest(garden_path: &Path, cell_id: &str) -> Result<HarvestResult> {
    let (storage, mut registry) = open_garden(garden_path)?;
    let harvested = registry.harvest_cell(cell_id)?;
    if harvested.is_some() {
        storage.save(&registry)?;
    }
    Ok(HarvestResult {
        cell_id: cell_id.to_string(),
        harvested: harvested.is_some(),
        plant_id: harvested.as_ref().map(|p| p.id.clone()),
        plant_name: harvested.as_ref().map(|p| p.common_name.clone()),
    })
}

// === harvests ===

#[derive(Serialize)]
pub struct HarvestEntry {
    pub cell_id: String,
    pub label: String,
    pub plant_id: String,
    pub plant_name: String,
    pub planted_at: DateTime<Utc>,
    pub harvest_date: DateTime<Utc>,
    /// Calendar days (UTC) from today until the harvest date; negative when overdue
    pub days_until: i64,
}

#[derive(Serialize)]
pub struct HarvestSchedule {
    pub as_of: DateTime<Utc>,
    pub days_ahead: i64,
    pub harvests: Vec<HarvestEntry>,
    pub count: usize,
}

impl Output for HarvestSchedule {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.harvests.is_empty() {
            return format!("No harvests due in the next {} days.", self.days_ahead);
        }
        let mut out = format!(
            "{} harvest(s) due in the next {} days:",
            self.count, self.days_ahead
        );
        for h in &self.harvests {
            let when = match h.days_until {
                d if d < 0 => format!("overdue by {} days", -d),
                0 => "today".to_string(),
                d => format!("in {} days", d),
            };
            let _ = write!(
                out,
                "\n  {} {} - {} ({})",
                h.harvest_date.format("%Y-%m-%d"),
                h.label,
                h.plant_name,
                when
            );
        }
        out
    }
}

/// Upcoming harvests. `days_ahead` falls back to the resolved `harvest-window`.
pub fn harvests(garden_path: &Path, days_ahead: Option<i64>, clock: &dyn Clock) -> Result<HarvestSchedule> {
    let (storage, registry) = open_garden(garden_path)?;
    let days_ahead = match days_ahead {
        Some(days) => days,
        None => i64::from(config::resolve_config(&storage, &ConfigOverrides::default())?.harvest_window()),
    };
    let now = clock.now();
    let harvests: Vec<HarvestEntry> = registry
        .upcoming_harvests_at(now, days_ahead)
        .into_iter()
        .filter_map(|upcoming| {
            let cell = upcoming.cell;
            let plant = cell.current_plant()?;
            Some(HarvestEntry {
                cell_id: cell.id().to_string(),
                label: registry
                    .container_of(cell)
                    .map(|c| cell.location_label(c))
                    .unwrap_or_else(|| cell.id().to_string()),
                plant_id: plant.id.clone(),
                plant_name: plant.common_name.clone(),
                planted_at: cell.planted_at()?,
                harvest_date: upcoming.harvest_date,
                days_until: (upcoming.harvest_date.date_naive() - now.date_naive()).num_days(),
            })
        })
        .collect();
    Ok(HarvestSchedule {
        as_of: now,
        days_ahead,
        count: harvests.len(),
        harvests,
    })
}

// === config ===

#[derive(Serialize)]
pub struct ConfigValue {
    pub key: String,
    pub value: String,
    pub source: String,
}

impl Output for ConfigValue {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("{} = {} ({})", self.key, self.value, self.source)
    }
}

fn resolved_entries(resolved: &ResolvedConfig) -> Vec<ConfigValue> {
    let entry = |key: &str, value: String, source: &ValueSource| ConfigValue {
        key: key.to_string(),
        value,
        source: source.to_string(),
    };
    vec![
        entry(
            "output-format",
            resolved.output_format().as_str().to_string(),
            &resolved.output_format.source,
        ),
        entry(
            "harvest-window",
            resolved.harvest_window().to_string(),
            &resolved.harvest_window.source,
        ),
        entry(
            "action-log",
            resolved.action_log_enabled().to_string(),
            &resolved.action_log.source,
        ),
    ]
}

pub fn config_get(garden_path: &Path, key: &str) -> Result<ConfigValue> {
    if !CONFIG_KEYS.contains(&key) {
        return Err(Error::InvalidInput(format!(
            "Unknown config key: {} (expected one of: {})",
            key,
            CONFIG_KEYS.join(", ")
        )));
    }
    let storage = Storage::open(garden_path)?;
    let resolved = config::resolve_config(&storage, &ConfigOverrides::default())?;
    resolved_entries(&resolved)
        .into_iter()
        .find(|entry| entry.key == key)
        .ok_or_else(|| Error::NotFound(format!("config key {}", key)))
}

#[derive(Serialize)]
pub struct ConfigSet {
    pub key: String,
    pub value: String,
    pub scope: &'static str,
}

impl Output for ConfigSet {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {} ({})", self.key, self.value, self.scope)
    }
}

/// Set a key in the garden's session config, or the system config with `system`.
pub fn config_set(garden_path: &Path, key: &str, value: &str, system: bool) -> Result<ConfigSet> {
    let (mut current, storage): (GardenConfig, Option<Storage>) = if system {
        (Storage::read_system_garden_config()?, None)
    } else {
        let storage = Storage::open(garden_path)?;
        (storage.read_garden_config()?, Some(storage))
    };

    current.set(key, value).map_err(Error::InvalidInput)?;

    match storage {
        Some(storage) => storage.write_garden_config(&current)?,
        None => Storage::write_system_garden_config(&current)?,
    }
    let value = current
        .get(key)
        .map_err(Error::InvalidInput)?
        .unwrap_or_default();

    Ok(ConfigSet {
        key: key.to_string(),
        value,
        scope: if system { "system" } else { "session" },
    })
}

#[derive(Serialize)]
pub struct ConfigList {
    pub entries: Vec<ConfigValue>,
}

impl Output for ConfigList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.to_human())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn config_list(garden_path: &Path) -> Result<ConfigList> {
    let storage = Storage::open(garden_path)?;
    let resolved = config::resolve_config(&storage, &ConfigOverrides::default())?;
    Ok(ConfigList {
        entries: resolved_entries(&resolved),
    })
}

// === log ===

#[derive(Serialize)]
pub struct LogResult {
    pub entries: Vec<action_log::ActionLog>,
    pub count: usize,
}

impl Output for LogResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No logged actions.".to_string();
        }
        self.entries
            .iter()
            .map(|e| {
                let status = if e.success { "ok" } else { "failed" };
                format!(
                    "{} {} [{}] {}ms",
                    e.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    e.command,
                    status,
                    e.duration_ms
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The most recent `limit` action log entries, oldest first.
pub fn log(garden_path: &Path, limit: usize) -> Result<LogResult> {
    let storage = Storage::open(garden_path)?;
    let mut entries = action_log::read_entries(&storage)?;
    let skip = entries.len().saturating_sub(limit);
    entries.drain(..skip);
    Ok(LogResult {
        count: entries.len(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeDelta, TimeZone};

    // Commands resolve storage through PK_DATA_DIR, so each test gets its own
    // garden directory inside one shared data directory.
    fn garden() -> tempfile::TempDir {
        crate::test_utils::init_test_env_var();
        let dir = tempfile::TempDir::new().unwrap();
        init(dir.path(), "Test Garden", "7a").unwrap();
        dir
    }

    fn stock(path: &Path) {
        container_add(
            path,
            NewContainer {
                id: "bed1".to_string(),
                name: "Main Bed".to_string(),
                location: Some("backyard".to_string()),
                kind: ContainerKind::RaisedBed {
                    length: 48.0,
                    width: 24.0,
                    depth: 12.0,
                    material: "cedar".to_string(),
                },
            },
        )
        .unwrap();
        plant_add(
            path,
            NewPlant {
                id: "h1".to_string(),
                common_name: "Basil".to_string(),
                scientific_name: "Ocimum basilicum".to_string(),
                maturity_days: 21,
                kind: PlantKind::Herb { perennial: false },
            },
        )
        .unwrap();
        cell_create(path, "bed1", "A", 1).unwrap();
        cell_create(path, "bed1", "A", 2).unwrap();
    }

    #[test]
    fn test_init_rejects_blank_zone() {
        crate::test_utils::init_test_env_var();
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(init(dir.path(), "Garden", " "), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_commands_require_init() {
        crate::test_utils::init_test_env_var();
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(summary(dir.path()), Err(Error::NotInitialized)));
    }

    #[test]
    fn test_workflow_persists_between_commands() {
        let dir = garden();
        stock(dir.path());

        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
        let planted = cell_plant(dir.path(), "bed1_A1", "h1", None, &clock).unwrap();
        assert!(planted.occupied);
        assert_eq!(planted.label, "Main Bed - Cell A1");

        let summary = summary(dir.path()).unwrap();
        assert_eq!(summary.total_cells, 2);
        assert_eq!(summary.occupied_cells, 1);

        let available = cell_list(dir.path(), CellFilter::Available).unwrap();
        assert_eq!(available.count, 1);
        assert_eq!(available.cells[0].id, "bed1_A2");
    }

    #[test]
    fn test_harvest_schedule_uses_clock() {
        let dir = garden();
        stock(dir.path());

        let start = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let clock = FixedClock::at_date(start);
        cell_plant(dir.path(), "bed1_A1", "h1", Some(start), &clock).unwrap();

        assert_eq!(harvests(dir.path(), None, &clock).unwrap().count, 0);

        clock.advance(TimeDelta::days(15));
        let schedule = harvests(dir.path(), Some(10), &clock).unwrap();
        assert_eq!(schedule.count, 1);
        assert_eq!(schedule.harvests[0].days_until, 6);
        assert!(schedule.to_human().contains("in 6 days"));
    }

    #[test]
    fn test_days_until_counts_calendar_days() {
        let dir = garden();
        stock(dir.path());

        // Planted in the evening, so harvest lands at 20:00 on May 22.
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 5, 1, 20, 0, 0).unwrap());
        cell_plant(dir.path(), "bed1_A1", "h1", None, &clock).unwrap();

        clock.set(Utc.with_ymd_and_hms(2026, 5, 21, 22, 0, 0).unwrap());
        let schedule = harvests(dir.path(), Some(3), &clock).unwrap();
        assert_eq!(schedule.harvests[0].days_until, 1);
        assert!(schedule.to_human().contains("in 1 days"));

        clock.set(Utc.with_ymd_and_hms(2026, 5, 22, 6, 0, 0).unwrap());
        let schedule = harvests(dir.path(), Some(3), &clock).unwrap();
        assert_eq!(schedule.harvests[0].days_until, 0);
        assert!(schedule.to_human().contains("today"));

        clock.set(Utc.with_ymd_and_hms(2026, 5, 23, 10, 0, 0).unwrap());
        let schedule = harvests(dir.path(), Some(3), &clock).unwrap();
        assert_eq!(schedule.harvests[0].days_until, -1);
        assert!(schedule.to_human().contains("overdue by 1 days"));
    }

    #[test]
    fn test_harvest_empty_cell_is_not_an_error() {
        let dir = garden();
        stock(dir.path());

        let result = cell_harvest(dir.path(), "bed1_A2").unwrap();
        assert!(!result.harvested);
        assert!(result.to_json().contains("\"harvested\":false"));
    }

    #[test]
    fn test_config_set_then_get() {
        let dir = garden();
        config_set(dir.path(), "harvest-window", "12", false).unwrap();

        let value = config_get(dir.path(), "harvest-window").unwrap();
        assert_eq!(value.value, "12");
        assert_eq!(value.source, "session");
        assert!(config_get(dir.path(), "colour").is_err());
    }

    #[test]
    fn test_container_show_reports_capacity() {
        let dir = garden();
        stock(dir.path());

        let detail = container_show(dir.path(), "bed1", Some(12.0), SoilUnit::CubicFeet).unwrap();
        assert_eq!(detail.planting_capacity, Some(8));
        assert_eq!(detail.soil_needed, 8.0);
        assert_eq!(detail.cells, 2);
    }
}
