//! Planting cells and their occupancy state machine.

use super::{Container, PlantSpec};
use crate::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Occupancy of a cell.
///
/// The plant and its planting time only exist together, so a cell can never
/// be marked occupied without both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CellState {
    #[default]
    Empty,
    Occupied {
        plant: Arc<PlantSpec>,
        planted_at: DateTime<Utc>,
    },
}

/// A single planting slot inside a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Composite identifier: `{container_id}_{row}{column}`
    id: String,

    /// Container this cell belongs to (never changes)
    container_id: String,

    /// Row label (e.g., "A")
    row: String,

    /// Column number within the row
    column: u32,

    #[serde(flatten)]
    state: CellState,
}

impl Cell {
    /// Create an empty cell. Cells are created through the registry.
    pub(crate) fn new(container_id: impl Into<String>, row: impl Into<String>, column: u32) -> Self {
        let container_id = container_id.into();
        let row = row.into();
        Self {
            id: Self::compose_id(&container_id, &row, column),
            container_id,
            row,
            column,
            state: CellState::Empty,
        }
    }

    /// Row labels are letters only, so `{row}{column}` splits back into one
    /// row and one column.
    pub(crate) fn validate_row(row: &str) -> Result<()> {
        if row.is_empty() || !row.chars().all(char::is_alphabetic) {
            return Err(Error::InvalidInput(format!(
                "Row label must be letters only, got {:?}",
                row
            )));
        }
        Ok(())
    }

    /// Identifier a cell at these coordinates would get.
    pub fn compose_id(container_id: &str, row: &str, column: u32) -> String {
        format!("{}_{}{}", container_id, row, column)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn row(&self) -> &str {
        &self.row
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn state(&self) -> &CellState {
        &self.state
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self.state, CellState::Occupied { .. })
    }

    /// Plant currently growing here, if any.
    pub fn current_plant(&self) -> Option<&Arc<PlantSpec>> {
        match &self.state {
            CellState::Occupied { plant, .. } => Some(plant),
            CellState::Empty => None,
        }
    }

    /// When the current plant went in, if any.
    pub fn planted_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            CellState::Occupied { planted_at, .. } => Some(planted_at),
            CellState::Empty => None,
        }
    }

    /// Plant into an empty cell.
    ///
    /// An occupied cell is left untouched and `Error::AlreadyOccupied` is returned.
    pub fn plant(
        &mut self,
        plant: impl Into<Arc<PlantSpec>>,
        planted_at: DateTime<Utc>,
    ) -> Result<()> {
        if self.is_occupied() {
            return Err(Error::AlreadyOccupied(self.id.clone()));
        }
        self.state = CellState::Occupied {
            plant: plant.into(),
            planted_at,
        };
        Ok(())
    }

    /// Clear the cell, returning what was growing. Empty cells return `None`.
    pub fn harvest(&mut self) -> Option<Arc<PlantSpec>> {
        match std::mem::take(&mut self.state) {
            CellState::Occupied { plant, .. } => Some(plant),
            CellState::Empty => None,
        }
    }

    /// Planting time plus the plant's maturity days.
    ///
    /// Every occupied cell has a date; dates past the calendar's end
    /// saturate to `DateTime::<Utc>::MAX_UTC`.
    pub fn expected_harvest_date(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            CellState::Occupied { plant, planted_at } => Some(
                TimeDelta::try_days(i64::from(plant.maturity_days()))
                    .and_then(|growth| planted_at.checked_add_signed(growth))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            ),
            CellState::Empty => None,
        }
    }

    /// Human-readable position, e.g. "Main Bed - Cell A1".
    pub fn location_label(&self, container: &Container) -> String {
        format!("{} - Cell {}{}", container.name(), self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap()
    }

    fn basil() -> PlantSpec {
        PlantSpec::herb("h1", "Basil", "Ocimum basilicum", 21)
    }

    fn assert_consistent(cell: &Cell) {
        assert_eq!(cell.is_occupied(), cell.current_plant().is_some());
        assert_eq!(cell.is_occupied(), cell.planted_at().is_some());
    }

    #[test]
    fn test_new_cell_is_empty() {
        let cell = Cell::new("bed1", "A", 1);
        assert_eq!(cell.id(), "bed1_A1");
        assert!(!cell.is_occupied());
        assert!(cell.expected_harvest_date().is_none());
        assert_consistent(&cell);
    }

    #[test]
    fn test_plant_records_occupant() {
        let mut cell = Cell::new("bed1", "A", 1);
        cell.plant(basil(), t0()).unwrap();

        assert!(cell.is_occupied());
        assert_eq!(cell.current_plant().unwrap().id, "h1");
        assert_eq!(cell.planted_at(), Some(t0()));
        assert_consistent(&cell);
    }

    #[test]
    fn test_plant_into_occupied_cell_is_rejected() {
        let mut cell = Cell::new("bed1", "A", 1);
        cell.plant(basil(), t0()).unwrap();

        let tomato = PlantSpec::vegetable("v1", "Tomato", "Solanum lycopersicum", 75);
        let later = t0() + TimeDelta::days(3);
        let result = cell.plant(tomato, later);

        assert!(matches!(result, Err(Error::AlreadyOccupied(ref id)) if id == "bed1_A1"));
        assert_eq!(cell.current_plant().unwrap().id, "h1");
        assert_eq!(cell.planted_at(), Some(t0()));
    }

    #[test]
    fn test_harvest_twice() {
        let mut cell = Cell::new("bed1", "A", 1);
        cell.plant(basil(), t0()).unwrap();

        let first = cell.harvest();
        assert_eq!(first.unwrap().id, "h1");
        assert_consistent(&cell);

        assert!(cell.harvest().is_none());
        assert!(!cell.is_occupied());
        assert_consistent(&cell);
    }

    #[test]
    fn test_cell_can_be_replanted_after_harvest() {
        let mut cell = Cell::new("bed1", "A", 1);
        cell.plant(basil(), t0()).unwrap();
        cell.harvest();

        let later = t0() + TimeDelta::days(30);
        cell.plant(basil(), later).unwrap();
        assert_eq!(cell.planted_at(), Some(later));
    }

    #[test]
    fn test_expected_harvest_date() {
        let mut cell = Cell::new("bed1", "A", 1);
        cell.plant(basil(), t0()).unwrap();
        assert_eq!(cell.expected_harvest_date(), Some(t0() + TimeDelta::days(21)));
    }

    #[test]
    fn test_zero_maturity_harvests_same_day() {
        let mut cell = Cell::new("bed1", "A", 1);
        let sprouts = PlantSpec::vegetable("v0", "Sprouts", "Various", 0);
        cell.plant(sprouts, t0()).unwrap();
        assert_eq!(cell.expected_harvest_date(), Some(t0()));
    }

    #[test]
    fn test_extreme_maturity_saturates_harvest_date() {
        let mut cell = Cell::new("bed1", "A", 1);
        let slow = PlantSpec::herb("h9", "Slowroot", "Tardus", u32::MAX);
        cell.plant(slow, t0()).unwrap();
        assert_eq!(cell.expected_harvest_date(), Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_row_labels_are_letters_only() {
        assert!(Cell::validate_row("A").is_ok());
        assert!(Cell::validate_row("AB").is_ok());
        assert!(matches!(Cell::validate_row("A1"), Err(Error::InvalidInput(_))));
        assert!(matches!(Cell::validate_row("A_"), Err(Error::InvalidInput(_))));
        assert!(matches!(Cell::validate_row(""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_location_label() {
        let bed = Container::raised_bed("bed1", "Main Bed", 48.0, 24.0, 12.0).unwrap();
        let cell = Cell::new("bed1", "B", 3);
        assert_eq!(cell.location_label(&bed), "Main Bed - Cell B3");
    }

    #[test]
    fn test_serialization_of_states() {
        let mut cell = Cell::new("bed1", "A", 1);
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["state"], "empty");
        assert!(json.get("plant").is_none());

        cell.plant(basil(), t0()).unwrap();
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["state"], "occupied");
        assert_eq!(json["plant"]["id"], "h1");

        let parsed: Cell = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, cell);
    }
}
