//! Shift editing form and the save that replaces a shift's records

use std::collections::BTreeMap;

use manifest_types::{
    ManifestRecord, Shift, StatusPath, ValidationError, DRIVER_COLUMN_ID, PLATE_COLUMN_ID,
};
use tracing::info;

use crate::model::{normalize_plate, SchemaRegistry};
use crate::service::merge::{merge_shift, MergedRow};
use crate::state::AppState;

/// On-screen values of one row, as they would be submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowInput {
    pub plate: String,
    /// Raw field input keyed by column id
    pub values: BTreeMap<String, String>,
    /// Pending status for the row's hierarchical columns
    pub status: StatusPath,
}

impl From<MergedRow> for RowInput {
    fn from(row: MergedRow) -> Self {
        Self {
            plate: row.plate,
            values: row.values,
            status: row.status,
        }
    }
}

/// Editable state of one shift table, seeded from the merged view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftDraft {
    shift: Shift,
    rows: Vec<RowInput>,
}

impl ShiftDraft {
    /// Seed a draft from the current merged view of a shift
    pub fn from_state(state: &AppState, shift: Shift) -> Self {
        let rows = merge_shift(&state.schema, state.roster.fleet(), &state.manifest, shift)
            .into_iter()
            .map(RowInput::from)
            .collect();
        Self { shift, rows }
    }

    pub fn from_rows(shift: Shift, rows: Vec<RowInput>) -> Self {
        Self { shift, rows }
    }

    pub fn shift(&self) -> Shift {
        self.shift
    }

    pub fn rows(&self) -> &[RowInput] {
        &self.rows
    }

    pub fn row(&self, plate: &str) -> Option<&RowInput> {
        let plate = normalize_plate(plate);
        self.rows.iter().find(|r| r.plate == plate)
    }

    fn row_mut(&mut self, plate: &str) -> Result<&mut RowInput, ValidationError> {
        let plate = normalize_plate(plate);
        self.rows
            .iter_mut()
            .find(|r| r.plate == plate)
            .ok_or(ValidationError::UnknownPlate(plate))
    }

    /// Set a field's raw input. Hierarchical columns go through the status
    /// chooser and the plate column is the row identity.
    pub fn set_value(
        &mut self,
        schema: &SchemaRegistry,
        plate: &str,
        column_id: &str,
        value: &str,
    ) -> Result<(), ValidationError> {
        let column = schema
            .find(column_id)
            .ok_or_else(|| ValidationError::UnknownColumn(column_id.to_string()))?;
        if column.is_hierarchical() {
            return Err(ValidationError::HierarchicalColumn(column.label.clone()));
        }
        if column.id == PLATE_COLUMN_ID {
            return Err(ValidationError::ReadOnlyColumn(column.label.clone()));
        }
        let row = self.row_mut(plate)?;
        row.values.insert(column.id.clone(), value.to_string());
        Ok(())
    }

    /// Replace a row's pending status
    pub fn set_status(&mut self, plate: &str, status: StatusPath) -> Result<(), ValidationError> {
        self.row_mut(plate)?.status = status;
        Ok(())
    }
}

/// Build the records a save would store: one per current fleet vehicle, in
/// fleet order. Draft rows for vehicles no longer in the fleet are dropped;
/// fleet vehicles missing from the draft are taken from the merged view.
pub fn build_records(state: &AppState, draft: &ShiftDraft, stamp: &str) -> Vec<ManifestRecord> {
    let merged = merge_shift(
        &state.schema,
        state.roster.fleet(),
        &state.manifest,
        draft.shift(),
    );

    merged
        .into_iter()
        .map(|row| {
            let input = draft
                .rows()
                .iter()
                .find(|r| r.plate == row.plate)
                .cloned()
                .unwrap_or_else(|| RowInput::from(row.clone()));
            build_record(&state.schema, &input, stamp)
        })
        .collect()
}

fn build_record(schema: &SchemaRegistry, input: &RowInput, stamp: &str) -> ManifestRecord {
    let driver = input
        .values
        .get(DRIVER_COLUMN_ID)
        .map(|d| d.trim().to_string())
        .unwrap_or_default();

    let mut values: BTreeMap<String, String> = schema
        .columns()
        .iter()
        .map(|column| {
            let value = if column.is_hierarchical() {
                input.status.format()
            } else {
                input
                    .values
                    .get(&column.id)
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default()
            };
            (column.id.clone(), value)
        })
        .collect();
    values.insert(PLATE_COLUMN_ID.to_string(), input.plate.clone());
    values.insert(DRIVER_COLUMN_ID.to_string(), driver.clone());

    let mut record = ManifestRecord {
        plate: input.plate.clone(),
        driver,
        values,
        time: String::new(),
    };
    if record.has_entries() {
        record.time = stamp.to_string();
    }
    record
}

/// Replace the shift's record collection with the draft's contents
pub fn save_shift(state: &mut AppState, draft: &ShiftDraft, stamp: &str) -> usize {
    let records = build_records(state, draft, stamp);
    let saved = records.len();
    let stamped = records.iter().filter(|r| !r.time.is_empty()).count();
    *state.manifest.bucket_mut(draft.shift()) = records;
    info!(shift = %draft.shift(), saved, stamped, "Saved shift");
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifest_types::{Column, ColumnType, SelectionSource};

    fn example_state() -> AppState {
        let mut state = AppState::default();
        state.schema = SchemaRegistry::new(vec![
            Column::plate(),
            Column::driver(),
            Column {
                id: "destination".to_string(),
                label: "Destination".to_string(),
                column_type: ColumnType::Selection(SelectionSource::Destination),
                fixed: false,
            },
        ]);
        state.roster.add_vehicle("ABC-1").unwrap();
        state
    }

    #[test]
    fn test_example_save_morning() {
        let mut state = example_state();
        let mut draft = ShiftDraft::from_state(&state, Shift::Morning);
        draft
            .set_value(&state.schema, "ABC-1", "destination", "Warehouse")
            .unwrap();
        save_shift(&mut state, &draft, "09:30");

        let morning = &state.manifest.morning;
        assert_eq!(morning.len(), 1);
        let record = &morning[0];
        assert_eq!(record.plate, "ABC-1");
        assert_eq!(record.driver, "");
        assert_eq!(record.time, "09:30");
        let expected: BTreeMap<String, String> = [
            ("plate", "ABC-1"),
            ("driver", ""),
            ("destination", "Warehouse"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(record.values, expected);
    }

    #[test]
    fn test_all_empty_row_has_no_time() {
        let mut state = example_state();
        let draft = ShiftDraft::from_state(&state, Shift::Midday);
        save_shift(&mut state, &draft, "09:30");
        assert_eq!(state.manifest.midday[0].time, "");
    }

    #[test]
    fn test_values_are_trimmed_and_blank_counts_as_empty() {
        let mut state = example_state();
        let mut draft = ShiftDraft::from_state(&state, Shift::Morning);
        draft
            .set_value(&state.schema, "abc-1", "destination", "   ")
            .unwrap();
        save_shift(&mut state, &draft, "10:00");
        assert_eq!(state.manifest.morning[0].value("destination"), "");
        assert_eq!(state.manifest.morning[0].time, "");

        let mut draft = ShiftDraft::from_state(&state, Shift::Morning);
        draft
            .set_value(&state.schema, "ABC-1", "destination", "  Port ")
            .unwrap();
        save_shift(&mut state, &draft, "10:05");
        assert_eq!(state.manifest.morning[0].value("destination"), "Port");
        assert_eq!(state.manifest.morning[0].time, "10:05");
    }

    #[test]
    fn test_hierarchical_value_is_joined_path() {
        let mut state = example_state();
        let status_id = state
            .schema
            .add_column("Status", ColumnType::Hierarchical)
            .unwrap()
            .id
            .clone();
        let mut draft = ShiftDraft::from_state(&state, Shift::Evening);
        draft
            .set_status("ABC-1", StatusPath::new("Loading", "Docked", "Bay 3"))
            .unwrap();
        save_shift(&mut state, &draft, "18:00");
        assert_eq!(
            state.manifest.evening[0].value(&status_id),
            "Loading | Docked | Bay 3"
        );
        assert!(matches!(
            draft.set_value(&state.schema, "ABC-1", &status_id, "x"),
            Err(ValidationError::HierarchicalColumn(_))
        ));
    }

    #[test]
    fn test_save_replaces_and_drops_removed_vehicles() {
        let mut state = example_state();
        state.roster.add_vehicle("XYZ-9").unwrap();
        let draft = ShiftDraft::from_state(&state, Shift::Morning);

        state.roster.delete_vehicle(1).unwrap();
        save_shift(&mut state, &draft, "07:00");
        let plates: Vec<_> = state.manifest.morning.iter().map(|r| r.plate.as_str()).collect();
        assert_eq!(plates, vec!["ABC-1"]);
    }

    #[test]
    fn test_vehicle_missing_from_draft_uses_merged_view() {
        let mut state = example_state();
        let draft = ShiftDraft::from_rows(Shift::Morning, Vec::new());
        save_shift(&mut state, &draft, "07:00");
        assert_eq!(state.manifest.morning.len(), 1);
        assert_eq!(state.manifest.morning[0].value("plate"), "ABC-1");
    }

    #[test]
    fn test_schema_drift_only_lands_on_resave() {
        let mut state = example_state();
        let mut draft = ShiftDraft::from_state(&state, Shift::Morning);
        draft
            .set_value(&state.schema, "ABC-1", "destination", "Warehouse")
            .unwrap();
        save_shift(&mut state, &draft, "08:00");
        state.manifest.morning[0]
            .values
            .insert("legacy".to_string(), "old".to_string());

        let notes = state
            .schema
            .add_column("Notes", ColumnType::Text)
            .unwrap()
            .id
            .clone();
        let merged = ShiftDraft::from_state(&state, Shift::Morning);
        assert_eq!(merged.row("ABC-1").unwrap().values.get(&notes), Some(&String::new()));

        let stored = &state.manifest.morning[0];
        assert!(!stored.values.contains_key(&notes));
        assert_eq!(stored.value("legacy"), "old");

        // saving another shift leaves this one alone
        let midday = ShiftDraft::from_state(&state, Shift::Midday);
        save_shift(&mut state, &midday, "12:00");
        assert_eq!(state.manifest.morning[0].value("legacy"), "old");
        assert!(!state.manifest.morning[0].values.contains_key(&notes));

        save_shift(&mut state, &merged, "13:00");
        let resaved = &state.manifest.morning[0];
        assert_eq!(resaved.values.get(&notes), Some(&String::new()));
        assert!(!resaved.values.contains_key("legacy"));
        assert_eq!(resaved.value("destination"), "Warehouse");
    }

    #[test]
    fn test_set_value_rejects_unknown_targets() {
        let state = example_state();
        let mut draft = ShiftDraft::from_state(&state, Shift::Morning);
        assert!(matches!(
            draft.set_value(&state.schema, "ABC-1", "nope", "x"),
            Err(ValidationError::UnknownColumn(_))
        ));
        assert!(matches!(
            draft.set_value(&state.schema, "NOPE", "destination", "x"),
            Err(ValidationError::UnknownPlate(_))
        ));
        assert!(matches!(
            draft.set_value(&state.schema, "ABC-1", "plate", "x"),
            Err(ValidationError::ReadOnlyColumn(_))
        ));
    }
}
