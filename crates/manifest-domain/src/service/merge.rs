//! Render-time merge of saved shift records against the current fleet and schema
//!
//! The merge is a derived view: it reads the live records and never writes
//! them back. Any schema or roster edit is reflected the next time it runs.

use std::collections::BTreeMap;

use manifest_types::{
    Column, DailyManifest, ManifestRecord, Shift, StatusPath, Vehicle, DRIVER_COLUMN_ID,
    PLATE_COLUMN_ID,
};
use serde::Serialize;

use crate::model::SchemaRegistry;

/// One displayed/editable row of a shift table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRow {
    pub plate: String,
    pub driver: String,
    /// Stored values plus defaults for every current column. Ids of deleted
    /// columns may still be present; they are never rendered.
    pub values: BTreeMap<String, String>,
    pub time: String,
    /// Status path the row's hierarchical columns are bound to
    pub status: StatusPath,
    /// Whether a saved record backs this row
    pub saved: bool,
}

impl MergedRow {
    pub fn value(&self, column_id: &str) -> &str {
        self.values.get(column_id).map(String::as_str).unwrap_or("")
    }

    /// Cells in schema order
    pub fn cells<'a>(&'a self, columns: &'a [Column]) -> impl Iterator<Item = &'a str> + 'a {
        columns.iter().map(move |c| self.value(&c.id))
    }
}

/// Merge one shift's saved records with the current fleet and schema.
/// One row per fleet vehicle, in fleet order.
pub fn merge_shift(
    schema: &SchemaRegistry,
    fleet: &[Vehicle],
    manifest: &DailyManifest,
    shift: Shift,
) -> Vec<MergedRow> {
    fleet
        .iter()
        .map(|vehicle| merge_row(schema, vehicle, manifest.find(shift, &vehicle.plate)))
        .collect()
}

fn merge_row(schema: &SchemaRegistry, vehicle: &Vehicle, record: Option<&ManifestRecord>) -> MergedRow {
    let (driver, mut values, time) = match record {
        Some(r) => (r.driver.clone(), r.values.clone(), r.time.clone()),
        None => (vehicle.driver.clone(), BTreeMap::new(), String::new()),
    };

    for column in schema.columns() {
        values.entry(column.id.clone()).or_insert_with(|| match column.id.as_str() {
            PLATE_COLUMN_ID => vehicle.plate.clone(),
            DRIVER_COLUMN_ID => vehicle.driver.clone(),
            _ => String::new(),
        });
    }

    // Rows carry a single status; when several hierarchical columns exist the
    // last one in schema order seeds it.
    let status = schema
        .columns()
        .iter()
        .rev()
        .find(|c| c.is_hierarchical())
        .map(|c| StatusPath::parse(values.get(&c.id).map(String::as_str).unwrap_or("")))
        .unwrap_or_default();

    MergedRow {
        plate: vehicle.plate.clone(),
        driver,
        values,
        time,
        status,
        saved: record.is_some(),
    }
}
