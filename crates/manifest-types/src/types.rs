//! Shared data types for the manifest engine

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Id of the fixed plate column
pub const PLATE_COLUMN_ID: &str = "plate";

/// Id of the fixed driver column
pub const DRIVER_COLUMN_ID: &str = "driver";

/// Separator between levels of a serialized status path
pub const STATUS_DELIMITER: &str = " | ";

/// One of the three daily shift buckets
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Midday,
    Evening,
}

impl Shift {
    /// All shifts in projection order; later entries win summary ties
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Midday, Shift::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "morning",
            Shift::Midday => "midday",
            Shift::Evening => "evening",
        }
    }

    /// Title-case name for headings
    pub fn label(&self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Midday => "Midday",
            Shift::Evening => "Evening",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(Shift::Morning),
            "midday" => Ok(Shift::Midday),
            "evening" => Ok(Shift::Evening),
            other => Err(ValidationError::UnknownShift(other.to_string())),
        }
    }
}

/// Roster a selection column draws its options from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionSource {
    Driver,
    Destination,
}

/// Input/storage kind of a column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Date,
    Time,
    /// Three-level status path, stored as a delimiter-joined string
    Hierarchical,
    Selection(SelectionSource),
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Number => write!(f, "number"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Time => write!(f, "time"),
            ColumnType::Hierarchical => write!(f, "hierarchical"),
            ColumnType::Selection(SelectionSource::Driver) => write!(f, "driver"),
            ColumnType::Selection(SelectionSource::Destination) => write!(f, "destination"),
        }
    }
}

impl FromStr for ColumnType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(ColumnType::Text),
            "number" => Ok(ColumnType::Number),
            "date" => Ok(ColumnType::Date),
            "time" => Ok(ColumnType::Time),
            "hierarchical" | "status" => Ok(ColumnType::Hierarchical),
            "driver" | "selection:driver" => Ok(ColumnType::Selection(SelectionSource::Driver)),
            "destination" | "selection:destination" => {
                Ok(ColumnType::Selection(SelectionSource::Destination))
            }
            other => Err(ValidationError::UnknownColumnType(other.to_string())),
        }
    }
}

/// A runtime-defined manifest column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Generated once from the label; never changes
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Fixed columns cannot be deleted
    #[serde(default)]
    pub fixed: bool,
}

impl Column {
    /// The fixed plate column
    pub fn plate() -> Self {
        Self {
            id: PLATE_COLUMN_ID.to_string(),
            label: "Plate".to_string(),
            column_type: ColumnType::Text,
            fixed: true,
        }
    }

    /// The fixed driver column
    pub fn driver() -> Self {
        Self {
            id: DRIVER_COLUMN_ID.to_string(),
            label: "Driver".to_string(),
            column_type: ColumnType::Selection(SelectionSource::Driver),
            fixed: true,
        }
    }

    pub fn is_hierarchical(&self) -> bool {
        self.column_type == ColumnType::Hierarchical
    }
}

/// A fleet vehicle; the plate is its identity across shifts, days and archives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub plate: String,
    /// Assigned driver name, empty when unassigned
    #[serde(default)]
    pub driver: String,
}

impl Vehicle {
    pub fn new(plate: impl Into<String>) -> Self {
        Self {
            plate: plate.into(),
            driver: String::new(),
        }
    }
}

/// A saved per-vehicle row in one shift bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub plate: String,
    #[serde(default)]
    pub driver: String,
    /// Column id -> stored value. May hold ids no longer in the schema.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    /// Save time as HH:MM, empty when nothing was entered
    #[serde(default)]
    pub time: String,
}

impl ManifestRecord {
    /// Stored value for a column id, empty when absent
    pub fn value(&self, column_id: &str) -> &str {
        self.values.get(column_id).map(String::as_str).unwrap_or("")
    }

    /// Whether anything besides the plate identity holds a non-blank value.
    /// Decides the save time stamp.
    pub fn has_entries(&self) -> bool {
        self.values
            .iter()
            .any(|(id, v)| id != PLATE_COLUMN_ID && !v.trim().is_empty())
    }

    /// Whether any stored value, the plate included, is non-blank
    pub fn has_any_value(&self) -> bool {
        self.values.values().any(|v| !v.trim().is_empty())
    }
}

/// The three live shift buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyManifest {
    #[serde(default)]
    pub morning: Vec<ManifestRecord>,
    #[serde(default)]
    pub midday: Vec<ManifestRecord>,
    #[serde(default)]
    pub evening: Vec<ManifestRecord>,
}

impl DailyManifest {
    pub fn bucket(&self, shift: Shift) -> &[ManifestRecord] {
        match shift {
            Shift::Morning => &self.morning,
            Shift::Midday => &self.midday,
            Shift::Evening => &self.evening,
        }
    }

    pub fn bucket_mut(&mut self, shift: Shift) -> &mut Vec<ManifestRecord> {
        match shift {
            Shift::Morning => &mut self.morning,
            Shift::Midday => &mut self.midday,
            Shift::Evening => &mut self.evening,
        }
    }

    /// Find the record for a plate in one shift
    pub fn find(&self, shift: Shift, plate: &str) -> Option<&ManifestRecord> {
        self.bucket(shift).iter().find(|r| r.plate == plate)
    }

    /// Whether any record in any shift holds a non-blank value. A saved
    /// shift always stores the plate, so any save counts.
    pub fn has_any_entries(&self) -> bool {
        Shift::ALL
            .iter()
            .any(|&s| self.bucket(s).iter().any(ManifestRecord::has_any_value))
    }

    /// Total records across all shifts
    pub fn record_count(&self) -> usize {
        Shift::ALL.iter().map(|&s| self.bucket(s).len()).sum()
    }
}

/// Immutable snapshot of one day's manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub date: NaiveDate,
    pub data: DailyManifest,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Archive {
    /// Columns to render this archive with: its own snapshot, or `live` when
    /// the snapshot is empty
    pub fn columns_or<'a>(&'a self, live: &'a [Column]) -> &'a [Column] {
        if self.columns.is_empty() {
            live
        } else {
            &self.columns
        }
    }
}

/// A 0-3 level selection from the status taxonomy
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusPath {
    pub main: String,
    pub sub: String,
    pub sub_sub: String,
}

impl StatusPath {
    pub fn new(main: impl Into<String>, sub: impl Into<String>, sub_sub: impl Into<String>) -> Self {
        Self {
            main: main.into(),
            sub: sub.into(),
            sub_sub: sub_sub.into(),
        }
    }

    /// Parse a stored status string. Segments are trimmed, blank segments
    /// dropped, and anything past the third level ignored.
    pub fn parse(stored: &str) -> Self {
        let mut parts = stored
            .split('|')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        Self {
            main: parts.next().unwrap_or_default(),
            sub: parts.next().unwrap_or_default(),
            sub_sub: parts.next().unwrap_or_default(),
        }
    }

    /// Storage encoding: non-empty levels joined by the delimiter
    pub fn format(&self) -> String {
        self.levels()
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(STATUS_DELIMITER)
    }

    /// Display label; an empty path renders as the placeholder
    pub fn label(&self, placeholder: &str) -> String {
        if self.is_empty() {
            placeholder.to_string()
        } else {
            self.format()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.sub.is_empty() && self.sub_sub.is_empty()
    }

    fn levels(&self) -> [&str; 3] {
        [&self.main, &self.sub, &self.sub_sub]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_path_roundtrip_full() {
        let path = StatusPath::new("Loading", "Docked", "Bay 3");
        assert_eq!(path.format(), "Loading | Docked | Bay 3");
        assert_eq!(StatusPath::parse("Loading | Docked | Bay 3"), path);
    }

    #[test]
    fn test_status_path_parse_extra_and_missing_segments() {
        let p = StatusPath::parse(" A |B| C | D ");
        assert_eq!(p, StatusPath::new("A", "B", "C"));

        let p = StatusPath::parse("Only");
        assert_eq!(p, StatusPath::new("Only", "", ""));

        assert!(StatusPath::parse("").is_empty());
    }

    #[test]
    fn test_status_path_trailing_levels_omitted() {
        assert_eq!(StatusPath::new("Idle", "", "").format(), "Idle");
        assert_eq!(StatusPath::default().format(), "");
    }

    #[test]
    fn test_status_label_placeholder() {
        assert_eq!(StatusPath::default().label("Select Status"), "Select Status");
        assert_eq!(StatusPath::new("Idle", "", "").label("Select Status"), "Idle");
    }

    #[test]
    fn test_has_entries_ignores_plate() {
        let mut record = ManifestRecord {
            plate: "ABC-1".to_string(),
            ..Default::default()
        };
        record.values.insert("plate".to_string(), "ABC-1".to_string());
        record.values.insert("note".to_string(), "   ".to_string());
        assert!(!record.has_entries());
        assert!(record.has_any_value());

        let mut manifest = DailyManifest::default();
        assert!(!manifest.has_any_entries());
        manifest.midday.push(record.clone());
        assert!(manifest.has_any_entries());

        record.values.insert("note".to_string(), "late".to_string());
        assert!(record.has_entries());
    }

    #[test]
    fn test_column_type_serde_shape() {
        let col = Column::driver();
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["type"], serde_json::json!({"selection": "driver"}));

        let text: ColumnType = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(text, ColumnType::Text);
    }

    #[test]
    fn test_shift_from_str() {
        assert_eq!("Evening".parse::<Shift>().unwrap(), Shift::Evening);
        assert!("night".parse::<Shift>().is_err());
    }
}
