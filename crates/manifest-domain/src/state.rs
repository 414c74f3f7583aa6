//! Process-scoped application state and its persisted document shape

use std::collections::BTreeMap;

use chrono::NaiveDate;
use manifest_types::{Archive, Column, DailyManifest, Shift, ValidationError, Vehicle};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Roster, SchemaRegistry, StatusTaxonomy};

/// The persisted document: everything loaded at startup and written back
/// after each mutation. Missing fields fall back to empty defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDocument {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub fleet: Vec<Vehicle>,
    #[serde(default)]
    pub drivers: Vec<String>,
    #[serde(default)]
    pub status_options: StatusTaxonomy,
    #[serde(default)]
    pub destinations: Vec<String>,
    #[serde(default)]
    pub daily_manifest: DailyManifest,
    /// Last day the rollover check ran; stored as "" when never
    #[serde(default, with = "date_or_empty")]
    pub last_date: Option<NaiveDate>,
}

/// All stores in one aggregate, passed by reference to each service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub schema: SchemaRegistry,
    pub roster: Roster,
    pub taxonomy: StatusTaxonomy,
    pub manifest: DailyManifest,
    /// Authoritative archive set, keyed by day
    pub archives: BTreeMap<NaiveDate, Archive>,
    pub last_date: Option<NaiveDate>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            schema: SchemaRegistry::with_fixed_columns(),
            roster: Roster::default(),
            taxonomy: StatusTaxonomy::default(),
            manifest: DailyManifest::default(),
            archives: BTreeMap::new(),
            last_date: None,
        }
    }
}

impl AppState {
    /// Build state from a loaded document, inserting the fixed columns if
    /// the stored schema lacks them
    pub fn from_document(doc: AppDocument) -> Self {
        let mut schema = SchemaRegistry::new(doc.columns);
        if schema.ensure_fixed_columns() {
            debug!("Inserted missing fixed columns into loaded schema");
        }
        Self {
            schema,
            roster: Roster::new(doc.fleet, doc.drivers, doc.destinations),
            taxonomy: doc.status_options,
            manifest: doc.daily_manifest,
            archives: BTreeMap::new(),
            last_date: doc.last_date,
        }
    }

    /// Replace the archive set, e.g. with the contents of the archive mirror
    pub fn with_archives(mut self, archives: Vec<Archive>) -> Self {
        self.archives = archives.into_iter().map(|a| (a.date, a)).collect();
        self
    }

    pub fn to_document(&self) -> AppDocument {
        let (fleet, drivers, destinations) = self.roster.clone().into_parts();
        AppDocument {
            columns: self.schema.columns().to_vec(),
            fleet,
            drivers,
            status_options: self.taxonomy.clone(),
            destinations,
            daily_manifest: self.manifest.clone(),
            last_date: self.last_date,
        }
    }

    /// Delete a column and purge its id from every record of every shift.
    /// Irreversible.
    pub fn delete_column(&mut self, index: usize) -> Result<Column, ValidationError> {
        let column = self.schema.delete_column(index)?;
        let mut purged = 0;
        for shift in Shift::ALL {
            for record in self.manifest.bucket_mut(shift).iter_mut() {
                if record.values.remove(&column.id).is_some() {
                    purged += 1;
                }
            }
        }
        debug!(column = %column.id, purged, "Deleted column");
        Ok(column)
    }

    /// Archives sorted newest day first
    pub fn archives_newest_first(&self) -> Vec<&Archive> {
        self.archives.values().rev().collect()
    }

    /// Back to a freshly initialized state, archives included
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

mod date_or_empty {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match NaiveDate::parse_from_str(raw, FORMAT) {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                // startup then sees a first run and keeps the live manifest
                warn!(last_date = raw, error = %e, "Ignoring malformed lastDate");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifest_types::{ColumnType, ManifestRecord};

    #[test]
    fn test_missing_document_fields_default() {
        let doc: AppDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, AppDocument::default());

        let doc: AppDocument = serde_json::from_str(r#"{"lastDate": ""}"#).unwrap();
        assert!(doc.last_date.is_none());
    }

    #[test]
    fn test_malformed_last_date_keeps_document() {
        let doc: AppDocument = serde_json::from_str(
            r#"{"lastDate": "18/10/2026", "drivers": ["Dana"]}"#,
        )
        .unwrap();
        assert!(doc.last_date.is_none());
        assert_eq!(doc.drivers, vec!["Dana".to_string()]);
    }

    #[test]
    fn test_document_camel_case_shape() {
        let mut state = AppState::default();
        state.last_date = NaiveDate::from_ymd_opt(2026, 10, 17);
        let json = serde_json::to_value(state.to_document()).unwrap();
        assert!(json.get("statusOptions").is_some());
        assert!(json.get("dailyManifest").is_some());
        assert_eq!(json["lastDate"], "2026-10-17");
        assert_eq!(json["dailyManifest"]["morning"], serde_json::json!([]));
    }

    #[test]
    fn test_from_document_inserts_fixed_columns() {
        let state = AppState::from_document(AppDocument::default());
        assert_eq!(state.schema.len(), 2);
        assert!(state.schema.columns().iter().all(|c| c.fixed));
    }

    #[test]
    fn test_delete_column_purges_every_shift() {
        let mut state = AppState::default();
        let id = state
            .schema
            .add_column("Destination", ColumnType::Text)
            .unwrap()
            .id
            .clone();
        for shift in Shift::ALL {
            let mut record = ManifestRecord {
                plate: "ABC-1".to_string(),
                ..Default::default()
            };
            record.values.insert("plate".to_string(), "ABC-1".to_string());
            record.values.insert("driver".to_string(), String::new());
            record.values.insert(id.clone(), "Warehouse".to_string());
            state.manifest.bucket_mut(shift).push(record);
        }

        state.delete_column(2).unwrap();
        for shift in Shift::ALL {
            let keys: Vec<_> = state.manifest.bucket(shift)[0].values.keys().cloned().collect();
            assert_eq!(keys, vec!["driver".to_string(), "plate".to_string()]);
        }
    }

    #[test]
    fn test_delete_fixed_column_leaves_state() {
        let mut state = AppState::default();
        let before = state.clone();
        assert!(state.delete_column(1).is_err());
        assert_eq!(state, before);
    }
}
