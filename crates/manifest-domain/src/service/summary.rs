//! Summary projection: latest saved record per fleet vehicle

use std::collections::{BTreeMap, HashMap};

use manifest_types::{DailyManifest, ManifestRecord, Shift, Vehicle};
use serde::Serialize;

/// One summary line per fleet vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub plate: String,
    /// Shift the values were taken from, if any record exists
    pub shift: Option<Shift>,
    pub values: BTreeMap<String, String>,
    pub time: String,
}

impl SummaryRow {
    pub fn value(&self, column_id: &str) -> &str {
        self.values.get(column_id).map(String::as_str).unwrap_or("")
    }
}

/// Project the latest record per plate across shifts. Later shifts win, so
/// evening overrides midday overrides morning. Pure; nothing is stored.
pub fn project_summary(fleet: &[Vehicle], manifest: &DailyManifest) -> Vec<SummaryRow> {
    let mut latest: HashMap<&str, (Shift, &ManifestRecord)> = HashMap::new();
    for shift in Shift::ALL {
        for record in manifest.bucket(shift) {
            if record.plate.is_empty() {
                continue;
            }
            latest.insert(record.plate.as_str(), (shift, record));
        }
    }

    fleet
        .iter()
        .map(|vehicle| match latest.get(vehicle.plate.as_str()) {
            Some((shift, record)) => SummaryRow {
                plate: vehicle.plate.clone(),
                shift: Some(*shift),
                values: record.values.clone(),
                time: record.time.clone(),
            },
            None => SummaryRow {
                plate: vehicle.plate.clone(),
                shift: None,
                values: BTreeMap::new(),
                time: String::new(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(plate: &str, dest: &str, time: &str) -> ManifestRecord {
        let mut r = ManifestRecord {
            plate: plate.to_string(),
            time: time.to_string(),
            ..Default::default()
        };
        r.values.insert("plate".to_string(), plate.to_string());
        r.values.insert("destination".to_string(), dest.to_string());
        r
    }

    #[test]
    fn test_evening_wins_over_morning() {
        let fleet = vec![Vehicle::new("ABC-1")];
        let mut manifest = DailyManifest::default();
        manifest.morning.push(record("ABC-1", "Warehouse", "08:00"));
        let evening = record("ABC-1", "Port", "19:10");
        manifest.evening.push(evening.clone());

        let summary = project_summary(&fleet, &manifest);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].values, evening.values);
        assert_eq!(summary[0].time, "19:10");
        assert_eq!(summary[0].shift, Some(Shift::Evening));
    }

    #[test]
    fn test_vehicle_without_records_projects_empty() {
        let fleet = vec![Vehicle::new("ABC-1"), Vehicle::new("XYZ-9")];
        let mut manifest = DailyManifest::default();
        manifest.midday.push(record("ABC-1", "Warehouse", "12:00"));

        let summary = project_summary(&fleet, &manifest);
        assert_eq!(summary[1].plate, "XYZ-9");
        assert!(summary[1].values.is_empty());
        assert_eq!(summary[1].time, "");
        assert_eq!(summary[1].shift, None);
    }

    #[test]
    fn test_records_of_removed_vehicles_are_skipped() {
        let fleet = vec![Vehicle::new("ABC-1")];
        let mut manifest = DailyManifest::default();
        manifest.morning.push(record("GONE-1", "Warehouse", "08:00"));

        let summary = project_summary(&fleet, &manifest);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].plate, "ABC-1");
        assert_eq!(summary[0].shift, None);
    }
}
