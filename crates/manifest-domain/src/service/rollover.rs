//! Day-boundary rollover: archive the previous day and clear the live manifest

use chrono::NaiveDate;
use manifest_types::{Archive, DailyManifest};
use tracing::info;

use crate::state::AppState;

/// What a rollover check did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// No date was recorded yet; today is now recorded
    FirstRun,
    /// The recorded date is today; nothing changed
    SameDay,
    /// The previous day had entries; it was archived and the manifest cleared
    Archived(Archive),
    /// The previous day had no entries; the manifest was cleared
    Cleared { previous: NaiveDate },
}

impl RolloverOutcome {
    /// Whether the state changed and must be persisted
    pub fn changed_state(&self) -> bool {
        !matches!(self, RolloverOutcome::SameDay)
    }
}

/// Compare the recorded last-seen date with `today` and roll over if they
/// differ. Re-running with the same `today` is a no-op.
pub fn check_rollover(state: &mut AppState, today: NaiveDate) -> RolloverOutcome {
    let previous = match state.last_date {
        None => {
            state.last_date = Some(today);
            info!(%today, "First run, recording date");
            return RolloverOutcome::FirstRun;
        }
        Some(previous) if previous == today => return RolloverOutcome::SameDay,
        Some(previous) => previous,
    };

    let archived = if state.manifest.has_any_entries() {
        let archive = Archive {
            date: previous,
            data: state.manifest.clone(),
            columns: state.schema.columns().to_vec(),
        };
        state.archives.insert(previous, archive.clone());
        Some(archive)
    } else {
        None
    };

    state.manifest = DailyManifest::default();
    state.last_date = Some(today);

    match archived {
        Some(archive) => {
            info!(date = %previous, records = archive.data.record_count(), "Archived previous day");
            RolloverOutcome::Archived(archive)
        }
        None => {
            info!(date = %previous, "Previous day had no entries, manifest cleared");
            RolloverOutcome::Cleared { previous }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifest_types::ManifestRecord;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn with_entry(state: &mut AppState) {
        let mut record = ManifestRecord {
            plate: "ABC-1".to_string(),
            time: "08:00".to_string(),
            ..Default::default()
        };
        record.values.insert("plate".to_string(), "ABC-1".to_string());
        record.values.insert("note".to_string(), "late".to_string());
        state.manifest.morning.push(record);
    }

    #[test]
    fn test_first_run_records_date_only() {
        let mut state = AppState::default();
        with_entry(&mut state);
        assert_eq!(check_rollover(&mut state, day(18)), RolloverOutcome::FirstRun);
        assert_eq!(state.last_date, Some(day(18)));
        assert!(state.archives.is_empty());
        assert_eq!(state.manifest.morning.len(), 1);
    }

    #[test]
    fn test_date_change_archives_and_clears() {
        let mut state = AppState::default();
        state.last_date = Some(day(17));
        with_entry(&mut state);
        let live = state.manifest.clone();

        let outcome = check_rollover(&mut state, day(18));
        let archive = match outcome {
            RolloverOutcome::Archived(a) => a,
            other => panic!("expected archive, got {:?}", other),
        };
        assert_eq!(archive.date, day(17));
        assert_eq!(archive.data, live);
        assert_eq!(archive.columns, state.schema.columns().to_vec());
        assert_eq!(state.archives.get(&day(17)), Some(&archive));
        assert_eq!(state.manifest, DailyManifest::default());
        assert_eq!(state.last_date, Some(day(18)));
    }

    #[test]
    fn test_rollover_is_idempotent_per_date() {
        let mut state = AppState::default();
        state.last_date = Some(day(17));
        with_entry(&mut state);

        assert!(matches!(
            check_rollover(&mut state, day(18)),
            RolloverOutcome::Archived(_)
        ));
        let after_first = state.clone();
        assert_eq!(check_rollover(&mut state, day(18)), RolloverOutcome::SameDay);
        assert_eq!(state, after_first);
        assert_eq!(state.archives.len(), 1);
    }

    #[test]
    fn test_empty_day_clears_without_archive() {
        let mut state = AppState::default();
        state.last_date = Some(day(17));

        assert_eq!(
            check_rollover(&mut state, day(18)),
            RolloverOutcome::Cleared { previous: day(17) }
        );
        assert!(state.archives.is_empty());
        assert_eq!(state.last_date, Some(day(18)));
    }

    #[test]
    fn test_blank_saved_shift_is_still_archived() {
        let mut state = AppState::default();
        state.last_date = Some(day(17));
        let mut record = ManifestRecord {
            plate: "ABC-1".to_string(),
            ..Default::default()
        };
        record.values.insert("plate".to_string(), "ABC-1".to_string());
        record.values.insert("driver".to_string(), String::new());
        state.manifest.evening.push(record);

        let outcome = check_rollover(&mut state, day(18));
        assert!(matches!(outcome, RolloverOutcome::Archived(ref a) if a.date == day(17)));
        assert_eq!(state.archives[&day(17)].data.evening.len(), 1);
        assert!(state.manifest.evening.is_empty());
    }

    #[test]
    fn test_same_date_archive_is_overwritten() {
        let mut state = AppState::default();
        state.last_date = Some(day(17));
        with_entry(&mut state);
        check_rollover(&mut state, day(18));

        state.last_date = Some(day(17));
        with_entry(&mut state);
        state.manifest.morning[0].values.insert("note".to_string(), "second".to_string());
        check_rollover(&mut state, day(19));

        assert_eq!(state.archives.len(), 1);
        assert_eq!(state.archives[&day(17)].data.morning[0].value("note"), "second");
    }
}
