//! Manifest Service - the application-state lifecycle
//!
//! Owns the single `AppState` for the process:
//! 1. Load the stored document (defaults when absent or unreadable)
//! 2. Populate the archive set from the archive mirror
//! 3. Run the once-per-start rollover check
//! 4. Wrap every mutation with a document flush
//!
//! Flush failures are logged and never reach the caller; the in-memory
//! state stays the working copy.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use manifest_domain::model::{MoveDirection, StatusTaxonomy};
use manifest_domain::repository::{AppDataRepository, ArchiveRepository};
use manifest_domain::service::{
    check_rollover, merge_shift, project_summary, save_shift, MergedRow, RolloverOutcome,
    ShiftDraft, StatusChooser, SummaryRow,
};
use manifest_domain::{AppState, Clock, SystemClock};
use manifest_types::{
    Archive, Column, ColumnType, Result, Shift, StatusPath, ValidationError, Vehicle,
};
use tracing::{debug, info, warn};

use super::confirm::Confirm;
use crate::config::Config;
use crate::export::excel;
use crate::repository::{open_app_data_repo, open_archive_repo};

pub struct ManifestService {
    state: AppState,
    documents: Box<dyn AppDataRepository>,
    archives: Box<dyn ArchiveRepository>,
    clock: Box<dyn Clock>,
    placeholder: String,
    rollover: RolloverOutcome,
}

impl ManifestService {
    /// Open the stores named by `config` and run the startup lifecycle
    pub fn open(config: &Config) -> Result<Self> {
        let documents = open_app_data_repo(config)?;
        let archives = open_archive_repo(config)?;
        Ok(Self::load(
            documents,
            Box::new(archives),
            Box::new(SystemClock),
            &config.status_placeholder,
        ))
    }

    /// Load state from the repositories, then roll over if the day changed
    pub fn load(
        documents: Box<dyn AppDataRepository>,
        archives: Box<dyn ArchiveRepository>,
        clock: Box<dyn Clock>,
        placeholder: &str,
    ) -> Self {
        let state = match documents.load() {
            Ok(Some(doc)) => AppState::from_document(doc),
            Ok(None) => {
                info!("No stored document, starting with defaults");
                AppState::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load stored document, starting with defaults");
                AppState::default()
            }
        };

        let mirrored = archives.find_all().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read archive mirror");
            Vec::new()
        });
        let mut state = state.with_archives(mirrored);

        let rollover = check_rollover(&mut state, clock.today());
        let mut service = Self {
            state,
            documents,
            archives,
            clock,
            placeholder: placeholder.to_string(),
            rollover,
        };

        if let RolloverOutcome::Archived(archive) = &service.rollover {
            if let Err(e) = service.archives.upsert(archive) {
                warn!(date = %archive.date, error = %e, "Failed to mirror archive");
            }
        }
        if service.rollover.changed_state() {
            service.flush();
        }
        service
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// What the startup rollover check did
    pub fn rollover(&self) -> &RolloverOutcome {
        &self.rollover
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    fn flush(&self) {
        if let Err(e) = self.documents.save(&self.state.to_document()) {
            warn!(error = %e, "Failed to save document");
        }
    }

    // ------------------------------------------------------------------
    // Schema
    // ------------------------------------------------------------------

    pub fn add_column(&mut self, label: &str, column_type: ColumnType) -> Result<Column> {
        let column = self.state.schema.add_column(label, column_type)?.clone();
        info!(id = %column.id, label = %column.label, "Added column");
        self.flush();
        Ok(column)
    }

    pub fn rename_column(&mut self, index: usize, label: &str) -> Result<()> {
        self.state.schema.rename_column(index, label)?;
        info!(index, label, "Renamed column");
        self.flush();
        Ok(())
    }

    /// Returns false when the column was already at that edge
    pub fn move_column(&mut self, index: usize, direction: MoveDirection) -> Result<bool> {
        let moved = self.state.schema.move_column(index, direction)?;
        if moved {
            debug!(index, ?direction, "Moved column");
            self.flush();
        }
        Ok(moved)
    }

    /// Delete a column and purge its values from every shift
    pub fn delete_column(&mut self, index: usize, confirm: &dyn Confirm) -> Result<bool> {
        let len = self.state.schema.len();
        let column = self
            .state
            .schema
            .get(index)
            .ok_or(ValidationError::IndexOutOfRange { index, len })?;
        if column.fixed {
            return Err(ValidationError::FixedColumn(column.label.clone()).into());
        }
        let prompt = format!(
            "Delete column \"{}\"? Its values are removed from every shift.",
            column.label
        );
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }
        let column = self.state.delete_column(index)?;
        info!(id = %column.id, "Deleted column");
        self.flush();
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Roster
    // ------------------------------------------------------------------

    pub fn add_vehicle(&mut self, plate: &str) -> Result<Vehicle> {
        let vehicle = self.state.roster.add_vehicle(plate)?.clone();
        info!(plate = %vehicle.plate, "Added vehicle");
        self.flush();
        Ok(vehicle)
    }

    pub fn delete_vehicle(&mut self, index: usize, confirm: &dyn Confirm) -> Result<bool> {
        let len = self.state.roster.fleet().len();
        let vehicle = self
            .state
            .roster
            .fleet()
            .get(index)
            .ok_or(ValidationError::IndexOutOfRange { index, len })?;
        if !confirm.confirm(&format!("Delete truck {}?", vehicle.plate)) {
            return Ok(false);
        }
        let vehicle = self.state.roster.delete_vehicle(index)?;
        info!(plate = %vehicle.plate, "Deleted vehicle");
        self.flush();
        Ok(true)
    }

    pub fn assign_driver(&mut self, plate: &str, driver: &str) -> Result<()> {
        self.state.roster.assign_driver(plate, driver)?;
        info!(plate, driver, "Assigned driver");
        self.flush();
        Ok(())
    }

    /// Returns false when the driver was already listed
    pub fn add_driver(&mut self, name: &str) -> Result<bool> {
        let added = self.state.roster.add_driver(name)?;
        if added {
            info!(name = name.trim(), "Added driver");
            self.flush();
        }
        Ok(added)
    }

    pub fn delete_driver(&mut self, name: &str, confirm: &dyn Confirm) -> Result<bool> {
        let name = name.trim();
        if !self.state.roster.drivers().iter().any(|d| d == name) {
            return Err(ValidationError::UnknownDriver(name.to_string()).into());
        }
        if !confirm.confirm(&format!("Delete driver {}?", name)) {
            return Ok(false);
        }
        let unassigned = self.state.roster.delete_driver(name)?;
        info!(name, unassigned, "Deleted driver");
        self.flush();
        Ok(true)
    }

    pub fn add_destination(&mut self, name: &str) -> Result<bool> {
        let added = self.state.roster.add_destination(name)?;
        if added {
            info!(name = name.trim(), "Added destination");
            self.flush();
        }
        Ok(added)
    }

    pub fn delete_destination(&mut self, name: &str, confirm: &dyn Confirm) -> Result<bool> {
        let name = name.trim();
        if !self.state.roster.destinations().iter().any(|d| d == name) {
            return Err(ValidationError::UnknownDestination(name.to_string()).into());
        }
        if !confirm.confirm(&format!("Delete destination {}?", name)) {
            return Ok(false);
        }
        self.state.roster.delete_destination(name);
        info!(name, "Deleted destination");
        self.flush();
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Status taxonomy
    // ------------------------------------------------------------------

    pub fn add_main_status(&mut self, name: &str) -> Result<bool> {
        let added = self.state.taxonomy.add_main(name)?;
        if added {
            info!(main = name.trim(), "Added main status");
            self.flush();
        }
        Ok(added)
    }

    pub fn add_sub_status(&mut self, main: &str, name: &str) -> Result<bool> {
        let added = self.state.taxonomy.add_sub(main, name)?;
        if added {
            info!(main, sub = name.trim(), "Added sub status");
            self.flush();
        }
        Ok(added)
    }

    pub fn add_sub_sub_status(&mut self, main: &str, sub: &str, name: &str) -> Result<bool> {
        let added = self.state.taxonomy.add_sub_sub(main, sub, name)?;
        if added {
            info!(main, sub, sub_sub = name.trim(), "Added sub-sub status");
            self.flush();
        }
        Ok(added)
    }

    /// Delete a taxonomy node and everything beneath it. `sub` and `sub_sub`
    /// pick the depth; saved status strings are left as they are.
    pub fn delete_status(
        &mut self,
        main: &str,
        sub: Option<&str>,
        sub_sub: Option<&str>,
        confirm: &dyn Confirm,
    ) -> Result<bool> {
        let taxonomy = &self.state.taxonomy;
        let (exists, path) = match (sub, sub_sub) {
            (None, _) => (taxonomy.contains_main(main), StatusPath::new(main, "", "")),
            (Some(sub), None) => (taxonomy.contains_sub(main, sub), StatusPath::new(main, sub, "")),
            (Some(sub), Some(sub_sub)) => (
                taxonomy.contains_sub_sub(main, sub, sub_sub),
                StatusPath::new(main, sub, sub_sub),
            ),
        };
        if !exists {
            return Err(ValidationError::UnknownStatusOption(path.format()).into());
        }
        if !confirm.confirm(&format!("Delete status \"{}\" and everything under it?", path.format())) {
            return Ok(false);
        }

        let taxonomy = &mut self.state.taxonomy;
        match (sub, sub_sub) {
            (None, _) => taxonomy.delete_main(main),
            (Some(sub), None) => taxonomy.delete_sub(main, sub),
            (Some(sub), Some(sub_sub)) => taxonomy.delete_sub_sub(main, sub, sub_sub),
        };
        info!(status = %path.format(), "Deleted status");
        self.flush();
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Shifts
    // ------------------------------------------------------------------

    /// Current merged view of a shift; nothing is stored
    pub fn merged_shift(&self, shift: Shift) -> Vec<MergedRow> {
        merge_shift(
            &self.state.schema,
            self.state.roster.fleet(),
            &self.state.manifest,
            shift,
        )
    }

    /// Start editing a shift from its merged view
    pub fn begin_shift(&self, shift: Shift) -> ShiftDraft {
        ShiftDraft::from_state(&self.state, shift)
    }

    /// A closed status chooser using the configured placeholder
    pub fn status_chooser(&self) -> StatusChooser {
        StatusChooser::new(self.placeholder.clone())
    }

    /// Choose a row's status through the chooser, level by level, and apply
    /// it. Returns the label to display.
    pub fn choose_status(
        &self,
        draft: &mut ShiftDraft,
        chooser: &mut StatusChooser,
        plate: &str,
        path: &StatusPath,
    ) -> Result<String> {
        let taxonomy = &self.state.taxonomy;
        chooser.open(draft, plate, taxonomy)?;
        if let Err(e) = select_path(chooser, taxonomy, path) {
            chooser.cancel();
            return Err(e.into());
        }
        Ok(chooser.apply(draft)?)
    }

    /// Blank a row's status through the chooser. Returns the placeholder.
    pub fn clear_status(
        &self,
        draft: &mut ShiftDraft,
        chooser: &mut StatusChooser,
        plate: &str,
    ) -> Result<String> {
        chooser.open(draft, plate, &self.state.taxonomy)?;
        Ok(chooser.clear(draft)?)
    }

    /// Replace the shift's records with the draft, stamped with the clock
    pub fn save_shift(&mut self, draft: &ShiftDraft) -> usize {
        let stamp = self.clock.stamp();
        let saved = save_shift(&mut self.state, draft, &stamp);
        self.flush();
        saved
    }

    pub fn summary(&self) -> Vec<SummaryRow> {
        project_summary(self.state.roster.fleet(), &self.state.manifest)
    }

    // ------------------------------------------------------------------
    // Archives
    // ------------------------------------------------------------------

    pub fn archives(&self) -> Vec<&Archive> {
        self.state.archives_newest_first()
    }

    pub fn archive(&self, date: NaiveDate) -> Result<&Archive> {
        self.state
            .archives
            .get(&date)
            .ok_or_else(|| ValidationError::UnknownArchive(date.to_string()).into())
    }

    /// Columns an archive renders with: its snapshot, else the live schema
    pub fn archive_columns<'a>(&'a self, archive: &'a Archive) -> &'a [Column] {
        archive.columns_or(self.state.schema.columns())
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Write the summary projection to an xlsx workbook
    pub fn export_summary(&self, output_path: &Path) -> Result<()> {
        excel::export_summary(
            self.state.schema.columns(),
            &self.summary(),
            self.clock.today(),
            output_path,
        )?;
        info!(path = %output_path.display(), "Exported summary");
        Ok(())
    }

    /// Write the selected archives (all when `dates` is empty), one sheet per
    /// distinct date
    pub fn export_archives(&self, dates: &[NaiveDate], output_path: &Path) -> Result<usize> {
        let selected: Vec<&Archive> = if dates.is_empty() {
            self.archives()
        } else {
            let mut seen = BTreeSet::new();
            dates
                .iter()
                .filter(|&&d| seen.insert(d))
                .map(|&d| self.archive(d))
                .collect::<Result<_>>()?
        };
        excel::export_archives(&selected, self.state.schema.columns(), output_path)?;
        info!(path = %output_path.display(), archives = selected.len(), "Exported archives");
        Ok(selected.len())
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Reset every store to defaults and drop all archives
    pub fn reset_all(&mut self, confirm: &dyn Confirm) -> Result<bool> {
        if !confirm.confirm("Reset ALL data, archives included? This cannot be undone.") {
            return Ok(false);
        }
        self.state.reset();
        if let Err(e) = self.archives.clear() {
            warn!(error = %e, "Failed to clear archive mirror");
        }
        warn!("All data reset");
        self.flush();
        Ok(true)
    }
}

fn select_path(
    chooser: &mut StatusChooser,
    taxonomy: &StatusTaxonomy,
    path: &StatusPath,
) -> std::result::Result<(), ValidationError> {
    chooser.select_main(taxonomy, &path.main)?;
    if !path.sub.is_empty() {
        chooser.select_sub(taxonomy, &path.sub)?;
    }
    if !path.sub_sub.is_empty() {
        chooser.select_sub_sub(taxonomy, &path.sub_sub)?;
    }
    Ok(())
}
