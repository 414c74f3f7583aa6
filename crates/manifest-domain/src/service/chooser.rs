//! Status chooser: the cascading main/sub/sub-sub picker bound to one row
//!
//! `Closed -> Open(row) -> Closed`. Only one chooser exists; opening it for a
//! new row drops whatever was in progress for the previous one.

use manifest_types::{StatusPath, ValidationError};
use tracing::debug;

use crate::model::StatusTaxonomy;
use crate::service::shift_save::ShiftDraft;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooserState {
    Closed,
    Open { plate: String, selection: StatusPath },
}

#[derive(Debug, Clone)]
pub struct StatusChooser {
    state: ChooserState,
    placeholder: String,
}

impl StatusChooser {
    /// A closed chooser rendering empty paths as `placeholder`
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            state: ChooserState::Closed,
            placeholder: placeholder.into(),
        }
    }

    pub fn state(&self) -> &ChooserState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ChooserState::Open { .. })
    }

    /// Plate of the row the chooser is bound to
    pub fn bound_plate(&self) -> Option<&str> {
        match &self.state {
            ChooserState::Open { plate, .. } => Some(plate),
            ChooserState::Closed => None,
        }
    }

    /// In-progress selection while open
    pub fn selection(&self) -> Option<&StatusPath> {
        match &self.state {
            ChooserState::Open { selection, .. } => Some(selection),
            ChooserState::Closed => None,
        }
    }

    /// Bind to a row and pre-populate from its pending status. Levels the
    /// taxonomy no longer offers come up unselected.
    pub fn open(
        &mut self,
        draft: &ShiftDraft,
        plate: &str,
        taxonomy: &StatusTaxonomy,
    ) -> Result<(), ValidationError> {
        let row = draft
            .row(plate)
            .ok_or_else(|| ValidationError::UnknownPlate(plate.to_string()))?;
        if self.is_open() {
            debug!(previous = ?self.bound_plate(), "Replacing open chooser");
        }

        let current = &row.status;
        let mut selection = StatusPath::default();
        if taxonomy.contains_main(&current.main) {
            selection.main = current.main.clone();
            if taxonomy.contains_sub(&current.main, &current.sub) {
                selection.sub = current.sub.clone();
                if taxonomy.contains_sub_sub(&current.main, &current.sub, &current.sub_sub) {
                    selection.sub_sub = current.sub_sub.clone();
                }
            }
        }

        self.state = ChooserState::Open {
            plate: row.plate.clone(),
            selection,
        };
        Ok(())
    }

    pub fn main_options<'a>(&self, taxonomy: &'a StatusTaxonomy) -> Vec<&'a str> {
        taxonomy.main_names()
    }

    pub fn sub_options<'a>(&self, taxonomy: &'a StatusTaxonomy) -> Vec<&'a str> {
        match self.selection() {
            Some(sel) => taxonomy.sub_names(&sel.main),
            None => Vec::new(),
        }
    }

    pub fn sub_sub_options<'a>(&self, taxonomy: &'a StatusTaxonomy) -> Vec<&'a str> {
        match self.selection() {
            Some(sel) => taxonomy.sub_sub_names(&sel.main, &sel.sub),
            None => Vec::new(),
        }
    }

    /// Choose a main status; an empty value clears the selection. Deeper
    /// levels are cleared when the main changes.
    pub fn select_main(&mut self, taxonomy: &StatusTaxonomy, main: &str) -> Result<(), ValidationError> {
        let selection = self.selection_mut()?;
        if !main.is_empty() && !taxonomy.contains_main(main) {
            return Err(ValidationError::UnknownStatusOption(main.to_string()));
        }
        if selection.main != main {
            selection.main = main.to_string();
            selection.sub.clear();
            selection.sub_sub.clear();
        }
        Ok(())
    }

    /// Choose a sub status under the selected main
    pub fn select_sub(&mut self, taxonomy: &StatusTaxonomy, sub: &str) -> Result<(), ValidationError> {
        let selection = self.selection_mut()?;
        if selection.main.is_empty() {
            return Err(ValidationError::MissingMainStatus);
        }
        if !sub.is_empty() && !taxonomy.contains_sub(&selection.main, sub) {
            return Err(ValidationError::UnknownStatusOption(sub.to_string()));
        }
        if selection.sub != sub {
            selection.sub = sub.to_string();
            selection.sub_sub.clear();
        }
        Ok(())
    }

    /// Choose a sub-sub status under the selected main and sub
    pub fn select_sub_sub(
        &mut self,
        taxonomy: &StatusTaxonomy,
        sub_sub: &str,
    ) -> Result<(), ValidationError> {
        let selection = self.selection_mut()?;
        if selection.main.is_empty() || selection.sub.is_empty() {
            return Err(ValidationError::MissingSubStatus);
        }
        if !sub_sub.is_empty()
            && !taxonomy.contains_sub_sub(&selection.main, &selection.sub, sub_sub)
        {
            return Err(ValidationError::UnknownStatusOption(sub_sub.to_string()));
        }
        selection.sub_sub = sub_sub.to_string();
        Ok(())
    }

    /// Write the selection onto the bound row and close. Returns the label
    /// to display for the row.
    pub fn apply(&mut self, draft: &mut ShiftDraft) -> Result<String, ValidationError> {
        let (plate, selection) = self.take_open()?;
        let label = selection.label(&self.placeholder);
        draft.set_status(&plate, selection)?;
        Ok(label)
    }

    /// Blank the bound row's status and close. Returns the placeholder label.
    pub fn clear(&mut self, draft: &mut ShiftDraft) -> Result<String, ValidationError> {
        let (plate, _) = self.take_open()?;
        draft.set_status(&plate, StatusPath::default())?;
        Ok(self.placeholder.clone())
    }

    /// Close without applying (a click elsewhere)
    pub fn cancel(&mut self) {
        self.state = ChooserState::Closed;
    }

    fn selection_mut(&mut self) -> Result<&mut StatusPath, ValidationError> {
        match &mut self.state {
            ChooserState::Open { selection, .. } => Ok(selection),
            ChooserState::Closed => Err(ValidationError::ChooserClosed),
        }
    }

    fn take_open(&mut self) -> Result<(String, StatusPath), ValidationError> {
        match std::mem::replace(&mut self.state, ChooserState::Closed) {
            ChooserState::Open { plate, selection } => Ok((plate, selection)),
            ChooserState::Closed => Err(ValidationError::ChooserClosed),
        }
    }
}
