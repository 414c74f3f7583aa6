//! Schema registry: the ordered, runtime-defined column list

use manifest_types::{Column, ColumnType, ValidationError, DRIVER_COLUMN_ID, PLATE_COLUMN_ID};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the random suffix appended to generated column ids
const ID_SUFFIX_LEN: usize = 5;

/// Direction for swapping a column with its neighbour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Ordered column definitions. Order defines rendering and export order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    columns: Vec<Column>,
}

impl SchemaRegistry {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Registry holding only the fixed plate and driver columns
    pub fn with_fixed_columns() -> Self {
        Self::new(vec![Column::plate(), Column::driver()])
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Insert the fixed plate/driver columns at the front if missing.
    /// Returns true when the registry changed.
    pub fn ensure_fixed_columns(&mut self) -> bool {
        let mut changed = false;
        if self.find(DRIVER_COLUMN_ID).is_none() {
            self.columns.insert(0, Column::driver());
            changed = true;
        }
        if self.find(PLATE_COLUMN_ID).is_none() {
            self.columns.insert(0, Column::plate());
            changed = true;
        }
        changed
    }

    /// Append a column with a freshly generated id
    pub fn add_column(
        &mut self,
        label: &str,
        column_type: ColumnType,
    ) -> Result<&Column, ValidationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyLabel);
        }

        let mut id = generate_column_id(label);
        while self.find(&id).is_some() {
            id = generate_column_id(label);
        }

        self.columns.push(Column {
            id,
            label: label.to_string(),
            column_type,
            fixed: false,
        });
        Ok(&self.columns[self.columns.len() - 1])
    }

    /// Change a column's label; its id is untouched
    pub fn rename_column(&mut self, index: usize, label: &str) -> Result<(), ValidationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyLabel);
        }
        let len = self.columns.len();
        let column = self
            .columns
            .get_mut(index)
            .ok_or(ValidationError::IndexOutOfRange { index, len })?;
        column.label = label.to_string();
        Ok(())
    }

    /// Swap a column with its neighbour. Moving the first column up or the
    /// last column down is a no-op and returns false.
    pub fn move_column(
        &mut self,
        index: usize,
        direction: MoveDirection,
    ) -> Result<bool, ValidationError> {
        let len = self.columns.len();
        if index >= len {
            return Err(ValidationError::IndexOutOfRange { index, len });
        }
        let target = match direction {
            MoveDirection::Up if index == 0 => return Ok(false),
            MoveDirection::Up => index - 1,
            MoveDirection::Down if index + 1 >= len => return Ok(false),
            MoveDirection::Down => index + 1,
        };
        self.columns.swap(index, target);
        Ok(true)
    }

    /// Remove a non-fixed column from the registry. Purging its stored values
    /// is the caller's job (see `AppState::delete_column`).
    pub fn delete_column(&mut self, index: usize) -> Result<Column, ValidationError> {
        let len = self.columns.len();
        let column = self
            .columns
            .get(index)
            .ok_or(ValidationError::IndexOutOfRange { index, len })?;
        if column.fixed {
            return Err(ValidationError::FixedColumn(column.label.clone()));
        }
        Ok(self.columns.remove(index))
    }
}

/// Lower-case, whitespace runs to underscores, drop everything that is not
/// an ASCII alphanumeric or underscore.
pub fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Slug of the label plus a short random suffix
pub fn generate_column_id(label: &str) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(ID_SUFFIX_LEN)
        .collect();
    format!("{}_{}", slugify(label), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        let mut reg = SchemaRegistry::with_fixed_columns();
        reg.add_column("Destination", ColumnType::Text).unwrap();
        reg
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Load  Weight (t)"), "load_weight_t");
        assert_eq!(slugify("ETA"), "eta");
        assert_eq!(slugify("Café Stop"), "caf_stop");
    }

    #[test]
    fn test_add_column_generates_slug_id() {
        let reg = registry();
        let col = reg.get(2).unwrap();
        assert!(col.id.starts_with("destination_"));
        assert_eq!(col.id.len(), "destination_".len() + ID_SUFFIX_LEN);
        assert!(!col.fixed);
    }

    #[test]
    fn test_add_column_rejects_empty_label() {
        let mut reg = registry();
        assert_eq!(
            reg.add_column("   ", ColumnType::Text).unwrap_err(),
            ValidationError::EmptyLabel
        );
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_readd_same_label_gets_new_id() {
        let mut reg = registry();
        let old_id = reg.get(2).unwrap().id.clone();
        reg.delete_column(2).unwrap();
        assert_eq!(reg.len(), 2);

        let new_id = reg.add_column("Destination", ColumnType::Text).unwrap().id.clone();
        assert_eq!(reg.len(), 3);
        assert_ne!(old_id, new_id);
    }

    #[test]
    fn test_repeated_labels_are_unique() {
        let mut reg = SchemaRegistry::default();
        let a = reg.add_column("Notes", ColumnType::Text).unwrap().id.clone();
        let b = reg.add_column("Notes", ColumnType::Text).unwrap().id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rename_keeps_id() {
        let mut reg = registry();
        let id = reg.get(2).unwrap().id.clone();
        reg.rename_column(2, "Drop-off").unwrap();
        assert_eq!(reg.get(2).unwrap().label, "Drop-off");
        assert_eq!(reg.get(2).unwrap().id, id);
        assert!(reg.rename_column(2, "").is_err());
        assert!(reg.rename_column(9, "x").is_err());
    }

    #[test]
    fn test_move_column_edges_are_noops() {
        let mut reg = registry();
        assert!(!reg.move_column(0, MoveDirection::Up).unwrap());
        assert!(!reg.move_column(2, MoveDirection::Down).unwrap());
        assert_eq!(reg.get(0).unwrap().id, PLATE_COLUMN_ID);

        assert!(reg.move_column(1, MoveDirection::Down).unwrap());
        assert_eq!(reg.get(2).unwrap().id, DRIVER_COLUMN_ID);
        assert!(reg.move_column(5, MoveDirection::Up).is_err());
    }

    #[test]
    fn test_fixed_columns_cannot_be_deleted() {
        let mut reg = registry();
        assert!(matches!(
            reg.delete_column(0),
            Err(ValidationError::FixedColumn(_))
        ));
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_ensure_fixed_columns() {
        let mut reg = SchemaRegistry::default();
        reg.add_column("Notes", ColumnType::Text).unwrap();
        assert!(reg.ensure_fixed_columns());
        let ids: Vec<_> = reg.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(&ids[..2], &[PLATE_COLUMN_ID, DRIVER_COLUMN_ID]);
        assert!(!reg.ensure_fixed_columns());
    }
}
