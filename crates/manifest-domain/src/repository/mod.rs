//! Repository trait definitions for data persistence

use manifest_types::{Archive, Error};

use crate::state::AppDocument;

/// Load/save contract for the whole application document
pub trait AppDataRepository {
    /// Load the stored document; `None` when nothing has been stored yet
    fn load(&self) -> Result<Option<AppDocument>, Error>;

    /// Replace the stored document, creating it if absent
    fn save(&self, document: &AppDocument) -> Result<(), Error>;
}

/// Durable mirror of the archive set
pub trait ArchiveRepository {
    /// Insert or overwrite the archive for its date
    fn upsert(&self, archive: &Archive) -> Result<(), Error>;

    /// All archives, newest date first
    fn find_all(&self) -> Result<Vec<Archive>, Error>;

    /// Drop every archive
    fn clear(&self) -> Result<(), Error>;
}
