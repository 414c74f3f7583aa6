//! File-based implementation of AppDataRepository

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use manifest_domain::repository::AppDataRepository;
use manifest_domain::AppDocument;
use manifest_types::{Error, Result};
use tracing::debug;

use super::json_file::{move_aside, write_atomic};

/// Stores the application document as pretty JSON in `app_data.json`
#[derive(Debug, Clone)]
pub struct FileAppDataRepository {
    store_path: PathBuf,
}

impl FileAppDataRepository {
    /// Open the repository inside `store_dir`, creating the directory
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        Ok(Self {
            store_path: store_dir.join("app_data.json"),
        })
    }
}

impl AppDataRepository for FileAppDataRepository {
    /// An unparsable document is moved aside before the error is returned,
    /// so the caller may start fresh without destroying it
    fn load(&self) -> std::result::Result<Option<AppDocument>, Error> {
        if !self.store_path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.store_path)?;
        let parsed = serde_json::from_reader(BufReader::new(file));
        match parsed {
            Ok(document) => Ok(Some(document)),
            Err(e) => {
                move_aside(&self.store_path);
                Err(e.into())
            }
        }
    }

    fn save(&self, document: &AppDocument) -> std::result::Result<(), Error> {
        write_atomic(&self.store_path, document)?;
        debug!(path = %self.store_path.display(), "Saved app document");
        Ok(())
    }
}
