//! Repository adapters for persistence layer

use std::path::PathBuf;

use manifest_domain::repository::AppDataRepository;
use manifest_infra::persistence::{BackgroundWriter, FileAppDataRepository, FileArchiveRepository};
use manifest_types::Result;

use crate::config::Config;

/// Open the document repository, wrapped in a background writer when the
/// config asks for it
pub fn open_app_data_repo(config: &Config) -> Result<Box<dyn AppDataRepository>> {
    let store_dir = config.store_dir()?;
    let repo = FileAppDataRepository::open(store_dir)?;
    if config.background_save {
        Ok(Box::new(BackgroundWriter::new(repo)))
    } else {
        Ok(Box::new(repo))
    }
}

/// Open the archive mirror
pub fn open_archive_repo(config: &Config) -> Result<FileArchiveRepository> {
    let store_dir = config.store_dir()?;
    FileArchiveRepository::open(store_dir)
}

/// Open the document repository at a custom directory
pub fn open_app_data_repo_at(store_dir: PathBuf) -> Result<FileAppDataRepository> {
    FileAppDataRepository::open(store_dir)
}

/// Open the archive mirror at a custom directory
pub fn open_archive_repo_at(store_dir: PathBuf) -> Result<FileArchiveRepository> {
    FileArchiveRepository::open(store_dir)
}
