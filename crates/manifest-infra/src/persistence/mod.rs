//! Persistence implementations
//!
//! File-based implementations of the repository traits, plus a background
//! writer that makes document saves fire-and-forget.

mod background_writer;
mod file_app_data_repo;
mod file_archive_repo;
mod json_file;

pub use background_writer::BackgroundWriter;
pub use file_app_data_repo::FileAppDataRepository;
pub use file_archive_repo::FileArchiveRepository;
