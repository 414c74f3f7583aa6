//! Export of manifest data to spreadsheet files

pub mod excel;

pub use excel::{export_archives, export_summary};
