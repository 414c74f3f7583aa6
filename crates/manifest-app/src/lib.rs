//! Application service layer - lifecycle, config, export

pub mod app;
pub mod config;
pub mod export;
pub mod repository;

pub use app::{AssumeYes, Confirm, ManifestService};
pub use config::Config;
