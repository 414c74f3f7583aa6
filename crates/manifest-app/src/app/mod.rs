//! Application Layer
//!
//! Orchestrates between the CLI and the domain/infrastructure layers:
//! - `manifest_service`: load/rollover lifecycle and every mutating operation
//! - `confirm`: the gate destructive operations pass through

pub mod confirm;
pub mod manifest_service;

pub use confirm::{AssumeYes, Confirm};
pub use manifest_service::ManifestService;
