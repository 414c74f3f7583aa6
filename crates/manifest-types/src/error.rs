//! Error types for fleet-manifest

use thiserror::Error;

/// User-correctable input errors. The operation that raised one made no change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Column label must not be empty")]
    EmptyLabel,

    #[error("Plate must not be empty")]
    EmptyPlate,

    #[error("Truck {0} already exists")]
    DuplicatePlate(String),

    #[error("Name must not be empty")]
    EmptyName,

    #[error("Column \"{0}\" cannot be removed")]
    FixedColumn(String),

    #[error("Index {index} is out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown vehicle: {0}")]
    UnknownPlate(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Unknown driver: {0}")]
    UnknownDriver(String),

    #[error("Unknown destination: {0}")]
    UnknownDestination(String),

    #[error("Column \"{0}\" is edited through the status chooser")]
    HierarchicalColumn(String),

    #[error("Column \"{0}\" cannot be edited")]
    ReadOnlyColumn(String),

    #[error("Unknown shift: {0}")]
    UnknownShift(String),

    #[error("No archive for {0}")]
    UnknownArchive(String),

    #[error("Unknown column type: {0}")]
    UnknownColumnType(String),

    #[error("Invalid edit \"{0}\", expected {1}")]
    InvalidEdit(String, &'static str),

    #[error("Choose main status")]
    MissingMainStatus,

    #[error("Choose main and sub status")]
    MissingSubStatus,

    #[error("\"{0}\" is not an available status option")]
    UnknownStatusOption(String),

    #[error("Status chooser is not open")]
    ChooserClosed,
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Excel export error: {0}")]
    Excel(String),
}

pub type Result<T> = std::result::Result<T, Error>;
