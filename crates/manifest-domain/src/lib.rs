//! Manifest engine: dynamic column schema, roster, status taxonomy, shift
//! records, summary projection and day rollover.

pub mod clock;
pub mod model;
pub mod repository;
pub mod service;
pub mod state;

pub use clock::{Clock, FixedClock, SystemClock};
pub use state::{AppDocument, AppState};
