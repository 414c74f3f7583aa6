//! Domain model types

pub mod roster;
pub mod schema;
pub mod taxonomy;

pub use roster::{normalize_plate, Roster};
pub use schema::{generate_column_id, slugify, MoveDirection, SchemaRegistry};
pub use taxonomy::StatusTaxonomy;
