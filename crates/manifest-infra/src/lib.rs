//! Infrastructure layer - file-backed persistence

pub mod persistence;
