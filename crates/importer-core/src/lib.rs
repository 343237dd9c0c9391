//! Core domain layer for the sleep importer.
//!
//! Holds the normalized record and sink-entity models, the never-failing
//! field coercers, timezone-aware interval resolution, the shared error
//! type and the CLI settings struct.

pub mod coerce;
pub mod error;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{ImportError, Result};
