//! Data ingestion layer for the sleep importer.
//!
//! Responsible for reading the export file, tokenizing it into rows and
//! assembling each surviving row into a normalized [`importer_core::models::SleepRecord`].

pub mod assembler;
pub mod reader;

pub use importer_core as core;
