//! Runtime orchestration layer for the sleep importer.
//!
//! Expands normalized records into sink entities, defines the sink
//! contract, and drives the end-to-end import sequence.

pub mod expander;
pub mod orchestrator;
pub mod sink;

pub use importer_core as core;
pub use importer_data as data;
