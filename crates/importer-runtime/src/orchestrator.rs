//! End-to-end import sequencing.
//!
//! Owns the `Idle → Authorizing → Parsing → Writing → Done` state
//! machine. Authorization success is a hard precondition for parsing:
//! on denial the run fails before any row is looked at. Sink writes are
//! issued sequentially and awaited one at a time; a failed write is
//! logged and counted but never aborts the run.

use importer_core::models::{SleepRecord, WRITE_CATEGORIES};
use importer_core::time_utils::TimezoneHandler;
use importer_core::Result;
use importer_data::assembler::parse_sleep_export;
use tracing::{debug, info, warn};

use crate::expander::expand_record;
use crate::sink::HealthSink;

// ── Public types ──────────────────────────────────────────────────────────────

/// Where an import run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Idle,
    Authorizing,
    Parsing,
    Writing,
    Done,
    Failed,
}

/// Summary of a completed import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportOutcome {
    /// Number of records successfully assembled from the input. This is
    /// the count reported to the caller, independent of how many derived
    /// entities each record produced.
    pub records_imported: usize,
    /// Derived entities acknowledged by the sink.
    pub entities_written: usize,
    /// Sink writes that failed and were skipped.
    pub write_failures: usize,
}

// ── ImportOrchestrator ────────────────────────────────────────────────────────

/// Drives one import run: authorize → parse → expand → write → report.
///
/// Each run owns its own record sequence; there is no cross-run state,
/// so repeated imports of the same text are independent.
pub struct ImportOrchestrator {
    tz: TimezoneHandler,
    state: ImportState,
}

impl ImportOrchestrator {
    /// Create an orchestrator resolving times in the given handler's zone.
    pub fn new(tz: TimezoneHandler) -> Self {
        Self {
            tz,
            state: ImportState::Idle,
        }
    }

    /// The current run state.
    pub fn state(&self) -> ImportState {
        self.state
    }

    /// Run the full import of `contents` against `sink`.
    ///
    /// Returns the run summary, or the sink's authorization error when
    /// access is refused, in which case no parsing work has been done.
    pub async fn run<S: HealthSink>(
        &mut self,
        contents: &str,
        sink: &mut S,
    ) -> Result<ImportOutcome> {
        self.state = ImportState::Authorizing;
        if let Err(e) = sink.request_authorization(WRITE_CATEGORIES).await {
            self.state = ImportState::Failed;
            warn!("Sink authorization failed; aborting before parsing: {}", e);
            return Err(e);
        }

        self.state = ImportState::Parsing;
        let records = parse_sleep_export(contents, &self.tz);
        debug!("Parsed {} records", records.len());

        self.state = ImportState::Writing;
        let mut outcome = ImportOutcome {
            records_imported: records.len(),
            ..ImportOutcome::default()
        };
        for record in &records {
            self.write_record(record, sink, &mut outcome).await;
        }

        self.state = ImportState::Done;
        info!(
            "Import finished: {} records, {} entities written, {} write failures",
            outcome.records_imported, outcome.entities_written, outcome.write_failures
        );
        Ok(outcome)
    }

    /// Write all of one record's entities, core first, continuing past
    /// individual failures.
    async fn write_record<S: HealthSink>(
        &self,
        record: &SleepRecord,
        sink: &mut S,
        outcome: &mut ImportOutcome,
    ) {
        for entity in expand_record(record) {
            match sink.write(&entity).await {
                Ok(()) => outcome.entities_written += 1,
                Err(e) => {
                    warn!(
                        "Write failed for record {} ({:?} entity): {}",
                        record.id, entity, e
                    );
                    outcome.write_failures += 1;
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
