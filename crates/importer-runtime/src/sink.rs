//! The health-data sink contract and the built-in JSON-lines sink.
//!
//! The real destination store is an external collaborator; this module
//! only fixes its contract: authorization is requested once per run, and
//! entities are written one at a time so that per-record error
//! attribution stays unambiguous.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use importer_core::models::{HealthCategory, HealthEntity};
use importer_core::{ImportError, Result};

/// Destination store for derived health entities.
///
/// Implementations must treat `write` calls as sequential: the
/// orchestrator awaits each acknowledgment before issuing the next
/// write, and relies on per-call failure reporting.
pub trait HealthSink {
    /// Request write access for the given categories.
    ///
    /// Denial is fatal to the run: return
    /// [`ImportError::AuthorizationDenied`] and no parsing or writing
    /// will be attempted.
    fn request_authorization(
        &mut self,
        categories: &[HealthCategory],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Durably persist one entity.
    fn write(&mut self, entity: &HealthEntity) -> impl std::future::Future<Output = Result<()>> + Send;
}

// ── JsonExportSink ────────────────────────────────────────────────────────────

/// A local sink that appends each entity as one JSON line.
///
/// Always grants authorization; write failures surface the underlying
/// serialization or I/O problem as [`ImportError::SinkWrite`].
pub struct JsonExportSink<W: Write + Send> {
    writer: W,
}

impl JsonExportSink<BufWriter<File>> {
    /// Create (or truncate) `path` as the export destination.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl JsonExportSink<io::Stdout> {
    /// Export to standard output.
    pub fn stdout() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl<W: Write + Send> JsonExportSink<W> {
    /// Wrap an arbitrary writer (used by tests).
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write + Send> HealthSink for JsonExportSink<W> {
    async fn request_authorization(&mut self, _categories: &[HealthCategory]) -> Result<()> {
        Ok(())
    }

    async fn write(&mut self, entity: &HealthEntity) -> Result<()> {
        let line = serde_json::to_string(entity)
            .map_err(|e| ImportError::SinkWrite(e.to_string()))?;
        writeln!(self.writer, "{line}").map_err(|e| ImportError::SinkWrite(e.to_string()))
    }
}
