mod bootstrap;

use anyhow::Result;
use clap::Parser;
use importer_core::settings::Settings;
use importer_core::time_utils::TimezoneHandler;
use importer_core::ImportError;
use importer_data::reader::read_export_file;
use importer_runtime::orchestrator::ImportOrchestrator;
use importer_runtime::sink::JsonExportSink;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("sleep-import v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, Timezone: {}",
        settings.file.display(),
        settings.timezone
    );

    let contents = read_export_file(&settings.file)?;
    let tz = TimezoneHandler::new(&settings.timezone);
    let mut orchestrator = ImportOrchestrator::new(tz);

    let outcome = match &settings.output {
        Some(path) => {
            let mut sink = JsonExportSink::create(path)?;
            let outcome = orchestrator.run(&contents, &mut sink).await;
            sink.into_inner()?;
            outcome
        }
        None => {
            let mut sink = JsonExportSink::stdout();
            orchestrator.run(&contents, &mut sink).await
        }
    };

    match outcome {
        Ok(summary) => {
            if summary.write_failures > 0 {
                tracing::warn!("{} entity writes failed", summary.write_failures);
            }
            println!("Imported {} records", summary.records_imported);
            Ok(())
        }
        Err(ImportError::AuthorizationDenied) => {
            eprintln!("Health store access was denied; nothing was imported");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
