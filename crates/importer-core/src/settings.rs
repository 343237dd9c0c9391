use clap::Parser;
use std::path::PathBuf;

/// Import a sleep-tracker CSV export into a health-data sink
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sleep-import",
    about = "Import a sleep-tracker CSV export into a health-data sink",
    version
)]
pub struct Settings {
    /// Path to the CSV export file
    pub file: PathBuf,

    /// IANA timezone the export's times are local to (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Destination for exported entities as JSON lines (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,
}
