//! Row-to-record assembly.
//!
//! Applies the positional column contract of the export format:
//!
//! | Index | Field                | Type                  |
//! |-------|----------------------|-----------------------|
//! | 0     | id                   | string                |
//! | 1     | date                 | `YYYY-MM-DD`          |
//! | 2     | startTime            | `HH:mm`               |
//! | 3     | endTime              | `HH:mm`               |
//! | 4     | totalDurationMinutes | float, default 0      |
//! | 5–9   | rem/awake/deep/light/unknown minutes | optional float |
//! | 10–11 | hrLowest / hrAverage | optional int          |
//! | 12    | respirationRate      | optional float        |
//! | 13    | quality              | optional int          |
//!
//! Rows that are too short or whose date/times fail to resolve are
//! dropped silently: fail-soft, maximize rows imported.

use importer_core::coerce::FieldCoercer;
use importer_core::models::SleepRecord;
use importer_core::time_utils::TimezoneHandler;
use tracing::debug;

use crate::reader::{tokenize_rows, RawRow};

/// Minimum column count for a row to be eligible for assembly.
const MIN_COLUMNS: usize = 14;

/// Parse a full export text into normalized records.
///
/// Pure over its inputs: the same text and timezone always yield an
/// identical record sequence, in input order. Never raises; short or
/// unresolvable rows only lower the final count.
pub fn parse_sleep_export(contents: &str, tz: &TimezoneHandler) -> Vec<SleepRecord> {
    let rows = tokenize_rows(contents);
    let rows_read = rows.len();

    let records: Vec<SleepRecord> = rows
        .iter()
        .filter_map(|row| assemble_row(row, tz))
        .collect();

    debug!(
        "Assembled {} records from {} data rows ({} dropped)",
        records.len(),
        rows_read,
        rows_read - records.len()
    );

    records
}

/// Assemble one row into a [`SleepRecord`], or `None` when the row is
/// malformed (too few columns, or date/time unresolvable).
pub fn assemble_row(row: &RawRow, tz: &TimezoneHandler) -> Option<SleepRecord> {
    if row.columns.len() < MIN_COLUMNS {
        return None;
    }

    let calendar_date = FieldCoercer::date(row.column(1))?;
    let start_tod = FieldCoercer::time_of_day(row.column(2))?;
    let end_tod = FieldCoercer::time_of_day(row.column(3))?;
    let (start, end) = tz.resolve_interval(calendar_date, start_tod, end_tod)?;

    Some(SleepRecord {
        id: row.column(0).to_string(),
        calendar_date,
        start,
        end,
        duration_minutes: FieldCoercer::float_or_zero(row.column(4)),
        rem_minutes: FieldCoercer::float(row.column(5)),
        awake_minutes: FieldCoercer::float(row.column(6)),
        deep_minutes: FieldCoercer::float(row.column(7)),
        light_minutes: FieldCoercer::float(row.column(8)),
        unknown_minutes: FieldCoercer::float(row.column(9)),
        hr_lowest: FieldCoercer::int(row.column(10)),
        hr_average: FieldCoercer::int(row.column(11)),
        respiration_rate: FieldCoercer::float(row.column(12)),
        quality: FieldCoercer::int(row.column(13)),
    })
}
