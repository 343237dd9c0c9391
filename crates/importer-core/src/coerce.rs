use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

// ── FieldCoercer ──────────────────────────────────────────────────────────────

/// Converts raw column strings into typed values.
///
/// Coercers never fail: absence (`None`) is the only rejection signal.
/// Callers decide per field whether absence drops the row (date, times),
/// leaves the field unreported (the optional stats) or falls back to a
/// default (`duration_minutes` only).
pub struct FieldCoercer;

impl FieldCoercer {
    /// Parse a calendar date in the export's fixed `YYYY-MM-DD` form.
    pub fn date(s: &str) -> Option<NaiveDate> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                debug!("FieldCoercer: rejected date value \"{}\"", trimmed);
                None
            }
        }
    }

    /// Parse a 24-hour `HH:MM` time-of-day.
    ///
    /// The result carries only hour and minute; attaching it to a date and
    /// timezone is the interval resolver's job.
    pub fn time_of_day(s: &str) -> Option<NaiveTime> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        match NaiveTime::parse_from_str(trimmed, "%H:%M") {
            Ok(time) => Some(time),
            Err(_) => {
                debug!("FieldCoercer: rejected time value \"{}\"", trimmed);
                None
            }
        }
    }

    /// Permissive float parse for the optional numeric columns.
    pub fn float(s: &str) -> Option<f64> {
        s.trim().parse::<f64>().ok()
    }

    /// Permissive integer parse for the optional integer columns.
    pub fn int(s: &str) -> Option<i64> {
        s.trim().parse::<i64>().ok()
    }

    /// Float parse for the single mandatory field (`duration_minutes`):
    /// an unparsable value becomes 0 rather than absence.
    pub fn float_or_zero(s: &str) -> f64 {
        Self::float(s).unwrap_or(0.0)
    }
}
