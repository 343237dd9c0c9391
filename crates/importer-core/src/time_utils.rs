use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Uses the `iana-time-zone` crate directly – no subprocess calls.
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Resolves the export's naive date/time-of-day pairs into absolute
/// instants in a configured local timezone.
pub struct TimezoneHandler {
    local_tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler for the given IANA timezone name.
    ///
    /// `"auto"` selects the system timezone. An unrecognised name falls
    /// back to UTC and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let resolved = if tz_name.eq_ignore_ascii_case("auto") {
            get_system_timezone()
        } else {
            tz_name.to_string()
        };
        let tz = resolved.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                resolved
            );
            Tz::UTC
        });
        Self { local_tz: tz }
    }

    /// Validate that `tz_name` is a recognised IANA timezone identifier.
    pub fn validate_timezone(tz_name: &str) -> bool {
        tz_name.parse::<Tz>().is_ok()
    }

    /// Expose the configured local timezone.
    pub fn local_tz(&self) -> Tz {
        self.local_tz
    }

    /// Resolve a session's absolute `(start, end)` instants.
    ///
    /// Both times-of-day are attached to `date` (seconds = 0) in the local
    /// timezone. When the candidate end is strictly earlier than the start
    /// the session crossed midnight and exactly one day is added; this is
    /// the only rollover correction, multi-day sessions are unsupported.
    /// A start equal to its end is accepted as a zero-length interval.
    ///
    /// Returns `None` when either local time cannot be resolved (e.g. it
    /// falls inside a DST gap); the caller drops the row.
    pub fn resolve_interval(
        &self,
        date: NaiveDate,
        start_tod: NaiveTime,
        end_tod: NaiveTime,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.local_instant(date, start_tod)?;
        let mut end = self.local_instant(date, end_tod)?;

        if end < start {
            end += Duration::days(1);
        }

        Some((start, end))
    }

    /// Map a local naive date + time to UTC.
    ///
    /// DST-fold ambiguity resolves to the earliest mapping; a nonexistent
    /// local time (DST gap) resolves to `None`.
    fn local_instant(&self, date: NaiveDate, tod: NaiveTime) -> Option<DateTime<Utc>> {
        let naive = date.and_time(tod.with_second(0)?);
        match self.local_tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
            LocalResult::None => {
                warn!(
                    "TimezoneHandler: local time {} does not exist in {}",
                    naive, self.local_tz
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_handler() -> TimezoneHandler {
        TimezoneHandler::new("UTC")
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn test_new_with_valid_timezone() {
        let handler = TimezoneHandler::new("America/New_York");
        assert_eq!(handler.local_tz(), chrono_tz::America::New_York);
    }

    #[test]
    fn test_new_with_invalid_timezone_falls_back_to_utc() {
        let handler = TimezoneHandler::new("Not/AZone");
        assert_eq!(handler.local_tz(), Tz::UTC);
    }

    #[test]
    fn test_new_auto_resolves_to_some_valid_timezone() {
        // Whatever the host reports, construction must succeed.
        let handler = TimezoneHandler::new("auto");
        assert!(TimezoneHandler::validate_timezone(handler.local_tz().name()));
    }

    #[test]
    fn test_validate_timezone() {
        assert!(TimezoneHandler::validate_timezone("Europe/Berlin"));
        assert!(!TimezoneHandler::validate_timezone("Mars/Olympus"));
    }

    // ── resolve_interval ──────────────────────────────────────────────────

    #[test]
    fn test_same_day_interval() {
        let handler = utc_handler();
        let (start, end) = handler
            .resolve_interval(d(2024, 1, 1), t(22, 0), t(23, 30))
            .unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap());
    }

    #[test]
    fn test_midnight_rollover() {
        // start 23:30, end 00:15 on 2024-01-01 → end lands on 2024-01-02.
        let handler = utc_handler();
        let (start, end) = handler
            .resolve_interval(d(2024, 1, 1), t(23, 30), t(0, 15))
            .unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 2, 0, 15, 0).unwrap());
    }

    #[test]
    fn test_equal_times_yield_zero_length_interval() {
        // Equality is not rolled over; the zero-length span is accepted.
        let handler = utc_handler();
        let (start, end) = handler
            .resolve_interval(d(2024, 6, 10), t(1, 0), t(1, 0))
            .unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn test_interval_invariant_over_time_grid() {
        // Exhaustive sweep over hour/quarter-hour pairs, covering
        // end > start, end == start and end < start (rollover) cases.
        let handler = utc_handler();
        let date = d(2024, 3, 15);
        for sh in 0..24 {
            for eh in 0..24 {
                for &(sm, em) in &[(0u32, 0u32), (30, 15), (15, 45), (45, 45)] {
                    let (start, end) = handler
                        .resolve_interval(date, t(sh, sm), t(eh, em))
                        .unwrap();
                    assert!(
                        end >= start,
                        "violated for {:02}:{:02} → {:02}:{:02}",
                        sh, sm, eh, em
                    );
                    if (sh, sm) != (eh, em) {
                        assert!(end > start);
                    }
                    // Rollover adds at most one day.
                    assert!(end - start < Duration::days(1));
                }
            }
        }
    }

    #[test]
    fn test_rollover_in_non_utc_zone() {
        let handler = TimezoneHandler::new("America/New_York");
        // 23:30 EST = 04:30 UTC next day.
        let (start, end) = handler
            .resolve_interval(d(2024, 1, 1), t(23, 30), t(0, 15))
            .unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 2, 4, 30, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 2, 5, 15, 0).unwrap());
        assert!(end > start);
    }

    #[test]
    fn test_dst_gap_rejects_resolution() {
        // 2024-03-10 02:30 does not exist in America/New_York.
        let handler = TimezoneHandler::new("America/New_York");
        let resolved = handler.resolve_interval(d(2024, 3, 10), t(2, 30), t(6, 0));
        assert!(resolved.is_none());
    }

    #[test]
    fn test_dst_fold_takes_earliest_mapping() {
        // 2024-11-03 01:30 occurs twice in America/New_York; the earliest
        // mapping is EDT (UTC-4) → 05:30 UTC.
        let handler = TimezoneHandler::new("America/New_York");
        let (start, _) = handler
            .resolve_interval(d(2024, 11, 3), t(1, 30), t(6, 0))
            .unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap());
    }
}
