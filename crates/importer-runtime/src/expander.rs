//! One-to-many expansion of a sleep record into sink entities.

use chrono::{DateTime, Duration, Utc};
use importer_core::models::{HealthEntity, SleepRecord, SleepStage, VitalKind};
use tracing::warn;

/// Expand one record into its ordered sink entities.
///
/// Emission order is fixed and the sink relies on it (core before
/// stages before vitals, so a categorical core interval is durably
/// written before anything nested within it is attempted):
///
/// 1. the core sleep span, always;
/// 2. a REM stage interval iff `rem_minutes` is present and > 0;
/// 3. a deep stage interval iff `deep_minutes` is present and > 0;
/// 4. a heart-rate sample iff `hr_average` is present;
/// 5. a respiration-rate sample iff `respiration_rate` is present.
///
/// Light and unknown stage durations never expand. Stage ends are
/// `start + minutes*60s`, computed from the duration alone, so a stage
/// may overrun the core span; that is accepted source behavior.
pub fn expand_record(record: &SleepRecord) -> Vec<HealthEntity> {
    let mut entities = vec![HealthEntity::CoreSleep {
        start: record.start,
        end: record.end,
    }];

    if let Some(rem) = record.rem_minutes {
        if rem > 0.0 {
            push_stage(&mut entities, record, SleepStage::Rem, rem);
        }
    }

    if let Some(deep) = record.deep_minutes {
        if deep > 0.0 {
            push_stage(&mut entities, record, SleepStage::Deep, deep);
        }
    }

    if let Some(avg_hr) = record.hr_average {
        entities.push(HealthEntity::VitalSample {
            kind: VitalKind::HeartRate,
            value: avg_hr as f64,
            start: record.start,
            end: record.end,
        });
    }

    if let Some(resp) = record.respiration_rate {
        entities.push(HealthEntity::VitalSample {
            kind: VitalKind::RespirationRate,
            value: resp,
            start: record.start,
            end: record.end,
        });
    }

    entities
}

/// Append one stage interval, unless its duration is so large that the
/// end instant is unrepresentable. An absurd duration only skips its
/// stage; the record's remaining entities are unaffected.
fn push_stage(
    entities: &mut Vec<HealthEntity>,
    record: &SleepRecord,
    stage: SleepStage,
    minutes: f64,
) {
    match offset_by_minutes(record.start, minutes) {
        Some(end) => entities.push(HealthEntity::SleepStage {
            stage,
            start: record.start,
            end,
        }),
        None => warn!(
            "Record {}: {:?} stage duration of {} minutes overflows; skipping stage",
            record.id, stage, minutes
        ),
    }
}

/// Add a fractional minute count, preserving sub-second precision.
///
/// Returns `None` when the resulting instant falls outside chrono's
/// representable range.
fn offset_by_minutes(start: DateTime<Utc>, minutes: f64) -> Option<DateTime<Utc>> {
    let millis = (minutes * 60_000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    start.checked_add_signed(Duration::milliseconds(millis as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn record() -> SleepRecord {
        SleepRecord {
            id: "night-1".to_string(),
            calendar_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start: Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 2, 7, 15, 0).unwrap(),
            duration_minutes: 465.0,
            rem_minutes: None,
            awake_minutes: None,
            deep_minutes: None,
            light_minutes: None,
            unknown_minutes: None,
            hr_lowest: None,
            hr_average: None,
            respiration_rate: None,
            quality: None,
        }
    }

    #[test]
    fn test_bare_record_yields_only_core_span() {
        let entities = expand_record(&record());
        assert_eq!(
            entities,
            vec![HealthEntity::CoreSleep {
                start: record().start,
                end: record().end,
            }]
        );
    }

    #[test]
    fn test_rem_only_expansion() {
        // rem=45, deep=0, hr absent → exactly [core, REM stage].
        let mut r = record();
        r.rem_minutes = Some(45.0);
        r.deep_minutes = Some(0.0);

        let entities = expand_record(&r);
        assert_eq!(entities.len(), 2);
        assert!(matches!(entities[0], HealthEntity::CoreSleep { .. }));
        let HealthEntity::SleepStage { stage, start, end } = &entities[1] else {
            panic!("expected a stage interval");
        };
        assert_eq!(*stage, SleepStage::Rem);
        assert_eq!(*start, r.start);
        assert_eq!(*end, r.start + Duration::minutes(45));
    }

    #[test]
    fn test_zero_duration_stage_is_not_emitted() {
        let mut r = record();
        r.rem_minutes = Some(0.0);
        r.deep_minutes = Some(0.0);
        assert_eq!(expand_record(&r).len(), 1);
    }

    #[test]
    fn test_full_record_emission_order() {
        let mut r = record();
        r.rem_minutes = Some(90.0);
        r.deep_minutes = Some(60.0);
        r.hr_average = Some(56);
        r.respiration_rate = Some(14.2);

        let entities = expand_record(&r);
        assert_eq!(entities.len(), 5);
        assert!(matches!(entities[0], HealthEntity::CoreSleep { .. }));
        assert!(matches!(
            entities[1],
            HealthEntity::SleepStage {
                stage: SleepStage::Rem,
                ..
            }
        ));
        assert!(matches!(
            entities[2],
            HealthEntity::SleepStage {
                stage: SleepStage::Deep,
                ..
            }
        ));
        assert!(matches!(
            entities[3],
            HealthEntity::VitalSample {
                kind: VitalKind::HeartRate,
                ..
            }
        ));
        assert!(matches!(
            entities[4],
            HealthEntity::VitalSample {
                kind: VitalKind::RespirationRate,
                ..
            }
        ));
    }

    #[test]
    fn test_light_and_unknown_never_expand() {
        let mut r = record();
        r.light_minutes = Some(300.0);
        r.unknown_minutes = Some(12.0);
        assert_eq!(expand_record(&r).len(), 1);
    }

    #[test]
    fn test_vitals_span_the_full_core_interval() {
        let mut r = record();
        r.hr_average = Some(58);
        let entities = expand_record(&r);
        let HealthEntity::VitalSample { value, start, end, .. } = &entities[1] else {
            panic!("expected a vital sample");
        };
        assert_eq!(*value, 58.0);
        assert_eq!(*start, r.start);
        assert_eq!(*end, r.end);
    }

    #[test]
    fn test_stage_may_overrun_core_span() {
        // A 600-minute REM stage on a 465-minute session: the stage end
        // extends past the core end and is left uncorrected.
        let mut r = record();
        r.rem_minutes = Some(600.0);
        let entities = expand_record(&r);
        assert!(entities[1].end() > r.end);
    }

    #[test]
    fn test_absurd_stage_duration_skips_only_that_stage() {
        // A parseable but unrepresentable duration must not panic; the
        // stage is dropped while the rest of the record still expands.
        let mut r = record();
        r.rem_minutes = Some(1e15);
        r.deep_minutes = Some(60.0);
        r.hr_average = Some(56);

        let entities = expand_record(&r);
        assert_eq!(entities.len(), 3);
        assert!(matches!(entities[0], HealthEntity::CoreSleep { .. }));
        assert!(matches!(
            entities[1],
            HealthEntity::SleepStage {
                stage: SleepStage::Deep,
                ..
            }
        ));
        assert!(matches!(entities[2], HealthEntity::VitalSample { .. }));
    }

    #[test]
    fn test_infinite_stage_duration_is_skipped() {
        let mut r = record();
        r.rem_minutes = Some(f64::INFINITY);
        assert_eq!(expand_record(&r).len(), 1);
    }

    #[test]
    fn test_fractional_minutes_preserved() {
        let mut r = record();
        r.rem_minutes = Some(0.5);
        let entities = expand_record(&r);
        assert_eq!(entities[1].end(), r.start + Duration::seconds(30));
    }
}
