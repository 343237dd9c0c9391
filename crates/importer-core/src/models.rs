use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A sink authorization category.
///
/// Mirrors the category set the importer needs write access for: one
/// categorical type for sleep analysis and the two vital-sign quantity
/// types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCategory {
    SleepAnalysis,
    HeartRate,
    RespirationRate,
}

/// The categories every import run requests authorization for.
pub const WRITE_CATEGORIES: &[HealthCategory] = &[
    HealthCategory::SleepAnalysis,
    HealthCategory::HeartRate,
    HealthCategory::RespirationRate,
];

/// A sleep stage that can appear as a derived sub-interval.
///
/// Light and unknown durations are parsed into [`SleepRecord`] but are
/// never expanded into sink entities; only REM and deep are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStage {
    Rem,
    Deep,
}

/// The kind of a point-in-range vital-sign sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    HeartRate,
    RespirationRate,
}

/// One normalized sleep session parsed from a single export row.
///
/// Constructed exactly once by the record assembler and immutable
/// thereafter. Optional fields distinguish "not reported" from zero;
/// only `duration_minutes` collapses an unparsable value to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    /// Opaque identifier from the source (column 0). No uniqueness is
    /// enforced at this layer.
    pub id: String,
    /// The nominal calendar date the session is attributed to.
    pub calendar_date: NaiveDate,
    /// Absolute session start (UTC).
    pub start: DateTime<Utc>,
    /// Absolute session end (UTC). Always `>= start`; the resolver adds
    /// one day when the raw end time-of-day precedes the start.
    pub end: DateTime<Utc>,
    /// Total session duration in minutes. Defaults to 0 when the source
    /// value is unparsable.
    pub duration_minutes: f64,
    /// Minutes spent in REM sleep, when reported.
    pub rem_minutes: Option<f64>,
    /// Minutes spent awake, when reported.
    pub awake_minutes: Option<f64>,
    /// Minutes spent in deep sleep, when reported.
    pub deep_minutes: Option<f64>,
    /// Minutes spent in light sleep, when reported.
    pub light_minutes: Option<f64>,
    /// Minutes in an unclassified stage, when reported.
    pub unknown_minutes: Option<f64>,
    /// Lowest heart rate over the session (bpm), when reported.
    pub hr_lowest: Option<i64>,
    /// Average heart rate over the session (bpm), when reported.
    pub hr_average: Option<i64>,
    /// Average respiration rate (breaths/min), when reported.
    pub respiration_rate: Option<f64>,
    /// Source-assigned quality score, when reported.
    pub quality: Option<i64>,
}

/// One sink-bound entity derived from a [`SleepRecord`].
///
/// Transient: owned by the expander's output sequence until handed to
/// the sink, never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HealthEntity {
    /// The core sleep span, always produced, covering the full session.
    CoreSleep {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// A stage sub-interval anchored at the session start. Its end is
    /// `start + minutes*60s`, computed independently of the session end,
    /// so it may legitimately overrun the core span.
    SleepStage {
        stage: SleepStage,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// A vital-sign sample spanning the full session.
    VitalSample {
        kind: VitalKind,
        value: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl HealthEntity {
    /// The start instant of this entity, whatever the variant.
    pub fn start(&self) -> DateTime<Utc> {
        match self {
            HealthEntity::CoreSleep { start, .. }
            | HealthEntity::SleepStage { start, .. }
            | HealthEntity::VitalSample { start, .. } => *start,
        }
    }

    /// The end instant of this entity, whatever the variant.
    pub fn end(&self) -> DateTime<Utc> {
        match self {
            HealthEntity::CoreSleep { end, .. }
            | HealthEntity::SleepStage { end, .. }
            | HealthEntity::VitalSample { end, .. } => *end,
        }
    }
}
