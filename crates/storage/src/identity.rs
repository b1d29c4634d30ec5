//! Recording identity: the metadata a storage location is derived from.

use crate::{StorageError, StorageResult};
use baw_types::AudioFormat;
use baw_uuid::RecordingUuid;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone};

/// Textual layouts accepted for timestamps that carry an explicit offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Layouts that parse without any offset. Matching one of these is a validation failure.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Identity of one harvested recording.
///
/// Built once per file, either from upload metadata or by parsing an existing path, and never
/// mutated afterwards. `recorded_at` always carries an explicit UTC offset; two identities are
/// equal when their timestamps denote the same instant, whatever offset each is expressed at.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RecordingIdentity {
    uuid: RecordingUuid,
    recorded_at: DateTime<FixedOffset>,
    original_format: AudioFormat,
}

impl RecordingIdentity {
    /// Creates an identity from already-typed parts.
    ///
    /// The timestamp keeps the offset it was given in.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Validation`] if the year of `recorded_at` (in UTC or at its own
    /// offset) falls outside `0..=9999`, which file names cannot represent.
    pub fn new<Tz: TimeZone>(
        uuid: RecordingUuid,
        recorded_at: DateTime<Tz>,
        original_format: AudioFormat,
    ) -> StorageResult<Self> {
        let recorded_at = recorded_at.fixed_offset();
        let years = [recorded_at.year(), recorded_at.naive_utc().year()];
        if years.iter().any(|y| !(0..=9999).contains(y)) {
            return Err(StorageError::validation(
                "recorded_at",
                format!("year must be within 0..=9999, got {}", recorded_at),
            ));
        }

        Ok(Self {
            uuid,
            recorded_at,
            original_format,
        })
    }

    /// Creates an identity from textual upload metadata.
    ///
    /// `recorded_at` must be RFC 3339 or ISO 8601 with an explicit offset (`Z`, `+11:00` or
    /// `+1100`). A timestamp without an offset is rejected rather than assumed to be UTC or
    /// local time.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Validation`] naming the offending field.
    pub fn from_parts(uuid: &str, recorded_at: &str, original_format: &str) -> StorageResult<Self> {
        let uuid = RecordingUuid::parse(uuid.trim())
            .map_err(|e| StorageError::validation("uuid", e.to_string()))?;
        let recorded_at = parse_offset_timestamp(recorded_at.trim())?;
        let original_format = AudioFormat::new(original_format)
            .map_err(|e| StorageError::validation("original_format", e.to_string()))?;

        Self::new(uuid, recorded_at, original_format)
    }

    pub fn uuid(&self) -> &RecordingUuid {
        &self.uuid
    }

    pub fn recorded_at(&self) -> DateTime<FixedOffset> {
        self.recorded_at
    }

    pub fn original_format(&self) -> &AudioFormat {
        &self.original_format
    }
}

fn parse_offset_timestamp(value: &str) -> StorageResult<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed);
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }

    if NAIVE_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
    {
        return Err(StorageError::validation(
            "recorded_at",
            format!("timestamp '{}' has no explicit UTC offset", value),
        ));
    }

    Err(StorageError::validation(
        "recorded_at",
        format!("'{}' is not a recognised timestamp", value),
    ))
}
