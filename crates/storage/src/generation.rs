//! The two historical encodings of a recording's time in its file name.

use crate::constants::{
    LEGACY_DATETIME_FORMAT, LEGACY_TOKEN_LEN, UTC_DATETIME_FORMAT, UTC_MARKER, UTC_TOKEN_LEN,
};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::fmt;

/// A file-name encoding generation.
///
/// - `Legacy`: `YYMMDD-HHMM`, local time at the configured legacy offset, minute precision.
///   The offset itself is not recorded in the name.
/// - `Utc`: `YYYYMMDD-HHMMSSZ`, UTC at second precision.
///
/// Generations are always tried and listed in [`NamingGeneration::ALL`] order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingGeneration {
    Legacy,
    Utc,
}

impl NamingGeneration {
    pub const ALL: [NamingGeneration; 2] = [NamingGeneration::Legacy, NamingGeneration::Utc];

    /// Encodes `recorded_at` as this generation's date-time token.
    ///
    /// Sub-minute (legacy) or sub-second (UTC) precision is truncated, never rounded.
    pub fn encode<Tz: TimeZone>(
        self,
        recorded_at: &DateTime<Tz>,
        legacy_offset: &FixedOffset,
    ) -> String {
        match self {
            NamingGeneration::Legacy => recorded_at
                .with_timezone(legacy_offset)
                .format(LEGACY_DATETIME_FORMAT)
                .to_string(),
            NamingGeneration::Utc => format!(
                "{}{}",
                recorded_at.with_timezone(&Utc).format(UTC_DATETIME_FORMAT),
                UTC_MARKER
            ),
        }
    }

    /// Picks the generation a date-time token was written in, from its shape alone.
    ///
    /// Legacy tokens are `DDDDDD-DDDD`; UTC tokens are `DDDDDDDD-DDDDDDZ`. Field values are not
    /// range checked here; [`NamingGeneration::decode`] does that.
    pub fn detect(token: &str) -> Option<Self> {
        let bytes = token.as_bytes();
        // Checks the first `len` bytes only; callers check the total length.
        let digits_with_hyphen_at = |hyphen: usize, len: usize| {
            bytes.len() >= len
                && bytes[..len]
                    .iter()
                    .enumerate()
                    .all(|(i, b)| if i == hyphen { *b == b'-' } else { b.is_ascii_digit() })
        };

        if bytes.len() == LEGACY_TOKEN_LEN
            && !token.ends_with(UTC_MARKER)
            && digits_with_hyphen_at(6, LEGACY_TOKEN_LEN)
        {
            return Some(NamingGeneration::Legacy);
        }

        if token.ends_with(UTC_MARKER)
            && bytes.len() == UTC_TOKEN_LEN
            && digits_with_hyphen_at(8, UTC_TOKEN_LEN - 1)
        {
            return Some(NamingGeneration::Utc);
        }

        None
    }

    /// Decodes a token already known to be in this generation's shape.
    ///
    /// Legacy tokens are read as local time at `legacy_offset` with seconds fixed at zero.
    /// UTC tokens are read as UTC. The result always carries an explicit offset.
    pub fn decode(
        self,
        token: &str,
        legacy_offset: &FixedOffset,
    ) -> Result<DateTime<FixedOffset>, String> {
        match self {
            NamingGeneration::Legacy => {
                let naive = NaiveDateTime::parse_from_str(token, LEGACY_DATETIME_FORMAT)
                    .map_err(|e| format!("invalid legacy date-time '{}': {}", token, e))?;
                legacy_offset
                    .from_local_datetime(&naive)
                    .single()
                    .ok_or_else(|| format!("legacy date-time '{}' is not representable", token))
            }
            NamingGeneration::Utc => {
                let without_marker = token.strip_suffix(UTC_MARKER).ok_or_else(|| {
                    format!("UTC date-time must end with '{}': '{}'", UTC_MARKER, token)
                })?;
                let naive = NaiveDateTime::parse_from_str(without_marker, UTC_DATETIME_FORMAT)
                    .map_err(|e| format!("invalid UTC date-time '{}': {}", token, e))?;
                Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).fixed_offset())
            }
        }
    }
}

impl fmt::Display for NamingGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingGeneration::Legacy => f.write_str("legacy"),
            NamingGeneration::Utc => f.write_str("utc"),
        }
    }
}
