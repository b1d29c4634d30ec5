//! Internal implementation of the recording UUID wrapper.

use crate::{UuidError, UuidResult};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Number of leading UUID characters used as the shard directory name.
pub const SHARD_PREFIX_LEN: usize = 2;

const CANONICAL_LEN: usize = 36;
const HYPHEN_OFFSETS: [usize; 4] = [8, 13, 18, 23];

/// Canonical recording identifier (36 lowercase characters, hyphenated).
///
/// This wrapper type guarantees that once constructed, the contained UUID is in canonical
/// form. The canonical string is kept alongside the parsed value so that shard prefixes and
/// file names can borrow from it without re-formatting.
///
/// # When to use this type
/// Use this wrapper whenever you are:
/// - Accepting a recording id from upload metadata or a file name.
/// - Deriving a shard directory for a recording.
///
/// # Construction
/// - [`RecordingUuid::new`] generates a new random identifier.
/// - [`RecordingUuid::parse`] validates an externally supplied identifier.
///
/// # Errors
/// [`RecordingUuid::parse`] returns [`UuidError::InvalidInput`] if the input is not already
/// canonical.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordingUuid {
    canonical: String,
    uuid: Uuid,
}

impl Default for RecordingUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingUuid {
    /// Generates a new random (version 4) recording identifier.
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wraps an already-parsed `uuid::Uuid`.
    ///
    /// Any `Uuid` value has a canonical hyphenated rendering, so this cannot fail.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            canonical: uuid.hyphenated().to_string(),
            uuid,
        }
    }

    /// Validates and parses a UUID string that must already be in canonical form.
    ///
    /// This does **not** normalise other common UUID forms (uppercase, simple, braced). A
    /// recording id that differs only by case would otherwise map to a different file name.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "UUID must be 36 lowercase hex characters in 8-4-4-4-12 hyphenated form, got: '{}'",
                input
            )));
        }

        let uuid = Uuid::parse_str(input).map_err(|e| {
            UuidError::InvalidInput(format!("UUID '{}' could not be parsed: {}", input, e))
        })?;

        Ok(Self {
            canonical: input.to_owned(),
            uuid,
        })
    }

    /// Returns the UUID as a `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Returns the canonical hyphenated string.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Returns true if `input` is in canonical UUID form.
    ///
    /// This is a purely syntactic check that validates:
    /// - Exactly 36 bytes long
    /// - Hyphens at offsets 8, 13, 18 and 23
    /// - Lowercase hex characters (`0-9` and `a-f`) everywhere else
    pub fn is_canonical(input: &str) -> bool {
        input.len() == CANONICAL_LEN
            && input.bytes().enumerate().all(|(i, b)| {
                if HYPHEN_OFFSETS.contains(&i) {
                    b == b'-'
                } else {
                    matches!(b, b'0'..=b'9' | b'a'..=b'f')
                }
            })
    }

    /// Returns the shard prefix: the first two characters of the canonical form.
    pub fn shard_prefix(&self) -> &str {
        &self.canonical[..SHARD_PREFIX_LEN]
    }

    /// Returns `parent_dir/<prefix>` where `prefix` is [`Self::shard_prefix`].
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        parent_dir.join(self.shard_prefix())
    }
}

impl fmt::Display for RecordingUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for RecordingUuid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordingUuid::parse(s)
    }
}

impl AsRef<str> for RecordingUuid {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecordingUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.canonical)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RecordingUuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordingUuid::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "5498633d-89a7-4b65-8f4a-96aa0c09c619";

    #[test]
    fn test_new_generates_canonical_uuid() {
        let id = RecordingUuid::new();
        let canonical = id.to_string();

        assert_eq!(canonical.len(), 36);
        assert!(RecordingUuid::is_canonical(&canonical));
    }

    #[test]
    fn test_parse_valid_canonical_uuid() {
        let id = RecordingUuid::parse(SAMPLE).unwrap();

        assert_eq!(id.to_string(), SAMPLE);
        assert_eq!(id.as_str(), SAMPLE);
    }

    #[test]
    fn test_parse_rejects_simple_uuid() {
        let result = RecordingUuid::parse("5498633d89a74b658f4a96aa0c09c619");

        match result {
            Err(UuidError::InvalidInput(msg)) => {
                assert!(msg.contains("8-4-4-4-12"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_parse_rejects_uppercase_uuid() {
        assert!(RecordingUuid::parse("5498633D-89A7-4B65-8F4A-96AA0C09C619").is_err());
    }

    #[test]
    fn test_parse_rejects_braced_uuid() {
        assert!(RecordingUuid::parse("{5498633d-89a7-4b65-8f4a-96aa0c09c619}").is_err());
    }

    #[test]
    fn test_parse_rejects_misplaced_hyphens() {
        assert!(RecordingUuid::parse("5498633d8-9a7-4b65-8f4a-96aa0c09c619").is_err());
    }

    #[test]
    fn test_is_canonical_invalid() {
        // Too short
        assert!(!RecordingUuid::is_canonical(
            "5498633d-89a7-4b65-8f4a-96aa0c09c61"
        ));

        // Invalid characters
        assert!(!RecordingUuid::is_canonical(
            "5498633d-89a7-4b65-8f4a-96aa0c09czzz"
        ));

        assert!(!RecordingUuid::is_canonical(""));
    }

    #[test]
    fn test_shard_prefix_is_first_two_characters() {
        let id = RecordingUuid::parse(SAMPLE).unwrap();
        assert_eq!(id.shard_prefix(), "54");
    }

    #[test]
    fn test_sharded_dir_structure() {
        let id = RecordingUuid::parse(SAMPLE).unwrap();
        let sharded = id.sharded_dir(Path::new("/data/original_audio"));

        assert_eq!(sharded, PathBuf::from("/data/original_audio/54"));
    }

    #[test]
    fn test_shard_count_is_bounded() {
        let prefixes: std::collections::HashSet<String> = (0..4096)
            .map(|_| RecordingUuid::new().shard_prefix().to_owned())
            .collect();

        assert!(prefixes.len() <= 256);
    }

    #[test]
    fn test_from_uuid_matches_parse() {
        let inner = Uuid::parse_str(SAMPLE).unwrap();
        assert_eq!(
            RecordingUuid::from_uuid(inner),
            RecordingUuid::parse(SAMPLE).unwrap()
        );
    }

    #[test]
    fn test_from_str_invalid() {
        let result: Result<RecordingUuid, _> = "not-a-uuid".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_round_trip_uses_canonical_string() {
        let id = RecordingUuid::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, format!("\"{}\"", SAMPLE));
        let back: RecordingUuid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_serde_rejects_non_canonical() {
        let result: Result<RecordingUuid, _> =
            serde_json::from_str("\"5498633D-89A7-4B65-8F4A-96AA0C09C619\"");
        assert!(result.is_err());
    }
}
