//! Recovers a [`RecordingIdentity`] from a stored file's path.

use crate::constants::{EXTENSION_SEPARATOR, NAME_SEPARATOR};
use crate::{NamingGeneration, RecordingIdentity, StorageError, StorageResult};
use baw_types::AudioFormat;
use baw_uuid::RecordingUuid;
use chrono::FixedOffset;
use std::path::Path;

/// Inverse of [`PathNamer`](crate::PathNamer).
///
/// Accepts either naming generation and detects which one from the shape of the date-time
/// token. Legacy tokens are decoded at the configured legacy offset, which is assumed not to
/// have changed since the file was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathParser {
    legacy_offset: FixedOffset,
}

impl PathParser {
    pub fn new(legacy_offset: FixedOffset) -> Self {
        Self { legacy_offset }
    }

    /// Parses the file-name component of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Parse`] when the name matches neither generation.
    pub fn parse_path(&self, path: &Path) -> StorageResult<RecordingIdentity> {
        self.parse_path_with_generation(path)
            .map(|(identity, _)| identity)
    }

    /// Like [`Self::parse_path`], also reporting which generation the name was written in.
    pub fn parse_path_with_generation(
        &self,
        path: &Path,
    ) -> StorageResult<(RecordingIdentity, NamingGeneration)> {
        let file_name = path
            .file_name()
            .ok_or_else(|| StorageError::parse(path, "path has no file name"))?
            .to_str()
            .ok_or_else(|| StorageError::parse(path, "file name is not valid UTF-8"))?;

        self.parse_name(path, file_name)
    }

    /// Parses a bare file name such as `<uuid>_20120302-050537Z.mp3`.
    pub fn parse_file_name(&self, file_name: &str) -> StorageResult<RecordingIdentity> {
        self.parse_name(Path::new(file_name), file_name)
            .map(|(identity, _)| identity)
    }

    fn parse_name(
        &self,
        path: &Path,
        file_name: &str,
    ) -> StorageResult<(RecordingIdentity, NamingGeneration)> {
        let (stem, extension) = file_name
            .rsplit_once(EXTENSION_SEPARATOR)
            .ok_or_else(|| StorageError::parse(path, "file name has no extension"))?;
        if extension.chars().any(char::is_whitespace) {
            return Err(StorageError::parse(
                path,
                format!("extension '{}' contains whitespace", extension.escape_debug()),
            ));
        }
        let original_format = AudioFormat::new(extension)
            .map_err(|e| StorageError::parse(path, format!("invalid extension: {}", e)))?;

        let (uuid, token) = stem.split_once(NAME_SEPARATOR).ok_or_else(|| {
            StorageError::parse(
                path,
                format!("expected '<uuid>{}<date-time>' before the extension", NAME_SEPARATOR),
            )
        })?;
        let uuid =
            RecordingUuid::parse(uuid).map_err(|e| StorageError::parse(path, e.to_string()))?;

        let generation = NamingGeneration::detect(token).ok_or_else(|| {
            StorageError::parse(
                path,
                format!(
                    "date-time '{}' matches neither YYMMDD-HHMM nor YYYYMMDD-HHMMSSZ",
                    token
                ),
            )
        })?;
        let recorded_at = generation
            .decode(token, &self.legacy_offset)
            .map_err(|reason| StorageError::parse(path, reason))?;

        let identity = RecordingIdentity::new(uuid, recorded_at, original_format)
            .map_err(|e| StorageError::parse(path, e.to_string()))?;

        Ok((identity, generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathNamer;
    use chrono::{DateTime, Timelike};

    const UUID: &str = "5498633d-89a7-4b65-8f4a-96aa0c09c619";

    fn plus_ten() -> FixedOffset {
        FixedOffset::east_opt(10 * 3600).unwrap()
    }

    fn identity() -> RecordingIdentity {
        RecordingIdentity::from_parts(UUID, "2012-03-02T16:05:37+11:00", "mp3").unwrap()
    }

    #[test]
    fn test_parses_a_valid_utc_file_name() {
        let parser = PathParser::new(plus_ten());
        let path = Path::new(
            "/data/original_audio/54/5498633d-89a7-4b65-8f4a-96aa0c09c619_20120302-050537Z.mp3",
        );

        let (parsed, generation) = parser.parse_path_with_generation(path).unwrap();

        assert_eq!(generation, NamingGeneration::Utc);
        assert_eq!(parsed, identity());
        assert_eq!(parsed.uuid().as_str(), UUID);
        assert_eq!(parsed.original_format().as_str(), "mp3");
    }

    #[test]
    fn test_parses_a_valid_legacy_file_name() {
        let parser = PathParser::new(plus_ten());
        let path = Path::new(
            "/data/original_audio/54/5498633d-89a7-4b65-8f4a-96aa0c09c619_120302-1505.mp3",
        );

        let (parsed, generation) = parser.parse_path_with_generation(path).unwrap();
        let expected = DateTime::parse_from_rfc3339("2012-03-02T16:05:00+11:00").unwrap();

        assert_eq!(generation, NamingGeneration::Legacy);
        assert_eq!(parsed.uuid().as_str(), UUID);
        assert_eq!(parsed.recorded_at(), expected);
        assert_eq!(parsed.recorded_at().offset().local_minus_utc(), 36_000);
        assert_eq!(parsed.original_format().as_str(), "mp3");
    }

    #[test]
    fn test_extension_is_lowercased() {
        let parser = PathParser::new(plus_ten());
        let parsed = parser
            .parse_file_name("5498633d-89a7-4b65-8f4a-96aa0c09c619_20120302-050537Z.WAV")
            .unwrap();
        assert_eq!(parsed.original_format().as_str(), "wav");
    }

    #[test]
    fn test_utc_round_trip_is_exact() {
        let namer = PathNamer::new(plus_ten());
        let parser = PathParser::new(plus_ten());

        for timestamp in [
            "2012-03-02T16:05:37+11:00",
            "1999-12-31T23:59:59Z",
            "2024-02-29T00:00:00-09:30",
            "2070-01-01T12:34:56+05:45",
        ] {
            let original = RecordingIdentity::from_parts(UUID, timestamp, "flac").unwrap();
            let path = Path::new("/root/54").join(namer.name_utc(&original));

            assert_eq!(parser.parse_path(&path).unwrap(), original, "{timestamp}");
        }
    }

    #[test]
    fn test_legacy_round_trip_truncates_to_minute() {
        let namer = PathNamer::new(plus_ten());
        let parser = PathParser::new(plus_ten());
        let original = identity();

        let parsed = parser.parse_file_name(&namer.name_legacy(&original)).unwrap();

        assert_eq!(parsed.uuid(), original.uuid());
        assert_eq!(parsed.original_format(), original.original_format());
        assert_eq!(
            parsed.recorded_at(),
            original.recorded_at().with_second(0).unwrap()
        );
        assert_eq!(parsed.recorded_at().offset(), &plus_ten());
    }

    #[test]
    fn test_rejects_names_matching_neither_generation() {
        let parser = PathParser::new(plus_ten());

        for name in [
            "readme.txt",
            "5498633d-89a7-4b65-8f4a-96aa0c09c619.mp3",
            "5498633d-89a7-4b65-8f4a-96aa0c09c619_20120302-050537Z",
            "5498633d-89a7-4b65-8f4a-96aa0c09c619_20120302-050537.mp3",
            "5498633d-89a7-4b65-8f4a-96aa0c09c619_2012-03-02.mp3",
            "5498633d89a74b658f4a96aa0c09c619_20120302-050537Z.mp3",
            "5498633D-89A7-4B65-8F4A-96AA0C09C619_20120302-050537Z.mp3",
            "5498633d-89a7-4b65-8f4a-96aa0c09c619_20121302-050537Z.mp3",
            "5498633d-89a7-4b65-8f4a-96aa0c09c619_120302-1505.",
            ".DS_Store",
            "5498633d-89a7-4b65-8f4a-96aa0c09c619_20120302-050537Z. mp3\t",
            "5498633d-89a7-4b65-8f4a-96aa0c09c619_20120302-050537Z.mp3 ",
            "5498633d-89a7-4b65-8f4a-96aa0c09c619_120302-1505.\u{a0}wav",
        ] {
            let err = parser.parse_file_name(name).unwrap_err();
            assert!(err.is_parse(), "{name} gave {err:?}");
        }
    }

    #[test]
    fn test_padded_extension_is_not_a_stored_path() {
        let parser = PathParser::new(plus_ten());
        let namer = PathNamer::new(plus_ten());
        let stored = Path::new("/data/54").join(namer.name_utc(&identity()));
        let padded = Path::new("/data/54").join(format!("{}\t", namer.name_utc(&identity())));

        assert!(parser.parse_path(&stored).is_ok());
        assert!(parser.parse_path(&padded).unwrap_err().is_parse());
    }

    #[test]
    fn test_parse_error_names_the_path() {
        let parser = PathParser::new(plus_ten());
        let err = parser
            .parse_path(Path::new("/data/54/not-a-recording.mp3"))
            .unwrap_err();

        match err {
            StorageError::Parse { path, .. } => {
                assert_eq!(path, Path::new("/data/54/not-a-recording.mp3"));
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_path_without_file_name() {
        let parser = PathParser::new(plus_ten());
        assert!(parser.parse_path(Path::new("/")).unwrap_err().is_parse());
    }
}
