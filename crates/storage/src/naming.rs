//! Canonical file names and relative paths for recordings.

use crate::constants::{EXTENSION_SEPARATOR, NAME_SEPARATOR};
use crate::{NamingGeneration, RecordingIdentity};
use chrono::FixedOffset;
use std::path::PathBuf;

/// Computes canonical names: `<uuid>_<encoded-datetime>.<format>`.
///
/// Pure and deterministic for a fixed legacy offset; safe to share between threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathNamer {
    legacy_offset: FixedOffset,
}

impl PathNamer {
    pub fn new(legacy_offset: FixedOffset) -> Self {
        Self { legacy_offset }
    }

    pub fn legacy_offset(&self) -> FixedOffset {
        self.legacy_offset
    }

    /// Legacy name: local time at the legacy offset, `YYMMDD-HHMM`, seconds dropped.
    pub fn name_legacy(&self, identity: &RecordingIdentity) -> String {
        self.name(identity, NamingGeneration::Legacy)
    }

    /// Current name: UTC, `YYYYMMDD-HHMMSSZ`.
    pub fn name_utc(&self, identity: &RecordingIdentity) -> String {
        self.name(identity, NamingGeneration::Utc)
    }

    pub fn name(&self, identity: &RecordingIdentity, generation: NamingGeneration) -> String {
        format!(
            "{}{}{}{}{}",
            identity.uuid(),
            NAME_SEPARATOR,
            generation.encode(&identity.recorded_at(), &self.legacy_offset),
            EXTENSION_SEPARATOR,
            identity.original_format()
        )
    }

    /// The shard directory name. Identical for every generation.
    pub fn partial_path<'a>(&self, identity: &'a RecordingIdentity) -> &'a str {
        identity.uuid().shard_prefix()
    }

    /// `<shard>/<name>` for the given generation, relative to any storage root.
    pub fn relative_path(
        &self,
        identity: &RecordingIdentity,
        generation: NamingGeneration,
    ) -> PathBuf {
        PathBuf::from(self.partial_path(identity)).join(self.name(identity, generation))
    }
}
