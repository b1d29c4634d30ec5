//! Storage configuration.
//!
//! Configuration is resolved once at process startup and passed into [`OriginalAudioStorage`]
//! and the services it builds. Nothing in this crate reads environment variables; the helpers
//! at the bottom of this module parse *values* that a binary has already read, so tests can fix
//! roots and the legacy offset deterministically.
//!
//! [`OriginalAudioStorage`]: crate::OriginalAudioStorage

use crate::constants::{DEFAULT_AUDIO_FORMATS, DEFAULT_LEGACY_UTC_OFFSET_SECS};
use crate::{StorageError, StorageResult};
use baw_types::AudioFormat;
use chrono::{FixedOffset, Offset, Utc};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Ordered, deduplicated set of absolute storage root directories.
///
/// All roots form one logical pool. The first occurrence of a duplicated root wins, so the
/// configured order is otherwise preserved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageRoots(Vec<PathBuf>);

impl StorageRoots {
    /// Creates a root set.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfig`] if no roots are given or a root is relative.
    pub fn new<I, P>(roots: I) -> StorageResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut unique: Vec<PathBuf> = Vec::new();
        for root in roots {
            let root = root.into();
            if !root.is_absolute() {
                return Err(StorageError::InvalidConfig(format!(
                    "storage root must be an absolute path: {}",
                    root.display()
                )));
            }
            if !unique.contains(&root) {
                unique.push(root);
            }
        }

        if unique.is_empty() {
            return Err(StorageError::InvalidConfig(
                "at least one storage root is required".into(),
            ));
        }

        Ok(Self(unique))
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }
}

/// Storage configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    roots: StorageRoots,
    legacy_offset: FixedOffset,
    audio_formats: Vec<AudioFormat>,
}

impl StorageConfig {
    /// Create a new `StorageConfig`.
    pub fn new(
        roots: StorageRoots,
        legacy_offset: FixedOffset,
        audio_formats: Vec<AudioFormat>,
    ) -> Self {
        Self {
            roots,
            legacy_offset,
            audio_formats,
        }
    }

    /// Create a config for `roots` with the default legacy offset and audio formats.
    pub fn with_defaults(roots: StorageRoots) -> Self {
        Self::new(roots, default_legacy_offset(), default_audio_formats())
    }

    pub fn roots(&self) -> &StorageRoots {
        &self.roots
    }

    /// Offset used to encode and decode legacy (`YYMMDD-HHMM`) names.
    pub fn legacy_offset(&self) -> FixedOffset {
        self.legacy_offset
    }

    pub fn audio_formats(&self) -> &[AudioFormat] {
        &self.audio_formats
    }

    /// Whether `format` is one of the configured audio formats.
    ///
    /// Naming and parsing never consult this; it is for callers deciding whether to harvest.
    pub fn is_recognised_format(&self, format: &AudioFormat) -> bool {
        self.audio_formats.contains(format)
    }
}

pub fn default_legacy_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_LEGACY_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub fn default_audio_formats() -> Vec<AudioFormat> {
    DEFAULT_AUDIO_FORMATS
        .iter()
        .filter_map(|f| AudioFormat::new(f).ok())
        .collect()
}

/// Build a [`StorageConfig`] from raw values a binary has read from its environment.
///
/// Roots are required; the legacy offset and audio formats fall back to their defaults.
pub fn resolve_config(
    roots: Option<&OsStr>,
    legacy_offset: Option<String>,
    audio_formats: Option<String>,
) -> StorageResult<StorageConfig> {
    Ok(StorageConfig::new(
        roots_from_env_value(roots)?,
        legacy_offset_from_env_value(legacy_offset)?,
        audio_formats_from_env_value(audio_formats)?,
    ))
}

/// Parse storage roots from a platform path list (`:`-separated on Unix).
///
/// Empty list entries are ignored.
pub fn roots_from_env_value(value: Option<&OsStr>) -> StorageResult<StorageRoots> {
    let value = value.ok_or_else(|| {
        StorageError::InvalidConfig("no storage roots configured".into())
    })?;
    StorageRoots::new(std::env::split_paths(value).filter(|p| !p.as_os_str().is_empty()))
}

/// Parse the legacy naming offset from an optional string value.
///
/// Accepts `Z`/`UTC` or a signed offset such as `+10:00` or `-0330`. If `value` is `None` or
/// empty/whitespace, returns the default offset.
pub fn legacy_offset_from_env_value(value: Option<String>) -> StorageResult<FixedOffset> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(default_legacy_offset()),
        Some("Z") | Some("z") | Some("UTC") => Ok(Utc.fix()),
        Some(v) => v.parse::<FixedOffset>().map_err(|e| {
            StorageError::InvalidConfig(format!("invalid legacy UTC offset '{}': {}", v, e))
        }),
    }
}

/// Parse recognised audio formats from an optional comma-separated value.
///
/// If `value` is `None` or blank, returns the default formats.
pub fn audio_formats_from_env_value(value: Option<String>) -> StorageResult<Vec<AudioFormat>> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(default_audio_formats());
    };

    let mut formats = Vec::new();
    for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let format = AudioFormat::new(token).map_err(|e| {
            StorageError::InvalidConfig(format!("invalid audio format '{}': {}", token, e))
        })?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    Ok(formats)
}
