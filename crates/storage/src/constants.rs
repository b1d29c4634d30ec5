//! Constants used throughout the storage crate.
//!
//! File-name grammar pieces and configuration defaults live here so the namer, the parser and
//! the binaries agree on them.

/// Separator between the uuid and the encoded date-time in a file name.
pub const NAME_SEPARATOR: char = '_';

/// Separator between the stem and the original format in a file name.
pub const EXTENSION_SEPARATOR: char = '.';

/// `chrono` format for legacy date-time tokens (`YYMMDD-HHMM`).
pub const LEGACY_DATETIME_FORMAT: &str = "%y%m%d-%H%M";

/// Length of a legacy date-time token.
pub const LEGACY_TOKEN_LEN: usize = 11;

/// `chrono` format for UTC date-time tokens, without the trailing marker (`YYYYMMDD-HHMMSS`).
pub const UTC_DATETIME_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Marker closing every UTC date-time token.
pub const UTC_MARKER: char = 'Z';

/// Length of a UTC date-time token, including the trailing marker.
pub const UTC_TOKEN_LEN: usize = 16;

/// Offset legacy names were written at when none is configured (+10:00, seconds east).
pub const DEFAULT_LEGACY_UTC_OFFSET_SECS: i32 = 10 * 3600;

/// Audio formats recognised when none are configured.
pub const DEFAULT_AUDIO_FORMATS: &[&str] = &[
    "wav", "mp3", "ogg", "flac", "wma", "webm", "wv", "asf", "aac", "m4a",
];

/// Environment variable holding the storage roots, as a platform path list.
pub const ORIGINAL_AUDIO_DIRS_ENV: &str = "BAW_ORIGINAL_AUDIO_DIRS";

/// Environment variable holding the legacy naming offset (`+10:00`).
pub const LEGACY_UTC_OFFSET_ENV: &str = "BAW_LEGACY_UTC_OFFSET";

/// Environment variable holding recognised audio formats (comma separated).
pub const AUDIO_FORMATS_ENV: &str = "BAW_AUDIO_FORMATS";
