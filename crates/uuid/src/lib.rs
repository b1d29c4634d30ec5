//! Recording identifiers and shard-prefix utilities.
//!
//! Original audio recordings are stored under shard directories derived from the recording's
//! UUID. Every recording is addressed by the *canonical* textual form of its UUID: **36
//! lowercase characters in the hyphenated `8-4-4-4-12` layout**.
//!
//! This crate provides:
//! - A wrapper type ([`RecordingUuid`]) that *guarantees* the canonical form once constructed.
//! - The shard-prefix rule used to pick a recording's directory under a storage root.
//!
//! ## Canonical UUID form
//! - Length: 36
//! - Characters: `0-9`, `a-f`, and `-` at offsets 8, 13, 18 and 23
//! - Example: `5498633d-89a7-4b65-8f4a-96aa0c09c619`
//!
//! Notes:
//! - This is the same value you would get from `Uuid::new_v4().hyphenated().to_string()`.
//! - Canonical form is *required* for identifiers read from upload metadata or file names. Use
//!   [`RecordingUuid::parse`] to validate an input string.
//! - Non-canonical values (uppercase, simple 32-char, braced, URN) are rejected.
//!
//! ## Sharded directory layout
//! For a canonical UUID `u`, recordings live under:
//! `storage_root/<u[0..2]>/`
//!
//! Example:
//! `/data/original_audio/54/5498633d-89a7-4b65-8f4a-96aa0c09c619_20120302-050537Z.mp3`
//!
//! A single level of two hex characters bounds the layout at 256 shard directories per root,
//! independent of recording time.

mod service;

pub use service::{RecordingUuid, Uuid, SHARD_PREFIX_LEN};

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
