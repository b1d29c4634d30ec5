//! Original audio storage addressing
//!
//! This crate decides where harvested audio recordings live on disk and how to read that
//! decision back from an existing path. It never moves, deletes or writes files; it only
//! computes and inspects locations.
//!
//! ## Layout
//!
//! Every storage root holds the same single-level sharded layout. A recording is written to
//! exactly one root, but its relative path is identical under all of them:
//!
//! ```text
//! <root>/
//! └── 54/                                                        # uuid[0..2]
//!     ├── 5498633d-89a7-4b65-8f4a-96aa0c09c619_120302-1505.mp3       # legacy
//!     └── 5498633d-89a7-4b65-8f4a-96aa0c09c619_20120302-050537Z.mp3  # current (UTC)
//! ```
//!
//! ## Naming generations
//!
//! Two encodings of the recording time coexist (see [`NamingGeneration`]). New files are
//! named with the UTC generation; legacy names are still resolved, parsed and enumerated.
//! Legacy names carry no offset, so they are encoded and decoded at a configured fixed offset.
//!
//! ## Example Usage
//!
//! ```no_run
//! use baw_storage::{OriginalAudioStorage, RecordingIdentity, StorageConfig, StorageRoots};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let roots = StorageRoots::new(["/data/original_audio"])?;
//! let storage = OriginalAudioStorage::new(StorageConfig::with_defaults(roots));
//!
//! let identity = RecordingIdentity::from_parts(
//!     "5498633d-89a7-4b65-8f4a-96aa0c09c619",
//!     "2012-03-02T16:05:37+11:00",
//!     "mp3",
//! )?;
//! assert_eq!(
//!     storage.name_utc(&identity),
//!     "5498633d-89a7-4b65-8f4a-96aa0c09c619_20120302-050537Z.mp3"
//! );
//!
//! for entry in storage.existing_files() {
//!     let file = entry?;
//!     println!("{} -> {}", file.path.display(), file.identity.uuid());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
mod constants;
mod enumerate;
mod error;
mod generation;
mod identity;
mod naming;
mod parser;
mod roots;
mod storage;

pub use config::{StorageConfig, StorageRoots};
pub use constants::{
    AUDIO_FORMATS_ENV, DEFAULT_AUDIO_FORMATS, LEGACY_UTC_OFFSET_ENV, ORIGINAL_AUDIO_DIRS_ENV,
};
pub use enumerate::{ExistingFile, ExistingFiles, ScanSummary};
pub use error::{StorageError, StorageResult};
pub use generation::NamingGeneration;
pub use identity::RecordingIdentity;
pub use naming::PathNamer;
pub use parser::PathParser;
pub use roots::RootResolver;
pub use storage::OriginalAudioStorage;

pub use baw_types::AudioFormat;
pub use baw_uuid::RecordingUuid;
