//! Original audio storage service
//!
//! [`OriginalAudioStorage`] is the single entry point harvest and audit code uses. It bundles
//! the configuration with the namer, parser and root resolver built from it, so every caller
//! agrees on the legacy offset and the root order.
//!
//! # Concurrency
//!
//! All state is immutable after construction. Naming and parsing are pure; two processes
//! computing a path for the same identity always agree, which is what prevents duplicate
//! placement. Filesystem calls block and define no timeouts: async callers should move them
//! onto a blocking pool, and enumeration can be cut short by dropping the iterator.

use crate::config::StorageConfig;
use crate::{
    ExistingFiles, NamingGeneration, PathNamer, PathParser, RecordingIdentity, RootResolver,
    StorageResult,
};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct OriginalAudioStorage {
    config: StorageConfig,
    namer: PathNamer,
    parser: PathParser,
    resolver: RootResolver,
}

impl OriginalAudioStorage {
    pub fn new(config: StorageConfig) -> Self {
        let namer = PathNamer::new(config.legacy_offset());
        let parser = PathParser::new(config.legacy_offset());
        let resolver = RootResolver::new(config.roots().clone(), namer);
        Self {
            config,
            namer,
            parser,
            resolver,
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn namer(&self) -> &PathNamer {
        &self.namer
    }

    pub fn parser(&self) -> &PathParser {
        &self.parser
    }

    pub fn resolver(&self) -> &RootResolver {
        &self.resolver
    }

    pub fn name_legacy(&self, identity: &RecordingIdentity) -> String {
        self.namer.name_legacy(identity)
    }

    pub fn name_utc(&self, identity: &RecordingIdentity) -> String {
        self.namer.name_utc(identity)
    }

    pub fn name(&self, identity: &RecordingIdentity, generation: NamingGeneration) -> String {
        self.namer.name(identity, generation)
    }

    pub fn partial_path<'a>(&self, identity: &'a RecordingIdentity) -> &'a str {
        self.namer.partial_path(identity)
    }

    pub fn possible_dirs(&self) -> &[PathBuf] {
        self.resolver.possible_dirs()
    }

    pub fn existing_dirs(&self) -> StorageResult<Vec<PathBuf>> {
        self.resolver.existing_dirs()
    }

    pub fn possible_paths(&self, identity: &RecordingIdentity) -> Vec<PathBuf> {
        self.resolver.possible_paths(identity)
    }

    pub fn possible_paths_file(
        &self,
        identity: &RecordingIdentity,
        file_name: &str,
    ) -> Vec<PathBuf> {
        self.resolver.possible_paths_file(identity, file_name)
    }

    pub fn existing_paths(&self, identity: &RecordingIdentity) -> Vec<PathBuf> {
        self.resolver.existing_paths(identity)
    }

    pub fn existing_paths_file(
        &self,
        identity: &RecordingIdentity,
        file_name: &str,
    ) -> Vec<PathBuf> {
        self.resolver.existing_paths_file(identity, file_name)
    }

    pub fn target_path(&self, identity: &RecordingIdentity) -> StorageResult<PathBuf> {
        self.resolver.target_path(identity)
    }

    pub fn parse_path(&self, path: &Path) -> StorageResult<RecordingIdentity> {
        self.parser.parse_path(path)
    }

    /// Starts a fresh, lazy walk over every existing root.
    pub fn existing_files<'a>(&self) -> ExistingFiles<'a> {
        ExistingFiles::new(self.config.roots(), self.parser)
    }
}
