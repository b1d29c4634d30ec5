//! Lazy enumeration of stored recordings across all storage roots.

use crate::config::StorageRoots;
use crate::{NamingGeneration, PathParser, RecordingIdentity, StorageError, StorageResult};
use std::fs;
use std::io::{self, ErrorKind};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::vec;

/// A recording found on disk.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ExistingFile {
    pub identity: RecordingIdentity,
    pub path: PathBuf,
    pub generation: NamingGeneration,
}

/// Running totals of an enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ScanSummary {
    /// Files that parsed and were yielded.
    pub found: usize,
    /// Files that did not parse and were skipped.
    pub skipped: usize,
    /// Directories or directory entries that could not be read.
    pub errors: usize,
}

type SkipCallback<'a> = Box<dyn FnMut(&Path, &StorageError) + 'a>;

/// Iterator over every parseable recording under the existing storage roots.
///
/// Roots are visited in configured order, shard directories and files in name order. Only the
/// directory currently being walked is held in memory, so dropping the iterator early stops
/// all further I/O. Each call to [`OriginalAudioStorage::existing_files`] starts a fresh walk.
///
/// - Missing roots are passed over silently.
/// - A root or shard that cannot be listed yields one `Err` item and the walk moves on. An
///   entry that cannot be read yields its own `Err` item; its siblings are still visited.
/// - A file whose name does not parse is skipped: it is counted, logged at `warn`, and handed
///   to the callback registered with [`ExistingFiles::on_skip`].
///
/// [`OriginalAudioStorage::existing_files`]: crate::OriginalAudioStorage::existing_files
pub struct ExistingFiles<'a> {
    parser: PathParser,
    roots: vec::IntoIter<PathBuf>,
    shards: vec::IntoIter<PathBuf>,
    files: vec::IntoIter<PathBuf>,
    failed: vec::IntoIter<StorageError>,
    summary: ScanSummary,
    on_skip: Option<SkipCallback<'a>>,
}

impl<'a> ExistingFiles<'a> {
    pub(crate) fn new(roots: &StorageRoots, parser: PathParser) -> Self {
        Self {
            parser,
            roots: roots.as_slice().to_vec().into_iter(),
            shards: Vec::new().into_iter(),
            files: Vec::new().into_iter(),
            failed: Vec::new().into_iter(),
            summary: ScanSummary::default(),
            on_skip: None,
        }
    }

    /// Registers a callback invoked for every skipped file.
    pub fn on_skip<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Path, &StorageError) + 'a,
    {
        self.on_skip = Some(Box::new(callback));
        self
    }

    /// Number of files skipped so far.
    pub fn skipped(&self) -> usize {
        self.summary.skipped
    }

    /// Totals so far; final once the iterator has returned `None`.
    pub fn summary(&self) -> ScanSummary {
        self.summary
    }

    fn skip(&mut self, path: &Path, error: &StorageError) {
        self.summary.skipped += 1;
        tracing::warn!("skipping unrecognised file: {}", error);
        if let Some(callback) = self.on_skip.as_mut() {
            callback(path, error);
        }
    }

    fn list_failed(&mut self, error: StorageError) -> Option<StorageResult<ExistingFile>> {
        self.summary.errors += 1;
        Some(Err(error))
    }
}

impl Iterator for ExistingFiles<'_> {
    type Item = StorageResult<ExistingFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(error) = self.failed.next() {
                return self.list_failed(error);
            }

            if let Some(path) = self.files.next() {
                match self.parser.parse_path_with_generation(&path) {
                    Ok((identity, generation)) => {
                        self.summary.found += 1;
                        return Some(Ok(ExistingFile {
                            identity,
                            path,
                            generation,
                        }));
                    }
                    Err(error) => {
                        self.skip(&path, &error);
                        continue;
                    }
                }
            }

            if let Some(shard) = self.shards.next() {
                match list_dir(&shard, EntryKind::File) {
                    Ok(listing) => {
                        self.files = listing.wanted.into_iter();
                        self.failed = listing.failed.into_iter();
                    }
                    Err(error) => return self.list_failed(error),
                }
                continue;
            }

            let root = self.roots.next()?;
            match fs::metadata(&root) {
                Ok(metadata) if metadata.is_dir() => match list_dir(&root, EntryKind::Dir) {
                    Ok(listing) => {
                        self.shards = listing.wanted.into_iter();
                        self.failed = listing.failed.into_iter();
                    }
                    Err(error) => return self.list_failed(error),
                },
                Ok(_) => tracing::trace!("storage root is not a directory: {}", root.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return self.list_failed(StorageError::io(&root, e)),
            }
        }
    }
}

impl FusedIterator for ExistingFiles<'_> {}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
}

struct Listing {
    wanted: Vec<PathBuf>,
    failed: Vec<StorageError>,
}

/// Immediate children of `dir` of the wanted kind, sorted by path.
fn list_dir(dir: &Path, kind: EntryKind) -> StorageResult<Listing> {
    let entries = fs::read_dir(dir)
        .map_err(|e| StorageError::io(dir, e))?
        .map(|entry| entry.map(|entry| entry.path()));
    Ok(sort_entries(dir, entries, kind))
}

fn sort_entries<I>(dir: &Path, entries: I, kind: EntryKind) -> Listing
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut listing = Listing {
        wanted: Vec::new(),
        failed: Vec::new(),
    };
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                listing.failed.push(StorageError::io(dir, e));
                continue;
            }
        };
        let matches = match kind {
            EntryKind::Dir => path.is_dir(),
            EntryKind::File => path.is_file(),
        };
        if matches {
            listing.wanted.push(path);
        } else {
            tracing::trace!("ignoring entry: {}", path.display());
        }
    }
    listing.wanted.sort();
    listing
}
