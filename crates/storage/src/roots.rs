//! Resolves recordings against the configured storage roots.

use crate::config::StorageRoots;
use crate::{NamingGeneration, PathNamer, RecordingIdentity, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Maps identities onto concrete paths under every configured root.
///
/// Path computation is pure. Only [`Self::existing_dirs`], [`Self::existing_paths`],
/// [`Self::existing_paths_file`] and [`Self::target_path`] touch the filesystem, and their
/// answers can be stale as soon as they return.
#[derive(Clone, Debug)]
pub struct RootResolver {
    roots: StorageRoots,
    namer: PathNamer,
}

impl RootResolver {
    pub fn new(roots: StorageRoots, namer: PathNamer) -> Self {
        Self { roots, namer }
    }

    /// Every configured root, whether or not it exists.
    pub fn possible_dirs(&self) -> &[PathBuf] {
        self.roots.as_slice()
    }

    /// Configured roots that currently exist as directories, in configured order.
    ///
    /// A missing root is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if a root exists but cannot be read, or its metadata cannot
    /// be fetched for a reason other than it not existing.
    pub fn existing_dirs(&self) -> StorageResult<Vec<PathBuf>> {
        let mut existing = Vec::new();
        for root in self.roots.iter() {
            if root_is_readable_dir(root)? {
                existing.push(root.to_path_buf());
            }
        }
        Ok(existing)
    }

    /// `root/<shard>/<name>` for every root and generation: root-major, Legacy before Utc.
    pub fn possible_paths(&self, identity: &RecordingIdentity) -> Vec<PathBuf> {
        self.roots
            .iter()
            .flat_map(|root| {
                let shard_dir = identity.uuid().sharded_dir(root);
                NamingGeneration::ALL
                    .iter()
                    .map(move |generation| shard_dir.join(self.namer.name(identity, *generation)))
            })
            .collect()
    }

    /// `root/<shard>/<file_name>` for every root, for when the stored name is already known.
    pub fn possible_paths_file(
        &self,
        identity: &RecordingIdentity,
        file_name: &str,
    ) -> Vec<PathBuf> {
        self.roots
            .iter()
            .map(|root| identity.uuid().sharded_dir(root).join(file_name))
            .collect()
    }

    /// [`Self::possible_paths`] narrowed to files that currently exist.
    pub fn existing_paths(&self, identity: &RecordingIdentity) -> Vec<PathBuf> {
        self.possible_paths(identity)
            .into_iter()
            .filter(|p| p.is_file())
            .collect()
    }

    /// [`Self::possible_paths_file`] narrowed to files that currently exist.
    pub fn existing_paths_file(
        &self,
        identity: &RecordingIdentity,
        file_name: &str,
    ) -> Vec<PathBuf> {
        self.possible_paths_file(identity, file_name)
            .into_iter()
            .filter(|p| p.is_file())
            .collect()
    }

    /// Where a harvest should place this recording.
    ///
    /// An already stored copy (either generation, any root) wins. Otherwise the UTC name under
    /// the first existing root.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoStorageRoot`] when no configured root exists, or
    /// [`StorageError::Io`] as for [`Self::existing_dirs`].
    pub fn target_path(&self, identity: &RecordingIdentity) -> StorageResult<PathBuf> {
        if let Some(existing) = self.existing_paths(identity).into_iter().next() {
            tracing::debug!(
                "recording {} already stored at {}",
                identity.uuid(),
                existing.display()
            );
            return Ok(existing);
        }

        let root = self
            .existing_dirs()?
            .into_iter()
            .next()
            .ok_or(StorageError::NoStorageRoot)?;
        let target = identity
            .uuid()
            .sharded_dir(&root)
            .join(self.namer.name_utc(identity));
        tracing::debug!("recording {} targets {}", identity.uuid(), target.display());
        Ok(target)
    }
}

/// `Ok(false)` for a missing root or a root that is not a directory.
pub(crate) fn root_is_readable_dir(root: &Path) -> StorageResult<bool> {
    match fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => {
            fs::read_dir(root).map_err(|e| StorageError::io(root, e))?;
            Ok(true)
        }
        Ok(_) => {
            tracing::trace!("storage root is not a directory: {}", root.display());
            Ok(false)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StorageError::io(root, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use tempfile::TempDir;

    const UUID: &str = "5498633d-89a7-4b65-8f4a-96aa0c09c619";
    const LEGACY_NAME: &str = "5498633d-89a7-4b65-8f4a-96aa0c09c619_120302-1505.mp3";
    const UTC_NAME: &str = "5498633d-89a7-4b65-8f4a-96aa0c09c619_20120302-050537Z.mp3";

    fn identity() -> RecordingIdentity {
        RecordingIdentity::from_parts(UUID, "2012-03-02T16:05:37+11:00", "mp3").unwrap()
    }

    fn resolver(roots: &[PathBuf]) -> RootResolver {
        RootResolver::new(
            StorageRoots::new(roots.iter().cloned()).unwrap(),
            PathNamer::new(FixedOffset::east_opt(10 * 3600).unwrap()),
        )
    }

    #[test]
    fn test_no_storage_directories_exist() {
        let temp = TempDir::new().unwrap();
        let roots = vec![temp.path().join("one"), temp.path().join("two")];

        let resolver = resolver(&roots);

        assert!(resolver.existing_dirs().unwrap().is_empty());
        assert_eq!(resolver.possible_dirs(), roots.as_slice());
    }

    #[test]
    fn test_existing_dirs_keeps_configured_order() {
        let temp = TempDir::new().unwrap();
        let roots = vec![
            temp.path().join("c"),
            temp.path().join("missing"),
            temp.path().join("a"),
        ];
        fs::create_dir_all(&roots[0]).unwrap();
        fs::create_dir_all(&roots[2]).unwrap();

        let existing = resolver(&roots).existing_dirs().unwrap();

        assert_eq!(existing, vec![roots[0].clone(), roots[2].clone()]);
    }

    #[test]
    fn test_root_that_is_a_file_is_absent() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("file-root");
        fs::write(&root, b"").unwrap();

        assert!(resolver(&[root]).existing_dirs().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_root_is_an_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path().join("locked");
        fs::create_dir_all(&root).unwrap();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list anything; nothing to check then.
        if fs::read_dir(&root).is_ok() {
            fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = resolver(&[root.clone()]).existing_dirs();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

        match result.unwrap_err() {
            StorageError::Io { path, .. } => assert_eq!(path, root),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_possible_paths_are_root_major_generation_minor() {
        let roots = vec![PathBuf::from("/vol/a"), PathBuf::from("/vol/b")];

        let paths = resolver(&roots).possible_paths(&identity());

        assert_eq!(
            paths,
            vec![
                PathBuf::from("/vol/a/54").join(LEGACY_NAME),
                PathBuf::from("/vol/a/54").join(UTC_NAME),
                PathBuf::from("/vol/b/54").join(LEGACY_NAME),
                PathBuf::from("/vol/b/54").join(UTC_NAME),
            ]
        );
    }

    #[test]
    fn test_possible_paths_file_uses_given_name() {
        let roots = vec![PathBuf::from("/vol/a"), PathBuf::from("/vol/b")];

        let paths = resolver(&roots).possible_paths_file(&identity(), "custom_name.wav");

        assert_eq!(
            paths,
            vec![
                PathBuf::from("/vol/a/54/custom_name.wav"),
                PathBuf::from("/vol/b/54/custom_name.wav"),
            ]
        );
    }

    #[test]
    fn test_existing_paths_only_lists_files_on_disk() {
        let temp = TempDir::new().unwrap();
        let roots = vec![temp.path().join("a"), temp.path().join("b")];
        let stored = roots[1].join("54").join(LEGACY_NAME);
        fs::create_dir_all(stored.parent().unwrap()).unwrap();
        fs::write(&stored, b"audio").unwrap();

        let resolver = resolver(&roots);

        assert_eq!(resolver.existing_paths(&identity()), vec![stored.clone()]);
        assert_eq!(
            resolver.existing_paths_file(&identity(), LEGACY_NAME),
            vec![stored]
        );
        assert!(resolver
            .existing_paths_file(&identity(), UTC_NAME)
            .is_empty());
    }

    #[test]
    fn test_target_path_prefers_existing_copy() {
        let temp = TempDir::new().unwrap();
        let roots = vec![temp.path().join("a"), temp.path().join("b")];
        fs::create_dir_all(&roots[0]).unwrap();
        let stored = roots[1].join("54").join(LEGACY_NAME);
        fs::create_dir_all(stored.parent().unwrap()).unwrap();
        fs::write(&stored, b"audio").unwrap();

        assert_eq!(resolver(&roots).target_path(&identity()).unwrap(), stored);
    }

    #[test]
    fn test_target_path_uses_first_existing_root() {
        let temp = TempDir::new().unwrap();
        let roots = vec![temp.path().join("missing"), temp.path().join("b")];
        fs::create_dir_all(&roots[1]).unwrap();

        assert_eq!(
            resolver(&roots).target_path(&identity()).unwrap(),
            roots[1].join("54").join(UTC_NAME)
        );
    }

    #[test]
    fn test_target_path_without_any_root() {
        let temp = TempDir::new().unwrap();
        let roots = vec![temp.path().join("missing")];

        let err = resolver(&roots).target_path(&identity()).unwrap_err();
        assert!(matches!(err, StorageError::NoStorageRoot));
    }
}
