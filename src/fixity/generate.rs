// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixity generation over files and directory trees.
//!
//! Produces a [`FixityCollection`] keyed by base-relative posix paths.
//! Generation is atomic: the first unreadable file fails the whole
//! operation and no partial collection is returned.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use tracing::debug;

use crate::core::{BagError, ChecksumType, FileFixity, FixityCollection, Result};

use super::digest::digest_file;

/// Enumerate all regular files under a directory, recursively, sorted.
///
/// Sorting keeps manifest write order deterministic across runs.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort(true) {
        let entry = entry
            .map_err(|e| BagError::io(format!("walking {}", dir.display()), e.to_string()))?;
        // Path-based check so symlinked payload files count as files.
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Derive the base-relative posix file id for a path.
fn relative_file_id(base_dir: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(base_dir).map_err(|_| {
        BagError::io(
            "computing file id",
            format!("{} is not under {}", path.display(), base_dir.display()),
        )
    })?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(segments.join("/"))
}

/// Compute fixity for a set of files rooted under a base directory.
///
/// Every requested digest is computed in a single streaming pass per file.
/// Keys of the returned collection are paths relative to `base_dir` using
/// forward-slash separators. Directory paths in `paths` are skipped; an
/// unreadable file fails the whole call.
pub fn generate_checksums(
    base_dir: &Path,
    paths: &[PathBuf],
    checksum_types: &[ChecksumType],
) -> Result<FixityCollection> {
    if checksum_types.is_empty() {
        return Err(BagError::io(
            "generating checksums",
            "no checksum types requested",
        ));
    }
    let mut collection = FixityCollection::new();
    for path in paths {
        if path.is_dir() {
            continue;
        }
        let file_id = relative_file_id(base_dir, path)?;
        let checksums = digest_file(path, checksum_types)?;
        debug!(file_id = %file_id, algorithms = checksum_types.len(), "computed fixity");
        let mut fixity = FileFixity::new(&file_id);
        for (checksum_type, hex_digest) in checksums {
            fixity.set_checksum(checksum_type, hex_digest);
        }
        collection.insert(fixity);
    }
    Ok(collection)
}

/// Compute fixity for every regular file under a directory.
pub fn generate_dir_checksums(
    dir: &Path,
    checksum_types: &[ChecksumType],
) -> Result<FixityCollection> {
    let files = list_files(dir)?;
    generate_checksums(dir, &files, checksum_types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::fixity::digest::digest_bytes;

    fn write_file(path: &Path, contents: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_list_files_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("b.txt"), b"b");
        write_file(&dir.path().join("a/nested.txt"), b"n");
        write_file(&dir.path().join("a.txt"), b"a");

        let files = list_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| relative_file_id(dir.path(), p).unwrap())
            .collect();
        assert_eq!(names, vec!["a.txt", "a/nested.txt", "b.txt"]);
    }

    #[test]
    fn test_generate_dir_checksums_relative_posix_ids() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("content/page-1.jpg"), b"page one");

        let collection =
            generate_dir_checksums(dir.path(), &[ChecksumType::Sha1, ChecksumType::Sha256])
                .unwrap();
        assert_eq!(collection.file_ids(), vec!["content/page-1.jpg"]);
        let fixity = collection.get("content/page-1.jpg").unwrap();
        assert_eq!(
            fixity.checksum(ChecksumType::Sha1).unwrap(),
            digest_bytes(b"page one", ChecksumType::Sha1)
        );
        assert_eq!(
            fixity.checksum(ChecksumType::Sha256).unwrap(),
            digest_bytes(b"page one", ChecksumType::Sha256)
        );
    }

    #[test]
    fn test_generate_checksums_requires_algorithms() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_checksums(dir.path(), &[], &[]).unwrap_err();
        assert!(matches!(err, BagError::Io { .. }));
    }

    #[test]
    fn test_generate_checksums_fails_on_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.txt");
        let err =
            generate_checksums(dir.path(), &[missing], &[ChecksumType::Sha1]).unwrap_err();
        assert!(matches!(err, BagError::Io { .. }));
    }

    #[test]
    fn test_generate_checksums_rejects_path_outside_base() {
        let base = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let stray = other.path().join("stray.txt");
        fs::write(&stray, b"stray").unwrap();
        let err = generate_checksums(base.path(), &[stray], &[ChecksumType::Sha1]).unwrap_err();
        assert!(matches!(err, BagError::Io { .. }));
    }
}
