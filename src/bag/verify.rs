// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bag verification.
//!
//! Compares recorded fixity (manifest files) against freshly measured
//! fixity and validates bag structure. Verification is fail-fast: the
//! first mismatch or missing path raises, carrying enough structured
//! detail (file id, algorithm, both digests) to diagnose corruption
//! without a second pass.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::core::{
    BagError, ChecksumType, DigestPair, FixityCollection, ManifestDiff, Result,
};
use crate::fixity::{generate_checksums, list_files};
use crate::manifest::{manifest_pathname, ManifestType};

use super::engine::{Bag, BAGIT_TXT, BAG_INFO_TXT};

/// Report the differences between recorded and measured fixity.
///
/// For every file id in either collection and every algorithm on either
/// side, a [`DigestPair`] is recorded when the values differ or one side
/// is absent. Files whose digests fully match produce no entry; an empty
/// diff means the collections agree.
pub fn manifest_diff(
    manifest_fixity: &FixityCollection,
    bag_fixity: &FixityCollection,
) -> ManifestDiff {
    let mut diff = ManifestDiff::new();
    let mut file_ids: BTreeSet<&str> = manifest_fixity.file_ids().into_iter().collect();
    file_ids.extend(bag_fixity.file_ids());

    for file_id in file_ids {
        let recorded = manifest_fixity.get(file_id);
        let measured = bag_fixity.get(file_id);

        let mut algorithms: BTreeSet<ChecksumType> = BTreeSet::new();
        if let Some(record) = recorded {
            algorithms.extend(record.checksum_types());
        }
        if let Some(record) = measured {
            algorithms.extend(record.checksum_types());
        }

        let mut entry = BTreeMap::new();
        for checksum_type in algorithms {
            let manifest_value = recorded
                .and_then(|record| record.checksum(checksum_type))
                .map(str::to_string);
            let bag_value = measured
                .and_then(|record| record.checksum(checksum_type))
                .map(str::to_string);
            if manifest_value != bag_value {
                entry.insert(
                    checksum_type,
                    DigestPair {
                        manifest: manifest_value,
                        bag: bag_value,
                    },
                );
            }
        }
        if !entry.is_empty() {
            diff.insert(file_id, entry);
        }
    }
    diff
}

impl Bag {
    /// Report recorded-vs-measured differences. See [`manifest_diff`].
    pub fn manifest_diff(
        &self,
        manifest_fixity: &FixityCollection,
        bag_fixity: &FixityCollection,
    ) -> ManifestDiff {
        manifest_diff(manifest_fixity, bag_fixity)
    }

    /// Compare recorded fixity against measured fixity.
    ///
    /// Returns `Ok(true)` when the diff is empty; otherwise fails with
    /// [`BagError::ManifestVerification`] carrying the manifest type and
    /// the structured diff.
    pub fn verify_manifests(
        &self,
        manifest_type: ManifestType,
        manifest_fixity: &FixityCollection,
        bag_fixity: &FixityCollection,
    ) -> Result<bool> {
        let diff = manifest_diff(manifest_fixity, bag_fixity);
        if diff.is_empty() {
            Ok(true)
        } else {
            Err(BagError::verification(manifest_type.as_str(), diff))
        }
    }

    /// Measure fixity for every payload file, keyed relative to the bag
    /// root (ids carry the `data/` prefix).
    pub fn generate_payload_checksums(&self) -> Result<FixityCollection> {
        let files = list_files(&self.payload_pathname())?;
        generate_checksums(self.bag_pathname(), &files, self.checksum_types())
    }

    /// Measure fixity for the bag-root tag files.
    ///
    /// Covers `bagit.txt`, `bag-info.txt`, and the payload manifests, but
    /// not the payload directory and not `tagmanifest-*` files (the tag
    /// manifests must not list themselves).
    pub fn generate_tagfile_checksums(&self) -> Result<FixityCollection> {
        let payload = self.payload_pathname();
        let entries = fs::read_dir(self.bag_pathname()).map_err(|e| {
            BagError::io(
                format!("listing {}", self.bag_pathname().display()),
                e.to_string(),
            )
        })?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                BagError::io(
                    format!("listing {}", self.bag_pathname().display()),
                    e.to_string(),
                )
            })?;
            let path = entry.path();
            if path == payload || !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(ManifestType::Tag.as_str()) {
                continue;
            }
            files.push(path);
        }
        files.sort();
        generate_checksums(self.bag_pathname(), &files, self.checksum_types())
    }

    /// Verify the payload manifests against the measured payload tree.
    pub fn verify_payload_manifests(&self) -> Result<bool> {
        let manifest_fixity = self.read_manifest_files(ManifestType::Payload)?;
        let bag_fixity = self.generate_payload_checksums()?;
        debug!(
            bag = %self.bag_pathname().display(),
            files = bag_fixity.len(),
            "verifying payload manifests"
        );
        self.verify_manifests(ManifestType::Payload, &manifest_fixity, &bag_fixity)
    }

    /// Verify the tag manifests against the measured tag files.
    pub fn verify_tagfile_manifests(&self) -> Result<bool> {
        let manifest_fixity = self.read_manifest_files(ManifestType::Tag)?;
        let bag_fixity = self.generate_tagfile_checksums()?;
        debug!(
            bag = %self.bag_pathname().display(),
            files = bag_fixity.len(),
            "verifying tag manifests"
        );
        self.verify_manifests(ManifestType::Tag, &manifest_fixity, &bag_fixity)
    }

    /// Test the existence of a path. Returns `Ok(true)` if it exists,
    /// fails with [`BagError::Structure`] naming the path if not.
    pub fn verify_pathname(path: &Path) -> Result<bool> {
        if path.exists() {
            Ok(true)
        } else {
            Err(BagError::structure(path.display().to_string()))
        }
    }

    /// Test the existence of every file the bag structure requires: the
    /// bag and payload directories, both tag files, and each configured
    /// algorithm's payload manifest and tag manifest.
    pub fn verify_bag_structure(&self) -> Result<bool> {
        Self::verify_pathname(self.bag_pathname())?;
        Self::verify_pathname(&self.payload_pathname())?;
        Self::verify_pathname(&self.bag_pathname().join(BAGIT_TXT))?;
        Self::verify_pathname(&self.bag_pathname().join(BAG_INFO_TXT))?;
        for &checksum_type in self.checksum_types() {
            for manifest_type in [ManifestType::Payload, ManifestType::Tag] {
                Self::verify_pathname(&manifest_pathname(
                    self.bag_pathname(),
                    manifest_type,
                    checksum_type,
                ))?;
            }
        }
        Ok(true)
    }

    /// Validate the whole bag: structure, payload manifests, tag
    /// manifests. Fails on the first failing sub-check, propagating its
    /// specific error.
    pub fn verify_bag(&self) -> Result<bool> {
        self.verify_bag_structure()?;
        self.verify_payload_manifests()?;
        self.verify_tagfile_manifests()?;
        debug!(bag = %self.bag_pathname().display(), "bag verified");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FileFixity;

    fn collection(entries: &[(&str, &[(ChecksumType, &str)])]) -> FixityCollection {
        let mut collection = FixityCollection::new();
        for (file_id, checksums) in entries {
            let mut fixity = FileFixity::new(*file_id);
            for (checksum_type, hex_digest) in *checksums {
                fixity.set_checksum(*checksum_type, *hex_digest);
            }
            collection.insert(fixity);
        }
        collection
    }

    #[test]
    fn test_diff_is_reflexively_empty() {
        let fixity = collection(&[(
            "data/page-1.jpg",
            &[(ChecksumType::Sha1, "aa"), (ChecksumType::Sha256, "bb")],
        )]);
        assert!(manifest_diff(&fixity, &fixity).is_empty());
    }

    #[test]
    fn test_diff_reports_single_mutated_algorithm() {
        let recorded = collection(&[(
            "data/page-1.jpg",
            &[(ChecksumType::Sha1, "aa"), (ChecksumType::Sha256, "bb")],
        )]);
        let measured = collection(&[(
            "data/page-1.jpg",
            &[(ChecksumType::Sha1, "xx"), (ChecksumType::Sha256, "bb")],
        )]);

        let diff = manifest_diff(&recorded, &measured);
        assert_eq!(diff.len(), 1);
        let entry = diff.get("data/page-1.jpg").unwrap();
        assert_eq!(entry.len(), 1);
        let pair = &entry[&ChecksumType::Sha1];
        assert_eq!(pair.manifest.as_deref(), Some("aa"));
        assert_eq!(pair.bag.as_deref(), Some("xx"));
    }

    #[test]
    fn test_diff_reports_file_missing_from_one_side() {
        let recorded = collection(&[("data/only-recorded.txt", &[(ChecksumType::Sha1, "aa")])]);
        let measured = FixityCollection::new();

        let diff = manifest_diff(&recorded, &measured);
        let entry = diff.get("data/only-recorded.txt").unwrap();
        let pair = &entry[&ChecksumType::Sha1];
        assert_eq!(pair.manifest.as_deref(), Some("aa"));
        assert_eq!(pair.bag, None);
    }

    #[test]
    fn test_diff_reports_algorithm_missing_from_one_side() {
        let recorded = collection(&[(
            "data/x",
            &[(ChecksumType::Sha1, "aa"), (ChecksumType::Sha256, "bb")],
        )]);
        let measured = collection(&[("data/x", &[(ChecksumType::Sha1, "aa")])]);

        let diff = manifest_diff(&recorded, &measured);
        let entry = diff.get("data/x").unwrap();
        assert_eq!(entry.len(), 1);
        assert!(entry.contains_key(&ChecksumType::Sha256));
    }

    #[test]
    fn test_verify_pathname() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Bag::verify_pathname(dir.path()).unwrap());
        let err = Bag::verify_pathname(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, BagError::Structure { .. }));
    }
}
