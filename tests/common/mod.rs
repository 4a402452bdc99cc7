// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use bagforge::{Bag, FixityCollection, LinkMode, ManifestType, OpenMode};

// ============================================================================
// Fixture Content
// ============================================================================

/// Flat four-file source directory, mirroring a page-scan deposit.
pub const SOURCE_FILES: &[(&str, &[u8])] = &[
    ("page-1.jpg", b"page one image bytes"),
    ("page-2.jpg", b"page two image bytes"),
    ("page-3.jpg", b"page three image bytes"),
    ("page-4.jpg", b"page four image bytes"),
];

/// Nested object version tree: content plus metadata subdirectories.
pub const VERSIONED_FILES: &[(&str, &[u8])] = &[
    ("content/page-1.jpg", b"versioned page one"),
    ("metadata/contentMetadata.xml", b"<contentMetadata/>"),
    ("metadata/provenanceMetadata.xml", b"<provenanceMetadata/>"),
    ("metadata/versionMetadata.xml", b"<versionMetadata/>"),
];

// ============================================================================
// Fixture Builders
// ============================================================================

/// Total byte count of the flat source fixture.
pub fn source_files_bytes() -> u64 {
    SOURCE_FILES
        .iter()
        .map(|(_, contents)| contents.len() as u64)
        .sum()
}

/// Build the flat four-file source directory under `root`.
pub fn build_source_dir(root: &Path) -> PathBuf {
    let source_dir = root.join("source-dir");
    write_tree(&source_dir, SOURCE_FILES);
    source_dir
}

/// Build a nested object version tree under `root`, returning the version
/// directory (`objects/obj-v0002`).
pub fn build_versioned_object(root: &Path) -> PathBuf {
    let version_dir = root.join("objects").join("obj-v0002");
    write_tree(&version_dir.join("data"), VERSIONED_FILES);
    version_dir
}

fn write_tree(root: &Path, files: &[(&str, &[u8])]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
    }
}

/// Create a fully populated bag: payload ingested by copy, bag-info.txt
/// written, tag manifests recorded.
pub fn populated_bag(root: &Path) -> Bag {
    let source_dir = build_source_dir(root);
    let bag = Bag::create(root.join("existing_bag")).unwrap();
    bag.add_dir_to_payload(LinkMode::Copy, &source_dir).unwrap();
    bag.write_bag_info_txt().unwrap();
    let tagfile_fixity = bag.generate_tagfile_checksums().unwrap();
    bag.write_manifest_checksums(ManifestType::Tag, &tagfile_fixity, OpenMode::Append)
        .unwrap();
    bag
}

// ============================================================================
// Fault Injection
// ============================================================================

/// Flip the first byte of a file in place, preserving its length.
pub fn corrupt_file(path: &Path) {
    let mut contents = fs::read(path).unwrap();
    assert!(!contents.is_empty(), "cannot corrupt empty file");
    contents[0] ^= 0xff;
    fs::write(path, contents).unwrap();
}

// ============================================================================
// Assertions
// ============================================================================

/// Assert that every record in `collection` carries exactly the digests
/// independently computed from `files` rooted at `base`.
pub fn assert_digests_match_sources(
    collection: &FixityCollection,
    base: &Path,
    files: &[(&str, &[u8])],
    prefix: &str,
    checksum_types: &[bagforge::ChecksumType],
) {
    for (relative, _) in files {
        let file_id = format!("{prefix}{relative}");
        let record = collection
            .get(&file_id)
            .unwrap_or_else(|| panic!("missing record for {file_id}"));
        let expected = bagforge::digest_file(&base.join(relative), checksum_types).unwrap();
        for (&checksum_type, hex_digest) in &expected {
            assert_eq!(
                record.checksum(checksum_type),
                Some(hex_digest.as_str()),
                "digest mismatch for {file_id} under {checksum_type}"
            );
        }
    }
}
