// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tests for bag lifecycle and tag files.
//!
//! Run with: cargo test --test bag_lifecycle_tests

mod common;

use std::fs;

use bagforge::{tag_value, Bag, BagError, ChecksumType, LinkMode};

#[test]
fn test_create_bag_initializes_structure() {
    let tmp = tempfile::tempdir().unwrap();
    let bag_dir = tmp.path().join("create_me");
    let bag = Bag::create(&bag_dir).unwrap();

    assert_eq!(bag.payload_pathname(), bag_dir.join("data"));
    assert!(bag.payload_pathname().exists());
    assert!(bag.bag_pathname().join("bagit.txt").exists());
}

#[test]
fn test_open_bag_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let bag_dir = tmp.path().join("open_me");
    Bag::create(&bag_dir).unwrap();

    let bag = Bag::open(&bag_dir).unwrap();
    assert_eq!(bag.payload_pathname(), bag_dir.join("data"));
    assert!(bag.payload_pathname().exists());
}

#[test]
fn test_open_non_bag_path_fails() {
    let err = Bag::open("/dummy/path").unwrap_err();
    assert!(matches!(err, BagError::BagNotFound { .. }));
    assert!(err.to_string().contains("No bag found"));
}

#[test]
fn test_bagit_txt_contents() {
    let tmp = tempfile::tempdir().unwrap();
    let bag = Bag::create(tmp.path().join("mybag")).unwrap();
    let properties = bag.read_bagit_txt().unwrap();

    assert_eq!(properties.len(), 2);
    assert_eq!(tag_value(&properties, "BagIt-Version"), Some("0.97"));
    assert_eq!(
        tag_value(&properties, "Tag-File-Character-Encoding"),
        Some("UTF-8")
    );
}

#[test]
fn test_payload_size_counts_bytes_and_files() {
    let tmp = tempfile::tempdir().unwrap();
    let source_dir = common::build_source_dir(tmp.path());
    let bag = Bag::create(tmp.path().join("mybag")).unwrap();
    bag.add_dir_to_payload(LinkMode::Copy, &source_dir).unwrap();

    let size = bag.payload_size().unwrap();
    assert_eq!(size.bytes, common::source_files_bytes());
    assert_eq!(size.files, common::SOURCE_FILES.len() as u64);
}

#[test]
fn test_bag_info_txt_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let source_dir = common::build_source_dir(tmp.path());
    let bag = Bag::create(tmp.path().join("mybag")).unwrap();
    bag.add_dir_to_payload(LinkMode::Copy, &source_dir).unwrap();
    bag.write_bag_info_txt().unwrap();

    let size = bag.payload_size().unwrap();
    let properties = bag.read_bag_info_txt().unwrap();
    assert_eq!(properties.len(), 3);
    assert_eq!(tag_value(&properties, "External-Identifier"), Some("mybag"));
    assert_eq!(
        tag_value(&properties, "Payload-Oxum"),
        Some(size.to_oxum().as_str())
    );
    assert_eq!(
        tag_value(&properties, "Bag-Size"),
        Some(Bag::bag_size_human(size.bytes).as_str())
    );
    assert_eq!(bag.info_payload_size().unwrap(), size);
}

#[test]
fn test_verify_payload_size_matches() {
    let tmp = tempfile::tempdir().unwrap();
    let bag = common::populated_bag(tmp.path());
    assert!(bag.verify_payload_size().unwrap());
}

#[test]
fn test_verify_payload_size_detects_mismatch() {
    let tmp = tempfile::tempdir().unwrap();
    let bag = common::populated_bag(tmp.path());

    // Rewrite bag-info.txt with a wrong Payload-Oxum.
    let info_path = bag.bag_pathname().join("bag-info.txt");
    let contents = fs::read_to_string(&info_path).unwrap();
    let size = bag.payload_size().unwrap();
    let tampered = contents.replace(&size.to_oxum(), &format!("{}.{}", size.bytes + 1, size.files));
    fs::write(&info_path, tampered).unwrap();

    let err = bag.verify_payload_size().unwrap_err();
    assert!(matches!(err, BagError::PayloadSizeMismatch { .. }));
}

#[test]
fn test_bag_size_human_units() {
    assert_eq!(Bag::bag_size_human(256), "256 B");
    assert_eq!(Bag::bag_size_human(1024), "1.00 KB");
    assert_eq!(Bag::bag_size_human(2222), "2.17 KB");
    assert_eq!(Bag::bag_size_human(1024 * 1024), "1.00 MB");
    assert_eq!(Bag::bag_size_human(1024 * 1024 * 1024), "1.00 GB");
    assert_eq!(Bag::bag_size_human(1024u64.pow(4)), "1.00 TB");
    assert_eq!(Bag::bag_size_human(1024u64.pow(5)), "1024.00 TB");
}

#[test]
fn test_checksum_types_configurable() {
    let tmp = tempfile::tempdir().unwrap();
    let mut bag = Bag::create(tmp.path().join("mybag")).unwrap();
    assert_eq!(
        bag.checksum_types(),
        &[ChecksumType::Sha1, ChecksumType::Sha256]
    );

    bag.set_checksum_types(vec![ChecksumType::Md5, ChecksumType::Sha1]);
    assert_eq!(
        bag.checksum_types(),
        &[ChecksumType::Md5, ChecksumType::Sha1]
    );
}
