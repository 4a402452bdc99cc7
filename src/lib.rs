// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Bagforge
//!
//! BagIt packaging library for digital preservation.
//!
//! This library packages a directory of digital content into a
//! self-describing, fixity-verifiable bag per the BagIt convention, and
//! later re-verifies that the content has not been altered. It is
//! organized by subsystem:
//! - **Bag engine** in [`bag`](crate::bag) module (create/open, tag files,
//!   ingestion, verification)
//! - **Fixity generation** in [`fixity`](crate::fixity) module (streaming
//!   multi-algorithm digests, parallel digest pipeline)
//! - **Manifest codec** in [`manifest`](crate::manifest) module
//!   (line-oriented manifest serialization with strict parsing)
//!
//! ## Architecture
//!
//! The library is organized into subsystem modules:
//! - `core/` - Error type, checksum identifiers, fixity data model
//! - `fixity/` - Digest primitives and checksum generation
//! - `manifest/` - Algorithm-specific manifest files (read/write/merge)
//! - `bag/` - Bag lifecycle, payload population, verification
//!
//! ## Example: Creating and populating a bag
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use bagforge::{Bag, LinkMode};
//!
//! let bag = Bag::create("/archive/mybag")?;
//! bag.add_dir_to_payload(LinkMode::Copy, "/staging/source-dir".as_ref())?;
//! bag.write_bag_info_txt()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Verifying an existing bag
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use bagforge::Bag;
//!
//! let bag = Bag::open("/archive/mybag")?;
//! bag.verify_bag()?;
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{
    BagError, ChecksumType, DigestPair, FileFixity, FixityCollection, ManifestDiff, PayloadSize,
    Result, ALL_CHECKSUM_TYPES,
};

// Fixity generation
pub mod fixity;

pub use fixity::{
    digest_file, generate_checksums, generate_dir_checksums, generate_file_checksums_parallel,
    MultiDigest,
};

// Manifest codec
pub mod manifest;

pub use manifest::{
    manifest_file_name, manifest_pathname, read_manifest_files, write_manifest_checksums,
    ManifestType, OpenMode,
};

// Bag engine: lifecycle, payload population, verification
pub mod bag;

pub use bag::{manifest_diff, tag_value, Bag, LinkMode, Tarfile};
