// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout bagforge.
//!
//! This module provides the foundational types for the library:
//! - [`BagError`] - Comprehensive error handling
//! - [`ChecksumType`] - Digest algorithm identifier
//! - [`FileFixity`] / [`FixityCollection`] - Per-file digest records
//! - [`ManifestDiff`] - Structured verification report

pub mod checksum;
pub mod error;
pub mod fixity;

pub use checksum::{ChecksumType, ParseChecksumTypeError, ALL_CHECKSUM_TYPES};
pub use error::{BagError, Result};
pub use fixity::{DigestPair, FileFixity, FixityCollection, ManifestDiff, PayloadSize};
