// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixity generation.
//!
//! This module computes cryptographic digests over payload and tag files:
//! - [`digest`] - streaming single-pass multi-algorithm hashing
//! - [`generate`] - directory/file-set checksum generation
//! - [`parallel`] - per-algorithm worker pipeline for tar archives

pub mod digest;
pub mod generate;
pub mod parallel;

pub use digest::{digest_bytes, digest_file, MultiDigest};
pub use generate::{generate_checksums, generate_dir_checksums, list_files};
pub use parallel::generate_file_checksums_parallel;
