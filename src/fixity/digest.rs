// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Streaming digest primitives.
//!
//! [`MultiDigest`] feeds one pass over a byte stream into every requested
//! algorithm at once, so a file is read exactly once no matter how many
//! checksum types a bag is configured with. [`digest_bytes`] is the
//! single-algorithm primitive the parallel pipeline hands to each worker.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::core::{BagError, ChecksumType, Result};

/// Read buffer size for streaming digests.
const READ_BUF_SIZE: usize = 64 * 1024;

/// One algorithm's incremental hasher state.
enum AlgoHasher {
    Md5(md5::Context),
    Sha1(Sha1),
    Sha256(Sha256),
}

impl AlgoHasher {
    fn new(checksum_type: ChecksumType) -> Self {
        match checksum_type {
            ChecksumType::Md5 => AlgoHasher::Md5(md5::Context::new()),
            ChecksumType::Sha1 => AlgoHasher::Sha1(Sha1::new()),
            ChecksumType::Sha256 => AlgoHasher::Sha256(Sha256::new()),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            AlgoHasher::Md5(context) => context.consume(bytes),
            AlgoHasher::Sha1(hasher) => hasher.update(bytes),
            AlgoHasher::Sha256(hasher) => hasher.update(bytes),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            AlgoHasher::Md5(context) => format!("{:x}", context.compute()),
            AlgoHasher::Sha1(hasher) => hex::encode(hasher.finalize()),
            AlgoHasher::Sha256(hasher) => hex::encode(hasher.finalize()),
        }
    }
}

/// Single-pass hasher feeding every requested algorithm.
pub struct MultiDigest {
    hashers: Vec<(ChecksumType, AlgoHasher)>,
}

impl MultiDigest {
    /// Create a hasher for the given algorithm set.
    pub fn new(checksum_types: &[ChecksumType]) -> Self {
        Self {
            hashers: checksum_types
                .iter()
                .map(|&t| (t, AlgoHasher::new(t)))
                .collect(),
        }
    }

    /// Feed a chunk of bytes to every algorithm.
    pub fn update(&mut self, bytes: &[u8]) {
        for (_, hasher) in &mut self.hashers {
            hasher.update(bytes);
        }
    }

    /// Finish and return one lowercase hex digest per algorithm.
    pub fn finalize(self) -> BTreeMap<ChecksumType, String> {
        self.hashers
            .into_iter()
            .map(|(t, hasher)| (t, hasher.finalize_hex()))
            .collect()
    }
}

/// Compute every requested digest of a file in one streaming pass.
///
/// The file is read in fixed-size chunks; it is never loaded into memory
/// whole. Fails with an I/O error naming the file if it cannot be opened
/// or read.
pub fn digest_file(
    path: &Path,
    checksum_types: &[ChecksumType],
) -> Result<BTreeMap<ChecksumType, String>> {
    let mut file = File::open(path)
        .map_err(|e| BagError::io(format!("opening {} for digest", path.display()), e.to_string()))?;
    let mut digest = MultiDigest::new(checksum_types);
    let mut buf = [0u8; READ_BUF_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| BagError::io(format!("reading {}", path.display()), e.to_string()))?;
        if n == 0 {
            break;
        }
        digest.update(&buf[..n]);
    }
    Ok(digest.finalize())
}

/// Compute a single algorithm's digest over an in-memory byte view.
pub fn digest_bytes(bytes: &[u8], checksum_type: ChecksumType) -> String {
    let mut hasher = AlgoHasher::new(checksum_type);
    hasher.update(bytes);
    hasher.finalize_hex()
}
