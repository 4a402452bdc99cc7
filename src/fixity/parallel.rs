// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Parallel digest pipeline for large single-file artifacts.
//!
//! Tar ingestion digests one archive under every configured algorithm.
//! Rather than stream the archive once per algorithm, the file is
//! memory-mapped once and a dedicated worker computes each algorithm's
//! digest over the shared view concurrently. Results are joined over a
//! channel before the caller sees them, so output is deterministic
//! regardless of worker scheduling.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::core::{BagError, ChecksumType, Result};

use super::digest::{digest_bytes, digest_file};

/// Compute every requested digest of one file, one worker per algorithm.
///
/// Falls back to the sequential streaming path when a single algorithm is
/// requested; the worker pool only pays off when several digests share the
/// same bytes.
pub fn generate_file_checksums_parallel(
    path: &Path,
    checksum_types: &[ChecksumType],
) -> Result<BTreeMap<ChecksumType, String>> {
    if checksum_types.is_empty() {
        return Err(BagError::io(
            "generating checksums",
            "no checksum types requested",
        ));
    }
    if checksum_types.len() == 1 {
        return digest_file(path, checksum_types);
    }

    let file = File::open(path).map_err(|e| {
        BagError::io(
            format!("opening {} for digest", path.display()),
            e.to_string(),
        )
    })?;
    let file_len = file
        .metadata()
        .map_err(|e| BagError::io(format!("sizing {}", path.display()), e.to_string()))?
        .len();
    if file_len == 0 {
        // Zero-length files cannot be mapped.
        return digest_file(path, checksum_types);
    }
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| {
        BagError::io(format!("mapping {}", path.display()), e.to_string())
    })?;
    let bytes: &[u8] = &mmap;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(checksum_types.len())
        .thread_name(|index| format!("fixity-worker-{index}"))
        .build()
        .map_err(|e| BagError::io("creating digest worker pool", e.to_string()))?;

    let started = Instant::now();
    let (sender, receiver) = crossbeam_channel::unbounded();
    pool.install(|| {
        checksum_types
            .par_iter()
            .for_each_with(sender, |tx, &checksum_type| {
                let hex_digest = digest_bytes(bytes, checksum_type);
                // Receiver outlives the pool scope; send cannot fail here.
                let _ = tx.send((checksum_type, hex_digest));
            });
    });

    let mut checksums = BTreeMap::new();
    while let Ok((checksum_type, hex_digest)) = receiver.try_recv() {
        checksums.insert(checksum_type, hex_digest);
    }
    if checksums.len() != checksum_types.len() {
        return Err(BagError::io(
            format!("digesting {}", path.display()),
            "digest worker pool returned an incomplete result set",
        ));
    }

    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        algorithms = checksum_types.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "parallel fixity complete"
    );
    Ok(checksums)
}
