// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Manifest codec.
//!
//! Serializes and deserializes the line-oriented manifest format: one text
//! file per checksum algorithm named `{manifest_type}-{algorithm}.txt` in
//! the bag root, one `"<hex-digest>  <file-id>"` line per file (two-space
//! separator, LF-terminated).
//!
//! Reading merges the per-algorithm files back into a single
//! [`FixityCollection`]. Parsing is strict: a malformed line fails the
//! whole read, and the file-id sets of the algorithm files must be
//! congruent (an id present under one algorithm and missing under another
//! is a hard error, never a silent union).

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::core::{BagError, ChecksumType, FixityCollection, Result, ALL_CHECKSUM_TYPES};

/// Strict manifest line grammar: hex digest, two spaces, file id.
const MANIFEST_LINE_PATTERN: &str = r"^([0-9a-fA-F]+)  (.+)$";

/// Which set of files a manifest describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestType {
    /// Payload manifests (`manifest-<algo>.txt`), describing `data/`
    Payload,
    /// Tag manifests (`tagmanifest-<algo>.txt`), describing bag-root tag files
    Tag,
}

impl ManifestType {
    /// The file-name prefix for this manifest type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestType::Payload => "manifest",
            ManifestType::Tag => "tagmanifest",
        }
    }
}

impl std::fmt::Display for ManifestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File open mode for manifest writes.
///
/// Append is the default so repeated ingestion calls accumulate entries;
/// truncate rewrites a manifest from scratch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenMode {
    /// Append to an existing manifest (create if absent)
    #[default]
    Append,
    /// Replace the manifest contents
    Truncate,
}

/// File name of one algorithm's manifest, e.g. `manifest-sha256.txt`.
pub fn manifest_file_name(manifest_type: ManifestType, checksum_type: ChecksumType) -> String {
    format!("{}-{}.txt", manifest_type.as_str(), checksum_type.as_str())
}

/// Full path of one algorithm's manifest inside a bag.
pub fn manifest_pathname(
    bag_root: &Path,
    manifest_type: ManifestType,
    checksum_type: ChecksumType,
) -> PathBuf {
    bag_root.join(manifest_file_name(manifest_type, checksum_type))
}

/// Write (or append) one manifest file per algorithm present in the
/// collection's records.
///
/// Entries are written in file-id order. Returns the path written for each
/// algorithm. File ids are recorded verbatim; callers prefix payload ids
/// with `data/` before writing (see
/// [`FixityCollection::add_data_prefix`]).
pub fn write_manifest_checksums(
    bag_root: &Path,
    manifest_type: ManifestType,
    fixity: &FixityCollection,
    open_mode: OpenMode,
) -> Result<Vec<(ChecksumType, PathBuf)>> {
    let mut algorithms: BTreeSet<ChecksumType> = BTreeSet::new();
    for (_, record) in fixity.iter() {
        algorithms.extend(record.checksum_types());
    }

    let mut written = Vec::new();
    for checksum_type in algorithms {
        let path = manifest_pathname(bag_root, manifest_type, checksum_type);
        let file = open_manifest(&path, open_mode)?;
        let mut writer = BufWriter::new(file);
        let mut entries = 0usize;
        for (file_id, record) in fixity.iter() {
            if let Some(hex_digest) = record.checksum(checksum_type) {
                writeln!(writer, "{hex_digest}  {file_id}").map_err(|e| {
                    BagError::io(format!("writing {}", path.display()), e.to_string())
                })?;
                entries += 1;
            }
        }
        writer
            .flush()
            .map_err(|e| BagError::io(format!("writing {}", path.display()), e.to_string()))?;
        debug!(manifest = %path.display(), entries, "wrote manifest entries");
        written.push((checksum_type, path));
    }
    Ok(written)
}

fn open_manifest(path: &Path, open_mode: OpenMode) -> Result<File> {
    let mut options = OpenOptions::new();
    match open_mode {
        OpenMode::Append => options.create(true).append(true),
        OpenMode::Truncate => options.create(true).write(true).truncate(true),
    };
    options
        .open(path)
        .map_err(|e| BagError::io(format!("opening {}", path.display()), e.to_string()))
}

/// Read and merge every manifest file of one type present in the bag root.
///
/// Per-algorithm digests for the same file id merge into a single
/// [`FileFixity`](crate::core::FileFixity) record. Digests are normalized
/// to lowercase. Fails with `ManifestParse` on any malformed line or on a
/// repeated id whose digests conflict, and with `ManifestCongruence` when
/// the algorithm files disagree on the file-id set.
pub fn read_manifest_files(bag_root: &Path, manifest_type: ManifestType) -> Result<FixityCollection> {
    let line_re = Regex::new(MANIFEST_LINE_PATTERN)
        .map_err(|e| BagError::io("compiling manifest line pattern", e.to_string()))?;

    let mut collection = FixityCollection::new();
    let mut present: Vec<(ChecksumType, String)> = Vec::new();

    for &checksum_type in ALL_CHECKSUM_TYPES {
        let path = manifest_pathname(bag_root, manifest_type, checksum_type);
        if !path.is_file() {
            continue;
        }
        let name = manifest_file_name(manifest_type, checksum_type);
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| BagError::io(format!("reading {}", path.display()), e.to_string()))?;

        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let captures = line_re.captures(line).ok_or_else(|| {
                BagError::manifest_parse(
                    &name,
                    line_number,
                    "expected '<hex-digest>  <file-id>'",
                )
            })?;
            let hex_digest = captures[1].to_lowercase();
            let file_id = &captures[2];
            if hex_digest.len() != checksum_type.hex_len() {
                return Err(BagError::manifest_parse(
                    &name,
                    line_number,
                    format!(
                        "digest length {} does not match {}",
                        hex_digest.len(),
                        checksum_type
                    ),
                ));
            }
            let record = collection.get_or_insert(file_id);
            let existing = record.checksum(checksum_type).map(str::to_string);
            match existing {
                Some(existing) if existing != hex_digest => {
                    return Err(BagError::manifest_parse(
                        &name,
                        line_number,
                        format!("conflicting duplicate entry for '{file_id}'"),
                    ));
                }
                Some(_) => {}
                None => record.set_checksum(checksum_type, hex_digest),
            }
        }
        present.push((checksum_type, name));
    }

    // Every id must be covered by every algorithm file that exists.
    for (file_id, record) in collection.iter() {
        for (checksum_type, name) in &present {
            if record.checksum(*checksum_type).is_none() {
                return Err(BagError::congruence(manifest_type.as_str(), file_id, name));
            }
        }
    }

    debug!(
        manifest_type = manifest_type.as_str(),
        files = collection.len(),
        algorithms = present.len(),
        "read manifest files"
    );
    Ok(collection)
}
