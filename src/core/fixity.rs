// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixity data model.
//!
//! This module provides the types flowing between the fixity generator, the
//! manifest codec, and the verification engine:
//! - [`FileFixity`] - one file's digest set
//! - [`FixityCollection`] - digest sets for a group of files, keyed by file id
//! - [`PayloadSize`] - payload byte/file accounting pair
//! - [`ManifestDiff`] - structured report of recorded-vs-measured mismatches

use std::collections::BTreeMap;

use serde::Serialize;

use super::checksum::ChecksumType;

/// Digest record for a single file.
///
/// `file_id` is a path relative to the bag root using forward-slash
/// separators (e.g. `"data/page-1.jpg"`). `checksums` holds one lowercase
/// hex digest per algorithm configured at generation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileFixity {
    /// Bag-root-relative file identifier
    pub file_id: String,
    /// Algorithm identifier to lowercase hex digest
    pub checksums: BTreeMap<ChecksumType, String>,
}

impl FileFixity {
    /// Create an empty fixity record for the given file id.
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            checksums: BTreeMap::new(),
        }
    }

    /// Record a digest for one algorithm.
    pub fn set_checksum(&mut self, checksum_type: ChecksumType, hex_digest: impl Into<String>) {
        self.checksums.insert(checksum_type, hex_digest.into());
    }

    /// Get the digest recorded for one algorithm, if present.
    pub fn checksum(&self, checksum_type: ChecksumType) -> Option<&str> {
        self.checksums.get(&checksum_type).map(String::as_str)
    }

    /// The algorithms this record carries digests for.
    pub fn checksum_types(&self) -> Vec<ChecksumType> {
        self.checksums.keys().copied().collect()
    }
}

/// Digest records for a group of files, keyed by file id.
///
/// Keys are unique; iteration order is the file-id sort order, which keeps
/// manifest writes deterministic. Equality is key-set equality plus
/// per-algorithm digest equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixityCollection(BTreeMap<String, FileFixity>);

impl FixityCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any existing record with the same id.
    pub fn insert(&mut self, fixity: FileFixity) {
        self.0.insert(fixity.file_id.clone(), fixity);
    }

    /// Get the record for a file id.
    pub fn get(&self, file_id: &str) -> Option<&FileFixity> {
        self.0.get(file_id)
    }

    /// Get a mutable record for a file id.
    pub fn get_mut(&mut self, file_id: &str) -> Option<&mut FileFixity> {
        self.0.get_mut(file_id)
    }

    /// Get the record for a file id, creating an empty one if absent.
    pub fn get_or_insert(&mut self, file_id: &str) -> &mut FileFixity {
        self.0
            .entry(file_id.to_string())
            .or_insert_with(|| FileFixity::new(file_id))
    }

    /// Whether a record exists for the file id.
    pub fn contains(&self, file_id: &str) -> bool {
        self.0.contains_key(file_id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection has no records.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate records in file-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileFixity)> {
        self.0.iter().map(|(id, fixity)| (id.as_str(), fixity))
    }

    /// All file ids, in sort order.
    pub fn file_ids(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// A copy of this collection with every file id prefixed by `data/`.
    ///
    /// The manifest codec records ids relative to the bag root; payload
    /// ingestion computes them relative to the payload directory. Callers
    /// apply this transform before writing payload manifests.
    pub fn add_data_prefix(&self) -> FixityCollection {
        let mut prefixed = FixityCollection::new();
        for (file_id, fixity) in self.iter() {
            let mut entry = fixity.clone();
            entry.file_id = format!("data/{file_id}");
            prefixed.insert(entry);
        }
        prefixed
    }
}

impl IntoIterator for FixityCollection {
    type Item = (String, FileFixity);
    type IntoIter = std::collections::btree_map::IntoIter<String, FileFixity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<FileFixity> for FixityCollection {
    fn from_iter<I: IntoIterator<Item = FileFixity>>(iter: I) -> Self {
        let mut collection = FixityCollection::new();
        for fixity in iter {
            collection.insert(fixity);
        }
        collection
    }
}

/// Payload accounting pair: total byte count and regular-file count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PayloadSize {
    /// Total payload bytes
    pub bytes: u64,
    /// Number of regular files in the payload
    pub files: u64,
}

impl PayloadSize {
    /// Render as the `Payload-Oxum` value, `"<bytes>.<files>"`.
    pub fn to_oxum(self) -> String {
        format!("{}.{}", self.bytes, self.files)
    }
}

/// One algorithm's recorded-vs-measured digest pair inside a diff.
///
/// `None` on a side means that side has no digest for the algorithm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DigestPair {
    /// Digest recorded in the manifest, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
    /// Digest measured from the bag contents, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bag: Option<String>,
}

/// Structured report of every file/algorithm whose recorded and measured
/// digests disagree. An empty diff means the collections match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestDiff(BTreeMap<String, BTreeMap<ChecksumType, DigestPair>>);

impl ManifestDiff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the differing algorithms for one file id.
    pub fn insert(&mut self, file_id: impl Into<String>, entry: BTreeMap<ChecksumType, DigestPair>) {
        self.0.insert(file_id.into(), entry);
    }

    /// The diff entry for a file id, if any.
    pub fn get(&self, file_id: &str) -> Option<&BTreeMap<ChecksumType, DigestPair>> {
        self.0.get(file_id)
    }

    /// Number of files with at least one differing digest.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the diff records no differences.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate diff entries in file-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<ChecksumType, DigestPair>)> {
        self.0.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Serialize the diff to JSON for diagnostics.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

impl std::fmt::Display for ManifestDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json())
    }
}
