// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Payload population.
//!
//! Ingests content into the bag's `data/` directory by copy, hard link, or
//! symbolic link, or as a single tar archive of a source subtree. Every
//! ingestion call computes fixity over the newly added files and appends
//! the results to the payload manifests, so manifests always reflect the
//! full payload. Manifest entries are written only after the payload bytes
//! are in place.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{BagError, FileFixity, FixityCollection, Result};
use crate::fixity::{generate_dir_checksums, generate_file_checksums_parallel};
use crate::manifest::{ManifestType, OpenMode};

use super::engine::Bag;

/// How payload bytes are transferred into the bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Full byte duplication
    Copy,
    /// Hard link to the source inode
    HardLink,
    /// Symbolic link to the source path
    SymLink,
}

/// A tar archive ingested as a single payload entry.
#[derive(Debug, Clone)]
pub struct Tarfile {
    /// Payload identifier; also the archive file name
    tarfile_id: String,
    /// Location of the archive inside the payload directory
    tarfile_fullpath: PathBuf,
    /// Directory whose subtree is archived
    source_fullpath: PathBuf,
    /// Directory archive-internal paths are relative to
    source_basepath: PathBuf,
}

impl Tarfile {
    /// Describe an archive to be created.
    pub fn new(
        tarfile_id: impl Into<String>,
        tarfile_fullpath: impl Into<PathBuf>,
        source_fullpath: impl Into<PathBuf>,
        source_basepath: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tarfile_id: tarfile_id.into(),
            tarfile_fullpath: tarfile_fullpath.into(),
            source_fullpath: source_fullpath.into(),
            source_basepath: source_basepath.into(),
        }
    }

    /// The payload identifier.
    pub fn tarfile_id(&self) -> &str {
        &self.tarfile_id
    }

    /// The archive's location on disk.
    pub fn tarfile_fullpath(&self) -> &Path {
        &self.tarfile_fullpath
    }

    /// Create the archive.
    ///
    /// Entry paths inside the archive are relative to the configured
    /// basepath, never absolute. Fails if the source is not under the
    /// basepath or the target already exists.
    pub fn create_tarfile(&self) -> Result<PathBuf> {
        let entry_root = self
            .source_fullpath
            .strip_prefix(&self.source_basepath)
            .map_err(|_| {
                BagError::io(
                    "creating tar archive",
                    format!(
                        "{} is not under basepath {}",
                        self.source_fullpath.display(),
                        self.source_basepath.display()
                    ),
                )
            })?;
        if self.tarfile_fullpath.exists() {
            return Err(BagError::io(
                "creating tar archive",
                format!("target {} already exists", self.tarfile_fullpath.display()),
            ));
        }
        let file = File::create(&self.tarfile_fullpath).map_err(|e| {
            BagError::io(
                format!("creating {}", self.tarfile_fullpath.display()),
                e.to_string(),
            )
        })?;
        let mut builder = tar::Builder::new(BufWriter::new(file));
        builder.mode(tar::HeaderMode::Deterministic);
        builder
            .append_dir_all(entry_root, &self.source_fullpath)
            .map_err(|e| {
                BagError::io(
                    format!("archiving {}", self.source_fullpath.display()),
                    e.to_string(),
                )
            })?;
        let mut writer = builder.into_inner().map_err(|e| {
            BagError::io(
                format!("finalizing {}", self.tarfile_fullpath.display()),
                e.to_string(),
            )
        })?;
        writer.flush().map_err(|e| {
            BagError::io(
                format!("finalizing {}", self.tarfile_fullpath.display()),
                e.to_string(),
            )
        })?;
        debug!(
            archive = %self.tarfile_fullpath.display(),
            source = %self.source_fullpath.display(),
            "created tar archive"
        );
        Ok(self.tarfile_fullpath.clone())
    }
}

impl Bag {
    /// Transfer one file into the bag under the given link mode.
    ///
    /// Never overwrites: fails if the source is missing or the target
    /// already exists. Parent directories of the target are created.
    pub fn copy_file(&self, link_mode: LinkMode, source: &Path, target: &Path) -> Result<PathBuf> {
        if !source.exists() {
            return Err(BagError::io(
                "ingesting payload file",
                format!("source {} does not exist", source.display()),
            ));
        }
        if target.exists() {
            return Err(BagError::io(
                "ingesting payload file",
                format!("target {} already exists", target.display()),
            ));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BagError::io(format!("creating {}", parent.display()), e.to_string())
            })?;
        }
        let transfer = match link_mode {
            LinkMode::Copy => fs::copy(source, target).map(|_| ()),
            LinkMode::HardLink => fs::hard_link(source, target),
            LinkMode::SymLink => make_symlink(source, target),
        };
        transfer.map_err(|e| {
            BagError::io(
                format!(
                    "ingesting {} to {}",
                    source.display(),
                    target.display()
                ),
                e.to_string(),
            )
        })?;
        debug!(source = %source.display(), target = %target.display(), ?link_mode, "ingested file");
        Ok(target.to_path_buf())
    }

    /// Transfer the files named by a fixity collection into the payload,
    /// then append their records to the payload manifests.
    ///
    /// File ids in the collection are relative to `source_basepath`;
    /// relative structure is preserved under `data/`.
    pub fn add_files_to_payload(
        &self,
        link_mode: LinkMode,
        source_basepath: &Path,
        fixity: &FixityCollection,
    ) -> Result<PathBuf> {
        let payload = self.payload_pathname();
        for (file_id, _) in fixity.iter() {
            let source = source_basepath.join(file_id);
            let target = payload.join(file_id);
            self.copy_file(link_mode, &source, &target)?;
        }
        self.write_manifest_checksums(
            ManifestType::Payload,
            &fixity.add_data_prefix(),
            OpenMode::Append,
        )?;
        Ok(payload)
    }

    /// Ingest every regular file under a source directory.
    ///
    /// Computes fixity over the source tree, then delegates to
    /// [`add_files_to_payload`](Bag::add_files_to_payload).
    pub fn add_dir_to_payload(&self, link_mode: LinkMode, source_dir: &Path) -> Result<PathBuf> {
        let fixity = generate_dir_checksums(source_dir, self.checksum_types())?;
        self.add_files_to_payload(link_mode, source_dir, &fixity)
    }

    /// Create a tar archive of a directory inside the payload, digesting
    /// the archive with one worker per configured algorithm, and record a
    /// single `data/<tarfile_id>` manifest entry.
    pub fn add_payload_tarfile(
        &self,
        tarfile_id: impl Into<String>,
        source_fullpath: impl Into<PathBuf>,
        source_basepath: impl Into<PathBuf>,
    ) -> Result<Tarfile> {
        let tarfile_id = tarfile_id.into();
        let payload = self.payload_pathname();
        fs::create_dir_all(&payload).map_err(|e| {
            BagError::io(format!("creating {}", payload.display()), e.to_string())
        })?;
        let tarfile = Tarfile::new(
            &tarfile_id,
            payload.join(&tarfile_id),
            source_fullpath,
            source_basepath,
        );
        tarfile.create_tarfile()?;

        let checksums =
            generate_file_checksums_parallel(tarfile.tarfile_fullpath(), self.checksum_types())?;
        let mut record = FileFixity::new(&tarfile_id);
        for (checksum_type, hex_digest) in checksums {
            record.set_checksum(checksum_type, hex_digest);
        }
        let collection: FixityCollection = std::iter::once(record).collect();
        self.write_manifest_checksums(
            ManifestType::Payload,
            &collection.add_data_prefix(),
            OpenMode::Append,
        )?;
        Ok(tarfile)
    }
}

#[cfg(unix)]
fn make_symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(not(unix))]
fn make_symlink(_source: &Path, _target: &Path) -> std::io::Result<()> {
    Err(std::io::Error::other(
        "symbolic links are not supported on this platform",
    ))
}
