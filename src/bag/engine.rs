// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bag lifecycle and tag-file handling.
//!
//! A [`Bag`] is bound to a root directory and a checksum-algorithm set.
//! The payload directory is always derived as `<bag_root>/data` so moving
//! the bag root immediately relocates the payload; no absolute payload
//! path is ever cached.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{BagError, ChecksumType, FixityCollection, PayloadSize, Result};
use crate::fixity::list_files;
use crate::manifest::{self, ManifestType, OpenMode};

/// Required version declaration tag file.
pub const BAGIT_TXT: &str = "bagit.txt";
/// Bag metadata tag file.
pub const BAG_INFO_TXT: &str = "bag-info.txt";
/// Payload directory name under the bag root.
pub const PAYLOAD_DIR: &str = "data";

const BAGIT_VERSION: &str = "0.97";
const TAG_FILE_ENCODING: &str = "UTF-8";

/// One BagIt packaging unit.
#[derive(Debug, Clone)]
pub struct Bag {
    /// Bag home directory
    bag_pathname: PathBuf,
    /// Checksum types used when generating fixity data
    checksum_types: Vec<ChecksumType>,
}

impl Bag {
    /// Initialize a new empty bag at the given location.
    ///
    /// Creates the bag directory and its `data/` payload directory and
    /// writes `bagit.txt`. Fails if the location already holds a bag.
    pub fn create(bag_pathname: impl Into<PathBuf>) -> Result<Bag> {
        let bag_pathname = bag_pathname.into();
        if bag_pathname.join(BAGIT_TXT).exists() {
            return Err(BagError::io(
                "creating bag",
                format!("a bag already exists at {}", bag_pathname.display()),
            ));
        }
        let bag = Bag {
            bag_pathname,
            checksum_types: ChecksumType::default_types(),
        };
        fs::create_dir_all(bag.payload_pathname()).map_err(|e| {
            BagError::io(
                format!("creating {}", bag.payload_pathname().display()),
                e.to_string(),
            )
        })?;
        bag.write_bagit_txt()?;
        debug!(bag = %bag.bag_pathname.display(), "created bag");
        Ok(bag)
    }

    /// Locate an existing bag.
    ///
    /// Fails with [`BagError::BagNotFound`] if `bagit.txt` is absent. The
    /// payload directory is not required to exist at open time; structure
    /// is checked later by
    /// [`verify_bag_structure`](Bag::verify_bag_structure).
    pub fn open(bag_pathname: impl Into<PathBuf>) -> Result<Bag> {
        let bag_pathname = bag_pathname.into();
        if !bag_pathname.join(BAGIT_TXT).is_file() {
            return Err(BagError::bag_not_found(bag_pathname.display().to_string()));
        }
        debug!(bag = %bag_pathname.display(), "opened bag");
        Ok(Bag {
            bag_pathname,
            checksum_types: ChecksumType::default_types(),
        })
    }

    /// The bag home directory.
    pub fn bag_pathname(&self) -> &Path {
        &self.bag_pathname
    }

    /// Move the bag binding to a new home directory.
    ///
    /// Only the binding changes; nothing is moved on disk. The payload
    /// path follows immediately.
    pub fn set_bag_pathname(&mut self, bag_pathname: impl Into<PathBuf>) {
        self.bag_pathname = bag_pathname.into();
    }

    /// The payload directory, always `<bag_root>/data`.
    pub fn payload_pathname(&self) -> PathBuf {
        self.bag_pathname.join(PAYLOAD_DIR)
    }

    /// The checksum types used when generating fixity data.
    pub fn checksum_types(&self) -> &[ChecksumType] {
        &self.checksum_types
    }

    /// Replace the checksum-type set used for subsequent fixity work.
    pub fn set_checksum_types(&mut self, checksum_types: Vec<ChecksumType>) {
        self.checksum_types = checksum_types;
    }

    /// Generate the `bagit.txt` tag file.
    pub fn write_bagit_txt(&self) -> Result<PathBuf> {
        let path = self.bag_pathname.join(BAGIT_TXT);
        let properties = vec![
            ("BagIt-Version".to_string(), BAGIT_VERSION.to_string()),
            (
                "Tag-File-Character-Encoding".to_string(),
                TAG_FILE_ENCODING.to_string(),
            ),
        ];
        write_tag_file(&path, &properties)?;
        Ok(path)
    }

    /// Parse the `bagit.txt` tag file into ordered key/value pairs.
    pub fn read_bagit_txt(&self) -> Result<Vec<(String, String)>> {
        read_tag_file(&self.bag_pathname.join(BAGIT_TXT))
    }

    /// Generate the `bag-info.txt` tag file recording the payload size.
    pub fn write_bag_info_txt(&self) -> Result<PathBuf> {
        let payload_size = self.payload_size()?;
        let external_identifier = self
            .bag_pathname
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let properties = vec![
            ("External-Identifier".to_string(), external_identifier),
            ("Payload-Oxum".to_string(), payload_size.to_oxum()),
            (
                "Bag-Size".to_string(),
                Self::bag_size_human(payload_size.bytes),
            ),
        ];
        let path = self.bag_pathname.join(BAG_INFO_TXT);
        write_tag_file(&path, &properties)?;
        debug!(
            bag = %self.bag_pathname.display(),
            bytes = payload_size.bytes,
            files = payload_size.files,
            "wrote bag-info.txt"
        );
        Ok(path)
    }

    /// Parse the `bag-info.txt` tag file into ordered key/value pairs.
    pub fn read_bag_info_txt(&self) -> Result<Vec<(String, String)>> {
        read_tag_file(&self.bag_pathname.join(BAG_INFO_TXT))
    }

    /// Measure the payload: total byte count and regular-file count.
    pub fn payload_size(&self) -> Result<PayloadSize> {
        let files = list_files(&self.payload_pathname())?;
        let mut size = PayloadSize::default();
        for file in &files {
            let metadata = fs::metadata(file).map_err(|e| {
                BagError::io(format!("sizing {}", file.display()), e.to_string())
            })?;
            size.bytes += metadata.len();
            size.files += 1;
        }
        Ok(size)
    }

    /// The payload size recorded in `bag-info.txt` (`Payload-Oxum`).
    pub fn info_payload_size(&self) -> Result<PayloadSize> {
        let properties = self.read_bag_info_txt()?;
        let oxum = tag_value(&properties, "Payload-Oxum").ok_or_else(|| {
            BagError::io("reading bag-info.txt", "missing Payload-Oxum property")
        })?;
        parse_oxum(oxum)
    }

    /// Compare the measured payload size against the recorded
    /// `Payload-Oxum`. Both byte count and file count must match.
    pub fn verify_payload_size(&self) -> Result<bool> {
        let expected = self.info_payload_size()?;
        let found = self.payload_size()?;
        if expected == found {
            Ok(true)
        } else {
            Err(BagError::payload_size_mismatch(expected, found))
        }
    }

    /// Human-readable rendition of a payload byte count.
    ///
    /// Binary (1024-based) units with two decimals above bytes. The unit
    /// never escalates past TB: larger values render as TB magnitudes of
    /// 1024.00 and beyond. That ceiling is contractual; keep it.
    pub fn bag_size_human(bytes: u64) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{bytes} B")
        } else {
            format!("{size:.2} {}", UNITS[unit])
        }
    }

    /// Update each algorithm's manifest of the given type with the records
    /// in `fixity`.
    pub fn write_manifest_checksums(
        &self,
        manifest_type: ManifestType,
        fixity: &FixityCollection,
        open_mode: OpenMode,
    ) -> Result<Vec<(ChecksumType, PathBuf)>> {
        manifest::write_manifest_checksums(&self.bag_pathname, manifest_type, fixity, open_mode)
    }

    /// Read and merge all manifest files of the given type.
    pub fn read_manifest_files(&self, manifest_type: ManifestType) -> Result<FixityCollection> {
        manifest::read_manifest_files(&self.bag_pathname, manifest_type)
    }
}

/// Look up a tag-file property by key.
pub fn tag_value<'a>(properties: &'a [(String, String)], key: &str) -> Option<&'a str> {
    properties
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn write_tag_file(path: &Path, properties: &[(String, String)]) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| BagError::io(format!("creating {}", path.display()), e.to_string()))?;
    let mut writer = BufWriter::new(file);
    for (key, value) in properties {
        writeln!(writer, "{key}: {value}")
            .map_err(|e| BagError::io(format!("writing {}", path.display()), e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| BagError::io(format!("writing {}", path.display()), e.to_string()))
}

fn read_tag_file(path: &Path) -> Result<Vec<(String, String)>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| BagError::io(format!("reading {}", path.display()), e.to_string()))?;
    let mut properties = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let (key, value) = line.split_once(':').ok_or_else(|| {
            BagError::io(
                format!("parsing {}", path.display()),
                format!("line {} has no ':' separator", index + 1),
            )
        })?;
        properties.push((key.trim().to_string(), value.trim().to_string()));
    }
    Ok(properties)
}

fn parse_oxum(oxum: &str) -> Result<PayloadSize> {
    let (bytes, files) = oxum.split_once('.').ok_or_else(|| {
        BagError::io(
            "parsing Payload-Oxum",
            format!("expected '<bytes>.<files>', got '{oxum}'"),
        )
    })?;
    let bytes = bytes.parse::<u64>().map_err(|_| {
        BagError::io(
            "parsing Payload-Oxum",
            format!("invalid byte count '{bytes}'"),
        )
    })?;
    let files = files.parse::<u64>().map_err(|_| {
        BagError::io(
            "parsing Payload-Oxum",
            format!("invalid file count '{files}'"),
        )
    })?;
    Ok(PayloadSize { bytes, files })
}
