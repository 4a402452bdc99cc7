// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Checksum algorithm identifiers.
//!
//! Every digest a bag records is tagged with a [`ChecksumType`]. The enum
//! order (md5, sha1, sha256) is the canonical order used when discovering
//! manifest files and when iterating digest sets.

use serde::{Deserialize, Serialize};

/// Checksum algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumType {
    /// MD5 (128-bit)
    Md5,
    /// SHA-1 (160-bit)
    Sha1,
    /// SHA-256 (256-bit)
    Sha256,
}

/// All supported checksum types, in canonical order.
pub const ALL_CHECKSUM_TYPES: &[ChecksumType] =
    &[ChecksumType::Md5, ChecksumType::Sha1, ChecksumType::Sha256];

impl ChecksumType {
    /// The algorithm name as it appears in manifest file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumType::Md5 => "md5",
            ChecksumType::Sha1 => "sha1",
            ChecksumType::Sha256 => "sha256",
        }
    }

    /// Length of the algorithm's digest in lowercase hex characters.
    pub fn hex_len(&self) -> usize {
        match self {
            ChecksumType::Md5 => 32,
            ChecksumType::Sha1 => 40,
            ChecksumType::Sha256 => 64,
        }
    }

    /// The checksum types a new bag records when none are configured.
    pub fn default_types() -> Vec<ChecksumType> {
        vec![ChecksumType::Sha1, ChecksumType::Sha256]
    }
}

impl std::fmt::Display for ChecksumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a `ChecksumType` from string fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseChecksumTypeError {
    _private: (),
}

impl std::fmt::Display for ParseChecksumTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid checksum type name, expected 'md5', 'sha1', or 'sha256'"
        )
    }
}

impl std::error::Error for ParseChecksumTypeError {}

impl std::str::FromStr for ChecksumType {
    type Err = ParseChecksumTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(ChecksumType::Md5),
            "sha1" => Ok(ChecksumType::Sha1),
            "sha256" => Ok(ChecksumType::Sha256),
            _ => Err(ParseChecksumTypeError { _private: () }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_as_str_round_trip() {
        for &t in ALL_CHECKSUM_TYPES {
            assert_eq!(ChecksumType::from_str(t.as_str()).unwrap(), t);
        }
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(ChecksumType::from_str("SHA256").unwrap(), ChecksumType::Sha256);
        assert_eq!(ChecksumType::from_str("Md5").unwrap(), ChecksumType::Md5);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!(ChecksumType::from_str("sha512").is_err());
        assert!(ChecksumType::from_str("").is_err());
    }

    #[test]
    fn test_hex_len() {
        assert_eq!(ChecksumType::Md5.hex_len(), 32);
        assert_eq!(ChecksumType::Sha1.hex_len(), 40);
        assert_eq!(ChecksumType::Sha256.hex_len(), 64);
    }

    #[test]
    fn test_default_types() {
        assert_eq!(
            ChecksumType::default_types(),
            vec![ChecksumType::Sha1, ChecksumType::Sha256]
        );
    }

    #[test]
    fn test_canonical_order() {
        let mut sorted = vec![ChecksumType::Sha256, ChecksumType::Md5, ChecksumType::Sha1];
        sorted.sort();
        assert_eq!(sorted, ALL_CHECKSUM_TYPES);
    }
}
