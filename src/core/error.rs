// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for bagforge.
//!
//! Provides error types for bag operations:
//! - Bag lifecycle (open/create)
//! - Manifest parsing and congruence
//! - Fixity verification
//! - Payload accounting and I/O

use std::fmt;

use super::fixity::{ManifestDiff, PayloadSize};

/// Errors that can occur during bag operations.
#[derive(Debug, Clone)]
pub enum BagError {
    /// No bag exists at the given location (required tag file absent)
    BagNotFound {
        /// Location that was probed
        path: String,
    },

    /// A required bag path is missing
    Structure {
        /// The missing path
        path: String,
    },

    /// Malformed manifest line or file
    ManifestParse {
        /// Manifest file containing the offending line
        manifest: String,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// A file id present under one algorithm's manifest is absent from another
    ManifestCongruence {
        /// Manifest type ("manifest" or "tagmanifest")
        manifest_type: String,
        /// File id with incomplete coverage
        file_id: String,
        /// Manifest file the id is missing from
        missing_from: String,
    },

    /// Measured fixity disagrees with recorded fixity
    ManifestVerification {
        /// Manifest type ("manifest" or "tagmanifest")
        manifest_type: String,
        /// Structured recorded-vs-measured report
        diff: ManifestDiff,
    },

    /// Measured payload size disagrees with the recorded Payload-Oxum
    PayloadSizeMismatch {
        /// Size recorded in bag-info.txt
        expected: PayloadSize,
        /// Size measured from the payload directory
        found: PayloadSize,
    },

    /// I/O failure (unreadable source, pre-existing target, tar failure)
    Io {
        /// What was being done
        context: String,
        /// Error message
        message: String,
    },
}

impl BagError {
    /// Create a "no bag found" error.
    pub fn bag_not_found(path: impl Into<String>) -> Self {
        BagError::BagNotFound { path: path.into() }
    }

    /// Create a structure error for a missing path.
    pub fn structure(path: impl Into<String>) -> Self {
        BagError::Structure { path: path.into() }
    }

    /// Create a manifest parse error.
    pub fn manifest_parse(
        manifest: impl Into<String>,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        BagError::ManifestParse {
            manifest: manifest.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Create a manifest congruence error.
    pub fn congruence(
        manifest_type: impl Into<String>,
        file_id: impl Into<String>,
        missing_from: impl Into<String>,
    ) -> Self {
        BagError::ManifestCongruence {
            manifest_type: manifest_type.into(),
            file_id: file_id.into(),
            missing_from: missing_from.into(),
        }
    }

    /// Create a manifest verification error carrying the structured diff.
    pub fn verification(manifest_type: impl Into<String>, diff: ManifestDiff) -> Self {
        BagError::ManifestVerification {
            manifest_type: manifest_type.into(),
            diff,
        }
    }

    /// Create a payload size mismatch error.
    pub fn payload_size_mismatch(expected: PayloadSize, found: PayloadSize) -> Self {
        BagError::PayloadSizeMismatch { expected, found }
    }

    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        BagError::Io {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            BagError::BagNotFound { path } => vec![("path", path.clone())],
            BagError::Structure { path } => vec![("path", path.clone())],
            BagError::ManifestParse {
                manifest,
                line,
                reason,
            } => vec![
                ("manifest", manifest.clone()),
                ("line", line.to_string()),
                ("reason", reason.clone()),
            ],
            BagError::ManifestCongruence {
                manifest_type,
                file_id,
                missing_from,
            } => vec![
                ("manifest_type", manifest_type.clone()),
                ("file_id", file_id.clone()),
                ("missing_from", missing_from.clone()),
            ],
            BagError::ManifestVerification {
                manifest_type,
                diff,
            } => vec![
                ("manifest_type", manifest_type.clone()),
                ("diff", diff.to_json()),
            ],
            BagError::PayloadSizeMismatch { expected, found } => vec![
                ("expected_bytes", expected.bytes.to_string()),
                ("expected_files", expected.files.to_string()),
                ("found_bytes", found.bytes.to_string()),
                ("found_files", found.files.to_string()),
            ],
            BagError::Io { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
        }
    }
}

impl fmt::Display for BagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BagError::BagNotFound { path } => {
                write!(f, "No bag found at {path}")
            }
            BagError::Structure { path } => {
                write!(f, "Bag structure verification failed: missing {path}")
            }
            BagError::ManifestParse {
                manifest,
                line,
                reason,
            } => {
                write!(f, "Malformed line {line} in manifest file {manifest}: {reason}")
            }
            BagError::ManifestCongruence {
                manifest_type,
                file_id,
                missing_from,
            } => write!(
                f,
                "Incongruent {manifest_type} files: file id '{file_id}' is missing from {missing_from}"
            ),
            BagError::ManifestVerification {
                manifest_type,
                diff,
            } => {
                write!(f, "Failed manifest verification for {manifest_type}: {diff}")
            }
            BagError::PayloadSizeMismatch { expected, found } => write!(
                f,
                "Payload size mismatch: bag-info.txt records {} bytes in {} files, but payload contains {} bytes in {} files",
                expected.bytes, expected.files, found.bytes, found.files
            ),
            BagError::Io { context, message } => {
                write!(f, "{context}: {message}")
            }
        }
    }
}

impl std::error::Error for BagError {}

impl From<std::io::Error> for BagError {
    fn from(err: std::io::Error) -> Self {
        BagError::Io {
            context: "IO".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for bagforge operations.
pub type Result<T> = std::result::Result<T, BagError>;
