// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bag engine.
//!
//! This module owns the bag lifecycle and everything that operates on a
//! bound bag:
//! - [`engine`] - create/open, tag files, payload-size accounting
//! - [`payload`] - copy/link/tar ingestion into `data/`
//! - [`verify`] - fixity and structure verification

pub mod engine;
pub mod payload;
pub mod verify;

pub use engine::{tag_value, Bag, BAGIT_TXT, BAG_INFO_TXT, PAYLOAD_DIR};
pub use payload::{LinkMode, Tarfile};
pub use verify::manifest_diff;
