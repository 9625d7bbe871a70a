// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikegen-observability
//!
//! Logging setup shared by spikegen tools, with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: per-run JSON log files with retention cleanup

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known spikegen crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "spikegen",
    "spikegen-models",
    "spikegen-config",
    "spikegen-observability",
];
