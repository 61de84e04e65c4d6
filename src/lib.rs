//! # nowshare
//!
//! Configurable "now playing" share text for Linux.
//!
//! This crate provides:
//! - A share-text format engine: placeholder templates with quote escaping
//!   and per-placeholder prefix/suffix modifiers
//! - MPRIS D-Bus watching for detecting what is currently playing
//! - Share-text emission to stdout and overlay files
//! - A persisted current-track snapshot for re-sharing on demand

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod format;
pub mod mpris;
pub mod output;
pub mod service;
pub mod store;
pub mod track;

pub use config::Config;
pub use error::{Error, Result};
pub use format::{FormatPattern, FormatPatternModifier};
pub use track::{TrackCoreElement, TrackInfo};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "nowshare";
