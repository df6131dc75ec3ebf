//! Geocode address lists and reverse-geocode GPS traces.
//!
//! Two independent pipelines share the haversine distance and speed helpers
//! in [`geo`]:
//!
//! - [`forward`]: `[name, address]` rows to coordinates, written as CSV and a
//!   KML point per address.
//! - [`reverse`]: `[timestamp, latitude, longitude, speed]` rows to addresses,
//!   written as CSV and a KML path through every fix.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub mod config;
pub mod error;
pub mod forward;
pub mod geo;
pub mod geocoder;
pub mod kml;
pub mod links;
pub mod reverse;
pub mod table;

pub use error::{Error, Result};

/// `base` with `.extension` appended, keeping any dots already in the name.
pub fn output_path(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
