//! Mesh file I/O.
//!
//! File formats are collaborators at the edge of the crate: they turn bytes
//! into a [`MeshSource`] and a [`TopologyTable`] back into bytes. The core
//! never touches the filesystem.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | UVs and normals per corner |
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII in, binary out |
//!
//! # Usage
//!
//! ```no_run
//! use winged::io::{load, save};
//!
//! let (table, report) = load("model.obj").unwrap();
//! assert!(report.is_clean());
//! save(&table, "output.stl").unwrap();
//! ```

pub mod obj;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_indexed_triangles, BuildReport, MeshSource, TopologyTable};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    fn require<P: AsRef<Path>>(path: P) -> Result<Format> {
        let path = path.as_ref();
        Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

/// Read source geometry with automatic format detection.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<MeshSource> {
    let path = path.as_ref();
    match Format::require(path)? {
        Format::Obj => obj::load_source(path),
        Format::Stl => stl::load_source(path),
    }
}

/// Load a mesh with automatic format detection.
///
/// The format is determined by the file extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<(TopologyTable, BuildReport)> {
    build_from_indexed_triangles(&load_source(path)?)
}

/// Save a mesh with automatic format detection.
///
/// The format is determined by the file extension.
pub fn save<P: AsRef<Path>>(table: &TopologyTable, path: P) -> Result<()> {
    let path = path.as_ref();
    match Format::require(path)? {
        Format::Obj => obj::save(table, path),
        Format::Stl => stl::save(table, path),
    }
}
