//! Mesh file I/O.
//!
//! This module provides functions for loading and saving polygon meshes.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Polygons and face groups |
//! | PLY | `.ply` | ✓ | ✓ | Polygons and face colours |
//! | STL | `.stl` | ✗ | ✓ | Fan-triangulated, binary |
//!
//! # Usage
//!
//! ```no_run
//! use polykit::io::{load, save};
//! use polykit::mesh::Mesh;
//!
//! // Load with automatic format detection
//! let mesh: Mesh = load("model.obj").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.ply").unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{Mesh, MeshIndex};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
    /// STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
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
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension. The loaded mesh has its
/// adjacency built.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::load(path),
        Format::Ply => ply::load(path),
        Format::Stl => Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL files hold triangle soup; load OBJ or PLY instead".to_string(),
        }),
    }
}

/// Save a mesh to a file with automatic format detection.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
    }
}
