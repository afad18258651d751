//! Error types for polykit.
//!
//! This module defines all error types used throughout the library.
//!
//! Shapes an operation does not handle (for example a pentagon passed to a
//! grid split) are not errors. Those operations hand the input back through
//! [`Transformed::Unsupported`](crate::algo::transform::Transformed).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references a vertex that is not in the vertex pool.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three vertices.
    #[error("face {face} is degenerate ({count} vertices, at least 3 required)")]
    DegenerateFace {
        /// The face index.
        face: usize,
        /// Number of vertices the face has.
        count: usize,
    },

    /// A third face claims an edge that already has two incident faces.
    #[error("edge ({v0}, {v1}) has more than two incident faces (third face {face})")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
        /// The face that tried to bind the edge.
        face: usize,
    },

    /// Adjacency was read after the face list changed without a rebuild.
    #[error("adjacency is stale: call update_adjacencies() after modifying faces")]
    StaleAdjacency,

    /// A subdivision pass could not find an edge between two consecutive face vertices.
    #[error("no edge between vertices {v0} and {v1} of face {face}")]
    MissingEdge {
        /// The face being rebuilt.
        face: usize,
        /// First vertex.
        v0: usize,
        /// Second vertex.
        v1: usize,
    },

    /// A per-face parameter slice does not match the number of faces.
    #[error("expected {expected} {name} (one per face), got {actual}")]
    ValueCountMismatch {
        /// Parameter name.
        name: &'static str,
        /// Number of faces in the mesh.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Check a per-face parameter slice against the face count.
    pub(crate) fn check_count(name: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(MeshError::ValueCountMismatch { name, expected, actual })
        }
    }
}
