//! Core mesh data structures.
//!
//! This module provides the polygon mesh representation and its derived
//! adjacency index.
//!
//! # Overview
//!
//! A [`Mesh`] is a [`VertexPool`] plus a list of [`Face`]s. Each face is an
//! ordered cycle of [`VertexId`]s of any arity (three or more). Faces that
//! hold the same vertex id are connected through it.
//!
//! The [`Adjacency`] index (edges keyed by unordered vertex pairs, incident
//! edges per vertex, up to two faces per edge) is derived from the faces and
//! rebuilt explicitly with [`Mesh::update_adjacencies`] after the face list
//! changes.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex in the pool
//! - [`EdgeId`] - Identifies an edge in the adjacency index
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait).
//!
//! # Construction
//!
//! ```
//! use polykit::mesh::{build_from_polygons, Mesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: Mesh = build_from_polygons(&vertices, &[[0, 1, 2, 3]]).unwrap();
//! assert!(mesh.is_valid());
//! ```

mod adjacency;
mod builder;
mod index;
mod polygon;

pub use adjacency::{Adjacency, Edge};
pub use builder::{build_from_polygons, to_face_vertex};
pub use index::{EdgeId, EdgeKey, FaceId, MeshIndex, VertexId};
pub use polygon::{Arity, Color, Face, Mesh, Vertex, VertexPool};
