//! # Polykit
//!
//! A polygon-mesh editing kernel.
//!
//! Polykit stores meshes as a pool of vertices plus faces of any arity that
//! share vertices by id, derives edge adjacency from the faces on demand,
//! and builds new meshes from old ones: subdivision, extrusion, offsetting
//! and parametric face splitting.
//!
//! ## Features
//!
//! - **Polygon meshes**: triangles, quads and n-gons side by side
//! - **Explicit adjacency**: an edge index rebuilt after face-list changes,
//!   with at most two faces per edge
//! - **Subdivision**: linear and Catmull-Clark, with face-point translation
//! - **Face transforms**: extrude, taper, roof, pyramid, grid, relative and
//!   mitred-frame splits, planar and whole-mesh offsets
//! - **File formats**: OBJ, PLY, STL export
//!
//! ## Quick Start
//!
//! ```no_run
//! use polykit::prelude::*;
//! use polykit::algo::subdivide::{catmull_clark_subdivide, SubdivideOptions};
//!
//! // Load a mesh
//! let mesh: Mesh = polykit::io::load("model.obj").unwrap();
//!
//! // Smooth it
//! let smooth = catmull_clark_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();
//! println!("Faces: {} -> {}", mesh.num_faces(), smooth.num_faces());
//!
//! // Save the result
//! polykit::io::save(&smooth, "smooth.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use polykit::prelude::*;
//! use nalgebra::Point3;
//!
//! // A square pyramid: one quad and four triangles
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![
//!     vec![0, 3, 2, 1], // base
//!     vec![0, 1, 4],
//!     vec![1, 2, 4],
//!     vec![2, 3, 4],
//!     vec![3, 0, 4],
//! ];
//!
//! let mesh: Mesh = build_from_polygons(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_faces(), 5);
//! assert_eq!(mesh.num_edges().unwrap(), 8);
//! ```
//!
//! ## Editing Faces
//!
//! Face transforms return new faces; collect them into a new mesh:
//!
//! ```
//! use polykit::prelude::*;
//! use polykit::algo::transform::{map_faces, split_offset};
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(1.0, 1.0, 0.0),
//! #     Point3::new(0.0, 1.0, 0.0),
//! # ];
//! # let mesh: Mesh = build_from_polygons(&vertices, &[[0, 1, 2, 3]]).unwrap();
//! let framed = map_faces(&mesh, |pool, _, face| Ok(split_offset(pool, face, 0.1))).unwrap();
//! assert_eq!(framed.num_faces(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod geom;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use polykit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::transform::Transformed;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, to_face_vertex, Adjacency, Arity, Color, Edge, EdgeId, Face, FaceId,
        Mesh, MeshIndex, Vertex, VertexId, VertexPool,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
