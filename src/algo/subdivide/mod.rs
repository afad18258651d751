//! Mesh subdivision algorithms.
//!
//! Both schemes work on polygon meshes of any arity and turn every
//! (face, corner) pair into one quad, so an n-gon becomes n quads and the
//! result is always a quad mesh.
//!
//! # Linear Subdivision
//!
//! Inserts a point at every face centroid and every edge midpoint; original
//! vertices stay where they are. The surface shape is unchanged.
//!
//! # Catmull-Clark Subdivision
//!
//! Catmull-Clark subdivision (Catmull & Clark, 1978) is an approximating
//! scheme. Each pass:
//!
//! 1. Creates a face point at each face centroid
//! 2. Creates edge points: the midpoint on boundary edges, the average of
//!    both endpoints and both face points on interior edges
//! 3. Moves each unpinned vertex to `((n - 3) S + Q + 2 R) / n`
//! 4. Connects everything into quads
//!
//! Boundary vertices are pinned and keep their exact position, as do
//! vertices whose [`fix`](crate::mesh::Vertex::fix) flag is already set.
//! Pins carry over to the output, so repeated passes keep open borders in
//! place.
//!
//! # Face-point translation
//!
//! The `*_translate_face_points` variants move each face point along its
//! face normal by a per-face distance before the quads are built, which
//! raises (or sinks) the centre of every face.
//!
//! # Output layout
//!
//! The subdivided mesh has a fresh vertex pool: first one vertex per input
//! vertex (same ids), then one face point per input face, then one edge
//! point per input edge. Its adjacency is already built.
//!
//! # Example
//!
//! ```
//! use polykit::prelude::*;
//! use polykit::algo::subdivide::{catmull_clark_subdivide, SubdivideOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: Mesh = build_from_polygons(&vertices, &[[0, 1, 2, 3]]).unwrap();
//!
//! let options = SubdivideOptions::new(2);
//! let smooth = catmull_clark_subdivide(&mesh, &options).unwrap();
//! assert_eq!(smooth.num_faces(), 16);
//! ```
//!
//! # References
//!
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.

mod catmull_clark;
mod linear;

pub use catmull_clark::{
    catmull_clark, catmull_clark_subdivide, catmull_clark_subdivide_with_progress,
    catmull_clark_translate_face_points,
};
pub use linear::{
    linear_subdivide, linear_subdivide_with_progress, subdivide, subdivide_translate_face_points,
};

use nalgebra::Point3;
use rayon::prelude::*;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::geom;
use crate::mesh::{Adjacency, EdgeId, Face, FaceId, Mesh, MeshIndex, Vertex, VertexId, VertexPool};

/// Options for iterated subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision passes.
    pub iterations: usize,

    /// Whether to compute points in parallel (default: true).
    ///
    /// Results are identical to sequential execution.
    pub parallel: bool,
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            parallel: true,
        }
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Points computed by one subdivision pass, indexed like the input mesh.
pub(crate) struct PassPoints {
    /// New vertex per input vertex.
    pub vertex_points: Vec<Vertex>,
    /// Face point per input face.
    pub face_points: Vec<Point3<f64>>,
    /// Edge point per input edge.
    pub edge_points: Vec<Vertex>,
}

/// Centroid of every face.
pub(crate) fn face_centroids<I: MeshIndex>(mesh: &Mesh<I>, parallel: bool) -> Vec<Point3<f64>> {
    let centroid = |face: &Face<I>| geom::centroid(&mesh.vertices().positions(&face.vertices));
    if parallel {
        mesh.faces().par_iter().map(centroid).collect()
    } else {
        mesh.faces().iter().map(centroid).collect()
    }
}

/// Move each face point along its face normal by the matching value.
pub(crate) fn translate_face_points<I: MeshIndex>(
    mesh: &Mesh<I>,
    face_points: &mut [Point3<f64>],
    values: &[f64],
) -> Result<()> {
    MeshError::check_count("face point offsets", mesh.num_faces(), values.len())?;
    for ((f, point), &value) in mesh.face_ids().zip(face_points.iter_mut()).zip(values) {
        *point += mesh.face_normal(f) * value;
    }
    Ok(())
}

/// Build the subdivided mesh: one quad per (face, corner).
///
/// Each quad is `[edge point (prev, v), v', edge point (v, next), face point]`
/// and inherits the colour and group of its source face.
pub(crate) fn collect_new_faces<I: MeshIndex>(
    mesh: &Mesh<I>,
    adjacency: &Adjacency<I>,
    points: PassPoints,
) -> Result<Mesh<I>> {
    let PassPoints {
        vertex_points,
        face_points,
        edge_points,
    } = points;

    let num_vertices = vertex_points.len();
    let num_faces = face_points.len();
    let corners: usize = mesh.faces().iter().map(Face::len).sum();

    let mut pool = VertexPool::with_capacity(num_vertices + num_faces + edge_points.len());
    for v in vertex_points {
        pool.push(v);
    }
    for p in face_points {
        pool.add(p);
    }
    for v in edge_points {
        pool.push(v);
    }

    let face_point = |f: FaceId<I>| VertexId::<I>::new(num_vertices + f.index());
    let edge_point = |e: EdgeId<I>| VertexId::<I>::new(num_vertices + num_faces + e.index());

    let mut faces = Vec::with_capacity(corners);
    for (f, face) in mesh.face_ids().zip(mesh.faces()) {
        let n = face.len();
        let lookup = |a: VertexId<I>, b: VertexId<I>| {
            adjacency
                .edge_between(a, b)
                .ok_or(MeshError::MissingEdge {
                    face: f.index(),
                    v0: a.index(),
                    v1: b.index(),
                })
        };
        for i in 0..n {
            let prev = face.vertices[(i + n - 1) % n];
            let current = face.vertices[i];
            let next = face.vertices[(i + 1) % n];
            let incoming = lookup(prev, current)?;
            let outgoing = lookup(current, next)?;
            faces.push(face.derive(vec![
                edge_point(incoming),
                current,
                edge_point(outgoing),
                face_point(f),
            ]));
        }
    }

    Mesh::from_parts(pool, faces)
}

/// Run `pass` `options.iterations` times, reporting before each pass.
pub(crate) fn iterate<I, F>(
    mesh: &Mesh<I>,
    options: &SubdivideOptions,
    progress: &Progress,
    message: &str,
    pass: F,
) -> Result<Mesh<I>>
where
    I: MeshIndex,
    F: Fn(&Mesh<I>, bool) -> Result<Mesh<I>>,
{
    let mut current = mesh.clone();
    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, message);
        current = pass(&current, options.parallel)?;
    }
    progress.report(options.iterations, options.iterations, message);
    Ok(current)
}
