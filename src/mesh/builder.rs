//! Mesh construction from face-vertex lists.
//!
//! File formats and most callers describe meshes as a list of positions and
//! a list of faces indexing into it. Shared indices become shared vertex ids,
//! which is what connects neighbouring faces.

use nalgebra::Point3;

use super::index::{MeshIndex, VertexId};
use super::polygon::{Face, Mesh, VertexPool};
use crate::error::{MeshError, Result};

/// Build a polygon mesh from positions and faces of any arity.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of faces, each an ordered list of indices into `vertices`
///
/// # Returns
/// A mesh with its adjacency built, or an error if the input is invalid.
///
/// # Example
/// ```
/// use polykit::mesh::{build_from_polygons, Mesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(0.5, 1.5, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3], vec![3, 2, 4]];
///
/// let mesh: Mesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.num_edges().unwrap(), 6);
/// ```
pub fn build_from_polygons<I: MeshIndex, F: AsRef<[usize]>>(
    vertices: &[Point3<f64>],
    faces: &[F],
) -> Result<Mesh<I>> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        if let Some(&vi) = face.as_ref().iter().find(|&&vi| vi >= vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
    }

    let pool = VertexPool::from_positions(vertices);
    let faces = faces
        .iter()
        .map(|face| Face::new(face.as_ref().iter().map(|&vi| VertexId::new(vi)).collect()))
        .collect();

    Mesh::from_parts(pool, faces)
}

/// Convert a mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple. Every pool vertex is kept, referenced or
/// not; use [`Mesh::compacted`] first to drop unused ones.
pub fn to_face_vertex<I: MeshIndex>(mesh: &Mesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<Vec<usize>> = mesh
        .faces()
        .iter()
        .map(|f| f.vertices.iter().map(|v| v.index()).collect())
        .collect();

    (vertices, faces)
}
