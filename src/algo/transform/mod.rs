//! Per-face transforms: extrusion, splitting and offsetting.
//!
//! Every operation here reads one face, appends any new vertices to the
//! [`VertexPool`] it is given and returns the replacement faces. Nothing is
//! attached to a mesh; callers collect the faces and build a new [`Mesh`]
//! (see [`map_faces`], which does exactly that).
//!
//! New faces inherit the colour and group of their source face and keep its
//! winding, so a consistently oriented input gives a consistently oriented
//! output.
//!
//! Operations that only handle some arities return [`Transformed`]; its
//! [`Unsupported`](Transformed::Unsupported) variant hands the input face back
//! unchanged.
//!
//! # Example
//!
//! ```
//! use polykit::prelude::*;
//! use polykit::algo::transform::extrude;
//! use nalgebra::Point3;
//!
//! let mut pool: VertexPool = VertexPool::from_positions(&[
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ]);
//! let square = Face::new(pool.ids().collect());
//!
//! let faces = extrude(&mut pool, &square, 1.0, true, true);
//! assert_eq!(faces.len(), 6);
//! ```

mod extrude;
mod offset;
mod split;

pub use extrude::{extrude, extrude_tapered, extrude_to_point, extrude_to_point_center};
pub use offset::{offset_mesh, offset_planar, split_offset, split_offsets};
pub use split::{
    split_frame, split_grid, split_rel, split_rel_free_quad, split_rel_multiple, split_roof,
};

use crate::error::{MeshError, Result};
use crate::geom;
use crate::mesh::{Face, FaceId, Mesh, MeshIndex, VertexId, VertexPool};

/// Result of a transform that only supports some face shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed<I: MeshIndex = u32> {
    /// The replacement faces.
    Faces(Vec<Face<I>>),
    /// The face shape is not handled; the input face is returned as is.
    Unsupported(Face<I>),
}

impl<I: MeshIndex> Transformed<I> {
    /// Hand back `face` unchanged.
    pub(crate) fn unsupported(face: &Face<I>, operation: &str) -> Self {
        log::debug!(
            "{}: {:?} face passed through unchanged",
            operation,
            face.arity()
        );
        Transformed::Unsupported(face.clone())
    }

    /// Whether the input shape was not handled.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Transformed::Unsupported(_))
    }

    /// The output faces; the original face when unsupported.
    pub fn faces(&self) -> &[Face<I>] {
        match self {
            Transformed::Faces(faces) => faces,
            Transformed::Unsupported(face) => std::slice::from_ref(face),
        }
    }

    /// Consume into the output faces; the original face when unsupported.
    pub fn into_faces(self) -> Vec<Face<I>> {
        match self {
            Transformed::Faces(faces) => faces,
            Transformed::Unsupported(face) => vec![face],
        }
    }
}

/// Build a new mesh by replacing every face with the output of `op`.
///
/// The vertex pool is copied, so `op` can add vertices without touching
/// `mesh`. The result has its adjacency built.
///
/// ```
/// use polykit::prelude::*;
/// use polykit::algo::transform::{map_faces, split_grid};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: Mesh = build_from_polygons(&vertices, &[[0, 1, 2, 3]]).unwrap();
/// let grid = map_faces(&mesh, |pool, _, face| {
///     Ok(split_grid(pool, face, 2, 3)?.into_faces())
/// })
/// .unwrap();
/// assert_eq!(grid.num_faces(), 6);
/// ```
pub fn map_faces<I, F>(mesh: &Mesh<I>, mut op: F) -> Result<Mesh<I>>
where
    I: MeshIndex,
    F: FnMut(&mut VertexPool<I>, FaceId<I>, &Face<I>) -> Result<Vec<Face<I>>>,
{
    let mut pool = mesh.vertices().clone();
    let mut faces = Vec::with_capacity(mesh.num_faces());
    for (f, face) in mesh.face_ids().zip(mesh.faces()) {
        faces.extend(op(&mut pool, f, face)?);
    }
    log::debug!("map_faces: {} faces -> {} faces", mesh.num_faces(), faces.len());
    Mesh::from_parts(pool, faces)
}

/// Extrude every face of `mesh` by the same height.
pub fn extrude_all<I: MeshIndex>(
    mesh: &Mesh<I>,
    height: f64,
    cap_bottom: bool,
    cap_top: bool,
) -> Result<Mesh<I>> {
    map_faces(mesh, |pool, _, face| Ok(extrude(pool, face, height, cap_bottom, cap_top)))
}

/// Tapered extrusion of every face with per-face height, fraction and top
/// cap flag.
pub fn extrude_tapered_all<I: MeshIndex>(
    mesh: &Mesh<I>,
    heights: &[f64],
    fractions: &[f64],
    caps: &[bool],
) -> Result<Mesh<I>> {
    let n = mesh.num_faces();
    MeshError::check_count("heights", n, heights.len())?;
    MeshError::check_count("fractions", n, fractions.len())?;
    MeshError::check_count("caps", n, caps.len())?;
    map_faces(mesh, |pool, f, face| {
        let i = f.index();
        Ok(extrude_tapered(pool, face, heights[i], fractions[i], caps[i]))
    })
}

/// Replace each enabled face with a pyramid over its centroid.
///
/// Disabled faces are kept unchanged.
pub fn extrude_to_point_center_all<I: MeshIndex>(
    mesh: &Mesh<I>,
    heights: &[f64],
    enabled: &[bool],
) -> Result<Mesh<I>> {
    let n = mesh.num_faces();
    MeshError::check_count("heights", n, heights.len())?;
    MeshError::check_count("enabled", n, enabled.len())?;
    map_faces(mesh, |pool, f, face| {
        let i = f.index();
        if enabled[i] {
            Ok(extrude_to_point_center(pool, face, heights[i]))
        } else {
            Ok(vec![face.clone()])
        }
    })
}

/// Add a vertex at relative position `t` between two pool vertices.
pub(crate) fn add_between_rel<I: MeshIndex>(
    pool: &mut VertexPool<I>,
    a: VertexId<I>,
    b: VertexId<I>,
    t: f64,
) -> VertexId<I> {
    let p = geom::between_rel(pool.position(a), pool.position(b), t);
    pool.add(p)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::mesh::build_from_polygons;
    use nalgebra::Point3;

    pub(crate) fn unit_square() -> (VertexPool, Face) {
        let pool = VertexPool::from_positions(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        let face = Face::new(pool.ids().collect());
        (pool, face)
    }

    pub(crate) fn unit_triangle() -> (VertexPool, Face) {
        let pool = VertexPool::from_positions(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        let face = Face::new(pool.ids().collect());
        (pool, face)
    }

    pub(crate) fn regular_pentagon() -> (VertexPool, Face) {
        let points: Vec<Point3<f64>> = (0..5)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / 5.0;
                Point3::new(a.cos(), a.sin(), 0.0)
            })
            .collect();
        let pool = VertexPool::from_positions(&points);
        let face = Face::new(pool.ids().collect());
        (pool, face)
    }

    pub(crate) fn area(pool: &VertexPool, face: &Face) -> f64 {
        geom::area(&pool.positions(&face.vertices))
    }

    fn two_quads() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        build_from_polygons(&vertices, &[[0, 1, 2, 3], [1, 4, 5, 2]]).unwrap()
    }

    #[test]
    fn test_transformed_accessors() {
        let (_, face) = unit_square();
        let passthrough = Transformed::unsupported(&face, "test");
        assert!(passthrough.is_unsupported());
        assert_eq!(passthrough.faces(), std::slice::from_ref(&face));
        assert_eq!(passthrough.into_faces(), vec![face.clone()]);

        let split = Transformed::Faces(vec![face.clone(), face]);
        assert!(!split.is_unsupported());
        assert_eq!(split.faces().len(), 2);
    }

    #[test]
    fn test_extrude_all() {
        let mesh = two_quads();
        let result = extrude_all(&mesh, 1.0, false, true).unwrap();

        // 4 sides + top per face.
        assert_eq!(result.num_faces(), 10);
        assert_eq!(result.num_vertices(), 6 + 8);
        assert!(result.has_adjacency());
        assert_eq!(mesh.num_faces(), 2);
    }

    #[test]
    fn test_extrude_tapered_all() {
        let mesh = two_quads();
        let result =
            extrude_tapered_all(&mesh, &[1.0, 2.0], &[0.5, 0.0], &[true, false]).unwrap();
        assert_eq!(result.num_faces(), 5 + 4);

        let err = extrude_tapered_all(&mesh, &[1.0], &[0.5, 0.0], &[true, false]);
        assert!(matches!(
            err,
            Err(MeshError::ValueCountMismatch { name: "heights", expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_extrude_to_point_center_all() {
        let mesh = two_quads();
        let result = extrude_to_point_center_all(&mesh, &[1.0, 1.0], &[true, false]).unwrap();

        assert_eq!(result.num_faces(), 4 + 1);
        assert_eq!(result.faces()[4], mesh.faces()[1]);
        assert!(result.is_valid());
    }

    #[test]
    fn test_map_faces_propagates_errors() {
        let mesh = two_quads();
        let result = map_faces(&mesh, |pool, _, face| Ok(split_grid(pool, face, 0, 1)?.into_faces()));
        assert!(matches!(result, Err(MeshError::InvalidParameter { .. })));
    }
}
