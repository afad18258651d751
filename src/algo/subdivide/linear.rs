//! Linear (midpoint) subdivision for polygon meshes.

use crate::algo::Progress;
use crate::error::Result;
use crate::geom;
use crate::mesh::{Mesh, MeshIndex, Vertex};

use super::{collect_new_faces, face_centroids, iterate, translate_face_points, PassPoints, SubdivideOptions};

/// One pass of linear subdivision.
///
/// Adds a point at every face centroid and edge midpoint and splits each
/// n-gon into n quads. Original vertices keep their positions and pin flags.
/// The mesh must have current adjacency.
///
/// # Example
///
/// ```
/// use polykit::prelude::*;
/// use polykit::algo::subdivide::subdivide;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: Mesh = build_from_polygons(&vertices, &[[0, 1, 2]]).unwrap();
/// let result = subdivide(&mesh).unwrap();
/// assert_eq!(result.num_faces(), 3);
/// assert_eq!(result.num_vertices(), 7);
/// ```
pub fn subdivide<I: MeshIndex>(mesh: &Mesh<I>) -> Result<Mesh<I>> {
    linear_pass(mesh, None, true)
}

/// Linear pass whose face points are moved along their face normals by
/// `values[f]`, one value per face.
pub fn subdivide_translate_face_points<I: MeshIndex>(mesh: &Mesh<I>, values: &[f64]) -> Result<Mesh<I>> {
    linear_pass(mesh, Some(values), true)
}

/// Apply `options.iterations` linear passes.
pub fn linear_subdivide<I: MeshIndex>(mesh: &Mesh<I>, options: &SubdivideOptions) -> Result<Mesh<I>> {
    linear_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Linear subdivision with progress reporting.
pub fn linear_subdivide_with_progress<I: MeshIndex>(
    mesh: &Mesh<I>,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<Mesh<I>> {
    iterate(mesh, options, progress, "Linear subdivision", |current, parallel| {
        linear_pass(current, None, parallel)
    })
}

fn linear_pass<I: MeshIndex>(mesh: &Mesh<I>, values: Option<&[f64]>, parallel: bool) -> Result<Mesh<I>> {
    let adjacency = mesh.adjacency()?;
    let pool = mesh.vertices();

    let mut face_points = face_centroids(mesh, parallel);
    if let Some(values) = values {
        translate_face_points(mesh, &mut face_points, values)?;
    }

    let edge_points: Vec<Vertex> = adjacency
        .edges()
        .map(|(_, edge)| {
            let a = pool.get(edge.v1);
            let b = pool.get(edge.v2);
            Vertex::new(geom::center(&a.position, &b.position)).pinned(a.fix && b.fix)
        })
        .collect();

    let vertex_points: Vec<Vertex> = pool.iter().map(|(_, v)| *v).collect();

    log::debug!(
        "Linear subdivision pass: {} faces -> {} faces",
        mesh.num_faces(),
        mesh.faces().iter().map(|f| f.len()).sum::<usize>()
    );

    collect_new_faces(
        mesh,
        adjacency,
        PassPoints {
            vertex_points,
            face_points,
            edge_points,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use crate::mesh::{build_from_polygons, VertexId};
    use nalgebra::Point3;

    fn create_single_quad() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_polygons(&vertices, &[[0, 1, 2, 3]]).unwrap()
    }

    fn create_two_quads() -> Mesh {
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
    fn test_single_quad() {
        let mesh = create_single_quad();
        let result = subdivide(&mesh).unwrap();

        assert_eq!(result.num_faces(), 4);
        assert_eq!(result.num_vertices(), 9);
        assert!(result.is_quad_mesh());
        assert!(result.is_valid());
        assert!((result.surface_area() - 1.0).abs() < 1e-10);

        for v in mesh.vertex_ids() {
            assert_eq!(result.position(v), mesh.position(v));
        }
        assert_eq!(*result.position(VertexId::new(4)), Point3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_shared_edge_point() {
        let mesh = create_two_quads();
        let result = subdivide(&mesh).unwrap();

        // 6 original + 2 face points + 7 edge points
        assert_eq!(result.num_vertices(), 15);
        assert_eq!(result.num_faces(), 8);
        assert_eq!(result.euler_characteristic().unwrap(), 1);
        assert!(result.is_valid());
    }

    #[test]
    fn test_pins_carry_over() {
        let mut mesh = create_single_quad();
        mesh.vertices_mut().get_mut(VertexId::new(0)).fix = true;
        mesh.vertices_mut().get_mut(VertexId::new(1)).fix = true;
        let result = subdivide(&mesh).unwrap();

        assert!(result.vertices().get(VertexId::new(0)).fix);
        let pinned_edge_points = (5..9)
            .filter(|&i| result.vertices().get(VertexId::new(i)).fix)
            .count();
        assert_eq!(pinned_edge_points, 1);
    }

    #[test]
    fn test_translate_face_points() {
        let mesh = create_single_quad();
        let result = subdivide_translate_face_points(&mesh, &[1.0]).unwrap();
        assert_eq!(*result.position(VertexId::new(4)), Point3::new(0.5, 0.5, 1.0));

        let err = subdivide_translate_face_points(&mesh, &[]);
        assert!(matches!(err, Err(MeshError::ValueCountMismatch { expected: 1, actual: 0, .. })));
    }

    #[test]
    fn test_iterations() {
        let mesh = create_single_quad();
        let result = linear_subdivide(&mesh, &SubdivideOptions::new(3)).unwrap();
        assert_eq!(result.num_faces(), 64);
        assert!((result.surface_area() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_stale_adjacency() {
        let mut mesh = create_two_quads();
        mesh.faces_mut().pop();
        assert!(matches!(subdivide(&mesh), Err(MeshError::StaleAdjacency)));
    }
}
