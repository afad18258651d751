//! Catmull-Clark subdivision for polygon meshes.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::algo::Progress;
use crate::error::Result;
use crate::geom;
use crate::mesh::{Mesh, MeshIndex, Vertex, VertexId};

use super::{collect_new_faces, face_centroids, iterate, translate_face_points, PassPoints, SubdivideOptions};

/// One pass of Catmull-Clark subdivision.
///
/// The mesh must have current adjacency (see [`Mesh::update_adjacencies`]).
/// Every n-gon becomes n quads; boundary and pinned vertices keep their
/// positions and stay pinned in the result.
///
/// # Vertex Rules
///
/// - **Face point**: centroid of face vertices
/// - **Edge point**: midpoint on boundary edges, otherwise the average of both
///   endpoints and both adjacent face points
/// - **Vertex point**: ((n-3)S + Q + 2R) / n where:
///   - Q = average of adjacent face points
///   - R = average of adjacent edge midpoints
///   - S = original position
///   - n = valence
pub fn catmull_clark<I: MeshIndex>(mesh: &Mesh<I>) -> Result<Mesh<I>> {
    catmull_clark_pass(mesh, None, true)
}

/// Catmull-Clark pass whose face points are first moved along their face
/// normals by `values[f]`.
///
/// Fails with [`MeshError::ValueCountMismatch`](crate::error::MeshError::ValueCountMismatch)
/// unless there is exactly one value per face.
pub fn catmull_clark_translate_face_points<I: MeshIndex>(
    mesh: &Mesh<I>,
    values: &[f64],
) -> Result<Mesh<I>> {
    catmull_clark_pass(mesh, Some(values), true)
}

/// Apply `options.iterations` Catmull-Clark passes.
///
/// Zero iterations return an unchanged copy.
pub fn catmull_clark_subdivide<I: MeshIndex>(
    mesh: &Mesh<I>,
    options: &SubdivideOptions,
) -> Result<Mesh<I>> {
    catmull_clark_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Catmull-Clark subdivision with progress reporting.
pub fn catmull_clark_subdivide_with_progress<I: MeshIndex>(
    mesh: &Mesh<I>,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<Mesh<I>> {
    iterate(mesh, options, progress, "Catmull-Clark subdivision", |current, parallel| {
        catmull_clark_pass(current, None, parallel)
    })
}

fn catmull_clark_pass<I: MeshIndex>(
    mesh: &Mesh<I>,
    values: Option<&[f64]>,
    parallel: bool,
) -> Result<Mesh<I>> {
    let adjacency = mesh.adjacency()?;
    let pool = mesh.vertices();

    let mut face_points = face_centroids(mesh, parallel);

    // Boundary vertices join the user pins.
    let mut pinned: Vec<bool> = pool.iter().map(|(_, v)| v.fix).collect();
    for (_, edge) in adjacency.boundary_edges() {
        pinned[edge.v1.index()] = true;
        pinned[edge.v2.index()] = true;
    }

    let edge_points: Vec<Vertex> = adjacency
        .edges()
        .map(|(_, edge)| {
            let p1 = pool.position(edge.v1);
            let p2 = pool.position(edge.v2);
            let position = if edge.is_boundary() {
                geom::center(p1, p2)
            } else {
                let f1 = &face_points[edge.face1.index()];
                let f2 = &face_points[edge.face2.index()];
                Point3::from((p1.coords + p2.coords + f1.coords + f2.coords) / 4.0)
            };
            Vertex {
                position,
                fix: pinned[edge.v1.index()] && pinned[edge.v2.index()],
            }
        })
        .collect();

    let vertex_point = |index: usize| -> Vertex {
        let v = VertexId::<I>::new(index);
        let original = *pool.position(v);
        let fix = pinned[index];
        let edges = adjacency.vertex_edges(v);
        if fix || edges.is_empty() {
            return Vertex { position: original, fix };
        }

        let n = edges.len() as f64;
        let mut face_sum = Vector3::zeros();
        let mut mid_sum = Vector3::zeros();
        for &e in edges {
            let edge = adjacency.edge(e);
            let f = edge.face_for(v);
            if f.is_valid() {
                face_sum += face_points[f.index()].coords;
            }
            mid_sum += geom::center(pool.position(edge.v1), pool.position(edge.v2)).coords;
        }
        let q = face_sum / n;
        let r = mid_sum / n;
        let position = Point3::from((original.coords * (n - 3.0) + q + r * 2.0) / n);
        Vertex { position, fix }
    };

    let vertex_points: Vec<Vertex> = if parallel {
        (0..pool.len()).into_par_iter().map(vertex_point).collect()
    } else {
        (0..pool.len()).map(vertex_point).collect()
    };

    if let Some(values) = values {
        translate_face_points(mesh, &mut face_points, values)?;
    }

    log::debug!(
        "Catmull-Clark pass: {} vertices, {} faces, {} edges",
        vertex_points.len(),
        face_points.len(),
        edge_points.len()
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
    use crate::mesh::{build_from_polygons, Face};

    fn create_single_quad() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_polygons(&vertices, &[[0, 1, 2, 3]]).unwrap()
    }

    fn cube_vertices() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ]
    }

    fn create_quad_cube() -> Mesh {
        let faces = vec![
            [0, 3, 2, 1], // bottom
            [4, 5, 6, 7], // top
            [0, 1, 5, 4], // front
            [2, 3, 7, 6], // back
            [0, 4, 7, 3], // left
            [1, 2, 6, 5], // right
        ];
        build_from_polygons(&cube_vertices(), &faces).unwrap()
    }

    fn create_open_box() -> Mesh {
        let faces = vec![[0, 3, 2, 1], [0, 1, 5, 4], [2, 3, 7, 6], [0, 4, 7, 3], [1, 2, 6, 5]];
        build_from_polygons(&cube_vertices(), &faces).unwrap()
    }

    fn assert_close(a: &Point3<f64>, b: &Point3<f64>) {
        assert!((a - b).norm() < 1e-10, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_single_quad_keeps_boundary() {
        let mesh = create_single_quad();
        let result = catmull_clark(&mesh).unwrap();

        assert_eq!(result.num_faces(), 4);
        assert_eq!(result.num_vertices(), 9);
        assert!(result.is_quad_mesh());
        assert!(result.is_valid());

        // Every vertex is on the border: corners stay, edge points are midpoints.
        for v in mesh.vertex_ids() {
            assert_close(result.position(v), mesh.position(v));
            assert!(result.vertices().get(v).fix);
        }
        assert_close(result.position(VertexId::new(4)), &Point3::new(0.5, 0.5, 0.0));
        for i in 5..9 {
            let p = result.position(VertexId::new(i));
            let on_border = [p.x, p.y].iter().any(|c| c.abs() < 1e-10 || (c - 1.0).abs() < 1e-10);
            assert!(on_border);
            assert!(result.vertices().get(VertexId::new(i)).fix);
        }
        assert!(!result.vertices().get(VertexId::new(4)).fix);
    }

    #[test]
    fn test_cube() {
        let mesh = create_quad_cube();
        let result = catmull_clark(&mesh).unwrap();

        assert_eq!(result.num_faces(), 24);
        assert_eq!(result.num_vertices(), 8 + 6 + 12);
        assert_eq!(result.num_edges().unwrap(), 48);
        assert_eq!(result.euler_characteristic().unwrap(), 2);

        // Valence-3 corner: (Q + 2R) / 3 with Q = R*2 = (1/3, 1/3, 1/3).
        let t = 2.0 / 9.0;
        assert_close(result.position(VertexId::new(0)), &Point3::new(t, t, t));
        assert!(!result.vertices().get(VertexId::new(0)).fix);

        // Face points of the unit cube stay on its faces.
        assert_close(result.position(VertexId::new(8 + 1)), &Point3::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn test_cube_edge_point() {
        let mesh = create_quad_cube();
        let adjacency = mesh.adjacency().unwrap();
        let e = adjacency.edge_between(VertexId::new(0), VertexId::new(1)).unwrap();
        let result = catmull_clark(&mesh).unwrap();

        let ep = result.position(VertexId::new(8 + 6 + e.index()));
        assert_close(ep, &Point3::new(0.5, 0.125, 0.125));
    }

    #[test]
    fn test_open_box_rim_is_pinned() {
        let mesh = create_open_box();
        let once = catmull_clark(&mesh).unwrap();
        let twice = catmull_clark(&once).unwrap();

        for i in 4..8 {
            let v = VertexId::new(i);
            assert_close(twice.position(v), mesh.position(v));
            assert!(twice.vertices().get(v).fix);
        }
        // Bottom corners are interior and move.
        assert!((twice.position(VertexId::new(0)) - mesh.position(VertexId::new(0))).norm() > 1e-3);
    }

    #[test]
    fn test_user_pin_is_respected() {
        let mut mesh = create_quad_cube();
        mesh.vertices_mut().get_mut(VertexId::new(6)).fix = true;
        let result = catmull_clark(&mesh).unwrap();

        assert_close(result.position(VertexId::new(6)), &Point3::new(1.0, 1.0, 1.0));
        assert!(result.vertices().get(VertexId::new(6)).fix);
        assert!(!result.vertices().get(VertexId::new(0)).fix);
    }

    #[test]
    fn test_mixed_arity_face_count() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 1.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3, 4], vec![1, 0, 5]];
        let mesh: Mesh = build_from_polygons(&vertices, &faces).unwrap();
        let result = catmull_clark(&mesh).unwrap();

        assert_eq!(result.num_faces(), 8);
        assert!(result.is_quad_mesh());
        assert!(result.is_valid());
    }

    #[test]
    fn test_translate_face_points() {
        let mesh = create_quad_cube();
        let values = vec![0.0, 0.5, 0.0, 0.0, 0.0, 0.0];
        let result = catmull_clark_translate_face_points(&mesh, &values).unwrap();

        // Top face point is raised along +z.
        assert_close(result.position(VertexId::new(8 + 1)), &Point3::new(0.5, 0.5, 1.5));
        assert_close(result.position(VertexId::new(8)), &Point3::new(0.5, 0.5, 0.0));
        // Vertex rule uses the untranslated face points.
        let plain = catmull_clark(&mesh).unwrap();
        assert_close(result.position(VertexId::new(0)), plain.position(VertexId::new(0)));
    }

    #[test]
    fn test_translate_count_mismatch() {
        let mesh = create_quad_cube();
        let result = catmull_clark_translate_face_points(&mesh, &[1.0, 2.0]);
        assert!(matches!(
            result,
            Err(MeshError::ValueCountMismatch { expected: 6, actual: 2, .. })
        ));
    }

    #[test]
    fn test_stale_adjacency() {
        let mut mesh = create_single_quad();
        mesh.add_face(Face::new(vec![VertexId::new(0), VertexId::new(2), VertexId::new(3)]));
        assert!(matches!(catmull_clark(&mesh), Err(MeshError::StaleAdjacency)));
    }

    #[test]
    fn test_iterations() {
        let mesh = create_quad_cube();

        let result = catmull_clark_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();
        assert_eq!(result.num_faces(), 96);
        assert_eq!(result.euler_characteristic().unwrap(), 2);

        let unchanged = catmull_clark_subdivide(&mesh, &SubdivideOptions::new(0)).unwrap();
        assert_eq!(unchanged.num_faces(), 6);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mesh = create_quad_cube();
        let par = catmull_clark_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();
        let seq = catmull_clark_subdivide(&mesh, &SubdivideOptions::new(2).sequential()).unwrap();

        assert_eq!(par.num_vertices(), seq.num_vertices());
        for v in par.vertex_ids() {
            assert_eq!(par.position(v), seq.position(v));
        }
        assert_eq!(par.faces(), seq.faces());
    }

    #[test]
    fn test_progress_reports_each_pass() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let progress = Progress::new(move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mesh = create_single_quad();
        catmull_clark_subdivide_with_progress(&mesh, &SubdivideOptions::new(3), &progress).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_face_attributes_carried() {
        use crate::mesh::Color;
        let mut mesh = create_single_quad();
        mesh.set_face_color(crate::mesh::FaceId::new(0), Color::rgb(1.0, 0.0, 0.0));
        let result = catmull_clark(&mesh).unwrap();
        assert!(result.faces().iter().all(|f| f.color == Color::rgb(1.0, 0.0, 0.0)));
    }
}
