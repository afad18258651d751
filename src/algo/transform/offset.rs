//! Offsetting: planar insets within a face and whole-mesh shells along
//! vertex normals.

use nalgebra::Vector3;

use crate::error::{MeshError, Result};
use crate::geom;
use crate::mesh::{Face, Mesh, MeshIndex, VertexId, VertexPool};

/// Inset a face within its own plane.
///
/// `offsets[i]` moves edge `v_i -> v_i+1` towards the interior (negative
/// values move it outwards); every corner is rebuilt where its two moved
/// edges meet. Corners whose two edges both have a zero offset keep their
/// original vertex. Over-large offsets are not detected and give a
/// self-intersecting face.
///
/// Fails unless there is exactly one offset per edge.
pub fn offset_planar<I: MeshIndex>(
    pool: &mut VertexPool<I>,
    face: &Face<I>,
    offsets: &[f64],
) -> Result<Face<I>> {
    MeshError::check_count("edge offsets", face.len(), offsets.len())?;
    Ok(inset(pool, face, offsets))
}

/// Inset a face and fill the gap with one quad per moved edge.
///
/// Returns a side quad `[v_i, v_i+1, o_i+1, o_i]` for every edge with a
/// nonzero offset, followed by the inset core face. Any output face whose
/// winding disagrees with the input face (negative offsets produce these) is
/// reversed.
pub fn split_offsets<I: MeshIndex>(
    pool: &mut VertexPool<I>,
    face: &Face<I>,
    offsets: &[f64],
) -> Result<Vec<Face<I>>> {
    MeshError::check_count("edge offsets", face.len(), offsets.len())?;
    Ok(split_inset(pool, face, offsets))
}

/// [`split_offsets`] with the same offset on every edge.
pub fn split_offset<I: MeshIndex>(pool: &mut VertexPool<I>, face: &Face<I>, offset: f64) -> Vec<Face<I>> {
    split_inset(pool, face, &vec![offset; face.len()])
}

fn inset<I: MeshIndex>(pool: &mut VertexPool<I>, face: &Face<I>, offsets: &[f64]) -> Face<I> {
    let n = face.len();
    let points = pool.positions(&face.vertices);
    let normal = geom::normal(&points);

    let vertices = (0..n)
        .map(|i| {
            let prev = (i + n - 1) % n;
            let (d1, d2) = (offsets[prev], offsets[i]);
            if d1 == 0.0 && d2 == 0.0 {
                face.vertices[i]
            } else {
                pool.add(geom::offset_point(
                    &points[prev],
                    &points[i],
                    &points[(i + 1) % n],
                    d1,
                    d2,
                    &normal,
                ))
            }
        })
        .collect();
    face.derive(vertices)
}

fn split_inset<I: MeshIndex>(pool: &mut VertexPool<I>, face: &Face<I>, offsets: &[f64]) -> Vec<Face<I>> {
    let core = inset(pool, face, offsets);
    let normal = geom::normal(&pool.positions(&face.vertices));
    let n = face.len();

    let mut faces: Vec<Face<I>> = (0..n)
        .filter(|&i| offsets[i] != 0.0)
        .map(|i| {
            let j = (i + 1) % n;
            face.derive(vec![face.vertices[i], face.vertices[j], core.vertices[j], core.vertices[i]])
        })
        .collect();
    faces.push(core);

    for f in &mut faces {
        if geom::signed_area(&pool.positions(&f.vertices), &normal) < 0.0 {
            f.flip();
        }
    }
    faces
}

/// Offset a whole mesh along its vertex normals.
///
/// Every referenced vertex gets a copy at
/// `v + distance * (sum of incident face normals) / (incident face count)`.
/// For each face the result holds the reversed offset face followed by the
/// original face. With `close` set, each boundary edge `v1 -> v2` also gets
/// the side quad `[v1', v2', v2, v1]`, so an open sheet becomes a closed
/// shell; edges with two faces never get one.
///
/// The mesh must have current adjacency when `close` is set.
pub fn offset_mesh<I: MeshIndex>(mesh: &Mesh<I>, distance: f64, close: bool) -> Result<Mesh<I>> {
    let mut normal_sum = vec![Vector3::zeros(); mesh.num_vertices()];
    let mut face_count = vec![0usize; mesh.num_vertices()];
    for f in mesh.face_ids() {
        let normal = mesh.face_normal(f);
        for v in &mesh.face(f).vertices {
            normal_sum[v.index()] += normal;
            face_count[v.index()] += 1;
        }
    }

    let mut pool = mesh.vertices().clone();
    let moved: Vec<Option<VertexId<I>>> = mesh
        .vertex_ids()
        .map(|v| match face_count[v.index()] {
            0 => None,
            count => {
                let shift = normal_sum[v.index()] * distance / count as f64;
                Some(pool.add(mesh.position(v) + shift))
            }
        })
        .collect();
    // Only referenced vertices are looked up below.
    let copy = |v: VertexId<I>| moved[v.index()].unwrap_or(v);

    let mut faces = Vec::with_capacity(mesh.num_faces() * 2);
    for face in mesh.faces() {
        let mut top = face.derive(face.vertices.iter().map(|&v| copy(v)).collect());
        top.flip();
        faces.push(top);
        faces.push(face.clone());
    }

    if close {
        let adjacency = mesh.adjacency()?;
        for (_, edge) in adjacency.boundary_edges() {
            let source = mesh.face(edge.face1);
            faces.push(source.derive(vec![copy(edge.v1), copy(edge.v2), edge.v2, edge.v1]));
        }
    }

    log::debug!(
        "offset_mesh: {} faces -> {} faces (distance {}, close {})",
        mesh.num_faces(),
        faces.len(),
        distance,
        close
    );
    Mesh::from_parts(pool, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::transform::tests::{area, regular_pentagon, unit_square};
    use crate::mesh::build_from_polygons;
    use nalgebra::Point3;

    fn signed(pool: &VertexPool, face: &Face) -> f64 {
        geom::signed_area(&pool.positions(&face.vertices), &Vector3::z())
    }

    #[test]
    fn test_zero_offsets_keep_face() {
        let (mut pool, square) = unit_square();
        let faces = split_offsets(&mut pool, &square, &[0.0; 4]).unwrap();

        assert_eq!(faces, vec![square.clone()]);
        assert_eq!(pool.len(), 4);
        assert!((signed(&pool, &faces[0]) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_uniform_inset() {
        let (mut pool, square) = unit_square();
        let faces = split_offset(&mut pool, &square, 0.1);

        assert_eq!(faces.len(), 5);
        for side in &faces[..4] {
            assert!((signed(&pool, side) - 0.09).abs() < 1e-10);
        }
        assert!((signed(&pool, &faces[4]) - 0.64).abs() < 1e-10);
        assert!((pool.position(faces[4].vertices[0]) - Point3::new(0.1, 0.1, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_negative_offset_keeps_winding() {
        let (mut pool, square) = unit_square();
        let faces = split_offset(&mut pool, &square, -0.1);

        assert_eq!(faces.len(), 5);
        assert!(faces.iter().all(|f| signed(&pool, f) > 0.0));
        assert!((area(&pool, &faces[4]) - 1.44).abs() < 1e-10);
    }

    #[test]
    fn test_single_edge_offset() {
        let (mut pool, square) = unit_square();
        let faces = split_offsets(&mut pool, &square, &[0.2, 0.0, 0.0, 0.0]).unwrap();

        assert_eq!(faces.len(), 2);
        assert!((area(&pool, &faces[0]) - 0.2).abs() < 1e-10);
        assert!((area(&pool, &faces[1]) - 0.8).abs() < 1e-10);
        // Corners away from the moved edge are shared with the input.
        assert_eq!(faces[1].vertices[2..], square.vertices[2..]);
        assert!((pool.position(faces[1].vertices[0]) - Point3::new(0.0, 0.2, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_offset_planar() {
        let (mut pool, pentagon) = regular_pentagon();
        let before = area(&pool, &pentagon);
        let inset = offset_planar(&mut pool, &pentagon, &[0.1; 5]).unwrap();

        assert_eq!(inset.len(), 5);
        assert!(area(&pool, &inset) < before);
        assert!(matches!(
            offset_planar(&mut pool, &pentagon, &[0.1; 4]),
            Err(MeshError::ValueCountMismatch { expected: 5, actual: 4, .. })
        ));
    }

    fn single_quad() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_polygons(&vertices, &[[0, 1, 2, 3]]).unwrap()
    }

    #[test]
    fn test_offset_mesh_closed_shell() {
        let mesh = single_quad();
        let shell = offset_mesh(&mesh, 1.0, true).unwrap();

        assert_eq!(shell.num_vertices(), 8);
        assert_eq!(shell.num_faces(), 6);
        assert!(shell.is_valid());
        assert_eq!(shell.adjacency().unwrap().boundary_edges().count(), 0);
        assert_eq!(shell.euler_characteristic().unwrap(), 2);

        // Offset face is reversed and one unit up.
        let top = &shell.faces()[0];
        assert!((shell.face_normal(crate::mesh::FaceId::new(0)).z + 1.0).abs() < 1e-10);
        assert!(top.vertices.iter().all(|&v| (shell.position(v).z - 1.0).abs() < 1e-10));
        assert_eq!(shell.faces()[1], mesh.faces()[0]);
    }

    #[test]
    fn test_offset_mesh_open() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let mesh: Mesh = build_from_polygons(&vertices, &[[0, 1, 2, 3], [1, 4, 5, 2]]).unwrap();
        let layered = offset_mesh(&mesh, -0.5, false).unwrap();

        assert_eq!(layered.num_faces(), 4);
        assert_eq!(layered.num_vertices(), 12);
        // Shared vertex moves by the averaged normal.
        let moved = layered.position(VertexId::new(6 + 1));
        assert!((moved - Point3::new(1.0, 0.0, -0.5)).norm() < 1e-10);

        let closed = offset_mesh(&mesh, -0.5, true).unwrap();
        // 6 boundary edges of the two-quad strip get side quads.
        assert_eq!(closed.num_faces(), 4 + 6);
        assert!(closed.is_valid());
    }

    #[test]
    fn test_offset_mesh_needs_adjacency_to_close() {
        let mut mesh = single_quad();
        mesh.faces_mut().push(Face::new(vec![VertexId::new(0), VertexId::new(2), VertexId::new(3)]));
        assert!(offset_mesh(&mesh, 1.0, false).is_ok());
        assert!(matches!(offset_mesh(&mesh, 1.0, true), Err(MeshError::StaleAdjacency)));
    }
}
