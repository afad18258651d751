//! Extrusion along the face normal.

use nalgebra::{Point3, Vector3};

use crate::geom;
use crate::mesh::{Face, MeshIndex, VertexId, VertexPool};

/// Side quads `[v_i, v_i+1, t_i+1, t_i]` joining a face to its moved copy.
fn side_quads<I: MeshIndex>(face: &Face<I>, top: &[VertexId<I>]) -> Vec<Face<I>> {
    let n = face.len();
    (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            face.derive(vec![face.vertices[i], face.vertices[j], top[j], top[i]])
        })
        .collect()
}

fn face_frame<I: MeshIndex>(pool: &VertexPool<I>, face: &Face<I>) -> (Vec<Point3<f64>>, Vector3<f64>) {
    let points = pool.positions(&face.vertices);
    let normal = geom::normal(&points);
    (points, normal)
}

/// Extrude a face along its normal by `height`.
///
/// Returns the bottom cap (the original face) when requested, one side quad
/// per edge, then the top cap (the moved copy) when requested. A zero height
/// gives degenerate side quads.
pub fn extrude<I: MeshIndex>(
    pool: &mut VertexPool<I>,
    face: &Face<I>,
    height: f64,
    cap_bottom: bool,
    cap_top: bool,
) -> Vec<Face<I>> {
    let (points, normal) = face_frame(pool, face);
    let offset = normal * height;
    let top: Vec<VertexId<I>> = points.iter().map(|p| pool.add(p + offset)).collect();

    let mut faces = Vec::with_capacity(face.len() + 2);
    if cap_bottom {
        faces.push(face.clone());
    }
    faces.extend(side_quads(face, &top));
    if cap_top {
        faces.push(face.derive(top));
    }
    faces
}

/// Extrude a face while shrinking it towards its centroid.
///
/// Each new vertex is `v + fraction * (centroid - v) + height * normal`.
/// Fractions outside `[0, 1]` extrapolate. Returns the side quads and, when
/// `cap_top` is set, the top face.
pub fn extrude_tapered<I: MeshIndex>(
    pool: &mut VertexPool<I>,
    face: &Face<I>,
    height: f64,
    fraction: f64,
    cap_top: bool,
) -> Vec<Face<I>> {
    let (points, normal) = face_frame(pool, face);
    let center = geom::centroid(&points);
    let offset = normal * height;
    let top: Vec<VertexId<I>> = points
        .iter()
        .map(|p| pool.add(p + (center - p) * fraction + offset))
        .collect();

    let mut faces = side_quads(face, &top);
    if cap_top {
        faces.push(face.derive(top));
    }
    faces
}

/// One triangle `[v_i, v_i+1, apex]` per edge.
pub fn extrude_to_point<I: MeshIndex>(face: &Face<I>, apex: VertexId<I>) -> Vec<Face<I>> {
    face.edges().map(|(a, b)| face.derive(vec![a, b, apex])).collect()
}

/// Pyramid over the face with its apex `height` above the centroid.
pub fn extrude_to_point_center<I: MeshIndex>(
    pool: &mut VertexPool<I>,
    face: &Face<I>,
    height: f64,
) -> Vec<Face<I>> {
    let (points, normal) = face_frame(pool, face);
    let apex = pool.add(geom::centroid(&points) + normal * height);
    extrude_to_point(face, apex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::transform::tests::{area, regular_pentagon, unit_square, unit_triangle};
    use crate::mesh::{Color, Mesh};

    #[test]
    fn test_unit_square_extrude() {
        let (mut pool, square) = unit_square();
        let faces = extrude(&mut pool, &square, 1.0, true, true);

        assert_eq!(faces.len(), 6);
        assert_eq!(pool.len(), 8);

        let (bottom, top) = (&faces[0], &faces[5]);
        for side in &faces[1..5] {
            assert_eq!(side.len(), 4);
            assert!((area(&pool, side) - 1.0).abs() < 1e-10);
        }
        assert_eq!(*bottom, square);
        assert!((area(&pool, bottom) - 1.0).abs() < 1e-10);
        for (&b, &t) in bottom.vertices.iter().zip(&top.vertices) {
            let (b, t) = (pool.position(b), pool.position(t));
            assert!((t.x - b.x).abs() < 1e-10);
            assert!((t.y - b.y).abs() < 1e-10);
            assert!((t.z - 1.0).abs() < 1e-10);
        }
        assert!((area(&pool, top) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_side_quads_face_outwards() {
        let (mut pool, square) = unit_square();
        let faces = extrude(&mut pool, &square, 1.0, false, false);

        // First side sits on the edge y = 0.
        let n = geom::normal(&pool.positions(&faces[0].vertices));
        assert!((n.y + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_extrude_without_caps_forms_open_tube() {
        let (mut pool, square) = unit_square();
        let faces = extrude(&mut pool, &square, 2.0, false, false);
        let mesh: Mesh = Mesh::from_parts(pool, faces).unwrap();

        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.adjacency().unwrap().boundary_edges().count(), 8);
    }

    #[test]
    fn test_zero_height_is_degenerate_not_rejected() {
        let (mut pool, square) = unit_square();
        let faces = extrude(&mut pool, &square, 0.0, false, true);
        assert_eq!(faces.len(), 5);
        assert!(area(&pool, &faces[0]) < 1e-10);
    }

    #[test]
    fn test_attributes_inherited() {
        let (mut pool, square) = unit_square();
        let square = square.with_group("walls").with_color(Color::rgb(0.0, 1.0, 0.0));
        let faces = extrude(&mut pool, &square, 1.0, false, true);
        assert!(faces.iter().all(|f| f.group.as_deref() == Some("walls")));
        assert!(faces.iter().all(|f| f.color == Color::rgb(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_tapered_extrude() {
        let (mut pool, square) = unit_square();
        let faces = extrude_tapered(&mut pool, &square, 1.0, 0.5, true);

        assert_eq!(faces.len(), 5);
        let top = &faces[4];
        assert!((area(&pool, top) - 0.25).abs() < 1e-10);
        assert_eq!(*pool.position(top.vertices[0]), Point3::new(0.25, 0.25, 1.0));
    }

    #[test]
    fn test_tapered_fraction_extrapolates() {
        let (mut pool, square) = unit_square();
        let faces = extrude_tapered(&mut pool, &square, 0.0, -1.0, true);
        assert!((area(&pool, &faces[4]) - 4.0).abs() < 1e-10);

        let faces = extrude_tapered(&mut pool, &square, 1.0, 1.0, false);
        assert_eq!(faces.len(), 4);
        let apex = pool.position(faces[0].vertices[2]);
        assert!((apex - Point3::new(0.5, 0.5, 1.0)).norm() < 1e-10);
    }

    #[test]
    fn test_extrude_to_point() {
        let (mut pool, triangle) = unit_triangle();
        let apex = pool.add(Point3::new(0.0, 0.0, 5.0));
        let faces = extrude_to_point(&triangle, apex);

        assert_eq!(faces.len(), 3);
        assert!(faces.iter().all(|f| f.len() == 3 && f.vertices[2] == apex));
        assert_eq!(faces[2].vertices[..2], [triangle.vertices[2], triangle.vertices[0]]);
    }

    #[test]
    fn test_extrude_to_point_center() {
        let (mut pool, pentagon) = regular_pentagon();
        let faces = extrude_to_point_center(&mut pool, &pentagon, 2.0);

        assert_eq!(faces.len(), 5);
        let apex = pool.position(faces[0].vertices[2]);
        assert!(apex.x.abs() < 1e-10 && apex.y.abs() < 1e-10);
        assert!((apex.z - 2.0).abs() < 1e-10);

        let mesh: Mesh = Mesh::from_parts(pool, faces).unwrap();
        assert!(mesh.is_valid());
        assert_eq!(mesh.adjacency().unwrap().boundary_edges().count(), 5);
    }
}
