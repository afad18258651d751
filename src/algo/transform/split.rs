//! Parametric face splitting: roofs, grids, relative cuts and mitred frames.

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::geom;
use crate::mesh::{Arity, Face, MeshIndex, VertexId, VertexPool};

use super::{add_between_rel, Transformed};

/// `n + 1` vertices evenly spaced from `a` to `b`, reusing `a` and `b` at
/// the ends.
fn sample_line<I: MeshIndex>(
    pool: &mut VertexPool<I>,
    a: VertexId<I>,
    b: VertexId<I>,
    n: usize,
) -> Vec<VertexId<I>> {
    let mut line = Vec::with_capacity(n + 1);
    line.push(a);
    for k in 1..n {
        line.push(add_between_rel(pool, a, b, k as f64 / n as f64));
    }
    line.push(b);
    line
}

/// Split a triangle or quad into a gabled roof with a ridge `height` above
/// the face.
///
/// For a quad `[v0, v1, v2, v3]` the ridge runs between the raised
/// midpoints of `v0 v1` and `v2 v3`, giving two gable triangles and two
/// slopes. For a triangle the ridge joins the raised midpoints of `v0 v1`
/// and `v1 v2`. Other arities pass through.
pub fn split_roof<I: MeshIndex>(pool: &mut VertexPool<I>, face: &Face<I>, height: f64) -> Transformed<I> {
    let v = &face.vertices;
    let points = pool.positions(v);
    let lift = geom::normal(&points) * height;

    match face.arity() {
        Arity::Quad => {
            let e1 = pool.add(geom::center(&points[0], &points[1]) + lift);
            let e2 = pool.add(geom::center(&points[2], &points[3]) + lift);
            Transformed::Faces(vec![
                face.derive(vec![v[0], v[1], e1]),
                face.derive(vec![v[1], v[2], e2, e1]),
                face.derive(vec![v[2], v[3], e2]),
                face.derive(vec![v[3], v[0], e1, e2]),
            ])
        }
        Arity::Triangle => {
            let e1 = pool.add(geom::center(&points[0], &points[1]) + lift);
            let e2 = pool.add(geom::center(&points[1], &points[2]) + lift);
            Transformed::Faces(vec![
                face.derive(vec![v[0], v[1], e1]),
                face.derive(vec![v[1], e2, e1]),
                face.derive(vec![v[1], v[2], e2]),
                face.derive(vec![v[2], v[0], e1, e2]),
            ])
        }
        Arity::NGon(_) => Transformed::unsupported(face, "split_roof"),
    }
}

/// Split a triangle or quad into a regular grid.
///
/// A quad `[v0, v1, v2, v3]` becomes `n_u * n_v` quads, with `n_u` columns
/// along `v0 v1` and `n_v` rows along `v0 v3`; interior points are
/// bilinear. A triangle is cut into `n_u` bands away from `v0`, each band
/// split `n_v` times: the band at `v0` is a fan of triangles, the rest are
/// quads. Faces with more than four vertices pass through.
///
/// Fails when either count is zero.
pub fn split_grid<I: MeshIndex>(
    pool: &mut VertexPool<I>,
    face: &Face<I>,
    n_u: usize,
    n_v: usize,
) -> Result<Transformed<I>> {
    if n_u == 0 {
        return Err(MeshError::invalid_param("n_u", n_u, "must be at least 1"));
    }
    if n_v == 0 {
        return Err(MeshError::invalid_param("n_v", n_v, "must be at least 1"));
    }

    let v = &face.vertices;
    let faces = match face.arity() {
        Arity::Quad => {
            let bottom = sample_line(pool, v[0], v[1], n_u);
            let top = sample_line(pool, v[3], v[2], n_u);
            let columns: Vec<Vec<VertexId<I>>> = bottom
                .iter()
                .zip(&top)
                .map(|(&b, &t)| sample_line(pool, b, t, n_v))
                .collect();

            let mut faces = Vec::with_capacity(n_u * n_v);
            for u in 0..n_u {
                for k in 0..n_v {
                    faces.push(face.derive(vec![
                        columns[u][k],
                        columns[u + 1][k],
                        columns[u + 1][k + 1],
                        columns[u][k + 1],
                    ]));
                }
            }
            faces
        }
        Arity::Triangle => {
            let side1 = sample_line(pool, v[0], v[1], n_u);
            let side2 = sample_line(pool, v[0], v[2], n_u);
            let rows: Vec<Vec<VertexId<I>>> = (1..=n_u)
                .map(|u| sample_line(pool, side1[u], side2[u], n_v))
                .collect();

            let mut faces = Vec::with_capacity(n_u * n_v);
            for k in 0..n_v {
                faces.push(face.derive(vec![v[0], rows[0][k], rows[0][k + 1]]));
            }
            for pair in rows.windows(2) {
                let (inner, outer) = (&pair[0], &pair[1]);
                for k in 0..n_v {
                    faces.push(face.derive(vec![inner[k], outer[k], outer[k + 1], inner[k + 1]]));
                }
            }
            faces
        }
        Arity::NGon(_) => return Ok(Transformed::unsupported(face, "split_grid")),
    };
    Ok(Transformed::Faces(faces))
}

/// Cut a quad in two with a free line.
///
/// With `axis % 2 == 0` the cut runs from relative position `split1` on
/// `v0 -> v1` to `split2` on `v2 -> v3`; otherwise from `split1` on
/// `v1 -> v2` to `split2` on `v3 -> v0`. Non-quads pass through.
pub fn split_rel_free_quad<I: MeshIndex>(
    pool: &mut VertexPool<I>,
    face: &Face<I>,
    axis: usize,
    split1: f64,
    split2: f64,
) -> Transformed<I> {
    if face.arity() != Arity::Quad {
        return Transformed::unsupported(face, "split_rel_free_quad");
    }
    let v = &face.vertices;
    let faces = if axis % 2 == 0 {
        let p1 = add_between_rel(pool, v[0], v[1], split1);
        let p2 = add_between_rel(pool, v[2], v[3], split2);
        vec![face.derive(vec![v[0], p1, p2, v[3]]), face.derive(vec![p1, v[1], v[2], p2])]
    } else {
        let p1 = add_between_rel(pool, v[1], v[2], split1);
        let p2 = add_between_rel(pool, v[3], v[0], split2);
        vec![face.derive(vec![v[0], v[1], p1, p2]), face.derive(vec![p2, p1, v[2], v[3]])]
    };
    Transformed::Faces(faces)
}

/// Cut a quad into `splits.len() + 1` strips.
///
/// `direction % 2` picks the pair of opposite edges that are cut: `0` cuts
/// `v0 v1` and `v3 v2`, `1` cuts `v1 v2` and `v0 v3`. Each split is a
/// relative position along both cut edges; positions are used as given, so
/// they should be increasing and within `[0, 1]`. Non-quads pass through.
pub fn split_rel_multiple<I: MeshIndex>(
    pool: &mut VertexPool<I>,
    face: &Face<I>,
    direction: usize,
    splits: &[f64],
) -> Transformed<I> {
    if face.arity() != Arity::Quad {
        return Transformed::unsupported(face, "split_rel_multiple");
    }
    let v = &face.vertices;
    let d = direction % 2;
    let (a0, a1) = (v[d], v[d + 1]);
    let (b0, b1) = (v[(d + 3) % 4], v[(d + 2) % 4]);

    let mut side_a = vec![a0];
    let mut side_b = vec![b0];
    for &t in splits {
        side_a.push(add_between_rel(pool, a0, a1, t));
        side_b.push(add_between_rel(pool, b0, b1, t));
    }
    side_a.push(a1);
    side_b.push(b1);

    let faces = (0..=splits.len())
        .map(|i| face.derive(vec![side_b[i], side_a[i], side_a[i + 1], side_b[i + 1]]))
        .collect();
    Transformed::Faces(faces)
}

/// Cut a quad in two at relative position `split`.
pub fn split_rel<I: MeshIndex>(
    pool: &mut VertexPool<I>,
    face: &Face<I>,
    direction: usize,
    split: f64,
) -> Transformed<I> {
    split_rel_multiple(pool, face, direction, &[split])
}

/// Split a quad into a mitred frame of width `w` around a smaller inner
/// quad.
///
/// Each corner gets a quad of the frame and each edge a quad between two
/// corners, followed by the inner face: nine faces in total. The corner
/// offset along each edge is `w / sin(angle)`, so the frame has constant
/// width on convex faces. Convexity is not checked. Non-quads pass through.
pub fn split_frame<I: MeshIndex>(pool: &mut VertexPool<I>, face: &Face<I>, w: f64) -> Transformed<I> {
    if face.arity() != Arity::Quad {
        return Transformed::unsupported(face, "split_frame");
    }
    let v = &face.vertices;
    let points = pool.positions(v);
    let n = points.len();
    let prev = |i: usize| (i + n - 1) % n;
    let next = |i: usize| (i + 1) % n;

    let mitre: Vec<f64> = (0..n)
        .map(|i| {
            let sin = geom::angle_triangle(&points[prev(i)], &points[i], &points[next(i)]).sin();
            if sin.abs() < 1e-12 {
                w
            } else {
                w / sin
            }
        })
        .collect();

    // Corner i of the inner face lies `mitre[i]` along both edges at v_i.
    let inner_points: Vec<Point3<f64>> = (0..n)
        .map(|i| {
            let along_next = geom::between_abs(&points[i], &points[next(i)], mitre[i]) - points[i];
            let along_prev = geom::between_abs(&points[i], &points[prev(i)], mitre[i]) - points[i];
            points[i] + along_next + along_prev
        })
        .collect();

    let near: Vec<VertexId<I>> = (0..n)
        .map(|i| pool.add(geom::between_abs(&points[i], &points[next(i)], mitre[i])))
        .collect();
    let far: Vec<VertexId<I>> = (0..n)
        .map(|i| pool.add(geom::between_abs(&points[next(i)], &points[i], mitre[next(i)])))
        .collect();
    let inner: Vec<VertexId<I>> = inner_points.into_iter().map(|p| pool.add(p)).collect();

    let mut faces = Vec::with_capacity(2 * n + 1);
    for i in 0..n {
        faces.push(face.derive(vec![v[i], near[i], inner[i], far[prev(i)]]));
        faces.push(face.derive(vec![near[i], far[i], inner[next(i)], inner[i]]));
    }
    faces.push(face.derive(inner));
    Transformed::Faces(faces)
}
