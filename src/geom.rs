//! Geometry helpers for planar polygons.
//!
//! Vector algebra comes from [`nalgebra`]; this module adds the per-polygon
//! measures the mesh algorithms need. Every function takes the polygon as an
//! ordered slice of points whose winding defines its orientation.
//!
//! Normals use Newell's method, which is exact for planar polygons of any
//! arity and degrades gracefully for slightly non-planar ones.

use nalgebra::{Point3, Vector3};

/// Norm below which a vector is treated as zero.
const EPSILON: f64 = 1e-12;

/// Newell vector of a polygon: its direction is the normal and its length is
/// twice the polygon area.
pub fn newell(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut sum = Vector3::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        sum.x += (a.y - b.y) * (a.z + b.z);
        sum.y += (a.z - b.z) * (a.x + b.x);
        sum.z += (a.x - b.x) * (a.y + b.y);
    }
    sum
}

/// Unit normal of a polygon, consistent with its winding (counter-clockwise
/// winding seen from the tip of the normal).
///
/// Returns the zero vector for degenerate polygons.
pub fn normal(points: &[Point3<f64>]) -> Vector3<f64> {
    newell(points)
        .try_normalize(EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// Unweighted average of the polygon's vertices.
pub fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Point3::from(sum / points.len() as f64)
}

/// Unsigned area of a planar polygon.
pub fn area(points: &[Point3<f64>]) -> f64 {
    0.5 * newell(points).norm()
}

/// Area of a planar polygon, signed by its winding relative to `reference`.
///
/// Positive when the polygon's normal points to the same side as `reference`.
pub fn signed_area(points: &[Point3<f64>], reference: &Vector3<f64>) -> f64 {
    let axis = reference
        .try_normalize(EPSILON)
        .unwrap_or_else(Vector3::zeros);
    0.5 * newell(points).dot(&axis)
}

/// Sum of the polygon's edge lengths, including the closing edge.
pub fn perimeter(points: &[Point3<f64>]) -> f64 {
    let n = points.len();
    (0..n).map(|i| (points[(i + 1) % n] - points[i]).norm()).sum()
}

/// Z component of the polygon normal: 1 for upward faces, 0 for walls, -1 for
/// downward faces.
pub fn verticality(points: &[Point3<f64>]) -> f64 {
    normal(points).z
}

/// Angle at `b` in the triangle `a`, `b`, `c`, in radians.
pub fn angle_triangle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    (a - b).angle(&(c - b))
}

/// Midpoint of `a` and `b`.
#[inline]
pub fn center(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    Point3::from((a.coords + b.coords) * 0.5)
}

/// Point at relative position `t` from `a` towards `b`.
///
/// `t` outside `[0, 1]` extrapolates along the line.
#[inline]
pub fn between_rel(a: &Point3<f64>, b: &Point3<f64>, t: f64) -> Point3<f64> {
    a + (b - a) * t
}

/// Point at absolute distance `d` from `a` towards `b`.
pub fn between_abs(a: &Point3<f64>, b: &Point3<f64>, d: f64) -> Point3<f64> {
    let dir = (b - a).try_normalize(EPSILON).unwrap_or_else(Vector3::zeros);
    a + dir * d
}

/// Offset corner for the polygon vertex `p1`, given its neighbours `p0` and
/// `p2`.
///
/// The edge `p0 -> p1` is moved inwards by `d1` and the edge `p1 -> p2` by
/// `d2`, both within the plane with normal `normal`; the result is where the
/// two moved edges meet. Inwards means towards the interior of a polygon
/// wound counter-clockwise around `normal`; negative distances grow the
/// polygon instead.
pub fn offset_point(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    d1: f64,
    d2: f64,
    normal: &Vector3<f64>,
) -> Point3<f64> {
    let e1 = (p1 - p0).try_normalize(EPSILON).unwrap_or_else(Vector3::zeros);
    let e2 = (p2 - p1).try_normalize(EPSILON).unwrap_or_else(Vector3::zeros);
    let m1 = normal.cross(&e1);

    let sin = normal.dot(&e1.cross(&e2));
    if sin.abs() < 1e-9 {
        // Collinear edges: both offset lines are parallel.
        return p1 + m1 * ((d1 + d2) * 0.5);
    }
    let cos = e1.dot(&e2);
    let along = (d1 * cos - d2) / sin;
    p1 + m1 * d1 + e1 * along
}
