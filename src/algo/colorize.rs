//! Colour faces by a per-face scalar.
//!
//! Values are normalized to `[0, 1]` between their minimum and maximum and
//! used as a hue with full saturation and value. When all values are equal
//! every face gets hue 0 (red). Only face colours change; topology and
//! adjacency are left alone.

use crate::mesh::{Color, Face, FaceId, Mesh, MeshIndex};

/// Map each value to a hue colour by min/max normalization.
///
/// ```
/// use polykit::algo::colorize::map_values_to_color;
/// use polykit::mesh::Color;
///
/// let colors = map_values_to_color(&[0.0, 5.0, 10.0]);
/// assert_eq!(colors[0], Color::rgb(1.0, 0.0, 0.0));
/// assert_eq!(colors[1], Color::rgb(0.0, 1.0, 1.0));
/// ```
pub fn map_values_to_color(values: &[f64]) -> Vec<Color> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|&v| {
            let hue = if range > 0.0 { (v - min) / range } else { 0.0 };
            Color::from_hue(hue)
        })
        .collect()
}

fn color_faces_by<I, F>(mesh: &mut Mesh<I>, measure: F)
where
    I: MeshIndex,
    F: Fn(&Mesh<I>, FaceId<I>) -> f64,
{
    let values: Vec<f64> = mesh.face_ids().map(|f| measure(mesh, f)).collect();
    let colors = map_values_to_color(&values);
    let ids: Vec<FaceId<I>> = mesh.face_ids().collect();
    for (f, color) in ids.into_iter().zip(colors) {
        mesh.set_face_color(f, color);
    }
}

/// Colour faces by their area.
pub fn color_faces_by_area<I: MeshIndex>(mesh: &mut Mesh<I>) {
    color_faces_by(mesh, |m, f| m.face_area(f));
}

/// Colour faces by their perimeter.
pub fn color_faces_by_perimeter<I: MeshIndex>(mesh: &mut Mesh<I>) {
    color_faces_by(mesh, |m, f| m.face_perimeter(f));
}

/// Colour faces by the z component of their normal.
pub fn color_faces_by_verticality<I: MeshIndex>(mesh: &mut Mesh<I>) {
    color_faces_by(mesh, |m, f| m.face_normal(f).z);
}

/// Colour a free face list by a caller-supplied measure.
pub fn color_faces_with<I: MeshIndex>(faces: &mut [Face<I>], values: &[f64]) {
    for (face, color) in faces.iter_mut().zip(map_values_to_color(values)) {
        face.color = color;
    }
}
