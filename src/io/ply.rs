//! PLY (Stanford polygon) format support.
//!
//! Faces keep their arity. Per-face `red`, `green` and `blue` properties are
//! read into face colours when present and always written on save.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{Color, Face, Mesh, MeshIndex, VertexId, VertexPool};

/// Load a mesh from a PLY file (ASCII or binary).
///
/// # Example
///
/// ```no_run
/// use polykit::io::ply;
/// use polykit::mesh::Mesh;
///
/// let mesh: Mesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut positions: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name)
                .ok_or_else(|| load_error(&format!("vertex missing {} coordinate", name)))
        };
        positions.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut faces: Vec<Face<I>> = Vec::with_capacity(face_element.len());
    for element in face_element {
        let indices = get_list_property(element, "vertex_indices")
            .or_else(|| get_list_property(element, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;
        if let Some(&bad) = indices.iter().find(|&&i| i >= positions.len()) {
            return Err(MeshError::InvalidVertexIndex {
                face: faces.len(),
                vertex: bad,
            });
        }

        let mut face = Face::new(indices.into_iter().map(VertexId::new).collect());
        if let (Some(r), Some(g), Some(b)) = (
            get_channel(element, "red"),
            get_channel(element, "green"),
            get_channel(element, "blue"),
        ) {
            face.color = Color::rgb(r, g, b);
        }
        faces.push(face);
    }

    if faces.is_empty() {
        return Err(load_error("PLY file contains no faces"));
    }

    log::debug!(
        "Read PLY {}: {} vertices, {} faces",
        path.display(),
        positions.len(),
        faces.len()
    );
    Mesh::from_parts(VertexPool::from_positions(&positions), faces)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

/// A colour channel in `[0, 1]`: `uchar` channels are scaled from 0-255,
/// float channels are taken as-is.
fn get_channel(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::UChar(v) => Some(*v as f64 / 255.0),
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Save a mesh to a PLY file (ASCII format) with per-face colours.
///
/// # Example
///
/// ```no_run
/// use polykit::io::ply;
/// use polykit::mesh::Mesh;
///
/// let mesh: Mesh = Mesh::new();
/// ply::save(&mesh, "output.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by polykit")?;
    writeln!(writer, "element vertex {}", mesh.num_vertices())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", mesh.num_faces())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "end_header")?;

    for (_, v) in mesh.vertices().iter() {
        writeln!(writer, "{} {} {}", v.position.x, v.position.y, v.position.z)?;
    }

    for face in mesh.faces() {
        if face.len() > u8::MAX as usize {
            return Err(MeshError::SaveError {
                path: path.to_path_buf(),
                message: format!("face with {} vertices exceeds the PLY list size", face.len()),
            });
        }
        write!(writer, "{}", face.len())?;
        for v in &face.vertices {
            write!(writer, " {}", v.index())?;
        }
        let c = face.color;
        writeln!(writer, " {} {} {}", to_byte(c.r), to_byte(c.g), to_byte(c.b))?;
    }

    writer.flush()?;
    Ok(())
}
