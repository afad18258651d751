//! Wavefront OBJ format support.
//!
//! Polygonal faces of any arity are read and written as-is. `g` and `o`
//! statements set the group of the faces that follow. Texture coordinates,
//! normals and materials are ignored on load and not written on save.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{Face, Mesh, MeshIndex, VertexId, VertexPool};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use polykit::io::obj;
/// use polykit::mesh::Mesh;
///
/// let mesh: Mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    parse(BufReader::new(file), path)
}

/// Read a mesh in OBJ syntax from any buffered reader.
pub fn read<R: BufRead, I: MeshIndex>(reader: R) -> Result<Mesh<I>> {
    parse(reader, Path::new("<reader>"))
}

fn parse<R: BufRead, I: MeshIndex>(reader: R, path: &Path) -> Result<Mesh<I>> {
    let error = |line: usize, message: String| MeshError::LoadError {
        path: path.to_path_buf(),
        message: format!("line {}: {}", line, message),
    };

    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<(Vec<usize>, Option<String>)> = Vec::new();
    let mut group: Option<String> = None;

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = n + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let coords: Vec<f64> = tokens
                    .take(3)
                    .map(|t| t.parse::<f64>().map_err(|e| error(line_no, e.to_string())))
                    .collect::<Result<_>>()?;
                if coords.len() != 3 {
                    return Err(error(line_no, "vertex needs three coordinates".to_string()));
                }
                positions.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let indices = tokens
                    .map(|t| resolve_index(t, positions.len()).map_err(|m| error(line_no, m)))
                    .collect::<Result<Vec<usize>>>()?;
                faces.push((indices, group.clone()));
            }
            Some("g") | Some("o") => {
                let name = tokens.collect::<Vec<_>>().join(" ");
                group = if name.is_empty() { None } else { Some(name) };
            }
            _ => {}
        }
    }

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ file contains no faces".to_string(),
        });
    }

    log::debug!(
        "Read OBJ {}: {} vertices, {} faces",
        path.display(),
        positions.len(),
        faces.len()
    );

    let pool = VertexPool::from_positions(&positions);
    let faces = faces
        .into_iter()
        .map(|(indices, group)| {
            let mut face = Face::new(indices.into_iter().map(VertexId::new).collect());
            face.group = group;
            face
        })
        .collect();
    Mesh::from_parts(pool, faces)
}

/// Resolve an OBJ face token (`7`, `7/1`, `7//3`, `-1`) to a 0-based index.
fn resolve_index(token: &str, num_vertices: usize) -> std::result::Result<usize, String> {
    let head = token.split('/').next().unwrap_or(token);
    let raw: i64 = head
        .parse()
        .map_err(|_| format!("invalid face index '{}'", token))?;
    let index = if raw > 0 {
        raw - 1
    } else {
        num_vertices as i64 + raw
    };
    if raw == 0 || index < 0 || index >= num_vertices as i64 {
        return Err(format!("face index {} out of range", raw));
    }
    Ok(index as usize)
}

/// Save a mesh to an OBJ file.
///
/// ```no_run
/// use polykit::io::obj;
/// use polykit::mesh::Mesh;
///
/// let mesh: Mesh = Mesh::new();
/// obj::save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh in OBJ syntax.
pub fn write<W: Write, I: MeshIndex>(mesh: &Mesh<I>, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Generated by polykit")?;
    for (_, v) in mesh.vertices().iter() {
        writeln!(writer, "v {} {} {}", v.position.x, v.position.y, v.position.z)?;
    }

    let mut current: Option<&str> = None;
    for face in mesh.faces() {
        let group = face.group.as_deref();
        if group != current {
            match group {
                Some(name) => writeln!(writer, "g {}", name)?,
                // A bare `g` ends the previous group.
                None => writeln!(writer, "g")?,
            }
        }
        current = group;

        write!(writer, "f")?;
        for v in &face.vertices {
            write!(writer, " {}", v.index() + 1)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
