//! STL (stereolithography) export.
//!
//! STL only stores triangles, so every polygon is fan-triangulated from its
//! first vertex; each triangle carries the normal of its source face. STL
//! has no shared vertices or face groups, which is why there is no loader
//! here: a polygon mesh cannot be recovered from it.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{Mesh, MeshIndex};

fn vertex(p: &Point3<f64>) -> stl_io::Vertex {
    stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32])
}

/// Fan-triangulate every face.
pub(crate) fn triangles<I: MeshIndex>(mesh: &Mesh<I>) -> Vec<stl_io::Triangle> {
    let mut triangles = Vec::new();
    for f in mesh.face_ids() {
        let points = mesh.face_positions(f);
        let n = mesh.face_normal(f);
        for i in 1..points.len().saturating_sub(1) {
            triangles.push(stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [vertex(&points[0]), vertex(&points[i]), vertex(&points[i + 1])],
            });
        }
    }
    triangles
}

/// Save a mesh to a binary STL file.
///
/// # Example
///
/// ```no_run
/// use polykit::io::stl;
/// use polykit::mesh::Mesh;
///
/// let mesh: Mesh = Mesh::new();
/// stl::save(&mesh, "output.stl").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let triangles = triangles(mesh);
    log::debug!("Writing {} triangles to {}", triangles.len(), path.display());

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
