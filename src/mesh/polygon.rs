//! Polygon mesh data structure.
//!
//! A [`Mesh`] owns a [`VertexPool`] and a list of [`Face`]s. Faces are ordered
//! cycles of [`VertexId`]s; two faces are connected exactly when they hold
//! the same vertex ids. Equal coordinates alone do not connect anything.
//!
//! # Adjacency
//!
//! Edge and vertex adjacency is a derived [`Adjacency`] index. It is built
//! when a mesh is assembled and dropped by every method that changes the
//! face list ([`Mesh::faces_mut`], [`Mesh::add_face`], ...). Reading it
//! afterwards fails with [`MeshError::StaleAdjacency`] until
//! [`Mesh::update_adjacencies`] is called. Moving vertices or recolouring
//! faces does not change topology and keeps the index.

use nalgebra::{Point3, Vector3};

use super::adjacency::Adjacency;
use super::index::{FaceId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};
use crate::geom;

/// A vertex of a polygon mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Pinned vertices keep their position during Catmull-Clark smoothing.
    pub fix: bool,
}

impl Vertex {
    /// Create a new, unpinned vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self { position, fix: false }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Return this vertex with its pin flag set to `fix`.
    pub fn pinned(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }
}

/// Arena of vertices addressed by [`VertexId`].
#[derive(Debug, Clone)]
pub struct VertexPool<I: MeshIndex = u32> {
    vertices: Vec<Vertex>,
    _index: std::marker::PhantomData<I>,
}

impl<I: MeshIndex> Default for VertexPool<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> VertexPool<I> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty pool with room for `capacity` vertices.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            _index: std::marker::PhantomData,
        }
    }

    /// Create a pool holding one vertex per position.
    pub fn from_positions(positions: &[Point3<f64>]) -> Self {
        let mut pool = Self::with_capacity(positions.len());
        for &p in positions {
            pool.add(p);
        }
        pool
    }

    /// Add a new vertex at `position` and return its id.
    pub fn add(&mut self, position: Point3<f64>) -> VertexId<I> {
        self.push(Vertex::new(position))
    }

    /// Add a vertex and return its id.
    pub fn push(&mut self, vertex: Vertex) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(vertex);
        id
    }

    /// Number of vertices in the pool.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the pool is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether `id` refers to a vertex in this pool.
    #[inline]
    pub fn contains(&self, id: VertexId<I>) -> bool {
        id.is_valid() && id.index() < self.vertices.len()
    }

    /// Get a vertex by id.
    #[inline]
    pub fn get(&self, id: VertexId<I>) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by id.
    #[inline]
    pub fn get_mut(&mut self, id: VertexId<I>) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }

    /// Position of a vertex.
    #[inline]
    pub fn position(&self, id: VertexId<I>) -> &Point3<f64> {
        &self.vertices[id.index()].position
    }

    /// Positions of a sequence of vertices, in order.
    pub fn positions(&self, ids: &[VertexId<I>]) -> Vec<Point3<f64>> {
        ids.iter().map(|&v| *self.position(v)).collect()
    }

    /// Iterate over all vertex ids.
    pub fn ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }
}

/// RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Opaque colour from red, green and blue.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Fully saturated, full value colour for `hue` in `[0, 1]`.
    pub fn from_hue(hue: f64) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let (q, t) = (1.0 - f, f);
        match sector as u8 {
            0 => Self::rgb(1.0, t, 0.0),
            1 => Self::rgb(q, 1.0, 0.0),
            2 => Self::rgb(0.0, 1.0, t),
            3 => Self::rgb(0.0, q, 1.0),
            4 => Self::rgb(t, 0.0, 1.0),
            _ => Self::rgb(1.0, 0.0, q),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Shape class of a face, used by operations that only handle some arities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Three vertices.
    Triangle,
    /// Four vertices.
    Quad,
    /// Any other vertex count.
    NGon(usize),
}

impl Arity {
    /// Classify a vertex count.
    pub fn of(count: usize) -> Self {
        match count {
            3 => Arity::Triangle,
            4 => Arity::Quad,
            n => Arity::NGon(n),
        }
    }
}

/// A planar polygonal face: an ordered cycle of vertex ids.
///
/// The winding of `vertices` defines the face normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Face<I: MeshIndex = u32> {
    /// Vertex cycle, at least three entries for a valid face.
    pub vertices: Vec<VertexId<I>>,

    /// Display colour.
    pub color: Color,

    /// Free-form group or provenance tag.
    pub group: Option<String>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a white, ungrouped face.
    pub fn new(vertices: Vec<VertexId<I>>) -> Self {
        Self {
            vertices,
            color: Color::WHITE,
            group: None,
        }
    }

    /// Create a face over `vertices` that carries this face's colour and group.
    pub fn derive(&self, vertices: Vec<VertexId<I>>) -> Self {
        Self {
            vertices,
            color: self.color,
            group: self.group.clone(),
        }
    }

    /// Set the group tag.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the colour.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the face has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Shape class of this face.
    #[inline]
    pub fn arity(&self) -> Arity {
        Arity::of(self.vertices.len())
    }

    /// Reverse the winding in place.
    pub fn flip(&mut self) {
        self.vertices.reverse();
    }

    /// Iterate over the directed edges `(v[i], v[i + 1])`, closing edge included.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId<I>, VertexId<I>)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// A polygon mesh: a vertex pool, a face list and a derived adjacency index.
#[derive(Debug, Clone)]
pub struct Mesh<I: MeshIndex = u32> {
    pub(crate) vertices: VertexPool<I>,
    pub(crate) faces: Vec<Face<I>>,
    adjacency: Option<Adjacency<I>>,
}

impl<I: MeshIndex> Default for Mesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> Mesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: VertexPool::new(),
            faces: Vec::new(),
            adjacency: None,
        }
    }

    /// Assemble a mesh from a vertex pool and faces, and build its adjacency.
    ///
    /// Fails if a face is degenerate, references a vertex outside `vertices`,
    /// or if an edge ends up with more than two faces.
    pub fn from_parts(vertices: VertexPool<I>, faces: Vec<Face<I>>) -> Result<Self> {
        let mut mesh = Self {
            vertices,
            faces,
            adjacency: None,
        };
        mesh.update_adjacencies()?;
        Ok(mesh)
    }

    /// Split the mesh into its vertex pool and faces.
    pub fn into_parts(self) -> (VertexPool<I>, Vec<Face<I>>) {
        (self.vertices, self.faces)
    }

    /// Rebuild the adjacency index from the current face list.
    pub fn update_adjacencies(&mut self) -> Result<()> {
        self.adjacency = Some(Adjacency::build(self.vertices.len(), &self.faces)?);
        Ok(())
    }

    /// The adjacency index, if it reflects the current face list.
    pub fn adjacency(&self) -> Result<&Adjacency<I>> {
        self.adjacency.as_ref().ok_or(MeshError::StaleAdjacency)
    }

    /// Whether the adjacency index is current.
    pub fn has_adjacency(&self) -> bool {
        self.adjacency.is_some()
    }

    // ==================== Accessors ====================

    /// Number of vertices in the pool.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of edges; requires current adjacency.
    pub fn num_edges(&self) -> Result<usize> {
        Ok(self.adjacency()?.num_edges())
    }

    /// The vertex pool.
    #[inline]
    pub fn vertices(&self) -> &VertexPool<I> {
        &self.vertices
    }

    /// Mutable access to the vertex pool.
    ///
    /// Moving or pinning vertices keeps the adjacency index.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut VertexPool<I> {
        &mut self.vertices
    }

    /// The face list.
    #[inline]
    pub fn faces(&self) -> &[Face<I>] {
        &self.faces
    }

    /// Get a face by id.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Mutable access to the face list. Drops the adjacency index.
    pub fn faces_mut(&mut self) -> &mut Vec<Face<I>> {
        self.adjacency = None;
        &mut self.faces
    }

    /// Append a face. Drops the adjacency index.
    pub fn add_face(&mut self, face: Face<I>) -> FaceId<I> {
        self.adjacency = None;
        let id = FaceId::new(self.faces.len());
        self.faces.push(face);
        id
    }

    /// Append faces. Drops the adjacency index.
    pub fn extend_faces<T: IntoIterator<Item = Face<I>>>(&mut self, faces: T) {
        self.adjacency = None;
        self.faces.extend(faces);
    }

    /// Add a vertex to the pool.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        self.vertices.add(position)
    }

    /// Position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        self.vertices.position(v)
    }

    /// Set the colour of a face. Keeps the adjacency index.
    pub fn set_face_color(&mut self, f: FaceId<I>, color: Color) {
        self.faces[f.index()].color = color;
    }

    /// Iterate over all vertex ids.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertices.ids()
    }

    /// Iterate over all face ids.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    // ==================== Geometry ====================

    /// Positions of a face's vertices, in winding order.
    pub fn face_positions(&self, f: FaceId<I>) -> Vec<Point3<f64>> {
        self.vertices.positions(&self.face(f).vertices)
    }

    /// Unit normal of a face.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        geom::normal(&self.face_positions(f))
    }

    /// Centroid (vertex average) of a face.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point3<f64> {
        geom::centroid(&self.face_positions(f))
    }

    /// Area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        geom::area(&self.face_positions(f))
    }

    /// Perimeter of a face.
    pub fn face_perimeter(&self, f: FaceId<I>) -> f64 {
        geom::perimeter(&self.face_positions(f))
    }

    /// Total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Bounding box of the vertices referenced by faces.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut points = self
            .faces
            .iter()
            .flat_map(|f| f.vertices.iter())
            .map(|&v| *self.position(v));
        let first = points.next()?;
        Some(points.fold((first, first), |(mut min, mut max), p| {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
            (min, max)
        }))
    }

    /// Whether every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.faces.iter().all(|f| f.arity() == Arity::Triangle)
    }

    /// Whether every face is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        self.faces.iter().all(|f| f.arity() == Arity::Quad)
    }

    /// V - E + F over the vertices referenced by faces; requires current adjacency.
    pub fn euler_characteristic(&self) -> Result<i64> {
        let adjacency = self.adjacency()?;
        let used = self
            .vertex_ids()
            .filter(|&v| adjacency.valence(v) > 0)
            .count();
        Ok(used as i64 - adjacency.num_edges() as i64 + self.faces.len() as i64)
    }

    /// A copy of this mesh without vertices that no face references.
    ///
    /// Face transforms add vertices to a copy of the source pool, so their
    /// results often carry unused source vertices. Fails with
    /// [`MeshError::InvalidVertexIndex`] if a face refers to a vertex outside
    /// the pool.
    pub fn compacted(&self) -> Result<Self> {
        let mut remap: Vec<VertexId<I>> = vec![VertexId::invalid(); self.vertices.len()];
        let mut pool = VertexPool::new();
        let mut faces = Vec::with_capacity(self.faces.len());
        for (fi, face) in self.faces.iter().enumerate() {
            let mut ids = Vec::with_capacity(face.len());
            for &v in &face.vertices {
                if !self.vertices.contains(v) {
                    return Err(MeshError::InvalidVertexIndex {
                        face: fi,
                        vertex: v.index(),
                    });
                }
                let slot = &mut remap[v.index()];
                if !slot.is_valid() {
                    *slot = pool.push(*self.vertices.get(v));
                }
                ids.push(*slot);
            }
            faces.push(face.derive(ids));
        }
        Self::from_parts(pool, faces)
    }

    // ==================== Validation ====================

    /// Check that the adjacency index is current and consistent with the faces.
    ///
    /// Every face edge must be present, list the face as one of its (at most
    /// two) incident faces, and appear in both endpoints' edge lists.
    pub fn is_valid(&self) -> bool {
        let Ok(adjacency) = self.adjacency() else {
            return false;
        };
        for (fi, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return false;
            }
            let fid = FaceId::new(fi);
            for (a, b) in face.edges() {
                let Some(e) = adjacency.edge_between(a, b) else {
                    return false;
                };
                let edge = adjacency.edge(e);
                if edge.face1 != fid && edge.face2 != fid {
                    return false;
                }
                if !adjacency.vertex_edges(a).contains(&e) || !adjacency.vertex_edges(b).contains(&e) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Mesh {
        let pool = VertexPool::from_positions(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        let face = Face::new((0..4).map(VertexId::new).collect());
        Mesh::from_parts(pool, vec![face]).unwrap()
    }

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::from_coords(1.0, 2.0, 3.0);
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(!v.fix);
        assert!(v.pinned(true).fix);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(!mesh.has_adjacency());
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_face_geometry() {
        let mesh = unit_square();
        let f = FaceId::new(0);
        assert!((mesh.face_area(f) - 1.0).abs() < 1e-10);
        assert!((mesh.face_perimeter(f) - 4.0).abs() < 1e-10);
        assert!((mesh.face_centroid(f) - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-10);
        assert!(mesh.face_normal(f).z > 0.99);
        assert!(mesh.is_quad_mesh());
        assert!(!mesh.is_triangle_mesh());
    }

    #[test]
    fn test_mutation_drops_adjacency() {
        let mut mesh = unit_square();
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_edges().unwrap(), 4);

        let apex = mesh.add_vertex(Point3::new(0.5, -1.0, 0.0));
        assert!(mesh.has_adjacency(), "adding a vertex keeps topology");

        mesh.add_face(Face::new(vec![VertexId::new(1), VertexId::new(0), apex]));
        assert!(matches!(mesh.adjacency(), Err(MeshError::StaleAdjacency)));
        assert!(!mesh.is_valid());

        mesh.update_adjacencies().unwrap();
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_edges().unwrap(), 6);
    }

    #[test]
    fn test_face_color_keeps_adjacency() {
        let mut mesh = unit_square();
        mesh.set_face_color(FaceId::new(0), Color::rgb(1.0, 0.0, 0.0));
        assert!(mesh.has_adjacency());
        assert_eq!(mesh.face(FaceId::new(0)).color, Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_derive_copies_properties() {
        let face: Face = Face::new(vec![VertexId::new(0), VertexId::new(1), VertexId::new(2)])
            .with_group("roof")
            .with_color(Color::rgb(0.0, 0.0, 1.0));
        let child = face.derive(vec![VertexId::new(3), VertexId::new(4), VertexId::new(5)]);
        assert_eq!(child.group.as_deref(), Some("roof"));
        assert_eq!(child.color, face.color);
        assert_eq!(child.arity(), Arity::Triangle);
    }

    #[test]
    fn test_compacted_drops_unused_vertices() {
        let mut mesh = unit_square();
        mesh.add_vertex(Point3::new(5.0, 5.0, 5.0));
        assert_eq!(mesh.num_vertices(), 5);
        let compact = mesh.compacted().unwrap();
        assert_eq!(compact.num_vertices(), 4);
        assert!((compact.surface_area() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_compacted_rejects_out_of_pool_vertex() {
        let mut mesh = unit_square();
        mesh.add_face(Face::new(vec![VertexId::new(0), VertexId::new(2), VertexId::new(9)]));
        assert!(matches!(
            mesh.compacted(),
            Err(MeshError::InvalidVertexIndex { face: 1, vertex: 9 })
        ));
    }

    #[test]
    fn test_euler_characteristic_of_square() {
        let mesh = unit_square();
        assert_eq!(mesh.euler_characteristic().unwrap(), 1);
    }

    #[test]
    fn test_hue_colors() {
        assert_eq!(Color::from_hue(0.0), Color::rgb(1.0, 0.0, 0.0));
        let green = Color::from_hue(1.0 / 3.0);
        assert!((green.g - 1.0).abs() < 1e-12 && green.r.abs() < 1e-12);
        assert_eq!(Color::from_hue(1.0), Color::rgb(1.0, 0.0, 0.0));
    }
}
