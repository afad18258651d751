//! Edge and vertex adjacency derived from a face list.
//!
//! Edges are stored in an arena and looked up by the unordered pair of their
//! endpoint ids, so `edge_between(a, b)` and `edge_between(b, a)` agree and
//! cost one hash lookup.
//!
//! The first face that walks an edge becomes its `face1` and fixes the edge
//! direction `v1 -> v2`; on a consistently wound mesh the second face walks
//! it `v2 -> v1` and becomes `face2`. A third face is rejected.

use std::collections::HashMap;

use super::index::{EdgeId, EdgeKey, FaceId, MeshIndex, VertexId};
use super::polygon::Face;
use crate::error::{MeshError, Result};

/// An edge between two vertices with up to two incident faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<I: MeshIndex = u32> {
    /// Start vertex, in the winding of `face1`.
    pub v1: VertexId<I>,
    /// End vertex, in the winding of `face1`.
    pub v2: VertexId<I>,
    /// The face that created the edge.
    pub face1: FaceId<I>,
    /// The second face, invalid for boundary edges.
    pub face2: FaceId<I>,
}

impl<I: MeshIndex> Edge<I> {
    /// Whether only one face borders this edge.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face2.is_valid()
    }

    /// Whether `v` is one of the endpoints.
    #[inline]
    pub fn has_vertex(&self, v: VertexId<I>) -> bool {
        self.v1 == v || self.v2 == v
    }

    /// The endpoint that is not `v`.
    #[inline]
    pub fn other(&self, v: VertexId<I>) -> VertexId<I> {
        if self.v1 == v {
            self.v2
        } else {
            self.v1
        }
    }

    /// The face assigned to `v` by edge orientation: `face1` for `v1`,
    /// `face2` for `v2`.
    ///
    /// Walking every edge around an interior vertex this way visits each
    /// incident face once. The result is invalid for the `v2` end of a
    /// boundary edge.
    #[inline]
    pub fn face_for(&self, v: VertexId<I>) -> FaceId<I> {
        if self.v2 == v {
            self.face2
        } else {
            self.face1
        }
    }

    /// Iterate over the valid incident faces.
    pub fn faces(&self) -> impl Iterator<Item = FaceId<I>> {
        [self.face1, self.face2].into_iter().filter(|f| f.is_valid())
    }
}

/// Adjacency index of a face list.
#[derive(Debug, Clone, Default)]
pub struct Adjacency<I: MeshIndex = u32> {
    edges: Vec<Edge<I>>,
    lookup: HashMap<EdgeKey<I>, EdgeId<I>>,
    vertex_edges: Vec<Vec<EdgeId<I>>>,
}

impl<I: MeshIndex> Adjacency<I> {
    /// Build the adjacency of `faces` over a pool of `num_vertices` vertices.
    ///
    /// Runs in time linear in the total number of face corners. Fails on
    /// faces with fewer than three vertices or with repeated consecutive
    /// vertices, on vertex ids outside the pool, and on edges claimed by a
    /// third face.
    pub fn build(num_vertices: usize, faces: &[Face<I>]) -> Result<Self> {
        let corners: usize = faces.iter().map(Face::len).sum();
        let mut adjacency = Self {
            edges: Vec::with_capacity(corners / 2 + 1),
            lookup: HashMap::with_capacity(corners / 2 + 1),
            vertex_edges: vec![Vec::new(); num_vertices],
        };

        for (fi, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::DegenerateFace {
                    face: fi,
                    count: face.len(),
                });
            }
            if let Some(&bad) = face.vertices.iter().find(|v| v.index() >= num_vertices) {
                return Err(MeshError::InvalidVertexIndex {
                    face: fi,
                    vertex: bad.index(),
                });
            }

            let fid = FaceId::new(fi);
            for (a, b) in face.edges() {
                if a == b {
                    return Err(MeshError::DegenerateFace {
                        face: fi,
                        count: face.len(),
                    });
                }
                adjacency.bind(a, b, fid)?;
            }
        }

        log::trace!(
            "adjacency: {} faces, {} edges, {} vertices",
            faces.len(),
            adjacency.edges.len(),
            num_vertices
        );
        Ok(adjacency)
    }

    fn bind(&mut self, a: VertexId<I>, b: VertexId<I>, face: FaceId<I>) -> Result<()> {
        let key = EdgeKey::new(a, b);
        if let Some(&e) = self.lookup.get(&key) {
            let edge = &mut self.edges[e.index()];
            if edge.face2.is_valid() {
                return Err(MeshError::NonManifoldEdge {
                    v0: a.index(),
                    v1: b.index(),
                    face: face.index(),
                });
            }
            edge.face2 = face;
        } else {
            let e = EdgeId::new(self.edges.len());
            self.edges.push(Edge {
                v1: a,
                v2: b,
                face1: face,
                face2: FaceId::invalid(),
            });
            self.lookup.insert(key, e);
            self.vertex_edges[a.index()].push(e);
            self.vertex_edges[b.index()].push(e);
        }
        Ok(())
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get an edge by id.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Iterate over all edges with their ids.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId<I>, &Edge<I>)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// The edge joining `a` and `b`, in either direction.
    #[inline]
    pub fn edge_between(&self, a: VertexId<I>, b: VertexId<I>) -> Option<EdgeId<I>> {
        self.lookup.get(&EdgeKey::new(a, b)).copied()
    }

    /// Edges incident to `v`.
    #[inline]
    pub fn vertex_edges(&self, v: VertexId<I>) -> &[EdgeId<I>] {
        self.vertex_edges
            .get(v.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of edges incident to `v`.
    #[inline]
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_edges(v).len()
    }

    /// Whether an edge has only one incident face.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        self.edge(e).is_boundary()
    }

    /// Whether `v` lies on a boundary edge.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        self.vertex_edges(v)
            .iter()
            .any(|&e| self.is_boundary_edge(e))
    }

    /// Iterate over the boundary edges.
    pub fn boundary_edges(&self) -> impl Iterator<Item = (EdgeId<I>, &Edge<I>)> + '_ {
        self.edges().filter(|(_, e)| e.is_boundary())
    }

    /// Faces around `v`, one per incident edge chosen by orientation.
    ///
    /// Boundary gaps are skipped, so an open fan yields one face fewer than
    /// its valence.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_edges(v)
            .iter()
            .map(move |&e| self.edge(e).face_for(v))
            .filter(|f| f.is_valid())
    }
}
