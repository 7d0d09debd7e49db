//! Half-edge mesh storage.
//!
//! The mesh is three arenas (vertices, half-edges, faces) of plain records
//! whose links are indices into the arenas. Each record carries a `removed`
//! flag: editing operations only set flags and rewire links, and the slots
//! stay where they are until [`HalfEdgeMesh::collect_garbage`] compacts the
//! storage.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite
//!   directions, allocated as a pair (`2e`, `2e + 1`) and removed together
//! - Each half-edge knows its **target** vertex, its **twin**, the **next**
//!   and **prev** half-edges around its face, and its incident **face**
//! - Each vertex stores one outgoing half-edge, a border one when it has any
//! - Each face stores one half-edge of its face loop
//!
//! # Boundary Handling
//!
//! Border half-edges have a null face. Their `next`/`prev` links chain them
//! into border loops, one per hole, so the same traversal that walks a face
//! loop walks a hole outline.

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex, null for isolated vertices.
    /// For boundary vertices this is a border half-edge.
    pub halfedge: HalfEdgeId<I>,

    /// Set once the vertex has been deleted; the slot lives until compaction.
    pub removed: bool,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new isolated vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::null(),
            removed: false,
        }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge points to.
    pub vertex: VertexId<I>,

    /// The opposite half-edge.
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face, or around the hole for borders.
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face or hole.
    pub prev: HalfEdgeId<I>,

    /// The face this half-edge belongs to. Null for border half-edges.
    pub face: FaceId<I>,

    /// Set once the edge has been deleted.
    pub removed: bool,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new unlinked half-edge.
    pub fn new() -> Self {
        Self {
            vertex: VertexId::null(),
            twin: HalfEdgeId::null(),
            next: HalfEdgeId::null(),
            prev: HalfEdgeId::null(),
            face: FaceId::null(),
            removed: false,
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.face.is_null()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge of the face loop.
    pub halfedge: HalfEdgeId<I>,

    /// Set once the face has been deleted.
    pub removed: bool,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self {
            halfedge,
            removed: false,
        }
    }
}

impl<I: MeshIndex> Default for Face<I> {
    fn default() -> Self {
        Self::new(HalfEdgeId::null())
    }
}

/// A half-edge polygon mesh with deferred deletion.
///
/// Counts come in three flavors: live elements (`num_*`), elements marked
/// removed but still occupying a slot (`num_removed_*`), and the storage
/// size (`num_*_slots`), which is what index validity is measured against.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    /// Vertex storage, live and removed.
    pub(crate) vertices: Vec<Vertex<I>>,

    /// Half-edge storage, live and removed.
    pub(crate) halfedges: Vec<HalfEdge<I>>,

    /// Face storage, live and removed.
    pub(crate) faces: Vec<Face<I>>,

    pub(crate) removed_vertices: usize,
    pub(crate) removed_halfedges: usize,
    pub(crate) removed_faces: usize,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
            removed_vertices: 0,
            removed_halfedges: 0,
            removed_faces: 0,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Closed triangle mesh: E = 3F/2, so HE = 3F. Leave room for borders.
        let num_halfedges = num_faces * 3 + num_faces / 2;

        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
            removed_vertices: 0,
            removed_halfedges: 0,
            removed_faces: 0,
        }
    }

    // ==================== Counts ====================

    /// Number of live vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() - self.removed_vertices
    }

    /// Number of live half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len() - self.removed_halfedges
    }

    /// Number of live edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.num_halfedges() / 2
    }

    /// Number of live faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len() - self.removed_faces
    }

    /// Number of vertices marked removed and not yet compacted.
    #[inline]
    pub fn num_removed_vertices(&self) -> usize {
        self.removed_vertices
    }

    /// Number of half-edges marked removed and not yet compacted.
    #[inline]
    pub fn num_removed_halfedges(&self) -> usize {
        self.removed_halfedges
    }

    /// Number of edges marked removed and not yet compacted.
    #[inline]
    pub fn num_removed_edges(&self) -> usize {
        self.removed_halfedges / 2
    }

    /// Number of faces marked removed and not yet compacted.
    #[inline]
    pub fn num_removed_faces(&self) -> usize {
        self.removed_faces
    }

    /// Vertex storage size, live plus removed.
    #[inline]
    pub fn num_vertex_slots(&self) -> usize {
        self.vertices.len()
    }

    /// Half-edge storage size, live plus removed.
    #[inline]
    pub fn num_halfedge_slots(&self) -> usize {
        self.halfedges.len()
    }

    /// Face storage size, live plus removed.
    #[inline]
    pub fn num_face_slots(&self) -> usize {
        self.faces.len()
    }

    /// `true` if any element is marked removed.
    #[inline]
    pub fn has_garbage(&self) -> bool {
        self.removed_vertices > 0 || self.removed_halfedges > 0 || self.removed_faces > 0
    }

    // ==================== Accessors ====================

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub(crate) fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a mutable half-edge by ID.
    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get a mutable face by ID.
    #[inline]
    pub(crate) fn face_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        &mut self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// `true` if `v` is in range and not removed.
    #[inline]
    pub fn contains_vertex(&self, v: VertexId<I>) -> bool {
        v.is_valid() && v.index() < self.vertices.len() && !self.vertices[v.index()].removed
    }

    /// `true` if `he` is in range and not removed.
    #[inline]
    pub fn contains_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        he.is_valid() && he.index() < self.halfedges.len() && !self.halfedges[he.index()].removed
    }

    /// `true` if `f` is in range and not removed.
    #[inline]
    pub fn contains_face(&self, f: FaceId<I>) -> bool {
        f.is_valid() && f.index() < self.faces.len() && !self.faces[f.index()].removed
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face or hole.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face or hole.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the vertex a half-edge points to.
    #[inline]
    pub fn target(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).vertex
    }

    /// Get the vertex a half-edge starts from.
    #[inline]
    pub fn source(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.target(self.twin(he))
    }

    /// Get the face of a half-edge (null on the boundary).
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if an edge (represented by one of its half-edges) is on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, he: HalfEdgeId<I>) -> bool {
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he))
    }

    /// `true` if the vertex has no incident edge.
    #[inline]
    pub fn is_isolated(&self, v: VertexId<I>) -> bool {
        self.vertex(v).halfedge.is_null()
    }

    /// Check if a vertex is on the boundary.
    ///
    /// Relies on the invariant that a boundary vertex keeps a border half-edge
    /// as its outgoing reference. Isolated vertices count as boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        let he = self.vertex(v).halfedge;
        he.is_null() || self.is_boundary_halfedge(he)
    }

    /// Find the half-edge going from `from` to `to`, if the edge exists.
    pub fn find_halfedge(&self, from: VertexId<I>, to: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.vertex_halfedges(from).find(|&he| self.target(he) == to)
    }

    // ==================== Iteration ====================

    /// Iterate over live vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.removed)
            .map(|(i, _)| VertexId::new(i))
    }

    /// Iterate over live vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.removed)
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over live half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .filter(|(_, he)| !he.removed)
            .map(|(i, _)| HalfEdgeId::new(i))
    }

    /// Iterate over live half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .filter(|(_, he)| !he.removed)
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over live border half-edges.
    pub fn boundary_halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedges()
            .filter(|(_, he)| he.is_boundary())
            .map(|(id, _)| id)
    }

    /// Iterate over live face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.removed)
            .map(|(i, _)| FaceId::new(i))
    }

    /// Iterate over live faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.removed)
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// Iterate over outgoing half-edges around a vertex.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.target(he))
    }

    /// Iterate over faces adjacent to a vertex.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_halfedges(v).filter_map(|he| self.face_of(he).valid())
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> LoopIter<'_, I> {
        LoopIter::new(self, self.face(f).halfedge)
    }

    /// Iterate over the `next` loop starting at any half-edge.
    ///
    /// For a border half-edge this walks the hole it bounds.
    pub fn halfedge_loop(&self, start: HalfEdgeId<I>) -> LoopIter<'_, I> {
        LoopIter::new(self, start)
    }

    /// Iterate over vertices of a face in face-loop order.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.target(he))
    }

    /// Number of corners of a face.
    pub fn face_degree(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    /// `true` if every live face has exactly three corners.
    pub fn is_triangle_mesh(&self) -> bool {
        self.face_ids().all(|f| self.face_degree(f) == 3)
    }

    // ==================== Geometry ====================

    /// Compute the normal of a face (Newell's method, any polygon).
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        self.face_vector_area(f).normalize()
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        self.face_vector_area(f).norm()
    }

    fn face_vector_area(&self, f: FaceId<I>) -> Vector3<f64> {
        let points: Vec<Point3<f64>> = self.face_vertices(f).map(|v| *self.position(v)).collect();
        let mut sum = Vector3::zeros();
        for (i, p) in points.iter().enumerate() {
            let q = points[(i + 1) % points.len()];
            sum += p.coords.cross(&q.coords);
        }
        sum * 0.5
    }

    /// Compute the bounding box of the live vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut live = self.vertices().map(|(_, v)| v.position);
        let first = live.next()?;

        let (mut min, mut max) = (first, first);
        for p in live {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    // ==================== Validation ====================

    /// Check if the live part of the mesh is consistent.
    ///
    /// Verifies that no live element references a removed one, that twin,
    /// next and prev links are reciprocal, that consecutive half-edges meet at
    /// a vertex, and that every face and border loop closes.
    pub fn is_valid(&self) -> bool {
        for (vid, v) in self.vertices() {
            if v.halfedge.is_valid() {
                if !self.contains_halfedge(v.halfedge) || self.source(v.halfedge) != vid {
                    return false;
                }
            }
        }

        for (heid, he) in self.halfedges() {
            if !self.contains_vertex(he.vertex)
                || !self.contains_halfedge(he.twin)
                || !self.contains_halfedge(he.next)
                || !self.contains_halfedge(he.prev)
            {
                return false;
            }
            if he.twin == heid || self.twin(he.twin) != heid || he.twin.edge() != heid.edge() {
                return false;
            }
            if self.prev(he.next) != heid || self.next(he.prev) != heid {
                return false;
            }
            if self.source(he.next) != he.vertex {
                return false;
            }
            if he.face.is_valid() {
                if !self.contains_face(he.face) || self.face_of(he.next) != he.face {
                    return false;
                }
            } else if !self.is_boundary_halfedge(he.next) {
                return false;
            }
        }

        for (fid, f) in self.faces() {
            if !self.contains_halfedge(f.halfedge) || self.face_of(f.halfedge) != fid {
                return false;
            }
        }

        // Every loop must close within the number of live half-edges.
        let limit = self.num_halfedges();
        for (heid, _) in self.halfedges() {
            if self.halfedge_loop(heid).take(limit + 1).count() > limit {
                return false;
            }
        }

        true
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: start.is_null(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // he leaves v, so twin(he) enters v and next(twin(he)) leaves v again.
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over a `next` loop: a face loop or a border loop.
pub struct LoopIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> LoopIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, start: HalfEdgeId<I>) -> Self {
        Self {
            mesh,
            start,
            current: start,
            done: start.is_null(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for LoopIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
