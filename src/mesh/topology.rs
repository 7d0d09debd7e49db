//! Connectivity editing: adding and removing vertices and faces.
//!
//! These operations only set flags and rewire links. They never shrink or
//! reorder storage, so every index handed out stays valid (possibly pointing
//! at a removed slot) until [`HalfEdgeMesh::collect_garbage`] runs.
//!
//! Border loops are kept consistent at every step: after any mutation each
//! border half-edge's `next` is the border half-edge that continues the same
//! hole around its target vertex.

use nalgebra::Point3;

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh, Vertex};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// How a new face attaches at one of its corners.
#[derive(Debug, Clone, Copy)]
enum CornerSplice<I: MeshIndex> {
    /// Both sides are new and the vertex has no edges yet.
    Isolated,
    /// Both sides are new; the face is inserted into the hole that runs
    /// from border `prev` into the vertex and out along border `out`.
    IntoHole {
        prev: HalfEdgeId<I>,
        out: HalfEdgeId<I>,
    },
    /// The incoming side exists; the hole used to continue along `out`.
    ExistingIn { out: HalfEdgeId<I> },
    /// The outgoing side exists; the hole used to arrive along `prev`.
    ExistingOut { prev: HalfEdgeId<I> },
    /// Both sides exist and already follow each other around the hole.
    Closed,
    /// Both sides exist but the hole continues elsewhere between them.
    Rejoin {
        prev: HalfEdgeId<I>,
        out: HalfEdgeId<I>,
    },
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Add a new isolated vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Add a triangle `v0 -> v1 -> v2`.
    ///
    /// Sides that already exist as border half-edges are reused; new sides get
    /// a fresh edge whose outer half-edge joins the surrounding border loop.
    /// On error the mesh is left untouched.
    pub fn add_face(
        &mut self,
        v0: VertexId<I>,
        v1: VertexId<I>,
        v2: VertexId<I>,
    ) -> Result<FaceId<I>> {
        self.add_polygon(&[v0, v1, v2])
    }

    /// Add a polygonal face through `corners` in order.
    ///
    /// # Errors
    ///
    /// - [`MeshError::InvalidVertexIndex`] for an out-of-range or removed corner
    /// - [`MeshError::DegenerateFace`] for fewer than three or repeated corners
    /// - [`MeshError::NonManifoldEdge`] if a side already has a face on this side
    /// - [`MeshError::NonManifold`] if a corner's fan is already closed
    pub fn add_polygon(&mut self, corners: &[VertexId<I>]) -> Result<FaceId<I>> {
        let n = corners.len();
        let face_index = self.faces.len();

        for &v in corners {
            if !self.contains_vertex(v) {
                return Err(MeshError::InvalidVertexIndex {
                    face: face_index,
                    vertex: v.index(),
                });
            }
        }
        if n < 3 {
            return Err(MeshError::DegenerateFace { face: face_index });
        }
        for i in 0..n {
            if corners[i + 1..].contains(&corners[i]) {
                return Err(MeshError::DegenerateFace { face: face_index });
            }
        }

        // Side i runs corners[i] -> corners[i + 1]. Existing sides must be borders.
        let mut sides: Vec<Option<HalfEdgeId<I>>> = Vec::with_capacity(n);
        for i in 0..n {
            let (a, b) = (corners[i], corners[(i + 1) % n]);
            let existing = self.find_halfedge(a, b);
            if let Some(he) = existing {
                if !self.is_boundary_halfedge(he) {
                    return Err(MeshError::NonManifoldEdge {
                        v0: a.index(),
                        v1: b.index(),
                    });
                }
            }
            sides.push(existing);
        }

        // Read every splice before touching any link.
        let mut splices = Vec::with_capacity(n);
        for i in 0..n {
            let v = corners[i];
            let incoming = sides[(i + n - 1) % n];
            let outgoing = sides[i];

            let splice = match (incoming, outgoing) {
                (None, None) => {
                    let out = self.vertex(v).halfedge;
                    if out.is_null() {
                        CornerSplice::Isolated
                    } else if !self.is_boundary_halfedge(out) {
                        return Err(MeshError::NonManifold {
                            details: format!(
                                "vertex {} has a closed fan and cannot take face {}",
                                v.index(),
                                face_index
                            ),
                        });
                    } else {
                        CornerSplice::IntoHole {
                            prev: self.prev(out),
                            out,
                        }
                    }
                }
                (Some(h_in), None) => CornerSplice::ExistingIn { out: self.next(h_in) },
                (None, Some(h_out)) => CornerSplice::ExistingOut { prev: self.prev(h_out) },
                (Some(h_in), Some(h_out)) => {
                    if self.next(h_in) == h_out {
                        CornerSplice::Closed
                    } else {
                        CornerSplice::Rejoin {
                            prev: self.prev(h_out),
                            out: self.next(h_in),
                        }
                    }
                }
            };
            splices.push(splice);
        }

        let face = FaceId::new(face_index);
        let inner: Vec<HalfEdgeId<I>> = (0..n)
            .map(|i| match sides[i] {
                Some(he) => he,
                None => self.new_edge(corners[i], corners[(i + 1) % n]),
            })
            .collect();

        for i in 0..n {
            self.halfedge_mut(inner[i]).face = face;
            self.set_next(inner[i], inner[(i + 1) % n]);
        }
        // Start the face loop at the side ending in corners[0] so that
        // face_vertices() reports the corners in the order given.
        self.faces.push(Face::new(inner[n - 1]));

        for i in 0..n {
            let h_in = inner[(i + n - 1) % n];
            let h_out = inner[i];
            // Outer half-edges of new sides: one leaves the corner, one enters it.
            let outer_leaving = self.twin(h_in);
            let outer_entering = self.twin(h_out);

            match splices[i] {
                CornerSplice::Isolated => {
                    self.set_next(outer_entering, outer_leaving);
                }
                CornerSplice::IntoHole { prev, out } => {
                    self.set_next(prev, outer_leaving);
                    self.set_next(outer_entering, out);
                }
                CornerSplice::ExistingIn { out } => {
                    self.set_next(outer_entering, out);
                }
                CornerSplice::ExistingOut { prev } => {
                    self.set_next(prev, outer_leaving);
                }
                CornerSplice::Closed => {}
                CornerSplice::Rejoin { prev, out } => {
                    self.set_next(prev, out);
                }
            }
        }

        for i in 0..n {
            self.adjust_outgoing_halfedge(corners[i], inner[i]);
        }

        log::trace!("added face {} with {} corners", face_index, n);
        Ok(face)
    }

    /// Remove a face, turning its sides into border half-edges.
    ///
    /// Sides whose twin was already a border are removed together with their
    /// twin. Vertices that lose their last edge become isolated; they are not
    /// removed. Removing a face that is out of range or already removed does
    /// nothing.
    pub fn remove_face(&mut self, f: FaceId<I>) {
        if !self.contains_face(f) {
            return;
        }

        let end = self.face(f).halfedge;
        let mut h = end;
        loop {
            self.halfedge_mut(h).face = FaceId::null();
            let nh = self.next(h);
            let v = self.target(h);
            let h_border = self.is_boundary_halfedge(self.twin(h));
            let nh_border = self.is_boundary_halfedge(self.twin(nh));

            match (h_border, nh_border) {
                (true, true) if self.next(self.twin(nh)) == self.twin(h) => {
                    // The face was the only thing left around v.
                    self.vertex_mut(v).halfedge = HalfEdgeId::null();
                    if h != end {
                        self.remove_edge(h);
                    }
                }
                (true, true) => {
                    // Both sides go; the two holes meeting at v merge.
                    let prev = self.prev(self.twin(h));
                    let out = self.next(self.twin(nh));
                    self.set_next(prev, out);
                    self.vertex_mut(v).halfedge = out;
                    if h != end {
                        self.remove_edge(h);
                    }
                }
                (false, true) => {
                    let out = self.next(self.twin(nh));
                    self.set_next(h, out);
                    self.vertex_mut(v).halfedge = out;
                }
                (true, false) => {
                    let prev = self.prev(self.twin(h));
                    self.set_next(prev, nh);
                    self.vertex_mut(v).halfedge = nh;
                    if h != end {
                        self.remove_edge(h);
                    }
                }
                (false, false) => {
                    self.vertex_mut(v).halfedge = nh;
                }
            }

            h = nh;
            if h == end {
                break;
            }
        }

        if self.is_boundary_halfedge(self.twin(end)) {
            self.remove_edge(end);
        }

        self.face_mut(f).removed = true;
        self.removed_faces += 1;
        log::trace!("removed face {}", f.index());
    }

    /// Mark a vertex as removed.
    ///
    /// The caller detaches every incident face first; a vertex that still has
    /// edges leaves them pointing at a removed slot. Out-of-range or already
    /// removed vertices are ignored.
    pub fn remove_vertex(&mut self, v: VertexId<I>) {
        if !self.contains_vertex(v) {
            return;
        }
        if !self.is_isolated(v) {
            log::warn!("removing vertex {} while it still has incident edges", v.index());
        }

        let vertex = self.vertex_mut(v);
        vertex.removed = true;
        vertex.halfedge = HalfEdgeId::null();
        self.removed_vertices += 1;
        log::trace!("removed vertex {}", v.index());
    }

    /// Allocate an unlinked edge `from -> to` and return the half-edge
    /// pointing at `to`. Its twin is the next slot.
    fn new_edge(&mut self, from: VertexId<I>, to: VertexId<I>) -> HalfEdgeId<I> {
        let h = HalfEdgeId::new(self.halfedges.len());
        let t = HalfEdgeId::new(self.halfedges.len() + 1);

        self.halfedges.push(HalfEdge {
            vertex: to,
            twin: t,
            ..HalfEdge::new()
        });
        self.halfedges.push(HalfEdge {
            vertex: from,
            twin: h,
            ..HalfEdge::new()
        });
        h
    }

    /// Mark both half-edges of an edge removed.
    fn remove_edge(&mut self, h: HalfEdgeId<I>) {
        if self.halfedge(h).removed {
            return;
        }
        let t = self.twin(h);
        self.halfedge_mut(h).removed = true;
        self.halfedge_mut(t).removed = true;
        self.removed_halfedges += 2;
    }

    #[inline]
    fn set_next(&mut self, h: HalfEdgeId<I>, next: HalfEdgeId<I>) {
        self.halfedge_mut(h).next = next;
        self.halfedge_mut(next).prev = h;
    }

    /// Point `v` at a border half-edge if it has one, else at `fallback`.
    fn adjust_outgoing_halfedge(&mut self, v: VertexId<I>, fallback: HalfEdgeId<I>) {
        if self.vertex(v).halfedge.is_null() {
            self.vertex_mut(v).halfedge = fallback;
        }

        let limit = self.halfedges.len();
        let border = self
            .vertex_halfedges(v)
            .take(limit)
            .find(|&he| self.is_boundary_halfedge(he));
        if let Some(he) = border {
            self.vertex_mut(v).halfedge = he;
        }
    }
}
