//! Compaction of removed elements.

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// Old slot index -> new slot index, `usize::MAX` for removed slots.
struct IndexMap(Vec<usize>);

impl IndexMap {
    fn build<T>(items: &[T], removed: impl Fn(&T) -> bool) -> Self {
        let mut next = 0;
        let map = items
            .iter()
            .map(|item| {
                if removed(item) {
                    usize::MAX
                } else {
                    next += 1;
                    next - 1
                }
            })
            .collect();
        Self(map)
    }

    /// New index for a reference; removed or null targets become `None`.
    #[inline]
    fn get(&self, old: usize) -> Option<usize> {
        self.0.get(old).copied().filter(|&i| i != usize::MAX)
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Physically drop every removed element and renumber the survivors.
    ///
    /// Live elements keep their relative order. All stored references are
    /// rewritten to the new numbering; a reference to a removed element
    /// becomes null. Afterwards every removed count is zero and every slot is
    /// live. Calling this on a mesh without garbage does nothing, so any
    /// index obtained since the last compaction stays valid.
    pub fn collect_garbage(&mut self) {
        if !self.has_garbage() {
            return;
        }

        let before = (
            self.num_vertex_slots(),
            self.num_halfedge_slots(),
            self.num_face_slots(),
        );

        let vmap = IndexMap::build(&self.vertices, |v| v.removed);
        let hmap = IndexMap::build(&self.halfedges, |h| h.removed);
        let fmap = IndexMap::build(&self.faces, |f| f.removed);

        let remap_v = |v: VertexId<I>| {
            v.valid()
                .and_then(|v| vmap.get(v.index()))
                .map_or(VertexId::null(), VertexId::new)
        };
        let remap_h = |h: HalfEdgeId<I>| {
            h.valid()
                .and_then(|h| hmap.get(h.index()))
                .map_or(HalfEdgeId::null(), HalfEdgeId::new)
        };
        let remap_f = |f: FaceId<I>| {
            f.valid()
                .and_then(|f| fmap.get(f.index()))
                .map_or(FaceId::null(), FaceId::new)
        };

        self.vertices.retain(|v| !v.removed);
        for v in &mut self.vertices {
            v.halfedge = remap_h(v.halfedge);
        }

        self.halfedges.retain(|h| !h.removed);
        for h in &mut self.halfedges {
            h.vertex = remap_v(h.vertex);
            h.twin = remap_h(h.twin);
            h.next = remap_h(h.next);
            h.prev = remap_h(h.prev);
            h.face = remap_f(h.face);
        }

        self.faces.retain(|f| !f.removed);
        for f in &mut self.faces {
            f.halfedge = remap_h(f.halfedge);
        }

        self.removed_vertices = 0;
        self.removed_halfedges = 0;
        self.removed_faces = 0;

        log::debug!(
            "collected garbage: vertices {} -> {}, half-edges {} -> {}, faces {} -> {}",
            before.0,
            self.vertices.len(),
            before.1,
            self.halfedges.len(),
            before.2,
            self.faces.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use crate::mesh::{build_from_triangles, FaceId, HalfEdgeMesh, VertexId};

    /// A 3x3 grid of vertices split into 8 triangles.
    fn grid() -> HalfEdgeMesh {
        let mut vertices = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                vertices.push(Point3::new(x as f64, y as f64, 0.0));
            }
        }
        let mut faces = Vec::new();
        for y in 0..2 {
            for x in 0..2 {
                let a = y * 3 + x;
                faces.push([a, a + 1, a + 4]);
                faces.push([a, a + 4, a + 3]);
            }
        }
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_noop_without_garbage() {
        let mut mesh = grid();
        let before = format!("{:?}", mesh);
        mesh.collect_garbage();
        assert_eq!(format!("{:?}", mesh), before);
    }

    #[test]
    fn test_compacts_and_preserves_order() {
        let mut mesh = grid();
        mesh.remove_face(FaceId::new(0));
        mesh.remove_face(FaceId::new(1));
        // Vertex 0 only touched the two removed faces.
        assert!(mesh.is_isolated(VertexId::new(0)));
        mesh.remove_vertex(VertexId::new(0));

        let positions: Vec<_> = mesh.vertices().map(|(_, v)| v.position).collect();
        let corners: Vec<Vec<_>> = mesh
            .face_ids()
            .map(|f| mesh.face_vertices(f).map(|v| *mesh.position(v)).collect())
            .collect();
        let (edges, faces) = (mesh.num_edges(), mesh.num_faces());

        mesh.collect_garbage();

        assert!(!mesh.has_garbage());
        assert_eq!(mesh.num_removed_vertices(), 0);
        assert_eq!(mesh.num_removed_halfedges(), 0);
        assert_eq!(mesh.num_removed_faces(), 0);
        assert_eq!(mesh.num_vertex_slots(), 8);
        assert_eq!(mesh.num_face_slots(), faces);
        assert_eq!(mesh.num_halfedge_slots(), edges * 2);

        let after_positions: Vec<_> = mesh.vertices().map(|(_, v)| v.position).collect();
        assert_eq!(after_positions, positions);
        let after_corners: Vec<Vec<_>> = mesh
            .face_ids()
            .map(|f| mesh.face_vertices(f).map(|v| *mesh.position(v)).collect())
            .collect();
        assert_eq!(after_corners, corners);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_idempotent() {
        let mut mesh = grid();
        mesh.remove_face(FaceId::new(3));
        mesh.collect_garbage();
        let once = format!("{:?}", mesh);
        mesh.collect_garbage();
        assert_eq!(format!("{:?}", mesh), once);
    }

    #[test]
    fn test_everything_removed() {
        let mut mesh = grid();
        for f in 0..8 {
            mesh.remove_face(FaceId::new(f));
        }
        for v in 0..9 {
            mesh.remove_vertex(VertexId::new(v));
        }
        mesh.collect_garbage();

        assert_eq!(mesh.num_vertex_slots(), 0);
        assert_eq!(mesh.num_halfedge_slots(), 0);
        assert_eq!(mesh.num_face_slots(), 0);
        assert!(mesh.is_valid());
    }
}
