//! Rebuilding a clean triangle mesh from the live part of another mesh.

use std::collections::HashMap;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex, VertexId};

/// Build a fresh mesh from the live vertices and faces of `source`.
///
/// Vertices are copied in storage order and faces are re-inserted one by one,
/// so the result has no removed slots and a freshly derived border structure.
/// The source is not modified and may contain garbage.
///
/// # Errors
///
/// - [`MeshError::NonTriangularFace`] if a live face does not have exactly
///   three corners; the index is the face's slot in `source`
/// - any insertion error from [`HalfEdgeMesh::add_face`], which can only occur
///   if `source` itself is inconsistent
pub fn rebuild<I: MeshIndex>(source: &HalfEdgeMesh<I>) -> Result<HalfEdgeMesh<I>> {
    let mut mesh = HalfEdgeMesh::with_capacity(source.num_vertices(), source.num_faces());

    let mut vmap: HashMap<VertexId<I>, VertexId<I>> = HashMap::with_capacity(source.num_vertices());
    for (vid, v) in source.vertices() {
        vmap.insert(vid, mesh.add_vertex(v.position));
    }

    let mut corners = Vec::with_capacity(3);
    for f in source.face_ids() {
        corners.clear();
        corners.extend(source.face_vertices(f));
        if corners.len() != 3 {
            return Err(MeshError::NonTriangularFace {
                face: f.index(),
                vertices: corners.len(),
            });
        }

        let mapped = |v: VertexId<I>| {
            vmap.get(&v).copied().ok_or(MeshError::InvalidVertexIndex {
                face: f.index(),
                vertex: v.index(),
            })
        };
        mesh.add_face(mapped(corners[0])?, mapped(corners[1])?, mapped(corners[2])?)?;
    }

    log::debug!(
        "rebuilt mesh: {} vertices, {} faces, {} edges",
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.num_edges()
    );
    Ok(mesh)
}
