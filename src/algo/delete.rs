//! Vertex-driven deletion.
//!
//! Deleting a vertex removes it together with every face that touches it.
//! Edges left without a face on either side go with them, and the remaining
//! faces around the deleted region get border half-edges that outline the new
//! holes.
//!
//! # Example
//!
//! ```
//! use pare::prelude::*;
//! use pare::algo::delete::delete_faces_by_vertices;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, -1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [1, 0, 3]];
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! delete_faces_by_vertices(&mut mesh, &[2]).unwrap();
//! assert_eq!(mesh.num_vertices(), 3);
//! assert_eq!(mesh.num_faces(), 1);
//! assert!(!mesh.has_garbage());
//! ```

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex, VertexId};

/// Delete the listed vertices and all faces incident to them, then compact.
///
/// Indices are processed in order and refer to the vertex slots as they are
/// when the call starts; slots are not renumbered until every index has been
/// handled. Indices naming an already removed slot, including duplicates
/// within `indices`, are skipped.
///
/// # Errors
///
/// Returns [`MeshError::VertexIndexOutOfRange`] as soon as an index is not
/// below the vertex slot count. Vertices handled before the bad index stay
/// removed and the mesh is *not* compacted, so its removed counts still show
/// what was deleted.
pub fn delete_faces_by_vertices<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    indices: &[usize],
) -> Result<()> {
    remove_vertices_and_faces(mesh, indices)?;
    mesh.collect_garbage();
    Ok(())
}

/// Mark-phase half of [`delete_faces_by_vertices`]: removes the vertices and
/// their faces without compacting storage.
///
/// Returns the number of vertices actually removed by this call.
pub fn remove_vertices_and_faces<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    indices: &[usize],
) -> Result<usize> {
    let slots = mesh.num_vertex_slots();
    let faces_before = mesh.num_removed_faces();
    let mut removed = 0;
    let mut fan: Vec<FaceId<I>> = Vec::new();

    for &index in indices {
        if index >= slots {
            log::debug!(
                "vertex index {} out of range after removing {} vertices",
                index,
                removed
            );
            return Err(MeshError::VertexIndexOutOfRange { index, len: slots });
        }

        let v = VertexId::new(index);
        if !mesh.contains_vertex(v) {
            log::trace!("vertex {} already removed, skipping", index);
            continue;
        }

        // The fan changes as faces go, so snapshot it first.
        fan.clear();
        fan.extend(mesh.vertex_faces(v));
        for &f in &fan {
            mesh.remove_face(f);
        }

        mesh.remove_vertex(v);
        removed += 1;
    }

    log::debug!(
        "removed {} vertices and {} faces",
        removed,
        mesh.num_removed_faces() - faces_before
    );
    Ok(removed)
}
