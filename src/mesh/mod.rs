//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation and the editing
//! operations that keep it consistent.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], a polygon mesh stored as a half-edge
//! (doubly-connected edge list) structure with O(1) adjacency queries. Holes
//! are represented explicitly: border half-edges have no face and are linked
//! into one loop per hole.
//!
//! # Deferred Deletion
//!
//! Removing a face or vertex only marks it. Slots stay in place, so indices
//! remain stable through a batch of edits, until
//! [`HalfEdgeMesh::collect_garbage`] compacts storage and renumbers the
//! survivors in their original relative order.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//! - [`EdgeId`] - Identifies a full edge
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use pare::mesh::{HalfEdgeMesh, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! let f = mesh.face_ids().next().unwrap();
//! mesh.remove_face(f);
//! assert_eq!(mesh.num_faces(), 0);
//! assert_eq!(mesh.num_removed_faces(), 1);
//!
//! mesh.collect_garbage();
//! assert_eq!(mesh.num_face_slots(), 0);
//! ```

mod builder;
mod garbage;
mod halfedge;
mod index;
mod stats;
mod topology;

pub use builder::{
    build_from_polygons, build_from_triangles, to_face_vertex, to_triangles, triangulate_fan,
};
pub use halfedge::{Face, HalfEdge, HalfEdgeMesh, LoopIter, Vertex, VertexHalfEdgeIter};
pub use index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use stats::{Labeled, MeshStats};
