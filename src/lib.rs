//! # Pare
//!
//! Vertex-driven editing of polygon meshes.
//!
//! Pare keeps a mesh in an arena-backed half-edge structure, deletes a set of
//! vertices together with every face touching them, compacts the storage,
//! rebuilds a clean triangle mesh from what is left and reports the border
//! loops (holes) the deletion opened.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe indices
//! - **Deferred deletion**: elements are flagged and reclaimed by an explicit
//!   garbage collection pass
//! - **Hole extraction**: border loops with their point lists, filterable by size
//! - **File formats**: OFF, STL, PLY
//!
//! ## Quick Start
//!
//! ```no_run
//! use pare::prelude::*;
//!
//! let mut mesh: HalfEdgeMesh = pare::io::load("data/mesh_test.off").unwrap();
//! let indices = pare::io::read_indices("data/remove.txt", Default::default()).unwrap();
//!
//! let output = carve(&mut mesh, &indices, &CarveOptions::default()).unwrap();
//! println!("{}", output.stats.after_rebuild.labeled("after rebuild"));
//! println!("holes: {}", output.holes.len());
//!
//! pare::io::save(&output.mesh, "carved.off").unwrap();
//! ```
//!
//! ## Step by Step
//!
//! ```
//! use pare::prelude::*;
//! use nalgebra::Point3;
//!
//! // A square fan of four triangles around a center vertex
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 0.0),
//! ];
//! let faces = vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! // Deleting the center removes the whole fan
//! delete_faces_by_vertices(&mut mesh, &[4]).unwrap();
//! assert_eq!(mesh.num_faces(), 0);
//! assert_eq!(mesh.num_vertices(), 4);
//! assert!(!mesh.has_garbage());
//! ```
//!
//! ## Holes
//!
//! ```
//! use pare::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! // An open triangle has one border loop of three edges
//! let cycles = extract_boundary_cycles(&mut mesh);
//! assert_eq!(cycles.len(), 1);
//! assert_eq!(cycles[0].len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

pub use error::{MeshError, Result};

/// Prelude module for convenient imports.
///
/// ```
/// use pare::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::boundary::{
        border_cycles, extract_boundary_cycles, is_standard_hole, BoundaryCycle, HoleFilter,
    };
    pub use crate::algo::delete::delete_faces_by_vertices;
    pub use crate::algo::pipeline::{carve, CarveOptions, CarveOutput, CarveStats};
    pub use crate::algo::rebuild::rebuild;
    pub use crate::algo::TimingHook;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_triangles, to_face_vertex, EdgeId, Face, FaceId,
        HalfEdge, HalfEdgeId, HalfEdgeMesh, MeshIndex, MeshStats, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
