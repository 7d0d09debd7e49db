//! The full carve pipeline: delete, compact, rebuild, extract holes.
//!
//! # Example
//!
//! ```
//! use pare::prelude::*;
//! use pare::algo::pipeline::{carve, CarveOptions};
//! use pare::algo::boundary::HoleFilter;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(1.0, 0.0, 1.0),
//!     Point3::new(1.0, 1.0, 1.0),
//!     Point3::new(0.0, 1.0, 1.0),
//! ];
//! let faces = vec![
//!     [0, 3, 1], [3, 2, 1], [4, 5, 6], [4, 6, 7],
//!     [0, 1, 4], [1, 5, 4], [3, 7, 6], [3, 6, 2],
//!     [0, 4, 3], [4, 7, 3], [1, 2, 6], [1, 6, 5],
//! ];
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let options = CarveOptions::default().with_hole_filter(HoleFilter::default());
//! let output = carve(&mut mesh, &[0], &options).unwrap();
//! assert_eq!(output.mesh.num_faces(), 9);
//! assert_eq!(output.holes.len(), 1);
//! ```

use crate::error::Result;
use crate::mesh::{HalfEdgeMesh, MeshIndex, MeshStats};

use super::boundary::{extract_boundary_cycles, BoundaryCycle, HoleFilter};
use super::delete::remove_vertices_and_faces;
use super::rebuild::rebuild;
use super::timing::{timed, TimingHook};

/// Options for [`carve`].
#[derive(Debug, Default)]
pub struct CarveOptions {
    /// Classify the extracted cycles. Without a filter every cycle is a hole.
    pub hole_filter: Option<HoleFilter>,

    /// Receives the duration of each stage.
    pub timing: Option<TimingHook>,
}

impl CarveOptions {
    /// Classify cycles with `filter`.
    pub fn with_hole_filter(mut self, filter: HoleFilter) -> Self {
        self.hole_filter = Some(filter);
        self
    }

    /// Report stage durations to `hook`.
    pub fn with_timing(mut self, hook: TimingHook) -> Self {
        self.timing = Some(hook);
        self
    }
}

/// Element counts recorded between the stages of [`carve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarveStats {
    /// The input mesh.
    pub input: MeshStats,
    /// After deletion, before compaction. Removed counts show what went.
    pub after_deletion: MeshStats,
    /// After compaction.
    pub after_compaction: MeshStats,
    /// The rebuilt mesh.
    pub after_rebuild: MeshStats,
}

/// Result of [`carve`].
#[derive(Debug, Clone)]
pub struct CarveOutput<I: MeshIndex = u32> {
    /// The rebuilt triangle mesh.
    pub mesh: HalfEdgeMesh<I>,
    /// Cycles accepted by the hole filter, in extraction order.
    pub holes: Vec<BoundaryCycle<I>>,
    /// Cycles the hole filter rejected. Empty without a filter.
    pub rejected: Vec<BoundaryCycle<I>>,
    /// Counts between stages.
    pub stats: CarveStats,
}

/// Delete the vertices in `indices` with their faces, compact `mesh`, rebuild
/// it into a clean triangle mesh and extract the boundary cycles of the
/// result.
///
/// `mesh` is edited in place and is left compacted on success; the rebuilt
/// copy is returned in [`CarveOutput::mesh`].
///
/// # Errors
///
/// - [`crate::error::MeshError::VertexIndexOutOfRange`] from the deletion
///   stage; `mesh` keeps the removals made so far, uncompacted
/// - [`crate::error::MeshError::NonTriangularFace`] from the rebuild stage
pub fn carve<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    indices: &[usize],
    options: &CarveOptions,
) -> Result<CarveOutput<I>> {
    let hook = options.timing.as_ref();
    let input = MeshStats::of(mesh);

    timed(hook, "delete", || remove_vertices_and_faces(mesh, indices))?;
    let after_deletion = MeshStats::of(mesh);

    timed(hook, "compact", || mesh.collect_garbage());
    let after_compaction = MeshStats::of(mesh);

    let mut rebuilt = timed(hook, "rebuild", || rebuild(mesh))?;
    let after_rebuild = MeshStats::of(&rebuilt);

    let cycles = timed(hook, "extract", || extract_boundary_cycles(&mut rebuilt));
    let (holes, rejected) = match &options.hole_filter {
        Some(filter) => filter.partition(cycles),
        None => (cycles, Vec::new()),
    };

    log::info!(
        "carved {} vertices: {} faces remain, {} holes ({} cycles rejected)",
        indices.len(),
        rebuilt.num_faces(),
        holes.len(),
        rejected.len()
    );

    Ok(CarveOutput {
        mesh: rebuilt,
        holes,
        rejected,
        stats: CarveStats {
            input,
            after_deletion,
            after_compaction,
            after_rebuild,
        },
    })
}
