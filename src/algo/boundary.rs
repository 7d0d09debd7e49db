//! Boundary cycle extraction and hole classification.
//!
//! Every hole in a half-edge mesh is outlined by a closed loop of border
//! half-edges. This module finds those loops, turns them into point lists,
//! and classifies them with a size filter that separates small holes (for
//! example the ones left by deleting a few vertices) from large openings such
//! as the outer rim of an open surface.
//!
//! # Example
//!
//! ```
//! use pare::prelude::*;
//! use pare::algo::boundary::{extract_boundary_cycles, HoleFilter};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//!
//! let cycles = extract_boundary_cycles(&mut mesh);
//! assert_eq!(cycles.len(), 1);
//! assert_eq!(cycles[0].len(), 3);
//!
//! let filter = HoleFilter::new(2.0, 3).unwrap();
//! assert!(filter.accepts(&cycles[0]));
//! ```

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeId, HalfEdgeMesh, MeshIndex};

/// One closed border loop with the positions of its vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCycle<I: MeshIndex = u32> {
    /// Border half-edges in `next` order.
    pub halfedges: Vec<HalfEdgeId<I>>,
    /// Position of the source vertex of each half-edge, in the same order.
    pub points: Vec<Point3<f64>>,
}

impl<I: MeshIndex> BoundaryCycle<I> {
    /// Number of edges (equivalently, vertices) around the loop.
    pub fn len(&self) -> usize {
        self.halfedges.len()
    }

    /// `true` for a cycle with no edges. Extraction never produces one.
    pub fn is_empty(&self) -> bool {
        self.halfedges.is_empty()
    }

    /// Axis-aligned bounding box of the loop's points.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut bbox = BoundingBox::default();
        for p in &self.points {
            bbox.add(p);
        }
        bbox.bounds()
    }

    /// Sum of the edge lengths around the loop.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| (self.points[(i + 1) % n] - self.points[i]).norm())
            .sum()
    }
}

/// Find every border loop of `mesh`.
///
/// Half-edges are scanned in storage order, skipping removed ones; each loop
/// is reported once, starting at its lowest-indexed half-edge. Does not modify
/// the mesh, so the returned IDs are valid for the mesh as it is.
pub fn border_cycles<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Vec<Vec<HalfEdgeId<I>>> {
    let mut visited = vec![false; mesh.num_halfedge_slots()];
    let mut cycles = Vec::new();

    for start in mesh.boundary_halfedge_ids() {
        if visited[start.index()] {
            continue;
        }

        let mut cycle = Vec::new();
        for he in mesh.halfedge_loop(start) {
            if visited[he.index()] {
                log::warn!(
                    "border loop from half-edge {} runs into a visited half-edge",
                    start.index()
                );
                break;
            }
            visited[he.index()] = true;
            cycle.push(he);
        }
        cycles.push(cycle);
    }

    cycles
}

/// Compact `mesh`, then return every border loop with its points.
///
/// The half-edge IDs in the result refer to the compacted mesh.
pub fn extract_boundary_cycles<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Vec<BoundaryCycle<I>> {
    mesh.collect_garbage();

    let cycles: Vec<BoundaryCycle<I>> = border_cycles(mesh)
        .into_iter()
        .map(|halfedges| {
            let points = halfedges
                .iter()
                .map(|&he| *mesh.position(mesh.source(he)))
                .collect();
            BoundaryCycle { halfedges, points }
        })
        .collect();

    log::debug!(
        "extracted {} boundary cycles ({} border edges)",
        cycles.len(),
        cycles.iter().map(|c| c.len()).sum::<usize>()
    );
    cycles
}

/// Decide whether a cycle is a "standard" hole.
///
/// The points are added one at a time to a bounding box, and the cycle is
/// rejected as soon as any axis extent exceeds `max_hole_diameter`. A cycle
/// that stays within the bound is then rejected if it has fewer than
/// `min_hole_edges` edges. Accepting is monotonic: raising the diameter or
/// lowering the edge minimum never turns an accepted cycle into a rejected
/// one.
pub fn is_standard_hole<I: MeshIndex>(
    cycle: &BoundaryCycle<I>,
    max_hole_diameter: f64,
    min_hole_edges: usize,
) -> bool {
    let mut bbox = BoundingBox::default();
    for p in &cycle.points {
        bbox.add(p);
        if bbox.max_extent() > max_hole_diameter {
            return false;
        }
    }
    cycle.len() >= min_hole_edges
}

/// Thresholds for [`is_standard_hole`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleFilter {
    /// Largest allowed extent of the hole's bounding box along any axis.
    pub max_hole_diameter: f64,

    /// Smallest number of edges a hole must have.
    pub min_hole_edges: usize,
}

impl Default for HoleFilter {
    fn default() -> Self {
        Self {
            max_hole_diameter: f64::INFINITY,
            min_hole_edges: 0,
        }
    }
}

impl HoleFilter {
    /// Create a filter, rejecting a negative or NaN diameter.
    pub fn new(max_hole_diameter: f64, min_hole_edges: usize) -> Result<Self> {
        if max_hole_diameter.is_nan() || max_hole_diameter < 0.0 {
            return Err(MeshError::invalid_param(
                "max_hole_diameter",
                max_hole_diameter,
                "must be a non-negative number",
            ));
        }
        Ok(Self {
            max_hole_diameter,
            min_hole_edges,
        })
    }

    /// Set the maximum diameter.
    pub fn with_max_hole_diameter(mut self, max_hole_diameter: f64) -> Self {
        self.max_hole_diameter = max_hole_diameter;
        self
    }

    /// Set the minimum number of edges.
    pub fn with_min_hole_edges(mut self, min_hole_edges: usize) -> Self {
        self.min_hole_edges = min_hole_edges;
        self
    }

    /// `true` if `cycle` passes both thresholds.
    pub fn accepts<I: MeshIndex>(&self, cycle: &BoundaryCycle<I>) -> bool {
        is_standard_hole(cycle, self.max_hole_diameter, self.min_hole_edges)
    }

    /// Split `cycles` into `(accepted, rejected)`, keeping their order.
    pub fn partition<I: MeshIndex>(
        &self,
        cycles: Vec<BoundaryCycle<I>>,
    ) -> (Vec<BoundaryCycle<I>>, Vec<BoundaryCycle<I>>) {
        cycles.into_iter().partition(|c| self.accepts(c))
    }
}

#[derive(Debug, Default)]
struct BoundingBox {
    bounds: Option<(Point3<f64>, Point3<f64>)>,
}

impl BoundingBox {
    fn add(&mut self, p: &Point3<f64>) {
        match &mut self.bounds {
            None => self.bounds = Some((*p, *p)),
            Some((min, max)) => {
                for i in 0..3 {
                    min[i] = min[i].min(p[i]);
                    max[i] = max[i].max(p[i]);
                }
            }
        }
    }

    fn max_extent(&self) -> f64 {
        self.bounds
            .map(|(min, max)| (max - min).max())
            .unwrap_or(0.0)
    }

    fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::delete::delete_faces_by_vertices;
    use crate::algo::test_meshes::{cube, grid};
    use crate::mesh::{FaceId, VertexId};

    fn cycle_from(points: &[[f64; 3]]) -> BoundaryCycle {
        BoundaryCycle {
            halfedges: (0..points.len()).map(HalfEdgeId::new).collect(),
            points: points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect(),
        }
    }

    #[test]
    fn test_closed_mesh_has_no_cycles() {
        let mut mesh = cube();
        assert!(border_cycles(&mesh).is_empty());
        assert!(extract_boundary_cycles(&mut mesh).is_empty());
    }

    #[test]
    fn test_cube_corner_hole() {
        let mut mesh = cube();
        delete_faces_by_vertices(&mut mesh, &[0]).unwrap();

        let cycles = extract_boundary_cycles(&mut mesh);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].points.len(), 3);

        // The hole is outlined by the three neighbors of the deleted corner.
        let mut corners: Vec<_> = cycles[0].points.iter().map(|p| (p.x, p.y, p.z)).collect();
        corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            corners,
            vec![(0.0, 0.0, 1.0), (0.0, 1.0, 0.0), (1.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn test_cycles_are_closed_border_loops() {
        let mut mesh = grid(8);
        // Two interior vertices whose one-rings touch neither the rim nor each other.
        delete_faces_by_vertices(&mut mesh, &[20, 60]).unwrap();

        let cycles = extract_boundary_cycles(&mut mesh);
        // Outer rim plus one hole per deleted interior vertex.
        assert_eq!(cycles.len(), 3);

        let mut seen = 0;
        for cycle in &cycles {
            assert_eq!(cycle.halfedges.len(), cycle.points.len());
            for (i, &he) in cycle.halfedges.iter().enumerate() {
                assert!(mesh.is_boundary_halfedge(he));
                let next = cycle.halfedges[(i + 1) % cycle.len()];
                assert_eq!(mesh.next(he), next);
                assert_eq!(mesh.target(he), mesh.source(next));
                assert_eq!(cycle.points[i], *mesh.position(mesh.source(he)));
            }
            seen += cycle.len();
        }
        assert_eq!(seen, mesh.boundary_halfedge_ids().count());

        let rim = cycles.iter().filter(|c| c.len() == 32).count();
        let holes = cycles.iter().filter(|c| c.len() == 6).count();
        assert_eq!((rim, holes), (1, 2));
    }

    #[test]
    fn test_border_cycles_on_uncompacted_mesh() {
        let mut mesh = grid(2);
        mesh.remove_face(FaceId::new(0));

        let cycles = border_cycles(&mesh);
        assert_eq!(cycles.len(), 1);
        for &he in &cycles[0] {
            assert!(mesh.contains_halfedge(he));
        }
        // The mesh was not compacted.
        assert!(mesh.has_garbage());
    }

    #[test]
    fn test_cycle_order_follows_storage() {
        let mut mesh = grid(8);
        delete_faces_by_vertices(&mut mesh, &[60, 20]).unwrap();

        let cycles = border_cycles(&mesh);
        let firsts: Vec<usize> = cycles.iter().map(|c| c[0].index()).collect();
        let mut sorted = firsts.clone();
        sorted.sort();
        assert_eq!(firsts, sorted);
        for cycle in &cycles {
            let min = cycle.iter().map(|he| he.index()).min().unwrap();
            assert_eq!(cycle[0].index(), min);
        }
    }

    #[test]
    fn test_is_standard_hole() {
        let square = cycle_from(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);

        assert!(is_standard_hole(&square, 1.0, 4));
        assert!(is_standard_hole(&square, 1.0, 0));
        // Extent exactly at the limit is allowed, just above is not.
        assert!(!is_standard_hole(&square, 0.999, 4));
        assert!(!is_standard_hole(&square, 1.0, 5));
    }

    #[test]
    fn test_hole_filter_monotonic() {
        let cycles = vec![
            cycle_from(&[[0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 0.5, 0.0]]),
            cycle_from(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 2.0, 0.0], [0.0, 2.0, 0.0]]),
            cycle_from(&[[0.0, 0.0, 0.0], [0.0, 0.0, 5.0], [0.0, 3.0, 5.0]]),
        ];

        let mut accepted_before = 0;
        for diameter in [0.1, 0.5, 1.0, 2.0, 5.0, 10.0] {
            let filter = HoleFilter::new(diameter, 3).unwrap();
            let accepted = cycles.iter().filter(|c| filter.accepts(*c)).count();
            assert!(accepted >= accepted_before);
            accepted_before = accepted;
        }
        assert_eq!(accepted_before, 3);

        let mut accepted_before = usize::MAX;
        for min_edges in 0..6 {
            let filter = HoleFilter::default().with_min_hole_edges(min_edges);
            let accepted = cycles.iter().filter(|c| filter.accepts(*c)).count();
            assert!(accepted <= accepted_before);
            accepted_before = accepted;
        }
        assert_eq!(accepted_before, 0);
    }

    #[test]
    fn test_partition() {
        let small = cycle_from(&[[0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 0.5, 0.0]]);
        let large = cycle_from(&[[0.0, 0.0, 0.0], [9.0, 0.0, 0.0], [0.0, 9.0, 0.0]]);

        let filter = HoleFilter::default().with_max_hole_diameter(1.0);
        let (holes, rest) = filter.partition(vec![large.clone(), small.clone()]);
        assert_eq!(holes, vec![small]);
        assert_eq!(rest, vec![large]);
    }

    #[test]
    fn test_hole_filter_rejects_bad_diameter() {
        assert!(matches!(
            HoleFilter::new(-1.0, 3),
            Err(MeshError::InvalidParameter { .. })
        ));
        assert!(HoleFilter::new(f64::NAN, 3).is_err());
        assert!(HoleFilter::new(0.0, 3).is_ok());
    }

    #[test]
    fn test_cycle_geometry() {
        let square = cycle_from(&[
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 2.0, 0.0],
            [0.0, 2.0, 0.0],
        ]);
        assert!((square.perimeter() - 8.0).abs() < 1e-12);
        let (min, max) = square.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn test_isolated_vertices_do_not_form_cycles() {
        let mut mesh = cube();
        mesh.add_vertex(Point3::new(3.0, 3.0, 3.0));
        assert!(border_cycles(&mesh).is_empty());
        assert!(mesh.contains_vertex(VertexId::new(8)));
    }
}
