//! Element counts for reporting.

use std::fmt;

use super::halfedge::HalfEdgeMesh;
use super::index::MeshIndex;

/// Snapshot of a mesh's live and removed element counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshStats {
    /// Live vertices.
    pub vertices: usize,
    /// Live edges.
    pub edges: usize,
    /// Live faces.
    pub faces: usize,
    /// Live half-edges.
    pub halfedges: usize,
    /// Vertices awaiting compaction.
    pub removed_vertices: usize,
    /// Edges awaiting compaction.
    pub removed_edges: usize,
    /// Faces awaiting compaction.
    pub removed_faces: usize,
    /// Half-edges awaiting compaction.
    pub removed_halfedges: usize,
}

impl MeshStats {
    /// Take the counts of `mesh` as they are now.
    pub fn of<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Self {
        Self {
            vertices: mesh.num_vertices(),
            edges: mesh.num_edges(),
            faces: mesh.num_faces(),
            halfedges: mesh.num_halfedges(),
            removed_vertices: mesh.num_removed_vertices(),
            removed_edges: mesh.num_removed_edges(),
            removed_faces: mesh.num_removed_faces(),
            removed_halfedges: mesh.num_removed_halfedges(),
        }
    }

    /// Render with every line prefixed by `label`.
    pub fn labeled<'a>(&'a self, label: &'a str) -> Labeled<'a> {
        Labeled { stats: self, label }
    }

    fn rows(&self) -> [(&'static str, usize); 8] {
        [
            ("vertices", self.vertices),
            ("edges", self.edges),
            ("faces", self.faces),
            ("halfedges", self.halfedges),
            ("removed vertices", self.removed_vertices),
            ("removed edges", self.removed_edges),
            ("removed faces", self.removed_faces),
            ("removed halfedges", self.removed_halfedges),
        ]
    }

    fn write_rows(&self, f: &mut fmt::Formatter<'_>, prefix: &str) -> fmt::Result {
        for (i, (name, count)) in self.rows().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}{:>17}: {}", prefix, name, count)?;
        }
        Ok(())
    }
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_rows(f, "")
    }
}

/// [`MeshStats`] display with a line prefix, see [`MeshStats::labeled`].
pub struct Labeled<'a> {
    stats: &'a MeshStats,
    label: &'a str,
}

impl fmt::Display for Labeled<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.stats.write_rows(f, &format!("{} - ", self.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, FaceId};
    use nalgebra::Point3;

    #[test]
    fn test_stats_track_removal() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let mut mesh: HalfEdgeMesh =
            build_from_triangles(&vertices, &[[0, 1, 2], [1, 0, 3]]).unwrap();

        let stats = MeshStats::of(&mesh);
        assert_eq!(stats.vertices, 4);
        assert_eq!(stats.edges, 5);
        assert_eq!(stats.faces, 2);
        assert_eq!(stats.halfedges, 10);

        mesh.remove_face(FaceId::new(0));
        let stats = MeshStats::of(&mesh);
        assert_eq!(stats.faces, 1);
        assert_eq!(stats.removed_faces, 1);
        assert_eq!(stats.removed_edges, 2);
        assert_eq!(stats.removed_halfedges, 4);
        assert_eq!(stats.edges, 3);
    }

    #[test]
    fn test_display() {
        let stats = MeshStats {
            vertices: 8,
            faces: 12,
            ..Default::default()
        };
        let text = stats.labeled("loaded").to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "loaded -          vertices: 8");
        assert_eq!(lines[2], "loaded -             faces: 12");
        assert!(stats.to_string().starts_with("         vertices: 8"));
    }
}
