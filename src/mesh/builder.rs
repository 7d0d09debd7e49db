//! Mesh construction utilities.
//!
//! This module builds half-edge meshes from face-vertex lists as found in
//! mesh file formats, and converts meshes back into that form for writing.

use nalgebra::Point3;

use super::halfedge::HalfEdgeMesh;
use super::index::{MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Returns
/// A half-edge mesh, or an error if the input is invalid.
///
/// # Example
/// ```
/// use pare::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    build(vertices, faces.iter().map(|f| &f[..]), faces.len())
}

/// Build a half-edge mesh from vertices and polygonal faces of any degree.
///
/// Faces are inserted in order, so an error names the index of the first
/// offending face in `faces`.
pub fn build_from_polygons<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[Vec<usize>],
) -> Result<HalfEdgeMesh<I>> {
    build(vertices, faces.iter().map(|f| f.as_slice()), faces.len())
}

fn build<'a, I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: impl Iterator<Item = &'a [usize]> + Clone,
    num_faces: usize,
) -> Result<HalfEdgeMesh<I>> {
    if num_faces == 0 {
        return Err(MeshError::EmptyMesh);
    }

    // Validate vertex indices
    for (fi, face) in faces.clone().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), num_faces);
    let vertex_ids: Vec<VertexId<I>> = vertices.iter().map(|&pos| mesh.add_vertex(pos)).collect();

    let mut corners = Vec::new();
    for face in faces {
        corners.clear();
        corners.extend(face.iter().map(|&vi| vertex_ids[vi]));
        mesh.add_polygon(&corners)?;
    }

    log::debug!(
        "built mesh: {} vertices, {} faces, {} edges",
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.num_edges()
    );
    Ok(mesh)
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Only live elements are emitted. Vertex indices in the returned faces refer
/// to positions in the returned vertex list, which keeps the storage order of
/// the live vertices, so the output is compact even if the mesh has garbage.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let mut remap = vec![usize::MAX; mesh.num_vertex_slots()];
    let mut vertices = Vec::with_capacity(mesh.num_vertices());
    for (vid, v) in mesh.vertices() {
        remap[vid.index()] = vertices.len();
        vertices.push(v.position);
    }

    let faces = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| remap[v.index()]).collect())
        .collect();

    (vertices, faces)
}

/// Like [`to_face_vertex`], with every polygon fan-triangulated from its
/// first corner.
pub fn to_triangles<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let (vertices, polygons) = to_face_vertex(mesh);
    (vertices, triangulate_fan(&polygons))
}

/// Fan-triangulate polygons from their first corner. Faces with fewer than
/// three corners are dropped.
pub fn triangulate_fan(polygons: &[Vec<usize>]) -> Vec<[usize; 3]> {
    let mut triangles = Vec::with_capacity(polygons.len());
    for poly in polygons {
        for i in 1..poly.len().saturating_sub(1) {
            triangles.push([poly[0], poly[i], poly[i + 1]]);
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        (vertices, faces)
    }

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        // Two triangles sharing an edge
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];
        (vertices, faces)
    }

    fn two_quads() -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
        // Two quads sharing the edge 1-2
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_faces(), 1);
        // 3 interior half-edges + 3 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 6);
        assert!(mesh.is_valid());

        // All vertices should be on boundary
        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_two_triangles() {
        let (vertices, faces) = two_triangles();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
        // 6 interior half-edges + 4 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 10);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_triangles();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(vertices.len(), out_verts.len());
        assert_eq!(out_faces, vec![vec![0, 1, 2], vec![1, 0, 3]]);
        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }
    }

    #[test]
    fn test_to_face_vertex_skips_removed() {
        let (vertices, faces) = two_triangles();
        let mut mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        mesh.remove_face(crate::mesh::FaceId::new(0));
        mesh.remove_vertex(VertexId::new(2));

        let (out_verts, out_faces) = to_face_vertex(&mesh);
        assert_eq!(out_verts.len(), 3);
        // Vertex 3 moves down to slot 2 in the compact output.
        assert_eq!(out_faces, vec![vec![1, 0, 2]]);
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]]; // Indices 1 and 2 are invalid

        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = single_triangle();
        let faces = vec![[0, 0, 2]]; // Degenerate: v0 == v1

        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_empty_faces() {
        let (vertices, _) = single_triangle();
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &[]);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_non_manifold_edge() {
        let mut vertices = single_triangle().0;
        vertices.push(Point3::new(0.5, 0.5, 1.0));
        vertices.push(Point3::new(0.5, 0.5, -1.0));
        // Three faces on edge 0-1, two of them in the same direction.
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];

        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { .. })));
    }

    #[test]
    fn test_build_from_polygons() {
        let (vertices, faces) = two_quads();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 2);
        // 8 interior half-edges + 6 boundary half-edges (shared edge has no boundary)
        assert_eq!(mesh.num_halfedges(), 14);
        assert!(!mesh.is_triangle_mesh());
        assert!(mesh.is_valid());

        let (_, out_faces) = to_face_vertex(&mesh);
        assert_eq!(out_faces, faces);
    }

    #[test]
    fn test_to_triangles() {
        let (vertices, faces) = two_quads();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        let (_, triangles) = to_triangles(&mesh);
        assert_eq!(
            triangles,
            vec![[0, 1, 2], [0, 2, 3], [1, 4, 5], [1, 5, 2]]
        );
    }

    #[test]
    fn test_closed_tetrahedron() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.boundary_halfedge_ids().count(), 0);
        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v));
            assert_eq!(mesh.vertex_faces(v).count(), 3);
        }
        assert!(mesh.is_valid());
    }
}
