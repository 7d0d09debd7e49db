//! STL (stereolithography) format support.
//!
//! Both binary and ASCII files load; saving writes binary. STL only holds
//! triangles, so polygonal faces are fan-triangulated when saved.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_triangles, HalfEdgeMesh, MeshIndex};

/// Load a mesh from an STL file.
///
/// `stl_io` merges coincident corners into shared vertices; triangles that
/// collapse to an edge or point after the merge are skipped.
///
/// # Example
///
/// ```no_run
/// use pare::io::stl;
/// use pare::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = stl::load("part.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let vertices: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(stl.faces.len());
    let mut skipped = 0;
    for tri in &stl.faces {
        let [i0, i1, i2] = tri.vertices;
        if i0 != i1 && i1 != i2 && i0 != i2 {
            faces.push([i0, i1, i2]);
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        log::warn!("skipped {} degenerate triangles in {}", skipped, path.display());
    }

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    build_from_triangles(&vertices, &faces)
}

/// Save the live part of a mesh to a binary STL file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    let (vertices, faces) = to_triangles(mesh);
    let corner = |p: &Point3<f64>| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);

    let triangles: Vec<stl_io::Triangle> = faces
        .iter()
        .map(|f| {
            let [p0, p1, p2] = f.map(|i| vertices[i]);
            let n = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(0.0)
                .unwrap_or_else(Vector3::zeros);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [corner(&p0), corner(&p1), corner(&p2)],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_polygons;

    #[test]
    fn test_save_and_load() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 2.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3], vec![3, 2, 4]];
        let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();

        let path = std::env::temp_dir().join(format!("pare_stl_{}.stl", std::process::id()));
        save(&mesh, &path).unwrap();
        let loaded: HalfEdgeMesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.num_vertices(), 5);
        assert_eq!(loaded.num_faces(), 3);
        assert!(loaded.is_triangle_mesh());
        assert!((loaded.surface_area() - 1.5).abs() < 1e-6);
        assert!(loaded.is_valid());
    }
}
