//! PLY (Stanford polygon) format support.
//!
//! Polygons are fan-triangulated on load, since the rebuild stage only
//! accepts triangles. Saving writes each live face with all its corners.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, triangulate_fan, HalfEdgeMesh, MeshIndex};

fn load_error(path: &Path, message: impl Into<String>) -> MeshError {
    MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Load a mesh from a PLY file (ASCII or binary).
///
/// # Example
///
/// ```no_run
/// use pare::io::ply;
/// use pare::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = ply::load("scan.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(path, e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error(path, "PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for (i, vertex) in vertex_element.iter().enumerate() {
        let coord = |name: &str| {
            float_property(vertex, name)
                .ok_or_else(|| load_error(path, format!("vertex {} is missing {}", i, name)))
        };
        vertices.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error(path, "PLY file has no face element"))?;

    let mut polygons: Vec<Vec<usize>> = Vec::with_capacity(face_element.len());
    for (i, face) in face_element.iter().enumerate() {
        let indices = list_property(face, "vertex_indices")
            .or_else(|| list_property(face, "vertex_index"))
            .ok_or_else(|| load_error(path, format!("face {} has no vertex_indices", i)))?;
        polygons.push(indices);
    }

    let faces = triangulate_fan(&polygons);
    if faces.is_empty() {
        return Err(load_error(path, "PLY file contains no faces"));
    }
    log::debug!(
        "read {} vertices and {} polygons ({} triangles) from {}",
        vertices.len(),
        polygons.len(),
        faces.len(),
        path.display()
    );

    build_from_triangles(&vertices, &faces)
}

fn float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

/// Negative indices become `usize::MAX` so they fail the range check.
fn list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    fn to_index<T: TryInto<usize> + Copy>(values: &[T]) -> Vec<usize> {
        values.iter().map(|&x| x.try_into().unwrap_or(usize::MAX)).collect()
    }

    match element.get(name)? {
        Property::ListInt(v) => Some(to_index(v)),
        Property::ListUInt(v) => Some(to_index(v)),
        Property::ListShort(v) => Some(to_index(v)),
        Property::ListUShort(v) => Some(to_index(v)),
        Property::ListChar(v) => Some(to_index(v)),
        Property::ListUChar(v) => Some(to_index(v)),
        _ => None,
    }
}

/// Save the live part of a mesh to an ASCII PLY file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let (vertices, faces) = to_face_vertex(mesh);

    if let Some(face) = faces.iter().position(|f| f.len() > u8::MAX as usize) {
        return Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: format!("face {} has more corners than a PLY uchar count holds", face),
        });
    }

    let mut writer = BufWriter::new(File::create(path)?);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by pare")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }

    for f in &faces {
        write!(writer, "{}", f.len())?;
        for vi in f {
            write!(writer, " {}", vi)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_polygons;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("pare_ply_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_save_and_load_quads() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]];
        let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();

        let path = temp_path("quads.ply");
        save(&mesh, &path).unwrap();
        let loaded: HalfEdgeMesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        // Quads come back as two triangles each.
        assert_eq!(loaded.num_vertices(), 6);
        assert_eq!(loaded.num_faces(), 4);
        assert!(loaded.is_triangle_mesh());
        assert!((loaded.surface_area() - mesh.surface_area()).abs() < 1e-9);
        assert!(loaded.is_valid());
    }

    #[test]
    fn test_load_missing_faces() {
        let path = temp_path("nofaces.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nend_header\n0 0 0\n",
        )
        .unwrap();

        let result: Result<HalfEdgeMesh> = load(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(MeshError::LoadError { .. })));
    }
}
