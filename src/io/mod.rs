//! Mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | OFF | `.off` | ✓ | ✓ | Polygons kept as-is |
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII load, binary save |
//! | PLY | `.ply` | ✓ | ✓ | Polygons triangulated on load |
//!
//! Besides meshes, [`indices`] reads vertex index lists and [`points`] writes
//! the point listings of boundary cycles.
//!
//! # Usage
//!
//! ```no_run
//! use pare::io::{load, save};
//! use pare::mesh::HalfEdgeMesh;
//!
//! // Load with automatic format detection
//! let mesh: HalfEdgeMesh = load("data/mesh_test.off").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "simplified.off").unwrap();
//! ```

pub mod indices;
pub mod off;
pub mod ply;
pub mod points;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

pub use indices::{read_indices, IndexParsing};
pub use points::{save_points, PointListingOptions};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Object File Format.
    Off,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "off" => Some(Format::Off),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    fn of(path: &Path) -> Result<Format> {
        Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

/// Load a mesh from a file, choosing the format by extension.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let mesh = match Format::of(path)? {
        Format::Off => off::load(path),
        Format::Stl => stl::load(path),
        Format::Ply => ply::load(path),
    }?;

    log::info!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save the live part of a mesh, choosing the format by extension.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match Format::of(path)? {
        Format::Off => off::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }?;

    log::info!("saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/mesh.OFF"), Some(Format::Off));
        assert_eq!(Format::from_path("part.stl"), Some(Format::Stl));
        assert_eq!(Format::from_path("scan.ply"), Some(Format::Ply));
        assert_eq!(Format::from_path("model.obj"), None);
        assert_eq!(Format::from_path("noext"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let result: Result<HalfEdgeMesh> = load("model.gltf");
        assert!(matches!(
            result,
            Err(MeshError::UnsupportedFormat { ref extension }) if extension == "gltf"
        ));

        let mesh: HalfEdgeMesh = HalfEdgeMesh::new();
        assert!(matches!(
            save(&mesh, "out"),
            Err(MeshError::UnsupportedFormat { ref extension }) if extension == "(none)"
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result: Result<HalfEdgeMesh> = load("/nonexistent/pare/mesh.off");
        assert!(matches!(result, Err(MeshError::Io(_))));
    }
}
