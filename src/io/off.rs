//! OFF (Object File Format) support.
//!
//! ```text
//! OFF
//! <vertices> <faces> <edges>
//! x y z            one line per vertex
//! n i0 i1 ...      one line per face, zero-based indices
//! ```
//!
//! Blank lines and `#` comments are ignored. Values after the coordinates of
//! a vertex or the indices of a face (typically colors) are ignored. Faces
//! are kept as the polygons they are.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, HalfEdgeMesh, MeshIndex};

/// Content lines of an OFF file with their 1-based line numbers.
struct Lines<'a> {
    path: &'a Path,
    lines: std::vec::IntoIter<(usize, String)>,
}

impl<'a> Lines<'a> {
    fn read<R: BufRead>(path: &'a Path, reader: R) -> Result<Self> {
        let mut lines = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let content = line.split('#').next().unwrap_or("").trim();
            if !content.is_empty() {
                lines.push((i + 1, content.to_string()));
            }
        }
        Ok(Self {
            path,
            lines: lines.into_iter(),
        })
    }

    fn error(&self, line: usize, message: impl std::fmt::Display) -> MeshError {
        MeshError::LoadError {
            path: self.path.to_path_buf(),
            message: format!("line {}: {}", line, message),
        }
    }

    fn next_line(&mut self, what: &str) -> Result<(usize, String)> {
        self.lines.next().ok_or_else(|| MeshError::LoadError {
            path: self.path.to_path_buf(),
            message: format!("unexpected end of file, expected {}", what),
        })
    }

    fn parse<T: FromStr>(&self, line: usize, token: Option<&str>, what: &str) -> Result<T> {
        let token = token.ok_or_else(|| self.error(line, format!("missing {}", what)))?;
        token
            .parse()
            .map_err(|_| self.error(line, format!("invalid {} '{}'", what, token)))
    }
}

/// Load a mesh from an OFF file.
///
/// # Example
///
/// ```no_run
/// use pare::io::off;
/// use pare::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = off::load("data/mesh_test.off").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Lines::read(path, reader)?;

    // The counts may follow the keyword on the same line.
    let (line, header) = lines.next_line("OFF header")?;
    let rest = match header.split_once(char::is_whitespace) {
        Some(("OFF", rest)) => rest.trim().to_string(),
        None if header == "OFF" => String::new(),
        _ => return Err(lines.error(line, format!("expected 'OFF', got '{}'", header))),
    };
    let (counts_line, counts) = if rest.is_empty() {
        lines.next_line("element counts")?
    } else {
        (line, rest)
    };
    let mut counts = counts.split_whitespace();
    let num_vertices: usize = lines.parse(counts_line, counts.next(), "vertex count")?;
    let num_faces: usize = lines.parse(counts_line, counts.next(), "face count")?;

    let mut vertices = Vec::with_capacity(num_vertices);
    for _ in 0..num_vertices {
        let (line, text) = lines.next_line("vertex")?;
        let mut tokens = text.split_whitespace();
        let x: f64 = lines.parse(line, tokens.next(), "x coordinate")?;
        let y: f64 = lines.parse(line, tokens.next(), "y coordinate")?;
        let z: f64 = lines.parse(line, tokens.next(), "z coordinate")?;
        vertices.push(Point3::new(x, y, z));
    }

    let mut faces = Vec::with_capacity(num_faces);
    for _ in 0..num_faces {
        let (line, text) = lines.next_line("face")?;
        let mut tokens = text.split_whitespace();
        let degree: usize = lines.parse(line, tokens.next(), "face size")?;
        let face = (0..degree)
            .map(|_| lines.parse(line, tokens.next(), "vertex index"))
            .collect::<Result<Vec<usize>>>()?;
        faces.push(face);
    }

    log::debug!(
        "read {} vertices and {} faces from {}",
        vertices.len(),
        faces.len(),
        path.display()
    );
    build_from_polygons(&vertices, &faces)
}

/// Save the live part of a mesh to an OFF file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write the live part of a mesh in OFF format to any writer.
pub fn write<W: Write, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "OFF")?;
    writeln!(writer, "{} {} {}", vertices.len(), faces.len(), mesh.num_edges())?;
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
    Ok(())
}
