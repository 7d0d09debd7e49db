//! Error types for pare.
//!
//! Logical failures (bad indices, topology that cannot be built, faces that
//! break a precondition) and resource failures (files that cannot be read,
//! parsed or written) share one enum so callers can match on either.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The input has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references a vertex that is out of range or removed.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face repeats a vertex or has fewer than three corners.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A face cannot be attached without making a vertex non-manifold.
    #[error("mesh has non-manifold topology: {details}")]
    NonManifold {
        /// Description of the non-manifold condition.
        details: String,
    },

    /// An edge would get more than two incident faces.
    #[error("edge ({v0}, {v1}) has more than two incident faces")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// A vertex index given to a deletion is past the end of vertex storage.
    #[error("vertex index {index} is out of range (vertex storage holds {len} slots)")]
    VertexIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Vertex storage size at the time of the call.
        len: usize,
    },

    /// A face that must be a triangle has a different number of corners.
    #[error("face {face} has {vertices} vertices, expected a triangle")]
    NonTriangularFace {
        /// The face index in the source mesh.
        face: usize,
        /// Number of vertices found in its face loop.
        vertices: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// A line of an index file is not an integer (strict parsing only).
    #[error("line {line}: '{text}' is not a vertex index")]
    ParseIndex {
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// `true` for failures that come from files or external input rather
    /// than from the mesh itself.
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            MeshError::Io(_)
                | MeshError::LoadError { .. }
                | MeshError::SaveError { .. }
                | MeshError::UnsupportedFormat { .. }
                | MeshError::ParseIndex { .. }
        )
    }
}
