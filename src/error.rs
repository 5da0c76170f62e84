//! Error types for volsel.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh loading, editing, and selection.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no elements.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A face or edge references an invalid vertex index.
    #[error("element {element} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The index of the face or edge in its input list.
        element: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three vertices or repeats a vertex.
    #[error("face {face} is degenerate (fewer than 3 distinct vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge connects a vertex to itself.
    #[error("edge ({v0}, {v1}) is invalid: {reason}")]
    InvalidEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
        /// Why the edge was rejected.
        reason: &'static str,
    },

    /// The mesh would hold more elements than its index type can address.
    #[error("too many {element}: the index type addresses at most {limit}")]
    CapacityExceeded {
        /// The element kind that overflowed ("vertices", "edges", "faces").
        element: &'static str,
        /// The largest element count the index type supports.
        limit: usize,
    },

    /// A position or bound is NaN or infinite.
    #[error("{name} {index} is not finite")]
    NonFinite {
        /// What was checked, e.g. "vertex".
        name: &'static str,
        /// Position of the offending value in its input list.
        index: usize,
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

    /// A range list operation needs an active range but none is set.
    #[error("no active threshold range")]
    NoActiveRange,

    /// A threshold range could not be parsed.
    #[error("invalid threshold range '{input}': {reason}")]
    InvalidRange {
        /// The text that failed to parse.
        input: String,
        /// Reason the range is invalid.
        reason: &'static str,
    },

    /// A preset or report file could not be (de)serialized.
    #[error("JSON error in {path}: {source}")]
    Json {
        /// The file path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
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

    /// Create an invalid range error.
    pub fn invalid_range(input: &str, reason: &'static str) -> Self {
        MeshError::InvalidRange {
            input: input.to_string(),
            reason,
        }
    }
}
