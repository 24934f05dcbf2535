//! Error types for winged.
//!
//! Only precondition failures and collaborator (I/O) failures are errors.
//! Data-quality problems during construction are reported as
//! [`DataWarning`](crate::mesh::DataWarning)s, invariant violations as
//! [`InvariantViolation`](crate::mesh::InvariantViolation)s, and decimation
//! early aborts through the [`DecimationReport`](crate::algo::decimate::DecimationReport).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// An operation was requested before any mesh was loaded.
    #[error("no mesh is loaded")]
    NotLoaded,

    /// The input produced no usable faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A vertex has fewer than three incident edges.
    #[error("vertex {vertex} has degree {degree} (at least 3 is required)")]
    IrregularVertex {
        /// The vertex index.
        vertex: usize,
        /// Its degree.
        degree: usize,
    },

    /// Decimation was asked to remove more edges than the mesh has.
    #[error("cannot collapse {requested} edges: mesh only has {available}")]
    ExceedsAvailableEdges {
        /// Number of edges requested.
        requested: usize,
        /// Number of live undirected edges.
        available: usize,
    },

    /// The table has half-edges without a twin or without a face.
    #[error("mesh is not closed: {unmatched} half-edges have no twin")]
    OpenMesh {
        /// Number of half-edges without a twin.
        unmatched: usize,
    },

    /// A rewrite met a configuration a closed manifold cannot have.
    #[error("inconsistent topology: {0}")]
    InconsistentTopology(String),

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

    /// Whether this error is a rejected precondition (the operation was a no-op).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            MeshError::NotLoaded
                | MeshError::EmptyMesh
                | MeshError::IrregularVertex { .. }
                | MeshError::ExceedsAvailableEdges { .. }
                | MeshError::OpenMesh { .. }
                | MeshError::InvalidParameter { .. }
        )
    }
}
