//! Core mesh data structures.
//!
//! # Overview
//!
//! The primary type is [`TopologyTable`], a closed triangle mesh stored as a
//! winged-edge structure: vertex, half-edge, and face records in index-addressed
//! arenas, plus a sparse origin×destination table holding one entry per
//! directed edge. The twin of a half-edge is the mirrored cell, so adjacency
//! queries need no stored twin pointers.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! # Construction
//!
//! Tables are built from parsed geometry with [`build_from_indexed_triangles`],
//! or from plain face-vertex lists:
//!
//! ```
//! use winged::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(-1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, -1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(0.0, 0.0, -1.0),
//! ];
//! let faces = vec![
//!     [0, 2, 4], [2, 1, 4], [1, 3, 4], [3, 0, 4],
//!     [2, 0, 5], [1, 2, 5], [3, 1, 5], [0, 3, 5],
//! ];
//!
//! let table = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(table.euler_characteristic(), 2);
//! assert!(table.is_valid());
//! ```

mod attributes;
mod builder;
mod export;
mod index;
mod records;
mod table;
mod validate;

#[cfg(test)]
pub(crate) mod fixtures;

pub use attributes::{
    compute_face_normals, compute_quadrics, compute_smoothed_normals, refresh_normals,
    triangle_normal, Quadric,
};
pub use builder::{
    build_from_indexed_triangles, build_from_triangles, to_face_vertex, BuildReport, DataWarning,
    MeshSource, SourceCorner,
};
pub use export::{
    export_mesh, render_stream, wireframe_stream, ExportedCorner, ExportedFace, ExportedMesh,
    LineVertex, RenderVertex,
};
pub use index::{FaceId, HalfEdgeId, VertexId};
pub use records::{Face, HalfEdge, Vertex};
pub use table::{TopologyTable, TriangleRejection};
pub use validate::{check_invariants, require_closed_manifold, InvariantViolation};
