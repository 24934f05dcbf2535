//! # Winged
//!
//! A geometry-processing core for closed, 2-manifold triangle meshes.
//!
//! Winged stores a mesh as a winged-edge adjacency table and rewrites it in
//! two opposite directions: subdivision refines it (Loop or modified
//! Butterfly) and quadric-error decimation simplifies it by edge collapse.
//! Both keep the mesh closed, manifold, and free of vertices below degree 3.
//!
//! ## Features
//!
//! - **Winged-edge table**: arenas of vertex, half-edge, and face records plus a
//!   sparse origin×destination table, so the twin of `(i, j)` is the cell `(j, i)`
//! - **Best-effort construction**: malformed input is reported as warnings, not errors
//! - **Subdivision**: Loop (approximating) and modified Butterfly (interpolating)
//! - **Decimation**: stratified candidate sampling, quadric-optimal placement,
//!   normal-flip rejection, and degree-specific collapse surgery
//! - **File formats**: OBJ and STL
//!
//! ## Quick Start
//!
//! ```no_run
//! use winged::algo::decimate::{decimate, DecimateOptions};
//!
//! let (mut table, report) = winged::io::load("model.obj").unwrap();
//! for warning in &report.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//!
//! decimate(&mut table, &DecimateOptions::new(100, 8)).unwrap();
//! winged::io::save(&table, "output.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use winged::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let table = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(table.num_vertices(), 4);
//! assert_eq!(table.edge_count(), 6);
//! assert_eq!(table.num_faces(), 4);
//! ```
//!
//! ## Traversal
//!
//! ```
//! use winged::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! #     Point3::new(0.5, 0.5, 1.0),
//! # ];
//! # let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! # let table = build_from_triangles(&vertices, &faces).unwrap();
//! let v = VertexId::new(0);
//! for he in table.vertex_ring(v) {
//!     let twin = table.twin(he);
//!     println!(
//!         "{:?} -> {:?}: left {:?}, right {:?}",
//!         v,
//!         table.dest(he),
//!         table.left_face(he),
//!         table.left_face(twin)
//!     );
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod session;

/// Prelude module for convenient imports.
///
/// ```
/// use winged::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_indexed_triangles, build_from_triangles, to_face_vertex, Face, FaceId,
        HalfEdge, HalfEdgeId, MeshSource, TopologyTable, Vertex, VertexId,
    };
    pub use crate::session::MeshSession;
}

// Re-export nalgebra types for convenience
pub use nalgebra;
