//! Mesh subdivision.
//!
//! Each pass consumes a closed table and produces a new one with one vertex
//! inserted per undirected edge and every triangle split into four:
//! `V' = V + E`, `E' = 2E + 3F`, `F' = 4F`. The input table is never modified.
//!
//! # Loop Subdivision
//!
//! Loop subdivision (Loop, 1987) is approximating: original vertices are
//! relaxed towards their neighbors with weight `β(n)` and edge-vertices are
//! placed at `3/8·(v0 + v1) + 1/8·(wings)`.
//!
//! # Butterfly Subdivision
//!
//! The modified Butterfly scheme (Zorin et al., 1996) is interpolating:
//! original vertices stay put and edge-vertices come from an 8-point stencil,
//! or a per-degree stencil around an extraordinary endpoint.
//!
//! # Example
//!
//! ```
//! use winged::prelude::*;
//! use winged::algo::subdivide::{subdivide, Scheme, SubdivideOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let table = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let refined = subdivide(&table, &SubdivideOptions::new(Scheme::Loop, 2)).unwrap();
//! assert_eq!(refined.num_faces(), 4 * 4 * 4);
//! ```
//!
//! # References
//!
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles."
//!   Master's thesis, University of Utah.
//! - Zorin, D., Schröder, P. & Sweldens, W. (1996). "Interpolating Subdivision
//!   for Meshes with Arbitrary Topology." SIGGRAPH '96.

mod butterfly;
mod loop_subdivision;
mod split;

use std::fmt;
use std::str::FromStr;

pub use butterfly::irregular_weights;
pub use loop_subdivision::loop_beta;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{require_closed_manifold, TopologyTable};

use butterfly::ButterflyRule;
use loop_subdivision::LoopRule;
use split::split_pass;

/// Subdivision scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    /// Approximating Loop scheme.
    #[default]
    Loop,
    /// Interpolating modified Butterfly scheme.
    Butterfly,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Loop => write!(f, "loop"),
            Scheme::Butterfly => write!(f, "butterfly"),
        }
    }
}

impl FromStr for Scheme {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "loop" => Ok(Scheme::Loop),
            "butterfly" => Ok(Scheme::Butterfly),
            _ => Err(MeshError::invalid_param("scheme", s, "expected loop or butterfly")),
        }
    }
}

/// Options for subdivision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdivideOptions {
    /// Which scheme to apply.
    pub scheme: Scheme,

    /// Number of passes. Must be positive.
    pub levels: usize,
}

impl SubdivideOptions {
    /// Create options for `levels` passes of `scheme`.
    pub fn new(scheme: Scheme, levels: usize) -> Self {
        Self { scheme, levels }
    }

    /// Set the scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the number of passes.
    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    /// Reject non-positive level counts.
    pub fn validate(&self) -> Result<()> {
        if self.levels == 0 {
            return Err(MeshError::invalid_param("levels", self.levels, "must be positive"));
        }
        Ok(())
    }
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(Scheme::Loop, 1)
    }
}

/// Subdivide a closed mesh, returning the refined table.
///
/// # Errors
/// Fails without producing a table if `levels` is zero or the input is not a
/// closed manifold with every vertex of degree at least 3.
pub fn subdivide(table: &TopologyTable, options: &SubdivideOptions) -> Result<TopologyTable> {
    subdivide_with_progress(table, options, &Progress::none())
}

/// Subdivision with progress reporting (one step per level).
pub fn subdivide_with_progress(
    table: &TopologyTable,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<TopologyTable> {
    options.validate()?;
    require_closed_manifold(table)?;

    let message = format!("{} subdivision", options.scheme);
    let mut current = subdivide_once(table, options.scheme)?;
    progress.report(1, options.levels, &message);

    for level in 1..options.levels {
        current = subdivide_once(&current, options.scheme)?;
        progress.report(level + 1, options.levels, &message);
    }

    Ok(current)
}

/// Run a single pass of `scheme`.
fn subdivide_once(table: &TopologyTable, scheme: Scheme) -> Result<TopologyTable> {
    let out = match scheme {
        Scheme::Loop => split_pass(table, &LoopRule)?,
        Scheme::Butterfly => split_pass(table, &ButterflyRule)?,
    };

    log::info!(
        "{} pass: {} -> {} vertices, {} -> {} faces",
        scheme,
        table.num_vertices(),
        out.num_vertices(),
        table.num_faces(),
        out.num_faces()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, fixtures};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_zero_levels_rejected() {
        let table = fixtures::tetrahedron();
        let result = subdivide(&table, &SubdivideOptions::new(Scheme::Loop, 0));
        assert!(matches!(result, Err(MeshError::InvalidParameter { name: "levels", .. })));
    }

    #[test]
    fn test_open_mesh_rejected() {
        let table = build_from_triangles(
            &[
                nalgebra::Point3::new(0.0, 0.0, 0.0),
                nalgebra::Point3::new(1.0, 0.0, 0.0),
                nalgebra::Point3::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2]],
        )
        .unwrap();
        let result = subdivide(&table, &SubdivideOptions::default());
        assert!(matches!(result, Err(MeshError::OpenMesh { .. })));
    }

    #[test]
    fn test_euler_preserved_across_levels() {
        for scheme in [Scheme::Loop, Scheme::Butterfly] {
            let table = fixtures::cube();
            let (v, e, f) = (table.num_vertices(), table.edge_count(), table.num_faces());

            let out = subdivide(&table, &SubdivideOptions::new(scheme, 2)).unwrap();
            let (v1, e1, f1) = (v + e, 2 * e + 3 * f, 4 * f);
            assert_eq!(out.num_vertices(), v1 + e1);
            assert_eq!(out.edge_count(), 2 * e1 + 3 * f1);
            assert_eq!(out.num_faces(), 4 * f1);
            assert_eq!(out.euler_characteristic(), 2);
            assert!(out.is_valid());
        }
    }

    #[test]
    fn test_input_untouched() {
        let table = fixtures::octahedron();
        let _ = subdivide(&table, &SubdivideOptions::new(Scheme::Loop, 1)).unwrap();
        assert_eq!(table.num_vertices(), 6);
        assert_eq!(table.num_faces(), 8);
    }

    #[test]
    fn test_progress_reports_each_level() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let progress = Progress::new(move |_, total, _| {
            assert_eq!(total, 3);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let table = fixtures::tetrahedron();
        subdivide_with_progress(&table, &SubdivideOptions::new(Scheme::Butterfly, 3), &progress)
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("Loop".parse::<Scheme>().unwrap(), Scheme::Loop);
        assert_eq!("butterfly".parse::<Scheme>().unwrap(), Scheme::Butterfly);
        assert!("catmull".parse::<Scheme>().is_err());
        assert_eq!(Scheme::Butterfly.to_string(), "butterfly");
    }
}
