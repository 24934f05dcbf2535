//! The functional API: one loaded mesh and the operations on it.
//!
//! A [`MeshSession`] holds at most one [`TopologyTable`]. Every operation
//! invoked before a mesh is loaded is a no-op that reports
//! [`MeshError::NotLoaded`]. Precondition failures leave the loaded mesh as it
//! was. A decimation that fails inside the collapse surgery leaves no usable
//! table, so the session drops it and the mesh has to be loaded again.
//!
//! # Example
//!
//! ```
//! use winged::session::MeshSession;
//! use winged::algo::subdivide::Scheme;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//!
//! let mut session = MeshSession::new();
//! assert!(session.export_mesh().is_err());
//!
//! session.load_triangles(&vertices, &faces).unwrap();
//! session.subdivide(Scheme::Butterfly, 1).unwrap();
//!
//! let exported = session.export_mesh().unwrap();
//! assert_eq!(exported.positions.len(), 10);
//! assert_eq!(exported.faces.len(), 16);
//! ```

use nalgebra::Point3;

use crate::algo::decimate::{decimate_with_progress, DecimateOptions, DecimationReport};
use crate::algo::subdivide::{subdivide_with_progress, Scheme, SubdivideOptions};
use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{
    build_from_indexed_triangles, export_mesh, render_stream, wireframe_stream, BuildReport,
    ExportedMesh, LineVertex, MeshSource, RenderVertex, TopologyTable,
};

/// Owner of the currently loaded mesh.
#[derive(Debug, Default)]
pub struct MeshSession {
    table: Option<TopologyTable>,
}

impl MeshSession {
    /// A session with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a mesh is loaded.
    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// The loaded table, if any.
    pub fn table(&self) -> Option<&TopologyTable> {
        self.table.as_ref()
    }

    /// Drop the loaded mesh.
    pub fn unload(&mut self) {
        self.table = None;
    }

    fn loaded(&self, operation: &str) -> Result<&TopologyTable> {
        self.table.as_ref().ok_or_else(|| not_loaded(operation))
    }

    /// Build a table from parsed geometry, replacing the loaded one.
    ///
    /// If construction fails the previously loaded mesh stays in place.
    pub fn load_mesh(&mut self, source: &MeshSource) -> Result<BuildReport> {
        let (table, report) = build_from_indexed_triangles(source)?;
        self.table = Some(table);
        Ok(report)
    }

    /// [`load_mesh`](Self::load_mesh) from plain positions and triangles.
    pub fn load_triangles(
        &mut self,
        positions: &[Point3<f64>],
        triangles: &[[usize; 3]],
    ) -> Result<BuildReport> {
        self.load_mesh(&MeshSource::from_triangles(positions, triangles))
    }

    /// Replace the loaded mesh by `levels` passes of `scheme`.
    pub fn subdivide(&mut self, scheme: Scheme, levels: usize) -> Result<()> {
        self.subdivide_with(&SubdivideOptions::new(scheme, levels), &Progress::none())
    }

    /// Subdivision with explicit options and progress.
    pub fn subdivide_with(&mut self, options: &SubdivideOptions, progress: &Progress) -> Result<()> {
        let refined = subdivide_with_progress(self.loaded("subdivide")?, options, progress)?;
        self.table = Some(refined);
        Ok(())
    }

    /// Run `edges_to_remove` collapse iterations, `candidates` per round.
    pub fn decimate(&mut self, edges_to_remove: usize, candidates: usize) -> Result<DecimationReport> {
        self.decimate_with(&DecimateOptions::new(edges_to_remove, candidates), &Progress::none())
    }

    /// Decimation with explicit options and progress.
    pub fn decimate_with(
        &mut self,
        options: &DecimateOptions,
        progress: &Progress,
    ) -> Result<DecimationReport> {
        let table = self.table.as_mut().ok_or_else(|| not_loaded("decimate"))?;
        let result = decimate_with_progress(table, options, progress);

        if let Err(MeshError::InconsistentTopology(message)) = &result {
            log::error!("decimation left the mesh unusable, unloading it: {}", message);
            self.table = None;
        }
        result
    }

    /// Densely numbered geometry of the loaded mesh.
    pub fn export_mesh(&self) -> Result<ExportedMesh> {
        self.loaded("export").map(export_mesh)
    }

    /// Non-indexed triangle stream of the loaded mesh.
    pub fn render_stream(&self) -> Result<Vec<RenderVertex>> {
        self.loaded("render").map(render_stream)
    }

    /// Line-segment stream of the loaded mesh.
    pub fn wireframe_stream(&self) -> Result<Vec<LineVertex>> {
        self.loaded("wireframe").map(wireframe_stream)
    }
}

fn not_loaded(operation: &str) -> MeshError {
    log::warn!("{} ignored: no mesh is loaded", operation);
    MeshError::NotLoaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;

    fn loaded(data: fixtures::MeshData) -> MeshSession {
        let mut session = MeshSession::new();
        let report = session.load_triangles(&data.0, &data.1).unwrap();
        assert!(report.is_clean());
        session
    }

    #[test]
    fn test_everything_requires_a_mesh() {
        let mut session = MeshSession::new();
        assert!(!session.is_loaded());
        assert!(matches!(session.subdivide(Scheme::Loop, 1), Err(MeshError::NotLoaded)));
        assert!(matches!(session.decimate(1, 1), Err(MeshError::NotLoaded)));
        assert!(matches!(session.export_mesh(), Err(MeshError::NotLoaded)));
        assert!(matches!(session.render_stream(), Err(MeshError::NotLoaded)));
        assert!(matches!(session.wireframe_stream(), Err(MeshError::NotLoaded)));
    }

    #[test]
    fn test_failed_load_keeps_previous_mesh() {
        let mut session = loaded(fixtures::octahedron_data());
        let result = session.load_mesh(&MeshSource::default());
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
        assert_eq!(session.table().unwrap().num_vertices(), 6);
    }

    #[test]
    fn test_subdivide_replaces_table() {
        let mut session = loaded(fixtures::octahedron_data());
        session.subdivide(Scheme::Loop, 2).unwrap();
        let table = session.table().unwrap();
        assert_eq!(table.num_faces(), 8 * 16);
        assert!(table.is_valid());
    }

    #[test]
    fn test_bad_levels_is_no_op() {
        let mut session = loaded(fixtures::cube_data());
        assert!(session.subdivide(Scheme::Butterfly, 0).is_err());
        assert_eq!(session.table().unwrap().num_faces(), 12);
    }

    #[test]
    fn test_tetrahedron_decimation_rejected() {
        let mut session = loaded(fixtures::tetrahedron_data());
        let result = session.decimate(7, 1);
        assert!(matches!(result, Err(MeshError::ExceedsAvailableEdges { .. })));
        let table = session.table().unwrap();
        assert_eq!(table.edge_count(), 6);
        assert!(table.is_valid());
    }

    #[test]
    fn test_cube_decimation() {
        let mut session = loaded(fixtures::cube_data());
        let options = DecimateOptions::new(1, 1).with_seed(21);
        let report = session.decimate_with(&options, &Progress::none()).unwrap();
        assert_eq!(report.edges_removed, 3);

        let table = session.table().unwrap();
        assert_eq!(table.edge_count(), 15);
        assert_eq!(table.num_faces(), 10);
        assert!(table.is_valid());

        let exported = session.export_mesh().unwrap();
        assert_eq!(exported.positions.len(), 7);
        assert_eq!(session.render_stream().unwrap().len(), 30);
        assert_eq!(session.wireframe_stream().unwrap().len(), 60);
    }

    #[test]
    fn test_unload() {
        let mut session = loaded(fixtures::icosahedron_data());
        session.unload();
        assert!(session.table().is_none());
    }
}
