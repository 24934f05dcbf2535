//! Mesh construction from indexed triangle lists.
//!
//! Construction is best effort: malformed faces are skipped or truncated and
//! reported through [`BuildReport::warnings`] rather than aborting the build.
//! Only an input that yields no faces at all is an error.

use std::collections::HashMap;

use nalgebra::{Point2, Point3, Vector3};
use thiserror::Error;

use super::attributes::refresh_normals;
use super::index::VertexId;
use super::table::{TopologyTable, TriangleRejection};
use crate::error::{MeshError, Result};

/// One face corner of the source geometry: 0-based indices into the parallel
/// position, UV, and normal arrays of a [`MeshSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCorner {
    /// Index into [`MeshSource::positions`].
    pub position: usize,
    /// Index into [`MeshSource::uvs`], if the corner has a texture coordinate.
    pub uv: Option<usize>,
    /// Index into [`MeshSource::normals`], if the corner has a normal.
    pub normal: Option<usize>,
}

impl SourceCorner {
    /// A corner with a position only.
    pub fn new(position: usize) -> Self {
        Self {
            position,
            uv: None,
            normal: None,
        }
    }

    /// Attach a texture coordinate index.
    pub fn with_uv(mut self, uv: usize) -> Self {
        self.uv = Some(uv);
        self
    }

    /// Attach a normal index.
    pub fn with_normal(mut self, normal: usize) -> Self {
        self.normal = Some(normal);
        self
    }
}

/// Already-parsed source geometry.
#[derive(Debug, Clone, Default)]
pub struct MeshSource {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Texture coordinates.
    pub uvs: Vec<Point2<f64>>,
    /// Source normals.
    pub normals: Vec<Vector3<f64>>,
    /// Faces, each a list of corners. Well-formed faces have exactly three.
    pub faces: Vec<Vec<SourceCorner>>,
}

impl MeshSource {
    /// Source geometry with positions and triangles only.
    pub fn from_triangles(positions: &[Point3<f64>], triangles: &[[usize; 3]]) -> Self {
        Self {
            positions: positions.to_vec(),
            uvs: Vec::new(),
            normals: Vec::new(),
            faces: triangles
                .iter()
                .map(|tri| tri.iter().map(|&p| SourceCorner::new(p)).collect())
                .collect(),
        }
    }
}

/// A data-quality problem found during construction. Never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataWarning {
    /// A face with fewer than three corners was skipped.
    #[error("face {face} has only {count} corners; skipped")]
    TooFewCorners {
        /// Source face index.
        face: usize,
        /// Number of corners found.
        count: usize,
    },

    /// A face with more than three corners was truncated to its first three.
    #[error("face {face} has {count} corners; only the first three were used")]
    ExtraCorners {
        /// Source face index.
        face: usize,
        /// Number of corners found.
        count: usize,
    },

    /// A corner referenced a position that does not exist; the face was skipped.
    #[error("face {face} references missing position {index}; skipped")]
    PositionOutOfRange {
        /// Source face index.
        face: usize,
        /// The bad position index.
        index: usize,
    },

    /// A corner referenced a missing texture coordinate; the face's UVs were dropped.
    #[error("face {face} references missing texture coordinate {index}")]
    UvOutOfRange {
        /// Source face index.
        face: usize,
        /// The bad UV index.
        index: usize,
    },

    /// A corner referenced a missing normal; the face's source normals were dropped.
    #[error("face {face} references missing normal {index}")]
    NormalOutOfRange {
        /// Source face index.
        face: usize,
        /// The bad normal index.
        index: usize,
    },

    /// Two corners of a face resolved to the same vertex; the face was skipped.
    #[error("face {face} is degenerate; skipped")]
    DegenerateFace {
        /// Source face index.
        face: usize,
    },

    /// A directed edge of the face already bounds another face; the face was skipped.
    /// Endpoints are source position indices.
    #[error("face {face} reuses directed edge {origin}->{dest}; skipped")]
    EdgeConflict {
        /// Source face index.
        face: usize,
        /// Origin vertex of the conflicting edge.
        origin: usize,
        /// Destination vertex of the conflicting edge.
        dest: usize,
    },

    /// The finished table has half-edges without a twin face.
    #[error("mesh is open: {unmatched} half-edges have no opposite face")]
    OpenBoundary {
        /// Number of unmatched half-edges.
        unmatched: usize,
    },
}

/// Outcome of a construction beyond the table itself.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Data-quality warnings, in the order they were found.
    pub warnings: Vec<DataWarning>,
    /// Number of source positions folded into an earlier identical position.
    pub merged_vertices: usize,
    /// Number of source faces that made it into the table.
    pub faces_built: usize,
}

impl BuildReport {
    /// Whether construction found no data-quality problems.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn warn(&mut self, warning: DataWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Position key with `-0.0` folded into `0.0`.
fn position_key(p: &Point3<f64>) -> [u64; 3] {
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

/// Build a topology table from parsed source geometry.
///
/// Vertices are created on first reference and deduplicated both by source
/// index and by exact position. Each face's three directed edges are
/// registered in the table together with their twins; face and smoothed
/// normals are computed once every face is linked.
///
/// # Errors
/// Returns [`MeshError::EmptyMesh`] if no face survives.
///
/// # Example
/// ```
/// use winged::mesh::{build_from_indexed_triangles, MeshSource};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
/// ];
/// let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
/// let source = MeshSource::from_triangles(&positions, &faces);
///
/// let (table, report) = build_from_indexed_triangles(&source).unwrap();
/// assert_eq!(table.num_vertices(), 4);
/// assert_eq!(table.edge_count(), 6);
/// assert!(report.is_clean());
/// ```
pub fn build_from_indexed_triangles(source: &MeshSource) -> Result<(TopologyTable, BuildReport)> {
    let mut report = BuildReport::default();

    // Canonical source index per position (first occurrence wins)
    let mut first_at: HashMap<[u64; 3], usize> = HashMap::with_capacity(source.positions.len());
    let canonical: Vec<usize> = source
        .positions
        .iter()
        .enumerate()
        .map(|(i, p)| *first_at.entry(position_key(p)).or_insert(i))
        .collect();
    report.merged_vertices = canonical.iter().enumerate().filter(|(i, &c)| *i != c).count();

    let mut table = TopologyTable::with_capacity(first_at.len(), source.faces.len());
    let mut vertex_of: Vec<Option<VertexId>> = vec![None; source.positions.len()];
    let mut source_of: Vec<usize> = Vec::with_capacity(first_at.len());

    for (fi, corners) in source.faces.iter().enumerate() {
        if corners.len() < 3 {
            report.warn(DataWarning::TooFewCorners {
                face: fi,
                count: corners.len(),
            });
            continue;
        }
        if corners.len() > 3 {
            report.warn(DataWarning::ExtraCorners {
                face: fi,
                count: corners.len(),
            });
        }
        let corners = [corners[0], corners[1], corners[2]];

        if let Some(bad) = corners.iter().find(|c| c.position >= source.positions.len()) {
            report.warn(DataWarning::PositionOutOfRange {
                face: fi,
                index: bad.position,
            });
            continue;
        }

        let keys = corners.map(|c| canonical[c.position]);
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[0] == keys[2] {
            report.warn(DataWarning::DegenerateFace { face: fi });
            continue;
        }

        // An edge touching a not-yet-created vertex cannot conflict
        let conflict = (0..3).find_map(|i| {
            let o = vertex_of[keys[i]]?;
            let d = vertex_of[keys[(i + 1) % 3]]?;
            let he = table.find_halfedge(o, d)?;
            table
                .halfedge(he)
                .has_face()
                .then_some((keys[i], keys[(i + 1) % 3]))
        });
        if let Some((origin, dest)) = conflict {
            report.warn(DataWarning::EdgeConflict {
                face: fi,
                origin,
                dest,
            });
            continue;
        }

        let ids = keys.map(|k| match vertex_of[k] {
            Some(id) => id,
            None => {
                let id = table.add_vertex(source.positions[k]);
                vertex_of[k] = Some(id);
                source_of.push(k);
                id
            }
        });

        let face = match table.add_triangle(ids) {
            Ok(face) => face,
            Err(TriangleRejection::Degenerate) => {
                report.warn(DataWarning::DegenerateFace { face: fi });
                continue;
            }
            Err(TriangleRejection::EdgeInUse { origin, dest }) => {
                report.warn(DataWarning::EdgeConflict {
                    face: fi,
                    origin: source_of[origin.index()],
                    dest: source_of[dest.index()],
                });
                continue;
            }
        };
        report.faces_built += 1;

        let uvs = corner_attribute(&corners, |c| c.uv, &source.uvs);
        match uvs {
            Ok(uvs) => table.face_mut(face).corner_uvs = uvs,
            Err(index) => report.warn(DataWarning::UvOutOfRange { face: fi, index }),
        }
        let normals = corner_attribute(&corners, |c| c.normal, &source.normals);
        match normals {
            Ok(normals) => table.face_mut(face).corner_normals = normals,
            Err(index) => report.warn(DataWarning::NormalOutOfRange { face: fi, index }),
        }
    }

    if table.num_faces() == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let unmatched = table.unmatched_halfedges();
    if unmatched > 0 {
        report.warn(DataWarning::OpenBoundary { unmatched });
    }

    refresh_normals(&mut table);

    log::info!(
        "built mesh: {} vertices, {} directed edges, {} faces ({} warnings)",
        table.num_vertices(),
        table.directed_edge_count(),
        table.num_faces(),
        report.warnings.len()
    );

    Ok((table, report))
}

/// Gather a per-corner attribute. `Ok(None)` if any corner lacks it,
/// `Err(index)` if a corner references a missing entry.
fn corner_attribute<T: Copy>(
    corners: &[SourceCorner; 3],
    pick: impl Fn(&SourceCorner) -> Option<usize>,
    values: &[T],
) -> std::result::Result<Option<[T; 3]>, usize> {
    let mut out = Vec::with_capacity(3);
    for corner in corners {
        let Some(index) = pick(corner) else {
            return Ok(None);
        };
        out.push(*values.get(index).ok_or(index)?);
    }
    Ok(Some([out[0], out[1], out[2]]))
}

/// Build a table from plain positions and triangles, discarding the report.
///
/// Warnings are still logged.
///
/// # Example
/// ```
/// use winged::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let table = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
/// assert_eq!(table.num_faces(), 1);
/// assert!(!table.is_closed());
/// ```
pub fn build_from_triangles(
    positions: &[Point3<f64>],
    triangles: &[[usize; 3]],
) -> Result<TopologyTable> {
    let source = MeshSource::from_triangles(positions, triangles);
    build_from_indexed_triangles(&source).map(|(table, _)| table)
}

/// Flatten a table into dense positions and triangles over live elements.
pub fn to_face_vertex(table: &TopologyTable) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut dense = vec![usize::MAX; table.vertex_slots()];
    let mut positions = Vec::with_capacity(table.num_vertices());
    for (id, v) in table.vertices() {
        dense[id.index()] = positions.len();
        positions.push(v.position);
    }

    let triangles = table
        .face_ids()
        .map(|f| table.face_vertices(f).map(|v| dense[v.index()]))
        .collect();

    (positions, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        (positions, faces)
    }

    #[test]
    fn test_build_closed_tetrahedron() {
        let (positions, faces) = tetrahedron();
        let (table, report) =
            build_from_indexed_triangles(&MeshSource::from_triangles(&positions, &faces)).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.faces_built, 4);
        assert_eq!(table.num_vertices(), 4);
        assert_eq!(table.num_faces(), 4);
        assert_eq!(table.directed_edge_count(), 12);
        assert!(table.is_closed());
        for v in table.vertex_ids() {
            assert_eq!(table.degree(v), 3);
        }
    }

    #[test]
    fn test_empty_input() {
        let result = build_from_triangles(&[], &[]);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_open_mesh_warns() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let (_, report) =
            build_from_indexed_triangles(&MeshSource::from_triangles(&positions, &[[0, 1, 2]]))
                .unwrap();
        assert_eq!(report.warnings, vec![DataWarning::OpenBoundary { unmatched: 3 }]);
    }

    #[test]
    fn test_duplicate_positions_merged() {
        let (mut positions, mut faces) = tetrahedron();
        // Vertex 4 duplicates vertex 3; reference it from the last face
        positions.push(Point3::new(0.5, 0.5, 1.0));
        faces[3] = [2, 0, 4];

        let (table, report) =
            build_from_indexed_triangles(&MeshSource::from_triangles(&positions, &faces)).unwrap();
        assert_eq!(report.merged_vertices, 1);
        assert_eq!(table.num_vertices(), 4);
        assert!(table.is_closed());
    }

    #[test]
    fn test_malformed_faces_are_skipped() {
        let (positions, faces) = tetrahedron();
        let mut source = MeshSource::from_triangles(&positions, &faces);
        source.faces.push(vec![SourceCorner::new(0), SourceCorner::new(1)]);
        source.faces.push(vec![SourceCorner::new(0), SourceCorner::new(9), SourceCorner::new(1)]);
        source.faces.push(vec![SourceCorner::new(0), SourceCorner::new(0), SourceCorner::new(1)]);
        // Same winding as face 1: edge 0->1 is taken
        source.faces.push(vec![SourceCorner::new(0), SourceCorner::new(1), SourceCorner::new(2)]);

        let (table, report) = build_from_indexed_triangles(&source).unwrap();
        assert_eq!(table.num_faces(), 4);
        assert!(table.is_closed());
        assert_eq!(
            report.warnings,
            vec![
                DataWarning::TooFewCorners { face: 4, count: 2 },
                DataWarning::PositionOutOfRange { face: 5, index: 9 },
                DataWarning::DegenerateFace { face: 6 },
                DataWarning::EdgeConflict { face: 7, origin: 0, dest: 1 },
            ]
        );
    }

    #[test]
    fn test_polygon_truncated_to_triangle() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let source = MeshSource {
            positions,
            faces: vec![(0..4).map(SourceCorner::new).collect()],
            ..MeshSource::default()
        };
        let (table, report) = build_from_indexed_triangles(&source).unwrap();
        assert_eq!(table.num_faces(), 1);
        assert_eq!(table.num_vertices(), 3);
        assert_eq!(report.warnings[0], DataWarning::ExtraCorners { face: 0, count: 4 });
    }

    #[test]
    fn test_corner_attributes_carried() {
        let (positions, faces) = tetrahedron();
        let mut source = MeshSource::from_triangles(&positions, &faces);
        source.uvs = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
        source.normals = vec![Vector3::z()];
        source.faces[0] = vec![
            SourceCorner::new(0).with_uv(0).with_normal(0),
            SourceCorner::new(2).with_uv(1).with_normal(0),
            SourceCorner::new(1).with_uv(2).with_normal(0),
        ];
        source.faces[1][0].uv = Some(7);

        let (table, report) = build_from_indexed_triangles(&source).unwrap();
        let f0 = table.face_ids().next().unwrap();
        let face = table.face(f0);
        assert_eq!(face.corner_uv(1), Some(Point2::new(1.0, 0.0)));
        assert_eq!(face.corner_normal(2), Vector3::z());
        assert_eq!(report.warnings, vec![DataWarning::UvOutOfRange { face: 1, index: 7 }]);
    }

    #[test]
    fn test_to_face_vertex_roundtrip() {
        let (positions, faces) = tetrahedron();
        let table = build_from_triangles(&positions, &faces).unwrap();
        let (out_positions, out_faces) = to_face_vertex(&table);
        assert_eq!(out_positions.len(), positions.len());
        // Vertices are numbered in first-reference order; corners must still agree
        for (out, src) in out_faces.iter().zip(&faces) {
            for i in 0..3 {
                assert_eq!(out_positions[out[i]], positions[src[i]]);
            }
        }
    }
}
