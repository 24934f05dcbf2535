//! Diagnostic invariant pass.
//!
//! A violation found here means an engine defect, not bad input. Violations are
//! logged at `error` level and returned for inspection; nothing is repaired.

use thiserror::Error;

use super::index::{FaceId, HalfEdgeId, VertexId};
use super::table::TopologyTable;
use crate::error::{MeshError, Result};

/// A broken structural invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A vertex's stored id differs from its slot.
    #[error("vertex in slot {slot} claims id {stored:?}")]
    VertexIdMismatch {
        /// Arena slot.
        slot: usize,
        /// Stored id.
        stored: VertexId,
    },

    /// A vertex's half-edge is missing or does not leave the vertex.
    #[error("{vertex:?} has no valid outgoing half-edge")]
    DanglingVertexHalfEdge {
        /// The vertex.
        vertex: VertexId,
    },

    /// A vertex has fewer than three incident edges.
    #[error("{vertex:?} has degree {degree}")]
    LowDegree {
        /// The vertex.
        vertex: VertexId,
        /// Its degree.
        degree: usize,
    },

    /// Table cell `(row, column)` holds a half-edge with other endpoints.
    #[error("cell ({row}, {column}) holds {halfedge:?}, which runs {origin:?}->{dest:?}")]
    CellMismatch {
        /// Row (origin) index.
        row: usize,
        /// Column (destination) index.
        column: usize,
        /// Half-edge stored in the cell.
        halfedge: HalfEdgeId,
        /// Its actual origin.
        origin: VertexId,
        /// Its actual destination.
        dest: VertexId,
    },

    /// A table cell refers to a removed half-edge.
    #[error("cell ({row}, {column}) refers to removed {halfedge:?}")]
    StaleCell {
        /// Row (origin) index.
        row: usize,
        /// Column (destination) index.
        column: usize,
        /// The removed half-edge.
        halfedge: HalfEdgeId,
    },

    /// A live half-edge is not registered at its own cell.
    #[error("{halfedge:?} is not registered in the table")]
    UnregisteredHalfEdge {
        /// The half-edge.
        halfedge: HalfEdgeId,
    },

    /// A half-edge has no twin.
    #[error("{halfedge:?} has no twin")]
    MissingTwin {
        /// The half-edge.
        halfedge: HalfEdgeId,
    },

    /// A half-edge has no left face.
    #[error("{halfedge:?} has no face")]
    MissingFace {
        /// The half-edge.
        halfedge: HalfEdgeId,
    },

    /// `next`/`prev` are not mutually inverse at a half-edge.
    #[error("{halfedge:?} has inconsistent next/prev links")]
    BrokenLink {
        /// The half-edge.
        halfedge: HalfEdgeId,
    },

    /// A face boundary is not a 3-cycle of half-edges pointing back at the face.
    #[error("{face:?} boundary is not a closed triangle")]
    NotTriangle {
        /// The face.
        face: FaceId,
    },
}

/// Run every structural check and return what failed.
pub fn check_invariants(table: &TopologyTable) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    check_vertices(table, &mut violations);
    check_cells(table, &mut violations);
    check_halfedges(table, &mut violations);
    check_faces(table, &mut violations);

    for v in &violations {
        log::error!("invariant violation: {}", v);
    }
    violations
}

fn check_vertices(table: &TopologyTable, out: &mut Vec<InvariantViolation>) {
    for (slot, vertex) in table.vertices() {
        if vertex.id != slot {
            out.push(InvariantViolation::VertexIdMismatch {
                slot: slot.index(),
                stored: vertex.id,
            });
        }

        let leaves = table
            .try_halfedge(vertex.halfedge)
            .is_some_and(|he| he.origin == slot);
        if !leaves {
            out.push(InvariantViolation::DanglingVertexHalfEdge { vertex: slot });
        }

        let degree = table.degree(slot);
        if degree < 3 {
            out.push(InvariantViolation::LowDegree { vertex: slot, degree });
        }
    }
}

fn check_cells(table: &TopologyTable, out: &mut Vec<InvariantViolation>) {
    for (row, cells) in table.rows.iter().enumerate() {
        for (&column, &halfedge) in cells {
            match table.try_halfedge(halfedge) {
                None => out.push(InvariantViolation::StaleCell {
                    row,
                    column: column.index(),
                    halfedge,
                }),
                Some(he) if he.origin.index() != row || he.dest != column => {
                    out.push(InvariantViolation::CellMismatch {
                        row,
                        column: column.index(),
                        halfedge,
                        origin: he.origin,
                        dest: he.dest,
                    })
                }
                Some(_) => {}
            }
        }
    }
}

fn check_halfedges(table: &TopologyTable, out: &mut Vec<InvariantViolation>) {
    for id in table.halfedge_ids() {
        let he = table.halfedge(id);

        if table.find_halfedge(he.origin, he.dest) != Some(id) {
            out.push(InvariantViolation::UnregisteredHalfEdge { halfedge: id });
        }

        let twin = table.find_halfedge(he.dest, he.origin);
        if twin.and_then(|t| table.try_halfedge(t)).is_none() {
            out.push(InvariantViolation::MissingTwin { halfedge: id });
        }

        if table.try_face(he.face).is_none() {
            out.push(InvariantViolation::MissingFace { halfedge: id });
        }

        let next_ok = table.try_halfedge(he.next).is_some_and(|n| n.prev == id);
        let prev_ok = table.try_halfedge(he.prev).is_some_and(|p| p.next == id);
        if !next_ok || !prev_ok {
            out.push(InvariantViolation::BrokenLink { halfedge: id });
        }
    }
}

fn check_faces(table: &TopologyTable, out: &mut Vec<InvariantViolation>) {
    for (fid, face) in table.faces() {
        let mut he = face.halfedge;
        let mut closed = true;
        for _ in 0..3 {
            match table.try_halfedge(he) {
                Some(h) if h.face == fid => he = h.next,
                _ => {
                    closed = false;
                    break;
                }
            }
        }
        if !closed || he != face.halfedge {
            out.push(InvariantViolation::NotTriangle { face: fid });
        }
    }
}

/// Check what subdivision and decimation require of their input: at least one
/// face, no unmatched half-edges, and no vertex of degree below 3.
pub fn require_closed_manifold(table: &TopologyTable) -> Result<()> {
    if table.num_faces() == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let unmatched = table.unmatched_halfedges();
    if unmatched > 0 {
        return Err(MeshError::OpenMesh { unmatched });
    }

    if let Some(v) = table.vertex_ids().find(|&v| table.degree(v) < 3) {
        return Err(MeshError::IrregularVertex {
            vertex: v.index(),
            degree: table.degree(v),
        });
    }

    Ok(())
}

impl TopologyTable {
    /// Run the diagnostic invariant pass. See [`check_invariants`].
    pub fn validate(&self) -> Vec<InvariantViolation> {
        check_invariants(self)
    }

    /// Whether the table passes every structural check.
    pub fn is_valid(&self) -> bool {
        check_invariants(self).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;

    #[test]
    fn test_fixtures_are_valid() {
        assert!(fixtures::tetrahedron().is_valid());
        assert!(fixtures::octahedron().is_valid());
        assert!(fixtures::cube().is_valid());
        assert!(fixtures::icosahedron().is_valid());
        assert!(fixtures::torus(6, 6).is_valid());
    }

    #[test]
    fn test_closure_properties() {
        let table = fixtures::icosahedron();
        for e in table.halfedge_ids() {
            assert_eq!(table.next(table.next(table.next(e))), e);
            assert_eq!(table.twin(table.twin(e)), e);
            assert_eq!(table.origin(table.twin(e)), table.dest(e));
        }
    }

    #[test]
    fn test_detects_broken_link() {
        let mut table = fixtures::tetrahedron();
        let he = table.halfedge_ids().next().unwrap();
        let prev = table.prev(he);
        table.halfedge_mut(he).next = prev;

        let violations = table.validate();
        assert!(violations.contains(&InvariantViolation::BrokenLink { halfedge: he }));
        assert!(!table.is_valid());
    }

    #[test]
    fn test_detects_missing_twin() {
        let mut table = fixtures::octahedron();
        let he = table.halfedge_ids().next().unwrap();
        let twin = table.twin(he);
        table.remove_halfedge(twin);

        let violations = table.validate();
        assert!(violations.contains(&InvariantViolation::MissingTwin { halfedge: he }));
    }

    #[test]
    fn test_detects_cell_mismatch() {
        let mut table = fixtures::tetrahedron();
        let he = table.halfedge_ids().next().unwrap();
        let (o, d) = (table.origin(he), table.dest(he));
        // Corrupt the record without moving its cell
        table.halfedge_mut(he).dest = o;

        let violations = table.validate();
        assert!(violations.iter().any(|v| matches!(
            v,
            InvariantViolation::CellMismatch { row, column, .. }
                if *row == o.index() && *column == d.index()
        )));
    }

    #[test]
    fn test_require_closed_manifold() {
        assert!(require_closed_manifold(&fixtures::cube()).is_ok());
        assert!(matches!(
            require_closed_manifold(&crate::mesh::TopologyTable::new()),
            Err(MeshError::EmptyMesh)
        ));

        let mut table = fixtures::octahedron();
        let he = table.halfedge_ids().next().unwrap();
        let twin = table.twin(he);
        table.remove_halfedge(twin);
        assert!(matches!(
            require_closed_manifold(&table),
            Err(MeshError::OpenMesh { unmatched: 1 })
        ));
    }

    #[test]
    fn test_open_mesh_reports_missing_faces() {
        let table = crate::mesh::build_from_triangles(
            &[
                nalgebra::Point3::new(0.0, 0.0, 0.0),
                nalgebra::Point3::new(1.0, 0.0, 0.0),
                nalgebra::Point3::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2]],
        )
        .unwrap();
        let violations = table.validate();
        let missing = violations
            .iter()
            .filter(|v| matches!(v, InvariantViolation::MissingFace { .. }))
            .count();
        assert_eq!(missing, 3);
    }
}
