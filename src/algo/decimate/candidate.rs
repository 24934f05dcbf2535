//! Candidate planning: feasibility, optimal position, and cost of one collapse.

use nalgebra::Point3;

use crate::mesh::{triangle_normal, FaceId, TopologyTable, VertexId};

use super::collapse::CollapseCase;

/// A feasible collapse of `removed` into `survivor`.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CollapsePlan {
    /// The vertex that stays and moves to `position`.
    pub survivor: VertexId,
    /// The vertex that disappears.
    pub removed: VertexId,
    /// Degree-3 wings to remove before the collapse.
    pub pre_collapse: Vec<VertexId>,
    /// Quadric-optimal position (midpoint if the system was singular).
    pub position: Point3<f64>,
    /// `vᵗQv` at `position`.
    pub cost: f64,
    /// Rewiring the collapse will use once pre-collapses are done.
    pub case: CollapseCase,
}

impl CollapsePlan {
    /// Undirected edges the plan removes.
    pub fn edges_removed(&self) -> usize {
        3 * (1 + self.pre_collapse.len())
    }
}

/// Why a candidate was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Rejection {
    Missing,
    SingleWing,
    SharedWingNeighbor,
    LinkCondition,
    DegreeTooLow,
    EdgeFloor,
    NormalFlip,
}

/// Faces incident to `v`.
fn incident_faces(table: &TopologyTable, v: VertexId) -> Vec<FaceId> {
    table
        .vertex_ring(v)
        .into_iter()
        .map(|h| table.left_face(h))
        .collect()
}

/// Effective wings of the edge `o - d` and the degree-3 wings to pre-collapse.
///
/// A degree-3 wing would drop to degree 2 in the collapse, so it is removed
/// first and its third neighbor becomes the wing instead.
fn resolve_wings(
    table: &TopologyTable,
    o: VertexId,
    d: VertexId,
    mut wings: [VertexId; 2],
) -> Result<([VertexId; 2], Vec<VertexId>), Rejection> {
    let mut pre_collapse = Vec::new();
    for wing in wings.iter_mut() {
        if table.degree(*wing) == 3 {
            let third = table
                .neighbors(*wing)
                .into_iter()
                .find(|&n| n != o && n != d)
                .ok_or(Rejection::SingleWing)?;
            pre_collapse.push(*wing);
            *wing = third;
        }
    }
    if wings[0] == wings[1] {
        return Err(Rejection::SharedWingNeighbor);
    }
    Ok((wings, pre_collapse))
}

/// Plan the collapse of edge `(u, v)`; `u` survives.
///
/// `live_edges - edges_removed` must stay above `min_edges`.
pub(super) fn plan_collapse(
    table: &TopologyTable,
    u: VertexId,
    v: VertexId,
    min_edges: usize,
) -> Result<CollapsePlan, Rejection> {
    let (o, d) = (u, v);
    let e = table.find_halfedge(o, d).ok_or(Rejection::Missing)?;
    let t = table.twin(e);
    if !t.is_valid() {
        return Err(Rejection::Missing);
    }

    let a = table.dest(table.next(e));
    let b = table.dest(table.next(t));
    if a == b {
        return Err(Rejection::SingleWing);
    }

    let (wings, pre_collapse) = resolve_wings(table, o, d, [a, b])?;

    // Degrees once the pre-collapses are done
    let sim_degree = |x: VertexId| -> usize {
        let lost = pre_collapse
            .iter()
            .filter(|&&w| table.find_halfedge(w, x).is_some())
            .count();
        table.degree(x) - lost
    };

    // Link condition: o and d may only share the two wings
    let neighbors_d = table.neighbors(d);
    let mut shared: Vec<VertexId> = table
        .neighbors(o)
        .into_iter()
        .filter(|n| neighbors_d.contains(n) && !pre_collapse.contains(n))
        .collect();
    shared.sort();
    let mut expected = wings;
    expected.sort();
    if shared != expected {
        return Err(Rejection::LinkCondition);
    }

    let (deg_o, deg_d) = (sim_degree(o), sim_degree(d));
    if deg_o + deg_d < 7 || wings.iter().any(|&w| sim_degree(w) < 4) {
        return Err(Rejection::DegreeTooLow);
    }
    let case = CollapseCase::classify(deg_d).ok_or(Rejection::DegreeTooLow)?;

    let plan_edges = 3 * (1 + pre_collapse.len());
    if table.edge_count() < plan_edges + min_edges + 1 {
        return Err(Rejection::EdgeFloor);
    }

    let quadric = table.vertex(o).quadric + table.vertex(d).quadric;
    let position = quadric
        .optimal_point()
        .unwrap_or_else(|| nalgebra::center(table.position(o), table.position(d)));

    if flips_normal(table, o, d, &pre_collapse, &position) {
        return Err(Rejection::NormalFlip);
    }

    Ok(CollapsePlan {
        survivor: o,
        removed: d,
        pre_collapse,
        position,
        cost: quadric.evaluate(&position),
        case,
    })
}

/// Whether moving `o` and `d` to `target` turns any surviving face around them over.
fn flips_normal(
    table: &TopologyTable,
    o: VertexId,
    d: VertexId,
    pre_collapse: &[VertexId],
    target: &Point3<f64>,
) -> bool {
    let mut faces = incident_faces(table, o);
    for f in incident_faces(table, d) {
        if !faces.contains(&f) {
            faces.push(f);
        }
    }

    faces.into_iter().any(|f| {
        let corners = table.face_vertices(f);
        let doomed = (corners.contains(&o) && corners.contains(&d))
            || corners.iter().any(|c| pre_collapse.contains(c));
        if doomed {
            return false;
        }

        let old = corners.map(|c| *table.position(c));
        let new = corners.map(|c| if c == o || c == d { *target } else { *table.position(c) });
        let n_old = triangle_normal(&old[0], &old[1], &old[2]);
        let n_new = triangle_normal(&new[0], &new[1], &new[2]);
        n_old.dot(&n_new) < 0.0 || (n_new == nalgebra::Vector3::zeros() && n_old != n_new)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{compute_quadrics, fixtures};

    fn edge_between(table: &TopologyTable, degree_o: usize, degree_d: usize) -> (VertexId, VertexId) {
        table
            .condensed_edges()
            .iter()
            .copied()
            .find(|&(u, v)| table.degree(u) == degree_o && table.degree(v) == degree_d)
            .unwrap()
    }

    #[test]
    fn test_octahedron_plan() {
        let mut table = fixtures::octahedron();
        compute_quadrics(&mut table);
        let (u, v) = table.condensed_edges()[0];

        let plan = plan_collapse(&table, u, v, 6).unwrap();
        assert!(plan.pre_collapse.is_empty());
        assert_eq!(plan.case, CollapseCase::Degree4);
        assert!(plan.cost >= -1e-9);
        assert_eq!(plan.edges_removed(), 3);
    }

    #[test]
    fn test_tetrahedron_rejected() {
        let mut table = fixtures::tetrahedron();
        compute_quadrics(&mut table);
        for &(u, v) in table.condensed_edges() {
            assert!(plan_collapse(&table, u, v, 0).is_err());
        }
    }

    #[test]
    fn test_edge_floor() {
        let mut table = fixtures::octahedron();
        compute_quadrics(&mut table);
        let (u, v) = table.condensed_edges()[0];
        // 12 edges - 3 removed = 9, not above 9
        assert_eq!(plan_collapse(&table, u, v, 9), Err(Rejection::EdgeFloor));
        assert!(plan_collapse(&table, u, v, 8).is_ok());
    }

    #[test]
    fn test_degree3_wing_is_precollapsed() {
        let (mut table, ids) = fixtures::octahedron_with_apex();
        compute_quadrics(&mut table);
        let (o, d, top, bottom, apex) = (ids[0], ids[2], ids[4], ids[5], ids[6]);
        assert_eq!(table.degree(apex), 3);

        let e = table.find_halfedge(o, d).unwrap();
        let wings = [table.dest(table.next(e)), table.dest(table.next(table.twin(e)))];
        let (resolved, pre) = resolve_wings(&table, o, d, wings).unwrap();
        assert_eq!(pre, vec![apex]);
        let mut resolved = resolved.to_vec();
        resolved.sort();
        let mut expected = vec![top, bottom];
        expected.sort();
        assert_eq!(resolved, expected);

        let plan = plan_collapse(&table, o, d, 6).unwrap();
        assert_eq!(plan.pre_collapse, vec![apex]);
        assert_eq!(plan.case, CollapseCase::Degree4);
        assert_eq!(plan.edges_removed(), 6);
    }

    #[test]
    fn test_cube_plans_are_feasible() {
        let mut table = fixtures::cube();
        compute_quadrics(&mut table);
        let (u, v) = edge_between(&table, 6, 4);
        let plan = plan_collapse(&table, u, v, 6).unwrap();
        assert_eq!(plan.case, CollapseCase::Degree4);
        assert!(plan.cost >= -1e-9);
    }

    #[test]
    fn test_costs_are_non_negative() {
        let mut table = fixtures::torus(5, 7);
        compute_quadrics(&mut table);
        for &(u, v) in table.condensed_edges() {
            if let Ok(plan) = plan_collapse(&table, u, v, 6) {
                assert!(plan.cost >= -1e-9, "cost {}", plan.cost);
            }
        }
    }

    #[test]
    fn test_flip_rejected() {
        let mut table = fixtures::octahedron();
        compute_quadrics(&mut table);
        let (u, v) = table.condensed_edges()[0];
        // Pushing both endpoints through the opposite side turns faces over
        let far = -(table.position(u).coords + table.position(v).coords) * 2.0;
        assert!(flips_normal(&table, u, v, &[], &Point3::from(far)));
        assert!(!flips_normal(&table, u, v, &[], table.position(u)));
    }
}
