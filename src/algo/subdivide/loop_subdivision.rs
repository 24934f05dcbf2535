//! Loop subdivision for closed triangle meshes.

use std::f64::consts::PI;

use nalgebra::Point3;

use crate::mesh::{HalfEdgeId, TopologyTable, VertexId};

use super::split::SubdivisionRule;

/// Loop's vertex weight for a vertex of degree `n`:
/// `β(n) = (1/n)(5/8 − (3/8 + ¼cos(2π/n))²)`.
pub fn loop_beta(n: usize) -> f64 {
    let n = n as f64;
    let c = 3.0 / 8.0 + 0.25 * (2.0 * PI / n).cos();
    (5.0 / 8.0 - c * c) / n
}

/// Approximating rules: every vertex moves.
///
/// - **Vertex**: `(1 − nβ)·v + β·Σ neighbors`
/// - **Edge**: `3/8·(v0 + v1) + 1/8·(left wing + right wing)`
pub(super) struct LoopRule;

impl SubdivisionRule for LoopRule {
    fn vertex_point(&self, table: &TopologyTable, v: VertexId) -> Point3<f64> {
        let neighbors = table.neighbors(v);
        let n = neighbors.len();
        let beta = loop_beta(n);

        let sum = neighbors
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, &u| acc + table.position(u).coords);

        Point3::from(table.position(v).coords * (1.0 - n as f64 * beta) + sum * beta)
    }

    fn edge_point(&self, table: &TopologyTable, he: HalfEdgeId) -> Point3<f64> {
        let twin = table.twin(he);
        let p0 = table.position(table.origin(he)).coords;
        let p1 = table.position(table.dest(he)).coords;
        let left = table.position(table.dest(table.next(he))).coords;
        let right = table.position(table.dest(table.next(twin))).coords;

        Point3::from((p0 + p1) * (3.0 / 8.0) + (left + right) * (1.0 / 8.0))
    }
}
