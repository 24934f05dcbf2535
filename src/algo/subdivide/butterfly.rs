//! Modified Butterfly subdivision (Zorin, Schröder & Sweldens, 1996).
//!
//! Interpolating: original vertices keep their positions, only edge-vertices
//! are computed. An endpoint is *regular* when its degree is 6.

use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};

use crate::mesh::{HalfEdgeId, TopologyTable, VertexId};

use super::split::SubdivisionRule;

/// Stencil weights `s_j` for the ring of an extraordinary vertex of degree `k`,
/// `j = 0` being the other endpoint of the edge. The vertex itself weighs 3/4.
pub fn irregular_weights(k: usize) -> Vec<f64> {
    match k {
        3 => vec![5.0 / 12.0, -1.0 / 12.0, -1.0 / 12.0],
        4 => vec![3.0 / 8.0, 0.0, -1.0 / 8.0, 0.0],
        _ => {
            let kf = k as f64;
            (0..k)
                .map(|j| {
                    let t = 2.0 * PI * j as f64 / kf;
                    (0.25 + t.cos() + 0.5 * (2.0 * t).cos()) / kf
                })
                .collect()
        }
    }
}

pub(super) struct ButterflyRule;

impl ButterflyRule {
    /// Regular 8-point stencil: 1/2 on the endpoints, 1/8 on the wings,
    /// -1/16 on the four vertices across the wing edges.
    fn regular(table: &TopologyTable, he: HalfEdgeId) -> Vector3<f64> {
        let twin = table.twin(he);
        let pos = |v: VertexId| table.position(v).coords;

        let ends = pos(table.origin(he)) + pos(table.dest(he));
        let wings = pos(table.dest(table.next(he))) + pos(table.dest(table.next(twin)));
        let tips = [
            table.next(he),
            table.prev(he),
            table.next(twin),
            table.prev(twin),
        ]
        .iter()
        .fold(Vector3::zeros(), |acc, &h| {
            acc + pos(table.dest(table.next(table.twin(h))))
        });

        ends * 0.5 + wings * 0.125 - tips * 0.0625
    }

    /// Stencil around the extraordinary endpoint `center`, the edge running to `other`.
    fn irregular(table: &TopologyTable, center: VertexId, other: VertexId) -> Vector3<f64> {
        let ring = table.vertex_ring_from(center, other);
        let weights = irregular_weights(ring.len());

        ring.iter()
            .zip(&weights)
            .fold(table.position(center).coords * 0.75, |acc, (&h, &w)| {
                acc + table.position(table.dest(h)).coords * w
            })
    }
}

impl SubdivisionRule for ButterflyRule {
    fn vertex_point(&self, table: &TopologyTable, v: VertexId) -> Point3<f64> {
        *table.position(v)
    }

    fn edge_point(&self, table: &TopologyTable, he: HalfEdgeId) -> Point3<f64> {
        let (o, d) = (table.origin(he), table.dest(he));
        let regular_o = table.degree(o) == 6;
        let regular_d = table.degree(d) == 6;

        let p = match (regular_o, regular_d) {
            (true, true) => Self::regular(table, he),
            (false, true) => Self::irregular(table, o, d),
            (true, false) => Self::irregular(table, d, o),
            (false, false) => (Self::irregular(table, o, d) + Self::irregular(table, d, o)) * 0.5,
        };
        Point3::from(p)
    }
}
