//! Stratified sampling of collapse candidates.

use rand::Rng;

use crate::mesh::{TopologyTable, VertexId};

/// One sampled pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Draw {
    /// Pool position, for [`StratifiedSampler::consume`].
    pub slot: usize,
    pub edge: (VertexId, VertexId),
}

/// Draws candidate edges from a snapshot of the undirected edge list, one
/// draw per equal contiguous stratum.
///
/// An entry leaves the pool when it is consumed (collapsed or rejected) or
/// when a draw finds it no longer in the table. Entries that lose a round
/// stay in the pool. After a collapse, [`redirect`](Self::redirect) points
/// the removed vertex's entries at the survivor.
#[derive(Debug, Clone)]
pub(super) struct StratifiedSampler {
    pool: Vec<Option<(VertexId, VertexId)>>,
    remaining: usize,
    fresh: bool,
}

impl StratifiedSampler {
    /// Snapshot the condensed edge list.
    pub fn new(edges: &[(VertexId, VertexId)]) -> Self {
        Self {
            pool: edges.iter().copied().map(Some).collect(),
            remaining: edges.len(),
            fresh: true,
        }
    }

    /// Replace the pool by a new snapshot.
    pub fn refill(&mut self, edges: &[(VertexId, VertexId)]) {
        *self = Self::new(edges);
    }

    /// Live entries left in the pool.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Whether no collapse happened since the last snapshot.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Draw up to `k` entries still present in `table`, one per stratum.
    ///
    /// Each stratum is scanned cyclically from a random start until a live
    /// entry is found. Stale entries met on the way are dropped. Drawn
    /// entries stay in the pool until consumed.
    pub fn draw<R: Rng>(&mut self, k: usize, rng: &mut R, table: &TopologyTable) -> Vec<Draw> {
        let len = self.pool.len();
        if len == 0 || k == 0 || self.remaining == 0 {
            return Vec::new();
        }

        let strata = k.min(len);
        let size = len.div_ceil(strata);
        let mut drawn = Vec::with_capacity(strata);

        for s in 0..strata {
            let lo = s * size;
            let hi = ((s + 1) * size).min(len);
            if lo >= hi {
                continue;
            }
            let span = hi - lo;
            let start = rng.gen_range(0..span);

            for step in 0..span {
                let slot = lo + (start + step) % span;
                let Some((u, v)) = self.pool[slot] else {
                    continue;
                };
                if table.try_vertex(u).is_some() && table.find_halfedge(u, v).is_some() {
                    drawn.push(Draw { slot, edge: (u, v) });
                    break;
                }
                self.consume(slot);
            }
        }
        drawn
    }

    /// Drop the entry at `slot`.
    pub fn consume(&mut self, slot: usize) {
        if self.pool[slot].take().is_some() {
            self.remaining -= 1;
        }
    }

    /// Rewrite entries of `removed` to `survivor` after `removed` collapsed into it.
    ///
    /// Entries keep the lower id first. The collapsed edge itself is dropped.
    pub fn redirect(&mut self, removed: VertexId, survivor: VertexId) {
        self.fresh = false;
        for slot in 0..self.pool.len() {
            let Some((u, v)) = self.pool[slot] else {
                continue;
            };
            if u != removed && v != removed {
                continue;
            }
            let other = if u == removed { v } else { u };
            if other == survivor {
                self.consume(slot);
            } else {
                self.pool[slot] = Some((other.min(survivor), other.max(survivor)));
            }
        }
    }
}
