//! Mesh decimation by quadric-error edge collapse.
//!
//! Each iteration draws `k` candidate edges by stratified sampling, solves
//! the quadric-optimal merge position for every candidate (Garland &
//! Heckbert, 1997), drops candidates that would break the manifold or turn a
//! face over, and collapses the cheapest survivor. A collapse on a closed
//! manifold removes exactly one vertex, two faces, and three undirected edges.
//! Degree-3 wings are removed first so no vertex ever falls below degree 3.
//!
//! The table is mutated in place and compacted once all iterations are done.
//!
//! # Example
//!
//! ```
//! use winged::prelude::*;
//! use winged::algo::decimate::{decimate, DecimateOptions};
//! use nalgebra::Point3;
//!
//! let vertices: Vec<_> = (0..8)
//!     .map(|i| Point3::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64))
//!     .collect();
//! let faces = vec![
//!     [0, 2, 3], [0, 3, 1], [4, 5, 7], [4, 7, 6], [0, 1, 5], [0, 5, 4],
//!     [2, 6, 7], [2, 7, 3], [0, 4, 6], [0, 6, 2], [1, 3, 7], [1, 7, 5],
//! ];
//! let mut table = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let report = decimate(&mut table, &DecimateOptions::new(1, 1).with_seed(7)).unwrap();
//! assert_eq!(report.edges_removed, 3);
//! assert_eq!(table.edge_count(), 15);
//! assert_eq!(table.num_faces(), 10);
//! ```
//!
//! # References
//!
//! - Garland, M. & Heckbert, P. (1997). "Surface Simplification Using Quadric
//!   Error Metrics." SIGGRAPH '97.

mod candidate;
mod collapse;
mod compact;
mod sampler;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

pub use collapse::CollapseCase;
pub use compact::{compact, Remap};

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{compute_quadrics, require_closed_manifold, TopologyTable};

use candidate::{plan_collapse, CollapsePlan};
use collapse::{collapse_edge, remove_degree3};
use sampler::StratifiedSampler;

/// Options for decimation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimateOptions {
    /// Number of collapse iterations. Each removes three undirected edges,
    /// plus three per pre-collapsed wing.
    pub edges_to_remove: usize,

    /// Candidates drawn per round, one per stratum of the edge list.
    pub candidates_per_iteration: usize,

    /// Seed for candidate sampling. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Decimation stops before the live edge count would drop to this or below.
    pub min_edges: usize,
}

impl DecimateOptions {
    /// Create options for `edges_to_remove` iterations with `candidates` per round.
    pub fn new(edges_to_remove: usize, candidates: usize) -> Self {
        Self {
            edges_to_remove,
            candidates_per_iteration: candidates,
            seed: None,
            min_edges: 6,
        }
    }

    /// Make sampling reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the edge floor.
    pub fn with_min_edges(mut self, min_edges: usize) -> Self {
        self.min_edges = min_edges;
        self
    }

    /// Reject non-positive counts.
    pub fn validate(&self) -> Result<()> {
        if self.edges_to_remove == 0 {
            return Err(MeshError::invalid_param(
                "edges_to_remove",
                self.edges_to_remove,
                "must be positive",
            ));
        }
        if self.candidates_per_iteration == 0 {
            return Err(MeshError::invalid_param(
                "candidates_per_iteration",
                self.candidates_per_iteration,
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Why a decimation stopped before finishing its iterations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Another collapse would leave too few edges.
    #[error("edge floor reached with {edges} edges left")]
    EdgeFloor {
        /// Live undirected edges when decimation stopped.
        edges: usize,
    },

    /// Every edge of the current table was sampled and rejected.
    #[error("no collapsible edge left")]
    NoValidCandidate,
}

/// What a decimation did.
#[derive(Debug, Clone, Default)]
pub struct DecimationReport {
    /// Edge collapses performed.
    pub collapses: usize,
    /// Degree-3 wings removed ahead of a collapse.
    pub pre_collapses: usize,
    /// Measured drop in live undirected edges.
    pub edges_removed: usize,
    /// Measured drop in live faces.
    pub faces_removed: usize,
    /// Measured drop in live vertices.
    pub vertices_removed: usize,
    /// Set when decimation stopped early.
    pub aborted: Option<AbortReason>,
    /// Quadric cost of each collapse, in order.
    pub costs: Vec<f64>,
    /// Index mapping applied by the final compaction.
    pub remap: Remap,
}

impl DecimationReport {
    /// Whether every requested iteration ran.
    pub fn completed(&self) -> bool {
        self.aborted.is_none()
    }
}

/// Decimate a closed mesh in place.
///
/// # Errors
/// Fails before touching the table if the options are invalid, the table is
/// not a closed manifold with every degree at least 3, or more edges are
/// requested than the table has. An [`MeshError::InconsistentTopology`] from
/// the surgery leaves the table partially rewritten; rebuild it from source.
pub fn decimate(table: &mut TopologyTable, options: &DecimateOptions) -> Result<DecimationReport> {
    decimate_with_progress(table, options, &Progress::none())
}

/// Decimation with progress reporting (one step per iteration).
pub fn decimate_with_progress(
    table: &mut TopologyTable,
    options: &DecimateOptions,
    progress: &Progress,
) -> Result<DecimationReport> {
    options.validate()?;
    require_closed_manifold(table)?;

    let available = table.edge_count();
    if options.edges_to_remove > available {
        return Err(MeshError::ExceedsAvailableEdges {
            requested: options.edges_to_remove,
            available,
        });
    }

    compute_quadrics(table);

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut sampler = StratifiedSampler::new(table.condensed_edges());

    let (v0, e0, f0) = (table.num_vertices(), available, table.num_faces());
    let total = options.edges_to_remove;
    let k = options.candidates_per_iteration;
    let mut report = DecimationReport::default();

    for iteration in 0..total {
        let edges = table.edge_count();
        if edges < 3 + options.min_edges + 1 {
            report.aborted = Some(AbortReason::EdgeFloor { edges });
            break;
        }

        let Some(plan) = select_candidate(table, &mut sampler, &mut rng, k, options.min_edges)
        else {
            report.aborted = Some(AbortReason::NoValidCandidate);
            break;
        };

        let case = apply_plan(table, &plan)?;
        sampler.redirect(plan.removed, plan.survivor);
        log::debug!(
            "collapsed {:?} into {:?} ({:?}, cost {:.3e}, {} pre-collapses)",
            plan.removed,
            plan.survivor,
            case,
            plan.cost,
            plan.pre_collapse.len()
        );

        report.collapses += 1;
        report.pre_collapses += plan.pre_collapse.len();
        report.costs.push(plan.cost);
        progress.report(iteration + 1, total, "Collapsing edges");
    }

    report.edges_removed = e0 - table.edge_count();
    report.faces_removed = f0 - table.num_faces();
    report.vertices_removed = v0 - table.num_vertices();
    report.remap = compact(table);

    log::info!(
        "decimation: {} collapses, {} -> {} edges, {} -> {} faces",
        report.collapses,
        e0,
        table.edge_count(),
        f0,
        table.num_faces()
    );
    if let Some(reason) = report.aborted {
        log::warn!("decimation stopped after {} of {} iterations: {}", report.collapses, total, reason);
    }

    Ok(report)
}

/// Draw rounds of candidates until one is feasible; the cheapest of that round wins.
///
/// Rejected candidates leave the pool. When the pool runs dry after a
/// collapse it is rebuilt from the table, so `None` means no edge of the
/// current table can be collapsed.
fn select_candidate(
    table: &TopologyTable,
    sampler: &mut StratifiedSampler,
    rng: &mut StdRng,
    k: usize,
    min_edges: usize,
) -> Option<CollapsePlan> {
    loop {
        let drawn = sampler.draw(k, rng, table);
        if drawn.is_empty() {
            if sampler.is_fresh() {
                return None;
            }
            log::debug!("candidate pool exhausted, resampling {} edges", table.edge_count());
            sampler.refill(table.condensed_edges());
            continue;
        }

        let mut best: Option<(usize, CollapsePlan)> = None;
        for draw in drawn {
            let (u, v) = draw.edge;
            match plan_collapse(table, u, v, min_edges) {
                Ok(plan) => {
                    if best.as_ref().map_or(true, |(_, b)| plan.cost < b.cost) {
                        best = Some((draw.slot, plan));
                    }
                }
                Err(reason) => {
                    log::debug!("rejected {:?}-{:?}: {:?}", u, v, reason);
                    sampler.consume(draw.slot);
                }
            }
        }
        if let Some((slot, plan)) = best {
            sampler.consume(slot);
            return Some(plan);
        }
        log::debug!("no feasible candidate in round, {} left", sampler.remaining());
    }
}

/// Run the pre-collapses and the collapse of `plan`, checking the rewiring
/// and the edge count it promised.
fn apply_plan(table: &mut TopologyTable, plan: &CollapsePlan) -> Result<CollapseCase> {
    let edges_before = table.edge_count();
    for &wing in &plan.pre_collapse {
        remove_degree3(table, wing)?;
    }
    let edge = table
        .find_halfedge(plan.survivor, plan.removed)
        .ok_or_else(|| {
            MeshError::InconsistentTopology(format!(
                "edge {:?}->{:?} vanished during pre-collapse",
                plan.survivor, plan.removed
            ))
        })?;

    let case = collapse_edge(table, edge, plan.position)?;
    let removed = edges_before - table.edge_count();
    if case != plan.case || removed != plan.edges_removed() {
        return Err(MeshError::InconsistentTopology(format!(
            "collapse {:?}->{:?} ran as {:?} removing {} edges, planned {:?} removing {}",
            plan.survivor,
            plan.removed,
            case,
            removed,
            plan.case,
            plan.edges_removed()
        )));
    }
    Ok(case)
}
