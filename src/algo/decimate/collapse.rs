//! Local surgery for edge collapses.
//!
//! Collapsing `o -> d` keeps `o` and removes `d`, the two faces on either side
//! of the edge, and three undirected edges. Which rewiring applies depends on
//! the degree of `d`; see [`CollapseCase`].
//!
//! ```text
//!           a                      a
//!         /   \                    |
//!       /  f1   \                  |
//!     o --------- d    ==>         o
//!       \  f2   /                  |
//!         \   /                    |
//!           b                      b
//! ```

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{triangle_normal, HalfEdgeId, TopologyTable, VertexId};

/// The closed set of collapse rewirings, keyed on the degree of the removed vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseCase {
    /// The removed vertex has exactly three neighbors: its three faces merge into one.
    Degree3,
    /// One spoke besides the edge and both wings is re-homed.
    Degree4,
    /// Two spokes are re-homed.
    Degree5,
    /// The remaining spoke ring is walked and every spoke re-homed.
    Ring,
}

impl CollapseCase {
    /// The case for a removed vertex of the given degree, `None` below 3.
    pub fn classify(degree: usize) -> Option<Self> {
        match degree {
            0..=2 => None,
            3 => Some(CollapseCase::Degree3),
            4 => Some(CollapseCase::Degree4),
            5 => Some(CollapseCase::Degree5),
            _ => Some(CollapseCase::Ring),
        }
    }

    /// Number of spokes re-homed onto the survivor.
    pub fn spoke_count(self, degree: usize) -> usize {
        match self {
            CollapseCase::Degree3 => 0,
            CollapseCase::Degree4 => 1,
            CollapseCase::Degree5 => 2,
            CollapseCase::Ring => degree - 3,
        }
    }
}

fn inconsistent(message: String) -> MeshError {
    log::error!("{}", message);
    MeshError::InconsistentTopology(message)
}

/// Remove a degree-3 vertex, merging its three faces into the triangle of its ring.
///
/// Removes one vertex, two faces, and three undirected edges. The surviving
/// face takes, for each ring vertex, the corner attributes that vertex had in
/// the face being dropped around it.
pub(crate) fn remove_degree3(table: &mut TopologyTable, v: VertexId) -> Result<()> {
    let spokes = table.vertex_ring(v);
    if spokes.len() != 3 || table.degree(v) != 3 {
        return Err(inconsistent(format!(
            "{:?} has degree {} and a ring of {}; expected 3",
            v,
            table.degree(v),
            spokes.len()
        )));
    }
    let spokes = [spokes[0], spokes[1], spokes[2]];

    // Face i is (v, p_i, p_{i+1}); its outer edge g_i runs p_i -> p_{i+1}
    let ring = spokes.map(|h| table.dest(h));
    let faces = spokes.map(|h| table.left_face(h));
    let outer = spokes.map(|h| table.next(h));
    let twins = spokes.map(|h| table.twin(h));
    let corners: [_; 3] = std::array::from_fn(|i| table.corner_attributes(faces[i], ring[i]));

    let keep = faces[0];
    for i in 0..3 {
        table.halfedge_mut(outer[i]).face = keep;
        table.link(outer[i], outer[(i + 1) % 3]);
    }

    let normal = triangle_normal(
        table.position(ring[0]),
        table.position(ring[1]),
        table.position(ring[2]),
    );
    let face = table.face_mut(keep);
    face.halfedge = outer[0];
    face.normal = normal;
    face.corner_uvs = match corners.map(|(uv, _)| uv) {
        [Some(a), Some(b), Some(c)] => Some([a, b, c]),
        _ => None,
    };
    face.corner_normals = match corners.map(|(_, n)| n) {
        [Some(a), Some(b), Some(c)] => Some([a, b, c]),
        _ => None,
    };

    for i in 0..3 {
        table.remove_halfedge(spokes[i]);
        table.remove_halfedge(twins[i]);
    }
    table.remove_face(faces[1]);
    table.remove_face(faces[2]);
    table.remove_vertex(v);

    for i in 0..3 {
        table.vertex_mut(ring[i]).halfedge = outer[i];
    }
    Ok(())
}

/// Collapse `edge` (`o -> d`): `d` merges into `o`, which moves to `target`
/// and absorbs `d`'s quadric.
///
/// A degree-3 `d` is removed with [`remove_degree3`], leaving the face
/// `(o, a, b)`; `o` then moves like in the other cases.
pub(crate) fn collapse_edge(
    table: &mut TopologyTable,
    edge: HalfEdgeId,
    target: Point3<f64>,
) -> Result<CollapseCase> {
    let (o, d) = (table.origin(edge), table.dest(edge));
    let degree = table.degree(d);
    let case = CollapseCase::classify(degree).ok_or_else(|| {
        inconsistent(format!("{:?} has degree {} and cannot be collapsed", d, degree))
    })?;

    let quadric = table.vertex(d).quadric;
    match case {
        CollapseCase::Degree3 => remove_degree3(table, d)?,
        CollapseCase::Degree4 | CollapseCase::Degree5 | CollapseCase::Ring => {
            rehome_spokes(table, edge, case)?
        }
    }

    let survivor = table.vertex_mut(o);
    survivor.quadric += quadric;
    survivor.position = target;
    Ok(case)
}

/// Spokes of `d` strictly between `d -> a` and `d -> b`, walking away from the edge.
fn walk_spokes(
    table: &TopologyTable,
    first: HalfEdgeId,
    stop: HalfEdgeId,
    case: CollapseCase,
    degree: usize,
) -> Result<Vec<HalfEdgeId>> {
    let expected = case.spoke_count(degree);
    let mut spokes = Vec::with_capacity(expected);

    match case {
        CollapseCase::Degree4 => spokes.push(first),
        CollapseCase::Degree5 => {
            spokes.push(first);
            spokes.push(table.next(table.twin(first)));
        }
        CollapseCase::Ring => {
            let mut he = first;
            while he != stop && spokes.len() <= expected {
                spokes.push(he);
                he = table.next(table.twin(he));
            }
        }
        CollapseCase::Degree3 => {}
    }

    let closes = match spokes.last() {
        Some(&last) => table.next(table.twin(last)) == stop,
        None => first == stop,
    };
    if spokes.len() != expected || !closes {
        return Err(inconsistent(format!(
            "spoke walk found {} spokes, expected {} for {:?}",
            spokes.len(),
            expected,
            case
        )));
    }
    Ok(spokes)
}

fn rehome_spokes(table: &mut TopologyTable, e: HalfEdgeId, case: CollapseCase) -> Result<()> {
    let (o, d) = (table.origin(e), table.dest(e));
    let t = table.twin(e);

    // f1 = (o, d, a) holds e, x, y; f2 = (d, o, b) holds t, z, w
    let (x, y) = (table.next(e), table.prev(e));
    let (z, w) = (table.next(t), table.prev(t));
    let (tx, tw, tz) = (table.twin(x), table.twin(w), table.twin(z));
    let (a, b) = (table.dest(x), table.dest(z));
    let (f1, f2) = (table.left_face(e), table.left_face(t));

    if a == b || f1 == f2 {
        return Err(inconsistent(format!("edge {:?}->{:?} has a single wing", o, d)));
    }

    let spokes = walk_spokes(table, table.next(tx), tw, case, table.degree(d))?;
    let mut pairs = Vec::with_capacity(spokes.len());
    for &s in &spokes {
        let c = table.dest(s);
        if table.find_halfedge(o, c).is_some() {
            return Err(inconsistent(format!(
                "{:?} and {:?} share neighbor {:?} outside the wings",
                o, d, c
            )));
        }
        pairs.push((s, table.twin(s)));
    }

    for he in [e, t, x, y, z, w] {
        table.remove_halfedge(he);
    }
    table.remove_face(f1);
    table.remove_face(f2);

    // a -> d becomes a -> o (twin o -> a survives); d -> b becomes o -> b (twin b -> o survives)
    table.set_dest(tx, o);
    table.set_origin(tw, o);
    for (out, back) in pairs {
        table.set_origin(out, o);
        table.set_dest(back, o);
    }

    table.remove_vertex(d);
    table.vertex_mut(o).halfedge = tw;
    table.vertex_mut(a).halfedge = tx;
    table.vertex_mut(b).halfedge = tz;
    Ok(())
}
