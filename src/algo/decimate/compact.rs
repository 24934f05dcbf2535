//! Compaction: squeeze removed slots out of the arenas after decimation.

use std::collections::BTreeMap;

use crate::mesh::{refresh_normals, FaceId, HalfEdgeId, TopologyTable, VertexId};

/// Old-to-new index mapping produced by [`compact`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Remap {
    vertices: Vec<Option<VertexId>>,
    faces: Vec<Option<FaceId>>,
}

impl Remap {
    /// The new id of a vertex, or `None` if it was removed.
    pub fn vertex(&self, old: VertexId) -> Option<VertexId> {
        self.vertices.get(old.index()).copied().flatten()
    }

    /// The new id of a face, or `None` if it was removed.
    pub fn face(&self, old: FaceId) -> Option<FaceId> {
        self.faces.get(old.index()).copied().flatten()
    }

    /// Number of vertex slots before compaction.
    pub fn vertex_slots(&self) -> usize {
        self.vertices.len()
    }

    /// Whether compaction left every index where it was.
    pub fn is_identity(&self) -> bool {
        self.vertices
            .iter()
            .enumerate()
            .all(|(i, v)| v.map(|v| v.index()) == Some(i))
            && self
                .faces
                .iter()
                .enumerate()
                .all(|(i, f)| f.map(|f| f.index()) == Some(i))
    }
}

/// Dense slot for every live entry of an arena, in slot order.
fn dense_slots<T>(arena: &[Option<T>]) -> Vec<Option<usize>> {
    let mut next = 0;
    arena
        .iter()
        .map(|slot| {
            slot.as_ref().map(|_| {
                next += 1;
                next - 1
            })
        })
        .collect()
}

fn lookup(map: &[Option<usize>], index: usize) -> Option<usize> {
    map.get(index).copied().flatten()
}

/// Rebuild dense vertex, half-edge, and face arenas and the origin×destination
/// rows, then recompute face and smoothed normals.
///
/// Afterwards every live vertex's stored id equals its slot again.
pub fn compact(table: &mut TopologyTable) -> Remap {
    let vertex_map = dense_slots(&table.vertices);
    let halfedge_map = dense_slots(&table.halfedges);
    let face_map = dense_slots(&table.faces);

    let vid = |v: VertexId| lookup(&vertex_map, v.index()).map_or(VertexId::invalid(), VertexId::new);
    let hid = |h: HalfEdgeId| {
        lookup(&halfedge_map, h.index()).map_or(HalfEdgeId::invalid(), HalfEdgeId::new)
    };
    let fid = |f: FaceId| lookup(&face_map, f.index()).map_or(FaceId::invalid(), FaceId::new);

    let vertices: Vec<_> = std::mem::take(&mut table.vertices)
        .into_iter()
        .flatten()
        .map(|mut v| {
            v.id = vid(v.id);
            v.halfedge = hid(v.halfedge);
            Some(v)
        })
        .collect();

    let halfedges: Vec<_> = std::mem::take(&mut table.halfedges)
        .into_iter()
        .flatten()
        .map(|mut he| {
            he.origin = vid(he.origin);
            he.dest = vid(he.dest);
            he.face = fid(he.face);
            he.next = hid(he.next);
            he.prev = hid(he.prev);
            Some(he)
        })
        .collect();

    let faces: Vec<_> = std::mem::take(&mut table.faces)
        .into_iter()
        .flatten()
        .map(|mut f| {
            f.halfedge = hid(f.halfedge);
            Some(f)
        })
        .collect();

    let mut rows = vec![BTreeMap::new(); vertices.len()];
    for (i, he) in halfedges.iter().enumerate() {
        if let Some(he) = he {
            rows[he.origin.index()].insert(he.dest, HalfEdgeId::new(i));
        }
    }

    log::debug!(
        "compacted to {} vertices, {} half-edges, {} faces",
        vertices.len(),
        halfedges.len(),
        faces.len()
    );

    let quadrics_ready = table.quadrics_ready;
    *table = TopologyTable::from_arenas(vertices, halfedges, faces, rows, quadrics_ready);
    refresh_normals(table);

    Remap {
        vertices: vertex_map
            .into_iter()
            .map(|slot| slot.map(VertexId::new))
            .collect(),
        faces: face_map.into_iter().map(|slot| slot.map(FaceId::new)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::decimate::collapse::collapse_edge;
    use crate::mesh::fixtures;

    #[test]
    fn test_compact_without_holes_is_identity() {
        let mut table = fixtures::cube();
        let remap = compact(&mut table);
        assert!(remap.is_identity());
        assert_eq!(table.num_vertices(), 8);
        assert!(table.is_valid());
    }

    #[test]
    fn test_compact_after_collapse() {
        let mut table = fixtures::icosahedron();
        let edge = table.halfedge_ids().next().unwrap();
        let (o, d) = (table.origin(edge), table.dest(edge));
        let target = *table.position(o);
        collapse_edge(&mut table, edge, target).unwrap();
        assert!(table.has_holes());

        let remap = compact(&mut table);
        assert!(!table.has_holes());
        assert!(!remap.is_identity());
        assert_eq!(remap.vertex(d), None);
        assert_eq!(remap.vertex_slots(), 12);

        let o_new = remap.vertex(o).unwrap();
        assert_eq!(*table.position(o_new), target);
        assert_eq!(table.vertex_slots(), 11);
        assert_eq!(table.face_slots(), 18);
        for (id, v) in table.vertices() {
            assert_eq!(v.id, id);
        }
        assert!(table.is_valid());
    }

    #[test]
    fn test_compact_recomputes_normals() {
        let mut table = fixtures::octahedron();
        let edge = table.halfedge_ids().next().unwrap();
        let target = nalgebra::center(
            table.position(table.origin(edge)),
            table.position(table.dest(edge)),
        );
        collapse_edge(&mut table, edge, target).unwrap();
        compact(&mut table);

        for (f, face) in table.faces() {
            let [p0, p1, p2] = table.face_positions(f);
            let expected = crate::mesh::triangle_normal(&p0, &p1, &p2);
            assert!((face.normal - expected).norm() < 1e-10);
        }
        for (_, v) in table.vertices() {
            assert!((v.normal.norm() - 1.0).abs() < 1e-10);
        }
    }
}
