//! The 1-to-4 topological split shared by every subdivision scheme.
//!
//! A pass builds a fresh table: old vertices first (slot order, so their new
//! ids are `0..V`), then one edge-vertex per undirected edge (`V..V+E`), then
//! four child faces per parent face. Schemes only supply positions.

use nalgebra::{Point2, Point3};

use crate::error::{MeshError, Result};
use crate::mesh::{refresh_normals, HalfEdgeId, TopologyTable, VertexId};

/// Position rules of a subdivision scheme.
pub(super) trait SubdivisionRule {
    /// New position of an existing vertex.
    fn vertex_point(&self, table: &TopologyTable, v: VertexId) -> Point3<f64>;

    /// Position of the vertex inserted on the edge of `he`.
    fn edge_point(&self, table: &TopologyTable, he: HalfEdgeId) -> Point3<f64>;
}

fn midpoint(a: Point2<f64>, b: Point2<f64>) -> Point2<f64> {
    Point2::from((a.coords + b.coords) * 0.5)
}

/// Run one subdivision pass. The input must already be a closed manifold.
pub(super) fn split_pass<R: SubdivisionRule>(table: &TopologyTable, rule: &R) -> Result<TopologyTable> {
    let num_edges = table.edge_count();
    let mut out = TopologyTable::with_capacity(table.num_vertices() + num_edges, table.num_faces() * 4);

    let mut vertex_map = vec![VertexId::invalid(); table.vertex_slots()];
    for v in table.vertex_ids() {
        vertex_map[v.index()] = out.add_vertex(rule.vertex_point(table, v));
    }

    // Split every undirected edge once; `children[h]` holds the two halves of h
    let mut children: Vec<Option<[HalfEdgeId; 2]>> = vec![None; table.halfedges.len()];
    for he in table.halfedge_ids() {
        if children[he.index()].is_some() {
            continue;
        }
        let twin = table.twin(he);
        let o = vertex_map[table.origin(he).index()];
        let d = vertex_map[table.dest(he).index()];

        let m = out.add_vertex(rule.edge_point(table, he));
        let om = out.get_or_insert_halfedge(o, m);
        let md = out.get_or_insert_halfedge(m, d);
        let dm = out.get_or_insert_halfedge(d, m);
        let mo = out.get_or_insert_halfedge(m, o);

        children[he.index()] = Some([om, md]);
        children[twin.index()] = Some([dm, mo]);
    }

    for (f, face) in table.faces() {
        let hes = table.face_halfedges(f);
        let mut corners = [VertexId::invalid(); 3];
        let mut mids = [VertexId::invalid(); 3];
        for i in 0..3 {
            let [first, _] = children[hes[i].index()].ok_or_else(|| {
                MeshError::InconsistentTopology(format!("{:?} was never split", hes[i]))
            })?;
            corners[i] = vertex_map[table.origin(hes[i]).index()];
            // mids[i] sits on the edge leaving corner i
            mids[i] = out.dest(first);
        }

        let [v0, v1, v2] = corners;
        let [m01, m12, m20] = mids;
        let children_faces = [
            [v0, m01, m20],
            [v1, m12, m01],
            [v2, m20, m12],
            [m01, m12, m20],
        ];

        let uvs = face.corner_uvs.map(|[a, b, c]| {
            let (ab, bc, ca) = (midpoint(a, b), midpoint(b, c), midpoint(c, a));
            [[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]
        });

        for (k, tri) in children_faces.into_iter().enumerate() {
            let child = out.add_triangle(tri).map_err(|rejection| {
                MeshError::InconsistentTopology(format!(
                    "child {} of {:?} rejected: {:?}",
                    k, f, rejection
                ))
            })?;
            if let Some(uvs) = &uvs {
                out.face_mut(child).corner_uvs = Some(uvs[k]);
            }
        }
    }

    refresh_normals(&mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{fixtures, SourceCorner, MeshSource, build_from_indexed_triangles};

    /// Keeps old vertices in place and inserts plain midpoints.
    struct Midpoint;

    impl SubdivisionRule for Midpoint {
        fn vertex_point(&self, table: &TopologyTable, v: VertexId) -> Point3<f64> {
            *table.position(v)
        }

        fn edge_point(&self, table: &TopologyTable, he: HalfEdgeId) -> Point3<f64> {
            nalgebra::center(table.position(table.origin(he)), table.position(table.dest(he)))
        }
    }

    #[test]
    fn test_split_counts() {
        let table = fixtures::cube();
        let (v, e, f) = (table.num_vertices(), table.edge_count(), table.num_faces());
        let out = split_pass(&table, &Midpoint).unwrap();

        assert_eq!(out.num_vertices(), v + e);
        assert_eq!(out.num_faces(), 4 * f);
        assert_eq!(out.edge_count(), 2 * e + 3 * f);
        assert!(out.is_valid());
    }

    #[test]
    fn test_split_preserves_surface() {
        let table = fixtures::octahedron();
        let out = split_pass(&table, &Midpoint).unwrap();
        assert!((out.surface_area() - table.surface_area()).abs() < 1e-10);
        // Old vertices keep their ids
        for v in table.vertex_ids() {
            assert_eq!(out.position(v), table.position(v));
        }
    }

    #[test]
    fn test_split_interpolates_uvs() {
        let (positions, faces) = fixtures::tetrahedron_data();
        let mut source = MeshSource::from_triangles(&positions, &faces);
        source.uvs = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
        source.faces[0] = (0..3)
            .map(|i| SourceCorner::new(faces[0][i]).with_uv(i))
            .collect();
        let (table, _) = build_from_indexed_triangles(&source).unwrap();

        let out = split_pass(&table, &Midpoint).unwrap();
        let with_uvs: Vec<_> = out.faces().filter(|(_, f)| f.corner_uvs.is_some()).collect();
        assert_eq!(with_uvs.len(), 4);

        // The interior child holds the three edge midpoints
        let interior = with_uvs[3].1.corner_uvs.unwrap();
        assert_eq!(interior[0], Point2::new(0.5, 0.0));
        assert_eq!(interior[1], Point2::new(0.5, 0.5));
        assert_eq!(interior[2], Point2::new(0.0, 0.5));
    }
}
