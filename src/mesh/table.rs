//! The topology table: sole owner and sole mutation surface of a mesh.
//!
//! # Structure
//!
//! - Vertices, half-edges, and faces live in arenas addressed by
//!   [`VertexId`], [`HalfEdgeId`], and [`FaceId`]. Removed records leave a
//!   `None` slot until the arena is compacted.
//! - Half-edges are additionally registered in a sparse origin×destination
//!   table: row `i` maps destination `j` to the half-edge `(i, j)`. The twin
//!   of `(i, j)` is therefore the cell `(j, i)`, and the degree of `i` is the
//!   population of row `i`.
//! - Degree, directed edge count, and the condensed (undirected) edge list are
//!   memoized. Every structural mutation funnels through
//!   [`TopologyTable::mark_structure_changed`], which drops all of them at once.
//!
//! # Invariants
//!
//! After every public operation on a closed mesh:
//! - every half-edge has a twin and a left face;
//! - every face boundary is a 3-cycle and `next`/`prev` are mutually inverse;
//! - cell `(i, j)` holds a half-edge whose origin is `i` and destination is `j`;
//! - a live vertex's stored id equals its slot and its degree is at least 3.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use nalgebra::{Point2, Point3, Vector3};

use super::index::{FaceId, HalfEdgeId, VertexId};
use super::records::{Face, HalfEdge, Vertex};

/// Why [`TopologyTable::add_triangle`] refused a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleRejection {
    /// Two corners are the same vertex.
    Degenerate,
    /// The directed edge already bounds another face.
    EdgeInUse {
        /// Origin of the conflicting half-edge.
        origin: VertexId,
        /// Destination of the conflicting half-edge.
        dest: VertexId,
    },
}

/// Memoized topology summaries, dropped wholesale on structural change.
#[derive(Debug, Clone, Default)]
struct TopologyCache {
    degrees: OnceCell<Vec<usize>>,
    directed_edges: OnceCell<usize>,
    condensed_edges: OnceCell<Vec<(VertexId, VertexId)>>,
}

/// A closed triangle mesh stored as a winged-edge adjacency table.
#[derive(Debug, Clone, Default)]
pub struct TopologyTable {
    pub(crate) vertices: Vec<Option<Vertex>>,
    pub(crate) halfedges: Vec<Option<HalfEdge>>,
    pub(crate) faces: Vec<Option<Face>>,
    /// `rows[origin][dest]` is the half-edge `(origin, dest)`.
    pub(crate) rows: Vec<BTreeMap<VertexId, HalfEdgeId>>,
    pub(crate) quadrics_ready: bool,
    live_vertices: usize,
    live_faces: usize,
    cache: TopologyCache,
}

impl TopologyTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // A closed triangle mesh has exactly 3F half-edges.
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_faces * 3),
            faces: Vec::with_capacity(num_faces),
            rows: Vec::with_capacity(num_vertices),
            ..Self::default()
        }
    }

    /// Reassemble a table from dense arenas (used by compaction).
    pub(crate) fn from_arenas(
        vertices: Vec<Option<Vertex>>,
        halfedges: Vec<Option<HalfEdge>>,
        faces: Vec<Option<Face>>,
        rows: Vec<BTreeMap<VertexId, HalfEdgeId>>,
        quadrics_ready: bool,
    ) -> Self {
        let live_vertices = vertices.iter().flatten().count();
        let live_faces = faces.iter().flatten().count();
        Self {
            vertices,
            halfedges,
            faces,
            rows,
            quadrics_ready,
            live_vertices,
            live_faces,
            cache: TopologyCache::default(),
        }
    }

    // ==================== Counts ====================

    /// Number of live vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.live_vertices
    }

    /// Number of live faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.live_faces
    }

    /// Number of vertex slots, including removed ones.
    #[inline]
    pub fn vertex_slots(&self) -> usize {
        self.vertices.len()
    }

    /// Number of face slots, including removed ones.
    #[inline]
    pub fn face_slots(&self) -> usize {
        self.faces.len()
    }

    /// Whether any removed slots are waiting for compaction.
    pub fn has_holes(&self) -> bool {
        self.live_vertices != self.vertices.len()
            || self.live_faces != self.faces.len()
            || self.halfedges.iter().any(Option::is_none)
    }

    /// Total number of populated table cells (directed edges).
    pub fn directed_edge_count(&self) -> usize {
        *self
            .cache
            .directed_edges
            .get_or_init(|| self.rows.iter().map(BTreeMap::len).sum())
    }

    /// Number of undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.directed_edge_count() / 2
    }

    /// V - E + F over live elements.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.edge_count() as i64 + self.num_faces() as i64
    }

    // ==================== Record access ====================

    /// Get a vertex by ID.
    ///
    /// # Panics
    /// Panics if the vertex was removed.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        match &self.vertices[id.index()] {
            Some(v) => v,
            None => panic!("{:?} has been removed", id),
        }
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        match &mut self.vertices[id.index()] {
            Some(v) => v,
            None => panic!("{:?} has been removed", id),
        }
    }

    /// Get a vertex if it is still live.
    #[inline]
    pub fn try_vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index()).and_then(Option::as_ref)
    }

    /// Get a half-edge by ID.
    ///
    /// # Panics
    /// Panics if the half-edge was removed.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        match &self.halfedges[id.index()] {
            Some(he) => he,
            None => panic!("{:?} has been removed", id),
        }
    }

    /// Get a mutable half-edge by ID.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        match &mut self.halfedges[id.index()] {
            Some(he) => he,
            None => panic!("{:?} has been removed", id),
        }
    }

    /// Get a half-edge if it is still live.
    #[inline]
    pub fn try_halfedge(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.halfedges.get(id.index()).and_then(Option::as_ref)
    }

    /// Get a face by ID.
    ///
    /// # Panics
    /// Panics if the face was removed.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        match &self.faces[id.index()] {
            Some(f) => f,
            None => panic!("{:?} has been removed", id),
        }
    }

    /// Get a mutable face by ID.
    #[inline]
    pub fn face_mut(&mut self, id: FaceId) -> &mut Face {
        match &mut self.faces[id.index()] {
            Some(f) => f,
            None => panic!("{:?} has been removed", id),
        }
    }

    /// Get a face if it is still live.
    #[inline]
    pub fn try_face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.index()).and_then(Option::as_ref)
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex. Geometry only; topology caches survive.
    #[inline]
    pub fn set_position(&mut self, v: VertexId, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    // ==================== Topology queries ====================

    /// Look up the table cell `(origin, dest)`.
    #[inline]
    pub fn find_halfedge(&self, origin: VertexId, dest: VertexId) -> Option<HalfEdgeId> {
        self.rows
            .get(origin.index())
            .and_then(|row| row.get(&dest))
            .copied()
    }

    /// The twin half-edge: the mirrored cell `(dest, origin)`.
    /// Invalid if the cell is empty.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId) -> HalfEdgeId {
        let h = self.halfedge(he);
        self.find_halfedge(h.dest, h.origin)
            .unwrap_or_else(HalfEdgeId::invalid)
    }

    /// Next half-edge counter-clockwise around the left face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Previous half-edge around the left face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).prev
    }

    /// Origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).origin
    }

    /// Destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).dest
    }

    /// Face on the left of a half-edge.
    #[inline]
    pub fn left_face(&self, he: HalfEdgeId) -> FaceId {
        self.halfedge(he).face
    }

    /// Face on the right of a half-edge (the left face of its twin).
    pub fn right_face(&self, he: HalfEdgeId) -> FaceId {
        let twin = self.twin(he);
        if twin.is_valid() {
            self.halfedge(twin).face
        } else {
            FaceId::invalid()
        }
    }

    /// Number of edges leaving a vertex (row population).
    pub fn degree(&self, v: VertexId) -> usize {
        let degrees = self.cache.degrees.get_or_init(|| {
            log::trace!("rebuilding degree cache for {} rows", self.rows.len());
            self.rows.iter().map(BTreeMap::len).collect()
        });
        degrees.get(v.index()).copied().unwrap_or(0)
    }

    /// Vertices adjacent to `v`, in ascending index order (row scan).
    pub fn neighbors(&self, v: VertexId) -> Vec<VertexId> {
        self.rows
            .get(v.index())
            .map(|row| row.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Outgoing half-edges of `v` ordered counter-clockwise, starting at the
    /// vertex's stored half-edge. Stops early at an open boundary.
    pub fn vertex_ring(&self, v: VertexId) -> Vec<HalfEdgeId> {
        let start = self.vertex(v).halfedge;
        let mut ring = Vec::with_capacity(self.degree(v));
        if !start.is_valid() {
            return ring;
        }

        let limit = self.degree(v) + 1;
        let mut he = start;
        loop {
            ring.push(he);
            if !self.halfedge(he).has_face() {
                break;
            }
            he = self.twin(self.prev(he));
            if !he.is_valid() || he == start || ring.len() > limit {
                break;
            }
        }
        ring
    }

    /// The outgoing ring of `v` rotated so that it starts at the spoke towards `towards`.
    pub fn vertex_ring_from(&self, v: VertexId, towards: VertexId) -> Vec<HalfEdgeId> {
        let mut ring = self.vertex_ring(v);
        if let Some(pos) = ring.iter().position(|&h| self.dest(h) == towards) {
            ring.rotate_left(pos);
        }
        ring
    }

    /// The three boundary half-edges of a face, starting at its stored half-edge.
    pub fn face_halfedges(&self, f: FaceId) -> [HalfEdgeId; 3] {
        let h0 = self.face(f).halfedge;
        let h1 = self.next(h0);
        let h2 = self.next(h1);
        [h0, h1, h2]
    }

    /// The three corner vertices of a face.
    pub fn face_vertices(&self, f: FaceId) -> [VertexId; 3] {
        self.face_halfedges(f).map(|h| self.origin(h))
    }

    /// The positions of the three corners of a face.
    pub fn face_positions(&self, f: FaceId) -> [Point3<f64>; 3] {
        self.face_vertices(f).map(|v| *self.position(v))
    }

    /// Corner slot of `v` within face `f`.
    pub fn corner_index(&self, f: FaceId, v: VertexId) -> Option<usize> {
        self.face_vertices(f).iter().position(|&c| c == v)
    }

    /// UV and source normal stored for the corner of `f` at `v`.
    pub fn corner_attributes(
        &self,
        f: FaceId,
        v: VertexId,
    ) -> (Option<Point2<f64>>, Option<Vector3<f64>>) {
        let face = self.face(f);
        match self.corner_index(f, v) {
            Some(i) => (
                face.corner_uv(i),
                face.corner_normals.map(|normals| normals[i]),
            ),
            None => (None, None),
        }
    }

    /// Number of half-edges with no twin or no face.
    pub fn unmatched_halfedges(&self) -> usize {
        self.halfedge_ids()
            .filter(|&h| !self.halfedge(h).has_face() || !self.twin(h).is_valid())
            .count()
    }

    /// Whether every half-edge has a twin and a left face.
    pub fn is_closed(&self) -> bool {
        self.unmatched_halfedges() == 0
    }

    /// Undirected edges as `(low, high)` vertex pairs in row order.
    pub fn condensed_edges(&self) -> &[(VertexId, VertexId)] {
        self.cache.condensed_edges.get_or_init(|| {
            let mut edges = Vec::with_capacity(self.edge_count());
            for (o, row) in self.rows.iter().enumerate() {
                let origin = VertexId::new(o);
                edges.extend(row.keys().filter(|&&d| origin < d).map(|&d| (origin, d)));
            }
            edges
        })
    }

    // ==================== Iteration ====================

    /// Iterate over live vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_some())
            .map(|(i, _)| VertexId::new(i))
    }

    /// Iterate over live vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (VertexId::new(i), v)))
    }

    /// Iterate over live half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .filter(|(_, h)| h.is_some())
            .map(|(i, _)| HalfEdgeId::new(i))
    }

    /// Iterate over live face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_some())
            .map(|(i, _)| FaceId::new(i))
    }

    /// Iterate over live faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (FaceId::new(i), f)))
    }

    // ==================== Geometry ====================

    /// Unnormalized normal of a face computed from current positions.
    pub fn face_cross(&self, f: FaceId) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Area of a face.
    pub fn face_area(&self, f: FaceId) -> f64 {
        0.5 * self.face_cross(f).norm()
    }

    /// Total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Axis-aligned bounding box of the live vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut iter = self.vertices().map(|(_, v)| v.position);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| {
            (min.inf(&p), max.sup(&p))
        }))
    }

    // ==================== Mutation ====================

    /// Drop every memoized summary. Called after any structural change.
    pub(crate) fn mark_structure_changed(&mut self) {
        self.cache = TopologyCache::default();
    }

    /// Append a vertex and return its ID.
    pub(crate) fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Some(Vertex::new(id, position)));
        self.rows.push(BTreeMap::new());
        self.live_vertices += 1;
        self.mark_structure_changed();
        id
    }

    /// Return the half-edge `(origin, dest)`, registering it and its twin if absent.
    pub(crate) fn get_or_insert_halfedge(&mut self, origin: VertexId, dest: VertexId) -> HalfEdgeId {
        if let Some(he) = self.find_halfedge(origin, dest) {
            return he;
        }

        let he = HalfEdgeId::new(self.halfedges.len());
        self.halfedges.push(Some(HalfEdge::new(origin, dest)));
        self.rows[origin.index()].insert(dest, he);

        if self.find_halfedge(dest, origin).is_none() {
            let twin = HalfEdgeId::new(self.halfedges.len());
            self.halfedges.push(Some(HalfEdge::new(dest, origin)));
            self.rows[dest.index()].insert(origin, twin);
        }

        self.mark_structure_changed();
        he
    }

    /// Insert a counter-clockwise triangle, reusing existing half-edges.
    ///
    /// The face's plane normal is left zero; the attribute pass fills it in.
    pub(crate) fn add_triangle(
        &mut self,
        corners: [VertexId; 3],
    ) -> std::result::Result<FaceId, TriangleRejection> {
        let [a, b, c] = corners;
        if a == b || b == c || a == c {
            return Err(TriangleRejection::Degenerate);
        }

        for i in 0..3 {
            let (o, d) = (corners[i], corners[(i + 1) % 3]);
            if let Some(he) = self.find_halfedge(o, d) {
                if self.halfedge(he).has_face() {
                    return Err(TriangleRejection::EdgeInUse { origin: o, dest: d });
                }
            }
        }

        let hes = [
            self.get_or_insert_halfedge(a, b),
            self.get_or_insert_halfedge(b, c),
            self.get_or_insert_halfedge(c, a),
        ];

        let face_id = FaceId::new(self.faces.len());
        self.faces.push(Some(Face::new(hes[0])));
        self.live_faces += 1;

        for i in 0..3 {
            let he = self.halfedge_mut(hes[i]);
            he.face = face_id;
            he.next = hes[(i + 1) % 3];
            he.prev = hes[(i + 2) % 3];
        }

        for i in 0..3 {
            let current = self.vertex(corners[i]).halfedge;
            if self.try_halfedge(current).is_none() {
                self.vertex_mut(corners[i]).halfedge = hes[i];
            }
        }

        self.mark_structure_changed();
        Ok(face_id)
    }

    /// Link `a -> b` as consecutive half-edges of one face.
    #[inline]
    pub(crate) fn link(&mut self, a: HalfEdgeId, b: HalfEdgeId) {
        self.halfedge_mut(a).next = b;
        self.halfedge_mut(b).prev = a;
    }

    /// Remove a half-edge from the arena and clear its table cell.
    pub(crate) fn remove_halfedge(&mut self, he: HalfEdgeId) {
        if let Some(h) = self.halfedges[he.index()].take() {
            let row = &mut self.rows[h.origin.index()];
            if row.get(&h.dest) == Some(&he) {
                row.remove(&h.dest);
            }
        }
        self.mark_structure_changed();
    }

    /// Re-home a half-edge to a new origin, moving its table cell.
    pub(crate) fn set_origin(&mut self, he: HalfEdgeId, origin: VertexId) {
        let (old, dest) = {
            let h = self.halfedge(he);
            (h.origin, h.dest)
        };
        if self.rows[old.index()].get(&dest) == Some(&he) {
            self.rows[old.index()].remove(&dest);
        }
        self.rows[origin.index()].insert(dest, he);
        self.halfedge_mut(he).origin = origin;
        self.mark_structure_changed();
    }

    /// Re-point a half-edge at a new destination, moving its table cell.
    pub(crate) fn set_dest(&mut self, he: HalfEdgeId, dest: VertexId) {
        let (origin, old) = {
            let h = self.halfedge(he);
            (h.origin, h.dest)
        };
        let row = &mut self.rows[origin.index()];
        if row.get(&old) == Some(&he) {
            row.remove(&old);
        }
        row.insert(dest, he);
        self.halfedge_mut(he).dest = dest;
        self.mark_structure_changed();
    }

    /// Remove a face record.
    pub(crate) fn remove_face(&mut self, f: FaceId) {
        if self.faces[f.index()].take().is_some() {
            self.live_faces -= 1;
        }
        self.mark_structure_changed();
    }

    /// Remove a vertex record. Its row must already be empty.
    pub(crate) fn remove_vertex(&mut self, v: VertexId) {
        debug_assert!(self.rows[v.index()].is_empty(), "{:?} still has edges", v);
        if self.vertices[v.index()].take().is_some() {
            self.live_vertices -= 1;
        }
        self.rows[v.index()].clear();
        self.mark_structure_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;

    #[test]
    fn test_empty_table() {
        let table = TopologyTable::new();
        assert_eq!(table.num_vertices(), 0);
        assert_eq!(table.num_faces(), 0);
        assert_eq!(table.directed_edge_count(), 0);
        assert!(table.bounding_box().is_none());
    }

    #[test]
    fn test_tetrahedron_counts() {
        let table = fixtures::tetrahedron();
        assert_eq!(table.num_vertices(), 4);
        assert_eq!(table.num_faces(), 4);
        assert_eq!(table.directed_edge_count(), 12);
        assert_eq!(table.edge_count(), 6);
        assert_eq!(table.euler_characteristic(), 2);
        assert!(table.is_closed());
        for v in table.vertex_ids() {
            assert_eq!(table.degree(v), 3);
        }
    }

    #[test]
    fn test_twin_is_mirrored_cell() {
        let table = fixtures::octahedron();
        for he in table.halfedge_ids() {
            let twin = table.twin(he);
            assert!(twin.is_valid());
            assert_eq!(table.twin(twin), he);
            assert_eq!(table.origin(twin), table.dest(he));
            assert_eq!(table.right_face(he), table.left_face(twin));
        }
    }

    #[test]
    fn test_neighbors_match_degree() {
        let table = fixtures::cube();
        for v in table.vertex_ids() {
            let neighbors = table.neighbors(v);
            assert_eq!(neighbors.len(), table.degree(v));
            assert!(!neighbors.contains(&v));
        }
    }

    #[test]
    fn test_vertex_ring_is_ordered_fan() {
        let table = fixtures::octahedron();
        for v in table.vertex_ids() {
            let ring = table.vertex_ring(v);
            assert_eq!(ring.len(), 4);
            // Consecutive spokes share a face
            for i in 0..ring.len() {
                let a = ring[i];
                let b = ring[(i + 1) % ring.len()];
                assert_eq!(table.twin(table.prev(a)), b);
            }
        }
    }

    #[test]
    fn test_vertex_ring_from_rotates() {
        let table = fixtures::octahedron();
        let v = VertexId::new(0);
        let target = table.neighbors(v)[2];
        let ring = table.vertex_ring_from(v, target);
        assert_eq!(table.dest(ring[0]), target);
    }

    #[test]
    fn test_add_triangle_rejects_reused_edge() {
        let mut table = TopologyTable::new();
        let a = table.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = table.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = table.add_vertex(Point3::new(0.0, 1.0, 0.0));
        let d = table.add_vertex(Point3::new(0.0, 0.0, 1.0));

        assert!(table.add_triangle([a, b, c]).is_ok());
        assert_eq!(
            table.add_triangle([a, b, d]),
            Err(TriangleRejection::EdgeInUse { origin: a, dest: b })
        );
        assert_eq!(table.add_triangle([a, a, d]), Err(TriangleRejection::Degenerate));
        // One face, three edges registered in both directions
        assert_eq!(table.num_faces(), 1);
        assert_eq!(table.directed_edge_count(), 6);
        assert!(!table.is_closed());
    }

    #[test]
    fn test_caches_follow_mutation() {
        let mut table = fixtures::octahedron();
        let v = VertexId::new(0);
        assert_eq!(table.degree(v), 4);
        assert_eq!(table.condensed_edges().len(), 12);

        let he = table.vertex(v).halfedge;
        let dest = table.dest(he);
        let twin = table.twin(he);
        table.remove_halfedge(he);
        table.remove_halfedge(twin);

        assert_eq!(table.degree(v), 3);
        assert_eq!(table.degree(dest), 3);
        assert_eq!(table.edge_count(), 11);
        assert_eq!(table.condensed_edges().len(), 11);
    }

    #[test]
    fn test_set_origin_moves_cell() {
        let mut table = fixtures::octahedron();
        let he = table.find_halfedge(VertexId::new(0), VertexId::new(2)).unwrap();
        table.set_origin(he, VertexId::new(1));
        assert_eq!(table.find_halfedge(VertexId::new(1), VertexId::new(2)), Some(he));
        assert_eq!(table.find_halfedge(VertexId::new(0), VertexId::new(2)), None);
        assert_eq!(table.origin(he), VertexId::new(1));
    }

    #[test]
    fn test_bounding_box_and_area() {
        let table = fixtures::cube();
        let (min, max) = table.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 1.0));
        assert!((table.surface_area() - 6.0).abs() < 1e-10);
    }
}
