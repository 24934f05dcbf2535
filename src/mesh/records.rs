//! Passive vertex, half-edge, and face records.
//!
//! Records carry no behavior of their own; every structural change goes
//! through the [`TopologyTable`](super::TopologyTable).

use nalgebra::{Point2, Point3, Vector3};

use super::attributes::Quadric;
use super::index::{FaceId, HalfEdgeId, VertexId};

/// A vertex of the mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The slot this vertex occupies. Always equal to its arena index.
    pub id: VertexId,

    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Smoothed normal: the normalized average of incident face normals.
    pub normal: Vector3<f64>,

    /// Number of faces accumulated into `normal` by the last normal pass.
    pub adjacent_faces: u32,

    /// One outgoing half-edge.
    pub halfedge: HalfEdgeId,

    /// Accumulated error quadric (only meaningful once quadrics are computed).
    pub quadric: Quadric,
}

impl Vertex {
    /// Create a new vertex at the given position.
    pub fn new(id: VertexId, position: Point3<f64>) -> Self {
        Self {
            id,
            position,
            normal: Vector3::zeros(),
            adjacent_faces: 0,
            halfedge: HalfEdgeId::invalid(),
            quadric: Quadric::zero(),
        }
    }
}

/// A directed edge. Its identity is the ordered pair `(origin, dest)`; the
/// twin lives in the mirrored table cell `(dest, origin)`.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The vertex this half-edge leaves.
    pub origin: VertexId,

    /// The vertex this half-edge points to.
    pub dest: VertexId,

    /// The face on the left of this half-edge. The right face is the left
    /// face of the twin.
    pub face: FaceId,

    /// Next half-edge counter-clockwise around the left face.
    pub next: HalfEdgeId,

    /// Previous half-edge around the left face (clockwise).
    pub prev: HalfEdgeId,
}

impl HalfEdge {
    /// Create an unlinked half-edge between two vertices.
    pub fn new(origin: VertexId, dest: VertexId) -> Self {
        Self {
            origin,
            dest,
            face: FaceId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
        }
    }

    /// Whether a face has been attached on the left.
    #[inline]
    pub fn has_face(&self) -> bool {
        self.face.is_valid()
    }
}

/// A triangular face.
///
/// Corner `i` is the origin of the `i`-th half-edge reached by walking
/// `next` from `halfedge`; per-corner attributes follow that order.
#[derive(Debug, Clone)]
pub struct Face {
    /// The first boundary half-edge.
    pub halfedge: HalfEdgeId,

    /// Unit plane normal.
    pub normal: Vector3<f64>,

    /// Normals supplied by the source geometry, if any.
    pub corner_normals: Option<[Vector3<f64>; 3]>,

    /// Texture coordinates supplied by the source geometry, if any.
    pub corner_uvs: Option<[Point2<f64>; 3]>,

    /// Plane quadric (only meaningful once quadrics are computed).
    pub quadric: Quadric,
}

impl Face {
    /// Create a face bounded by the given half-edge.
    pub fn new(halfedge: HalfEdgeId) -> Self {
        Self {
            halfedge,
            normal: Vector3::zeros(),
            corner_normals: None,
            corner_uvs: None,
            quadric: Quadric::zero(),
        }
    }

    /// The normal to shade corner `i` with: the source normal when present,
    /// otherwise the plane normal.
    pub fn corner_normal(&self, i: usize) -> Vector3<f64> {
        match &self.corner_normals {
            Some(normals) => normals[i],
            None => self.normal,
        }
    }

    /// The texture coordinate of corner `i`, if the face carries UVs.
    pub fn corner_uv(&self, i: usize) -> Option<Point2<f64>> {
        self.corner_uvs.map(|uvs| uvs[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::new(VertexId::new(3), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(v.id.index(), 3);
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(!v.halfedge.is_valid());
        assert_eq!(v.adjacent_faces, 0);
    }

    #[test]
    fn test_corner_normal_falls_back_to_plane() {
        let mut f = Face::new(HalfEdgeId::new(0));
        f.normal = Vector3::z();
        assert_eq!(f.corner_normal(2), Vector3::z());

        f.corner_normals = Some([Vector3::x(), Vector3::y(), Vector3::z()]);
        assert_eq!(f.corner_normal(1), Vector3::y());
        assert!(f.corner_uv(0).is_none());
    }
}
