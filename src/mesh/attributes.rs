//! Attribute engine: face normals, smoothed vertex normals, and error quadrics.
//!
//! Normals are recomputed after every structural change so the rendering
//! boundary always sees fresh data. Quadrics are only needed by decimation and
//! are computed once per table (see [`compute_quadrics`]).

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use super::table::TopologyTable;

/// A quadric error matrix (4x4 symmetric matrix).
///
/// Represents the sum of squared distances to a set of planes.
/// Stored as 10 unique elements since the matrix is symmetric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadric {
    /// Upper triangular elements in row order:
    /// | 0 1 2 3 |
    /// | 1 4 5 6 |
    /// | 2 5 7 8 |
    /// | 3 6 8 9 |
    data: [f64; 10],
}

impl Quadric {
    /// The zero quadric.
    pub fn zero() -> Self {
        Self { data: [0.0; 10] }
    }

    /// The quadric `p pᵗ` of the plane `ax + by + cz + d = 0`.
    /// The plane should be normalized (a² + b² + c² = 1).
    pub fn from_plane(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            data: [
                a * a,
                a * b,
                a * c,
                a * d,
                b * b,
                b * c,
                b * d,
                c * c,
                c * d,
                d * d,
            ],
        }
    }

    /// The quadric of the plane through `point` with unit `normal`.
    pub fn from_point_normal(point: &Point3<f64>, normal: &Vector3<f64>) -> Self {
        let d = -normal.dot(&point.coords);
        Self::from_plane(normal.x, normal.y, normal.z, d)
    }

    /// Evaluate `vᵗ Q v` with `v = [x, y, z, 1]`.
    pub fn evaluate(&self, p: &Point3<f64>) -> f64 {
        let (x, y, z) = (p.x, p.y, p.z);
        let q = &self.data;
        q[0] * x * x
            + 2.0 * q[1] * x * y
            + 2.0 * q[2] * x * z
            + 2.0 * q[3] * x
            + q[4] * y * y
            + 2.0 * q[5] * y * z
            + 2.0 * q[6] * y
            + q[7] * z * z
            + 2.0 * q[8] * z
            + q[9]
    }

    /// Expand to a full 4x4 matrix.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let q = &self.data;
        #[rustfmt::skip]
        let m = Matrix4::new(
            q[0], q[1], q[2], q[3],
            q[1], q[4], q[5], q[6],
            q[2], q[5], q[7], q[8],
            q[3], q[6], q[8], q[9],
        );
        m
    }

    /// The point minimizing the error, or `None` if the system is singular.
    ///
    /// Solves with the bottom row replaced by `[0 0 0 1]`; the solution is the
    /// last column of the inverse.
    pub fn optimal_point(&self) -> Option<Point3<f64>> {
        let mut m = self.to_matrix();
        m[(3, 0)] = 0.0;
        m[(3, 1)] = 0.0;
        m[(3, 2)] = 0.0;
        m[(3, 3)] = 1.0;

        let inv = m.try_inverse()?;
        let v = inv * Vector4::new(0.0, 0.0, 0.0, 1.0);
        v.iter()
            .all(|c| c.is_finite())
            .then(|| Point3::new(v.x, v.y, v.z))
    }
}

impl Default for Quadric {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::ops::AddAssign for Quadric {
    fn add_assign(&mut self, other: Quadric) {
        for (a, b) in self.data.iter_mut().zip(other.data) {
            *a += b;
        }
    }
}

impl std::ops::Add for Quadric {
    type Output = Quadric;

    fn add(mut self, other: Quadric) -> Quadric {
        self += other;
        self
    }
}

/// Unit normal of a counter-clockwise triangle, zero if degenerate.
pub fn triangle_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    let n = (p1 - p0).cross(&(p2 - p0));
    let len = n.norm();
    if len > 1e-300 {
        n / len
    } else {
        Vector3::zeros()
    }
}

/// Recompute the plane normal of every live face.
pub fn compute_face_normals(table: &mut TopologyTable) {
    let normals: Vec<_> = table
        .face_ids()
        .map(|f| {
            let [p0, p1, p2] = table.face_positions(f);
            (f, triangle_normal(&p0, &p1, &p2))
        })
        .collect();

    for (f, n) in normals {
        table.face_mut(f).normal = n;
    }
}

/// Recompute smoothed vertex normals from the current face normals:
/// the sum of incident face normals divided by the incident face count, normalized.
pub fn compute_smoothed_normals(table: &mut TopologyTable) {
    for slot in table.vertices.iter_mut().flatten() {
        slot.normal = Vector3::zeros();
        slot.adjacent_faces = 0;
    }

    let contributions: Vec<_> = table
        .faces()
        .map(|(f, face)| (table.face_vertices(f), face.normal))
        .collect();

    for (corners, n) in contributions {
        for v in corners {
            let vertex = table.vertex_mut(v);
            vertex.normal += n;
            vertex.adjacent_faces += 1;
        }
    }

    for vertex in table.vertices.iter_mut().flatten() {
        if vertex.adjacent_faces > 0 {
            let avg = vertex.normal / vertex.adjacent_faces as f64;
            vertex.normal = avg.try_normalize(1e-300).unwrap_or_else(Vector3::zeros);
        }
    }
}

/// Recompute face normals followed by smoothed vertex normals.
pub fn refresh_normals(table: &mut TopologyTable) {
    compute_face_normals(table);
    compute_smoothed_normals(table);
}

/// Compute per-face plane quadrics and accumulate them into each incident vertex.
///
/// Idempotent: a table whose quadrics are already computed is left untouched, so
/// quadrics merged by earlier collapses survive across decimation calls.
pub fn compute_quadrics(table: &mut TopologyTable) {
    if table.quadrics_ready {
        return;
    }

    for vertex in table.vertices.iter_mut().flatten() {
        vertex.quadric = Quadric::zero();
    }

    let planes: Vec<_> = table
        .faces()
        .map(|(f, face)| {
            let corners = table.face_vertices(f);
            let q = Quadric::from_point_normal(table.position(corners[0]), &face.normal);
            (f, corners, q)
        })
        .collect();

    for (f, corners, q) in planes {
        table.face_mut(f).quadric = q;
        for v in corners {
            table.vertex_mut(v).quadric += q;
        }
    }

    table.quadrics_ready = true;
    log::debug!("computed quadrics for {} faces", table.num_faces());
}
