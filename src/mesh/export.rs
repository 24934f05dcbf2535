//! Serialization and rendering boundaries.
//!
//! [`export_mesh`] produces an enumerable, densely numbered view of the live
//! mesh for file writers. [`render_stream`] and [`wireframe_stream`] flatten
//! the mesh into non-indexed vertex streams that can be uploaded as-is
//! (`bytemuck::cast_slice`).

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point2, Point3, Vector3};

use super::table::TopologyTable;

/// One corner of a triangle in the render stream.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    /// Corner position.
    pub position: [f32; 3],
    /// Source normal if the face carried one, otherwise the face plane normal.
    pub normal: [f32; 3],
    /// Smoothed normal of the corner's vertex.
    pub smooth_normal: [f32; 3],
}

/// One endpoint of a wireframe line segment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    /// Endpoint position.
    pub position: [f32; 3],
}

/// A face corner in an [`ExportedMesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportedCorner {
    /// Dense 0-based index into [`ExportedMesh::positions`].
    pub vertex: usize,
    /// Texture coordinate, if the face carries UVs.
    pub uv: Option<Point2<f64>>,
    /// Source normal, if the face carries source normals.
    pub normal: Option<Vector3<f64>>,
}

/// A triangle in an [`ExportedMesh`], corners in boundary-cycle order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportedFace {
    /// The three corners.
    pub corners: [ExportedCorner; 3],
}

/// Densely numbered geometry for serialization.
#[derive(Debug, Clone, Default)]
pub struct ExportedMesh {
    /// Positions of live vertices in slot order.
    pub positions: Vec<Point3<f64>>,
    /// Live faces in slot order.
    pub faces: Vec<ExportedFace>,
}

impl ExportedMesh {
    /// Whether any face carries texture coordinates.
    pub fn has_uvs(&self) -> bool {
        self.faces.iter().any(|f| f.corners[0].uv.is_some())
    }

    /// Whether any face carries source normals.
    pub fn has_normals(&self) -> bool {
        self.faces.iter().any(|f| f.corners[0].normal.is_some())
    }

    /// Plain triangle list over [`positions`](Self::positions).
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.faces
            .iter()
            .map(|f| f.corners.map(|c| c.vertex))
            .collect()
    }
}

/// Enumerate live vertices and faces with dense 0-based numbering.
pub fn export_mesh(table: &TopologyTable) -> ExportedMesh {
    let mut dense = vec![usize::MAX; table.vertex_slots()];
    let mut positions = Vec::with_capacity(table.num_vertices());
    for (id, v) in table.vertices() {
        dense[id.index()] = positions.len();
        positions.push(v.position);
    }

    let faces = table
        .faces()
        .map(|(f, face)| {
            let vertices = table.face_vertices(f);
            let corners = std::array::from_fn(|i| ExportedCorner {
                vertex: dense[vertices[i].index()],
                uv: face.corner_uv(i),
                normal: face.corner_normals.map(|n| n[i]),
            });
            ExportedFace { corners }
        })
        .collect();

    ExportedMesh { positions, faces }
}

fn to_f32(v: &Vector3<f64>) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

/// Three corners per live face: position, source-or-face normal, smoothed normal.
pub fn render_stream(table: &TopologyTable) -> Vec<RenderVertex> {
    let mut stream = Vec::with_capacity(table.num_faces() * 3);
    for (f, face) in table.faces() {
        for (i, v) in table.face_vertices(f).into_iter().enumerate() {
            let vertex = table.vertex(v);
            stream.push(RenderVertex {
                position: to_f32(&vertex.position.coords),
                normal: to_f32(&face.corner_normal(i)),
                smooth_normal: to_f32(&vertex.normal),
            });
        }
    }
    stream
}

/// Two endpoints per face edge (six per live face).
pub fn wireframe_stream(table: &TopologyTable) -> Vec<LineVertex> {
    let mut stream = Vec::with_capacity(table.num_faces() * 6);
    for f in table.face_ids() {
        for he in table.face_halfedges(f) {
            for v in [table.origin(he), table.dest(he)] {
                stream.push(LineVertex {
                    position: to_f32(&table.position(v).coords),
                });
            }
        }
    }
    stream
}
