//! Closed test meshes shared by the unit tests.

use std::f64::consts::PI;

use nalgebra::Point3;

use super::{build_from_triangles, TopologyTable, VertexId};

/// Raw positions and triangles of a closed, outward-wound mesh.
pub type MeshData = (Vec<Point3<f64>>, Vec<[usize; 3]>);

pub fn tetrahedron_data() -> MeshData {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.5, 0.5, 1.0),
    ];
    let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
    (vertices, faces)
}

pub fn octahedron_data() -> MeshData {
    let vertices = vec![
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, -1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, -1.0),
    ];
    let faces = vec![
        [0, 2, 4],
        [2, 1, 4],
        [1, 3, 4],
        [3, 0, 4],
        [2, 0, 5],
        [1, 2, 5],
        [3, 1, 5],
        [0, 3, 5],
    ];
    (vertices, faces)
}

/// The octahedron with a degree-3 apex (index 6) raised over face `[0, 2, 4]`.
///
/// The apex is a wing of the edge `0 - 2`.
pub fn octahedron_with_apex_data() -> MeshData {
    let (mut vertices, mut faces) = octahedron_data();
    vertices.push(Point3::from(
        (vertices[0].coords + vertices[2].coords + vertices[4].coords) * 0.4,
    ));
    faces[0] = [0, 2, 6];
    faces.push([2, 4, 6]);
    faces.push([4, 0, 6]);
    (vertices, faces)
}

/// Unit cube, two triangles per side. Vertex `i` sits at the bits of `i` (x, y, z).
pub fn cube_data() -> MeshData {
    let vertices = (0..8)
        .map(|i| {
            Point3::new(
                (i & 1) as f64,
                ((i >> 1) & 1) as f64,
                ((i >> 2) & 1) as f64,
            )
        })
        .collect();
    let faces = vec![
        [0, 2, 3],
        [0, 3, 1],
        [4, 5, 7],
        [4, 7, 6],
        [0, 1, 5],
        [0, 5, 4],
        [2, 6, 7],
        [2, 7, 3],
        [0, 4, 6],
        [0, 6, 2],
        [1, 3, 7],
        [1, 7, 5],
    ];
    (vertices, faces)
}

pub fn icosahedron_data() -> MeshData {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let vertices = vec![
        Point3::new(-1.0, t, 0.0),
        Point3::new(1.0, t, 0.0),
        Point3::new(-1.0, -t, 0.0),
        Point3::new(1.0, -t, 0.0),
        Point3::new(0.0, -1.0, t),
        Point3::new(0.0, 1.0, t),
        Point3::new(0.0, -1.0, -t),
        Point3::new(0.0, 1.0, -t),
        Point3::new(t, 0.0, -1.0),
        Point3::new(t, 0.0, 1.0),
        Point3::new(-t, 0.0, -1.0),
        Point3::new(-t, 0.0, 1.0),
    ];
    let faces = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    (vertices, faces)
}

/// A `rings` x `segments` torus; every vertex has degree 6. Both counts must be at least 3.
pub fn torus_data(rings: usize, segments: usize) -> MeshData {
    let (major, minor) = (2.0, 0.5);
    let mut vertices = Vec::with_capacity(rings * segments);
    for i in 0..rings {
        let u = 2.0 * PI * i as f64 / rings as f64;
        for j in 0..segments {
            let v = 2.0 * PI * j as f64 / segments as f64;
            let r = major + minor * v.cos();
            vertices.push(Point3::new(r * u.cos(), r * u.sin(), minor * v.sin()));
        }
    }

    let idx = |i: usize, j: usize| (i % rings) * segments + (j % segments);
    let mut faces = Vec::with_capacity(2 * rings * segments);
    for i in 0..rings {
        for j in 0..segments {
            let (a, b, c, d) = (idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1));
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }
    (vertices, faces)
}

fn build((vertices, faces): MeshData) -> TopologyTable {
    build_from_triangles(&vertices, &faces).unwrap()
}

pub fn tetrahedron() -> TopologyTable {
    build(tetrahedron_data())
}

pub fn octahedron() -> TopologyTable {
    build(octahedron_data())
}

/// Table of [`octahedron_with_apex_data`] and the ids of the source vertices.
pub fn octahedron_with_apex() -> (TopologyTable, Vec<VertexId>) {
    let (vertices, faces) = octahedron_with_apex_data();
    let table = build_from_triangles(&vertices, &faces).unwrap();
    let ids = vertices
        .iter()
        .map(|p| table.vertices().find(|(_, v)| v.position == *p).unwrap().0)
        .collect();
    (table, ids)
}

pub fn cube() -> TopologyTable {
    build(cube_data())
}

pub fn icosahedron() -> TopologyTable {
    build(icosahedron_data())
}

pub fn torus(rings: usize, segments: usize) -> TopologyTable {
    build(torus_data(rings, segments))
}
