//! STL (stereolithography) format support.
//!
//! STL stores three positions per facet; shared corners are folded together
//! by exact position during construction. Non-zero facet normals are kept as
//! source normals on all three corners.

use std::fs::File;
use std::io::{BufWriter, Read, Seek};
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_indexed_triangles, BuildReport, MeshSource, SourceCorner, TopologyTable};

/// Parse binary or ASCII STL into source geometry.
pub fn parse_source<R: Read + Seek>(reader: &mut R) -> std::io::Result<MeshSource> {
    let stl = stl_io::read_stl(reader)?;

    let mut source = MeshSource {
        positions: stl
            .vertices
            .iter()
            .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
            .collect(),
        ..MeshSource::default()
    };

    for tri in &stl.faces {
        let n = Vector3::new(tri.normal[0] as f64, tri.normal[1] as f64, tri.normal[2] as f64);
        let normal = if n.norm_squared() > 0.0 {
            source.normals.push(n.normalize());
            Some(source.normals.len() - 1)
        } else {
            None
        };

        let corners = tri
            .vertices
            .iter()
            .map(|&p| SourceCorner {
                position: p,
                uv: None,
                normal,
            })
            .collect();
        source.faces.push(corners);
    }
    Ok(source)
}

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format.
///
/// # Example
///
/// ```no_run
/// use winged::io::stl;
///
/// let (table, _report) = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<(TopologyTable, BuildReport)> {
    build_from_indexed_triangles(&load_source(path)?)
}

/// Read an STL file into source geometry.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<MeshSource> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    parse_source(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn to_f32(v: &Vector3<f64>) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

/// Facets of every live face, with the face plane normal.
fn triangles(table: &TopologyTable) -> Vec<stl_io::Triangle> {
    table
        .faces()
        .map(|(f, face)| {
            let [p0, p1, p2] = table.face_positions(f);
            stl_io::Triangle {
                normal: stl_io::Normal::new(to_f32(&face.normal)),
                vertices: [p0, p1, p2].map(|p| stl_io::Vertex::new(to_f32(&p.coords))),
            }
        })
        .collect()
}

/// Save a table to a binary STL file.
pub fn save<P: AsRef<Path>>(table: &TopologyTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    stl_io::write_stl(&mut writer, triangles(table).iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;
    use std::io::Cursor;

    #[test]
    fn test_binary_round_trip() {
        let table = fixtures::octahedron();
        let mut bytes = Cursor::new(Vec::new());
        stl_io::write_stl(&mut bytes, triangles(&table).iter()).unwrap();

        bytes.set_position(0);
        let source = parse_source(&mut bytes).unwrap();
        assert_eq!(source.faces.len(), 8);
        assert_eq!(source.normals.len(), 8);

        let (again, report) = build_from_indexed_triangles(&source).unwrap();
        assert!(report.is_clean());
        assert_eq!(again.num_vertices(), 6);
        assert_eq!(again.edge_count(), 12);
        assert!(again.is_valid());
    }

    #[test]
    fn test_ascii_facets() {
        let text = "\
solid tri
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 1 0 0
vertex 0 1 0
endloop
endfacet
endsolid tri
";
        let source = parse_source(&mut Cursor::new(text.as_bytes())).unwrap();
        assert_eq!(source.faces.len(), 1);
        assert_eq!(source.faces[0][0].normal, Some(0));
        assert_eq!(source.normals[0], Vector3::z());
    }
}
