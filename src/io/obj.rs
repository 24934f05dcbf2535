//! Wavefront OBJ format support.
//!
//! Parsing goes through `tobj` without triangulation, so faces with the wrong
//! number of corners reach the builder and come back as
//! [`DataWarning`](crate::mesh::DataWarning)s. All objects and groups in a
//! file are merged into one mesh. Materials are ignored.
//!
//! The writer emits 1-based indices, one `vt` per textured corner, one `vn`
//! per corner, and floats that always carry a decimal point.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{
    build_from_indexed_triangles, export_mesh, triangle_normal, BuildReport, ExportedMesh,
    MeshSource, SourceCorner, TopologyTable,
};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Parse OBJ text into source geometry.
pub fn parse_source<R: BufRead>(reader: &mut R) -> std::result::Result<MeshSource, tobj::LoadError> {
    let (models, _) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;

    let mut source = MeshSource::default();
    for model in &models {
        let mesh = &model.mesh;
        let (p0, t0, n0) = (source.positions.len(), source.uvs.len(), source.normals.len());

        source.positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
        );
        source.uvs.extend(
            mesh.texcoords
                .chunks_exact(2)
                .map(|t| Point2::new(t[0] as f64, t[1] as f64)),
        );
        source.normals.extend(
            mesh.normals
                .chunks_exact(3)
                .map(|n| Vector3::new(n[0] as f64, n[1] as f64, n[2] as f64)),
        );

        // An empty arity list means every face is a triangle
        let arities: Vec<usize> = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.iter().map(|&a| a as usize).collect()
        };

        let mut start = 0;
        for arity in arities {
            let end = (start + arity).min(mesh.indices.len());
            let corners = (start..end)
                .map(|i| SourceCorner {
                    position: p0 + mesh.indices[i] as usize,
                    uv: mesh.texcoord_indices.get(i).map(|&t| t0 + t as usize),
                    normal: mesh.normal_indices.get(i).map(|&n| n0 + n as usize),
                })
                .collect();
            source.faces.push(corners);
            start = end;
        }
    }

    log::debug!(
        "parsed {} models: {} positions, {} uvs, {} normals, {} faces",
        models.len(),
        source.positions.len(),
        source.uvs.len(),
        source.normals.len(),
        source.faces.len()
    );
    Ok(source)
}

/// Read an OBJ file into source geometry.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<MeshSource> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    parse_source(&mut reader).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load an OBJ file into a topology table.
///
/// # Example
///
/// ```no_run
/// use winged::io::obj;
///
/// let (table, report) = obj::load("model.obj").unwrap();
/// for warning in &report.warnings {
///     eprintln!("{}", warning);
/// }
/// println!("{} faces", table.num_faces());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<(TopologyTable, BuildReport)> {
    build_from_indexed_triangles(&load_source(path)?)
}

/// Format a float so it always reads back as a float.
fn fmt_float(x: f64) -> String {
    let s = x.to_string();
    if !x.is_finite() || s.contains('.') {
        s
    } else {
        s + ".0"
    }
}

/// Write exported geometry as OBJ text.
pub fn write<W: Write>(mesh: &ExportedMesh, writer: &mut W) -> std::io::Result<()> {
    for p in &mesh.positions {
        writeln!(writer, "v {} {} {}", fmt_float(p.x), fmt_float(p.y), fmt_float(p.z))?;
    }

    for face in &mesh.faces {
        for uv in face.corners.iter().filter_map(|c| c.uv) {
            writeln!(writer, "vt {} {}", fmt_float(uv.x), fmt_float(uv.y))?;
        }
    }

    for face in &mesh.faces {
        let [a, b, c] = face.corners.map(|c| mesh.positions[c.vertex]);
        let plane = triangle_normal(&a, &b, &c);
        for corner in &face.corners {
            let n = corner.normal.unwrap_or(plane);
            writeln!(writer, "vn {} {} {}", fmt_float(n.x), fmt_float(n.y), fmt_float(n.z))?;
        }
    }

    let (mut vt, mut vn) = (0, 0);
    for face in &mesh.faces {
        write!(writer, "f")?;
        for corner in &face.corners {
            vn += 1;
            match corner.uv {
                Some(_) => {
                    vt += 1;
                    write!(writer, " {}/{}/{}", corner.vertex + 1, vt, vn)?;
                }
                None => write!(writer, " {}//{}", corner.vertex + 1, vn)?,
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Save a table as an OBJ file.
pub fn save<P: AsRef<Path>>(table: &TopologyTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write(&export_mesh(table), &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| MeshError::SaveError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
