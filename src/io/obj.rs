//! Wavefront OBJ format support.
//!
//! Reads vertex positions (`v`), polygon faces (`f`), polylines (`l`), and
//! points (`p`). Texture and normal indices in face corners are accepted and
//! ignored; negative (relative) indices are resolved. Polylines become loose
//! edges, which is how modelling tools export wire geometry.
//!
//! Faces that collapse to fewer than three distinct vertices are skipped with a
//! warning rather than failing the whole file.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, EditMesh, MeshIndex};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use volsel::io::obj;
/// use volsel::mesh::EditMesh;
///
/// let mesh: EditMesh = obj::load("scene.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<EditMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| match e {
        MeshError::LoadError { message, .. } => MeshError::LoadError {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

fn parse_error(line_no: usize, message: impl std::fmt::Display) -> MeshError {
    MeshError::LoadError {
        path: Default::default(),
        message: format!("line {}: {}", line_no, message),
    }
}

/// Resolve a face/line corner such as `7`, `7/1`, `7//3`, or `-1`.
fn resolve_index(token: &str, num_vertices: usize, line_no: usize) -> Result<usize> {
    let raw = token.split('/').next().unwrap_or("");
    let value: i64 = raw
        .parse()
        .map_err(|_| parse_error(line_no, format!("invalid vertex reference '{}'", token)))?;

    let index = if value > 0 {
        value - 1
    } else if value < 0 {
        num_vertices as i64 + value
    } else {
        -1
    };

    if index < 0 || index as usize >= num_vertices {
        return Err(parse_error(
            line_no,
            format!("vertex reference '{}' is out of range", token),
        ));
    }
    Ok(index as usize)
}

/// Read OBJ data from any buffered reader.
pub fn read<R: BufRead, I: MeshIndex>(reader: R) -> Result<EditMesh<I>> {
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<Vec<usize>> = Vec::new();
    let mut edges: Vec<[usize; 2]> = Vec::new();
    let mut skipped_faces = 0usize;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let coords: Vec<f64> = tokens
                    .take(3)
                    .map(|t| t.parse::<f64>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| parse_error(line_no, e))?;
                if coords.len() != 3 {
                    return Err(parse_error(line_no, "vertex needs three coordinates"));
                }
                if !coords.iter().all(|c| c.is_finite()) {
                    return Err(parse_error(line_no, "vertex coordinates must be finite"));
                }
                vertices.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let mut corners = tokens
                    .map(|t| resolve_index(t, vertices.len(), line_no))
                    .collect::<Result<Vec<usize>>>()?;
                // Closing corner repeated by some exporters
                if corners.len() > 3 && corners.first() == corners.last() {
                    corners.pop();
                }
                let distinct = corners
                    .iter()
                    .enumerate()
                    .all(|(k, v)| !corners[k + 1..].contains(v));
                if corners.len() < 3 || !distinct {
                    skipped_faces += 1;
                    continue;
                }
                faces.push(corners);
            }
            Some("l") => {
                let points = tokens
                    .map(|t| resolve_index(t, vertices.len(), line_no))
                    .collect::<Result<Vec<usize>>>()?;
                edges.extend(
                    points
                        .windows(2)
                        .filter(|w| w[0] != w[1])
                        .map(|w| [w[0], w[1]]),
                );
            }
            Some("p") => {
                // Points are plain vertices; only check the references
                for t in tokens {
                    resolve_index(t, vertices.len(), line_no)?;
                }
            }
            _ => {}
        }
    }

    if skipped_faces > 0 {
        log::warn!("skipped {} degenerate OBJ face(s)", skipped_faces);
    }
    if vertices.is_empty() {
        return Err(MeshError::LoadError {
            path: Default::default(),
            message: "OBJ data contains no vertices".to_string(),
        });
    }

    build_from_polygons(&vertices, &faces, &edges)
}

/// Save a mesh to an OBJ file.
///
/// Loose edges are written as two-point `l` records; isolated vertices are
/// kept as bare `v` records.
///
/// # Example
///
/// ```no_run
/// use volsel::io::obj;
/// use volsel::mesh::EditMesh;
///
/// let mesh: EditMesh = EditMesh::new();
/// obj::save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &EditMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write OBJ data to any writer.
pub fn write<W: Write, I: MeshIndex>(mesh: &EditMesh<I>, writer: &mut W) -> Result<()> {
    let (vertices, faces, loose_edges) = to_face_vertex(mesh);

    writeln!(writer, "# Generated by volsel")?;
    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in &faces {
        write!(writer, "f")?;
        for &vi in f {
            write!(writer, " {}", vi + 1)?;
        }
        writeln!(writer)?;
    }
    for [a, b] in &loose_edges {
        writeln!(writer, "l {} {}", a + 1, b + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::VertexId;

    const SCENE: &str = "\
# two parts and a point
o Quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1 4/1/1
o Wire
v 5 0 0
v 6 1 0
v 7 0 1
l -3 -2 -1
v 9 9 9
p 8
";

    #[test]
    fn test_read_mixed_scene() {
        let mesh: EditMesh = read(SCENE.as_bytes()).unwrap();
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.face_vertices(crate::mesh::FaceId::new(0)).len(), 4);
        assert_eq!(mesh.num_edges(), 6);
        assert!(mesh.find_edge(VertexId::new(4), VertexId::new(5)).is_some());
        assert!(mesh.is_isolated_vertex(VertexId::new(7)));
    }

    #[test]
    fn test_degenerate_faces_are_skipped() {
        let data = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 2\nf 1 2 3\n";
        let mesh: EditMesh = read(data.as_bytes()).unwrap();
        assert_eq!(mesh.num_faces(), 1);
    }

    #[test]
    fn test_bad_reference() {
        let data = "v 0 0 0\nv 1 0 0\nf 1 2 9\n";
        let result: Result<EditMesh> = read(data.as_bytes());
        match result {
            Err(MeshError::LoadError { message, .. }) => assert!(message.starts_with("line 3")),
            other => panic!("unexpected result: {:?}", other.map(|m| m.num_vertices())),
        }
    }

    #[test]
    fn test_non_finite_vertex() {
        for data in ["v 0 0 0\nv nan 0 0\n", "v 0 0 0\nv 1 inf 0\n"] {
            match read::<_, u32>(data.as_bytes()) {
                Err(MeshError::LoadError { message, .. }) => assert!(message.starts_with("line 2")),
                other => panic!("unexpected result: {:?}", other.map(|m| m.num_vertices())),
            }
        }
    }

    #[test]
    fn test_no_vertices() {
        let result: Result<EditMesh> = read("# empty\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_write_then_read() {
        let mesh: EditMesh = read(SCENE.as_bytes()).unwrap();
        let mut buffer = Vec::new();
        write(&mesh, &mut buffer).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.contains("f 1 2 3 4"));
        assert!(text.contains("l 5 6"));

        let again: EditMesh = read(buffer.as_slice()).unwrap();
        assert_eq!(again.num_vertices(), mesh.num_vertices());
        assert_eq!(again.num_edges(), mesh.num_edges());
        assert_eq!(again.num_faces(), mesh.num_faces());
    }

    #[test]
    fn test_save_and_load_file() {
        let mesh: EditMesh = read(SCENE.as_bytes()).unwrap();
        let path = std::env::temp_dir().join(format!("volsel_obj_{}.obj", std::process::id()));
        save(&mesh, &path).unwrap();
        let loaded: EditMesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.num_edges(), 6);
    }
}
