//! STL (stereolithography) format support.
//!
//! STL stores bare triangles, so loose edges and isolated vertices cannot be
//! represented. Loading welds identical corner positions; saving fans every
//! polygon into triangles and drops loose edges.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, EditMesh, MeshIndex};

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format. Triangles that collapse after
/// welding are skipped.
///
/// # Example
///
/// ```no_run
/// use volsel::io::stl;
/// use volsel::mesh::EditMesh;
///
/// let mesh: EditMesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<EditMesh<I>> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    // read_stl already merges bit-identical corners into shared vertices
    let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let vertices: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let faces: Vec<Vec<usize>> = stl
        .faces
        .iter()
        .map(|tri| tri.vertices)
        .filter(|&[i0, i1, i2]| i0 != i1 && i1 != i2 && i0 != i2)
        .map(|tri| tri.to_vec())
        .collect();

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    build_from_polygons(&vertices, &faces, &[])
}

/// Save a mesh to a binary STL file.
///
/// # Example
///
/// ```no_run
/// use volsel::io::stl;
/// use volsel::mesh::EditMesh;
///
/// let mesh: EditMesh = EditMesh::new();
/// stl::save(&mesh, "output.stl").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &EditMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let (vertices, faces, loose_edges) = to_face_vertex(mesh);
    if !loose_edges.is_empty() {
        log::warn!(
            "STL cannot store loose edges; dropping {} edge(s) from {}",
            loose_edges.len(),
            path.display()
        );
    }

    let triangles: Vec<stl_io::Triangle> = faces
        .iter()
        .flat_map(|f| (1..f.len() - 1).map(move |i| [f[0], f[i], f[i + 1]]))
        .map(|[i0, i1, i2]| {
            let (p0, p1, p2) = (&vertices[i0], &vertices[i1], &vertices[i2]);

            let n = (p1 - p0).cross(&(p2 - p0));
            let n = n.try_normalize(f64::EPSILON).unwrap_or(n);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
