//! PLY (Stanford polygon) format support.
//!
//! This module provides loading and saving of meshes in the PLY format,
//! also known as the Polygon File Format or Stanford Triangle Format.
//! Besides `vertex` and `face`, the optional `edge` element (`vertex1`,
//! `vertex2`) is read and written so loose edges survive a round trip.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, EditMesh, MeshIndex};

/// Load a mesh from a PLY file.
///
/// Files without a `face` element load as point clouds or wireframes.
///
/// # Example
///
/// ```no_run
/// use volsel::io::ply;
/// use volsel::mesh::EditMesh;
///
/// let mesh: EditMesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<EditMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(&mut reader).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Extract vertices
    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let x = get_float_property(vertex, "x")
            .ok_or_else(|| load_error("vertex missing x coordinate"))?;
        let y = get_float_property(vertex, "y")
            .ok_or_else(|| load_error("vertex missing y coordinate"))?;
        let z = get_float_property(vertex, "z")
            .ok_or_else(|| load_error("vertex missing z coordinate"))?;
        vertices.push(Point3::new(x, y, z));
    }

    // Extract faces (optional)
    let mut faces: Vec<Vec<usize>> = Vec::new();
    if let Some(face_element) = ply.payload.get("face") {
        faces.reserve(face_element.len());
        for face in face_element {
            let indices = get_list_property(face, "vertex_indices")
                .or_else(|| get_list_property(face, "vertex_index"))
                .ok_or_else(|| load_error("face missing vertex_indices property"))?;
            faces.push(indices);
        }
    }

    // Extract edges (optional)
    let mut edges: Vec<[usize; 2]> = Vec::new();
    if let Some(edge_element) = ply.payload.get("edge") {
        edges.reserve(edge_element.len());
        for edge in edge_element {
            let a = get_index_property(edge, "vertex1")
                .ok_or_else(|| load_error("edge missing vertex1 property"))?;
            let b = get_index_property(edge, "vertex2")
                .ok_or_else(|| load_error("edge missing vertex2 property"))?;
            edges.push([a, b]);
        }
    }

    build_from_polygons(&vertices, &faces, &edges)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_index_property(element: &DefaultElement, name: &str) -> Option<usize> {
    match element.get(name)? {
        Property::Int(v) if *v >= 0 => Some(*v as usize),
        Property::UInt(v) => Some(*v as usize),
        Property::Short(v) if *v >= 0 => Some(*v as usize),
        Property::UShort(v) => Some(*v as usize),
        Property::UChar(v) => Some(*v as usize),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh to a PLY file (ASCII format).
///
/// # Example
///
/// ```no_run
/// use volsel::io::ply;
/// use volsel::mesh::EditMesh;
///
/// let mesh: EditMesh = EditMesh::new();
/// ply::save(&mesh, "output.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &EditMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let (vertices, faces, loose_edges) = to_face_vertex(mesh);
    if let Some(f) = faces.iter().find(|f| f.len() > u8::MAX as usize) {
        return Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: format!("face with {} vertices exceeds the PLY uchar count", f.len()),
        });
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by volsel")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    if !loose_edges.is_empty() {
        writeln!(writer, "element edge {}", loose_edges.len())?;
        writeln!(writer, "property int vertex1")?;
        writeln!(writer, "property int vertex2")?;
    }
    writeln!(writer, "end_header")?;

    for v in &vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }

    for f in &faces {
        write!(writer, "{}", f.len())?;
        for vi in f {
            write!(writer, " {}", vi)?;
        }
        writeln!(writer)?;
    }

    for [a, b] in &loose_edges {
        writeln!(writer, "{} {}", a, b)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{FaceId, VertexId};

    #[test]
    fn test_save_and_load_preserves_polygons_and_wires() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(5.0, 0.5, 0.25),
        ];
        let mesh: EditMesh =
            build_from_polygons(&vertices, &[vec![0, 1, 2, 3]], &[[4, 5]]).unwrap();

        let path = std::env::temp_dir().join(format!("volsel_ply_{}.ply", std::process::id()));
        save(&mesh, &path).unwrap();
        let loaded: EditMesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.num_vertices(), 6);
        assert_eq!(loaded.num_faces(), 1);
        assert_eq!(loaded.face_vertices(FaceId::new(0)).len(), 4);
        assert_eq!(loaded.num_edges(), 5);
        assert!(loaded.find_edge(VertexId::new(4), VertexId::new(5)).is_some());
        assert!((loaded.position(VertexId::new(5)).z - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_oversized_face_writes_nothing() {
        // A 300-gon cannot be stored with a uchar vertex count
        let vertices: Vec<Point3<f64>> = (0..300)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / 300.0;
                Point3::new(a.cos(), a.sin(), 0.0)
            })
            .collect();
        let mesh: EditMesh = build_from_polygons(&vertices, &[(0..300).collect()], &[]).unwrap();

        let path = std::env::temp_dir().join(format!("volsel_ply_big_{}.ply", std::process::id()));
        std::fs::remove_file(&path).ok();
        let result = save(&mesh, &path);

        assert!(matches!(result, Err(MeshError::SaveError { .. })));
        assert!(!path.exists());
    }
}
