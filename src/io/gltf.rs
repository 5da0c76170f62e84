//! glTF format support.
//!
//! This module provides loading of meshes from glTF and GLB files. All mesh
//! instances of the default scene are merged into one mesh with their node
//! world transforms baked into the positions, so that every instance keeps its
//! placed size. Line primitives become loose edges and point primitives become
//! isolated vertices.
//!
//! Note: Saving to glTF is not supported.

use std::path::Path;

use nalgebra::{Matrix4, Point3};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, EditMesh, MeshIndex};

/// Geometry gathered from all primitives before the mesh is built.
#[derive(Default)]
struct Gathered {
    vertices: Vec<Point3<f64>>,
    faces: Vec<Vec<usize>>,
    edges: Vec<[usize; 2]>,
}

/// Load a mesh from a glTF or GLB file.
///
/// # Example
///
/// ```no_run
/// use volsel::io::gltf;
/// use volsel::mesh::EditMesh;
///
/// let mesh: EditMesh = gltf::load("scene.glb").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<EditMesh<I>> {
    let path = path.as_ref();

    let (document, buffers, _images) = ::gltf::import(path).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut out = Gathered::default();

    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                visit_node(&node, &Matrix4::identity(), &buffers, &mut out);
            }
        }
        None => {
            // No scene graph: take every mesh untransformed
            for mesh in document.meshes() {
                read_mesh(&mesh, &Matrix4::identity(), &buffers, &mut out);
            }
        }
    }

    if out.vertices.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "glTF file contains no mesh geometry".to_string(),
        });
    }

    build_from_polygons(&out.vertices, &out.faces, &out.edges)
}

fn visit_node(
    node: &::gltf::Node<'_>,
    parent: &Matrix4<f64>,
    buffers: &[::gltf::buffer::Data],
    out: &mut Gathered,
) {
    let local: Matrix4<f64> = Matrix4::from(node.transform().matrix()).cast();
    let world = parent * local;

    if let Some(mesh) = node.mesh() {
        read_mesh(&mesh, &world, buffers, out);
    }
    for child in node.children() {
        visit_node(&child, &world, buffers, out);
    }
}

fn read_mesh(
    mesh: &::gltf::Mesh<'_>,
    world: &Matrix4<f64>,
    buffers: &[::gltf::buffer::Data],
    out: &mut Gathered,
) {
    use ::gltf::mesh::Mode;

    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let offset = out.vertices.len();
        for pos in positions {
            let p = Point3::new(pos[0] as f64, pos[1] as f64, pos[2] as f64);
            out.vertices.push(world.transform_point(&p));
        }
        let count = out.vertices.len() - offset;

        let indices: Vec<usize> = match reader.read_indices() {
            Some(indices) => indices.into_u32().map(|i| i as usize + offset).collect(),
            None => (offset..offset + count).collect(),
        };
        if indices.iter().any(|&i| i >= out.vertices.len()) {
            log::warn!("skipping glTF primitive with out-of-range indices");
            continue;
        }

        let distinct = |t: &[usize; 3]| t[0] != t[1] && t[1] != t[2] && t[0] != t[2];

        match primitive.mode() {
            Mode::Triangles => {
                for chunk in indices.chunks_exact(3) {
                    let t = [chunk[0], chunk[1], chunk[2]];
                    if distinct(&t) {
                        out.faces.push(t.to_vec());
                    }
                }
            }
            Mode::TriangleStrip => {
                for i in 0..indices.len().saturating_sub(2) {
                    // Odd triangles flip winding
                    let t = if i % 2 == 0 {
                        [indices[i], indices[i + 1], indices[i + 2]]
                    } else {
                        [indices[i], indices[i + 2], indices[i + 1]]
                    };
                    if distinct(&t) {
                        out.faces.push(t.to_vec());
                    }
                }
            }
            Mode::TriangleFan => {
                for i in 1..indices.len().saturating_sub(1) {
                    let t = [indices[0], indices[i], indices[i + 1]];
                    if distinct(&t) {
                        out.faces.push(t.to_vec());
                    }
                }
            }
            Mode::Lines => {
                out.edges.extend(
                    indices
                        .chunks_exact(2)
                        .filter(|w| w[0] != w[1])
                        .map(|w| [w[0], w[1]]),
                );
            }
            Mode::LineStrip | Mode::LineLoop => {
                out.edges.extend(
                    indices
                        .windows(2)
                        .filter(|w| w[0] != w[1])
                        .map(|w| [w[0], w[1]]),
                );
                if primitive.mode() == Mode::LineLoop && indices.len() > 2 {
                    let (first, last) = (indices[0], indices[indices.len() - 1]);
                    if first != last {
                        out.edges.push([last, first]);
                    }
                }
            }
            Mode::Points => {
                // Vertices were already added
            }
        }
    }
}
