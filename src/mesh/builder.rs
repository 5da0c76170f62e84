//! Mesh construction utilities.
//!
//! This module provides functions for building edit meshes from face-vertex
//! lists as found in mesh file formats, converting them back, and extracting
//! the selected part of a mesh as a new mesh.

use nalgebra::Point3;

use super::edit::EditMesh;
use super::index::{MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build an edit mesh from vertices, polygonal faces, and loose edges.
///
/// Face boundary edges are created automatically. `loose_edges` may repeat a
/// face edge; duplicates collapse onto the existing edge. Vertices referenced
/// by nothing stay in the mesh as isolated vertices.
///
/// # Example
/// ```
/// use volsel::mesh::{build_from_polygons, EditMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(3.0, 0.0, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3]];
/// let edges = vec![[1, 4]];
///
/// let mesh: EditMesh = build_from_polygons(&vertices, &faces, &edges).unwrap();
/// assert_eq!(mesh.num_faces(), 1);
/// assert_eq!(mesh.num_edges(), 5);
/// ```
pub fn build_from_polygons<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[Vec<usize>],
    loose_edges: &[[usize; 2]],
) -> Result<EditMesh<I>> {
    if vertices.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    for (count, element) in [(vertices.len(), "vertices"), (faces.len(), "faces")] {
        if count > I::capacity() {
            return Err(MeshError::CapacityExceeded {
                element,
                limit: I::capacity(),
            });
        }
    }
    if let Some(vi) = vertices.iter().position(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err(MeshError::NonFinite {
            name: "vertex",
            index: vi,
        });
    }

    // Validate everything before touching the mesh so errors name input positions
    for (fi, face) in faces.iter().enumerate() {
        if let Some(&vi) = face.iter().find(|&&vi| vi >= vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { element: fi, vertex: vi });
        }
        let distinct = face
            .iter()
            .enumerate()
            .all(|(i, v)| !face[i + 1..].contains(v));
        if face.len() < 3 || !distinct {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }
    for (ei, &[a, b]) in loose_edges.iter().enumerate() {
        if let Some(&vi) = [a, b].iter().find(|&&vi| vi >= vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { element: ei, vertex: vi });
        }
        if a == b {
            return Err(MeshError::InvalidEdge {
                v0: a,
                v1: b,
                reason: "edge endpoints must be distinct",
            });
        }
    }

    let mut mesh = EditMesh::with_capacity(vertices.len(), faces.len());

    let vertex_ids = vertices
        .iter()
        .map(|&pos| mesh.add_vertex(pos))
        .collect::<Result<Vec<VertexId<I>>>>()?;

    let mut loop_ids: Vec<VertexId<I>> = Vec::new();
    for face in faces {
        loop_ids.clear();
        loop_ids.extend(face.iter().map(|&vi| vertex_ids[vi]));
        mesh.add_face(&loop_ids)?;
    }

    for &[a, b] in loose_edges {
        mesh.add_edge(vertex_ids[a], vertex_ids[b])?;
    }

    Ok(mesh)
}

/// Build an edit mesh from vertices and triangle faces.
///
/// # Example
/// ```
/// use volsel::mesh::{build_from_triangles, EditMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: EditMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_edges(), 3);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<EditMesh<I>> {
    let polygons: Vec<Vec<usize>> = faces.iter().map(|f| f.to_vec()).collect();
    build_from_polygons(vertices, &polygons, &[])
}

/// Convert an edit mesh back to a face-vertex representation.
///
/// Returns (vertices, faces, loose edges). Positions are in object space.
pub fn to_face_vertex<I: MeshIndex>(
    mesh: &EditMesh<I>,
) -> (Vec<Point3<f64>>, Vec<Vec<usize>>, Vec<[usize; 2]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).iter().map(|v| v.index()).collect())
        .collect();

    let loose_edges: Vec<[usize; 2]> = mesh
        .edge_ids()
        .filter(|&e| mesh.is_loose_edge(e))
        .map(|e| {
            let [a, b] = mesh.edge_vertices(e);
            [a.index(), b.index()]
        })
        .collect();

    (vertices, faces, loose_edges)
}

/// Build a new mesh from the selected elements of `mesh`.
///
/// The result holds every selected face, every selected edge, and every
/// selected vertex, plus the vertices those faces and edges need. Elements
/// keep their relative order and come out selected. The transform is copied.
pub fn extract_selected<I: MeshIndex>(mesh: &EditMesh<I>) -> Result<EditMesh<I>> {
    let mut keep = vec![false; mesh.num_vertices()];
    for v in mesh.selected_vertices() {
        keep[v.index()] = true;
    }
    for e in mesh.selected_edges() {
        for v in mesh.edge_vertices(e) {
            keep[v.index()] = true;
        }
    }
    for f in mesh.selected_faces() {
        for v in mesh.face_vertices(f) {
            keep[v.index()] = true;
        }
    }

    let mut out = EditMesh::with_capacity(
        keep.iter().filter(|&&k| k).count(),
        mesh.num_selected(super::ElementKind::Face),
    );
    out.set_transform(*mesh.transform());

    let mut remap: Vec<Option<VertexId<I>>> = vec![None; mesh.num_vertices()];
    for (vid, vertex) in mesh.vertices() {
        if keep[vid.index()] {
            remap[vid.index()] = Some(out.add_vertex(vertex.position)?);
        }
    }
    let mapped = |v: VertexId<I>| remap[v.index()].ok_or_else(|| {
        MeshError::InvalidVertexIndex {
            element: v.index(),
            vertex: v.index(),
        }
    });

    for f in mesh.selected_faces() {
        let verts = mesh
            .face_vertices(f)
            .iter()
            .map(|&v| mapped(v))
            .collect::<Result<Vec<_>>>()?;
        out.add_face(&verts)?;
    }
    for e in mesh.selected_edges() {
        let [a, b] = mesh.edge_vertices(e);
        out.add_edge(mapped(a)?, mapped(b)?)?;
    }

    for kind in [
        super::ElementKind::Vertex,
        super::ElementKind::Edge,
        super::ElementKind::Face,
    ] {
        out.select_all(kind);
    }
    Ok(out)
}
