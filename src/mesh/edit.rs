//! Editable polygon mesh with per-element selection state.
//!
//! [`EditMesh`] stores vertices, edges, and polygonal faces explicitly, the way
//! modelling tools do while a mesh is being edited. Unlike a half-edge mesh it
//! accepts loose edges, isolated vertices, n-gons, and non-manifold fans, all of
//! which show up in real scenes and all of which take part in volume selection.
//!
//! # Structure
//!
//! - Each **vertex** has a position (object space) and a list of incident edges
//! - Each **edge** joins two distinct vertices; there is at most one edge per
//!   unordered vertex pair
//! - Each **face** is an ordered loop of three or more distinct vertices whose
//!   boundary edges are always present in the edge list
//! - Every element carries a `selected` flag
//!
//! The mesh also carries an object-to-world transform, used wherever a
//! measurement has to be taken in world space.

use std::collections::HashMap;

use nalgebra::{Matrix4, Point3};

use super::index::{EdgeId, FaceId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// The kind of mesh element a selection operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Vertices.
    Vertex,
    /// Edges.
    Edge,
    /// Faces.
    Face,
}

/// A vertex in the edit mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex in object space.
    pub position: Point3<f64>,

    /// Whether this vertex is selected.
    pub selected: bool,

    /// Edges incident to this vertex.
    edges: Vec<EdgeId<I>>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new unselected vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            selected: false,
            edges: Vec::new(),
        }
    }
}

/// An edge joining two vertices.
#[derive(Debug, Clone, Copy)]
pub struct Edge<I: MeshIndex = u32> {
    /// The two endpoints, in insertion order.
    pub vertices: [VertexId<I>; 2],

    /// Whether this edge is selected.
    pub selected: bool,

    /// Number of faces using this edge.
    face_count: u32,
}

impl<I: MeshIndex> Edge<I> {
    /// Check if no face uses this edge.
    #[inline]
    pub fn is_loose(&self) -> bool {
        self.face_count == 0
    }
}

/// A polygonal face.
#[derive(Debug, Clone)]
pub struct Face<I: MeshIndex = u32> {
    /// The vertex loop, counter-clockwise when seen from the front.
    pub vertices: Vec<VertexId<I>>,

    /// Whether this face is selected.
    pub selected: bool,
}

/// An editable polygon mesh.
#[derive(Debug, Clone)]
pub struct EditMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) edges: Vec<Edge<I>>,
    pub(crate) faces: Vec<Face<I>>,

    /// Lookup from an ordered vertex pair (low, high) to its edge.
    edge_lookup: HashMap<(usize, usize), EdgeId<I>>,

    /// Object-to-world transform.
    transform: Matrix4<f64>,
}

impl<I: MeshIndex> Default for EditMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> EditMesh<I> {
    /// Create a new empty mesh with an identity transform.
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Triangle-dominant meshes have roughly E = 3F/2 edges
        let num_edges = num_faces * 3 / 2 + num_faces % 2;

        Self {
            vertices: Vec::with_capacity(num_vertices),
            edges: Vec::with_capacity(num_edges),
            faces: Vec::with_capacity(num_faces),
            edge_lookup: HashMap::with_capacity(num_edges),
            transform: Matrix4::identity(),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get a mutable edge by ID.
    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId<I>) -> &mut Edge<I> {
        &mut self.edges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get a mutable face by ID.
    #[inline]
    pub fn face_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        &mut self.faces[id.index()]
    }

    /// Get the object-space position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the object-space position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    /// Get the object-to-world transform.
    #[inline]
    pub fn transform(&self) -> &Matrix4<f64> {
        &self.transform
    }

    /// Replace the object-to-world transform.
    pub fn set_transform(&mut self, transform: Matrix4<f64>) {
        self.transform = transform;
    }

    /// Get the world-space position of a vertex.
    #[inline]
    pub fn world_position(&self, v: VertexId<I>) -> Point3<f64> {
        self.transform.transform_point(self.position(v))
    }

    /// Bake the transform into the vertex positions and reset it to identity.
    pub fn apply_transform(&mut self) {
        if self.transform == Matrix4::identity() {
            return;
        }
        let transform = self.transform;
        for vertex in &mut self.vertices {
            vertex.position = transform.transform_point(&vertex.position);
        }
        self.transform = Matrix4::identity();
    }

    // ==================== Topology Queries ====================

    /// Get the two endpoints of an edge.
    #[inline]
    pub fn edge_vertices(&self, e: EdgeId<I>) -> [VertexId<I>; 2] {
        self.edge(e).vertices
    }

    /// Get the endpoint of `e` that is not `v`.
    ///
    /// Returns `v` itself if `v` is not an endpoint of `e`.
    #[inline]
    pub fn other_vertex(&self, e: EdgeId<I>, v: VertexId<I>) -> VertexId<I> {
        let [a, b] = self.edge_vertices(e);
        if a == v {
            b
        } else if b == v {
            a
        } else {
            v
        }
    }

    /// Find the edge joining two vertices, in either direction.
    pub fn find_edge(&self, a: VertexId<I>, b: VertexId<I>) -> Option<EdgeId<I>> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    /// Get the vertex loop of a face.
    #[inline]
    pub fn face_vertices(&self, f: FaceId<I>) -> &[VertexId<I>] {
        &self.face(f).vertices
    }

    /// Iterate over the boundary edges of a face, in loop order.
    pub fn face_edges(&self, f: FaceId<I>) -> impl Iterator<Item = EdgeId<I>> + '_ {
        let verts = self.face_vertices(f);
        let n = verts.len();
        (0..n).filter_map(move |i| self.find_edge(verts[i], verts[(i + 1) % n]))
    }

    /// Check if a vertex has no incident edges.
    #[inline]
    pub fn is_isolated_vertex(&self, v: VertexId<I>) -> bool {
        self.vertex(v).edges.is_empty()
    }

    /// Check if an edge is used by no face.
    #[inline]
    pub fn is_loose_edge(&self, e: EdgeId<I>) -> bool {
        self.edge(e).is_loose()
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all edges with their IDs.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId<I>, &Edge<I>)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// Iterate over the edges incident to a vertex.
    pub fn vertex_edges(&self, v: VertexId<I>) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.vertex(v).edges.iter().copied()
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_edges(v).map(move |e| self.other_vertex(e, v))
    }

    /// Compute the valence (degree) of a vertex.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex(v).edges.len()
    }

    // ==================== Geometry ====================

    /// Compute the object-space bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        bounds_of(self.vertices.iter().map(|v| v.position))
    }

    /// Compute the world-space bounding box of the mesh.
    pub fn world_bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        bounds_of(self.vertex_ids().map(|v| self.world_position(v)))
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    ///
    /// Fails with [`MeshError::CapacityExceeded`] once the index type is full.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> Result<VertexId<I>> {
        let id = VertexId::try_new(self.vertices.len()).ok_or(MeshError::CapacityExceeded {
            element: "vertices",
            limit: I::capacity(),
        })?;
        self.vertices.push(Vertex::new(position));
        Ok(id)
    }

    /// Add an edge between two vertices.
    ///
    /// If the edge already exists its ID is returned and nothing is added.
    pub fn add_edge(&mut self, a: VertexId<I>, b: VertexId<I>) -> Result<EdgeId<I>> {
        self.check_vertex(a, self.edges.len())?;
        self.check_vertex(b, self.edges.len())?;
        if a == b {
            return Err(MeshError::InvalidEdge {
                v0: a.index(),
                v1: b.index(),
                reason: "edge endpoints must be distinct",
            });
        }
        self.ensure_edge(a, b)
    }

    /// Add a polygonal face, creating any boundary edges that are missing.
    ///
    /// The mesh is left untouched when the face or one of its new edges would
    /// not fit the index type.
    pub fn add_face(&mut self, verts: &[VertexId<I>]) -> Result<FaceId<I>> {
        let face_index = self.faces.len();
        for &v in verts {
            self.check_vertex(v, face_index)?;
        }
        if verts.len() < 3 || has_duplicates(verts) {
            return Err(MeshError::DegenerateFace { face: face_index });
        }
        let id = FaceId::try_new(face_index).ok_or(MeshError::CapacityExceeded {
            element: "faces",
            limit: I::capacity(),
        })?;

        let n = verts.len();
        let missing = (0..n)
            .filter(|&i| !self.edge_lookup.contains_key(&edge_key(verts[i], verts[(i + 1) % n])))
            .count();
        if self.edges.len() + missing > I::capacity() {
            return Err(MeshError::CapacityExceeded {
                element: "edges",
                limit: I::capacity(),
            });
        }

        for i in 0..n {
            let e = self.ensure_edge(verts[i], verts[(i + 1) % n])?;
            self.edges[e.index()].face_count += 1;
        }

        self.faces.push(Face {
            vertices: verts.to_vec(),
            selected: false,
        });
        Ok(id)
    }

    fn check_vertex(&self, v: VertexId<I>, element: usize) -> Result<()> {
        if !v.is_valid() || v.index() >= self.vertices.len() {
            return Err(MeshError::InvalidVertexIndex {
                element,
                vertex: v.index(),
            });
        }
        Ok(())
    }

    fn ensure_edge(&mut self, a: VertexId<I>, b: VertexId<I>) -> Result<EdgeId<I>> {
        let key = edge_key(a, b);
        if let Some(&e) = self.edge_lookup.get(&key) {
            return Ok(e);
        }
        let e = EdgeId::try_new(self.edges.len()).ok_or(MeshError::CapacityExceeded {
            element: "edges",
            limit: I::capacity(),
        })?;
        self.edges.push(Edge {
            vertices: [a, b],
            selected: false,
            face_count: 0,
        });
        self.edge_lookup.insert(key, e);
        self.vertices[a.index()].edges.push(e);
        self.vertices[b.index()].edges.push(e);
        Ok(e)
    }

    // ==================== Selection ====================

    /// Check whether a vertex is selected.
    #[inline]
    pub fn is_vertex_selected(&self, v: VertexId<I>) -> bool {
        self.vertex(v).selected
    }

    /// Check whether an edge is selected.
    #[inline]
    pub fn is_edge_selected(&self, e: EdgeId<I>) -> bool {
        self.edge(e).selected
    }

    /// Check whether a face is selected.
    #[inline]
    pub fn is_face_selected(&self, f: FaceId<I>) -> bool {
        self.face(f).selected
    }

    /// Set the selection flag of every element of one kind.
    pub fn set_all_selected(&mut self, kind: ElementKind, selected: bool) {
        match kind {
            ElementKind::Vertex => self.vertices.iter_mut().for_each(|v| v.selected = selected),
            ElementKind::Edge => self.edges.iter_mut().for_each(|e| e.selected = selected),
            ElementKind::Face => self.faces.iter_mut().for_each(|f| f.selected = selected),
        }
    }

    /// Select every element of one kind.
    pub fn select_all(&mut self, kind: ElementKind) {
        self.set_all_selected(kind, true);
    }

    /// Deselect every element of one kind.
    pub fn deselect_all(&mut self, kind: ElementKind) {
        self.set_all_selected(kind, false);
    }

    /// Iterate over selected vertices.
    pub fn selected_vertices(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertices().filter(|(_, v)| v.selected).map(|(id, _)| id)
    }

    /// Iterate over selected edges.
    pub fn selected_edges(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.edges().filter(|(_, e)| e.selected).map(|(id, _)| id)
    }

    /// Iterate over selected faces.
    pub fn selected_faces(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.faces().filter(|(_, f)| f.selected).map(|(id, _)| id)
    }

    /// Count the selected elements of one kind.
    pub fn num_selected(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Vertex => self.vertices.iter().filter(|v| v.selected).count(),
            ElementKind::Edge => self.edges.iter().filter(|e| e.selected).count(),
            ElementKind::Face => self.faces.iter().filter(|f| f.selected).count(),
        }
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        let nv = self.vertices.len();

        for (eid, e) in self.edges() {
            let [a, b] = e.vertices;
            if a.index() >= nv || b.index() >= nv || a == b {
                return false;
            }
            if self.find_edge(a, b) != Some(eid) {
                return false;
            }
            if !self.vertex(a).edges.contains(&eid) || !self.vertex(b).edges.contains(&eid) {
                return false;
            }
        }

        for (fid, f) in self.faces() {
            if f.vertices.len() < 3 || f.vertices.iter().any(|v| v.index() >= nv) {
                return false;
            }
            if self.face_edges(fid).count() != f.vertices.len() {
                return false;
            }
        }

        self.edge_lookup.len() == self.edges.len()
    }
}

/// Canonical lookup key for an unordered vertex pair.
#[inline]
fn edge_key<I: MeshIndex>(a: VertexId<I>, b: VertexId<I>) -> (usize, usize) {
    let (a, b) = (a.index(), b.index());
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn has_duplicates<I: MeshIndex>(verts: &[VertexId<I>]) -> bool {
    verts
        .iter()
        .enumerate()
        .any(|(i, v)| verts[i + 1..].contains(v))
}

fn bounds_of(
    mut points: impl Iterator<Item = Point3<f64>>,
) -> Option<(Point3<f64>, Point3<f64>)> {
    let first = points.next()?;
    let (mut min, mut max) = (first, first);
    for p in points {
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn quad_with_tail() -> EditMesh {
        // A unit quad plus a loose edge hanging off corner 2 and a lone vertex
        let mut mesh = EditMesh::new();
        let v: Vec<VertexId> = [
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0),
            (2.0, 2.0, 0.0),
            (5.0, 5.0, 5.0),
        ]
        .iter()
        .map(|&(x, y, z)| mesh.add_vertex(Point3::new(x, y, z)).unwrap())
        .collect();
        mesh.add_face(&[v[0], v[1], v[2], v[3]]).unwrap();
        mesh.add_edge(v[2], v[4]).unwrap();
        mesh
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = EditMesh::<u32>::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.num_edges(), 0);
        assert!(mesh.bounding_box().is_none());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_face_creates_boundary_edges() {
        let mesh = quad_with_tail();
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_edges(), 5);
        assert!(mesh.is_valid());

        let loose: Vec<_> = mesh.edge_ids().filter(|&e| mesh.is_loose_edge(e)).collect();
        assert_eq!(loose.len(), 1);
        assert!(mesh.is_isolated_vertex(VertexId::new(5)));
        assert_eq!(mesh.valence(VertexId::new(2)), 3);
    }

    #[test]
    fn test_add_edge_is_idempotent() {
        let mut mesh = quad_with_tail();
        let e0 = mesh.find_edge(VertexId::new(1), VertexId::new(0)).unwrap();
        let e1 = mesh.add_edge(VertexId::new(0), VertexId::new(1)).unwrap();
        assert_eq!(e0, e1);
        assert_eq!(mesh.num_edges(), 5);
    }

    #[test]
    fn test_invalid_elements() {
        let mut mesh = quad_with_tail();
        assert!(mesh.add_edge(VertexId::new(0), VertexId::new(0)).is_err());
        assert!(mesh.add_edge(VertexId::new(0), VertexId::new(99)).is_err());
        assert!(mesh
            .add_face(&[VertexId::new(0), VertexId::new(1)])
            .is_err());
        assert!(mesh
            .add_face(&[VertexId::new(0), VertexId::new(1), VertexId::new(0)])
            .is_err());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_u16_vertex_capacity() {
        let mut mesh = EditMesh::<u16>::new();
        for i in 0..u16::capacity() {
            mesh.add_vertex(Point3::new(i as f64, 0.0, 0.0)).unwrap();
        }
        let err = mesh.add_vertex(Point3::origin()).unwrap_err();
        assert!(matches!(
            err,
            MeshError::CapacityExceeded { element: "vertices", limit: 65535 }
        ));
        assert_eq!(mesh.num_vertices(), 65535);
    }

    #[test]
    fn test_u16_edge_capacity_leaves_mesh_untouched() {
        let mut mesh = EditMesh::<u16>::new();
        let n = u16::capacity();
        for i in 0..n {
            mesh.add_vertex(Point3::new(i as f64, 0.0, 0.0)).unwrap();
        }
        // A closed loop through every vertex uses up every edge id
        for i in 0..n {
            mesh.add_edge(VertexId::new(i), VertexId::new((i + 1) % n)).unwrap();
        }
        assert_eq!(mesh.num_edges(), n);
        assert!(mesh.add_edge(VertexId::new(0), VertexId::new(2)).is_err());

        // (0, 1) and (1, 2) exist but (2, 0) does not fit
        let face = [VertexId::new(0), VertexId::new(1), VertexId::new(2)];
        assert!(matches!(
            mesh.add_face(&face),
            Err(MeshError::CapacityExceeded { element: "edges", .. })
        ));
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.edge_ids().all(|e| mesh.is_loose_edge(e)));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_other_vertex() {
        let mesh = quad_with_tail();
        let e = mesh.find_edge(VertexId::new(2), VertexId::new(4)).unwrap();
        assert_eq!(mesh.other_vertex(e, VertexId::new(2)), VertexId::new(4));
        assert_eq!(mesh.other_vertex(e, VertexId::new(4)), VertexId::new(2));
    }

    #[test]
    fn test_world_bounding_box_uses_transform() {
        let mut mesh = quad_with_tail();
        mesh.set_transform(Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0)));

        let (_, max) = mesh.bounding_box().unwrap();
        let (_, wmax) = mesh.world_bounding_box().unwrap();
        assert_eq!(max.x, 5.0);
        assert_eq!(wmax.x, 10.0);
    }

    #[test]
    fn test_apply_transform() {
        let mut mesh = quad_with_tail();
        mesh.set_transform(Matrix4::new_translation(&Vector3::new(0.0, 0.0, 3.0)));
        mesh.apply_transform();

        assert_eq!(*mesh.transform(), Matrix4::identity());
        assert_eq!(mesh.position(VertexId::new(5)).z, 8.0);
        assert_eq!(mesh.world_position(VertexId::new(0)).z, 3.0);
    }

    #[test]
    fn test_selection_flags() {
        let mut mesh = quad_with_tail();
        mesh.select_all(ElementKind::Edge);
        assert_eq!(mesh.num_selected(ElementKind::Edge), 5);
        assert_eq!(mesh.num_selected(ElementKind::Vertex), 0);

        mesh.vertex_mut(VertexId::new(3)).selected = true;
        assert_eq!(mesh.selected_vertices().collect::<Vec<_>>(), vec![VertexId::new(3)]);

        mesh.deselect_all(ElementKind::Edge);
        assert_eq!(mesh.selected_edges().count(), 0);
    }
}
