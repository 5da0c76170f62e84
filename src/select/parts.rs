//! Loose part detection.
//!
//! A loose part is a maximal set of vertices connected through edges. Faces
//! never join parts on their own because every face edge is present in the
//! edge list, so edge connectivity is sufficient. A vertex with no edges is a
//! part by itself.

use crate::mesh::{EdgeId, EditMesh, FaceId, MeshIndex, VertexId};

/// One loose part: its vertices in ascending index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoosePart<I: MeshIndex = u32> {
    /// Vertices of the part, sorted ascending.
    pub vertices: Vec<VertexId<I>>,
}

impl<I: MeshIndex> LoosePart<I> {
    /// Number of vertices in the part.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the part has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The lowest vertex index, which also orders the parts.
    pub fn first_vertex(&self) -> Option<VertexId<I>> {
        self.vertices.first().copied()
    }
}

/// All loose parts of a mesh plus a vertex-to-part lookup.
#[derive(Debug, Clone)]
pub struct LooseParts<I: MeshIndex = u32> {
    parts: Vec<LoosePart<I>>,
    part_of: Vec<usize>,
}

impl<I: MeshIndex> LooseParts<I> {
    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if there are no parts (the mesh has no vertices).
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Get a part by index.
    pub fn get(&self, index: usize) -> Option<&LoosePart<I>> {
        self.parts.get(index)
    }

    /// The parts in order of their lowest vertex index.
    pub fn parts(&self) -> &[LoosePart<I>] {
        &self.parts
    }

    /// Iterate over the parts.
    pub fn iter(&self) -> std::slice::Iter<'_, LoosePart<I>> {
        self.parts.iter()
    }

    /// Index of the part containing vertex `v`.
    #[inline]
    pub fn part_of(&self, v: VertexId<I>) -> usize {
        self.part_of[v.index()]
    }

    /// Index of the part containing edge `e`.
    #[inline]
    pub fn edge_part(&self, mesh: &EditMesh<I>, e: EdgeId<I>) -> usize {
        self.part_of(mesh.edge_vertices(e)[0])
    }

    /// Index of the part containing face `f`.
    #[inline]
    pub fn face_part(&self, mesh: &EditMesh<I>, f: FaceId<I>) -> usize {
        self.part_of(mesh.face_vertices(f)[0])
    }

    /// Take the parts, dropping the lookup table.
    pub fn into_parts(self) -> Vec<LoosePart<I>> {
        self.parts
    }
}

/// Find the loose parts of a mesh.
///
/// Seeds are taken in ascending vertex order and each part is flooded with an
/// explicit stack, so deep chains cannot overflow the call stack.
///
/// # Example
///
/// ```
/// use volsel::mesh::{build_from_polygons, EditMesh};
/// use volsel::select::find_loose_parts;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(5.0, 5.0, 5.0),
/// ];
/// let mesh: EditMesh = build_from_polygons(&vertices, &[vec![0, 1, 2]], &[]).unwrap();
///
/// let parts = find_loose_parts(&mesh);
/// assert_eq!(parts.len(), 2);
/// assert_eq!(parts.get(1).unwrap().len(), 1);
/// ```
pub fn find_loose_parts<I: MeshIndex>(mesh: &EditMesh<I>) -> LooseParts<I> {
    const UNVISITED: usize = usize::MAX;

    let mut part_of = vec![UNVISITED; mesh.num_vertices()];
    let mut parts: Vec<LoosePart<I>> = Vec::new();
    let mut stack: Vec<VertexId<I>> = Vec::new();

    for seed in mesh.vertex_ids() {
        if part_of[seed.index()] != UNVISITED {
            continue;
        }

        let part_index = parts.len();
        let mut vertices = vec![seed];
        part_of[seed.index()] = part_index;
        stack.push(seed);

        while let Some(v) = stack.pop() {
            for u in mesh.vertex_neighbors(v) {
                if part_of[u.index()] == UNVISITED {
                    part_of[u.index()] = part_index;
                    vertices.push(u);
                    stack.push(u);
                }
            }
        }

        vertices.sort_unstable();
        parts.push(LoosePart { vertices });
    }

    log::debug!(
        "found {} loose parts in {} vertices",
        parts.len(),
        mesh.num_vertices()
    );

    LooseParts { parts, part_of }
}
