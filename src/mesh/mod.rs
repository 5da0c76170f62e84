//! Core mesh data structures.
//!
//! This module provides the editable polygon mesh that selections operate on.
//!
//! # Overview
//!
//! The primary type is [`EditMesh`], an explicit vertex / edge / face store
//! with per-element selection flags and an object-to-world transform. It
//! accepts everything a modelling scene may contain: n-gons, loose edges,
//! isolated vertices, and several disconnected pieces in one object.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an edge
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use volsel::mesh::{EditMesh, build_from_polygons};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2]];
//!
//! let mesh: EditMesh = build_from_polygons(&vertices, &faces, &[]).unwrap();
//! assert_eq!(mesh.num_edges(), 3);
//! ```

mod builder;
mod edit;
mod index;
mod transform;

pub use builder::{build_from_polygons, build_from_triangles, extract_selected, to_face_vertex};
pub use edit::{Edge, EditMesh, ElementKind, Face, Vertex};
pub use index::{EdgeId, FaceId, MeshIndex, VertexId};
pub use transform::ObjectTransform;
