//! # Volsel
//!
//! Select the loose parts of a mesh by the volume of their bounding boxes.
//!
//! A mesh object often holds many disconnected pieces: bolts next to panels,
//! debris next to a building, stray vertices left over from an import. Volsel
//! splits the mesh into loose parts, measures the world-space axis-aligned
//! bounding box of each part, and selects the vertices, edges and faces of
//! every part whose volume falls into any of a list of threshold ranges.
//!
//! ## Features
//!
//! - **Edit mesh**: n-gons, loose edges and isolated vertices with per-element
//!   selection flags and an object-to-world transform
//! - **Threshold ranges**: independent Min / Max toggles, inclusive bounds,
//!   union over any number of ranges
//! - **Parallel measurement**: part volumes are computed with rayon
//! - **Multiple file formats**: OBJ, STL, PLY, glTF
//! - **Presets and reports**: range lists and selection results as JSON
//!
//! ## Quick Start
//!
//! ```no_run
//! use volsel::prelude::*;
//!
//! // Load a mesh
//! let mut mesh: EditMesh = volsel::io::load("scene.obj").unwrap();
//!
//! // Select every part with a volume of at most 0.1
//! let ranges = vec![ThresholdRange::default().with_max(0.1)];
//! let report = select_by_ranges(&mut mesh, &ranges, &SelectOptions::default()).unwrap();
//! println!("{} of {} parts selected", report.num_matched(), report.parts.len());
//!
//! // Keep only the selected geometry
//! let small = extract_selected(&mesh).unwrap();
//! volsel::io::save(&small, "small_parts.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use volsel::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//!     Point3::new(9.0, 9.0, 9.0), // stray vertex
//! ];
//!
//! let faces = vec![
//!     vec![0, 2, 1],
//!     vec![0, 1, 3],
//!     vec![1, 2, 3],
//!     vec![2, 0, 3],
//! ];
//!
//! let mesh: EditMesh = build_from_polygons(&vertices, &faces, &[]).unwrap();
//! assert_eq!(find_loose_parts(&mesh).len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod mesh;
pub mod select;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use volsel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Preset;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_triangles, extract_selected, to_face_vertex, EdgeId,
        EditMesh, ElementKind, FaceId, MeshIndex, ObjectTransform, VertexId,
    };
    pub use crate::select::{
        find_loose_parts, select_by_ranges, select_by_ranges_with_progress, Direction, Progress,
        RangeList, SelectMode, SelectOptions, SelectionReport, ThresholdRange,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron_and_stray_vertex() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
            Point3::new(9.0, 9.0, 9.0),
        ];

        let faces = vec![
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];

        let mut mesh: EditMesh = build_from_triangles(&vertices, &faces).unwrap();
        assert_eq!(mesh.num_edges(), 6);
        assert!(mesh.is_valid());

        // The tetrahedron's box is 1 x 1 x 1; the stray vertex has no volume
        let ranges = vec![ThresholdRange::default().with_min(0.5)];
        let report = select_by_ranges(&mut mesh, &ranges, &SelectOptions::default()).unwrap();

        assert_eq!(report.volumes(), vec![1.0, 0.0]);
        assert_eq!(report.selected_vertices, 4);
        assert_eq!(report.selected_edges, 6);
        assert_eq!(report.selected_faces, 4);
        assert!(!mesh.is_vertex_selected(VertexId::new(4)));
    }
}
