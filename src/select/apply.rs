//! Selecting loose parts by volume.
//!
//! [`select_by_ranges`] is the whole operation: find loose parts, measure each
//! part's world-space bounding-box volume, and select the elements of every
//! part whose volume falls into any of the threshold ranges.
//!
//! The selection is replaced, not extended: each element kind enabled in the
//! [`SelectMode`] is cleared over the whole mesh before matching parts are
//! selected. Kinds that are not enabled keep their current flags.

use serde::Serialize;

use super::parts::find_loose_parts;
use super::range::{first_match, ThresholdRange};
use super::volume::{part_bounds_all, Aabb};
use super::{Progress, SelectMode, SelectOptions};
use crate::error::{MeshError, Result};
use crate::mesh::{EditMesh, ElementKind, MeshIndex};

/// Per-part outcome of a selection pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartReport {
    /// Index of the part, in order of lowest vertex index.
    pub index: usize,
    /// Lowest vertex index in the part.
    pub first_vertex: usize,
    /// Number of vertices in the part.
    pub vertex_count: usize,
    /// World-space bounding-box volume.
    pub volume: f64,
    /// World-space bounding-box minimum corner.
    pub bounds_min: [f64; 3],
    /// World-space bounding-box maximum corner.
    pub bounds_max: [f64; 3],
    /// Index of the first range containing the volume, if any.
    pub matched_range: Option<usize>,
}

impl PartReport {
    /// Whether any range matched this part.
    pub fn matched(&self) -> bool {
        self.matched_range.is_some()
    }
}

/// Summary of a selection pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionReport {
    /// The element kinds that were written.
    pub mode: SelectMode,
    /// The ranges the parts were tested against.
    pub ranges: Vec<ThresholdRange>,
    /// One entry per loose part.
    pub parts: Vec<PartReport>,
    /// Selected vertices in the mesh after the pass.
    pub selected_vertices: usize,
    /// Selected edges in the mesh after the pass.
    pub selected_edges: usize,
    /// Selected faces in the mesh after the pass.
    pub selected_faces: usize,
}

impl SelectionReport {
    /// Number of parts that matched some range.
    pub fn num_matched(&self) -> usize {
        self.parts.iter().filter(|p| p.matched()).count()
    }

    /// Volumes of all parts, in part order.
    pub fn volumes(&self) -> Vec<f64> {
        self.parts.iter().map(|p| p.volume).collect()
    }
}

/// Select the loose parts whose volume falls into any of `ranges`.
///
/// # Errors
///
/// Returns [`MeshError::InvalidParameter`] if `options.mode` enables no element
/// kind.
///
/// # Example
///
/// ```
/// use volsel::prelude::*;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 1.0),
///     Point3::new(10.0, 10.0, 10.0),
///     Point3::new(13.0, 13.0, 13.0),
/// ];
/// let mut mesh: EditMesh = build_from_polygons(&vertices, &[], &[[0, 1], [2, 3]]).unwrap();
///
/// let ranges = vec![ThresholdRange::default().with_max(2.0)];
/// let report = select_by_ranges(&mut mesh, &ranges, &SelectOptions::default()).unwrap();
///
/// assert_eq!(report.volumes(), vec![1.0, 27.0]);
/// assert_eq!(report.selected_vertices, 2);
/// assert!(mesh.is_vertex_selected(VertexId::new(0)));
/// assert!(!mesh.is_vertex_selected(VertexId::new(2)));
/// ```
pub fn select_by_ranges<I: MeshIndex>(
    mesh: &mut EditMesh<I>,
    ranges: &[ThresholdRange],
    options: &SelectOptions,
) -> Result<SelectionReport> {
    select_by_ranges_with_progress(mesh, ranges, options, &Progress::none())
}

/// Like [`select_by_ranges`], reporting progress over four stages.
pub fn select_by_ranges_with_progress<I: MeshIndex>(
    mesh: &mut EditMesh<I>,
    ranges: &[ThresholdRange],
    options: &SelectOptions,
    progress: &Progress,
) -> Result<SelectionReport> {
    const STAGES: usize = 4;
    let mode = options.mode;

    if mode.is_empty() {
        return Err(MeshError::invalid_param(
            "mode",
            mode,
            "enable at least one of vertices, edges, faces",
        ));
    }
    if ranges.is_empty() {
        log::warn!("no threshold ranges given; the selection will only be cleared");
    }
    for range in ranges.iter().filter(|r| r.is_empty_interval()) {
        log::warn!("range '{}' has Min above Max and matches nothing", range.label);
    }

    progress.report(0, STAGES, "Finding loose parts");
    let parts = find_loose_parts(mesh);

    progress.report(1, STAGES, "Measuring bounding boxes");
    let bounds = part_bounds_all(mesh, &parts, options.parallel);

    let part_reports: Vec<PartReport> = parts
        .iter()
        .zip(&bounds)
        .enumerate()
        .map(|(index, (part, aabb))| {
            let aabb = aabb.unwrap_or_else(|| Aabb::from_point(nalgebra::Point3::origin()));
            let volume = aabb.volume();
            PartReport {
                index,
                first_vertex: part.first_vertex().map_or(0, |v| v.index()),
                vertex_count: part.len(),
                volume,
                bounds_min: aabb.min.coords.into(),
                bounds_max: aabb.max.coords.into(),
                matched_range: first_match(ranges, volume),
            }
        })
        .collect();
    let hit: Vec<bool> = part_reports.iter().map(PartReport::matched).collect();

    log::debug!(
        "{} of {} loose parts match {} range(s)",
        hit.iter().filter(|&&h| h).count(),
        parts.len(),
        ranges.len()
    );

    progress.report(2, STAGES, "Clearing selection");
    for kind in mode.kinds() {
        mesh.deselect_all(kind);
    }

    progress.report(3, STAGES, "Selecting matching parts");
    let kinds = mode.kinds().count();
    let mut done = 0;
    if mode.vertices {
        for (part, _) in parts.iter().zip(&hit).filter(|(_, h)| **h) {
            for &v in &part.vertices {
                mesh.vertices[v.index()].selected = true;
            }
        }
        done += 1;
        progress.report_within(3, STAGES, done, kinds, "Selecting vertices");
    }
    if mode.edges {
        let edge_hits: Vec<bool> = {
            let mesh: &EditMesh<I> = mesh;
            mesh.edge_ids().map(|e| hit[parts.edge_part(mesh, e)]).collect()
        };
        for (edge, selected) in mesh.edges.iter_mut().zip(edge_hits) {
            edge.selected |= selected;
        }
        done += 1;
        progress.report_within(3, STAGES, done, kinds, "Selecting edges");
    }
    if mode.faces {
        let face_hits: Vec<bool> = {
            let mesh: &EditMesh<I> = mesh;
            mesh.face_ids().map(|f| hit[parts.face_part(mesh, f)]).collect()
        };
        for (face, selected) in mesh.faces.iter_mut().zip(face_hits) {
            face.selected |= selected;
        }
        done += 1;
        progress.report_within(3, STAGES, done, kinds, "Selecting faces");
    }
    progress.report(STAGES, STAGES, "Done");

    Ok(SelectionReport {
        mode,
        ranges: ranges.to_vec(),
        parts: part_reports,
        selected_vertices: mesh.num_selected(ElementKind::Vertex),
        selected_edges: mesh.num_selected(ElementKind::Edge),
        selected_faces: mesh.num_selected(ElementKind::Face),
    })
}
