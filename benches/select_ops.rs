//! Benchmarks for loose part finding and volume selection.

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use volsel::prelude::*;

/// An `n` x `n` x `n` grid of disconnected cubes of growing size.
fn create_cube_grid(n: usize) -> EditMesh {
    let mut vertices = Vec::with_capacity(n * n * n * 8);
    let mut faces = Vec::with_capacity(n * n * n * 6);

    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                let b = vertices.len();
                let size = 0.2 + 0.6 * ((i + j + k) % 5) as f64 / 4.0;
                let origin = Point3::new(i as f64 * 2.0, j as f64 * 2.0, k as f64 * 2.0);

                for &(x, y, z) in &[
                    (0.0, 0.0, 0.0),
                    (1.0, 0.0, 0.0),
                    (1.0, 1.0, 0.0),
                    (0.0, 1.0, 0.0),
                    (0.0, 0.0, 1.0),
                    (1.0, 0.0, 1.0),
                    (1.0, 1.0, 1.0),
                    (0.0, 1.0, 1.0),
                ] {
                    vertices.push(origin + nalgebra::Vector3::new(x, y, z) * size);
                }

                for quad in [
                    [0, 3, 2, 1],
                    [4, 5, 6, 7],
                    [0, 1, 5, 4],
                    [1, 2, 6, 5],
                    [2, 3, 7, 6],
                    [3, 0, 4, 7],
                ] {
                    faces.push(quad.iter().map(|&q| b + q).collect::<Vec<_>>());
                }
            }
        }
    }

    build_from_polygons(&vertices, &faces, &[]).unwrap()
}

fn bench_loose_parts(c: &mut Criterion) {
    let mesh = create_cube_grid(20);

    c.bench_function("find_loose_parts_8000", |b| {
        b.iter(|| find_loose_parts(&mesh).len());
    });
}

fn bench_select(c: &mut Criterion) {
    let mut mesh = create_cube_grid(20);
    let ranges = vec![
        ThresholdRange::default().with_max(0.05),
        ThresholdRange::default().with_min(0.3).with_max(0.4),
    ];

    c.bench_function("select_by_ranges_parallel", |b| {
        let options = SelectOptions::default();
        b.iter(|| {
            select_by_ranges(&mut mesh, &ranges, &options)
                .unwrap()
                .selected_faces
        });
    });

    c.bench_function("select_by_ranges_sequential", |b| {
        let options = SelectOptions::default().sequential();
        b.iter(|| {
            select_by_ranges(&mut mesh, &ranges, &options)
                .unwrap()
                .selected_faces
        });
    });
}

criterion_group!(benches, bench_loose_parts, bench_select);
criterion_main!(benches);
