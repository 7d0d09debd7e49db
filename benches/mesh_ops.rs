//! Benchmarks for mesh operations.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Point3;
use pare::prelude::*;

fn grid_data(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    (vertices, faces)
}

fn create_grid_mesh(n: usize) -> HalfEdgeMesh {
    let (vertices, faces) = grid_data(n);
    build_from_triangles(&vertices, &faces).unwrap()
}

/// Interior vertices spaced out so that each leaves its own hole.
fn scattered_interior(n: usize, step: usize) -> Vec<usize> {
    let mut indices = Vec::new();
    for j in (2..n - 1).step_by(step) {
        for i in (2..n - 1).step_by(step) {
            indices.push(j * (n + 1) + i);
        }
    }
    indices
}

fn bench_mesh_construction(c: &mut Criterion) {
    let (vertices, faces) = grid_data(50);

    c.bench_function("build_grid_50x50", |b| {
        b.iter(|| {
            let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
            mesh
        });
    });
}

fn bench_deletion(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);
    let indices = scattered_interior(100, 4);

    c.bench_function("delete_faces_by_vertices_100x100", |b| {
        b.iter_batched(
            || mesh.clone(),
            |mut mesh| {
                delete_faces_by_vertices(&mut mesh, &indices).unwrap();
                mesh
            },
            BatchSize::SmallInput,
        );
    });

    let mut carved = mesh.clone();
    delete_faces_by_vertices(&mut carved, &indices).unwrap();

    c.bench_function("rebuild_100x100", |b| {
        b.iter(|| rebuild(&carved).unwrap());
    });
}

fn bench_boundary(c: &mut Criterion) {
    let mut mesh = create_grid_mesh(100);
    delete_faces_by_vertices(&mut mesh, &scattered_interior(100, 4)).unwrap();

    c.bench_function("border_cycles_100x100", |b| {
        b.iter(|| border_cycles(&mesh).len());
    });

    c.bench_function("carve_100x100", |b| {
        let source = create_grid_mesh(100);
        let indices = scattered_interior(100, 4);
        let options = CarveOptions::default();
        b.iter_batched(
            || source.clone(),
            |mut mesh| carve(&mut mesh, &indices, &options).unwrap().holes.len(),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_mesh_construction, bench_deletion, bench_boundary);
criterion_main!(benches);
