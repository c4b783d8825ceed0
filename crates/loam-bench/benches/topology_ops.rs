//! Criterion micro-benchmarks for grid construction and classification.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use loam_bench::hashed_surface;
use loam_core::BoundaryKind;
use loam_grid::{calc_flux_div_at_node, calc_grad_at_link, GridEdge, ModelGrid, RasterModelGrid};

/// Benchmark: Build every incidence table of a 100x100 raster.
fn bench_build_raster_10k(c: &mut Criterion) {
    c.bench_function("build_raster_10k", |b| {
        b.iter(|| {
            let grid = RasterModelGrid::new(black_box(100), black_box(100), 1.0).unwrap();
            black_box(grid.number_of_links());
        });
    });
}

/// Benchmark: Walk active neighbours of every node of a 100x100 raster.
fn bench_active_neighbours_10k(c: &mut Criterion) {
    let grid = RasterModelGrid::new(100, 100, 1.0).unwrap();

    c.bench_function("active_neighbours_10k", |b| {
        b.iter(|| {
            for node in 0..grid.number_of_nodes() {
                let n = grid.active_neighbours_at_node(node);
                black_box(&n);
            }
        });
    });
}

/// Benchmark: Re-close edges and a nodata mask, recomputing link status.
fn bench_reclassify_10k(c: &mut Criterion) {
    let mut grid = RasterModelGrid::new(100, 100, 1.0).unwrap();
    let z = hashed_surface(&grid, 42);

    c.bench_function("reclassify_10k", |b| {
        b.iter(|| {
            grid.set_status_at_edge(GridEdge::Top, BoundaryKind::Closed);
            grid.set_status_at_edge(GridEdge::Bottom, BoundaryKind::FixedValue);
            let closed = grid.close_nodes_where(&z, |v| v > 0.95).unwrap();
            black_box(closed);
        });
    });
}

/// Benchmark: Gradient then divergence over a 316x316 raster (~100K nodes).
fn bench_grad_div_100k(c: &mut Criterion) {
    let grid = RasterModelGrid::new(316, 316, 1.0).unwrap();
    let z = hashed_surface(&grid, 7);

    c.bench_function("grad_div_100k", |b| {
        b.iter(|| {
            let grad = calc_grad_at_link(&grid, &z).unwrap();
            let div = calc_flux_div_at_node(&grid, &grad).unwrap();
            black_box(div);
        });
    });
}

criterion_group!(
    benches,
    bench_build_raster_10k,
    bench_active_neighbours_10k,
    bench_reclassify_10k,
    bench_grad_div_100k
);
criterion_main!(benches);
