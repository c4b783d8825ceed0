//! Benchmark profiles and utilities for loam grids.
//!
//! Provides pre-built landscapes for benchmarking and examples:
//!
//! - [`reference_landscape`]: 100x100 grid (10K nodes) with elevation
//! - [`stress_landscape`]: 316x316 grid (~100K nodes) for stress testing
//! - [`reference_pipeline`]: diffusion then flow routing, bound to a grid
//! - [`hashed_surface`]: deterministic rough surface via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::error::Error;

use loam_component::{Component, Driver};
use loam_components::fields::TOPOGRAPHIC_ELEVATION;
use loam_components::{FlowAccumulator, FlowAccumulatorConfig, LinearDiffuser, LinearDiffuserConfig};
use loam_core::{ConstructionError, ElementKind};
use loam_grid::{ModelGrid, RasterModelGrid};

/// Build a landscape of the given shape: unit spacing, default boundary,
/// and a hashed elevation surface registered on it.
pub fn landscape(rows: usize, cols: usize, seed: u64) -> Result<RasterModelGrid, ConstructionError> {
    let mut grid = RasterModelGrid::new(rows, cols, 1.0)?;
    let z = hashed_surface(&grid, seed);
    grid.add_zeros(ElementKind::Node, TOPOGRAPHIC_ELEVATION)
        .write()
        .copy_from_slice(&z);
    Ok(grid)
}

/// 100x100 reference landscape (10K nodes).
pub fn reference_landscape(seed: u64) -> Result<RasterModelGrid, ConstructionError> {
    landscape(100, 100, seed)
}

/// 316x316 stress landscape (~100K nodes).
pub fn stress_landscape(seed: u64) -> Result<RasterModelGrid, ConstructionError> {
    landscape(316, 316, seed)
}

/// Diffusion (D=0.01) then D4 flow routing, bound to `grid`.
///
/// The grid must already carry elevation. At unit spacing the diffusion
/// limit is dt <= 25.
pub fn reference_pipeline(grid: &mut RasterModelGrid) -> Result<Driver, Box<dyn Error>> {
    let diffuser = LinearDiffuser::new(grid, LinearDiffuserConfig::default())?;
    let router = FlowAccumulator::new(grid, FlowAccumulatorConfig::default())?;
    let components: Vec<Box<dyn Component>> = vec![Box::new(diffuser), Box::new(router)];
    Ok(Driver::new(components)?)
}

/// Deterministic rough surface: a gentle tilt toward row 0 plus hashed
/// noise in `[0, 1)`.
pub fn hashed_surface(grid: &dyn ModelGrid, seed: u64) -> Vec<f64> {
    grid.y_of_node()
        .iter()
        .enumerate()
        .map(|(n, y)| {
            let h = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add((n as u64).wrapping_mul(1442695040888963407));
            0.01 * y + (h >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}
