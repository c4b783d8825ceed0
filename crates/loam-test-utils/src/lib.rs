//! Test utilities and stub grids for loam development.
//!
//! Provides ready-made grids and terrains for integration tests and
//! benchmarks, a non-raster [`ChainGrid`] for exercising code paths that
//! must not assume row/column structure, and reusable components in
//! [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use loam_core::{
    ElementCounts, ElementKind, FieldHandle, FieldStore, GridInstanceId, LinkStatus, NodeStatus,
    BAD_INDEX,
};
use loam_grid::{ModelGrid, RasterModelGrid};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

pub const ELEVATION: &str = "topographic__elevation";

/// The 4x5, spacing 10 reference grid.
pub fn grid_4x5() -> RasterModelGrid {
    RasterModelGrid::new(4, 5, 10.0).expect("4x5 grid is valid")
}

/// Unit-spaced grid of any valid shape.
pub fn small_grid(rows: usize, cols: usize) -> RasterModelGrid {
    RasterModelGrid::new(rows, cols, 1.0).expect("test grid shape is valid")
}

/// Deterministic random surface in `[0, relief)`.
pub fn random_terrain(grid: &dyn ModelGrid, seed: u64, relief: f64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..grid.number_of_nodes())
        .map(|_| rng.random::<f64>() * relief)
        .collect()
}

/// Plane rising along +y with the given slope.
pub fn tilted_plane(grid: &dyn ModelGrid, slope: f64) -> Vec<f64> {
    grid.y_of_node().iter().map(|y| y * slope).collect()
}

/// Register `values` as the elevation field and return its handle.
pub fn with_elevation(grid: &mut RasterModelGrid, values: Vec<f64>) -> FieldHandle {
    grid.add_field(ElementKind::Node, ELEVATION, values)
        .expect("elevation sized to grid")
}

/// A line of nodes along x joined by links: a grid with no raster shape.
///
/// End nodes are fixed-value, interior nodes are core and own a unit
/// cell; every link has a unit-width face.
pub struct ChainGrid {
    id: GridInstanceId,
    x: Vec<f64>,
    y: Vec<f64>,
    links_at_node: Vec<[usize; 4]>,
    dirs: Vec<[i8; 4]>,
    adjacent: Vec<[usize; 4]>,
    tails: Vec<usize>,
    heads: Vec<usize>,
    cell_at_node: Vec<usize>,
    face_at_link: Vec<usize>,
    node_status: Vec<NodeStatus>,
    link_status: Vec<LinkStatus>,
    fields: FieldStore,
}

impl ChainGrid {
    pub fn new(nodes: usize) -> Self {
        assert!(nodes >= 2, "a chain needs at least two nodes");
        let links = nodes - 1;
        let mut links_at_node = vec![[BAD_INDEX; 4]; nodes];
        let mut dirs = vec![[0i8; 4]; nodes];
        let mut adjacent = vec![[BAD_INDEX; 4]; nodes];
        for link in 0..links {
            links_at_node[link][0] = link;
            dirs[link][0] = 1;
            adjacent[link][0] = link + 1;
            links_at_node[link + 1][2] = link;
            dirs[link + 1][2] = -1;
            adjacent[link + 1][2] = link;
        }
        let mut cell_at_node = vec![BAD_INDEX; nodes];
        for (cell, node) in (1..nodes - 1).enumerate() {
            cell_at_node[node] = cell;
        }
        let node_status: Vec<NodeStatus> = (0..nodes)
            .map(|n| {
                if n == 0 || n == nodes - 1 {
                    NodeStatus::FixedValue
                } else {
                    NodeStatus::Core
                }
            })
            .collect();
        let link_status = (0..links)
            .map(|l| LinkStatus::from_endpoints(node_status[l], node_status[l + 1]))
            .collect();
        let counts = ElementCounts {
            nodes,
            links,
            patches: 0,
            corners: 0,
            faces: links,
            cells: nodes - 2,
        };
        Self {
            id: GridInstanceId::next(),
            x: (0..nodes).map(|n| n as f64).collect(),
            y: vec![0.0; nodes],
            links_at_node,
            dirs,
            adjacent,
            tails: (0..links).collect(),
            heads: (1..nodes).collect(),
            cell_at_node,
            face_at_link: (0..links).collect(),
            node_status,
            link_status,
            fields: FieldStore::new(counts),
        }
    }
}

impl ModelGrid for ChainGrid {
    fn instance_id(&self) -> GridInstanceId {
        self.id
    }

    fn counts(&self) -> ElementCounts {
        self.fields.counts()
    }

    fn x_of_node(&self) -> &[f64] {
        &self.x
    }

    fn y_of_node(&self) -> &[f64] {
        &self.y
    }

    fn links_at_node(&self) -> &[[usize; 4]] {
        &self.links_at_node
    }

    fn link_dirs_at_node(&self) -> &[[i8; 4]] {
        &self.dirs
    }

    fn adjacent_nodes_at_node(&self) -> &[[usize; 4]] {
        &self.adjacent
    }

    fn node_at_link_tail(&self) -> &[usize] {
        &self.tails
    }

    fn node_at_link_head(&self) -> &[usize] {
        &self.heads
    }

    fn length_of_link(&self, _link: usize) -> f64 {
        1.0
    }

    fn cell_at_node(&self) -> &[usize] {
        &self.cell_at_node
    }

    fn area_of_cell(&self, _cell: usize) -> f64 {
        1.0
    }

    fn face_at_link(&self) -> &[usize] {
        &self.face_at_link
    }

    fn width_of_face(&self, _face: usize) -> f64 {
        1.0
    }

    fn status_at_node(&self) -> &[NodeStatus] {
        &self.node_status
    }

    fn status_at_link(&self) -> &[LinkStatus] {
        &self.link_status
    }

    fn fields(&self) -> &FieldStore {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut FieldStore {
        &mut self.fields
    }
}
