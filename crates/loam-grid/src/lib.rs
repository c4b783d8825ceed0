//! Raster grids for loam landscape models.
//!
//! This crate builds the topology of a structured grid, classifies its
//! boundary, and exposes both through the [`ModelGrid`] trait that process
//! components are written against.
//!
//! # Layers
//!
//! - [`RasterTopology`]: immutable incidence arrays for nodes, links,
//!   patches, corners, faces and cells.
//! - [`BoundaryClassifier`]: node status and the link status derived from it.
//! - [`RasterModelGrid`]: the two above plus a
//!   [`FieldStore`](loam_core::FieldStore), built from a [`GridConfig`].
//!
//! Gradient and divergence helpers in [`calculus`] work on any
//! `dyn ModelGrid`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod calculus;
pub mod config;
pub mod edge;
pub mod grid;
pub mod raster;
pub mod topology;
pub mod view;

#[cfg(test)]
pub(crate) mod compliance;

pub use boundary::BoundaryClassifier;
pub use calculus::{calc_flux_div_at_node, calc_grad_at_link};
pub use config::GridConfig;
pub use edge::GridEdge;
pub use grid::ModelGrid;
pub use raster::{RasterModelGrid, RasterModelGridBuilder};
pub use topology::RasterTopology;
pub use view::RasterView;
