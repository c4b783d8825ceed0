//! Loam: raster landscape grids for earth-surface-process models.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! loam sub-crates. For most users, adding `loam` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use loam::prelude::*;
//!
//! // A 4x5 grid with 10 m spacing; the perimeter starts fixed-value.
//! let mut grid = RasterModelGrid::new(4, 5, 10.0).unwrap();
//! assert_eq!(grid.number_of_links(), 31);
//! assert_eq!(grid.number_of_core_nodes(), 6);
//!
//! // Close the left and right edges.
//! grid.set_closed_boundaries_at_grid_edges(true, false, true, false);
//!
//! // Register elevation and diffuse it.
//! let z = grid.add_zeros(ElementKind::Node, "topographic__elevation");
//! z.write()[7] = 1.0;
//! let diffuser = LinearDiffuser::new(&mut grid, LinearDiffuserConfig::default()).unwrap();
//! let components: Vec<Box<dyn Component>> = vec![Box::new(diffuser)];
//! let mut driver = Driver::new(components).unwrap();
//! driver.run(&grid, 10.0, 5).unwrap();
//! assert!(z.read()[7] < 1.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `loam-core` | Element kinds, node and link status, errors, field storage |
//! | [`grid`] | `loam-grid` | Raster topology, boundary classification, the `ModelGrid` trait |
//! | [`component`] | `loam-component` | Component trait and sequential driver |
//! | [`components`] | `loam-components` | Reference diffusion and flow-routing components |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, errors and field storage (`loam-core`).
///
/// Contains [`types::ElementKind`], [`types::NodeStatus`],
/// [`types::LinkStatus`], and the [`types::FieldStore`] every grid owns.
pub use loam_core as types;

/// Grids and grid calculus (`loam-grid`).
///
/// [`grid::RasterModelGrid`] is the concrete grid; components are written
/// against [`grid::ModelGrid`].
pub use loam_grid as grid;

/// Component trait and driver (`loam-component`).
pub use loam_component as component;

/// Reference components (`loam-components`).
///
/// Includes [`components::LinearDiffuser`] and
/// [`components::FlowAccumulator`].
pub use loam_components as components;

/// Common imports for typical loam usage.
///
/// ```rust
/// use loam::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use loam_core::{
        BoundaryKind, ElementKind, FieldHandle, FieldStore, LinkStatus, NodeStatus, BAD_INDEX,
    };

    // Errors
    pub use loam_core::{ClassificationError, ConstructionError, FieldError, GridError, ShapeViewError};
    pub use loam_component::{ComponentError, DriverError};

    // Grid
    pub use loam_grid::{
        calc_flux_div_at_node, calc_grad_at_link, GridConfig, GridEdge, ModelGrid,
        RasterModelGrid, RasterView,
    };

    // Components
    pub use loam_component::{Component, Driver, FieldSpec};
    pub use loam_components::{
        FlowAccumulator, FlowAccumulatorConfig, LinearDiffuser, LinearDiffuserConfig,
    };
}
