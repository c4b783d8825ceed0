//! Component trait and sequential driver for loam simulations.
//!
//! A [`Component`] is a process model (diffusion, flow routing) built
//! against one grid and stepped over it. The [`Driver`] owns a list of
//! components, checks the timestep against their stability limits, and
//! runs them one after another.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod component;
pub mod driver;
pub mod error;

pub use component::{check_grid, check_inputs, ensure_output, require_field, Component, FieldSpec};
pub use driver::Driver;
pub use error::{ComponentError, DriverError};
