//! Reference process components for loam grids.
//!
//! Two components that exercise the whole grid surface:
//!
//! - [`LinearDiffuser`]: explicit hillslope diffusion over active links.
//! - [`FlowAccumulator`]: D4 steepest-descent routing with drainage area
//!   and discharge accumulation.
//!
//! Both follow the same pattern: a configuration struct with documented
//! defaults, a constructor that binds the component to one grid, and a
//! [`Component`](loam_component::Component) impl.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod diffusion;
pub mod fields;
pub mod flow_accumulator;

pub use diffusion::{LinearDiffuser, LinearDiffuserConfig};
pub use flow_accumulator::{FlowAccumulator, FlowAccumulatorConfig};
