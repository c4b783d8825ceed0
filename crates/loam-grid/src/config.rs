//! Raster grid configuration and validation.
//!
//! [`GridConfig`] is the builder-input for [`RasterModelGrid`](crate::RasterModelGrid).
//! [`validate()`](GridConfig::validate) checks the same invariants the
//! topology generator enforces, so a configuration can be rejected before
//! any allocation happens.

use loam_core::ConstructionError;

use crate::topology::RasterTopology;

// ── GridConfig ─────────────────────────────────────────────────────

/// Shape, spacing and placement of a raster grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Number of node rows. Must be at least 2.
    pub rows: usize,
    /// Number of node columns. Must be at least 2.
    pub cols: usize,
    /// Node spacing along x. Default: 1.0.
    pub dx: f64,
    /// Node spacing along y. Default: 1.0.
    pub dy: f64,
    /// Coordinates of node 0. Default: `(0.0, 0.0)`.
    pub xy_of_lower_left: (f64, f64),
}

impl GridConfig {
    /// A `rows x cols` configuration with unit spacing at the origin.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            dx: 1.0,
            dy: 1.0,
            xy_of_lower_left: (0.0, 0.0),
        }
    }

    /// Check the configuration without building anything.
    pub fn validate(&self) -> Result<(), ConstructionError> {
        if self.rows < 2 || self.cols < 2 {
            return Err(ConstructionError::InvalidShape {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let spacing_ok = |s: f64| s.is_finite() && s > 0.0;
        if !(spacing_ok(self.dx) && spacing_ok(self.dy)) {
            return Err(ConstructionError::InvalidSpacing {
                dx: self.dx,
                dy: self.dy,
            });
        }
        let (x, y) = self.xy_of_lower_left;
        if !(x.is_finite() && y.is_finite()) {
            return Err(ConstructionError::InvalidOrigin { x, y });
        }
        RasterTopology::checked_counts(self.rows, self.cols)?;
        Ok(())
    }
}
