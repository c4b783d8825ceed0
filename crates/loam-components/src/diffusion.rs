//! Explicit linear hillslope diffusion.
//!
//! Flux along each active link is `q = -D * dz/dx`; each core node then
//! changes by the divergence of that flux over its cell. Boundary nodes are
//! left untouched, and inactive links carry no flux.

use loam_component::{
    check_grid, ensure_output, require_field, Component, ComponentError, FieldSpec,
};
use loam_core::{ElementKind, GridInstanceId};
use loam_grid::{calc_flux_div_at_node, calc_grad_at_link, ModelGrid};

use crate::fields::{HILLSLOPE_SEDIMENT_FLUX, TOPOGRAPHIC_ELEVATION};

const NAME: &str = "linear_diffuser";

/// Configuration for [`LinearDiffuser`].
#[derive(Clone, Debug, PartialEq)]
pub struct LinearDiffuserConfig {
    /// Diffusivity `D` (m²/yr). Must be finite and >= 0. Default: 0.01.
    pub linear_diffusivity: f64,
    /// Node field to diffuse. Default: `"topographic__elevation"`.
    pub field: String,
}

impl Default for LinearDiffuserConfig {
    fn default() -> Self {
        Self {
            linear_diffusivity: 0.01,
            field: TOPOGRAPHIC_ELEVATION.to_string(),
        }
    }
}

impl LinearDiffuserConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ComponentError> {
        if !self.linear_diffusivity.is_finite() || self.linear_diffusivity < 0.0 {
            return Err(ComponentError::InvalidConfig {
                component: NAME.to_string(),
                reason: format!(
                    "linear_diffusivity must be finite and >= 0, got {}",
                    self.linear_diffusivity
                ),
            });
        }
        if self.field.is_empty() {
            return Err(ComponentError::InvalidConfig {
                component: NAME.to_string(),
                reason: "field name is empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Linear diffusion of a node field, typically elevation.
///
/// # Examples
///
/// ```
/// use loam_component::Component;
/// use loam_components::{LinearDiffuser, LinearDiffuserConfig};
/// use loam_core::ElementKind;
/// use loam_grid::RasterModelGrid;
///
/// let mut grid = RasterModelGrid::new(5, 5, 10.0).unwrap();
/// let z = grid.add_zeros(ElementKind::Node, "topographic__elevation");
/// z.write()[12] = 1.0;
///
/// let mut diffuser = LinearDiffuser::new(&mut grid, LinearDiffuserConfig::default()).unwrap();
/// diffuser.run_one_step(&grid, 100.0).unwrap();
/// assert!(z.read()[12] < 1.0);
/// assert!(z.read()[7] > 0.0);
/// ```
#[derive(Debug)]
pub struct LinearDiffuser {
    config: LinearDiffuserConfig,
    grid_id: GridInstanceId,
}

impl LinearDiffuser {
    /// Bind a diffuser to `grid`.
    ///
    /// Fails if the configuration is invalid or the diffused field is
    /// missing; registers the link flux field if absent. Fields are looked
    /// up by name on every step, so re-registering one takes effect on the
    /// next step.
    pub fn new(grid: &mut dyn ModelGrid, config: LinearDiffuserConfig) -> Result<Self, ComponentError> {
        config.validate()?;
        require_field(grid, NAME, &input_spec(&config.field))?;
        ensure_output(grid, &flux_spec())?;
        tracing::debug!(
            diffusivity = config.linear_diffusivity,
            field = %config.field,
            "linear diffuser ready"
        );
        Ok(Self {
            config,
            grid_id: grid.instance_id(),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &LinearDiffuserConfig {
        &self.config
    }
}

fn input_spec(field: &str) -> FieldSpec {
    FieldSpec::required(field, ElementKind::Node).with_units("m")
}

fn flux_spec() -> FieldSpec {
    FieldSpec::required(HILLSLOPE_SEDIMENT_FLUX, ElementKind::Link).with_units("m^2/yr")
}

impl Component for LinearDiffuser {
    fn name(&self) -> &str {
        NAME
    }

    fn input_fields(&self) -> Vec<FieldSpec> {
        vec![input_spec(&self.config.field)]
    }

    fn output_fields(&self) -> Vec<FieldSpec> {
        vec![input_spec(&self.config.field), flux_spec()]
    }

    /// `min(dx², dy²) / (4 D)`; unlimited when `D` is 0.
    fn max_dt(&self, grid: &dyn ModelGrid) -> Option<f64> {
        let d = self.config.linear_diffusivity;
        if d == 0.0 {
            return None;
        }
        let shortest = (0..grid.number_of_links())
            .map(|l| grid.length_of_link(l))
            .fold(f64::INFINITY, f64::min);
        Some(shortest * shortest / (4.0 * d))
    }

    fn run_one_step(&mut self, grid: &dyn ModelGrid, dt: f64) -> Result<(), ComponentError> {
        check_grid(NAME, self.grid_id, grid)?;
        let d = self.config.linear_diffusivity;
        let values = require_field(grid, NAME, &input_spec(&self.config.field))?;
        let flux = grid.fields().field(ElementKind::Link, HILLSLOPE_SEDIMENT_FLUX)?;

        let z = values.to_vec();
        let grad = calc_grad_at_link(grid, &z)?;
        let status = grid.status_at_link();
        let q: Vec<f64> = grad
            .iter()
            .zip(status)
            .map(|(&g, s)| if s.is_active() { -d * g } else { 0.0 })
            .collect();
        flux.write().copy_from_slice(&q);

        let div = calc_flux_div_at_node(grid, &q)?;
        let mut out = values.write();
        for node in grid.core_nodes() {
            out[node] -= dt * div[node];
        }
        tracing::trace!(dt, "diffusion step");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_grid::RasterModelGrid;

    use loam_core::FieldHandle;

    fn grid_with_elevation(rows: usize, cols: usize, spacing: f64) -> (RasterModelGrid, FieldHandle) {
        let mut grid = RasterModelGrid::new(rows, cols, spacing).unwrap();
        let z = grid.add_zeros(ElementKind::Node, TOPOGRAPHIC_ELEVATION);
        (grid, z)
    }

    #[test]
    fn config_defaults() {
        let cfg = LinearDiffuserConfig::default();
        assert_eq!(cfg.linear_diffusivity, 0.01);
        assert_eq!(cfg.field, "topographic__elevation");
    }

    #[test]
    fn negative_diffusivity_rejected() {
        let (mut grid, _) = grid_with_elevation(3, 3, 1.0);
        let cfg = LinearDiffuserConfig {
            linear_diffusivity: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            LinearDiffuser::new(&mut grid, cfg),
            Err(ComponentError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn missing_elevation_rejected() {
        let mut grid = RasterModelGrid::new(3, 3, 1.0).unwrap();
        assert!(matches!(
            LinearDiffuser::new(&mut grid, LinearDiffuserConfig::default()),
            Err(ComponentError::MissingInput { .. })
        ));
    }

    #[test]
    fn creates_flux_field() {
        let (mut grid, _) = grid_with_elevation(3, 4, 1.0);
        LinearDiffuser::new(&mut grid, LinearDiffuserConfig::default()).unwrap();
        let flux = grid.field(ElementKind::Link, HILLSLOPE_SEDIMENT_FLUX).unwrap();
        assert_eq!(flux.len(), 17);
    }

    #[test]
    fn max_dt_uses_shortest_spacing() {
        let mut grid = RasterModelGrid::builder()
            .shape(3, 3)
            .spacing_xy(2.0, 4.0)
            .build()
            .unwrap();
        grid.add_zeros(ElementKind::Node, TOPOGRAPHIC_ELEVATION);
        let cfg = LinearDiffuserConfig {
            linear_diffusivity: 0.5,
            ..Default::default()
        };
        let diffuser = LinearDiffuser::new(&mut grid, cfg).unwrap();
        assert_eq!(diffuser.max_dt(&grid), Some(2.0));
    }

    #[test]
    fn zero_diffusivity_has_no_limit() {
        let (mut grid, _) = grid_with_elevation(3, 3, 1.0);
        let cfg = LinearDiffuserConfig {
            linear_diffusivity: 0.0,
            ..Default::default()
        };
        let diffuser = LinearDiffuser::new(&mut grid, cfg).unwrap();
        assert_eq!(diffuser.max_dt(&grid), None);
    }

    #[test]
    fn uniform_surface_is_fixed_point() {
        let (mut grid, z) = grid_with_elevation(5, 6, 1.0);
        z.fill(3.0);
        let mut diffuser = LinearDiffuser::new(&mut grid, LinearDiffuserConfig::default()).unwrap();
        for _ in 0..10 {
            diffuser.run_one_step(&grid, 1.0).unwrap();
        }
        assert!(z.read().iter().all(|&v| v == 3.0));
    }

    #[test]
    fn single_bump_spreads_symmetrically() {
        let (mut grid, z) = grid_with_elevation(5, 5, 1.0);
        z.write()[12] = 1.0;
        let mut diffuser = LinearDiffuser::new(&mut grid, LinearDiffuserConfig::default()).unwrap();
        diffuser.run_one_step(&grid, 1.0).unwrap();
        let z = z.read();
        assert!((z[12] - 0.96).abs() < 1e-12);
        for n in [7, 11, 13, 17] {
            assert!((z[n] - 0.01).abs() < 1e-12);
        }
        // Boundary untouched.
        assert_eq!(z[0], 0.0);
    }

    #[test]
    fn reregistered_elevation_is_diffused() {
        let (mut grid, stale) = grid_with_elevation(5, 5, 1.0);
        let mut diffuser = LinearDiffuser::new(&mut grid, LinearDiffuserConfig::default()).unwrap();
        let mut bump = vec![0.0; 25];
        bump[12] = 1.0;
        let z = grid.add_field(ElementKind::Node, TOPOGRAPHIC_ELEVATION, bump).unwrap();
        diffuser.run_one_step(&grid, 1.0).unwrap();
        assert!((z.read()[12] - 0.96).abs() < 1e-12);
        assert!((z.read()[7] - 0.01).abs() < 1e-12);
        assert!(stale.read().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn stepping_other_grid_fails() {
        let (mut grid, _) = grid_with_elevation(3, 3, 1.0);
        let (other, _) = grid_with_elevation(3, 3, 1.0);
        let mut diffuser = LinearDiffuser::new(&mut grid, LinearDiffuserConfig::default()).unwrap();
        assert!(matches!(
            diffuser.run_one_step(&other, 1.0),
            Err(ComponentError::GridMismatch { .. })
        ));
    }
}
