//! Sequential driver for a pipeline of components.
//!
//! The driver owns its components and steps them strictly in order: one
//! component's step completes before the next begins, and every component
//! finishes step `n` before any starts step `n + 1`.

use loam_grid::ModelGrid;

use crate::component::Component;
use crate::error::DriverError;

/// Runs a fixed list of components over a grid.
pub struct Driver {
    components: Vec<Box<dyn Component>>,
    elapsed: f64,
    steps_taken: u64,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.components.iter().map(|c| c.name()).collect();
        f.debug_struct("Driver")
            .field("components", &names)
            .field("elapsed", &self.elapsed)
            .field("steps_taken", &self.steps_taken)
            .finish()
    }
}

impl Driver {
    /// Build a driver. Fails with [`DriverError::EmptyPipeline`] for an
    /// empty list.
    pub fn new(components: Vec<Box<dyn Component>>) -> Result<Self, DriverError> {
        if components.is_empty() {
            return Err(DriverError::EmptyPipeline);
        }
        Ok(Self {
            components,
            elapsed: 0.0,
            steps_taken: 0,
        })
    }

    /// Component names in execution order.
    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Model time run so far.
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    /// Number of completed steps.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Check `dt` against every component's stability limit on `grid`.
    pub fn validate_dt(&self, grid: &dyn ModelGrid, dt: f64) -> Result<(), DriverError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(DriverError::InvalidDt { value: dt });
        }
        let mut tightest: Option<(f64, &str)> = None;
        for component in &self.components {
            let Some(max) = component.max_dt(grid) else {
                continue;
            };
            if !max.is_finite() || max <= 0.0 {
                return Err(DriverError::InvalidMaxDt {
                    component: component.name().to_string(),
                    value: max,
                });
            }
            if tightest.is_none_or(|(best, _)| max < best) {
                tightest = Some((max, component.name()));
            }
        }
        if let Some((max, name)) = tightest {
            if dt > max {
                return Err(DriverError::DtTooLarge {
                    configured_dt: dt,
                    max_supported: max,
                    constraining_component: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Run every component once.
    pub fn step(&mut self, grid: &dyn ModelGrid, dt: f64) -> Result<(), DriverError> {
        self.validate_dt(grid, dt)?;
        self.step_unchecked(grid, dt)
    }

    fn step_unchecked(&mut self, grid: &dyn ModelGrid, dt: f64) -> Result<(), DriverError> {
        let step = self.steps_taken;
        for component in &mut self.components {
            let _span = tracing::trace_span!("component_step", component = component.name(), step)
                .entered();
            component
                .run_one_step(grid, dt)
                .map_err(|reason| DriverError::ComponentFailed {
                    name: component.name().to_string(),
                    step,
                    reason,
                })?;
        }
        self.steps_taken += 1;
        self.elapsed += dt;
        Ok(())
    }

    /// Validate `dt` once, then run `steps` steps. Stops at the first
    /// failure; steps completed before it stay applied.
    ///
    /// Components that ran earlier in the failing step keep their writes,
    /// but [`steps_taken`](Self::steps_taken) and
    /// [`elapsed_time`](Self::elapsed_time) count only completed steps.
    #[tracing::instrument(level = "debug", skip(self, grid), fields(components = self.components.len()))]
    pub fn run(&mut self, grid: &dyn ModelGrid, dt: f64, steps: u64) -> Result<(), DriverError> {
        self.validate_dt(grid, dt)?;
        for _ in 0..steps {
            if let Err(e) = self.step_unchecked(grid, dt) {
                tracing::warn!(error = %e, "driver stopped");
                return Err(e);
            }
        }
        tracing::debug!(elapsed = self.elapsed, steps = self.steps_taken, "driver run complete");
        Ok(())
    }
}
