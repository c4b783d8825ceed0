//! Reusable component test fixtures.
//!
//! Three standard components for driver and pipeline testing:
//!
//! - [`ConstComponent`]: fills a node field with a constant.
//! - [`RecordingComponent`]: logs every timestep it is stepped with.
//! - [`FailingComponent`]: fails deterministically after N calls.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use loam_component::{Component, ComponentError, FieldSpec};
use loam_core::ElementKind;
use loam_grid::ModelGrid;

/// Writes a constant value to every node of one field.
pub struct ConstComponent {
    pub name: String,
    pub output: String,
    pub value: f64,
}

impl ConstComponent {
    pub fn new(name: impl Into<String>, output: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            output: output.into(),
            value,
        }
    }
}

impl Component for ConstComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_fields(&self) -> Vec<FieldSpec> {
        Vec::new()
    }

    fn output_fields(&self) -> Vec<FieldSpec> {
        vec![FieldSpec::required(self.output.clone(), ElementKind::Node)]
    }

    fn run_one_step(&mut self, grid: &dyn ModelGrid, _dt: f64) -> Result<(), ComponentError> {
        let handle = grid.fields().field(ElementKind::Node, &self.output)?;
        handle.fill(self.value);
        Ok(())
    }
}

/// Appends `(name, dt)` to a shared log on every step.
pub struct RecordingComponent {
    pub name: String,
    pub max_dt: Option<f64>,
    log: Rc<RefCell<Vec<(String, f64)>>>,
}

impl RecordingComponent {
    pub fn new(name: impl Into<String>, log: &Rc<RefCell<Vec<(String, f64)>>>) -> Self {
        Self {
            name: name.into(),
            max_dt: None,
            log: Rc::clone(log),
        }
    }

    pub fn with_max_dt(mut self, max_dt: f64) -> Self {
        self.max_dt = Some(max_dt);
        self
    }
}

impl Component for RecordingComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_fields(&self) -> Vec<FieldSpec> {
        Vec::new()
    }

    fn output_fields(&self) -> Vec<FieldSpec> {
        Vec::new()
    }

    fn max_dt(&self, _grid: &dyn ModelGrid) -> Option<f64> {
        self.max_dt
    }

    fn run_one_step(&mut self, _grid: &dyn ModelGrid, dt: f64) -> Result<(), ComponentError> {
        self.log.borrow_mut().push((self.name.clone(), dt));
        Ok(())
    }
}

/// Fails deterministically after a configurable number of successful calls.
pub struct FailingComponent {
    pub name: String,
    pub succeed_count: usize,
    calls: Rc<Cell<usize>>,
}

impl FailingComponent {
    /// Create a component that succeeds `succeed_count` times then fails.
    pub fn new(name: impl Into<String>, succeed_count: usize) -> Self {
        Self {
            name: name.into(),
            succeed_count,
            calls: Rc::new(Cell::new(0)),
        }
    }

    /// Shared call counter, readable after the component is boxed.
    pub fn counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl Component for FailingComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_fields(&self) -> Vec<FieldSpec> {
        Vec::new()
    }

    fn output_fields(&self) -> Vec<FieldSpec> {
        Vec::new()
    }

    fn run_one_step(&mut self, _grid: &dyn ModelGrid, _dt: f64) -> Result<(), ComponentError> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if n >= self.succeed_count {
            return Err(ComponentError::ExecutionFailed {
                reason: format!(
                    "deliberate failure after {} successful calls",
                    self.succeed_count
                ),
            });
        }
        Ok(())
    }
}
