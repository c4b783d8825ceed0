//! The [`Component`] trait and field declaration helpers.
//!
//! Components are process models stepped over a grid: diffusion, flow
//! routing, erosion. Each declares the fields it reads and writes so a
//! driver can report a missing input at construction instead of mid-run.

use loam_core::{ElementKind, FieldHandle, GridInstanceId};
use loam_grid::ModelGrid;

use crate::error::ComponentError;

/// Declaration of a field a component reads or writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, e.g. `"topographic__elevation"`.
    pub name: String,
    /// Element kind the field lives on.
    pub kind: ElementKind,
    /// Units, if meaningful.
    pub units: Option<String>,
    /// `true` if the component runs without it.
    pub optional: bool,
}

impl FieldSpec {
    /// A required field.
    pub fn required(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            units: None,
            optional: false,
        }
    }

    /// An optional field.
    pub fn optional(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            optional: true,
            ..Self::required(name, kind)
        }
    }

    /// Attach units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }
}

/// A process model stepped over a [`ModelGrid`].
///
/// # Contract
///
/// - Constructors take the grid mutably, validate their configuration,
///   fail with [`ComponentError::MissingInput`] for absent required inputs
///   and register absent outputs as zeros.
/// - [`run_one_step`](Component::run_one_step) reads and writes through
///   field handles; it never changes topology or boundary status.
/// - A component is bound to the grid it was built for and rejects any
///   other with [`ComponentError::GridMismatch`].
///
/// # Object safety
///
/// This trait is object-safe; the driver stores components as
/// `Vec<Box<dyn Component>>`.
///
/// # Examples
///
/// A component that raises every core node by a fixed rate:
///
/// ```
/// use loam_component::{Component, ComponentError, FieldSpec};
/// use loam_core::ElementKind;
/// use loam_grid::{ModelGrid, RasterModelGrid};
///
/// struct Uplift {
///     rate: f64,
/// }
///
/// impl Component for Uplift {
///     fn name(&self) -> &str { "uplift" }
///
///     fn input_fields(&self) -> Vec<FieldSpec> {
///         vec![FieldSpec::required("topographic__elevation", ElementKind::Node)]
///     }
///
///     fn output_fields(&self) -> Vec<FieldSpec> { self.input_fields() }
///
///     fn run_one_step(&mut self, grid: &dyn ModelGrid, dt: f64) -> Result<(), ComponentError> {
///         let z = grid.fields().field(ElementKind::Node, "topographic__elevation")?;
///         let mut z = z.write();
///         for node in grid.core_nodes() {
///             z[node] += self.rate * dt;
///         }
///         Ok(())
///     }
/// }
///
/// let mut grid = RasterModelGrid::new(3, 3, 1.0).unwrap();
/// let z = grid.add_zeros(ElementKind::Node, "topographic__elevation");
/// let mut uplift = Uplift { rate: 0.5 };
/// uplift.run_one_step(&grid, 2.0).unwrap();
/// assert_eq!(z.read()[4], 1.0);
/// assert_eq!(z.read()[0], 0.0);
/// ```
pub trait Component: 'static {
    /// Name for error reporting and logging.
    fn name(&self) -> &str;

    /// Fields read by [`run_one_step`](Self::run_one_step).
    fn input_fields(&self) -> Vec<FieldSpec>;

    /// Fields written by [`run_one_step`](Self::run_one_step).
    fn output_fields(&self) -> Vec<FieldSpec>;

    /// Largest stable timestep on `grid`, or `None` for no limit.
    fn max_dt(&self, _grid: &dyn ModelGrid) -> Option<f64> {
        None
    }

    /// Advance the component by `dt`.
    fn run_one_step(&mut self, grid: &dyn ModelGrid, dt: f64) -> Result<(), ComponentError>;
}

/// Look up a declared input, failing with
/// [`ComponentError::MissingInput`] if it is absent.
pub fn require_field(
    grid: &dyn ModelGrid,
    component: &str,
    spec: &FieldSpec,
) -> Result<FieldHandle, ComponentError> {
    grid.fields()
        .field(spec.kind, &spec.name)
        .map_err(|_| ComponentError::MissingInput {
            component: component.to_string(),
            field: spec.name.clone(),
            kind: spec.kind,
        })
}

/// Return a declared output, registering it as zeros if absent.
///
/// Units declared on `spec` are recorded on the field either way.
pub fn ensure_output(
    grid: &mut dyn ModelGrid,
    spec: &FieldSpec,
) -> Result<FieldHandle, ComponentError> {
    let fields = grid.fields_mut();
    let handle = if fields.has_field(spec.kind, &spec.name) {
        fields.field(spec.kind, &spec.name)?
    } else {
        fields.add_zeros(spec.kind, &spec.name)
    };
    if let Some(units) = &spec.units {
        fields.set_units(spec.kind, &spec.name, units.as_str())?;
    }
    Ok(handle)
}

/// Check that every required input of `component` is present on `grid`.
pub fn check_inputs(grid: &dyn ModelGrid, component: &dyn Component) -> Result<(), ComponentError> {
    for spec in component.input_fields() {
        if !spec.optional {
            require_field(grid, component.name(), &spec)?;
        }
    }
    Ok(())
}

/// Fail with [`ComponentError::GridMismatch`] unless `grid` is the one
/// identified by `expected`.
pub fn check_grid(
    component: &str,
    expected: GridInstanceId,
    grid: &dyn ModelGrid,
) -> Result<(), ComponentError> {
    let actual = grid.instance_id();
    if actual != expected {
        return Err(ComponentError::GridMismatch {
            component: component.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
