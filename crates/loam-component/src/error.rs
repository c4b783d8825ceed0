//! Errors raised by components and the driver that steps them.

use std::error::Error;
use std::fmt;

use loam_core::{ElementKind, FieldError, GridInstanceId};

/// Errors from constructing or stepping a single component.
#[derive(Clone, Debug, PartialEq)]
pub enum ComponentError {
    /// A required input field is not registered on the grid.
    MissingInput {
        /// Component that needs the field.
        component: String,
        /// Name of the missing field.
        field: String,
        /// Element kind it was expected at.
        kind: ElementKind,
    },
    /// A field lookup or registration failed.
    Field(FieldError),
    /// A configuration parameter is out of range.
    InvalidConfig {
        /// Component being configured.
        component: String,
        /// What is wrong with the configuration.
        reason: String,
    },
    /// The component was stepped with a grid other than the one it was
    /// built for.
    GridMismatch {
        /// Component being stepped.
        component: String,
        /// Grid the component was built against.
        expected: GridInstanceId,
        /// Grid it was handed.
        actual: GridInstanceId,
    },
    /// The step itself failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput {
                component,
                field,
                kind,
            } => write!(f, "{component} requires field '{field}' at {kind}"),
            Self::Field(e) => write!(f, "field error: {e}"),
            Self::InvalidConfig { component, reason } => {
                write!(f, "invalid {component} configuration: {reason}")
            }
            Self::GridMismatch {
                component,
                expected,
                actual,
            } => write!(
                f,
                "{component} was built for grid {expected} but stepped with grid {actual}"
            ),
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
        }
    }
}

impl Error for ComponentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FieldError> for ComponentError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

/// Errors from validating or running a [`Driver`](crate::Driver).
#[derive(Clone, Debug, PartialEq)]
pub enum DriverError {
    /// No components registered.
    EmptyPipeline,
    /// The timestep is NaN, infinite, zero or negative.
    InvalidDt {
        /// The rejected timestep.
        value: f64,
    },
    /// A component's `max_dt` is NaN, infinite, zero or negative.
    InvalidMaxDt {
        /// Which component.
        component: String,
        /// The value it returned.
        value: f64,
    },
    /// The timestep exceeds a component's stability limit.
    DtTooLarge {
        /// The requested timestep.
        configured_dt: f64,
        /// The tightest `max_dt` constraint.
        max_supported: f64,
        /// Which component constrains it.
        constraining_component: String,
    },
    /// A component's step failed; earlier components in the same step have
    /// already run.
    ComponentFailed {
        /// Component that failed.
        name: String,
        /// Zero-based step index.
        step: u64,
        /// The underlying failure.
        reason: ComponentError,
    },
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPipeline => write!(f, "driver has no components"),
            Self::InvalidDt { value } => {
                write!(f, "invalid dt {value}: must be finite and > 0")
            }
            Self::InvalidMaxDt { component, value } => write!(
                f,
                "component '{component}' returned invalid max_dt: {value} \
                 (must be finite and > 0)"
            ),
            Self::DtTooLarge {
                configured_dt,
                max_supported,
                constraining_component,
            } => write!(
                f,
                "dt {configured_dt} exceeds max_dt {max_supported} \
                 (constrained by '{constraining_component}')"
            ),
            Self::ComponentFailed { name, step, reason } => {
                write!(f, "component '{name}' failed at step {step}: {reason}")
            }
        }
    }
}

impl Error for DriverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ComponentFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
