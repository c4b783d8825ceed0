//! D4 steepest-descent flow routing and drainage-area accumulation.
//!
//! Each core node drains across the active link with the steepest downhill
//! slope. Nodes with no downhill neighbour (pits) and every boundary node
//! drain to themselves. Nodes are then ordered so every donor comes before
//! its receiver, and cell areas are summed downstream in that order.

use loam_component::{
    check_grid, ensure_output, require_field, Component, ComponentError, FieldSpec,
};
use loam_core::{ElementKind, GridInstanceId, NodeStatus, BAD_INDEX};
use loam_grid::ModelGrid;
use smallvec::SmallVec;

use crate::fields::{
    DRAINAGE_AREA, FLOW_RECEIVER_NODE, FLOW_SINK_FLAG, SURFACE_WATER_DISCHARGE,
    TOPOGRAPHIC_ELEVATION, TOPOGRAPHIC_STEEPEST_SLOPE,
};

const NAME: &str = "flow_accumulator";

/// Configuration for [`FlowAccumulator`].
#[derive(Clone, Debug, PartialEq)]
pub struct FlowAccumulatorConfig {
    /// Runoff per unit area (m/yr). Must be finite and >= 0. Default: 1.0.
    pub runoff_rate: f64,
    /// Node field to route over. Default: `"topographic__elevation"`.
    pub surface: String,
}

impl Default for FlowAccumulatorConfig {
    fn default() -> Self {
        Self {
            runoff_rate: 1.0,
            surface: TOPOGRAPHIC_ELEVATION.to_string(),
        }
    }
}

impl FlowAccumulatorConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ComponentError> {
        if !self.runoff_rate.is_finite() || self.runoff_rate < 0.0 {
            return Err(ComponentError::InvalidConfig {
                component: NAME.to_string(),
                reason: format!("runoff_rate must be finite and >= 0, got {}", self.runoff_rate),
            });
        }
        if self.surface.is_empty() {
            return Err(ComponentError::InvalidConfig {
                component: NAME.to_string(),
                reason: "surface name is empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Routes flow over a surface and accumulates drainage area and discharge.
///
/// Stateless between steps apart from the routing of the last step, which
/// is available through [`receivers`](Self::receivers) and
/// [`node_order`](Self::node_order). Fields are looked up by name on every
/// step.
#[derive(Debug)]
pub struct FlowAccumulator {
    config: FlowAccumulatorConfig,
    grid_id: GridInstanceId,
    receivers: Vec<usize>,
    order: Vec<usize>,
}

fn output_specs() -> [FieldSpec; 5] {
    [
        FieldSpec::required(DRAINAGE_AREA, ElementKind::Node).with_units("m^2"),
        FieldSpec::required(SURFACE_WATER_DISCHARGE, ElementKind::Node).with_units("m^3/yr"),
        FieldSpec::required(TOPOGRAPHIC_STEEPEST_SLOPE, ElementKind::Node).with_units("-"),
        FieldSpec::required(FLOW_RECEIVER_NODE, ElementKind::Node),
        FieldSpec::required(FLOW_SINK_FLAG, ElementKind::Node),
    ]
}

fn surface_spec(surface: &str) -> FieldSpec {
    FieldSpec::required(surface, ElementKind::Node).with_units("m")
}

impl FlowAccumulator {
    /// Bind an accumulator to `grid`, registering its output fields.
    pub fn new(
        grid: &mut dyn ModelGrid,
        config: FlowAccumulatorConfig,
    ) -> Result<Self, ComponentError> {
        config.validate()?;
        require_field(grid, NAME, &surface_spec(&config.surface))?;
        for spec in &output_specs() {
            ensure_output(grid, spec)?;
        }
        let n = grid.number_of_nodes();
        tracing::debug!(runoff_rate = config.runoff_rate, nodes = n, "flow accumulator ready");
        Ok(Self {
            config,
            grid_id: grid.instance_id(),
            receivers: (0..n).collect(),
            order: (0..n).collect(),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &FlowAccumulatorConfig {
        &self.config
    }

    /// Receiver of every node from the last step (itself for sinks).
    pub fn receivers(&self) -> &[usize] {
        &self.receivers
    }

    /// Nodes ordered upstream to downstream: every node appears before its
    /// receiver.
    pub fn node_order(&self) -> &[usize] {
        &self.order
    }

    /// Steepest-descent receiver and slope of every node.
    fn route(&self, grid: &dyn ModelGrid, z: &[f64]) -> (Vec<usize>, Vec<f64>) {
        let n = grid.number_of_nodes();
        let status = grid.status_at_node();
        let mut receivers: Vec<usize> = (0..n).collect();
        let mut slopes = vec![0.0; n];
        for node in 0..n {
            if status[node] != NodeStatus::Core {
                continue;
            }
            for (link, nb) in grid.active_neighbours_at_node(node) {
                let s = (z[node] - z[nb]) / grid.length_of_link(link);
                if s > slopes[node] {
                    slopes[node] = s;
                    receivers[node] = nb;
                }
            }
        }
        (receivers, slopes)
    }

    /// Donor-before-receiver ordering of the routing tree.
    fn upstream_order(receivers: &[usize]) -> Vec<usize> {
        let n = receivers.len();
        let mut donors: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); n];
        for (node, &r) in receivers.iter().enumerate() {
            if r != node {
                donors[r].push(node);
            }
        }
        // Downstream-first stack, built by depth-first search from each base.
        let mut stack = Vec::with_capacity(n);
        let mut pending = Vec::new();
        for base in (0..n).filter(|&b| receivers[b] == b) {
            pending.push(base);
            while let Some(node) = pending.pop() {
                stack.push(node);
                pending.extend(donors[node].iter().copied());
            }
        }
        stack.reverse();
        stack
    }
}

impl Component for FlowAccumulator {
    fn name(&self) -> &str {
        NAME
    }

    fn input_fields(&self) -> Vec<FieldSpec> {
        vec![surface_spec(&self.config.surface)]
    }

    fn output_fields(&self) -> Vec<FieldSpec> {
        output_specs().into()
    }

    fn run_one_step(&mut self, grid: &dyn ModelGrid, _dt: f64) -> Result<(), ComponentError> {
        check_grid(NAME, self.grid_id, grid)?;
        let z = require_field(grid, NAME, &surface_spec(&self.config.surface))?.to_vec();
        let fields = grid.fields();
        let area_out = fields.field(ElementKind::Node, DRAINAGE_AREA)?;
        let discharge_out = fields.field(ElementKind::Node, SURFACE_WATER_DISCHARGE)?;
        let slope_out = fields.field(ElementKind::Node, TOPOGRAPHIC_STEEPEST_SLOPE)?;
        let receiver_out = fields.field(ElementKind::Node, FLOW_RECEIVER_NODE)?;
        let sink_out = fields.field(ElementKind::Node, FLOW_SINK_FLAG)?;

        let (receivers, slopes) = self.route(grid, &z);
        let order = Self::upstream_order(&receivers);
        if order.len() != receivers.len() {
            return Err(ComponentError::ExecutionFailed {
                reason: format!(
                    "routing tree covers {} of {} nodes",
                    order.len(),
                    receivers.len()
                ),
            });
        }

        let cell_at_node = grid.cell_at_node();
        let mut area: Vec<f64> = cell_at_node
            .iter()
            .map(|&c| if c == BAD_INDEX { 0.0 } else { grid.area_of_cell(c) })
            .collect();
        let mut discharge: Vec<f64> = area.iter().map(|a| a * self.config.runoff_rate).collect();
        for &node in &order {
            let r = receivers[node];
            if r != node {
                area[r] += area[node];
                discharge[r] += discharge[node];
            }
        }

        area_out.write().copy_from_slice(&area);
        discharge_out.write().copy_from_slice(&discharge);
        slope_out.write().copy_from_slice(&slopes);
        {
            let mut recv = receiver_out.write();
            let mut sink = sink_out.write();
            for (node, &r) in receivers.iter().enumerate() {
                recv[node] = r as f64;
                sink[node] = if r == node { 1.0 } else { 0.0 };
            }
        }
        let sinks = receivers.iter().enumerate().filter(|&(n, &r)| n == r).count();
        tracing::debug!(sinks, "flow routed");

        self.receivers = receivers;
        self.order = order;
        Ok(())
    }
}
