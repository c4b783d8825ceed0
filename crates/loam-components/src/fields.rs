//! Standard field names shared by the reference components.

/// Land surface elevation at nodes (m).
pub const TOPOGRAPHIC_ELEVATION: &str = "topographic__elevation";

/// Hillslope sediment flux per unit width along links (m²/yr).
pub const HILLSLOPE_SEDIMENT_FLUX: &str = "hillslope_sediment__unit_volume_flux";

/// Upstream contributing area at nodes (m²).
pub const DRAINAGE_AREA: &str = "drainage_area";

/// Volumetric water discharge at nodes (m³/yr).
pub const SURFACE_WATER_DISCHARGE: &str = "surface_water__discharge";

/// Slope toward the receiver node (m/m).
pub const TOPOGRAPHIC_STEEPEST_SLOPE: &str = "topographic__steepest_slope";

/// Id of the node each node drains to, stored as `f64`.
pub const FLOW_RECEIVER_NODE: &str = "flow__receiver_node";

/// `1.0` where a node drains to itself, `0.0` elsewhere.
pub const FLOW_SINK_FLAG: &str = "flow__sink_flag";
