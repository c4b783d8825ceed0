//! Integration tests for the reference components driven together over
//! real and stub grids.

use std::cell::RefCell;
use std::rc::Rc;

use loam_component::{check_inputs, Component, ComponentError, Driver, DriverError};
use loam_components::fields::{DRAINAGE_AREA, FLOW_SINK_FLAG, SURFACE_WATER_DISCHARGE};
use loam_components::{FlowAccumulator, FlowAccumulatorConfig, LinearDiffuser, LinearDiffuserConfig};
use loam_core::{BoundaryKind, ElementKind, NodeStatus};
use loam_grid::{GridEdge, ModelGrid, RasterModelGrid};
use loam_test_utils::fixtures::{ConstComponent, FailingComponent, RecordingComponent};
use loam_test_utils::{random_terrain, small_grid, tilted_plane, with_elevation, ChainGrid, ELEVATION};

fn diffuser(grid: &mut dyn ModelGrid, d: f64) -> LinearDiffuser {
    let cfg = LinearDiffuserConfig {
        linear_diffusivity: d,
        ..Default::default()
    };
    LinearDiffuser::new(grid, cfg).unwrap()
}

#[test]
fn diffusion_conserves_mass_inside_closed_edges() {
    let mut grid = small_grid(6, 7);
    grid.set_closed_boundaries_at_grid_edges(true, true, true, true);
    let z0 = random_terrain(&grid, 11, 10.0);
    let z = with_elevation(&mut grid, z0.clone());
    let mut d = diffuser(&mut grid, 0.1);

    let total = |values: &[f64]| grid.core_nodes().iter().map(|&n| values[n]).sum::<f64>();
    let before = total(&z0);
    for _ in 0..50 {
        d.run_one_step(&grid, 1.0).unwrap();
    }
    let after = total(&z.to_vec());
    assert!((before - after).abs() < 1e-9, "mass drifted: {before} -> {after}");

    // Closed nodes never change.
    let z = z.read();
    for node in grid.closed_boundary_nodes() {
        assert_eq!(z[node], z0[node]);
    }
}

#[test]
fn diffusion_flattens_toward_mean() {
    let mut grid = small_grid(5, 5);
    grid.set_closed_boundaries_at_grid_edges(true, true, true, true);
    let z0 = random_terrain(&grid, 3, 1.0);
    let z = with_elevation(&mut grid, z0);
    let mut d = diffuser(&mut grid, 0.2);

    let spread = |v: &[f64]| {
        let core: Vec<f64> = grid.core_nodes().iter().map(|&n| v[n]).collect();
        let max = core.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = core.iter().copied().fold(f64::INFINITY, f64::min);
        max - min
    };
    let initial = spread(&z.to_vec());
    for _ in 0..500 {
        d.run_one_step(&grid, 1.0).unwrap();
    }
    assert!(spread(&z.to_vec()) < initial * 1e-3);
}

#[test]
fn diffuser_runs_on_non_raster_grid() {
    let mut chain = ChainGrid::new(5);
    let z = chain
        .fields_mut()
        .add_field(ElementKind::Node, ELEVATION, vec![0.0, 0.0, 1.0, 0.0, 0.0])
        .unwrap();
    let mut d = diffuser(&mut chain, 0.01);
    assert!(check_inputs(&chain, &d).is_ok());
    let limit = d.max_dt(&chain).unwrap();
    assert!((limit - 25.0).abs() < 1e-9);

    d.run_one_step(&chain, 1.0).unwrap();
    let z = z.read();
    assert!((z[2] - 0.98).abs() < 1e-12);
    assert!((z[1] - 0.01).abs() < 1e-12);
    assert!((z[3] - 0.01).abs() < 1e-12);
    assert_eq!(z[0], 0.0);
    assert_eq!(z[4], 0.0);
}

#[test]
fn driver_runs_diffusion_then_routing() {
    let mut grid = RasterModelGrid::new(5, 5, 10.0).unwrap();
    grid.set_status_at_edge(GridEdge::Left, BoundaryKind::Closed);
    grid.set_status_at_edge(GridEdge::Right, BoundaryKind::Closed);
    grid.set_status_at_edge(GridEdge::Top, BoundaryKind::Closed);
    let plane = tilted_plane(&grid, 0.1);
    with_elevation(&mut grid, plane);

    let d = diffuser(&mut grid, 0.01);
    let acc = FlowAccumulator::new(&mut grid, FlowAccumulatorConfig::default()).unwrap();
    let components: Vec<Box<dyn Component>> = vec![Box::new(d), Box::new(acc)];
    let mut driver = Driver::new(components).unwrap();
    assert_eq!(driver.component_names(), vec!["linear_diffuser", "flow_accumulator"]);

    driver.run(&grid, 100.0, 10).unwrap();
    assert_eq!(driver.steps_taken(), 10);
    assert!((driver.elapsed_time() - 1000.0).abs() < 1e-9);

    // Each bottom-edge core column of three 100 m² cells drains to its
    // bottom node.
    let area = grid.field_values(ElementKind::Node, DRAINAGE_AREA).unwrap();
    let q = grid.field_values(ElementKind::Node, SURFACE_WATER_DISCHARGE).unwrap();
    for node in [1, 2, 3] {
        assert!((area[node] - 300.0).abs() < 1e-9, "node {node}: {}", area[node]);
        assert!((q[node] - 300.0).abs() < 1e-9);
    }
    let total: f64 = grid.nodes_at_edge(GridEdge::Bottom).iter().map(|&n| area[n]).sum();
    assert!((total - 900.0).abs() < 1e-9);
}

#[test]
fn components_follow_reregistered_fields() {
    let mut grid = small_grid(5, 5);
    with_elevation(&mut grid, vec![0.0; 25]);
    let d = diffuser(&mut grid, 0.01);
    let acc = FlowAccumulator::new(&mut grid, FlowAccumulatorConfig::default()).unwrap();
    let components: Vec<Box<dyn Component>> = vec![Box::new(d), Box::new(acc)];
    let mut driver = Driver::new(components).unwrap();

    let mut bump = vec![0.0; 25];
    bump[12] = 1.0;
    let z = grid.add_field(ElementKind::Node, ELEVATION, bump).unwrap();
    let area = grid.add_zeros(ElementKind::Node, DRAINAGE_AREA);
    driver.run(&grid, 1.0, 1).unwrap();

    assert!((z.read()[12] - 0.96).abs() < 1e-12);
    assert!((z.read()[7] - 0.01).abs() < 1e-12);
    // Every one of the nine core cells ends up at some self-draining node.
    let sinks = grid.field_values(ElementKind::Node, FLOW_SINK_FLAG).unwrap();
    let area = area.read();
    let total: f64 = (0..25).filter(|&n| sinks[n] == 1.0).map(|n| area[n]).sum();
    assert!((total - 9.0).abs() < 1e-9);
    assert!(area[12] >= 1.0);
}

#[test]
fn driver_rejects_unstable_timestep() {
    let mut grid = RasterModelGrid::new(5, 5, 10.0).unwrap();
    with_elevation(&mut grid, vec![0.0; 25]);
    let d = diffuser(&mut grid, 0.01);
    let acc = FlowAccumulator::new(&mut grid, FlowAccumulatorConfig::default()).unwrap();
    let components: Vec<Box<dyn Component>> = vec![Box::new(acc), Box::new(d)];
    let mut driver = Driver::new(components).unwrap();

    match driver.run(&grid, 5000.0, 1) {
        Err(DriverError::DtTooLarge {
            configured_dt,
            max_supported,
            constraining_component,
        }) => {
            assert_eq!(configured_dt, 5000.0);
            assert!((max_supported - 2500.0).abs() < 1e-6);
            assert_eq!(constraining_component, "linear_diffuser");
        }
        other => panic!("expected DtTooLarge, got {other:?}"),
    }
    assert_eq!(driver.steps_taken(), 0);
}

#[test]
fn watershed_drains_to_chosen_outlet() {
    let mut grid = small_grid(5, 5);
    let nodata = -9999.0;
    let mut z = vec![nodata; 25];
    for node in [6, 7, 8, 11, 12, 13, 16, 17, 18] {
        z[node] = 10.0 + grid.y_of_node()[node];
    }
    z[7] = 5.0;
    let outlet = grid.set_watershed_boundary_condition(&z, nodata).unwrap();
    assert_eq!(grid.status_at_node()[outlet], NodeStatus::FixedValue);
    with_elevation(&mut grid, z);

    let mut acc = FlowAccumulator::new(&mut grid, FlowAccumulatorConfig::default()).unwrap();
    acc.run_one_step(&grid, 1.0).unwrap();

    let area = grid.field_values(ElementKind::Node, DRAINAGE_AREA).unwrap();
    assert_eq!(area[outlet], 9.0);
    let sinks = grid.field_values(ElementKind::Node, FLOW_SINK_FLAG).unwrap();
    for node in grid.core_nodes() {
        assert_eq!(sinks[node], 0.0, "core node {node} is a sink");
    }
    // The last node in routing order is a root.
    let last = *acc.node_order().last().unwrap();
    assert_eq!(acc.receivers()[last], last);
}

#[test]
fn fixtures_drive_through_failure() {
    let mut grid = small_grid(3, 3);
    let marker = grid.add_zeros(ElementKind::Node, "marker");
    let log = Rc::new(RefCell::new(Vec::new()));
    let failing = FailingComponent::new("fail", 2);
    let calls = failing.counter();
    let components: Vec<Box<dyn Component>> = vec![
        Box::new(ConstComponent::new("const", "marker", 2.0)),
        Box::new(RecordingComponent::new("rec", &log).with_max_dt(1.0)),
        Box::new(failing),
    ];
    let mut driver = Driver::new(components).unwrap();

    assert!(matches!(
        driver.run(&grid, 2.0, 1),
        Err(DriverError::DtTooLarge { .. })
    ));

    match driver.run(&grid, 0.5, 5) {
        Err(DriverError::ComponentFailed { name, step, reason }) => {
            assert_eq!(name, "fail");
            assert_eq!(step, 2);
            assert!(matches!(reason, ComponentError::ExecutionFailed { .. }));
        }
        other => panic!("expected component failure, got {other:?}"),
    }
    assert_eq!(driver.steps_taken(), 2);
    assert_eq!(calls.get(), 3);
    assert_eq!(log.borrow().len(), 3);
    assert!(log.borrow().iter().all(|(name, dt)| name == "rec" && *dt == 0.5));
    assert!(marker.read().iter().all(|&v| v == 2.0));
}

#[test]
fn const_component_without_field_fails() {
    let grid = small_grid(3, 3);
    let mut c = ConstComponent::new("const", "missing", 1.0);
    assert!(matches!(
        c.run_one_step(&grid, 1.0),
        Err(ComponentError::Field(_))
    ));
}
