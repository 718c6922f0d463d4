use u_cvrptw::config::SolverConfig;
use u_cvrptw::constructive::{cheapest_insertion, AssignmentStatus};
use u_cvrptw::distance::CostMatrix;
use u_cvrptw::error::RoutingError;
use u_cvrptw::evaluation::Demands;
use u_cvrptw::io::ProblemInput;
use u_cvrptw::model::{RoutingModel, TIME};
use u_cvrptw::models::Problem;
use u_cvrptw::solver::Solver;

fn symmetric() -> CostMatrix {
    CostMatrix::from_rows(
        "distance",
        vec![
            vec![0, 4, 6, 5],
            vec![4, 0, 3, 7],
            vec![6, 3, 0, 4],
            vec![5, 7, 4, 0],
        ],
    )
    .expect("square")
}

#[test]
fn three_nodes_match_brute_force() {
    let d = symmetric();
    let problem = Problem::new(d.clone(), vec![0, 1, 1, 1], vec![10], 0).expect("valid");
    let solved = Solver::new(SolverConfig::default())
        .solve(&problem)
        .expect("solves");

    let tour = |order: &[usize]| {
        let mut stops = vec![0];
        stops.extend_from_slice(order);
        stops.push(0);
        stops.windows(2).map(|w| d.get(w[0], w[1])).sum::<i64>()
    };
    let orders = [
        [1, 2, 3],
        [1, 3, 2],
        [2, 1, 3],
        [2, 3, 1],
        [3, 1, 2],
        [3, 2, 1],
    ];
    let best = orders.iter().map(|o| tour(o)).min().expect("non-empty");

    assert!(solved.is_complete());
    assert_eq!(tour(solved.solution.route(0).nodes()), best);
    assert_eq!(solved.view.vehicles[0].distance, best);
}

#[test]
fn demand_over_fleet_capacity_is_partial() {
    let problem = Problem::new(symmetric(), vec![0, 4, 4, 4], vec![5, 5], 0).expect("valid");
    let model = RoutingModel::from_problem(&problem, &SolverConfig::default()).expect("model");

    let construction = cheapest_insertion(&model).expect("constructs");
    match &construction.status {
        AssignmentStatus::Partial { unrouted } => assert_eq!(unrouted.len(), 1),
        AssignmentStatus::Complete => panic!("12 units cannot fit in 10"),
    }

    let solved = Solver::new(SolverConfig::default())
        .solve(&problem)
        .expect("solves");
    assert_eq!(solved.solution.unrouted().len(), 1);
    assert!(matches!(
        solved.require_complete(),
        Err(RoutingError::NoFeasibleSolution { .. })
    ));
}

#[test]
fn unreachable_window_is_infeasible() {
    let mut model = RoutingModel::new(2, 1, 0);
    let time = model.register_arc_evaluator(
        CostMatrix::from_rows("time", vec![vec![0, 3], vec![3, 0]]).expect("square"),
    );
    model.set_arc_cost_evaluator(time).expect("registered");
    let t = model
        .add_dimension(time, 0, vec![100], true, TIME)
        .expect("dimension");
    let node = model.index().node_position(1);
    model.set_cumul_range(t, node, 5, 10).expect("bound");

    let violation = model.evaluate_route(0, vec![1]).expect_err("arrives at 3 < 5");
    assert_eq!(violation.dimension, t);

    // the same window is reachable once waiting is allowed
    let mut model = RoutingModel::new(2, 1, 0);
    let time = model.register_arc_evaluator(
        CostMatrix::from_rows("time", vec![vec![0, 3], vec![3, 0]]).expect("square"),
    );
    model.set_arc_cost_evaluator(time).expect("registered");
    let t = model
        .add_dimension(time, 5, vec![100], true, TIME)
        .expect("dimension");
    model.set_cumul_range(t, node, 5, 10).expect("bound");
    let route = model.evaluate_route(0, vec![1]).expect("waits 2");
    assert_eq!(route.schedule().cumul(t, 1).min, 5);
}

#[test]
fn custom_dimension_through_model_api() {
    let mut model = RoutingModel::new(4, 2, 0);
    let d = model.register_arc_evaluator(symmetric());
    let q = model.register_node_evaluator(Demands::new(vec![0, 2, 2, 2]));
    model.set_arc_cost_evaluator(d).expect("registered");
    model
        .add_dimension(q, 0, vec![4, 4], true, "Capacity")
        .expect("dimension");
    let construction = cheapest_insertion(&model).expect("constructs");
    assert!(construction.status.is_complete());
    assert_eq!(construction.solution.num_used_vehicles(), 2);
}

#[test]
fn json_round_trip_through_solver() {
    let input = ProblemInput::from_json_str(
        r#"{"datas": {
            "distance_matrix": [[0, 4, 6, 5], [4, 0, 3, 7], [6, 3, 0, 4], [5, 7, 4, 0]],
            "time_matrix": [[0, 2, 3, 3], [2, 0, 2, 4], [3, 2, 0, 2], [3, 4, 2, 0]],
            "demands": [0, 1, 2, 1],
            "vehicle_capacities": [3, 3],
            "num_vehicles": 2,
            "depot": 0,
            "vehicle_distances": 30,
            "time_windows": [[0, 40], [0, 5], [0, 20], [6, 15]],
            "calculation_id": 42
        }}"#,
    )
    .expect("parses");
    let calculation_id = input.calculation_id;
    let problem = input.into_problem().expect("valid");
    let solved = Solver::new(SolverConfig::default())
        .solve(&problem)
        .expect("solves")
        .require_complete()
        .expect("all nodes fit");

    let output = solved.output();
    for route in &output.routes {
        assert_eq!(route.routes.first(), Some(&0));
        assert_eq!(route.routes.last(), Some(&0));
        assert!(route.load <= 3);
        assert!(route.distance <= 30);
        let times = route.times.as_ref().expect("time windows present");
        assert_eq!(times.len(), route.routes.len());
    }

    let json = output.to_json_string(calculation_id).expect("serializes");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["calculation_id"], 42);
    assert_eq!(value["result"]["routes"].as_array().map(Vec::len), Some(2));
}
