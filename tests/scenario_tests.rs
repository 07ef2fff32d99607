use nbsim::utils::{frame_points, to_dvec2};
use nbsim::{DVec3, IntegratorConfig, ParticleState, Scenario, Simulation, TrajectoryError};

fn orbiting_pair() -> Scenario {
    Scenario {
        timesteps: 200,
        degrees_of_freedom: 3,
        integrator: IntegratorConfig::default().with_step_size(0.05),
        particles: vec![
            ParticleState {
                position: vec![-20.0, 0.0, 0.0],
                velocity: Some(vec![0.0, 0.5, 0.0]),
                mass: 2.0,
            },
            ParticleState {
                position: vec![20.0, 0.0, 0.0],
                velocity: Some(vec![0.0, -0.5, 0.0]),
                mass: 2.0,
            },
        ],
    }
}

#[test]
fn scenario_json_defaults_integrator_and_velocity() {
    let json = r#"{
        "timesteps": 5,
        "degrees_of_freedom": 2,
        "particles": [{ "position": [1.0, 2.0], "mass": 3.0 }]
    }"#;

    let scenario: Scenario = serde_json::from_str(json).unwrap();

    assert_eq!(scenario.integrator, IntegratorConfig::default());
    assert_eq!(scenario.particles[0].velocity, None);

    let store = scenario.build_store().unwrap();
    assert_eq!(store.position(0, 0).unwrap(), vec![1.0, 2.0]);
    assert_eq!(store.position(0, 1).unwrap(), vec![1.0, 2.0]);
    assert_eq!(store.mass(0).unwrap(), 3.0);
}

#[test]
fn partial_integrator_config_keeps_other_defaults() {
    let config: IntegratorConfig = serde_json::from_str(r#"{"step_size":0.5}"#).unwrap();
    assert_eq!(config, IntegratorConfig::default().with_step_size(0.5));
    assert_eq!(config.gravitational_constant, 20.0);
    assert_eq!(config.softening_threshold, 100.0);
}

#[test]
fn scenario_round_trips_through_json() {
    let scenario = orbiting_pair();
    let json = serde_json::to_string(&scenario).unwrap();
    let parsed: Scenario = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, scenario);
}

#[test]
fn scenario_primes_positions_velocities_and_masses() {
    let store = orbiting_pair().build_store().unwrap();
    assert_eq!(store.position(0, 1).unwrap(), vec![-20.0, 0.5, 0.0]);
    assert_eq!(store.position(1, 1).unwrap(), vec![20.0, -0.5, 0.0]);
    assert_eq!(store.mass(1).unwrap(), 2.0);
}

#[test]
fn empty_scenario_is_rejected() {
    let mut scenario = orbiting_pair();
    scenario.particles.clear();
    assert!(matches!(
        scenario.build_store(),
        Err(TrajectoryError::InvalidArgument(_))
    ));
}

#[test]
fn short_scenario_is_rejected() {
    let mut scenario = orbiting_pair();
    scenario.timesteps = 2;
    assert!(Simulation::from_scenario(&scenario).is_err());
}

#[test]
fn simulation_runs_scenario_with_its_constants() {
    let mut sim = Simulation::from_scenario(&orbiting_pair()).unwrap();
    assert_eq!(sim.integrator().config().step_size, 0.05);

    let profile = sim.run();

    assert_eq!(profile.steps, 198);
    let com = sim.store().center_of_mass(199).unwrap();
    assert!(com.iter().all(|c| c.abs() < 1e-9));
}

#[test]
fn simulation_can_be_primed_by_hand() {
    let mut sim = Simulation::new(50, 2, 2, IntegratorConfig::default()).unwrap();
    sim.store_mut().set_initial_state(0, &[0.0, 0.0], &[0.0, 0.0]).unwrap();
    sim.store_mut().set_initial_state(1, &[30.0, 0.0], &[0.0, 0.0]).unwrap();
    sim.store_mut().set_mass(0, 1.0).unwrap();
    sim.store_mut().set_mass(1, 1.0).unwrap();
    sim.set_parallel_enabled(true);
    assert!(sim.parallel_enabled());

    sim.run();

    let store = sim.into_store();
    assert!(store.position(0, 49).unwrap()[0] > 0.0);
}

#[test]
fn frames_convert_to_glam_points() {
    let mut sim = Simulation::from_scenario(&Scenario::three_body_demo()).unwrap();
    sim.run();

    let points = frame_points(sim.store(), 0).unwrap();
    assert_eq!(points[0], DVec3::new(100.0, -90.0, 0.0));
    assert_eq!(points.len(), 3);
    assert_eq!(to_dvec2(&[1.0]).y, 0.0);
}

#[test]
fn too_many_axes_cannot_become_points() {
    let sim = Simulation::new(3, 1, 4, IntegratorConfig::default()).unwrap();
    assert!(matches!(
        frame_points(sim.store(), 0),
        Err(TrajectoryError::InvalidArgument(_))
    ));
}
