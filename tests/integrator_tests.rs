use approx::assert_abs_diff_eq;
use nbsim::dynamics::diagnostics::{kinetic_energy, total_momentum};
use nbsim::{IntegratorConfig, Scenario, TrajectoryStore, VerletIntegrator};

fn assert_all_finite(store: &TrajectoryStore) {
    for t in 0..store.timestep_count() {
        let frame = store.raw_frame(t).expect("frame in range");
        assert!(
            frame.iter().all(|q| q.is_finite()),
            "frame {t} holds a non-finite value"
        );
    }
}

fn moving_three_body(timesteps: usize) -> TrajectoryStore {
    let mut store = TrajectoryStore::new(timesteps, 3, 2).unwrap();
    store.set_initial_state(0, &[100.0, -90.0], &[0.3, 0.1]).unwrap();
    store.set_initial_state(1, &[300.0, -40.0], &[-0.2, 0.4]).unwrap();
    store.set_initial_state(2, &[0.0, 0.0], &[0.1, -0.3]).unwrap();
    store.set_mass(0, 1.0).unwrap();
    store.set_mass(1, 5.0).unwrap();
    store.set_mass(2, 8.0).unwrap();
    store
}

#[test]
fn reference_three_body_run_is_finite_and_reproducible() {
    let scenario = Scenario::three_body_demo();
    let integrator = VerletIntegrator::new(scenario.integrator);

    let mut first = scenario.build_store().unwrap();
    let mut second = scenario.build_store().unwrap();
    let profile = integrator.integrate(&mut first);
    integrator.integrate(&mut second);

    assert_eq!(profile.steps, 9_998);
    assert_all_finite(&first);
    assert_eq!(first, second);
}

#[test]
fn rerun_after_clearing_output_is_identical() {
    let integrator = VerletIntegrator::default();
    let mut store = moving_three_body(500);
    integrator.integrate(&mut store);
    let reference = store.clone();

    store.clear_output();
    integrator.integrate(&mut store);

    assert_eq!(store, reference);
}

#[test]
fn positions_keep_their_shape_for_every_frame() {
    let integrator = VerletIntegrator::default();
    let mut store = TrajectoryStore::new(20, 4, 3).unwrap();
    for i in 0..4 {
        let x = i as f64 * 30.0;
        store.set_initial_state(i, &[x, -x, 0.5 * x], &[0.0, 0.1, 0.0]).unwrap();
        store.set_mass(i, 1.0 + i as f64).unwrap();
    }
    integrator.integrate(&mut store);

    for t in 0..20 {
        for i in 0..4 {
            assert_eq!(store.position(i, t).unwrap().len(), 3);
        }
    }
}

#[test]
fn initial_frames_are_left_untouched() {
    let integrator = VerletIntegrator::default();
    let mut store = moving_three_body(50);
    let frame0 = store.raw_frame(0).unwrap().to_vec();
    let frame1 = store.raw_frame(1).unwrap().to_vec();

    integrator.integrate(&mut store);

    assert_eq!(store.raw_frame(0).unwrap(), frame0.as_slice());
    assert_eq!(store.raw_frame(1).unwrap(), frame1.as_slice());
}

#[test]
fn coincident_particles_do_not_blow_up() {
    let integrator = VerletIntegrator::default();
    let mut store = TrajectoryStore::new(10, 2, 2).unwrap();
    store.set_initial_position(0, &[5.0, 5.0]).unwrap();
    store.set_initial_position(1, &[5.0, 5.0]).unwrap();
    store.set_mass(0, 3.0).unwrap();
    store.set_mass(1, 4.0).unwrap();

    let profile = integrator.integrate(&mut store);

    assert_all_finite(&store);
    assert_eq!(profile.softened_pairs, profile.pair_evaluations);
    assert_eq!(store.position(0, 9).unwrap(), vec![5.0, 5.0]);
}

#[test]
fn close_encounter_acceleration_is_capped_by_threshold() {
    let config = IntegratorConfig::default();
    let integrator = VerletIntegrator::new(config);
    let mut store = TrajectoryStore::new(3, 2, 1).unwrap();
    store.set_initial_position(0, &[0.0]).unwrap();
    store.set_initial_position(1, &[1e-9]).unwrap();
    store.set_mass(1, 1.0).unwrap();

    let softened = integrator.step(&mut store, 1).unwrap();
    let displacement = store.position(0, 2).unwrap()[0];

    assert_eq!(softened, 2);
    // G * m * d / THRESHOLD * H^2
    let bound = config.gravitational_constant * 1e-9 / config.softening_threshold
        * config.step_size_squared();
    assert!(displacement.is_finite());
    assert!(displacement > 0.0 && displacement <= bound * (1.0 + 1e-12));
}

#[test]
fn mirrored_equal_masses_stay_symmetric() {
    let integrator = VerletIntegrator::default();
    let mut store = TrajectoryStore::new(2_000, 2, 2).unwrap();
    store.set_initial_state(0, &[-50.0, 0.0], &[0.0, 1.0]).unwrap();
    store.set_initial_state(1, &[50.0, 0.0], &[0.0, -1.0]).unwrap();
    store.set_mass(0, 10.0).unwrap();
    store.set_mass(1, 10.0).unwrap();

    integrator.integrate(&mut store);

    for t in 0..store.timestep_count() {
        let a = store.position(0, t).unwrap();
        let b = store.position(1, t).unwrap();
        assert_abs_diff_eq!(a[0], -b[0], epsilon = 1e-9);
        assert_abs_diff_eq!(a[1], -b[1], epsilon = 1e-9);
    }
}

#[test]
fn pair_attracts_along_separation_axis() {
    let integrator = VerletIntegrator::default();
    let mut store = TrajectoryStore::new(3, 2, 2).unwrap();
    store.set_initial_position(0, &[-50.0, 0.0]).unwrap();
    store.set_initial_position(1, &[50.0, 0.0]).unwrap();
    store.set_mass(0, 1.0).unwrap();
    store.set_mass(1, 1.0).unwrap();

    integrator.integrate(&mut store);

    let a = store.position(0, 2).unwrap();
    let b = store.position(1, 2).unwrap();
    assert!(a[0] > -50.0, "particle 0 should move toward particle 1");
    assert!(b[0] < 50.0, "particle 1 should move toward particle 0");
    assert_eq!(a[1], 0.0);
}

#[test]
fn center_of_mass_moves_linearly() {
    let integrator = VerletIntegrator::default();
    let mut store = moving_three_body(1_000);
    integrator.integrate(&mut store);

    let com0 = store.center_of_mass(0).unwrap();
    let com1 = store.center_of_mass(1).unwrap();
    for t in 0..store.timestep_count() {
        let com = store.center_of_mass(t).unwrap();
        for axis in 0..2 {
            let expected = com0[axis] + t as f64 * (com1[axis] - com0[axis]);
            assert_abs_diff_eq!(com[axis], expected, epsilon = 1e-5);
        }
    }
}

#[test]
fn momentum_is_conserved() {
    let config = IntegratorConfig::default();
    let integrator = VerletIntegrator::new(config);
    let mut store = moving_three_body(1_000);
    integrator.integrate(&mut store);

    let initial = total_momentum(&store, 1, config.step_size).unwrap();
    let last = store.timestep_count() - 1;
    let final_momentum = total_momentum(&store, last, config.step_size).unwrap();
    for axis in 0..2 {
        assert_abs_diff_eq!(initial[axis], final_momentum[axis], epsilon = 1e-6);
    }
}

#[test]
fn kinetic_energy_grows_as_resting_pair_falls_together() {
    let config = IntegratorConfig::default();
    let integrator = VerletIntegrator::new(config);
    let mut store = TrajectoryStore::new(60, 2, 2).unwrap();
    store.set_initial_position(0, &[-60.0, 0.0]).unwrap();
    store.set_initial_position(1, &[60.0, 0.0]).unwrap();
    store.set_mass(0, 4.0).unwrap();
    store.set_mass(1, 4.0).unwrap();

    integrator.integrate(&mut store);

    let h = config.step_size;
    assert_eq!(kinetic_energy(&store, 1, h).unwrap(), 0.0);
    let mut previous = 0.0;
    for t in 2..store.timestep_count() {
        let energy = kinetic_energy(&store, t, h).unwrap();
        assert!(energy > previous, "kinetic energy dropped at frame {t}");
        previous = energy;
    }
}

#[test]
fn massless_particle_is_pulled_without_pulling_back() {
    let integrator = VerletIntegrator::default();
    let mut store = TrajectoryStore::new(3, 2, 1).unwrap();
    store.set_initial_position(0, &[0.0]).unwrap();
    store.set_initial_position(1, &[40.0]).unwrap();
    store.set_mass(0, 0.0).unwrap();
    store.set_mass(1, 6.0).unwrap();

    integrator.integrate(&mut store);

    assert!(store.position(0, 2).unwrap()[0] > 0.0);
    assert_eq!(store.position(1, 2).unwrap(), vec![40.0]);
}

#[test]
fn all_zero_store_integrates_trivially() {
    let integrator = VerletIntegrator::default();
    let mut store = TrajectoryStore::new(100, 3, 3).unwrap();

    integrator.integrate(&mut store);

    for t in 0..100 {
        assert!(store.raw_frame(t).unwrap().iter().all(|&q| q == 0.0));
    }
}

#[test]
fn constants_are_configurable() {
    let mut weak = moving_three_body(200);
    let mut strong = weak.clone();

    let weak_config = IntegratorConfig::default().with_gravitational_constant(1.0);
    VerletIntegrator::new(weak_config).integrate(&mut weak);
    VerletIntegrator::default().integrate(&mut strong);

    assert_ne!(weak, strong);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_evaluation_is_bit_identical() {
    let scenario = Scenario::three_body_demo();
    let sequential = VerletIntegrator::new(scenario.integrator);
    let mut parallel = VerletIntegrator::new(scenario.integrator);
    parallel.set_parallel(true);

    let mut a = moving_three_body(2_000);
    let mut b = a.clone();
    sequential.integrate(&mut a);
    parallel.integrate(&mut b);

    assert_eq!(a, b);
}
