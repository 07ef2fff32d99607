use nbsim::*;

fn main() -> Result<()> {
    let scenario = Scenario::three_body_demo();
    let mut sim = Simulation::from_scenario(&scenario)?;
    sim.set_parallel_enabled(true);

    let profile = sim.run();
    println!(
        "{} in {:.2} ms ({} softened pairs)",
        sim.store(),
        profile.elapsed.as_secs_f64() * 1000.0,
        profile.softened_pairs
    );

    let store = sim.store();
    for t in (0..store.timestep_count()).step_by(1000) {
        let positions: Vec<Vec<f64>> = (0..store.particle_count())
            .map(|i| store.position(i, t))
            .collect::<Result<_>>()?;
        println!("t = {t:5}: {positions:?}, com = {:?}", store.center_of_mass(t)?);
    }
    Ok(())
}
