use criterion::{criterion_group, criterion_main, Criterion};
use physics::{Body, Joint, Model, Muscle, MusculoSim, Simulation, Vec3, GROUND};

fn bench_forearm_step(c: &mut Criterion) {
    let mut model = Model::new("forearm");
    model
        .add_body(Body::new("ulna", 0.6).with_com(Vec3::new(0.0, -0.15, 0.0)))
        .unwrap();
    model
        .add_body(Body::new("radius", 0.5).with_com(Vec3::new(0.0, -0.2, 0.0)))
        .unwrap();
    model
        .add_joint(Joint::pin("elbow", GROUND, "ulna", Vec3::Z).with_damping(0.5))
        .unwrap();
    model
        .add_joint(Joint::pin("radioulnar", "ulna", "radius", Vec3::new(0.0, -1.0, 0.0)).with_damping(0.05))
        .unwrap();
    model.add_muscle(Muscle::new("BIC", "elbow", 0.04, 150.0)).unwrap();
    model.add_muscle(Muscle::new("PT", "radioulnar", 0.012, 25.0)).unwrap();

    let mut sim = MusculoSim::new(model);
    sim.init_system().unwrap();
    sim.actuate(&[0.5, 0.5]).unwrap();
    c.bench_function("forearm_step", |b| b.iter(|| sim.integrate().unwrap()));
}

criterion_group!(benches, bench_forearm_step);
criterion_main!(benches);
