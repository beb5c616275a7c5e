//! End-to-end behaviour of a two-joint forearm: elbow flexion and
//! radioulnar pronation, driven by antagonist muscle pairs.

use approx::assert_relative_eq;
use physics::{
    Body, CoordinateDef, Joint, Marker, Model, Muscle, MusculoSim, PhysicsError, Simulation, Vec3,
    GROUND,
};

fn forearm() -> MusculoSim {
    let mut model = Model::new("forearm");
    model
        .add_body(
            Body::new("ulna", 0.6)
                .with_com(Vec3::new(0.0, -0.15, 0.0))
                .with_inertia(Vec3::new(0.006, 0.001, 0.006)),
        )
        .unwrap();
    model
        .add_body(
            Body::new("radius", 0.5)
                .with_com(Vec3::new(0.0, -0.2, 0.0))
                .with_inertia(Vec3::new(0.005, 0.0008, 0.005)),
        )
        .unwrap();
    model
        .add_joint(
            Joint::pin("elbow", GROUND, "ulna", Vec3::Z)
                .with_location_in_parent(Vec3::new(0.0, 0.8, 0.0))
                .with_coordinates(vec![CoordinateDef::new("elbow_flexion").with_range(-0.6, 2.0)])
                .with_damping(0.5),
        )
        .unwrap();
    model
        .add_joint(
            Joint::pin("radioulnar", "ulna", "radius", Vec3::new(0.0, -1.0, 0.0))
                .with_coordinates(vec![CoordinateDef::new("pro_sup").with_range(-1.4, 1.4)])
                .with_damping(0.05),
        )
        .unwrap();
    model
        .add_muscle(Muscle::new("BIC", "elbow_flexion", 0.04, 150.0))
        .unwrap();
    model
        .add_muscle(Muscle::new("TRI", "elbow_flexion", -0.025, 200.0))
        .unwrap();
    model.add_muscle(Muscle::new("PT", "pro_sup", 0.012, 25.0)).unwrap();
    model.add_muscle(Muscle::new("SUP", "pro_sup", -0.012, 30.0)).unwrap();
    model
        .add_marker(Marker::new("thumb", "radius", Vec3::new(0.02, -0.45, 0.03)))
        .unwrap();
    let mut sim = MusculoSim::new(model);
    sim.init_system().unwrap();
    sim
}

#[test]
fn biceps_flexes_the_elbow() {
    let mut sim = forearm();
    let start = sim.state_desc().unwrap().markers["thumb"].pos;
    for _ in 0..30 {
        sim.actuate(&[1.0, 0.0, 0.0, 0.0]).unwrap();
        sim.integrate().unwrap();
    }
    let desc = sim.state_desc().unwrap();
    assert!(desc.joint_pos["elbow"][0] > 0.1);
    assert!(desc.markers["thumb"].pos[0] > start[0]);
    assert!(desc.muscles["BIC"].activation > 0.9);
    assert!(desc.muscles["TRI"].activation < 0.05);
}

#[test]
fn pronation_moves_the_thumb_out_of_plane() {
    let mut sim = forearm();
    let start = sim.state_desc().unwrap().markers["thumb"].pos;
    for _ in 0..30 {
        sim.actuate(&[0.0, 0.0, 1.0, 0.0]).unwrap();
        sim.integrate().unwrap();
    }
    let desc = sim.state_desc().unwrap();
    assert!(desc.joint_pos["radioulnar"][0] > 0.0);
    assert!((desc.markers["thumb"].pos[2] - start[2]).abs() > 1e-4);
}

#[test]
fn elbow_stays_within_range() {
    let mut sim = forearm();
    for _ in 0..300 {
        sim.actuate(&[1.0, 0.0, 0.0, 0.0]).unwrap();
        sim.integrate().unwrap();
        let q = sim.state_desc().unwrap().joint_pos["elbow"][0];
        assert!(q <= 2.0 + 1e-12);
    }
}

#[test]
fn reset_restores_defaults() {
    let mut sim = forearm();
    for _ in 0..10 {
        sim.actuate(&[1.0, 0.0, 1.0, 0.0]).unwrap();
        sim.integrate().unwrap();
    }
    sim.reset().unwrap();
    let desc = sim.state_desc().unwrap();
    assert_eq!(sim.istep(), 0);
    assert_relative_eq!(desc.time, 0.0);
    assert_eq!(desc.joint_pos["elbow"], vec![0.0]);
    assert_eq!(desc.joint_acc["radioulnar"], vec![0.0]);
    assert_eq!(desc.muscles["BIC"].excitation, 0.0);
}

#[test]
fn target_marker_joint_can_be_attached_before_init_only() {
    let mut model = Model::new("bare");
    model.add_body(Body::new("target", 1e-4)).unwrap();
    let mut sim = MusculoSim::new(model);
    sim.add_joint(Joint::planar("target-joint", GROUND, "target"))
        .unwrap();
    sim.init_system().unwrap();
    assert_eq!(
        sim.add_joint(Joint::planar("again", GROUND, "target")),
        Err(PhysicsError::SystemFinalized)
    );
    let ty = sim.coordinate("target-joint", 2).unwrap();
    assert_eq!(ty.name(), "target-joint_ty");
}

#[test]
fn state_desc_serializes_to_json() {
    let sim = forearm();
    let json = serde_json::to_value(sim.state_desc().unwrap()).unwrap();
    assert!(json["markers"]["thumb"]["pos"].is_array());
    assert_eq!(json["joint_pos"]["elbow"][0], 0.0);
}
