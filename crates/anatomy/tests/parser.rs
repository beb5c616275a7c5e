use anatomy::{load_model, Anatomy, JointKindDef, WRIST_HAND_MODEL};
use physics::{MusculoSim, Simulation};
use std::fs;

#[test]
fn parse_pendulum_example() {
    let json = fs::read_to_string("tests/data/pendulum.json").unwrap();
    let a = Anatomy::from_json(&json).unwrap();
    assert_eq!(a.bodies.len(), 1);
    assert_eq!(a.joints.len(), 1);
    assert!(a.muscles.is_empty());
    assert_eq!(a.gravity, [0.0, -9.80665, 0.0]);
    assert!(matches!(a.joints[0].kind, JointKindDef::Pin { .. }));
}

#[test]
fn sim_from_pendulum_runs() {
    let model = load_model("tests/data/pendulum.json").unwrap();
    let mut sim = MusculoSim::new(model);
    sim.init_system().unwrap();
    for _ in 0..5 {
        sim.integrate().unwrap();
    }
    assert_eq!(sim.istep(), 5);
    assert_eq!(sim.list_elements().bodies, vec!["ground", "bob"]);
}

#[test]
fn planar_coordinates_keep_their_names_and_locks() {
    let model = load_model("tests/data/planar_target.json").unwrap();
    let mut sim = MusculoSim::new(model);
    sim.init_system().unwrap();
    let ty = sim.coordinate("target-joint", 2).unwrap();
    assert_eq!(ty.name(), "target_ty");
    assert_eq!(ty.is_locked(&sim.get_state().unwrap()), Ok(true));
}

#[test]
fn unknown_parent_is_reported() {
    let err = load_model("tests/data/unknown_parent.json").unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("hinge"), "{message}");
    assert!(message.contains("humerus"), "{message}");
}

#[test]
fn missing_file_is_reported() {
    let err = Anatomy::from_path("tests/data/does_not_exist.json").unwrap_err();
    assert!(format!("{err:#}").contains("does_not_exist.json"));
}

#[test]
fn bundled_wrist_model_has_the_expected_layout() {
    let model = load_model(WRIST_HAND_MODEL).unwrap();
    let joints: Vec<_> = model.joints().iter().map(|j| j.name.as_str()).collect();
    assert_eq!(joints, vec!["elbow", "radioulnar"]);
    assert_eq!(model.muscles().len(), 6);
    assert_eq!(model.markers()[0].name, "thumb");
    assert_eq!(model.num_coordinates(), 2);
    assert!(!model.is_finalized());
}
