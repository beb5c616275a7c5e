//! # Model Components
//!
//! A [`Model`] is a tree of rigid bodies rooted at [`GROUND`], connected by
//! joints whose generalized coordinates form the simulation state. Muscles
//! act on single coordinates and markers are fixed points on bodies.
//!
//! Components are added through the builder methods in [`crate::builder`]
//! and referenced by *name*. Once [`Model::init_system`] has run the layout
//! of coordinates is frozen and no further components can be added.

use crate::activation::ActivationDynamics;
use crate::error::PhysicsError;
use crate::state::State;
use crate::types::Vec3;

/// Name of the implicit root body every model starts with.
pub const GROUND: &str = "ground";

/// A rigid body. `inertia` holds the principal moments about the centre of
/// mass, expressed in the body frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub name: String,
    pub mass: f64,
    pub com: Vec3,
    pub inertia: Vec3,
}

impl Body {
    #[must_use]
    pub fn new(name: impl Into<String>, mass: f64) -> Self {
        Self {
            name: name.into(),
            mass,
            com: Vec3::ZERO,
            inertia: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn with_com(mut self, com: Vec3) -> Self {
        self.com = com;
        self
    }

    #[must_use]
    pub fn with_inertia(mut self, inertia: Vec3) -> Self {
        self.inertia = inertia;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JointKind {
    /// One rotational degree of freedom about `axis` (parent frame).
    Pin { axis: Vec3 },
    /// Rotation about the parent z axis followed by translation in the
    /// parent x-y plane. Coordinates are ordered `(rz, tx, ty)`.
    Planar,
}

impl JointKind {
    #[must_use]
    pub const fn dof(&self) -> usize {
        match self {
            Self::Pin { .. } => 1,
            Self::Planar => 3,
        }
    }
}

/// Definition of one generalized coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateDef {
    pub name: String,
    pub default_value: f64,
    pub range: (f64, f64),
    pub default_locked: bool,
}

impl CoordinateDef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: 0.0,
            range: (f64::NEG_INFINITY, f64::INFINITY),
            default_locked: false,
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: f64) -> Self {
        self.default_value = value;
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    #[must_use]
    pub fn locked(mut self, locked: bool) -> Self {
        self.default_locked = locked;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    pub name: String,
    pub parent: String,
    pub child: String,
    pub kind: JointKind,
    /// Joint centre expressed in the parent body frame.
    pub location_in_parent: Vec3,
    /// Joint centre expressed in the child body frame.
    pub location_in_child: Vec3,
    pub coordinates: Vec<CoordinateDef>,
    /// Viscous damping applied to every coordinate of the joint.
    pub damping: f64,
}

impl Joint {
    /// Pin joint with a single coordinate named after the joint.
    #[must_use]
    pub fn pin(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
        axis: Vec3,
    ) -> Self {
        let name = name.into();
        Self {
            coordinates: vec![CoordinateDef::new(name.clone())],
            name,
            parent: parent.into(),
            child: child.into(),
            kind: JointKind::Pin { axis },
            location_in_parent: Vec3::ZERO,
            location_in_child: Vec3::ZERO,
            damping: 0.0,
        }
    }

    /// Planar joint with coordinates `<name>_rz`, `<name>_tx`, `<name>_ty`.
    #[must_use]
    pub fn planar(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            coordinates: ["rz", "tx", "ty"]
                .iter()
                .map(|suffix| CoordinateDef::new(format!("{name}_{suffix}")))
                .collect(),
            name,
            parent: parent.into(),
            child: child.into(),
            kind: JointKind::Planar,
            location_in_parent: Vec3::ZERO,
            location_in_child: Vec3::ZERO,
            damping: 0.0,
        }
    }

    #[must_use]
    pub fn with_location_in_parent(mut self, location: Vec3) -> Self {
        self.location_in_parent = location;
        self
    }

    #[must_use]
    pub fn with_location_in_child(mut self, location: Vec3) -> Self {
        self.location_in_child = location;
        self
    }

    #[must_use]
    pub fn with_coordinates(mut self, coordinates: Vec<CoordinateDef>) -> Self {
        self.coordinates = coordinates;
        self
    }

    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }
}

/// A torque actuator on one coordinate driven by its activation level.
#[derive(Clone, Debug, PartialEq)]
pub struct Muscle {
    pub name: String,
    pub coordinate: String,
    pub moment_arm: f64,
    pub max_isometric_force: f64,
    pub dynamics: ActivationDynamics,
    pub default_activation: f64,
}

impl Muscle {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        coordinate: impl Into<String>,
        moment_arm: f64,
        max_isometric_force: f64,
    ) -> Self {
        let dynamics = ActivationDynamics::default();
        Self {
            name: name.into(),
            coordinate: coordinate.into(),
            moment_arm,
            max_isometric_force,
            default_activation: dynamics.min_activation,
            dynamics,
        }
    }

    #[must_use]
    pub fn with_dynamics(mut self, dynamics: ActivationDynamics) -> Self {
        self.dynamics = dynamics;
        self
    }

    #[must_use]
    pub fn with_default_activation(mut self, activation: f64) -> Self {
        self.default_activation = activation;
        self
    }

    /// Torque produced on the driven coordinate at `activation`.
    #[must_use]
    pub fn torque(&self, activation: f64) -> f64 {
        activation * self.max_isometric_force * self.moment_arm
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub name: String,
    pub body: String,
    pub location: Vec3,
}

impl Marker {
    #[must_use]
    pub fn new(name: impl Into<String>, body: impl Into<String>, location: Vec3) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            location,
        }
    }
}

/// Index bookkeeping for a joint once its names have been resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct JointLink {
    pub parent: usize,
    pub child: usize,
    /// Index of the joint's first coordinate in the state vectors.
    pub offset: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CoordinateInfo {
    pub joint: usize,
    pub dof: usize,
    pub def: CoordinateDef,
}

/// Frozen topology computed by [`Model::init_system`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct System {
    /// Joints ordered so every parent body is placed before its children.
    pub order: Vec<usize>,
    /// Bodies moved by each joint (the child and all its descendants).
    pub subtree: Vec<Vec<usize>>,
}

#[derive(Clone, Debug)]
pub struct Model {
    pub(crate) name: String,
    pub(crate) gravity: Vec3,
    pub(crate) bodies: Vec<Body>,
    pub(crate) joints: Vec<Joint>,
    pub(crate) links: Vec<JointLink>,
    pub(crate) coordinates: Vec<CoordinateInfo>,
    pub(crate) muscles: Vec<Muscle>,
    pub(crate) muscle_coordinates: Vec<usize>,
    pub(crate) markers: Vec<Marker>,
    pub(crate) marker_bodies: Vec<usize>,
    pub(crate) system: Option<System>,
}

impl Model {
    /// Creates an empty model containing only the ground body.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gravity: Vec3::new(0.0, -9.80665, 0.0),
            bodies: vec![Body::new(GROUND, 0.0)],
            joints: Vec::new(),
            links: Vec::new(),
            coordinates: Vec::new(),
            muscles: Vec::new(),
            muscle_coordinates: Vec::new(),
            markers: Vec::new(),
            marker_bodies: Vec::new(),
            system: None,
        }
    }

    #[must_use]
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[must_use]
    pub fn muscles(&self) -> &[Muscle] {
        &self.muscles
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn num_coordinates(&self) -> usize {
        self.coordinates.len()
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.system.is_some()
    }

    #[must_use]
    pub fn body_index(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    #[must_use]
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }

    /// Global index of coordinate `dof` of the named joint.
    #[must_use]
    pub fn coordinate_index(&self, joint: &str, dof: usize) -> Option<usize> {
        let j = self.joint_index(joint)?;
        (dof < self.joints[j].kind.dof()).then(|| self.links[j].offset + dof)
    }

    #[must_use]
    pub fn coordinate_index_by_name(&self, name: &str) -> Option<usize> {
        self.coordinates.iter().position(|c| c.def.name == name)
    }

    #[must_use]
    pub fn coordinate_name(&self, index: usize) -> Option<&str> {
        self.coordinates.get(index).map(|c| c.def.name.as_str())
    }

    /// Default state: every coordinate at its default value and lock flag,
    /// zero speeds, and every muscle at its default activation.
    pub fn default_state(&self) -> Result<State, PhysicsError> {
        if !self.is_finalized() {
            return Err(PhysicsError::NotInitialized);
        }
        let n = self.coordinates.len();
        Ok(State {
            time: 0.0,
            q: self.coordinates.iter().map(|c| c.def.default_value).collect(),
            u: vec![0.0; n],
            udot: vec![0.0; n],
            locked: self.coordinates.iter().map(|c| c.def.default_locked).collect(),
            activations: self.muscles.iter().map(|m| m.default_activation).collect(),
        })
    }

    pub(crate) fn system(&self) -> Result<&System, PhysicsError> {
        self.system.as_ref().ok_or(PhysicsError::NotInitialized)
    }
}
