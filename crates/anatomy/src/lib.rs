#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
//! JSON model descriptions.
//!
//! An [`Anatomy`] lists bodies, joints, muscles and markers by name and is
//! turned into a [`physics::Model`] with [`Anatomy::into_model`]. The bundled
//! forearm/hand description lives at [`WRIST_HAND_MODEL`].

use std::path::Path;

use anyhow::{Context, Result};
use physics::{
    ActivationDynamics, Body, CoordinateDef, Joint, JointKind, Marker, Model, Muscle, Vec3,
};
use serde::Deserialize;

/// Path of the bundled forearm/wrist/hand model description.
pub const WRIST_HAND_MODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/models/wrist_hand.json");

#[derive(Debug, Deserialize)]
pub struct Anatomy {
    pub name: String,
    #[serde(default = "default_gravity")]
    pub gravity: [f64; 3],
    pub bodies: Vec<BodyDef>,
    #[serde(default)]
    pub joints: Vec<JointDef>,
    #[serde(default)]
    pub muscles: Vec<MuscleDef>,
    #[serde(default)]
    pub markers: Vec<MarkerDef>,
}

#[derive(Debug, Deserialize)]
pub struct BodyDef {
    pub name: String,
    pub mass: f64,
    #[serde(default = "zero_vec")]
    pub com: [f64; 3],
    #[serde(default = "zero_vec")]
    pub inertia: [f64; 3],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JointKindDef {
    Pin { axis: [f64; 3] },
    Planar,
}

#[derive(Debug, Deserialize)]
pub struct JointDef {
    pub name: String,
    pub parent: String,
    pub child: String,
    pub kind: JointKindDef,
    #[serde(default = "zero_vec")]
    pub location_in_parent: [f64; 3],
    #[serde(default = "zero_vec")]
    pub location_in_child: [f64; 3],
    #[serde(default)]
    pub damping: f64,
    pub coordinates: Vec<CoordinateJson>,
}

#[derive(Debug, Deserialize)]
pub struct CoordinateJson {
    pub name: String,
    #[serde(default)]
    pub default: f64,
    /// Missing means unbounded.
    pub range: Option<[f64; 2]>,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Deserialize)]
pub struct MuscleDef {
    pub name: String,
    pub coordinate: String,
    pub moment_arm: f64,
    pub max_isometric_force: f64,
    pub tau_activation: Option<f64>,
    pub tau_deactivation: Option<f64>,
    pub default_activation: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MarkerDef {
    pub name: String,
    pub body: String,
    pub location: [f64; 3],
}

fn zero_vec() -> [f64; 3] {
    [0.0, 0.0, 0.0]
}

fn default_gravity() -> [f64; 3] {
    [0.0, -9.80665, 0.0]
}

impl Anatomy {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model description {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("failed to parse model description {}", path.display()))
    }

    /// Builds an unfinalized [`Model`]. Callers may still attach components
    /// before calling [`Model::init_system`].
    pub fn into_model(self) -> Result<Model> {
        let mut model = Model::new(self.name).with_gravity(Vec3::from_array(self.gravity));

        for body in self.bodies {
            model
                .add_body(
                    Body::new(body.name, body.mass)
                        .with_com(Vec3::from_array(body.com))
                        .with_inertia(Vec3::from_array(body.inertia)),
                )
                .context("invalid body")?;
        }

        for joint in self.joints {
            let kind = match joint.kind {
                JointKindDef::Pin { axis } => JointKind::Pin {
                    axis: Vec3::from_array(axis),
                },
                JointKindDef::Planar => JointKind::Planar,
            };
            let coordinates = joint
                .coordinates
                .into_iter()
                .map(|c| {
                    let def = CoordinateDef::new(c.name).with_default(c.default).locked(c.locked);
                    match c.range {
                        Some([min, max]) => def.with_range(min, max),
                        None => def,
                    }
                })
                .collect();
            let name = joint.name;
            let built = match kind {
                JointKind::Pin { axis } => Joint::pin(name.clone(), joint.parent, joint.child, axis),
                JointKind::Planar => Joint::planar(name.clone(), joint.parent, joint.child),
            }
            .with_location_in_parent(Vec3::from_array(joint.location_in_parent))
            .with_location_in_child(Vec3::from_array(joint.location_in_child))
            .with_damping(joint.damping)
            .with_coordinates(coordinates);
            model
                .add_joint(built)
                .with_context(|| format!("invalid joint `{name}`"))?;
        }

        for muscle in self.muscles {
            let defaults = ActivationDynamics::default();
            let dynamics = ActivationDynamics::new(
                muscle.tau_activation.unwrap_or(defaults.tau_activation),
                muscle.tau_deactivation.unwrap_or(defaults.tau_deactivation),
            );
            let name = muscle.name.clone();
            model
                .add_muscle(
                    Muscle::new(
                        muscle.name,
                        muscle.coordinate,
                        muscle.moment_arm,
                        muscle.max_isometric_force,
                    )
                    .with_dynamics(dynamics)
                    .with_default_activation(
                        muscle.default_activation.unwrap_or(dynamics.min_activation),
                    ),
                )
                .with_context(|| format!("invalid muscle `{name}`"))?;
        }

        for marker in self.markers {
            let name = marker.name.clone();
            model
                .add_marker(Marker::new(
                    marker.name,
                    marker.body,
                    Vec3::from_array(marker.location),
                ))
                .with_context(|| format!("invalid marker `{name}`"))?;
        }

        tracing::debug!(
            model = model.name(),
            bodies = model.bodies().len(),
            joints = model.joints().len(),
            muscles = model.muscles().len(),
            "model description loaded"
        );
        Ok(model)
    }
}

/// Reads and builds the model at `path` in one go.
pub fn load_model(path: impl AsRef<Path>) -> Result<Model> {
    Anatomy::from_path(path)?.into_model()
}
