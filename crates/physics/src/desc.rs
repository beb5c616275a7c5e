//! Structured, name-keyed snapshots of the simulation.
//!
//! Every map is a `BTreeMap`, so iteration follows lexicographic name order.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MuscleDesc {
    pub activation: f64,
    pub excitation: f64,
    pub force: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MarkerDesc {
    pub pos: [f64; 3],
}

/// Snapshot of joints, bodies, muscles and markers queried by name.
///
/// Joint entries hold one value per degree of freedom, in coordinate order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StateDesc {
    pub time: f64,
    pub joint_pos: BTreeMap<String, Vec<f64>>,
    pub joint_vel: BTreeMap<String, Vec<f64>>,
    pub joint_acc: BTreeMap<String, Vec<f64>>,
    pub body_pos: BTreeMap<String, [f64; 3]>,
    pub muscles: BTreeMap<String, MuscleDesc>,
    pub markers: BTreeMap<String, MarkerDesc>,
}

impl StateDesc {
    /// Visits every numeric entry, in a fixed order.
    pub fn for_each_value_mut(&mut self, mut f: impl FnMut(&mut f64)) {
        f(&mut self.time);
        for values in self
            .joint_pos
            .values_mut()
            .chain(self.joint_vel.values_mut())
            .chain(self.joint_acc.values_mut())
        {
            values.iter_mut().for_each(&mut f);
        }
        for pos in self.body_pos.values_mut() {
            pos.iter_mut().for_each(&mut f);
        }
        for muscle in self.muscles.values_mut() {
            f(&mut muscle.activation);
            f(&mut muscle.excitation);
            f(&mut muscle.force);
        }
        for marker in self.markers.values_mut() {
            marker.pos.iter_mut().for_each(&mut f);
        }
    }
}

/// Names of every component in a model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Elements {
    pub joints: Vec<String>,
    pub bodies: Vec<String>,
    pub muscles: Vec<String>,
    pub markers: Vec<String>,
}

impl fmt::Display for Elements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "JOINTS")?;
        for (i, name) in self.joints.iter().enumerate() {
            writeln!(f, "{i} {name}")?;
        }
        writeln!(f, "\nBODIES")?;
        for (i, name) in self.bodies.iter().enumerate() {
            writeln!(f, "{i} {name}")?;
        }
        writeln!(f, "\nMUSCLES")?;
        for (i, name) in self.muscles.iter().enumerate() {
            writeln!(f, "{i} {name}")?;
        }
        writeln!(f, "\nMARKERS")?;
        for (i, name) in self.markers.iter().enumerate() {
            writeln!(f, "{i} {name}")?;
        }
        Ok(())
    }
}
