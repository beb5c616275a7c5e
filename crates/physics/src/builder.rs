//! # Model Builder
//!
//! Builder methods for adding bodies, joints, muscles and markers to a
//! [`Model`], and [`Model::init_system`] which freezes the topology.

use std::collections::VecDeque;

use crate::error::PhysicsError;
use crate::model::{Body, CoordinateInfo, Joint, JointLink, Marker, Model, Muscle, System};

impl Model {
    /// Adds a rigid body and returns its index.
    pub fn add_body(&mut self, body: Body) -> Result<usize, PhysicsError> {
        self.ensure_open()?;
        if self.body_index(&body.name).is_some() {
            return Err(PhysicsError::DuplicateName(body.name));
        }
        self.bodies.push(body);
        Ok(self.bodies.len() - 1)
    }

    /// Adds a joint connecting two existing bodies and returns its index.
    ///
    /// The joint's coordinates are appended to the state layout in order.
    pub fn add_joint(&mut self, joint: Joint) -> Result<usize, PhysicsError> {
        self.ensure_open()?;
        if self.joint_index(&joint.name).is_some() {
            return Err(PhysicsError::DuplicateName(joint.name));
        }
        let expected = joint.kind.dof();
        if joint.coordinates.len() != expected {
            return Err(PhysicsError::CoordinateCount {
                joint: joint.name,
                expected,
                actual: joint.coordinates.len(),
            });
        }
        if let Some(dup) = joint
            .coordinates
            .iter()
            .find(|c| self.coordinate_index_by_name(&c.name).is_some())
        {
            return Err(PhysicsError::DuplicateName(dup.name.clone()));
        }
        let parent = self
            .body_index(&joint.parent)
            .ok_or_else(|| PhysicsError::UnknownBody(joint.parent.clone()))?;
        let child = self
            .body_index(&joint.child)
            .ok_or_else(|| PhysicsError::UnknownBody(joint.child.clone()))?;
        if child == 0 || self.links.iter().any(|l| l.child == child) {
            return Err(PhysicsError::MultipleParents(joint.child));
        }

        let index = self.joints.len();
        let offset = self.coordinates.len();
        for (dof, def) in joint.coordinates.iter().enumerate() {
            self.coordinates.push(CoordinateInfo {
                joint: index,
                dof,
                def: def.clone(),
            });
        }
        self.links.push(JointLink {
            parent,
            child,
            offset,
        });
        self.joints.push(joint);
        Ok(index)
    }

    /// Adds a muscle acting on a named coordinate and returns its index.
    pub fn add_muscle(&mut self, muscle: Muscle) -> Result<usize, PhysicsError> {
        self.ensure_open()?;
        if self.muscles.iter().any(|m| m.name == muscle.name) {
            return Err(PhysicsError::DuplicateName(muscle.name));
        }
        let coordinate = self
            .coordinate_index_by_name(&muscle.coordinate)
            .ok_or_else(|| PhysicsError::UnknownCoordinate(muscle.coordinate.clone()))?;
        self.muscles.push(muscle);
        self.muscle_coordinates.push(coordinate);
        Ok(self.muscles.len() - 1)
    }

    /// Adds a marker fixed to a named body and returns its index.
    pub fn add_marker(&mut self, marker: Marker) -> Result<usize, PhysicsError> {
        self.ensure_open()?;
        if self.markers.iter().any(|m| m.name == marker.name) {
            return Err(PhysicsError::DuplicateName(marker.name));
        }
        let body = self
            .body_index(&marker.body)
            .ok_or_else(|| PhysicsError::UnknownBody(marker.body.clone()))?;
        self.markers.push(marker);
        self.marker_bodies.push(body);
        Ok(self.markers.len() - 1)
    }

    /// Freezes the model topology.
    ///
    /// Every body other than ground must hang from ground through a chain of
    /// joints. After this call the coordinate layout is fixed and the builder
    /// methods return [`PhysicsError::SystemFinalized`].
    pub fn init_system(&mut self) -> Result<(), PhysicsError> {
        self.ensure_open()?;

        let mut order = Vec::with_capacity(self.joints.len());
        let mut reached = vec![false; self.bodies.len()];
        reached[0] = true;
        let mut queue = VecDeque::from([0usize]);
        while let Some(body) = queue.pop_front() {
            for (j, link) in self.links.iter().enumerate() {
                if link.parent == body && !reached[link.child] {
                    reached[link.child] = true;
                    order.push(j);
                    queue.push_back(link.child);
                }
            }
        }
        if let Some(lost) = reached.iter().position(|r| !r) {
            return Err(PhysicsError::Unattached(self.bodies[lost].name.clone()));
        }

        let subtree = self
            .links
            .iter()
            .map(|link| self.descendants(link.child))
            .collect();

        tracing::debug!(
            model = %self.name,
            bodies = self.bodies.len(),
            coordinates = self.coordinates.len(),
            muscles = self.muscles.len(),
            "model system initialized"
        );
        self.system = Some(System { order, subtree });
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), PhysicsError> {
        if self.is_finalized() {
            Err(PhysicsError::SystemFinalized)
        } else {
            Ok(())
        }
    }

    /// `body` and every body below it in the tree.
    fn descendants(&self, body: usize) -> Vec<usize> {
        let mut out = vec![body];
        let mut i = 0;
        while i < out.len() {
            let current = out[i];
            out.extend(
                self.links
                    .iter()
                    .filter(|l| l.parent == current)
                    .map(|l| l.child),
            );
            i += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JointKind, GROUND};
    use crate::types::Vec3;

    fn arm() -> Model {
        let mut model = Model::new("arm");
        model.add_body(Body::new("upper", 1.0)).unwrap();
        model.add_body(Body::new("lower", 1.0)).unwrap();
        model
            .add_joint(Joint::pin("shoulder", GROUND, "upper", Vec3::Z))
            .unwrap();
        model
            .add_joint(Joint::pin("elbow", "upper", "lower", Vec3::Z))
            .unwrap();
        model
    }

    #[test]
    fn coordinates_are_laid_out_in_joint_order() {
        let mut model = arm();
        model.add_body(Body::new("target", 1e-4)).unwrap();
        model
            .add_joint(Joint::planar("target-joint", GROUND, "target"))
            .unwrap();
        assert_eq!(model.num_coordinates(), 5);
        assert_eq!(model.coordinate_index("elbow", 0), Some(1));
        assert_eq!(model.coordinate_index("target-joint", 2), Some(4));
        assert_eq!(model.coordinate_index("target-joint", 3), None);
        assert_eq!(model.coordinate_name(3), Some("target-joint_tx"));
    }

    #[test]
    fn init_system_freezes_layout() {
        let mut model = arm();
        model.init_system().unwrap();
        assert!(model.is_finalized());
        assert_eq!(
            model.add_body(Body::new("late", 1.0)),
            Err(PhysicsError::SystemFinalized)
        );
        assert_eq!(model.init_system(), Err(PhysicsError::SystemFinalized));
    }

    #[test]
    fn unattached_body_is_rejected() {
        let mut model = arm();
        model.add_body(Body::new("floating", 1.0)).unwrap();
        assert_eq!(
            model.init_system(),
            Err(PhysicsError::Unattached("floating".into()))
        );
    }

    #[test]
    fn a_body_has_one_parent() {
        let mut model = arm();
        let err = model
            .add_joint(Joint::pin("again", GROUND, "lower", Vec3::Z))
            .unwrap_err();
        assert_eq!(err, PhysicsError::MultipleParents("lower".into()));
    }

    #[test]
    fn coordinate_count_must_match_kind() {
        let mut model = arm();
        model.add_body(Body::new("extra", 1.0)).unwrap();
        let joint = Joint::planar("p", GROUND, "extra").with_coordinates(vec![]);
        assert!(matches!(
            model.add_joint(joint),
            Err(PhysicsError::CoordinateCount { expected: 3, actual: 0, .. })
        ));
        assert_eq!(JointKind::Planar.dof(), 3);
    }

    #[test]
    fn muscles_and_markers_resolve_names() {
        let mut model = arm();
        assert_eq!(
            model.add_muscle(Muscle::new("BIC", "wrist", 0.04, 100.0)),
            Err(PhysicsError::UnknownCoordinate("wrist".into()))
        );
        assert_eq!(
            model.add_marker(Marker::new("thumb", "hand", Vec3::ZERO)),
            Err(PhysicsError::UnknownBody("hand".into()))
        );
        assert_eq!(
            model.add_muscle(Muscle::new("BIC", "elbow", 0.04, 100.0)),
            Ok(0)
        );
    }

    #[test]
    fn subtree_contains_descendants() {
        let mut model = arm();
        model.init_system().unwrap();
        let system = model.system().unwrap();
        assert_eq!(system.order, vec![0, 1]);
        assert_eq!(system.subtree[0], vec![1, 2]);
        assert_eq!(system.subtree[1], vec![2]);
    }
}
