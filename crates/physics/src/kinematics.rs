//! # Forward Kinematics
//!
//! Walks the joint tree from ground and places every body frame in world
//! coordinates for a given set of generalized coordinates.

use crate::error::PhysicsError;
use crate::model::{JointKind, Model};
use crate::types::{Mat3, Vec3};

/// World placement of a body frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub origin: Vec3,
    pub rotation: Mat3,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        origin: Vec3::ZERO,
        rotation: Mat3::IDENTITY,
    };

    /// Maps a point from body coordinates into world coordinates.
    #[must_use]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.origin + self.rotation.mul_vec(local)
    }
}

/// Pose of every body, indexed like [`Model::bodies`].
pub fn body_poses(model: &Model, q: &[f64]) -> Result<Vec<Pose>, PhysicsError> {
    let system = model.system()?;
    if q.len() != model.num_coordinates() {
        return Err(PhysicsError::StateMismatch {
            expected: model.num_coordinates(),
            actual: q.len(),
        });
    }

    let mut poses = vec![Pose::IDENTITY; model.bodies.len()];
    for &j in &system.order {
        let joint = &model.joints[j];
        let link = model.links[j];
        let parent = poses[link.parent];
        let centre = parent.transform_point(joint.location_in_parent);
        let coords = &q[link.offset..link.offset + joint.kind.dof()];

        let (rotation, centre) = match joint.kind {
            JointKind::Pin { axis } => (parent.rotation * Mat3::from_axis_angle(axis, coords[0]), centre),
            JointKind::Planar => {
                let shift = parent.rotation.mul_vec(Vec3::new(coords[1], coords[2], 0.0));
                (
                    parent.rotation * Mat3::from_axis_angle(Vec3::Z, coords[0]),
                    centre + shift,
                )
            }
        };
        poses[link.child] = Pose {
            origin: centre - rotation.mul_vec(joint.location_in_child),
            rotation,
        };
    }
    Ok(poses)
}

/// World position of every marker, indexed like [`Model::markers`].
pub fn marker_positions(model: &Model, poses: &[Pose]) -> Vec<Vec3> {
    model
        .markers
        .iter()
        .zip(&model.marker_bodies)
        .map(|(marker, &body)| poses[body].transform_point(marker.location))
        .collect()
}
