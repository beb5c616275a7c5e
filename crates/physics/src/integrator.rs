//! # Integration
//!
//! Per-coordinate forward dynamics and the fixed-substep time integrator.
//!
//! Each coordinate is treated independently: rotational coordinates use the
//! moment of inertia of the moved subtree about the joint axis, translational
//! ones its total mass. Generalized forces are gravity, muscle torques and
//! joint damping. No attempt is made to regularise degenerate inertia; a
//! massless subtree produces non-finite accelerations.

use crate::error::PhysicsError;
use crate::kinematics::{body_poses, Pose};
use crate::model::{JointKind, Model};
use crate::state::State;
use crate::types::Vec3;

/// Generalized accelerations for the given state and muscle activations.
pub fn accelerations(model: &Model, state: &State) -> Result<Vec<f64>, PhysicsError> {
    let system = model.system()?;
    let poses = body_poses(model, &state.q)?;

    let mut forces = vec![0.0; model.num_coordinates()];
    for ((muscle, &coordinate), &activation) in model
        .muscles
        .iter()
        .zip(&model.muscle_coordinates)
        .zip(&state.activations)
    {
        forces[coordinate] += muscle.torque(activation);
    }

    let mut udot = vec![0.0; model.num_coordinates()];
    for (j, joint) in model.joints.iter().enumerate() {
        let link = model.links[j];
        let parent = poses[link.parent];
        let mut centre = parent.transform_point(joint.location_in_parent);
        if matches!(joint.kind, JointKind::Planar) {
            // rz turns about the translated joint centre
            let (tx, ty) = (state.q[link.offset + 1], state.q[link.offset + 2]);
            centre += parent.rotation.mul_vec(Vec3::new(tx, ty, 0.0));
        }
        let bodies = &system.subtree[j];

        for dof in 0..joint.kind.dof() {
            let c = link.offset + dof;
            let generalized = forces[c] - joint.damping * state.u[c];
            let (inertia, gravity) = match (joint.kind, dof) {
                (JointKind::Pin { axis }, _) => {
                    rotational_terms(model, &poses, bodies, centre, parent.rotation.mul_vec(axis))
                }
                (JointKind::Planar, 0) => {
                    rotational_terms(model, &poses, bodies, centre, parent.rotation.mul_vec(Vec3::Z))
                }
                (JointKind::Planar, _) => {
                    let direction = if dof == 1 { Vec3::X } else { Vec3::Y };
                    translational_terms(model, bodies, parent.rotation.mul_vec(direction))
                }
            };
            udot[c] = (generalized + gravity) / inertia;
        }
    }
    Ok(udot)
}

/// Moment of inertia about `axis` through `centre`, and the gravity torque
/// about the same axis, for a set of bodies.
fn rotational_terms(model: &Model, poses: &[Pose], bodies: &[usize], centre: Vec3, axis: Vec3) -> (f64, f64) {
    let axis = axis.normalize();
    let mut inertia = 0.0;
    let mut torque = 0.0;
    for &b in bodies {
        let body = &model.bodies[b];
        let pose = poses[b];
        let local_axis = pose.rotation.transpose_mul_vec(axis);
        let r = pose.transform_point(body.com) - centre;
        let r_perp = r - axis * r.dot(axis);
        inertia += body.inertia.x * local_axis.x * local_axis.x
            + body.inertia.y * local_axis.y * local_axis.y
            + body.inertia.z * local_axis.z * local_axis.z
            + body.mass * r_perp.length_squared();
        torque += r.cross(model.gravity * body.mass).dot(axis);
    }
    (inertia, torque)
}

fn translational_terms(model: &Model, bodies: &[usize], direction: Vec3) -> (f64, f64) {
    let mass: f64 = bodies.iter().map(|&b| model.bodies[b].mass).sum();
    (mass, mass * model.gravity.dot(direction))
}

/// Advances `state` by `dt` using `substeps` semi-implicit Euler steps.
///
/// Muscle activations follow `excitations` through their activation
/// dynamics. Locked coordinates keep their value with zero speed; other
/// coordinates are clamped to their range with speed zeroed at a limit.
pub fn advance(
    model: &Model,
    state: &mut State,
    excitations: &[f64],
    dt: f64,
    substeps: usize,
) -> Result<(), PhysicsError> {
    let expected = model.num_coordinates();
    for actual in [state.u.len(), state.udot.len(), state.locked.len()] {
        if actual != expected {
            return Err(PhysicsError::StateMismatch { expected, actual });
        }
    }
    let substeps = substeps.max(1);
    #[allow(clippy::cast_precision_loss)]
    let h = dt / substeps as f64;

    for _ in 0..substeps {
        for ((activation, muscle), &excitation) in state
            .activations
            .iter_mut()
            .zip(&model.muscles)
            .zip(excitations)
        {
            *activation = muscle.dynamics.integrate(excitation, *activation, h);
        }

        let udot = accelerations(model, state)?;
        for (c, info) in model.coordinates.iter().enumerate() {
            if state.locked[c] {
                state.u[c] = 0.0;
                state.udot[c] = 0.0;
                continue;
            }
            state.udot[c] = udot[c];
            state.u[c] += udot[c] * h;
            state.q[c] += state.u[c] * h;

            let (min, max) = info.def.range;
            if state.q[c] < min {
                state.q[c] = min;
                state.u[c] = 0.0;
            } else if state.q[c] > max {
                state.q[c] = max;
                state.u[c] = 0.0;
            }
        }
        state.time += h;
    }
    Ok(())
}
