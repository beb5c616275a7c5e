//! Mutable integration state and named coordinate handles.

use crate::error::PhysicsError;

/// Snapshot of everything that changes while the model is integrated.
///
/// All per-coordinate vectors share the model's coordinate layout.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub time: f64,
    /// Generalized coordinates.
    pub q: Vec<f64>,
    /// Generalized speeds.
    pub u: Vec<f64>,
    /// Generalized accelerations from the last integration step.
    pub udot: Vec<f64>,
    pub locked: Vec<bool>,
    pub activations: Vec<f64>,
}

impl State {
    #[must_use]
    pub fn num_coordinates(&self) -> usize {
        self.q.len()
    }
}

/// Handle to one generalized coordinate, resolved once by name.
///
/// Setting the value of a locked coordinate is an error; unlock it first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoordinateHandle {
    index: usize,
    name: String,
}

impl CoordinateHandle {
    #[must_use]
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self, state: &State) -> Result<f64, PhysicsError> {
        state.q.get(self.index).copied().ok_or_else(|| self.unknown())
    }

    pub fn is_locked(&self, state: &State) -> Result<bool, PhysicsError> {
        state.locked.get(self.index).copied().ok_or_else(|| self.unknown())
    }

    pub fn set_value(&self, state: &mut State, value: f64) -> Result<(), PhysicsError> {
        if self.is_locked(state)? {
            return Err(PhysicsError::CoordinateLocked(self.name.clone()));
        }
        *state.q.get_mut(self.index).ok_or_else(|| self.unknown())? = value;
        Ok(())
    }

    pub fn set_locked(&self, state: &mut State, locked: bool) -> Result<(), PhysicsError> {
        if locked {
            *state.u.get_mut(self.index).ok_or_else(|| self.unknown())? = 0.0;
            *state.udot.get_mut(self.index).ok_or_else(|| self.unknown())? = 0.0;
        }
        *state.locked.get_mut(self.index).ok_or_else(|| self.unknown())? = locked;
        Ok(())
    }

    fn unknown(&self) -> PhysicsError {
        PhysicsError::UnknownCoordinate(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State {
        State {
            time: 0.0,
            q: vec![0.0, 0.0],
            u: vec![1.0, 2.0],
            udot: vec![0.5, 0.5],
            locked: vec![false, true],
            activations: Vec::new(),
        }
    }

    #[test]
    fn locked_coordinate_rejects_new_value() {
        let mut s = state();
        let ty = CoordinateHandle::new(1, "target_ty");
        assert_eq!(
            ty.set_value(&mut s, 0.4),
            Err(PhysicsError::CoordinateLocked("target_ty".into()))
        );
        ty.set_locked(&mut s, false).unwrap();
        ty.set_value(&mut s, 0.4).unwrap();
        ty.set_locked(&mut s, true).unwrap();
        assert_eq!(ty.value(&s), Ok(0.4));
        assert_eq!(ty.is_locked(&s), Ok(true));
    }

    #[test]
    fn locking_zeroes_motion() {
        let mut s = state();
        let tx = CoordinateHandle::new(0, "target_tx");
        tx.set_locked(&mut s, true).unwrap();
        assert_eq!(s.u[0], 0.0);
        assert_eq!(s.udot[0], 0.0);
    }

    #[test]
    fn ragged_state_is_an_error_not_a_panic() {
        let mut s = state();
        s.q.truncate(1);
        s.u.truncate(1);
        let ty = CoordinateHandle::new(1, "target_ty");
        ty.set_locked(&mut s, false).unwrap();
        assert_eq!(
            ty.set_value(&mut s, 0.4),
            Err(PhysicsError::UnknownCoordinate("target_ty".into()))
        );
        assert_eq!(
            ty.set_locked(&mut s, true),
            Err(PhysicsError::UnknownCoordinate("target_ty".into()))
        );
        assert!(!s.locked[1]);
    }

    #[test]
    fn out_of_range_handle_is_an_error() {
        let s = state();
        let bogus = CoordinateHandle::new(7, "bogus");
        assert_eq!(
            bogus.value(&s),
            Err(PhysicsError::UnknownCoordinate("bogus".into()))
        );
    }
}
