//! Muscle activation dynamics.
//!
//! Neural excitation `u` is filtered into muscle activation `a` by a
//! first-order system with asymmetric time constants:
//!
//! ```text
//! da/dt = (u - a) / tau(u, a)
//! ```
//!
//! Activation (rising) is faster than deactivation (falling).

/// Time constants of the excitation-to-activation filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationDynamics {
    /// Rising time constant in seconds.
    pub tau_activation: f64,
    /// Falling time constant in seconds.
    pub tau_deactivation: f64,
    /// Lower bound for activation.
    pub min_activation: f64,
}

impl Default for ActivationDynamics {
    fn default() -> Self {
        Self {
            tau_activation: 0.010,
            tau_deactivation: 0.040,
            min_activation: 0.01,
        }
    }
}

impl ActivationDynamics {
    #[must_use]
    pub fn new(tau_act: f64, tau_deact: f64) -> Self {
        Self {
            tau_activation: tau_act.max(0.001),
            tau_deactivation: tau_deact.max(0.001),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_min_activation(mut self, min_activation: f64) -> Self {
        self.min_activation = min_activation.clamp(0.0, 0.5);
        self
    }

    #[must_use]
    pub fn time_constant(&self, excitation: f64, activation: f64) -> f64 {
        if excitation > activation {
            self.tau_activation
        } else {
            self.tau_deactivation
        }
    }

    /// Advances activation by `dt` with semi-implicit Euler:
    /// `a' = (a + dt * u / tau) / (1 + dt / tau)`.
    ///
    /// A NaN activation stays NaN so ill-conditioned states remain visible
    /// to the caller.
    #[must_use]
    pub fn integrate(&self, excitation: f64, activation: f64, dt: f64) -> f64 {
        let u = excitation.clamp(0.0, 1.0);
        let a = activation.clamp(self.min_activation, 1.0);
        let tau = self.time_constant(u, a);
        let next = (a + dt * u / tau) / (1.0 + dt / tau);
        next.clamp(self.min_activation, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_rises_with_excitation() {
        let dynamics = ActivationDynamics::default();
        let a = dynamics.integrate(1.0, 0.01, 0.001);
        assert!(a > 0.01);
    }

    #[test]
    fn activation_decays_without_excitation() {
        let dynamics = ActivationDynamics::default();
        let a = dynamics.integrate(0.0, 0.8, 0.001);
        assert!(a < 0.8);
        assert!(a >= dynamics.min_activation);
    }

    #[test]
    fn activation_converges_to_excitation() {
        let dynamics = ActivationDynamics::default();
        let mut a = 0.01;
        for _ in 0..2000 {
            a = dynamics.integrate(0.6, a, 0.001);
        }
        assert!((a - 0.6).abs() < 1e-3);
    }

    #[test]
    fn rising_is_faster_than_falling() {
        let dynamics = ActivationDynamics::new(0.01, 0.05);
        let up = dynamics.integrate(1.0, 0.5, 0.005) - 0.5;
        let down = 0.5 - dynamics.integrate(0.0, 0.5, 0.005);
        assert!(up > down);
    }

    #[test]
    fn nan_activation_is_not_hidden() {
        let dynamics = ActivationDynamics::default();
        assert!(dynamics.integrate(0.5, f64::NAN, 0.001).is_nan());
    }
}
