//! Box-shaped action and observation spaces.

use std::f64::consts::TAU;

use fastrand::Rng;

/// An n-dimensional box with per-dimension bounds. Bounds may be infinite.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace {
    pub low: Vec<f64>,
    pub high: Vec<f64>,
}

impl BoxSpace {
    /// `[low, high]^n`.
    #[must_use]
    pub fn uniform(n: usize, low: f64, high: f64) -> Self {
        Self {
            low: vec![low; n],
            high: vec![high; n],
        }
    }

    /// `(-inf, inf)^n`.
    #[must_use]
    pub fn unbounded(n: usize) -> Self {
        Self::uniform(n, f64::NEG_INFINITY, f64::INFINITY)
    }

    #[must_use]
    pub fn shape(&self) -> usize {
        self.low.len()
    }

    /// True when `x` has the right length and every entry lies within bounds.
    /// NaN is never contained.
    #[must_use]
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.shape()
            && x
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(&v, (&lo, &hi))| v >= lo && v <= hi)
    }

    /// Draws a point from the space.
    ///
    /// Bounded dimensions are sampled uniformly, half-bounded ones from a
    /// shifted exponential and unbounded ones from a standard normal.
    pub fn sample(&self, rng: &mut Rng) -> Vec<f64> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(&lo, &hi)| match (lo.is_finite(), hi.is_finite()) {
                (true, true) => lo + rng.f64() * (hi - lo),
                (true, false) => lo + exponential(rng),
                (false, true) => hi - exponential(rng),
                (false, false) => normal(rng),
            })
            .collect()
    }
}

fn exponential(rng: &mut Rng) -> f64 {
    -(1.0 - rng.f64()).ln()
}

// Box-Muller
fn normal(rng: &mut Rng) -> f64 {
    let u1 = 1.0 - rng.f64();
    let u2 = rng.f64();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_inside_bounded_space() {
        let space = BoxSpace::uniform(6, 0.0, 1.0);
        let mut rng = Rng::with_seed(7);
        for _ in 0..100 {
            let a = space.sample(&mut rng);
            assert_eq!(a.len(), 6);
            assert!(space.contains(&a));
        }
    }

    #[test]
    fn unbounded_samples_are_finite() {
        let space = BoxSpace::unbounded(16);
        let mut rng = Rng::with_seed(1);
        let x = space.sample(&mut rng);
        assert!(x.iter().all(|v| v.is_finite()));
        assert!(space.contains(&x));
    }

    #[test]
    fn half_bounded_respects_finite_side() {
        let space = BoxSpace {
            low: vec![2.0, f64::NEG_INFINITY],
            high: vec![f64::INFINITY, -3.0],
        };
        let mut rng = Rng::with_seed(3);
        for _ in 0..50 {
            let x = space.sample(&mut rng);
            assert!(x[0] >= 2.0);
            assert!(x[1] <= -3.0);
        }
    }

    #[test]
    fn contains_rejects_nan_and_wrong_length() {
        let space = BoxSpace::uniform(2, 0.0, 1.0);
        assert!(!space.contains(&[0.5]));
        assert!(!space.contains(&[0.5, f64::NAN]));
        assert!(!space.contains(&[0.5, 1.5]));
        assert!(space.contains(&[0.0, 1.0]));
    }
}
