//! Variance-stabilizing transform applied before differencing

use serde::{Deserialize, Serialize};

/// Transform applied to a whole series before modelling.
///
/// The forward transform runs before differencing and the inverse runs
/// after undifferencing; swapping that order changes the scale of every
/// fitted value and forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// Values are modelled as-is
    #[default]
    Identity,
    /// `log1p` of the value clamped at zero
    Log1p,
}

impl Transform {
    /// Pick the transform from the `log1p` request flag
    pub fn from_log1p(enabled: bool) -> Self {
        if enabled {
            Transform::Log1p
        } else {
            Transform::Identity
        }
    }

    /// Forward transform of a single value
    pub fn forward(self, value: f64) -> f64 {
        match self {
            Transform::Identity => value,
            Transform::Log1p => value.max(0.0).ln_1p(),
        }
    }

    /// Inverse transform of a single value, never negative for `Log1p`
    pub fn inverse(self, value: f64) -> f64 {
        match self {
            Transform::Identity => value,
            Transform::Log1p => value.exp_m1().max(0.0),
        }
    }

    /// Forward transform of every value in a series
    pub fn forward_all(self, series: &[f64]) -> Vec<f64> {
        series.iter().map(|&v| self.forward(v)).collect()
    }

    /// Inverse transform of every value in a series
    pub fn inverse_all(self, series: &[f64]) -> Vec<f64> {
        series.iter().map(|&v| self.inverse(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log1p_round_trip() {
        let t = Transform::Log1p;
        for v in [0.0, 0.5, 1.0, 42.0, 1e6] {
            let back = t.inverse(t.forward(v));
            assert!((back - v).abs() <= 1e-9 * v.max(1.0), "{} -> {}", v, back);
        }
    }

    #[test]
    fn test_log1p_clamps_negative() {
        let t = Transform::Log1p;
        assert_eq!(t.forward(-5.0), 0.0);
        assert_eq!(t.inverse(t.forward(-5.0)), 0.0);
        // inverse of a negative transformed value is clamped as well
        assert_eq!(t.inverse(-2.0), 0.0);
    }

    #[test]
    fn test_identity_passthrough() {
        let t = Transform::from_log1p(false);
        assert_eq!(t, Transform::Identity);
        assert_eq!(t.forward_all(&[-1.0, 2.0]), vec![-1.0, 2.0]);
        assert_eq!(t.inverse_all(&[-1.0, 2.0]), vec![-1.0, 2.0]);
    }
}
