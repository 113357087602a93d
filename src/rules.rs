//! Stopping rules that can be attached to any detector.
//!
//! [`Ruled`] keeps the wrapped detector's update and residuals and layers an extra
//! [`StoppingRule`] on top of its own `check_stopping_rules`. This is how a detector's
//! running statistics are reused under different stop conditions:
//!
//! ```rust
//! use seqcd::{run, DetectorExt, MinObservations, RunningMean};
//!
//! let mut d = RunningMean::new().with_rule(MinObservations(3));
//! let result = run(&[1.0, 2.0, 3.0, 4.0, 5.0], &mut d).unwrap();
//! assert!(result.triggered());
//! assert_eq!(result.stop_index(), Some(3));
//! ```
//!
//! The built-in rules gate on counts and residual levels only; they are not change-detection
//! algorithms in their own right.

use crate::detector::Detector;
use crate::residuals::Residuals;

/// Post-update view handed to a [`StoppingRule`].
#[derive(Debug, Clone, Copy)]
pub struct StopContext<'a> {
    /// Observations absorbed, including the current one.
    pub n: u64,
    /// The observation just absorbed.
    pub value: f64,
    /// Residual snapshot after the update.
    pub residuals: &'a Residuals,
}

impl StopContext<'_> {
    /// Post-update value of residual `key`.
    pub fn residual(&self, key: &str) -> Option<f64> {
        self.residuals.get(key).copied()
    }
}

/// A boolean condition over a detector's post-update state.
///
/// Rules take `&mut self` so they may keep their own counters; they are evaluated exactly
/// once per step.
pub trait StoppingRule {
    fn triggered(&mut self, ctx: &StopContext<'_>) -> bool;
}

impl<F> StoppingRule for F
where
    F: FnMut(&StopContext<'_>) -> bool,
{
    fn triggered(&mut self, ctx: &StopContext<'_>) -> bool {
        self(ctx)
    }
}

/// Never fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Never;

impl StoppingRule for Never {
    fn triggered(&mut self, _ctx: &StopContext<'_>) -> bool {
        false
    }
}

/// Fires once at least `.0` observations have been absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinObservations(pub u64);

impl StoppingRule for MinObservations {
    fn triggered(&mut self, ctx: &StopContext<'_>) -> bool {
        ctx.n >= self.0
    }
}

/// Fires when residual `key` is `>= threshold`.
///
/// A missing key or a NaN residual never fires.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResidualAbove {
    pub key: String,
    pub threshold: f64,
}

impl ResidualAbove {
    /// Rule on residual `key` at `threshold`.
    pub fn new(key: impl Into<String>, threshold: f64) -> Self {
        Self {
            key: key.into(),
            threshold,
        }
    }
}

impl StoppingRule for ResidualAbove {
    fn triggered(&mut self, ctx: &StopContext<'_>) -> bool {
        ctx.residual(&self.key).is_some_and(|v| v >= self.threshold)
    }
}

/// Fires when residual `key` is `<= threshold`.
///
/// A missing key or a NaN residual never fires.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResidualBelow {
    pub key: String,
    pub threshold: f64,
}

impl ResidualBelow {
    /// Rule on residual `key` at `threshold`.
    pub fn new(key: impl Into<String>, threshold: f64) -> Self {
        Self {
            key: key.into(),
            threshold,
        }
    }
}

impl StoppingRule for ResidualBelow {
    fn triggered(&mut self, ctx: &StopContext<'_>) -> bool {
        ctx.residual(&self.key).is_some_and(|v| v <= self.threshold)
    }
}

/// A detector with an additional stopping rule.
///
/// Fires when either the inner detector's own rule or `rule` fires. Both are evaluated on
/// every step (no short-circuit), so stateful rules see every observation.
#[derive(Debug, Clone)]
pub struct Ruled<D, R> {
    detector: D,
    rule: R,
}

impl<D, R> Ruled<D, R> {
    /// Attach `rule` to `detector`.
    pub fn new(detector: D, rule: R) -> Self {
        Self { detector, rule }
    }

    /// The wrapped detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// The attached rule.
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Split into `(detector, rule)`.
    pub fn into_parts(self) -> (D, R) {
        (self.detector, self.rule)
    }
}

impl<D: Detector, R: StoppingRule> Detector for Ruled<D, R> {
    fn update(&mut self, value: f64) {
        self.detector.update(value)
    }

    fn residuals(&self) -> Residuals {
        self.detector.residuals()
    }

    fn n(&self) -> u64 {
        self.detector.n()
    }

    fn check_stopping_rules(&mut self, value: f64) -> bool {
        let inner = self.detector.check_stopping_rules(value);
        let residuals = self.detector.residuals();
        let ctx = StopContext {
            n: self.detector.n(),
            value,
            residuals: &residuals,
        };
        let outer = self.rule.triggered(&ctx);
        inner || outer
    }
}

/// Builder-style helpers for every [`Detector`].
pub trait DetectorExt: Detector + Sized {
    /// Attach an extra stopping rule.
    fn with_rule<R: StoppingRule>(self, rule: R) -> Ruled<Self, R> {
        Ruled::new(self, rule)
    }
}

impl<D: Detector> DetectorExt for D {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunningMean;

    #[test]
    fn min_observations_fires_on_the_kth_step() {
        let mut d = RunningMean::new().with_rule(MinObservations(3));
        assert!(!d.step(1.0).unwrap().triggered);
        assert!(!d.step(2.0).unwrap().triggered);
        assert!(d.step(3.0).unwrap().triggered);
        assert!(d.step(4.0).unwrap().triggered);
    }

    #[test]
    fn residual_thresholds_compare_post_update_values() {
        let mut up = RunningMean::new().with_rule(ResidualAbove::new(RunningMean::MEAN, 2.0));
        assert!(!up.step(1.0).unwrap().triggered);
        // mean becomes (1 + 5) / 2 = 3
        assert!(up.step(5.0).unwrap().triggered);

        let mut down = RunningMean::new().with_rule(ResidualBelow::new(RunningMean::MEAN, 0.0));
        assert!(!down.step(1.0).unwrap().triggered);
        assert!(down.step(-1.0).unwrap().triggered);
    }

    #[test]
    fn unknown_key_never_fires() {
        let mut d = RunningMean::new().with_rule(ResidualAbove::new("nope", f64::NEG_INFINITY));
        for x in [1.0, 2.0, 3.0] {
            assert!(!d.step(x).unwrap().triggered);
        }
    }

    #[test]
    fn closures_are_rules_and_are_evaluated_every_step() {
        let mut seen = Vec::new();
        {
            let mut d = RunningMean::new()
                .with_rule(MinObservations(1))
                .with_rule(|ctx: &StopContext<'_>| {
                    seen.push(ctx.value);
                    false
                });
            for x in [7.0, 8.0] {
                assert!(d.step(x).unwrap().triggered);
            }
        }
        assert_eq!(seen, vec![7.0, 8.0]);
    }

    #[test]
    fn never_leaves_the_baseline_untriggered() {
        let mut d = RunningMean::new().with_rule(Never);
        for x in 0..10 {
            assert!(!d.step(x as f64).unwrap().triggered);
        }
        assert_eq!(d.detector().n(), 10);
    }
}
