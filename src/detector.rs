//! The detector contract and the running-mean baseline.
//!
//! A [`Detector`] absorbs one observation per [`Detector::step`] call, updates its running
//! statistics in O(1), evaluates its stopping rule against the post-update state, and reports
//! a [`Residuals`] snapshot. Implementors normally supply only [`Detector::update`] and
//! [`Detector::residuals`] (plus [`Detector::check_stopping_rules`] once they have a real rule);
//! the provided `step` wires those together.
//!
//! ## Non-finite input
//!
//! The provided `step` rejects NaN and `±∞` with [`Error::InvalidInput`] *before* calling
//! `update`, so a rejected value never reaches the detector's state. Implementors that
//! override `step` should keep this policy.

use crate::error::{Error, Result};
use crate::residuals::Residuals;

/// Output of one detector step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Whether the stopping rule holds for the post-update state.
    pub triggered: bool,
    /// Post-update values of every tracked statistic, under stable keys.
    pub residuals: Residuals,
}

/// A stateful online change detector.
pub trait Detector {
    /// Fold one observation into the running statistics. Must be O(1) amortized.
    fn update(&mut self, value: f64);

    /// Current named statistics. The key set must be the same on every call.
    fn residuals(&self) -> Residuals;

    /// Number of observations absorbed so far.
    fn n(&self) -> u64;

    /// Stopping rule, evaluated after `update(value)`.
    ///
    /// The default never fires.
    fn check_stopping_rules(&mut self, value: f64) -> bool {
        let _ = value;
        false
    }

    /// Absorb `value`, evaluate the stopping rule, and report the new state.
    fn step(&mut self, value: f64) -> Result<Step> {
        if !value.is_finite() {
            return Err(Error::InvalidInput {
                step: self.n() + 1,
                value,
            });
        }
        self.update(value);
        let triggered = self.check_stopping_rules(value);
        Ok(Step {
            triggered,
            residuals: self.residuals(),
        })
    }
}

impl<D: Detector + ?Sized> Detector for &mut D {
    fn update(&mut self, value: f64) {
        (**self).update(value)
    }

    fn residuals(&self) -> Residuals {
        (**self).residuals()
    }

    fn n(&self) -> u64 {
        (**self).n()
    }

    fn check_stopping_rules(&mut self, value: f64) -> bool {
        (**self).check_stopping_rules(value)
    }

    fn step(&mut self, value: f64) -> Result<Step> {
        (**self).step(value)
    }
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn update(&mut self, value: f64) {
        (**self).update(value)
    }

    fn residuals(&self) -> Residuals {
        (**self).residuals()
    }

    fn n(&self) -> u64 {
        (**self).n()
    }

    fn check_stopping_rules(&mut self, value: f64) -> bool {
        (**self).check_stopping_rules(value)
    }

    fn step(&mut self, value: f64) -> Result<Step> {
        (**self).step(value)
    }
}

/// Baseline detector: tracks the running mean and never triggers.
///
/// Useful for validating simulation plumbing, and as the update half of a detector whose
/// stopping logic is attached with [`DetectorExt::with_rule`](crate::DetectorExt::with_rule).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunningMean {
    n: u64,
    mean: f64,
}

impl RunningMean {
    /// Residual key for the running mean.
    pub const MEAN: &'static str = "mean_";

    /// Fresh detector. The mean is undefined (NaN) until the first observation.
    pub fn new() -> Self {
        Self {
            n: 0,
            mean: f64::NAN,
        }
    }

    /// Mean of every observation absorbed so far (NaN before the first).
    pub fn mean(&self) -> f64 {
        self.mean
    }
}

impl Default for RunningMean {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for RunningMean {
    fn update(&mut self, value: f64) {
        self.n = self.n.saturating_add(1);
        if self.n == 1 {
            self.mean = value;
            return;
        }
        // Both terms are scaled by 1/n first, so the mean stays finite for finite input.
        let n = self.n as f64;
        self.mean += value / n - self.mean / n;
    }

    fn residuals(&self) -> Residuals {
        Residuals::from([(Self::MEAN.to_string(), self.mean)])
    }

    fn n(&self) -> u64 {
        self.n
    }
}
