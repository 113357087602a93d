//! `seqcd`: scaffolding for online (sequential) change-detection experiments.
//!
//! An **offline** detector is handed the whole signal and looks back for the change. An
//! **online** detector sees the signal stream in: at any moment it knows the newest
//! observation plus whatever summary of the past it chose to keep. This crate simulates the
//! online setting faithfully so experiments cannot cheat by peeking ahead.
//!
//! **Pieces:**
//! - [`Detector`]: absorbs one value per [`Detector::step`], updates running statistics in
//!   O(1), evaluates its stopping rule, and reports named [`Residuals`].
//! - [`RunningMean`]: the baseline detector (running mean, never triggers). It validates the
//!   plumbing; it does not detect anything.
//! - [`StoppingRule`] / [`DetectorExt::with_rule`]: reuse a detector's update under a
//!   different stop condition.
//! - [`run`] / [`OnlineSimulator`]: deliver a signal one value at a time, append each step's
//!   residuals to a [`ResidualHistory`], and stop the moment a rule fires.
//! - [`SimulationReport`]: what a printer or plotter needs from a finished run.
//! - [`piecewise_constant`] (and, with feature `stochastic`, `with_gaussian_noise`):
//!   synthetic signals with explicit seeds.
//!
//! ```rust
//! use seqcd::{piecewise_constant, run, RunningMean, Segment};
//!
//! let signal = piecewise_constant(&[Segment::new(50.0, 500), Segment::new(40.0, 500)]);
//! let mut detector = RunningMean::new();
//! let result = run(&signal, &mut detector).unwrap();
//!
//! assert!(!result.triggered());
//! assert_eq!(result.residual(RunningMean::MEAN).unwrap().len(), 1000);
//! ```
//!
//! **Guarantees** (for every run):
//! - values reach `step` in signal order, each at most once;
//! - if a rule fires at step `i`, every residual series has length `i` and nothing after
//!   position `i` is read;
//! - otherwise every series has the length of the delivered signal;
//! - the residual key set never changes after the first step (violations are errors).
//!
//! **Non-goals:** no concrete change-detection algorithm (CUSUM, Page-Hinkley, ...) ships
//! here, nor multivariate signals, persistence, or rendering.

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod residuals;
pub use residuals::*;

mod detector;
pub use detector::*;

mod rules;
pub use rules::*;

mod simulator;
pub use simulator::*;

mod report;
pub use report::*;

mod signal;
pub use signal::*;
