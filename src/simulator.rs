//! Online simulation loop: one observation at a time, no lookahead.
//!
//! ```text
//!   signal ──next()──► detector.step(x) ──► (triggered, residuals)
//!      ▲                                          │
//!      │                              history.record(residuals)
//!      └──────── not triggered ◄──────────────────┤
//!                                                 ▼ triggered
//!                                         StoppedTriggered
//! ```
//!
//! The loop pulls from an iterator, so it cannot see any element before its turn and never
//! pulls another element once a rule fires. Errors from the detector propagate unmodified;
//! a residual key violation is reported at the detector's observation index (see [`Error`]).
//! There are no retries.

use tracing::{debug, info, trace, warn};

use crate::detector::Detector;
use crate::error::{Error, Result};
use crate::residuals::ResidualHistory;

/// Simulation configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulatorConfig {
    /// Maximum number of observations to deliver.
    ///
    /// Reaching the horizon ends the run as [`Termination::Exhausted`]. `None` delivers the
    /// whole signal.
    pub horizon: Option<usize>,
}

impl SimulatorConfig {
    /// Cap delivery at `horizon` observations.
    pub fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = Some(horizon);
        self
    }
}

/// Lifecycle of a single run.
///
/// `NotStarted → Running → {StoppedTriggered, StoppedExhausted}`; both stopped states are
/// final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    NotStarted,
    Running,
    StoppedTriggered,
    StoppedExhausted,
}

impl RunState {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::StoppedTriggered | RunState::StoppedExhausted)
    }
}

/// How a completed run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The stopping rule fired at this 1-based step.
    Triggered { at: u64 },
    /// The signal (or horizon) ran out without a trigger.
    Exhausted,
}

/// Outcome of a run: whether a rule fired, and the residual history up to that point.
///
/// Deserialization (feature `serde`) re-checks that the history is aligned and that a
/// triggered result holds at least one step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSimulationResult"))]
pub struct SimulationResult {
    triggered: bool,
    history: ResidualHistory,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSimulationResult {
    triggered: bool,
    history: ResidualHistory,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSimulationResult> for SimulationResult {
    type Error = Error;

    fn try_from(raw: RawSimulationResult) -> Result<Self> {
        if raw.triggered && raw.history.steps() == 0 {
            return Err(Error::InvalidParameter {
                name: "triggered",
                reason: "a triggered run records at least one step".to_string(),
            });
        }
        Ok(Self {
            triggered: raw.triggered,
            history: raw.history,
        })
    }
}

impl SimulationResult {
    /// Whether the stopping rule fired.
    pub fn triggered(&self) -> bool {
        self.triggered
    }

    /// Per-residual series, one entry per delivered observation.
    pub fn history(&self) -> &ResidualHistory {
        &self.history
    }

    /// Number of observations delivered to the detector.
    pub fn steps(&self) -> u64 {
        self.history.steps()
    }

    /// 1-based index of the step at which the rule fired.
    pub fn stop_index(&self) -> Option<u64> {
        self.triggered.then_some(self.history.steps())
    }

    /// How the run ended.
    pub fn termination(&self) -> Termination {
        match self.stop_index() {
            Some(at) => Termination::Triggered { at },
            None => Termination::Exhausted,
        }
    }

    /// Terminal [`RunState`] of the run.
    pub fn state(&self) -> RunState {
        match self.termination() {
            Termination::Triggered { .. } => RunState::StoppedTriggered,
            Termination::Exhausted => RunState::StoppedExhausted,
        }
    }

    /// Series recorded for residual `key`.
    pub fn residual(&self, key: &str) -> Option<&[f64]> {
        self.history.get(key)
    }

    /// Split into `(triggered, history)`.
    pub fn into_parts(self) -> (bool, ResidualHistory) {
        (self.triggered, self.history)
    }
}

/// Drives a signal through a detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnlineSimulator {
    cfg: SimulatorConfig,
}

impl OnlineSimulator {
    /// Simulator with the given configuration.
    pub fn new(cfg: SimulatorConfig) -> Self {
        Self { cfg }
    }

    /// Configuration this simulator runs with.
    pub fn config(&self) -> SimulatorConfig {
        self.cfg
    }

    /// Run over a slice. The slice is only read.
    pub fn run<D>(&self, signal: &[f64], detector: &mut D) -> Result<SimulationResult>
    where
        D: Detector + ?Sized,
    {
        self.run_iter(signal.iter().copied(), detector)
    }

    /// Run over any source of observations, pulling one at a time.
    ///
    /// `detector` should be fresh: continuing a detector that already absorbed observations
    /// from an earlier run is only meaningful if that continuation is intended.
    pub fn run_iter<I, D>(&self, signal: I, detector: &mut D) -> Result<SimulationResult>
    where
        I: IntoIterator<Item = f64>,
        D: Detector + ?Sized,
    {
        debug!(horizon = ?self.cfg.horizon, prior_n = detector.n(), "online simulation starting");

        let mut history = ResidualHistory::new();
        let mut source = signal.into_iter();
        let mut state = RunState::NotStarted;

        loop {
            if self
                .cfg
                .horizon
                .is_some_and(|h| history.steps() >= h as u64)
            {
                break;
            }
            let Some(value) = source.next() else {
                break;
            };
            state = RunState::Running;

            let step = detector.step(value)?;
            trace!(step = history.steps() + 1, value, triggered = step.triggered, "step");

            if let Err(e) = history.record(&step.residuals) {
                let e = match e {
                    Error::ContractViolation { kind, .. } => Error::ContractViolation {
                        step: detector.n(),
                        kind,
                    },
                    other => other,
                };
                warn!(error = %e, "detector broke the residual key contract");
                return Err(e);
            }

            if step.triggered {
                state = RunState::StoppedTriggered;
                info!(at = history.steps(), "stopping rule triggered");
                break;
            }
        }

        if state != RunState::StoppedTriggered {
            state = RunState::StoppedExhausted;
            debug!(steps = history.steps(), "signal exhausted without trigger");
        }

        Ok(SimulationResult {
            triggered: state == RunState::StoppedTriggered,
            history,
        })
    }
}

/// Run `signal` through `detector` with the default configuration.
pub fn run<D>(signal: &[f64], detector: &mut D) -> Result<SimulationResult>
where
    D: Detector + ?Sized,
{
    OnlineSimulator::default().run(signal, detector)
}

/// Like [`run`], over any iterator of observations.
pub fn run_iter<I, D>(signal: I, detector: &mut D) -> Result<SimulationResult>
where
    I: IntoIterator<Item = f64>,
    D: Detector + ?Sized,
{
    OnlineSimulator::default().run_iter(signal, detector)
}
