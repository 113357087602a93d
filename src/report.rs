//! Presentation-side data: run summaries and per-series chart specs.
//!
//! Nothing here renders. A [`SimulationReport`] carries what a printer or plotting frontend
//! needs (detected / not detected, the stop index, one [`Panel`] per series) and never feeds
//! back into a simulation.

use std::fmt;

use crate::detector::Detector;
use crate::error::Result;
use crate::simulator::{run, SimulationResult};

/// Vertical range `(min * 0.5, max * 1.5)` over the finite values of `series`.
///
/// Returns `None` if `series` has no finite values.
pub fn scaled_limits(series: &[f64]) -> Option<(f64, f64)> {
    let mut finite = series.iter().copied().filter(|x| x.is_finite());
    let first = finite.next()?;
    let (lo, hi) = finite.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x)));
    Some((lo * 0.5, hi * 1.5))
}

/// One chart: a titled series, optional y-limits, and the stop marker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Panel {
    pub title: String,
    pub values: Vec<f64>,
    /// `None` when unscaled or when the series has no finite values.
    pub limits: Option<(f64, f64)>,
    /// Step (1-based) where a vertical stop marker belongs.
    pub stop_marker: Option<u64>,
}

/// Summary of a finished run against the signal it consumed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationReport {
    pub residual_names: Vec<String>,
    pub signal_len: usize,
    pub detected: bool,
    pub stop_index: Option<u64>,
    /// Signal first, then one panel per residual in key order.
    pub panels: Vec<Panel>,
}

impl SimulationReport {
    /// Build a report. With `scale`, every panel gets [`scaled_limits`].
    pub fn new(signal: &[f64], result: &SimulationResult, scale: bool) -> Self {
        let stop_index = result.stop_index();
        let limits = |v: &[f64]| if scale { scaled_limits(v) } else { None };

        let mut panels = Vec::with_capacity(1 + result.history().len());
        panels.push(Panel {
            title: "Signal".to_string(),
            values: signal.to_vec(),
            limits: limits(signal),
            stop_marker: stop_index,
        });
        for (i, (name, values)) in result.history().iter().enumerate() {
            panels.push(Panel {
                title: format!("Residual #{}: {}", i + 1, name),
                values: values.to_vec(),
                limits: limits(values),
                stop_marker: stop_index,
            });
        }

        Self {
            residual_names: result.history().keys().map(str::to_string).collect(),
            signal_len: signal.len(),
            detected: result.triggered(),
            stop_index,
            panels,
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Residuals: [{}]", self.residual_names.join(", "))?;
        match self.stop_index {
            Some(at) if self.detected => {
                write!(f, "Change detected. Stopping rule triggered at {at}.")
            }
            _ => write!(f, "Stopping rule not triggered."),
        }
    }
}

/// Run a simulation and summarize it.
pub fn run_and_report<D>(
    signal: &[f64],
    detector: &mut D,
    scale: bool,
) -> Result<(SimulationResult, SimulationReport)>
where
    D: Detector + ?Sized,
{
    let result = run(signal, detector)?;
    let report = SimulationReport::new(signal, &result, scale);
    Ok((result, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_limits_halves_min_and_stretches_max() {
        assert_eq!(scaled_limits(&[40.0, 50.0, 45.0]), Some((20.0, 75.0)));
        assert_eq!(scaled_limits(&[f64::NAN, 2.0]), Some((1.0, 3.0)));
        assert_eq!(scaled_limits(&[]), None);
        assert_eq!(scaled_limits(&[f64::NAN]), None);
    }

    #[test]
    fn unscaled_panels_have_no_limits() {
        let mut d = crate::RunningMean::new();
        let (_, report) = run_and_report(&[1.0, 2.0], &mut d, false).unwrap();
        assert!(report.panels.iter().all(|p| p.limits.is_none()));
        assert_eq!(report.panels.len(), 2);
    }
}
