//! Error taxonomy for detectors and the simulation loop.
//!
//! The simulator never recovers from a detector error: sequential analysis requires each
//! observation to be seen exactly once, so a failed step is surfaced to the caller as-is.
//!
//! Reusing a detector that already absorbed observations from an earlier run is a caller
//! obligation, not an error variant: it cannot be detected in general.

use std::fmt;

/// How a detector broke the stable-key contract for residual snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyViolation {
    /// A key reported on the first step is absent from this step's snapshot.
    MissingKey(String),
    /// This step's snapshot carries a key the first step did not report.
    NewKey(String),
}

impl fmt::Display for KeyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyViolation::MissingKey(k) => write!(f, "residual '{k}' was dropped"),
            KeyViolation::NewKey(k) => write!(f, "residual '{k}' appeared after the first step"),
        }
    }
}

/// Crate error.
///
/// `step` in [`Error::InvalidInput`] and [`Error::ContractViolation`] is the 1-based
/// observation index as counted by the detector: the index the offending observation has,
/// or would have had if it had been absorbed. For a fresh detector this equals the step within the run; when a
/// detector continues from an earlier run it keeps counting, so both variants agree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A signal value was NaN or infinite. Rejected before any detector state changes.
    #[error("invalid input at step {step}: non-finite value {value}")]
    InvalidInput { step: u64, value: f64 },

    /// A detector's residual snapshot did not keep the key set of its first step.
    #[error("detector contract violated at step {step}: {kind}")]
    ContractViolation { step: u64, kind: KeyViolation },

    /// A constructor or helper was given an out-of-domain parameter.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
