//! Signal sources for experiments.
//!
//! Randomness is opt-in (feature `stochastic`) and always takes an explicit seed, so a demo
//! or test is reproducible without any process-wide RNG setup.

#[cfg(feature = "stochastic")]
use crate::error::{Error, Result};

/// A run of `len` observations at a constant `level`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub level: f64,
    pub len: usize,
}

impl Segment {
    pub fn new(level: f64, len: usize) -> Self {
        Self { level, len }
    }
}

/// Concatenate constant segments into one signal.
///
/// ```rust
/// use seqcd::{piecewise_constant, Segment};
///
/// let s = piecewise_constant(&[Segment::new(50.0, 2), Segment::new(40.0, 1)]);
/// assert_eq!(s, vec![50.0, 50.0, 40.0]);
/// ```
pub fn piecewise_constant(segments: &[Segment]) -> Vec<f64> {
    let total = segments.iter().map(|s| s.len).sum();
    let mut out = Vec::with_capacity(total);
    for s in segments {
        out.extend(std::iter::repeat(s.level).take(s.len));
    }
    out
}

/// Add i.i.d. `N(0, sigma²)` noise to `signal`, seeded for reproducibility.
#[cfg(feature = "stochastic")]
pub fn with_gaussian_noise(signal: &[f64], sigma: f64, seed: u64) -> Result<Vec<f64>> {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    let normal = Normal::new(0.0, sigma).map_err(|e| Error::InvalidParameter {
        name: "sigma",
        reason: e.to_string(),
    })?;
    if !sigma.is_finite() {
        return Err(Error::InvalidParameter {
            name: "sigma",
            reason: format!("must be finite, got {sigma}"),
        });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(signal.iter().map(|&x| x + normal.sample(&mut rng)).collect())
}
