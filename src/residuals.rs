//! Residual snapshots and their step-aligned history.

use std::collections::BTreeMap;

use crate::error::{Error, KeyViolation, Result};

/// Named scalar statistics reported by a detector after one step.
///
/// `BTreeMap` keeps iteration order stable, so reports and histories are deterministic.
pub type Residuals = BTreeMap<String, f64>;

/// Per-residual time series, one entry appended per step per key.
///
/// Every series has exactly [`ResidualHistory::steps`] entries. The key set is discovered
/// from the first recorded snapshot and is fixed afterwards; [`ResidualHistory::record`]
/// rejects any later snapshot that drops or adds a key, leaving the history untouched.
/// Deserialization (feature `serde`) rejects series whose length differs from `steps`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawResidualHistory"))]
pub struct ResidualHistory {
    series: BTreeMap<String, Vec<f64>>,
    steps: u64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawResidualHistory {
    series: BTreeMap<String, Vec<f64>>,
    steps: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawResidualHistory> for ResidualHistory {
    type Error = Error;

    fn try_from(raw: RawResidualHistory) -> Result<Self> {
        if let Some((k, v)) = raw
            .series
            .iter()
            .find(|(_, v)| v.len() as u64 != raw.steps)
        {
            return Err(Error::InvalidParameter {
                name: "history",
                reason: format!(
                    "series '{k}' has {} entries, expected {}",
                    v.len(),
                    raw.steps
                ),
            });
        }
        Ok(Self {
            series: raw.series,
            steps: raw.steps,
        })
    }
}

impl ResidualHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one snapshot.
    ///
    /// The `step` of a returned [`Error::ContractViolation`] counts recorded snapshots; the
    /// simulator renumbers it to the detector's observation index.
    pub fn record(&mut self, residuals: &Residuals) -> Result<()> {
        let step = self.steps + 1;
        if self.steps == 0 {
            self.series = residuals
                .iter()
                .map(|(k, &v)| (k.clone(), vec![v]))
                .collect();
            self.steps = 1;
            return Ok(());
        }

        if let Some(k) = self.series.keys().find(|k| !residuals.contains_key(*k)) {
            return Err(Error::ContractViolation {
                step,
                kind: KeyViolation::MissingKey(k.clone()),
            });
        }
        if let Some(k) = residuals.keys().find(|k| !self.series.contains_key(*k)) {
            return Err(Error::ContractViolation {
                step,
                kind: KeyViolation::NewKey(k.clone()),
            });
        }

        for (k, values) in self.series.iter_mut() {
            values.push(residuals[k]);
        }
        self.steps = step;
        Ok(())
    }

    /// Number of snapshots recorded.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of tracked residuals.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether no residuals are tracked.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series for `key`.
    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.series.get(key).map(Vec::as_slice)
    }

    /// Most recent value of `key`.
    pub fn latest(&self, key: &str) -> Option<f64> {
        self.series.get(key).and_then(|v| v.last().copied())
    }

    /// Residual names in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// `(name, series)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Take the series map.
    pub fn into_inner(self) -> BTreeMap<String, Vec<f64>> {
        self.series
    }
}
