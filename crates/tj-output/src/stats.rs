//! Sample statistics for per-episode metrics.

use crate::{OutputError, OutputResult};

/// Two-sided z-scores for the supported confidence levels.
const Z_TABLE: [(f64, f64); 3] = [(0.90, 1.645), (0.95, 1.96), (0.99, 2.576)];

/// The z-score for `confidence`.
///
/// # Errors
///
/// [`OutputError::Confidence`] for a level outside the table.
pub fn z_value(confidence: f64) -> OutputResult<f64> {
    Z_TABLE
        .iter()
        .find(|(level, _)| (level - confidence).abs() < 1e-9)
        .map(|&(_, z)| z)
        .ok_or(OutputError::Confidence(confidence))
}

/// Arithmetic mean; `0.0` for an empty sample.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; `0.0` for an empty sample.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Mean, spread and confidence half-width of one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stat {
    pub n:          usize,
    pub mean:       f64,
    pub std:        f64,
    /// `z * std / sqrt(n)`; the interval is `mean ± half_width`.
    pub half_width: f64,
}

impl Stat {
    pub fn of(values: &[f64], confidence: f64) -> OutputResult<Stat> {
        let z = z_value(confidence)?;
        let n = values.len();
        let std = std_dev(values);
        let half_width = if n == 0 { 0.0 } else { z * std / (n as f64).sqrt() };
        Ok(Stat { n, mean: mean(values), std, half_width })
    }

    pub fn lower(&self) -> f64 {
        self.mean - self.half_width
    }

    pub fn upper(&self) -> f64 {
        self.mean + self.half_width
    }
}
