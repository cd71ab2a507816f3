//! The per-variable metric capability and its three implementations.

use crate::error::{MtsError, Result};

use super::dtw::{dtw_distance, dtw_distance_windowed, euclidean_distance};
use super::mpdist::{mpdist, DEFAULT_PERCENTAGE};

/// A pairwise distance over value sequences: symmetric, non-negative, and
/// zero on identical input. Implementations reject input that violates
/// their own contract (e.g. unequal lengths for [`Euclidean`]).
pub trait Metric {
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64>;
}

/// Plain elementwise Euclidean distance over equal-length sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Metric for Euclidean {
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        if a.len() != b.len() {
            return Err(MtsError::DimensionMismatch {
                expected: a.len(),
                got: b.len(),
            });
        }
        if a.is_empty() {
            return Err(MtsError::EmptyData);
        }
        Ok(euclidean_distance(a, b))
    }
}

/// Dynamic Time Warping distance, optionally constrained to a Sakoe-Chiba
/// band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dtw {
    /// Half-width of the warping band; `None` warps freely.
    pub window: Option<usize>,
}

impl Dtw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn windowed(window: usize) -> Self {
        Self {
            window: Some(window),
        }
    }
}

impl Metric for Dtw {
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        if a.is_empty() || b.is_empty() {
            return Err(MtsError::EmptyData);
        }
        Ok(match self.window {
            Some(window) => dtw_distance_windowed(a, b, window),
            None => dtw_distance(a, b),
        })
    }
}

/// Matrix-Profile-derived distance (MPdist) parameterized by a subsequence
/// window length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixProfile {
    /// Subsequence window length `L`.
    pub window: usize,
    /// Percentile of the concatenated profiles, in `(0, 1]`.
    pub percentage: f64,
}

impl MatrixProfile {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            percentage: DEFAULT_PERCENTAGE,
        }
    }

    pub fn percentage(mut self, percentage: f64) -> Self {
        self.percentage = percentage;
        self
    }
}

impl Metric for MatrixProfile {
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        mpdist(a, b, self.window, self.percentage)
    }
}
