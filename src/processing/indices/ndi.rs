// src/processing/indices/ndi.rs
use ndarray::{Array2, Zip};

use crate::error::Result;
use crate::processing::indices::IndexCalculator;
use crate::raster::{Band, BandSet};

/// What to write where `(A - B) / (A + B)` is undefined.
///
/// A zero denominator gives NaN or +/-Inf; the policy replaces any
/// non-finite result. The engine always uses `ZeroFill`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegeneratePolicy {
    /// Zero-fill on degenerate division
    ZeroFill,
    /// Write a nodata marker instead, e.g. -999.0 for raster export
    NoData(f64),
}

impl DegeneratePolicy {
    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        if value.is_finite() {
            return value;
        }
        match self {
            DegeneratePolicy::ZeroFill => 0.0,
            DegeneratePolicy::NoData(nodata) => *nodata,
        }
    }
}

/// Pixel-wise `(A - B) / (A + B)`, computed in parallel.
///
/// Both arrays must have the same shape.
pub fn normalized_difference(
    band_a: &Array2<f64>,
    band_b: &Array2<f64>,
    policy: DegeneratePolicy,
) -> Array2<f64> {
    Zip::from(band_a)
        .and(band_b)
        .par_map_collect(|&a, &b| policy.apply((a - b) / (a + b)))
}

/// Normalized Difference Index (NDI) calculator
pub struct NDI {
    band_a: Band,
    band_b: Band,
    policy: DegeneratePolicy,
    name: String,
}

impl NDI {
    pub fn new(band_a: Band, band_b: Band, name: Option<String>) -> Self {
        Self {
            band_a,
            band_b,
            policy: DegeneratePolicy::ZeroFill,
            name: name.unwrap_or_else(|| "NDI".to_string()),
        }
    }

    pub fn with_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DegeneratePolicy {
        self.policy
    }
}

impl IndexCalculator for NDI {
    fn calculate(&self, bands: &BandSet) -> Result<Array2<f64>> {
        let a = bands.require(self.band_a)?;
        let b = bands.require(self.band_b)?;
        Ok(normalized_difference(a, b, self.policy))
    }

    fn required_bands(&self) -> Vec<Band> {
        vec![self.band_a, self.band_b]
    }

    fn name(&self) -> &str {
        &self.name
    }
}
