// src/processing/indices/mod.rs
pub mod ndi;

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{ChangeError, Result};
use crate::raster::{Band, BandSet};

// Re-export indices
pub use ndi::{normalized_difference, DegeneratePolicy, NDI};

/// Normalized difference indices used for change detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Vegetation: (NIR - Red) / (NIR + Red)
    Ndvi,
    /// Moisture: (NIR - SWIR) / (NIR + SWIR)
    Ndmi,
    /// Built-up: (SWIR - NIR) / (SWIR + NIR)
    Ndbi,
}

impl IndexKind {
    pub const ALL: [IndexKind; 3] = [IndexKind::Ndvi, IndexKind::Ndmi, IndexKind::Ndbi];

    /// The (A, B) band pair of `(A - B) / (A + B)`
    pub fn bands(&self) -> (Band, Band) {
        match self {
            IndexKind::Ndvi => (Band::Nir, Band::Red),
            IndexKind::Ndmi => (Band::Nir, Band::Swir),
            IndexKind::Ndbi => (Band::Swir, Band::Nir),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IndexKind::Ndvi => "NDVI",
            IndexKind::Ndmi => "NDMI",
            IndexKind::Ndbi => "NDBI",
        }
    }

    pub fn calculator(&self) -> NDI {
        let (a, b) = self.bands();
        NDI::new(a, b, Some(self.name().to_string()))
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for spectral index calculators
pub trait IndexCalculator: Send + Sync {
    /// Calculate the index from the bands of one acquisition
    fn calculate(&self, bands: &BandSet) -> Result<Array2<f64>>;

    /// Bands the calculator reads, in formula order
    fn required_bands(&self) -> Vec<Band>;

    /// Return the name of the index
    fn name(&self) -> &str;
}

/// Compute `kind` from its two defining bands.
///
/// Pixels whose denominator is zero (or whose result is otherwise not
/// finite) come back as exactly 0.0.
pub fn compute_index(kind: IndexKind, band_a: &Array2<f64>, band_b: &Array2<f64>) -> Result<Array2<f64>> {
    let (a, b) = kind.bands();
    if band_a.is_empty() {
        return Err(ChangeError::EmptyRaster { band: a.name().to_string() });
    }
    if band_a.dim() != band_b.dim() {
        return Err(ChangeError::ShapeMismatch {
            band: b.name().to_string(),
            expected: band_a.dim(),
            found: band_b.dim(),
        });
    }
    Ok(normalized_difference(band_a, band_b, DegeneratePolicy::ZeroFill))
}
