// src/error.rs
use thiserror::Error;

/// Errors raised by the change detection engine and its I/O helpers.
///
/// Numeric degeneracy (zero denominators, flat scenes) is never an error;
/// it is neutralized in place by the index and normalization rules.
#[derive(Debug, Error)]
pub enum ChangeError {
    #[error("required band '{band}' is missing")]
    MissingBand { band: String },

    #[error("band '{band}' is empty (zero-sized raster)")]
    EmptyRaster { band: String },

    #[error("band '{band}' has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        band: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("malformed raster '{name}': {reason}")]
    Malformed { name: String, reason: String },

    #[error("unsupported format for '{0}'")]
    UnsupportedFormat(String),

    #[error("invalid color image: {0}")]
    InvalidImage(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "gdal")]
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),
}

pub type Result<T> = std::result::Result<T, ChangeError>;
