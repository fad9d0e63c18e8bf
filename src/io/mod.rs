// src/io/mod.rs
pub mod json;
#[cfg(feature = "gdal")]
pub mod reader;
#[cfg(feature = "gdal")]
pub mod writer;

use std::path::Path;

use crate::error::Result;
use crate::processing::indices::DegeneratePolicy;
use crate::raster::ColorImage;

pub use json::{load_band_set, load_color_image_json, write_raster_json, write_report};
#[cfg(feature = "gdal")]
pub use reader::{read_band, read_band_set, read_color_image, GeoInfo};
#[cfg(feature = "gdal")]
pub use writer::write_change_rasters;

/// Nodata marker of float raster outputs
pub const RASTER_NODATA: f64 = -999.0;

pub fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Degenerate-division policy for a single index written to `output`.
///
/// JSON keeps the engine's zero-fill; rasters mark those pixels as nodata.
pub fn index_policy(output: &Path) -> DegeneratePolicy {
    if is_json(output) {
        DegeneratePolicy::ZeroFill
    } else {
        DegeneratePolicy::NoData(RASTER_NODATA)
    }
}

/// Load a color image from JSON, or from any raster GDAL can open
pub fn load_color_image(path: &Path) -> Result<ColorImage> {
    if is_json(path) {
        return load_color_image_json(path);
    }

    #[cfg(feature = "gdal")]
    {
        read_color_image(path)
    }
    #[cfg(not(feature = "gdal"))]
    {
        Err(crate::error::ChangeError::UnsupportedFormat(format!(
            "{} (only .json images are supported without the gdal feature)",
            path.display()
        )))
    }
}
