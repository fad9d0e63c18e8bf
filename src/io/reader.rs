// src/io/reader.rs
use gdal::Dataset;
use log::{debug, info};
use ndarray::{Array2, Array3, Axis};
use std::path::Path;

use crate::error::{ChangeError, Result};
use crate::raster::{BandSet, ColorImage};

pub struct GeoInfo {
    pub projection: String,
    pub geo_transform: [f64; 6],
    pub width: usize,
    pub height: usize,
}

impl GeoInfo {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let (width, height) = dataset.raster_size();
        Ok(Self {
            projection: dataset.projection(),
            geo_transform: dataset.geo_transform()?,
            width,
            height,
        })
    }
}

/// Read band 1 of a single-band raster as f64
pub fn read_band<P: AsRef<Path>>(path: P) -> Result<(Array2<f64>, GeoInfo)> {
    let path = path.as_ref();
    info!("Reading band from: {}", path.display());

    let dataset = Dataset::open(path)?;
    let geo_info = GeoInfo::from_dataset(&dataset)?;
    let (width, height) = (geo_info.width, geo_info.height);
    debug!("Band size: {}x{}", width, height);

    let band = dataset.rasterband(1)?;
    let buffer = band.read_as::<f64>((0, 0), (width, height), (width, height), None)?;
    let grid = Array2::from_shape_vec((height, width), buffer.data().to_vec()).map_err(|e| {
        ChangeError::Malformed {
            name: path.display().to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok((grid, geo_info))
}

/// Read NIR, Red and SWIR from one file each.
///
/// Georeferencing is taken from the NIR file.
pub fn read_band_set<P: AsRef<Path>>(nir: P, red: P, swir: P) -> Result<(BandSet, GeoInfo)> {
    let (nir, geo_info) = read_band(nir)?;
    let (red, _) = read_band(red)?;
    let (swir, _) = read_band(swir)?;
    Ok((BandSet::new(nir, red, swir)?, geo_info))
}

/// Read an 8-bit color image (3 bands, R/G/B order) or a grayscale one (1 band)
pub fn read_color_image<P: AsRef<Path>>(path: P) -> Result<ColorImage> {
    let path = path.as_ref();
    info!("Reading color image from: {}", path.display());

    let dataset = Dataset::open(path)?;
    let (width, height) = dataset.raster_size();
    let count = dataset.raster_count() as usize;
    let channels = if count >= 3 { 3 } else { 1 };
    debug!("Image size: {}x{}, {} band(s), using {}", width, height, count, channels);

    let mut data = Array3::<u8>::zeros((height, width, channels));
    for (i, mut channel) in data.axis_iter_mut(Axis(2)).enumerate() {
        let band = dataset.rasterband(i + 1)?;
        let buffer = band.read_as::<u8>((0, 0), (width, height), (width, height), None)?;
        for (dst, &src) in channel.iter_mut().zip(buffer.data()) {
            *dst = src;
        }
    }
    ColorImage::new(data)
}
